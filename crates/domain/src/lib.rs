//! Domain layer for the customer accounts service.
//!
//! This crate provides the core domain abstractions including:
//! - EventSourced trait for state rebuilt from an event stream
//! - DomainEvent trait and EventMeta for domain events
//! - Command trait and the bounded retry loop for command processing
//! - Customer aggregate: value objects, events, evaluators and command handler

pub mod aggregate;
pub mod command;
pub mod customer;
pub mod error;
pub mod event;

pub use aggregate::EventSourced;
pub use command::{Command, MAX_RETRIES, execute_with_retry};
pub use customer::{
    ChangeCustomerEmailAddress, ChangeCustomerName, ConfirmCustomerEmailAddress,
    ConfirmationHash, CurrentState, CustomerCommandHandler, CustomerEvent, CustomerEventStore,
    CustomerId, DeleteCustomer, EmailAddress, PersonName, RegisterCustomer,
};
pub use error::{DomainError, ErrorKind};
pub use event::{DomainEvent, EventMeta};

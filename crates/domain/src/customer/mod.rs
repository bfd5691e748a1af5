//! Customer aggregate and related types.

pub mod aggregate;
mod assertions;
mod commands;
mod events;
mod marshal;
mod service;
mod state;
mod store;
mod value_objects;

pub use aggregate::register;
pub use assertions::build_unique_email_assertions;
pub use commands::*;
pub use events::{
    CustomerDeleted, CustomerEmailAddressChanged, CustomerEmailAddressConfirmationFailed,
    CustomerEmailAddressConfirmed, CustomerEvent, CustomerNameChanged, CustomerRegistered,
    WRONG_CONFIRMATION_HASH,
};
pub use marshal::{
    from_stored_event, marshal_customer_event, to_stored_event, unmarshal_customer_event,
};
pub use service::CustomerCommandHandler;
pub use state::CurrentState;
pub use store::CustomerEventStore;
pub use value_objects::{ConfirmationHash, CustomerId, EmailAddress, PersonName};

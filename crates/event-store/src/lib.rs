//! Event store for the customer accounts service.
//!
//! Streams are stored as rows of `(stream_id, stream_version, event_name,
//! occurred_at, payload)` whose composite primary key doubles as the
//! optimistic concurrency guard. Appends also maintain the
//! `unique_email_addresses` index inside the same transaction.

pub mod error;
pub mod event;
pub mod memory;
pub mod postgres;
pub mod store;
pub mod uniqueness;

pub use common::StreamId;
pub use error::{EventStoreError, Result};
pub use event::{StoredEvent, Version};
pub use memory::InMemoryEventStore;
pub use postgres::PostgresEventStore;
pub use store::{EventStore, EventStoreExt, validate_events_for_append};
pub use uniqueness::UniqueEmailAssertion;

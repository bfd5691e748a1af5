//! Types shared between the event store and the domain layer.

mod types;

pub use types::StreamId;

use thiserror::Error;

use crate::{StreamId, Version};

/// Errors that can occur when interacting with the event store.
#[derive(Debug, Error)]
pub enum EventStoreError {
    /// Another writer already stored an event at this stream version.
    #[error("Concurrency conflict on stream {stream_id}: version {version} already exists")]
    ConcurrencyConflict { stream_id: StreamId, version: Version },

    /// Adding or replacing an entry in the email uniqueness index would
    /// violate its primary key.
    #[error("Email address {email_address} is already taken")]
    DuplicateUniqueValue { email_address: String },

    /// A replace assertion referenced an index entry that does not exist.
    #[error("Email address {email_address} is not present in the uniqueness index")]
    UniqueValueMissing { email_address: String },

    /// The batch handed to `append` was rejected before touching storage.
    #[error("Invalid append: {0}")]
    InvalidAppend(String),

    /// The version cannot be represented in the storage column.
    #[error("Stream version {0} is out of range for storage")]
    VersionOutOfRange(Version),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for event store operations.
pub type Result<T> = std::result::Result<T, EventStoreError>;

use async_trait::async_trait;

use crate::{EventStoreError, Result, StoredEvent, StreamId, UniqueEmailAssertion, Version};

/// Core trait for event store implementations.
///
/// An event store persists per-stream event rows and the email uniqueness
/// index. All implementations must be thread-safe (Send + Sync); there is no
/// in-process locking per stream, conflicts are detected by the
/// `(stream_id, stream_version)` key at write time.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Loads events of a stream with `stream_version >= from_version`.
    ///
    /// Events are returned in strictly ascending version order, at most
    /// `max_events` of them. An unknown stream yields an empty list.
    async fn load_stream(
        &self,
        stream_id: &StreamId,
        from_version: Version,
        max_events: usize,
    ) -> Result<Vec<StoredEvent>>;

    /// Applies `assertions` to the uniqueness index and appends `events`,
    /// atomically.
    ///
    /// Assertions are applied first, in list order, then events are inserted
    /// in the order given, each at its explicit version. Either everything
    /// is committed or nothing is.
    ///
    /// Fails with `ConcurrencyConflict` when a version already exists in the
    /// stream, even if an assertion failed first, and with
    /// `DuplicateUniqueValue` when an assertion collides with an existing
    /// index entry.
    ///
    /// Returns the version of the last appended event.
    async fn append(
        &self,
        events: Vec<StoredEvent>,
        assertions: Vec<UniqueEmailAssertion>,
    ) -> Result<Version>;

    /// Deletes every event of a stream and every uniqueness index entry
    /// owned by `owner_id`, in one transaction.
    async fn purge_stream(&self, stream_id: &StreamId, owner_id: &str) -> Result<()>;
}

/// Extension trait providing convenience methods for event stores.
#[async_trait]
pub trait EventStoreExt: EventStore {
    /// Loads the complete stream.
    async fn load_full_stream(&self, stream_id: &StreamId) -> Result<Vec<StoredEvent>> {
        self.load_stream(stream_id, Version::first(), usize::MAX)
            .await
    }

    /// Returns the version of the last event in a stream, or `None` if the
    /// stream is empty.
    async fn stream_version(&self, stream_id: &StreamId) -> Result<Option<Version>> {
        let events = self.load_full_stream(stream_id).await?;
        Ok(events.last().map(|event| event.stream_version))
    }
}

// Blanket implementation for all EventStore implementations
impl<T: EventStore + ?Sized> EventStoreExt for T {}

/// Validates events before appending.
///
/// The batch must be non-empty, target a single stream, and carry strictly
/// consecutive versions.
pub fn validate_events_for_append(events: &[StoredEvent]) -> Result<()> {
    let Some(first) = events.first() else {
        return Err(EventStoreError::InvalidAppend(
            "Cannot append empty event list".to_string(),
        ));
    };

    if first.stream_version < Version::first() {
        return Err(EventStoreError::InvalidAppend(format!(
            "Stream versions start at 1, got {}",
            first.stream_version
        )));
    }

    let mut expected_version = first.stream_version;
    for event in events.iter().skip(1) {
        if event.stream_id != first.stream_id {
            return Err(EventStoreError::InvalidAppend(
                "All events must be for the same stream".to_string(),
            ));
        }

        expected_version = expected_version.next();
        if event.stream_version != expected_version {
            return Err(EventStoreError::InvalidAppend(format!(
                "Event versions must be sequential. Expected {}, got {}",
                expected_version, event.stream_version
            )));
        }
    }

    Ok(())
}

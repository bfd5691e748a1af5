use crate::StreamId;

/// Position of an event within its stream.
///
/// Versions start at 1 for the first event and increment by 1 for each
/// subsequent event on a stream. Version 0 denotes an empty stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version(i64);

impl Version {
    /// Creates a new version from a raw value.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the initial version (0) of an empty stream.
    pub fn initial() -> Self {
        Self(0)
    }

    /// Returns the first version (1) for the first event.
    pub fn first() -> Self {
        Self(1)
    }

    /// Returns the next version.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the raw version value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Version {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Version> for i64 {
    fn from(version: Version) -> Self {
        version.0
    }
}

/// One row of the `eventstore` table.
///
/// The store treats the payload as opaque bytes; serialization of the
/// domain event happens before the row is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEvent {
    /// The stream this event belongs to.
    pub stream_id: StreamId,

    /// Position of the event within its stream.
    pub stream_version: Version,

    /// Stable short name of the event kind (e.g. "CustomerRegistered").
    pub event_name: String,

    /// RFC 3339 timestamp with nanosecond precision.
    pub occurred_at: String,

    /// Serialized event.
    pub payload: Vec<u8>,
}

impl StoredEvent {
    /// Creates a new stored event row.
    pub fn new(
        stream_id: StreamId,
        stream_version: Version,
        event_name: impl Into<String>,
        occurred_at: impl Into<String>,
        payload: Vec<u8>,
    ) -> Self {
        Self {
            stream_id,
            stream_version,
            event_name: event_name.into(),
            occurred_at: occurred_at.into(),
            payload,
        }
    }
}

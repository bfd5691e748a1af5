/// Identifier of a single event stream in the event store.
///
/// Every aggregate is backed by exactly one stream. The identifier is the
/// aggregate kind and the aggregate id joined by a dash, e.g.
/// `customer-3f0e...`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StreamId(String);

impl StreamId {
    /// Builds the stream id for an aggregate of the given kind.
    pub fn new(kind: &str, aggregate_id: &str) -> Self {
        Self(format!("{kind}-{aggregate_id}"))
    }

    /// Wraps an already formatted stream id, e.g. one read back from storage.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the stream id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StreamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StreamId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

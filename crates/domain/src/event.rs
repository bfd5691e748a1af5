//! Event metadata and the domain event trait.

use chrono::{SecondsFormat, Utc};
use event_store::Version;

/// Metadata carried by every domain event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventMeta {
    event_name: String,
    occurred_at: String,
    stream_version: Version,
}

impl EventMeta {
    /// Builds metadata for a freshly recorded event, stamping the current
    /// time as an RFC 3339 timestamp with nanosecond precision.
    ///
    /// The stream version is always passed in by the caller; it is never
    /// inferred.
    pub fn build(event_name: &str, stream_version: Version) -> Self {
        Self {
            event_name: event_name.to_string(),
            occurred_at: Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true),
            stream_version,
        }
    }

    /// Reconstructs metadata read back from storage.
    pub fn rebuild(
        event_name: impl Into<String>,
        occurred_at: impl Into<String>,
        stream_version: Version,
    ) -> Self {
        Self {
            event_name: event_name.into(),
            occurred_at: occurred_at.into(),
            stream_version,
        }
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn occurred_at(&self) -> &str {
        &self.occurred_at
    }

    pub fn stream_version(&self) -> Version {
        self.stream_version
    }
}

/// Trait for domain events.
///
/// Domain events represent facts that have happened in the domain.
/// They are immutable and named in past tense. A failure event records a
/// rejected attempt; it is still persisted and still advances the stream.
pub trait DomainEvent: Send + Sync + Clone + std::fmt::Debug {
    /// Returns the stable short name of the event kind.
    fn event_type(&self) -> &'static str;

    /// Returns the event metadata.
    fn meta(&self) -> &EventMeta;

    /// Returns why the attempted command was rejected, for failure events.
    fn failure_reason(&self) -> Option<&str> {
        None
    }

    /// Returns true for failure events.
    fn is_failure_event(&self) -> bool {
        self.failure_reason().is_some()
    }
}

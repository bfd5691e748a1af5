//! Rebuilding state from an event stream.

use event_store::Version;

use crate::event::DomainEvent;

/// Trait for state that is rebuilt by replaying an ordered event stream.
///
/// Replaying is pure and deterministic: the same stream always yields the
/// same state, and applying an event never fails (events are facts).
pub trait EventSourced: Sized {
    /// The type of events this state consumes.
    type Event: DomainEvent;

    /// Builds the initial state from the first event of a stream.
    ///
    /// Returns `None` if the event cannot start a stream.
    fn init(event: &Self::Event) -> Option<Self>;

    /// Applies a subsequent event.
    fn apply(&mut self, event: &Self::Event);

    /// Returns the version of the last applied event.
    fn version(&self) -> Version;

    /// Replays a whole stream, returning `None` for an empty stream or one
    /// that does not start with an initializing event.
    fn replay(stream: &[Self::Event]) -> Option<Self> {
        let (first, rest) = stream.split_first()?;
        let mut state = Self::init(first)?;
        for event in rest {
            state.apply(event);
        }
        Some(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventMeta;

    #[derive(Debug, Clone)]
    enum TestEvent {
        Created(EventMeta),
        Updated(EventMeta, i32),
    }

    impl DomainEvent for TestEvent {
        fn event_type(&self) -> &'static str {
            match self {
                TestEvent::Created(_) => "TestCreated",
                TestEvent::Updated(..) => "TestUpdated",
            }
        }

        fn meta(&self) -> &EventMeta {
            match self {
                TestEvent::Created(meta) | TestEvent::Updated(meta, _) => meta,
            }
        }
    }

    struct TestState {
        value: i32,
        version: Version,
    }

    impl EventSourced for TestState {
        type Event = TestEvent;

        fn init(event: &TestEvent) -> Option<Self> {
            match event {
                TestEvent::Created(meta) => Some(Self {
                    value: 0,
                    version: meta.stream_version(),
                }),
                TestEvent::Updated(..) => None,
            }
        }

        fn apply(&mut self, event: &TestEvent) {
            if let TestEvent::Updated(_, value) = event {
                self.value = *value;
            }
            self.version = event.meta().stream_version();
        }

        fn version(&self) -> Version {
            self.version
        }
    }

    #[test]
    fn replay_applies_events_in_order() {
        let stream = vec![
            TestEvent::Created(EventMeta::build("TestCreated", Version::new(1))),
            TestEvent::Updated(EventMeta::build("TestUpdated", Version::new(2)), 1),
            TestEvent::Updated(EventMeta::build("TestUpdated", Version::new(3)), 42),
        ];

        let state = TestState::replay(&stream).unwrap();
        assert_eq!(state.value, 42);
        assert_eq!(state.version(), Version::new(3));
    }

    #[test]
    fn replay_of_empty_stream_is_none() {
        assert!(TestState::replay(&[]).is_none());
    }

    #[test]
    fn replay_requires_initializing_event() {
        let stream = vec![TestEvent::Updated(
            EventMeta::build("TestUpdated", Version::new(1)),
            7,
        )];
        assert!(TestState::replay(&stream).is_none());
    }

    #[test]
    fn failure_reason_defaults_to_none() {
        let event = TestEvent::Created(EventMeta::build("TestCreated", Version::first()));
        assert!(!event.is_failure_event());
        assert_eq!(event.event_type(), "TestCreated");
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    EventStoreError, Result, StoredEvent, StreamId, UniqueEmailAssertion, Version,
    store::{EventStore, validate_events_for_append},
};

#[derive(Default)]
struct Tables {
    /// Event rows per stream, kept sorted by version.
    eventstore: HashMap<StreamId, Vec<StoredEvent>>,

    /// email address -> customer id
    unique_email_addresses: HashMap<String, String>,
}

/// In-memory event store implementation for testing and local runs.
///
/// Mirrors the PostgreSQL implementation: the version of a stream row is
/// unique, a taken version is reported as a conflict even when an assertion
/// would also fail, and a failed append leaves no trace.
#[derive(Clone, Default)]
pub struct InMemoryEventStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryEventStore {
    /// Creates a new empty in-memory event store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of events stored across all streams.
    pub async fn event_count(&self) -> usize {
        self.tables
            .read()
            .await
            .eventstore
            .values()
            .map(Vec::len)
            .sum()
    }

    /// Returns the customer id holding `email_address` in the uniqueness index.
    pub async fn unique_email_owner(&self, email_address: &str) -> Option<String> {
        self.tables
            .read()
            .await
            .unique_email_addresses
            .get(email_address)
            .cloned()
    }
}

fn apply_assertion(
    index: &mut HashMap<String, String>,
    assertion: &UniqueEmailAssertion,
) -> Result<()> {
    match assertion {
        UniqueEmailAssertion::Add {
            email_address,
            customer_id,
        } => {
            if index.contains_key(email_address) {
                return Err(EventStoreError::DuplicateUniqueValue {
                    email_address: email_address.clone(),
                });
            }
            index.insert(email_address.clone(), customer_id.clone());
        }
        UniqueEmailAssertion::Replace { previous, new } => {
            let missing = || EventStoreError::UniqueValueMissing {
                email_address: previous.clone(),
            };
            if previous == new {
                return index.contains_key(previous).then_some(()).ok_or_else(missing);
            }
            if index.contains_key(new) {
                return Err(EventStoreError::DuplicateUniqueValue {
                    email_address: new.clone(),
                });
            }
            let owner = index.remove(previous).ok_or_else(missing)?;
            index.insert(new.clone(), owner);
        }
        UniqueEmailAssertion::Remove { email_address } => {
            index.remove(email_address);
        }
    }

    Ok(())
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn load_stream(
        &self,
        stream_id: &StreamId,
        from_version: Version,
        max_events: usize,
    ) -> Result<Vec<StoredEvent>> {
        let tables = self.tables.read().await;
        let events = tables
            .eventstore
            .get(stream_id)
            .map(|stream| {
                stream
                    .iter()
                    .filter(|e| e.stream_version >= from_version)
                    .take(max_events)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(events)
    }

    async fn append(
        &self,
        events: Vec<StoredEvent>,
        assertions: Vec<UniqueEmailAssertion>,
    ) -> Result<Version> {
        validate_events_for_append(&events)?;

        let mut tables = self.tables.write().await;

        // A stale writer's assertions are computed from an old email address,
        // so the version check has to win over any index failure.
        let stream_id = events[0].stream_id.clone();
        let stream = tables.eventstore.get(&stream_id);
        for event in &events {
            let taken = stream
                .is_some_and(|rows| rows.iter().any(|r| r.stream_version == event.stream_version));
            if taken {
                return Err(EventStoreError::ConcurrencyConflict {
                    stream_id: stream_id.clone(),
                    version: event.stream_version,
                });
            }
        }

        // Work on a copy of the index so a failure part way leaves it untouched.
        let mut index = tables.unique_email_addresses.clone();
        for assertion in &assertions {
            apply_assertion(&mut index, assertion)?;
        }

        let last_version = events
            .last()
            .map(|e| e.stream_version)
            .unwrap_or(Version::initial());

        tables.unique_email_addresses = index;
        let stream = tables.eventstore.entry(stream_id).or_default();
        stream.extend(events);
        stream.sort_by_key(|e| e.stream_version);

        Ok(last_version)
    }

    async fn purge_stream(&self, stream_id: &StreamId, owner_id: &str) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables.eventstore.remove(stream_id);
        tables
            .unique_email_addresses
            .retain(|_, customer_id| customer_id != owner_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(id: &str) -> StreamId {
        StreamId::new("customer", id)
    }

    fn create_test_event(stream_id: &StreamId, version: i64, event_name: &str) -> StoredEvent {
        StoredEvent::new(
            stream_id.clone(),
            Version::new(version),
            event_name,
            "2024-01-01T00:00:00.000000000Z",
            br#"{"test":true}"#.to_vec(),
        )
    }

    fn add(email: &str, customer_id: &str) -> UniqueEmailAssertion {
        UniqueEmailAssertion::Add {
            email_address: email.to_string(),
            customer_id: customer_id.to_string(),
        }
    }

    #[tokio::test]
    async fn append_single_event() {
        let store = InMemoryEventStore::new();
        let id = stream("1");

        let result = store
            .append(vec![create_test_event(&id, 1, "TestEvent")], vec![])
            .await;
        assert_eq!(result.unwrap(), Version::first());

        let events = store.load_stream(&id, Version::first(), usize::MAX).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_name, "TestEvent");
    }

    #[tokio::test]
    async fn append_multiple_events() {
        let store = InMemoryEventStore::new();
        let id = stream("1");

        let events = vec![
            create_test_event(&id, 1, "Event1"),
            create_test_event(&id, 2, "Event2"),
            create_test_event(&id, 3, "Event3"),
        ];

        let result = store.append(events, vec![]).await;
        assert_eq!(result.unwrap(), Version::new(3));
        assert_eq!(store.event_count().await, 3);
    }

    #[tokio::test]
    async fn version_collision_is_a_concurrency_conflict() {
        let store = InMemoryEventStore::new();
        let id = stream("1");

        store
            .append(vec![create_test_event(&id, 1, "Event1")], vec![])
            .await
            .unwrap();
        store
            .append(vec![create_test_event(&id, 2, "Event2")], vec![])
            .await
            .unwrap();

        let result = store
            .append(vec![create_test_event(&id, 2, "Racing")], vec![])
            .await;

        assert!(matches!(
            result,
            Err(EventStoreError::ConcurrencyConflict { version, .. }) if version == Version::new(2)
        ));
        assert_eq!(store.event_count().await, 2);
    }

    #[tokio::test]
    async fn load_returns_ascending_versions_from_offset_with_limit() {
        let store = InMemoryEventStore::new();
        let id = stream("1");

        // Insert out of order across separate appends.
        store
            .append(vec![create_test_event(&id, 2, "Event2")], vec![])
            .await
            .unwrap();
        store
            .append(vec![create_test_event(&id, 1, "Event1")], vec![])
            .await
            .unwrap();
        store
            .append(
                vec![
                    create_test_event(&id, 3, "Event3"),
                    create_test_event(&id, 4, "Event4"),
                ],
                vec![],
            )
            .await
            .unwrap();

        let all = store.load_stream(&id, Version::first(), usize::MAX).await.unwrap();
        let versions: Vec<i64> = all.iter().map(|e| e.stream_version.as_i64()).collect();
        assert_eq!(versions, vec![1, 2, 3, 4]);

        let window = store.load_stream(&id, Version::new(2), 2).await.unwrap();
        let versions: Vec<i64> = window.iter().map(|e| e.stream_version.as_i64()).collect();
        assert_eq!(versions, vec![2, 3]);
    }

    #[tokio::test]
    async fn unknown_stream_loads_empty() {
        let store = InMemoryEventStore::new();
        let events = store
            .load_stream(&stream("missing"), Version::first(), usize::MAX)
            .await
            .unwrap();
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn duplicate_email_rejects_whole_append() {
        let store = InMemoryEventStore::new();
        let first = stream("1");
        let second = stream("2");

        store
            .append(
                vec![create_test_event(&first, 1, "CustomerRegistered")],
                vec![add("fiona@gallagher.net", "1")],
            )
            .await
            .unwrap();

        let result = store
            .append(
                vec![create_test_event(&second, 1, "CustomerRegistered")],
                vec![add("fiona@gallagher.net", "2")],
            )
            .await;

        assert!(matches!(
            result,
            Err(EventStoreError::DuplicateUniqueValue { ref email_address })
                if email_address == "fiona@gallagher.net"
        ));
        assert_eq!(store.event_count().await, 1);
        assert_eq!(
            store.unique_email_owner("fiona@gallagher.net").await.as_deref(),
            Some("1")
        );
    }

    #[tokio::test]
    async fn conflicting_events_roll_back_assertions() {
        let store = InMemoryEventStore::new();
        let id = stream("1");

        store
            .append(
                vec![create_test_event(&id, 1, "CustomerRegistered")],
                vec![add("a@example.com", "1")],
            )
            .await
            .unwrap();

        let result = store
            .append(
                vec![create_test_event(&id, 1, "CustomerEmailAddressChanged")],
                vec![UniqueEmailAssertion::Replace {
                    previous: "a@example.com".to_string(),
                    new: "b@example.com".to_string(),
                }],
            )
            .await;

        assert!(matches!(
            result,
            Err(EventStoreError::ConcurrencyConflict { .. })
        ));
        assert_eq!(
            store.unique_email_owner("a@example.com").await.as_deref(),
            Some("1")
        );
        assert!(store.unique_email_owner("b@example.com").await.is_none());
    }

    #[tokio::test]
    async fn replace_and_remove_update_index() {
        let store = InMemoryEventStore::new();
        let id = stream("1");

        store
            .append(
                vec![create_test_event(&id, 1, "CustomerRegistered")],
                vec![add("a@example.com", "1")],
            )
            .await
            .unwrap();
        store
            .append(
                vec![create_test_event(&id, 2, "CustomerEmailAddressChanged")],
                vec![UniqueEmailAssertion::Replace {
                    previous: "a@example.com".to_string(),
                    new: "b@example.com".to_string(),
                }],
            )
            .await
            .unwrap();

        assert!(store.unique_email_owner("a@example.com").await.is_none());
        assert_eq!(
            store.unique_email_owner("b@example.com").await.as_deref(),
            Some("1")
        );

        store
            .append(
                vec![create_test_event(&id, 3, "CustomerDeleted")],
                vec![UniqueEmailAssertion::Remove {
                    email_address: "b@example.com".to_string(),
                }],
            )
            .await
            .unwrap();

        assert!(store.unique_email_owner("b@example.com").await.is_none());
    }

    #[tokio::test]
    async fn replace_of_missing_entry_fails() {
        let store = InMemoryEventStore::new();
        let id = stream("1");

        let result = store
            .append(
                vec![create_test_event(&id, 1, "CustomerEmailAddressChanged")],
                vec![UniqueEmailAssertion::Replace {
                    previous: "gone@example.com".to_string(),
                    new: "new@example.com".to_string(),
                }],
            )
            .await;

        assert!(matches!(
            result,
            Err(EventStoreError::UniqueValueMissing { .. })
        ));
        assert_eq!(store.event_count().await, 0);
    }

    #[tokio::test]
    async fn stale_replace_at_taken_version_is_a_conflict() {
        let store = InMemoryEventStore::new();
        let id = stream("1");
        let replace = |previous: &str, new: &str| UniqueEmailAssertion::Replace {
            previous: previous.to_string(),
            new: new.to_string(),
        };

        store
            .append(
                vec![create_test_event(&id, 1, "CustomerRegistered")],
                vec![add("a@example.com", "1")],
            )
            .await
            .unwrap();
        store
            .append(
                vec![create_test_event(&id, 2, "CustomerEmailAddressChanged")],
                vec![replace("a@example.com", "b@example.com")],
            )
            .await
            .unwrap();

        // previous address is no longer indexed
        let moved_elsewhere = store
            .append(
                vec![create_test_event(&id, 2, "CustomerEmailAddressChanged")],
                vec![replace("a@example.com", "c@example.com")],
            )
            .await;
        // target address is already held by this customer
        let moved_to_same = store
            .append(
                vec![create_test_event(&id, 2, "CustomerEmailAddressChanged")],
                vec![replace("a@example.com", "b@example.com")],
            )
            .await;

        for result in [moved_elsewhere, moved_to_same] {
            assert!(matches!(
                result,
                Err(EventStoreError::ConcurrencyConflict { version, .. }) if version == Version::new(2)
            ));
        }
        assert_eq!(store.event_count().await, 2);
        assert_eq!(
            store.unique_email_owner("b@example.com").await.as_deref(),
            Some("1")
        );
        assert!(store.unique_email_owner("c@example.com").await.is_none());
    }

    #[tokio::test]
    async fn purge_removes_stream_and_owned_index_entries() {
        let store = InMemoryEventStore::new();
        let first = stream("1");
        let second = stream("2");

        store
            .append(
                vec![create_test_event(&first, 1, "CustomerRegistered")],
                vec![add("a@example.com", "1")],
            )
            .await
            .unwrap();
        store
            .append(
                vec![create_test_event(&second, 1, "CustomerRegistered")],
                vec![add("b@example.com", "2")],
            )
            .await
            .unwrap();

        store.purge_stream(&first, "1").await.unwrap();

        assert!(
            store
                .load_stream(&first, Version::first(), usize::MAX)
                .await
                .unwrap()
                .is_empty()
        );
        assert!(store.unique_email_owner("a@example.com").await.is_none());
        assert_eq!(
            store.unique_email_owner("b@example.com").await.as_deref(),
            Some("2")
        );
        assert_eq!(store.event_count().await, 1);
    }

    #[tokio::test]
    async fn invalid_batch_is_rejected() {
        let store = InMemoryEventStore::new();
        let result = store.append(vec![], vec![]).await;
        assert!(matches!(result, Err(EventStoreError::InvalidAppend(_))));
    }
}

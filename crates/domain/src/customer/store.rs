//! Customer-facing adapter over the generic event store.

use event_store::{EventStore, EventStoreError, EventStoreExt, StoredEvent};

use crate::error::DomainError;

use super::{
    CustomerEvent, CustomerId, build_unique_email_assertions, from_stored_event, to_stored_event,
};

/// Reads and writes customer event streams.
///
/// Translates between domain events and storage rows, derives the email
/// uniqueness assertions for each append, and maps store failures onto
/// the domain error kinds.
#[derive(Clone)]
pub struct CustomerEventStore<S: EventStore> {
    store: S,
}

impl<S: EventStore> CustomerEventStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying event store.
    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Loads the full event stream of a customer.
    ///
    /// Fails with `NotFound` when the stream is empty.
    pub async fn retrieve_event_stream(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Vec<CustomerEvent>, DomainError> {
        let stored = self
            .store
            .load_full_stream(&customer_id.stream_id())
            .await
            .map_err(DomainError::from)?;

        if stored.is_empty() {
            return Err(DomainError::NotFound(format!("customer {customer_id}")));
        }

        stored.iter().map(from_stored_event).collect()
    }

    /// Writes the first events of a new customer stream.
    ///
    /// Any version collision here means another stream already uses this
    /// customer id, so it is reported as `Duplicate`.
    pub async fn start_event_stream(
        &self,
        recorded_events: &[CustomerEvent],
    ) -> Result<(), DomainError> {
        let rows = to_rows(recorded_events)?;
        self.append(rows, recorded_events).await.map_err(|e| match e {
            EventStoreError::ConcurrencyConflict { .. } => DomainError::Duplicate(e.to_string()),
            other => other.into(),
        })
    }

    /// Appends events to an existing customer stream.
    ///
    /// A version collision is reported as `ConcurrencyConflict`.
    pub async fn append_to_event_stream(
        &self,
        recorded_events: &[CustomerEvent],
    ) -> Result<(), DomainError> {
        let rows = to_rows(recorded_events)?;
        self.append(rows, recorded_events)
            .await
            .map_err(DomainError::from)
    }

    /// Deletes a customer's stream and releases its email address.
    pub async fn purge_event_stream(&self, customer_id: &CustomerId) -> Result<(), DomainError> {
        self.store
            .purge_stream(&customer_id.stream_id(), customer_id.as_str())
            .await
            .map_err(DomainError::from)
    }

    async fn append(
        &self,
        rows: Vec<StoredEvent>,
        recorded_events: &[CustomerEvent],
    ) -> Result<(), EventStoreError> {
        let assertions = build_unique_email_assertions(recorded_events);

        self.store.append(rows, assertions).await?;
        metrics::counter!("event_store_events_appended_total")
            .increment(recorded_events.len() as u64);

        Ok(())
    }
}

fn to_rows(recorded_events: &[CustomerEvent]) -> Result<Vec<StoredEvent>, DomainError> {
    recorded_events.iter().map(to_stored_event).collect()
}

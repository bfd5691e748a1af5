//! Query handler for customer views.

use domain::{CustomerEventStore, CustomerId, DomainError, EventSourced};
use event_store::EventStore;

use crate::views::CustomerView;

/// Answers queries by folding the customer's event stream on demand.
pub struct CustomerQueryHandler<S: EventStore> {
    event_store: CustomerEventStore<S>,
}

impl<S: EventStore> CustomerQueryHandler<S> {
    /// Creates a new query handler with the given event store.
    pub fn new(store: S) -> Self {
        Self {
            event_store: CustomerEventStore::new(store),
        }
    }

    /// Returns the current view of a customer.
    ///
    /// Fails with `InputInvalid` for an empty id and with `NotFound` when the
    /// customer never existed or has been deleted.
    #[tracing::instrument(skip(self))]
    pub async fn customer_view_by_id(&self, customer_id: &str) -> Result<CustomerView, DomainError> {
        let result = self.load_view(customer_id).await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(e) => e.kind().as_str(),
        };
        metrics::counter!("customer_queries_total", "outcome" => outcome).increment(1);

        result.map_err(|e| e.context("CustomerViewByID"))
    }

    async fn load_view(&self, customer_id: &str) -> Result<CustomerView, DomainError> {
        let customer_id = CustomerId::build(customer_id)?;
        let stream = self.event_store.retrieve_event_stream(&customer_id).await?;

        match CustomerView::replay(&stream) {
            Some(view) if !view.is_deleted() => Ok(view),
            _ => Err(DomainError::NotFound(format!("customer {customer_id}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{CustomerCommandHandler, ErrorKind};
    use event_store::InMemoryEventStore;

    #[tokio::test]
    async fn test_empty_id_is_invalid() {
        let queries = CustomerQueryHandler::new(InMemoryEventStore::new());

        let err = queries.customer_view_by_id("").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputInvalid);
    }

    #[tokio::test]
    async fn test_unknown_customer_is_not_found() {
        let queries = CustomerQueryHandler::new(InMemoryEventStore::new());

        let err = queries.customer_view_by_id("nobody").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("CustomerViewByID"));
    }

    #[tokio::test]
    async fn test_view_of_registered_customer() {
        let store = InMemoryEventStore::new();
        let commands = CustomerCommandHandler::new(store.clone());
        let queries = CustomerQueryHandler::new(store);

        let id = commands
            .register_customer("fiona@gallagher.net", "Fiona", "Gallagher")
            .await
            .unwrap();
        let view = queries.customer_view_by_id(id.as_str()).await.unwrap();

        assert_eq!(view.id, id.to_string());
        assert_eq!(view.version, 1);
    }

    #[tokio::test]
    async fn test_deleted_customer_is_not_found() {
        let store = InMemoryEventStore::new();
        let commands = CustomerCommandHandler::new(store.clone());
        let queries = CustomerQueryHandler::new(store);

        let id = commands
            .register_customer("fiona@gallagher.net", "Fiona", "Gallagher")
            .await
            .unwrap();
        commands.delete_customer(id.as_str()).await.unwrap();

        let err = queries.customer_view_by_id(id.as_str()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}

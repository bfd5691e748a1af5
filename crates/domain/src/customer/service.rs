//! Command handler for customer operations.

use event_store::EventStore;

use crate::command::{Command, MAX_RETRIES, execute_with_retry};
use crate::error::DomainError;
use crate::event::DomainEvent;

use super::{
    ChangeCustomerEmailAddress, ChangeCustomerName, ConfirmCustomerEmailAddress, CustomerEvent,
    CustomerEventStore, CustomerId, DeleteCustomer, RegisterCustomer, aggregate,
};

type Evaluator<C> = fn(&[CustomerEvent], &C) -> Result<Vec<CustomerEvent>, DomainError>;

/// Handles customer commands.
///
/// Every method builds a command from raw input, then runs
/// load, evaluate and append under the retry policy. The handler keeps no
/// state between calls and can be shared freely.
pub struct CustomerCommandHandler<S: EventStore> {
    event_store: CustomerEventStore<S>,
    max_attempts: usize,
}

impl<S: EventStore> CustomerCommandHandler<S> {
    /// Creates a new command handler with the given event store.
    pub fn new(store: S) -> Self {
        Self {
            event_store: CustomerEventStore::new(store),
            max_attempts: MAX_RETRIES,
        }
    }

    /// Overrides the number of attempts made on concurrency conflicts.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Returns a reference to the customer event store.
    pub fn event_store(&self) -> &CustomerEventStore<S> {
        &self.event_store
    }

    /// Registers a new customer and returns its generated ID.
    #[tracing::instrument(skip(self, email_address, given_name, family_name))]
    pub async fn register_customer(
        &self,
        email_address: &str,
        given_name: &str,
        family_name: &str,
    ) -> Result<CustomerId, DomainError> {
        let result = match RegisterCustomer::build(email_address, given_name, family_name) {
            Ok(command) => {
                let command = &command;
                execute_with_retry(RegisterCustomer::NAME, self.max_attempts, move || {
                    self.start(command)
                })
                .await
                .map(|()| command.customer_id.clone())
            }
            Err(e) => Err(e),
        };

        finish(RegisterCustomer::NAME, result)
    }

    /// Confirms a customer's email address.
    ///
    /// A wrong hash is still recorded in the stream and then reported as
    /// `ConstraintsViolation`.
    #[tracing::instrument(skip(self, confirmation_hash))]
    pub async fn confirm_customer_email_address(
        &self,
        customer_id: &str,
        confirmation_hash: &str,
    ) -> Result<(), DomainError> {
        let command = ConfirmCustomerEmailAddress::build(customer_id, confirmation_hash);
        self.handle(command, aggregate::confirm_email_address).await
    }

    /// Changes a customer's email address; the new address is unconfirmed.
    #[tracing::instrument(skip(self, email_address))]
    pub async fn change_customer_email_address(
        &self,
        customer_id: &str,
        email_address: &str,
    ) -> Result<(), DomainError> {
        let command = ChangeCustomerEmailAddress::build(customer_id, email_address);
        self.handle(command, aggregate::change_email_address).await
    }

    #[tracing::instrument(skip(self, given_name, family_name))]
    pub async fn change_customer_name(
        &self,
        customer_id: &str,
        given_name: &str,
        family_name: &str,
    ) -> Result<(), DomainError> {
        let command = ChangeCustomerName::build(customer_id, given_name, family_name);
        self.handle(command, aggregate::change_name).await
    }

    /// Deletes a customer and releases its email address.
    #[tracing::instrument(skip(self))]
    pub async fn delete_customer(&self, customer_id: &str) -> Result<(), DomainError> {
        let command = DeleteCustomer::build(customer_id);
        self.handle(command, aggregate::delete).await
    }

    async fn handle<C: Command>(
        &self,
        command: Result<C, DomainError>,
        evaluate: Evaluator<C>,
    ) -> Result<(), DomainError> {
        let result = match command {
            Ok(command) => {
                let command = &command;
                execute_with_retry(C::NAME, self.max_attempts, move || {
                    self.attempt(command, evaluate)
                })
                .await
            }
            Err(e) => Err(e),
        };

        finish(C::NAME, result)
    }

    async fn start(&self, command: &RegisterCustomer) -> Result<(), DomainError> {
        let recorded = vec![aggregate::register(command)];
        self.event_store.start_event_stream(&recorded).await
    }

    async fn attempt<C: Command>(
        &self,
        command: &C,
        evaluate: Evaluator<C>,
    ) -> Result<(), DomainError> {
        let stream = self
            .event_store
            .retrieve_event_stream(command.customer_id())
            .await?;

        let recorded = evaluate(&stream, command)?;
        if recorded.is_empty() {
            return Ok(());
        }

        self.event_store.append_to_event_stream(&recorded).await?;

        // failure events are committed first, then reported
        match recorded.iter().find_map(|event| event.failure_reason()) {
            Some(reason) => Err(DomainError::ConstraintsViolation(reason.to_string())),
            None => Ok(()),
        }
    }
}

fn finish<T>(command_name: &'static str, result: Result<T, DomainError>) -> Result<T, DomainError> {
    let outcome = match &result {
        Ok(_) => "success",
        Err(e) => e.kind().as_str(),
    };
    metrics::counter!("customer_commands_total", "command" => command_name, "outcome" => outcome)
        .increment(1);

    result.map_err(|e| e.context(command_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::EventSourced;
    use crate::customer::CurrentState;
    use crate::error::ErrorKind;
    use event_store::{InMemoryEventStore, Version};

    async fn registered(
        handler: &CustomerCommandHandler<InMemoryEventStore>,
        email: &str,
    ) -> CustomerId {
        handler
            .register_customer(email, "Fiona", "Gallagher")
            .await
            .unwrap()
    }

    async fn state(
        handler: &CustomerCommandHandler<InMemoryEventStore>,
        id: &CustomerId,
    ) -> CurrentState {
        let stream = handler.event_store().retrieve_event_stream(id).await.unwrap();
        CurrentState::replay(&stream).unwrap()
    }

    #[tokio::test]
    async fn test_register_persists_first_event() {
        let handler = CustomerCommandHandler::new(InMemoryEventStore::new());
        let id = registered(&handler, "fiona@gallagher.net").await;

        let state = state(&handler, &id).await;
        assert_eq!(state.version(), Version::first());
        assert_eq!(state.email_address.as_str(), "fiona@gallagher.net");
    }

    #[tokio::test]
    async fn test_invalid_input_is_rejected_before_loading() {
        let store = InMemoryEventStore::new();
        let handler = CustomerCommandHandler::new(store.clone());

        let err = handler
            .register_customer("not-an-email", "Fiona", "Gallagher")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputInvalid);
        assert!(err.to_string().contains("RegisterCustomer"));

        let err = handler.change_customer_name("", "Fiona", "Gallagher").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputInvalid);

        assert_eq!(store.event_count().await, 0);
    }

    #[tokio::test]
    async fn test_unknown_customer_is_not_found() {
        let handler = CustomerCommandHandler::new(InMemoryEventStore::new());

        let err = handler
            .change_customer_name("missing", "Fiona", "Lishman")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("ChangeCustomerName"));
    }

    #[tokio::test]
    async fn test_no_op_command_appends_nothing() {
        let store = InMemoryEventStore::new();
        let handler = CustomerCommandHandler::new(store.clone());
        let id = registered(&handler, "fiona@gallagher.net").await;

        handler
            .change_customer_name(id.as_str(), "Fiona", "Gallagher")
            .await
            .unwrap();

        assert_eq!(store.event_count().await, 1);
    }

    #[tokio::test]
    async fn test_wrong_hash_is_recorded_and_reported() {
        let store = InMemoryEventStore::new();
        let handler = CustomerCommandHandler::new(store.clone());
        let id = registered(&handler, "fiona@gallagher.net").await;

        let err = handler
            .confirm_customer_email_address(id.as_str(), "invalid_confirmation_hash")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ConstraintsViolation);
        assert!(err.to_string().contains("wrong confirmation hash supplied"));
        assert_eq!(store.event_count().await, 2);
        assert!(!state(&handler, &id).await.is_email_address_confirmed);
    }

    #[tokio::test]
    async fn test_change_email_moves_index_entry() {
        let store = InMemoryEventStore::new();
        let handler = CustomerCommandHandler::new(store.clone());
        let id = registered(&handler, "veronica@fisher.net").await;

        handler
            .change_customer_email_address(id.as_str(), "veronica@pratt.net")
            .await
            .unwrap();

        assert!(store.unique_email_owner("veronica@fisher.net").await.is_none());
        assert_eq!(
            store.unique_email_owner("veronica@pratt.net").await,
            Some(id.to_string())
        );
    }

    #[tokio::test]
    async fn test_delete_releases_email() {
        let store = InMemoryEventStore::new();
        let handler = CustomerCommandHandler::new(store.clone());
        let id = registered(&handler, "fiona@gallagher.net").await;

        handler.delete_customer(id.as_str()).await.unwrap();

        assert!(store.unique_email_owner("fiona@gallagher.net").await.is_none());
        assert!(state(&handler, &id).await.is_deleted);
    }

    mod spans {
        use super::*;
        use std::sync::{Arc, Mutex};
        use tracing::field::{Field, Visit};
        use tracing::span::{Attributes, Id};
        use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

        /// Collects the names of every field recorded on new spans.
        #[derive(Clone, Default)]
        struct SpanFields(Arc<Mutex<Vec<String>>>);

        impl Visit for SpanFields {
            fn record_debug(&mut self, field: &Field, _value: &dyn std::fmt::Debug) {
                self.0.lock().unwrap().push(field.name().to_string());
            }
        }

        impl<S: tracing::Subscriber> Layer<S> for SpanFields {
            fn on_new_span(&self, attrs: &Attributes<'_>, _id: &Id, _ctx: Context<'_, S>) {
                attrs.record(&mut self.clone());
            }
        }

        #[tokio::test]
        async fn test_spans_record_only_the_customer_id() {
            let fields = SpanFields::default();
            let _guard = tracing::subscriber::set_default(
                tracing_subscriber::registry().with(fields.clone()),
            );

            let handler = CustomerCommandHandler::new(InMemoryEventStore::new());
            let id = registered(&handler, "fiona@gallagher.net").await;
            handler
                .change_customer_name(id.as_str(), "Fiona", "Lishman")
                .await
                .unwrap();
            handler
                .change_customer_email_address(id.as_str(), "fiona@lishman.net")
                .await
                .unwrap();
            let _ = handler
                .confirm_customer_email_address(id.as_str(), "wrong")
                .await;

            let recorded = fields.0.lock().unwrap().clone();
            assert!(recorded.iter().any(|name| name == "customer_id"));
            for personal in ["email_address", "given_name", "family_name", "confirmation_hash"] {
                assert!(
                    !recorded.iter().any(|name| name == personal),
                    "{personal} recorded on a span"
                );
            }
        }
    }
}

//! Current state of a customer, rebuilt from its event stream.

use event_store::Version;

use crate::aggregate::EventSourced;
use crate::event::DomainEvent;

use super::{ConfirmationHash, CustomerEvent, CustomerId, EmailAddress, PersonName};

/// Transient customer state used by the command evaluators.
///
/// State transitions:
/// ```text
///            Register
///   ∅ ──────────────────▶ Unconfirmed ◀──┐
///                             │          │ ChangeEmailAddress
///        ConfirmEmailAddress  ▼          │
///                          Confirmed ────┘
///
///   any live state ── Delete ──▶ Deleted
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentState {
    pub id: CustomerId,
    pub person_name: PersonName,
    pub email_address: EmailAddress,
    pub email_address_confirmation_hash: ConfirmationHash,
    pub is_email_address_confirmed: bool,
    pub is_deleted: bool,
    pub current_stream_version: Version,
}

impl EventSourced for CurrentState {
    type Event = CustomerEvent;

    fn init(event: &CustomerEvent) -> Option<Self> {
        match event {
            CustomerEvent::Registered(e) => Some(Self {
                id: e.customer_id.clone(),
                person_name: e.person_name.clone(),
                email_address: e.email_address.clone(),
                email_address_confirmation_hash: e.confirmation_hash.clone(),
                is_email_address_confirmed: false,
                is_deleted: false,
                current_stream_version: e.meta.stream_version(),
            }),
            _ => None,
        }
    }

    fn apply(&mut self, event: &CustomerEvent) {
        match event {
            CustomerEvent::Registered(e) => {
                self.id = e.customer_id.clone();
                self.person_name = e.person_name.clone();
                self.email_address = e.email_address.clone();
                self.email_address_confirmation_hash = e.confirmation_hash.clone();
            }
            CustomerEvent::EmailAddressConfirmed(_) => {
                self.is_email_address_confirmed = true;
            }
            CustomerEvent::EmailAddressConfirmationFailed(_) => {}
            CustomerEvent::EmailAddressChanged(e) => {
                self.email_address = e.email_address.clone();
                self.email_address_confirmation_hash = e.confirmation_hash.clone();
                self.is_email_address_confirmed = false;
            }
            CustomerEvent::NameChanged(e) => {
                self.person_name = e.person_name.clone();
            }
            CustomerEvent::Deleted(_) => {
                self.is_deleted = true;
            }
        }

        self.current_stream_version = event.meta().stream_version();
    }

    fn version(&self) -> Version {
        self.current_stream_version
    }
}

impl CurrentState {
    /// Returns the version the next recorded event must carry.
    pub fn next_version(&self) -> Version {
        self.current_stream_version.next()
    }
}

//! Customer read model.

use domain::{CustomerEvent, DomainEvent, EventSourced};
use event_store::Version;
use serde::Serialize;

/// What a caller sees of a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerView {
    pub id: String,
    pub email_address: String,
    pub is_email_address_confirmed: bool,
    pub given_name: String,
    pub family_name: String,
    /// Version of the last event folded into the view.
    pub version: i64,
    #[serde(skip)]
    is_deleted: bool,
}

impl CustomerView {
    /// Returns true once a `CustomerDeleted` event has been folded in.
    pub fn is_deleted(&self) -> bool {
        self.is_deleted
    }
}

impl EventSourced for CustomerView {
    type Event = CustomerEvent;

    fn init(event: &CustomerEvent) -> Option<Self> {
        match event {
            CustomerEvent::Registered(e) => Some(Self {
                id: e.customer_id.to_string(),
                email_address: e.email_address.to_string(),
                is_email_address_confirmed: false,
                given_name: e.person_name.given_name().to_string(),
                family_name: e.person_name.family_name().to_string(),
                version: e.meta.stream_version().as_i64(),
                is_deleted: false,
            }),
            _ => None,
        }
    }

    fn apply(&mut self, event: &CustomerEvent) {
        match event {
            CustomerEvent::Registered(_) | CustomerEvent::EmailAddressConfirmationFailed(_) => {}
            CustomerEvent::EmailAddressConfirmed(_) => {
                self.is_email_address_confirmed = true;
            }
            CustomerEvent::EmailAddressChanged(e) => {
                self.email_address = e.email_address.to_string();
                self.is_email_address_confirmed = false;
            }
            CustomerEvent::NameChanged(e) => {
                self.given_name = e.person_name.given_name().to_string();
                self.family_name = e.person_name.family_name().to_string();
            }
            CustomerEvent::Deleted(_) => {
                self.is_deleted = true;
            }
        }

        self.version = event.meta().stream_version().as_i64();
    }

    fn version(&self) -> Version {
        Version::new(self.version)
    }
}

//! Email uniqueness intents derived from recorded events.

use event_store::UniqueEmailAssertion;

use super::CustomerEvent;

/// Derives the uniqueness index operations implied by `events`, in order.
pub fn build_unique_email_assertions(events: &[CustomerEvent]) -> Vec<UniqueEmailAssertion> {
    events
        .iter()
        .filter_map(|event| match event {
            CustomerEvent::Registered(e) => Some(UniqueEmailAssertion::Add {
                email_address: e.email_address.to_string(),
                customer_id: e.customer_id.to_string(),
            }),
            CustomerEvent::EmailAddressChanged(e) => Some(UniqueEmailAssertion::Replace {
                previous: e.previous_email_address.to_string(),
                new: e.email_address.to_string(),
            }),
            CustomerEvent::Deleted(e) => Some(UniqueEmailAssertion::Remove {
                email_address: e.email_address.to_string(),
            }),
            _ => None,
        })
        .collect()
}

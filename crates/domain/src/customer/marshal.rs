//! JSON payloads of customer events.
//!
//! Each payload carries the event's value objects as plain strings plus a
//! `meta: {eventName, occurredAt}` object. The stream version lives in its
//! own storage column and is supplied back on unmarshaling.

use event_store::{StoredEvent, Version};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

use crate::error::DomainError;
use crate::event::{DomainEvent, EventMeta};

use super::{
    ConfirmationHash, CustomerDeleted, CustomerEmailAddressChanged,
    CustomerEmailAddressConfirmationFailed, CustomerEmailAddressConfirmed, CustomerEvent,
    CustomerId, CustomerNameChanged, CustomerRegistered, EmailAddress, PersonName,
};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetaPayload {
    event_name: String,
    occurred_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisteredPayload {
    #[serde(rename = "customerID")]
    customer_id: String,
    email_address: String,
    confirmation_hash: String,
    person_given_name: String,
    person_family_name: String,
    meta: MetaPayload,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmailAddressConfirmedPayload {
    #[serde(rename = "customerID")]
    customer_id: String,
    email_address: String,
    meta: MetaPayload,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmailAddressConfirmationFailedPayload {
    #[serde(rename = "customerID")]
    customer_id: String,
    email_address: String,
    confirmation_hash: String,
    reason: String,
    meta: MetaPayload,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmailAddressChangedPayload {
    #[serde(rename = "customerID")]
    customer_id: String,
    email_address: String,
    confirmation_hash: String,
    previous_email_address: String,
    meta: MetaPayload,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NameChangedPayload {
    #[serde(rename = "customerID")]
    customer_id: String,
    person_given_name: String,
    person_family_name: String,
    meta: MetaPayload,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeletedPayload {
    #[serde(rename = "customerID")]
    customer_id: String,
    email_address: String,
    meta: MetaPayload,
}

fn meta_payload(meta: &EventMeta) -> MetaPayload {
    MetaPayload {
        event_name: meta.event_name().to_string(),
        occurred_at: meta.occurred_at().to_string(),
    }
}

fn rebuild_meta(event_name: &str, meta: MetaPayload, stream_version: Version) -> EventMeta {
    EventMeta::rebuild(event_name, meta.occurred_at, stream_version)
}

fn to_json<T: Serialize>(event_name: &str, payload: &T) -> Result<Vec<u8>, DomainError> {
    serde_json::to_vec(payload)
        .map_err(|e| DomainError::MarshalingFailed(format!("{event_name}: {e}")))
}

fn from_json<T: DeserializeOwned>(event_name: &str, payload: &[u8]) -> Result<T, DomainError> {
    serde_json::from_slice(payload)
        .map_err(|e| DomainError::UnmarshalingFailed(format!("{event_name}: {e}")))
}

/// Serializes a customer event to its JSON payload.
pub fn marshal_customer_event(event: &CustomerEvent) -> Result<Vec<u8>, DomainError> {
    let name = event.event_type();

    match event {
        CustomerEvent::Registered(e) => to_json(
            name,
            &RegisteredPayload {
                customer_id: e.customer_id.to_string(),
                email_address: e.email_address.to_string(),
                confirmation_hash: e.confirmation_hash.to_string(),
                person_given_name: e.person_name.given_name().to_string(),
                person_family_name: e.person_name.family_name().to_string(),
                meta: meta_payload(&e.meta),
            },
        ),
        CustomerEvent::EmailAddressConfirmed(e) => to_json(
            name,
            &EmailAddressConfirmedPayload {
                customer_id: e.customer_id.to_string(),
                email_address: e.email_address.to_string(),
                meta: meta_payload(&e.meta),
            },
        ),
        CustomerEvent::EmailAddressConfirmationFailed(e) => to_json(
            name,
            &EmailAddressConfirmationFailedPayload {
                customer_id: e.customer_id.to_string(),
                email_address: e.email_address.to_string(),
                confirmation_hash: e.confirmation_hash.to_string(),
                reason: e.reason.clone(),
                meta: meta_payload(&e.meta),
            },
        ),
        CustomerEvent::EmailAddressChanged(e) => to_json(
            name,
            &EmailAddressChangedPayload {
                customer_id: e.customer_id.to_string(),
                email_address: e.email_address.to_string(),
                confirmation_hash: e.confirmation_hash.to_string(),
                previous_email_address: e.previous_email_address.to_string(),
                meta: meta_payload(&e.meta),
            },
        ),
        CustomerEvent::NameChanged(e) => to_json(
            name,
            &NameChangedPayload {
                customer_id: e.customer_id.to_string(),
                person_given_name: e.person_name.given_name().to_string(),
                person_family_name: e.person_name.family_name().to_string(),
                meta: meta_payload(&e.meta),
            },
        ),
        CustomerEvent::Deleted(e) => to_json(
            name,
            &DeletedPayload {
                customer_id: e.customer_id.to_string(),
                email_address: e.email_address.to_string(),
                meta: meta_payload(&e.meta),
            },
        ),
    }
}

/// Deserializes a customer event from its name, JSON payload and the stream
/// version read from storage.
pub fn unmarshal_customer_event(
    event_name: &str,
    payload: &[u8],
    stream_version: Version,
) -> Result<CustomerEvent, DomainError> {
    let event = match event_name {
        CustomerRegistered::NAME => {
            let p: RegisteredPayload = from_json(event_name, payload)?;
            CustomerEvent::Registered(CustomerRegistered {
                customer_id: CustomerId::rebuild(p.customer_id),
                email_address: EmailAddress::rebuild(p.email_address),
                confirmation_hash: ConfirmationHash::rebuild(p.confirmation_hash),
                person_name: PersonName::rebuild(p.person_given_name, p.person_family_name),
                meta: rebuild_meta(event_name, p.meta, stream_version),
            })
        }
        CustomerEmailAddressConfirmed::NAME => {
            let p: EmailAddressConfirmedPayload = from_json(event_name, payload)?;
            CustomerEvent::EmailAddressConfirmed(CustomerEmailAddressConfirmed {
                customer_id: CustomerId::rebuild(p.customer_id),
                email_address: EmailAddress::rebuild(p.email_address),
                meta: rebuild_meta(event_name, p.meta, stream_version),
            })
        }
        CustomerEmailAddressConfirmationFailed::NAME => {
            let p: EmailAddressConfirmationFailedPayload = from_json(event_name, payload)?;
            CustomerEvent::EmailAddressConfirmationFailed(CustomerEmailAddressConfirmationFailed {
                customer_id: CustomerId::rebuild(p.customer_id),
                email_address: EmailAddress::rebuild(p.email_address),
                confirmation_hash: ConfirmationHash::rebuild(p.confirmation_hash),
                reason: p.reason,
                meta: rebuild_meta(event_name, p.meta, stream_version),
            })
        }
        CustomerEmailAddressChanged::NAME => {
            let p: EmailAddressChangedPayload = from_json(event_name, payload)?;
            CustomerEvent::EmailAddressChanged(CustomerEmailAddressChanged {
                customer_id: CustomerId::rebuild(p.customer_id),
                email_address: EmailAddress::rebuild(p.email_address),
                confirmation_hash: ConfirmationHash::rebuild(p.confirmation_hash),
                previous_email_address: EmailAddress::rebuild(p.previous_email_address),
                meta: rebuild_meta(event_name, p.meta, stream_version),
            })
        }
        CustomerNameChanged::NAME => {
            let p: NameChangedPayload = from_json(event_name, payload)?;
            CustomerEvent::NameChanged(CustomerNameChanged {
                customer_id: CustomerId::rebuild(p.customer_id),
                person_name: PersonName::rebuild(p.person_given_name, p.person_family_name),
                meta: rebuild_meta(event_name, p.meta, stream_version),
            })
        }
        CustomerDeleted::NAME => {
            let p: DeletedPayload = from_json(event_name, payload)?;
            CustomerEvent::Deleted(CustomerDeleted {
                customer_id: CustomerId::rebuild(p.customer_id),
                email_address: EmailAddress::rebuild(p.email_address),
                meta: rebuild_meta(event_name, p.meta, stream_version),
            })
        }
        unknown => {
            return Err(DomainError::UnmarshalingFailed(format!(
                "unknown event name: {unknown}"
            )));
        }
    };

    Ok(event)
}

/// Converts a recorded event into a storage row.
pub fn to_stored_event(event: &CustomerEvent) -> Result<StoredEvent, DomainError> {
    let meta = event.meta();
    Ok(StoredEvent::new(
        event.customer_id().stream_id(),
        meta.stream_version(),
        meta.event_name(),
        meta.occurred_at(),
        marshal_customer_event(event)?,
    ))
}

/// Converts a storage row back into a customer event.
pub fn from_stored_event(stored: &StoredEvent) -> Result<CustomerEvent, DomainError> {
    unmarshal_customer_event(&stored.event_name, &stored.payload, stored.stream_version)
}

//! Customer domain events.

use event_store::Version;

use crate::event::{DomainEvent, EventMeta};

use super::{ConfirmationHash, CustomerId, EmailAddress, PersonName};

/// Reason recorded when a confirmation attempt supplies the wrong hash.
pub const WRONG_CONFIRMATION_HASH: &str = "wrong confirmation hash supplied";

/// Events that can occur on a customer stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerEvent {
    /// Customer registered; always the first event of a stream.
    Registered(CustomerRegistered),

    /// Email address confirmed with the correct hash.
    EmailAddressConfirmed(CustomerEmailAddressConfirmed),

    /// Confirmation attempted with a wrong hash.
    EmailAddressConfirmationFailed(CustomerEmailAddressConfirmationFailed),

    /// Email address replaced; the new address is unconfirmed.
    EmailAddressChanged(CustomerEmailAddressChanged),

    /// Name replaced.
    NameChanged(CustomerNameChanged),

    /// Customer deleted.
    Deleted(CustomerDeleted),
}

impl DomainEvent for CustomerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CustomerEvent::Registered(_) => CustomerRegistered::NAME,
            CustomerEvent::EmailAddressConfirmed(_) => CustomerEmailAddressConfirmed::NAME,
            CustomerEvent::EmailAddressConfirmationFailed(_) => {
                CustomerEmailAddressConfirmationFailed::NAME
            }
            CustomerEvent::EmailAddressChanged(_) => CustomerEmailAddressChanged::NAME,
            CustomerEvent::NameChanged(_) => CustomerNameChanged::NAME,
            CustomerEvent::Deleted(_) => CustomerDeleted::NAME,
        }
    }

    fn meta(&self) -> &EventMeta {
        match self {
            CustomerEvent::Registered(e) => &e.meta,
            CustomerEvent::EmailAddressConfirmed(e) => &e.meta,
            CustomerEvent::EmailAddressConfirmationFailed(e) => &e.meta,
            CustomerEvent::EmailAddressChanged(e) => &e.meta,
            CustomerEvent::NameChanged(e) => &e.meta,
            CustomerEvent::Deleted(e) => &e.meta,
        }
    }

    fn failure_reason(&self) -> Option<&str> {
        match self {
            CustomerEvent::EmailAddressConfirmationFailed(e) => Some(&e.reason),
            _ => None,
        }
    }
}

impl CustomerEvent {
    /// Returns the ID of the customer the event belongs to.
    pub fn customer_id(&self) -> &CustomerId {
        match self {
            CustomerEvent::Registered(e) => &e.customer_id,
            CustomerEvent::EmailAddressConfirmed(e) => &e.customer_id,
            CustomerEvent::EmailAddressConfirmationFailed(e) => &e.customer_id,
            CustomerEvent::EmailAddressChanged(e) => &e.customer_id,
            CustomerEvent::NameChanged(e) => &e.customer_id,
            CustomerEvent::Deleted(e) => &e.customer_id,
        }
    }

    /// Returns the stream version the event was recorded at.
    pub fn stream_version(&self) -> Version {
        self.meta().stream_version()
    }
}

/// Data for the CustomerRegistered event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerRegistered {
    pub customer_id: CustomerId,
    pub email_address: EmailAddress,
    pub confirmation_hash: ConfirmationHash,
    pub person_name: PersonName,
    pub meta: EventMeta,
}

impl CustomerRegistered {
    pub const NAME: &'static str = "CustomerRegistered";

    pub fn build(
        customer_id: CustomerId,
        email_address: EmailAddress,
        confirmation_hash: ConfirmationHash,
        person_name: PersonName,
        stream_version: Version,
    ) -> Self {
        Self {
            customer_id,
            email_address,
            confirmation_hash,
            person_name,
            meta: EventMeta::build(Self::NAME, stream_version),
        }
    }
}

/// Data for the CustomerEmailAddressConfirmed event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerEmailAddressConfirmed {
    pub customer_id: CustomerId,
    pub email_address: EmailAddress,
    pub meta: EventMeta,
}

impl CustomerEmailAddressConfirmed {
    pub const NAME: &'static str = "CustomerEmailAddressConfirmed";

    pub fn build(
        customer_id: CustomerId,
        email_address: EmailAddress,
        stream_version: Version,
    ) -> Self {
        Self {
            customer_id,
            email_address,
            meta: EventMeta::build(Self::NAME, stream_version),
        }
    }
}

/// Data for the CustomerEmailAddressConfirmationFailed event.
///
/// `confirmation_hash` is the hash the caller supplied, not the expected one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerEmailAddressConfirmationFailed {
    pub customer_id: CustomerId,
    pub email_address: EmailAddress,
    pub confirmation_hash: ConfirmationHash,
    pub reason: String,
    pub meta: EventMeta,
}

impl CustomerEmailAddressConfirmationFailed {
    pub const NAME: &'static str = "CustomerEmailAddressConfirmationFailed";

    pub fn build(
        customer_id: CustomerId,
        email_address: EmailAddress,
        confirmation_hash: ConfirmationHash,
        reason: impl Into<String>,
        stream_version: Version,
    ) -> Self {
        Self {
            customer_id,
            email_address,
            confirmation_hash,
            reason: reason.into(),
            meta: EventMeta::build(Self::NAME, stream_version),
        }
    }
}

/// Data for the CustomerEmailAddressChanged event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerEmailAddressChanged {
    pub customer_id: CustomerId,
    pub email_address: EmailAddress,
    pub confirmation_hash: ConfirmationHash,
    pub previous_email_address: EmailAddress,
    pub meta: EventMeta,
}

impl CustomerEmailAddressChanged {
    pub const NAME: &'static str = "CustomerEmailAddressChanged";

    pub fn build(
        customer_id: CustomerId,
        email_address: EmailAddress,
        confirmation_hash: ConfirmationHash,
        previous_email_address: EmailAddress,
        stream_version: Version,
    ) -> Self {
        Self {
            customer_id,
            email_address,
            confirmation_hash,
            previous_email_address,
            meta: EventMeta::build(Self::NAME, stream_version),
        }
    }
}

/// Data for the CustomerNameChanged event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerNameChanged {
    pub customer_id: CustomerId,
    pub person_name: PersonName,
    pub meta: EventMeta,
}

impl CustomerNameChanged {
    pub const NAME: &'static str = "CustomerNameChanged";

    pub fn build(customer_id: CustomerId, person_name: PersonName, stream_version: Version) -> Self {
        Self {
            customer_id,
            person_name,
            meta: EventMeta::build(Self::NAME, stream_version),
        }
    }
}

/// Data for the CustomerDeleted event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDeleted {
    pub customer_id: CustomerId,
    pub email_address: EmailAddress,
    pub meta: EventMeta,
}

impl CustomerDeleted {
    pub const NAME: &'static str = "CustomerDeleted";

    pub fn build(
        customer_id: CustomerId,
        email_address: EmailAddress,
        stream_version: Version,
    ) -> Self {
        Self {
            customer_id,
            email_address,
            meta: EventMeta::build(Self::NAME, stream_version),
        }
    }
}

impl From<CustomerRegistered> for CustomerEvent {
    fn from(e: CustomerRegistered) -> Self {
        CustomerEvent::Registered(e)
    }
}

impl From<CustomerEmailAddressConfirmed> for CustomerEvent {
    fn from(e: CustomerEmailAddressConfirmed) -> Self {
        CustomerEvent::EmailAddressConfirmed(e)
    }
}

impl From<CustomerEmailAddressConfirmationFailed> for CustomerEvent {
    fn from(e: CustomerEmailAddressConfirmationFailed) -> Self {
        CustomerEvent::EmailAddressConfirmationFailed(e)
    }
}

impl From<CustomerEmailAddressChanged> for CustomerEvent {
    fn from(e: CustomerEmailAddressChanged) -> Self {
        CustomerEvent::EmailAddressChanged(e)
    }
}

impl From<CustomerNameChanged> for CustomerEvent {
    fn from(e: CustomerNameChanged) -> Self {
        CustomerEvent::NameChanged(e)
    }
}

impl From<CustomerDeleted> for CustomerEvent {
    fn from(e: CustomerDeleted) -> Self {
        CustomerEvent::Deleted(e)
    }
}

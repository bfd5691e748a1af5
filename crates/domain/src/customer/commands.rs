//! Customer commands.
//!
//! Every command is built from raw caller input and validated on
//! construction, so a command value is always well-formed.

use crate::command::Command;
use crate::error::DomainError;

use super::{ConfirmationHash, CustomerId, EmailAddress, PersonName};

/// Command to register a new customer.
#[derive(Debug, Clone)]
pub struct RegisterCustomer {
    /// Freshly generated ID of the customer to register.
    pub customer_id: CustomerId,

    pub email_address: EmailAddress,

    /// Freshly generated hash the customer must present to confirm.
    pub confirmation_hash: ConfirmationHash,

    pub person_name: PersonName,
}

impl RegisterCustomer {
    /// Creates a RegisterCustomer command with a new customer ID and
    /// confirmation hash.
    pub fn build(
        email_address: &str,
        given_name: &str,
        family_name: &str,
    ) -> Result<Self, DomainError> {
        let email_address = EmailAddress::build(email_address)?;
        let person_name = PersonName::build(given_name, family_name)?;

        Ok(Self {
            customer_id: CustomerId::generate(),
            confirmation_hash: ConfirmationHash::generate(&email_address),
            email_address,
            person_name,
        })
    }
}

impl Command for RegisterCustomer {
    const NAME: &'static str = "RegisterCustomer";

    fn customer_id(&self) -> &CustomerId {
        &self.customer_id
    }
}

/// Command to confirm a customer's email address.
#[derive(Debug, Clone)]
pub struct ConfirmCustomerEmailAddress {
    pub customer_id: CustomerId,

    /// The hash supplied by the caller.
    pub confirmation_hash: ConfirmationHash,
}

impl ConfirmCustomerEmailAddress {
    pub fn build(customer_id: &str, confirmation_hash: &str) -> Result<Self, DomainError> {
        Ok(Self {
            customer_id: CustomerId::build(customer_id)?,
            confirmation_hash: ConfirmationHash::build(confirmation_hash)?,
        })
    }
}

impl Command for ConfirmCustomerEmailAddress {
    const NAME: &'static str = "ConfirmCustomerEmailAddress";

    fn customer_id(&self) -> &CustomerId {
        &self.customer_id
    }
}

/// Command to change a customer's email address.
#[derive(Debug, Clone)]
pub struct ChangeCustomerEmailAddress {
    pub customer_id: CustomerId,

    pub email_address: EmailAddress,

    /// Freshly generated hash for the new address.
    pub confirmation_hash: ConfirmationHash,
}

impl ChangeCustomerEmailAddress {
    pub fn build(customer_id: &str, email_address: &str) -> Result<Self, DomainError> {
        let customer_id = CustomerId::build(customer_id)?;
        let email_address = EmailAddress::build(email_address)?;

        Ok(Self {
            customer_id,
            confirmation_hash: ConfirmationHash::generate(&email_address),
            email_address,
        })
    }
}

impl Command for ChangeCustomerEmailAddress {
    const NAME: &'static str = "ChangeCustomerEmailAddress";

    fn customer_id(&self) -> &CustomerId {
        &self.customer_id
    }
}

/// Command to change a customer's name.
#[derive(Debug, Clone)]
pub struct ChangeCustomerName {
    pub customer_id: CustomerId,

    pub person_name: PersonName,
}

impl ChangeCustomerName {
    pub fn build(
        customer_id: &str,
        given_name: &str,
        family_name: &str,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            customer_id: CustomerId::build(customer_id)?,
            person_name: PersonName::build(given_name, family_name)?,
        })
    }
}

impl Command for ChangeCustomerName {
    const NAME: &'static str = "ChangeCustomerName";

    fn customer_id(&self) -> &CustomerId {
        &self.customer_id
    }
}

/// Command to delete a customer.
#[derive(Debug, Clone)]
pub struct DeleteCustomer {
    pub customer_id: CustomerId,
}

impl DeleteCustomer {
    pub fn build(customer_id: &str) -> Result<Self, DomainError> {
        Ok(Self {
            customer_id: CustomerId::build(customer_id)?,
        })
    }
}

impl Command for DeleteCustomer {
    const NAME: &'static str = "DeleteCustomer";

    fn customer_id(&self) -> &CustomerId {
        &self.customer_id
    }
}

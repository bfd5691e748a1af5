//! Value objects for the customer domain.
//!
//! Each type has a validating `build` constructor used on input from callers
//! and a non-validating `rebuild` constructor used when reading back from
//! storage.

use common::StreamId;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::DomainError;

/// Unique identifier for a customer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomerId(String);

impl CustomerId {
    /// Creates a new random customer ID.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Creates a customer ID from caller input.
    pub fn build(value: &str) -> Result<Self, DomainError> {
        if value.is_empty() {
            return Err(DomainError::InputInvalid("empty input for CustomerId".to_string()));
        }
        Ok(Self(value.to_string()))
    }

    pub fn rebuild(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the ID of the event stream backing this customer.
    pub fn stream_id(&self) -> StreamId {
        StreamId::new("customer", &self.0)
    }
}

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for CustomerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A syntactically valid email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn build(value: &str) -> Result<Self, DomainError> {
        if value.is_empty() {
            return Err(DomainError::InputInvalid(
                "empty input for EmailAddress".to_string(),
            ));
        }
        if !is_well_formed_email(value) {
            return Err(DomainError::InputInvalid(format!(
                "invalid input for EmailAddress: {value}"
            )));
        }
        Ok(Self(value.to_string()))
    }

    pub fn rebuild(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Matches `^\S+@\S+\.\w{2,}$`.
///
/// Some `@` must have non-whitespace before it, and after it some `.`
/// preceded by at least one character and followed only by two or more
/// word characters up to the end.
fn is_well_formed_email(value: &str) -> bool {
    if value.chars().any(|c| c.is_ascii_whitespace()) {
        return false;
    }

    // word characters never include '.', so the TLD follows the last dot
    let Some(dot) = value.rfind('.') else {
        return false;
    };
    let tld = &value[dot + 1..];
    if tld.len() < 2 || !tld.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return false;
    }

    value[..dot]
        .char_indices()
        .any(|(i, c)| c == '@' && i > 0 && i + 1 < dot)
}

/// A person's given and family name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PersonName {
    given_name: String,
    family_name: String,
}

impl PersonName {
    pub fn build(given_name: &str, family_name: &str) -> Result<Self, DomainError> {
        if given_name.is_empty() {
            return Err(DomainError::InputInvalid(
                "empty input for givenName".to_string(),
            ));
        }
        if family_name.is_empty() {
            return Err(DomainError::InputInvalid(
                "empty input for familyName".to_string(),
            ));
        }
        Ok(Self::rebuild(given_name, family_name))
    }

    pub fn rebuild(given_name: impl Into<String>, family_name: impl Into<String>) -> Self {
        Self {
            given_name: given_name.into(),
            family_name: family_name.into(),
        }
    }

    pub fn given_name(&self) -> &str {
        &self.given_name
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }
}

/// Secret a customer presents to confirm ownership of an email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfirmationHash(String);

impl ConfirmationHash {
    /// Generates a fresh hash for `email_address`.
    ///
    /// A random nonce is mixed in, so two calls for the same address yield
    /// different hashes.
    pub fn generate(email_address: &EmailAddress) -> Self {
        let nonce = Uuid::new_v4();
        let digest = Sha256::new()
            .chain_update(email_address.as_str().as_bytes())
            .chain_update(nonce.as_bytes())
            .finalize();
        Self(format!("{:x}", digest))
    }

    pub fn build(value: &str) -> Result<Self, DomainError> {
        if value.is_empty() {
            return Err(DomainError::InputInvalid(
                "empty input for ConfirmationHash".to_string(),
            ));
        }
        Ok(Self(value.to_string()))
    }

    pub fn rebuild(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConfirmationHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_customer_id_generate_is_unique() {
        let a = CustomerId::generate();
        let b = CustomerId::generate();
        assert_ne!(a, b);
        assert!(!a.as_str().is_empty());
    }

    #[test]
    fn test_customer_id_build_rejects_empty() {
        let err = CustomerId::build("").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputInvalid);
        assert_eq!(CustomerId::build("abc").unwrap().as_str(), "abc");
    }

    #[test]
    fn test_customer_stream_id() {
        let id = CustomerId::rebuild("1234");
        assert_eq!(id.stream_id().as_str(), "customer-1234");
    }

    #[test]
    fn test_valid_email_addresses() {
        for email in [
            "fiona@gallagher.net",
            "a@b.cd",
            "first.last@sub.example.org",
            "x+tag@mail.co_uk",
            "weird@@host.io",
            "a@b.c.de",
        ] {
            assert!(EmailAddress::build(email).is_ok(), "expected valid: {email}");
        }
    }

    #[test]
    fn test_invalid_email_addresses() {
        for email in [
            "",
            "fiona",
            "@gallagher.net",
            "fiona@.net",
            "fiona@gallagher",
            "fiona@gallagher.n",
            "fiona@gallagher.ne-t",
            "fiona gallagher@example.com",
            "fiona@example.com ",
            "fiona@example.",
        ] {
            let result = EmailAddress::build(email);
            assert!(result.is_err(), "expected invalid: {email:?}");
            assert_eq!(result.unwrap_err().kind(), ErrorKind::InputInvalid);
        }
    }

    #[test]
    fn test_email_rebuild_skips_validation() {
        assert_eq!(EmailAddress::rebuild("not an email").as_str(), "not an email");
    }

    #[test]
    fn test_person_name_requires_both_parts() {
        assert!(PersonName::build("Fiona", "Gallagher").is_ok());
        assert_eq!(
            PersonName::build("", "Gallagher").unwrap_err().kind(),
            ErrorKind::InputInvalid
        );
        assert_eq!(
            PersonName::build("Fiona", "").unwrap_err().kind(),
            ErrorKind::InputInvalid
        );
    }

    #[test]
    fn test_person_name_equality_is_structural() {
        assert_eq!(
            PersonName::build("Fiona", "Gallagher").unwrap(),
            PersonName::rebuild("Fiona", "Gallagher")
        );
        assert_ne!(
            PersonName::rebuild("Fiona", "Gallagher"),
            PersonName::rebuild("Fiona", "Lishman")
        );
    }

    #[test]
    fn test_confirmation_hash_generation() {
        let email = EmailAddress::build("fiona@gallagher.net").unwrap();
        let first = ConfirmationHash::generate(&email);
        let second = ConfirmationHash::generate(&email);

        assert_ne!(first, second);
        assert_eq!(first.as_str().len(), 64);
        assert!(first.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_confirmation_hash_build_and_rebuild() {
        assert_eq!(
            ConfirmationHash::build("").unwrap_err().kind(),
            ErrorKind::InputInvalid
        );
        let hash = ConfirmationHash::rebuild("abc123");
        assert_eq!(ConfirmationHash::build("abc123").unwrap(), hash);
    }
}

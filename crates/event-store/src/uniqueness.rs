/// An operation on the `unique_email_addresses` index.
///
/// Assertions are derived from recorded events by the domain layer and
/// applied by the store, in list order, inside the append transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UniqueEmailAssertion {
    /// Reserve an email address for a customer.
    Add {
        email_address: String,
        customer_id: String,
    },

    /// Move a reservation from one email address to another.
    Replace { previous: String, new: String },

    /// Release an email address.
    Remove { email_address: String },
}

impl UniqueEmailAssertion {
    /// Returns the email address whose index row this assertion writes.
    pub fn target_email_address(&self) -> &str {
        match self {
            UniqueEmailAssertion::Add { email_address, .. } => email_address,
            UniqueEmailAssertion::Replace { new, .. } => new,
            UniqueEmailAssertion::Remove { email_address } => email_address,
        }
    }
}

//! Command evaluators for the customer aggregate.
//!
//! Each evaluator is a pure function of the prior event stream and a command.
//! It folds the stream into [`CurrentState`], rejects commands against a
//! deleted customer, and returns the events to record (possibly none).

use event_store::Version;

use crate::aggregate::EventSourced;
use crate::error::DomainError;

use super::{
    ChangeCustomerEmailAddress, ChangeCustomerName, ConfirmCustomerEmailAddress, CurrentState,
    CustomerDeleted, CustomerEmailAddressChanged, CustomerEmailAddressConfirmationFailed,
    CustomerEmailAddressConfirmed, CustomerEvent, CustomerId, CustomerNameChanged, CustomerRegistered,
    DeleteCustomer, RegisterCustomer, WRONG_CONFIRMATION_HASH,
};

/// Records the registration of a new customer at version 1.
pub fn register(command: &RegisterCustomer) -> CustomerEvent {
    CustomerRegistered::build(
        command.customer_id.clone(),
        command.email_address.clone(),
        command.confirmation_hash.clone(),
        command.person_name.clone(),
        Version::first(),
    )
    .into()
}

/// Confirms the email address if the supplied hash matches.
///
/// A wrong hash is recorded as a failure event rather than returned as an
/// error. Confirming an already confirmed address records nothing.
pub fn confirm_email_address(
    stream: &[CustomerEvent],
    command: &ConfirmCustomerEmailAddress,
) -> Result<Vec<CustomerEvent>, DomainError> {
    let state = live_state(stream, &command.customer_id)?;

    if state.email_address_confirmation_hash != command.confirmation_hash {
        return Ok(vec![
            CustomerEmailAddressConfirmationFailed::build(
                command.customer_id.clone(),
                state.email_address.clone(),
                command.confirmation_hash.clone(),
                WRONG_CONFIRMATION_HASH,
                state.next_version(),
            )
            .into(),
        ]);
    }

    if state.is_email_address_confirmed {
        return Ok(vec![]);
    }

    Ok(vec![
        CustomerEmailAddressConfirmed::build(
            command.customer_id.clone(),
            state.email_address.clone(),
            state.next_version(),
        )
        .into(),
    ])
}

pub fn change_email_address(
    stream: &[CustomerEvent],
    command: &ChangeCustomerEmailAddress,
) -> Result<Vec<CustomerEvent>, DomainError> {
    let state = live_state(stream, &command.customer_id)?;

    if state.email_address == command.email_address {
        return Ok(vec![]);
    }

    Ok(vec![
        CustomerEmailAddressChanged::build(
            command.customer_id.clone(),
            command.email_address.clone(),
            command.confirmation_hash.clone(),
            state.email_address.clone(),
            state.next_version(),
        )
        .into(),
    ])
}

pub fn change_name(
    stream: &[CustomerEvent],
    command: &ChangeCustomerName,
) -> Result<Vec<CustomerEvent>, DomainError> {
    let state = live_state(stream, &command.customer_id)?;

    if state.person_name == command.person_name {
        return Ok(vec![]);
    }

    Ok(vec![
        CustomerNameChanged::build(
            command.customer_id.clone(),
            command.person_name.clone(),
            state.next_version(),
        )
        .into(),
    ])
}

/// Deletes the customer. Deleting twice records nothing the second time.
pub fn delete(
    stream: &[CustomerEvent],
    command: &DeleteCustomer,
) -> Result<Vec<CustomerEvent>, DomainError> {
    let Some(state) = CurrentState::replay(stream) else {
        return Err(not_found(command.customer_id.as_str()));
    };

    if state.is_deleted {
        return Ok(vec![]);
    }

    Ok(vec![
        CustomerDeleted::build(
            command.customer_id.clone(),
            state.email_address.clone(),
            state.next_version(),
        )
        .into(),
    ])
}

fn live_state(
    stream: &[CustomerEvent],
    customer_id: &CustomerId,
) -> Result<CurrentState, DomainError> {
    match CurrentState::replay(stream) {
        Some(state) if !state.is_deleted => Ok(state),
        _ => Err(not_found(customer_id.as_str())),
    }
}

fn not_found(customer_id: &str) -> DomainError {
    DomainError::NotFound(format!("customer {customer_id}"))
}

//! Command handling infrastructure.

use std::future::Future;

use crate::customer::CustomerId;
use crate::error::{DomainError, ErrorKind};

/// Number of attempts a command handler makes before giving up on a
/// concurrency conflict.
pub const MAX_RETRIES: usize = 10;

/// Trait for commands that can be executed against a customer stream.
///
/// Commands represent an intention to perform an action. They may be rejected
/// if the customer's current state doesn't allow the action.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Stable command name used for error context and metrics.
    const NAME: &'static str;

    /// Returns the ID of the customer this command targets.
    fn customer_id(&self) -> &CustomerId;
}

/// Runs `attempt` until it succeeds, fails with anything other than a
/// concurrency conflict, or `max_attempts` attempts have been made.
///
/// Every attempt starts from scratch: the closure must reload state. A
/// `max_attempts` of zero still makes one attempt.
pub async fn execute_with_retry<T, F, Fut>(
    command_name: &'static str,
    max_attempts: usize,
    mut attempt: F,
) -> Result<T, DomainError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DomainError>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempts = 0;

    loop {
        attempts += 1;

        match attempt().await {
            Err(e) if e.kind() == ErrorKind::ConcurrencyConflict => {
                if attempts >= max_attempts {
                    tracing::warn!(
                        command = command_name,
                        attempts,
                        error = %e,
                        "giving up after repeated concurrency conflicts"
                    );
                    return Err(DomainError::MaxRetriesExceeded {
                        attempts,
                        last: Box::new(e),
                    });
                }

                tracing::debug!(
                    command = command_name,
                    attempt = attempts,
                    error = %e,
                    "concurrency conflict, retrying"
                );
                metrics::counter!("customer_command_retries_total", "command" => command_name)
                    .increment(1);
            }
            other => return other,
        }
    }
}

//! Ordered fallback over candidate operations.
//!
//! [`first_success`] tries candidates in order and stops at the first result
//! that passes validation. Errors are split in two classes by a caller-supplied
//! predicate: fatal errors end the chain at once, everything else is recorded
//! and the next candidate is tried.

use tracing::warn;

/// Why [`first_success`] produced no value.
#[derive(Debug)]
pub enum FallbackError<E> {
    /// A candidate failed with an error that must not be retried
    Fatal(E),

    /// Every candidate failed; errors are in candidate order
    Exhausted(Vec<E>),
}

/// Try `candidates` in order until one succeeds.
///
/// # Arguments
///
/// * `candidates` - Candidate inputs, in preference order
/// * `attempt` - Runs one candidate
/// * `validate` - Accepts a raw result or turns it into an error
/// * `is_fatal` - Decides whether an error stops the chain
///
/// # Returns
///
/// The successful candidate together with its validated value.
///
/// # Errors
///
/// [`FallbackError::Fatal`] as soon as a fatal error occurs, otherwise
/// [`FallbackError::Exhausted`] once all candidates have failed.
pub fn first_success<C, T, E>(
    candidates: impl IntoIterator<Item = C>,
    mut attempt: impl FnMut(&C) -> Result<T, E>,
    validate: impl Fn(&C, T) -> Result<T, E>,
    is_fatal: impl Fn(&E) -> bool,
) -> Result<(C, T), FallbackError<E>>
where
    E: std::fmt::Display,
{
    let mut errors = Vec::new();

    for candidate in candidates {
        match attempt(&candidate).and_then(|value| validate(&candidate, value)) {
            Ok(value) => return Ok((candidate, value)),
            Err(e) if is_fatal(&e) => return Err(FallbackError::Fatal(e)),
            Err(e) => {
                warn!(error = %e, "candidate failed, trying next");
                errors.push(e);
            }
        }
    }

    Err(FallbackError::Exhausted(errors))
}

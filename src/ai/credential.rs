//! API key validation.

use std::fmt::{Debug, Formatter};

use crate::error::{GenerationError, Result};

/// Prefix every accepted key starts with.
pub const KEY_PREFIX: &str = "sk-";

/// Minimum accepted key length, prefix included.
pub const MIN_KEY_LENGTH: usize = 20;

/// A syntactically valid API key.
///
/// The key is never printed: `Debug` redacts it.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Validate a raw key before any request is attempted.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::CredentialMissing`] when the key is absent,
    /// lacks the `sk-` prefix, or is shorter than [`MIN_KEY_LENGTH`].
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        let Some(key) = raw.map(str::trim).filter(|k| !k.is_empty()) else {
            return Err(GenerationError::CredentialMissing(
                "no API key configured".to_string(),
            ));
        };

        if !key.starts_with(KEY_PREFIX) {
            return Err(GenerationError::CredentialMissing(format!(
                "API key must start with `{KEY_PREFIX}`"
            )));
        }

        if key.len() < MIN_KEY_LENGTH {
            return Err(GenerationError::CredentialMissing(format!(
                "API key must be at least {MIN_KEY_LENGTH} characters"
            )));
        }

        Ok(Self(key.to_string()))
    }

    /// The key text, for building the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Debug for ApiKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

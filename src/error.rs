//! Error types for document generation.
//!
//! Scanning and manifest errors are absorbed by their own modules and never
//! reach this type. Everything that can cross into the orchestrator lives
//! here, so the fallback rules can be decided in one place.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while generating or saving a document.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// No API key is configured, or the configured key is malformed.
    #[error("AI credential missing or invalid: {0}")]
    CredentialMissing(String),

    /// The AI endpoint rejected the credential (HTTP 401).
    #[error("AI authentication failed: {0}")]
    Auth(String),

    /// The AI endpoint is rate limiting requests (HTTP 429).
    #[error("AI rate limit exceeded: {0}")]
    RateLimit(String),

    /// Every candidate model was tried without an acceptable answer.
    #[error("all AI models failed ({})", attempted.join(", "))]
    ModelsExhausted {
        /// Models that were attempted, in order
        attempted: Vec<String>,
    },

    /// A model answered, but with too little content to be a document.
    #[error("model {model} returned only {length} characters")]
    ContentTooShort { model: String, length: usize },

    /// The endpoint answered with a non-success status other than 401/429.
    #[error("AI API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The request never completed.
    #[error("network error: {0}")]
    Network(String),

    /// The response body could not be understood.
    #[error("malformed AI response: {0}")]
    MalformedResponse(String),

    /// The generated document could not be written to disk.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GenerationError {
    /// Whether this error must stop the model fallback chain immediately.
    ///
    /// Authentication and rate-limit failures apply to every model behind the
    /// same credential, so trying the next model cannot help.
    #[must_use]
    pub const fn is_fatal_for_model_chain(&self) -> bool {
        matches!(self, Self::Auth(_) | Self::RateLimit(_))
    }
}

/// Convenient alias used across the generation pipeline.
pub type Result<T> = std::result::Result<T, GenerationError>;

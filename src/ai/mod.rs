//! External AI text generation.
//!
//! The rest of the crate only sees the [`TextGenerator`] trait: a prompt goes
//! in, text or a [`GenerationError`] comes out. [`OpenAiClient`] is the HTTP
//! implementation; tests substitute their own.

pub mod client;
pub mod credential;

pub use client::OpenAiClient;
pub use credential::ApiKey;

use serde::Serialize;

use crate::error::Result;

/// Sampling parameters and prompts for one completion call.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub presence_penalty: f32,
    pub frequency_penalty: f32,
}

/// Something that turns a prompt into text.
///
/// Implementations must report HTTP 401 as [`GenerationError::Auth`] and
/// HTTP 429 as [`GenerationError::RateLimit`]; the model fallback chain relies
/// on it.
///
/// [`GenerationError::Auth`]: crate::error::GenerationError::Auth
/// [`GenerationError::RateLimit`]: crate::error::GenerationError::RateLimit
/// [`GenerationError`]: crate::error::GenerationError
pub trait TextGenerator {
    /// Request a completion and return its text content.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::error::GenerationError`] describing why no text was
    /// produced.
    fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

impl<T: TextGenerator + ?Sized> TextGenerator for &T {
    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        (**self).complete(request)
    }
}

impl<T: TextGenerator + ?Sized> TextGenerator for Box<T> {
    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        (**self).complete(request)
    }
}

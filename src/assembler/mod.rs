//! Document assembly strategies.
//!
//! Both strategies consume the same [`DocumentInput`] and produce a complete
//! Markdown document:
//!
//! - [`TemplateAssembler`] builds it from fixed section skeletons, offline and
//!   deterministically.
//! - [`AiAssembler`] turns the input into a prompt and delegates the prose to
//!   a [`TextGenerator`](crate::ai::TextGenerator).

pub mod ai;
pub mod template;

pub use ai::AiAssembler;
pub use template::TemplateAssembler;

use crate::{classifier::ClassificationResult, error::Result, metadata::ProjectMetadata};

/// Everything a strategy needs to write a document.
#[derive(Clone, Copy, Debug)]
pub struct DocumentInput<'a> {
    pub metadata: &'a ProjectMetadata,
    pub classification: &'a ClassificationResult,

    /// Annotated directory tree of the project
    pub tree: &'a str,
}

/// A way of turning project information into a document.
pub trait DocumentStrategy {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Produce the document.
    ///
    /// # Errors
    ///
    /// Strategies that depend on external services report their failures as
    /// [`crate::error::GenerationError`]; the templated strategy never fails.
    fn assemble(&self, input: &DocumentInput<'_>) -> Result<String>;
}

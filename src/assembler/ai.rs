//! Document assembly delegated to a language model.
//!
//! One prompt is built from the project snapshot and sent to each candidate
//! model in turn until one answers with a document of plausible length.
//! Authentication and rate-limit failures end the attempt at once, since every
//! model sits behind the same credential.

use tracing::{debug, info};

use super::{DocumentInput, DocumentStrategy};
use crate::{
    ai::{CompletionRequest, TextGenerator},
    error::{GenerationError, Result},
    fallback::{FallbackError, first_success},
    tree::render_prompt_tree,
};

/// Models tried after the preferred one, in order.
pub const FALLBACK_MODELS: &[&str] = &["gpt-4o-mini", "gpt-4o", "gpt-3.5-turbo"];

/// A reply must be longer than this (after trimming) to count as a document.
pub const MIN_CONTENT_LENGTH: usize = 1000;

/// Depth of the directory tree embedded in the prompt.
pub const PROMPT_TREE_DEPTH: usize = 3;

const MAX_TOKENS: u32 = 4000;
const TEMPERATURE: f32 = 0.7;
const TOP_P: f32 = 0.9;
const PRESENCE_PENALTY: f32 = 0.1;
const FREQUENCY_PENALTY: f32 = 0.1;

const SYSTEM_PROMPT: &str = "You are an expert technical writer who creates clear, \
comprehensive and professional README.md files for software projects. You write \
GitHub-flavored Markdown only, with accurate installation and usage instructions \
derived from the project information you are given. You never invent features \
that the project information does not support.";

/// Assembles documents through a [`TextGenerator`], with model fallback.
#[derive(Debug)]
pub struct AiAssembler<G> {
    generator: G,
    preferred_model: String,
}

impl<G: TextGenerator> AiAssembler<G> {
    pub fn new(generator: G, preferred_model: impl Into<String>) -> Self {
        Self {
            generator,
            preferred_model: preferred_model.into(),
        }
    }

    /// Preferred model first, then the fixed fallbacks, without duplicates.
    #[must_use]
    pub fn candidate_models(&self) -> Vec<String> {
        let mut models = vec![self.preferred_model.clone()];
        for model in FALLBACK_MODELS {
            if !models.iter().any(|m| m == model) {
                models.push((*model).to_string());
            }
        }
        models
    }

    /// Build the completion request sent to `model`.
    #[must_use]
    pub fn build_request(&self, model: &str, input: &DocumentInput<'_>) -> CompletionRequest {
        CompletionRequest {
            model: model.to_string(),
            system_prompt: SYSTEM_PROMPT.to_string(),
            user_prompt: user_prompt(input),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            top_p: TOP_P,
            presence_penalty: PRESENCE_PENALTY,
            frequency_penalty: FREQUENCY_PENALTY,
        }
    }

    /// Try every candidate model until one yields an acceptable document.
    ///
    /// # Errors
    ///
    /// - [`GenerationError::Auth`] or [`GenerationError::RateLimit`] from the
    ///   first model that reports them; later models are not tried.
    /// - [`GenerationError::ModelsExhausted`] when every model failed for any
    ///   other reason.
    pub fn generate(&self, input: &DocumentInput<'_>) -> Result<String> {
        let models = self.candidate_models();
        let request = self.build_request(&self.preferred_model, input);

        let result = first_success(
            models.iter().cloned(),
            |model| {
                debug!(%model, "requesting document");
                self.generator.complete(&CompletionRequest {
                    model: model.clone(),
                    ..request.clone()
                })
            },
            |model, content| {
                let content = strip_markdown_fence(&content).to_string();
                let length = content.trim().chars().count();
                if length > MIN_CONTENT_LENGTH {
                    Ok(content)
                } else {
                    Err(GenerationError::ContentTooShort {
                        model: model.clone(),
                        length,
                    })
                }
            },
            GenerationError::is_fatal_for_model_chain,
        );

        match result {
            Ok((model, content)) => {
                info!(%model, length = content.len(), "AI document generated");
                Ok(content)
            }
            Err(FallbackError::Fatal(e)) => Err(e),
            Err(FallbackError::Exhausted(_)) => {
                Err(GenerationError::ModelsExhausted { attempted: models })
            }
        }
    }
}

impl<G: TextGenerator> DocumentStrategy for AiAssembler<G> {
    fn name(&self) -> &'static str {
        "ai"
    }

    fn assemble(&self, input: &DocumentInput<'_>) -> Result<String> {
        self.generate(input)
    }
}

/// Remove a ```` ```markdown ```` (or bare ```` ``` ````) fence wrapping the
/// whole reply.
#[must_use]
pub fn strip_markdown_fence(content: &str) -> &str {
    let trimmed = content.trim();

    let Some(rest) = trimmed
        .strip_prefix("```markdown")
        .or_else(|| trimmed.strip_prefix("```md"))
        .or_else(|| trimmed.strip_prefix("```"))
    else {
        return trimmed;
    };

    // Only a fence that ends on its own line opens a block.
    let Some(body) = rest.strip_prefix('\n').or_else(|| rest.strip_prefix("\r\n")) else {
        return trimmed;
    };

    body.strip_suffix("```").unwrap_or(body).trim()
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

fn user_prompt(input: &DocumentInput<'_>) -> String {
    let metadata = input.metadata;
    let classification = input.classification;
    let tree = render_prompt_tree(&metadata.root_path, PROMPT_TREE_DEPTH);
    let extensions: Vec<String> = metadata.file_extensions.iter().cloned().collect();
    let optional = |value: &Option<String>| value.clone().unwrap_or_else(|| "not specified".to_string());

    format!(
        r#"Write a complete README.md for the project described below.

## Project Information
Name: {name}
Description: {description}
Version: {version}
License: {license}
Author: {author}
Homepage: {homepage}
Repository: {repository}
Package manager: {package_manager}
Detected framework: {framework}
Has tests: {has_tests}

## Dependencies
Runtime: {dependencies}
Development: {dev_dependencies}

## Scripts
{scripts}

## File Types
{extensions}

## Analysis
Project type: {project_type}
Main purpose: {main_purpose}
Technologies: {technologies}
Key features: {features}
Architecture: {architecture}

## Directory Structure
```
{tree}```

<REQUIREMENTS>
1. Start with a level-one heading containing the project name
2. Describe what the project does and who it is for
3. Include badges for the license and the main technologies
4. List the key features
5. Give prerequisites, installation and usage instructions using {package_manager}
6. Document the available scripts
7. Show the project structure
8. Add contributing, license and acknowledgment sections
</REQUIREMENTS>

Respond with the Markdown document only, without surrounding code fences or commentary."#,
        name = metadata.name,
        description = optional(&metadata.description),
        version = optional(&metadata.version),
        license = optional(&metadata.license),
        author = optional(&metadata.author),
        homepage = optional(&metadata.homepage),
        repository = optional(&metadata.repository_url),
        package_manager = metadata.package_manager,
        framework = metadata.detected_framework,
        has_tests = if metadata.has_tests { "yes" } else { "no" },
        dependencies = list_or_none(&metadata.dependency_names),
        dev_dependencies = list_or_none(&metadata.dev_dependency_names),
        scripts = list_or_none(&metadata.script_names),
        extensions = list_or_none(&extensions),
        project_type = classification.project_type,
        main_purpose = classification.main_purpose,
        technologies = list_or_none(&classification.technologies),
        features = list_or_none(&classification.features),
        architecture = if classification.architecture_note.is_empty() {
            "not detected"
        } else {
            classification.architecture_note.as_str()
        },
    )
}

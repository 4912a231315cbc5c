//! Strategy selection, AI-to-template fallback and saving.
//!
//! The orchestrator is a small state machine:
//!
//! ```text
//! ChoosingStrategy ──► AiPath ──► Saving ──► Done
//!        │               │          ▲
//!        │               ▼          │
//!        ├─────────► TemplatePath ──┘
//!        ▼
//!     Aborted
//! ```
//!
//! AI failures never end a run; they are reported through
//! [`Interaction::warn`] and the templated document is used instead. Only a
//! failed write is fatal.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    time::Duration,
};

use indicatif::{ProgressBar, ProgressStyle};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::{
    ai::{ApiKey, OpenAiClient, TextGenerator},
    assembler::{AiAssembler, DocumentInput, DocumentStrategy, TemplateAssembler},
    classifier::classify,
    config::{GenerationConfig, StrategyChoice},
    error::{GenerationError, Result},
    metadata::ProjectMetadata,
    tree::render_tree,
};

/// Depth of the directory tree shown in the document.
pub const DOCUMENT_TREE_DEPTH: usize = 3;

/// User-facing decisions and notifications.
///
/// The CLI implements this with interactive prompts; tests script it.
pub trait Interaction {
    /// Ask which strategy to use. `None` cancels the run.
    ///
    /// `ai_available` is false when AI generation is disabled or no usable
    /// credential is configured.
    fn choose_strategy(&self, ai_available: bool) -> Option<StrategyChoice>;

    /// Show a non-fatal problem to the user.
    fn warn(&self, message: &str);
}

/// Why a run ended without a document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbortReason {
    /// The user cancelled at a choice point
    Cancelled,

    /// No project directory was given, or it is not a directory
    NoProjectRoot,
}

/// Summary of a completed run.
#[derive(Clone, Debug)]
pub struct GenerationReport {
    /// Where the document was (or, on a dry run, would have been) written
    pub output_path: PathBuf,

    /// Strategy that produced the document
    pub strategy_used: StrategyChoice,

    /// The document itself
    pub document: String,

    /// Warnings raised along the way, in order
    pub warnings: Vec<String>,

    /// Whether the document was written to disk
    pub written: bool,
}

/// Final result of [`GenerationOrchestrator::run`].
#[derive(Clone, Debug)]
pub enum Outcome {
    Done(GenerationReport),
    Aborted(AbortReason),
}

enum Stage {
    ChoosingStrategy,
    AiPath,
    TemplatePath,
    Saving {
        document: String,
        strategy: StrategyChoice,
    },
    Done(GenerationReport),
    Aborted(AbortReason),
}

impl Stage {
    const fn name(&self) -> &'static str {
        match self {
            Self::ChoosingStrategy => "choosing-strategy",
            Self::AiPath => "ai-path",
            Self::TemplatePath => "template-path",
            Self::Saving { .. } => "saving",
            Self::Done(_) => "done",
            Self::Aborted(_) => "aborted",
        }
    }
}

/// Drives one document generation from project root to saved file.
pub struct GenerationOrchestrator {
    config: GenerationConfig,

    /// Overrides the HTTP client built from the configuration
    generator: Option<Box<dyn TextGenerator>>,

    /// Hides the progress spinner
    quiet: bool,
}

impl GenerationOrchestrator {
    #[must_use]
    pub fn new(config: GenerationConfig) -> Self {
        Self {
            config,
            generator: None,
            quiet: false,
        }
    }

    /// Use `generator` for AI requests instead of an [`OpenAiClient`].
    #[must_use]
    pub fn with_generator(mut self, generator: Box<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Enable or disable quiet mode (suppresses the progress spinner).
    #[must_use]
    pub const fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Whether the AI strategy can be attempted with the current settings.
    #[must_use]
    pub fn ai_available(&self) -> bool {
        self.config.ai_enabled && ApiKey::parse(self.config.api_key.as_deref()).is_ok()
    }

    /// Generate and save a document for the project at `root`.
    ///
    /// # Arguments
    ///
    /// * `root` - Project directory; `None` aborts the run
    /// * `interaction` - Strategy prompt and warning sink
    ///
    /// # Returns
    ///
    /// [`Outcome::Done`] with a report, or [`Outcome::Aborted`] when there is
    /// no project root or the user cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Write`] if the document cannot be saved. AI
    /// failures are not errors; they fall back to the templated document.
    pub fn run(&self, root: Option<&Path>, interaction: &dyn Interaction) -> Result<Outcome> {
        let Some(root) = root.filter(|r| r.is_dir()) else {
            debug!(stage = "aborted", "no project root");
            return Ok(Outcome::Aborted(AbortReason::NoProjectRoot));
        };

        let metadata = ProjectMetadata::collect(root);
        let tree = render_tree(&metadata.root_path, DOCUMENT_TREE_DEPTH);
        let classification = classify(&metadata, &tree);
        let input = DocumentInput {
            metadata: &metadata,
            classification: &classification,
            tree: &tree,
        };
        let output_path = self.config.output_path(&metadata.root_path);

        let mut warnings = Vec::new();
        let mut stage = Stage::ChoosingStrategy;

        loop {
            debug!(stage = stage.name(), "orchestrator stage");

            stage = match stage {
                Stage::ChoosingStrategy => {
                    let choice = self
                        .config
                        .strategy
                        .or_else(|| interaction.choose_strategy(self.ai_available()));

                    match choice {
                        Some(StrategyChoice::Ai) => Stage::AiPath,
                        Some(StrategyChoice::Template) => Stage::TemplatePath,
                        None => Stage::Aborted(AbortReason::Cancelled),
                    }
                }
                Stage::AiPath => match self.generate_with_ai(&input) {
                    Ok(document) => Stage::Saving {
                        document,
                        strategy: StrategyChoice::Ai,
                    },
                    Err(e) => {
                        warn!(error = %e, "AI generation failed, using template");
                        let message = fallback_message(&e);
                        interaction.warn(&message);
                        warnings.push(message);
                        Stage::TemplatePath
                    }
                },
                Stage::TemplatePath => Stage::Saving {
                    document: assemble(&TemplateAssembler::new(self.config.template), &input)?,
                    strategy: StrategyChoice::Template,
                },
                Stage::Saving { document, strategy } => {
                    let written = if self.config.dry_run {
                        false
                    } else {
                        save(&output_path, &document)?;
                        true
                    };

                    info!(
                        path = %output_path.display(),
                        ?strategy,
                        written,
                        "document ready"
                    );

                    Stage::Done(GenerationReport {
                        output_path: output_path.clone(),
                        strategy_used: strategy,
                        document,
                        warnings: std::mem::take(&mut warnings),
                        written,
                    })
                }
                Stage::Done(report) => return Ok(Outcome::Done(report)),
                Stage::Aborted(reason) => return Ok(Outcome::Aborted(reason)),
            };
        }
    }

    fn generate_with_ai(&self, input: &DocumentInput<'_>) -> Result<String> {
        if !self.config.ai_enabled {
            return Err(GenerationError::CredentialMissing(
                "AI generation is disabled".to_string(),
            ));
        }

        let key = ApiKey::parse(self.config.api_key.as_deref())?;
        let model = &self.config.preferred_model;

        let spinner = self.spinner();
        let result = match &self.generator {
            Some(generator) => assemble(&AiAssembler::new(&**generator, model), input),
            None => OpenAiClient::new(self.config.base_url.as_str(), key)
                .and_then(|client| assemble(&AiAssembler::new(client, model), input)),
        };
        spinner.finish_and_clear();

        result
    }

    fn spinner(&self) -> ProgressBar {
        if self.quiet {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message("Generating README with AI...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

/// Run one strategy and log which one produced the document.
fn assemble(strategy: &dyn DocumentStrategy, input: &DocumentInput<'_>) -> Result<String> {
    debug!(strategy = strategy.name(), "assembling document");

    let document = strategy.assemble(input)?;
    debug!(
        strategy = strategy.name(),
        bytes = document.len(),
        "document assembled"
    );

    Ok(document)
}

fn save(path: &Path, document: &str) -> Result<()> {
    write_atomically(path, |file| file.write_all(document.as_bytes()))
}

/// Write through a temporary file in the target's directory, then rename it
/// over `path`.
///
/// The target is either left untouched or fully replaced. An existing file
/// keeps its permissions.
fn write_atomically(
    path: &Path,
    write: impl FnOnce(&mut NamedTempFile) -> io::Result<()>,
) -> Result<()> {
    let write_error = |source| GenerationError::Write {
        path: path.to_path_buf(),
        source,
    };

    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut file = NamedTempFile::new_in(parent).map_err(write_error)?;
    write(&mut file).map_err(write_error)?;
    file.as_file().sync_all().map_err(write_error)?;

    if let Some(permissions) = fs::metadata(path)
        .ok()
        .map(|m| m.permissions())
        .or_else(new_file_permissions)
    {
        file.as_file()
            .set_permissions(permissions)
            .map_err(write_error)?;
    }

    file.persist(path).map_err(|e| write_error(e.error))?;
    Ok(())
}

#[cfg(unix)]
fn new_file_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;

    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<fs::Permissions> {
    None
}

fn fallback_message(error: &GenerationError) -> String {
    match error {
        GenerationError::Auth(_) => {
            "AI authentication failed; check your API key. Using template generation instead."
                .to_string()
        }
        GenerationError::RateLimit(_) => {
            "AI rate limit reached; try again later. Using template generation instead."
                .to_string()
        }
        GenerationError::CredentialMissing(reason) => {
            format!("AI unavailable ({reason}). Using template generation instead.")
        }
        other => format!("AI generation failed: {other}. Using template generation instead."),
    }
}

use std::path::PathBuf;

use autoreadme::config::{
    FileConfig, GenerationConfig, StrategyChoice, TemplateOptions, TemplateStyle,
};
use clap::Parser;

#[derive(Parser)]
struct StrategyArgs {
    /// Generate with AI without asking
    #[arg(long, conflicts_with = "template")]
    ai: bool,

    /// Generate from templates without asking
    #[arg(long, conflicts_with = "ai")]
    template: bool,
}

#[derive(Parser)]
struct AiArgs {
    /// Preferred model; the built-in fallbacks are tried after it
    #[arg(long)]
    model: Option<String>,

    /// API key for the OpenAI-compatible endpoint
    #[arg(long, env = "AUTOREADME_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[arg(long)]
    base_url: Option<String>,

    /// Never use AI generation
    #[arg(long)]
    no_ai: bool,
}

#[derive(Parser)]
struct DocumentArgs {
    /// Layout of the templated document
    #[arg(long, value_enum)]
    style: Option<TemplateStyle>,

    /// Leave badges out of the templated document
    #[arg(long)]
    no_badges: bool,

    /// Leave the project structure out of the templated document
    #[arg(long)]
    no_structure: bool,

    /// Output file, relative to the project directory
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
}

#[derive(Parser)]
struct ExecutionArgs {
    /// Overwrite an existing README without asking
    #[arg(short = 'y', long)]
    yes: bool,

    /// Print the document instead of writing it
    #[arg(long)]
    dry_run: bool,

    /// Show debug logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Parser)]
#[command(name = "autoreadme", version)]
#[command(about = "Generate a README.md for a project from its manifest and layout")]
pub(crate) struct Cli {
    /// The project directory
    #[arg(default_value = ".")]
    pub(crate) dir: PathBuf,

    /// Strategy selection
    #[command(flatten)]
    strategy: StrategyArgs,

    /// AI options
    #[command(flatten)]
    ai_options: AiArgs,

    /// Document options
    #[command(flatten)]
    document: DocumentArgs,

    /// Execution options
    #[command(flatten)]
    execution: ExecutionArgs,
}

impl Cli {
    pub(crate) const fn yes(&self) -> bool {
        self.execution.yes
    }

    pub(crate) const fn dry_run(&self) -> bool {
        self.execution.dry_run
    }

    pub(crate) const fn verbose(&self) -> bool {
        self.execution.verbose
    }

    fn strategy(&self) -> Option<StrategyChoice> {
        if self.strategy.ai {
            Some(StrategyChoice::Ai)
        } else if self.strategy.template {
            Some(StrategyChoice::Template)
        } else {
            None
        }
    }

    /// Resolve the generation settings.
    ///
    /// CLI flags win over the config file, which wins over the defaults. The
    /// API key's environment variable is handled by clap and therefore ranks
    /// with the CLI flag.
    pub(crate) fn generation_config(&self, file: &FileConfig) -> GenerationConfig {
        let defaults = GenerationConfig::default();
        let template_defaults = TemplateOptions::default();

        GenerationConfig {
            ai_enabled: !self.ai_options.no_ai && file.ai.enabled.unwrap_or(defaults.ai_enabled),
            preferred_model: self
                .ai_options
                .model
                .clone()
                .or_else(|| file.ai.model.clone())
                .unwrap_or(defaults.preferred_model),
            api_key: self
                .ai_options
                .api_key
                .clone()
                .or_else(|| file.ai.api_key.clone()),
            base_url: self
                .ai_options
                .base_url
                .clone()
                .or_else(|| file.ai.base_url.clone())
                .unwrap_or(defaults.base_url),
            template: TemplateOptions {
                style: self
                    .document
                    .style
                    .or(file.document.template_style)
                    .unwrap_or(template_defaults.style),
                include_badges: !self.document.no_badges
                    && file
                        .document
                        .include_badges
                        .unwrap_or(template_defaults.include_badges),
                include_structure: !self.document.no_structure
                    && file
                        .document
                        .include_structure
                        .unwrap_or(template_defaults.include_structure),
            },
            output_file: self
                .document
                .output
                .clone()
                .or_else(|| file.document.output.clone())
                .unwrap_or(defaults.output_file),
            strategy: self.strategy(),
            dry_run: self.execution.dry_run,
        }
    }
}

//! # autoreadme
//!
//! Generate a `README.md` for a project by inspecting its `package.json` and
//! directory layout.
//!
//! The document is either assembled from built-in templates (offline,
//! deterministic) or written by an OpenAI-compatible model, with automatic
//! fallback to the templates when the AI request fails.
//!
//! ## Usage
//!
//! ```bash
//! # Ask which strategy to use for the current directory
//! autoreadme
//!
//! # Template only, minimal layout, printed instead of written
//! autoreadme path/to/project --template --style minimal --dry-run
//!
//! # AI generation with a specific model
//! AUTOREADME_API_KEY=sk-... autoreadme --ai --model gpt-4o
//! ```

mod cli;

use std::{io::IsTerminal, process::exit};

use anyhow::{Result, bail};
use autoreadme::{
    config::{FileConfig, StrategyChoice},
    orchestrator::{AbortReason, GenerationOrchestrator, Interaction, Outcome},
};
use clap::Parser;
use cli::Cli;
use colored::Colorize;
use inquire::{Confirm, Select};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const AI_OPTION: &str = "AI generation (OpenAI-compatible API)";
const TEMPLATE_OPTION: &str = "Template generation (offline)";

/// Terminal implementation of the orchestrator's prompts.
struct CliInteraction {
    interactive: bool,
}

impl Interaction for CliInteraction {
    fn choose_strategy(&self, ai_available: bool) -> Option<StrategyChoice> {
        if !self.interactive {
            return Some(if ai_available {
                StrategyChoice::Ai
            } else {
                StrategyChoice::Template
            });
        }

        let options = if ai_available {
            vec![AI_OPTION, TEMPLATE_OPTION]
        } else {
            vec![TEMPLATE_OPTION, AI_OPTION]
        };

        match Select::new("How should the README be generated?", options).prompt() {
            Ok(AI_OPTION) => Some(StrategyChoice::Ai),
            Ok(_) => Some(StrategyChoice::Template),
            Err(_) => None,
        }
    }

    fn warn(&self, message: &str) {
        eprintln!("{} {message}", "Warning:".yellow());
    }
}

/// Entry point for the autoreadme application.
///
/// This function handles all errors gracefully by calling [`inner_main`] and printing
/// any errors to stderr before exiting with a non-zero status code.
fn main() {
    if let Err(err) = inner_main() {
        eprintln!("Error: {err}");

        exit(1);
    }
}

/// Main application logic that can return errors.
///
/// This function:
/// 1. Parses command-line arguments and installs logging
/// 2. Loads the persistent configuration file (if present)
/// 3. Confirms before overwriting an existing output file
/// 4. Runs the generation orchestrator and reports the outcome
///
/// # Errors
///
/// Returns an error if the project directory is missing, a prompt fails, or
/// the document cannot be written.
fn inner_main() -> Result<()> {
    let args = Cli::parse();

    let filter = if args.verbose() { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let file_config = match FileConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {e}", "Warning: Failed to load config file:".yellow());
            FileConfig::default()
        }
    };

    let config = args.generation_config(&file_config);
    let interactive = std::io::stdin().is_terminal();

    let output_path = config.output_path(&args.dir);
    if output_path.exists() && !args.yes() && !args.dry_run() {
        let overwrite = interactive
            && Confirm::new(&format!("{} already exists. Overwrite it?", output_path.display()))
                .with_default(false)
                .prompt_skippable()?
                .unwrap_or(false);

        if !overwrite {
            println!("{}", "Keeping the existing file; nothing was written.".yellow());
            return Ok(());
        }
    }

    let orchestrator =
        GenerationOrchestrator::new(config).with_quiet(!std::io::stderr().is_terminal());
    let interaction = CliInteraction { interactive };

    match orchestrator.run(Some(args.dir.as_path()), &interaction)? {
        Outcome::Done(report) => {
            let strategy = match report.strategy_used {
                StrategyChoice::Ai => "AI",
                StrategyChoice::Template => "templates",
            };

            if report.written {
                println!(
                    "{} {}",
                    format!("✅ README generated with {strategy}:").green(),
                    report.output_path.display().to_string().bright_white()
                );
            } else {
                println!("{}", report.document);
                eprintln!(
                    "{} {}",
                    format!("🧪 Dry run complete ({strategy}); would write").yellow(),
                    report.output_path.display()
                );
            }
        }
        Outcome::Aborted(AbortReason::Cancelled) => {
            println!("{}", "Cancelled; nothing was written.".yellow());
        }
        Outcome::Aborted(AbortReason::NoProjectRoot) => {
            bail!("{} is not a project directory", args.dir.display());
        }
    }

    Ok(())
}

//! Configuration types and options for the application.
//!
//! This module contains the persistent configuration file format and the
//! resolved [`GenerationConfig`] handed to the orchestrator and assemblers.

pub mod file;
pub mod generation;

pub use file::FileConfig;
pub use generation::{GenerationConfig, StrategyChoice, TemplateOptions, TemplateStyle};

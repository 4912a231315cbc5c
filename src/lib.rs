//! # autoreadme
//!
//! Library behind the `autoreadme` CLI: it inspects a project directory,
//! classifies the project and assembles a `README.md` for it.
//!
//! The pipeline runs in one direction:
//!
//! 1. [`metadata::ProjectMetadata::collect`] reads `package.json`
//!    ([`manifest`]) and scans the directory ([`scanner`]).
//! 2. [`tree`] renders the directory layout and [`classifier`] derives the
//!    project type, purpose, technologies and features.
//! 3. An [`assembler`] strategy writes the document, either from templates or
//!    through an AI model ([`ai`]).
//! 4. [`orchestrator`] chooses the strategy, falls back from AI to templates
//!    and saves the result.

pub mod ai;
pub mod assembler;
pub mod classifier;
pub mod config;
pub mod error;
pub mod fallback;
pub mod manifest;
pub mod metadata;
pub mod orchestrator;
pub mod scanner;
pub mod tree;

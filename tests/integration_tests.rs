//! Integration tests for autoreadme
//!
//! These tests create temporary project directories and run the public API
//! against them: scanning, manifest reading, classification, tree rendering,
//! both assembly strategies and the full orchestrated run.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use mockito::{Matcher, Server};
use serde_json::json;
use tempfile::TempDir;

use autoreadme::ai::{ApiKey, OpenAiClient};
use autoreadme::assembler::{AiAssembler, DocumentInput, DocumentStrategy, TemplateAssembler};
use autoreadme::classifier::classify;
use autoreadme::config::{GenerationConfig, StrategyChoice, TemplateOptions};
use autoreadme::error::GenerationError;
use autoreadme::manifest::DependencyReader;
use autoreadme::metadata::ProjectMetadata;
use autoreadme::orchestrator::{GenerationOrchestrator, Interaction, Outcome};
use autoreadme::scanner::Scanner;
use autoreadme::tree::{render_prompt_tree, render_tree};

const KEY: &str = "sk-integration-0123456789";

/// Helper function to create a temporary directory structure for testing
fn create_test_directory() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Helper function to create a file with specified content
fn create_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directories");
    }
    fs::write(path, content).expect("Failed to write file");
}

/// Create a React + Vite project with sources, tests and a lockfile
fn create_react_project(base_path: &Path, project_name: &str) -> PathBuf {
    let project_path = base_path.join(project_name);

    let manifest = format!(
        r#"{{
  "name": "{project_name}",
  "version": "1.0.0",
  "dependencies": {{ "react": "^18.2.0", "react-dom": "^18.2.0" }},
  "devDependencies": {{ "vite": "^5.0.0", "typescript": "^5.3.0" }},
  "scripts": {{ "dev": "vite", "build": "vite build", "test": "vitest" }}
}}"#
    );
    create_file(&project_path.join("package.json"), &manifest);
    create_file(&project_path.join("yarn.lock"), "");
    create_file(&project_path.join("src/main.tsx"), "");
    create_file(&project_path.join("src/components/App.tsx"), "");
    create_file(&project_path.join("src/App.test.tsx"), "");

    project_path
}

/// Records warnings and always answers with the same strategy
struct FixedChoice {
    choice: Option<StrategyChoice>,
    warnings: RefCell<Vec<String>>,
}

impl FixedChoice {
    fn new(choice: Option<StrategyChoice>) -> Self {
        Self {
            choice,
            warnings: RefCell::new(Vec::new()),
        }
    }
}

impl Interaction for FixedChoice {
    fn choose_strategy(&self, _ai_available: bool) -> Option<StrategyChoice> {
        self.choice
    }

    fn warn(&self, message: &str) {
        self.warnings.borrow_mut().push(message.to_string());
    }
}

fn completion_body(content: &str) -> String {
    json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] }).to_string()
}

// ── Scanning and manifest ───────────────────────────────────────────────

#[test]
fn test_scanner_never_enters_node_modules() {
    let temp_dir = create_test_directory();
    let base = temp_dir.path();

    create_file(&base.join("index.js"), "");
    create_file(&base.join("node_modules/pkg/lib.rb"), "");
    create_file(&base.join("lib/node_modules/inner/x.go"), "");
    create_file(&base.join("node_modules/a/b/c/d/spec.test.ts"), "");

    let summary = Scanner::default().scan(base);

    assert!(summary.file_extensions.contains(".js"));
    assert!(!summary.file_extensions.contains(".rb"));
    assert!(!summary.file_extensions.contains(".go"));
    assert!(!summary.file_extensions.contains(".ts"));
    assert!(!summary.has_tests);
}

#[test]
fn test_missing_manifest_uses_directory_name() {
    let temp_dir = create_test_directory();
    let project = temp_dir.path().join("nameless-tool");
    fs::create_dir(&project).unwrap();

    let info = DependencyReader::read(&project);

    assert_eq!(info.name, "nameless-tool");
    assert!(info.dependency_names.is_empty());
    assert!(info.dev_dependency_names.is_empty());
    assert!(info.script_names.is_empty());
}

#[test]
fn test_malformed_manifest_falls_back_to_defaults() {
    let temp_dir = create_test_directory();
    let project = temp_dir.path().join("broken");
    create_file(&project.join("package.json"), "{ not json");

    let metadata = ProjectMetadata::collect(&project);

    assert_eq!(metadata.name, "broken");
    assert!(!metadata.has_dependencies());
    assert_eq!(metadata.detected_framework, "Software");
}

#[test]
fn test_collect_react_project() {
    let temp_dir = create_test_directory();
    let project = create_react_project(temp_dir.path(), "dashboard");

    let metadata = ProjectMetadata::collect(&project);

    assert_eq!(metadata.name, "dashboard");
    assert_eq!(metadata.dependency_names, vec!["react", "react-dom"]);
    assert_eq!(metadata.script_names, vec!["dev", "build", "test"]);
    assert!(metadata.has_tests);
    assert!(metadata.file_extensions.contains(".tsx"));
    assert_eq!(metadata.package_manager.to_string(), "yarn");
    assert_eq!(metadata.detected_framework, "React Application");
    assert!(metadata.root_path.is_absolute());
}

#[test]
fn test_controller_layout_without_manifest_is_backend() {
    let temp_dir = create_test_directory();
    let project = temp_dir.path().join("orders-service");
    create_file(&project.join("controllers/user.controller.js"), "");

    let metadata = ProjectMetadata::collect(&project);

    assert_eq!(
        metadata.file_extensions.iter().collect::<Vec<_>>(),
        vec![".js"]
    );
    assert!(metadata.has_controller_signal);
    assert_eq!(metadata.detected_framework, "Backend API");
}

// ── Tree rendering ──────────────────────────────────────────────────────

#[test]
fn test_render_depth_zero_is_empty() {
    let temp_dir = create_test_directory();
    let project = create_react_project(temp_dir.path(), "app");

    assert_eq!(render_tree(&project, 0), "");
    assert_eq!(render_prompt_tree(&project, 0), "");
    assert_eq!(render_tree(&temp_dir.path().join("missing"), 0), "");
}

#[test]
fn test_render_tree_skips_noise() {
    let temp_dir = create_test_directory();
    let project = create_react_project(temp_dir.path(), "app");
    create_file(&project.join("node_modules/react/index.js"), "");
    create_file(&project.join("dist/bundle.js"), "");
    create_file(&project.join(".env"), "SECRET=1");

    let tree = render_tree(&project, 3);

    assert!(tree.contains("src/"));
    assert!(tree.contains("components/"));
    assert!(tree.contains("App.tsx"));
    assert!(!tree.contains("node_modules"));
    assert!(!tree.contains("dist"));
    assert!(!tree.contains(".env"));
}

// ── Classification ──────────────────────────────────────────────────────

#[test]
fn test_classification_from_real_project() {
    let temp_dir = create_test_directory();
    let project = create_react_project(temp_dir.path(), "weather-board");

    let metadata = ProjectMetadata::collect(&project);
    let tree = render_tree(&metadata.root_path, 3);
    let classification = classify(&metadata, &tree);

    assert_eq!(classification.project_type, "React Application");
    assert!(classification.main_purpose.starts_with("Weather application"));
    assert!(classification.technologies.iter().any(|t| t == "Vite"));
    assert!(classification.technologies.iter().any(|t| t == "TypeScript"));
    assert_eq!(classification, classify(&metadata, &tree));
}

// ── Strategies ──────────────────────────────────────────────────────────

#[test]
fn test_template_contains_name_and_default_license() {
    let temp_dir = create_test_directory();
    let project = create_react_project(temp_dir.path(), "unlicensed-app");

    let metadata = ProjectMetadata::collect(&project);
    let tree = render_tree(&metadata.root_path, 3);
    let classification = classify(&metadata, &tree);
    let input = DocumentInput {
        metadata: &metadata,
        classification: &classification,
        tree: &tree,
    };

    let document = TemplateAssembler::new(TemplateOptions::default())
        .assemble(&input)
        .unwrap();

    assert!(document.contains("unlicensed-app"));
    assert!(document.contains("MIT"));
    assert!(document.contains("yarn install"));
    assert!(document.contains("yarn dev"));
}

#[test]
fn test_ai_strategy_stops_after_unauthorized() {
    let temp_dir = create_test_directory();
    let project = create_react_project(temp_dir.path(), "app");
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_body(r#"{"error":{"message":"Incorrect API key provided"}}"#)
        .expect(1)
        .create();

    let metadata = ProjectMetadata::collect(&project);
    let classification = classify(&metadata, "");
    let input = DocumentInput {
        metadata: &metadata,
        classification: &classification,
        tree: "",
    };
    let client = OpenAiClient::new(server.url(), ApiKey::parse(Some(KEY)).unwrap()).unwrap();

    let result = AiAssembler::new(client, "gpt-4o-mini").assemble(&input);

    assert!(matches!(result, Err(GenerationError::Auth(_))));
    mock.assert();
}

#[test]
fn test_ai_strategy_skips_short_reply() {
    let temp_dir = create_test_directory();
    let project = create_react_project(temp_dir.path(), "app");
    let long = format!("# app\n\n{}", "x".repeat(1992));
    let mut server = Server::new();
    let short_mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({ "model": "gpt-4o-mini" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(&"y".repeat(50)))
        .expect(1)
        .create();
    let long_mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({ "model": "gpt-4o" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(&long))
        .expect(1)
        .create();

    let metadata = ProjectMetadata::collect(&project);
    let classification = classify(&metadata, "");
    let input = DocumentInput {
        metadata: &metadata,
        classification: &classification,
        tree: "",
    };
    let client = OpenAiClient::new(server.url(), ApiKey::parse(Some(KEY)).unwrap()).unwrap();

    let document = AiAssembler::new(client, "gpt-4o-mini")
        .assemble(&input)
        .unwrap();

    assert_eq!(document, long);
    short_mock.assert();
    long_mock.assert();
}

// ── Orchestrated runs ───────────────────────────────────────────────────

#[test]
fn test_orchestrator_template_run_writes_readme() {
    let temp_dir = create_test_directory();
    let project = create_react_project(temp_dir.path(), "shop-front");
    let interaction = FixedChoice::new(Some(StrategyChoice::Template));

    let outcome = GenerationOrchestrator::new(GenerationConfig::default())
        .with_quiet(true)
        .run(Some(project.as_path()), &interaction)
        .unwrap();

    let Outcome::Done(report) = outcome else {
        panic!("expected a finished run");
    };
    let written = fs::read_to_string(project.join("README.md")).unwrap();

    assert!(report.written);
    assert_eq!(written, report.document);
    assert!(written.starts_with("# shop-front"));
    assert!(written.contains("## Project Structure"));
    assert!(interaction.warnings.borrow().is_empty());
}

#[test]
fn test_orchestrator_falls_back_on_server_errors() {
    let temp_dir = create_test_directory();
    let project = create_react_project(temp_dir.path(), "app");
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(500)
        .with_body("internal error")
        .expect(3)
        .create();

    let config = GenerationConfig {
        api_key: Some(KEY.to_string()),
        base_url: server.url(),
        ..GenerationConfig::default()
    };
    let interaction = FixedChoice::new(Some(StrategyChoice::Ai));

    let outcome = GenerationOrchestrator::new(config)
        .with_quiet(true)
        .run(Some(project.as_path()), &interaction)
        .unwrap();

    let Outcome::Done(report) = outcome else {
        panic!("expected a finished run");
    };

    assert_eq!(report.strategy_used, StrategyChoice::Template);
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("gpt-4o-mini, gpt-4o, gpt-3.5-turbo"));
    assert!(project.join("README.md").exists());
    mock.assert();
}

#[test]
fn test_orchestrator_cancel_writes_nothing() {
    let temp_dir = create_test_directory();
    let project = create_react_project(temp_dir.path(), "app");
    let interaction = FixedChoice::new(None);

    let outcome = GenerationOrchestrator::new(GenerationConfig::default())
        .with_quiet(true)
        .run(Some(project.as_path()), &interaction)
        .unwrap();

    assert!(matches!(outcome, Outcome::Aborted(_)));
    assert!(!project.join("README.md").exists());
}

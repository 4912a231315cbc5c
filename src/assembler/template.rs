//! Offline document assembly from fixed section skeletons.
//!
//! The output depends only on the [`DocumentInput`] and the
//! [`TemplateOptions`]; no clock, network or filesystem access is involved,
//! so the same project always produces the same document.

use std::fmt::Write as _;

use super::{DocumentInput, DocumentStrategy};
use crate::{
    classifier::{Category, known_package},
    config::{TemplateOptions, TemplateStyle},
    error::Result,
    metadata::ProjectMetadata,
};

/// License assumed when the manifest declares none.
pub const DEFAULT_LICENSE: &str = "MIT";

/// Shown instead of a homepage link.
const DEMO_PLACEHOLDER: &str = "[Add your live demo link here]";

/// Technologies that get their own badge.
const MAX_TECHNOLOGY_BADGES: usize = 4;

/// Scripts that start a development server, in preference order.
const RUN_SCRIPTS: &[&str] = &["dev", "start", "serve"];

/// Descriptions for common script names.
const SCRIPT_DESCRIPTIONS: &[(&str, &str)] = &[
    ("dev", "Start the development server"),
    ("start", "Start the application"),
    ("serve", "Serve the application locally"),
    ("build", "Create a production build"),
    ("preview", "Preview the production build locally"),
    ("test", "Run the test suite"),
    ("coverage", "Run tests with coverage reporting"),
    ("lint", "Check the code for lint errors"),
    ("format", "Format the source code"),
    ("typecheck", "Run the type checker"),
    ("watch", "Rebuild on file changes"),
    ("deploy", "Deploy the application"),
    ("eject", "Eject from the build tooling"),
];

/// Assembles documents from built-in section templates.
#[derive(Clone, Copy, Debug, Default)]
pub struct TemplateAssembler {
    options: TemplateOptions,
}

/// A titled `##` section of the document body.
struct Section {
    title: &'static str,
    body: String,
}

impl TemplateAssembler {
    #[must_use]
    pub const fn new(options: TemplateOptions) -> Self {
        Self { options }
    }

    /// Render the complete document.
    #[must_use]
    pub fn render(&self, input: &DocumentInput<'_>) -> String {
        let standard = self.options.style == TemplateStyle::Standard;
        let metadata = input.metadata;

        let mut out = String::new();
        let _ = writeln!(out, "# {}\n", metadata.name);
        let _ = writeln!(out, "{}\n", description(input));

        if standard && self.options.include_badges {
            let _ = writeln!(out, "{}\n", badges(input));
        }
        if standard {
            let _ = writeln!(out, "{}\n", demo_links(metadata));
        }

        let sections = self.sections(input);

        if standard {
            let _ = writeln!(out, "## Table of Contents\n");
            for section in &sections {
                let _ = writeln!(out, "- [{}](#{})", section.title, anchor(section.title));
            }
            out.push('\n');
        }

        for section in &sections {
            let _ = writeln!(out, "## {}\n", section.title);
            let _ = writeln!(out, "{}\n", section.body.trim_end());
        }

        let trimmed = out.trim_end().len();
        out.truncate(trimmed);
        out.push('\n');
        out
    }

    fn sections(&self, input: &DocumentInput<'_>) -> Vec<Section> {
        let metadata = input.metadata;
        let mut sections = vec![Section {
            title: "Features",
            body: features(input),
        }];

        if self.options.style == TemplateStyle::Minimal {
            sections.push(Section {
                title: "Getting Started",
                body: getting_started(metadata),
            });
            sections.push(Section {
                title: "License",
                body: license(metadata),
            });
            return sections;
        }

        sections.push(Section {
            title: "Tech Stack",
            body: tech_stack(input),
        });
        sections.push(Section {
            title: "Getting Started",
            body: getting_started(metadata),
        });

        let tree = input.tree.trim_end();
        if self.options.include_structure && !tree.is_empty() {
            sections.push(Section {
                title: "Project Structure",
                body: format!("```\n{}/\n{tree}\n```", metadata.name),
            });
        }

        if !metadata.script_names.is_empty() {
            sections.push(Section {
                title: "Available Scripts",
                body: scripts_table(metadata),
            });
        }

        sections.push(Section {
            title: "Contributing",
            body: CONTRIBUTING.to_string(),
        });
        sections.push(Section {
            title: "License",
            body: license(metadata),
        });
        sections.push(Section {
            title: "Contact",
            body: contact(metadata),
        });
        sections.push(Section {
            title: "Acknowledgments",
            body: acknowledgments(metadata),
        });

        sections
    }
}

impl DocumentStrategy for TemplateAssembler {
    fn name(&self) -> &'static str {
        "template"
    }

    fn assemble(&self, input: &DocumentInput<'_>) -> Result<String> {
        Ok(self.render(input))
    }
}

const CONTRIBUTING: &str = "\
Contributions are welcome! To contribute:

1. Fork the repository
2. Create a feature branch (`git checkout -b feature/amazing-feature`)
3. Commit your changes (`git commit -m 'Add amazing feature'`)
4. Push to the branch (`git push origin feature/amazing-feature`)
5. Open a pull request";

// ── Section bodies ──────────────────────────────────────────────────────

fn description(input: &DocumentInput<'_>) -> String {
    input
        .metadata
        .description
        .clone()
        .unwrap_or_else(|| input.classification.main_purpose.clone())
}

fn badges(input: &DocumentInput<'_>) -> String {
    let metadata = input.metadata;
    let mut badges = vec![format!(
        "![License](https://img.shields.io/badge/license-{}-blue.svg)",
        shields_escape(license_name(metadata))
    )];

    if let Some(version) = &metadata.version {
        badges.push(format!(
            "![Version](https://img.shields.io/badge/version-{}-green.svg)",
            shields_escape(version)
        ));
    }

    for technology in input
        .classification
        .technologies
        .iter()
        .take(MAX_TECHNOLOGY_BADGES)
    {
        badges.push(format!(
            "![{technology}](https://img.shields.io/badge/built%20with-{}-informational.svg)",
            shields_escape(technology)
        ));
    }

    badges.join(" ")
}

fn demo_links(metadata: &ProjectMetadata) -> String {
    let demo = metadata
        .homepage
        .as_deref()
        .map_or_else(|| DEMO_PLACEHOLDER.to_string(), |url| format!("[{url}]({url})"));

    let mut links = format!("**Live Demo:** {demo}");
    if let Some(url) = repository_web_url(metadata) {
        let _ = write!(links, "\n\n**Repository:** [{url}]({url})");
    }
    links
}

fn features(input: &DocumentInput<'_>) -> String {
    let mut body = String::new();
    for feature in &input.classification.features {
        let _ = writeln!(body, "- {feature}");
    }
    if input.metadata.has_tests {
        let _ = writeln!(body, "- Comprehensive test suite");
    }
    body
}

fn tech_stack(input: &DocumentInput<'_>) -> String {
    let classification = input.classification;

    let mut body = format!("**Project type:** {}\n", classification.project_type);

    if !classification.technologies.is_empty() {
        body.push('\n');
        for technology in &classification.technologies {
            let _ = writeln!(body, "- {technology}");
        }
    }

    if !classification.architecture_note.is_empty() {
        let _ = write!(
            body,
            "\n**Architecture:** {}\n",
            classification.architecture_note
        );
    }

    body
}

fn getting_started(metadata: &ProjectMetadata) -> String {
    let is_python = matches!(Category::detect(metadata), Category::Python(_));

    let mut body = String::from("### Prerequisites\n\n- Git\n");
    if is_python {
        body.push_str("- Python 3.8 or higher\n- pip\n");
    } else {
        body.push_str("- Node.js (v18 or higher)\n");
        let _ = writeln!(body, "- {}", metadata.package_manager);
    }

    let clone_url = metadata
        .repository_url
        .as_deref()
        .map_or_else(|| default_clone_url(&metadata.name), clean_repository_url);

    let _ = write!(
        body,
        "\n### Installation\n\n```bash\ngit clone {clone_url}\ncd {}\n",
        metadata.name
    );
    if is_python {
        body.push_str("pip install -r requirements.txt\n");
    } else {
        let _ = writeln!(body, "{}", metadata.package_manager.install_command());
    }
    body.push_str("```\n");

    if let Some(script) = RUN_SCRIPTS.iter().find(|s| metadata.has_script(s)) {
        let _ = write!(
            body,
            "\n### Running\n\n```bash\n{}\n```\n",
            metadata.package_manager.run_command(script)
        );
    } else if is_python {
        body.push_str("\n### Running\n\n```bash\npython main.py\n```\n");
    }

    if metadata.has_script("build") {
        let _ = write!(
            body,
            "\n### Building for Production\n\n```bash\n{}\n```\n",
            metadata.package_manager.run_command("build")
        );
    }

    body
}

fn scripts_table(metadata: &ProjectMetadata) -> String {
    let mut body = String::from("| Script | Command | Description |\n| --- | --- | --- |\n");

    for script in &metadata.script_names {
        let description = SCRIPT_DESCRIPTIONS
            .iter()
            .find(|(name, _)| *name == script.as_str())
            .map_or_else(|| format!("Run the `{script}` script"), |(_, d)| (*d).to_string());

        let _ = writeln!(
            body,
            "| `{script}` | `{}` | {description} |",
            metadata.package_manager.run_command(script)
        );
    }

    body
}

fn license(metadata: &ProjectMetadata) -> String {
    format!(
        "This project is licensed under the {} License.",
        license_name(metadata)
    )
}

fn contact(metadata: &ProjectMetadata) -> String {
    let author = metadata.author.as_deref().unwrap_or("Developer");
    let mut body = format!("**{author}**");

    if let Some(url) = repository_web_url(metadata) {
        let _ = write!(body, "\n\nProject Link: [{url}]({url})");
    }
    body
}

fn acknowledgments(metadata: &ProjectMetadata) -> String {
    let mut names: Vec<&str> = Vec::new();
    for name in metadata.all_dependencies().filter_map(known_package) {
        if !names.contains(&name) {
            names.push(name);
        }
    }

    if names.is_empty() {
        return "- Thanks to everyone in the open-source community whose work made this possible"
            .to_string();
    }

    let mut body = String::from("Built with these excellent projects:\n\n");
    for name in names {
        let _ = writeln!(body, "- {name}");
    }
    body
}

// ── Helpers ─────────────────────────────────────────────────────────────

fn license_name(metadata: &ProjectMetadata) -> &str {
    metadata.license.as_deref().unwrap_or(DEFAULT_LICENSE)
}

fn default_clone_url(name: &str) -> String {
    format!("https://github.com/your-username/{name}.git")
}

/// Strip the `git+` transport prefix npm allows in repository URLs.
fn clean_repository_url(url: &str) -> String {
    url.strip_prefix("git+").unwrap_or(url).to_string()
}

/// Browsable form of the repository URL, if one is declared.
fn repository_web_url(metadata: &ProjectMetadata) -> Option<String> {
    metadata.repository_url.as_deref().map(|url| {
        let url = clean_repository_url(url);
        url.strip_suffix(".git").map_or(url.clone(), str::to_string)
    })
}

/// GitHub-style heading anchor.
fn anchor(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            c if c.is_alphanumeric() || c == '-' => Some(c),
            _ => None,
        })
        .collect()
}

/// Escape a value for a shields.io static badge path segment.
fn shields_escape(value: &str) -> String {
    value
        .replace('-', "--")
        .replace('_', "__")
        .replace(' ', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;

    use crate::{
        classifier::classify,
        manifest::{ManifestInfo, PackageManager},
        scanner::ScanSummary,
    };

    fn manifest(name: &str) -> ManifestInfo {
        ManifestInfo {
            name: name.to_string(),
            description: None,
            license: None,
            repository_url: None,
            version: None,
            author: None,
            homepage: None,
            dependency_names: Vec::new(),
            dev_dependency_names: Vec::new(),
            script_names: Vec::new(),
        }
    }

    fn metadata(manifest: ManifestInfo, has_tests: bool, manager: PackageManager) -> ProjectMetadata {
        ProjectMetadata::from_parts(
            PathBuf::from("/projects").join(&manifest.name),
            manifest,
            ScanSummary {
                file_extensions: [".js".to_string()].into_iter().collect(),
                has_tests,
                has_controller_signal: false,
            },
            manager,
        )
    }

    fn render(metadata: &ProjectMetadata, tree: &str, options: TemplateOptions) -> String {
        let classification = classify(metadata, tree);
        let input = DocumentInput {
            metadata,
            classification: &classification,
            tree,
        };
        TemplateAssembler::new(options).render(&input)
    }

    fn react_app() -> ManifestInfo {
        ManifestInfo {
            description: Some("A tiny dashboard".to_string()),
            license: Some("Apache-2.0".to_string()),
            repository_url: Some("git+https://github.com/acme/dash.git".to_string()),
            version: Some("1.2.0".to_string()),
            author: Some("Ada".to_string()),
            dependency_names: vec!["react".to_string(), "react-dom".to_string()],
            dev_dependency_names: vec!["vite".to_string()],
            script_names: vec!["dev".to_string(), "build".to_string(), "custom".to_string()],
            ..manifest("dash")
        }
    }

    // ── Minimal input ───────────────────────────────────────────────

    #[test]
    fn test_empty_project_has_name_and_default_license() {
        let meta = metadata(manifest("bare"), false, PackageManager::Npm);
        let doc = render(&meta, "", TemplateOptions::default());

        assert!(doc.starts_with("# bare\n"));
        assert!(doc.contains("MIT"));
        assert!(doc.contains("Software project"));
        assert!(doc.contains(DEMO_PLACEHOLDER));
        assert!(doc.contains("https://github.com/your-username/bare.git"));
        assert!(doc.contains("**Developer**"));
        assert!(!doc.contains("## Project Structure"));
        assert!(!doc.contains("## Available Scripts"));
        assert!(doc.ends_with('\n'));
        assert!(!doc.ends_with("\n\n"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let meta = metadata(react_app(), true, PackageManager::Npm);
        let tree = "├── src/\n└── package.json\n";

        assert_eq!(
            render(&meta, tree, TemplateOptions::default()),
            render(&meta, tree, TemplateOptions::default())
        );
    }

    // ── Standard style ──────────────────────────────────────────────

    #[test]
    fn test_standard_sections_in_order() {
        let meta = metadata(react_app(), true, PackageManager::Npm);
        let doc = render(&meta, "├── src/\n└── package.json\n", TemplateOptions::default());

        let titles = [
            "## Table of Contents",
            "## Features",
            "## Tech Stack",
            "## Getting Started",
            "## Project Structure",
            "## Available Scripts",
            "## Contributing",
            "## License",
            "## Contact",
            "## Acknowledgments",
        ];
        let positions: Vec<usize> = titles
            .iter()
            .map(|t| doc.find(t).unwrap_or_else(|| panic!("missing {t}")))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_standard_content_details() {
        let meta = metadata(react_app(), true, PackageManager::Npm);
        let doc = render(&meta, "├── src/\n└── package.json\n", TemplateOptions::default());

        assert!(doc.contains("A tiny dashboard"));
        assert!(doc.contains("badge/license-Apache--2.0-blue.svg"));
        assert!(doc.contains("badge/version-1.2.0-green.svg"));
        assert!(doc.contains("- [Getting Started](#getting-started)"));
        assert!(doc.contains("- Comprehensive test suite"));
        assert!(doc.contains("git clone https://github.com/acme/dash.git"));
        assert!(doc.contains("[https://github.com/acme/dash](https://github.com/acme/dash)"));
        assert!(doc.contains("```\ndash/\n├── src/\n└── package.json\n```"));
        assert!(doc.contains("| `dev` | `npm run dev` | Start the development server |"));
        assert!(doc.contains("| `custom` | `npm run custom` | Run the `custom` script |"));
        assert!(doc.contains("Apache-2.0 License"));
        assert!(doc.contains("**Ada**"));
        assert!(doc.contains("- React\n- Vite"));
    }

    #[test]
    fn test_install_command_follows_package_manager() {
        let meta = metadata(react_app(), false, PackageManager::Pnpm);
        let doc = render(&meta, "", TemplateOptions::default());

        assert!(doc.contains("pnpm install"));
        assert!(doc.contains("pnpm dev"));
        assert!(doc.contains("pnpm build"));
        assert!(!doc.contains("npm install"));
    }

    #[test]
    fn test_run_command_prefers_dev_then_start() {
        let meta = metadata(
            ManifestInfo {
                dependency_names: vec!["lodash".to_string()],
                script_names: vec!["serve".to_string(), "start".to_string()],
                ..manifest("svc")
            },
            false,
            PackageManager::Npm,
        );
        let doc = render(&meta, "", TemplateOptions::default());

        assert!(doc.contains("### Running\n\n```bash\nnpm start\n```"));
    }

    #[test]
    fn test_python_project_uses_pip() {
        let meta = metadata(
            ManifestInfo {
                dependency_names: vec!["flask".to_string()],
                ..manifest("api")
            },
            false,
            PackageManager::Npm,
        );
        let doc = render(&meta, "", TemplateOptions::default());

        assert!(doc.contains("- Python 3.8 or higher"));
        assert!(doc.contains("pip install -r requirements.txt"));
        assert!(!doc.contains("npm install"));
    }

    #[test]
    fn test_options_disable_badges_and_structure() {
        let meta = metadata(react_app(), false, PackageManager::Npm);
        let options = TemplateOptions {
            include_badges: false,
            include_structure: false,
            ..TemplateOptions::default()
        };
        let doc = render(&meta, "├── src/\n", options);

        assert!(!doc.contains("img.shields.io"));
        assert!(!doc.contains("## Project Structure"));
        assert!(!doc.contains("(#project-structure)"));
    }

    // ── Minimal style ───────────────────────────────────────────────

    #[test]
    fn test_minimal_style() {
        let meta = metadata(react_app(), false, PackageManager::Npm);
        let options = TemplateOptions {
            style: TemplateStyle::Minimal,
            ..TemplateOptions::default()
        };
        let doc = render(&meta, "├── src/\n", options);

        assert!(doc.contains("# dash"));
        assert!(doc.contains("## Features"));
        assert!(doc.contains("## Getting Started"));
        assert!(doc.contains("## License"));
        assert!(!doc.contains("## Available Scripts"));
        assert!(!doc.contains("## Table of Contents"));
        assert!(!doc.contains("## Contributing"));
        assert!(!doc.contains("img.shields.io"));
    }

    // ── Helpers ─────────────────────────────────────────────────────

    #[test]
    fn test_anchor() {
        assert_eq!(anchor("Getting Started"), "getting-started");
        assert_eq!(anchor("Tech Stack"), "tech-stack");
    }

    #[test]
    fn test_shields_escape() {
        assert_eq!(shields_escape("Apache-2.0"), "Apache--2.0");
        assert_eq!(shields_escape("my_lib"), "my__lib");
        assert_eq!(shields_escape("Tailwind CSS"), "Tailwind%20CSS");
    }

    #[test]
    fn test_assemble_never_fails() {
        let meta = metadata(manifest("x"), false, PackageManager::Npm);
        let classification = classify(&meta, "");
        let input = DocumentInput {
            metadata: &meta,
            classification: &classification,
            tree: "",
        };

        let assembler = TemplateAssembler::default();
        assert_eq!(assembler.name(), "template");
        assert!(assembler.assemble(&input).is_ok());
    }
}

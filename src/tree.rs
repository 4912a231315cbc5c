//! Directory tree rendering.
//!
//! Two views of the same layout are produced here. [`render_tree`] is the
//! annotated tree embedded in the generated document. [`render_prompt_tree`]
//! is a cheaper view for prompt construction: no annotations, and at most
//! [`PROMPT_MAX_ENTRIES`] entries per directory.

use std::{cmp::Ordering, fs, io, path::Path};

use tracing::debug;

/// Directories never shown in a tree.
const NOISE_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    ".vscode",
    "dist",
    "build",
    ".next",
    ".nuxt",
    "__pycache__",
    "coverage",
];

/// Entries shown per directory in the prompt view.
pub const PROMPT_MAX_ENTRIES: usize = 15;

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const CONTINUATION: &str = "│   ";
const BLANK: &str = "    ";

/// Comments for well-known directory names.
const DIR_COMMENTS: &[(&str, &str)] = &[
    ("src", "Source code"),
    ("app", "Application entry and routes"),
    ("components", "Reusable UI components"),
    ("pages", "Route-level views"),
    ("hooks", "Custom React hooks"),
    ("utils", "Utility functions"),
    ("helpers", "Helper functions"),
    ("lib", "Shared library code"),
    ("services", "API and business logic"),
    ("api", "API routes"),
    ("controllers", "Request handlers"),
    ("models", "Data models"),
    ("routes", "Route definitions"),
    ("middleware", "Request middleware"),
    ("store", "State management"),
    ("types", "Type definitions"),
    ("styles", "Stylesheets"),
    ("assets", "Images, fonts and media"),
    ("public", "Static files"),
    ("config", "Configuration files"),
    ("scripts", "Build and maintenance scripts"),
    ("docs", "Documentation"),
    ("tests", "Test files"),
    ("test", "Test files"),
    ("__tests__", "Test files"),
];

/// Comments for well-known file names.
const FILE_COMMENTS: &[(&str, &str)] = &[
    ("package.json", "Project manifest and scripts"),
    ("tsconfig.json", "TypeScript configuration"),
    (".env", "Environment variables"),
    ("README.md", "Project documentation"),
    ("LICENSE", "License text"),
    ("index.html", "HTML entry point"),
    ("vite.config.js", "Vite configuration"),
    ("vite.config.ts", "Vite configuration"),
    ("next.config.js", "Next.js configuration"),
    ("next.config.mjs", "Next.js configuration"),
    ("tailwind.config.js", "Tailwind CSS configuration"),
    ("requirements.txt", "Python dependencies"),
    ("Dockerfile", "Container image definition"),
    ("docker-compose.yml", "Container orchestration"),
];

/// A directory entry kept for rendering.
struct TreeEntry {
    name: String,
    is_dir: bool,
}

/// Lists a directory's visible entries in display order.
type EntryReader<'a> = &'a dyn Fn(&Path) -> io::Result<Vec<TreeEntry>>;

/// Rendering options distinguishing the two views.
#[derive(Clone, Copy)]
struct TreeStyle {
    annotate: bool,
    max_entries: Option<usize>,
}

/// Render the annotated tree of `path`, descending at most `max_depth` levels.
///
/// A depth of 0 renders nothing. Unreadable directories become a single
/// placeholder line.
///
/// # Examples
///
/// ```text
/// ├── src/ # Source code
/// │   └── index.js
/// └── package.json # Project manifest and scripts
/// ```
#[must_use]
pub fn render_tree(path: &Path, max_depth: usize) -> String {
    render(
        path,
        max_depth,
        TreeStyle {
            annotate: true,
            max_entries: None,
        },
    )
}

/// Render the truncated, unannotated tree used in AI prompts.
#[must_use]
pub fn render_prompt_tree(path: &Path, max_depth: usize) -> String {
    render(
        path,
        max_depth,
        TreeStyle {
            annotate: false,
            max_entries: Some(PROMPT_MAX_ENTRIES),
        },
    )
}

fn render(path: &Path, max_depth: usize, style: TreeStyle) -> String {
    render_with(path, max_depth, style, &read_sorted_entries)
}

fn render_with(path: &Path, max_depth: usize, style: TreeStyle, read: EntryReader<'_>) -> String {
    let mut out = String::new();
    render_level(path, "", max_depth, style, read, &mut out);
    out
}

fn render_level(
    dir: &Path,
    prefix: &str,
    depth_left: usize,
    style: TreeStyle,
    read: EntryReader<'_>,
    out: &mut String,
) {
    if depth_left == 0 {
        return;
    }

    let entries = match read(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(path = %dir.display(), error = %e, "cannot read directory for tree");
            out.push_str(&format!("{prefix}{LAST_BRANCH}(unreadable directory)\n"));
            return;
        }
    };

    let shown = style
        .max_entries
        .map_or(entries.len(), |limit| entries.len().min(limit));
    let hidden = entries.len() - shown;

    for (idx, entry) in entries.iter().take(shown).enumerate() {
        let is_last = idx + 1 == shown && hidden == 0;
        let glyph = if is_last { LAST_BRANCH } else { BRANCH };

        let mut line = format!("{prefix}{glyph}{}", entry.name);
        if entry.is_dir {
            line.push('/');
        }
        if style.annotate
            && let Some(comment) = comment_for(entry)
        {
            line.push_str(" # ");
            line.push_str(comment);
        }
        out.push_str(&line);
        out.push('\n');

        if entry.is_dir {
            let child_prefix = format!("{prefix}{}", if is_last { BLANK } else { CONTINUATION });
            render_level(
                &dir.join(&entry.name),
                &child_prefix,
                depth_left - 1,
                style,
                read,
                out,
            );
        }
    }

    if hidden > 0 {
        out.push_str(&format!("{prefix}{LAST_BRANCH}... ({hidden} more)\n"));
    }
}

/// List the visible entries of `dir`: directories first, then by name.
fn read_sorted_entries(dir: &Path) -> io::Result<Vec<TreeEntry>> {
    let mut entries: Vec<TreeEntry> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_hidden_entry(&name) {
                return None;
            }

            let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());
            Some(TreeEntry { name, is_dir })
        })
        .collect();

    entries.sort_by(|a, b| b.is_dir.cmp(&a.is_dir).then_with(|| compare_names(&a.name, &b.name)));

    Ok(entries)
}

/// Case-insensitive comparison with a case-sensitive tie-break.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn is_hidden_entry(name: &str) -> bool {
    name.starts_with('.') || NOISE_DIRS.contains(&name)
}

fn comment_for(entry: &TreeEntry) -> Option<&'static str> {
    let table = if entry.is_dir {
        DIR_COMMENTS
    } else {
        FILE_COMMENTS
    };

    table
        .iter()
        .find(|(name, _)| *name == entry.name)
        .map(|(_, comment)| *comment)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::Path;

    use tempfile::TempDir;

    fn create_file(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_depth_zero_is_empty() {
        let tmp = TempDir::new().unwrap();
        create_file(&tmp.path().join("src/index.js"));

        assert_eq!(render_tree(tmp.path(), 0), "");
        assert_eq!(render_prompt_tree(tmp.path(), 0), "");
        assert_eq!(render_tree(Path::new("/nonexistent/path/12345"), 0), "");
    }

    #[test]
    fn test_render_tree_layout() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();

        create_file(&root.join("src/index.js"));
        create_file(&root.join("src/components/Button.jsx"));
        create_file(&root.join("package.json"));
        create_file(&root.join("README.md"));

        let expected = "\
├── src/ # Source code
│   ├── components/ # Reusable UI components
│   └── index.js
├── package.json # Project manifest and scripts
└── README.md # Project documentation
";

        assert_eq!(render_tree(root, 2), expected);
    }

    #[test]
    fn test_last_directory_uses_blank_prefix() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();

        create_file(&root.join("lib/a.js"));

        assert_eq!(render_tree(root, 3), "└── lib/ # Shared library code\n    └── a.js\n");
    }

    #[test]
    fn test_noise_and_hidden_entries_are_skipped() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();

        create_file(&root.join("node_modules/x/index.js"));
        create_file(&root.join("dist/bundle.js"));
        create_file(&root.join("coverage/lcov.info"));
        create_file(&root.join(".env"));
        create_file(&root.join(".github/ci.yml"));
        create_file(&root.join("main.py"));

        let tree = render_tree(root, 3);

        assert_eq!(tree, "└── main.py\n");
    }

    #[test]
    fn test_sorting_is_case_insensitive() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();

        create_file(&root.join("b.txt"));
        create_file(&root.join("A.txt"));
        create_file(&root.join("c.txt"));

        assert_eq!(render_tree(root, 1), "├── A.txt\n├── b.txt\n└── c.txt\n");
    }

    #[test]
    fn test_unreadable_directory_placeholder() {
        let tree = render_tree(Path::new("/nonexistent/path/12345"), 2);
        assert_eq!(tree, "└── (unreadable directory)\n");
    }

    #[test]
    fn test_unreadable_subdirectory_keeps_siblings() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();

        create_file(&root.join("lib/a.js"));
        create_file(&root.join("src/index.js"));
        create_file(&root.join("README.md"));

        let vanished = root.join("lib");
        let read = |dir: &Path| {
            if dir == vanished {
                Err(io::Error::from(io::ErrorKind::NotFound))
            } else {
                read_sorted_entries(dir)
            }
        };

        let style = TreeStyle {
            annotate: true,
            max_entries: None,
        };

        let expected = "\
├── lib/ # Shared library code
│   └── (unreadable directory)
├── src/ # Source code
│   └── index.js
└── README.md # Project documentation
";

        assert_eq!(render_with(root, 3, style, &read), expected);
    }

    #[test]
    fn test_prompt_tree_caps_entries_and_skips_comments() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();

        for i in 0..20 {
            create_file(&root.join(format!("file{i:02}.js")));
        }
        create_file(&root.join("src/index.js"));

        let tree = render_prompt_tree(root, 2);
        let lines: Vec<&str> = tree.lines().collect();

        assert_eq!(lines[0], "├── src/");
        assert_eq!(lines[1], "│   └── index.js");
        assert_eq!(lines.len(), 2 + 14 + 1);
        assert_eq!(lines.last().copied(), Some("└── ... (6 more)"));
        assert!(!tree.contains('#'));
    }
}

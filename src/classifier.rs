//! Heuristic project classification.
//!
//! Classification is a pure function of [`ProjectMetadata`] and the rendered
//! directory tree. It runs in three passes, each driven by a rule table:
//!
//! 1. [`CATEGORY_RULES`]: ordered `(predicate, tag)` pairs, first match wins.
//!    The matched category contributes the project type, base purpose,
//!    technologies and features.
//! 2. [`PURPOSE_OVERLAYS`]: keyword rules applied regardless of category.
//!    Every match appends features; the last match sets the purpose.
//! 3. [`TECH_OVERLAYS`]: technology tags (TypeScript, Tailwind, ORMs, test
//!    runners) that append technologies and features.
//!
//! Dependency checks are case-insensitive substring matches over runtime and
//! development dependencies together.

use std::collections::BTreeSet;

use crate::metadata::ProjectMetadata;

/// Derived description of a project.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassificationResult {
    /// Category label, e.g. `"Backend API"`
    pub project_type: String,

    /// One-sentence description of what the project is for
    pub main_purpose: String,

    /// Technologies in order of relevance, without duplicates
    pub technologies: Vec<String>,

    /// Inferred features, without duplicates
    pub features: Vec<String>,

    /// Architecture hint from the directory layout; empty when unknown
    pub architecture_note: String,
}

/// Lowercased view of the metadata the rules are evaluated against.
struct Signals<'a> {
    name: String,
    dependencies: Vec<String>,
    scripts: &'a [String],
    extensions: &'a BTreeSet<String>,
    controller_signal: bool,
}

impl<'a> Signals<'a> {
    fn new(metadata: &'a ProjectMetadata) -> Self {
        Self {
            name: metadata.name.to_lowercase(),
            dependencies: metadata
                .all_dependencies()
                .map(str::to_lowercase)
                .collect(),
            scripts: &metadata.script_names,
            extensions: &metadata.file_extensions,
            controller_signal: metadata.has_controller_signal,
        }
    }

    fn any_dependency(&self, needles: &[&str]) -> bool {
        self.dependencies
            .iter()
            .any(|dep| needles.iter().any(|needle| dep.contains(needle)))
    }

    fn name_contains(&self, needles: &[&str]) -> bool {
        needles.iter().any(|needle| self.name.contains(needle))
    }

    fn has_extension(&self, ext: &str) -> bool {
        self.extensions.contains(ext)
    }

    fn has_script(&self, name: &str) -> bool {
        self.scripts.iter().any(|s| s == name)
    }
}

// ── Category rules ──────────────────────────────────────────────────────

/// Top-level category selected by the first matching rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CategoryTag {
    BackendApi,
    React,
    Vue,
    Angular,
    ReactNative,
    Desktop,
    Python,
    Node,
}

struct CategoryRule {
    tag: CategoryTag,
    matches: fn(&Signals<'_>) -> bool,
}

/// Ordered category rules; anything unmatched is generic software.
const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        tag: CategoryTag::BackendApi,
        matches: |s| {
            s.any_dependency(&["express", "fastify", "koa", "nestjs"])
                || s.controller_signal
                || s.has_script("start")
        },
    },
    CategoryRule {
        tag: CategoryTag::React,
        matches: |s| s.any_dependency(&["react"]),
    },
    CategoryRule {
        tag: CategoryTag::Vue,
        matches: |s| s.any_dependency(&["vue"]),
    },
    CategoryRule {
        tag: CategoryTag::Angular,
        matches: |s| s.any_dependency(&["angular", "@angular"]),
    },
    CategoryRule {
        tag: CategoryTag::ReactNative,
        matches: |s| s.any_dependency(&["react-native", "expo"]),
    },
    CategoryRule {
        tag: CategoryTag::Desktop,
        matches: |s| s.any_dependency(&["electron"]),
    },
    CategoryRule {
        tag: CategoryTag::Python,
        matches: |s| s.has_extension(".py") || s.any_dependency(&["django", "flask"]),
    },
    CategoryRule {
        tag: CategoryTag::Node,
        matches: |s| !s.dependencies.is_empty(),
    },
];

/// React build flavour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReactFlavor {
    Next,
    Vite,
    Plain,
}

/// Python web framework flavour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PythonFlavor {
    Django,
    Flask,
    Generic,
}

/// The project category, including framework sub-decisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    BackendApi,
    React(ReactFlavor),
    Vue,
    Angular,
    ReactNative,
    Desktop,
    Python(PythonFlavor),
    Node,
    Software,
}

/// Static description attached to a category.
struct CategoryProfile {
    main_purpose: &'static str,
    technologies: &'static [&'static str],
    features: &'static [&'static str],
}

impl Category {
    /// Determine the category of a project.
    #[must_use]
    pub fn detect(metadata: &ProjectMetadata) -> Self {
        Self::from_signals(&Signals::new(metadata))
    }

    fn from_signals(signals: &Signals<'_>) -> Self {
        let Some(rule) = CATEGORY_RULES.iter().find(|rule| (rule.matches)(signals)) else {
            return Self::Software;
        };

        match rule.tag {
            CategoryTag::BackendApi => Self::BackendApi,
            CategoryTag::React => Self::React(
                if signals.any_dependency(&["next"]) {
                    ReactFlavor::Next
                } else if signals.any_dependency(&["vite"])
                    || signals.scripts.iter().any(|s| s.contains("vite"))
                {
                    ReactFlavor::Vite
                } else {
                    ReactFlavor::Plain
                },
            ),
            CategoryTag::Vue => Self::Vue,
            CategoryTag::Angular => Self::Angular,
            CategoryTag::ReactNative => Self::ReactNative,
            CategoryTag::Desktop => Self::Desktop,
            CategoryTag::Python => Self::Python(if signals.any_dependency(&["django"]) {
                PythonFlavor::Django
            } else if signals.any_dependency(&["flask"]) {
                PythonFlavor::Flask
            } else {
                PythonFlavor::Generic
            }),
            CategoryTag::Node => Self::Node,
        }
    }

    /// Human-readable category label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BackendApi => "Backend API",
            Self::React(ReactFlavor::Next) => "Next.js Application",
            Self::React(_) => "React Application",
            Self::Vue => "Vue.js Application",
            Self::Angular => "Angular Application",
            Self::ReactNative => "React Native Mobile App",
            Self::Desktop => "Desktop Application",
            Self::Python(_) => "Python Application",
            Self::Node => "Node.js",
            Self::Software => "Software",
        }
    }

    #[allow(clippy::too_many_lines)]
    const fn profile(self) -> CategoryProfile {
        match self {
            Self::BackendApi => CategoryProfile {
                main_purpose: "RESTful API server providing backend services",
                technologies: &["Node.js"],
                features: &[
                    "RESTful API endpoints",
                    "Request routing and middleware",
                    "Centralized error handling and validation",
                ],
            },
            Self::React(ReactFlavor::Next) => CategoryProfile {
                main_purpose: "Full-stack React application built with Next.js",
                technologies: &["React", "Next.js"],
                features: &[
                    "Server-side rendering (SSR)",
                    "API routes",
                    "Static site generation",
                    "File-based routing",
                ],
            },
            Self::React(ReactFlavor::Vite) => CategoryProfile {
                main_purpose: "Modern single-page React application",
                technologies: &["React", "Vite"],
                features: &[
                    "Instant dev server with hot module replacement",
                    "Optimized production builds",
                    "Reusable component architecture",
                ],
            },
            Self::React(ReactFlavor::Plain) => CategoryProfile {
                main_purpose: "Interactive web application built with React",
                technologies: &["React"],
                features: &[
                    "Reusable component architecture",
                    "Virtual DOM for efficient rendering",
                    "Responsive user interface",
                ],
            },
            Self::Vue => CategoryProfile {
                main_purpose: "Progressive web application built with Vue.js",
                technologies: &["Vue.js"],
                features: &[
                    "Reactive data binding",
                    "Single-file components",
                    "Declarative rendering",
                ],
            },
            Self::Angular => CategoryProfile {
                main_purpose: "Enterprise-grade web application built with Angular",
                technologies: &["Angular"],
                features: &[
                    "Dependency injection",
                    "Modular application structure",
                    "Two-way data binding",
                ],
            },
            Self::ReactNative => CategoryProfile {
                main_purpose: "Cross-platform mobile application",
                technologies: &["React Native"],
                features: &[
                    "Native iOS and Android support",
                    "Single codebase for multiple platforms",
                    "Access to native device APIs",
                ],
            },
            Self::Desktop => CategoryProfile {
                main_purpose: "Cross-platform desktop application",
                technologies: &["Electron"],
                features: &[
                    "Native desktop integration",
                    "Runs on Windows, macOS and Linux",
                    "Web technologies for the user interface",
                ],
            },
            Self::Python(PythonFlavor::Django) => CategoryProfile {
                main_purpose: "Web application built with Django",
                technologies: &["Python", "Django"],
                features: &[
                    "Django ORM and admin interface",
                    "Built-in authentication",
                    "URL routing and class-based views",
                ],
            },
            Self::Python(PythonFlavor::Flask) => CategoryProfile {
                main_purpose: "Lightweight web service built with Flask",
                technologies: &["Python", "Flask"],
                features: &[
                    "Minimal, extensible web framework",
                    "RESTful request handling",
                    "Jinja2 templating",
                ],
            },
            Self::Python(PythonFlavor::Generic) => CategoryProfile {
                main_purpose: "Python application",
                technologies: &["Python"],
                features: &[
                    "Clean, modular Python code",
                    "Easy to extend",
                    "Cross-platform compatibility",
                ],
            },
            Self::Node => CategoryProfile {
                main_purpose: "Node.js application",
                technologies: &["Node.js"],
                features: &[
                    "Modular JavaScript codebase",
                    "Built on the npm package ecosystem",
                    "Cross-platform runtime",
                ],
            },
            Self::Software => CategoryProfile {
                main_purpose: "Software project",
                technologies: &[],
                features: &[
                    "Well-organized project structure",
                    "Easy to set up and run",
                    "Open for contributions",
                ],
            },
        }
    }
}

/// Extra React features keyed on supporting libraries.
const REACT_ADDONS: &[(&[&str], &str)] = &[
    (&["router"], "Client-side routing"),
    (&["redux", "zustand"], "State management"),
    (&["query", "swr"], "Data fetching optimization"),
];

// ── Overlays ────────────────────────────────────────────────────────────

/// Keyword rule that may replace the purpose and always adds features.
struct PurposeOverlay {
    name_keywords: &'static [&'static str],
    dependency_keywords: &'static [&'static str],
    main_purpose: &'static str,
    features: &'static [&'static str],
}

/// Purpose overlays in evaluation order; the last match sets the purpose.
const PURPOSE_OVERLAYS: &[PurposeOverlay] = &[
    PurposeOverlay {
        name_keywords: &["weather"],
        dependency_keywords: &["weather"],
        main_purpose: "Weather application providing real-time forecasts and conditions",
        features: &[
            "Real-time weather data",
            "Location-based forecasts",
            "Weather condition visualizations",
        ],
    },
    PurposeOverlay {
        name_keywords: &["todo", "task"],
        dependency_keywords: &[],
        main_purpose: "Task management application for organizing daily work",
        features: &[
            "Create, edit and delete tasks",
            "Task completion tracking",
            "Task filtering and organization",
        ],
    },
    PurposeOverlay {
        name_keywords: &["ecommerce", "shop"],
        dependency_keywords: &["stripe"],
        main_purpose: "E-commerce platform for browsing and purchasing products",
        features: &[
            "Product catalog browsing",
            "Shopping cart management",
            "Secure checkout and payments",
        ],
    },
    PurposeOverlay {
        name_keywords: &["blog"],
        dependency_keywords: &["contentful"],
        main_purpose: "Content management system for publishing articles",
        features: &[
            "Article publishing and editing",
            "Content categorization",
            "SEO-friendly pages",
        ],
    },
    PurposeOverlay {
        name_keywords: &["chat", "message"],
        dependency_keywords: &["socket.io"],
        main_purpose: "Real-time messaging application",
        features: &[
            "Real-time message delivery",
            "Conversation history",
            "Online presence indicators",
        ],
    },
];

/// Technology tag appended regardless of category.
struct TechOverlay {
    matches: fn(&Signals<'_>) -> bool,
    technology: Option<&'static str>,
    features: &'static [&'static str],
}

const TECH_OVERLAYS: &[TechOverlay] = &[
    TechOverlay {
        matches: |s| {
            s.any_dependency(&["typescript"]) || s.has_extension(".ts") || s.has_extension(".tsx")
        },
        technology: Some("TypeScript"),
        features: &[
            "Type-safe codebase with TypeScript",
            "Enhanced editor support and autocompletion",
        ],
    },
    TechOverlay {
        matches: |s| s.any_dependency(&["tailwind"]),
        technology: None,
        features: &[
            "Utility-first styling with Tailwind CSS",
            "Responsive design out of the box",
        ],
    },
    TechOverlay {
        matches: |s| s.any_dependency(&["prisma", "mongoose", "sequelize"]),
        technology: None,
        features: &[
            "Database integration through an ORM",
            "Structured data models and queries",
        ],
    },
    TechOverlay {
        matches: |s| s.any_dependency(&["jest", "vitest", "cypress"]),
        technology: None,
        features: &["Automated testing setup", "Reliable regression checks"],
    },
];

/// Directory-name pairs that hint at an architecture, first match wins.
const ARCHITECTURE_HINTS: &[(&str, &str, &str)] = &[
    ("components", "hooks", "component-based with custom hooks"),
    ("controllers", "models", "MVC"),
    ("services", "utils", "service-oriented"),
];

// ── Technology names ────────────────────────────────────────────────────

/// Well-known packages and their display names.
///
/// An entry ending in `/` matches every package in that npm scope; other
/// entries match the package name exactly.
const KNOWN_PACKAGES: &[(&str, &str)] = &[
    ("react", "React"),
    ("react-dom", "React"),
    ("react-router-dom", "React Router"),
    ("react-router", "React Router"),
    ("next", "Next.js"),
    ("vite", "Vite"),
    ("vue", "Vue.js"),
    ("nuxt", "Nuxt"),
    ("@angular/", "Angular"),
    ("svelte", "Svelte"),
    ("react-native", "React Native"),
    ("expo", "Expo"),
    ("electron", "Electron"),
    ("express", "Express"),
    ("fastify", "Fastify"),
    ("koa", "Koa"),
    ("@nestjs/", "NestJS"),
    ("typescript", "TypeScript"),
    ("tailwindcss", "Tailwind CSS"),
    ("redux", "Redux"),
    ("@reduxjs/", "Redux Toolkit"),
    ("zustand", "Zustand"),
    ("@tanstack/react-query", "TanStack Query"),
    ("swr", "SWR"),
    ("axios", "Axios"),
    ("prisma", "Prisma"),
    ("@prisma/", "Prisma"),
    ("mongoose", "Mongoose"),
    ("sequelize", "Sequelize"),
    ("socket.io", "Socket.IO"),
    ("stripe", "Stripe"),
    ("contentful", "Contentful"),
    ("graphql", "GraphQL"),
    ("@apollo/", "Apollo"),
    ("jest", "Jest"),
    ("vitest", "Vitest"),
    ("cypress", "Cypress"),
    ("webpack", "Webpack"),
    ("eslint", "ESLint"),
    ("prettier", "Prettier"),
];

/// Languages inferred from file extensions.
const LANGUAGE_EXTENSIONS: &[(&str, &str)] = &[
    (".ts", "TypeScript"),
    (".tsx", "TypeScript"),
    (".js", "JavaScript"),
    (".jsx", "JavaScript"),
    (".mjs", "JavaScript"),
    (".py", "Python"),
    (".html", "HTML"),
    (".css", "CSS"),
    (".scss", "Sass"),
];

/// Display name of a well-known package, if any.
#[must_use]
pub fn known_package(name: &str) -> Option<&'static str> {
    let name = name.to_lowercase();

    KNOWN_PACKAGES
        .iter()
        .find(|(key, _)| {
            if key.ends_with('/') {
                name.starts_with(key)
            } else {
                name == *key
            }
        })
        .map(|(_, display)| *display)
}

// ── Classification ──────────────────────────────────────────────────────

/// Classify a project.
///
/// # Arguments
///
/// * `metadata` - The project snapshot
/// * `tree` - The rendered directory tree, used for the architecture note
///
/// # Returns
///
/// A [`ClassificationResult`]. The function is pure: identical inputs yield
/// identical results.
#[must_use]
pub fn classify(metadata: &ProjectMetadata, tree: &str) -> ClassificationResult {
    let signals = Signals::new(metadata);
    let category = Category::from_signals(&signals);
    let profile = category.profile();

    let mut main_purpose = profile.main_purpose.to_string();
    let mut technologies = UniqueList::default();
    let mut features = UniqueList::default();

    technologies.extend(profile.technologies.iter().copied());
    features.extend(profile.features.iter().copied());

    if matches!(category, Category::React(_)) {
        for (needles, feature) in REACT_ADDONS {
            if signals.any_dependency(needles) {
                features.push(feature);
            }
        }
    }

    for overlay in PURPOSE_OVERLAYS {
        if signals.name_contains(overlay.name_keywords)
            || signals.any_dependency(overlay.dependency_keywords)
        {
            main_purpose = overlay.main_purpose.to_string();
            features.extend(overlay.features.iter().copied());
        }
    }

    technologies.extend(metadata.all_dependencies().filter_map(known_package));

    for (ext, language) in LANGUAGE_EXTENSIONS {
        if signals.has_extension(ext) {
            technologies.push(language);
        }
    }

    for overlay in TECH_OVERLAYS {
        if (overlay.matches)(&signals) {
            technologies.extend(overlay.technology);
            features.extend(overlay.features.iter().copied());
        }
    }

    ClassificationResult {
        project_type: category.label().to_string(),
        main_purpose,
        technologies: technologies.into_inner(),
        features: features.into_inner(),
        architecture_note: architecture_note(tree).to_string(),
    }
}

/// Infer an architecture style from directory names in the rendered tree.
#[must_use]
pub fn architecture_note(tree: &str) -> &'static str {
    ARCHITECTURE_HINTS
        .iter()
        .find(|(a, b, _)| tree.contains(a) && tree.contains(b))
        .map_or("", |(_, _, note)| *note)
}

/// Insertion-ordered list that ignores duplicates.
#[derive(Default)]
struct UniqueList(Vec<String>);

impl UniqueList {
    fn push(&mut self, item: &str) {
        if !self.0.iter().any(|existing| existing == item) {
            self.0.push(item.to_string());
        }
    }

    fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl<'a> Extend<&'a str> for UniqueList {
    fn extend<T: IntoIterator<Item = &'a str>>(&mut self, iter: T) {
        for item in iter {
            self.push(item);
        }
    }
}

//! Content Catalogs
//!
//! Element records loaded from static JSON files, one file per technology.
//! Each file is a map of element identifier to record; a record carries the
//! descriptive fields used for browsing and search, the ordered narration
//! steps, and the exercises appended after the last step.
//!
//! # Design Philosophy
//!
//! Catalogs are immutable once loaded. The cache is an explicitly
//! constructed, lifetime-scoped [`CatalogStore`] rather than a process-wide
//! singleton, so tests (and embedders) instantiate fresh state per case.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::exercise::Exercise;

/// Technologies praxis ships catalogs for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Technology {
    /// HTML tags
    Html,
    /// CSS properties
    Css,
    /// JavaScript concepts
    JavaScript,
    /// TypeScript concepts
    TypeScript,
    /// React concepts
    React,
    /// Vue concepts
    Vue,
    /// Python concepts
    Python,
}

impl Technology {
    /// Every supported technology, in display order.
    pub const ALL: [Technology; 7] = [
        Technology::Html,
        Technology::Css,
        Technology::JavaScript,
        Technology::TypeScript,
        Technology::React,
        Technology::Vue,
        Technology::Python,
    ];

    /// Catalog file name for this technology.
    #[must_use]
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Html => "html.json",
            Self::Css => "css.json",
            Self::JavaScript => "javascript.json",
            Self::TypeScript => "typescript.json",
            Self::React => "react.json",
            Self::Vue => "vue.json",
            Self::Python => "python.json",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Html => "HTML",
            Self::Css => "CSS",
            Self::JavaScript => "JavaScript",
            Self::TypeScript => "TypeScript",
            Self::React => "React",
            Self::Vue => "Vue",
            Self::Python => "Python",
        }
    }

    /// Parse a technology from a string (CLI and config input).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "html" => Some(Self::Html),
            "css" => Some(Self::Css),
            "js" | "javascript" => Some(Self::JavaScript),
            "ts" | "typescript" => Some(Self::TypeScript),
            "react" => Some(Self::React),
            "vue" => Some(Self::Vue),
            "py" | "python" => Some(Self::Python),
            _ => None,
        }
    }
}

impl std::fmt::Display for Technology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A visual demo fragment shown during a step's Visual phase.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualDemo {
    /// The demo fragment (markup or plain text the surface renders as-is).
    pub content: String,
}

/// One narration step. Index within the element is its identity.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentStep {
    /// Step heading, revealed in the Title phase.
    #[serde(default)]
    pub title: Option<String>,
    /// Body text, typed character by character.
    #[serde(default)]
    pub text: Option<String>,
    /// Code snippet, typed character by character.
    #[serde(default)]
    pub code: Option<String>,
    /// Visual demo fragment, held on screen during the Visual phase.
    #[serde(default)]
    pub visual_demo: Option<VisualDemo>,
}

impl ContentStep {
    /// Step with only body text (test and fixture helper).
    #[must_use]
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }
}

/// A named attribute of an element (HTML attribute, CSS value set, ...).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name.
    pub name: String,
    /// Accepted or notable values.
    #[serde(default)]
    pub values: Vec<String>,
}

/// A worked example attached to an element.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CodeExample {
    /// Example title.
    pub title: String,
    /// Example source.
    #[serde(default)]
    pub code: String,
}

/// One catalog record: an element of a technology.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Element {
    /// Display name (e.g. `flex`, `<article>`, `useState`).
    pub name: String,
    /// One-paragraph description.
    #[serde(default)]
    pub description: String,
    /// Category within the technology (e.g. "layout", "semantic").
    #[serde(default)]
    pub category: String,
    /// Attributes or accepted values.
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    /// Worked examples.
    #[serde(default)]
    pub examples: Vec<CodeExample>,
    /// Identifiers of related elements.
    #[serde(default)]
    pub related: Vec<String>,
    /// Ordered narration steps.
    #[serde(default)]
    pub steps: Vec<ContentStep>,
    /// Exercises appended after the last step.
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

/// Errors from catalog loading.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read catalog file {path}")]
    Io {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The catalog file is not valid JSON of the expected shape.
    #[error("failed to parse catalog file {path}")]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

/// An immutable, ordered catalog of elements for one technology.
///
/// Iteration order is the insertion order of the source file, which is also
/// the tie-break order for search ranking.
#[derive(Clone, Debug)]
pub struct Catalog {
    technology: Technology,
    elements: HashMap<String, Element>,
    order: Vec<String>,
}

impl Catalog {
    /// Build a catalog from (id, element) pairs, preserving order.
    #[must_use]
    pub fn from_entries(
        technology: Technology,
        entries: impl IntoIterator<Item = (String, Element)>,
    ) -> Self {
        let mut elements = HashMap::new();
        let mut order = Vec::new();
        for (id, element) in entries {
            if elements.insert(id.clone(), element).is_none() {
                order.push(id);
            }
        }
        Self {
            technology,
            elements,
            order,
        }
    }

    /// Parse a catalog from JSON text (a map of element id to record).
    pub fn from_json(technology: Technology, json: &str) -> Result<Self, serde_json::Error> {
        // serde_json maps lose ordering; re-walk the document for it.
        let value: serde_json::Value = serde_json::from_str(json)?;
        let mut entries = Vec::new();
        if let Some(map) = value.as_object() {
            for (id, record) in map {
                let element: Element = serde_json::from_value(record.clone())?;
                entries.push((id.clone(), element));
            }
        }
        Ok(Self::from_entries(technology, entries))
    }

    /// The technology this catalog belongs to.
    #[must_use]
    pub fn technology(&self) -> Technology {
        self.technology
    }

    /// Look up an element by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    /// Iterate (id, element) pairs in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Element)> {
        self.order
            .iter()
            .filter_map(|id| self.elements.get(id).map(|e| (id.as_str(), e)))
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Lifetime-scoped catalog cache over a content directory.
///
/// Loads each technology's file at most once and keeps it for the store's
/// lifetime. Constructed explicitly by the embedder; never global.
#[derive(Debug)]
pub struct CatalogStore {
    root: PathBuf,
    loaded: HashMap<Technology, Catalog>,
}

impl CatalogStore {
    /// Create a store over a content directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            loaded: HashMap::new(),
        }
    }

    /// The content directory this store reads from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load (or return the cached) catalog for a technology.
    pub fn load(&mut self, technology: Technology) -> Result<&Catalog, CatalogError> {
        if !self.loaded.contains_key(&technology) {
            let path = self.root.join(technology.file_name());
            tracing::debug!(%technology, path = %path.display(), "loading catalog");
            let json = fs::read_to_string(&path).map_err(|source| CatalogError::Io {
                path: path.clone(),
                source,
            })?;
            let catalog = Catalog::from_json(technology, &json)
                .map_err(|source| CatalogError::Parse { path, source })?;
            self.loaded.insert(technology, catalog);
        }
        Ok(&self.loaded[&technology])
    }

    /// Return a catalog if it has already been loaded.
    #[must_use]
    pub fn get(&self, technology: Technology) -> Option<&Catalog> {
        self.loaded.get(&technology)
    }
}

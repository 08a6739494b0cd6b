//! File classification by name and extension.
//!
//! Rules are evaluated in a fixed precedence and the first match wins:
//!
//! 1. the file name contains the living-scroll marker
//! 2. the file name contains a project marker
//! 3. the extension matches a category's extension list, in table order
//! 4. anything else is [`Category::Other`]
//!
//! All matching is case-insensitive. Markers and extensions are lowercased
//! once when the [`Classifier`] is built.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use liberator_core::{Category, EventLog};

/// Rule tables for classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationRules {
    /// Substring marking a living scroll.
    pub living_scroll_marker: String,
    /// Substrings marking a project file.
    pub project_markers: Vec<String>,
    /// Extensions per category, including the leading dot, in precedence order.
    pub extensions: Vec<(Category, Vec<String>)>,
}

impl Default for ClassificationRules {
    fn default() -> Self {
        fn list(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }

        Self {
            living_scroll_marker: "living_scroll".to_string(),
            project_markers: list(&["fort-", "Fort", "FORT"]),
            extensions: vec![
                (Category::Documents, list(&[".md", ".txt", ".docx", ".pdf"])),
                (Category::Code, list(&[".py", ".js", ".html", ".css", ".json"])),
                (Category::Audio, list(&[".wav", ".mp3", ".flac", ".m4a"])),
                (Category::Images, list(&[".png", ".jpg", ".jpeg", ".gif", ".svg"])),
                (Category::Config, list(&[".ini", ".cfg", ".conf", ".toml", ".yaml"])),
            ],
        }
    }
}

/// Maps paths to categories. Pure: never touches the filesystem.
#[derive(Debug, Clone)]
pub struct Classifier {
    living_scroll_marker: String,
    project_markers: Vec<String>,
    extensions: Vec<(Category, Vec<String>)>,
}

impl Classifier {
    /// Create a classifier with the built-in rules.
    pub fn new() -> Self {
        Self::with_rules(&ClassificationRules::default())
    }

    /// Create a classifier from a rule table.
    pub fn with_rules(rules: &ClassificationRules) -> Self {
        let mut project_markers: Vec<String> = rules
            .project_markers
            .iter()
            .map(|m| m.to_lowercase())
            .filter(|m| !m.is_empty())
            .collect();
        project_markers.dedup();

        let extensions = rules
            .extensions
            .iter()
            .map(|(category, exts)| {
                let exts = exts
                    .iter()
                    .map(|e| {
                        let e = e.to_lowercase();
                        if e.starts_with('.') { e } else { format!(".{e}") }
                    })
                    .collect();
                (*category, exts)
            })
            .collect();

        Self {
            living_scroll_marker: rules.living_scroll_marker.to_lowercase(),
            project_markers,
            extensions,
        }
    }

    /// Assign exactly one category to a path.
    pub fn classify(&self, path: &Path) -> Category {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if !self.living_scroll_marker.is_empty() && name.contains(&self.living_scroll_marker) {
            return Category::LivingScrolls;
        }

        if self.project_markers.iter().any(|m| name.contains(m.as_str())) {
            return Category::FortProjects;
        }

        let suffix = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()));
        if let Some(suffix) = suffix {
            for (category, exts) in &self.extensions {
                if exts.iter().any(|e| *e == suffix) {
                    return *category;
                }
            }
        }

        Category::Other
    }

    /// Group paths by category.
    pub fn organize<I, P>(&self, paths: I) -> Organization
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut members: BTreeMap<Category, Vec<PathBuf>> = BTreeMap::new();
        for path in paths {
            let path = path.as_ref();
            members
                .entry(self.classify(path))
                .or_default()
                .push(path.to_path_buf());
        }

        let mut events = EventLog::new();
        events.info("Organization suggestion:");
        for (category, files) in &members {
            events.info(format!("  {category}: {} files", files.len()));
        }

        Organization { members, events }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Paths grouped by category.
#[derive(Debug, Clone)]
pub struct Organization {
    /// Members of each non-empty category, in input order.
    pub members: BTreeMap<Category, Vec<PathBuf>>,
    /// Log events.
    pub events: EventLog,
}

impl Organization {
    /// File count per non-empty category.
    pub fn counts(&self) -> BTreeMap<Category, usize> {
        self.members.iter().map(|(c, m)| (*c, m.len())).collect()
    }

    /// Total files classified.
    pub fn total(&self) -> usize {
        self.members.values().map(Vec::len).sum()
    }
}

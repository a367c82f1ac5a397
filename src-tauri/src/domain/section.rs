//! Section Entity
//!
//! Named, collapsible grouping of todos.

use serde::{Deserialize, Serialize};
use super::entity::Entity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Slug, unique within the document
    pub id: String,
    pub name: String,
    pub expanded: bool,
}

impl Section {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            expanded: true,
        }
    }
}

impl Entity for Section {
    type Id = String;
    const KIND: &'static str = "Section";

    fn id(&self) -> Self::Id {
        self.id.clone()
    }
}

/// Id of the section that receives todos with no section
pub const DEFAULT_SECTION_ID: &str = "today";

/// `today` and `later`, both expanded
pub fn default_sections() -> Vec<Section> {
    vec![Section::new("today", "Today"), Section::new("later", "Later")]
}

/// Lowercase ASCII alphanumeric runs joined by `-`
pub fn slugify(name: &str) -> String {
    let slug = name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "section".to_string()
    } else {
        slug
    }
}

/// First of `slug`, `slug-2`, `slug-3`, ... not present in `sections`
pub fn unique_slug(name: &str, sections: &[Section]) -> String {
    let base = slugify(name);
    let taken = |id: &str| sections.iter().any(|s| s.id == id);
    if !taken(&base) {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}-{}", base, n);
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

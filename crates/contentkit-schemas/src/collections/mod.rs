//! Typed entries and schemas for the site's content collections
//!
//! Copyright (c) 2025 Contentkit Team
//! Licensed under the Apache-2.0 license

pub mod blog;
pub mod projects;

pub use blog::{BlogEntry, BlogSchema};
pub use projects::{ProjectEntry, ProjectSchema, HERO_IMAGE_PATTERN};

use crate::validation::{ValidationContext, ValidationError, ValidationResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// A validated entry of any registered collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ContentEntry {
    Blog(BlogEntry),
    Project(ProjectEntry),
}

impl ContentEntry {
    pub fn title(&self) -> &str {
        match self {
            ContentEntry::Blog(entry) => &entry.title,
            ContentEntry::Project(entry) => &entry.title,
        }
    }

    /// The normalized record, as consumed by page rendering
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl From<BlogEntry> for ContentEntry {
    fn from(entry: BlogEntry) -> Self {
        ContentEntry::Blog(entry)
    }
}

impl From<ProjectEntry> for ContentEntry {
    fn from(entry: ProjectEntry) -> Self {
        ContentEntry::Project(entry)
    }
}

/// Build the typed entry from an object that already passed its schema
pub(crate) fn into_typed<T: DeserializeOwned>(
    normalized: Map<String, Value>,
    collection: &str,
    ctx: &ValidationContext,
) -> ValidationResult<T> {
    serde_json::from_value(Value::Object(normalized)).map_err(|e| {
        ValidationError::new(
            &ctx.path,
            format!("Failed to build {} entry: {}", collection, e),
        )
        .into()
    })
}

//! The `projects` collection: showcased projects with a link and tech image
//!
//! Copyright (c) 2025 Contentkit Team
//! Licensed under the Apache-2.0 license

use crate::collections::into_typed;
use crate::validation::field::{array, string};
use crate::validation::{ObjectSchema, SchemaValidator, ValidationContext, ValidationResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

static HERO_IMAGE_REGEX: OnceLock<Regex> = OnceLock::new();

/// Image paths under a `tech/` directory with a png, jpg or webp extension
pub const HERO_IMAGE_PATTERN: &str = r"^(?:.*/)?tech/(?:[^/]+/)*[^/]+\.(?:png|jpg|webp)$";

fn hero_image_regex() -> &'static Regex {
    HERO_IMAGE_REGEX.get_or_init(|| {
        Regex::new(HERO_IMAGE_PATTERN).expect("HERO_IMAGE_PATTERN is a valid regex")
    })
}

/// A validated project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEntry {
    pub title: String,
    pub description: String,
    pub url: String,
    pub hero_image: String,
    pub languages: Vec<String>,
    pub badge: String,
}

/// Validator for the `projects` collection
#[derive(Debug, Clone)]
pub struct ProjectSchema {
    schema: ObjectSchema,
}

impl ProjectSchema {
    pub fn new() -> Self {
        let schema = ObjectSchema::new("projects")
            .field("title", string().non_empty())
            .field("description", string().non_empty())
            .field("url", string().non_empty().url())
            .field(
                "heroImage",
                string().matches(
                    hero_image_regex().clone(),
                    "a path under a tech/ directory ending in .png, .jpg or .webp",
                ),
            )
            .field(
                "languages",
                array(string()).unique("languages must be unique"),
            )
            .field("badge", string().non_empty());

        Self { schema }
    }
}

impl Default for ProjectSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaValidator for ProjectSchema {
    type Output = ProjectEntry;

    fn schema(&self) -> &ObjectSchema {
        &self.schema
    }

    fn validate_with_context(&self, input: &Value, ctx: &ValidationContext) -> ValidationResult<ProjectEntry> {
        let normalized = self.schema.validate(input, ctx)?;
        into_typed(normalized, "projects", ctx)
    }
}

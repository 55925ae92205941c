//! The `blog` collection: posts with a publication date and optional tags
//!
//! Copyright (c) 2025 Contentkit Team
//! Licensed under the Apache-2.0 license

use crate::collections::into_typed;
use crate::validation::field::{array, boolean, date, string};
use crate::validation::{ObjectSchema, SchemaValidator, ValidationContext, ValidationResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A validated blog post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogEntry {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub pub_date: DateTime<Utc>,
    #[serde(rename = "crosspostURL", default, skip_serializing_if = "Option::is_none")]
    pub crosspost_url: Option<String>,
    #[serde(default)]
    pub external: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Validator for the `blog` collection
#[derive(Debug, Clone)]
pub struct BlogSchema {
    schema: ObjectSchema,
}

impl BlogSchema {
    pub fn new() -> Self {
        let schema = ObjectSchema::new("blog")
            .field("title", string().non_empty())
            .field("subtitle", string().non_empty())
            .field("description", string().non_empty())
            .field("pubDate", date())
            .field("crosspostURL", string().optional())
            .field("external", boolean().default(json!(false)).optional())
            .field("updatedDate", string().optional())
            .field("heroImage", string().optional())
            .field("badge", string().optional())
            .field(
                "tags",
                array(string()).unique("tags must be unique").optional(),
            );

        Self { schema }
    }
}

impl Default for BlogSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaValidator for BlogSchema {
    type Output = BlogEntry;

    fn schema(&self) -> &ObjectSchema {
        &self.schema
    }

    fn validate_with_context(&self, input: &Value, ctx: &ValidationContext) -> ValidationResult<BlogEntry> {
        let normalized = self.schema.validate(input, ctx)?;
        into_typed(normalized, "blog", ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_post() -> Value {
        json!({
            "title": "Rewriting the build",
            "subtitle": "Part one",
            "description": "Notes from the rewrite",
            "pubDate": "2023-03-14",
        })
    }

    #[test]
    fn test_minimal_post_defaults_external() {
        let entry = BlogSchema::new().validate(&valid_post()).unwrap();
        assert!(!entry.external);
        assert_eq!(entry.pub_date.to_rfc3339(), "2023-03-14T00:00:00+00:00");
        assert_eq!(entry.tags, None);
    }

    #[test]
    fn test_crosspost_url_key_spelling() {
        let mut post = valid_post();
        post["crosspostURL"] = json!("https://dev.to/me/post");
        let entry = BlogSchema::new().validate(&post).unwrap();
        assert_eq!(entry.crosspost_url.as_deref(), Some("https://dev.to/me/post"));

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["crosspostURL"], "https://dev.to/me/post");
    }

    #[test]
    fn test_duplicate_tags_rejected() {
        let mut post = valid_post();
        post["tags"] = json!(["rust", "web", "rust"]);
        let errors = BlogSchema::new().validate(&post).unwrap_err();
        assert_eq!(errors.paths(), vec!["$.tags"]);
        assert!(errors.mentions("tags must be unique"));
    }
}

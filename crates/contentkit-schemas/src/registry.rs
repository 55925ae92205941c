//! Collection registry: the immutable name to schema table
//!
//! The registry is built once, at initialization time, and handed to
//! whatever consumes it (the loader, the batch check, the CLI). It holds only
//! rule definitions, so it can be shared across threads and validated
//! against concurrently.
//!
//! ```rust
//! use contentkit_schemas::content_collections;
//! use serde_json::json;
//!
//! let registry = content_collections();
//! assert_eq!(registry.names(), vec!["blog", "projects"]);
//!
//! let entry = registry.validate("projects", &json!({
//!     "title": "contentkit",
//!     "description": "Schemas for my site",
//!     "url": "https://example.com",
//!     "heroImage": "/tech/rust.png",
//!     "languages": ["Rust"],
//!     "badge": "WIP",
//! }));
//! assert!(entry.is_ok());
//! ```
//!
//! Copyright (c) 2025 Contentkit Team
//! Licensed under the Apache-2.0 license

use crate::collections::{BlogSchema, ContentEntry, ProjectSchema};
use crate::validation::{
    ObjectSchema, SchemaValidator, ValidationContext, ValidationErrors, ValidationMode,
};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Name of the blog collection
pub const BLOG: &str = "blog";
/// Name of the projects collection
pub const PROJECTS: &str = "projects";

/// Errors raised by registry lookups and registration
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Unknown collection '{name}'. Registered collections: {available}")]
    UnknownCollection { name: String, available: String },

    #[error("Collection '{name}' is already defined")]
    DuplicateCollection { name: String },

    #[error("Entry does not match the '{collection}' schema: {errors}")]
    Validation {
        collection: String,
        errors: ValidationErrors,
    },
}

/// A registered collection, erased over its typed entry
pub trait Collection: Send + Sync {
    /// The record shape entries are checked against
    fn schema(&self) -> &ObjectSchema;

    /// Validate a raw record into a typed entry
    fn validate_entry(
        &self,
        raw: &Value,
        ctx: &ValidationContext,
    ) -> Result<ContentEntry, ValidationErrors>;
}

impl<V> Collection for V
where
    V: SchemaValidator,
    V::Output: Into<ContentEntry>,
{
    fn schema(&self) -> &ObjectSchema {
        SchemaValidator::schema(self)
    }

    fn validate_entry(
        &self,
        raw: &Value,
        ctx: &ValidationContext,
    ) -> Result<ContentEntry, ValidationErrors> {
        self.validate_with_context(raw, ctx).map(Into::into)
    }
}

/// Immutable mapping from collection name to schema
#[derive(Clone)]
pub struct CollectionRegistry {
    collections: BTreeMap<String, Arc<dyn Collection>>,
}

impl fmt::Debug for CollectionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionRegistry")
            .field("collections", &self.names())
            .finish()
    }
}

impl CollectionRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Collection>> {
        self.collections.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.collections.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.collections.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Collection>)> {
        self.collections.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Validate a raw record against the named collection in standard mode
    pub fn validate(&self, name: &str, raw: &Value) -> Result<ContentEntry, RegistryError> {
        self.validate_with_context(name, raw, &ValidationContext::new(ValidationMode::Standard))
    }

    pub fn validate_with_context(
        &self,
        name: &str,
        raw: &Value,
        ctx: &ValidationContext,
    ) -> Result<ContentEntry, RegistryError> {
        let collection = self.lookup(name)?;
        collection
            .validate_entry(raw, ctx)
            .map_err(|errors| RegistryError::Validation {
                collection: name.to_string(),
                errors,
            })
    }

    /// Like [`get`](Self::get) but failing with the list of known names
    pub fn lookup(&self, name: &str) -> Result<&Arc<dyn Collection>, RegistryError> {
        self.get(name).ok_or_else(|| RegistryError::UnknownCollection {
            name: name.to_string(),
            available: self.names().join(", "),
        })
    }
}

/// Builder collecting collection definitions
#[derive(Default)]
pub struct RegistryBuilder {
    collections: BTreeMap<String, Arc<dyn Collection>>,
    duplicate: Option<String>,
}

impl RegistryBuilder {
    /// Register a collection under `name`
    pub fn define<C>(mut self, name: impl Into<String>, collection: C) -> Self
    where
        C: Collection + 'static,
    {
        let name = name.into();
        if self.collections.contains_key(&name) {
            self.duplicate.get_or_insert(name);
        } else {
            self.collections.insert(name, Arc::new(collection));
        }
        self
    }

    pub fn build(self) -> Result<CollectionRegistry, RegistryError> {
        if let Some(name) = self.duplicate {
            return Err(RegistryError::DuplicateCollection { name });
        }
        Ok(CollectionRegistry {
            collections: self.collections,
        })
    }
}

/// The site's collections: `blog` and `projects`
pub fn content_collections() -> CollectionRegistry {
    let mut collections: BTreeMap<String, Arc<dyn Collection>> = BTreeMap::new();
    collections.insert(BLOG.to_string(), Arc::new(BlogSchema::new()));
    collections.insert(PROJECTS.to_string(), Arc::new(ProjectSchema::new()));
    CollectionRegistry { collections }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_registry() {
        let registry = content_collections();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains(BLOG));
        assert!(registry.contains(PROJECTS));
        assert_eq!(registry.get(BLOG).unwrap().schema().name(), "blog");
    }

    #[test]
    fn test_unknown_collection() {
        let err = content_collections().validate("docs", &json!({})).unwrap_err();
        assert!(matches!(err, RegistryError::UnknownCollection { .. }));
        assert!(err.to_string().contains("blog, projects"));
    }

    #[test]
    fn test_duplicate_definition() {
        let result = CollectionRegistry::builder()
            .define("blog", BlogSchema::new())
            .define("blog", ProjectSchema::new())
            .build();
        assert!(matches!(result, Err(RegistryError::DuplicateCollection { name }) if name == "blog"));
    }

    #[test]
    fn test_registry_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CollectionRegistry>();
    }
}

//! Contentkit Schemas - content collection schemas and validators
//!
//! This crate declares the record shapes of a static site's content
//! collections and validates raw entries (front-matter or data files)
//! against them:
//! - **blog**: posts with a publication date, optional cross-post URL,
//!   hero image, badge and unique tags
//! - **projects**: showcased projects with a URL, a `tech/` hero image and
//!   a unique list of languages
//!
//! ## Features
//!
//! - **Field Combinators**: declarative string/boolean/date/array fields
//!   with optional, default, non-empty, pattern, URL and uniqueness rules
//! - **Complete Error Reporting**: every violation of an entry is reported
//!   with the path of the offending field
//! - **Date Coercion**: dates are parsed from common formats and normalized
//! - **Content Loading**: Markdown front-matter, YAML and JSON entries
//! - **Batch Checks**: a whole content tree validated in one pass
//!
//! ## Quick Start
//!
//! ```rust
//! use contentkit_schemas::{content_collections, ContentEntry};
//! use serde_json::json;
//!
//! let registry = content_collections();
//!
//! let post = json!({
//!     "title": "Hello",
//!     "subtitle": "A first post",
//!     "description": "Saying hello",
//!     "pubDate": "Jul 08 2022",
//!     "tags": ["intro"]
//! });
//!
//! match registry.validate("blog", &post) {
//!     Ok(ContentEntry::Blog(entry)) => assert!(!entry.external),
//!     Ok(_) => unreachable!(),
//!     Err(e) => panic!("{}", e),
//! }
//! ```
//!
//! ## Validation Modes
//!
//! - **Standard**: undeclared keys are silently stripped from the entry
//! - **Strict**: undeclared keys are reported as violations
//!
//! Copyright (c) 2025 Contentkit Team
//! Licensed under the Apache-2.0 license

pub mod check;
pub mod collections;
pub mod loader;
pub mod registry;
pub mod validation;

// Re-export commonly used types for convenience
pub use check::{
    check_content, check_entries, check_entry, check_source, CheckConfig, CheckError, CheckReport,
    CollectionSummary, EntryFailure, EntryOutcome, FailureKind, ValidatedEntry,
};
pub use collections::{BlogEntry, BlogSchema, ContentEntry, ProjectEntry, ProjectSchema};
pub use loader::{ContentLoader, LoaderError, RawEntry};
pub use registry::{content_collections, Collection, CollectionRegistry, RegistryError, BLOG, PROJECTS};
pub use validation::{
    FieldSchema, ObjectSchema, SchemaValidator, ValidationContext, ValidationError,
    ValidationErrors, ValidationHelpers, ValidationMode, ValidationResult,
};

//! Content loading: discovery, front-matter extraction and parsing
//!
//! This module turns a content root into raw, loosely-typed records:
//! - Markdown (`.md`, `.mdx`) entries contribute their YAML front-matter
//! - YAML and JSON data entries contribute the whole document
//! - Each registered collection reads from `<root>/<collection>/`
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use contentkit_schemas::content_collections;
//! use contentkit_schemas::loader::ContentLoader;
//!
//! let registry = content_collections();
//! let loaded = ContentLoader::new("src/content").load(&registry)?;
//! for entry in &loaded.entries {
//!     println!("{}/{}", entry.collection, entry.slug);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Copyright (c) 2025 Contentkit Team
//! Licensed under the Apache-2.0 license

pub mod content_loader;
pub mod error;
pub mod parser;

pub use content_loader::{slugify_id, ContentLoader, LoadedContent, RawEntry, SourceFile, SLUG_KEY};
pub use error::{LoaderError, LoaderResult};
pub use parser::{extract_frontmatter, EntryParser, Format, Frontmatter, ParsedEntry};

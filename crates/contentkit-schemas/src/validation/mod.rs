//! Validation primitives for content collection entries
//!
//! Field schemas ([`field`]) describe one value; object schemas ([`object`])
//! combine them into a record shape. Collection validators implement
//! [`SchemaValidator`] on top of an object schema and produce typed entries.
//!
//! Copyright (c) 2025 Contentkit Team
//! Licensed under the Apache-2.0 license

pub mod base;
pub mod error;
pub mod field;
pub mod object;

pub use base::{SchemaValidator, ValidationContext, ValidationHelpers, ValidationMode};
pub use error::{FieldResult, ValidationError, ValidationErrors, ValidationResult, Violation};
pub use field::{Constraint, FieldDescription, FieldKind, FieldSchema};
pub use object::{ObjectSchema, SchemaDescription};

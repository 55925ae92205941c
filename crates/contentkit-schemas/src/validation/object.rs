//! Object-shape schema built from named field schemas
//!
//! Copyright (c) 2025 Contentkit Team
//! Licensed under the Apache-2.0 license

use crate::validation::base::{ValidationContext, ValidationHelpers, ValidationMode};
use crate::validation::error::{ValidationError, ValidationErrors, ValidationResult};
use crate::validation::field::{FieldDescription, FieldSchema};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::trace;

/// An ordered set of named fields describing one record shape
#[derive(Debug, Clone)]
pub struct ObjectSchema {
    name: String,
    fields: Vec<(String, FieldSchema)>,
}

impl ObjectSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Declare a field; a later declaration of the same key replaces it
    pub fn field(mut self, key: impl Into<String>, schema: FieldSchema) -> Self {
        let key = key.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = schema,
            None => self.fields.push((key, schema)),
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, key: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, f)| f)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Validate a raw record, returning the normalized object
    ///
    /// Every declared field is checked and every failure is reported.
    /// Undeclared keys are dropped in standard mode and reported in strict
    /// mode.
    pub fn validate(&self, raw: &Value, ctx: &ValidationContext) -> ValidationResult<Map<String, Value>> {
        let Some(input) = raw.as_object() else {
            return Err(ValidationError::type_mismatch(
                &ctx.path,
                "object",
                ValidationHelpers::kind_of(raw),
            )
            .into());
        };

        let mut errors = ValidationErrors::new();
        let mut output = Map::new();

        for (key, field) in &self.fields {
            match field.resolve(key, input.get(key), &ctx.child(key)) {
                Ok(Some(value)) => {
                    output.insert(key.clone(), value);
                }
                Ok(None) => {}
                Err(field_errors) => errors.extend(field_errors),
            }
        }

        for key in input.keys().filter(|k| self.get(k).is_none()) {
            match ctx.mode {
                ValidationMode::Strict => errors.add(ValidationError::rule(
                    &ctx.child(key).path,
                    format!("Unrecognized key '{}' not allowed in {} entries", key, self.name),
                    "unknown_field",
                    format!("one of: {}", self.keys().collect::<Vec<_>>().join(", ")),
                    key.as_str(),
                )),
                ValidationMode::Standard => {
                    trace!(schema = %self.name, key = %key, "Stripping undeclared key");
                }
            }
        }

        if ctx.max_errors > 0 && errors.len() > ctx.max_errors {
            errors.errors.truncate(ctx.max_errors);
        }

        if errors.is_empty() {
            Ok(output)
        } else {
            Err(errors)
        }
    }

    /// Serializable summary of every field
    pub fn describe(&self) -> SchemaDescription {
        SchemaDescription {
            name: self.name.clone(),
            fields: self.fields.iter().map(|(k, f)| f.describe(k)).collect(),
        }
    }
}

/// Summary of a schema for listings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaDescription {
    pub name: String,
    pub fields: Vec<FieldDescription>,
}

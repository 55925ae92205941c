//! Composable field validators
//!
//! A [`FieldSchema`] pairs a value kind with modifiers (optional, default)
//! and constraints (non-empty, pattern, URL, uniqueness, custom refinements).
//! Schemas are built with chained calls:
//!
//! ```rust
//! use contentkit_schemas::validation::field::{array, string};
//!
//! let title = string().non_empty();
//! let tags = array(string()).unique("tags must be unique").optional();
//! assert!(title.is_required());
//! assert!(!tags.is_required());
//! ```
//!
//! Copyright (c) 2025 Contentkit Team
//! Licensed under the Apache-2.0 license

use crate::validation::base::{ValidationContext, ValidationHelpers};
use crate::validation::error::{ValidationError, ValidationErrors, ValidationResult};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// The kind of value a field holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Boolean,
    /// Coerced from strings or epoch milliseconds, normalized to RFC 3339 UTC
    Date,
    Array(Box<FieldKind>),
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::String => write!(f, "string"),
            FieldKind::Boolean => write!(f, "boolean"),
            FieldKind::Date => write!(f, "date"),
            FieldKind::Array(item) => write!(f, "array<{}>", item),
        }
    }
}

type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// A constraint checked after the value has the right kind
#[derive(Clone)]
pub enum Constraint {
    NonEmpty,
    Pattern { regex: Regex, description: String },
    Url,
    Unique { message: String },
    Refine { rule: String, message: String, predicate: Predicate },
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::NonEmpty => write!(f, "NonEmpty"),
            Constraint::Pattern { regex, .. } => write!(f, "Pattern({})", regex.as_str()),
            Constraint::Url => write!(f, "Url"),
            Constraint::Unique { message } => write!(f, "Unique({:?})", message),
            Constraint::Refine { rule, .. } => write!(f, "Refine({})", rule),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::NonEmpty => write!(f, "non-empty"),
            Constraint::Pattern { description, .. } => write!(f, "{}", description),
            Constraint::Url => write!(f, "url"),
            Constraint::Unique { .. } => write!(f, "unique items"),
            Constraint::Refine { rule, .. } => write!(f, "{}", rule),
        }
    }
}

impl Constraint {
    fn check(&self, value: &Value, ctx: &ValidationContext) -> Result<(), ValidationError> {
        match self {
            Constraint::NonEmpty => ValidationHelpers::validate_non_empty(value, ctx),
            Constraint::Pattern { regex, description } => match value.as_str() {
                Some(s) => ValidationHelpers::validate_pattern(s, regex, description, ctx),
                None => Ok(()),
            },
            Constraint::Url => match value.as_str() {
                Some(s) => ValidationHelpers::validate_url(s, ctx),
                None => Ok(()),
            },
            Constraint::Unique { message } => match value.as_array() {
                Some(items) => ValidationHelpers::validate_unique(items, message, ctx),
                None => Ok(()),
            },
            Constraint::Refine { rule, message, predicate } => {
                if predicate(value) {
                    Ok(())
                } else {
                    Err(ValidationError::rule(
                        &ctx.path,
                        message.as_str(),
                        rule.as_str(),
                        message.as_str(),
                        value.to_string(),
                    ))
                }
            }
        }
    }
}

/// Declarative description of one field of an object schema
#[derive(Debug, Clone)]
pub struct FieldSchema {
    kind: FieldKind,
    required: bool,
    default: Option<Value>,
    constraints: Vec<Constraint>,
}

/// A required string field
pub fn string() -> FieldSchema {
    FieldSchema::new(FieldKind::String)
}

/// A required boolean field
pub fn boolean() -> FieldSchema {
    FieldSchema::new(FieldKind::Boolean)
}

/// A required date field, coerced from its input representation
pub fn date() -> FieldSchema {
    FieldSchema::new(FieldKind::Date)
}

/// A required array field whose elements have the kind of `item`
pub fn array(item: FieldSchema) -> FieldSchema {
    FieldSchema::new(FieldKind::Array(Box::new(item.kind)))
}

impl FieldSchema {
    /// A required field of the given kind with no constraints
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            required: true,
            default: None,
            constraints: Vec::new(),
        }
    }

    /// Allow the field to be absent
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Value used when the field is absent; implies optional
    pub fn default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self.required = false;
        self
    }

    /// Reject empty strings and arrays
    pub fn non_empty(self) -> Self {
        self.constrain(Constraint::NonEmpty)
    }

    /// Require the string value to match `regex`
    pub fn matches(self, regex: Regex, description: impl Into<String>) -> Self {
        self.constrain(Constraint::Pattern {
            regex,
            description: description.into(),
        })
    }

    /// Require the string value to parse as a URL
    pub fn url(self) -> Self {
        self.constrain(Constraint::Url)
    }

    /// Require array elements to be pairwise distinct
    pub fn unique(self, message: impl Into<String>) -> Self {
        self.constrain(Constraint::Unique {
            message: message.into(),
        })
    }

    /// Attach a custom predicate
    pub fn refine<F>(self, rule: impl Into<String>, message: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.constrain(Constraint::Refine {
            rule: rule.into(),
            message: message.into(),
            predicate: Arc::new(predicate),
        })
    }

    fn constrain(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Resolve a possibly-absent field into its normalized value
    ///
    /// Returns `Ok(None)` for an absent optional field without a default.
    /// Explicit `null` is not absence and fails the kind check.
    pub fn resolve(
        &self,
        name: &str,
        value: Option<&Value>,
        ctx: &ValidationContext,
    ) -> ValidationResult<Option<Value>> {
        match value {
            Some(value) => self.check(value, ctx).map(Some),
            None => match &self.default {
                Some(default) => Ok(Some(default.clone())),
                None if self.required => Err(ValidationError::missing(&ctx.path, name).into()),
                None => Ok(None),
            },
        }
    }

    /// Check a present value: kind first, then every constraint
    pub fn check(&self, value: &Value, ctx: &ValidationContext) -> ValidationResult<Value> {
        let normalized = check_kind(&self.kind, value, ctx)?;

        let mut errors = ValidationErrors::new();
        for constraint in &self.constraints {
            if let Err(error) = constraint.check(&normalized, ctx) {
                errors.add(error);
            }
        }

        if errors.is_empty() {
            Ok(normalized)
        } else {
            Err(errors)
        }
    }

    /// Serializable summary of the field
    pub fn describe(&self, name: &str) -> FieldDescription {
        FieldDescription {
            name: name.to_string(),
            kind: self.kind.to_string(),
            required: self.required,
            default: self.default.clone(),
            constraints: self.constraints.iter().map(ToString::to_string).collect(),
        }
    }
}

fn check_kind(kind: &FieldKind, value: &Value, ctx: &ValidationContext) -> ValidationResult<Value> {
    let mismatch = |expected: &str| -> ValidationErrors {
        ValidationError::type_mismatch(&ctx.path, expected, ValidationHelpers::kind_of(value)).into()
    };

    match (kind, value) {
        (FieldKind::String, Value::String(_)) | (FieldKind::Boolean, Value::Bool(_)) => {
            Ok(value.clone())
        }
        (FieldKind::Date, _) => {
            let date = ValidationHelpers::coerce_date(value, ctx)?;
            Ok(Value::String(ValidationHelpers::format_date(&date)))
        }
        (FieldKind::Array(item), Value::Array(items)) => {
            let mut errors = ValidationErrors::new();
            let mut normalized = Vec::with_capacity(items.len());
            for (index, element) in items.iter().enumerate() {
                match check_kind(item, element, &ctx.child_index(index)) {
                    Ok(v) => normalized.push(v),
                    Err(e) => errors.extend(e),
                }
            }
            if errors.is_empty() {
                Ok(Value::Array(normalized))
            } else {
                Err(errors)
            }
        }
        (FieldKind::String, _) => Err(mismatch("string")),
        (FieldKind::Boolean, _) => Err(mismatch("boolean")),
        (FieldKind::Array(_), _) => Err(mismatch("array")),
    }
}

/// Summary of a field for listings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescription {
    pub name: String,
    pub kind: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx(field: &str) -> ValidationContext {
        ValidationContext::default().child(field)
    }

    #[test]
    fn test_required_field_missing() {
        let errors = string().resolve("title", None, &ctx("title")).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.mentions("Required field title is missing"));
    }

    #[test]
    fn test_optional_and_default() {
        assert_eq!(string().optional().resolve("badge", None, &ctx("badge")).unwrap(), None);

        let external = boolean().default(json!(false)).optional();
        assert_eq!(
            external.resolve("external", None, &ctx("external")).unwrap(),
            Some(json!(false))
        );
        assert_eq!(
            external.resolve("external", Some(&json!(true)), &ctx("external")).unwrap(),
            Some(json!(true))
        );
    }

    #[test]
    fn test_null_is_not_absent() {
        let errors = string()
            .optional()
            .resolve("badge", Some(&Value::Null), &ctx("badge"))
            .unwrap_err();
        assert!(errors.mentions("Expected string, received null"));
    }

    #[test]
    fn test_array_item_errors_carry_index() {
        let errors = array(string())
            .check(&json!(["a", 3, "c", false]), &ctx("tags"))
            .unwrap_err();
        assert_eq!(errors.paths(), vec!["$.tags[1]", "$.tags[3]"]);
    }

    #[test]
    fn test_constraints_all_reported() {
        let field = string()
            .non_empty()
            .refine("starts_with_slash", "must start with '/'", |v| {
                v.as_str().is_some_and(|s| s.starts_with('/'))
            });
        let errors = field.check(&json!(""), &ctx("heroImage")).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_describe() {
        let description = array(string()).unique("tags must be unique").optional().describe("tags");
        assert_eq!(description.kind, "array<string>");
        assert!(!description.required);
        assert_eq!(description.constraints, vec!["unique items".to_string()]);
    }
}

//! Base validation trait and common utilities
//!
//! Copyright (c) 2025 Contentkit Team
//! Licensed under the Apache-2.0 license

use crate::validation::error::{FieldResult, ValidationError, ValidationResult};
use crate::validation::object::ObjectSchema;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;

/// How an entry's undeclared keys are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Undeclared keys are dropped from the normalized entry
    #[default]
    Standard,
    /// Undeclared keys are reported as violations
    Strict,
}

/// Validation context for passing additional information
#[derive(Debug, Clone)]
pub struct ValidationContext {
    /// Current JSON path
    pub path: String,
    /// Validation mode
    pub mode: ValidationMode,
    /// Maximum number of errors reported per entry (0 = unlimited)
    pub max_errors: usize,
}

impl ValidationContext {
    /// Create a new validation context
    pub fn new(mode: ValidationMode) -> Self {
        Self {
            path: "$".to_string(),
            mode,
            max_errors: 0,
        }
    }

    /// Cap the number of errors reported per entry
    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors;
        self
    }

    /// Create a child context with updated path
    pub fn child<P: AsRef<str>>(&self, path_segment: P) -> Self {
        Self {
            path: format!("{}.{}", self.path, path_segment.as_ref()),
            mode: self.mode,
            max_errors: self.max_errors,
        }
    }

    /// Create a child context for array index
    pub fn child_index(&self, index: usize) -> Self {
        Self {
            path: format!("{}[{}]", self.path, index),
            mode: self.mode,
            max_errors: self.max_errors,
        }
    }

    /// Last named segment of the path, used in messages
    pub fn field_name(&self) -> &str {
        let tail = self.path.rsplit('.').next().unwrap_or(&self.path);
        tail.split('[').next().unwrap_or(tail)
    }
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self::new(ValidationMode::Standard)
    }
}

/// Base trait for collection schema validators
pub trait SchemaValidator: Send + Sync {
    /// The typed entry produced by a successful validation
    type Output;

    /// The field table the validator checks against
    fn schema(&self) -> &ObjectSchema;

    /// Validate a raw record in standard mode
    fn validate(&self, input: &Value) -> ValidationResult<Self::Output> {
        let context = ValidationContext::new(ValidationMode::Standard);
        self.validate_with_context(input, &context)
    }

    /// Validate with specific context and mode
    fn validate_with_context(
        &self,
        input: &Value,
        context: &ValidationContext,
    ) -> ValidationResult<Self::Output>;

    /// Validate rejecting undeclared keys
    fn validate_strict(&self, input: &Value) -> ValidationResult<Self::Output> {
        let context = ValidationContext::new(ValidationMode::Strict);
        self.validate_with_context(input, &context)
    }

}

/// Helper functions for common validation patterns
pub struct ValidationHelpers;

impl ValidationHelpers {
    /// Name of the JSON kind of a value, as used in type mismatch messages
    pub fn kind_of(value: &Value) -> &'static str {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Validate that a string or array is not empty
    pub fn validate_non_empty(value: &Value, context: &ValidationContext) -> FieldResult<()> {
        let empty = match value {
            Value::String(s) => s.is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        };

        if empty {
            Err(ValidationError::rule(
                &context.path,
                format!("{} cannot be empty", context.field_name()),
                "non_empty",
                format!("non-empty {}", Self::kind_of(value)),
                format!("empty {}", Self::kind_of(value)),
            ))
        } else {
            Ok(())
        }
    }

    /// Validate that a string is syntactically a URL
    pub fn validate_url(value: &str, context: &ValidationContext) -> FieldResult<()> {
        match url::Url::parse(value) {
            Ok(_) => Ok(()),
            Err(e) => Err(ValidationError::rule(
                &context.path,
                format!("Invalid url: {}", value),
                "url_format",
                "valid URL with scheme",
                format!("'{}' ({})", value, e),
            )),
        }
    }

    /// Validate that a string matches a pattern
    pub fn validate_pattern(
        value: &str,
        pattern: &Regex,
        description: &str,
        context: &ValidationContext,
    ) -> FieldResult<()> {
        if pattern.is_match(value) {
            Ok(())
        } else {
            Err(ValidationError::rule(
                &context.path,
                format!("{} must be {}", context.field_name(), description),
                "pattern",
                format!("value matching {}", pattern.as_str()),
                value.to_string(),
            ))
        }
    }

    /// Validate that array elements are pairwise distinct
    ///
    /// Duplicates are detected by comparing the cardinality of the set of
    /// elements with the length of the array.
    pub fn validate_unique(
        items: &[Value],
        message: &str,
        context: &ValidationContext,
    ) -> FieldResult<()> {
        let distinct: HashSet<String> = items.iter().map(Value::to_string).collect();
        if distinct.len() == items.len() {
            return Ok(());
        }

        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for item in items {
            let key = item.to_string();
            if !seen.insert(key.clone()) && !duplicates.contains(&key) {
                duplicates.push(key);
            }
        }

        Err(ValidationError::rule(
            &context.path,
            message,
            "unique",
            "pairwise distinct elements",
            format!("duplicate value(s): {}", duplicates.join(", ")),
        ))
    }

    /// Coerce a loosely-typed value into a UTC timestamp
    ///
    /// Accepts RFC 3339 timestamps, `YYYY-MM-DD` dates, naive date-times,
    /// RFC 2822 strings, month-name dates such as `Jul 08 2022`, and numbers
    /// as milliseconds since the Unix epoch. Dates must fall within the
    /// years 0000 to 9999.
    pub fn coerce_date(value: &Value, context: &ValidationContext) -> FieldResult<DateTime<Utc>> {
        let parsed = match value {
            Value::String(s) => Self::parse_date_str(s.trim()),
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
                .and_then(DateTime::from_timestamp_millis),
            _ => {
                return Err(ValidationError::type_mismatch(
                    &context.path,
                    "date",
                    Self::kind_of(value),
                ))
            }
        };

        // Years outside 0000-9999 have no plain RFC 3339 form
        parsed.filter(|date| (0..=9999).contains(&date.year())).ok_or_else(|| {
            ValidationError::rule(
                &context.path,
                "Invalid date",
                "type",
                "date",
                format!("unparseable {} {}", Self::kind_of(value), value),
            )
        })
    }

    /// Canonical string form of a normalized date
    pub fn format_date(date: &DateTime<Utc>) -> String {
        date.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    fn parse_date_str(input: &str) -> Option<DateTime<Utc>> {
        if input.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
            return Some(dt.with_timezone(&Utc));
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
                return Some(naive.and_utc());
            }
        }
        for format in ["%Y-%m-%d", "%Y/%m/%d", "%b %d %Y", "%B %d %Y", "%B %d, %Y", "%b %d, %Y"] {
            if let Ok(date) = NaiveDate::parse_from_str(input, format) {
                return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
            }
        }
        None
    }
}

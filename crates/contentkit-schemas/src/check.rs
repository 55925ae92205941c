//! Batch check of a content tree against the collection registry
//!
//! A check validates every loaded entry and aggregates every failure into a
//! [`CheckReport`]. One invalid entry fails the check as a whole, but all
//! entries are still examined (unless fail-fast is requested) so that a
//! single run reports every problem.
//!
//! Copyright (c) 2025 Contentkit Team
//! Licensed under the Apache-2.0 license

use crate::collections::ContentEntry;
use crate::loader::{ContentLoader, LoaderError, LoaderResult, RawEntry, SourceFile};
use crate::registry::{CollectionRegistry, RegistryError};
use crate::validation::{ValidationContext, ValidationError, ValidationErrors, ValidationMode};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Check configuration
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Treatment of undeclared keys
    pub mode: ValidationMode,
    /// Whether to stop at the first failing entry
    pub fail_fast: bool,
    /// Maximum number of errors reported per entry (0 = unlimited)
    pub max_errors: usize,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            mode: ValidationMode::Standard,
            fail_fast: false,
            max_errors: 0,
        }
    }
}

impl CheckConfig {
    /// Undeclared keys are stripped
    pub fn standard() -> Self {
        Self::default()
    }

    /// Undeclared keys are violations
    pub fn strict() -> Self {
        Self {
            mode: ValidationMode::Strict,
            ..Self::default()
        }
    }

    /// Enable fail-fast mode
    pub fn with_fail_fast(mut self) -> Self {
        self.fail_fast = true;
        self
    }

    /// Set maximum number of errors reported per entry
    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors;
        self
    }

    /// Root validation context for one entry
    pub fn context(&self) -> ValidationContext {
        ValidationContext::new(self.mode).with_max_errors(self.max_errors)
    }
}

/// An entry that passed its collection schema
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedEntry {
    pub collection: String,
    pub id: String,
    pub slug: String,
    pub path: PathBuf,
    pub data: ContentEntry,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Why an entry failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The file could not be read or parsed
    Parse,
    /// The record does not match its collection schema
    Schema,
    /// Another entry of the same collection has the same slug
    DuplicateSlug,
    /// The entry names a collection that is not registered
    UnknownCollection,
}

/// An entry that failed the check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryFailure {
    pub collection: String,
    pub id: String,
    pub path: PathBuf,
    pub kind: FailureKind,
    pub errors: ValidationErrors,
}

impl EntryFailure {
    /// A file that could not be parsed into a record
    pub fn parse(source: &SourceFile, error: &LoaderError) -> Self {
        Self {
            collection: source.collection.clone(),
            id: source.id.clone(),
            path: source.path.clone(),
            kind: FailureKind::Parse,
            errors: ValidationError::rule("$", error.to_string(), "parse", "a parseable content file", "parse error").into(),
        }
    }
}

/// Result of checking one entry
#[derive(Debug, Clone, PartialEq)]
pub enum EntryOutcome {
    Valid(ValidatedEntry),
    Invalid(EntryFailure),
}

impl EntryOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, EntryOutcome::Valid(_))
    }
}

/// Validate one raw entry against its collection
pub fn check_entry(registry: &CollectionRegistry, raw: RawEntry, ctx: &ValidationContext) -> EntryOutcome {
    match registry.validate_with_context(&raw.collection, &raw.data, ctx) {
        Ok(data) => EntryOutcome::Valid(ValidatedEntry {
            collection: raw.collection,
            id: raw.id,
            slug: raw.slug,
            path: raw.path,
            data,
            body: raw.body,
        }),
        Err(RegistryError::Validation { errors, .. }) => EntryOutcome::Invalid(EntryFailure {
            collection: raw.collection,
            id: raw.id,
            path: raw.path,
            kind: FailureKind::Schema,
            errors,
        }),
        Err(other) => EntryOutcome::Invalid(EntryFailure {
            collection: raw.collection,
            id: raw.id,
            path: raw.path,
            kind: FailureKind::UnknownCollection,
            errors: ValidationError::new("$", other.to_string()).into(),
        }),
    }
}

/// Outcome of a whole check
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    pub entries: Vec<ValidatedEntry>,
    pub failures: Vec<EntryFailure>,
}

impl CheckReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_outcome(&mut self, outcome: EntryOutcome) {
        match outcome {
            EntryOutcome::Valid(entry) => self.entries.push(entry),
            EntryOutcome::Invalid(failure) => self.failures.push(failure),
        }
    }

    pub fn push_failure(&mut self, failure: EntryFailure) {
        self.failures.push(failure);
    }

    /// Sort by collection then id and fail entries that share a slug
    ///
    /// Outcomes may be pushed in any order (e.g. from concurrent tasks);
    /// call this once all of them are in.
    pub fn finalize(mut self) -> Self {
        let mut by_slug: BTreeMap<(String, String), Vec<usize>> = BTreeMap::new();
        for (index, entry) in self.entries.iter().enumerate() {
            by_slug
                .entry((entry.collection.clone(), entry.slug.clone()))
                .or_default()
                .push(index);
        }

        let mut duplicated = vec![false; self.entries.len()];
        for ((collection, slug), indices) in by_slug.iter().filter(|(_, v)| v.len() > 1) {
            warn!(collection = %collection, slug = %slug, count = indices.len(), "Duplicate slug");
            for &index in indices {
                duplicated[index] = true;
            }
        }

        let entries = std::mem::take(&mut self.entries);
        let all_ids: Vec<(String, String, String)> = entries
            .iter()
            .map(|e| (e.collection.clone(), e.slug.clone(), e.id.clone()))
            .collect();

        for (entry, is_duplicate) in entries.into_iter().zip(duplicated) {
            if !is_duplicate {
                self.entries.push(entry);
                continue;
            }
            let others: Vec<&str> = all_ids
                .iter()
                .filter(|(c, s, id)| *c == entry.collection && *s == entry.slug && *id != entry.id)
                .map(|(_, _, id)| id.as_str())
                .collect();
            self.failures.push(EntryFailure {
                errors: ValidationError::rule(
                    "$.slug",
                    format!("Duplicate slug '{}' also used by {}", entry.slug, others.join(", ")),
                    "duplicate_slug",
                    "a slug unique within the collection",
                    entry.slug.clone(),
                )
                .into(),
                collection: entry.collection,
                id: entry.id,
                path: entry.path,
                kind: FailureKind::DuplicateSlug,
            });
        }

        self.entries
            .sort_by(|a, b| (&a.collection, &a.id).cmp(&(&b.collection, &b.id)));
        self.failures
            .sort_by(|a, b| (&a.collection, &a.id).cmp(&(&b.collection, &b.id)));
        self
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn total(&self) -> usize {
        self.entries.len() + self.failures.len()
    }

    /// Count of checked entries per collection, valid and failed
    pub fn summary(&self) -> BTreeMap<String, CollectionSummary> {
        let mut summary: BTreeMap<String, CollectionSummary> = BTreeMap::new();
        for entry in &self.entries {
            summary.entry(entry.collection.clone()).or_default().valid += 1;
        }
        for failure in &self.failures {
            summary.entry(failure.collection.clone()).or_default().failed += 1;
        }
        summary
    }

    /// Normalized entries grouped by collection, as consumed by page rendering
    pub fn to_collections_value(&self) -> Value {
        let mut collections: Map<String, Value> = Map::new();
        for entry in &self.entries {
            let slot = collections
                .entry(entry.collection.clone())
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(items) = slot {
                let mut item = serde_json::json!({
                    "id": entry.id,
                    "slug": entry.slug,
                    "collection": entry.collection,
                    "data": entry.data.to_value(),
                });
                if let Some(body) = &entry.body {
                    item["body"] = Value::String(body.clone());
                }
                items.push(item);
            }
        }
        Value::Object(collections)
    }

    /// Ok with the validated entries if nothing failed
    pub fn into_result(self) -> Result<Vec<ValidatedEntry>, CheckError> {
        if self.is_success() {
            Ok(self.entries)
        } else {
            Err(CheckError {
                total: self.total(),
                failures: self.failures,
            })
        }
    }
}

/// Per-collection counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CollectionSummary {
    pub valid: usize,
    pub failed: usize,
}

/// A check in which at least one entry failed
#[derive(Debug, Error)]
#[error("{} of {total} content entries failed validation", failures.len())]
pub struct CheckError {
    pub total: usize,
    pub failures: Vec<EntryFailure>,
}

/// Validate already-loaded entries in order
pub fn check_entries(registry: &CollectionRegistry, entries: Vec<RawEntry>, config: &CheckConfig) -> CheckReport {
    let ctx = config.context();
    let mut report = CheckReport::new();

    for raw in entries {
        let outcome = check_entry(registry, raw, &ctx);
        let failed = !outcome.is_valid();
        report.push_outcome(outcome);
        if failed && config.fail_fast {
            debug!("Stopping at first failure (fail-fast)");
            break;
        }
    }

    report.finalize()
}

/// Parse one discovered file and check it
///
/// A file that cannot be parsed becomes a [`FailureKind::Parse`] failure.
pub fn check_source(
    registry: &CollectionRegistry,
    loader: &ContentLoader,
    source: &SourceFile,
    ctx: &ValidationContext,
) -> EntryOutcome {
    match loader.load_file(source) {
        Ok(raw) => check_entry(registry, raw, ctx),
        Err(error) => {
            warn!(path = %source.path.display(), error = %error, "Failed to parse content file");
            EntryOutcome::Invalid(EntryFailure::parse(source, &error))
        }
    }
}

/// Discover every entry under the loader's root and check it
pub fn check_content(
    registry: &CollectionRegistry,
    loader: &ContentLoader,
    config: &CheckConfig,
) -> LoaderResult<CheckReport> {
    let ctx = config.context();
    let mut report = CheckReport::new();

    for source in loader.discover(registry)? {
        let outcome = check_source(registry, loader, &source, &ctx);
        let failed = !outcome.is_valid();
        report.push_outcome(outcome);
        if failed && config.fail_fast {
            debug!("Stopping at first failure (fail-fast)");
            break;
        }
    }
    let report = report.finalize();

    info!(
        root = %loader.root().display(),
        valid = report.entries.len(),
        failed = report.failures.len(),
        "Content check finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::content_collections;
    use serde_json::json;

    fn raw(collection: &str, id: &str, slug: &str, data: Value) -> RawEntry {
        RawEntry {
            collection: collection.to_string(),
            id: id.to_string(),
            slug: slug.to_string(),
            path: PathBuf::from(format!("{}/{}", collection, id)),
            data,
            body: None,
        }
    }

    fn post(title: &str) -> Value {
        json!({
            "title": title,
            "subtitle": "s",
            "description": "d",
            "pubDate": "2024-01-01",
        })
    }

    #[test]
    fn test_check_config_builders() {
        let config = CheckConfig::strict().with_fail_fast().with_max_errors(3);
        assert_eq!(config.mode, ValidationMode::Strict);
        assert!(config.fail_fast);
        assert_eq!(config.context().max_errors, 3);
        assert_eq!(CheckConfig::default().mode, ValidationMode::Standard);
    }

    #[test]
    fn test_duplicate_slugs_fail_both_entries() {
        let registry = content_collections();
        let entries = vec![
            raw("blog", "a.md", "same", post("A")),
            raw("blog", "b.md", "same", post("B")),
            raw("blog", "c.md", "other", post("C")),
        ];
        let report = check_entries(&registry, entries, &CheckConfig::default());
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.failures.len(), 2);
        assert!(report.failures.iter().all(|f| f.kind == FailureKind::DuplicateSlug));
        assert!(report.failures[0].errors.mentions("also used by b.md"));
    }

    #[test]
    fn test_fail_fast_stops_early() {
        let registry = content_collections();
        let entries = vec![
            raw("blog", "a.md", "a", json!({})),
            raw("blog", "b.md", "b", json!({})),
        ];
        let report = check_entries(&registry, entries, &CheckConfig::default().with_fail_fast());
        assert_eq!(report.failures.len(), 1);

        let entries = vec![
            raw("blog", "a.md", "a", json!({})),
            raw("blog", "b.md", "b", json!({})),
        ];
        let report = check_entries(&registry, entries, &CheckConfig::default());
        assert_eq!(report.failures.len(), 2);
    }

    #[test]
    fn test_unknown_collection_entry() {
        let registry = content_collections();
        let outcome = check_entry(&registry, raw("docs", "x.md", "x", json!({})), &ValidationContext::default());
        match outcome {
            EntryOutcome::Invalid(failure) => assert_eq!(failure.kind, FailureKind::UnknownCollection),
            EntryOutcome::Valid(_) => panic!("docs is not a registered collection"),
        }
    }

    #[test]
    fn test_into_result_and_summary() {
        let registry = content_collections();
        let entries = vec![
            raw("blog", "a.md", "a", post("A")),
            raw("blog", "b.md", "b", json!({"title": "B"})),
        ];
        let report = check_entries(&registry, entries, &CheckConfig::default());
        let summary = report.summary();
        assert_eq!(summary["blog"], CollectionSummary { valid: 1, failed: 1 });

        let err = report.into_result().unwrap_err();
        assert_eq!(err.to_string(), "1 of 2 content entries failed validation");
    }

    #[test]
    fn test_collections_value_shape() {
        let registry = content_collections();
        let report = check_entries(&registry, vec![raw("blog", "a.md", "a", post("A"))], &CheckConfig::default());
        let value = report.to_collections_value();
        assert_eq!(value["blog"][0]["slug"], "a");
        assert_eq!(value["blog"][0]["data"]["external"], false);
        assert_eq!(value["blog"][0]["data"]["pubDate"], "2024-01-01T00:00:00Z");
    }
}

//! Unit tests for the collection registry

use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::thread;
use contentkit_schemas::validation::field::string;
use contentkit_schemas::{
    content_collections, BlogSchema, CollectionRegistry, ContentEntry, ObjectSchema,
    RegistryError, SchemaValidator, ValidationContext, ValidationMode, ValidationResult,
};

#[test]
fn test_registry_names_are_sorted() {
    let registry = content_collections();
    assert_eq!(registry.names(), vec!["blog", "projects"]);
    assert!(!registry.is_empty());
}

#[test]
fn test_validate_dispatches_to_collection() {
    let registry = content_collections();
    let entry = registry
        .validate(
            "blog",
            &json!({
                "title": "t",
                "subtitle": "s",
                "description": "d",
                "pubDate": "2021-01-01",
            }),
        )
        .unwrap();
    assert!(matches!(entry, ContentEntry::Blog(_)));
    assert_eq!(entry.title(), "t");
}

#[test]
fn test_validation_error_names_collection() {
    let err = content_collections().validate("projects", &json!({})).unwrap_err();
    match err {
        RegistryError::Validation { collection, errors } => {
            assert_eq!(collection, "projects");
            assert_eq!(errors.len(), 6);
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_strict_context_through_registry() {
    let registry = content_collections();
    let ctx = ValidationContext::new(ValidationMode::Strict);
    let err = registry
        .validate_with_context(
            "blog",
            &json!({
                "title": "t",
                "subtitle": "s",
                "description": "d",
                "pubDate": "2021-01-01",
                "author": "me",
            }),
            &ctx,
        )
        .unwrap_err();
    assert!(err.to_string().contains("Unrecognized key 'author'"));
}

struct NoteSchema {
    schema: ObjectSchema,
}

impl SchemaValidator for NoteSchema {
    type Output = ContentEntry;

    fn schema(&self) -> &ObjectSchema {
        &self.schema
    }

    fn validate_with_context(&self, input: &serde_json::Value, ctx: &ValidationContext) -> ValidationResult<ContentEntry> {
        self.schema.validate(input, ctx)?;
        BlogSchema::new().validate_with_context(
            &json!({"title": "note", "subtitle": "-", "description": "-", "pubDate": "2020-01-01"}),
            ctx,
        ).map(ContentEntry::from)
    }
}

#[test]
fn test_builder_accepts_custom_collections() {
    let registry = CollectionRegistry::builder()
        .define("blog", BlogSchema::new())
        .define(
            "notes",
            NoteSchema {
                schema: ObjectSchema::new("notes").field("text", string()),
            },
        )
        .build()
        .unwrap();
    assert_eq!(registry.names(), vec!["blog", "notes"]);
    assert!(registry.validate("notes", &json!({"text": "hi"})).is_ok());
    assert!(registry.validate("notes", &json!({})).is_err());
}

#[test]
fn test_concurrent_validation_shares_registry() {
    let registry = Arc::new(content_collections());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                registry
                    .validate(
                        "blog",
                        &json!({
                            "title": format!("post {}", i),
                            "subtitle": "s",
                            "description": "d",
                            "pubDate": "2021-01-01",
                        }),
                    )
                    .is_ok()
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}

#[test]
fn test_schema_description_lists_fields() {
    let registry = content_collections();
    let description = registry.get("blog").unwrap().schema().describe();
    let names: Vec<&str> = description.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "title", "subtitle", "description", "pubDate", "crosspostURL", "external",
            "updatedDate", "heroImage", "badge", "tags"
        ]
    );
    let external = description.fields.iter().find(|f| f.name == "external").unwrap();
    assert!(!external.required);
    assert_eq!(external.default, Some(json!(false)));
}

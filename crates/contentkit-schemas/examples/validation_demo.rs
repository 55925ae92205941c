//! Validation demonstration example
//!
//! Copyright (c) 2025 Contentkit Team
//! Licensed under the Apache-2.0 license

use serde_json::json;
use contentkit_schemas::{
    content_collections, BlogSchema, ContentEntry, SchemaValidator, ValidationContext,
    ValidationMode,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Contentkit Schema Validation Demo ===\n");

    demo_blog_validation();

    println!();

    demo_registry_lookup()?;

    Ok(())
}

fn demo_blog_validation() {
    println!("--- Blog Validation Demo ---");

    let schema = BlogSchema::new();

    let valid_post = json!({
        "title": "Hello, world!",
        "subtitle": "A first post",
        "description": "Saying hello",
        "pubDate": "Jul 08 2022",
        "tags": ["intro", "meta"]
    });

    println!("✅ Validating valid post:");
    match schema.validate(&valid_post) {
        Ok(entry) => println!("   Valid! published {}", entry.pub_date.to_rfc3339()),
        Err(e) => println!("   Error: {}", e),
    }

    let invalid_post = json!({
        "title": "Broken",
        "pubDate": "someday",
        "tags": ["a", "a"],
        "layout": "post"
    });

    println!("\n❌ Validating invalid post (strict mode):");
    let ctx = ValidationContext::new(ValidationMode::Strict);
    if let Err(errors) = schema.validate_with_context(&invalid_post, &ctx) {
        for error in errors.iter() {
            println!("   {}: {}", error.path, error.message);
        }
    }
}

fn demo_registry_lookup() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Registry Demo ---");

    let registry = content_collections();
    println!("Registered collections: {}", registry.names().join(", "));

    let project = json!({
        "title": "contentkit",
        "description": "Typed content collections",
        "url": "https://example.com/contentkit",
        "heroImage": "/tech/rust.png",
        "languages": ["Rust"],
        "badge": "WIP"
    });

    if let ContentEntry::Project(entry) = registry.validate("projects", &project)? {
        println!("✅ Project '{}' uses {}", entry.title, entry.languages.join(", "));
    }

    match registry.validate("docs", &project) {
        Ok(_) => println!("   unexpected success"),
        Err(e) => println!("❌ {}", e),
    }

    Ok(())
}

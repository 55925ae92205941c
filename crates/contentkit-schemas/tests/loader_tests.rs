//! Integration tests for discovering and parsing content files on disk

use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use contentkit_schemas::loader::{ContentLoader, LoaderError};
use contentkit_schemas::content_collections;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn content_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(
        root,
        "blog/first-post.md",
        "---\ntitle: First\nsubtitle: One\ndescription: The first\npubDate: 2022-07-08\n---\n# Hello\n",
    );
    write(
        root,
        "blog/2023/Second Post.mdx",
        "---\ntitle: Second\nslug: custom-second\n---\nBody\n",
    );
    write(root, "blog/_drafts/wip.md", "---\ntitle: WIP\n---\n");
    write(root, "blog/.hidden.md", "---\ntitle: Hidden\n---\n");
    write(root, "blog/cover.png", "not content");
    write(
        root,
        "projects/contentkit.yaml",
        "title: contentkit\nlanguages: [Rust]\n",
    );
    write(root, "projects/site.json", r#"{"title": "site"}"#);
    write(root, "notes/ignored.md", "---\ntitle: Note\n---\n");
    dir
}

#[test]
fn test_discover_skips_ignored_and_unsupported_files() {
    let dir = content_tree();
    let loader = ContentLoader::new(dir.path());
    let files = loader.discover(&content_collections()).unwrap();
    let ids: Vec<(&str, &str)> = files
        .iter()
        .map(|f| (f.collection.as_str(), f.id.as_str()))
        .collect();
    assert_eq!(
        ids,
        vec![
            ("blog", "2023/Second Post.mdx"),
            ("blog", "first-post.md"),
            ("projects", "contentkit.yaml"),
            ("projects", "site.json"),
        ]
    );
}

#[test]
fn test_load_parses_every_format() {
    let dir = content_tree();
    let loaded = ContentLoader::new(dir.path()).load(&content_collections()).unwrap();
    assert!(loaded.errors.is_empty());
    assert_eq!(loaded.entries.len(), 4);

    let first = loaded.entries.iter().find(|e| e.id == "first-post.md").unwrap();
    assert_eq!(first.slug, "first-post");
    assert_eq!(first.data["pubDate"], "2022-07-08");
    assert_eq!(first.body.as_deref(), Some("# Hello\n"));

    let project = loaded.entries.iter().find(|e| e.id == "contentkit.yaml").unwrap();
    assert_eq!(project.data, json!({"title": "contentkit", "languages": ["Rust"]}));
    assert_eq!(project.body, None);
}

#[test]
fn test_slug_key_overrides_derived_slug() {
    let dir = content_tree();
    let loaded = ContentLoader::new(dir.path()).load(&content_collections()).unwrap();
    let second = loaded.entries.iter().find(|e| e.id == "2023/Second Post.mdx").unwrap();
    assert_eq!(second.slug, "custom-second");
    assert!(second.data.get("slug").is_none());
}

#[test]
fn test_slug_key_is_data_in_data_files() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "projects/p.json", r#"{"slug": "x"}"#);
    let loaded = ContentLoader::new(dir.path()).load(&content_collections()).unwrap();
    assert_eq!(loaded.entries[0].slug, "p");
    assert_eq!(loaded.entries[0].data["slug"], "x");
}

#[test]
fn test_parse_failures_are_collected() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "blog/broken.md", "---\ntitle: [unclosed\n---\n");
    write(dir.path(), "blog/open.md", "---\ntitle: x\n");
    write(dir.path(), "projects/list.json", "[1, 2]");
    write(dir.path(), "projects/ok.json", "{}");

    let loaded = ContentLoader::new(dir.path()).load(&content_collections()).unwrap();
    assert_eq!(loaded.entries.len(), 1);
    assert_eq!(loaded.errors.len(), 3);
    assert!(loaded
        .errors
        .iter()
        .any(|(_, e)| matches!(e, LoaderError::UnterminatedFrontmatter { .. })));
    assert!(loaded
        .errors
        .iter()
        .any(|(_, e)| matches!(e, LoaderError::YamlParseError { .. })));
    assert!(loaded
        .errors
        .iter()
        .any(|(_, e)| matches!(e, LoaderError::NotARecord { .. })));
}

#[test]
fn test_missing_root_is_an_error() {
    let dir = TempDir::new().unwrap();
    let loader = ContentLoader::new(dir.path().join("nope"));
    let err = loader.discover(&content_collections()).unwrap_err();
    assert!(matches!(err, LoaderError::ContentRootMissing { .. }));
}

#[test]
fn test_missing_collection_dir_yields_no_entries() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "blog/a.md", "---\ntitle: a\n---\n");
    let files = ContentLoader::new(dir.path()).discover(&content_collections()).unwrap();
    assert_eq!(files.len(), 1);
}

//! Discovery of content entries under a content root
//!
//! Each registered collection owns the directory of the same name under the
//! root. Files and directories whose names start with `_` or `.` are skipped,
//! as are files with extensions the parser does not understand.
//!
//! Copyright (c) 2025 Contentkit Team
//! Licensed under the Apache-2.0 license

use crate::loader::error::{LoaderError, LoaderResult};
use crate::loader::parser::{EntryParser, Format};
use crate::registry::CollectionRegistry;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Front-matter key that overrides the derived slug
pub const SLUG_KEY: &str = "slug";

/// A content file assigned to a collection, not yet parsed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFile {
    pub collection: String,
    pub path: PathBuf,
    /// Path relative to the collection directory, `/`-separated
    pub id: String,
}

/// A parsed, not yet validated, content entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawEntry {
    pub collection: String,
    pub id: String,
    pub slug: String,
    pub path: PathBuf,
    pub data: Value,
    #[serde(skip)]
    pub body: Option<String>,
}

/// Entries parsed from a content root plus the files that failed to parse
#[derive(Debug, Default)]
pub struct LoadedContent {
    pub entries: Vec<RawEntry>,
    pub errors: Vec<(SourceFile, LoaderError)>,
}

/// Loads content entries from `<root>/<collection>/**`
#[derive(Debug)]
pub struct ContentLoader {
    root: PathBuf,
    parser: EntryParser,
}

impl ContentLoader {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            parser: EntryParser::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List every content file of every registered collection, sorted by
    /// collection then id
    pub fn discover(&self, registry: &CollectionRegistry) -> LoaderResult<Vec<SourceFile>> {
        if !self.root.is_dir() {
            return Err(LoaderError::ContentRootMissing {
                path: self.root.clone(),
            });
        }

        self.warn_unregistered_dirs(registry);

        let mut files = Vec::new();
        for name in registry.names() {
            let dir = self.root.join(name);
            if !dir.is_dir() {
                debug!(collection = name, dir = %dir.display(), "Collection directory not found, no entries");
                continue;
            }

            let walker = WalkDir::new(&dir)
                .follow_links(true)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|e| e.depth() == 0 || !is_ignored(e));

            for entry in walker {
                let entry = entry.map_err(|e| LoaderError::WalkError {
                    path: e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.clone()),
                    reason: e.to_string(),
                })?;
                let path = entry.path();
                if !entry.file_type().is_file() {
                    continue;
                }
                if !Format::is_supported(path) {
                    debug!(path = %path.display(), "Skipping unsupported file");
                    continue;
                }

                files.push(SourceFile {
                    collection: name.to_string(),
                    path: path.to_path_buf(),
                    id: entry_id(&dir, path),
                });
            }
        }

        debug!(count = files.len(), root = %self.root.display(), "Discovered content files");
        Ok(files)
    }

    /// Parse one discovered file into a raw entry
    pub fn load_file(&self, source: &SourceFile) -> LoaderResult<RawEntry> {
        let format = Format::from_path(&source.path)?;
        let mut parsed = self.parser.parse_file(&source.path)?;

        let mut slug = slugify_id(&source.id);
        if format.has_body() {
            if let Some(Value::String(custom)) = parsed.data.get(SLUG_KEY) {
                slug = custom.clone();
                parsed.data.remove(SLUG_KEY);
            }
        }

        Ok(RawEntry {
            collection: source.collection.clone(),
            id: source.id.clone(),
            slug,
            path: source.path.clone(),
            data: Value::Object(parsed.data),
            body: parsed.body,
        })
    }

    /// Discover and parse every entry; parse failures are collected, not fatal
    pub fn load(&self, registry: &CollectionRegistry) -> LoaderResult<LoadedContent> {
        let mut loaded = LoadedContent::default();
        for source in self.discover(registry)? {
            match self.load_file(&source) {
                Ok(entry) => loaded.entries.push(entry),
                Err(e) => {
                    warn!(path = %source.path.display(), error = %e, "Failed to parse content file");
                    loaded.errors.push((source, e));
                }
            }
        }
        Ok(loaded)
    }

    fn warn_unregistered_dirs(&self, registry: &CollectionRegistry) {
        let Ok(read_dir) = std::fs::read_dir(&self.root) else {
            return;
        };
        for entry in read_dir.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            if entry.path().is_dir() && !name.starts_with(&['_', '.'][..]) && !registry.contains(&name) {
                warn!(
                    dir = %entry.path().display(),
                    "Directory does not match any registered collection; its files are not validated"
                );
            }
        }
    }
}

fn is_ignored(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with(&['_', '.'][..]))
        .unwrap_or(false)
}

fn entry_id(collection_dir: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(collection_dir).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Derive a URL slug from an entry id
///
/// The extension is dropped, each segment is lowercased with spaces turned
/// into `-` and characters other than alphanumerics, `-` and `_` removed,
/// and a trailing `index` segment collapses into its parent.
pub fn slugify_id(id: &str) -> String {
    let without_ext = match id.rfind('.') {
        Some(dot) if !id[dot..].contains('/') => &id[..dot],
        _ => id,
    };

    let segments: Vec<String> = without_ext
        .split('/')
        .map(slugify_segment)
        .filter(|s| !s.is_empty())
        .collect();

    match segments.as_slice() {
        [parents @ .., last] if last == "index" && !parents.is_empty() => parents.join("/"),
        _ => segments.join("/"),
    }
}

fn slugify_segment(segment: &str) -> String {
    segment
        .trim()
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            c if c.is_alphanumeric() || c == '-' || c == '_' => Some(c),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_id() {
        assert_eq!(slugify_id("first-post.md"), "first-post");
        assert_eq!(slugify_id("My First Post.md"), "my-first-post");
        assert_eq!(slugify_id("2023/Hello, World!.mdx"), "2023/hello-world");
        assert_eq!(slugify_id("guides/index.md"), "guides");
        assert_eq!(slugify_id("index.md"), "index");
        assert_eq!(slugify_id("snake_case.json"), "snake_case");
        assert_eq!(slugify_id("v1.2/notes.md"), "v12/notes");
    }

    #[test]
    fn test_entry_id_uses_forward_slashes() {
        let dir = Path::new("content/blog");
        let path = dir.join("2023").join("post.md");
        assert_eq!(entry_id(dir, &path), "2023/post.md");
    }
}

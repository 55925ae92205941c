//! Content file parsing: Markdown front-matter, YAML and JSON data files
//!
//! Copyright (c) 2025 Contentkit Team
//! Licensed under the Apache-2.0 license

use crate::loader::error::{LoaderError, LoaderResult};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::trace;

/// Supported content file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Markdown with a YAML front-matter block (.md, .mdx, .markdown)
    Markdown,
    /// YAML data entry (.yaml, .yml)
    Yaml,
    /// JSON data entry (.json)
    Json,
}

impl Format {
    /// Every format, in detection order
    pub const ALL: [Format; 3] = [Format::Markdown, Format::Yaml, Format::Json];

    /// Detect format from file extension
    pub fn from_path(path: &Path) -> LoaderResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .ok_or_else(|| LoaderError::unsupported_format(path.to_path_buf()))?;

        Self::ALL
            .into_iter()
            .find(|format| format.extensions().contains(&extension.as_str()))
            .ok_or_else(|| LoaderError::unsupported_format(path.to_path_buf()))
    }

    /// Every supported extension, dot-prefixed, e.g. `.md, .mdx, ...`
    pub fn supported_extensions() -> String {
        Self::ALL
            .iter()
            .flat_map(|format| format.extensions())
            .map(|ext| format!(".{}", ext))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Whether the path has an extension the loader understands
    pub fn is_supported(path: &Path) -> bool {
        Self::from_path(path).is_ok()
    }

    /// Get file extensions for this format
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Format::Markdown => &["md", "mdx", "markdown"],
            Format::Yaml => &["yaml", "yml"],
            Format::Json => &["json"],
        }
    }

    /// Whether entries in this format carry a document body
    pub fn has_body(&self) -> bool {
        matches!(self, Format::Markdown)
    }
}

/// Result of splitting a document into front-matter and body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frontmatter<'a> {
    /// The document does not open with a `---` line
    Absent { body: &'a str },
    /// The opening `---` has no matching closing line
    Unterminated,
    Present { yaml: &'a str, body: &'a str },
}

/// Split a leading `---` delimited block from the rest of the document
///
/// A UTF-8 byte order mark is ignored and delimiter lines may end in CRLF.
pub fn extract_frontmatter(content: &str) -> Frontmatter<'_> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content.split_inclusive('\n');

    let Some(first) = lines.next() else {
        return Frontmatter::Absent { body: content };
    };
    if first.trim_end() != "---" {
        return Frontmatter::Absent { body: content };
    }

    let yaml_start = first.len();
    let mut offset = yaml_start;
    for line in lines {
        if line.trim_end() == "---" {
            return Frontmatter::Present {
                yaml: &content[yaml_start..offset],
                body: &content[offset + line.len()..],
            };
        }
        offset += line.len();
    }

    Frontmatter::Unterminated
}

/// Raw record and optional body parsed from one content file
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEntry {
    pub data: Map<String, Value>,
    pub body: Option<String>,
}

/// Content parser with support for multiple formats
#[derive(Debug, Default)]
pub struct EntryParser;

impl EntryParser {
    /// Create a new entry parser
    pub fn new() -> Self {
        Self
    }

    /// Parse a content file, detecting format from extension
    pub fn parse_file(&self, path: &Path) -> LoaderResult<ParsedEntry> {
        let format = Format::from_path(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| LoaderError::io_error(path.to_path_buf(), e))?;

        self.parse_content(&content, format, path)
    }

    /// Parse content with explicit format
    pub fn parse_content(&self, content: &str, format: Format, path: &Path) -> LoaderResult<ParsedEntry> {
        match format {
            Format::Markdown => match extract_frontmatter(content) {
                Frontmatter::Present { yaml, body } => {
                    trace!(path = %path.display(), bytes = yaml.len(), "Parsing front-matter");
                    Ok(ParsedEntry {
                        data: self.parse_yaml(yaml, path)?,
                        body: Some(body.to_string()),
                    })
                }
                Frontmatter::Absent { body } => Ok(ParsedEntry {
                    data: Map::new(),
                    body: Some(body.to_string()),
                }),
                Frontmatter::Unterminated => Err(LoaderError::UnterminatedFrontmatter {
                    path: path.to_path_buf(),
                }),
            },
            Format::Yaml => Ok(ParsedEntry {
                data: self.parse_yaml(content, path)?,
                body: None,
            }),
            Format::Json => Ok(ParsedEntry {
                data: self.parse_json(content, path)?,
                body: None,
            }),
        }
    }

    /// Parse YAML content into a record
    pub fn parse_yaml(&self, content: &str, path: &Path) -> LoaderResult<Map<String, Value>> {
        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        // First parse as YAML Value to catch YAML-specific errors
        let yaml_value: serde_yaml::Value = serde_yaml::from_str(content)
            .map_err(|e| LoaderError::yaml_parse_error(path.to_path_buf(), e))?;

        // Convert to JSON Value for consistent handling
        let value = serde_json::to_value(yaml_value)
            .map_err(|e| LoaderError::json_parse_error(path.to_path_buf(), e))?;

        into_record(value, path)
    }

    /// Parse JSON content into a record
    pub fn parse_json(&self, content: &str, path: &Path) -> LoaderResult<Map<String, Value>> {
        let value = serde_json::from_str(content)
            .map_err(|e| LoaderError::json_parse_error(path.to_path_buf(), e))?;
        into_record(value, path)
    }
}

fn into_record(value: Value, path: &Path) -> LoaderResult<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(LoaderError::NotARecord {
            path: path.to_path_buf(),
            found: crate::validation::ValidationHelpers::kind_of(&other).to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_path(Path::new("post.md")).unwrap(), Format::Markdown);
        assert_eq!(Format::from_path(Path::new("post.MDX")).unwrap(), Format::Markdown);
        assert_eq!(Format::from_path(Path::new("p.yml")).unwrap(), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("p.json")).unwrap(), Format::Json);
        assert!(Format::from_path(Path::new("image.png")).is_err());
        assert!(Format::from_path(Path::new("README")).is_err());
    }

    #[test]
    fn test_unsupported_format_lists_extensions() {
        let err = Format::from_path(Path::new("notes.txt")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported file format for 'notes.txt'. Expected one of: \
             .md, .mdx, .markdown, .yaml, .yml, .json"
        );
        for format in Format::ALL {
            for ext in format.extensions() {
                let name = format!("entry.{}", ext);
                assert_eq!(Format::from_path(Path::new(&name)).unwrap(), format);
            }
        }
    }

    #[test]
    fn test_extract_frontmatter() {
        let doc = "---\ntitle: Hello\n---\n# Body\n";
        assert_eq!(
            extract_frontmatter(doc),
            Frontmatter::Present {
                yaml: "title: Hello\n",
                body: "# Body\n"
            }
        );
    }

    #[test]
    fn test_extract_frontmatter_crlf_and_bom() {
        let doc = "\u{feff}---\r\ntitle: Hello\r\n---\r\nBody";
        assert_eq!(
            extract_frontmatter(doc),
            Frontmatter::Present {
                yaml: "title: Hello\r\n",
                body: "Body"
            }
        );
    }

    #[test]
    fn test_extract_frontmatter_absent_and_unterminated() {
        assert_eq!(
            extract_frontmatter("# Just markdown"),
            Frontmatter::Absent { body: "# Just markdown" }
        );
        assert_eq!(extract_frontmatter("---\ntitle: x\n"), Frontmatter::Unterminated);
    }

    #[test]
    fn test_parse_markdown_entry() {
        let parser = EntryParser::new();
        let doc = "---\ntitle: Hello\npubDate: 2023-01-05\ntags: [a, b]\n---\nBody text\n";
        let parsed = parser
            .parse_content(doc, Format::Markdown, Path::new("blog/hello.md"))
            .unwrap();
        assert_eq!(
            Value::Object(parsed.data),
            json!({"title": "Hello", "pubDate": "2023-01-05", "tags": ["a", "b"]})
        );
        assert_eq!(parsed.body.as_deref(), Some("Body text\n"));
    }

    #[test]
    fn test_parse_rejects_non_mapping() {
        let parser = EntryParser::new();
        let err = parser
            .parse_content("[1, 2]", Format::Json, Path::new("projects/x.json"))
            .unwrap_err();
        assert!(matches!(err, LoaderError::NotARecord { ref found, .. } if found == "array"));
    }

    #[test]
    fn test_empty_frontmatter_is_empty_record() {
        let parser = EntryParser::new();
        let parsed = parser
            .parse_content("---\n---\nbody", Format::Markdown, Path::new("a.md"))
            .unwrap();
        assert!(parsed.data.is_empty());
    }
}

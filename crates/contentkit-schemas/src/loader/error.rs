//! Error types for content loading operations
//!
//! Copyright (c) 2025 Contentkit Team
//! Licensed under the Apache-2.0 license

use crate::loader::parser::Format;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for loader operations
pub type LoaderResult<T> = Result<T, LoaderError>;

/// Error types for discovering and parsing content files
#[derive(Error, Debug)]
pub enum LoaderError {
    /// File I/O errors
    #[error("Failed to read file '{path}': {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// YAML parsing errors
    #[error("Failed to parse YAML in '{path}': {source}")]
    YamlParseError {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// JSON parsing errors
    #[error("Failed to parse JSON in '{path}': {source}")]
    JsonParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Front-matter block opened but never closed
    #[error("Unterminated front-matter in '{path}': missing closing '---'")]
    UnterminatedFrontmatter { path: PathBuf },

    /// Unsupported file format
    #[error("Unsupported file format for '{path}'. Expected one of: {expected}")]
    UnsupportedFormat { path: PathBuf, expected: String },

    /// Parsed data is not a key-value record
    #[error("Entry data in '{path}' must be a mapping, found {found}")]
    NotARecord { path: PathBuf, found: String },

    /// Content root directory does not exist
    #[error("Content directory '{path}' does not exist")]
    ContentRootMissing { path: PathBuf },

    /// Directory traversal errors
    #[error("Failed to walk '{path}': {reason}")]
    WalkError { path: PathBuf, reason: String },
}

impl LoaderError {
    /// Create an I/O error with path context
    pub fn io_error(path: PathBuf, error: std::io::Error) -> Self {
        Self::IoError {
            path,
            source: error,
        }
    }

    /// Create a YAML parsing error with path context
    pub fn yaml_parse_error(path: PathBuf, error: serde_yaml::Error) -> Self {
        Self::YamlParseError {
            path,
            source: error,
        }
    }

    /// Create a JSON parsing error with path context
    pub fn json_parse_error(path: PathBuf, error: serde_json::Error) -> Self {
        Self::JsonParseError {
            path,
            source: error,
        }
    }

    /// Create an unsupported format error
    pub fn unsupported_format(path: PathBuf) -> Self {
        Self::UnsupportedFormat {
            path,
            expected: Format::supported_extensions(),
        }
    }

    /// Get the path associated with this error
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::IoError { path, .. }
            | Self::YamlParseError { path, .. }
            | Self::JsonParseError { path, .. }
            | Self::UnterminatedFrontmatter { path }
            | Self::UnsupportedFormat { path, .. }
            | Self::NotARecord { path, .. }
            | Self::ContentRootMissing { path }
            | Self::WalkError { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let path = PathBuf::from("blog/post.md");

        let io_err = LoaderError::io_error(
            path.clone(),
            std::io::Error::new(std::io::ErrorKind::NotFound, "File not found"),
        );
        assert!(matches!(io_err, LoaderError::IoError { .. }));
        assert_eq!(io_err.path(), &path);

        let parse_err = LoaderError::yaml_parse_error(
            path.clone(),
            serde_yaml::from_str::<serde_yaml::Value>("{").unwrap_err(),
        );
        assert!(parse_err.to_string().starts_with("Failed to parse YAML in 'blog/post.md'"));
    }
}

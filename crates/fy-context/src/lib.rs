#![forbid(unsafe_code)]

//! Code-context collaborators for the diagram assistant.
//!
//! Files are gathered from the local filesystem or a GitHub repository and
//! handed to the assistant as finished [`ContextFile`] values. Both sources
//! skip binary files and respect the same [`fy_core::FetchLimits`].

mod files;
mod github;

pub use files::{
    BINARY_EXTENSIONS, ReadFileResult, collect_local, contains_binary_content, detect_language,
    is_binary_extension, read_text_file,
};
pub use github::{
    DEFAULT_BRANCH, GITHUB_API_BASE, GitHubFetcher, GitHubRepo, HttpResponse, ReqwestTransport,
    Transport, parse_repo_spec,
};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContextSource {
    Local,
    Github,
}

impl ContextSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Github => "github",
        }
    }
}

/// One text file offered to the assistant as context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContextFile {
    /// Final path component.
    pub name: String,
    /// Path relative to the repository or walked directory.
    pub path: String,
    pub content: String,
    pub language: String,
    /// Content length in bytes.
    pub size: u64,
    pub source: ContextSource,
}

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("Repository not found or private")]
    RepoNotFound,
    #[error("API rate limit exceeded. Try again later.")]
    RateLimited,
    #[error("Failed to fetch repository: {0}")]
    Status(u16),
    #[error("No readable files found in repository")]
    NoReadableFiles,
    #[error("No readable files found under {}", .0.display())]
    NoLocalFiles(PathBuf),
    #[error("invalid repository '{0}': expected owner/repo[@branch][:path] or a GitHub URL")]
    InvalidRepoSpec(String),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected response from {url}: {message}")]
    Decode { url: String, message: String },
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ContextError {
    /// Map a non-success status of the repository tree request.
    #[must_use]
    pub const fn from_tree_status(status: u16) -> Self {
        match status {
            404 => Self::RepoNotFound,
            403 => Self::RateLimited,
            other => Self::Status(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ContextError, ContextFile, ContextSource};

    #[test]
    fn tree_status_maps_to_user_messages() {
        assert_eq!(
            ContextError::from_tree_status(404).to_string(),
            "Repository not found or private"
        );
        assert_eq!(
            ContextError::from_tree_status(403).to_string(),
            "API rate limit exceeded. Try again later."
        );
        assert_eq!(
            ContextError::from_tree_status(500).to_string(),
            "Failed to fetch repository: 500"
        );
    }

    #[test]
    fn context_file_serializes_source_in_lowercase() {
        let file = ContextFile {
            name: "main.rs".to_string(),
            path: "src/main.rs".to_string(),
            content: "fn main() {}".to_string(),
            language: "rust".to_string(),
            size: 12,
            source: ContextSource::Github,
        };
        let value = serde_json::to_value(&file).expect("serialize context file");
        assert_eq!(value["source"], "github");
        assert_eq!(value["language"], "rust");
        assert_eq!(ContextSource::Local.as_str(), "local");
    }
}

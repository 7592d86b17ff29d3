use std::fs;
use std::path::{Path, PathBuf};

use fy_core::FetchLimits;
use ignore::WalkBuilder;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{ContextError, ContextFile, ContextSource};

/// Extensions that are never read as text.
pub const BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "ico", "svg", "pdf", "doc", "docx", "xls", "xlsx",
    "ppt", "pptx", "zip", "tar", "gz", "rar", "7z", "exe", "dll", "so", "dylib", "mp3", "mp4",
    "wav", "avi", "mov", "woff", "woff2", "ttf", "eot", "otf", "bin", "dat",
];

/// Text after the last `.` (the whole name when there is none), lowercased.
fn extension(name: &str) -> String {
    name.rsplit('.').next().unwrap_or(name).to_ascii_lowercase()
}

#[must_use]
pub fn is_binary_extension(name: &str) -> bool {
    let ext = extension(name);
    BINARY_EXTENSIONS.contains(&ext.as_str())
}

/// NUL bytes never appear in text files.
#[must_use]
pub fn contains_binary_content(content: &str) -> bool {
    content.contains('\0')
}

/// Language tag for syntax highlighting, `plaintext` when unknown.
#[must_use]
pub fn detect_language(name: &str) -> &'static str {
    match extension(name).as_str() {
        "ts" | "tsx" => "typescript",
        "js" | "jsx" => "javascript",
        "vue" => "vue",
        "py" => "python",
        "java" => "java",
        "go" => "go",
        "rs" => "rust",
        "rb" => "ruby",
        "php" => "php",
        "css" => "css",
        "scss" => "scss",
        "html" => "html",
        "json" => "json",
        "md" => "markdown",
        "yaml" | "yml" => "yaml",
        "c" | "h" => "c",
        "cpp" | "hpp" => "cpp",
        "cs" => "csharp",
        "swift" => "swift",
        "kt" => "kotlin",
        "scala" => "scala",
        "sql" => "sql",
        "sh" | "bash" => "shell",
        "xml" => "xml",
        "toml" => "toml",
        _ => "plaintext",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReadFileResult {
    pub success: bool,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub is_binary: bool,
}

impl ReadFileResult {
    fn text(content: String) -> Self {
        Self {
            success: true,
            content,
            ..Self::default()
        }
    }

    fn binary(reason: &str) -> Self {
        Self {
            error: Some(reason.to_string()),
            is_binary: true,
            ..Self::default()
        }
    }

    fn failed(error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

/// Read `path` as UTF-8 text (invalid sequences are replaced).
///
/// Never fails: binary files and read errors are reported in the result.
#[must_use]
pub fn read_text_file(path: &Path) -> ReadFileResult {
    let name = display_name(path);
    if is_binary_extension(&name) {
        return ReadFileResult::binary("Binary file skipped");
    }

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => return ReadFileResult::failed(format!("Failed to read file: {name}: {err}")),
    };
    let content = String::from_utf8(bytes)
        .unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned());

    if contains_binary_content(&content) {
        return ReadFileResult::binary("Binary content detected");
    }
    ReadFileResult::text(content)
}

/// Gather text files from `roots` (files or directories) within `limits`.
///
/// Directories are walked in file-name order and honor `.gitignore`. Binary
/// and oversized files are skipped; collection stops at `max_files` or once
/// `max_total_size` bytes have been read.
pub fn collect_local(
    roots: &[PathBuf],
    limits: &FetchLimits,
) -> Result<Vec<ContextFile>, ContextError> {
    let mut candidates: Vec<(PathBuf, String)> = Vec::new();
    for root in roots {
        let metadata = fs::metadata(root).map_err(|source| ContextError::Io {
            path: root.clone(),
            source,
        })?;
        if metadata.is_file() {
            candidates.push((root.clone(), root.display().to_string()));
            continue;
        }

        let walker = WalkBuilder::new(root)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!(root = %root.display(), error = %err, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|kind| kind.is_file()) {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(root)
                .unwrap_or(entry.path())
                .display()
                .to_string();
            candidates.push((entry.into_path(), relative));
        }
    }

    let mut files = Vec::new();
    let mut total_size = 0_u64;
    for (path, relative) in candidates {
        if files.len() >= limits.max_files || total_size >= limits.max_total_size {
            debug!(collected = files.len(), total_size, "local context limit reached");
            break;
        }
        if is_binary_extension(&relative) {
            trace!(path = %relative, "skipping binary extension");
            continue;
        }
        let size = fs::metadata(&path).map_or(0, |metadata| metadata.len());
        if size > limits.max_file_size {
            trace!(path = %relative, size, "skipping oversized file");
            continue;
        }

        let result = read_text_file(&path);
        if !result.success {
            debug!(path = %relative, error = ?result.error, "skipping file");
            continue;
        }
        let size = result.content.len() as u64;
        total_size += size;
        files.push(ContextFile {
            name: display_name(&path),
            language: detect_language(&relative).to_string(),
            path: relative,
            content: result.content,
            size,
            source: ContextSource::Local,
        });
    }

    if files.is_empty() {
        let shown = roots.first().cloned().unwrap_or_default();
        return Err(ContextError::NoLocalFiles(shown));
    }
    debug!(files = files.len(), total_size, "collected local context");
    Ok(files)
}

#![forbid(unsafe_code)]

mod config;
mod history;
mod templates;

pub use config::{
    AssistantConfig, ConfigError, ConfigParse, EditorSettings, EditorTheme, FetchLimits,
    parse_config_value,
};
pub use history::{DEFAULT_HISTORY_LIMIT, DiagramHistory};
pub use templates::{
    DiagramTemplate, STARTER_TEMPLATES, TemplateCategory, blank_content, default_content,
    starter_template, template, templates_for,
};

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File extension used when a diagram is saved on its own.
pub const MERMAID_FILE_EXTENSION: &str = ".mmd";

/// Canonical diagram-type identifier shared by the classifier, the template
/// tables, and downstream render configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiagramType {
    #[serde(rename = "classDiagram")]
    Class,
    #[serde(rename = "sequenceDiagram")]
    Sequence,
    #[serde(rename = "flowchart")]
    Flowchart,
    #[serde(rename = "stateDiagram")]
    State,
    #[serde(rename = "erDiagram")]
    Er,
    #[serde(rename = "gantt")]
    Gantt,
    #[serde(rename = "pie")]
    Pie,
    #[serde(rename = "mindmap")]
    Mindmap,
    #[serde(rename = "timeline")]
    Timeline,
    #[serde(rename = "gitGraph")]
    GitGraph,
    #[serde(rename = "journey")]
    Journey,
}

impl DiagramType {
    pub const ALL: [Self; 11] = [
        Self::Class,
        Self::Sequence,
        Self::Flowchart,
        Self::State,
        Self::Er,
        Self::Gantt,
        Self::Pie,
        Self::Mindmap,
        Self::Timeline,
        Self::GitGraph,
        Self::Journey,
    ];

    /// Canonical identifier, identical to the Mermaid keyword for every type
    /// except `stateDiagram-v2` sources, which share `stateDiagram`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Class => "classDiagram",
            Self::Sequence => "sequenceDiagram",
            Self::Flowchart => "flowchart",
            Self::State => "stateDiagram",
            Self::Er => "erDiagram",
            Self::Gantt => "gantt",
            Self::Pie => "pie",
            Self::Mindmap => "mindmap",
            Self::Timeline => "timeline",
            Self::GitGraph => "gitGraph",
            Self::Journey => "journey",
        }
    }

    /// Short slug used by the starter-template catalogue.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Sequence => "sequence",
            Self::Flowchart => "flowchart",
            Self::State => "state",
            Self::Er => "er",
            Self::Gantt => "gantt",
            Self::Pie => "pie",
            Self::Mindmap => "mindmap",
            Self::Timeline => "timeline",
            Self::GitGraph => "gitgraph",
            Self::Journey => "journey",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Class => "Class Diagram",
            Self::Sequence => "Sequence Diagram",
            Self::Flowchart => "Flowchart",
            Self::State => "State Diagram",
            Self::Er => "ER Diagram",
            Self::Gantt => "Gantt Chart",
            Self::Pie => "Pie Chart",
            Self::Mindmap => "Mind Map",
            Self::Timeline => "Timeline",
            Self::GitGraph => "Git Graph",
            Self::Journey => "User Journey",
        }
    }
}

impl fmt::Display for DiagramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown diagram type '{0}'")]
pub struct UnknownDiagramType(pub String);

impl FromStr for DiagramType {
    type Err = UnknownDiagramType;

    /// Accepts the canonical identifier, the catalogue slug, or `graph`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("graph") {
            return Ok(Self::Flowchart);
        }
        if trimmed.eq_ignore_ascii_case("stateDiagram-v2") {
            return Ok(Self::State);
        }
        Self::ALL
            .into_iter()
            .find(|kind| {
                kind.as_str().eq_ignore_ascii_case(trimmed) || kind.slug().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| UnknownDiagramType(trimmed.to_string()))
    }
}

/// Plain-text annotation that immediately follows a diagram fence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SidecarBlock {
    /// Full trimmed body, header line included.
    pub content: String,
    /// From a `Diagram: <name>` header line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// From the `(<type>)` suffix of the header line.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl SidecarBlock {
    #[must_use]
    pub fn has_header(&self) -> bool {
        self.name.is_some()
    }
}

/// One diagram fence (and optional sidecar) located in a larger text.
///
/// `start_index..end_index` is a byte range into the text the block was
/// extracted from and always covers the fences themselves, so replacing that
/// range swaps the whole suggestion without touching surrounding text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DiagramBlock {
    pub id: String,
    pub mermaid_content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidecar: Option<SidecarBlock>,
    pub start_index: usize,
    pub end_index: usize,
}

impl DiagramBlock {
    #[must_use]
    pub fn block_id(index: usize) -> String {
        format!("diagram-{index}")
    }

    #[must_use]
    pub const fn span(&self) -> Range<usize> {
        self.start_index..self.end_index
    }

    /// The fenced source this block was matched from, if `text` is the
    /// original input.
    #[must_use]
    pub fn source<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.span())
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.sidecar.as_ref().and_then(|sidecar| sidecar.name.as_deref())
    }
}

/// Outcome of a failed syntax check. Built per call and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    /// 1-based line where the problem was detected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            line: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn at_line(line: usize, message: impl Into<String>) -> Self {
        Self {
            line: Some(line),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Insert,
    #[default]
    Replace,
    Modify,
}

impl SuggestionKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Replace => "replace",
            Self::Modify => "modify",
        }
    }
}

/// A diagram edit proposed by the assistant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct DiagramSuggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub content: String,
    pub description: String,
}

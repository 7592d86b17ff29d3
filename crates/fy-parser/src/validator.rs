use fy_core::{DiagramType, ValidationError};
use serde::Serialize;

/// Keywords accepted on the first line of a diagram source.
pub const DIAGRAM_KEYWORDS: [&str; 13] = [
    "classDiagram",
    "sequenceDiagram",
    "graph",
    "flowchart",
    "erDiagram",
    "stateDiagram",
    "stateDiagram-v2",
    "gantt",
    "pie",
    "mindmap",
    "timeline",
    "gitGraph",
    "journey",
];

pub const EMPTY_CONTENT_MESSAGE: &str = "Diagram content cannot be empty";

/// Classification precedence. Matching is by substring, so order matters:
/// `flowchart` is tried before `graph`, and the specific `*Diagram` keywords
/// before the short ones.
const CLASSIFY_ORDER: [(&str, DiagramType); 12] = [
    ("classDiagram", DiagramType::Class),
    ("sequenceDiagram", DiagramType::Sequence),
    ("flowchart", DiagramType::Flowchart),
    ("graph", DiagramType::Flowchart),
    ("erDiagram", DiagramType::Er),
    ("stateDiagram", DiagramType::State),
    ("gantt", DiagramType::Gantt),
    ("pie", DiagramType::Pie),
    ("mindmap", DiagramType::Mindmap),
    ("timeline", DiagramType::Timeline),
    ("gitGraph", DiagramType::GitGraph),
    ("journey", DiagramType::Journey),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    /// Keyword found on the first line.
    pub keyword: &'static str,
    pub diagram_type: DiagramType,
}

/// First line of the trimmed source, or `None` for blank input.
fn header_line(content: &str) -> Option<&str> {
    content.trim().lines().next()
}

/// Lightweight syntax check: the first line must name a known diagram type.
///
/// Only the header is inspected; the diagram body is never parsed.
pub fn validate(content: &str) -> Result<(), ValidationError> {
    let Some(first_line) = header_line(content) else {
        return Err(ValidationError::new(EMPTY_CONTENT_MESSAGE));
    };

    if DIAGRAM_KEYWORDS
        .iter()
        .any(|keyword| first_line.contains(keyword))
    {
        Ok(())
    } else {
        Err(ValidationError::at_line(
            1,
            format!(
                "Invalid diagram type. Expected one of: {}",
                DIAGRAM_KEYWORDS.join(", ")
            ),
        ))
    }
}

#[must_use]
pub fn detect(content: &str) -> Option<Detection> {
    let first_line = header_line(content)?;
    CLASSIFY_ORDER
        .iter()
        .find(|(keyword, _)| first_line.contains(keyword))
        .map(|&(keyword, diagram_type)| Detection {
            keyword,
            diagram_type,
        })
}

/// Canonical diagram type named on the first line, first match by precedence.
#[must_use]
pub fn classify(content: &str) -> Option<DiagramType> {
    detect(content).map(|detection| detection.diagram_type)
}

use fy_core::{DiagramBlock, DiagramSuggestion, SuggestionKind};
use thiserror::Error;
use tracing::debug;

use crate::blocks::{BlockScanner, DIAGRAM_OPEN};

pub const SUGGESTION_DESCRIPTION: &str = "AI-generated diagram suggestion";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpliceError {
    #[error("block span {start}..{end} is outside the text (length {len})")]
    OutOfBounds { start: usize, end: usize, len: usize },
    #[error("block span offset {offset} is not on a character boundary")]
    NotCharBoundary { offset: usize },
    #[error("block {id} no longer starts with a diagram fence; re-extract before replacing")]
    StaleSpan { id: String },
}

/// Turn the first diagram fence of an assistant response into a replacement
/// suggestion. Responses without a diagram (or with an empty one) yield `None`.
#[must_use]
pub fn extract_suggestion(response: &str) -> Option<DiagramSuggestion> {
    let block = BlockScanner::new(response).next()?;
    if block.mermaid_content.is_empty() {
        debug!(id = %block.id, "ignoring empty diagram suggestion");
        return None;
    }
    Some(DiagramSuggestion {
        kind: SuggestionKind::Replace,
        content: block.mermaid_content,
        description: SUGGESTION_DESCRIPTION.to_string(),
    })
}

/// Replace the fenced region `block` was extracted from with `replacement`.
///
/// `block` must come from extracting `text` itself; surrounding text is left
/// byte-for-byte intact.
pub fn replace_block(
    text: &str,
    block: &DiagramBlock,
    replacement: &str,
) -> Result<String, SpliceError> {
    let (start, end) = (block.start_index, block.end_index);
    if start > end || end > text.len() {
        return Err(SpliceError::OutOfBounds {
            start,
            end,
            len: text.len(),
        });
    }
    if let Some(offset) = [start, end]
        .into_iter()
        .find(|offset| !text.is_char_boundary(*offset))
    {
        return Err(SpliceError::NotCharBoundary { offset });
    }
    if !text[start..end].starts_with(DIAGRAM_OPEN) {
        return Err(SpliceError::StaleSpan {
            id: block.id.clone(),
        });
    }

    let mut spliced = String::with_capacity(text.len() - (end - start) + replacement.len());
    spliced.push_str(&text[..start]);
    spliced.push_str(replacement);
    spliced.push_str(&text[end..]);
    debug!(id = %block.id, start, end, "replaced diagram block");
    Ok(spliced)
}

use std::ops::Range;

use fy_core::{DiagramBlock, SidecarBlock};
use tracing::trace;

use crate::sidecar::parse_sidecar_header;

pub(crate) const DIAGRAM_OPEN: &str = "```mermaid";
const SIDECAR_OPEN: &str = "```text";
const FENCE_CLOSE: &str = "\n```";

/// A fenced region located by the scanner, in byte offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Fence {
    body: Range<usize>,
    end: usize,
}

/// Lazy left-to-right scanner over the diagram fences of a text.
///
/// Matches never overlap: scanning resumes right after the previous block's
/// span, sidecar included.
#[derive(Debug, Clone)]
pub struct BlockScanner<'a> {
    text: &'a str,
    cursor: usize,
    next_index: usize,
}

impl<'a> BlockScanner<'a> {
    #[must_use]
    pub const fn new(text: &'a str) -> Self {
        Self {
            text,
            cursor: 0,
            next_index: 0,
        }
    }
}

impl Iterator for BlockScanner<'_> {
    type Item = DiagramBlock;

    fn next(&mut self) -> Option<Self::Item> {
        let text = self.text;
        loop {
            let start = self.cursor + text.get(self.cursor..)?.find(DIAGRAM_OPEN)?;
            let Some(body_start) = open_fence(text, start, DIAGRAM_OPEN) else {
                // Marker without a newline (e.g. "```mermaidjs"); the backtick is one byte.
                self.cursor = start + 1;
                continue;
            };
            let Some(diagram) = close_fence(text, body_start) else {
                trace!(start, "unterminated diagram fence");
                self.cursor = text.len();
                return None;
            };

            let (sidecar_fence, end) = match sidecar_after(text, diagram.end) {
                Some(fence) => {
                    let end = fence.end;
                    (Some(fence), end)
                }
                None => (None, diagram.end),
            };

            let sidecar = sidecar_fence.and_then(|fence| {
                let body = text[fence.body].trim();
                (!body.is_empty()).then(|| parse_sidecar_header(body))
            });

            let index = self.next_index;
            self.next_index += 1;
            self.cursor = end;

            trace!(
                index,
                start,
                end,
                has_sidecar = sidecar.is_some(),
                "matched diagram block"
            );
            return Some(DiagramBlock {
                id: DiagramBlock::block_id(index),
                mermaid_content: text[diagram.body].trim().to_string(),
                sidecar,
                start_index: start,
                end_index: end,
            });
        }
    }
}

/// Byte offset of the body when `text[at..]` opens a fence with `marker`.
///
/// The marker must be followed directly by a line break (`\n` or `\r\n`).
fn open_fence(text: &str, at: usize, marker: &str) -> Option<usize> {
    let rest = text.get(at..)?.strip_prefix(marker)?;
    let line_break = if rest.starts_with('\n') {
        1
    } else if rest.starts_with("\r\n") {
        2
    } else {
        return None;
    };
    Some(at + marker.len() + line_break)
}

/// The body ends at the first newline followed by three backticks.
fn close_fence(text: &str, body_start: usize) -> Option<Fence> {
    let body_end = body_start + text.get(body_start..)?.find(FENCE_CLOSE)?;
    Some(Fence {
        body: body_start..body_end,
        end: body_end + FENCE_CLOSE.len(),
    })
}

/// A plain-text fence separated from the diagram fence by whitespace only.
fn sidecar_after(text: &str, diagram_end: usize) -> Option<Fence> {
    let rest = text.get(diagram_end..)?;
    let gap = rest.len() - rest.trim_start().len();
    let body_start = open_fence(text, diagram_end + gap, SIDECAR_OPEN)?;
    close_fence(text, body_start)
}

/// Scan `text` for diagram fences and their optional sidecar annotations.
///
/// An opening marker may end in `\n` or `\r\n`; closing fences are always
/// `\n` followed by three backticks. Never fails: text without a complete
/// diagram fence yields an empty list.
#[must_use]
pub fn extract_blocks(text: &str) -> Vec<DiagramBlock> {
    BlockScanner::new(text).collect()
}

#[must_use]
pub fn has_diagram_blocks(text: &str) -> bool {
    BlockScanner::new(text).next().is_some()
}

/// Format a diagram (and optional annotation) as the fenced text that
/// [`extract_blocks`] recognises.
#[must_use]
pub fn render_block(mermaid: &str, sidecar: Option<&str>) -> String {
    let mut rendered = format!("{DIAGRAM_OPEN}\n{}{FENCE_CLOSE}", mermaid.trim());
    if let Some(note) = sidecar.map(str::trim).filter(|note| !note.is_empty()) {
        rendered.push('\n');
        rendered.push_str(SIDECAR_OPEN);
        rendered.push('\n');
        rendered.push_str(note);
        rendered.push_str(FENCE_CLOSE);
    }
    rendered
}

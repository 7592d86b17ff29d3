#![forbid(unsafe_code)]

//! Diagram block extraction and lightweight syntax checks for assistant
//! transcripts.
//!
//! Every entry point is a pure function over borrowed text and never fails on
//! malformed input: missing fences produce empty results and syntax problems
//! are reported as [`fy_core::ValidationError`] values.

mod blocks;
mod sidecar;
mod suggest;
mod validator;

pub use blocks::{BlockScanner, extract_blocks, has_diagram_blocks, render_block};
pub use sidecar::parse_sidecar_header;
pub use suggest::{SUGGESTION_DESCRIPTION, SpliceError, extract_suggestion, replace_block};
pub use validator::{
    DIAGRAM_KEYWORDS, Detection, EMPTY_CONTENT_MESSAGE, classify, detect, validate,
};

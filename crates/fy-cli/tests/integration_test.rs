//! Integration tests for the Flowify assistant pipeline.
//!
//! These tests follow a suggestion from an assistant transcript through
//! extraction, validation, and splicing back into the document.

use fy_core::{DiagramHistory, DiagramType, SuggestionKind, default_content};
use fy_parser::{
    classify, extract_blocks, extract_suggestion, parse_sidecar_header, render_block,
    replace_block, validate,
};

const TRANSCRIPT: &str = concat!(
    "I restructured the checkout:\n\n",
    "```mermaid\n",
    "flowchart LR\n",
    "    Cart --> Pay\n",
    "    Pay --> Done\n",
    "```\n",
    "```text\n",
    "Diagram: Checkout (flowchart)\n",
    "Cart to confirmation.\n",
    "```\n\n",
    "And the data model:\n\n",
    "```mermaid\n",
    "erDiagram\n",
    "    ORDER ||--|{ LINE : contains\n",
    "```\n",
);

/// Blocks come back in order with annotations and usable spans.
#[test]
fn transcript_blocks_are_extracted_with_annotations() {
    let blocks = extract_blocks(TRANSCRIPT);
    assert_eq!(blocks.len(), 2);

    assert_eq!(blocks[0].id, "diagram-0");
    assert_eq!(blocks[0].name(), Some("Checkout"));
    assert_eq!(
        blocks[0].sidecar.as_ref().and_then(|s| s.kind.as_deref()),
        Some("flowchart")
    );
    assert_eq!(classify(&blocks[0].mermaid_content), Some(DiagramType::Flowchart));

    assert_eq!(blocks[1].id, "diagram-1");
    assert!(blocks[1].sidecar.is_none());
    assert_eq!(classify(&blocks[1].mermaid_content), Some(DiagramType::Er));

    for block in &blocks {
        assert!(validate(&block.mermaid_content).is_ok(), "{}", block.id);
        let source = block.source(TRANSCRIPT).expect("span slices transcript");
        assert!(source.starts_with("```mermaid\n"));
        assert!(source.ends_with("```"));
    }
}

/// A suggested diagram replaces the annotated block and keeps everything else.
#[test]
fn suggestion_round_trips_into_the_document() {
    let response = "Here you go:\n```mermaid\nflowchart LR\n    Cart --> Pay\n    Pay --> Receipt\n```";
    let suggestion = extract_suggestion(response).expect("suggestion");
    assert_eq!(suggestion.kind, SuggestionKind::Replace);
    assert!(validate(&suggestion.content).is_ok());

    let blocks = extract_blocks(TRANSCRIPT);
    let annotation = blocks[0].sidecar.as_ref().map(|s| s.content.as_str());
    let replacement = render_block(&suggestion.content, annotation);
    let updated = replace_block(TRANSCRIPT, &blocks[0], &replacement).expect("splice");

    let reparsed = extract_blocks(&updated);
    assert_eq!(reparsed.len(), 2);
    assert_eq!(reparsed[0].mermaid_content, suggestion.content);
    assert_eq!(reparsed[0].name(), Some("Checkout"));
    assert_eq!(reparsed[1].mermaid_content, blocks[1].mermaid_content);
    assert!(updated.starts_with("I restructured the checkout:\n\n"));
    assert!(updated.ends_with("    ORDER ||--|{ LINE : contains\n```\n"));
}

/// Editing with history can undo an applied suggestion.
#[test]
fn applied_suggestion_can_be_undone() {
    let mut history = DiagramHistory::default();
    let original = default_content(DiagramType::Flowchart).to_string();
    let suggested = "flowchart TD\n    A --> B".to_string();

    history.record(original.clone());
    let restored = history.undo(suggested.clone()).expect("undo");
    assert_eq!(restored, original);
    assert_eq!(history.redo(restored).as_deref(), Some(suggested.as_str()));
}

/// A declared sidecar type agrees with the classifier for every diagram type.
#[test]
fn declared_types_agree_with_classifier() {
    for kind in DiagramType::ALL {
        let text = render_block(
            default_content(kind),
            Some(&format!("Diagram: Example ({})", kind.as_str())),
        );
        let blocks = extract_blocks(&text);
        assert_eq!(blocks.len(), 1, "{kind}");
        let declared: DiagramType = blocks[0]
            .sidecar
            .as_ref()
            .and_then(|s| s.kind.as_deref())
            .expect("declared type")
            .parse()
            .expect("known type");
        assert_eq!(classify(&blocks[0].mermaid_content), Some(declared), "{kind}");
    }
}

/// Header parsing never alters the annotation body.
#[test]
fn header_parsing_preserves_body() {
    let body = "Diagram: Payment States (stateDiagram)\n\nIdle -> Busy -> Idle";
    let sidecar = parse_sidecar_header(body);
    assert_eq!(sidecar.content, body);
    assert_eq!(sidecar.name.as_deref(), Some("Payment States"));
}

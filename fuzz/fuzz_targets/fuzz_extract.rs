#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let blocks = fy_parser::extract_blocks(text);
    let mut previous_end = 0;
    for (index, block) in blocks.iter().enumerate() {
        assert_eq!(block.id, format!("diagram-{index}"));
        assert!(block.start_index >= previous_end);
        assert!(block.end_index <= text.len());
        let source = block.source(text).expect("span is a char range of the text");
        assert!(source.starts_with("```mermaid"));
        previous_end = block.end_index;

        if let Ok(updated) = fy_parser::replace_block(text, block, source) {
            assert_eq!(updated, text);
        }
    }
    let _ = fy_parser::extract_suggestion(text);
    let _ = serde_json::to_string(&blocks);
});

#![forbid(unsafe_code)]

//! Browser bindings for the Flowify diagram assistant.
//!
//! Offsets crossing this boundary are UTF-16 code units so they can be used
//! with `String.prototype.slice` directly.

use std::sync::{LazyLock, RwLock};

use fy_core::{
    AssistantConfig, DiagramBlock, DiagramHistory, DiagramType, STARTER_TEMPLATES, blank_content,
    parse_config_value, template,
};
use fy_parser::{classify, extract_blocks, extract_suggestion, replace_block, validate};
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::wasm_bindgen;

static RUNTIME_CONFIG: LazyLock<RwLock<AssistantConfig>> =
    LazyLock::new(|| RwLock::new(AssistantConfig::default()));

fn read_runtime_config() -> AssistantConfig {
    match RUNTIME_CONFIG.read() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

fn write_runtime_config(config: AssistantConfig) {
    match RUNTIME_CONFIG.write() {
        Ok(mut guard) => *guard = config,
        Err(poisoned) => {
            let mut guard = poisoned.into_inner();
            *guard = config;
        }
    }
}

fn js_error(message: impl Into<String>) -> JsValue {
    JsValue::from_str(&message.into())
}

fn parse_js_value_or_default<T>(value: Option<JsValue>) -> Result<T, JsValue>
where
    T: for<'de> Deserialize<'de> + Default,
{
    match value {
        None => Ok(T::default()),
        Some(raw) if raw.is_undefined() || raw.is_null() => Ok(T::default()),
        Some(raw) => {
            #[cfg(target_arch = "wasm32")]
            {
                serde_wasm_bindgen::from_value(raw)
                    .map_err(|err| js_error(format!("invalid config: {err}")))
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                let _ = raw;
                Ok(T::default())
            }
        }
    }
}

fn to_js_value<T>(value: &T) -> Result<JsValue, JsValue>
where
    T: Serialize,
{
    #[cfg(target_arch = "wasm32")]
    {
        serde_wasm_bindgen::to_value(value)
            .map_err(|err| js_error(format!("failed to serialize response: {err}")))
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        serde_json::to_string(value)
            .map(|json| JsValue::from_str(&json))
            .map_err(|err| js_error(format!("failed to serialize response: {err}")))
    }
}

/// Layer `overrides` on `base`; the first invalid field is an error.
fn merge_config(
    base: &AssistantConfig,
    overrides: &serde_json::Value,
) -> Result<AssistantConfig, String> {
    if overrides.is_null() {
        return Ok(base.clone());
    }
    let parsed = parse_config_value(overrides, base);
    match parsed.errors.first() {
        Some(error) => Err(format!(
            "invalid config value for '{}': {}",
            error.field, error.message
        )),
        None => Ok(parsed.config),
    }
}

fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// UTF-16 offset of byte offset `byte` (a char boundary) in `text`.
fn byte_to_utf16(text: &str, byte: usize) -> usize {
    text.get(..byte).map_or_else(|| utf16_len(text), utf16_len)
}

/// Byte offset of UTF-16 offset `unit`, or `None` when it is past the end or
/// splits a surrogate pair.
fn utf16_to_byte(text: &str, unit: usize) -> Option<usize> {
    let mut units = 0;
    for (byte, ch) in text.char_indices() {
        if units == unit {
            return Some(byte);
        }
        units += ch.len_utf16();
        if units > unit {
            return None;
        }
    }
    (units == unit).then_some(text.len())
}

/// Blocks of `text` with offsets converted to UTF-16 code units.
fn extract_blocks_utf16(text: &str) -> Vec<DiagramBlock> {
    extract_blocks(text)
        .into_iter()
        .map(|mut block| {
            block.start_index = byte_to_utf16(text, block.start_index);
            block.end_index = byte_to_utf16(text, block.end_index);
            block
        })
        .collect()
}

/// Splice `replacement` over the UTF-16 span `start..end` of `text`.
fn replace_utf16_span(
    text: &str,
    start: usize,
    end: usize,
    replacement: &str,
) -> Result<String, String> {
    let to_byte = |unit| {
        utf16_to_byte(text, unit)
            .ok_or_else(|| format!("offset {unit} is not a character position in the text"))
    };
    let block = DiagramBlock {
        id: format!("span {start}..{end}"),
        mermaid_content: String::new(),
        sidecar: None,
        start_index: to_byte(start)?,
        end_index: to_byte(end)?,
    };
    replace_block(text, &block, replacement).map_err(|err| err.to_string())
}

fn template_source(kind: &str, index: Option<usize>, blank: bool) -> Result<&'static str, String> {
    let kind: DiagramType = kind.parse().map_err(|err: fy_core::UnknownDiagramType| err.to_string())?;
    Ok(if blank {
        blank_content(kind)
    } else {
        template(kind, index.unwrap_or(0))
    })
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
pub fn init(config: Option<JsValue>) -> Result<(), JsValue> {
    let overrides: serde_json::Value = parse_js_value_or_default(config)?;
    let next = merge_config(&read_runtime_config(), &overrides).map_err(js_error)?;
    write_runtime_config(next);
    Ok(())
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen(js_name = getConfig))]
pub fn get_config_js() -> Result<JsValue, JsValue> {
    to_js_value(&read_runtime_config())
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen(js_name = extractBlocks))]
pub fn extract_blocks_js(text: &str) -> Result<JsValue, JsValue> {
    to_js_value(&extract_blocks_utf16(text))
}

/// `null` when valid, otherwise `{ line?, message }`.
#[cfg_attr(target_arch = "wasm32", wasm_bindgen(js_name = validate))]
pub fn validate_js(content: &str) -> Result<JsValue, JsValue> {
    to_js_value(&validate(content).err())
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen(js_name = classify))]
#[must_use]
pub fn classify_js(content: &str) -> Option<String> {
    classify(content).map(|kind| kind.as_str().to_string())
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen(js_name = extractSuggestion))]
pub fn extract_suggestion_js(response: &str) -> Result<JsValue, JsValue> {
    to_js_value(&extract_suggestion(response))
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen(js_name = replaceBlock))]
pub fn replace_block_js(
    text: &str,
    start_index: usize,
    end_index: usize,
    replacement: &str,
) -> Result<String, JsValue> {
    replace_utf16_span(text, start_index, end_index, replacement).map_err(js_error)
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen(js_name = getTemplate))]
pub fn template_js(kind: &str, index: Option<usize>) -> Result<String, JsValue> {
    template_source(kind, index, false)
        .map(str::to_string)
        .map_err(js_error)
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen(js_name = getBlankTemplate))]
pub fn blank_template_js(kind: &str) -> Result<String, JsValue> {
    template_source(kind, None, true)
        .map(str::to_string)
        .map_err(js_error)
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen(js_name = starterTemplates))]
pub fn starter_templates_js() -> Result<JsValue, JsValue> {
    to_js_value(&STARTER_TEMPLATES)
}

/// Undo/redo stacks for the document open in the editor.
#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
#[derive(Debug, Default)]
pub struct History {
    inner: DiagramHistory,
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
impl History {
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen(constructor))]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, previous: &str) {
        self.inner.record(previous);
    }

    pub fn undo(&mut self, current: &str) -> Option<String> {
        self.inner.undo(current)
    }

    pub fn redo(&mut self, current: &str) -> Option<String> {
        self.inner.redo(current)
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen(js_name = canUndo))]
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.inner.can_undo()
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen(js_name = canRedo))]
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.inner.can_redo()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{
        History, byte_to_utf16, classify_js, extract_blocks_utf16, merge_config,
        replace_utf16_span, template_source, utf16_to_byte,
    };
    use fy_core::{AssistantConfig, EditorTheme};
    use serde_json::json;

    #[test]
    fn offsets_convert_to_utf16_units() {
        let text = "😀 é\n```mermaid\npie\n```";
        let blocks = extract_blocks_utf16(text);
        assert_eq!(blocks.len(), 1);
        // 😀 is two UTF-16 units, é is one.
        assert_eq!(blocks[0].start_index, 5);
        let units: Vec<u16> = text.encode_utf16().collect();
        let sliced = String::from_utf16(&units[blocks[0].start_index..blocks[0].end_index])
            .expect("valid utf-16 slice");
        assert_eq!(sliced, "```mermaid\npie\n```");
    }

    #[test]
    fn utf16_offsets_round_trip() {
        let text = "a😀b";
        assert_eq!(byte_to_utf16(text, 0), 0);
        assert_eq!(byte_to_utf16(text, 1), 1);
        assert_eq!(byte_to_utf16(text, 5), 3);
        assert_eq!(utf16_to_byte(text, 3), Some(5));
        assert_eq!(utf16_to_byte(text, 4), Some(text.len()));
        assert_eq!(utf16_to_byte(text, 2), None);
        assert_eq!(utf16_to_byte(text, 9), None);
    }

    #[test]
    fn replaces_span_given_in_utf16_units() {
        let text = "😀\n```mermaid\npie\n```\ntail";
        let blocks = extract_blocks_utf16(text);
        let updated = replace_utf16_span(
            text,
            blocks[0].start_index,
            blocks[0].end_index,
            "```mermaid\ngantt\n```",
        )
        .expect("splice");
        assert_eq!(updated, "😀\n```mermaid\ngantt\n```\ntail");
    }

    #[test]
    fn rejects_span_that_is_not_a_block() {
        let error = replace_utf16_span("plain text", 0, 5, "x").expect_err("not a fence");
        assert!(error.contains("re-extract"));
        let error = replace_utf16_span("😀", 1, 2, "x").expect_err("inside surrogate pair");
        assert!(error.contains("offset 1"));
    }

    #[test]
    fn merges_runtime_config_overrides() {
        let base = AssistantConfig::default();
        let merged = merge_config(&base, &json!({ "editor": { "theme": "light" } }))
            .expect("valid overrides");
        assert_eq!(merged.editor.theme, EditorTheme::Light);
        assert_eq!(merge_config(&base, &json!(null)), Ok(base.clone()));

        let error = merge_config(&base, &json!({ "fetch": { "maxFiles": "many" } }))
            .expect_err("bad type");
        assert!(error.contains("fetch.maxFiles"));
    }

    #[test]
    fn template_lookup_accepts_slugs_and_aliases() {
        assert!(template_source("er", None, false)
            .expect("known type")
            .starts_with("erDiagram"));
        assert_eq!(
            template_source("graph", None, true).expect("alias"),
            "flowchart TD\n    A[Start]\n"
        );
        assert!(template_source("venn", None, false).is_err());
    }

    #[test]
    fn classify_returns_canonical_identifier() {
        assert_eq!(classify_js("stateDiagram-v2").as_deref(), Some("stateDiagram"));
        assert_eq!(classify_js("hello"), None);
    }

    #[test]
    fn history_tracks_undo_and_redo() {
        let mut history = History::new();
        history.record("pie");
        assert!(history.can_undo());
        assert_eq!(history.undo("gantt").as_deref(), Some("pie"));
        assert!(history.can_redo());
        assert_eq!(history.redo("pie").as_deref(), Some("gantt"));
        history.clear();
        assert!(!history.can_undo());
    }
}

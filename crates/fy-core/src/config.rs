use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EditorTheme {
    Light,
    #[default]
    Dark,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EditorSettings {
    pub font_size: u16,
    pub tab_size: u8,
    pub line_wrapping: bool,
    pub line_numbers: bool,
    pub theme: EditorTheme,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            font_size: 14,
            tab_size: 2,
            line_wrapping: true,
            line_numbers: true,
            theme: EditorTheme::Dark,
        }
    }
}

/// Budgets applied when collecting code context for the assistant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FetchLimits {
    /// Files larger than this (bytes) are never fetched.
    pub max_file_size: u64,
    /// Fetching stops once this many bytes of content have been collected.
    pub max_total_size: u64,
    pub max_files: usize,
}

impl Default for FetchLimits {
    fn default() -> Self {
        Self {
            max_file_size: 100 * 1024,
            max_total_size: 500 * 1024,
            max_files: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AssistantConfig {
    pub editor: EditorSettings,
    /// Debounce before the active document is persisted, in milliseconds.
    pub auto_save_delay_ms: u64,
    pub max_recent_files: usize,
    pub fetch: FetchLimits,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            editor: EditorSettings::default(),
            auto_save_delay_ms: 300,
            max_recent_files: 10,
            fetch: FetchLimits::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ConfigError {
    pub field: String,
    pub value: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ConfigParse {
    pub config: AssistantConfig,
    pub warnings: Vec<String>,
    pub errors: Vec<ConfigError>,
}

impl ConfigParse {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Apply a JSON configuration object on top of `base`.
///
/// Unknown keys produce warnings; values of the wrong type produce errors and
/// leave the corresponding field untouched, so a partially valid document
/// still yields a usable configuration.
#[must_use]
pub fn parse_config_value(value: &Value, base: &AssistantConfig) -> ConfigParse {
    let mut parsed = ConfigParse {
        config: base.clone(),
        ..ConfigParse::default()
    };
    let Some(root) = value.as_object() else {
        parsed.errors.push(ConfigError {
            field: "$".to_string(),
            value: value.to_string(),
            message: "config root must be a JSON object".to_string(),
        });
        return parsed;
    };

    for (key, raw_value) in root {
        match key.as_str() {
            "editor" => parse_editor_config(raw_value, &mut parsed),
            "fetch" => parse_fetch_config(raw_value, &mut parsed),
            "autoSaveDelay" | "autoSaveDelayMs" => {
                if let Some(delay) = raw_value.as_u64() {
                    parsed.config.auto_save_delay_ms = delay;
                } else {
                    push_type_error(&mut parsed, key, raw_value, "must be a non-negative integer");
                }
            }
            "maxRecentFiles" => {
                if let Some(count) = as_usize(raw_value) {
                    parsed.config.max_recent_files = count;
                } else {
                    push_type_error(&mut parsed, key, raw_value, "must be a non-negative integer");
                }
            }
            other => parsed
                .warnings
                .push(format!("Unsupported config key '{other}' ignored")),
        }
    }

    parsed
}

fn parse_editor_config(value: &Value, parsed: &mut ConfigParse) {
    let Some(obj) = value.as_object() else {
        push_type_error(parsed, "editor", value, "must be an object");
        return;
    };

    for (key, raw_value) in obj {
        let field = format!("editor.{key}");
        match key.as_str() {
            "fontSize" => match raw_value.as_u64().and_then(|v| u16::try_from(v).ok()) {
                Some(size) if size > 0 => parsed.config.editor.font_size = size,
                _ => push_type_error(parsed, &field, raw_value, "must be a positive integer"),
            },
            "tabSize" => match raw_value.as_u64().and_then(|v| u8::try_from(v).ok()) {
                Some(size) if size > 0 => parsed.config.editor.tab_size = size,
                _ => push_type_error(parsed, &field, raw_value, "must be an integer from 1 to 255"),
            },
            "lineWrapping" => match raw_value.as_bool() {
                Some(flag) => parsed.config.editor.line_wrapping = flag,
                None => push_type_error(parsed, &field, raw_value, "must be a boolean"),
            },
            "lineNumbers" => match raw_value.as_bool() {
                Some(flag) => parsed.config.editor.line_numbers = flag,
                None => push_type_error(parsed, &field, raw_value, "must be a boolean"),
            },
            "theme" => match raw_value.as_str().map(|t| t.trim().to_ascii_lowercase()) {
                Some(theme) if theme == "dark" => parsed.config.editor.theme = EditorTheme::Dark,
                Some(theme) if theme == "light" => parsed.config.editor.theme = EditorTheme::Light,
                Some(theme) => parsed
                    .warnings
                    .push(format!("Unsupported editor theme '{theme}' ignored")),
                None => push_type_error(parsed, &field, raw_value, "must be \"dark\" or \"light\""),
            },
            other => parsed
                .warnings
                .push(format!("Unsupported config key 'editor.{other}' ignored")),
        }
    }
}

fn parse_fetch_config(value: &Value, parsed: &mut ConfigParse) {
    let Some(obj) = value.as_object() else {
        push_type_error(parsed, "fetch", value, "must be an object");
        return;
    };

    for (key, raw_value) in obj {
        let field = format!("fetch.{key}");
        match key.as_str() {
            "maxFileSize" => match raw_value.as_u64() {
                Some(size) => parsed.config.fetch.max_file_size = size,
                None => push_type_error(parsed, &field, raw_value, "must be a byte count"),
            },
            "maxTotalSize" => match raw_value.as_u64() {
                Some(size) => parsed.config.fetch.max_total_size = size,
                None => push_type_error(parsed, &field, raw_value, "must be a byte count"),
            },
            "maxFiles" => match as_usize(raw_value) {
                Some(count) => parsed.config.fetch.max_files = count,
                None => push_type_error(parsed, &field, raw_value, "must be a non-negative integer"),
            },
            other => parsed
                .warnings
                .push(format!("Unsupported config key 'fetch.{other}' ignored")),
        }
    }
}

fn as_usize(value: &Value) -> Option<usize> {
    value.as_u64().and_then(|v| usize::try_from(v).ok())
}

fn push_type_error(parsed: &mut ConfigParse, field: &str, value: &Value, message: &str) {
    parsed.errors.push(ConfigError {
        field: field.to_string(),
        value: value.to_string(),
        message: message.to_string(),
    });
}

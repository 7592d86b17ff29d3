#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    let parsed = fy_core::parse_config_value(&value, &fy_core::AssistantConfig::default());
    if parsed.errors.is_empty() {
        let _ = serde_json::to_string(&parsed.config);
    }
});

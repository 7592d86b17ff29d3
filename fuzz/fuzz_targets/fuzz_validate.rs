#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };
    let verdict = fy_parser::validate(content);
    if fy_parser::classify(content).is_some() {
        assert!(verdict.is_ok());
    }
    let _ = fy_parser::parse_sidecar_header(content);
});

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = docdet::config::parse_syntax_list(s);
        let _ = docdet::config::parse_value_provider_list(s);
    }
});

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = docdet::DocumentDetails::from_json_str(s);
        let _ = docdet::DocumentDetails::from_xml_str(s);
    }
});

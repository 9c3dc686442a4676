#![no_main]

use std::sync::{Arc, LazyLock};

use docdet::determine::{DeterminationConfig, Determinator, NoopObserver};
use libfuzzer_sys::fuzz_target;

static DETERMINATOR: LazyLock<Determinator> = LazyLock::new(|| {
    let config = DeterminationConfig::builtin().unwrap();
    Determinator::builder(Arc::new(config))
        .observer(Arc::new(NoopObserver))
        .build()
});

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(Some(details)) = DETERMINATOR.determine_xml(s) {
            // Whatever was determined must encode and decode losslessly.
            let json = details.to_json().unwrap();
            assert_eq!(docdet::DocumentDetails::from_json(&json).unwrap(), details);
            let element = details.to_element();
            assert_eq!(docdet::DocumentDetails::from_element(&element).unwrap(), details);
        }
    }
});

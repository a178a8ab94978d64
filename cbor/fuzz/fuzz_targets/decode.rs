#![no_main]

use libfuzzer_sys::fuzz_target;
use mdoc_cbor::DiagnosticOptions;

fuzz_target!(|data: &[u8]| {
    if let Ok(items) = mdoc_cbor::decode_sequence(data) {
        for item in items {
            _ = item.to_diagnostic(&DiagnosticOptions::default());
            _ = item.to_json();
        }
    }
});

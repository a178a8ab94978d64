#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(item) = mdoc_cbor::decode(data) {
        let encoded = mdoc_cbor::encode(&item);
        assert_eq!(mdoc_cbor::decode(&encoded), Ok(item));
    }
});

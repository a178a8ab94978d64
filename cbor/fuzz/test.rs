#![cfg(test)]

use mdoc_cbor::DiagnosticOptions;

#[test]
fn test_all() {
    match std::fs::read_dir("./corpus/decode") {
        Err(e) => {
            eprintln!(
                "Failed to open dir: {e}, curr dir: {}",
                std::env::current_dir().unwrap().to_string_lossy()
            );
        }
        Ok(dir) => {
            for entry in dir.flatten() {
                let path = entry.path();
                if path.is_file()
                    && let Ok(buffer) = std::fs::read(&path)
                    && let Ok(items) = mdoc_cbor::decode_sequence(&buffer)
                {
                    for item in items {
                        _ = item.to_diagnostic(&DiagnosticOptions::compact());
                        let encoded = mdoc_cbor::encode(&item);
                        assert_eq!(
                            mdoc_cbor::decode(&encoded).as_ref(),
                            Ok(&item),
                            "{}",
                            path.display()
                        );
                    }
                }
            }
        }
    }
}

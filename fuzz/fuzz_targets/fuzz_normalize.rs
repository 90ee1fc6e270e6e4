#![no_main]

use glossary_search::utils::{normalize_text, normalize_with_offsets};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Offsets must point inside the source and the text must be trimmed
    let normalized = normalize_with_offsets(data);
    let source_chars = data.chars().count();
    for i in 0..normalized.len() {
        let origin = normalized.origin(i).expect("every char has an origin");
        assert!(origin < source_chars);
    }
    assert_eq!(normalized.as_str(), normalize_text(data));
    assert_eq!(normalized.as_str(), normalized.as_str().trim());
});

#![no_main]

use a2ui::path::{normalize, parse_segments, to_path};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (&str, &str)| {
    let (path, context) = input;
    let segments = parse_segments(path);
    assert!(segments.iter().all(|s| !s.is_empty()));
    assert_eq!(parse_segments(&to_path(&segments)), segments);

    let normalized = normalize(path, context);
    if path.starts_with('/') {
        assert_eq!(normalized, path);
    }
});

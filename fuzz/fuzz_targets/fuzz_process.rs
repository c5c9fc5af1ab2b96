#![no_main]

use a2ui::MessageProcessor;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let mut processor = MessageProcessor::new();
    if processor.process_stream(text).is_err() {
        return;
    }
    let snapshot = processor.get_surfaces();
    for id in snapshot.surface_ids() {
        let first = processor.render(id);
        let second = processor.render(id);
        assert_eq!(first, second);
    }
});

#![no_main]

use a2ui::data_model::{DataModel, DataNode, WritePolicy};
use a2ui::enums::ConflictPolicy;
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Write {
    path: String,
    text: String,
    replace: bool,
}

fuzz_target!(|writes: Vec<Write>| {
    let mut model = DataModel::new();
    for write in writes {
        let policy = WritePolicy {
            on_conflict: if write.replace {
                ConflictPolicy::Replace
            } else {
                ConflictPolicy::Reject
            },
            max_index: 1024,
        };
        let before = model.clone();
        let value = DataNode::from(write.text.as_str());
        match model.set_with(&write.path, value.clone(), &policy) {
            Ok(()) => assert_eq!(model.get(&write.path), Some(&value)),
            Err(_) => assert_eq!(model, before),
        }
    }
    let _ = DataModel::from_json(&model.to_json());
});

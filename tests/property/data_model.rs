use a2ui::data_model::{DataModel, DataNode, WritePolicy};
use a2ui::enums::ConflictPolicy;
use a2ui::path::to_path;
use proptest::prelude::*;

fn arb_key() -> impl Strategy<Value = String> {
    "[a-z]{1,4}"
}

/// Paths mixing mapping keys and sequence indices; the first segment is
/// always a key because the root is a mapping.
fn arb_path() -> impl Strategy<Value = Vec<String>> {
    (
        arb_key(),
        prop::collection::vec(
            prop_oneof![arb_key(), (0usize..12).prop_map(|i| i.to_string())],
            0..4,
        ),
    )
        .prop_map(|(first, rest)| std::iter::once(first).chain(rest).collect())
}

fn arb_scalar() -> impl Strategy<Value = DataNode> {
    prop_oneof![
        "[a-z ]{0,8}".prop_map(DataNode::from),
        (-1000i32..1000).prop_map(|n| DataNode::from(f64::from(n))),
        any::<bool>().prop_map(DataNode::from),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn write_then_read_returns_value(segments in arb_path(), value in arb_scalar()) {
        let mut model = DataModel::new();
        let path = to_path(&segments);
        prop_assert!(model.set(&path, value.clone()).is_ok());
        prop_assert_eq!(model.get(&path), Some(&value));
    }

    #[test]
    fn sequence_write_leaves_holes(k in 0usize..40, value in arb_scalar()) {
        let mut model = DataModel::new();
        model.set(&format!("list[{}]", k), value.clone()).unwrap();
        for i in 0..k {
            let hole = format!("/list/{}", i);
            prop_assert!(model.get(&hole).is_none());
        }
        prop_assert_eq!(model.get(&format!("/list/{}", k)), Some(&value));
        prop_assert_eq!(model.get("list").and_then(DataNode::as_sequence).map(<[_]>::len), Some(k + 1));
    }

    #[test]
    fn rejected_write_leaves_model_unchanged(
        setup in prop::collection::vec((arb_path(), arb_scalar()), 0..8),
        segments in arb_path(),
        value in arb_scalar(),
    ) {
        let mut model = DataModel::new();
        for (path, v) in setup {
            let _ = model.set(&to_path(&path), v);
        }
        let before = model.clone();
        if model.set(&to_path(&segments), value).is_err() {
            prop_assert_eq!(model, before);
        }
    }

    #[test]
    fn replace_policy_never_fails_on_conflict(
        setup in prop::collection::vec((arb_path(), arb_scalar()), 0..8),
        segments in arb_path(),
        value in arb_scalar(),
    ) {
        let policy = WritePolicy {
            on_conflict: ConflictPolicy::Replace,
            ..WritePolicy::default()
        };
        let mut model = DataModel::new();
        for (path, v) in setup {
            let _ = model.set_with(&to_path(&path), v, &policy);
        }
        let path = to_path(&segments);
        match model.set_with(&path, value.clone(), &policy) {
            Ok(()) => prop_assert_eq!(model.get(&path), Some(&value)),
            // Named segments cannot address an existing sequence.
            Err(e) => prop_assert!(matches!(e, a2ui::DataModelError::NotAnIndex { .. }), "{}", e),
        }
    }

    #[test]
    fn export_matches_reads(segments in arb_path(), value in arb_scalar()) {
        let mut model = DataModel::new();
        model.set(&to_path(&segments), value.clone()).unwrap();
        let rebuilt = DataModel::from_json(&model.to_json());
        prop_assert_eq!(rebuilt.get(&to_path(&segments)), Some(&value));
    }
}

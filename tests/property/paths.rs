use a2ui::path::{is_absolute, normalize, parse_segments, to_path};
use proptest::prelude::*;

fn arb_segment() -> impl Strategy<Value = String> {
    prop_oneof!["[a-z][a-z0-9_]{0,6}", (0u32..50).prop_map(|i| i.to_string())]
}

fn arb_segments() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_segment(), 0..6)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn absolute_path_ignores_context(
        path in arb_segments().prop_map(|s| to_path(&s)),
        context in arb_segments().prop_map(|s| to_path(&s)),
    ) {
        prop_assert_eq!(normalize(&path, &context), path);
    }

    #[test]
    fn relative_path_appends_to_context(rel in arb_segments(), ctx in arb_segments()) {
        prop_assume!(!rel.is_empty());
        let normalized = normalize(&rel.join("/"), &to_path(&ctx));
        prop_assert!(is_absolute(&normalized));
        prop_assert!(!normalized.contains("//"));
        let mut expected = ctx.clone();
        expected.extend(rel.iter().cloned());
        prop_assert_eq!(parse_segments(&normalized), expected);
    }

    #[test]
    fn notations_agree(segments in arb_segments()) {
        let slash = to_path(&segments);
        let dotted = segments.join(".");
        let bracketed: String = segments
            .iter()
            .enumerate()
            .map(|(i, s)| {
                if s.bytes().all(|b| b.is_ascii_digit()) {
                    format!("[{}]", s)
                } else if i == 0 {
                    s.clone()
                } else {
                    format!(".{}", s)
                }
            })
            .collect();
        prop_assert_eq!(parse_segments(&slash), segments.clone());
        prop_assert_eq!(parse_segments(&dotted), segments.clone());
        prop_assert_eq!(parse_segments(&bracketed), segments);
    }

    #[test]
    fn parsing_is_stable(input in "[a-z0-9./\\[\\]]{0,24}") {
        let segments = parse_segments(&input);
        prop_assert!(segments.iter().all(|s| !s.is_empty()));
        prop_assert_eq!(parse_segments(&to_path(&segments)), segments);
    }
}

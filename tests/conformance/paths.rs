use super::common::{load_suite, report};
use a2ui::path::{normalize, parse_segments};

#[derive(Debug, serde::Deserialize)]
struct PathCase {
    id: String,
    name: String,
    path: String,
    context: String,
    normalized: String,
    segments: Vec<String>,
}

#[test]
fn path_conformance_suite() {
    let cases: Vec<PathCase> = load_suite("paths.yaml");
    assert!(!cases.is_empty());

    let mut passed = 0;
    let mut failures = Vec::new();
    for case in &cases {
        let normalized = normalize(&case.path, &case.context);
        let segments = parse_segments(&normalized);
        if normalized == case.normalized && segments == case.segments {
            passed += 1;
        } else {
            failures.push(format!(
                "  FAIL [{}] {}: got {:?} {:?}, expected {:?} {:?}",
                case.id, case.name, normalized, segments, case.normalized, case.segments
            ));
        }
    }
    report("paths", passed, &failures);
}

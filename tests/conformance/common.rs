use serde::de::DeserializeOwned;
use std::path::PathBuf;

fn fixtures_dir() -> PathBuf {
    std::env::var("A2UI_FIXTURES_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures"))
}

/// Loads a YAML suite of cases from the fixtures directory.
pub fn load_suite<T: DeserializeOwned>(file: &str) -> Vec<T> {
    let path = fixtures_dir().join(file);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("cannot read {}: {}", path.display(), e));
    serde_saphyr::from_str(&content)
        .unwrap_or_else(|e| panic!("cannot parse {}: {}", path.display(), e))
}

/// Structural equality: ignore field ordering, compare numbers as floats.
/// A key missing on one side matches an explicit null on the other.
pub fn values_structurally_equal(a: &serde_json::Value, b: &serde_json::Value) -> bool {
    use serde_json::Value;
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => (a - b).abs() < 1e-9,
            _ => a == b,
        },
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len()
                && a.iter()
                    .zip(b.iter())
                    .all(|(a, b)| values_structurally_equal(a, b))
        }
        (Value::Object(a), Value::Object(b)) => {
            let present_in = |map: &serde_json::Map<String, Value>, key: &str| {
                map.get(key).is_some_and(|v| !v.is_null())
            };
            a.keys()
                .chain(b.keys())
                .all(|key| match (a.get(key), b.get(key)) {
                    (Some(va), Some(vb)) => values_structurally_equal(va, vb),
                    _ => !present_in(a, key) && !present_in(b, key),
                })
        }
        _ => false,
    }
}

/// Fails the test with every mismatch collected by a suite run.
pub fn report(suite: &str, passed: usize, failures: &[String]) {
    eprintln!("{}: {} passed, {} failed", suite, passed, failures.len());
    assert!(
        failures.is_empty(),
        "{} failures:\n{}",
        suite,
        failures.join("\n")
    );
}

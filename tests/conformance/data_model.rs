use super::common::{load_suite, report, values_structurally_equal};
use a2ui::DataModelError;
use a2ui::data_model::{DataModel, DataNode};
use serde_json::Value;

#[derive(Debug, serde::Deserialize)]
struct ModelCase {
    id: String,
    name: String,
    writes: Vec<Write>,
    reads: Vec<Read>,
    model: Value,
}

#[derive(Debug, serde::Deserialize)]
struct Write {
    path: String,
    value: Value,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct Read {
    path: String,
    expected: Option<Value>,
}

fn error_name(error: &DataModelError) -> &'static str {
    match error {
        DataModelError::EmptyPath => "empty_path",
        DataModelError::TypeMismatch { .. } => "type_mismatch",
        DataModelError::NotAnIndex { .. } => "not_an_index",
        DataModelError::IndexTooLarge { .. } => "index_too_large",
    }
}

fn run_case(case: &ModelCase) -> Result<(), String> {
    let mut model = DataModel::new();
    for write in &case.writes {
        let value = DataNode::from_json(&write.value).ok_or("null write value in fixture")?;
        let result = model.set(&write.path, value);
        let got = result.as_ref().err().map(error_name);
        if got != write.error.as_deref() {
            return Err(format!(
                "write {:?}: got {:?}, expected error {:?}",
                write.path, result, write.error
            ));
        }
    }
    for read in &case.reads {
        let got = model.get(&read.path).map(DataNode::to_json);
        let matches = match (&got, &read.expected) {
            (None, None) => true,
            (Some(a), Some(b)) => values_structurally_equal(a, b),
            _ => false,
        };
        if !matches {
            return Err(format!(
                "read {:?}: got {:?}, expected {:?}",
                read.path, got, read.expected
            ));
        }
    }
    let exported = model.to_json();
    if !values_structurally_equal(&exported, &case.model) {
        return Err(format!("model {} != {}", exported, case.model));
    }
    Ok(())
}

#[test]
fn data_model_conformance_suite() {
    let cases: Vec<ModelCase> = load_suite("data_model.yaml");
    assert!(!cases.is_empty());

    let mut passed = 0;
    let mut failures = Vec::new();
    for case in &cases {
        match run_case(case) {
            Ok(()) => passed += 1,
            Err(e) => failures.push(format!("  FAIL [{}] {}: {}", case.id, case.name, e)),
        }
    }
    report("data_model", passed, &failures);
}

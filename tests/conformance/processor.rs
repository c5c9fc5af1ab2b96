use super::common::{load_suite, report, values_structurally_equal};
use a2ui::MessageProcessor;
use serde_json::{Map, Value};

#[derive(Debug, serde::Deserialize)]
struct ProcessorCase {
    id: String,
    name: String,
    messages: Vec<Value>,
    surfaces: Vec<String>,
    diagnostics: Vec<String>,
    #[serde(default)]
    data: Option<Map<String, Value>>,
}

fn run_case(case: &ProcessorCase) -> Result<(), String> {
    let mut processor = MessageProcessor::new();
    let mut codes = Vec::new();
    for raw in &case.messages {
        let outcome = processor.process_value(raw);
        codes.extend(outcome.diagnostics.into_iter().map(|d| d.code));
    }

    let snapshot = processor.get_surfaces();
    let ids: Vec<&str> = snapshot.surface_ids().collect();
    if ids != case.surfaces {
        return Err(format!("surfaces {:?}, expected {:?}", ids, case.surfaces));
    }
    if codes != case.diagnostics {
        return Err(format!("diagnostics {:?}, expected {:?}", codes, case.diagnostics));
    }
    for (surface_id, expected) in case.data.iter().flatten() {
        let surface = snapshot
            .get(surface_id)
            .ok_or_else(|| format!("surface {} missing", surface_id))?;
        let got = surface.data_model.to_json();
        if !values_structurally_equal(&got, expected) {
            return Err(format!("data of {}: {} != {}", surface_id, got, expected));
        }
    }
    Ok(())
}

#[test]
fn processor_conformance_suite() {
    let cases: Vec<ProcessorCase> = load_suite("processor.yaml");
    assert!(!cases.is_empty());

    let mut passed = 0;
    let mut failures = Vec::new();
    for case in &cases {
        match run_case(case) {
            Ok(()) => passed += 1,
            Err(e) => failures.push(format!("  FAIL [{}] {}: {}", case.id, case.name, e)),
        }
    }
    report("processor", passed, &failures);
}

use super::common::{load_suite, report, values_structurally_equal};
use a2ui::{A2uiMessage, MessageProcessor};
use serde_json::Value;

#[derive(Debug, serde::Deserialize)]
struct RenderCase {
    id: String,
    name: String,
    messages: Vec<Value>,
    expected: Value,
}

fn run_case(case: &RenderCase) -> Result<(), String> {
    let mut processor = MessageProcessor::new();
    for raw in &case.messages {
        let message: A2uiMessage =
            serde_json::from_value(raw.clone()).map_err(|e| format!("decode {}: {}", raw, e))?;
        let outcome = processor.process_message(&message);
        if !outcome.diagnostics.is_empty() {
            return Err(format!("unexpected diagnostics {:?}", outcome.diagnostics));
        }
    }

    let first = processor.render("s1");
    let second = processor.render("s1");
    if first != second {
        return Err("two renders of an unchanged surface differ".to_string());
    }
    let got = serde_json::to_value(&first).map_err(|e| e.to_string())?;
    if !values_structurally_equal(&got, &case.expected) {
        return Err(format!("\n    got      {}\n    expected {}", got, case.expected));
    }
    Ok(())
}

#[test]
fn render_conformance_suite() {
    let cases: Vec<RenderCase> = load_suite("render.yaml");
    assert!(!cases.is_empty());

    let mut passed = 0;
    let mut failures = Vec::new();
    for case in &cases {
        match run_case(case) {
            Ok(()) => passed += 1,
            Err(e) => failures.push(format!("  FAIL [{}] {}: {}", case.id, case.name, e)),
        }
    }
    report("render", passed, &failures);
}

use a2ui::message::DataEntry;
use a2ui::types::{Children, Component, ComponentEntry, StackProps, Template, TextProps};
use a2ui::{A2uiMessage, MessageProcessor, NodeKind, PropertyValue};
use proptest::prelude::*;
use serde_json::json;

fn text(id: &str, value: PropertyValue) -> ComponentEntry {
    ComponentEntry {
        id: id.to_string(),
        component: Component::Text(TextProps {
            text: Some(value),
            usage_hint: None,
        }),
        weight: None,
    }
}

fn column(id: &str, children: Children) -> ComponentEntry {
    ComponentEntry {
        id: id.to_string(),
        component: Component::Column(StackProps {
            children: Some(children),
            ..StackProps::default()
        }),
        weight: None,
    }
}

fn arb_value() -> impl Strategy<Value = PropertyValue> {
    prop_oneof![
        "[a-z]{0,6}".prop_map(PropertyValue::literal),
        (0i32..100).prop_map(|n| PropertyValue::LiteralNumber(f64::from(n))),
        "[a-c]".prop_map(PropertyValue::path),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn template_yields_one_child_per_item(names in prop::collection::vec("[a-z]{1,6}", 0..12)) {
        let mut processor = MessageProcessor::new();
        processor.process_message(&A2uiMessage::begin_rendering("s", "root"));
        processor.process_message(&A2uiMessage::surface_update("s", vec![
            column("root", Children::Template(Template {
                component_id: "row".to_string(),
                data_binding: "rows".to_string(),
            })),
            text("row", PropertyValue::path("name")),
        ]));
        let rows: Vec<_> = names.iter().map(|n| json!({ "name": n })).collect();
        processor.process_message(&A2uiMessage::data_model_update("s", vec![DataEntry::map("rows", rows)]));

        let tree = processor.render("s").expect("root renders");
        let children = tree.children();
        prop_assert_eq!(children.len(), names.len());
        for (i, (child, name)) in children.iter().zip(&names).enumerate() {
            prop_assert_eq!(&child.data_context, &format!("/rows/{}", i));
            match &child.kind {
                NodeKind::Text { text, .. } => prop_assert_eq!(text, name),
                other => prop_assert!(false, "unexpected node {:?}", other),
            }
        }
    }

    #[test]
    fn rendering_is_idempotent(
        values in prop::collection::vec(arb_value(), 1..8),
        data in prop::collection::vec(("[a-c]", "[a-z]{0,4}"), 0..4),
    ) {
        let mut processor = MessageProcessor::new();
        processor.process_message(&A2uiMessage::begin_rendering("s", "root"));
        let ids: Vec<String> = (0..values.len()).map(|i| format!("t{}", i)).collect();
        let mut components = vec![column("root", Children::ExplicitList(ids.clone()))];
        components.extend(ids.iter().zip(values).map(|(id, v)| text(id, v)));
        processor.process_message(&A2uiMessage::surface_update("s", components));
        let entries = data.iter().map(|(k, v)| DataEntry::string(k, v)).collect();
        processor.process_message(&A2uiMessage::data_model_update("s", entries));

        let first = processor.render("s");
        let second = processor.render("s");
        prop_assert!(first.is_some());
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.map(|t| t.node_count()), Some(ids.len() + 1));
    }
}

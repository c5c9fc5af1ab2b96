//! Chart data extraction.
//!
//! Chart data is either sent inline as a literal array of items or bound to
//! a data-model sequence. A bound sequence is read by probing indices
//! `0, 1, 2, ...` for sibling `label` and `value` keys until the first index
//! where either is missing. Each item's `drillDown` sequence is probed the
//! same way.
//!
//! Values are coerced the way text and numbers are everywhere else; a value
//! with no numeric reading is `None` and serializes as `null`.

use serde::{Deserialize, Serialize};

use crate::data_model::{DataModel, DataNode};
use crate::path;
use crate::value::PropertyValue;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartItem {
    pub label: String,
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drill_down: Option<Vec<ChartItem>>,
}

/// Resolves a `chartData` descriptor into chart items.
///
/// Literal arrays keep every object element, with `label`, `value` and
/// `drillDown` coerced field by field. Path bindings are probed up to
/// `max_items` items, and up to `max_items` drill-down entries per item. Any
/// other descriptor yields no items.
pub fn resolve_chart_data(
    descriptor: Option<&PropertyValue>,
    model: &DataModel,
    context_path: &str,
    max_items: usize,
) -> Vec<ChartItem> {
    match descriptor {
        Some(PropertyValue::LiteralArray(items)) => items
            .iter()
            .filter_map(DataNode::from_json)
            .filter_map(|node| literal_item(&node))
            .collect(),
        Some(PropertyValue::Path(binding)) => {
            let base = path::normalize(binding, context_path);
            probe_items(model, &base, max_items)
                .map(|(item_path, mut item)| {
                    let drill_down: Vec<ChartItem> =
                        probe_items(model, &path::join(&item_path, "drillDown"), max_items)
                            .map(|(_, item)| item)
                            .collect();
                    if !drill_down.is_empty() {
                        item.drill_down = Some(drill_down);
                    }
                    item
                })
                .collect()
        }
        _ => Vec::new(),
    }
}

/// Yields `(item_path, item)` for consecutive indices under `base`.
fn probe_items<'a>(
    model: &'a DataModel,
    base: &'a str,
    max_items: usize,
) -> impl Iterator<Item = (String, ChartItem)> + 'a {
    (0..max_items).map_while(move |i| {
        let item_path = path::join(base, i);
        let (label, value) = item_at(model, &item_path)?;
        let item = ChartItem {
            label: label.to_text(),
            value: value.to_number(),
            drill_down: None,
        };
        Some((item_path, item))
    })
}

fn item_at<'m>(model: &'m DataModel, item_path: &str) -> Option<(&'m DataNode, &'m DataNode)> {
    Some((
        model.get(&path::join(item_path, "label"))?,
        model.get(&path::join(item_path, "value"))?,
    ))
}

fn literal_item(node: &DataNode) -> Option<ChartItem> {
    let fields = node.as_mapping()?;
    Some(ChartItem {
        label: fields.get("label").map(DataNode::to_text).unwrap_or_default(),
        value: fields.get("value").and_then(DataNode::to_number),
        drill_down: fields
            .get("drillDown")
            .and_then(DataNode::as_sequence)
            .map(|items| items.iter().flatten().filter_map(literal_item).collect()),
    })
}

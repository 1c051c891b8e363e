//! Tab-separated dump of every layer, for debugging.

use crate::Layer;
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashSet;

/// Render layers as a tab-separated table.
///
/// The header lists every key in the order it is first seen scanning from
/// layer 0 down. Each following row is one layer, labelled by index, holding
/// that layer's own value for each column or an empty cell.
pub fn render_table(layers: &[Layer]) -> String {
    let mut seen = HashSet::new();
    let mut columns: Vec<&str> = Vec::new();
    for layer in layers {
        for key in layer.keys() {
            if seen.insert(key.as_str()) {
                columns.push(key.as_str());
            }
        }
    }

    let mut output = String::from("\t");
    for column in &columns {
        output.push_str(column);
        output.push('\t');
    }
    output.push('\n');

    for (index, layer) in layers.iter().enumerate() {
        output.push_str(&index.to_string());
        output.push('\t');
        for column in &columns {
            if let Some(value) = layer.get(*column) {
                output.push_str(&cell(value));
            }
            output.push('\t');
        }
        output.push('\n');
    }

    output
}

/// Strings print raw; everything else as compact JSON.
fn cell(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(text) => Cow::Borrowed(text.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}

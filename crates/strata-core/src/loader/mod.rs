//! JSON5 layer files.
//!
//! A layer file is a JSON5 document whose top level is an object; its entries
//! become the layer's keys in document order.


use crate::{Layer, StackError};
use log::{debug, info};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Parse a layer from JSON5 contents.
pub fn load_layer_from_str(contents: &str) -> Result<Layer, StackError> {
    debug!("loading layer from raw contents (len={})", contents.len());
    parse_object(contents, "layer")
}

/// Read and parse a layer from a JSON5 file.
pub fn load_layer_from_path(path: impl AsRef<Path>) -> Result<Layer, StackError> {
    let path = path.as_ref();
    info!("loading layer from path: {}", path.display());
    let contents = fs::read_to_string(path).map_err(StackError::ReadFailed)?;
    parse_object(&contents, &format!("layer({})", path.display()))
}

/// Parse JSON5 contents that must hold an object at the top level.
pub(crate) fn parse_object(contents: &str, label: &str) -> Result<Map<String, Value>, StackError> {
    match json5::from_str::<Value>(contents)? {
        Value::Object(map) => Ok(map),
        _ => Err(StackError::NotAMapping(label.to_string())),
    }
}

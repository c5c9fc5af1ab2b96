//! Registry state → JSON / YAML export, for presentation layers and
//! debugging.

use serde::Serialize;
use serde_json::Value;

use crate::error::SerializeError;
use crate::surface::SurfaceSnapshot;

/// The snapshot as a JSON object keyed by surface id.
pub fn snapshot_to_json(snapshot: &SurfaceSnapshot) -> Result<Value, SerializeError> {
    to_json_value(snapshot)
}

/// The snapshot as YAML. Mapping keys keep their insertion order.
pub fn snapshot_to_yaml(snapshot: &SurfaceSnapshot) -> Result<String, SerializeError> {
    to_yaml(snapshot)
}

/// Any serializable value as YAML, going through JSON first so that
/// flattened and tagged types come out the same in both encodings.
pub fn to_yaml<T: Serialize + ?Sized>(value: &T) -> Result<String, SerializeError> {
    let value = to_json_value(value)?;
    serde_saphyr::to_string(&value).map_err(|e| SerializeError {
        message: format!("failed to serialize to YAML: {}", e),
    })
}

fn to_json_value<T: Serialize + ?Sized>(value: &T) -> Result<Value, SerializeError> {
    serde_json::to_value(value).map_err(|e| SerializeError {
        message: format!("failed to convert to JSON value: {}", e),
    })
}

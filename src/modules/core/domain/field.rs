//! Payloads for custom collections and their fields

use odoolink_types::Record;
use serde_json::Value;

use super::naming::ensure_custom_prefix;
use crate::error::OdooError;

/// State marking collections and fields as user-defined
pub const MANUAL_STATE: &str = "manual";

/// Field type used when the caller does not choose one
const DEFAULT_FIELD_TYPE: &str = "char";

/// Values of the `ir.model` record describing a new custom collection
pub fn model_record(model_name: &str, technical_name: &str) -> Record {
    let mut record = Record::new();
    record.insert("name".into(), Value::from(model_name));
    record.insert("model".into(), Value::from(technical_name));
    record.insert("state".into(), Value::from(MANUAL_STATE));
    record
}

/// Build the `ir.model.fields` values for the descriptor at `index`.
///
/// Caller attributes are laid over the defaults (`state`, `ttype`, and an
/// index-based `name`); `model_id` always points at the new collection. A
/// caller `name` is given the `x_` prefix when it lacks one.
pub fn field_descriptor(
    model_id: i64,
    technical_name: &str,
    index: usize,
    attributes: &Value,
) -> Result<Record, OdooError> {
    let attributes = attributes.as_object().ok_or_else(|| {
        OdooError::Format(format!(
            "field descriptor {} must be a mapping of attribute names to values",
            index
        ))
    })?;

    let mut descriptor = Record::new();
    descriptor.insert("state".into(), Value::from(MANUAL_STATE));
    descriptor.insert("ttype".into(), Value::from(DEFAULT_FIELD_TYPE));
    descriptor.insert(
        "name".into(),
        Value::from(format!("{}_field_{}", technical_name, index)),
    );

    for (key, value) in attributes {
        descriptor.insert(key.clone(), value.clone());
    }

    if let Some(name) = attributes.get("name") {
        let name = name.as_str().ok_or_else(|| {
            OdooError::Format(format!("field descriptor {}: 'name' must be a string", index))
        })?;
        descriptor.insert("name".into(), Value::from(ensure_custom_prefix(name)));
    }

    descriptor.insert("model_id".into(), Value::from(model_id));
    Ok(descriptor)
}

/// Build all field descriptors in order, stopping at the first malformed one
pub fn build_field_descriptors(
    model_id: i64,
    technical_name: &str,
    fields: &[Value],
) -> Result<Vec<Record>, OdooError> {
    fields
        .iter()
        .enumerate()
        .map(|(index, attributes)| field_descriptor(model_id, technical_name, index, attributes))
        .collect()
}

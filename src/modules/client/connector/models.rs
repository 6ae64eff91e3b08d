//! Custom collection management

use odoolink_core::{build_field_descriptors, model_record, technical_name, OdooError};
use odoolink_types::Record;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::records::decode_id;
use super::{require_collection, rights, OdooConnector};
use crate::compensation::Compensation;

const MODEL_COLLECTION: &str = "ir.model";
const FIELD_COLLECTION: &str = "ir.model.fields";

impl OdooConnector {
    /// Create a custom collection named `model_name` with the given fields.
    ///
    /// The collection gets the technical name `x_<model name>`. Each entry of
    /// `fields` is a mapping of `ir.model.fields` attributes; missing `name`,
    /// `ttype` and `state` are filled in. When a descriptor is malformed or
    /// the fields cannot be created, the new collection is unlinked again.
    pub async fn create_model(&self, model_name: &str, fields: Vec<Value>) -> Result<i64, OdooError> {
        require_collection(model_name)?;
        let proxy = self.check_access(MODEL_COLLECTION, rights::MODEL_ADMIN).await?;

        let technical = technical_name(model_name);
        let response = proxy
            .execute_kw(
                MODEL_COLLECTION,
                "create",
                vec![Value::Object(model_record(model_name, &technical))],
                None,
            )
            .await?;

        let model_id = match decode_id(&response) {
            Some(id) if id > 0 => id,
            _ => return Err(OdooError::Protocol("model was not created".to_string())),
        };
        info!(model = %technical, id = model_id, "Custom model created");

        if fields.is_empty() {
            return Ok(model_id);
        }

        let mut scope = Compensation::new();
        let undo_proxy = &proxy;
        scope.register(format!("unlink {} {}", MODEL_COLLECTION, model_id), move || async move {
            undo_proxy
                .execute_kw(MODEL_COLLECTION, "unlink", vec![json!([model_id])], None)
                .await
                .map(|_| ())
        });

        let descriptors = match build_field_descriptors(model_id, &technical, &fields) {
            Ok(descriptors) => descriptors,
            Err(e) => {
                scope.rollback().await;
                return Err(e);
            }
        };

        debug!(model = %technical, count = descriptors.len(), "Creating custom fields");
        let created = proxy
            .execute_kw(
                FIELD_COLLECTION,
                "create",
                vec![Value::Array(descriptors.into_iter().map(Value::Object).collect())],
                None,
            )
            .await;

        if let Err(e) = created {
            warn!(model = %technical, error = %e, "Custom field creation failed");
            scope.rollback().await;
            return Err(e);
        }

        scope.commit();
        Ok(model_id)
    }

    /// [`create_model`](Self::create_model) with the fields given as one JSON
    /// value: an array of descriptors, or `null` for none
    pub async fn create_model_from_json(
        &self,
        model_name: &str,
        fields: Value,
    ) -> Result<i64, OdooError> {
        require_collection(model_name)?;
        let fields = match fields {
            Value::Array(fields) => fields,
            Value::Null => Vec::new(),
            other => {
                return Err(OdooError::Format(format!(
                    "fields must be an array of field descriptors, got {}",
                    other
                )))
            }
        };

        self.create_model(model_name, fields).await
    }

    /// Not implemented; the server is not contacted
    pub async fn delete_model(&self, model_name: &str) -> Result<(), OdooError> {
        Err(OdooError::Unsupported(format!("delete_model ({})", model_name)))
    }

    /// Not implemented; the server is not contacted
    pub async fn update_model(&self, model_name: &str, _values: Record) -> Result<(), OdooError> {
        Err(OdooError::Unsupported(format!("update_model ({})", model_name)))
    }
}

//! Record operations on collections

use odoolink_core::{default_record_name, OdooError};
use odoolink_types::{Domain, Page, Record};
use serde_json::{json, Value};
use std::collections::BTreeMap;

use super::{require_collection, rights, OdooConnector};

/// Attributes requested from `fields_get` when the caller names none
const DEFAULT_FIELD_ATTRIBUTES: &[&str] = &["string", "help", "type"];

impl OdooConnector {
    /// Ids of the records of `collection` matching `domain`
    pub async fn get_ids(
        &self,
        collection: &str,
        domain: &Domain,
        page: Page,
    ) -> Result<Vec<i64>, OdooError> {
        require_collection(collection)?;
        let proxy = self.check_access(collection, rights::READ).await?;

        let kwargs = page.to_kwargs();
        let response = proxy
            .execute_kw(
                collection,
                "search",
                vec![domain.to_value()],
                (!kwargs.is_empty()).then_some(kwargs),
            )
            .await?;

        decode_ids(response)
    }

    /// Matching records, restricted to `fields` unless it is empty
    pub async fn get_records(
        &self,
        collection: &str,
        domain: &Domain,
        page: Page,
        fields: &[&str],
    ) -> Result<Vec<Record>, OdooError> {
        require_collection(collection)?;
        let proxy = self.check_access(collection, rights::READ).await?;

        let mut kwargs = page.to_kwargs();
        if !fields.is_empty() {
            kwargs.insert("fields".into(), json!(fields));
        }

        let response = proxy
            .execute_kw(
                collection,
                "search_read",
                vec![domain.to_value()],
                (!kwargs.is_empty()).then_some(kwargs),
            )
            .await?;

        let rows = match response {
            Value::Array(rows) => rows,
            other => return Err(unexpected("search_read", "an array of records", &other)),
        };
        rows.into_iter()
            .map(|row| match row {
                Value::Object(record) => Ok(record),
                other => Err(unexpected("search_read", "a record", &other)),
            })
            .collect()
    }

    /// Number of records of `collection` matching `domain`
    pub async fn get_count(&self, collection: &str, domain: &Domain) -> Result<u64, OdooError> {
        require_collection(collection)?;
        let proxy = self.check_access(collection, rights::READ).await?;

        let response = proxy
            .execute_kw(collection, "search_count", vec![domain.to_value()], None)
            .await?;

        response
            .as_u64()
            .ok_or_else(|| unexpected("search_count", "a count", &response))
    }

    /// Field definitions of `collection`, keyed by field name.
    ///
    /// `attributes` defaults to the label, help text and type of each field.
    pub async fn get_fields(
        &self,
        collection: &str,
        attributes: Option<&[&str]>,
    ) -> Result<BTreeMap<String, Record>, OdooError> {
        require_collection(collection)?;
        let proxy = self.check_access(collection, rights::READ).await?;

        let mut kwargs = Record::new();
        kwargs.insert(
            "attributes".into(),
            json!(attributes.unwrap_or(DEFAULT_FIELD_ATTRIBUTES)),
        );

        let response = proxy
            .execute_kw(collection, "fields_get", vec![], Some(kwargs))
            .await?;

        let fields = match response {
            Value::Object(fields) => fields,
            other => return Err(unexpected("fields_get", "a mapping of fields", &other)),
        };
        fields
            .into_iter()
            .map(|(name, definition)| match definition {
                Value::Object(definition) => Ok((name, definition)),
                other => Err(unexpected("fields_get", "a field definition", &other)),
            })
            .collect()
    }

    /// Create one record and return its id.
    ///
    /// An empty `values` creates a record named after the collection root,
    /// e.g. `"New Product"` for `product.template`.
    pub async fn create_record(&self, collection: &str, values: Record) -> Result<i64, OdooError> {
        require_collection(collection)?;
        let proxy = self.check_access(collection, rights::CREATE).await?;

        let values = if values.is_empty() {
            let mut defaults = Record::new();
            defaults.insert("name".into(), json!(default_record_name(collection)));
            defaults
        } else {
            values
        };

        let response = proxy
            .execute_kw(collection, "create", vec![Value::Object(values)], None)
            .await?;

        decode_id(&response).ok_or_else(|| unexpected("create", "a record id", &response))
    }

    /// Write `values` on the records `ids` and echo the ids back.
    ///
    /// Empty `values` succeeds without writing anything.
    pub async fn update_record(
        &self,
        collection: &str,
        ids: &[i64],
        values: Record,
    ) -> Result<Vec<i64>, OdooError> {
        require_collection(collection)?;
        if ids.is_empty() {
            return Err(OdooError::Validation("no records to update".to_string()));
        }
        let proxy = self.check_access(collection, rights::WRITE).await?;

        if values.is_empty() {
            return Ok(ids.to_vec());
        }

        proxy
            .execute_kw(
                collection,
                "write",
                vec![json!(ids), Value::Object(values)],
                None,
            )
            .await?;

        Ok(ids.to_vec())
    }

    /// Delete the records `ids` and return how many were requested
    pub async fn delete_record(&self, collection: &str, ids: &[i64]) -> Result<usize, OdooError> {
        require_collection(collection)?;
        if ids.is_empty() {
            return Err(OdooError::Validation("no records to delete".to_string()));
        }
        let proxy = self.check_access(collection, rights::UNLINK).await?;

        proxy
            .execute_kw(collection, "unlink", vec![json!(ids)], None)
            .await?;

        Ok(ids.len())
    }
}

/// `create` answers with an id, or a one-element list when given a list
pub(super) fn decode_id(value: &Value) -> Option<i64> {
    match value {
        Value::Array(items) if items.len() == 1 => items[0].as_i64(),
        other => other.as_i64(),
    }
}

fn decode_ids(response: Value) -> Result<Vec<i64>, OdooError> {
    let items = match response {
        Value::Array(items) => items,
        other => return Err(unexpected("search", "an array of ids", &other)),
    };
    items
        .iter()
        .map(|item| item.as_i64().ok_or_else(|| unexpected("search", "a record id", item)))
        .collect()
}

fn unexpected(method: &str, expected: &str, got: &Value) -> OdooError {
    OdooError::Protocol(format!("{} returned {} instead of {}", method, got, expected))
}

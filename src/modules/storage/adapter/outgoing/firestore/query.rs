use serde_json::{json, Value};

use super::codec::encode_value;
use crate::modules::storage::application::domain::collection::CREATED_AT;
use crate::modules::storage::application::domain::{Collection, Filter};
use crate::modules::storage::application::ports::outgoing::StorageError;

const DOCUMENT_NAME_PATH: &str = "__name__";

/// Builds structured queries for one database root
/// (`projects/{project}/databases/(default)/documents`).
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    root: String,
}

impl QueryBuilder {
    pub fn new(project_id: &str) -> Self {
        Self {
            root: format!("projects/{project_id}/databases/(default)/documents"),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn document_name(&self, collection: Collection, id: &str) -> String {
        format!("{}/{}/{}", self.root, collection.name(), id)
    }

    pub fn where_clause(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Value>, StorageError> {
        let mut clauses = Vec::with_capacity(filter.conditions().len());
        for (field, value) in filter.conditions() {
            if field == collection.key_field() {
                let id = value.as_text().ok_or_else(|| {
                    StorageError::InvalidRecord(format!("key `{field}` must be text"))
                })?;
                clauses.push(json!({
                    "fieldFilter": {
                        "field": { "fieldPath": DOCUMENT_NAME_PATH },
                        "op": "EQUAL",
                        "value": { "referenceValue": self.document_name(collection, id) }
                    }
                }));
                continue;
            }
            if collection.field(field).is_none() {
                return Err(StorageError::InvalidRecord(format!(
                    "unknown field `{field}` for {collection}"
                )));
            }
            clauses.push(json!({
                "fieldFilter": {
                    "field": { "fieldPath": field },
                    "op": "EQUAL",
                    "value": encode_value(value)
                }
            }));
        }

        Ok(match clauses.len() {
            0 => None,
            1 => clauses.pop(),
            _ => Some(json!({ "compositeFilter": { "op": "AND", "filters": clauses } })),
        })
    }

    /// Ordered query over a window of matches.
    pub fn select(
        &self,
        collection: Collection,
        filter: &Filter,
        offset: u64,
        limit: u64,
    ) -> Result<Value, StorageError> {
        let mut query = json!({
            "from": [{ "collectionId": collection.name() }],
            "orderBy": [
                { "field": { "fieldPath": CREATED_AT }, "direction": "ASCENDING" },
                { "field": { "fieldPath": DOCUMENT_NAME_PATH }, "direction": "ASCENDING" }
            ],
            "limit": limit,
        });
        if offset > 0 {
            query["offset"] = json!(offset);
        }
        if let Some(clause) = self.where_clause(collection, filter)? {
            query["where"] = clause;
        }
        Ok(json!({ "structuredQuery": query }))
    }

    /// Unordered equality lookup. Without an `orderBy` it is served by the
    /// automatic single-field indexes.
    pub fn lookup(
        &self,
        collection: Collection,
        filter: &Filter,
        limit: u64,
    ) -> Result<Value, StorageError> {
        let mut query = json!({
            "from": [{ "collectionId": collection.name() }],
            "limit": limit,
        });
        if let Some(clause) = self.where_clause(collection, filter)? {
            query["where"] = clause;
        }
        Ok(json!({ "structuredQuery": query }))
    }

    pub fn count(&self, collection: Collection, filter: &Filter) -> Result<Value, StorageError> {
        let mut query = json!({ "from": [{ "collectionId": collection.name() }] });
        if let Some(clause) = self.where_clause(collection, filter)? {
            query["where"] = clause;
        }
        Ok(json!({
            "structuredAggregationQuery": {
                "structuredQuery": query,
                "aggregations": [{ "alias": "total", "count": {} }]
            }
        }))
    }
}

/// Extracts the `total` alias from a `runAggregationQuery` response.
pub fn read_count(response: &Value) -> Result<u64, StorageError> {
    let total = response
        .as_array()
        .and_then(|items| {
            items
                .iter()
                .find_map(|item| item.pointer("/result/aggregateFields/total/integerValue"))
        })
        .ok_or_else(|| StorageError::Backend("aggregation response without total".to_string()))?;

    match total {
        Value::String(s) => s.parse::<u64>().ok(),
        other => other.as_u64(),
    }
    .ok_or_else(|| StorageError::Backend(format!("invalid aggregation total: {total}")))
}

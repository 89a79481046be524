use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};

use crate::modules::storage::application::domain::{
    Collection, FieldKind, FieldSpec, FieldValue, Record,
};
use crate::modules::storage::application::ports::outgoing::StorageError;

pub fn encode_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => json!({ "nullValue": null }),
        FieldValue::Text(v) => json!({ "stringValue": v }),
        // int64 travels as a decimal string in Firestore's JSON mapping
        FieldValue::Integer(v) => json!({ "integerValue": v.to_string() }),
        FieldValue::Timestamp(v) => {
            json!({ "timestampValue": v.to_rfc3339_opts(SecondsFormat::Micros, true) })
        }
    }
}

/// Encodes a record as a Firestore `fields` map. The key is the document
/// name and never a field.
pub fn encode_fields(
    collection: Collection,
    record: &Record,
) -> Result<Map<String, Value>, StorageError> {
    let mut fields = Map::new();
    for (name, value) in record.iter() {
        if name == collection.key_field() {
            return Err(StorageError::InvalidRecord(format!(
                "key field `{name}` is assigned by storage"
            )));
        }
        if collection.field(name).is_none() {
            return Err(StorageError::InvalidRecord(format!(
                "unknown field `{name}` for {collection}"
            )));
        }
        fields.insert(name.to_string(), encode_value(value));
    }
    Ok(fields)
}

pub fn decode_value(spec: &FieldSpec, value: Option<&Value>) -> Result<FieldValue, StorageError> {
    let Some(value) = value else {
        return Ok(FieldValue::Null);
    };

    let invalid = || {
        StorageError::InvalidRecord(format!(
            "field `{}` expects {:?}, found {value}",
            spec.name, spec.kind
        ))
    };

    if value.get("nullValue").is_some() {
        return Ok(FieldValue::Null);
    }

    match spec.kind {
        FieldKind::Text => value
            .get("stringValue")
            .and_then(Value::as_str)
            .map(|s| FieldValue::Text(s.to_string()))
            .ok_or_else(invalid),
        FieldKind::Integer => {
            if let Some(raw) = value.get("integerValue") {
                let parsed = match raw {
                    Value::String(s) => s.parse::<i64>().ok(),
                    other => other.as_i64(),
                };
                return parsed.map(FieldValue::Integer).ok_or_else(invalid);
            }
            value
                .get("doubleValue")
                .and_then(Value::as_f64)
                .filter(|v| v.fract() == 0.0)
                .map(|v| FieldValue::Integer(v as i64))
                .ok_or_else(invalid)
        }
        FieldKind::Timestamp => value
            .get("timestampValue")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|t| FieldValue::Timestamp(t.with_timezone(&Utc)))
            .ok_or_else(invalid),
    }
}

/// Last path segment of a document resource name.
pub fn document_id(name: &str) -> Option<&str> {
    name.rsplit('/').next().filter(|id| !id.is_empty())
}

pub fn decode_document(collection: Collection, document: &Value) -> Result<Record, StorageError> {
    let id = document
        .get("name")
        .and_then(Value::as_str)
        .and_then(document_id)
        .ok_or_else(|| StorageError::InvalidRecord("document without name".to_string()))?;

    let empty = Map::new();
    let fields = document
        .get("fields")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    let mut record = Record::new().with(collection.key_field(), id);
    for spec in collection.data_fields() {
        record.set(spec.name, decode_value(spec, fields.get(spec.name))?);
    }
    Ok(record)
}

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::collection::FieldKind;
use crate::modules::storage::application::ports::outgoing::StorageError;

/// Backend-neutral field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Text(String),
    Integer(i64),
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    pub fn kind(&self) -> Option<FieldKind> {
        match self {
            FieldValue::Null => None,
            FieldValue::Text(_) => Some(FieldKind::Text),
            FieldValue::Integer(_) => Some(FieldKind::Integer),
            FieldValue::Timestamp(_) => Some(FieldKind::Timestamp),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(value)
    }
}

impl<T> From<Option<T>> for FieldValue
where
    T: Into<FieldValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// A single stored row/document as a map of field name to value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: &str, value: impl Into<FieldValue>) {
        self.fields.insert(field.to_string(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn remove(&mut self, field: &str) -> Option<FieldValue> {
        self.fields.remove(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn text(&self, field: &str) -> Result<String, StorageError> {
        match self.fields.get(field) {
            Some(FieldValue::Text(value)) => Ok(value.clone()),
            other => Err(Self::mismatch(field, "text", other)),
        }
    }

    pub fn optional_text(&self, field: &str) -> Result<Option<String>, StorageError> {
        match self.fields.get(field) {
            None | Some(FieldValue::Null) => Ok(None),
            Some(FieldValue::Text(value)) => Ok(Some(value.clone())),
            other => Err(Self::mismatch(field, "text", other)),
        }
    }

    pub fn integer(&self, field: &str) -> Result<i64, StorageError> {
        match self.fields.get(field) {
            Some(FieldValue::Integer(value)) => Ok(*value),
            other => Err(Self::mismatch(field, "integer", other)),
        }
    }

    pub fn timestamp(&self, field: &str) -> Result<DateTime<Utc>, StorageError> {
        match self.fields.get(field) {
            Some(FieldValue::Timestamp(value)) => Ok(*value),
            other => Err(Self::mismatch(field, "timestamp", other)),
        }
    }

    pub fn optional_timestamp(&self, field: &str) -> Result<Option<DateTime<Utc>>, StorageError> {
        match self.fields.get(field) {
            None | Some(FieldValue::Null) => Ok(None),
            Some(FieldValue::Timestamp(value)) => Ok(Some(*value)),
            other => Err(Self::mismatch(field, "timestamp", other)),
        }
    }

    fn mismatch(field: &str, expected: &str, found: Option<&FieldValue>) -> StorageError {
        let found = match found {
            None => "missing".to_string(),
            Some(value) => format!("{value:?}"),
        };
        StorageError::InvalidRecord(format!("field `{field}`: expected {expected}, found {found}"))
    }
}

impl IntoIterator for Record {
    type Item = (String, FieldValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl FromIterator<(String, FieldValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_getters_read_matching_values() {
        let now = Utc::now();
        let record = Record::new()
            .with("title", "Printer jam")
            .with("phone", 628_123_i64)
            .with("createdAt", now)
            .with("last_updated", None::<DateTime<Utc>>);

        assert_eq!(record.text("title").unwrap(), "Printer jam");
        assert_eq!(record.integer("phone").unwrap(), 628_123);
        assert_eq!(record.timestamp("createdAt").unwrap(), now);
        assert_eq!(record.optional_timestamp("last_updated").unwrap(), None);
        assert_eq!(record.optional_text("address").unwrap(), None);
    }

    #[test]
    fn type_mismatch_is_invalid_record() {
        let record = Record::new().with("phone", "not a number");

        let err = record.integer("phone").unwrap_err();

        assert!(matches!(err, StorageError::InvalidRecord(msg) if msg.contains("phone")));
    }

    #[test]
    fn missing_required_field_is_invalid_record() {
        assert!(matches!(
            Record::new().text("title"),
            Err(StorageError::InvalidRecord(_))
        ));
    }
}

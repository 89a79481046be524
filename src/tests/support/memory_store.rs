use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::modules::storage::application::domain::collection::CREATED_AT;
use crate::modules::storage::application::domain::{
    BackendKind, Collection, FieldValue, Filter, PageRequest, Record,
};
use crate::modules::storage::application::ports::outgoing::{StorageAdapter, StorageError};

#[derive(Default)]
struct State {
    next_key: u64,
    collections: HashMap<Collection, Vec<Record>>,
}

/// Process-local `StorageAdapter` with the same ordering, uniqueness and
/// not-found behaviour as the real backends. Keys are `mem-000001`,
/// `mem-000002`, ... in insertion order.
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(record: &Record, filter: &Filter) -> bool {
    filter
        .conditions()
        .iter()
        .all(|(field, value)| record.get(field) == Some(value))
}

fn key_of(collection: Collection, record: &Record) -> Option<&str> {
    record.get(collection.key_field()).and_then(FieldValue::as_text)
}

fn created_at(record: &Record) -> Option<DateTime<Utc>> {
    record.timestamp(CREATED_AT).ok()
}

fn listing_order(collection: Collection, a: &Record, b: &Record) -> Ordering {
    created_at(a)
        .cmp(&created_at(b))
        .then_with(|| key_of(collection, a).cmp(&key_of(collection, b)))
}

/// First unique field of `candidate` already held by a record other than
/// `own_key`.
fn conflicting_field(
    collection: Collection,
    records: &[Record],
    candidate: &Record,
    own_key: Option<&str>,
) -> Option<&'static str> {
    collection.unique_fields().iter().copied().find(|field| {
        let Some(value) = candidate.get(field) else {
            return false;
        };
        records
            .iter()
            .filter(|r| key_of(collection, r) != own_key)
            .any(|r| r.get(field) == Some(value))
    })
}

#[async_trait]
impl StorageAdapter for InMemoryStore {
    fn backend(&self) -> BackendKind {
        BackendKind::MongoDb
    }

    async fn insert(&self, collection: Collection, mut record: Record) -> Result<String, StorageError> {
        let mut state = self.state.write();
        let records = state.collections.entry(collection).or_default();
        if let Some(field) = conflicting_field(collection, records, &record, None) {
            return Err(StorageError::duplicate(field));
        }

        state.next_key += 1;
        let key = format!("mem-{:06}", state.next_key);
        record.set(collection.key_field(), key.clone());
        state.collections.entry(collection).or_default().push(record);
        Ok(key)
    }

    async fn find_one(&self, collection: Collection, filter: &Filter) -> Result<Record, StorageError> {
        let state = self.state.read();
        let mut found: Vec<&Record> = state
            .collections
            .get(&collection)
            .map(|records| records.iter().filter(|r| matches(r, filter)).collect())
            .unwrap_or_default();
        found.sort_by(|a, b| listing_order(collection, a, b));
        found.first().map(|r| (*r).clone()).ok_or(StorageError::NotFound)
    }

    async fn find_many(
        &self,
        collection: Collection,
        filter: &Filter,
        page: PageRequest,
    ) -> Result<(Vec<Record>, u64), StorageError> {
        let state = self.state.read();
        let mut found: Vec<Record> = state
            .collections
            .get(&collection)
            .map(|records| records.iter().filter(|r| matches(r, filter)).cloned().collect())
            .unwrap_or_default();
        found.sort_by(|a, b| listing_order(collection, a, b));

        let total = found.len() as u64;
        let window = found
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();
        Ok((window, total))
    }

    async fn update(&self, collection: Collection, id: &str, changes: Record) -> Result<u64, StorageError> {
        let mut state = self.state.write();
        let records = state.collections.entry(collection).or_default();
        if let Some(field) = conflicting_field(collection, records, &changes, Some(id)) {
            return Err(StorageError::duplicate(field));
        }

        let record = records
            .iter_mut()
            .find(|r| key_of(collection, r) == Some(id))
            .ok_or(StorageError::NotFound)?;
        for (field, value) in changes {
            record.set(&field, value);
        }
        Ok(1)
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<u64, StorageError> {
        let mut state = self.state.write();
        let records = state.collections.entry(collection).or_default();
        let before = records.len();
        records.retain(|r| key_of(collection, r) != Some(id));
        if records.len() == before {
            return Err(StorageError::NotFound);
        }
        Ok(1)
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, StorageError> {
        let state = self.state.read();
        Ok(state
            .collections
            .get(&collection)
            .map(|records| records.iter().filter(|r| matches(r, filter)).count() as u64)
            .unwrap_or(0))
    }

    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

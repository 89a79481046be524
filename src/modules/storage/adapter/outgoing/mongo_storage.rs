use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId, Bson, Document};
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection as MongoCollection, Database, IndexModel};
use tracing::{error, info};

use crate::modules::storage::application::domain::collection::CREATED_AT;
use crate::modules::storage::application::domain::{
    BackendKind, Collection, FieldKind, FieldSpec, FieldValue, Filter, PageRequest, Record,
};
use crate::modules::storage::application::ports::outgoing::{StorageAdapter, StorageError};

const DUPLICATE_KEY_CODE: i32 = 11000;
pub const DEFAULT_DATABASE: &str = "helpdesk";

/// Document-store adapter. The external key of both collections is the
/// hex form of the document's `_id` ObjectId.
#[derive(Clone)]
pub struct MongoStorage {
    db: Database,
}

impl MongoStorage {
    pub async fn connect(uri: &str, database: Option<&str>) -> Result<Self, StorageError> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        let db = match database {
            Some(name) => client.database(name),
            None => client
                .default_database()
                .unwrap_or_else(|| client.database(DEFAULT_DATABASE)),
        };

        let storage = Self { db };
        storage.ensure_indexes().await?;
        info!(database = %storage.db.name(), "MongoDB storage ready");
        Ok(storage)
    }

    fn handle(&self, collection: Collection) -> MongoCollection<Document> {
        self.db.collection::<Document>(collection.name())
    }

    async fn ensure_indexes(&self) -> Result<(), StorageError> {
        for collection in [Collection::Users, Collection::Tickets] {
            let handle = self.handle(collection);

            for field in collection.unique_fields() {
                let mut keys = Document::new();
                keys.insert(*field, 1);
                let index = IndexModel::builder()
                    .keys(keys)
                    .options(IndexOptions::builder().unique(true).build())
                    .build();
                handle
                    .create_index(index)
                    .await
                    .map_err(|e| map_mongo_err(collection, e))?;
            }

            let order = IndexModel::builder().keys(listing_order()).build();
            handle
                .create_index(order)
                .await
                .map_err(|e| map_mongo_err(collection, e))?;
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for MongoStorage {
    fn backend(&self) -> BackendKind {
        BackendKind::MongoDb
    }

    async fn insert(&self, collection: Collection, record: Record) -> Result<String, StorageError> {
        let document = to_document(collection, record)?;

        let result = self
            .handle(collection)
            .insert_one(document)
            .await
            .map_err(|e| map_mongo_err(collection, e))?;

        Ok(match result.inserted_id {
            Bson::ObjectId(oid) => oid.to_hex(),
            Bson::String(id) => id,
            other => other.to_string(),
        })
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Record, StorageError> {
        let Some(query) = filter_document(collection, filter)? else {
            return Err(StorageError::NotFound);
        };

        let document = self
            .handle(collection)
            .find_one(query)
            .await
            .map_err(|e| map_mongo_err(collection, e))?
            .ok_or(StorageError::NotFound)?;

        from_document(collection, &document)
    }

    async fn find_many(
        &self,
        collection: Collection,
        filter: &Filter,
        page: PageRequest,
    ) -> Result<(Vec<Record>, u64), StorageError> {
        let Some(query) = filter_document(collection, filter)? else {
            return Ok((Vec::new(), 0));
        };
        let handle = self.handle(collection);

        let documents: Vec<Document> = handle
            .find(query.clone())
            .sort(listing_order())
            .skip(page.offset())
            .limit(i64::try_from(page.limit).unwrap_or(i64::MAX))
            .await
            .map_err(|e| map_mongo_err(collection, e))?
            .try_collect()
            .await
            .map_err(|e| map_mongo_err(collection, e))?;

        let total = handle
            .count_documents(query)
            .await
            .map_err(|e| map_mongo_err(collection, e))?;

        let records = documents
            .iter()
            .map(|d| from_document(collection, d))
            .collect::<Result<Vec<_>, _>>()?;

        Ok((records, total))
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        changes: Record,
    ) -> Result<u64, StorageError> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Err(StorageError::NotFound);
        };
        let changes = to_document(collection, changes)?;
        if changes.is_empty() {
            return Err(StorageError::InvalidRecord("no fields to update".to_string()));
        }

        let result = self
            .handle(collection)
            .update_one(doc! { "_id": oid }, doc! { "$set": changes })
            .await
            .map_err(|e| map_mongo_err(collection, e))?;

        match result.matched_count {
            0 => Err(StorageError::NotFound),
            matched => Ok(matched),
        }
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<u64, StorageError> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Err(StorageError::NotFound);
        };

        let result = self
            .handle(collection)
            .delete_one(doc! { "_id": oid })
            .await
            .map_err(|e| map_mongo_err(collection, e))?;

        match result.deleted_count {
            0 => Err(StorageError::NotFound),
            deleted => Ok(deleted),
        }
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, StorageError> {
        let Some(query) = filter_document(collection, filter)? else {
            return Ok(0);
        };

        self.handle(collection)
            .count_documents(query)
            .await
            .map_err(|e| map_mongo_err(collection, e))
    }

    async fn ping(&self) -> Result<(), StorageError> {
        self.db
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
            .map_err(|e| StorageError::Backend(e.to_string()))
    }
}

//
// ──────────────────────────────────────────────────────────
// Document mapping
// ──────────────────────────────────────────────────────────
//

fn listing_order() -> Document {
    let mut order = Document::new();
    order.insert(CREATED_AT, 1);
    order.insert("_id", 1);
    order
}

fn to_bson(value: FieldValue) -> Bson {
    match value {
        FieldValue::Null => Bson::Null,
        FieldValue::Text(v) => Bson::String(v),
        FieldValue::Integer(v) => Bson::Int64(v),
        FieldValue::Timestamp(v) => Bson::DateTime(bson::DateTime::from_chrono(v)),
    }
}

fn from_bson(spec: &FieldSpec, value: Option<&Bson>) -> Result<FieldValue, StorageError> {
    let value = match value {
        None | Some(Bson::Null) => return Ok(FieldValue::Null),
        Some(value) => value,
    };

    let converted = match (spec.kind, value) {
        (FieldKind::Text, Bson::String(v)) => Some(FieldValue::Text(v.clone())),
        (FieldKind::Text, Bson::ObjectId(oid)) => Some(FieldValue::Text(oid.to_hex())),
        (FieldKind::Integer, Bson::Int64(v)) => Some(FieldValue::Integer(*v)),
        (FieldKind::Integer, Bson::Int32(v)) => Some(FieldValue::Integer(i64::from(*v))),
        (FieldKind::Integer, Bson::Double(v)) if v.fract() == 0.0 => {
            Some(FieldValue::Integer(*v as i64))
        }
        (FieldKind::Timestamp, Bson::DateTime(v)) => Some(FieldValue::Timestamp(v.to_chrono())),
        _ => None,
    };

    converted.ok_or_else(|| {
        StorageError::InvalidRecord(format!(
            "field `{}` expects {:?}, found {value}",
            spec.name, spec.kind
        ))
    })
}

fn to_document(collection: Collection, record: Record) -> Result<Document, StorageError> {
    let mut document = Document::new();
    for (field, value) in record {
        if field == collection.key_field() {
            return Err(StorageError::InvalidRecord(format!(
                "key field `{field}` is assigned by storage"
            )));
        }
        if collection.field(&field).is_none() {
            return Err(StorageError::InvalidRecord(format!(
                "unknown field `{field}` for {collection}"
            )));
        }
        document.insert(field, to_bson(value));
    }
    Ok(document)
}

fn from_document(collection: Collection, document: &Document) -> Result<Record, StorageError> {
    let key = collection.key_field();
    let id = match document.get("_id") {
        Some(Bson::ObjectId(oid)) => oid.to_hex(),
        Some(Bson::String(id)) => id.clone(),
        _ => {
            return Err(StorageError::InvalidRecord(
                "document without identifier".to_string(),
            ))
        }
    };

    let mut record = Record::new().with(key, id);
    for spec in collection.data_fields() {
        record.set(spec.name, from_bson(spec, document.get(spec.name))?);
    }
    Ok(record)
}

/// Translates a filter into a query document. `None` means the filter can
/// never match, e.g. a key that is not a valid ObjectId.
fn filter_document(
    collection: Collection,
    filter: &Filter,
) -> Result<Option<Document>, StorageError> {
    let mut query = Document::new();
    for (field, value) in filter.conditions() {
        if field == collection.key_field() {
            let oid = value.as_text().and_then(|id| ObjectId::parse_str(id).ok());
            match oid {
                Some(oid) => query.insert("_id", oid),
                None => return Ok(None),
            };
            continue;
        }
        if collection.field(field).is_none() {
            return Err(StorageError::InvalidRecord(format!(
                "unknown field `{field}` for {collection}"
            )));
        }
        query.insert(field.clone(), to_bson(value.clone()));
    }
    Ok(Some(query))
}

fn map_mongo_err(collection: Collection, err: MongoError) -> StorageError {
    if let ErrorKind::Write(WriteFailure::WriteError(write_error)) = err.kind.as_ref() {
        if write_error.code == DUPLICATE_KEY_CODE {
            let detail = write_error.message.as_str();
            let scope = detail.find("index:").map(|i| &detail[i..]).unwrap_or(detail);
            let field = collection
                .unique_field_mentioned(scope)
                .unwrap_or_else(|| collection.key_field());
            return StorageError::duplicate(field);
        }
    }

    error!(error = %err, collection = %collection, "MongoDB error");
    StorageError::Backend(err.to_string())
}

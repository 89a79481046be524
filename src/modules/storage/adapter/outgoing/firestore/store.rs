use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde_json::{json, Value};
use tracing::{error, info};

use super::auth::{AccessTokenSource, Credentials};
use super::codec::{decode_document, encode_fields};
use super::query::{read_count, QueryBuilder};
use crate::modules::storage::application::domain::{
    BackendKind, Collection, FieldValue, Filter, PageRequest, Record,
};
use crate::modules::storage::application::ports::outgoing::{StorageAdapter, StorageError};

const PRODUCTION_BASE_URL: &str = "https://firestore.googleapis.com/v1";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Cloud Firestore adapter over the REST API.
///
/// Firestore has no unique indexes, so inserts and updates first look for
/// another document holding the same unique value. The check and the
/// write are separate requests; concurrent writers can still race.
pub struct FirestoreStorage {
    http: reqwest::Client,
    base_url: String,
    queries: QueryBuilder,
    tokens: AccessTokenSource,
}

impl FirestoreStorage {
    pub fn new(
        project_id: &str,
        credentials: Credentials,
        emulator_host: Option<&str>,
    ) -> Result<Self, StorageError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        let base_url = match emulator_host {
            Some(host) => format!("http://{host}/v1"),
            None => PRODUCTION_BASE_URL.to_string(),
        };

        info!(project = %project_id, base_url = %base_url, "Firestore storage configured");

        Ok(Self {
            tokens: AccessTokenSource::new(credentials)?,
            http,
            base_url,
            queries: QueryBuilder::new(project_id),
        })
    }

    fn documents_url(&self) -> String {
        format!("{}/{}", self.base_url, self.queries.root())
    }

    fn collection_url(&self, collection: Collection) -> String {
        format!("{}/{}", self.documents_url(), collection.name())
    }

    fn document_url(&self, collection: Collection, id: &str) -> String {
        format!("{}/{}", self.collection_url(collection), id)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, StorageError> {
        let headers = self.tokens.headers().await?;
        let response = request
            .headers(headers)
            .send()
            .await
            .map_err(|e| StorageError::Backend(format!("firestore request failed: {e}")))?;

        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::NOT_FOUND => Err(StorageError::NotFound),
            status => {
                let body = response.text().await.unwrap_or_default();
                error!(%status, body = %body, "Firestore request rejected");
                Err(StorageError::Backend(format!("firestore responded {status}")))
            }
        }
    }

    async fn json(response: Response) -> Result<Value, StorageError> {
        response
            .json::<Value>()
            .await
            .map_err(|e| StorageError::Backend(format!("invalid firestore response: {e}")))
    }

    async fn run_query(
        &self,
        collection: Collection,
        query: Value,
    ) -> Result<Vec<Record>, StorageError> {
        let url = format!("{}:runQuery", self.documents_url());
        let response = self.send(self.http.post(url).json(&query)).await?;
        let items = Self::json(response).await?;

        items
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.get("document"))
                    .map(|document| decode_document(collection, document))
                    .collect()
            })
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn run_count(&self, collection: Collection, filter: &Filter) -> Result<u64, StorageError> {
        let url = format!("{}:runAggregationQuery", self.documents_url());
        let query = self.queries.count(collection, filter)?;
        let response = self.send(self.http.post(url).json(&query)).await?;
        read_count(&Self::json(response).await?)
    }

    async fn get_document(&self, collection: Collection, id: &str) -> Result<Record, StorageError> {
        let response = self
            .send(self.http.get(self.document_url(collection, id)))
            .await?;
        decode_document(collection, &Self::json(response).await?)
    }

    /// Fails with `DuplicateKey` when another document already holds one
    /// of the unique values in `record`.
    async fn ensure_unique(
        &self,
        collection: Collection,
        record: &Record,
        own_id: Option<&str>,
    ) -> Result<(), StorageError> {
        for field in collection.unique_fields() {
            let Some(value @ FieldValue::Text(_)) = record.get(field) else {
                continue;
            };
            let query = self
                .queries
                .lookup(collection, &Filter::eq(field, value.clone()), 2)?;
            let holders = self.run_query(collection, query).await?;

            if held_by_other(collection, &holders, own_id) {
                return Err(StorageError::duplicate(*field));
            }
        }
        Ok(())
    }
}

/// True when any of `holders` is a document other than `own_id`.
fn held_by_other(collection: Collection, holders: &[Record], own_id: Option<&str>) -> bool {
    holders.iter().any(|holder| {
        holder.get(collection.key_field()).and_then(FieldValue::as_text) != own_id
    })
}

fn valid_document_id(id: &str) -> bool {
    !id.is_empty() && !id.contains('/') && id != "." && id != ".."
}

fn matches_filter(record: &Record, filter: &Filter) -> bool {
    filter
        .conditions()
        .iter()
        .all(|(field, value)| record.get(field) == Some(value))
}

#[async_trait]
impl StorageAdapter for FirestoreStorage {
    fn backend(&self) -> BackendKind {
        BackendKind::Firebase
    }

    async fn insert(&self, collection: Collection, record: Record) -> Result<String, StorageError> {
        let fields = encode_fields(collection, &record)?;
        self.ensure_unique(collection, &record, None).await?;

        let response = self
            .send(
                self.http
                    .post(self.collection_url(collection))
                    .json(&json!({ "fields": fields })),
            )
            .await?;
        let created = decode_document(collection, &Self::json(response).await?)?;

        created.text(collection.key_field())
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Record, StorageError> {
        if let Some(key) = filter.value_of(collection.key_field()) {
            let id = key.as_text().unwrap_or_default();
            if !valid_document_id(id) {
                return Err(StorageError::NotFound);
            }
            let record = self.get_document(collection, id).await?;
            return if matches_filter(&record, filter) {
                Ok(record)
            } else {
                Err(StorageError::NotFound)
            };
        }

        let query = self.queries.lookup(collection, filter, 1)?;
        self.run_query(collection, query)
            .await?
            .into_iter()
            .next()
            .ok_or(StorageError::NotFound)
    }

    async fn find_many(
        &self,
        collection: Collection,
        filter: &Filter,
        page: PageRequest,
    ) -> Result<(Vec<Record>, u64), StorageError> {
        let query = self
            .queries
            .select(collection, filter, page.offset(), page.limit)?;
        let records = self.run_query(collection, query).await?;
        let total = self.run_count(collection, filter).await?;
        Ok((records, total))
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        changes: Record,
    ) -> Result<u64, StorageError> {
        if !valid_document_id(id) {
            return Err(StorageError::NotFound);
        }
        let fields = encode_fields(collection, &changes)?;
        if fields.is_empty() {
            return Err(StorageError::InvalidRecord("no fields to update".to_string()));
        }
        self.ensure_unique(collection, &changes, Some(id)).await?;

        let mut params: Vec<(&str, &str)> = fields
            .keys()
            .map(|name| ("updateMask.fieldPaths", name.as_str()))
            .collect();
        params.push(("currentDocument.exists", "true"));

        self.send(
            self.http
                .patch(self.document_url(collection, id))
                .query(&params)
                .json(&json!({ "fields": fields })),
        )
        .await?;
        Ok(1)
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<u64, StorageError> {
        if !valid_document_id(id) {
            return Err(StorageError::NotFound);
        }

        self.send(
            self.http
                .delete(self.document_url(collection, id))
                .query(&[("currentDocument.exists", "true")]),
        )
        .await?;
        Ok(1)
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, StorageError> {
        self.run_count(collection, filter).await
    }

    async fn ping(&self) -> Result<(), StorageError> {
        self.send(
            self.http
                .get(self.collection_url(Collection::Users))
                .query(&[("pageSize", "1")]),
        )
        .await
        .map(|_| ())
    }
}

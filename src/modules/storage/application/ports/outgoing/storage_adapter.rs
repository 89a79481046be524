use async_trait::async_trait;

use crate::modules::storage::application::domain::{
    BackendKind, Collection, Filter, PageRequest, Record,
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StorageError {
    #[error("duplicate value for unique field `{field}`")]
    DuplicateKey { field: String },

    #[error("record not found")]
    NotFound,

    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StorageError {
    pub fn duplicate(field: impl Into<String>) -> Self {
        StorageError::DuplicateKey {
            field: field.into(),
        }
    }
}

/// Uniform persistence contract every backend adapter fulfils.
///
/// Records passed to `insert` carry every data field except the key; the
/// adapter assigns the key and returns it as an opaque string. Records
/// returned by reads always contain the key field under
/// [`Collection::key_field`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageAdapter: Send + Sync {
    fn backend(&self) -> BackendKind;

    async fn insert(&self, collection: Collection, record: Record) -> Result<String, StorageError>;

    async fn find_one(&self, collection: Collection, filter: &Filter)
        -> Result<Record, StorageError>;

    /// Page of matches ordered by `createdAt` then key, plus the total
    /// number of matches ignoring the window.
    async fn find_many(
        &self,
        collection: Collection,
        filter: &Filter,
        page: PageRequest,
    ) -> Result<(Vec<Record>, u64), StorageError>;

    /// Applies only the supplied fields. Returns the number of records
    /// updated; zero matches is `NotFound`.
    async fn update(
        &self,
        collection: Collection,
        id: &str,
        changes: Record,
    ) -> Result<u64, StorageError>;

    async fn delete(&self, collection: Collection, id: &str) -> Result<u64, StorageError>;

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, StorageError>;

    async fn ping(&self) -> Result<(), StorageError>;
}

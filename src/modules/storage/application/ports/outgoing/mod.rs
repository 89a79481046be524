pub mod storage_adapter;

pub use storage_adapter::{StorageAdapter, StorageError};

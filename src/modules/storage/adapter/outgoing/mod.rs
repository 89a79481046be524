pub mod backend_selector;
pub mod firestore;
pub mod mongo_storage;
pub mod sql_storage;

pub mod auth;
pub mod codec;
pub mod query;
mod store;

pub use auth::{Credentials, ServiceAccountKey};
pub use store::FirestoreStorage;

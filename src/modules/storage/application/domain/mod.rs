pub mod backend;
pub mod collection;
pub mod query;
pub mod record;

pub use backend::{BackendKind, UnsupportedBackend};
pub use collection::{Collection, FieldKind, FieldSpec};
pub use query::{Filter, Page, PageRequest};
pub use record::{FieldValue, Record};

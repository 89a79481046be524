use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use super::firestore::{Credentials, FirestoreStorage, ServiceAccountKey};
use super::mongo_storage::MongoStorage;
use super::sql_storage::SqlStorage;
use crate::modules::storage::application::domain::BackendKind;
use crate::modules::storage::application::ports::outgoing::{StorageAdapter, StorageError};

/// Connection settings for the one backend chosen at startup.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    MongoDb {
        uri: String,
        database: Option<String>,
    },
    MySql {
        url: String,
        max_connections: u32,
    },
    Supabase {
        url: String,
        max_connections: u32,
    },
    Firebase {
        project_id: Option<String>,
        service_account_path: PathBuf,
        emulator_host: Option<String>,
    },
}

impl StorageConfig {
    pub fn backend(&self) -> BackendKind {
        match self {
            StorageConfig::MongoDb { .. } => BackendKind::MongoDb,
            StorageConfig::MySql { .. } => BackendKind::MySql,
            StorageConfig::Supabase { .. } => BackendKind::Supabase,
            StorageConfig::Firebase { .. } => BackendKind::Firebase,
        }
    }
}

/// Connects the configured backend and returns it behind the storage
/// contract. Called once; the adapter is shared for the process lifetime.
pub async fn connect_storage(
    config: &StorageConfig,
) -> Result<Arc<dyn StorageAdapter>, StorageError> {
    let backend = config.backend();
    info!(backend = %backend, "Connecting storage backend");

    let storage: Arc<dyn StorageAdapter> = match config {
        StorageConfig::MongoDb { uri, database } => {
            Arc::new(MongoStorage::connect(uri, database.as_deref()).await?)
        }
        StorageConfig::MySql {
            url,
            max_connections,
        }
        | StorageConfig::Supabase {
            url,
            max_connections,
        } => {
            let conn = connect_relational(url, *max_connections).await?;
            Arc::new(SqlStorage::new(Arc::new(conn), backend))
        }
        StorageConfig::Firebase {
            project_id,
            service_account_path,
            emulator_host,
        } => Arc::new(firestore(
            project_id.as_deref(),
            service_account_path,
            emulator_host.as_deref(),
        )?),
    };

    info!(backend = %backend, "Storage backend connected");
    Ok(storage)
}

async fn connect_relational(
    url: &str,
    max_connections: u32,
) -> Result<DatabaseConnection, StorageError> {
    let mut opt = ConnectOptions::new(url.to_owned());
    opt.max_connections(max_connections)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(false);

    let conn = Database::connect(opt)
        .await
        .map_err(|e| StorageError::Backend(format!("database connection failed: {e}")))?;

    Migrator::up(&conn, None)
        .await
        .map_err(|e| StorageError::Backend(format!("schema migration failed: {e}")))?;
    info!("Relational schema is up to date");

    Ok(conn)
}

fn firestore(
    project_id: Option<&str>,
    service_account_path: &Path,
    emulator_host: Option<&str>,
) -> Result<FirestoreStorage, StorageError> {
    if let Some(host) = emulator_host {
        let project_id = project_id.ok_or_else(|| {
            StorageError::Backend("a project id is required with the emulator".to_string())
        })?;
        return FirestoreStorage::new(project_id, Credentials::Emulator, Some(host));
    }

    let key = ServiceAccountKey::from_file(service_account_path)?;
    let project_id = project_id.unwrap_or(key.project_id.as_str()).to_string();
    FirestoreStorage::new(&project_id, Credentials::ServiceAccount(key), None)
}

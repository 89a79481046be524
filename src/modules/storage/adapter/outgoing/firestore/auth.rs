use std::path::Path;

use google_cloud_auth::credentials::service_account::{AccessSpecifier, Builder};
use google_cloud_auth::credentials::CacheableResource;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;
use tracing::error;

use crate::modules::storage::application::ports::outgoing::StorageError;

const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";
const EMULATOR_BEARER: &str = "Bearer owner";

/// A Google service-account JSON key. The whole document is handed to
/// `google-cloud-auth`; only the project id is read here.
#[derive(Debug, Clone)]
pub struct ServiceAccountKey {
    pub project_id: String,
    json: Value,
}

impl ServiceAccountKey {
    pub fn from_file(path: &Path) -> Result<Self, StorageError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            StorageError::Backend(format!(
                "cannot read service account {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, StorageError> {
        let json: Value = serde_json::from_str(raw)
            .map_err(|e| StorageError::Backend(format!("invalid service account key: {e}")))?;
        let project_id = json
            .get("project_id")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                StorageError::Backend("invalid service account key: missing project_id".to_string())
            })?
            .to_string();

        Ok(Self { project_id, json })
    }
}

#[derive(Debug, Clone)]
pub enum Credentials {
    /// Local emulator; accepts the fixed `owner` bearer token.
    Emulator,
    ServiceAccount(ServiceAccountKey),
}

enum Source {
    Emulator,
    Google(google_cloud_auth::credentials::Credentials),
}

/// Produces the `Authorization` header for each Firestore request.
/// Token minting and refresh are left to `google-cloud-auth`.
pub struct AccessTokenSource {
    source: Source,
}

impl AccessTokenSource {
    pub fn new(credentials: Credentials) -> Result<Self, StorageError> {
        let source = match credentials {
            Credentials::Emulator => Source::Emulator,
            Credentials::ServiceAccount(key) => {
                let credentials = Builder::new(key.json)
                    .with_access_specifier(AccessSpecifier::from_scopes([DATASTORE_SCOPE]))
                    .build()
                    .map_err(|e| {
                        error!("Failed to build Firestore credentials: {:?}", e);
                        StorageError::Backend(format!("invalid service account credentials: {e}"))
                    })?;
                Source::Google(credentials)
            }
        };

        Ok(Self { source })
    }

    pub async fn headers(&self) -> Result<HeaderMap, StorageError> {
        match &self.source {
            Source::Emulator => {
                let mut headers = HeaderMap::new();
                headers.insert(AUTHORIZATION, HeaderValue::from_static(EMULATOR_BEARER));
                Ok(headers)
            }
            Source::Google(credentials) => {
                match credentials.headers(Default::default()).await {
                    Ok(CacheableResource::New { data, .. }) => Ok(data),
                    Ok(CacheableResource::NotModified) => Err(StorageError::Backend(
                        "credentials returned no authorization headers".to_string(),
                    )),
                    Err(e) => {
                        error!("Failed to obtain Firestore access token: {:?}", e);
                        Err(StorageError::Backend(format!("token request failed: {e}")))
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_JSON: &str = r#"{
        "type": "service_account",
        "project_id": "helpdesk-test",
        "private_key_id": "abc",
        "private_key": "not a pem",
        "client_email": "svc@helpdesk-test.iam.gserviceaccount.com"
    }"#;

    #[test]
    fn reads_project_id_from_service_account() {
        let key = ServiceAccountKey::from_json(KEY_JSON).unwrap();

        assert_eq!(key.project_id, "helpdesk-test");
    }

    #[test]
    fn rejects_service_account_without_project() {
        let result = ServiceAccountKey::from_json(r#"{"type": "service_account"}"#);

        assert!(matches!(result, Err(StorageError::Backend(msg)) if msg.contains("project_id")));
    }

    #[test]
    fn rejects_malformed_service_account() {
        let result = ServiceAccountKey::from_json("not json");

        assert!(matches!(result, Err(StorageError::Backend(_))));
    }

    #[tokio::test]
    async fn emulator_uses_owner_token() {
        let source = AccessTokenSource::new(Credentials::Emulator).unwrap();

        let headers = source.headers().await.unwrap();

        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer owner");
    }
}

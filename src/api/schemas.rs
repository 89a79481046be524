use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of responses that only confirm an action.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Ticket deleted successfully")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Phone numbers arrive either as a JSON number or as a string of digits.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(untagged)]
pub enum PhoneInput {
    Number(i64),
    Text(String),
}

impl PhoneInput {
    /// Textual form handed to validation.
    pub fn into_raw(self) -> String {
        match self {
            PhoneInput::Number(n) => n.to_string(),
            PhoneInput::Text(s) => s,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
    /// Active storage backend, reported by the readiness probe
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "mongodb")]
    pub storage: Option<String>,
}

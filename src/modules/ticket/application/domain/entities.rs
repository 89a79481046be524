use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::modules::auth::application::domain::entities::AuthenticatedUser;
use crate::modules::storage::application::domain::collection::{CREATED_AT, LAST_UPDATED};
use crate::modules::storage::application::domain::{Filter, Record};
use crate::modules::storage::application::ports::outgoing::StorageError;

pub const CREATED_BY: &str = "createdBy";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum TicketStatus {
    #[default]
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Closed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "Open",
            TicketStatus::InProgress => "In Progress",
            TicketStatus::Closed => "Closed",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Open" => Ok(TicketStatus::Open),
            "In Progress" => Ok(TicketStatus::InProgress),
            "Closed" => Ok(TicketStatus::Closed),
            other => Err(format!("unknown ticket status `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Ticket {
    pub ticket_id: String,
    #[schema(example = "Printer on floor 3 is jammed")]
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    /// Owning user, fixed at creation
    #[serde(rename = "createdBy")]
    pub created_by: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl Ticket {
    pub fn from_record(record: &Record) -> Result<Self, StorageError> {
        Ok(Self {
            ticket_id: record.text("ticket_id")?,
            title: record.text("title")?,
            description: record.text("description")?,
            status: record
                .text("status")?
                .parse()
                .map_err(StorageError::InvalidRecord)?,
            created_by: record.text(CREATED_BY)?,
            created_at: record.timestamp(CREATED_AT)?,
            last_updated: record.optional_timestamp(LAST_UPDATED)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewTicket {
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub created_by: String,
}

impl NewTicket {
    pub fn into_record(self, now: DateTime<Utc>) -> Record {
        Record::new()
            .with("title", self.title)
            .with("description", self.description)
            .with("status", self.status.as_str())
            .with(CREATED_BY, self.created_by)
            .with(CREATED_AT, now)
            .with(LAST_UPDATED, now)
    }
}

/// Validated partial update. Ownership is not part of it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TicketStatus>,
}

impl TicketChanges {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn into_record(self, now: DateTime<Utc>) -> Record {
        let mut record = Record::new();
        if let Some(v) = self.title {
            record.set("title", v);
        }
        if let Some(v) = self.description {
            record.set("description", v);
        }
        if let Some(v) = self.status {
            record.set("status", v.as_str());
        }
        record.set(LAST_UPDATED, now);
        record
    }
}

/// Which tickets a listing may return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketScope {
    All,
    OwnedBy(String),
}

impl TicketScope {
    /// Scope for `requester`, optionally narrowed to one owner. Returns
    /// `None` when a non-admin asks for someone else's tickets.
    pub fn resolve(requester: &AuthenticatedUser, owner: Option<&str>) -> Option<Self> {
        match owner {
            Some(owner) if requester.may_act_on(owner) => {
                Some(TicketScope::OwnedBy(owner.to_string()))
            }
            Some(_) => None,
            None if requester.is_admin() => Some(TicketScope::All),
            None => Some(TicketScope::OwnedBy(requester.id.clone())),
        }
    }

    pub fn filter(&self) -> Filter {
        match self {
            TicketScope::All => Filter::all(),
            TicketScope::OwnedBy(owner) => Filter::eq(CREATED_BY, owner.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::user::application::domain::entities::Role;
    use crate::tests::support::fixtures::requester;

    #[test]
    fn status_uses_display_names_on_the_wire() {
        assert_eq!(
            serde_json::to_value(TicketStatus::InProgress).unwrap(),
            "In Progress"
        );
        let parsed: TicketStatus = serde_json::from_str("\"Closed\"").unwrap();
        assert_eq!(parsed, TicketStatus::Closed);
        assert!(serde_json::from_str::<TicketStatus>("\"Pending\"").is_err());
    }

    #[test]
    fn admin_without_owner_sees_everything() {
        let admin = requester("a-1", Role::Admin);

        assert_eq!(TicketScope::resolve(&admin, None), Some(TicketScope::All));
        assert!(TicketScope::All.filter().is_empty());
    }

    #[test]
    fn user_is_always_narrowed_to_own_tickets() {
        let user = requester("u-1", Role::User);

        assert_eq!(
            TicketScope::resolve(&user, None),
            Some(TicketScope::OwnedBy("u-1".to_string()))
        );
        assert_eq!(
            TicketScope::resolve(&user, Some("u-1")),
            Some(TicketScope::OwnedBy("u-1".to_string()))
        );
        assert_eq!(TicketScope::resolve(&user, Some("u-2")), None);
    }

    #[test]
    fn new_ticket_record_sets_owner_and_timestamps() {
        let now = Utc::now();
        let record = NewTicket {
            title: "T".to_string(),
            description: "D".to_string(),
            status: TicketStatus::default(),
            created_by: "u-1".to_string(),
        }
        .into_record(now);

        assert_eq!(record.text("status").unwrap(), "Open");
        assert_eq!(record.text(CREATED_BY).unwrap(), "u-1");
        assert_eq!(record.timestamp(CREATED_AT).unwrap(), now);
        assert!(!record.contains("ticket_id"));
    }
}

use std::fmt;

/// Field used by every adapter for the stable listing order.
pub const CREATED_AT: &str = "createdAt";
pub const LAST_UPDATED: &str = "last_updated";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub nullable: bool,
}

const fn field(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        nullable: false,
    }
}

const fn nullable(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        nullable: true,
    }
}

const USER_FIELDS: &[FieldSpec] = &[
    field("id", FieldKind::Text),
    field("fullname", FieldKind::Text),
    field("username", FieldKind::Text),
    field("email", FieldKind::Text),
    field("password", FieldKind::Text),
    field("phone", FieldKind::Integer),
    nullable("address", FieldKind::Text),
    field("role", FieldKind::Text),
    field("dash_type", FieldKind::Text),
    field(CREATED_AT, FieldKind::Timestamp),
    nullable(LAST_UPDATED, FieldKind::Timestamp),
];

const TICKET_FIELDS: &[FieldSpec] = &[
    field("ticket_id", FieldKind::Text),
    field("title", FieldKind::Text),
    field("description", FieldKind::Text),
    field("status", FieldKind::Text),
    field("createdBy", FieldKind::Text),
    field(CREATED_AT, FieldKind::Timestamp),
    nullable(LAST_UPDATED, FieldKind::Timestamp),
];

/// The two persisted collections. Each knows its key field, its unique
/// fields and the typed schema adapters map onto native storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Tickets,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Tickets => "tickets",
        }
    }

    pub fn key_field(&self) -> &'static str {
        match self {
            Collection::Users => "id",
            Collection::Tickets => "ticket_id",
        }
    }

    /// Fields that must be unique across the collection, key excluded.
    pub fn unique_fields(&self) -> &'static [&'static str] {
        match self {
            Collection::Users => &["username", "email"],
            Collection::Tickets => &[],
        }
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            Collection::Users => USER_FIELDS,
            Collection::Tickets => TICKET_FIELDS,
        }
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|f| f.name == name)
    }

    /// First unique field named in a backend's violation message.
    pub fn unique_field_mentioned(&self, text: &str) -> Option<&'static str> {
        self.unique_fields()
            .iter()
            .find(|field| text.contains(*field))
            .copied()
    }

    /// Schema without the key field, i.e. what a caller supplies on insert.
    pub fn data_fields(&self) -> impl Iterator<Item = &'static FieldSpec> {
        let key = self.key_field();
        self.fields().iter().filter(move |f| f.name != key)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

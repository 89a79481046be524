use std::fmt;
use std::str::FromStr;

/// Storage backend selected once at startup from `DB_TYPE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Document store (MongoDB)
    MongoDb,
    /// Relational (MySQL)
    MySql,
    /// Managed relational (Supabase PostgreSQL)
    Supabase,
    /// Document cloud (Cloud Firestore)
    Firebase,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported database type: {0}")]
pub struct UnsupportedBackend(pub String);

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::MongoDb => "mongodb",
            BackendKind::MySql => "mysql",
            BackendKind::Supabase => "supabase",
            BackendKind::Firebase => "firebase",
        }
    }

    /// Relational backends share the SQL adapter and the migration set.
    pub fn is_relational(&self) -> bool {
        matches!(self, BackendKind::MySql | BackendKind::Supabase)
    }
}

impl FromStr for BackendKind {
    type Err = UnsupportedBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongodb" => Ok(BackendKind::MongoDb),
            "mysql" => Ok(BackendKind::MySql),
            "supabase" => Ok(BackendKind::Supabase),
            "firebase" => Ok(BackendKind::Firebase),
            _ => Err(UnsupportedBackend(s.to_string())),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_supported_backend() {
        assert_eq!("mongodb".parse::<BackendKind>(), Ok(BackendKind::MongoDb));
        assert_eq!("mysql".parse::<BackendKind>(), Ok(BackendKind::MySql));
        assert_eq!("supabase".parse::<BackendKind>(), Ok(BackendKind::Supabase));
        assert_eq!("firebase".parse::<BackendKind>(), Ok(BackendKind::Firebase));
    }

    #[test]
    fn parsing_ignores_case_and_padding() {
        assert_eq!(" MongoDB ".parse::<BackendKind>(), Ok(BackendKind::MongoDb));
    }

    #[test]
    fn rejects_unknown_backend() {
        let err = "postgres".parse::<BackendKind>().unwrap_err();
        assert_eq!(err, UnsupportedBackend("postgres".to_string()));
        assert_eq!(err.to_string(), "Unsupported database type: postgres");
    }

    #[test]
    fn only_sql_backends_are_relational() {
        assert!(BackendKind::MySql.is_relational());
        assert!(BackendKind::Supabase.is_relational());
        assert!(!BackendKind::MongoDb.is_relational());
        assert!(!BackendKind::Firebase.is_relational());
    }
}

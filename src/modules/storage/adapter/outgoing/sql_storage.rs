use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{
    Alias, Asterisk, DeleteStatement, Expr, Func, Order, Query, SelectStatement, SimpleExpr,
    UpdateStatement, Value,
};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, QueryResult, SqlErr, StatementBuilder};
use tracing::error;
use uuid::Uuid;

use crate::modules::storage::application::domain::collection::CREATED_AT;
use crate::modules::storage::application::domain::{
    BackendKind, Collection, FieldKind, FieldSpec, FieldValue, Filter, PageRequest, Record,
};
use crate::modules::storage::application::ports::outgoing::{StorageAdapter, StorageError};

/// Storage adapter for the relational backends (MySQL and Supabase's
/// PostgreSQL). Statements are built with sea-query so each dialect gets
/// its own identifier quoting; column names equal the external field names.
#[derive(Clone)]
pub struct SqlStorage {
    db: Arc<DatabaseConnection>,
    backend: BackendKind,
}

impl SqlStorage {
    pub fn new(db: Arc<DatabaseConnection>, backend: BackendKind) -> Self {
        Self { db, backend }
    }

    fn build<S: StatementBuilder>(&self, statement: &S) -> sea_orm::Statement {
        self.db.get_database_backend().build(statement)
    }

    async fn total(&self, collection: Collection, filter: &Filter) -> Result<u64, StorageError> {
        let statement = count_statement(collection, filter)?;
        let row = self
            .db
            .query_one(self.build(&statement))
            .await
            .map_err(|e| map_db_err(collection, e))?
            .ok_or_else(|| StorageError::Backend("count returned no rows".to_string()))?;

        let total: i64 = row
            .try_get("", "total")
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        Ok(total.max(0) as u64)
    }
}

#[async_trait]
impl StorageAdapter for SqlStorage {
    fn backend(&self) -> BackendKind {
        self.backend
    }

    async fn insert(&self, collection: Collection, record: Record) -> Result<String, StorageError> {
        let id = Uuid::new_v4().to_string();
        let key = collection.key_field();

        let mut columns = vec![Alias::new(key)];
        let mut values = vec![SimpleExpr::Value(Value::from(id.clone()))];
        for (field, value) in record {
            if field == key {
                continue;
            }
            let spec = field_spec(collection, &field)?;
            columns.push(Alias::new(spec.name));
            values.push(SimpleExpr::Value(to_sql_value(spec, value)?));
        }

        let mut statement = Query::insert();
        statement.into_table(Alias::new(collection.name())).columns(columns);
        statement
            .values(values)
            .map_err(|e| StorageError::InvalidRecord(e.to_string()))?;

        self.db
            .execute(self.build(&statement))
            .await
            .map_err(|e| map_db_err(collection, e))?;

        Ok(id)
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Record, StorageError> {
        let mut statement = select_statement(collection, filter)?;
        statement.limit(1);

        let row = self
            .db
            .query_one(self.build(&statement))
            .await
            .map_err(|e| map_db_err(collection, e))?
            .ok_or(StorageError::NotFound)?;

        read_row(collection, &row)
    }

    async fn find_many(
        &self,
        collection: Collection,
        filter: &Filter,
        page: PageRequest,
    ) -> Result<(Vec<Record>, u64), StorageError> {
        let statement = page_statement(collection, filter, page)?;

        let rows = self
            .db
            .query_all(self.build(&statement))
            .await
            .map_err(|e| map_db_err(collection, e))?;

        let records = rows
            .iter()
            .map(|row| read_row(collection, row))
            .collect::<Result<Vec<_>, _>>()?;

        let total = self.total(collection, filter).await?;
        Ok((records, total))
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        changes: Record,
    ) -> Result<u64, StorageError> {
        let statement = update_statement(collection, id, changes)?;

        let result = self
            .db
            .execute(self.build(&statement))
            .await
            .map_err(|e| map_db_err(collection, e))?;

        if result.rows_affected() > 0 {
            return Ok(result.rows_affected());
        }

        // MySQL counts changed rows, not matched ones
        match self
            .total(collection, &Filter::eq(collection.key_field(), id))
            .await?
        {
            0 => Err(StorageError::NotFound),
            matched => Ok(matched),
        }
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<u64, StorageError> {
        let statement = delete_statement(collection, id);

        let result = self
            .db
            .execute(self.build(&statement))
            .await
            .map_err(|e| map_db_err(collection, e))?;

        match result.rows_affected() {
            0 => Err(StorageError::NotFound),
            deleted => Ok(deleted),
        }
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, StorageError> {
        self.total(collection, filter).await
    }

    async fn ping(&self) -> Result<(), StorageError> {
        self.db.ping().await.map_err(|e| {
            error!(error = %e, backend = %self.backend, "Database ping failed");
            StorageError::Backend(e.to_string())
        })
    }
}

//
// ──────────────────────────────────────────────────────────
// Statement builders
// ──────────────────────────────────────────────────────────
//

fn field_spec(collection: Collection, field: &str) -> Result<&'static FieldSpec, StorageError> {
    collection.field(field).ok_or_else(|| {
        StorageError::InvalidRecord(format!("unknown field `{field}` for {collection}"))
    })
}

fn to_sql_value(spec: &FieldSpec, value: FieldValue) -> Result<Value, StorageError> {
    match (spec.kind, value) {
        (FieldKind::Text, FieldValue::Text(v)) => Ok(Value::from(v)),
        (FieldKind::Integer, FieldValue::Integer(v)) => Ok(Value::from(v)),
        (FieldKind::Timestamp, FieldValue::Timestamp(v)) => Ok(Value::from(v)),
        (FieldKind::Text, FieldValue::Null) => Ok(Value::String(None)),
        (FieldKind::Integer, FieldValue::Null) => Ok(Value::BigInt(None)),
        (FieldKind::Timestamp, FieldValue::Null) => Ok(Value::ChronoDateTimeUtc(None)),
        (kind, other) => Err(StorageError::InvalidRecord(format!(
            "field `{}` expects {kind:?}, got {other:?}",
            spec.name
        ))),
    }
}

fn apply_filter(
    statement: &mut SelectStatement,
    collection: Collection,
    filter: &Filter,
) -> Result<(), StorageError> {
    for (field, value) in filter.conditions() {
        let spec = field_spec(collection, field)?;
        let value = to_sql_value(spec, value.clone())?;
        statement.and_where(Expr::col(Alias::new(spec.name)).eq(SimpleExpr::Value(value)));
    }
    Ok(())
}

fn select_statement(
    collection: Collection,
    filter: &Filter,
) -> Result<SelectStatement, StorageError> {
    let mut statement = Query::select();
    statement
        .columns(collection.fields().iter().map(|f| Alias::new(f.name)))
        .from(Alias::new(collection.name()));
    apply_filter(&mut statement, collection, filter)?;
    Ok(statement)
}

pub(crate) fn page_statement(
    collection: Collection,
    filter: &Filter,
    page: PageRequest,
) -> Result<SelectStatement, StorageError> {
    let mut statement = select_statement(collection, filter)?;
    statement
        .order_by(Alias::new(CREATED_AT), Order::Asc)
        .order_by(Alias::new(collection.key_field()), Order::Asc)
        .limit(page.limit)
        .offset(page.offset());
    Ok(statement)
}

fn count_statement(
    collection: Collection,
    filter: &Filter,
) -> Result<SelectStatement, StorageError> {
    let mut statement = Query::select();
    statement
        .expr_as(Func::count(Expr::col(Asterisk)), Alias::new("total"))
        .from(Alias::new(collection.name()));
    apply_filter(&mut statement, collection, filter)?;
    Ok(statement)
}

fn update_statement(
    collection: Collection,
    id: &str,
    changes: Record,
) -> Result<UpdateStatement, StorageError> {
    let key = collection.key_field();
    let mut values = Vec::with_capacity(changes.len());
    for (field, value) in changes {
        if field == key {
            return Err(StorageError::InvalidRecord(format!(
                "key field `{key}` cannot be updated"
            )));
        }
        let spec = field_spec(collection, &field)?;
        values.push((Alias::new(spec.name), SimpleExpr::Value(to_sql_value(spec, value)?)));
    }

    if values.is_empty() {
        return Err(StorageError::InvalidRecord("no fields to update".to_string()));
    }

    let mut statement = Query::update();
    statement
        .table(Alias::new(collection.name()))
        .values(values)
        .and_where(Expr::col(Alias::new(key)).eq(id));
    Ok(statement)
}

fn delete_statement(collection: Collection, id: &str) -> DeleteStatement {
    let mut statement = Query::delete();
    statement
        .from_table(Alias::new(collection.name()))
        .and_where(Expr::col(Alias::new(collection.key_field())).eq(id));
    statement
}

//
// ──────────────────────────────────────────────────────────
// Row mapping
// ──────────────────────────────────────────────────────────
//

fn read_row(collection: Collection, row: &QueryResult) -> Result<Record, StorageError> {
    let mut record = Record::new();
    for spec in collection.fields() {
        let value = match spec.kind {
            FieldKind::Text => row
                .try_get::<Option<String>>("", spec.name)
                .map(FieldValue::from),
            FieldKind::Integer => row
                .try_get::<Option<i64>>("", spec.name)
                .map(FieldValue::from),
            FieldKind::Timestamp => row
                .try_get::<Option<DateTime<Utc>>>("", spec.name)
                .map(FieldValue::from),
        }
        .map_err(|e| StorageError::InvalidRecord(format!("{}: {e}", spec.name)))?;
        record.set(spec.name, value);
    }
    Ok(record)
}

fn map_db_err(collection: Collection, err: DbErr) -> StorageError {
    if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
        return StorageError::duplicate(duplicate_field(collection, &detail));
    }

    let message = err.to_string();
    if message.contains("23505")
        || message.contains("1062")
        || message.contains("duplicate key")
        || message.contains("Duplicate entry")
        || message.contains("unique constraint")
    {
        return StorageError::duplicate(duplicate_field(collection, &message));
    }

    error!(error = %message, collection = %collection, "Database error");
    StorageError::Backend(message)
}

/// Names the unique field a violation message refers to. MySQL reports
/// the index after "for key", PostgreSQL the constraint name.
fn duplicate_field(collection: Collection, detail: &str) -> String {
    let scope = ["for key", "constraint"]
        .iter()
        .find_map(|marker| detail.find(marker).map(|i| &detail[i..]))
        .unwrap_or(detail);

    collection
        .unique_field_mentioned(scope)
        .unwrap_or_else(|| collection.key_field())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::collections::BTreeMap;

    fn ticket_row(id: &str, created_by: &str) -> BTreeMap<&'static str, Value> {
        btreemap! {
            "ticket_id" => Value::from(id),
            "title" => Value::from("Printer jam"),
            "description" => Value::from("Tray 2 is stuck"),
            "status" => Value::from("Open"),
            "createdBy" => Value::from(created_by),
            "createdAt" => Value::from(Utc::now()),
            "last_updated" => Value::ChronoDateTimeUtc(None),
        }
    }

    fn storage(db: MockDatabase) -> SqlStorage {
        SqlStorage::new(Arc::new(db.into_connection()), BackendKind::Supabase)
    }

    #[tokio::test]
    async fn find_one_maps_row_to_record() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![ticket_row("t-1", "u-1")]]);

        let record = storage(db)
            .find_one(Collection::Tickets, &Filter::eq("ticket_id", "t-1"))
            .await
            .unwrap();

        assert_eq!(record.text("ticket_id").unwrap(), "t-1");
        assert_eq!(record.text("createdBy").unwrap(), "u-1");
        assert_eq!(record.optional_timestamp("last_updated").unwrap(), None);
    }

    #[tokio::test]
    async fn find_one_without_rows_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<BTreeMap<&str, Value>>::new()]);

        let result = storage(db)
            .find_one(Collection::Tickets, &Filter::eq("ticket_id", "missing"))
            .await;

        assert_eq!(result, Err(StorageError::NotFound));
    }

    #[tokio::test]
    async fn find_many_returns_window_and_total() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![ticket_row("t-1", "u-1"), ticket_row("t-2", "u-1")]])
            .append_query_results([vec![btreemap! { "total" => Value::BigInt(Some(5)) }]]);

        let (records, total) = storage(db)
            .find_many(
                Collection::Tickets,
                &Filter::eq("createdBy", "u-1"),
                PageRequest::new(1, 2),
            )
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(total, 5);
    }

    #[tokio::test]
    async fn insert_maps_unique_violation_to_duplicate_key() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).append_exec_errors([DbErr::Custom(
            "duplicate key value violates unique constraint \"users_email_key\"".to_string(),
        )]);

        let record = Record::new()
            .with("username", "jdoe")
            .with("email", "username@example.com");

        let result = storage(db).insert(Collection::Users, record).await;

        assert_eq!(result, Err(StorageError::duplicate("email")));
    }

    #[tokio::test]
    async fn insert_returns_generated_identifier() {
        let db = MockDatabase::new(DatabaseBackend::MySql).append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }]);

        let id = storage(db)
            .insert(Collection::Tickets, Record::new().with("title", "Printer jam"))
            .await
            .unwrap();

        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[tokio::test]
    async fn delete_without_match_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).append_exec_results([
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            },
        ]);

        let result = storage(db).delete(Collection::Tickets, "missing").await;

        assert_eq!(result, Err(StorageError::NotFound));
    }

    #[tokio::test]
    async fn update_without_match_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .append_query_results([vec![btreemap! { "total" => Value::BigInt(Some(0)) }]]);

        let result = storage(db)
            .update(
                Collection::Tickets,
                "missing",
                Record::new().with("status", "Closed"),
            )
            .await;

        assert_eq!(result, Err(StorageError::NotFound));
    }

    #[tokio::test]
    async fn unchanged_mysql_update_still_counts_as_match() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .append_query_results([vec![btreemap! { "total" => Value::BigInt(Some(1)) }]]);

        let result = storage(db)
            .update(Collection::Tickets, "t-1", Record::new().with("status", "Open"))
            .await;

        assert_eq!(result, Ok(1));
    }

    #[test]
    fn update_rejects_key_and_unknown_fields() {
        let key_change = update_statement(
            Collection::Tickets,
            "t-1",
            Record::new().with("ticket_id", "t-2"),
        );
        assert!(matches!(key_change, Err(StorageError::InvalidRecord(_))));

        let unknown = update_statement(
            Collection::Tickets,
            "t-1",
            Record::new().with("priority", "high"),
        );
        assert!(matches!(unknown, Err(StorageError::InvalidRecord(_))));
    }

    #[test]
    fn page_statement_orders_by_creation_then_key() {
        let statement = page_statement(
            Collection::Tickets,
            &Filter::eq("createdBy", "u-1"),
            PageRequest::new(3, 5),
        )
        .unwrap();

        let sql = DatabaseBackend::MySql.build(&statement).to_string();

        assert!(sql.contains("FROM `tickets`"));
        assert!(sql.contains("WHERE `createdBy` = 'u-1'"));
        assert!(sql.contains("ORDER BY `createdAt` ASC, `ticket_id` ASC"));
        assert!(sql.contains("LIMIT 5"));
        assert!(sql.contains("OFFSET 10"));
    }

    #[test]
    fn duplicate_field_reads_mysql_index_name() {
        let detail = "Duplicate entry 'username@x.io' for key 'users.email'";
        assert_eq!(duplicate_field(Collection::Users, detail), "email");
    }
}

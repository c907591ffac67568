//! [`RowStore`] over PostgreSQL through sea-orm's raw statement support.
//!
//! Tables are addressed by name at runtime, so column types are unknown on
//! this side. Payloads and filter values travel as one `jsonb` parameter and
//! `jsonb_populate_record` converts them to the table's row type, which lets
//! Postgres apply its own input rules for `uuid`, `date`, `numeric`, enums
//! and NULLs. Rows come back the same way, as `to_jsonb` of the table alias.

use anyhow::{Context as _, anyhow};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, JsonValue, Statement, Value};
use uuid::Uuid;

use crate::error::StoreError;
use crate::query::{Filter, ID_COLUMN, Row, RowStore, Select};

const ROW_ALIAS: &str = "t";
const ROW_COLUMN: &str = "row";

#[derive(Clone)]
pub struct SeaRowStore {
    pub db: DatabaseConnection,
}

impl SeaRowStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn fetch_rows(&self, sql: Sql, what: &str) -> Result<Vec<Row>, StoreError> {
        let results = self
            .db
            .query_all(sql.into_statement())
            .await
            .with_context(|| what.to_owned())?;
        let mut rows = Vec::with_capacity(results.len());
        for result in results {
            let value: JsonValue = result
                .try_get("", ROW_COLUMN)
                .with_context(|| format!("{what}: decode row"))?;
            if let JsonValue::Object(row) = value {
                rows.push(row);
            }
        }
        Ok(rows)
    }
}

// ── SQL assembly ─────────────────────────────────────────────────────────────

/// Quote an identifier, doubling embedded quotes.
fn quote(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// SQL text with positional parameters.
#[derive(Debug, Default)]
struct Sql {
    text: String,
    values: Vec<Value>,
}

impl Sql {
    fn push(&mut self, fragment: &str) -> &mut Self {
        self.text.push_str(fragment);
        self
    }

    /// Append a placeholder for `value`.
    fn bind(&mut self, value: impl Into<Value>) -> &mut Self {
        self.values.push(value.into());
        let placeholder = format!("${}", self.values.len());
        self.text.push_str(&placeholder);
        self
    }

    /// `jsonb_populate_record(NULL::"table", $n::jsonb)` over `document`.
    fn populated(&mut self, table: &str, document: JsonValue) -> &mut Self {
        self.push(&format!("jsonb_populate_record(NULL::{}, ", quote(table)))
            .bind(document)
            .push("::jsonb)")
    }

    fn where_filters(&mut self, table: &str, filters: &[Filter]) -> &mut Self {
        for (i, filter) in filters.iter().enumerate() {
            self.push(if i == 0 { " WHERE " } else { " AND " });
            let column = quote(&filter.column);
            if filter.value.is_null() {
                self.push(&format!("{ROW_ALIAS}.{column} IS NULL"));
                continue;
            }
            let mut document = Row::new();
            document.insert(filter.column.clone(), filter.value.clone());
            self.push(&format!("{ROW_ALIAS}.{column} = ("))
                .populated(table, JsonValue::Object(document))
                .push(&format!(").{column}"));
        }
        self
    }

    fn into_statement(self) -> Statement {
        Statement::from_sql_and_values(DbBackend::Postgres, self.text, self.values)
    }
}

fn select_sql(query: &Select, limit: Option<u64>) -> Sql {
    let mut sql = Sql::default();
    sql.push(&format!(
        "SELECT to_jsonb({ROW_ALIAS}) AS {ROW_COLUMN} FROM {} AS {ROW_ALIAS}",
        quote(&query.table)
    ))
    .where_filters(&query.table, &query.filters);
    if let Some(order) = &query.order {
        let direction = if order.ascending { "ASC" } else { "DESC" };
        sql.push(&format!(
            " ORDER BY {ROW_ALIAS}.{} {direction}",
            quote(&order.column)
        ));
    }
    if let Some(limit) = limit {
        sql.push(&format!(" LIMIT {limit}"));
    }
    sql
}

fn count_sql(query: &Select) -> Sql {
    let mut sql = Sql::default();
    sql.push(&format!(
        "SELECT COUNT(*) AS count FROM {} AS {ROW_ALIAS}",
        quote(&query.table)
    ))
    .where_filters(&query.table, &query.filters);
    sql
}

/// `INSERT INTO "table" AS t (cols) SELECT r.cols FROM jsonb_populate_record(..) AS r`.
///
/// Only the payload's keys are listed, so omitted columns keep their defaults.
fn insert_sql(table: &str, row: Row) -> Sql {
    let columns: Vec<String> = row.keys().map(|k| quote(k)).collect();
    let picked: Vec<String> = columns.iter().map(|c| format!("r.{c}")).collect();
    let mut sql = Sql::default();
    sql.push(&format!(
        "INSERT INTO {} AS {ROW_ALIAS} ({}) SELECT {} FROM ",
        quote(table),
        columns.join(", "),
        picked.join(", ")
    ))
    .populated(table, JsonValue::Object(row))
    .push(&format!(" AS r RETURNING to_jsonb({ROW_ALIAS}) AS {ROW_COLUMN}"));
    sql
}

fn update_sql(table: &str, id: Uuid, patch: Row) -> Sql {
    let assignments: Vec<String> = patch
        .keys()
        .map(|k| {
            let column = quote(k);
            format!("{column} = r.{column}")
        })
        .collect();
    let mut sql = Sql::default();
    sql.push(&format!(
        "UPDATE {} AS {ROW_ALIAS} SET {} FROM ",
        quote(table),
        assignments.join(", ")
    ))
    .populated(table, JsonValue::Object(patch))
    .push(&format!(" AS r WHERE {ROW_ALIAS}.{} = ", quote(ID_COLUMN)))
    .bind(id)
    .push(&format!(" RETURNING to_jsonb({ROW_ALIAS}) AS {ROW_COLUMN}"));
    sql
}

fn delete_sql(table: &str, id: Uuid) -> Sql {
    let mut sql = Sql::default();
    sql.push(&format!(
        "DELETE FROM {} AS {ROW_ALIAS} WHERE {ROW_ALIAS}.{} = ",
        quote(table),
        quote(ID_COLUMN)
    ))
    .bind(id);
    sql
}

// ── RowStore ─────────────────────────────────────────────────────────────────

impl RowStore for SeaRowStore {
    async fn select(&self, query: &Select) -> Result<Vec<Row>, StoreError> {
        tracing::debug!(table = %query.table, filters = query.filters.len(), "select");
        self.fetch_rows(select_sql(query, None), "select rows").await
    }

    async fn count(&self, query: &Select) -> Result<u64, StoreError> {
        let result = self
            .db
            .query_one(count_sql(query).into_statement())
            .await
            .context("count rows")?
            .ok_or_else(|| anyhow!("count query returned no row"))?;
        let count: i64 = result.try_get("", "count").context("decode count")?;
        Ok(count.max(0) as u64)
    }

    async fn find_by_id(&self, table: &str, id: Uuid) -> Result<Option<Row>, StoreError> {
        let query = Select::table(table).eq(ID_COLUMN, id.to_string());
        let rows = self
            .fetch_rows(select_sql(&query, Some(1)), "find row by id")
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn insert(&self, table: &str, row: Row) -> Result<Row, StoreError> {
        if row.is_empty() {
            return Err(StoreError::InvalidPayload("empty row".into()));
        }
        self.fetch_rows(insert_sql(table, row), "insert row")
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("insert into {table} returned no row").into())
    }

    async fn update(&self, table: &str, id: Uuid, patch: Row) -> Result<Option<Row>, StoreError> {
        if patch.is_empty() {
            return self.find_by_id(table, id).await;
        }
        let rows = self
            .fetch_rows(update_sql(table, id, patch), "update row")
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn delete(&self, table: &str, id: Uuid) -> Result<bool, StoreError> {
        let result = self
            .db
            .execute(delete_sql(table, id).into_statement())
            .await
            .context("delete row")?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.db.ping().await.context("ping database")?;
        Ok(())
    }
}

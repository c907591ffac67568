//! In-memory [`RowStore`] for handler and use case tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::anyhow;
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use uuid::Uuid;

use crm_store::{Row, RowStore, Select, StoreError};

/// Rows keyed by table name. Cloning shares the same tables, so a test can
/// keep a handle and inspect what a handler wrote.
#[derive(Clone, Default)]
pub struct MemoryRowStore {
    tables: Arc<Mutex<HashMap<String, Vec<Row>>>>,
    failing: Arc<Mutex<HashSet<String>>>,
}

impl MemoryRowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row as-is, assigning an `id` when it has none. Returns the id.
    pub fn seed(&self, table: &str, row: Value) -> Uuid {
        let Value::Object(mut row) = row else {
            panic!("seed row for {table} must be a JSON object");
        };
        let id = match row.get("id").and_then(Value::as_str) {
            Some(id) => id.parse().expect("seed id must be a UUID"),
            None => {
                let id = Uuid::new_v4();
                row.insert("id".into(), Value::String(id.to_string()));
                id
            }
        };
        self.tables().entry(table.to_owned()).or_default().push(row);
        id
    }

    /// Snapshot of every row in `table`, in insertion order.
    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.tables().get(table).cloned().unwrap_or_default()
    }

    pub fn get(&self, table: &str, id: Uuid) -> Option<Row> {
        let id = id.to_string();
        self.tables()
            .get(table)
            .and_then(|rows| rows.iter().find(|r| has_id(r, &id)).cloned())
    }

    /// Make every subsequent call touching `table` fail with a backend error.
    pub fn fail_table(&self, table: &str) {
        self.failing
            .lock()
            .expect("failing set poisoned")
            .insert(table.to_owned());
    }

    fn tables(&self) -> MutexGuard<'_, HashMap<String, Vec<Row>>> {
        self.tables.lock().expect("tables poisoned")
    }

    fn check(&self, table: &str) -> Result<(), StoreError> {
        if self
            .failing
            .lock()
            .expect("failing set poisoned")
            .contains(table)
        {
            return Err(StoreError::Backend(anyhow!("injected failure on {table}")));
        }
        Ok(())
    }
}

fn has_id(row: &Row, id: &str) -> bool {
    row.get("id").and_then(Value::as_str) == Some(id)
}

impl RowStore for MemoryRowStore {
    async fn select(&self, query: &Select) -> Result<Vec<Row>, StoreError> {
        self.check(&query.table)?;
        let mut rows: Vec<Row> = self
            .rows(&query.table)
            .into_iter()
            .filter(|r| query.matches(r))
            .collect();
        query.sort(&mut rows);
        Ok(rows)
    }

    async fn count(&self, query: &Select) -> Result<u64, StoreError> {
        self.check(&query.table)?;
        let count = self
            .rows(&query.table)
            .iter()
            .filter(|r| query.matches(r))
            .count();
        Ok(count as u64)
    }

    async fn find_by_id(&self, table: &str, id: Uuid) -> Result<Option<Row>, StoreError> {
        self.check(table)?;
        Ok(self.get(table, id))
    }

    async fn insert(&self, table: &str, mut row: Row) -> Result<Row, StoreError> {
        self.check(table)?;
        if row.is_empty() {
            return Err(StoreError::InvalidPayload("empty row".into()));
        }
        row.entry("id")
            .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
        row.entry("created_at").or_insert_with(|| {
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
        });
        self.tables()
            .entry(table.to_owned())
            .or_default()
            .push(row.clone());
        Ok(row)
    }

    async fn update(&self, table: &str, id: Uuid, patch: Row) -> Result<Option<Row>, StoreError> {
        self.check(table)?;
        let id = id.to_string();
        let mut tables = self.tables();
        let Some(row) = tables
            .get_mut(table)
            .and_then(|rows| rows.iter_mut().find(|r| has_id(r, &id)))
        else {
            return Ok(None);
        };
        row.extend(patch);
        Ok(Some(row.clone()))
    }

    async fn delete(&self, table: &str, id: Uuid) -> Result<bool, StoreError> {
        self.check(table)?;
        let id = id.to_string();
        let mut tables = self.tables();
        let Some(rows) = tables.get_mut(table) else {
            return Ok(false);
        };
        let before = rows.len();
        rows.retain(|r| !has_id(r, &id));
        Ok(rows.len() < before)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

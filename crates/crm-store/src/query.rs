use std::cmp::Ordering as CmpOrdering;
use std::future::Future;

use serde_json::Value;
use uuid::Uuid;

use crate::error::StoreError;

/// One table row as column → JSON value.
pub type Row = serde_json::Map<String, Value>;

/// Column every business table uses as its primary key.
pub const ID_COLUMN: &str = "id";

/// Equality predicate `column = value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ordering {
    pub column: String,
    pub ascending: bool,
}

/// A `SELECT * FROM table WHERE a = x AND b = y ORDER BY c` description.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub table: String,
    pub filters: Vec<Filter>,
    pub order: Option<Ordering>,
}

impl Select {
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filters: Vec::new(),
            order: None,
        }
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    pub fn order(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order = Some(Ordering {
            column: column.into(),
            ascending,
        });
        self
    }

    /// Whether `row` satisfies every filter. A missing column never matches.
    pub fn matches(&self, row: &Row) -> bool {
        self.filters
            .iter()
            .all(|f| row.get(&f.column).is_some_and(|v| v == &f.value))
    }

    /// Sort `rows` by this query's ordering, if any.
    pub fn sort(&self, rows: &mut [Row]) {
        let Some(order) = &self.order else {
            return;
        };
        rows.sort_by(|a, b| {
            let cmp = compare_values(a.get(&order.column), b.get(&order.column));
            if order.ascending { cmp } else { cmp.reverse() }
        });
    }
}

/// Total order over JSON scalars: missing/null < bool < number < string.
/// RFC 3339 timestamps compare correctly as strings.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> CmpOrdering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(Value::Array(_)) | Some(Value::Object(_)) => 4,
        }
    }
    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(CmpOrdering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// Data access over opaque rows.
///
/// Each call issues exactly one statement; there are no transactions.
pub trait RowStore: Clone + Send + Sync + 'static {
    fn select(&self, query: &Select) -> impl Future<Output = Result<Vec<Row>, StoreError>> + Send;

    fn count(&self, query: &Select) -> impl Future<Output = Result<u64, StoreError>> + Send;

    fn find_by_id(
        &self,
        table: &str,
        id: Uuid,
    ) -> impl Future<Output = Result<Option<Row>, StoreError>> + Send;

    /// Insert one row and return it as stored.
    fn insert(&self, table: &str, row: Row)
    -> impl Future<Output = Result<Row, StoreError>> + Send;

    /// Update the row with `id`; `None` when no such row exists.
    fn update(
        &self,
        table: &str,
        id: Uuid,
        patch: Row,
    ) -> impl Future<Output = Result<Option<Row>, StoreError>> + Send;

    /// Remove the row with `id`. Returns whether a row was removed.
    fn delete(&self, table: &str, id: Uuid)
    -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Round-trip to the backend, for readiness checks.
    fn ping(&self) -> impl Future<Output = Result<(), StoreError>> + Send;
}

//! In-process table store.
//!
//! Rows are kept as JSON objects, so the same row types and repositories
//! work against it as against the REST endpoint. Used for dry runs and
//! tests.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::{ContentError, Query, TableStore};

#[derive(Debug, Default)]
struct Table {
    next_id: i64,
    rows: Vec<Map<String, Value>>,
}

/// Tables held in memory. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryTables {
    inner: Arc<Mutex<BTreeMap<String, Table>>>,
}

impl MemoryTables {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows in `table`.
    #[must_use]
    pub fn row_count(&self, table: &str) -> usize {
        self.lock()
            .map_or(0, |tables| tables.get(table).map_or(0, |t| t.rows.len()))
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, Table>>, ContentError> {
        self.inner
            .lock()
            .map_err(|_| ContentError::Unavailable("memory tables lock poisoned".to_string()))
    }
}

fn to_object<I: Serialize>(value: &I) -> Result<Map<String, Value>, ContentError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(ContentError::Parse(format!("expected an object row, got {other}"))),
    }
}

fn from_rows<T: DeserializeOwned>(rows: Vec<Map<String, Value>>) -> Result<Vec<T>, ContentError> {
    rows.into_iter()
        .map(|row| serde_json::from_value(Value::Object(row)).map_err(ContentError::from))
        .collect()
}

/// Text form used for equality filters, matching how the REST filter is
/// written (`eq.true`, `eq.42`, `eq.es`).
fn filter_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        // Nulls sort last
        (None | Some(Value::Null), _) => Ordering::Greater,
        (_, None | Some(Value::Null)) => Ordering::Less,
        (Some(a), Some(b)) => a.to_string().cmp(&b.to_string()),
    }
}

fn row_id(row: &Map<String, Value>) -> Option<i64> {
    row.get("id").and_then(Value::as_i64)
}

impl TableStore for MemoryTables {
    async fn select<T: DeserializeOwned + Send>(
        &self,
        table: &str,
        query: &Query,
    ) -> Result<Vec<T>, ContentError> {
        let mut rows: Vec<Map<String, Value>> = {
            let tables = self.lock()?;
            tables
                .get(table)
                .map(|t| {
                    t.rows
                        .iter()
                        .filter(|row| {
                            query.filters().iter().all(|(column, expected)| {
                                row.get(column).is_some_and(|v| filter_text(v) == *expected)
                            })
                        })
                        .cloned()
                        .collect()
                })
                .unwrap_or_default()
        };

        if let Some((column, ascending)) = query.order() {
            rows.sort_by(|a, b| {
                let ordering = compare(a.get(column), b.get(column));
                if ascending { ordering } else { ordering.reverse() }
            });
        }
        if let Some(limit) = query.row_limit() {
            rows.truncate(limit);
        }

        from_rows(rows)
    }

    async fn insert<I: Serialize + Sync, T: DeserializeOwned + Send>(
        &self,
        table: &str,
        rows: &[I],
    ) -> Result<Vec<T>, ContentError> {
        let objects = rows.iter().map(to_object).collect::<Result<Vec<_>, _>>()?;

        let inserted = {
            let mut tables = self.lock()?;
            let table = tables.entry(table.to_string()).or_default();
            let mut inserted = Vec::with_capacity(objects.len());
            for mut object in objects {
                table.next_id += 1;
                object.insert("id".to_string(), Value::from(table.next_id));
                table.rows.push(object.clone());
                inserted.push(object);
            }
            inserted
        };

        from_rows(inserted)
    }

    async fn update<I: Serialize + Sync, T: DeserializeOwned + Send>(
        &self,
        table: &str,
        id: i64,
        patch: &I,
    ) -> Result<Vec<T>, ContentError> {
        let mut patch = to_object(patch)?;
        patch.remove("id");

        let updated = {
            let mut tables = self.lock()?;
            tables
                .get_mut(table)
                .and_then(|t| t.rows.iter_mut().find(|row| row_id(row) == Some(id)))
                .map(|row| {
                    row.extend(patch);
                    row.clone()
                })
        };

        from_rows(updated.into_iter().collect())
    }

    async fn delete(&self, table: &str, id: i64) -> Result<usize, ContentError> {
        let mut tables = self.lock()?;
        let Some(table) = tables.get_mut(table) else {
            return Ok(0);
        };
        let before = table.rows.len();
        table.rows.retain(|row| row_id(row) != Some(id));
        Ok(before - table.rows.len())
    }
}

//! Table services that live in memory, for tests that must not touch the network.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    Error,
    ledger::{Filter, Operator, Row, TableQuery, TableService},
};

/// A table held in a vector that understands the same filters as PostgREST.
///
/// Column values are compared as text, which orders ISO dates correctly.
#[derive(Debug, Default)]
pub struct InMemoryTable {
    rows: Mutex<Vec<Row>>,
}

impl InMemoryTable {
    /// Store `row` without any checks, e.g. to simulate rows written by another client.
    pub fn push_raw(&self, row: Row) {
        self.rows.lock().unwrap().push(row);
    }
}

fn column_text(row: &Row, column: &str) -> Option<String> {
    match row.get(column)? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn matches(row: &Row, filter: &Filter) -> bool {
    let Some(text) = column_text(row, &filter.column) else {
        return false;
    };

    match filter.operator {
        Operator::Eq => text == filter.value,
        Operator::Gte => text >= filter.value,
        Operator::Lte => text <= filter.value,
    }
}

#[async_trait]
impl TableService for InMemoryTable {
    async fn insert(&self, rows: Row) -> Result<Vec<Row>, Error> {
        let new_rows = match rows {
            Value::Array(rows) => rows,
            row => vec![row],
        };

        let mut table = self.rows.lock().unwrap();

        for row in &new_rows {
            let id = column_text(row, "id");
            if id.is_none() {
                return Err(Error::Persistence("null value in column \"id\"".to_owned()));
            }
            if table.iter().any(|existing| column_text(existing, "id") == id) {
                return Err(Error::Persistence(
                    "duplicate key value violates unique constraint".to_owned(),
                ));
            }
        }

        table.extend(new_rows.iter().cloned());

        Ok(new_rows)
    }

    async fn select(&self, query: &TableQuery) -> Result<Vec<Row>, Error> {
        let table = self.rows.lock().unwrap();

        let mut rows: Vec<Row> = table
            .iter()
            .filter(|row| query.filters.iter().all(|filter| matches(row, filter)))
            .cloned()
            .collect();

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let ordering = column_text(a, &order.column).cmp(&column_text(b, &order.column));
                if order.descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }

        Ok(rows)
    }

    async fn update(&self, filter: &Filter, patch: Row) -> Result<(), Error> {
        let Value::Object(patch) = patch else {
            return Err(Error::Persistence("patch must be a JSON object".to_owned()));
        };

        let mut table = self.rows.lock().unwrap();

        for row in table.iter_mut().filter(|row| matches(row, filter)) {
            if let Value::Object(columns) = row {
                for (column, value) in &patch {
                    columns.insert(column.clone(), value.clone());
                }
            }
        }

        Ok(())
    }

    async fn delete(&self, filter: &Filter) -> Result<(), Error> {
        self.rows
            .lock()
            .unwrap()
            .retain(|row| !matches(row, filter));

        Ok(())
    }
}

/// A table service whose every request fails, as if the network were down.
#[derive(Debug)]
pub struct FailingTable;

impl FailingTable {
    fn error() -> Error {
        Error::Persistence("connection refused".to_owned())
    }
}

#[async_trait]
impl TableService for FailingTable {
    async fn insert(&self, _rows: Row) -> Result<Vec<Row>, Error> {
        Err(Self::error())
    }

    async fn select(&self, _query: &TableQuery) -> Result<Vec<Row>, Error> {
        Err(Self::error())
    }

    async fn update(&self, _filter: &Filter, _patch: Row) -> Result<(), Error> {
        Err(Self::error())
    }

    async fn delete(&self, _filter: &Filter) -> Result<(), Error> {
        Err(Self::error())
    }
}

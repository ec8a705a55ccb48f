//! The interface to the remote table that stores transactions.

use std::fmt::Debug;

use async_trait::async_trait;

use crate::Error;

/// A row as returned by the table service.
pub type Row = serde_json::Value;

/// A comparison used to filter rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// The column equals the value.
    Eq,
    /// The column is greater than or equal to the value.
    Gte,
    /// The column is less than or equal to the value.
    Lte,
}

impl Operator {
    fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Gte => "gte",
            Operator::Lte => "lte",
        }
    }
}

/// Restricts a request to the rows where `column` compares to `value` with `operator`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    /// The column to compare.
    pub column: String,
    /// How the column is compared to `value`.
    pub operator: Operator,
    /// The value as PostgREST expects it in the query string.
    pub value: String,
}

impl Filter {
    /// Rows where `column` equals `value`.
    pub fn eq(column: &str, value: impl ToString) -> Self {
        Self::new(column, Operator::Eq, value)
    }

    /// Rows where `column` is at least `value`.
    pub fn gte(column: &str, value: impl ToString) -> Self {
        Self::new(column, Operator::Gte, value)
    }

    /// Rows where `column` is at most `value`.
    pub fn lte(column: &str, value: impl ToString) -> Self {
        Self::new(column, Operator::Lte, value)
    }

    fn new(column: &str, operator: Operator, value: impl ToString) -> Self {
        Self {
            column: column.to_owned(),
            operator,
            value: value.to_string(),
        }
    }

    /// The filter as a query parameter, e.g. `("type", "eq.Salary")`.
    pub fn to_query_pair(&self) -> (String, String) {
        (
            self.column.clone(),
            format!("{}.{}", self.operator.as_str(), self.value),
        )
    }
}

/// The sort order of a select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// The column to sort by.
    pub column: String,
    /// Largest values first.
    pub descending: bool,
}

/// A select over the table: every filter must match, rows come back in `order`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableQuery {
    /// The filters, combined with AND.
    pub filters: Vec<Filter>,
    /// The sort order, if any.
    pub order: Option<Order>,
}

impl TableQuery {
    /// A query for every row in the table's natural order.
    pub fn all() -> Self {
        Self::default()
    }

    /// Add `filter` to the query.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Sort the rows by `column`, largest first.
    pub fn order_by_descending(mut self, column: &str) -> Self {
        self.order = Some(Order {
            column: column.to_owned(),
            descending: true,
        });
        self
    }

    /// Render the query as PostgREST query parameters.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_owned(), "*".to_owned())];
        pairs.extend(self.filters.iter().map(Filter::to_query_pair));

        if let Some(order) = &self.order {
            let direction = if order.descending { "desc" } else { "asc" };
            pairs.push(("order".to_owned(), format!("{}.{direction}", order.column)));
        }

        pairs
    }
}

/// A remote table that rows can be inserted into, selected, updated and deleted from.
///
/// Each method makes exactly one request and does not retry.
#[async_trait]
pub trait TableService: Debug + Send + Sync {
    /// Insert `rows` (a JSON object or array of objects) and return the rows as stored.
    async fn insert(&self, rows: Row) -> Result<Vec<Row>, Error>;

    /// Return the rows matching `query`.
    async fn select(&self, query: &TableQuery) -> Result<Vec<Row>, Error>;

    /// Merge `patch` into every row matching `filter`. Matching zero rows is not an error.
    async fn update(&self, filter: &Filter, patch: Row) -> Result<(), Error>;

    /// Delete every row matching `filter`. Matching zero rows is not an error.
    async fn delete(&self, filter: &Filter) -> Result<(), Error>;
}

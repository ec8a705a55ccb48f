//! The ledger store: the only code that reads or writes the transactions table.

use std::sync::Arc;

use time::Date;

use crate::{
    Error, TableConfig,
    ledger::{
        Filter, LedgerStats, NewTransaction, PostgrestTable, Row, TableQuery, TableService,
        Transaction, TransactionId, TransactionPatch,
    },
};

/// The name of the table that holds the transactions.
pub const TRANSACTIONS_TABLE: &str = "transactions";

const DATE_COLUMN: &str = "date";
const ID_COLUMN: &str = "id";
const TYPE_COLUMN: &str = "type";

/// Reads and writes transactions in the remote transactions table.
///
/// Every method makes exactly one request to the table service and does not
/// cache results. Failures are logged with the operation and the key
/// involved and then returned to the caller unchanged.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    table: Arc<dyn TableService>,
}

impl LedgerStore {
    /// Create a store that uses `table` as the transactions table.
    pub fn new(table: Arc<dyn TableService>) -> Self {
        Self { table }
    }

    /// Create a store for the transactions table of the project described by `config`.
    pub fn connect(config: &TableConfig) -> Self {
        Self::new(Arc::new(PostgrestTable::new(config, TRANSACTIONS_TABLE)))
    }

    /// Insert `record` under a new random ID and return the rows as stored.
    ///
    /// # Errors
    /// Returns [Error::Persistence] if the table service fails or rejects the row.
    pub async fn add(&self, record: NewTransaction) -> Result<Vec<Transaction>, Error> {
        let transaction = record.with_id(TransactionId::new_random());
        let id = transaction.id.clone();
        tracing::debug!("adding transaction {id}");

        let row = serde_json::to_value(&transaction)
            .map_err(|error| Error::Persistence(format!("could not serialize transaction: {error}")))
            .inspect_err(|error| tracing::error!("could not add transaction {id}: {error}"))?;

        let rows = self
            .table
            .insert(row)
            .await
            .and_then(parse_rows)
            .inspect_err(|error| tracing::error!("could not add transaction {id}: {error}"))?;

        tracing::info!("added transaction {id}");

        Ok(rows)
    }

    /// Get every transaction, most recent first.
    ///
    /// # Errors
    /// Returns [Error::Persistence] if the table service fails.
    pub async fn list_all(&self) -> Result<Vec<Transaction>, Error> {
        tracing::debug!("listing all transactions");

        let transactions = self
            .select(TableQuery::all().order_by_descending(DATE_COLUMN))
            .await
            .inspect_err(|error| tracing::error!("could not list transactions: {error}"))?;

        tracing::info!("listed {} transactions", transactions.len());

        Ok(transactions)
    }

    /// Get the transactions whose type is `transaction_type`, most recent first.
    ///
    /// `transaction_type` is matched as is, so an unknown type simply matches no rows.
    ///
    /// # Errors
    /// Returns [Error::Persistence] if the table service fails.
    pub async fn list_by_type(&self, transaction_type: &str) -> Result<Vec<Transaction>, Error> {
        tracing::debug!("listing transactions of type {transaction_type}");

        let transactions = self
            .select(
                TableQuery::all()
                    .filter(Filter::eq(TYPE_COLUMN, transaction_type))
                    .order_by_descending(DATE_COLUMN),
            )
            .await
            .inspect_err(|error| {
                tracing::error!("could not list transactions of type {transaction_type}: {error}")
            })?;

        tracing::info!(
            "listed {} transactions of type {transaction_type}",
            transactions.len()
        );

        Ok(transactions)
    }

    /// Get the transactions dated from `start` to `end` inclusive, most recent first.
    ///
    /// # Errors
    /// Returns [Error::Persistence] if the table service fails.
    pub async fn list_by_date_range(
        &self,
        start: Date,
        end: Date,
    ) -> Result<Vec<Transaction>, Error> {
        tracing::debug!("listing transactions from {start} to {end}");

        let transactions = self
            .select(
                TableQuery::all()
                    .filter(Filter::gte(DATE_COLUMN, start))
                    .filter(Filter::lte(DATE_COLUMN, end))
                    .order_by_descending(DATE_COLUMN),
            )
            .await
            .inspect_err(|error| {
                tracing::error!("could not list transactions from {start} to {end}: {error}")
            })?;

        tracing::info!(
            "listed {} transactions from {start} to {end}",
            transactions.len()
        );

        Ok(transactions)
    }

    /// Get the transaction with `id`, or `None` if there is no such transaction.
    ///
    /// # Errors
    /// Returns [Error::Persistence] if the table service fails.
    pub async fn get(&self, id: &TransactionId) -> Result<Option<Transaction>, Error> {
        tracing::debug!("getting transaction {id}");

        let transaction = self
            .select(TableQuery::all().filter(Filter::eq(ID_COLUMN, id)))
            .await
            .inspect_err(|error| tracing::error!("could not get transaction {id}: {error}"))?
            .into_iter()
            .next();

        Ok(transaction)
    }

    /// Apply `patch` to the transaction with `id`.
    ///
    /// Updating an ID that does not exist changes nothing and is not an error.
    /// An empty patch does not make a request.
    ///
    /// # Errors
    /// Returns [Error::Persistence] if the table service fails or rejects the patch.
    pub async fn update(&self, id: &TransactionId, patch: TransactionPatch) -> Result<(), Error> {
        if patch.is_empty() {
            tracing::debug!("skipping empty update of transaction {id}");
            return Ok(());
        }

        tracing::debug!("updating transaction {id} with {patch:?}");

        let patch = serde_json::to_value(&patch)
            .map_err(|error| Error::Persistence(format!("could not serialize patch: {error}")))
            .inspect_err(|error| tracing::error!("could not update transaction {id}: {error}"))?;

        self.table
            .update(&Filter::eq(ID_COLUMN, id), patch)
            .await
            .inspect_err(|error| tracing::error!("could not update transaction {id}: {error}"))?;

        tracing::info!("updated transaction {id}");

        Ok(())
    }

    /// Delete the transaction with `id`.
    ///
    /// Deleting an ID that does not exist changes nothing and is not an error.
    ///
    /// # Errors
    /// Returns [Error::Persistence] if the table service fails.
    pub async fn delete(&self, id: &TransactionId) -> Result<(), Error> {
        tracing::debug!("deleting transaction {id}");

        self.table
            .delete(&Filter::eq(ID_COLUMN, id))
            .await
            .inspect_err(|error| tracing::error!("could not delete transaction {id}: {error}"))?;

        tracing::info!("deleted transaction {id}");

        Ok(())
    }

    /// Compute totals over the current contents of the table.
    ///
    /// # Errors
    /// Returns [Error::Persistence] if the table service fails.
    pub async fn stats(&self) -> Result<LedgerStats, Error> {
        tracing::debug!("computing ledger statistics");

        let transactions = self
            .select(TableQuery::all())
            .await
            .inspect_err(|error| tracing::error!("could not compute ledger statistics: {error}"))?;

        let stats = LedgerStats::from_transactions(&transactions);
        tracing::info!("computed statistics over {} transactions", stats.total_count);

        Ok(stats)
    }

    async fn select(&self, query: TableQuery) -> Result<Vec<Transaction>, Error> {
        self.table.select(&query).await.and_then(parse_rows)
    }
}

fn parse_rows(rows: Vec<Row>) -> Result<Vec<Transaction>, Error> {
    rows.into_iter()
        .map(|row| {
            serde_json::from_value(row)
                .map_err(|error| Error::Persistence(format!("unexpected row in table: {error}")))
        })
        .collect()
}

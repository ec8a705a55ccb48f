//! Defines the route handler for the page that lists transactions as a table.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use serde::Deserialize;
use time::{Date, macros::date};

use crate::{
    Error, LedgerStore,
    ledger::{LedgerStats, Transaction},
    transaction::view::{TransactionFilters, transactions_view},
};

/// The lower bound used when only the end of a date range is given.
const EARLIEST_DATE: Date = date!(1900 - 01 - 01);
/// The upper bound used when only the start of a date range is given.
const LATEST_DATE: Date = date!(9999 - 12 - 31);

/// The optional filters for the transactions page.
///
/// Empty values, e.g. from the "All types" option, count as absent.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionsQuery {
    /// Only show transactions with this type.
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    /// Only show transactions dated on or after this date.
    pub from: Option<Date>,
    /// Only show transactions dated on or before this date.
    pub to: Option<Date>,
}

/// Render the transactions that match the filters in the query string, most recent first.
pub async fn get_transactions_page(
    State(ledger): State<LedgerStore>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Response, Error> {
    let transactions = load_transactions(&ledger, &query)
        .await
        .inspect_err(|error| tracing::error!("could not load transactions: {error}"))?;
    let stats = LedgerStats::from_transactions(&transactions);

    let filters = TransactionFilters {
        transaction_type: query.transaction_type.as_deref(),
        from: query.from,
        to: query.to,
    };

    Ok(transactions_view(&filters, &transactions, &stats).into_response())
}

async fn load_transactions(
    ledger: &LedgerStore,
    query: &TransactionsQuery,
) -> Result<Vec<Transaction>, Error> {
    match (&query.transaction_type, query.from, query.to) {
        (None, None, None) => ledger.list_all().await,
        (None, from, to) => {
            ledger
                .list_by_date_range(
                    from.unwrap_or(EARLIEST_DATE),
                    to.unwrap_or(LATEST_DATE),
                )
                .await
        }
        (Some(transaction_type), from, to) => {
            let mut transactions = ledger.list_by_type(transaction_type).await?;
            transactions.retain(|transaction| {
                from.is_none_or(|from| transaction.date >= from)
                    && to.is_none_or(|to| transaction.date <= to)
            });

            Ok(transactions)
        }
    }
}

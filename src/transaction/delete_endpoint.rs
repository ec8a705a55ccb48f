//! Defines the endpoint for deleting a transaction.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use maud::html;

use crate::{LedgerStore, alert::Alert, ledger::TransactionId};

/// A route handler for deleting a transaction.
///
/// The table row that triggered the request is removed by htmx, so the
/// response only carries a success alert that is swapped out of band into
/// the alert container. The status code has to be 200 OK or htmx will not
/// remove the row.
pub async fn delete_transaction_endpoint(
    State(ledger): State<LedgerStore>,
    Path(transaction_id): Path<String>,
) -> Response {
    let transaction_id = TransactionId::from(transaction_id.as_str());

    if let Err(error) = ledger.delete(&transaction_id).await {
        tracing::error!("Could not delete transaction {transaction_id}: {error}");
        return error.into_alert_response();
    }

    let alert = Alert::success("Transaction deleted", "").into_html();

    html! {
        div id="alert-container" hx-swap-oob="innerHTML" { (alert) }
    }
    .into_response()
}

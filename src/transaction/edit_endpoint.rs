//! Defines the endpoint for updating a transaction.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;

use crate::{
    Error, LedgerStore, endpoints,
    ledger::{TransactionId, TransactionPatch},
    transaction::form::TransactionForm,
};

/// A route handler for replacing the fields of a transaction, redirects to
/// the transactions page on success.
///
/// The commission and treasury impact are derived again from the submitted
/// type, amount and commission percentage.
pub async fn edit_transaction_endpoint(
    State(ledger): State<LedgerStore>,
    Path(transaction_id): Path<String>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let transaction_id = TransactionId::from(transaction_id.as_str());

    let patch = match form.into_new_transaction() {
        Ok(record) => TransactionPatch::from(record),
        Err(error) => {
            tracing::warn!("Rejected update of transaction {transaction_id}: {error}");
            return error.into_alert_response();
        }
    };

    // The store treats an update of a missing row as a no-op.
    match ledger.get(&transaction_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Error::NotFound.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not get transaction {transaction_id}: {error}");
            return error.into_alert_response();
        }
    }

    if let Err(error) = ledger.update(&transaction_id, patch).await {
        tracing::error!("Could not update transaction {transaction_id}: {error}");
        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

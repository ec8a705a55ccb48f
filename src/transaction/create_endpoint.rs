//! Defines the endpoint for creating a new transaction.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;

use crate::{LedgerStore, endpoints, transaction::form::TransactionForm};

/// A route handler for creating a new transaction, redirects to the dashboard on success.
pub async fn create_transaction_endpoint(
    State(ledger): State<LedgerStore>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let record = match form.into_new_transaction() {
        Ok(record) => record,
        Err(error) => {
            tracing::warn!("Rejected new transaction: {error}");
            return error.into_alert_response();
        }
    };

    if let Err(error) = ledger.add(record).await {
        tracing::error!("could not create transaction: {error}");
        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

//! Defines the route handler for the page for editing a transaction.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error, LedgerStore,
    endpoints::{self, format_endpoint},
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, euro_input_styles, loading_spinner},
    ledger::{Transaction, TransactionId},
    navigation::NavBar,
    transaction::form::{TransactionFormDefaults, transaction_form_fields},
};

fn edit_transaction_view(transaction: &Transaction) -> Markup {
    let nav_bar = NavBar::new(endpoints::EDIT_TRANSACTION_VIEW).into_html();
    let edit_endpoint = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id.as_str());
    let fields = transaction_form_fields(&TransactionFormDefaults::from_transaction(transaction));
    let spinner = loading_spinner();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(edit_endpoint)
                hx-target-error="#alert-container"
                hx-disabled-elt="#submit-button"
                hx-indicator="#indicator"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Edit Transaction" }

                (fields)

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span
                        id="indicator"
                        class="inline htmx-indicator"
                    {
                        (spinner)
                    }
                    " Update transaction"
                }
            }
        }
    };

    base("Edit Transaction", &[euro_input_styles()], &content)
}

/// Renders the page for editing a transaction.
///
/// # Errors
/// Returns [Error::NotFound] if there is no transaction with the ID in the path.
pub async fn get_edit_transaction_page(
    State(ledger): State<LedgerStore>,
    Path(transaction_id): Path<String>,
) -> Result<Response, Error> {
    let transaction_id = TransactionId::from(transaction_id.as_str());

    let transaction = ledger
        .get(&transaction_id)
        .await
        .inspect_err(|error| {
            tracing::error!("Failed to retrieve transaction {transaction_id}: {error}")
        })?
        .ok_or(Error::NotFound)?;

    Ok(edit_transaction_view(&transaction).into_response())
}

//! The HTML for the transactions page.

use maud::{Markup, html};
use rust_decimal::Decimal;
use time::Date;

use crate::{
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        format_currency, link,
    },
    ledger::{LedgerStats, Transaction, TransactionType},
    navigation::NavBar,
};

/// The filters currently applied to the transactions page.
pub struct TransactionFilters<'a> {
    pub transaction_type: Option<&'a str>,
    pub from: Option<Date>,
    pub to: Option<Date>,
}

impl TransactionFilters<'_> {
    fn is_active(&self) -> bool {
        self.transaction_type.is_some() || self.from.is_some() || self.to.is_some()
    }
}

fn amount_class(amount: Decimal) -> &'static str {
    if amount.is_sign_negative() && !amount.is_zero() {
        "text-red-600 dark:text-red-400"
    } else {
        "text-green-600 dark:text-green-400"
    }
}

fn filter_form(filters: &TransactionFilters<'_>) -> Markup {
    html! {
        form
            method="get"
            action=(endpoints::TRANSACTIONS_VIEW)
            class="w-full grid grid-cols-1 md:grid-cols-4 gap-4 items-end mb-6"
        {
            div
            {
                label for="type" class=(FORM_LABEL_STYLE) { "Type" }

                select name="type" id="type" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" selected[filters.transaction_type.is_none()] { "All types" }

                    @for transaction_type in TransactionType::ALL {
                        option
                            value=(transaction_type.as_str())
                            selected[filters.transaction_type == Some(transaction_type.as_str())]
                        {
                            (transaction_type.label())
                        }
                    }
                }
            }

            div
            {
                label for="from" class=(FORM_LABEL_STYLE) { "From" }
                input name="from" id="from" type="date" value=[filters.from] class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="to" class=(FORM_LABEL_STYLE) { "To" }
                input name="to" id="to" type="date" value=[filters.to] class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="flex gap-4 items-center"
            {
                button
                    type="submit"
                    class="px-4 py-2 bg-blue-500 dark:bg-blue-600 hover:bg-blue-600 text-white rounded"
                {
                    "Filter"
                }

                @if filters.is_active() {
                    a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "Clear" }
                }
            }
        }
    }
}

fn transaction_row_view(transaction: &Transaction) -> Markup {
    let edit_url = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id.as_str());
    let delete_url = format_endpoint(endpoints::DELETE_TRANSACTION, transaction.id.as_str());
    let confirm_message = format!(
        "Are you sure you want to delete the {} of {} dated {}? This cannot be undone.",
        transaction.transaction_type.label().to_lowercase(),
        format_currency(transaction.amount),
        transaction.date
    );

    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (transaction.date) }
            td class=(TABLE_CELL_STYLE) { (transaction.transaction_type.label()) }
            td class=(TABLE_CELL_STYLE) { (transaction.client.as_deref().unwrap_or("-")) }
            td class={(TABLE_CELL_STYLE) " text-right whitespace-nowrap"} { (format_currency(transaction.amount)) }
            td class={(TABLE_CELL_STYLE) " text-right whitespace-nowrap"} { (format_currency(transaction.commission_amount)) }
            td class={(TABLE_CELL_STYLE) " text-right whitespace-nowrap " (amount_class(transaction.treasury_impact))}
            {
                (format_currency(transaction.treasury_impact))
            }
            td class=(TABLE_CELL_STYLE) { (transaction.notes.as_deref().unwrap_or_default()) }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    a href=(edit_url) class=(LINK_STYLE) { "Edit" }

                    button
                        hx-delete=(delete_url)
                        hx-confirm=(confirm_message)
                        hx-target="closest tr"
                        hx-target-error="#alert-container"
                        hx-swap="delete"
                        class=(BUTTON_DELETE_STYLE)
                    {
                        "Delete"
                    }
                }
            }
        }
    }
}

/// Renders the transactions page.
///
/// # Arguments
/// * `filters` - The filters used to select `transactions`
/// * `transactions` - The transactions to list, most recent first
/// * `stats` - Totals over `transactions`
pub fn transactions_view(
    filters: &TransactionFilters<'_>,
    transactions: &[Transaction],
    stats: &LedgerStats,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let new_transaction_link = link(endpoints::NEW_TRANSACTION_VIEW, "Add one");

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-xl"
            {
                h2 class="text-xl font-bold mb-4" { "Transactions" }

                (filter_form(filters))

                p id="transactions-summary" class="mb-4 text-sm text-gray-600 dark:text-gray-400"
                {
                    (stats.total_count) " transaction(s), treasury impact "
                    span class=(amount_class(stats.total_treasury_impact))
                    {
                        (format_currency(stats.total_treasury_impact))
                    }
                }

                div class="overflow-x-auto rounded-lg shadow"
                {
                    table
                        id="transactions"
                        class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Client" }
                                th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Amount" }
                                th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Commission" }
                                th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Treasury impact" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Notes" }
                                th scope="col" class=(TABLE_CELL_STYLE) { span class="sr-only" { "Actions" } }
                            }
                        }

                        tbody
                        {
                            @for transaction in transactions {
                                (transaction_row_view(transaction))
                            }
                        }
                    }
                }

                @if transactions.is_empty() {
                    p class="mt-4 text-center"
                    {
                        @if filters.is_active() {
                            "No transactions match these filters."
                        } @else {
                            "No transactions yet. " (new_transaction_link) "."
                        }
                    }
                }
            }
        }
    };

    base("Transactions", &[], &content)
}

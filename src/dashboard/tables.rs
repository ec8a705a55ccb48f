//! The table of the most recent transactions.

use maud::{Markup, html};

use crate::{
    html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency},
    ledger::Transaction,
};

/// How many transactions the dashboard lists.
pub(super) const RECENT_TRANSACTION_COUNT: usize = 10;

/// Renders the first [RECENT_TRANSACTION_COUNT] of `transactions`.
///
/// `transactions` must already be ordered from newest to oldest.
pub(super) fn recent_transactions_table(transactions: &[Transaction]) -> Markup {
    html! {
        div class="w-full" {
            h3 class="text-xl font-semibold mb-4" { "Recent transactions" }

            div class="overflow-x-auto rounded-lg shadow" {
                table
                    id="recent-transactions"
                    class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE) {
                        tr {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Client" }
                            th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Amount" }
                            th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Commission" }
                            th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Treasury impact" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Notes" }
                        }
                    }
                    tbody {
                        @for transaction in transactions.iter().take(RECENT_TRANSACTION_COUNT) {
                            tr class=(TABLE_ROW_STYLE) {
                                td class=(TABLE_CELL_STYLE) { (transaction.date) }
                                td class=(TABLE_CELL_STYLE) { (transaction.transaction_type.label()) }
                                td class=(TABLE_CELL_STYLE) { (transaction.client.as_deref().unwrap_or_default()) }
                                td class={(TABLE_CELL_STYLE) " text-right whitespace-nowrap"} {
                                    (format_currency(transaction.amount))
                                }
                                td class={(TABLE_CELL_STYLE) " text-right whitespace-nowrap"} {
                                    (format_currency(transaction.commission_amount))
                                }
                                td class={(TABLE_CELL_STYLE) " text-right whitespace-nowrap"} {
                                    (format_currency(transaction.treasury_impact))
                                }
                                td class=(TABLE_CELL_STYLE) { (transaction.notes.as_deref().unwrap_or_default()) }
                            }
                        }
                    }
                }
            }
        }
    }
}

//! Cards for the headline totals of the ledger.

use maud::{Markup, html};
use rust_decimal::Decimal;

use crate::{html::format_currency, ledger::LedgerStats};

/// Renders the total invoiced, treasury and commission cards.
///
/// # Arguments
/// * `stats` - Totals over every transaction in the ledger
///
/// # Returns
/// Maud markup containing a grid of three cards.
pub(super) fn metric_cards_view(stats: &LedgerStats) -> Markup {
    html! {
        section id="metrics" class="w-full mx-auto mb-8" {
            div class="grid grid-cols-1 md:grid-cols-3 gap-4" {
                (metric_card("Total invoiced", stats.total_invoiced(), None))
                (metric_card(
                    "Treasury",
                    stats.total_treasury_impact,
                    Some(amount_color_class(stats.total_treasury_impact)),
                ))
                (metric_card("Commissions", stats.total_commission, None))
            }
        }
    }
}

fn metric_card(title: &str, amount: Decimal, amount_class: Option<&str>) -> Markup {
    html! {
        div
            class="bg-white dark:bg-gray-800 border border-gray-200
                   dark:border-gray-700 rounded-lg p-4 shadow-md"
            data-metric=(title)
        {
            h3 class="text-sm font-medium text-gray-600 dark:text-gray-400" { (title) }
            p class={"text-2xl font-bold " (amount_class.unwrap_or_default())} {
                (format_currency(amount))
            }
        }
    }
}

fn amount_color_class(amount: Decimal) -> &'static str {
    if amount.is_sign_negative() && !amount.is_zero() {
        "text-red-600 dark:text-red-400"
    } else {
        "text-green-600 dark:text-green-400"
    }
}

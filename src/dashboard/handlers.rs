//! Dashboard HTTP handler and view rendering.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error, LedgerStore,
    dashboard::{
        aggregation::aggregate_by_month,
        cards::metric_cards_view,
        charts::{
            DashboardChart, ECHARTS_SCRIPT_URL, chart_script, chart_view, monthly_evolution_chart,
        },
        tables::recent_transactions_table,
    },
    endpoints,
    html::{HeadElement, base, link},
    ledger::{LedgerStats, Transaction},
    navigation::NavBar,
};

/// Display a page with an overview of the ledger.
///
/// The totals, chart and table are all computed from a single read of the
/// transactions table so that they agree with each other.
pub async fn get_dashboard_page(State(ledger): State<LedgerStore>) -> Result<Response, Error> {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);

    let transactions = ledger
        .list_all()
        .await
        .inspect_err(|error| tracing::error!("Could not load transactions for dashboard: {error}"))?;

    if transactions.is_empty() {
        return Ok(dashboard_no_data_view(nav_bar).into_response());
    }

    let stats = LedgerStats::from_transactions(&transactions);
    let chart = monthly_evolution_chart(&aggregate_by_month(&transactions));

    Ok(dashboard_view(nav_bar, &stats, &chart, &transactions).into_response())
}

/// Renders the dashboard page when the ledger is empty.
fn dashboard_no_data_view(nav_bar: NavBar) -> Markup {
    let nav_bar = nav_bar.into_html();
    let new_transaction_link = link(endpoints::NEW_TRANSACTION_VIEW, "adding a transaction");

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold"
            {
                "No transactions yet"
            }

            p
            {
                "Your totals and the monthly chart will show up here once the ledger
                has some entries. Start by " (new_transaction_link) "."
            }
        }
    );

    base("Dashboard", &[], &content)
}

/// Renders the main dashboard page.
///
/// # Arguments
/// * `nav_bar` - Navigation bar component
/// * `stats` - Totals over the whole ledger
/// * `chart` - The monthly evolution chart
/// * `transactions` - Every transaction, newest first
fn dashboard_view(
    nav_bar: NavBar<'_>,
    stats: &LedgerStats,
    chart: &DashboardChart,
    transactions: &[Transaction],
) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (metric_cards_view(stats))
            (chart_view(chart))
            (recent_transactions_table(transactions))
        }
    );

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_SCRIPT_URL.to_owned()),
        chart_script(chart),
    ];

    base("Dashboard", &scripts, &content)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{extract::State, http::StatusCode};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use time::{Date, Duration, macros::date};

    use crate::{
        Error, LedgerStore,
        dashboard::tables::RECENT_TRANSACTION_COUNT,
        ledger::{Transaction, TransactionType, memory::FailingTable},
        test_utils::{assert_valid_html, get_test_ledger, parse_html_document, select_text},
    };

    use super::get_dashboard_page;

    async fn add(ledger: &LedgerStore, transaction_type: TransactionType, amount: Decimal, date: Date) {
        let record = Transaction::build(transaction_type, amount, date)
            .client("ACME")
            .finalize()
            .unwrap();

        ledger.add(record).await.unwrap();
    }

    #[tokio::test]
    async fn dashboard_page_loads_successfully() {
        let ledger = get_test_ledger();
        add(&ledger, TransactionType::ClientInvoice, dec!(1000), date!(2025 - 01 - 15)).await;
        add(&ledger, TransactionType::Salary, dec!(500), date!(2025 - 02 - 01)).await;
        let draw = Transaction::build(TransactionType::TreasuryDraw, dec!(200), date!(2025 - 02 - 10))
            .notes("New laptop")
            .finalize()
            .unwrap();
        ledger.add(draw).await.unwrap();

        let response = get_dashboard_page(State(ledger)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(
            select_text(&html, "[data-metric] p"),
            vec!["1 000,00 €", "150,00 €", "150,00 €"]
        );
        assert_eq!(select_text(&html, "#monthly-evolution-chart").len(), 1);
        assert_eq!(
            select_text(&html, "#recent-transactions tbody tr td:first-child"),
            vec!["2025-02-10", "2025-02-01", "2025-01-15"]
        );
        assert_eq!(
            select_text(&html, "#recent-transactions thead th"),
            vec!["Date", "Type", "Client", "Amount", "Commission", "Treasury impact", "Notes"]
        );
        assert_eq!(
            select_text(&html, "#recent-transactions tbody tr td:nth-child(5)"),
            vec!["0,00 €", "0,00 €", "150,00 €"]
        );
        assert_eq!(
            select_text(&html, "#recent-transactions tbody tr td:nth-child(7)"),
            vec!["New laptop", "", ""]
        );
    }

    #[tokio::test]
    async fn recent_transactions_are_limited() {
        let ledger = get_test_ledger();
        let start = date!(2025 - 01 - 01);
        for day in 0..15 {
            add(&ledger, TransactionType::Salary, dec!(10), start + Duration::days(day)).await;
        }

        let response = get_dashboard_page(State(ledger)).await.unwrap();

        let html = parse_html_document(response).await;
        let dates = select_text(&html, "#recent-transactions tbody tr td:first-child");
        assert_eq!(dates.len(), RECENT_TRANSACTION_COUNT);
        assert_eq!(dates[0], "2025-01-15");
    }

    #[tokio::test]
    async fn displays_prompt_text_on_no_data() {
        let response = get_dashboard_page(State(get_test_ledger())).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(select_text(&html, "h2"), vec!["No transactions yet"]);
        assert!(select_text(&html, "table").is_empty());
    }

    #[tokio::test]
    async fn table_failure_is_returned() {
        let ledger = LedgerStore::new(Arc::new(FailingTable));

        let result = get_dashboard_page(State(ledger)).await;

        assert!(matches!(result, Err(Error::Persistence(_))));
    }
}

//! The monthly evolution chart.
//!
//! The chart is generated as an ECharts configuration and rendered as an
//! empty container plus a script that initialises it on page load.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger},
    series::Line,
};
use maud::{Markup, PreEscaped, html};
use rust_decimal::{Decimal, prelude::ToPrimitive};

use crate::{dashboard::aggregation::MonthlyTotals, html::HeadElement};

/// Where the ECharts library is loaded from.
pub(super) const ECHARTS_SCRIPT_URL: &str =
    "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML container for `chart`.
pub(super) fn chart_view(chart: &DashboardChart) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div
                id=(chart.id)
                class="min-h-[380px] rounded dark:bg-gray-100"
            {}
        }
    )
}

/// Generates the JavaScript that initialises `chart` once the page has loaded.
///
/// The chart follows the browser's dark mode setting and resizes with the window.
pub(super) fn chart_script(chart: &DashboardChart) -> HeadElement {
    let script = format!(
        r#"document.addEventListener('DOMContentLoaded', function() {{
            const chart = echarts.init(document.getElementById("{}"));
            chart.setOption({});
            window.addEventListener('resize', chart.resize);

            const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
            const updateTheme = () => {{
                chart.setTheme(darkModeMediaQuery.matches ? 'dark' : 'default');
            }};
            darkModeMediaQuery.addEventListener('change', updateTheme);
            updateTheme();
        }});"#,
        chart.id, chart.options
    );

    HeadElement::ScriptSource(PreEscaped(script))
}

/// Builds the monthly evolution chart: one line for the invoiced amounts and
/// one for the treasury impact, with months on the x axis.
pub(super) fn monthly_evolution_chart(months: &[MonthlyTotals]) -> DashboardChart {
    let labels: Vec<String> = months.iter().map(MonthlyTotals::label).collect();
    let amounts: Vec<f64> = months.iter().map(|month| to_chart_value(month.amount)).collect();
    let treasury: Vec<f64> = months
        .iter()
        .map(|month| to_chart_value(month.treasury_impact))
        .collect();

    let chart = Chart::new()
        .title(Title::new().text("Monthly evolution"))
        .tooltip(currency_tooltip())
        .legend(Legend::new().right("4%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Line::new().name("Amount").data(amounts))
        .series(Line::new().name("Treasury impact").data(treasury));

    DashboardChart {
        id: "monthly-evolution-chart",
        options: chart.to_string(),
    }
}

fn to_chart_value(amount: Decimal) -> f64 {
    amount.round_dp(2).to_f64().unwrap_or_default()
}

fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('fr-FR', {
              style: 'currency',
              currency: 'EUR'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

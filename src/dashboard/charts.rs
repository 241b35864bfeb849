//! Chart generation and rendering for the dashboard.
//!
//! This module creates interactive ECharts visualizations for the summary:
//! - **Category Breakdown**: Pie chart of expenses per category
//! - **Income vs Expenses**: Bar chart comparing the two totals
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with its HTML container and an inline initialization script. The
//! script is inline so that charts are initialized again when htmx swaps in
//! fresh dashboard content.

use charming::{
    Chart,
    component::{Axis, Grid, Legend},
    element::{AxisLabel, AxisType, Color, ItemStyle, JsFunction, Tooltip, Trigger},
    series::{Pie, bar::Bar},
};
use maud::{Markup, PreEscaped, html};

use crate::dashboard::aggregation::{CategoryTotal, Summary};

/// Slice colours for the category breakdown, reused in order when there are
/// more categories than colours.
const PIE_COLORS: [&str; 8] = [
    "#3b82f6", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6", "#ec4899", "#14b8a6", "#f97316",
];

const BAR_COLOR: &str = "#3b82f6";

const CATEGORY_CHART_ID: &str = "category-chart";
const INCOME_EXPENSE_CHART_ID: &str = "income-expense-chart";

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders both chart panels and the script that initializes them.
///
/// The category breakdown is replaced by a "no data" message when there are
/// no expenses to break down.
pub(super) fn charts_view(summary: &Summary) -> Markup {
    let category_chart = category_breakdown_chart(&summary.breakdown).map(|chart| DashboardChart {
        id: CATEGORY_CHART_ID,
        options: chart.to_string(),
    });
    let income_expense_chart = DashboardChart {
        id: INCOME_EXPENSE_CHART_ID,
        options: income_expense_chart(summary.total_income, summary.total_expense).to_string(),
    };

    let charts: Vec<&DashboardChart> = category_chart
        .iter()
        .chain(std::iter::once(&income_expense_chart))
        .collect();

    html!(
        section
            id="charts"
            class="grid grid-cols-1 lg:grid-cols-2 gap-6 mb-6"
        {
            div class="bg-white dark:bg-gray-800 rounded-xl shadow-lg p-6"
            {
                h2 class="text-xl font-bold mb-4" { "Category Breakdown" }

                @if category_chart.is_some() {
                    div id=(CATEGORY_CHART_ID) class="min-h-[300px]" {}
                } @else {
                    p class="text-gray-500 text-center py-12" { "No expense data available" }
                }
            }

            div class="bg-white dark:bg-gray-800 rounded-xl shadow-lg p-6"
            {
                h2 class="text-xl font-bold mb-4" { "Income vs Expenses" }
                div id=(INCOME_EXPENSE_CHART_ID) class="min-h-[300px]" {}
            }
        }

        script { (charts_script(&charts)) }
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
fn charts_script(charts: &[&DashboardChart]) -> PreEscaped<String> {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    if (!chartDom) return;
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    PreEscaped(script_content)
}

/// The expense breakdown as a pie chart, or `None` if there is nothing to show.
pub(super) fn category_breakdown_chart(breakdown: &[CategoryTotal]) -> Option<Chart> {
    if breakdown.is_empty() {
        return None;
    }

    let data: Vec<(f64, &str)> = breakdown
        .iter()
        .map(|category_total| (category_total.total, category_total.name.as_str()))
        .collect();

    let chart = Chart::new()
        .color(PIE_COLORS.iter().map(|color| Color::from(*color)).collect())
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().bottom("0"))
        .series(Pie::new().name("Expenses").radius("60%").data(data));

    Some(chart)
}

pub(super) fn income_expense_chart(total_income: f64, total_expense: f64) -> Chart {
    Chart::new()
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .value_formatter(currency_formatter()),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(vec!["Income", "Expenses"]),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(
            Bar::new()
                .name("Amount")
                .item_style(ItemStyle::new().color(BAR_COLOR))
                .data(vec![total_income, total_expense]),
        )
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-IN', {
              style: 'currency',
              currency: 'INR'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

//! Summary cards for the dashboard totals.

use maud::{Markup, html};

use crate::{dashboard::aggregation::Summary, html::format_currency};

const CARD_STYLE: &str = "bg-white dark:bg-gray-800 rounded-xl shadow-lg p-6";

/// A single card with a title and a large, coloured amount.
fn summary_card(id: &str, title: &str, amount: f64, amount_style: &str) -> Markup {
    html! {
        div id=(id) class=(CARD_STYLE)
        {
            p class="text-gray-600 dark:text-gray-400 text-sm" { (title) }
            p class={"text-3xl font-bold " (amount_style)} { (format_currency(amount)) }
        }
    }
}

/// Renders the income, expense and balance cards.
///
/// The balance is blue when it is zero or positive and red when negative.
pub(super) fn summary_cards_view(summary: &Summary) -> Markup {
    let balance_style = if summary.balance >= 0.0 {
        "text-blue-600 dark:text-blue-400"
    } else {
        "text-red-600 dark:text-red-400"
    };

    html! {
        section class="grid grid-cols-1 md:grid-cols-3 gap-6 mb-6"
        {
            (summary_card(
                "total-income",
                "Total Income",
                summary.total_income,
                "text-green-600 dark:text-green-400",
            ))
            (summary_card(
                "total-expenses",
                "Total Expenses",
                summary.total_expense,
                "text-red-600 dark:text-red-400",
            ))
            (summary_card("balance", "Balance", summary.balance, balance_style))
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::dashboard::{aggregation::Summary, cards::summary_cards_view};

    fn amount_element_class(html: &Html, id: &str) -> String {
        let selector = Selector::parse(&format!("#{id} p:nth-of-type(2)")).unwrap();

        html.select(&selector)
            .next()
            .unwrap_or_else(|| panic!("card {id} missing"))
            .value()
            .attr("class")
            .unwrap_or_default()
            .to_owned()
    }

    #[test]
    fn shows_formatted_totals() {
        let summary = Summary {
            total_income: 900.0,
            total_expense: 250.5,
            balance: 649.5,
            breakdown: vec![],
        };

        let html = Html::parse_fragment(&summary_cards_view(&summary).into_string());

        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("₹900.00"));
        assert!(text.contains("₹250.50"));
        assert!(text.contains("₹649.50"));
        assert!(amount_element_class(&html, "balance").contains("text-blue-600"));
    }

    #[test]
    fn negative_balance_is_red() {
        let summary = Summary {
            total_income: 10.0,
            total_expense: 20.0,
            balance: -10.0,
            breakdown: vec![],
        };

        let html = Html::parse_fragment(&summary_cards_view(&summary).into_string());

        assert!(amount_element_class(&html, "balance").contains("text-red-600"));
    }
}

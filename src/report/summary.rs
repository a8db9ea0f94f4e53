use crate::core::{Rate, RateTable};
use chrono::NaiveDateTime;

/// Latest value shown for one rate.
#[derive(Debug, Clone, PartialEq)]
pub struct LatestRate {
    pub rate: Rate,
    pub value: f64,
    pub as_of: chrono::NaiveDate,
}

impl LatestRate {
    pub fn formatted_value(&self) -> String {
        format!("{:.3}%", self.value)
    }
}

/// Latest non-missing value of every displayed rate present in `table`,
/// policy rates first.
pub fn latest_rates(table: &RateTable) -> Vec<LatestRate> {
    Rate::POLICY
        .iter()
        .chain(Rate::REFERENCE.iter())
        .filter_map(|rate| {
            table.latest(*rate).map(|(as_of, value)| LatestRate {
                rate: *rate,
                value,
                as_of,
            })
        })
        .collect()
}

fn list_item(latest: &LatestRate) -> String {
    let as_of = latest.as_of.format("%Y-%m-%d");
    let note = match latest.rate {
        rate if rate.is_discontinued() => format!(" (discontinued on {as_of})"),
        Rate::Estr => format!(" (as of {as_of})"),
        _ => String::new(),
    };
    format!(
        "<li><strong>{}: {}</strong>{}</li>",
        latest.rate,
        latest.formatted_value(),
        note
    )
}

/// The "Latest Available Rates" block placed above the chart.
pub fn summary_html(table: &RateTable, generated_at: NaiveDateTime) -> String {
    let mut html = String::from(
        "<div style='font-family: Arial, sans-serif; padding: 10px; background-color: #f8f9fa; border-radius: 5px; margin-bottom: 20px;'>\n",
    );
    html.push_str("<h3>Latest Available Rates:</h3>\n<ul>\n");
    for latest in latest_rates(table) {
        html.push_str(&list_item(&latest));
        html.push('\n');
    }
    html.push_str("</ul>\n");
    html.push_str(&format!(
        "<p><em>Last updated: {}</em></p>\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    html.push_str("</div>\n");
    html
}

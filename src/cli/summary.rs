use super::ui;
use crate::core::{FetchOutcome, Rate, RateTable};
use crate::report::latest_rates;
use comfy_table::Cell;

/// A rate shows as failed when it, or one of the series it is derived from,
/// could not be fetched.
fn fetch_failed(rate: Rate, outcome: &FetchOutcome) -> bool {
    match rate {
        Rate::Mro => {
            outcome.failed(Rate::Mro)
                || outcome.failed(Rate::MroFixed)
                || outcome.failed(Rate::MroVariable)
        }
        _ => outcome.failed(rate),
    }
}

/// Terminal table with the latest value of every displayed rate.
pub fn display_latest_rates(table: &RateTable, outcome: &FetchOutcome) -> String {
    let latest = latest_rates(table);

    let mut output_table = ui::new_styled_table();
    output_table.set_header(vec![
        ui::header_cell("Rate"),
        ui::header_cell("Latest"),
        ui::header_cell("As of"),
    ]);

    for rate in Rate::POLICY.iter().chain(Rate::REFERENCE.iter()) {
        let row = match latest.iter().find(|l| l.rate == *rate) {
            Some(l) => {
                let as_of = if rate.is_discontinued() {
                    format!("{} (discontinued)", l.as_of.format("%Y-%m-%d"))
                } else {
                    l.as_of.format("%Y-%m-%d").to_string()
                };
                vec![
                    Cell::new(rate.name()),
                    ui::rate_cell(&l.formatted_value()),
                    Cell::new(as_of),
                ]
            }
            None => {
                let has_error = fetch_failed(*rate, outcome);
                vec![
                    Cell::new(rate.name()),
                    ui::na_cell(has_error),
                    ui::na_cell(has_error),
                ]
            }
        };
        output_table.add_row(row);
    }

    let mut output = format!(
        "{}\n\n",
        ui::style_text("ECB Key Interest Rates", ui::StyleType::Title)
    );
    output.push_str(&output_table.to_string());

    for (rate, error) in &outcome.failures {
        output.push_str(&format!(
            "\n{}",
            ui::style_text(&format!("Error fetching {rate}: {error}"), ui::StyleType::Error)
        ));
    }

    output
}

//! Date-aligned table of rate columns.
use super::rate::Rate;
use super::series::RateSeries;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Rate columns outer-joined on a shared, strictly increasing date axis.
///
/// Every column has exactly one slot per date; a slot is `None` when the rate
/// has no observation (or a missing one) for that date.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RateTable {
    dates: Vec<NaiveDate>,
    columns: BTreeMap<Rate, Vec<Option<f64>>>,
}

impl RateTable {
    /// Outer-joins `series` on date and folds the two MRO tender forms into a
    /// single `MRO` column when both are present.
    pub fn merge(series: &BTreeMap<Rate, RateSeries>) -> Self {
        let dates: Vec<NaiveDate> = series
            .values()
            .flat_map(|s| s.observations().iter().map(|o| o.date))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut columns: BTreeMap<Rate, Vec<Option<f64>>> = series
            .iter()
            .map(|(rate, s)| (*rate, align(s, &dates)))
            .collect();

        if columns.contains_key(&Rate::MroFixed) && columns.contains_key(&Rate::MroVariable) {
            let fixed = columns.remove(&Rate::MroFixed).unwrap_or_default();
            let variable = columns.remove(&Rate::MroVariable).unwrap_or_default();
            let mro = fixed
                .iter()
                .zip(variable.iter())
                .map(|(f, v)| mean(&[*f, *v]))
                .collect();
            columns.insert(Rate::Mro, mro);
            debug!("Combined MRO fixed and variable rate series");
        }

        Self { dates, columns }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn rates(&self) -> impl Iterator<Item = Rate> + '_ {
        self.columns.keys().copied()
    }

    pub fn contains(&self, rate: Rate) -> bool {
        self.columns.contains_key(&rate)
    }

    pub fn column(&self, rate: Rate) -> Option<&[Option<f64>]> {
        self.columns.get(&rate).map(Vec::as_slice)
    }

    /// Number of dates in the table.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Latest date on which `rate` has a value, together with that value.
    pub fn latest(&self, rate: Rate) -> Option<(NaiveDate, f64)> {
        let column = self.columns.get(&rate)?;
        self.dates
            .iter()
            .zip(column.iter())
            .rev()
            .find_map(|(date, value)| value.map(|v| (*date, v)))
    }

    /// Splits the table back into one series per column, keeping every date
    /// of the shared axis (gaps become explicit missing observations).
    pub fn to_series(&self) -> BTreeMap<Rate, RateSeries> {
        self.columns
            .iter()
            .map(|(rate, column)| {
                let series = self
                    .dates
                    .iter()
                    .copied()
                    .zip(column.iter().copied())
                    .collect();
                (*rate, series)
            })
            .collect()
    }
}

fn align(series: &RateSeries, dates: &[NaiveDate]) -> Vec<Option<f64>> {
    let mut column = vec![None; dates.len()];
    for obs in series.observations() {
        if let Ok(idx) = dates.binary_search(&obs.date) {
            column[idx] = obs.value;
        }
    }
    column
}

/// Mean of the present values, `None` when all are missing.
fn mean(values: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        None
    } else {
        Some(present.iter().sum::<f64>() / present.len() as f64)
    }
}

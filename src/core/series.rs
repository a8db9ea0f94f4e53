use chrono::NaiveDate;

/// A single dated observation. `value` is `None` when the source published the
/// period without a number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// Observations of one rate, strictly increasing by date.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RateSeries {
    observations: Vec<Observation>,
}

impl RateSeries {
    /// Builds a series from observations in any order. When a date appears more
    /// than once the last observation supplied for it is kept.
    pub fn new(mut observations: Vec<Observation>) -> Self {
        observations.sort_by_key(|o| o.date);

        let mut deduped: Vec<Observation> = Vec::with_capacity(observations.len());
        for obs in observations {
            match deduped.last_mut() {
                Some(last) if last.date == obs.date => *last = obs,
                _ => deduped.push(obs),
            }
        }

        Self {
            observations: deduped,
        }
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn value_on(&self, date: NaiveDate) -> Option<f64> {
        self.observations
            .binary_search_by_key(&date, |o| o.date)
            .ok()
            .and_then(|idx| self.observations[idx].value)
    }

    /// The most recent observation that carries a value.
    pub fn latest(&self) -> Option<(NaiveDate, f64)> {
        self.observations
            .iter()
            .rev()
            .find_map(|o| o.value.map(|v| (o.date, v)))
    }
}

impl FromIterator<(NaiveDate, Option<f64>)> for RateSeries {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, Option<f64>)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(date, value)| Observation { date, value })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_sorts_and_keeps_last_duplicate() {
        let series: RateSeries = vec![
            (date(2024, 1, 3), Some(4.0)),
            (date(2024, 1, 1), Some(3.0)),
            (date(2024, 1, 3), Some(4.5)),
            (date(2024, 1, 2), None),
        ]
        .into_iter()
        .collect();

        assert_eq!(series.len(), 3);
        let dates: Vec<_> = series.observations().iter().map(|o| o.date).collect();
        assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)]);
        assert_eq!(series.value_on(date(2024, 1, 3)), Some(4.5));
        assert_eq!(series.value_on(date(2024, 1, 2)), None);
        assert_eq!(series.value_on(date(2024, 2, 1)), None);
    }

    #[test]
    fn test_latest_skips_missing_values() {
        let series: RateSeries = vec![
            (date(2021, 12, 30), Some(-0.49)),
            (date(2021, 12, 31), None),
        ]
        .into_iter()
        .collect();

        assert_eq!(series.latest(), Some((date(2021, 12, 30), -0.49)));
        assert!(RateSeries::default().latest().is_none());
    }
}

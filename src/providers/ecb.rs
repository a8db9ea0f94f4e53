use crate::core::{Observation, RateSeries, SeriesSource};
use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Url;
use tracing::{debug, instrument, warn};

/// Columns that carry the observation period, in order of preference. When
/// none is present the first column is treated as the date index.
const DATE_COLUMNS: [&str; 3] = ["TIME_PERIOD", "DATE", "TIME"];
const VALUE_COLUMN: &str = "OBS_VALUE";

/// Client for the ECB Data Portal SDMX REST API.
pub struct EcbDataProvider {
    base_url: String,
    client: reqwest::Client,
}

impl EcbDataProvider {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("ecbrates/1.0")
            .build()
            .context("Failed to build HTTP client")?;
        Ok(EcbDataProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// `FM.D.U2.EUR.4F.KR.DFR.LEV` is dataflow `FM` with key `D.U2.EUR.4F.KR.DFR.LEV`.
    fn series_url(&self, series_key: &str, start_period: &str) -> Result<Url> {
        let (flow, key) = series_key
            .split_once('.')
            .filter(|(flow, key)| !flow.is_empty() && !key.is_empty())
            .ok_or_else(|| anyhow!("Invalid series key: {}", series_key))?;
        let url = format!("{}/data/{}/{}", self.base_url, flow, key);
        Url::parse_with_params(&url, &[("startPeriod", start_period), ("format", "csvdata")])
            .with_context(|| format!("Invalid request URL: {url}"))
    }
}

#[async_trait]
impl SeriesSource for EcbDataProvider {
    #[instrument(
        name = "EcbSeriesFetch",
        skip(self),
        fields(series_key = %series_key)
    )]
    async fn fetch_series(&self, series_key: &str, start_period: &str) -> Result<RateSeries> {
        let url = self.series_url(series_key, start_period)?;
        debug!("Requesting series data from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for series: {}", e, series_key))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for series: {}",
                response.status(),
                series_key
            ));
        }

        let body = response
            .text()
            .await
            .context("Failed to get response text")?;

        let series = parse_csv(&body)
            .with_context(|| format!("Failed to parse CSV response for {series_key}"))?;
        debug!(observations = series.len(), "Parsed series");
        Ok(series)
    }
}

/// Parses an SDMX-CSV body into a series.
///
/// Rows that are cut short, or whose period or value cannot be read, are
/// logged and skipped. Empty and `NaN` values are kept as missing observations.
pub fn parse_csv(body: &str) -> Result<RateSeries> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_uppercase())
        .collect();

    let value_idx = headers
        .iter()
        .position(|h| h == VALUE_COLUMN)
        .ok_or_else(|| anyhow!("Response has no {} column", VALUE_COLUMN))?;
    let date_idx = DATE_COLUMNS
        .iter()
        .find_map(|name| headers.iter().position(|h| h == name))
        .unwrap_or(0);
    if date_idx == value_idx {
        bail!("Response has no date column");
    }

    let mut observations = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(line, error = %e, "Skipping unreadable CSV row");
                continue;
            }
        };

        let (Some(raw_date), Some(raw_value)) = (record.get(date_idx), record.get(value_idx))
        else {
            warn!(line, fields = record.len(), "Skipping row with missing columns");
            continue;
        };

        let Some(date) = parse_period(raw_date) else {
            warn!(line, period = %raw_date, "Skipping row with unparseable period");
            continue;
        };

        let value = match parse_value(raw_value) {
            Ok(v) => v,
            Err(e) => {
                warn!(line, value = %raw_value, error = %e, "Skipping row with invalid value");
                continue;
            }
        };

        observations.push(Observation { date, value });
    }

    Ok(RateSeries::new(observations))
}

/// Normalises the period formats the API emits to a calendar date. Monthly and
/// annual periods map to their first day.
fn parse_period(period: &str) -> Option<NaiveDate> {
    let period = period.split('T').next().unwrap_or(period).trim();
    NaiveDate::parse_from_str(period, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{period}-01"), "%Y-%m-%d"))
        .or_else(|_| NaiveDate::parse_from_str(&format!("{period}-01-01"), "%Y-%m-%d"))
        .ok()
}

fn parse_value(value: &str) -> Result<Option<f64>> {
    if value.is_empty() || value.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    let parsed: f64 = value
        .parse()
        .with_context(|| format!("Invalid observation value: {value}"))?;
    Ok(Some(parsed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DFR_CSV: &str = "\
KEY,FREQ,REF_AREA,CURRENCY,PROVIDER_FM,INSTRUMENT_FM,PROVIDER_FM_ID,DATA_TYPE_FM,TIME_PERIOD,OBS_VALUE,OBS_STATUS
FM.D.U2.EUR.4F.KR.DFR.LEV,D,U2,EUR,4F,KR,DFR,LEV,2023-09-19,3.75,A
FM.D.U2.EUR.4F.KR.DFR.LEV,D,U2,EUR,4F,KR,DFR,LEV,2023-09-20,4.00,A
FM.D.U2.EUR.4F.KR.DFR.LEV,D,U2,EUR,4F,KR,DFR,LEV,2023-09-21,4.00,A
";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn create_mock_server(flow: &str, key: &str, body: &str, status: u16) -> MockServer {
        let mock_server = MockServer::start().await;
        let request_path = format!("/data/{flow}/{key}");

        Mock::given(method("GET"))
            .and(path(request_path))
            .and(query_param("startPeriod", "2023-09"))
            .and(query_param("format", "csvdata"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;

        mock_server
    }

    #[tokio::test]
    async fn test_successful_series_fetch() {
        let mock_server =
            create_mock_server("FM", "D.U2.EUR.4F.KR.DFR.LEV", DFR_CSV, 200).await;
        let provider = EcbDataProvider::new(&mock_server.uri()).unwrap();

        let series = provider
            .fetch_series("FM.D.U2.EUR.4F.KR.DFR.LEV", "2023-09")
            .await
            .unwrap();

        assert_eq!(series.len(), 3);
        assert!(
            series
                .observations()
                .windows(2)
                .all(|w| w[0].date < w[1].date)
        );
        assert_eq!(series.value_on(date(2023, 9, 19)), Some(3.75));
        assert_eq!(series.latest(), Some((date(2023, 9, 21), 4.0)));
    }

    #[tokio::test]
    async fn test_series_not_found() {
        let mock_server =
            create_mock_server("FM", "D.U2.EUR.4F.KR.XXX.LEV", "No results found.", 404).await;
        let provider = EcbDataProvider::new(&mock_server.uri()).unwrap();

        let result = provider
            .fetch_series("FM.D.U2.EUR.4F.KR.XXX.LEV", "2023-09")
            .await;

        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 404 Not Found for series: FM.D.U2.EUR.4F.KR.XXX.LEV"
        );
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let mock_server = create_mock_server(
            "EST",
            "B.EU000A2X2A25.WT",
            "<html>maintenance</html>",
            200,
        )
        .await;
        let provider = EcbDataProvider::new(&mock_server.uri()).unwrap();

        let result = provider
            .fetch_series("EST.B.EU000A2X2A25.WT", "2023-09")
            .await;

        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse CSV response for EST.B.EU000A2X2A25.WT")
        );
    }

    #[tokio::test]
    async fn test_invalid_series_key() {
        let provider = EcbDataProvider::new("http://localhost").unwrap();
        let result = provider.fetch_series("DFR", "2023-09").await;
        assert_eq!(result.unwrap_err().to_string(), "Invalid series key: DFR");
    }

    #[test]
    fn test_parse_csv_index_based_dates() {
        let body = "\u{feff}date_index,OBS_VALUE\n2021-12-30,-0.505\n2021-12-31,\n";
        let series = parse_csv(body).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.value_on(date(2021, 12, 30)), Some(-0.505));
        assert_eq!(series.observations()[1].value, None);
        assert_eq!(series.latest(), Some((date(2021, 12, 30), -0.505)));
    }

    #[test]
    fn test_parse_csv_period_formats() {
        let body = "\
TIME_PERIOD,OBS_VALUE
2024-03,4.5
2023,4.0
2024-04-02T00:00:00,4.25
";
        let series = parse_csv(body).unwrap();
        let dates: Vec<_> = series.observations().iter().map(|o| o.date).collect();
        assert_eq!(dates, vec![date(2023, 1, 1), date(2024, 3, 1), date(2024, 4, 2)]);
    }

    #[test]
    fn test_parse_csv_skips_bad_rows() {
        let body = "\
TIME_PERIOD,OBS_VALUE
2024-01-02,3.9
not-a-date,3.8
2024-01-03,n/a
2024-01-04,NaN
";
        let series = parse_csv(body).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.value_on(date(2024, 1, 2)), Some(3.9));
        assert_eq!(series.observations()[1].date, date(2024, 1, 4));
        assert_eq!(series.observations()[1].value, None);
    }

    #[test]
    fn test_parse_csv_skips_short_rows() {
        let body = "TIME_PERIOD,OBS_VALUE\n2024-01-02,3.9\n2024-01-03\n2024-01-04,\n";
        let series = parse_csv(body).unwrap();

        let dates: Vec<_> = series.observations().iter().map(|o| o.date).collect();
        assert_eq!(dates, vec![date(2024, 1, 2), date(2024, 1, 4)]);
        assert_eq!(series.value_on(date(2024, 1, 2)), Some(3.9));
        assert_eq!(series.observations()[1].value, None);
    }

    #[test]
    fn test_parse_csv_requires_value_column() {
        let err = parse_csv("TIME_PERIOD,VALUE\n2024-01-02,3.9\n").unwrap_err();
        assert_eq!(err.to_string(), "Response has no OBS_VALUE column");

        let err = parse_csv("OBS_VALUE\n3.9\n").unwrap_err();
        assert_eq!(err.to_string(), "Response has no date column");
    }
}

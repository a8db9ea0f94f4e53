//! Plotly figure for the rate table.
use crate::core::{Rate, RateClass, RateTable};
use anyhow::{Context, Result};
use serde::Serialize;

pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
const CHART_ID: &str = "ecb-rates-chart";
const GRID_COLOR: &str = "rgba(128,128,128,0.2)";

#[derive(Debug, Serialize)]
struct Trace {
    r#type: &'static str,
    mode: &'static str,
    name: String,
    x: Vec<String>,
    y: Vec<f64>,
    line: Line,
    hovertemplate: String,
}

#[derive(Debug, Serialize)]
struct Line {
    width: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    dash: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct Layout {
    title: Title,
    xaxis: Axis,
    yaxis: Axis,
    hovermode: &'static str,
    plot_bgcolor: &'static str,
    legend: Legend,
    margin: Margin,
}

#[derive(Debug, Serialize)]
struct Title {
    text: &'static str,
}

#[derive(Debug, Serialize)]
struct Axis {
    title: Title,
    showgrid: bool,
    gridwidth: u8,
    gridcolor: &'static str,
}

impl Axis {
    fn new(title: &'static str) -> Self {
        Axis {
            title: Title { text: title },
            showgrid: true,
            gridwidth: 1,
            gridcolor: GRID_COLOR,
        }
    }
}

#[derive(Debug, Serialize)]
struct Legend {
    yanchor: &'static str,
    y: f64,
    xanchor: &'static str,
    x: f64,
}

#[derive(Debug, Serialize)]
struct Margin {
    l: u16,
    r: u16,
    t: u16,
    b: u16,
}

fn layout() -> Layout {
    Layout {
        title: Title {
            text: "ECB Key Interest Rates and Reference Rates",
        },
        xaxis: Axis::new("Date"),
        yaxis: Axis::new("Rate (%)"),
        hovermode: "x unified",
        plot_bgcolor: "white",
        legend: Legend {
            yanchor: "top",
            y: 0.99,
            xanchor: "left",
            x: 0.01,
        },
        margin: Margin {
            l: 50,
            r: 50,
            t: 50,
            b: 50,
        },
    }
}

/// Builds a trace from the observed points of `rate`. Dates where the rate
/// has no value are left out so sparse series still draw as lines.
fn trace(table: &RateTable, rate: Rate) -> Option<Trace> {
    let column = table.column(rate)?;
    let class = rate.class()?;

    let (x, y): (Vec<String>, Vec<f64>) = table
        .dates()
        .iter()
        .zip(column.iter())
        .filter_map(|(date, value)| value.map(|v| (date.format("%Y-%m-%d").to_string(), v)))
        .unzip();

    let line = match class {
        RateClass::Policy => Line {
            width: 2,
            dash: None,
            color: None,
        },
        RateClass::Reference => Line {
            width: 2,
            dash: Some("dash"),
            color: rate.line_color(),
        },
    };

    Some(Trace {
        r#type: "scatter",
        mode: "lines",
        name: rate.name().to_string(),
        x,
        y,
        line,
        hovertemplate: format!("%{{x|%Y-%m-%d}}<br>{}: %{{y:.3f}}%<br><extra></extra>", rate),
    })
}

/// Policy rates first, then reference rates; absent rates are skipped.
fn traces(table: &RateTable) -> Vec<Trace> {
    Rate::POLICY
        .iter()
        .chain(Rate::REFERENCE.iter())
        .filter_map(|rate| trace(table, *rate))
        .collect()
}

/// JSON embedded in a `<script>` element must not close it early.
fn script_json<T: Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value).context("Failed to serialize chart data")?;
    Ok(json.replace("</", "<\\/"))
}

/// Renders the chart as an HTML fragment that loads Plotly from its CDN.
pub fn chart_html(table: &RateTable) -> Result<String> {
    let data = script_json(&traces(table))?;
    let layout = script_json(&layout())?;

    Ok(format!(
        r#"<div id="{CHART_ID}" class="plotly-graph-div" style="height:100%; width:100%;"></div>
<script src="{PLOTLY_CDN}" charset="utf-8"></script>
<script type="text/javascript">
Plotly.newPlot("{CHART_ID}", {data}, {layout}, {{"responsive": true}});
</script>
"#
    ))
}

use serde::Serialize;
use serde_json::Value;

use crate::color::ColorMap;
use crate::config::{ChartBinding, DashboardConfig};
use crate::data::model::{GradeTable, GroupStatistic, RecordField, StatField};
use crate::error::RenderConfigError;

// ---------------------------------------------------------------------------
// Figure description (Plotly figure JSON)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    Histogram,
    Box,
    Bar,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub color: String,
}

/// One coloured series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: TraceKind,
    pub name: String,
    pub legendgroup: String,
    pub x: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub y: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    pub marker: Marker,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: Title,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub title: Title,
    pub tracegroupgap: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: Title,
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub legend: Legend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boxmode: Option<&'static str>,
}

/// A complete chart: traces plus layout, ready for `Plotly.newPlot`.
///
/// Histograms carry no `xbins`, so bin width is the plotting library's
/// default.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

/// The three dashboard charts.
#[derive(Debug, Clone)]
pub struct ChartSet {
    pub histogram: ChartSpec,
    pub boxplot: ChartSpec,
    pub bar: ChartSpec,
}

impl ChartSet {
    /// Charts in page order with their element ids.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ChartSpec)> {
        [
            ("histogram", &self.histogram),
            ("boxplot", &self.boxplot),
            ("bar", &self.bar),
        ]
        .into_iter()
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Build all three charts, checking every field binding against the data.
pub fn build_charts(
    table: &GradeTable,
    stats: &[GroupStatistic],
    config: &DashboardConfig,
) -> Result<ChartSet, RenderConfigError> {
    Ok(ChartSet {
        histogram: histogram(table, config)?,
        boxplot: boxplot(table, config)?,
        bar: bar(table, stats, config)?,
    })
}

/// Overlaid, semi-transparent score distribution per group.
fn histogram(table: &GradeTable, config: &DashboardConfig) -> Result<ChartSpec, RenderConfigError> {
    let chart = config.histogram_binding();
    let x = record_field(table, &chart.x, "histogram x")?;
    let color = record_field(table, &chart.color, "histogram color")?;

    let groups = group_by(&table.records, |r| color.key(r));
    let colors = color_map(&groups);
    let data = groups
        .into_iter()
        .map(|(key, rows)| Trace {
            kind: TraceKind::Histogram,
            name: key.clone(),
            marker: Marker {
                color: colors.color_for(&key).to_string(),
            },
            legendgroup: key,
            x: rows.iter().map(|r| x.value(r)).collect(),
            y: Vec::new(),
            opacity: Some(config.histogram_opacity),
        })
        .collect();

    Ok(ChartSpec {
        data,
        layout: layout(&chart, config, "count", Some("overlay"), None),
    })
}

/// One box per group.
fn boxplot(table: &GradeTable, config: &DashboardConfig) -> Result<ChartSpec, RenderConfigError> {
    let chart = config.boxplot_binding();
    let x = record_field(table, &chart.x, "box plot x")?;
    let y = record_field(table, required_y(&chart, "box plot y")?, "box plot y")?;
    let color = record_field(table, &chart.color, "box plot color")?;

    let groups = group_by(&table.records, |r| color.key(r));
    let colors = color_map(&groups);
    let data = groups
        .into_iter()
        .map(|(key, rows)| Trace {
            kind: TraceKind::Box,
            name: key.clone(),
            marker: Marker {
                color: colors.color_for(&key).to_string(),
            },
            legendgroup: key,
            x: rows.iter().map(|r| x.value(r)).collect(),
            y: rows.iter().map(|r| y.value(r)).collect(),
            opacity: None,
        })
        .collect();

    Ok(ChartSpec {
        data,
        layout: layout(&chart, config, y_label(&chart, config), None, Some("overlay")),
    })
}

/// One bar per group, drawn from the aggregated statistics.
fn bar(
    table: &GradeTable,
    stats: &[GroupStatistic],
    config: &DashboardConfig,
) -> Result<ChartSpec, RenderConfigError> {
    let chart = config.bar_binding();
    let x = stat_field(table, &chart.x, "bar chart x")?;
    let y = stat_field(table, required_y(&chart, "bar chart y")?, "bar chart y")?;
    let color = stat_field(table, &chart.color, "bar chart color")?;

    let groups = group_by(stats, |s| color.key(s));
    let colors = color_map(&groups);
    let data = groups
        .into_iter()
        .map(|(key, rows)| Trace {
            kind: TraceKind::Bar,
            name: key.clone(),
            marker: Marker {
                color: colors.color_for(&key).to_string(),
            },
            legendgroup: key,
            x: rows.iter().map(|s| x.value(s)).collect(),
            y: rows.iter().map(|s| y.value(s)).collect(),
            opacity: None,
        })
        .collect();

    Ok(ChartSpec {
        data,
        layout: layout(&chart, config, y_label(&chart, config), Some("relative"), None),
    })
}

fn layout(
    chart: &ChartBinding,
    config: &DashboardConfig,
    y_title: &str,
    barmode: Option<&'static str>,
    boxmode: Option<&'static str>,
) -> Layout {
    Layout {
        title: Title::new(&chart.title),
        xaxis: Axis {
            title: Title::new(config.label(&chart.x)),
        },
        yaxis: Axis {
            title: Title::new(y_title),
        },
        legend: Legend {
            title: Title::new(config.label(&chart.color)),
            tracegroupgap: 0,
        },
        barmode,
        boxmode,
    }
}

fn y_label<'a>(chart: &'a ChartBinding, config: &'a DashboardConfig) -> &'a str {
    chart.y.as_deref().map(|y| config.label(y)).unwrap_or("")
}

fn required_y<'a>(chart: &'a ChartBinding, context: &str) -> Result<&'a str, RenderConfigError> {
    chart
        .y
        .as_deref()
        .ok_or_else(|| RenderConfigError::UnknownField {
            context: context.to_string(),
            field: String::new(),
        })
}

/// Hues follow the chart's own colour groups, whatever field they come from.
fn color_map<T>(groups: &[(String, Vec<&T>)]) -> ColorMap {
    let labels: Vec<&str> = groups.iter().map(|(key, _)| key.as_str()).collect();
    ColorMap::new(&labels)
}

fn record_field(
    table: &GradeTable,
    name: &str,
    context: &str,
) -> Result<RecordField, RenderConfigError> {
    table.field(name).ok_or_else(|| RenderConfigError::UnknownField {
        context: context.to_string(),
        field: name.to_string(),
    })
}

fn stat_field(table: &GradeTable, name: &str, context: &str) -> Result<StatField, RenderConfigError> {
    StatField::resolve(name, &table.columns).ok_or_else(|| RenderConfigError::UnknownField {
        context: context.to_string(),
        field: name.to_string(),
    })
}

/// Stable partition: groups in order of first appearance, rows in input order.
fn group_by<T>(rows: &[T], key: impl Fn(&T) -> String) -> Vec<(String, Vec<&T>)> {
    let mut groups: Vec<(String, Vec<&T>)> = Vec::new();
    for row in rows {
        let k = key(row);
        match groups.iter_mut().find(|(g, _)| *g == k) {
            Some((_, members)) => members.push(row),
            None => groups.push((k, vec![row])),
        }
    }
    groups
}

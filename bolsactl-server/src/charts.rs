//! Plotly figure specs built from result sets
//!
//! The server only produces `{data, layout}` JSON; plotly.js draws it in the
//! browser. Column names refer to `ResultSet` columns.

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::result_set::ResultSet;

/// Figure height in pixels
pub const DEFAULT_HEIGHT: u32 = 400;

/// Largest marker diameter for scatter charts
const MAX_MARKER_SIZE: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    HorizontalBar,
    Pie,
    Donut,
    Line,
    Scatter,
    Treemap,
}

/// A titled Plotly figure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub kind: ChartKind,
    pub title: String,
    pub figure: Value,
}

/// Axis binding: result-set column plus its display label
#[derive(Debug, Clone, Copy)]
struct Axis<'a> {
    column: &'a str,
    label: &'a str,
}

pub struct ChartBuilder<'a> {
    rs: &'a ResultSet,
    kind: ChartKind,
    title: String,
    x: Option<Axis<'a>>,
    y: Option<Axis<'a>>,
    color: Option<(&'a str, &'a str)>,
    size: Option<&'a str>,
    hover: Option<&'a str>,
    extra_hover: Vec<&'a str>,
    text: Option<(&'a str, &'a str)>,
    tick_angle: Option<i32>,
}

impl<'a> ChartBuilder<'a> {
    pub fn new(kind: ChartKind, rs: &'a ResultSet, title: impl Into<String>) -> Self {
        Self {
            rs,
            kind,
            title: title.into(),
            x: None,
            y: None,
            color: None,
            size: None,
            hover: None,
            extra_hover: Vec::new(),
            text: None,
            tick_angle: None,
        }
    }

    pub fn bar(rs: &'a ResultSet, title: impl Into<String>) -> Self {
        Self::new(ChartKind::Bar, rs, title)
    }

    /// Bars along the y axis, largest on top
    pub fn horizontal_bar(rs: &'a ResultSet, title: impl Into<String>) -> Self {
        Self::new(ChartKind::HorizontalBar, rs, title)
    }

    pub fn pie(rs: &'a ResultSet, title: impl Into<String>) -> Self {
        Self::new(ChartKind::Pie, rs, title)
    }

    pub fn donut(rs: &'a ResultSet, title: impl Into<String>) -> Self {
        Self::new(ChartKind::Donut, rs, title)
    }

    pub fn line(rs: &'a ResultSet, title: impl Into<String>) -> Self {
        Self::new(ChartKind::Line, rs, title)
    }

    pub fn scatter(rs: &'a ResultSet, title: impl Into<String>) -> Self {
        Self::new(ChartKind::Scatter, rs, title)
    }

    pub fn treemap(rs: &'a ResultSet, title: impl Into<String>) -> Self {
        Self::new(ChartKind::Treemap, rs, title)
    }

    /// Category (or x value) column. For pie and treemap charts: the slice names.
    pub fn x(mut self, column: &'a str, label: &'a str) -> Self {
        self.x = Some(Axis { column, label });
        self
    }

    /// Measure column. For pie and treemap charts: the slice values.
    pub fn y(mut self, column: &'a str, label: &'a str) -> Self {
        self.y = Some(Axis { column, label });
        self
    }

    /// Continuous marker color from `column` using a Plotly colorscale name
    pub fn color(mut self, column: &'a str, scale: &'a str) -> Self {
        self.color = Some((column, scale));
        self
    }

    pub fn size(mut self, column: &'a str) -> Self {
        self.size = Some(column);
        self
    }

    pub fn hover_name(mut self, column: &'a str) -> Self {
        self.hover = Some(column);
        self
    }

    /// Extra columns shown in the hover box
    pub fn hover_data(mut self, columns: &[&'a str]) -> Self {
        self.extra_hover.extend_from_slice(columns);
        self
    }

    /// Label each bar with `column`, formatted by a Plotly `texttemplate`
    pub fn text(mut self, column: &'a str, template: &'a str) -> Self {
        self.text = Some((column, template));
        self
    }

    pub fn tick_angle(mut self, degrees: i32) -> Self {
        self.tick_angle = Some(degrees);
        self
    }

    pub fn build(self) -> Chart {
        let trace = match self.kind {
            ChartKind::Bar => self.bar_trace(false),
            ChartKind::HorizontalBar => self.bar_trace(true),
            ChartKind::Pie => self.pie_trace(0.0),
            ChartKind::Donut => self.pie_trace(0.4),
            ChartKind::Line => self.line_trace(),
            ChartKind::Scatter => self.scatter_trace(),
            ChartKind::Treemap => self.treemap_trace(),
        };

        Chart {
            kind: self.kind,
            title: self.title.clone(),
            figure: json!({
                "data": [trace],
                "layout": self.layout(),
            }),
        }
    }

    fn labels(&self) -> Vec<String> {
        self.x.map(|a| self.rs.texts(a.column)).unwrap_or_default()
    }

    fn values(&self) -> Vec<f64> {
        self.y.map(|a| self.rs.f64s(a.column)).unwrap_or_default()
    }

    fn marker(&self) -> Map<String, Value> {
        let mut marker = Map::new();
        if let Some((column, scale)) = self.color {
            marker.insert("color".into(), json!(self.rs.f64s(column)));
            marker.insert("colorscale".into(), json!(scale));
            marker.insert("showscale".into(), json!(true));
        }
        marker
    }

    fn bar_trace(&self, horizontal: bool) -> Value {
        let (labels, values) = (self.labels(), self.values());
        let mut trace = if horizontal {
            json!({ "type": "bar", "orientation": "h", "x": values, "y": labels })
        } else {
            json!({ "type": "bar", "x": labels, "y": values })
        };
        if let Some(obj) = trace.as_object_mut() {
            obj.insert("marker".into(), Value::Object(self.marker()));
            if let Some((column, template)) = self.text {
                obj.insert("text".into(), json!(self.rs.f64s(column)));
                obj.insert("texttemplate".into(), json!(template));
                obj.insert("textposition".into(), json!("outside"));
            }
        }
        trace
    }

    fn pie_trace(&self, hole: f64) -> Value {
        json!({
            "type": "pie",
            "labels": self.labels(),
            "values": self.values(),
            "hole": hole,
        })
    }

    fn line_trace(&self) -> Value {
        json!({
            "type": "scatter",
            "mode": "lines+markers",
            "x": self.labels(),
            "y": self.values(),
        })
    }

    fn scatter_trace(&self) -> Value {
        let x = self.x.map(|a| self.rs.f64s(a.column)).unwrap_or_default();
        let mut trace = json!({
            "type": "scatter",
            "mode": "markers",
            "x": x,
            "y": self.values(),
        });
        let Some(obj) = trace.as_object_mut() else {
            return trace;
        };

        let mut marker = self.marker();
        if let Some(column) = self.size {
            let sizes = self.rs.f64s(column);
            marker.insert("size".into(), json!(sizes));
            marker.insert("sizemode".into(), json!("area"));
            marker.insert("sizeref".into(), json!(size_ref(&sizes)));
        }
        obj.insert("marker".into(), Value::Object(marker));

        if let Some(column) = self.hover {
            obj.insert("text".into(), json!(self.rs.texts(column)));
            obj.insert("hoverinfo".into(), json!("text+x+y"));
        }
        trace
    }

    fn treemap_trace(&self) -> Value {
        let labels = self.labels();
        let parents = vec![""; labels.len()];
        let mut trace = json!({
            "type": "treemap",
            "labels": labels,
            "parents": parents,
            "values": self.values(),
            "branchvalues": "total",
        });
        let Some(obj) = trace.as_object_mut() else {
            return trace;
        };

        let mut marker = Map::new();
        if let Some((column, scale)) = self.color {
            marker.insert("colors".into(), json!(self.rs.f64s(column)));
            marker.insert("colorscale".into(), json!(scale));
            marker.insert("showscale".into(), json!(true));
        }
        obj.insert("marker".into(), Value::Object(marker));

        if !self.extra_hover.is_empty() {
            let customdata: Vec<Vec<String>> = (0..self.rs.len())
                .map(|row| {
                    self.extra_hover
                        .iter()
                        .map(|c| self.rs.value(row, c).map(ToString::to_string).unwrap_or_default())
                        .collect()
                })
                .collect();
            let template = self
                .extra_hover
                .iter()
                .enumerate()
                .map(|(i, c)| format!("{}: %{{customdata[{}]}}", c, i))
                .collect::<Vec<_>>()
                .join("<br>");
            obj.insert("customdata".into(), json!(customdata));
            obj.insert(
                "hovertemplate".into(),
                json!(format!("%{{label}}<br>%{{value}}<br>{}<extra></extra>", template)),
            );
        }
        trace
    }

    fn layout(&self) -> Value {
        let mut layout = json!({
            "title": { "text": self.title },
            "height": DEFAULT_HEIGHT,
            "margin": { "t": 60, "l": 40, "r": 20, "b": 40 },
        });
        let Some(obj) = layout.as_object_mut() else {
            return layout;
        };

        match self.kind {
            ChartKind::Bar | ChartKind::Line | ChartKind::Scatter => {
                let mut xaxis = json!({ "title": { "text": self.x.map(|a| a.label) } });
                if let (Some(angle), Some(axis)) = (self.tick_angle, xaxis.as_object_mut()) {
                    axis.insert("tickangle".into(), json!(angle));
                }
                obj.insert("xaxis".into(), xaxis);
                obj.insert(
                    "yaxis".into(),
                    json!({ "title": { "text": self.y.map(|a| a.label) } }),
                );
            }
            ChartKind::HorizontalBar => {
                obj.insert(
                    "xaxis".into(),
                    json!({ "title": { "text": self.y.map(|a| a.label) } }),
                );
                obj.insert(
                    "yaxis".into(),
                    json!({
                        "title": { "text": self.x.map(|a| a.label) },
                        "categoryorder": "total ascending",
                    }),
                );
            }
            ChartKind::Pie | ChartKind::Donut | ChartKind::Treemap => {}
        }
        layout
    }
}

/// Plotly's `sizemode: area` reference so the largest marker is ~40px
fn size_ref(sizes: &[f64]) -> f64 {
    let max = sizes.iter().copied().fold(0.0_f64, f64::max);
    if max <= 0.0 {
        1.0
    } else {
        2.0 * max / (MAX_MARKER_SIZE * MAX_MARKER_SIZE)
    }
}

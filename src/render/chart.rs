//! Chart specifications and their Plotly encoding.
//!
//! A [`ChartSpec`] is the library-neutral description returned by the JSON
//! API; [`ChartSpec::to_plotly`] turns it into the `{data, layout}` figure the
//! HTML pages hand to Plotly in the browser.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{json, Value};

use crate::models::{BoxStats, MONTH_ABBREVIATIONS};

pub const TEMPERATURE_COLOR: &str = "#e74c3c";
pub const TEMPERATURE_DARK_COLOR: &str = "#c0392b";
pub const PRECIPITATION_COLOR: &str = "#3498db";
pub const WARM_COLORSCALE: &str = "RdYlBu";
pub const PRECIPITATION_COLORSCALE: &str = "Blues";

/// Qualitative palette for one line per decade.
pub const DECADE_PALETTE: [&str; 8] = [
    "#66c2a5", "#fc8d62", "#8da0cb", "#e78ac3", "#a6d854", "#ffd92f", "#e5c494", "#b3b3b3",
];

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Area,
    Histogram,
    Heatmap,
    BoxPlot,
    Scatter,
    Bar,
}

/// Values along the x axis of a trace.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum XValues {
    Years(Vec<i32>),
    Months(Vec<u32>),
    Dates(Vec<NaiveDate>),
    Numbers(Vec<f64>),
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Lines,
    Markers,
    LinesMarkers,
}

impl Mode {
    fn plotly(&self) -> &'static str {
        match self {
            Self::Lines => "lines",
            Self::Markers => "markers",
            Self::LinesMarkers => "lines+markers",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trace {
    Scatter {
        name: String,
        x: XValues,
        y: Vec<Option<f64>>,
        mode: Mode,
        color: Option<String>,
        width: f64,
        /// Fill down to zero with a translucent version of `color`.
        fill: bool,
        /// Colour markers by their y value using this scale.
        colorscale: Option<String>,
    },
    Bar {
        name: String,
        x: XValues,
        y: Vec<Option<f64>>,
        color: String,
    },
    /// Counts over contiguous bins; `edges.len() == counts.len() + 1`.
    Histogram {
        name: String,
        edges: Vec<f64>,
        counts: Vec<usize>,
    },
    Heatmap {
        x: Vec<i32>,
        y: Vec<String>,
        z: Vec<Vec<Option<f64>>>,
        colorscale: String,
        colorbar_title: String,
    },
    Box {
        name: String,
        stats: BoxStats,
    },
}

/// A horizontal dashed line with a label, e.g. an average.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReferenceLine {
    pub y: f64,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartSpec {
    pub id: String,
    pub kind: ChartKind,
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub height: u32,
    pub traces: Vec<Trace>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_line: Option<ReferenceLine>,
    /// Label months 1..=12 with their abbreviations on the x axis.
    pub month_axis: bool,
}

impl ChartSpec {
    pub fn new(id: &str, kind: ChartKind, title: impl Into<String>) -> Self {
        Self {
            id: id.to_string(),
            kind,
            title: title.into(),
            x_title: String::new(),
            y_title: String::new(),
            height: 500,
            traces: Vec::new(),
            reference_line: None,
            month_axis: false,
        }
    }

    pub fn axes(mut self, x: &str, y: &str) -> Self {
        self.x_title = x.to_string();
        self.y_title = y.to_string();
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    pub fn trace(mut self, trace: Trace) -> Self {
        self.traces.push(trace);
        self
    }

    pub fn reference_line(mut self, y: f64, label: impl Into<String>) -> Self {
        self.reference_line = Some(ReferenceLine {
            y,
            label: label.into(),
        });
        self
    }

    pub fn month_axis(mut self) -> Self {
        self.month_axis = true;
        self
    }

    /// Encode as a Plotly figure: `{"data": [...], "layout": {...}}`.
    pub fn to_plotly(&self) -> Value {
        let data: Vec<Value> = self.traces.iter().map(trace_to_plotly).collect();

        let mut layout = json!({
            "title": { "text": self.title },
            "xaxis": { "title": { "text": self.x_title } },
            "yaxis": { "title": { "text": self.y_title } },
            "height": self.height,
        });

        match self.kind {
            ChartKind::Line | ChartKind::Area => {
                layout["hovermode"] = json!("x unified");
            }
            ChartKind::Histogram => {
                layout["barmode"] = json!("overlay");
            }
            _ => {}
        }

        if self.month_axis {
            layout["xaxis"]["tickmode"] = json!("array");
            layout["xaxis"]["tickvals"] = json!((1..=12).collect::<Vec<u32>>());
            layout["xaxis"]["ticktext"] = json!(MONTH_ABBREVIATIONS);
        }

        if let Some(line) = &self.reference_line {
            layout["shapes"] = json!([{
                "type": "line",
                "xref": "paper",
                "x0": 0,
                "x1": 1,
                "y0": line.y,
                "y1": line.y,
                "line": { "color": "red", "dash": "dash" },
            }]);
            layout["annotations"] = json!([{
                "xref": "paper",
                "x": 1,
                "y": line.y,
                "text": line.label,
                "showarrow": false,
                "yanchor": "bottom",
                "xanchor": "right",
            }]);
        }

        json!({ "data": data, "layout": layout })
    }
}

/// `#rrggbb` to an `rgba()` string with the given alpha.
fn translucent(hex: &str, alpha: f64) -> String {
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
            .unwrap_or(0)
    };
    format!(
        "rgba({}, {}, {}, {})",
        channel(1..3),
        channel(3..5),
        channel(5..7),
        alpha
    )
}

fn trace_to_plotly(trace: &Trace) -> Value {
    match trace {
        Trace::Scatter {
            name,
            x,
            y,
            mode,
            color,
            width,
            fill,
            colorscale,
        } => {
            let mut value = json!({
                "type": "scatter",
                "name": name,
                "x": x,
                "y": y,
                "mode": mode.plotly(),
                "line": { "width": width },
            });
            if let Some(color) = color {
                value["line"]["color"] = json!(color);
                if *fill {
                    value["fill"] = json!("tozeroy");
                    value["fillcolor"] = json!(translucent(color, 0.2));
                }
            }
            match colorscale {
                Some(scale) => {
                    value["marker"] = json!({
                        "size": 10,
                        "color": y,
                        "colorscale": scale,
                        "reversescale": true,
                        "showscale": true,
                    });
                }
                None if *mode != Mode::Lines => {
                    value["marker"] = json!({ "size": 6 });
                }
                None => {}
            }
            value
        }
        Trace::Bar { name, x, y, color } => json!({
            "type": "bar",
            "name": name,
            "x": x,
            "y": y,
            "marker": { "color": color },
        }),
        Trace::Histogram {
            name,
            edges,
            counts,
        } => {
            let centers: Vec<f64> = edges.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect();
            let widths: Vec<f64> = edges.windows(2).map(|w| w[1] - w[0]).collect();
            json!({
                "type": "bar",
                "name": name,
                "x": centers,
                "y": counts,
                "width": widths,
                "opacity": 0.7,
            })
        }
        Trace::Heatmap {
            x,
            y,
            z,
            colorscale,
            colorbar_title,
        } => json!({
            "type": "heatmap",
            "x": x,
            "y": y,
            "z": z,
            "colorscale": colorscale,
            "reversescale": colorscale == WARM_COLORSCALE,
            "colorbar": { "title": { "text": colorbar_title } },
        }),
        Trace::Box { name, stats } => json!({
            "type": "box",
            "name": name,
            "x": [name],
            "q1": [stats.q1],
            "median": [stats.median],
            "q3": [stats.q3],
            "lowerfence": [stats.min],
            "upperfence": [stats.max],
            "mean": [stats.mean],
            "sd": [stats.std_dev.unwrap_or(0.0)],
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translucent_converts_hex() {
        assert_eq!(translucent("#3498db", 0.2), "rgba(52, 152, 219, 0.2)");
    }

    #[test]
    fn line_chart_encodes_hover_and_fill() {
        let spec = ChartSpec::new("rain", ChartKind::Area, "Rain")
            .axes("Year", "mm")
            .trace(Trace::Scatter {
                name: "Annual".into(),
                x: XValues::Years(vec![2000, 2001]),
                y: vec![Some(1.0), None],
                mode: Mode::LinesMarkers,
                color: Some(PRECIPITATION_COLOR.into()),
                width: 2.0,
                fill: true,
                colorscale: None,
            });

        let figure = spec.to_plotly();
        assert_eq!(figure["layout"]["hovermode"], "x unified");
        assert_eq!(figure["layout"]["yaxis"]["title"]["text"], "mm");
        let trace = &figure["data"][0];
        assert_eq!(trace["mode"], "lines+markers");
        assert_eq!(trace["fill"], "tozeroy");
        assert_eq!(trace["x"], json!([2000, 2001]));
        assert_eq!(trace["y"], json!([1.0, null]));
    }

    #[test]
    fn histogram_becomes_bars_at_bin_centers() {
        let spec = ChartSpec::new("h", ChartKind::Histogram, "H").trace(Trace::Histogram {
            name: "p".into(),
            edges: vec![0.0, 2.0, 4.0],
            counts: vec![3, 1],
        });
        let figure = spec.to_plotly();
        assert_eq!(figure["layout"]["barmode"], "overlay");
        assert_eq!(figure["data"][0]["x"], json!([1.0, 3.0]));
        assert_eq!(figure["data"][0]["y"], json!([3, 1]));
    }

    #[test]
    fn reference_line_adds_shape_and_annotation() {
        let figure = ChartSpec::new("b", ChartKind::Bar, "B")
            .reference_line(120.0, "Average: 120 mm")
            .to_plotly();
        assert_eq!(figure["layout"]["shapes"][0]["y0"], 120.0);
        assert_eq!(figure["layout"]["annotations"][0]["text"], "Average: 120 mm");
    }

    #[test]
    fn month_axis_uses_abbreviations() {
        let figure = ChartSpec::new("m", ChartKind::Line, "M")
            .month_axis()
            .to_plotly();
        assert_eq!(figure["layout"]["xaxis"]["ticktext"][0], "Jan");
        assert_eq!(figure["layout"]["xaxis"]["tickvals"][11], 12);
    }
}

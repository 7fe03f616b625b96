//! HTML page rendering.
//!
//! Pages are self-contained documents: a sidebar with the four sections, the
//! Insights filter form when relevant, and the section blocks. Charts are
//! embedded as Plotly figures and drawn client-side.

use std::fmt::Write;

use crate::models::Season;
use crate::views::{InsightsFilter, Section, Variable};

use super::{Block, Metric, RenderedSection};

const PLOTLY_SRC: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
const PAGE_TITLE: &str = "Agricultural Climate Analysis";

const STYLE: &str = "
body { margin: 0; font-family: sans-serif; display: flex; color: #222; }
nav { width: 240px; min-height: 100vh; background: #f0f2f6; padding: 1rem; box-sizing: border-box; }
nav a { display: block; padding: .4rem 0; color: #333; text-decoration: none; }
nav a.active { font-weight: bold; color: #e74c3c; }
main { flex: 1; padding: 1rem 2rem; max-width: 1200px; }
.metrics { display: flex; gap: 2rem; margin: 1rem 0; }
.metric .label { font-size: .85rem; color: #666; }
.metric .value { font-size: 1.8rem; }
.metric .delta { font-size: .85rem; color: #2e7d32; }
.empty { padding: 1rem; background: #fff8e1; border-left: 4px solid #f9a825; margin: 1rem 0; }
.error { padding: 1rem; background: #fdecea; border-left: 4px solid #e53935; margin: 1rem 0; }
form.filters { display: flex; gap: 1.5rem; align-items: end; margin: 1rem 0; }
";

/// Escape text for safe inclusion in HTML element content and attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape, then turn `**bold**` spans into `<strong>` elements.
fn narrative_html(text: &str) -> String {
    let escaped = escape_html(text);
    let mut out = String::with_capacity(escaped.len());
    for (i, part) in escaped.split("**").enumerate() {
        if i % 2 == 1 {
            out.push_str("<strong>");
            out.push_str(part);
            out.push_str("</strong>");
        } else {
            out.push_str(part);
        }
    }
    out
}

/// JSON safe to place inside a `<script>` element.
fn script_json(value: &serde_json::Value) -> String {
    value.to_string().replace("</", "<\\/")
}

fn document(active: Option<Section>, body: &str, with_plotly: bool) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{PAGE_TITLE}</title>");
    let _ = writeln!(html, "<style>{STYLE}</style>");
    if with_plotly {
        let _ = writeln!(html, "<script src=\"{PLOTLY_SRC}\"></script>");
    }
    html.push_str("</head>\n<body>\n");
    html.push_str(&sidebar(active));
    html.push_str("<main>\n");
    html.push_str(body);
    html.push_str("</main>\n</body>\n</html>\n");
    html
}

fn sidebar(active: Option<Section>) -> String {
    let mut nav = String::from("<nav>\n<h2>Navigation</h2>\n<p>Where Do We Go ?</p>\n");
    for section in Section::ALL {
        let class = if Some(section) == active {
            " class=\"active\""
        } else {
            ""
        };
        let _ = writeln!(
            nav,
            "<a href=\"/sections/{}\"{class}>{}</a>",
            section.as_str(),
            section.nav_label()
        );
    }
    nav.push_str("</nav>\n");
    nav
}

fn filter_form(filter: &InsightsFilter, years: &[i32]) -> String {
    let mut form = String::from("<form class=\"filters\" method=\"get\" action=\"/sections/insights\">\n");

    form.push_str("<label>Select a year to explore:<br><select name=\"year\">\n");
    for year in years.iter().rev() {
        let selected = if Some(*year) == filter.year {
            " selected"
        } else {
            ""
        };
        let _ = writeln!(form, "<option value=\"{year}\"{selected}>{year}</option>");
    }
    form.push_str("</select></label>\n");

    form.push_str("<fieldset><legend>Select variable to compare:</legend>\n");
    for variable in Variable::ALL {
        let checked = if variable == filter.variable {
            " checked"
        } else {
            ""
        };
        let _ = writeln!(
            form,
            "<label><input type=\"radio\" name=\"variable\" value=\"{}\"{checked}> {}</label>",
            variable.as_str(),
            variable.label()
        );
    }
    form.push_str("</fieldset>\n");

    form.push_str("<label>Select a season:<br><select name=\"season\">\n");
    for season in Season::ALL {
        let selected = if season == filter.season {
            " selected"
        } else {
            ""
        };
        let _ = writeln!(
            form,
            "<option value=\"{}\"{selected}>{}</option>",
            season.as_str(),
            season.label()
        );
    }
    form.push_str("</select></label>\n<button type=\"submit\">Apply</button>\n</form>\n");
    form
}

fn metrics_html(items: &[Metric]) -> String {
    let mut html = String::from("<div class=\"metrics\">\n");
    for item in items {
        html.push_str("<div class=\"metric\">");
        let _ = write!(
            html,
            "<div class=\"label\">{}</div><div class=\"value\">{}</div>",
            escape_html(&item.label),
            escape_html(&item.value)
        );
        if let Some(delta) = &item.delta {
            let _ = write!(html, "<div class=\"delta\">{}</div>", escape_html(delta));
        }
        html.push_str("</div>\n");
    }
    html.push_str("</div>\n");
    html
}

/// Render a full HTML page for a section.
pub fn render_page(section: &RenderedSection) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "<h1>{}</h1>", escape_html(&section.title));

    if let Some(filter) = &section.filter {
        if !section.years.is_empty() {
            body.push_str(&filter_form(filter, &section.years));
        }
    }

    let mut scripts = String::new();
    for block in &section.blocks {
        match block {
            Block::Heading { level, text } => {
                let level = (*level).clamp(1, 6);
                let _ = writeln!(body, "<h{level}>{}</h{level}>", escape_html(text));
            }
            Block::Narrative { text } => {
                let _ = writeln!(body, "<p>{}</p>", narrative_html(text));
            }
            Block::Chart(spec) => {
                let _ = writeln!(body, "<div class=\"chart\" id=\"{}\"></div>", escape_html(&spec.id));
                let _ = writeln!(
                    scripts,
                    "(function() {{ var f = {}; Plotly.newPlot({}, f.data, f.layout, {{responsive: true}}); }})();",
                    script_json(&spec.to_plotly()),
                    script_json(&serde_json::Value::String(spec.id.clone()))
                );
            }
            Block::Metrics { items } => body.push_str(&metrics_html(items)),
            Block::Empty { message, .. } => {
                let _ = writeln!(body, "<div class=\"empty\">{}</div>", escape_html(message));
            }
        }
    }

    let has_charts = !scripts.is_empty();
    if has_charts {
        let _ = writeln!(body, "<script>\n{scripts}</script>");
    }

    document(Some(section.section), &body, has_charts)
}

/// Page shown instead of any section when the dataset could not be loaded.
pub fn render_error_page(active: Option<Section>, message: &str) -> String {
    let body = format!(
        "<h1>{PAGE_TITLE}</h1>\n<div class=\"error\">{}</div>\n",
        escape_html(message)
    );
    document(active, &body, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::chart::{ChartKind, ChartSpec};

    fn section(blocks: Vec<Block>) -> RenderedSection {
        RenderedSection {
            section: Section::Analysis,
            title: "Analysis".into(),
            filter: None,
            years: vec![],
            blocks,
        }
    }

    #[test]
    fn escape_html_handles_markup() {
        assert_eq!(
            escape_html("<a href=\"x\">Tom & Jerry's</a>"),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn narrative_bold_becomes_strong() {
        assert_eq!(
            narrative_html("**Context:** 3 < 4"),
            "<strong>Context:</strong> 3 &lt; 4"
        );
    }

    #[test]
    fn script_json_cannot_close_script_tag() {
        let value = serde_json::json!({ "title": "</script><script>alert(1)" });
        assert!(!script_json(&value).contains("</script>"));
    }

    #[test]
    fn chart_pages_load_plotly() {
        let html = render_page(&section(vec![Block::Chart(ChartSpec::new(
            "annual-temperature",
            ChartKind::Line,
            "T",
        ))]));
        assert!(html.contains(PLOTLY_SRC));
        assert!(html.contains("id=\"annual-temperature\""));
        assert!(html.contains("Plotly.newPlot(\"annual-temperature\""));
    }

    #[test]
    fn chart_id_is_encoded_as_json_string() {
        let html = render_page(&section(vec![Block::Chart(ChartSpec::new(
            "odd\"</script>",
            ChartKind::Line,
            "T",
        ))]));
        assert!(html.contains("Plotly.newPlot(\"odd\\\"<\\/script>\","));
        assert!(html.contains("id=\"odd&quot;&lt;/script&gt;\""));
    }

    #[test]
    fn pages_without_charts_skip_plotly() {
        let html = render_page(&section(vec![Block::Empty {
            slot: crate::views::PanelSlot::MonthlyHeatmap,
            message: "No data".into(),
        }]));
        assert!(!html.contains(PLOTLY_SRC));
        assert!(html.contains("<div class=\"empty\">No data</div>"));
    }

    #[test]
    fn sidebar_marks_active_section() {
        let html = render_page(&section(vec![]));
        assert!(html.contains("<a href=\"/sections/analysis\" class=\"active\">2. ANALYSIS</a>"));
        assert!(html.contains("<a href=\"/sections/problem\">1. THE PROBLEM</a>"));
    }

    #[test]
    fn insights_form_preselects_filter() {
        let mut rendered = section(vec![]);
        rendered.section = Section::Insights;
        rendered.years = vec![2019, 2020];
        rendered.filter = Some(InsightsFilter {
            year: Some(2019),
            variable: Variable::Precipitation,
            season: Season::Summer,
        });
        let html = render_page(&rendered);
        assert!(html.contains("<option value=\"2019\" selected>2019</option>"));
        assert!(html.contains("value=\"precipitation\" checked"));
        assert!(html.contains("<option value=\"summer\" selected>Summer</option>"));
    }

    #[test]
    fn error_page_escapes_message() {
        let html = render_error_page(None, "File <missing>");
        assert!(html.contains("File &lt;missing&gt;"));
    }
}

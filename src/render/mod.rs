//! Turns a [`Selection`] into displayable content.
//!
//! [`render_section`] maps each selected panel to headings, chart
//! specifications, metrics and narrative text. The result is served as JSON
//! directly, or wrapped into an HTML document by [`page::render_page`].

pub mod chart;
pub mod narrative;
pub mod page;

use serde::Serialize;

use crate::models::*;
use crate::views::{InsightsFilter, Panel, PanelSlot, Section, Selection, Variable};
use chart::*;

/// A single headline number, optionally compared against a baseline.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Metric {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<String>,
}

impl Metric {
    fn new(label: impl Into<String>, value: impl Into<String>, delta: Option<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            delta,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading { level: u8, text: String },
    /// Markdown-style text; `**bold**` is the only markup used.
    Narrative { text: String },
    Chart(ChartSpec),
    Metrics { items: Vec<Metric> },
    Empty { slot: PanelSlot, message: String },
}

impl Block {
    fn heading(level: u8, text: impl Into<String>) -> Self {
        Self::Heading {
            level,
            text: text.into(),
        }
    }

    fn narrative(text: impl Into<String>) -> Self {
        Self::Narrative { text: text.into() }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RenderedSection {
    pub section: Section,
    pub title: String,
    /// Filter in effect; only meaningful for the Insights section.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<InsightsFilter>,
    /// Years offered by the year selector.
    pub years: Vec<i32>,
    pub blocks: Vec<Block>,
}

impl RenderedSection {
    pub fn charts(&self) -> impl Iterator<Item = &ChartSpec> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Chart(spec) => Some(spec),
            _ => None,
        })
    }

    pub fn empty_states(&self) -> impl Iterator<Item = (&PanelSlot, &str)> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Empty { slot, message } => Some((slot, message.as_str())),
            _ => None,
        })
    }
}

pub fn section_title(section: Section) -> &'static str {
    match section {
        Section::Problem => narrative::PROBLEM_TITLE,
        Section::Analysis => narrative::ANALYSIS_TITLE,
        Section::Insights => narrative::INSIGHTS_TITLE,
        Section::Conclusion => narrative::CONCLUSION_TITLE,
    }
}

pub fn render_section(selection: &Selection<'_>) -> RenderedSection {
    let mut blocks = Vec::new();

    match selection.section {
        Section::Problem => blocks.push(Block::narrative(narrative::PROBLEM_CONTEXT)),
        Section::Conclusion => {
            blocks.push(Block::heading(2, narrative::CONCLUSION_HEADING));
            blocks.extend(
                narrative::CONCLUSION_PARAGRAPHS
                    .iter()
                    .map(|p| Block::narrative(*p)),
            );
        }
        Section::Analysis | Section::Insights => {}
    }

    for panel in &selection.panels {
        render_panel(panel, &selection.filter, &mut blocks);
    }

    RenderedSection {
        section: selection.section,
        title: section_title(selection.section).to_string(),
        filter: (selection.section == Section::Insights).then_some(selection.filter),
        years: selection.years.to_vec(),
        blocks,
    }
}

fn render_panel(panel: &Panel<'_>, filter: &InsightsFilter, blocks: &mut Vec<Block>) {
    match panel {
        Panel::DatasetOverview {
            records,
            first_year,
            last_year,
        } => blocks.push(Block::Metrics {
            items: vec![
                Metric::new("Daily records", records.to_string(), None),
                Metric::new("Period covered", format!("{first_year}-{last_year}"), None),
            ],
        }),
        Panel::AnnualTemperature {
            annual,
            warming_delta,
        } => {
            let (first, last) = year_span(annual);
            blocks.push(Block::heading(
                2,
                format!("Annual Average Temperature Evolution ({first}-{last})"),
            ));
            blocks.push(Block::Chart(annual_temperature_chart(annual)));
            blocks.push(Block::narrative(narrative::temperature_trend(
                first,
                last,
                *warming_delta,
            )));
        }
        Panel::AnnualPrecipitation(annual) => {
            blocks.push(Block::heading(2, "Annual Precipitation Evolution"));
            blocks.push(Block::Chart(annual_precipitation_chart(annual)));
            blocks.push(Block::narrative(narrative::PRECIPITATION_TREND));
        }
        Panel::PeriodDistribution(comparison) => {
            blocks.push(Block::heading(
                2,
                "Temperature Distribution Comparison (1989-2004 vs 2005-2024)",
            ));
            blocks.push(Block::Chart(period_chart(comparison)));
            blocks.push(Block::Metrics {
                items: period_metrics(comparison),
            });
            blocks.push(Block::narrative(narrative::DISTRIBUTION_SHIFT));
        }
        Panel::MonthlyHeatmap(grid) => {
            blocks.push(Block::heading(2, "Monthly Temperature Heatmap"));
            blocks.push(Block::Chart(heatmap_chart(grid)));
            blocks.push(Block::narrative(narrative::SEASONAL_EVOLUTION));
        }
        Panel::PrecipitationDistribution(months) => {
            blocks.push(Block::heading(2, "Monthly Precipitation Distribution"));
            blocks.push(Block::Chart(precipitation_box_chart(months)));
            blocks.push(Block::narrative(narrative::PRECIPITATION_DISTRIBUTION));
        }
        Panel::YearProfile(profile) => {
            blocks.push(Block::heading(2, "Annual Climate Profile"));
            blocks.push(Block::Metrics {
                items: year_metrics(profile),
            });
            blocks.push(Block::narrative(narrative::annual_profile(profile.year)));
            blocks.push(Block::Chart(year_profile_chart(profile)));
        }
        Panel::DecadalComparison { decadal, variable } => {
            blocks.push(Block::heading(2, "Decadal Comparison"));
            blocks.push(Block::Chart(decadal_chart(decadal, *variable)));
            blocks.push(Block::narrative(narrative::DECADAL_EVOLUTION));
        }
        Panel::SeasonalTrend(trend) => {
            blocks.push(Block::heading(2, "Seasonal Analysis"));
            blocks.push(Block::Chart(season_temperature_chart(trend)));
            blocks.push(Block::Chart(season_precipitation_chart(trend)));
            blocks.push(Block::narrative(narrative::seasonal_changes(
                trend.season.label(),
            )));
        }
        Panel::WarmingSummary {
            warming_delta,
            first_year,
            last_year,
        } => blocks.push(Block::Metrics {
            items: vec![Metric::new(
                format!("Warming {first_year}-{last_year}"),
                format!("{warming_delta:+.1}°C"),
                Some("last 5 years vs first 5 years".to_string()),
            )],
        }),
        Panel::Empty { slot, reason } => {
            if let Some(heading) = slot_heading(*slot, filter) {
                blocks.push(Block::heading(2, heading));
            }
            blocks.push(Block::Empty {
                slot: *slot,
                message: reason.clone(),
            });
        }
    }
}

fn slot_heading(slot: PanelSlot, filter: &InsightsFilter) -> Option<String> {
    let heading = match slot {
        PanelSlot::DatasetOverview | PanelSlot::WarmingSummary => return None,
        PanelSlot::AnnualTemperature => "Annual Average Temperature Evolution".to_string(),
        PanelSlot::AnnualPrecipitation => "Annual Precipitation Evolution".to_string(),
        PanelSlot::PeriodDistribution => "Temperature Distribution Comparison".to_string(),
        PanelSlot::MonthlyHeatmap => "Monthly Temperature Heatmap".to_string(),
        PanelSlot::PrecipitationDistribution => "Monthly Precipitation Distribution".to_string(),
        PanelSlot::YearProfile => "Annual Climate Profile".to_string(),
        PanelSlot::DecadalComparison => "Decadal Comparison".to_string(),
        PanelSlot::SeasonalTrend => format!("Seasonal Analysis: {}", filter.season.label()),
    };
    Some(heading)
}

fn year_span(annual: &[AnnualPoint]) -> (i32, i32) {
    let first = annual.first().map(|a| a.year).unwrap_or_default();
    let last = annual.last().map(|a| a.year).unwrap_or(first);
    (first, last)
}

fn years(annual: &[AnnualPoint]) -> XValues {
    XValues::Years(annual.iter().map(|a| a.year).collect())
}

fn annual_temperature_chart(annual: &[AnnualPoint]) -> ChartSpec {
    ChartSpec::new(
        "annual-temperature",
        ChartKind::Line,
        "Temperature Warming Trend Over 35 Years",
    )
    .axes("Year", "Temperature (°C)")
    .trace(Trace::Scatter {
        name: "Annual Temperature".into(),
        x: years(annual),
        y: annual.iter().map(|a| a.mean_temperature).collect(),
        mode: Mode::LinesMarkers,
        color: Some(TEMPERATURE_COLOR.into()),
        width: 2.0,
        fill: false,
        colorscale: None,
    })
}

fn annual_precipitation_chart(annual: &[AnnualPoint]) -> ChartSpec {
    ChartSpec::new(
        "annual-precipitation",
        ChartKind::Area,
        "Precipitation Pattern Changes",
    )
    .axes("Year", "Total Precipitation (mm)")
    .trace(Trace::Scatter {
        name: "Annual Precipitation".into(),
        x: years(annual),
        y: annual.iter().map(|a| a.total_precipitation).collect(),
        mode: Mode::LinesMarkers,
        color: Some(PRECIPITATION_COLOR.into()),
        width: 2.0,
        fill: true,
        colorscale: None,
    })
}

fn period_chart(comparison: &PeriodComparison) -> ChartSpec {
    comparison.periods.iter().fold(
        ChartSpec::new(
            "period-distribution",
            ChartKind::Histogram,
            "Temperature Distribution Shift Between Two Periods",
        )
        .axes("Temperature (°C)", "Frequency (days)"),
        |spec, period| {
            spec.trace(Trace::Histogram {
                name: period.period.label().to_string(),
                edges: period.histogram.edges.clone(),
                counts: period.histogram.counts.clone(),
            })
        },
    )
}

fn period_metrics(comparison: &PeriodComparison) -> Vec<Metric> {
    let early = comparison.get(Period::Early).and_then(|p| p.mean_temperature);
    let recent = comparison.get(Period::Recent).and_then(|p| p.mean_temperature);

    let mut items = Vec::new();
    if let Some(early) = early {
        items.push(Metric::new(
            format!("{} Avg", Period::Early.label()),
            format!("{early:.2}°C"),
            None,
        ));
    }
    if let Some(recent) = recent {
        items.push(Metric::new(
            format!("{} Avg", Period::Recent.label()),
            format!("{recent:.2}°C"),
            early.map(|early| format!("{:+.2}°C", recent - early)),
        ));
    }
    items
}

fn heatmap_chart(grid: &MonthlyGrid) -> ChartSpec {
    ChartSpec::new(
        "monthly-heatmap",
        ChartKind::Heatmap,
        "Temperature Calendar: Seasonal Patterns Over Years",
    )
    .axes("Year", "Month")
    .trace(Trace::Heatmap {
        x: grid.years.clone(),
        y: MONTH_ABBREVIATIONS.iter().map(|m| m.to_string()).collect(),
        z: grid.matrix(),
        colorscale: WARM_COLORSCALE.into(),
        colorbar_title: "Temp (°C)".into(),
    })
}

fn precipitation_box_chart(months: &[MonthlyDistribution]) -> ChartSpec {
    months.iter().fold(
        ChartSpec::new(
            "precipitation-distribution",
            ChartKind::BoxPlot,
            "Seasonal Precipitation Variability",
        )
        .axes("Month", "Precipitation (mm/day)"),
        |spec, month| {
            spec.trace(Trace::Box {
                name: month_abbreviation(month.month).to_string(),
                stats: month.stats.clone(),
            })
        },
    )
}

fn year_metrics(profile: &YearProfile) -> Vec<Metric> {
    let year = profile.year;
    let mut items = Vec::new();
    if let Some(mean) = profile.mean_temperature {
        items.push(Metric::new(
            format!("Avg Temp {year}"),
            format!("{mean:.1}°C"),
            profile
                .temperature_delta
                .map(|d| format!("{d:+.1}°C vs avg")),
        ));
    }
    if let Some(total) = profile.total_precipitation {
        items.push(Metric::new(
            format!("Total Precip {year}"),
            format!("{} mm", thousands(total.round() as i64)),
            profile
                .precipitation_delta
                .map(|d| format!("{d:+.0} mm vs avg")),
        ));
    }
    items
}

/// Format an integer with comma thousands separators.
fn thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn year_profile_chart(profile: &YearProfile) -> ChartSpec {
    let dates: Vec<_> = profile.daily.iter().map(|d| d.date).collect();
    ChartSpec::new(
        "year-profile",
        ChartKind::Area,
        format!("Daily Temperature Profile for {}", profile.year),
    )
    .axes("Date", "Temperature (°C)")
    .height(400)
    .trace(Trace::Scatter {
        name: "Daily Temperature".into(),
        x: XValues::Dates(dates.clone()),
        y: profile.daily.iter().map(|d| d.temperature).collect(),
        mode: Mode::Lines,
        color: Some(TEMPERATURE_COLOR.into()),
        width: 1.0,
        fill: true,
        colorscale: None,
    })
    .trace(Trace::Scatter {
        name: "30-day Moving Average".into(),
        x: XValues::Dates(dates),
        y: profile.daily.iter().map(|d| d.moving_average).collect(),
        mode: Mode::Lines,
        color: Some(TEMPERATURE_DARK_COLOR.into()),
        width: 3.0,
        fill: false,
        colorscale: None,
    })
}

fn decadal_chart(decadal: &DecadalView, variable: Variable) -> ChartSpec {
    let (title, y_title) = match variable {
        Variable::Temperature => ("Monthly Temperature by Decade", "Temperature (°C)"),
        Variable::Precipitation => ("Monthly Precipitation by Decade", "Precipitation (mm/day)"),
    };

    let spec = ChartSpec::new("decadal-comparison", ChartKind::Line, title)
        .axes("Month", y_title)
        .month_axis();

    decadal
        .decades
        .iter()
        .enumerate()
        .fold(spec, |spec, (i, decade)| {
            spec.trace(Trace::Scatter {
                name: decade.label(),
                x: XValues::Months(decade.months.iter().map(|m| m.month).collect()),
                y: decade
                    .months
                    .iter()
                    .map(|m| match variable {
                        Variable::Temperature => m.mean_temperature,
                        Variable::Precipitation => m.mean_precipitation,
                    })
                    .collect(),
                mode: Mode::LinesMarkers,
                color: Some(DECADE_PALETTE[i % DECADE_PALETTE.len()].into()),
                width: 2.5,
                fill: false,
                colorscale: None,
            })
        })
}

fn season_temperature_chart(trend: &SeasonTrend) -> ChartSpec {
    let season = trend.season.label();
    ChartSpec::new(
        "season-temperature",
        ChartKind::Scatter,
        format!("{season} Temperature Trend"),
    )
    .axes("Year", "Average Temperature (°C)")
    .height(400)
    .trace(Trace::Scatter {
        name: format!("{season} Temperature"),
        x: XValues::Years(trend.points.iter().map(|p| p.year).collect()),
        y: trend.points.iter().map(|p| p.mean_temperature).collect(),
        mode: Mode::Markers,
        color: None,
        width: 0.0,
        fill: false,
        colorscale: Some(WARM_COLORSCALE.into()),
    })
}

fn season_precipitation_chart(trend: &SeasonTrend) -> ChartSpec {
    let season = trend.season.label();
    let spec = ChartSpec::new(
        "season-precipitation",
        ChartKind::Bar,
        format!("{season} Precipitation Pattern"),
    )
    .axes("Year", "Total Precipitation (mm)")
    .height(400)
    .trace(Trace::Bar {
        name: format!("{season} Precipitation"),
        x: XValues::Years(trend.points.iter().map(|p| p.year).collect()),
        y: trend.points.iter().map(|p| p.total_precipitation).collect(),
        color: PRECIPITATION_COLOR.into(),
    });

    match trend.average_total_precipitation {
        Some(avg) => spec.reference_line(avg, format!("Average: {avg:.0} mm")),
        None => spec,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::ClimateViews;
    use crate::views::select;
    use chrono::NaiveDate;

    fn views() -> ClimateViews {
        let records = (1..=12)
            .map(|m| {
                ClimateRecord::new(
                    NaiveDate::from_ymd_opt(2020, m, 10).unwrap(),
                    Some(m as f64),
                    Some(2.0),
                )
            })
            .collect();
        ClimateViews::build(&ClimateTable::from_sorted(records).unwrap())
    }

    #[test]
    fn thousands_inserts_separators() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(-1234567), "-1,234,567");
    }

    #[test]
    fn analysis_renders_five_charts() {
        let views = views();
        let selection = select(&views, Section::Analysis, &InsightsFilter::default());
        let rendered = render_section(&selection);
        let ids: Vec<&str> = rendered.charts().map(|c| c.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "annual-temperature",
                "annual-precipitation",
                "period-distribution",
                "monthly-heatmap",
                "precipitation-distribution",
            ]
        );
        assert!(rendered.filter.is_none());
    }

    #[test]
    fn insights_metrics_describe_selected_year() {
        let views = views();
        let selection = select(&views, Section::Insights, &InsightsFilter::default());
        let rendered = render_section(&selection);
        let metrics = rendered
            .blocks
            .iter()
            .find_map(|b| match b {
                Block::Metrics { items } => Some(items),
                _ => None,
            })
            .unwrap();
        assert_eq!(metrics[0].label, "Avg Temp 2020");
        assert_eq!(metrics[0].value, "6.5°C");
        assert_eq!(metrics[1].value, "24 mm");
        assert_eq!(rendered.filter.and_then(|f| f.year), Some(2020));
    }

    #[test]
    fn decadal_chart_follows_selected_variable() {
        let views = views();
        let filter = InsightsFilter {
            variable: Variable::Precipitation,
            ..InsightsFilter::default()
        };
        let rendered = render_section(&select(&views, Section::Insights, &filter));
        let chart = rendered
            .charts()
            .find(|c| c.id == "decadal-comparison")
            .unwrap();
        assert_eq!(chart.title, "Monthly Precipitation by Decade");
        assert!(chart.month_axis);
    }

    #[test]
    fn empty_views_render_placeholders_everywhere() {
        let views = ClimateViews::default();
        for section in Section::ALL {
            let rendered = render_section(&select(&views, section, &InsightsFilter::default()));
            assert_eq!(rendered.charts().count(), 0);
            assert!(rendered.empty_states().count() > 0);
        }
    }
}

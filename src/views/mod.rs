//! Navigation state and view selection.
//!
//! A request names a [`Section`] and, for Insights, an [`InsightsFilter`].
//! [`select`] maps that pair onto the precomputed [`ClimateViews`] without
//! computing anything new. Every section/filter combination is valid; a
//! filter matching no data produces [`Panel::Empty`] rather than an error.

use serde::{Deserialize, Serialize};

use crate::aggregate::ClimateViews;
use crate::models::*;

/// The four navigation sections of the dashboard, in sidebar order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Problem,
    Analysis,
    Insights,
    Conclusion,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Self::Problem,
        Self::Analysis,
        Self::Insights,
        Self::Conclusion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Problem => "problem",
            Self::Analysis => "analysis",
            Self::Insights => "insights",
            Self::Conclusion => "conclusion",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "problem" => Some(Self::Problem),
            "analysis" => Some(Self::Analysis),
            "insights" => Some(Self::Insights),
            "conclusion" => Some(Self::Conclusion),
            _ => None,
        }
    }

    /// Label shown in the sidebar.
    pub fn nav_label(&self) -> &'static str {
        match self {
            Self::Problem => "1. THE PROBLEM",
            Self::Analysis => "2. ANALYSIS",
            Self::Insights => "3. INTERACTIVE INSIGHTS",
            Self::Conclusion => "4. CONCLUSION",
        }
    }
}

/// Variable compared in the decadal chart.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Variable {
    #[default]
    Temperature,
    Precipitation,
}

impl Variable {
    pub const ALL: [Variable; 2] = [Self::Temperature, Self::Precipitation];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Precipitation => "precipitation",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Temperature => "Temperature",
            Self::Precipitation => "Precipitation",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "temperature" => Some(Self::Temperature),
            "precipitation" => Some(Self::Precipitation),
            _ => None,
        }
    }
}

/// User choices within the Insights section.
///
/// `year: None` means "the most recent year in the dataset".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct InsightsFilter {
    pub year: Option<i32>,
    pub variable: Variable,
    pub season: Season,
}

impl Default for InsightsFilter {
    fn default() -> Self {
        Self {
            year: None,
            variable: Variable::Temperature,
            season: Season::Winter,
        }
    }
}

/// One block of content selected for rendering, borrowing from the cached views.
#[derive(Debug, Clone, PartialEq)]
pub enum Panel<'a> {
    /// Record count and covered years.
    DatasetOverview {
        records: usize,
        first_year: i32,
        last_year: i32,
    },
    AnnualTemperature {
        annual: &'a [AnnualPoint],
        warming_delta: Option<f64>,
    },
    AnnualPrecipitation(&'a [AnnualPoint]),
    PeriodDistribution(&'a PeriodComparison),
    MonthlyHeatmap(&'a MonthlyGrid),
    PrecipitationDistribution(&'a [MonthlyDistribution]),
    YearProfile(&'a YearProfile),
    DecadalComparison {
        decadal: &'a DecadalView,
        variable: Variable,
    },
    SeasonalTrend(&'a SeasonTrend),
    WarmingSummary {
        warming_delta: f64,
        first_year: i32,
        last_year: i32,
    },
    /// Nothing to show for this slot; `slot` names the chart that would have been drawn.
    Empty { slot: PanelSlot, reason: String },
}

/// Identifies a panel position independently of whether data exists for it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PanelSlot {
    DatasetOverview,
    AnnualTemperature,
    AnnualPrecipitation,
    PeriodDistribution,
    MonthlyHeatmap,
    PrecipitationDistribution,
    YearProfile,
    DecadalComparison,
    SeasonalTrend,
    WarmingSummary,
}

/// The panels chosen for one section, plus the filter actually applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<'a> {
    pub section: Section,
    /// The requested filter with `year` resolved to a concrete value where possible.
    pub filter: InsightsFilter,
    pub years: &'a [i32],
    pub panels: Vec<Panel<'a>>,
}

const NO_DATA: &str = "No data available in the loaded dataset.";

fn empty(slot: PanelSlot, reason: impl Into<String>) -> Panel<'static> {
    Panel::Empty {
        slot,
        reason: reason.into(),
    }
}

/// Pick the panels for `section` from the cached views.
pub fn select<'a>(
    views: &'a ClimateViews,
    section: Section,
    filter: &InsightsFilter,
) -> Selection<'a> {
    let mut filter = *filter;
    let panels = match section {
        Section::Problem => vec![overview(views)],
        Section::Analysis => analysis(views),
        Section::Insights => {
            filter.year = filter.year.or_else(|| views.latest_year());
            insights(views, &filter)
        }
        Section::Conclusion => vec![warming_summary(views)],
    };

    for panel in &panels {
        if let Panel::Empty { slot, reason } = panel {
            tracing::debug!(?slot, %reason, "Empty selection");
        }
    }

    Selection {
        section,
        filter,
        years: &views.years,
        panels,
    }
}

fn overview(views: &ClimateViews) -> Panel<'_> {
    match (views.years.first(), views.years.last()) {
        (Some(&first_year), Some(&last_year)) => Panel::DatasetOverview {
            records: views.records,
            first_year,
            last_year,
        },
        _ => empty(PanelSlot::DatasetOverview, NO_DATA),
    }
}

fn analysis(views: &ClimateViews) -> Vec<Panel<'_>> {
    let has_temperature = views.annual.iter().any(|a| a.mean_temperature.is_some());
    let has_precipitation = views.annual.iter().any(|a| a.total_precipitation.is_some());

    vec![
        if has_temperature {
            Panel::AnnualTemperature {
                annual: &views.annual,
                warming_delta: views.warming_delta,
            }
        } else {
            empty(PanelSlot::AnnualTemperature, NO_DATA)
        },
        if has_precipitation {
            Panel::AnnualPrecipitation(&views.annual)
        } else {
            empty(PanelSlot::AnnualPrecipitation, NO_DATA)
        },
        if has_temperature {
            Panel::PeriodDistribution(&views.periods)
        } else {
            empty(PanelSlot::PeriodDistribution, NO_DATA)
        },
        if views.grid.cells.iter().any(|c| c.mean_temperature.is_some()) {
            Panel::MonthlyHeatmap(&views.grid)
        } else {
            empty(PanelSlot::MonthlyHeatmap, NO_DATA)
        },
        if views.precipitation_distribution.is_empty() {
            empty(PanelSlot::PrecipitationDistribution, NO_DATA)
        } else {
            Panel::PrecipitationDistribution(&views.precipitation_distribution)
        },
    ]
}

fn insights<'a>(views: &'a ClimateViews, filter: &InsightsFilter) -> Vec<Panel<'a>> {
    let profile = match filter.year {
        Some(year) => match views.profile(year) {
            Some(profile) => Panel::YearProfile(profile),
            None => empty(PanelSlot::YearProfile, missing_year_reason(views, year)),
        },
        None => empty(PanelSlot::YearProfile, NO_DATA),
    };

    let decadal = if views.decadal.decades.is_empty() {
        empty(PanelSlot::DecadalComparison, NO_DATA)
    } else {
        Panel::DecadalComparison {
            decadal: &views.decadal,
            variable: filter.variable,
        }
    };

    let seasonal = match views.seasonal.trend(filter.season) {
        Some(trend) => Panel::SeasonalTrend(trend),
        None => empty(
            PanelSlot::SeasonalTrend,
            format!("No {} data in the loaded dataset.", filter.season.label()),
        ),
    };

    vec![profile, decadal, seasonal]
}

fn missing_year_reason(views: &ClimateViews, year: i32) -> String {
    match (views.years.first(), views.years.last()) {
        (Some(first), Some(last)) => {
            format!("No data for {year}. Available years: {first}-{last}.")
        }
        _ => format!("No data for {year}."),
    }
}

fn warming_summary(views: &ClimateViews) -> Panel<'_> {
    match (views.warming_delta, views.years.first(), views.years.last()) {
        (Some(warming_delta), Some(&first_year), Some(&last_year)) => Panel::WarmingSummary {
            warming_delta,
            first_year,
            last_year,
        },
        _ => empty(PanelSlot::WarmingSummary, NO_DATA),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClimateTable;
    use chrono::NaiveDate;

    fn views() -> ClimateViews {
        let records = [(2019, 1), (2019, 7), (2020, 1), (2020, 7)]
            .into_iter()
            .map(|(y, m)| {
                ClimateRecord::new(
                    NaiveDate::from_ymd_opt(y, m, 1).unwrap(),
                    Some(m as f64),
                    Some(1.0),
                )
            })
            .collect();
        ClimateViews::build(&ClimateTable::from_sorted(records).unwrap())
    }

    #[test]
    fn section_slugs_round_trip() {
        for section in Section::ALL {
            assert_eq!(Section::from_str(section.as_str()), Some(section));
        }
        assert_eq!(Section::from_str("settings"), None);
    }

    #[test]
    fn insights_defaults_to_latest_year() {
        let views = views();
        let selection = select(&views, Section::Insights, &InsightsFilter::default());
        assert_eq!(selection.filter.year, Some(2020));
        assert!(matches!(selection.panels[0], Panel::YearProfile(p) if p.year == 2020));
    }

    #[test]
    fn unknown_year_yields_empty_panel() {
        let views = views();
        let filter = InsightsFilter {
            year: Some(1950),
            ..InsightsFilter::default()
        };
        let selection = select(&views, Section::Insights, &filter);
        match &selection.panels[0] {
            Panel::Empty { slot, reason } => {
                assert_eq!(*slot, PanelSlot::YearProfile);
                assert!(reason.contains("2019-2020"));
            }
            other => panic!("expected empty panel, got {other:?}"),
        }
        // The other insights panels are unaffected.
        assert!(matches!(selection.panels[1], Panel::DecadalComparison { .. }));
    }

    #[test]
    fn missing_season_yields_empty_panel() {
        let views = views();
        let filter = InsightsFilter {
            season: Season::Spring,
            ..InsightsFilter::default()
        };
        let selection = select(&views, Section::Insights, &filter);
        assert!(matches!(
            selection.panels[2],
            Panel::Empty {
                slot: PanelSlot::SeasonalTrend,
                ..
            }
        ));
    }

    #[test]
    fn analysis_has_five_charts() {
        let views = views();
        let selection = select(&views, Section::Analysis, &InsightsFilter::default());
        assert_eq!(selection.panels.len(), 5);
        assert!(selection
            .panels
            .iter()
            .all(|p| !matches!(p, Panel::Empty { .. })));
    }

    #[test]
    fn every_section_is_empty_without_data() {
        let views = ClimateViews::default();
        for section in Section::ALL {
            let selection = select(&views, section, &InsightsFilter::default());
            assert!(!selection.panels.is_empty());
            assert!(selection
                .panels
                .iter()
                .all(|p| matches!(p, Panel::Empty { .. })));
        }
    }
}

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Period, Season};

/// Yearly summary. One entry per year having at least one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualPoint {
    pub year: i32,
    pub mean_temperature: Option<f64>,
    /// Sum of daily precipitation over the year, in mm.
    pub total_precipitation: Option<f64>,
    pub mean_precipitation: Option<f64>,
    /// Number of daily records in the year.
    pub days: usize,
}

/// Mean of one calendar month across all years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    pub month: u32,
    pub mean_temperature: Option<f64>,
    pub mean_precipitation: Option<f64>,
    pub days: usize,
}

/// One cell of the month-by-year temperature heatmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyCell {
    pub year: i32,
    pub month: u32,
    pub mean_temperature: Option<f64>,
}

/// Temperature grid used by the heatmap: rows are months, columns are years.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyGrid {
    pub years: Vec<i32>,
    pub cells: Vec<MonthlyCell>,
}

impl MonthlyGrid {
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Dense `12 x years.len()` matrix, `None` where a month has no data.
    pub fn matrix(&self) -> Vec<Vec<Option<f64>>> {
        let lookup: BTreeMap<(u32, i32), Option<f64>> = self
            .cells
            .iter()
            .map(|c| ((c.month, c.year), c.mean_temperature))
            .collect();
        (1..=12)
            .map(|month| {
                self.years
                    .iter()
                    .map(|year| lookup.get(&(month, *year)).copied().flatten())
                    .collect()
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonSummary {
    pub season: Season,
    pub mean_temperature: Option<f64>,
    pub mean_precipitation: Option<f64>,
    pub days: usize,
}

/// A season's values for one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonYearPoint {
    pub year: i32,
    pub mean_temperature: Option<f64>,
    pub total_precipitation: Option<f64>,
}

/// Yearly trend of a single season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonTrend {
    pub season: Season,
    pub points: Vec<SeasonYearPoint>,
    /// Mean of the yearly precipitation totals, drawn as a reference line.
    pub average_total_precipitation: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonalView {
    pub summaries: Vec<SeasonSummary>,
    pub trends: Vec<SeasonTrend>,
}

impl SeasonalView {
    pub fn trend(&self, season: Season) -> Option<&SeasonTrend> {
        self.trends.iter().find(|t| t.season == season)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecadeMonthPoint {
    pub month: u32,
    pub mean_temperature: Option<f64>,
    pub mean_precipitation: Option<f64>,
}

/// Values of one decade: overall means plus a monthly profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecadeSummary {
    pub decade: i32,
    pub mean_temperature: Option<f64>,
    pub mean_precipitation: Option<f64>,
    pub months: Vec<DecadeMonthPoint>,
}

impl DecadeSummary {
    pub fn label(&self) -> String {
        format!("{}s", self.decade)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecadalView {
    pub decades: Vec<DecadeSummary>,
}

/// Histogram over shared bin edges; `counts.len() + 1 == edges.len()`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodDistribution {
    pub period: Period,
    pub mean_temperature: Option<f64>,
    pub histogram: Histogram,
    pub days: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodComparison {
    pub periods: Vec<PeriodDistribution>,
}

impl PeriodComparison {
    pub fn get(&self, period: Period) -> Option<&PeriodDistribution> {
        self.periods.iter().find(|p| p.period == period)
    }
}

/// Five-number summary plus mean and sample standard deviation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxStats {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
    /// `None` with fewer than two values.
    pub std_dev: Option<f64>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyDistribution {
    pub month: u32,
    pub stats: BoxStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub temperature: Option<f64>,
    /// 30-day centred moving average.
    pub moving_average: Option<f64>,
}

/// Everything the Insights section shows for one selected year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearProfile {
    pub year: i32,
    pub daily: Vec<DailyPoint>,
    pub mean_temperature: Option<f64>,
    /// Year mean minus the mean over all records.
    pub temperature_delta: Option<f64>,
    pub total_precipitation: Option<f64>,
    /// Year total minus the mean of all annual totals.
    pub precipitation_delta: Option<f64>,
}

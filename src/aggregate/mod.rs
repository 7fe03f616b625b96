//! Derived views over the climate table.
//!
//! Every function here is a pure function of a [`ClimateTable`]: no I/O, no
//! interior state, and records are always visited in date order. Calling any
//! of them twice on the same table yields bit-identical results, so the
//! results are computed once at startup and cached in [`ClimateViews`].

pub mod stats;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::*;
use stats::{bin_edges, box_stats, centered_moving_average, histogram, mean_of, Accumulator};

/// Number of bins in the period temperature histograms.
pub const HISTOGRAM_BINS: usize = 50;

/// Window of the daily temperature moving average, in records.
pub const MOVING_AVERAGE_WINDOW: usize = 30;

/// Years averaged at each end of the series for the warming delta.
pub const WARMING_WINDOW_YEARS: usize = 5;

#[derive(Debug, Clone, Copy, Default)]
struct DayBucket {
    temperature: Accumulator,
    precipitation: Accumulator,
    days: usize,
}

impl DayBucket {
    fn push(&mut self, record: &ClimateRecord) {
        self.temperature.push(record.temperature);
        self.precipitation.push(record.precipitation);
        self.days += 1;
    }
}

fn group_by<K: Ord>(
    records: &[ClimateRecord],
    key: impl Fn(&ClimateRecord) -> K,
) -> BTreeMap<K, DayBucket> {
    let mut groups: BTreeMap<K, DayBucket> = BTreeMap::new();
    for record in records {
        groups.entry(key(record)).or_default().push(record);
    }
    groups
}

/// Mean temperature and precipitation per year, one entry per year with data.
pub fn annual(table: &ClimateTable) -> Vec<AnnualPoint> {
    group_by(table.records(), ClimateRecord::year)
        .into_iter()
        .map(|(year, bucket)| AnnualPoint {
            year,
            mean_temperature: bucket.temperature.mean(),
            total_precipitation: bucket.precipitation.total(),
            mean_precipitation: bucket.precipitation.mean(),
            days: bucket.days,
        })
        .collect()
}

/// Means per calendar month across all years. Months without records are absent.
pub fn monthly_climatology(table: &ClimateTable) -> Vec<MonthlyPoint> {
    group_by(table.records(), ClimateRecord::month)
        .into_iter()
        .map(|(month, bucket)| MonthlyPoint {
            month,
            mean_temperature: bucket.temperature.mean(),
            mean_precipitation: bucket.precipitation.mean(),
            days: bucket.days,
        })
        .collect()
}

/// Mean temperature for every `(year, month)` that has records.
pub fn monthly_grid(table: &ClimateTable) -> MonthlyGrid {
    let cells = group_by(table.records(), |r| (r.year(), r.month()))
        .into_iter()
        .map(|((year, month), bucket)| MonthlyCell {
            year,
            month,
            mean_temperature: bucket.temperature.mean(),
        })
        .collect();

    MonthlyGrid {
        years: table.years(),
        cells,
    }
}

pub fn seasonal(table: &ClimateTable) -> SeasonalView {
    let summaries = group_by(table.records(), ClimateRecord::season)
        .into_iter()
        .map(|(season, bucket)| SeasonSummary {
            season,
            mean_temperature: bucket.temperature.mean(),
            mean_precipitation: bucket.precipitation.mean(),
            days: bucket.days,
        })
        .collect();

    let mut per_season: BTreeMap<Season, Vec<SeasonYearPoint>> = BTreeMap::new();
    for ((season, year), bucket) in group_by(table.records(), |r| (r.season(), r.year())) {
        per_season.entry(season).or_default().push(SeasonYearPoint {
            year,
            mean_temperature: bucket.temperature.mean(),
            total_precipitation: bucket.precipitation.total(),
        });
    }

    let trends = per_season
        .into_iter()
        .map(|(season, points)| {
            let average_total_precipitation =
                mean_of(points.iter().filter_map(|p| p.total_precipitation));
            SeasonTrend {
                season,
                points,
                average_total_precipitation,
            }
        })
        .collect();

    SeasonalView { summaries, trends }
}

pub fn decadal(table: &ClimateTable) -> DecadalView {
    let mut months: BTreeMap<i32, Vec<DecadeMonthPoint>> = BTreeMap::new();
    for ((decade, month), bucket) in group_by(table.records(), |r| (r.decade(), r.month())) {
        months.entry(decade).or_default().push(DecadeMonthPoint {
            month,
            mean_temperature: bucket.temperature.mean(),
            mean_precipitation: bucket.precipitation.mean(),
        });
    }

    let decades = group_by(table.records(), ClimateRecord::decade)
        .into_iter()
        .map(|(decade, bucket)| DecadeSummary {
            decade,
            mean_temperature: bucket.temperature.mean(),
            mean_precipitation: bucket.precipitation.mean(),
            months: months.remove(&decade).unwrap_or_default(),
        })
        .collect();

    DecadalView { decades }
}

/// Temperature distribution of each period over shared histogram bins.
pub fn period_comparison(table: &ClimateTable) -> PeriodComparison {
    let temperatures: Vec<f64> = table.records().iter().filter_map(|r| r.temperature).collect();
    let edges = match (
        temperatures.iter().copied().reduce(f64::min),
        temperatures.iter().copied().reduce(f64::max),
    ) {
        (Some(min), Some(max)) => bin_edges(min, max, HISTOGRAM_BINS),
        _ => Vec::new(),
    };

    let mut by_period: BTreeMap<Period, (Vec<f64>, usize)> = BTreeMap::new();
    for record in table.records() {
        let (values, days) = by_period.entry(record.period()).or_default();
        values.extend(record.temperature);
        *days += 1;
    }

    let periods = by_period
        .into_iter()
        .map(|(period, (values, days))| PeriodDistribution {
            period,
            mean_temperature: mean_of(values.iter().copied()),
            histogram: histogram(&values, &edges),
            days,
        })
        .collect();

    PeriodComparison { periods }
}

/// Box-plot statistics of daily precipitation for each month with data.
pub fn monthly_precipitation_distribution(table: &ClimateTable) -> Vec<MonthlyDistribution> {
    let mut by_month: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for record in table.records() {
        if let Some(p) = record.precipitation {
            by_month.entry(record.month()).or_default().push(p);
        }
    }

    by_month
        .into_iter()
        .filter_map(|(month, values)| {
            box_stats(&values).map(|stats| MonthlyDistribution { month, stats })
        })
        .collect()
}

/// Mean of the last five annual temperatures minus the mean of the first five.
///
/// The windows are the first and last five years of the series. A year
/// without temperature stays in its window but does not count towards the
/// mean. With fewer than ten years the windows overlap.
pub fn warming_delta(annual: &[AnnualPoint]) -> Option<f64> {
    let k = annual.len().min(WARMING_WINDOW_YEARS);
    let window_mean =
        |window: &[AnnualPoint]| mean_of(window.iter().filter_map(|a| a.mean_temperature));
    let early = window_mean(&annual[..k])?;
    let recent = window_mean(&annual[annual.len() - k..])?;
    Some(recent - early)
}

/// Mean over every temperature reading in the table.
pub fn overall_mean_temperature(table: &ClimateTable) -> Option<f64> {
    mean_of(table.records().iter().filter_map(|r| r.temperature))
}

/// Daily profile and headline metrics for one year, `None` if the year has no records.
pub fn year_profile(table: &ClimateTable, annual: &[AnnualPoint], year: i32) -> Option<YearProfile> {
    let records = table.records_in_year(year);
    let point = annual.iter().find(|a| a.year == year)?;
    if records.is_empty() {
        return None;
    }

    let temperatures: Vec<Option<f64>> = records.iter().map(|r| r.temperature).collect();
    let moving = centered_moving_average(&temperatures, MOVING_AVERAGE_WINDOW);
    let daily = records
        .iter()
        .zip(moving)
        .map(|(record, moving_average)| DailyPoint {
            date: record.date,
            temperature: record.temperature,
            moving_average,
        })
        .collect();

    let overall_temperature = overall_mean_temperature(table);
    let mean_annual_total = mean_of(annual.iter().filter_map(|a| a.total_precipitation));

    Some(YearProfile {
        year,
        daily,
        mean_temperature: point.mean_temperature,
        temperature_delta: point
            .mean_temperature
            .zip(overall_temperature)
            .map(|(y, all)| y - all),
        total_precipitation: point.total_precipitation,
        precipitation_delta: point
            .total_precipitation
            .zip(mean_annual_total)
            .map(|(y, all)| y - all),
    })
}

/// Every aggregated view of the dataset, computed once and shared read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClimateViews {
    pub records: usize,
    pub years: Vec<i32>,
    pub annual: Vec<AnnualPoint>,
    pub monthly: Vec<MonthlyPoint>,
    pub grid: MonthlyGrid,
    pub seasonal: SeasonalView,
    pub decadal: DecadalView,
    pub periods: PeriodComparison,
    pub precipitation_distribution: Vec<MonthlyDistribution>,
    pub warming_delta: Option<f64>,
    pub profiles: BTreeMap<i32, YearProfile>,
}

impl ClimateViews {
    pub fn build(table: &ClimateTable) -> Self {
        let annual = annual(table);
        let profiles = table
            .years()
            .into_iter()
            .filter_map(|year| year_profile(table, &annual, year).map(|p| (year, p)))
            .collect();

        let views = Self {
            records: table.len(),
            years: table.years(),
            warming_delta: warming_delta(&annual),
            monthly: monthly_climatology(table),
            grid: monthly_grid(table),
            seasonal: seasonal(table),
            decadal: decadal(table),
            periods: period_comparison(table),
            precipitation_distribution: monthly_precipitation_distribution(table),
            annual,
            profiles,
        };
        tracing::debug!(
            records = views.records,
            years = views.years.len(),
            "Aggregated climate views"
        );
        views
    }

    pub fn is_empty(&self) -> bool {
        self.records == 0
    }

    pub fn latest_year(&self) -> Option<i32> {
        self.years.last().copied()
    }

    pub fn profile(&self, year: i32) -> Option<&YearProfile> {
        self.profiles.get(&year)
    }
}

//! Domain models for the climate dashboard.
//!
//! # Core Concepts
//!
//! ## Raw Data
//!
//! - [`ClimateRecord`]: One day of temperature/precipitation observations.
//! - [`ClimateTable`]: All records, sorted by date with unique dates. Loaded once
//!   at startup and never mutated afterwards.
//!
//! ## Derived Views
//!
//! Every view is computed once from the table and shared read-only:
//!
//! - [`AnnualPoint`], [`MonthlyPoint`], [`MonthlyCell`]: per-year and per-month means.
//! - [`SeasonalView`], [`DecadalView`]: groupings by [`Season`] and decade.
//! - [`PeriodComparison`], [`MonthlyDistribution`]: distribution plots.
//! - [`YearProfile`]: daily series and summary metrics for a single year.

mod record;
mod table;
mod view;

pub use record::*;
pub use table::*;
pub use view::*;

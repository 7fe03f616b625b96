use std::collections::BTreeSet;

use serde::Serialize;

use super::ClimateRecord;

/// The full daily dataset, sorted by date with no duplicate dates.
///
/// Gaps between dates are allowed. The table is only built by the loader
/// (or [`ClimateTable::from_sorted`] in tests) and is read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClimateTable {
    records: Vec<ClimateRecord>,
}

impl ClimateTable {
    /// Build a table from records already sorted by strictly increasing date.
    ///
    /// Returns `None` if the ordering or uniqueness invariant does not hold.
    pub fn from_sorted(records: Vec<ClimateRecord>) -> Option<Self> {
        let ordered = records.windows(2).all(|pair| pair[0].date < pair[1].date);
        ordered.then_some(Self { records })
    }

    /// Wrap records whose order and uniqueness the caller has already checked.
    pub(crate) fn from_checked(records: Vec<ClimateRecord>) -> Self {
        debug_assert!(records.windows(2).all(|pair| pair[0].date < pair[1].date));
        Self { records }
    }

    pub fn records(&self) -> &[ClimateRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct years present in the table, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.records
            .iter()
            .map(ClimateRecord::year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Records of a single calendar year, in date order.
    pub fn records_in_year(&self, year: i32) -> &[ClimateRecord] {
        let start = self.records.partition_point(|r| r.year() < year);
        let end = self.records.partition_point(|r| r.year() <= year);
        &self.records[start..end]
    }
}

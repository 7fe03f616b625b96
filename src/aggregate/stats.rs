//! Small numeric helpers shared by the aggregations.

use crate::models::{BoxStats, Histogram};

/// Running sum and count over present values.
///
/// Values are summed in insertion order, so feeding the same sequence twice
/// yields bit-identical results.
#[derive(Debug, Clone, Copy, Default)]
pub struct Accumulator {
    sum: f64,
    count: usize,
}

impl Accumulator {
    pub fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }

    /// Sum of present values, `None` when nothing was observed.
    pub fn total(&self) -> Option<f64> {
        (self.count > 0).then_some(self.sum)
    }
}

pub fn mean_of(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let mut acc = Accumulator::default();
    for v in values {
        acc.push(Some(v));
    }
    acc.mean()
}

/// Linear-interpolated quantile of an ascending slice.
pub fn quantile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let count = sorted.len();
    let mean = mean_of(values.iter().copied())?;
    let std_dev = (count > 1).then(|| {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (count - 1) as f64).sqrt()
    });

    Some(BoxStats {
        min: sorted[0],
        q1: quantile(&sorted, 0.25)?,
        median: quantile(&sorted, 0.5)?,
        q3: quantile(&sorted, 0.75)?,
        max: sorted[count - 1],
        mean,
        std_dev,
        count,
    })
}

/// Equal-width bin edges spanning `[min, max]`.
///
/// A degenerate range is widened by half a unit on each side so that a single
/// repeated value still lands in a bin.
pub fn bin_edges(min: f64, max: f64, bins: usize) -> Vec<f64> {
    let bins = bins.max(1);
    let (lo, hi) = if max > min {
        (min, max)
    } else {
        (min - 0.5, max + 0.5)
    };
    let width = (hi - lo) / bins as f64;
    (0..=bins).map(|i| lo + width * i as f64).collect()
}

/// Count `values` into the bins described by `edges`. The last bin is closed.
pub fn histogram(values: &[f64], edges: &[f64]) -> Histogram {
    let bins = edges.len().saturating_sub(1);
    let mut counts = vec![0; bins];
    if bins == 0 {
        return Histogram {
            edges: edges.to_vec(),
            counts,
        };
    }

    let lo = edges[0];
    let width = (edges[bins] - lo) / bins as f64;
    for v in values {
        let idx = ((v - lo) / width).floor();
        if idx < 0.0 {
            continue;
        }
        let idx = (idx as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Histogram {
        edges: edges.to_vec(),
        counts,
    }
}

/// Centred moving average over `window` consecutive values.
///
/// Position `i` averages indices `i - window/2 ..= i + (window-1)/2`; the
/// result is `None` whenever that span leaves the series or contains a gap.
pub fn centered_moving_average(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let before = window / 2;
    let after = window.saturating_sub(1) / 2;

    (0..values.len())
        .map(|i| {
            if window == 0 || i < before || i + after >= values.len() {
                return None;
            }
            let span = &values[i - before..=i + after];
            let mut acc = Accumulator::default();
            for v in span {
                acc.push(Some((*v)?));
            }
            acc.mean()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulator_skips_missing_values() {
        let mut acc = Accumulator::default();
        acc.push(Some(2.0));
        acc.push(None);
        acc.push(Some(4.0));
        assert_eq!(acc.count(), 2);
        assert_eq!(acc.mean(), Some(3.0));
        assert_eq!(acc.total(), Some(6.0));
    }

    #[test]
    fn empty_accumulator_has_no_mean_or_total() {
        let acc = Accumulator::default();
        assert_eq!(acc.mean(), None);
        assert_eq!(acc.total(), None);
    }

    #[test]
    fn quantile_interpolates_between_ranks() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&sorted, 0.0), Some(1.0));
        assert_eq!(quantile(&sorted, 0.5), Some(2.5));
        assert_eq!(quantile(&sorted, 0.25), Some(1.75));
        assert_eq!(quantile(&sorted, 1.0), Some(4.0));
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn box_stats_of_single_value() {
        let stats = box_stats(&[3.0]).unwrap();
        assert_eq!(stats.min, 3.0);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.max, 3.0);
        assert_eq!(stats.std_dev, None);
        assert_eq!(stats.count, 1);
    }

    #[test]
    fn box_stats_uses_sample_standard_deviation() {
        let stats = box_stats(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(stats.mean, 5.0);
        let sd = stats.std_dev.unwrap();
        assert!((sd - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn histogram_puts_max_in_last_bin() {
        let edges = bin_edges(0.0, 10.0, 5);
        assert_eq!(edges, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        let hist = histogram(&[0.0, 1.9, 2.0, 10.0], &edges);
        assert_eq!(hist.counts, vec![2, 1, 0, 0, 1]);
    }

    #[test]
    fn degenerate_range_still_has_bins() {
        let edges = bin_edges(4.0, 4.0, 2);
        assert_eq!(edges, vec![3.5, 4.0, 4.5]);
        let hist = histogram(&[4.0, 4.0], &edges);
        assert_eq!(hist.counts.iter().sum::<usize>(), 2);
    }

    #[test]
    fn moving_average_requires_full_window() {
        let values: Vec<Option<f64>> = (0..5).map(|v| Some(v as f64)).collect();
        let ma = centered_moving_average(&values, 3);
        assert_eq!(ma, vec![None, Some(1.0), Some(2.0), Some(3.0), None]);
    }

    #[test]
    fn moving_average_with_even_window_leans_backwards() {
        let values: Vec<Option<f64>> = (0..6).map(|v| Some(v as f64)).collect();
        let ma = centered_moving_average(&values, 4);
        // i = 2 averages indices 0..=3
        assert_eq!(ma, vec![None, None, Some(1.5), Some(2.5), Some(3.5), None]);
    }

    #[test]
    fn moving_average_breaks_on_gaps() {
        let values = vec![Some(1.0), None, Some(3.0), Some(4.0), Some(5.0)];
        let ma = centered_moving_average(&values, 3);
        assert_eq!(ma, vec![None, None, None, Some(4.0), None]);
    }
}

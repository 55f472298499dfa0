// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::Error;

use std::cmp::Ordering;
use std::path::Path;

/// Number of steps the unit interval is divided into. The series samples
/// every interior step, `1/STEPS ..= (STEPS-1)/STEPS`.
pub const STEPS: usize = 1000;

/// Returns the `q` quantile of `sorted` by linear interpolation between the
/// two order statistics around `q * (n - 1)`.
///
/// `sorted` must be non-empty and in ascending order, `q` within `0.0..=1.0`.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    debug_assert!((0.0..=1.0).contains(&q));

    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

fn sort(values: &mut [f64]) {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
}

/// A point on the CDF: the latency at or below which `percentile` percent of
/// the transactions fall.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub latency: f64,
    pub percentile: f64,
}

/// The empirical CDF of per-transaction latencies, sampled at every 0.1%.
#[derive(Clone, Debug)]
pub struct QuantileSeries {
    sorted: Vec<f64>,
    points: Vec<Point>,
}

impl QuantileSeries {
    /// Builds the series from an unordered collection of latencies. Fails
    /// with `Error::NoTransactions` when `values` is empty; `source` names
    /// where the values came from in that error.
    pub fn from_values<I>(values: I, source: &Path) -> Result<Self, Error>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sorted: Vec<f64> = values.into_iter().collect();
        if sorted.is_empty() {
            return Err(Error::NoTransactions {
                path: source.to_path_buf(),
            });
        }
        sort(&mut sorted);

        let points = (1..STEPS)
            .map(|step| {
                let q = step as f64 / STEPS as f64;
                Point {
                    latency: quantile(&sorted, q),
                    percentile: q * 100.0,
                }
            })
            .collect();

        Ok(Self { sorted, points })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Interpolated latency at an arbitrary quantile of the underlying data,
    /// including the extremes which the plotted series omits.
    pub fn latency_at(&self, q: f64) -> f64 {
        quantile(&self.sorted, q.max(0.0).min(1.0))
    }

    /// Lowest plotted latency.
    pub fn min_latency(&self) -> f64 {
        self.points.first().map(|p| p.latency).unwrap_or_default()
    }

    /// Highest plotted latency.
    pub fn max_latency(&self) -> f64 {
        self.points.last().map(|p| p.latency).unwrap_or_default()
    }

    /// Number of values the series was computed from.
    pub fn transactions(&self) -> usize {
        self.sorted.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: Vec<f64>) -> QuantileSeries {
        QuantileSeries::from_values(values, Path::new("test")).unwrap()
    }

    #[test]
    fn interpolates_between_order_statistics() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&sorted, 0.0), 1.0);
        assert_eq!(quantile(&sorted, 1.0), 4.0);
        assert!((quantile(&sorted, 0.5) - 2.5).abs() < 1e-12);
        assert!((quantile(&sorted, 0.25) - 1.75).abs() < 1e-12);
    }

    #[test]
    fn single_value() {
        let series = series(vec![42.0]);
        assert_eq!(series.len(), STEPS - 1);
        assert!(series.points().iter().all(|p| p.latency == 42.0));
    }

    #[test]
    fn percentile_axis() {
        let series = series(vec![1.0, 2.0]);
        let points = series.points();
        assert_eq!(points.len(), 999);
        assert!((points[0].percentile - 0.1).abs() < 1e-9);
        assert!((points[499].percentile - 50.0).abs() < 1e-9);
        assert!((points[998].percentile - 99.9).abs() < 1e-9);
    }

    #[test]
    fn median_of_one_to_thousand() {
        let series = series((1..=1000).rev().map(|v| v as f64).collect());
        let median = series.points()[499];
        assert!((median.percentile - 50.0).abs() < 1e-9);
        assert!((median.latency - 500.0).abs() < 1.0);
    }

    #[test]
    fn monotone() {
        let values = vec![5.0, 0.5, 13.0, 2.0, 2.0, 99.0, 7.5, 0.0, 41.0];
        let series = series(values);
        for pair in series.points().windows(2) {
            assert!(pair[0].latency <= pair[1].latency);
            assert!(pair[0].percentile < pair[1].percentile);
        }
    }

    #[test]
    fn extremes() {
        let series = series(vec![3.0, 1.0, 2.0]);
        assert_eq!(series.latency_at(0.0), 1.0);
        assert_eq!(series.latency_at(1.0), 3.0);
        assert!(series.min_latency() > 1.0);
        assert!(series.max_latency() < 3.0);
        assert_eq!(series.transactions(), 3);
    }

    #[test]
    fn empty_is_an_error() {
        let result = QuantileSeries::from_values(Vec::new(), Path::new("empty"));
        assert!(matches!(result, Err(Error::NoTransactions { .. })));
    }
}

// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::quantile::QuantileSeries;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
/// Percentiles reported in the run summary
pub enum Percentile {
    p50,
    p90,
    p99,
    p999,
    Maximum,
}

impl Percentile {
    pub const SUMMARY: [Percentile; 5] = [
        Percentile::p50,
        Percentile::p90,
        Percentile::p99,
        Percentile::p999,
        Percentile::Maximum,
    ];

    pub fn as_f64(self) -> f64 {
        match self {
            Percentile::p50 => 0.5,
            Percentile::p90 => 0.9,
            Percentile::p99 => 0.99,
            Percentile::p999 => 0.999,
            Percentile::Maximum => 1.0,
        }
    }
}

impl std::fmt::Display for Percentile {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Percentile::p50 => write!(f, "p50"),
            Percentile::p90 => write!(f, "p90"),
            Percentile::p99 => write!(f, "p99"),
            Percentile::p999 => write!(f, "p999"),
            Percentile::Maximum => write!(f, "max"),
        }
    }
}

/// Formats the summary percentiles of `series` as `p50: .. p90: .. max: ..`.
pub fn summary(series: &QuantileSeries) -> String {
    Percentile::SUMMARY
        .iter()
        .map(|p| format!("{}: {:.3}", p, series.latency_at(p.as_f64())))
        .collect::<Vec<_>>()
        .join(" ")
}

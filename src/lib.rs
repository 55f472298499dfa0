// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Aggregates per-transaction latencies from a directory of `*.log` files and
//! plots the CDF of the worst latency seen for each transaction.

#[macro_use]
extern crate log;

#[macro_use]
mod macros;

pub mod aggregate;
pub mod config;
pub mod error;
pub mod logger;
pub mod percentile;
pub mod plot;
pub mod quantile;
pub mod sample;

pub use crate::aggregate::MaxLatencies;
pub use crate::config::Config;
pub use crate::error::{Error, ParseError};
pub use crate::plot::PlotConfig;
pub use crate::quantile::{Point, QuantileSeries};

use std::path::PathBuf;

/// Outcome of a successful run.
#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub output: PathBuf,
    pub files: usize,
    pub samples: usize,
    pub transactions: usize,
}

/// Runs the whole pipeline: aggregate the logs, compute the CDF and render
/// it. Input errors are returned before the output file is touched.
pub fn run(config: &Config) -> Result<Report, Error> {
    let directory = config.directory();
    info!("reading latency logs from {}", directory.display());

    let table = MaxLatencies::from_directory(directory)?;
    info!(
        "files: {} samples: {} transactions: {}",
        table.files(),
        table.samples(),
        table.len()
    );

    let files = table.files();
    let samples = table.samples();
    let series = QuantileSeries::from_values(table.into_values(), directory)?;
    info!("{}", percentile::summary(&series));

    let output = config.output();
    config.plot().render(&series, &output)?;
    info!("wrote {}", output.display());

    Ok(Report {
        output,
        files,
        samples,
        transactions: series.transactions(),
    })
}

// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::path::PathBuf;

use thiserror::Error;

/// Errors which abort a report. None of them are recoverable: the run stops
/// before the plot is written.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}:{line}: malformed line: {reason}", .path.display())]
    Malformed {
        path: PathBuf,
        line: usize,
        reason: ParseError,
    },
    #[error("no transactions found in {}", .path.display())]
    NoTransactions { path: PathBuf },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("failed to render {}: {reason}", .path.display())]
    Render { path: PathBuf, reason: String },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Why a single `transaction_id,latency` line was rejected.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("expected `transaction_id,latency`, found no separator")]
    MissingSeparator,
    #[error("expected 2 fields, found {0}")]
    TooManyFields(usize),
    #[error("invalid latency: {0:?}")]
    InvalidLatency(String),
    #[error("negative latency: {0}")]
    NegativeLatency(f64),
    #[error("latency is not finite")]
    NonFiniteLatency,
}

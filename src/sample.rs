// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::ParseError;

/// One `transaction_id,latency` observation borrowed from a log line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample<'a> {
    transaction: &'a str,
    latency: f64,
}

impl<'a> Sample<'a> {
    /// Parse a single log line. The line terminator must already be stripped.
    /// The transaction id is kept verbatim, the latency is trimmed before it
    /// is parsed.
    pub fn parse(line: &'a str) -> Result<Self, ParseError> {
        let mut fields = line.split(',');
        // split always yields at least one field
        let transaction = fields.next().unwrap_or_default();
        let latency = fields.next().ok_or(ParseError::MissingSeparator)?;
        let extra = fields.count();
        if extra > 0 {
            return Err(ParseError::TooManyFields(2 + extra));
        }

        let text = latency.trim();
        let latency: f64 = text
            .parse()
            .map_err(|_| ParseError::InvalidLatency(text.to_string()))?;
        if !latency.is_finite() {
            return Err(ParseError::NonFiniteLatency);
        }
        if latency < 0.0 {
            return Err(ParseError::NegativeLatency(latency));
        }

        Ok(Self {
            transaction,
            latency,
        })
    }

    pub fn transaction(&self) -> &'a str {
        self.transaction
    }

    pub fn latency(&self) -> f64 {
        self.latency
    }
}

// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#[macro_use]
extern crate log;

use latency_cdf::config::VERSION;
use latency_cdf::fatal;
use latency_cdf::logger::SimpleLogger;
use latency_cdf::Config;

fn main() {
    let config = Config::new();

    SimpleLogger::new("latency_cdf", config.logging())
        .init()
        .expect("failed to initialize logger");

    debug!("latency-cdf {}", VERSION);

    if let Err(e) = latency_cdf::run(&config) {
        fatal!("{}", e);
    }
}

// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use log::{Level, Metadata, Record, SetLoggerError};

use std::io::Write;

/// Writes `<timestamp> <LEVEL> [<target>] <message>` lines to stdout.
pub struct SimpleLogger {
    label: &'static str,
    level: Level,
}

impl SimpleLogger {
    pub fn new(label: &'static str, level: Level) -> Self {
        Self { label, level }
    }

    /// Installs the logger as the global `log` backend.
    pub fn init(self) -> Result<(), SetLoggerError> {
        let filter = self.level.to_level_filter();
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(filter);
        Ok(())
    }

    fn format(&self, record: &Record) -> String {
        // module paths only help when debugging
        let target = if record.level() >= Level::Debug {
            record.target()
        } else {
            self.label
        };
        format!(
            "{} {:<5} [{}] {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            target,
            record.args()
        )
    }
}

impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let stdout = std::io::stdout();
            let mut stdout = stdout.lock();
            let _ = writeln!(stdout, "{}", self.format(record));
        }
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
    }
}

// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// Logs at error level, flushes, and terminates the process with status 1.
#[macro_export]
macro_rules! fatal {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
        log::Log::flush(log::logger());
        std::process::exit(1)
    }};
}

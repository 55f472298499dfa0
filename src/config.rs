// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::Error;
use crate::plot::PlotConfig;

use clap::{App, Arg, ArgMatches};
use log::Level;
use serde_derive::*;

use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Name of the plot written into the data directory.
pub const OUTPUT_FILE: &str = "cdf.png";

/// Contents of the optional TOML config file.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    general: General,
    #[serde(default)]
    plot: Plot,
}

impl ConfigFile {
    pub fn load_from_file(filename: &Path) -> Result<Self, Error> {
        let mut file = std::fs::File::open(filename).map_err(|e| Error::io(filename, e))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::io(filename, e))?;
        Self::parse(&content)
            .map_err(|e| Error::Config(format!("{}: {}", filename.display(), e)))
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn general(&self) -> &General {
        &self.general
    }

    pub fn plot(&self) -> &Plot {
        &self.plot
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct General {
    #[serde(with = "LevelDef")]
    #[serde(default = "default_logging_level")]
    logging: Level,
}

impl Default for General {
    fn default() -> Self {
        Self {
            logging: default_logging_level(),
        }
    }
}

impl General {
    pub fn logging(&self) -> Level {
        self.logging
    }
}

#[derive(Clone, Deserialize, Debug)]
#[serde(rename_all = "lowercase")]
#[serde(remote = "Level")]
#[serde(deny_unknown_fields)]
enum LevelDef {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

fn default_logging_level() -> Level {
    Level::Info
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Plot {
    #[serde(default = "default_width")]
    width: u32,
    #[serde(default = "default_height")]
    height: u32,
    caption: Option<String>,
    #[serde(default = "default_label")]
    label: String,
    #[serde(default = "default_label")]
    x_desc: String,
    #[serde(default = "default_y_desc")]
    y_desc: String,
}

fn default_width() -> u32 {
    640
}

fn default_height() -> u32 {
    480
}

fn default_label() -> String {
    "latency".to_string()
}

fn default_y_desc() -> String {
    "percentile".to_string()
}

impl Default for Plot {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            caption: None,
            label: default_label(),
            x_desc: default_label(),
            y_desc: default_y_desc(),
        }
    }
}

impl Plot {
    /// Converts the `[plot]` section into renderer options.
    pub fn to_plot_config(&self) -> PlotConfig {
        let mut config = PlotConfig::new();
        config
            .size((self.width, self.height))
            .label(&self.label)
            .x_desc(&self.x_desc)
            .y_desc(&self.y_desc);
        if let Some(caption) = &self.caption {
            config.caption(caption);
        }
        config
    }

    fn validate(&self) -> Result<(), Error> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::Config(format!(
                "plot size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Runtime configuration: the data directory from the command line merged
/// with the optional config file.
#[derive(Clone, Debug)]
pub struct Config {
    directory: PathBuf,
    file: ConfigFile,
    logging: Level,
}

fn app() -> App<'static, 'static> {
    App::new(NAME)
        .version(VERSION)
        .about("Plots the CDF of the worst latency observed per transaction")
        .arg(
            Arg::with_name("directory")
                .value_name("DIRECTORY")
                .help("Directory holding the *.log files; cdf.png is written here")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("config")
                .long("config")
                .value_name("FILE")
                .help("TOML config file with plot size, caption and labels")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Increase verbosity by one level. Can be used more than once")
                .multiple(true),
        )
}

impl Config {
    /// parse command line options and return `Config`, exiting with usage on
    /// missing or invalid arguments
    pub fn new() -> Config {
        let matches = app().get_matches();
        // logging is configured from the result, so report directly
        Self::from_matches(&matches).unwrap_or_else(|e| {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        })
    }

    /// Parses an explicit argument list. The first item is the program name.
    pub fn from_args<I, T>(args: I) -> Result<Config, Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = app()
            .get_matches_from_safe(args)
            .map_err(|e| Error::Config(e.message))?;
        Self::from_matches(&matches)
    }

    fn from_matches(matches: &ArgMatches) -> Result<Config, Error> {
        let directory = matches
            .value_of_os("directory")
            .map(PathBuf::from)
            .ok_or_else(|| Error::Config("missing data directory".to_string()))?;

        let file = match matches.value_of_os("config") {
            Some(path) => ConfigFile::load_from_file(Path::new(path))?,
            None => ConfigFile::default(),
        };
        file.plot.validate()?;

        let logging = match matches.occurrences_of("verbose") {
            0 => file.general.logging(),
            1 => Level::Debug,
            _ => Level::Trace,
        };

        Ok(Config {
            directory,
            file,
            logging,
        })
    }

    /// the directory scanned for log files
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// where the plot is written, always `<directory>/cdf.png`
    pub fn output(&self) -> PathBuf {
        self.directory.join(OUTPUT_FILE)
    }

    pub fn logging(&self) -> Level {
        self.logging
    }

    pub fn plot(&self) -> PlotConfig {
        self.file.plot.to_plot_config()
    }
}

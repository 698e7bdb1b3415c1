//! Global logger setup for the console dashboard.
//!
//! File output is the default because terminal log lines would interleave
//! with the rendered dashboard.

use std::fs::File;
use std::str::FromStr;

use log::LevelFilter;
use serde::Deserialize;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

const LOG_PATH: &str = "./scribe.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum LogDestination {
    /// `./scribe.log`, truncated at startup.
    #[default]
    File,
    Terminal,
    Both,
}

impl LogDestination {
    fn wants_file(self) -> bool {
        matches!(self, LogDestination::File | LogDestination::Both)
    }

    fn wants_terminal(self) -> bool {
        matches!(self, LogDestination::Terminal | LogDestination::Both)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log destination `{0}` (expected file, terminal or both)")]
pub struct UnknownDestination(pub String);

impl FromStr for LogDestination {
    type Err = UnknownDestination;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(LogDestination::File),
            "terminal" => Ok(LogDestination::Terminal),
            "both" => Ok(LogDestination::Both),
            _ => Err(UnknownDestination(raw.to_string())),
        }
    }
}

/// Installs the global logger. A log file that cannot be created is reported
/// on stderr and skipped; logging never blocks startup.
pub fn initialize(destination: LogDestination, level: LevelFilter) {
    let config = scribe_only_config();
    let mut sinks: Vec<Box<dyn SharedLogger>> = Vec::new();

    if destination.wants_terminal() {
        sinks.push(TermLogger::new(
            level,
            config.clone(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }
    if destination.wants_file() {
        match File::create(LOG_PATH) {
            Ok(file) => sinks.push(WriteLogger::new(level, config, file)),
            Err(err) => eprintln!("scribe: cannot open {LOG_PATH}: {err}"),
        }
    }

    if !sinks.is_empty() {
        // A second initialization (tests) keeps the first logger.
        let _ = CombinedLogger::init(sinks);
    }
}

/// Only records from the workspace crates; reqwest and hyper stay quiet.
fn scribe_only_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .add_filter_allow_str("scribe")
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destination_parses_case_insensitively() {
        assert_eq!("Both".parse(), Ok(LogDestination::Both));
        assert_eq!(" terminal ".parse(), Ok(LogDestination::Terminal));
        assert!("syslog".parse::<LogDestination>().is_err());
    }

    #[test]
    fn both_writes_to_file_and_terminal() {
        assert!(LogDestination::Both.wants_file() && LogDestination::Both.wants_terminal());
        assert!(!LogDestination::File.wants_terminal());
        assert!(!LogDestination::Terminal.wants_file());
    }
}

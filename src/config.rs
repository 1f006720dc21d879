use std::path::PathBuf;

use log::LevelFilter;

pub const DEFAULT_HISTORY_FILE: &str = "history.txt";

/// Settings for a driver run, usually filled in from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Print the parsed statements before running them.
    pub dump_ast: bool,
    pub log_level: LevelFilter,
    /// Where the interactive prompt keeps its history (only with the
    /// `with-file-history` feature).
    pub history_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dump_ast: false,
            log_level: LevelFilter::Warn,
            history_file: PathBuf::from(DEFAULT_HISTORY_FILE),
        }
    }
}

impl Config {
    /// Raises the log level by one step per `-v`, starting from `Warn`.
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.log_level = match verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        self
    }
}

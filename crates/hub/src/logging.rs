//! Logger setup for the `hub` binary.
//!
//! The library only talks to the `log` facade; this installs `env_logger`
//! as the backend. `RUST_LOG` wins over the command-line verbosity.
use log::LevelFilter;

/// Maps the number of `-v` flags to a level filter.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub fn init(verbosity: u8) -> Result<(), log::SetLoggerError> {
    env_logger::Builder::new()
        .filter_level(level_for(verbosity))
        .parse_default_env()
        .format_timestamp_millis()
        .try_init()
}

//! Process-wide `tracing` subscriber setup.
//!
//! Every format writes to stderr (or the journal) so stdout stays free for command output.

mod config;
mod error;
mod format;
mod log;

pub use config::LoggerConfig;
pub use error::LoggerError;
pub use format::LoggerFormat;

/// Install the global subscriber described by `cfg`. Fails if one is already installed.
pub fn logger_init(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    log::install(cfg)
}

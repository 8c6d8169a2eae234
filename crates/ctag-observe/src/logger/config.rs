use std::io::IsTerminal;

use crate::logger::format::LoggerFormat;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    /// `EnvFilter` directive, e.g. `info` or `ctag_store=trace,info`.
    pub level: String,
    pub with_targets: bool,
    pub use_color: bool,
}

impl LoggerConfig {
    /// Level `debug` when verbose, `info` otherwise.
    pub fn verbosity(mut self, verbose: bool) -> Self {
        self.level = if verbose { "debug" } else { "info" }.to_string();
        self
    }

    pub fn with_format(mut self, format: LoggerFormat) -> Self {
        self.format = format;
        self
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        let use_color = std::io::stderr().is_terminal();
        Self {
            format: LoggerFormat::default(),
            level: "info".to_string(),
            with_targets: false,
            use_color,
        }
    }
}

use std::{fmt, str::FromStr};

use crate::logger::error::LoggerError;

/// Output format of the logger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoggerFormat {
    /// Human-readable lines, colored on a terminal.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
    /// systemd journal (Linux, `journald` feature).
    Journald,
}

impl LoggerFormat {
    fn available(self) -> bool {
        match self {
            LoggerFormat::Journald => cfg!(all(target_os = "linux", feature = "journald")),
            _ => true,
        }
    }
}

impl FromStr for LoggerFormat {
    type Err = LoggerError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let format = match raw.trim().to_ascii_lowercase().as_str() {
            "text" => LoggerFormat::Text,
            "json" => LoggerFormat::Json,
            "journald" | "journal" => LoggerFormat::Journald,
            _ => return Err(LoggerError::InvalidFormat(raw.to_string())),
        };
        if !format.available() {
            return Err(LoggerError::JournaldNotSupported);
        }
        Ok(format)
    }
}

impl fmt::Display for LoggerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LoggerFormat::Text => "text",
            LoggerFormat::Json => "json",
            LoggerFormat::Journald => "journald",
        })
    }
}

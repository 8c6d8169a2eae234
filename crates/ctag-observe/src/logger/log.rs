use time::{UtcOffset, format_description::well_known::Rfc3339};
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, fmt::time::OffsetTime, layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::logger::{config::LoggerConfig, error::LoggerError, format::LoggerFormat};

type OutputLayer = Box<dyn Layer<Registry> + Send + Sync>;

pub(crate) fn install(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    let filter = mk_filter(&cfg.level)?;
    let output = match cfg.format {
        LoggerFormat::Text => text_layer(cfg),
        LoggerFormat::Json => json_layer(cfg),
        LoggerFormat::Journald => journald_layer()?,
    };

    tracing_subscriber::registry()
        .with(output)
        .with(filter)
        .try_init()
        .map_err(as_error)
}

fn text_layer(cfg: &LoggerConfig) -> OutputLayer {
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(cfg.use_color)
        .with_target(cfg.with_targets)
        .with_timer(mk_timer())
        .boxed()
}

fn json_layer(cfg: &LoggerConfig) -> OutputLayer {
    fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(cfg.with_targets)
        .with_timer(mk_timer())
        .boxed()
}

#[cfg(all(target_os = "linux", feature = "journald"))]
fn journald_layer() -> Result<OutputLayer, LoggerError> {
    tracing_journald::layer()
        .map(|layer| Box::new(layer) as OutputLayer)
        .map_err(|e| LoggerError::InitializationFailed(format!("journald: {e}")))
}

#[cfg(not(all(target_os = "linux", feature = "journald")))]
fn journald_layer() -> Result<OutputLayer, LoggerError> {
    Err(LoggerError::JournaldNotSupported)
}

fn mk_filter(level: &str) -> Result<EnvFilter, LoggerError> {
    EnvFilter::try_new(level).map_err(|_| LoggerError::InvalidLevel(level.to_string()))
}

/// RFC 3339 timestamps in the local offset, UTC when the offset cannot be determined.
fn mk_timer() -> OffsetTime<Rfc3339> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetTime::new(offset, Rfc3339)
}

fn as_error(e: impl std::fmt::Display) -> LoggerError {
    let msg = e.to_string();
    if msg.contains("global default") {
        LoggerError::AlreadyInitialized
    } else {
        LoggerError::InitializationFailed(msg)
    }
}

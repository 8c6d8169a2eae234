use std::process::ExitCode;

use clap::Parser;
use ctag_observe::logger_init;
use tracing::{error, info};

mod cli;
mod config;
mod run;

use cli::Cli;
use config::AgentConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cfg = match AgentConfig::try_from(Cli::parse()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("ctag: {e}");
            return ExitCode::from(2);
        }
    };
    if let Err(e) = logger_init(&cfg.logger) {
        eprintln!("ctag: {e}");
        return ExitCode::FAILURE;
    }
    info!(version = env!("CARGO_PKG_VERSION"), "starting");

    match run::run(&cfg).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = run::failure_code(&e);
            error!(code, "{e:#}");
            ExitCode::from(code)
        }
    }
}

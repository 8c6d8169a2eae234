use std::{path::PathBuf, time::Duration};

use ctag_cloud::AwsCli;
use ctag_model::{DnsZone, ModelError, Namespace, NamingScheme, SlotLayout};
use ctag_observe::{LoggerConfig, LoggerError, LoggerFormat};
use ctag_store::StoreConfig;
use thiserror::Error;

use crate::cli::Cli;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("coordination endpoint is empty")]
    EmptyEndpoint,
    #[error("invalid store directory: {0}")]
    Layout(#[source] ModelError),
    #[error("invalid --max-index: {0}")]
    Namespace(#[source] ModelError),
    #[error("aws command line is empty")]
    EmptyAwsCli,
    #[error(transparent)]
    LogFormat(#[from] LoggerError),
}

/// Validated agent configuration; never changes after startup.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub store: StoreConfig,
    pub layout: SlotLayout,
    pub namespace: Namespace,
    pub naming: NamingScheme,
    /// `None` disables tagging.
    pub tag_name: Option<String>,
    /// `None` disables DNS publishing.
    pub dns_zone: Option<DnsZone>,
    pub delay: Duration,
    pub machine_id_file: PathBuf,
    pub metadata_url: String,
    pub aws_cli: AwsCli,
    pub logger: LoggerConfig,
    pub verbose: bool,
}

impl TryFrom<Cli> for AgentConfig {
    type Error = ConfigError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        if cli.etcd.trim().is_empty() {
            return Err(ConfigError::EmptyEndpoint);
        }
        let layout = SlotLayout::new(&cli.etcd_prefix, &cli.tag_prefix, &cli.tag_name)
            .map_err(ConfigError::Layout)?;
        let namespace = Namespace::new(cli.max_index).map_err(ConfigError::Namespace)?;
        let format: LoggerFormat = cli.log_format.parse()?;
        let aws_cli = AwsCli::from_command_line(&cli.aws_cli).ok_or(ConfigError::EmptyAwsCli)?;

        let tag_name = Some(cli.tag_name).filter(|name| !name.is_empty());
        Ok(Self {
            store: StoreConfig {
                endpoint: cli.etcd,
                max_redirects: cli.max_redirects,
            },
            layout,
            namespace,
            naming: NamingScheme::new(cli.tag_prefix, cli.stack_name),
            tag_name,
            dns_zone: DnsZone::parse(&cli.dns_zone),
            delay: Duration::from_secs(cli.delay),
            machine_id_file: cli.machine_id_file,
            metadata_url: cli.metadata_url,
            aws_cli,
            logger: LoggerConfig::default()
                .with_format(format)
                .verbosity(cli.verbose),
            verbose: cli.verbose,
        })
    }
}

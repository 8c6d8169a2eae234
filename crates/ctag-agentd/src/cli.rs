use std::path::PathBuf;

use clap::Parser;
use ctag_cloud::DEFAULT_METADATA_URL;
use ctag_core::DEFAULT_MACHINE_ID_PATH;
use ctag_model::DEFAULT_NAMESPACE_BOUND;
use ctag_store::{DEFAULT_ENDPOINT, DEFAULT_MAX_REDIRECTS};

/// Tag this instance with a fleet-unique machine index.
///
/// Name tag will be:     {stack-name-}{tag-prefix}{index}
/// DNS A record will be: {tag-prefix}{index}{.stack-name}.{dns-zone}
///
/// AWS credentials are resolved by the aws CLI (environment, ~/.aws/credentials
/// or the instance IAM role).
#[derive(Parser, Debug, Clone)]
#[command(name = "ctag", version)]
#[command(about = "Allocate a unique machine index and publish it as an instance tag and DNS record")]
pub struct Cli {
    /// Coordination store endpoint, host[:port] or URL
    #[arg(long, env = "CTAG_ETCD", default_value = DEFAULT_ENDPOINT)]
    pub etcd: String,

    /// Directory in the store used for index allocation
    #[arg(long, env = "CTAG_ETCD_PREFIX", default_value = "/cloudtag")]
    pub etcd_prefix: String,

    /// Name of the instance tag to set; empty disables tagging
    #[arg(long, env = "CTAG_TAG_NAME", default_value = "Name")]
    pub tag_name: String,

    /// Prefix the machine index is appended to
    #[arg(long, env = "CTAG_TAG_PREFIX", default_value = "machine-")]
    pub tag_prefix: String,

    /// Name of the stack
    #[arg(long, env = "CTAG_STACK_NAME", default_value = "")]
    pub stack_name: String,

    /// DNS zone to insert the machine A record into; empty disables DNS
    #[arg(long, env = "CTAG_DNS_ZONE", default_value = "")]
    pub dns_zone: String,

    /// Seconds after which the tag is set again (0 disables)
    #[arg(long, env = "CTAG_DELAY", default_value_t = 0)]
    pub delay: u64,

    /// Exclusive upper bound of machine indices
    #[arg(long, env = "CTAG_MAX_INDEX", default_value_t = DEFAULT_NAMESPACE_BOUND)]
    pub max_index: u32,

    /// Leader redirects followed per store request
    #[arg(long, env = "CTAG_MAX_REDIRECTS", default_value_t = DEFAULT_MAX_REDIRECTS)]
    pub max_redirects: u32,

    #[arg(long, env = "CTAG_MACHINE_ID_FILE", default_value = DEFAULT_MACHINE_ID_PATH)]
    pub machine_id_file: PathBuf,

    /// Instance metadata service base URL
    #[arg(long, env = "CTAG_METADATA_URL", default_value = DEFAULT_METADATA_URL)]
    pub metadata_url: String,

    /// aws command line, e.g. `aws --profile fleet`
    #[arg(long, env = "CTAG_AWS_CLI", default_value = "aws")]
    pub aws_cli: String,

    /// Log format: text, json or journald
    #[arg(long, env = "CTAG_LOG_FORMAT", default_value = "text")]
    pub log_format: String,

    /// Log debug details
    #[arg(long, short, env = "CTAG_VERBOSE")]
    pub verbose: bool,
}

use anyhow::{Context, Result};
use ctag_cloud::{
    ARecord, AwsCli, DnsPublisher, Ec2Tagger, InstanceIdentity, MetadataClient, Route53Publisher,
    TagRequest, apply_name_tag,
};
use ctag_core::{Allocator, CoreError, read_machine_id};
use ctag_model::{DNS_RECORD_TTL, DnsZone, SlotIndex};
use ctag_store::EtcdClient;
use tracing::{debug, info};

use crate::config::AgentConfig;

/// Allocate the machine index, then publish it as a DNS record and an instance tag.
pub async fn run(cfg: &AgentConfig) -> Result<()> {
    let machine = read_machine_id(&cfg.machine_id_file)?;

    let store = EtcdClient::new(&cfg.store).context("coordination client")?;
    let allocator = Allocator::new(store, cfg.layout.clone(), cfg.namespace);
    let allocation = allocator.find_index(&machine).await?;
    let index = allocation.index;

    let metadata = MetadataClient::new(&cfg.metadata_url).context("metadata client")?;
    let identity = metadata
        .instance_identity()
        .await
        .context("instance metadata")?;

    if cfg.verbose {
        log_settings(cfg, &machine.to_string(), index, &identity);
    }

    let cli = cfg.aws_cli.clone();
    if let Some(zone) = &cfg.dns_zone {
        publish_dns(cfg, cli.clone(), zone, index, &identity).await?;
    }
    if let Some(tag_name) = &cfg.tag_name {
        let request = TagRequest {
            instance_id: identity.instance_id.clone(),
            key: tag_name.clone(),
            value: cfg.naming.display_name(index),
        };
        let tagger = Ec2Tagger::new(cli, identity.region());
        apply_name_tag(&tagger, &request, cfg.delay)
            .await
            .context("instance tagging")?;
    }

    info!(%index, kind = ?allocation.kind, "done");
    Ok(())
}

/// Exit status of a failed run.
///
/// `3` when every slot is taken, `4` when the coordination store cannot be reached,
/// `1` for anything else.
pub fn failure_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<CoreError>() {
        Some(e) if e.is_exhausted() => 3,
        Some(CoreError::Store(e)) if e.is_transport() => 4,
        _ => 1,
    }
}

async fn publish_dns(
    cfg: &AgentConfig,
    cli: AwsCli,
    zone: &DnsZone,
    index: SlotIndex,
    identity: &InstanceIdentity,
) -> Result<()> {
    let record = ARecord {
        zone: zone.clone(),
        name: cfg.naming.record_name(index, zone),
        address: identity.public_ipv4.clone(),
        ttl: DNS_RECORD_TTL,
    };
    Route53Publisher::new(cli)
        .upsert_a_record(&record)
        .await
        .context("dns publishing")
}

fn log_settings(cfg: &AgentConfig, machine: &str, index: SlotIndex, identity: &InstanceIdentity) {
    debug!(machine, "machine id");
    debug!(%index, "index");
    debug!(region = identity.region(), "region");
    debug!(tag = cfg.tag_name.as_deref().unwrap_or(""), "tag");
    debug!(prefix = %cfg.naming.tag_prefix, "prefix");
    debug!(stack = %cfg.naming.stack_name, "stack");
    debug!(
        zone = cfg.dns_zone.as_ref().map(DnsZone::as_str).unwrap_or(""),
        "dns zone"
    );
    debug!(
        endpoint = %cfg.store.base_url(),
        directory = %cfg.layout.directory(),
        bound = cfg.namespace.bound(),
        delay_secs = cfg.delay.as_secs(),
        "store"
    );
}

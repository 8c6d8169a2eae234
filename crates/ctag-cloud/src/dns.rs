//! A record publishing through Route53.

use async_trait::async_trait;
use ctag_model::DnsZone;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::{error::CloudError, proc::AwsCli};

/// An address record to create or overwrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ARecord {
    pub zone: DnsZone,
    /// Fully qualified record name, ending with the zone.
    pub name: String,
    pub address: String,
    pub ttl: u32,
}

/// Creates or replaces A records. Publishing the same record twice must be harmless.
#[async_trait]
pub trait DnsPublisher: Send + Sync {
    async fn upsert_a_record(&self, record: &ARecord) -> Result<(), CloudError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct HostedZones {
    #[serde(default)]
    hosted_zones: Vec<HostedZone>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct HostedZone {
    id: String,
    name: String,
}

/// Publishes records with `aws route53 change-resource-record-sets`.
pub struct Route53Publisher {
    cli: AwsCli,
}

impl Route53Publisher {
    pub fn new(cli: AwsCli) -> Self {
        Self { cli }
    }

    /// Look the zone up by name. An unknown zone name is used as the zone id itself.
    async fn resolve_zone_id(&self, zone: &DnsZone) -> Result<String, CloudError> {
        let args = ["route53", "list-hosted-zones", "--output", "json"].map(String::from);
        let output = self.cli.run(&args).await?;
        let zones: HostedZones =
            serde_json::from_str(&output).map_err(|e| CloudError::InvalidOutput(e.to_string()))?;

        Ok(match match_zone(&zones, zone) {
            Some(id) => id,
            None => {
                warn!(zone = %zone, "cannot determine hosted zone id, using zone name as id");
                zone.as_str().to_string()
            }
        })
    }
}

fn match_zone(zones: &HostedZones, zone: &DnsZone) -> Option<String> {
    for hosted in &zones.hosted_zones {
        debug!(name = %hosted.name, id = %hosted.id, "hosted zone");
        if hosted.name == zone.as_str() {
            let id = hosted.id.strip_prefix("/hostedzone/").unwrap_or(&hosted.id);
            return Some(id.to_string());
        }
    }
    None
}

fn change_batch(record: &ARecord) -> Value {
    json!({
        "Changes": [{
            "Action": "UPSERT",
            "ResourceRecordSet": {
                "Name": record.name,
                "Type": "A",
                "TTL": record.ttl,
                "ResourceRecords": [{ "Value": record.address }],
            },
        }],
    })
}

#[async_trait]
impl DnsPublisher for Route53Publisher {
    async fn upsert_a_record(&self, record: &ARecord) -> Result<(), CloudError> {
        let zone_id = self.resolve_zone_id(&record.zone).await?;
        let args = vec![
            "route53".to_string(),
            "change-resource-record-sets".to_string(),
            "--hosted-zone-id".to_string(),
            zone_id.clone(),
            "--change-batch".to_string(),
            change_batch(record).to_string(),
        ];
        self.cli.run(&args).await?;

        info!(record = %record.name, address = %record.address, zone_id = %zone_id, "A record published");
        Ok(())
    }
}

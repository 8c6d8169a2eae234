use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

use crate::{error::CloudError, proc::AwsCli};

/// A single tag to put on an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRequest {
    pub instance_id: String,
    pub key: String,
    pub value: String,
}

/// Applies tags to compute instances. Re-applying the same tag must be harmless.
#[async_trait]
pub trait InstanceTagger: Send + Sync {
    async fn tag(&self, request: &TagRequest) -> Result<(), CloudError>;
}

/// Tags EC2 instances through `aws ec2 create-tags`.
pub struct Ec2Tagger {
    cli: AwsCli,
    region: String,
}

impl Ec2Tagger {
    pub fn new(cli: AwsCli, region: impl Into<String>) -> Self {
        Self {
            cli,
            region: region.into(),
        }
    }

    fn args(&self, request: &TagRequest) -> Vec<String> {
        let tags = json!([{ "Key": request.key, "Value": request.value }]);
        vec![
            "ec2".into(),
            "create-tags".into(),
            "--region".into(),
            self.region.clone(),
            "--resources".into(),
            request.instance_id.clone(),
            "--tags".into(),
            tags.to_string(),
        ]
    }
}

#[async_trait]
impl InstanceTagger for Ec2Tagger {
    async fn tag(&self, request: &TagRequest) -> Result<(), CloudError> {
        self.cli.run(&self.args(request)).await?;
        Ok(())
    }
}

/// Apply the tag, and once more after `delay` when it is non-zero.
///
/// The second write undoes tools (e.g. CloudFormation) that reset the tag shortly after boot.
pub async fn apply_name_tag<T>(
    tagger: &T,
    request: &TagRequest,
    delay: Duration,
) -> Result<(), CloudError>
where
    T: InstanceTagger + ?Sized,
{
    tagger.tag(request).await?;
    info!(instance = %request.instance_id, key = %request.key, value = %request.value, "instance tagged");

    if !delay.is_zero() {
        debug!(delay_secs = delay.as_secs(), "sleeping before re-applying tag");
        tokio::time::sleep(delay).await;
        tagger.tag(request).await?;
        info!(instance = %request.instance_id, "instance tag re-applied");
    }
    Ok(())
}

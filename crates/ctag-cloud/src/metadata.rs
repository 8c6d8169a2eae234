//! Instance metadata service client.
//!
//! Values are fetched from `{base}/{path}` (e.g. `.../meta-data/instance-id`),
//! trimmed, and must not be empty.

use tracing::debug;

use crate::error::CloudError;

pub const DEFAULT_METADATA_URL: &str = "http://169.254.169.254/latest/meta-data";

/// What the agent needs to know about the instance it runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceIdentity {
    pub public_ipv4: String,
    pub instance_id: String,
    pub availability_zone: String,
}

impl InstanceIdentity {
    pub fn new(
        public_ipv4: impl Into<String>,
        instance_id: impl Into<String>,
        availability_zone: impl Into<String>,
    ) -> Result<Self, CloudError> {
        let availability_zone = availability_zone.into();
        if availability_zone.chars().count() < 2 {
            return Err(CloudError::InvalidZone(availability_zone));
        }
        Ok(Self {
            public_ipv4: public_ipv4.into(),
            instance_id: instance_id.into(),
            availability_zone,
        })
    }

    /// Region of the instance: the availability zone without its zone letter.
    pub fn region(&self) -> &str {
        match self.availability_zone.char_indices().last() {
            Some((cut, _)) => &self.availability_zone[..cut],
            None => "",
        }
    }
}

pub struct MetadataClient {
    http: reqwest::Client,
    base: String,
}

impl MetadataClient {
    pub fn new(base: impl Into<String>) -> Result<Self, CloudError> {
        let base = base.into().trim_end_matches('/').to_string();
        let http = reqwest::Client::builder().build()?;
        Ok(Self { http, base })
    }

    /// Fetch a single metadata value.
    pub async fn fetch(&self, path: &str) -> Result<String, CloudError> {
        let url = format!("{}/{}", self.base, path.trim_start_matches('/'));
        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CloudError::MetadataStatus {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        let value = response.text().await?.trim().to_string();
        debug!(path, %value, "metadata");
        if value.is_empty() {
            return Err(CloudError::EmptyMetadata(path.to_string()));
        }
        Ok(value)
    }

    /// Public address, instance id and availability zone, fetched in that order.
    pub async fn instance_identity(&self) -> Result<InstanceIdentity, CloudError> {
        let public_ipv4 = self.fetch("public-ipv4").await?;
        let instance_id = self.fetch("instance-id").await?;
        let availability_zone = self.fetch("placement/availability-zone").await?;
        InstanceIdentity::new(public_ipv4, instance_id, availability_zone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_drops_zone_letter() {
        let id = InstanceIdentity::new("203.0.113.7", "i-0abc", "eu-west-1b").unwrap();
        assert_eq!(id.region(), "eu-west-1");
    }

    #[test]
    fn zone_too_short_for_region() {
        assert!(matches!(
            InstanceIdentity::new("203.0.113.7", "i-0abc", "a"),
            Err(CloudError::InvalidZone(_))
        ));
    }
}

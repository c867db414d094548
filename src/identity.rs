use async_trait::async_trait;
use aws_config::imds;
use log::{debug, info};
use std::time::Duration;

/// Timeout for each instance metadata request
pub const METADATA_TIMEOUT: Duration = Duration::from_secs(5);

/// Regions where Cloudwatch accepts metric data
pub const KNOWN_REGIONS: &[&str] = &[
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
    "af-south-1",
    "ap-east-1",
    "ap-south-1",
    "ap-south-2",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-southeast-3",
    "ap-southeast-4",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-northeast-3",
    "ca-central-1",
    "ca-west-1",
    "eu-central-1",
    "eu-central-2",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "eu-south-1",
    "eu-south-2",
    "eu-north-1",
    "il-central-1",
    "me-south-1",
    "me-central-1",
    "sa-east-1",
];

/// Raw answer of the instance metadata service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceMetadata {
    pub instance_id: String,
    pub availability_zone: String,
}

/// Identity of the host running the tool
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceIdentity {
    pub instance_id: Option<String>,
    pub region: Option<String>,
}

/// Source of instance metadata, `None` when the host is not an instance
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn fetch(&self) -> Option<InstanceMetadata>;
}

/// Metadata source backed by the EC2 instance metadata service
pub struct ImdsMetadataSource {
    client: imds::Client,
}

impl ImdsMetadataSource {
    pub fn new(timeout: Duration) -> Self {
        let client = imds::Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .max_attempts(1)
            .build();
        Self { client }
    }

    async fn get(&self, path: &str) -> Result<String, imds::client::error::ImdsError> {
        Ok(self.client.get(path).await?.into())
    }
}

impl Default for ImdsMetadataSource {
    fn default() -> Self {
        Self::new(METADATA_TIMEOUT)
    }
}

#[async_trait]
impl MetadataSource for ImdsMetadataSource {
    async fn fetch(&self) -> Option<InstanceMetadata> {
        let instance_id = match self.get("/latest/meta-data/instance-id").await {
            Ok(instance_id) => instance_id,
            Err(err) => {
                debug!("Instance metadata is not available: {}", err);
                return None;
            }
        };
        let availability_zone = match self
            .get("/latest/meta-data/placement/availability-zone")
            .await
        {
            Ok(zone) => zone,
            Err(err) => {
                debug!("Availability zone is not available: {}", err);
                return None;
            }
        };
        Some(InstanceMetadata {
            instance_id,
            availability_zone,
        })
    }
}

/// Strip the zone letter and match against the known regions
pub fn region_from_zone(zone: &str) -> Option<String> {
    let mut chars = zone.chars();
    chars.next_back()?;
    let region = chars.as_str();
    KNOWN_REGIONS
        .iter()
        .find(|known| **known == region)
        .map(|known| known.to_string())
}

/// Resolve the host identity; absence of metadata is not an error
pub async fn resolve_identity(source: &dyn MetadataSource) -> InstanceIdentity {
    let Some(metadata) = source.fetch().await else {
        info!("No instance metadata, not running on an instance");
        return InstanceIdentity::default();
    };
    let region = region_from_zone(&metadata.availability_zone);
    if region.is_none() {
        debug!(
            "Zone {} does not belong to a known region",
            metadata.availability_zone
        );
    }
    let instance_id = Some(metadata.instance_id).filter(|id| !id.is_empty());
    InstanceIdentity {
        instance_id,
        region,
    }
}

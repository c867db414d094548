use crate::assembler::MetricBatch;
use crate::dimensions::DimensionSet;
use crate::error::PushError;
use crate::publisher::{MetricPublisher, PublishTarget};

use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_cloudwatch::config::Credentials;
use aws_sdk_cloudwatch::types::{Dimension, MetricDatum, StandardUnit};
use aws_sdk_cloudwatch::Client;
use log::info;

/// Region used when neither the instance nor the environment names one
pub const FALLBACK_REGION: &str = "us-east-1";

/// Sink implementation that sends metrics to Cloudwatch
#[derive(Debug, Default)]
pub struct CloudwatchPublisher {}

async fn create_client(target: &PublishTarget) -> Client {
    let region_provider = RegionProviderChain::first_try(target.region.clone().map(Region::new))
        .or_default_provider()
        .or_else(Region::from_static(FALLBACK_REGION));
    let credentials = Credentials::new(
        &target.credentials.access_key_id,
        &target.credentials.secret_key,
        None,
        None,
        "credential-file",
    );
    let shared_config = aws_config::defaults(BehaviorVersion::latest())
        .region(region_provider)
        .credentials_provider(credentials)
        .load()
        .await;
    Client::new(&shared_config)
}

/// Cloudwatch dimensions, one entry per value of a repeated key
pub fn to_dimensions(dimensions: &DimensionSet) -> Vec<Dimension> {
    dimensions
        .iter()
        .flat_map(|(name, value)| {
            value
                .values()
                .into_iter()
                .map(move |value| Dimension::builder().name(name).value(value).build())
        })
        .collect()
}

/// One datum per record, all sharing dimensions and timestamp
pub fn to_metric_data(batch: &MetricBatch) -> Vec<MetricDatum> {
    let dimensions = to_dimensions(&batch.dimensions);
    batch
        .records
        .iter()
        .map(|record| {
            MetricDatum::builder()
                .metric_name(&record.name)
                .value(record.value)
                .unit(StandardUnit::from(record.unit.as_str()))
                .set_dimensions(Some(dimensions.clone()))
                .timestamp(batch.timestamp.into())
                .build()
        })
        .collect()
}

#[async_trait]
impl MetricPublisher for CloudwatchPublisher {
    async fn send(&mut self, target: &PublishTarget, batch: &MetricBatch) -> Result<(), PushError> {
        info!("Sending {:?} to CloudWatch", batch);
        let client = create_client(target).await;

        client
            .put_metric_data()
            .namespace(&batch.namespace)
            .set_metric_data(Some(to_metric_data(batch)))
            .send()
            .await
            .map_err(|err| PushError::Publish(Box::new(aws_sdk_cloudwatch::Error::from(err))))?;
        Ok(())
    }
}

/// Tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::{assemble, ParsedInput};
    use crate::dimensions::parse_dimensions;
    use crate::identity::InstanceIdentity;
    use crate::metrics::parse_metrics;
    use test_log::test;

    fn batch() -> MetricBatch {
        let input = ParsedInput {
            namespace: "App".to_string(),
            records: parse_metrics("Latency,Errors", "12.5,0", Some("Milliseconds")).unwrap(),
            dimensions: parse_dimensions(Some("Env=prod,Role=web,Role=api")),
            instance_specific: false,
        };
        assemble(input, &InstanceIdentity::default()).unwrap()
    }

    #[test]
    fn test_repeated_key_expands() {
        let dimensions = to_dimensions(&batch().dimensions);
        let pairs: Vec<(&str, &str)> = dimensions
            .iter()
            .map(|d| (d.name().unwrap(), d.value().unwrap()))
            .collect();
        assert_eq!(
            pairs,
            vec![("Env", "prod"), ("Role", "web"), ("Role", "api")]
        );
    }

    #[test]
    fn test_metric_data() {
        let data = to_metric_data(&batch());
        assert_eq!(data.len(), 2);
        assert_eq!(data[0].metric_name(), Some("Latency"));
        assert_eq!(data[0].value(), Some(12.5));
        assert_eq!(data[0].unit(), Some(&StandardUnit::Milliseconds));
        assert_eq!(data[1].unit(), Some(&StandardUnit::None));
        assert_eq!(data[1].dimensions().len(), 3);
        assert!(data[1].timestamp().is_some());
    }
}

use crate::assembler::MetricBatch;
use crate::credentials::Credentials;
use crate::error::PushError;

use async_trait::async_trait;

/// Where and as whom a batch is published
#[derive(Debug, Clone)]
pub struct PublishTarget {
    pub region: Option<String>,
    pub credentials: Credentials,
}

/// Generic trait
#[async_trait]
pub trait MetricPublisher: Send {
    /// Publish the whole batch in a single call
    async fn send(&mut self, target: &PublishTarget, batch: &MetricBatch) -> Result<(), PushError>;
}

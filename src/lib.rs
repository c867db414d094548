pub mod assembler;
pub mod cloudwatch;
pub mod config;
pub mod credentials;
pub mod dimensions;
pub mod error;
pub mod identity;
pub mod metrics;
pub mod publisher;

use log::{debug, info};

use crate::assembler::{assemble, render_dry_run};
use crate::config::PushConfig;
use crate::credentials::{resolve_credentials, CredentialSource};
use crate::error::PushError;
use crate::identity::{resolve_identity, MetadataSource};
use crate::publisher::{MetricPublisher, PublishTarget};

/// External services a run may talk to
pub struct Collaborators<'a> {
    pub credentials: &'a dyn CredentialSource,
    pub metadata: &'a dyn MetadataSource,
    pub publisher: &'a mut dyn MetricPublisher,
}

/// Result of a successful run
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Dry run summary, nothing was contacted
    Verified(String),
    /// Number of metrics published
    Published(usize),
}

/// Entry point that runs the pipeline for one invocation.
///
/// Arguments are fully validated before the metadata lookup, the credential
/// read and the publish call, which happen in that order.
pub async fn main_runner(
    config: &PushConfig,
    mut collaborators: Collaborators<'_>,
) -> Result<Outcome, PushError> {
    let input = config.parse()?;
    debug!("Parsed {:?}", input);

    if config.verify {
        return Ok(Outcome::Verified(render_dry_run(&input)));
    }

    let identity = resolve_identity(collaborators.metadata).await;
    let credentials = resolve_credentials(collaborators.credentials.lines()?)?;
    let target = PublishTarget {
        region: identity.region.clone(),
        credentials,
    };
    let batch = assemble(input, &identity)?;
    collaborators.publisher.send(&target, &batch).await?;

    info!("Published {} metric(s) to {}", batch.records.len(), batch.namespace);
    Ok(Outcome::Published(batch.records.len()))
}

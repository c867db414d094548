use std::path::PathBuf;

use thiserror::Error;

use crate::metrics::ACCEPTED_UNITS;

/// Every way a single invocation can fail
#[derive(Debug, Error)]
pub enum PushError {
    /// Names and values split into lists of different length
    #[error("got {names} metric name(s) but {values} value(s)")]
    CountMismatch { names: usize, values: usize },

    /// A metric value is not a finite float
    #[error("metric value should be float, got {0:?}")]
    BadFloat(String),

    /// A metric name token is empty
    #[error("metric name at position {0} is empty")]
    EmptyName(usize),

    /// A unit token is outside the accepted set
    #[error("unit {unit:?} is not supported, unit must be one of these: {accepted}", accepted = ACCEPTED_UNITS.join(", "))]
    BadUnit { unit: String },

    /// More units than metric names
    #[error("got {units} unit(s) for {names} metric name(s)")]
    ExcessUnits { names: usize, units: usize },

    /// Credential file could not be read
    #[error("Credential file not found at {}, try -c to use another path", .path.display())]
    CredentialFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// AWSAccessKeyId or AWSSecretKey absent after scanning the source
    #[error("AWSAccessKeyId or AWSSecretKey is empty, try -c to use another credential file")]
    MissingCredentialField,

    /// Instance specific metric requested off an instance
    #[error("Instance id is empty")]
    MissingInstanceId,

    /// Failure reported by the publish endpoint
    #[error(transparent)]
    Publish(Box<dyn std::error::Error + Send + Sync>),
}

impl PushError {
    /// Whether the failure happened before any I/O was attempted
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            PushError::CountMismatch { .. }
                | PushError::BadFloat(_)
                | PushError::EmptyName(_)
                | PushError::BadUnit { .. }
                | PushError::ExcessUnits { .. }
        )
    }
}

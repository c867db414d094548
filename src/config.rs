use crate::assembler::ParsedInput;
use crate::dimensions::parse_dimensions;
use crate::error::PushError;
use crate::metrics::parse_metrics;

use std::path::PathBuf;

/// Everything one invocation was asked to do, as given on the command line
#[derive(Debug, Clone)]
pub struct PushConfig {
    pub namespace: String,
    pub names: String,
    pub values: String,
    pub units: Option<String>,
    pub dimensions: Option<String>,
    pub credential_path: PathBuf,
    pub instance_specific: bool,
    pub verify: bool,
}

impl PushConfig {
    /// Parse and validate all arguments; no I/O happens here
    pub fn parse(&self) -> Result<ParsedInput, PushError> {
        let records = parse_metrics(&self.names, &self.values, self.units.as_deref())?;
        let dimensions = parse_dimensions(self.dimensions.as_deref());
        Ok(ParsedInput {
            namespace: self.namespace.clone(),
            records,
            dimensions,
            instance_specific: self.instance_specific,
        })
    }
}

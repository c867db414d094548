use crate::dimensions::{DimensionSet, INSTANCE_ID_KEY};
use crate::error::PushError;
use crate::identity::InstanceIdentity;
use crate::metrics::{MetricRecord, Unit};

use chrono::{DateTime, Utc};
use std::fmt;
use std::fmt::Write;
use std::time::SystemTime;

/// Validated input of one invocation, produced before any I/O
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedInput {
    pub namespace: String,
    pub records: Vec<MetricRecord>,
    pub dimensions: DimensionSet,
    pub instance_specific: bool,
}

/// Records ready to be handed to a publisher
#[derive(Clone, PartialEq)]
pub struct MetricBatch {
    pub namespace: String,
    pub timestamp: SystemTime,
    pub records: Vec<MetricRecord>,
    pub dimensions: DimensionSet,
}

impl fmt::Debug for MetricBatch {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dt: DateTime<Utc> = self.timestamp.into();
        write!(
            fmt,
            "MetricBatch {{ ns {}, ts {}, metrics {}, dimensions {} }}",
            self.namespace,
            dt.to_rfc3339(),
            self.records.len(),
            self.dimensions.len()
        )?;
        Ok(())
    }
}

/// Build the batch, tagging it with the instance id when requested.
///
/// `InstanceId` always ends up as a single value, replacing any user supplied one.
pub fn assemble(input: ParsedInput, identity: &InstanceIdentity) -> Result<MetricBatch, PushError> {
    let mut dimensions = input.dimensions;
    if input.instance_specific {
        let instance_id = identity
            .instance_id
            .as_ref()
            .filter(|id| !id.is_empty())
            .ok_or(PushError::MissingInstanceId)?;
        dimensions.set(INSTANCE_ID_KEY, instance_id.clone());
    }
    Ok(MetricBatch {
        namespace: input.namespace,
        timestamp: SystemTime::now(),
        records: input.records,
        dimensions,
    })
}

/// Describe what would be published without touching any collaborator
pub fn render_dry_run(input: &ParsedInput) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_dry_run(&mut out, input);
    out
}

fn write_dry_run<W: Write>(f: &mut W, input: &ParsedInput) -> fmt::Result {
    writeln!(f, "namespace: {}", input.namespace)?;
    writeln!(f, "metrics:")?;
    for record in &input.records {
        match record.unit {
            Unit::None => writeln!(f, "    {}={:?}", record.name, record.value)?,
            unit => writeln!(f, "    {}={:?} {}", record.name, record.value, unit)?,
        }
    }
    if input.dimensions.is_empty() {
        writeln!(f, "dimensions: none")?;
    } else {
        writeln!(f, "dimensions:")?;
        for (key, value) in input.dimensions.iter() {
            for value in value.values() {
                writeln!(f, "    {}={}", key, value)?;
            }
        }
    }
    writeln!(f, "instance specific: {}", input.instance_specific)
}

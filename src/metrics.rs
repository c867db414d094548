use crate::error::PushError;

use log::*;
use std::fmt;
use std::str::FromStr;

/// Unit tokens a caller may pass with `--unit`
pub const ACCEPTED_UNITS: &[&str] = &[
    "Seconds",
    "Microseconds",
    "Milliseconds",
    "Bytes",
    "Kilobytes",
    "Megabytes",
    "Gigabytes",
    "Terabytes",
    "Bits",
    "Kilobits",
    "Megabits",
    "Gigabits",
    "Terabits",
    "Percent",
    "Count",
    "Bytes/Second",
    "Kilobytes/Second",
    "Megabytes/Second",
    "Gigabytes/Second",
    "Terabytes/Second",
    "Bits/Second",
    "Kilobits/Second",
    "Megabits/Second",
    "Gigabits/Second",
    "Terabits/Second",
    "Count/Second",
];

/// Token used for a metric without an explicit unit
pub const NO_UNIT: &str = "None";

/// Metric unit, either a validated token or the "no unit" filler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Known(&'static str),
    None,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Known(token) => token,
            Unit::None => NO_UNIT,
        }
    }
}

impl FromStr for Unit {
    type Err = PushError;

    /// Only accepted tokens parse; the "None" filler is never user supplied
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        ACCEPTED_UNITS
            .iter()
            .find(|accepted| **accepted == token)
            .map(|accepted| Unit::Known(*accepted))
            .ok_or_else(|| PushError::BadUnit {
                unit: token.to_string(),
            })
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One metric to publish
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    pub name: String,
    pub value: f64,
    pub unit: Unit,
}

/// Split the unit argument, an empty argument means no units
fn split_units(raw: &str) -> Vec<&str> {
    if raw.is_empty() {
        Vec::new()
    } else {
        raw.split(',').collect()
    }
}

fn parse_value(raw: &str) -> Result<f64, PushError> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(PushError::BadFloat(raw.to_string())),
    }
}

/// Check unit tokens against the accepted set
pub fn validate_units(tokens: &[&str]) -> Result<Vec<Unit>, PushError> {
    tokens.iter().map(|token| token.parse::<Unit>()).collect()
}

/// Parse raw name, value and unit arguments into aligned records.
///
/// Names and values must have the same count. Missing trailing units are
/// filled with [`Unit::None`]; more units than names is rejected.
pub fn parse_metrics(
    raw_names: &str,
    raw_values: &str,
    raw_units: Option<&str>,
) -> Result<Vec<MetricRecord>, PushError> {
    let names: Vec<&str> = raw_names.split(',').collect();
    let raw_values: Vec<&str> = raw_values.split(',').collect();
    if names.len() != raw_values.len() {
        return Err(PushError::CountMismatch {
            names: names.len(),
            values: raw_values.len(),
        });
    }
    if let Some(position) = names.iter().position(|name| name.is_empty()) {
        return Err(PushError::EmptyName(position));
    }

    let values = raw_values
        .iter()
        .map(|raw| parse_value(raw))
        .collect::<Result<Vec<f64>, PushError>>()?;

    let unit_tokens = split_units(raw_units.unwrap_or_default());
    if unit_tokens.len() > names.len() {
        return Err(PushError::ExcessUnits {
            names: names.len(),
            units: unit_tokens.len(),
        });
    }
    let mut units = validate_units(&unit_tokens)?;
    if units.len() < names.len() {
        debug!(
            "Padding {} missing unit(s) with {}",
            names.len() - units.len(),
            NO_UNIT
        );
        units.resize(names.len(), Unit::None);
    }

    Ok(names
        .into_iter()
        .zip(values)
        .zip(units)
        .map(|((name, value), unit)| MetricRecord {
            name: name.to_string(),
            value,
            unit,
        })
        .collect())
}

/// Tests
#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_parse_equal_lengths() {
        let records = parse_metrics("a,b,c", "1,2.5,-3e2", None).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].name, "a");
        assert_eq!(records[0].value, 1.0);
        assert_eq!(records[1].value, 2.5);
        assert_eq!(records[2].value, -300.0);
        assert!(records.iter().all(|r| r.unit == Unit::None));
    }

    #[test]
    fn test_count_mismatch() {
        let err = parse_metrics("a,b", "1", None).unwrap_err();
        assert!(matches!(
            err,
            PushError::CountMismatch {
                names: 2,
                values: 1
            }
        ));
    }

    #[test]
    fn test_count_mismatch_wins_over_bad_float() {
        let err = parse_metrics("a", "x,y", None).unwrap_err();
        assert!(matches!(err, PushError::CountMismatch { .. }));
    }

    #[test]
    fn test_bad_float_rejects_batch() {
        let err = parse_metrics("a,b", "1,abc", None).unwrap_err();
        match err {
            PushError::BadFloat(raw) => assert_eq!(raw, "abc"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(matches!(
            parse_metrics("a", "inf", None),
            Err(PushError::BadFloat(_))
        ));
        assert!(matches!(
            parse_metrics("a", "NaN", None),
            Err(PushError::BadFloat(_))
        ));
    }

    #[test]
    fn test_value_whitespace_trimmed() {
        let records = parse_metrics("a", " 4.5 ", None).unwrap();
        assert_eq!(records[0].value, 4.5);
    }

    #[test]
    fn test_empty_arguments() {
        assert!(matches!(
            parse_metrics("", "", None),
            Err(PushError::EmptyName(0))
        ));
    }

    #[test]
    fn test_empty_name() {
        assert!(matches!(
            parse_metrics("a,", "1,2", None),
            Err(PushError::EmptyName(1))
        ));
    }

    #[test]
    fn test_units_padded() {
        let records = parse_metrics("a,b,c", "1,2,3", Some("Count")).unwrap();
        let units: Vec<&str> = records.iter().map(|r| r.unit.as_str()).collect();
        assert_eq!(units, vec!["Count", "None", "None"]);
    }

    #[test]
    fn test_empty_unit_argument() {
        let records = parse_metrics("a", "1", Some("")).unwrap();
        assert_eq!(records[0].unit, Unit::None);
    }

    #[test]
    fn test_excess_units() {
        let err = parse_metrics("a", "1", Some("Count,Bytes")).unwrap_err();
        assert!(matches!(err, PushError::ExcessUnits { names: 1, units: 2 }));
    }

    #[test]
    fn test_unknown_unit() {
        let err = parse_metrics("a,b", "1,2", Some("Count,Furlongs")).unwrap_err();
        match err {
            PushError::BadUnit { unit } => assert_eq!(unit, "Furlongs"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_sentinel_not_user_supplied() {
        assert!("None".parse::<Unit>().is_err());
        assert!(validate_units(&["Bytes/Second", "Percent"]).is_ok());
    }
}

use log::debug;
use std::fmt;

/// Dimension key injected by instance specific metrics
pub const INSTANCE_ID_KEY: &str = "InstanceId";

/// Value of a dimension, a tuple when the key was repeated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimensionValue {
    Single(String),
    Multiple(Vec<String>),
}

impl DimensionValue {
    /// All values in order of appearance
    pub fn values(&self) -> Vec<&str> {
        match self {
            DimensionValue::Single(value) => vec![value.as_str()],
            DimensionValue::Multiple(values) => values.iter().map(String::as_str).collect(),
        }
    }

    fn push(self, value: String) -> Self {
        match self {
            DimensionValue::Single(first) => DimensionValue::Multiple(vec![first, value]),
            DimensionValue::Multiple(mut values) => {
                values.push(value);
                DimensionValue::Multiple(values)
            }
        }
    }
}

impl fmt::Display for DimensionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimensionValue::Single(value) => f.write_str(value),
            DimensionValue::Multiple(values) => write!(f, "({})", values.join(", ")),
        }
    }
}

/// Dimensions shared by every metric of a batch, keys in order of first appearance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DimensionSet {
    entries: Vec<(String, DimensionValue)>,
}

impl DimensionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, key: &str) -> Option<&DimensionValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DimensionValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Record another value for `key`, a repeated key turns into a tuple
    pub fn append(&mut self, key: &str, value: String) {
        match self.entries.iter_mut().find(|(name, _)| name == key) {
            Some((_, existing)) => {
                let previous = std::mem::replace(existing, DimensionValue::Multiple(Vec::new()));
                *existing = previous.push(value);
            }
            None => self
                .entries
                .push((key.to_string(), DimensionValue::Single(value))),
        }
    }

    /// Set `key` to a single value, replacing whatever was there
    pub fn set(&mut self, key: &str, value: String) {
        match self.entries.iter_mut().find(|(name, _)| name == key) {
            Some((_, existing)) => *existing = DimensionValue::Single(value),
            None => self
                .entries
                .push((key.to_string(), DimensionValue::Single(value))),
        }
    }
}

/// Parse `name=value[,name=value...]` into a dimension set.
///
/// Only the first `=` separates key from value. Repeated keys collect all of
/// their values, duplicates included. Commas and `=` cannot be escaped.
pub fn parse_dimensions(raw: Option<&str>) -> DimensionSet {
    let mut dimensions = DimensionSet::new();
    let Some(raw) = raw else {
        return dimensions;
    };
    for pair in raw.split(',').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        dimensions.append(key, value.to_string());
    }
    debug!("Parsed {} dimension key(s) from {:?}", dimensions.len(), raw);
    dimensions
}

/// Tests
#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn single(value: &str) -> DimensionValue {
        DimensionValue::Single(value.to_string())
    }

    #[test]
    fn test_distinct_keys() {
        let dims = parse_dimensions(Some("k1=v1,k2=v2"));
        assert_eq!(dims.len(), 2);
        assert_eq!(dims.get("k1"), Some(&single("v1")));
        assert_eq!(dims.get("k2"), Some(&single("v2")));
        let keys: Vec<&str> = dims.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["k1", "k2"]);
    }

    #[test]
    fn test_repeated_key() {
        let dims = parse_dimensions(Some("k=v1,other=x,k=v2,k=v1"));
        assert_eq!(
            dims.get("k"),
            Some(&DimensionValue::Multiple(vec![
                "v1".to_string(),
                "v2".to_string(),
                "v1".to_string()
            ]))
        );
        assert_eq!(dims.get("other"), Some(&single("x")));
    }

    #[test]
    fn test_value_with_equals() {
        let dims = parse_dimensions(Some("k=a=b"));
        assert_eq!(dims.get("k"), Some(&single("a=b")));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_dimensions(None).is_empty());
        assert!(parse_dimensions(Some("")).is_empty());
    }

    #[test]
    fn test_missing_separator() {
        let dims = parse_dimensions(Some("flag,k=v,"));
        assert_eq!(dims.get("flag"), Some(&single("")));
        assert_eq!(dims.len(), 2);
    }

    #[test]
    fn test_set_overwrites_tuple() {
        let mut dims = parse_dimensions(Some("InstanceId=a,InstanceId=b"));
        dims.set(INSTANCE_ID_KEY, "i-123".to_string());
        assert_eq!(dims.get(INSTANCE_ID_KEY), Some(&single("i-123")));
        assert_eq!(dims.len(), 1);
    }

    #[test]
    fn test_display() {
        let dims = parse_dimensions(Some("k=a,k=b"));
        assert_eq!(dims.get("k").unwrap().to_string(), "(a, b)");
        assert_eq!(dims.get("k").unwrap().values(), vec!["a", "b"]);
    }
}

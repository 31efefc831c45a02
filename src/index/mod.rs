use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::core::{DataType, DataValue};
use crate::error::{Error, Result};

/// Bits reserved for the row position inside a partition in a
/// `distributed` default index
const PARTITION_SHIFT: u32 = 33;

/// Kind of default index attached to frames that have none
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DefaultIndexType {
    /// Consecutive integers from 0, computed over all rows
    #[default]
    Sequence,
    /// Consecutive integers from 0, computed per partition with offsets
    DistributedSequence,
    /// Monotonically increasing, not consecutive: partition id in the upper
    /// bits, row position within the partition in the lower bits
    Distributed,
}

impl FromStr for DefaultIndexType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sequence" => Ok(DefaultIndexType::Sequence),
            "distributed-sequence" => Ok(DefaultIndexType::DistributedSequence),
            "distributed" => Ok(DefaultIndexType::Distributed),
            other => Err(Error::InvalidArgument(format!(
                "Unknown default index type '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for DefaultIndexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DefaultIndexType::Sequence => "sequence",
            DefaultIndexType::DistributedSequence => "distributed-sequence",
            DefaultIndexType::Distributed => "distributed",
        };
        write!(f, "{}", name)
    }
}

/// Row labels of a frame
///
/// Labels need not be unique; [`Index::get_loc`] returns the first match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    values: Vec<DataValue>,
    name: Option<String>,
}

impl Index {
    /// Index from arbitrary labels
    pub fn from_values(values: Vec<DataValue>) -> Self {
        Index { values, name: None }
    }

    /// `0..len`
    pub fn range(len: usize) -> Self {
        Self::from_values((0..len as i64).map(DataValue::Int64).collect())
    }

    /// Default index for `partition_sizes.iter().sum()` rows laid out in
    /// partitions of the given sizes
    pub fn default_for(kind: DefaultIndexType, partition_sizes: &[usize]) -> Self {
        match kind {
            DefaultIndexType::Sequence | DefaultIndexType::DistributedSequence => {
                Self::range(partition_sizes.iter().sum())
            }
            DefaultIndexType::Distributed => {
                let values = partition_sizes
                    .iter()
                    .enumerate()
                    .flat_map(|(pid, &size)| {
                        let base = (pid as i64) << PARTITION_SHIFT;
                        (0..size as i64).map(move |row| DataValue::Int64(base + row))
                    })
                    .collect();
                Self::from_values(values)
            }
        }
    }

    /// Same labels under a new name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[DataValue] {
        &self.values
    }

    pub fn get_value(&self, pos: usize) -> Option<&DataValue> {
        self.values.get(pos)
    }

    /// Position of the first occurrence of `label`
    pub fn get_loc(&self, label: &DataValue) -> Option<usize> {
        self.values.iter().position(|v| v == label)
    }

    /// Whether every label occurs once
    pub fn is_unique(&self) -> bool {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for v in &self.values {
            let key = format!("{:?}", v);
            let count = counts.entry(key).or_insert(0);
            *count += 1;
            if *count > 1 {
                return false;
            }
        }
        true
    }

    /// Type of the labels, if they share one
    pub fn data_type(&self) -> Option<DataType> {
        let mut types = self.values.iter().filter_map(DataValue::data_type);
        let first = types.next()?;
        types.all(|t| t == first).then_some(first)
    }

    /// First `n` labels
    pub fn head(&self, n: usize) -> Index {
        Index {
            values: self.values.iter().take(n).cloned().collect(),
            name: self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_index() {
        let idx = Index::range(3);
        assert_eq!(idx.len(), 3);
        assert_eq!(idx.get_loc(&DataValue::Int64(2)), Some(2));
        assert_eq!(idx.get_loc(&DataValue::Int64(5)), None);
        assert!(idx.is_unique());
        assert_eq!(idx.data_type(), Some(DataType::Int64));
    }

    #[test]
    fn test_default_index_kinds() {
        let seq = Index::default_for(DefaultIndexType::DistributedSequence, &[2, 3]);
        assert_eq!(seq, Index::range(5));

        let dist = Index::default_for(DefaultIndexType::Distributed, &[2, 1]);
        assert_eq!(dist.len(), 3);
        assert_eq!(dist.values()[1], DataValue::Int64(1));
        assert_eq!(dist.values()[2], DataValue::Int64(1 << 33));
        assert!(dist.is_unique());
    }

    #[test]
    fn test_duplicate_labels() {
        let idx = Index::from_values(vec!["a".into(), "b".into(), "a".into()]).with_name("key");
        assert!(!idx.is_unique());
        assert_eq!(idx.get_loc(&"a".into()), Some(0));
        assert_eq!(idx.name(), Some("key"));
    }

    #[test]
    fn test_parse_index_type() {
        assert_eq!(
            "distributed-sequence".parse::<DefaultIndexType>().unwrap(),
            DefaultIndexType::DistributedSequence
        );
        assert!("random".parse::<DefaultIndexType>().is_err());
    }
}

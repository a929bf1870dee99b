//! Generic document tree for serialization.
//!
//! [`DocNode`] is a small YAML-shaped data model: scalars, sequences, and
//! mappings whose entries keep their insertion order. The flattener
//! ([`flatten`]) lowers the AST into this model; serialization itself is
//! delegated to serde, so the document writer stays external to this crate.

mod flatten;

pub use flatten::flatten;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// A scalar document value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

/// One node of the document tree.
///
/// Mappings are ordered: entries serialize in the order they were inserted,
/// never sorted. Equal trees serialize to equal output.
#[derive(Debug, Clone, PartialEq)]
pub enum DocNode {
    Scalar(Scalar),
    Sequence(Vec<DocNode>),
    Mapping(Vec<(String, DocNode)>),
}

impl DocNode {
    pub fn null() -> Self {
        DocNode::Scalar(Scalar::Null)
    }

    pub fn boolean(value: bool) -> Self {
        DocNode::Scalar(Scalar::Bool(value))
    }

    pub fn int(value: i64) -> Self {
        DocNode::Scalar(Scalar::Int(value))
    }

    pub fn float(value: f64) -> Self {
        DocNode::Scalar(Scalar::Float(value))
    }

    pub fn str(value: impl Into<String>) -> Self {
        DocNode::Scalar(Scalar::Str(value.into()))
    }
}

impl Serialize for DocNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DocNode::Scalar(s) => s.serialize(serializer),
            DocNode::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            DocNode::Mapping(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Null => serializer.serialize_unit(),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Int(i) => serializer.serialize_i64(*i),
            Scalar::Float(f) => serializer.serialize_f64(*f),
            Scalar::Str(s) => serializer.serialize_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_preserves_insertion_order() {
        let node = DocNode::Mapping(vec![
            ("zebra".into(), DocNode::int(1)),
            ("apple".into(), DocNode::int(2)),
            ("mango".into(), DocNode::int(3)),
        ]);
        let yaml = serde_yaml::to_string(&node).expect("serialization failed");
        assert_eq!(yaml, "zebra: 1\napple: 2\nmango: 3\n");
    }

    #[test]
    fn test_scalars_serialize() {
        let node = DocNode::Mapping(vec![
            ("n".into(), DocNode::null()),
            ("b".into(), DocNode::boolean(true)),
            ("i".into(), DocNode::int(-7)),
            ("s".into(), DocNode::str("hi")),
        ]);
        let yaml = serde_yaml::to_string(&node).expect("serialization failed");
        assert_eq!(yaml, "n: null\nb: true\ni: -7\ns: hi\n");
    }

    #[test]
    fn test_nested_sequence() {
        let node = DocNode::Mapping(vec![(
            "items".into(),
            DocNode::Sequence(vec![DocNode::int(1), DocNode::str("two")]),
        )]);
        let yaml = serde_yaml::to_string(&node).expect("serialization failed");
        assert_eq!(yaml, "items:\n- 1\n- two\n");
    }
}

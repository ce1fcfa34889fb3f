//! Dataset loading: TACRED-style JSON instances.
//!
//! A dataset file is one JSON array of instance records. Field names follow
//! the TACRED schema (`token`, `subj_start`, ...); fields this harness does
//! not use (POS tags, NER tags, dependency annotations) are ignored.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One labeled evaluation example.
///
/// Span offsets are token indices, inclusive on both ends, so a single-token
/// argument has `start == end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    /// Unique instance identifier.
    pub id: String,
    /// Sentence tokens.
    pub token: Vec<String>,
    /// Subject span start.
    pub subj_start: usize,
    /// Subject span end.
    pub subj_end: usize,
    /// Object span start.
    pub obj_start: usize,
    /// Object span end.
    pub obj_end: usize,
    /// Gold relation label.
    pub relation: String,
}

/// An ordered, validated collection of instances.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    instances: Vec<Instance>,
}

impl Dataset {
    /// Wrap pre-built instances, validating span bounds.
    pub fn new(instances: Vec<Instance>) -> Result<Self> {
        for instance in &instances {
            validate_spans(instance)?;
        }
        Ok(Self { instances })
    }

    /// Load instances from a JSON array file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::dataset(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    /// Parse instances from a JSON array string.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let instances: Vec<Instance> = serde_json::from_str(text)
            .map_err(|e| Error::dataset(format!("malformed instance JSON: {e}")))?;
        Self::new(instances)
    }

    /// Number of instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// True when the dataset has no instances.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Instances in dataset order.
    #[must_use]
    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    /// Gold labels in dataset order.
    #[must_use]
    pub fn gold_labels(&self) -> Vec<&str> {
        self.instances.iter().map(|i| i.relation.as_str()).collect()
    }

    /// Instance IDs in dataset order.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.instances.iter().map(|i| i.id.as_str()).collect()
    }
}

fn validate_spans(instance: &Instance) -> Result<()> {
    let tokens = instance.token.len();
    let check = |what: &str, start: usize, end: usize| -> Result<()> {
        if end < start {
            return Err(Error::dataset(format!(
                "instance {}: {what} span ends before it starts ({start}, {end})",
                instance.id
            )));
        }
        if end >= tokens {
            return Err(Error::dataset(format!(
                "instance {}: {what} span ({start}, {end}) exceeds {tokens} tokens",
                instance.id
            )));
        }
        Ok(())
    };
    check("subject", instance.subj_start, instance.subj_end)?;
    check("object", instance.obj_start, instance.obj_end)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {
            "id": "e7798fb926b9403cfcd2",
            "docid": "APW_ENG_20101103.0539",
            "relation": "per:title",
            "token": ["At", "the", "same", "time", ",", "Chief", "Financial", "Officer", "Douglas", "Flint", "will", "become", "chairman", "."],
            "subj_start": 8,
            "subj_end": 9,
            "obj_start": 12,
            "obj_end": 12,
            "subj_type": "PERSON",
            "obj_type": "TITLE",
            "stanford_pos": []
        }
    ]"#;

    #[test]
    fn test_parse_tacred_json() {
        let dataset = Dataset::from_json_str(SAMPLE).unwrap();
        assert_eq!(dataset.len(), 1);
        let instance = &dataset.instances()[0];
        assert_eq!(instance.id, "e7798fb926b9403cfcd2");
        assert_eq!(instance.relation, "per:title");
        assert_eq!(instance.token.len(), 14);
        assert_eq!((instance.subj_start, instance.subj_end), (8, 9));
        // Unknown fields like docid and stanford_pos are ignored.
    }

    #[test]
    fn test_gold_labels_in_order() {
        let dataset = Dataset::from_json_str(SAMPLE).unwrap();
        assert_eq!(dataset.gold_labels(), vec!["per:title"]);
        assert_eq!(dataset.ids(), vec!["e7798fb926b9403cfcd2"]);
    }

    #[test]
    fn test_span_beyond_tokens_rejected() {
        let instance = Instance {
            id: "x".into(),
            token: vec!["a".into(), "b".into()],
            subj_start: 0,
            subj_end: 5,
            obj_start: 1,
            obj_end: 1,
            relation: "no_relation".into(),
        };
        let err = Dataset::new(vec![instance]).unwrap_err();
        assert!(matches!(err, Error::Dataset(_)), "got {err:?}");
    }

    #[test]
    fn test_inverted_span_rejected() {
        let instance = Instance {
            id: "x".into(),
            token: vec!["a".into(), "b".into(), "c".into()],
            subj_start: 0,
            subj_end: 0,
            obj_start: 2,
            obj_end: 1,
            relation: "no_relation".into(),
        };
        assert!(Dataset::new(vec![instance]).is_err());
    }

    #[test]
    fn test_malformed_json_is_dataset_error() {
        let err = Dataset::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, Error::Dataset(_)));
    }
}

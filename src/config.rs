//! Evaluation configuration.
//!
//! Everything here has a sensible default; a config file only needs the keys
//! it wants to change. The negative label is deliberately not part of the
//! config: it belongs to the label vocabulary (see
//! [`LabelIndex`](crate::LabelIndex)), so there is exactly one source of
//! truth for it.

use crate::ranking::DEFAULT_HIT_LEVELS;
use crate::structure::{default_buckets, BucketDef};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Knobs for one evaluation run.
///
/// ```
/// use releval::EvalConfig;
///
/// let config = EvalConfig::default();
/// assert_eq!(config.hit_levels, vec![1, 3, 5, 10, 20, 50]);
/// assert_eq!(config.buckets.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Cutoffs for Hits@K.
    #[serde(default = "default_hit_levels")]
    pub hit_levels: Vec<usize>,
    /// Structural stratification buckets.
    #[serde(default = "default_buckets")]
    pub buckets: Vec<BucketDef>,
}

fn default_hit_levels() -> Vec<usize> {
    DEFAULT_HIT_LEVELS.to_vec()
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            hit_levels: default_hit_levels(),
            buckets: default_buckets(),
        }
    }
}

impl EvalConfig {
    /// Load a config from a JSON file. Missing keys fall back to defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| Error::config(format!("{}: {e}", path.display())))?;
        if config.hit_levels.is_empty() {
            return Err(Error::config(format!(
                "{}: hit_levels must not be empty",
                path.display()
            )));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::BucketRule;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EvalConfig::default();
        assert_eq!(config.hit_levels, vec![1, 3, 5, 10, 20, 50]);
        assert_eq!(config.buckets.len(), 3);
        assert_eq!(config.buckets[0].name, "argdist<=1");
    }

    #[test]
    fn test_empty_json_gives_defaults() {
        let config: EvalConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EvalConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config: EvalConfig = serde_json::from_str(r#"{"hit_levels": [1, 5]}"#).unwrap();
        assert_eq!(config.hit_levels, vec![1, 5]);
        assert_eq!(config.buckets, default_buckets());
    }

    #[test]
    fn test_bucket_override() {
        let json = r#"{
            "buckets": [
                {"name": "tight", "rule": {"arg_distance_at_most": 0}},
                {"name": "long", "rule": {"sentence_length_greater_than": 50}}
            ]
        }"#;
        let config: EvalConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.buckets.len(), 2);
        assert_eq!(config.buckets[0].rule, BucketRule::ArgDistanceAtMost(0));
        assert_eq!(
            config.buckets[1].rule,
            BucketRule::SentenceLengthGreaterThan(50)
        );
        assert_eq!(config.hit_levels, vec![1, 3, 5, 10, 20, 50]);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"hit_levels": [1, 10]}}"#).unwrap();
        let config = EvalConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.hit_levels, vec![1, 10]);
    }

    #[test]
    fn test_empty_hit_levels_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"hit_levels": []}}"#).unwrap();
        assert!(EvalConfig::from_json_file(file.path()).is_err());
    }

    #[test]
    fn test_roundtrip() {
        let config = EvalConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let back: EvalConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}

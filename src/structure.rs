//! Structural stratification: accuracy by argument distance and sentence length.
//!
//! Models that look fine in aggregate often fail on specific sentence shapes
//! (far-apart arguments, long sentences). This module derives two structural
//! features per instance and reports exact-match accuracy within configurable
//! feature buckets. Buckets are independent and non-exclusive: one instance
//! may land in zero, one, or several of them.

use crate::dataset::Instance;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

// =============================================================================
// Features
// =============================================================================

/// Structural features for one instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralFeatures {
    /// Signed token distance between the argument spans.
    pub argument_distance: i64,
    /// Sentence length in tokens.
    pub sentence_length: usize,
}

/// Signed distance between a subject span and an object span.
///
/// When the subject starts after the object ends, the distance is
/// `subj_start - obj_end`. Otherwise it is `obj_start - subj_end`, which is
/// negative whenever the spans overlap with the subject ahead. The asymmetry
/// is part of the feature definition and is kept as-is; callers bucketing on
/// it should expect negative values.
#[must_use]
pub fn argument_distance(
    subj_start: usize,
    subj_end: usize,
    obj_start: usize,
    obj_end: usize,
) -> i64 {
    let (ss, se) = (subj_start as i64, subj_end as i64);
    let (os, oe) = (obj_start as i64, obj_end as i64);
    if ss > oe {
        ss - oe
    } else {
        os - se
    }
}

/// Features for every instance, in dataset order.
#[must_use]
pub fn structural_features(instances: &[Instance]) -> Vec<StructuralFeatures> {
    instances
        .iter()
        .map(|i| StructuralFeatures {
            argument_distance: argument_distance(
                i.subj_start,
                i.subj_end,
                i.obj_start,
                i.obj_end,
            ),
            sentence_length: i.token.len(),
        })
        .collect()
}

// =============================================================================
// Buckets
// =============================================================================

/// Membership rule for one stratification bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketRule {
    /// Argument distance at most the bound.
    ArgDistanceAtMost(i64),
    /// Argument distance strictly greater than the bound.
    ArgDistanceGreaterThan(i64),
    /// Sentence length strictly greater than the bound.
    SentenceLengthGreaterThan(usize),
}

impl BucketRule {
    /// Whether an instance with these features belongs to the bucket.
    #[must_use]
    pub fn matches(&self, features: &StructuralFeatures) -> bool {
        match *self {
            BucketRule::ArgDistanceAtMost(bound) => features.argument_distance <= bound,
            BucketRule::ArgDistanceGreaterThan(bound) => features.argument_distance > bound,
            BucketRule::SentenceLengthGreaterThan(bound) => features.sentence_length > bound,
        }
    }
}

/// A named stratification bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketDef {
    /// Display name, e.g. `argdist<=1`.
    pub name: String,
    /// Membership rule.
    pub rule: BucketRule,
}

impl BucketDef {
    /// Create a named bucket.
    pub fn new(name: impl Into<String>, rule: BucketRule) -> Self {
        Self {
            name: name.into(),
            rule,
        }
    }
}

/// Default buckets: adjacent arguments, far arguments, long sentences.
#[must_use]
pub fn default_buckets() -> Vec<BucketDef> {
    vec![
        BucketDef::new("argdist<=1", BucketRule::ArgDistanceAtMost(1)),
        BucketDef::new("argdist>10", BucketRule::ArgDistanceGreaterThan(10)),
        BucketDef::new("sentlen>30", BucketRule::SentenceLengthGreaterThan(30)),
    ]
}

// =============================================================================
// Bucket Accuracy
// =============================================================================

/// Exact-match accuracy within one bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketAccuracy {
    /// Bucket display name.
    pub name: String,
    /// Fraction of members with predicted == gold; `None` when the bucket is
    /// empty (serialized as JSON `null`, rendered as "n/a").
    pub accuracy: Option<f64>,
    /// Members predicted exactly right.
    pub correct: usize,
    /// Members predicted wrong.
    pub wrong: usize,
    /// Bucket size.
    pub total: usize,
}

/// Per-bucket exact-match accuracy.
///
/// `gold` and `predicted` must be the same length, and `features` must have
/// one entry per instance. An empty bucket yields `accuracy: None` — there is
/// nothing meaningful to average, and silently reporting 0 would read as
/// "always wrong".
pub fn bucket_accuracy(
    features: &[StructuralFeatures],
    gold: &[&str],
    predicted: &[&str],
    buckets: &[BucketDef],
) -> Result<Vec<BucketAccuracy>> {
    if gold.len() != predicted.len() {
        return Err(Error::LengthMismatch {
            gold: gold.len(),
            predicted: predicted.len(),
        });
    }
    if features.len() != gold.len() {
        return Err(Error::dataset(format!(
            "{} structural feature rows for {} labels",
            features.len(),
            gold.len()
        )));
    }

    let mut out = Vec::with_capacity(buckets.len());
    for bucket in buckets {
        let mut correct = 0usize;
        let mut total = 0usize;
        for (i, feats) in features.iter().enumerate() {
            if bucket.rule.matches(feats) {
                total += 1;
                if gold[i] == predicted[i] {
                    correct += 1;
                }
            }
        }
        let accuracy = if total > 0 {
            Some(correct as f64 / total as f64)
        } else {
            None
        };
        out.push(BucketAccuracy {
            name: bucket.name.clone(),
            accuracy,
            correct,
            wrong: total - correct,
            total,
        });
    }
    Ok(out)
}

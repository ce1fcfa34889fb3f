//! Classification scoring with a designated negative class.
//!
//! The headline metrics are micro-averaged binary *relation detection*: an
//! instance counts as positive when its label is anything other than the
//! negative ("no relation") label. A true positive is therefore any instance
//! where gold and prediction are both positive, even if the two relation
//! labels disagree. Exact-label agreement is tracked separately, per
//! instance in [`ScoreReport::correct_indices`] / [`ScoreReport::wrong_indices`]
//! and per relation in [`ScoreReport::per_label`].
//!
//! Zero denominators are defined values, never errors:
//!
//! | Case | Value |
//! |------|-------|
//! | no positive predictions (TP + FP = 0) | precision = 1.0 |
//! | no positive gold instances (TP + FN = 0) | recall = 1.0 |
//! | precision + recall = 0 | F1 = 0.0 |

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Report Types
// =============================================================================

/// Binary detection metrics plus per-instance error bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Micro precision over the is-not-negative condition.
    pub precision: f64,
    /// Micro recall over the is-not-negative condition.
    pub recall: f64,
    /// Harmonic mean of precision and recall.
    pub f1: f64,
    /// Gold positive, predicted positive.
    pub true_positives: usize,
    /// Gold negative, predicted positive.
    pub false_positives: usize,
    /// Gold positive, predicted negative.
    pub false_negatives: usize,
    /// Gold negative, predicted negative.
    pub true_negatives: usize,
    /// Instance indices where predicted == gold exactly.
    pub correct_indices: Vec<usize>,
    /// Instance indices where predicted != gold.
    pub wrong_indices: Vec<usize>,
    /// Predicted labels at the wrong indices, in the same order.
    pub wrong_predictions: Vec<String>,
    /// Per-relation tally, negative label excluded, sorted by gold count
    /// descending (ties by name).
    pub per_label: Vec<LabelTally>,
}

/// Diagnostic counts for one relation label.
///
/// Unlike the headline metrics, the per-label values use exact-match
/// counting, and an empty denominator yields 0.0 rather than 1.0 — a label
/// that is never predicted has nothing to be precise about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelTally {
    /// Relation label name.
    pub label: String,
    /// Gold occurrences.
    pub gold: usize,
    /// Predicted occurrences.
    pub predicted: usize,
    /// Exact matches (gold == predicted == this label).
    pub correct: usize,
    /// correct / predicted, or 0.0 when never predicted.
    pub precision: f64,
    /// correct / gold, or 0.0 when never gold.
    pub recall: f64,
    /// Harmonic mean of the above.
    pub f1: f64,
}

// =============================================================================
// Scoring
// =============================================================================

/// Score predicted labels against gold labels.
///
/// `gold` and `predicted` must be the same length; anything else is a
/// [`Error::LengthMismatch`]. Labels are compared as plain strings — the
/// caller decides what vocabulary they come from.
///
/// # Example
///
/// ```rust
/// use releval::scorer::score;
///
/// let gold = ["per:title", "per:title", "no_relation", "per:age"];
/// let pred = ["per:title", "no_relation", "no_relation", "per:age"];
/// let report = score(&gold, &pred, "no_relation").unwrap();
/// assert_eq!(report.precision, 1.0);
/// assert_eq!(report.f1, 0.8);
/// ```
pub fn score(gold: &[&str], predicted: &[&str], negative_label: &str) -> Result<ScoreReport> {
    if gold.len() != predicted.len() {
        return Err(Error::LengthMismatch {
            gold: gold.len(),
            predicted: predicted.len(),
        });
    }

    let mut true_positives = 0usize;
    let mut false_positives = 0usize;
    let mut false_negatives = 0usize;
    let mut true_negatives = 0usize;
    let mut correct_indices = Vec::new();
    let mut wrong_indices = Vec::new();
    let mut wrong_predictions = Vec::new();
    // label -> (gold, predicted, correct) counts
    let mut tallies: HashMap<&str, (usize, usize, usize)> = HashMap::new();

    for (i, (&g, &p)) in gold.iter().zip(predicted.iter()).enumerate() {
        let gold_positive = g != negative_label;
        let pred_positive = p != negative_label;
        match (gold_positive, pred_positive) {
            (true, true) => true_positives += 1,
            (false, true) => false_positives += 1,
            (true, false) => false_negatives += 1,
            (false, false) => true_negatives += 1,
        }

        if g == p {
            correct_indices.push(i);
        } else {
            wrong_indices.push(i);
            wrong_predictions.push(p.to_string());
        }

        if gold_positive {
            tallies.entry(g).or_insert((0, 0, 0)).0 += 1;
        }
        if pred_positive {
            tallies.entry(p).or_insert((0, 0, 0)).1 += 1;
        }
        if gold_positive && g == p {
            tallies.entry(g).or_insert((0, 0, 0)).2 += 1;
        }
    }

    let precision = if true_positives + false_positives == 0 {
        1.0
    } else {
        true_positives as f64 / (true_positives + false_positives) as f64
    };
    let recall = if true_positives + false_negatives == 0 {
        1.0
    } else {
        true_positives as f64 / (true_positives + false_negatives) as f64
    };
    let f1 = f1_score(precision, recall);

    let mut per_label: Vec<LabelTally> = tallies
        .into_iter()
        .map(|(label, (gold, predicted, correct))| {
            let p = if predicted > 0 {
                correct as f64 / predicted as f64
            } else {
                0.0
            };
            let r = if gold > 0 {
                correct as f64 / gold as f64
            } else {
                0.0
            };
            LabelTally {
                label: label.to_string(),
                gold,
                predicted,
                correct,
                precision: p,
                recall: r,
                f1: f1_score(p, r),
            }
        })
        .collect();
    per_label.sort_by(|a, b| b.gold.cmp(&a.gold).then_with(|| a.label.cmp(&b.label)));

    Ok(ScoreReport {
        precision,
        recall,
        f1,
        true_positives,
        false_positives,
        false_negatives,
        true_negatives,
        correct_indices,
        wrong_indices,
        wrong_predictions,
        per_label,
    })
}

/// Harmonic mean of precision and recall; 0.0 when both are 0.
fn f1_score(precision: f64, recall: f64) -> f64 {
    if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_mixed_scenario() {
        // gold  = [A, A, neg, B]
        // pred  = [A, neg, neg, B]
        // TP=2 (both A and B detected), FP=0, FN=1 (missed A), TN=1.
        let report = score(&["A", "A", "neg", "B"], &["A", "neg", "neg", "B"], "neg").unwrap();
        assert_eq!(report.true_positives, 2);
        assert_eq!(report.false_positives, 0);
        assert_eq!(report.false_negatives, 1);
        assert_eq!(report.true_negatives, 1);
        assert!((report.precision - 1.0).abs() < EPS);
        assert!((report.recall - 2.0 / 3.0).abs() < EPS);
        assert!((report.f1 - 0.8).abs() < EPS);
    }

    #[test]
    fn test_side_outputs_use_exact_match() {
        let report = score(&["A", "A", "neg", "B"], &["A", "neg", "neg", "B"], "neg").unwrap();
        assert_eq!(report.correct_indices, vec![0, 2, 3]);
        assert_eq!(report.wrong_indices, vec![1]);
        assert_eq!(report.wrong_predictions, vec!["neg".to_string()]);
    }

    #[test]
    fn test_wrong_positive_label_still_counts_as_detection() {
        // gold=A predicted=B: a true positive for detection, but a wrong index.
        let report = score(&["A"], &["B"], "neg").unwrap();
        assert_eq!(report.true_positives, 1);
        assert_eq!(report.precision, 1.0);
        assert_eq!(report.recall, 1.0);
        assert_eq!(report.wrong_indices, vec![0]);
        assert_eq!(report.wrong_predictions, vec!["B".to_string()]);
    }

    #[test]
    fn test_all_correct() {
        let labels = ["A", "B", "neg", "A"];
        let report = score(&labels, &labels, "neg").unwrap();
        assert_eq!(report.precision, 1.0);
        assert_eq!(report.recall, 1.0);
        assert_eq!(report.f1, 1.0);
        assert_eq!(report.correct_indices.len(), 4);
        assert!(report.wrong_indices.is_empty());
    }

    #[test]
    fn test_all_negative_both_sides() {
        // Both denominators are zero: precision and recall are defined as 1.0.
        let report = score(&["neg", "neg"], &["neg", "neg"], "neg").unwrap();
        assert_eq!(report.precision, 1.0);
        assert_eq!(report.recall, 1.0);
        assert_eq!(report.f1, 1.0);
        assert_eq!(report.true_negatives, 2);
    }

    #[test]
    fn test_no_positive_predictions() {
        // Precision defined as 1.0; recall suffers.
        let report = score(&["A", "B"], &["neg", "neg"], "neg").unwrap();
        assert_eq!(report.precision, 1.0);
        assert_eq!(report.recall, 0.0);
        assert_eq!(report.f1, 0.0);
    }

    #[test]
    fn test_no_positive_gold() {
        // Recall defined as 1.0; precision suffers.
        let report = score(&["neg", "neg"], &["A", "neg"], "neg").unwrap();
        assert_eq!(report.recall, 1.0);
        assert!((report.precision - 0.0).abs() < EPS);
        assert_eq!(report.f1, 0.0);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let err = score(&["A", "B"], &["A"], "neg").unwrap_err();
        assert!(matches!(
            err,
            Error::LengthMismatch {
                gold: 2,
                predicted: 1
            }
        ));
    }

    #[test]
    fn test_empty_inputs() {
        let report = score(&[], &[], "neg").unwrap();
        assert_eq!(report.precision, 1.0);
        assert_eq!(report.recall, 1.0);
        assert_eq!(report.f1, 1.0);
        assert!(report.correct_indices.is_empty());
        assert!(report.per_label.is_empty());
    }

    #[test]
    fn test_per_label_tally() {
        let gold = ["A", "A", "B", "neg"];
        let pred = ["A", "B", "B", "A"];
        let report = score(&gold, &pred, "neg").unwrap();

        // Sorted by gold count descending: A (2), B (1).
        assert_eq!(report.per_label.len(), 2);
        let a = &report.per_label[0];
        assert_eq!(a.label, "A");
        assert_eq!((a.gold, a.predicted, a.correct), (2, 2, 1));
        assert!((a.precision - 0.5).abs() < EPS);
        assert!((a.recall - 0.5).abs() < EPS);

        let b = &report.per_label[1];
        assert_eq!(b.label, "B");
        assert_eq!((b.gold, b.predicted, b.correct), (1, 2, 1));
        assert!((b.precision - 0.5).abs() < EPS);
        assert!((b.recall - 1.0).abs() < EPS);
    }

    #[test]
    fn test_per_label_excludes_negative() {
        let report = score(&["neg", "A"], &["neg", "A"], "neg").unwrap();
        assert!(report.per_label.iter().all(|t| t.label != "neg"));
    }

    #[test]
    fn test_f1_is_harmonic_mean() {
        let report = score(&["A", "A", "neg", "neg"], &["A", "neg", "A", "neg"], "neg").unwrap();
        let p = report.precision;
        let r = report.recall;
        assert!((report.f1 - 2.0 * p * r / (p + r)).abs() < EPS);
    }
}

//! Unified evaluation report.
//!
//! One cohesive structure holding everything a run produces: binary
//! classification metrics, ranking metrics, and structural stratification.
//! Render it with [`EvalReport::summary`] for humans or
//! [`EvalReport::to_json`] for machines; stored values are never rounded,
//! rounding happens only at render time.

use crate::ranking::RankReport;
use crate::scorer::ScoreReport;
use crate::structure::BucketAccuracy;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Report Structure
// =============================================================================

/// Full results of evaluating one prediction set against one dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalReport {
    /// Dataset identifier (usually the file stem).
    pub dataset: String,

    /// RFC 3339 timestamp of the run.
    pub timestamp: String,

    /// Number of evaluated instances.
    pub instances: usize,

    /// Size of the label vocabulary.
    pub labels: usize,

    /// Name of the negative label.
    pub negative_label: String,

    /// Binary not-negative precision/recall/F1 plus exact-match detail.
    pub classification: ScoreReport,

    /// Rank-based metrics over positive-gold instances.
    pub ranking: RankReport,

    /// Exact-match accuracy per structural bucket.
    pub structure: Vec<BucketAccuracy>,
}

// =============================================================================
// Rendering
// =============================================================================

impl EvalReport {
    /// Generate a human-readable summary.
    ///
    /// Percentages are rendered at 2 decimals, mean rank as a raw value at
    /// 2 decimals, and bucket accuracy as a percentage at 4 decimals.
    #[must_use]
    pub fn summary(&self) -> String {
        self.render(false)
    }

    /// Like [`summary`](Self::summary), plus a per-label breakdown.
    #[must_use]
    pub fn summary_verbose(&self) -> String {
        self.render(true)
    }

    fn render(&self, verbose: bool) -> String {
        let mut out = String::new();

        out.push_str(&format!("=== Evaluation Report: {} ===\n", self.dataset));
        out.push_str(&format!("Generated: {}\n", self.timestamp));
        out.push_str(&format!(
            "Instances: {} | Labels: {} | Negative: {}\n\n",
            self.instances, self.labels, self.negative_label
        ));

        out.push_str("## Classification\n");
        out.push_str(&format!(
            "  Precision: {:.2}%\n",
            self.classification.precision * 100.0
        ));
        out.push_str(&format!(
            "  Recall:    {:.2}%\n",
            self.classification.recall * 100.0
        ));
        out.push_str(&format!(
            "  F1:        {:.2}%\n",
            self.classification.f1 * 100.0
        ));
        out.push_str(&format!(
            "  (TP: {} | FP: {} | FN: {} | TN: {})\n\n",
            self.classification.true_positives,
            self.classification.false_positives,
            self.classification.false_negatives,
            self.classification.true_negatives
        ));

        if verbose && !self.classification.per_label.is_empty() {
            out.push_str("## Per-Label Breakdown\n");
            for tally in &self.classification.per_label {
                out.push_str(&format!(
                    "  {:<40} P={:6.2}% R={:6.2}% F1={:6.2}% (gold={})\n",
                    tally.label,
                    tally.precision * 100.0,
                    tally.recall * 100.0,
                    tally.f1 * 100.0,
                    tally.gold
                ));
            }
            out.push('\n');
        }

        out.push_str("## Ranking\n");
        for hits in &self.ranking.hits {
            out.push_str(&format!(
                "  HITs@{}: {:.2}\n",
                hits.k,
                hits.fraction * 100.0
            ));
        }
        out.push_str(&format!("  MRR: {:.2}\n", self.ranking.mrr * 100.0));
        out.push_str(&format!("  MR: {:.2}\n", self.ranking.mean_rank));
        out.push_str(&format!(
            "  (ranked: {} | skipped negative-gold: {})\n\n",
            self.ranking.evaluated, self.ranking.skipped
        ));

        out.push_str("## Structure Errors\n");
        for bucket in &self.structure {
            let accuracy = match bucket.accuracy {
                Some(a) => format!("{:.4}", a * 100.0),
                None => "n/a".to_string(),
            };
            out.push_str(&format!(
                "  {} | Accuracy: {} | Correct: {} | Wrong: {} | Total: {}\n",
                bucket.name, accuracy, bucket.correct, bucket.wrong, bucket.total
            ));
        }

        out
    }

    /// Export the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for EvalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}

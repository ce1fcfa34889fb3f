//! Rank-based evaluation over positive instances.
//!
//! For each instance the gold label gets a 1-based rank: its position when
//! all labels are ordered by descending predicted probability. The order is
//! fully deterministic — equal probabilities are broken by ascending label
//! ID. Instances whose gold label is the negative label are excluded from
//! aggregation entirely, since ranking quality is only meaningful when there
//! is a true relation to find.
//!
//! Aggregates:
//!
//! - **Mean Rank (MR)**: arithmetic mean of ranks; 1.0 is perfect.
//! - **Mean Reciprocal Rank (MRR)**: mean of 1/rank; 1.0 is perfect.
//! - **Hits@K**: fraction of instances with rank <= K, for each configured K.
//!
//! By convention Hits and MRR are displayed as percentages with 2 decimals
//! and MR as a raw mean with 2 decimals; the stored values are unrounded.

use crate::label::LabelIndex;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default Hits@K cutoffs.
pub const DEFAULT_HIT_LEVELS: [usize; 6] = [1, 3, 5, 10, 20, 50];

/// Ranking metrics over instances with a positive gold label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankReport {
    /// Arithmetic mean of gold-label ranks.
    pub mean_rank: f64,
    /// Arithmetic mean of reciprocal ranks.
    pub mrr: f64,
    /// Hits@K per configured cutoff, ascending K.
    pub hits: Vec<HitsAtK>,
    /// 1-based gold ranks, one per included instance, in input order.
    pub ranks: Vec<usize>,
    /// Included instances (positive gold label).
    pub evaluated: usize,
    /// Excluded instances (negative gold label).
    pub skipped: usize,
}

/// Fraction of included instances whose gold label ranked in the top K.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitsAtK {
    /// Rank cutoff.
    pub k: usize,
    /// Fraction in [0, 1].
    pub fraction: f64,
}

/// Rank of the gold label within one probability row.
///
/// The rank is 1 plus the number of labels strictly more probable than the
/// gold label, plus the number of equally probable labels with a smaller ID.
/// This is exactly the position the gold label takes when IDs are sorted by
/// descending probability with ascending-ID tie-break, without materializing
/// the sort.
///
/// Fails with [`Error::UnknownLabelId`] when `gold_id` is outside the row.
pub fn rank_of(row: &[f64], gold_id: usize) -> Result<usize> {
    let gold_prob = row
        .get(gold_id)
        .copied()
        .ok_or(Error::UnknownLabelId(gold_id))?;
    let mut ahead = 0usize;
    for (id, &p) in row.iter().enumerate() {
        if p > gold_prob || (p == gold_prob && id < gold_id) {
            ahead += 1;
        }
    }
    Ok(ahead + 1)
}

/// Compute ranking metrics for a batch of probability rows.
///
/// `probs` and `gold` must be the same length, every row must have one entry
/// per label in `labels`, and every gold label must be in vocabulary.
/// Negative-gold instances are skipped; if nothing remains the result is
/// [`Error::EmptyRankSet`] rather than a silent divide-by-zero.
///
/// Duplicate or unsorted `hit_levels` are tolerated; the report carries each
/// distinct cutoff once, ascending.
pub fn compute_ranks(
    probs: &[Vec<f64>],
    gold: &[&str],
    labels: &LabelIndex,
    hit_levels: &[usize],
) -> Result<RankReport> {
    if probs.len() != gold.len() {
        return Err(Error::LengthMismatch {
            gold: gold.len(),
            predicted: probs.len(),
        });
    }

    let mut ranks = Vec::new();
    let mut skipped = 0usize;
    for (index, (row, &gold_label)) in probs.iter().zip(gold.iter()).enumerate() {
        if row.len() != labels.len() {
            return Err(Error::ProbabilityShape {
                index,
                expected: labels.len(),
                actual: row.len(),
            });
        }
        let gold_id = labels.id_of(gold_label)?;
        if gold_id == labels.negative_id() {
            skipped += 1;
            continue;
        }
        ranks.push(rank_of(row, gold_id)?);
    }

    if ranks.is_empty() {
        return Err(Error::EmptyRankSet(labels.negative_label().to_string()));
    }

    let count = ranks.len() as f64;
    let mean_rank = ranks.iter().sum::<usize>() as f64 / count;
    let mrr = ranks.iter().map(|&r| 1.0 / r as f64).sum::<f64>() / count;

    let mut levels = hit_levels.to_vec();
    levels.sort_unstable();
    levels.dedup();
    let hits = levels
        .into_iter()
        .map(|k| HitsAtK {
            k,
            fraction: ranks.iter().filter(|&&r| r <= k).count() as f64 / count,
        })
        .collect();

    let evaluated = ranks.len();
    Ok(RankReport {
        mean_rank,
        mrr,
        hits,
        ranks,
        evaluated,
        skipped,
    })
}

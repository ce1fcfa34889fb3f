//! # releval
//!
//! Offline evaluation for relation classification models.
//!
//! A model predicts, for each sentence with a marked subject and object, a
//! relation label plus a probability over the whole label vocabulary. This
//! crate scores a saved set of such predictions against a gold dataset:
//!
//! - **Classification**: micro precision/recall/F1 over the binary
//!   "predicted some relation" condition, plus an exact-match per-label
//!   breakdown
//! - **Ranking**: mean rank, MRR, and Hits@K of the gold label in each
//!   probability row, over positive-gold instances
//! - **Structure**: exact-match accuracy stratified by argument distance and
//!   sentence length, to expose failures that aggregate metrics hide
//! - **Artifacts**: per-instance dumps (correct/wrong IDs, probabilities,
//!   id-to-prediction maps) for downstream error analysis
//!
//! ## Quick Start
//!
//! ```rust
//! use releval::{Dataset, Evaluator, LabelIndex, Prediction, PredictionSet};
//!
//! let labels = LabelIndex::from_names(["no_relation", "per:title"], "no_relation").unwrap();
//!
//! let dataset = Dataset::from_json_str(
//!     r#"[{"id": "e1", "token": ["He", "was", "named", "CEO"],
//!          "subj_start": 0, "subj_end": 0, "obj_start": 3, "obj_end": 3,
//!          "relation": "per:title"}]"#,
//! )
//! .unwrap();
//!
//! let predictions = PredictionSet::from_records(
//!     vec![Prediction::new(Some("e1".into()), 1, vec![0.1, 0.9])],
//!     &labels,
//! )
//! .unwrap();
//!
//! let report = Evaluator::new(labels)
//!     .evaluate("demo", &dataset, &predictions)
//!     .unwrap();
//! assert_eq!(report.classification.f1, 1.0);
//! println!("{report}");
//! ```
//!
//! ## Conventions
//!
//! - Predictions align with the dataset by position; IDs, when present, are
//!   verified, never used to reorder.
//! - Zero-denominator metrics take defined values (see [`scorer`]) instead
//!   of erroring; an all-negative dataset is still scorable.
//! - The negative label is a property of the [`LabelIndex`], stated once at
//!   construction. Ranking skips negative-gold instances; classification
//!   treats them as the "no relation" ground truth.
//!
//! The built-in [`LabelIndex::tacred`] vocabulary covers the 42-label TACRED
//! scheme; any other scheme can be supplied by name list or id mapping.

#![warn(missing_docs)]

pub mod config;
pub mod dataset;
mod error;
pub mod evaluator;
pub mod export;
pub mod label;
pub mod prediction;
pub mod ranking;
pub mod report;
pub mod scorer;
pub mod structure;

pub use config::EvalConfig;
pub use dataset::{Dataset, Instance};
pub use error::{Error, Result};
pub use evaluator::Evaluator;
pub use export::{write_artifacts, InstanceRecord};
pub use label::{LabelIndex, NO_RELATION, TACRED_LABELS};
pub use prediction::{Prediction, PredictionSet};
pub use ranking::{compute_ranks, rank_of, HitsAtK, RankReport, DEFAULT_HIT_LEVELS};
pub use report::EvalReport;
pub use scorer::{score, LabelTally, ScoreReport};
pub use structure::{
    argument_distance, bucket_accuracy, default_buckets, structural_features, BucketAccuracy,
    BucketDef, BucketRule, StructuralFeatures,
};

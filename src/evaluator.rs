//! Evaluation orchestration.
//!
//! [`Evaluator`] ties the pieces together: it checks that a dataset and a
//! prediction set line up, then runs classification scoring, ranking, and
//! structural stratification in one pass and returns a single
//! [`EvalReport`].

use crate::config::EvalConfig;
use crate::dataset::Dataset;
use crate::label::LabelIndex;
use crate::prediction::PredictionSet;
use crate::ranking::compute_ranks;
use crate::report::EvalReport;
use crate::scorer::score;
use crate::structure::{bucket_accuracy, structural_features};
use crate::{Error, Result};
use chrono::Utc;

/// Runs a full evaluation for one label vocabulary and configuration.
///
/// ```
/// use releval::{Dataset, Evaluator, LabelIndex, Prediction, PredictionSet};
///
/// let labels = LabelIndex::from_names(["none", "works_for"], "none").unwrap();
/// let dataset = Dataset::from_json_str(
///     r#"[{"id": "e1", "token": ["a", "b", "c"],
///          "subj_start": 0, "subj_end": 0,
///          "obj_start": 2, "obj_end": 2,
///          "relation": "works_for"}]"#,
/// )
/// .unwrap();
/// let predictions = PredictionSet::from_records(
///     vec![Prediction::new(Some("e1".into()), 1, vec![0.2, 0.8])],
///     &labels,
/// )
/// .unwrap();
///
/// let report = Evaluator::new(labels)
///     .evaluate("demo", &dataset, &predictions)
///     .unwrap();
/// assert_eq!(report.classification.true_positives, 1);
/// ```
#[derive(Debug, Clone)]
pub struct Evaluator {
    labels: LabelIndex,
    config: EvalConfig,
}

impl Evaluator {
    /// Evaluator with the default configuration.
    #[must_use]
    pub fn new(labels: LabelIndex) -> Self {
        Self::with_config(labels, EvalConfig::default())
    }

    /// Evaluator with an explicit configuration.
    #[must_use]
    pub fn with_config(labels: LabelIndex, config: EvalConfig) -> Self {
        Self { labels, config }
    }

    /// The label vocabulary in use.
    #[must_use]
    pub fn labels(&self) -> &LabelIndex {
        &self.labels
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Evaluate one prediction set against one dataset.
    ///
    /// `name` identifies the run in the report. The prediction set must have
    /// exactly one row per instance, in dataset order; rows that carry an id
    /// must agree with the instance id at the same position.
    pub fn evaluate(
        &self,
        name: &str,
        dataset: &Dataset,
        predictions: &PredictionSet,
    ) -> Result<EvalReport> {
        if dataset.len() != predictions.len() {
            return Err(Error::LengthMismatch {
                gold: dataset.len(),
                predicted: predictions.len(),
            });
        }
        self.check_ids(dataset, predictions)?;

        let gold = dataset.gold_labels();
        let predicted = predictions.predicted_labels(&self.labels)?;

        let classification = score(&gold, &predicted, self.labels.negative_label())?;
        let ranking = compute_ranks(
            predictions.probabilities(),
            &gold,
            &self.labels,
            &self.config.hit_levels,
        )?;
        let features = structural_features(dataset.instances());
        let structure = bucket_accuracy(&features, &gold, &predicted, &self.config.buckets)?;

        Ok(EvalReport {
            dataset: name.to_string(),
            timestamp: Utc::now().to_rfc3339(),
            instances: dataset.len(),
            labels: self.labels.len(),
            negative_label: self.labels.negative_label().to_string(),
            classification,
            ranking,
            structure,
        })
    }

    /// Predictions are positional; ids, when present, must match.
    fn check_ids(&self, dataset: &Dataset, predictions: &PredictionSet) -> Result<()> {
        for (i, (instance, id)) in dataset
            .instances()
            .iter()
            .zip(predictions.ids().iter())
            .enumerate()
        {
            if let Some(id) = id {
                if id != &instance.id {
                    return Err(Error::prediction(format!(
                        "row {i}: prediction id {id:?} does not match instance id {:?}",
                        instance.id
                    )));
                }
            }
        }
        Ok(())
    }
}

//! Per-run artifact files for downstream error analysis.
//!
//! A run can dump its raw materials next to the report so that mistakes can
//! be inspected without re-running inference: which instances were right,
//! which were wrong and what the model said instead, the full probability
//! matrix, and the report itself.

use crate::dataset::Dataset;
use crate::label::LabelIndex;
use crate::prediction::PredictionSet;
use crate::report::EvalReport;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// IDs of instances predicted exactly right, one per line.
pub const CORRECT_IDS_FILE: &str = "correct_ids.txt";
/// IDs of instances predicted wrong, one per line.
pub const WRONG_IDS_FILE: &str = "wrong_ids.txt";
/// Predicted label names at the wrong instances, one per line, aligned with
/// [`WRONG_IDS_FILE`].
pub const WRONG_PREDICTIONS_FILE: &str = "wrong_predictions.txt";
/// Probability matrix, one space-separated row per instance in label-ID
/// order.
pub const PROBS_FILE: &str = "probs.txt";
/// Flat JSON object mapping instance ID to predicted label.
pub const ID2PREDS_FILE: &str = "id2preds.json";
/// One JSON record per instance: id, gold label, predicted label.
pub const PREDICTIONS_FILE: &str = "predictions.jsonl";
/// The full evaluation report as pretty-printed JSON.
pub const REPORT_FILE: &str = "report.json";

/// One line of [`PREDICTIONS_FILE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceRecord {
    /// Instance identifier.
    pub id: String,
    /// Gold label.
    pub label_true: String,
    /// Predicted label.
    pub label_pred: String,
}

/// Write the artifact set for one evaluated run into `dir`.
///
/// The directory is created if needed; existing files are overwritten. The
/// report must come from evaluating exactly this dataset and prediction set.
pub fn write_artifacts(
    dir: impl AsRef<Path>,
    dataset: &Dataset,
    predictions: &PredictionSet,
    labels: &LabelIndex,
    report: &EvalReport,
) -> Result<()> {
    let dir = dir.as_ref();
    if dataset.len() != predictions.len() {
        return Err(Error::LengthMismatch {
            gold: dataset.len(),
            predicted: predictions.len(),
        });
    }
    if report.instances != dataset.len() {
        return Err(Error::dataset(format!(
            "report covers {} instances but the dataset has {}",
            report.instances,
            dataset.len()
        )));
    }
    fs::create_dir_all(dir)?;

    let ids = dataset.ids();
    let predicted = predictions.predicted_labels(labels)?;

    let lookup = |index: usize| -> Result<&str> {
        ids.get(index).copied().ok_or_else(|| {
            Error::dataset(format!(
                "report references instance index {index}, beyond the dataset"
            ))
        })
    };

    let mut correct_ids = String::new();
    for &index in &report.classification.correct_indices {
        correct_ids.push_str(lookup(index)?);
        correct_ids.push('\n');
    }
    fs::write(dir.join(CORRECT_IDS_FILE), correct_ids)?;

    let mut wrong_ids = String::new();
    for &index in &report.classification.wrong_indices {
        wrong_ids.push_str(lookup(index)?);
        wrong_ids.push('\n');
    }
    fs::write(dir.join(WRONG_IDS_FILE), wrong_ids)?;

    let mut wrong_predictions = String::new();
    for label in &report.classification.wrong_predictions {
        wrong_predictions.push_str(label);
        wrong_predictions.push('\n');
    }
    fs::write(dir.join(WRONG_PREDICTIONS_FILE), wrong_predictions)?;

    let mut probs = String::new();
    for row in predictions.probabilities() {
        let line: Vec<String> = row.iter().map(f64::to_string).collect();
        probs.push_str(&line.join(" "));
        probs.push('\n');
    }
    fs::write(dir.join(PROBS_FILE), probs)?;

    let id2preds: BTreeMap<&str, &str> = ids
        .iter()
        .copied()
        .zip(predicted.iter().copied())
        .collect();
    fs::write(dir.join(ID2PREDS_FILE), serde_json::to_string(&id2preds)?)?;

    let mut records = String::new();
    for ((id, gold), pred) in ids
        .iter()
        .zip(dataset.gold_labels().iter())
        .zip(predicted.iter())
    {
        let record = InstanceRecord {
            id: (*id).to_string(),
            label_true: (*gold).to_string(),
            label_pred: (*pred).to_string(),
        };
        records.push_str(&serde_json::to_string(&record)?);
        records.push('\n');
    }
    fs::write(dir.join(PREDICTIONS_FILE), records)?;

    fs::write(dir.join(REPORT_FILE), report.to_json()?)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::Evaluator;
    use crate::prediction::Prediction;

    fn fixture() -> (LabelIndex, Dataset, PredictionSet, EvalReport) {
        let labels =
            LabelIndex::from_names(["no_relation", "per:title"], "no_relation").unwrap();
        let dataset = Dataset::from_json_str(
            r#"[
            {"id": "a", "token": ["x", "y", "z"],
             "subj_start": 0, "subj_end": 0, "obj_start": 2, "obj_end": 2,
             "relation": "per:title"},
            {"id": "b", "token": ["x", "y", "z"],
             "subj_start": 0, "subj_end": 0, "obj_start": 2, "obj_end": 2,
             "relation": "per:title"}
        ]"#,
        )
        .unwrap();
        let predictions = PredictionSet::from_records(
            vec![
                Prediction::new(None, 1, vec![0.25, 0.75]),
                Prediction::new(None, 0, vec![0.6, 0.4]),
            ],
            &labels,
        )
        .unwrap();
        let report = Evaluator::new(labels.clone())
            .evaluate("fixture", &dataset, &predictions)
            .unwrap();
        (labels, dataset, predictions, report)
    }

    #[test]
    fn test_writes_all_artifacts() {
        let (labels, dataset, predictions, report) = fixture();
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path(), &dataset, &predictions, &labels, &report).unwrap();

        for name in [
            CORRECT_IDS_FILE,
            WRONG_IDS_FILE,
            WRONG_PREDICTIONS_FILE,
            PROBS_FILE,
            ID2PREDS_FILE,
            PREDICTIONS_FILE,
            REPORT_FILE,
        ] {
            assert!(dir.path().join(name).exists(), "missing artifact {name}");
        }
    }

    #[test]
    fn test_id_files_partition_by_exact_match() {
        let (labels, dataset, predictions, report) = fixture();
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path(), &dataset, &predictions, &labels, &report).unwrap();

        let correct = fs::read_to_string(dir.path().join(CORRECT_IDS_FILE)).unwrap();
        let wrong = fs::read_to_string(dir.path().join(WRONG_IDS_FILE)).unwrap();
        assert_eq!(correct, "a\n");
        assert_eq!(wrong, "b\n");

        let wrong_preds =
            fs::read_to_string(dir.path().join(WRONG_PREDICTIONS_FILE)).unwrap();
        assert_eq!(wrong_preds, "no_relation\n");
    }

    #[test]
    fn test_id2preds_content() {
        let (labels, dataset, predictions, report) = fixture();
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path(), &dataset, &predictions, &labels, &report).unwrap();

        let text = fs::read_to_string(dir.path().join(ID2PREDS_FILE)).unwrap();
        let map: BTreeMap<String, String> = serde_json::from_str(&text).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["a"], "per:title");
        assert_eq!(map["b"], "no_relation");
    }

    #[test]
    fn test_predictions_jsonl_records() {
        let (labels, dataset, predictions, report) = fixture();
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path(), &dataset, &predictions, &labels, &report).unwrap();

        let text = fs::read_to_string(dir.path().join(PREDICTIONS_FILE)).unwrap();
        let records: Vec<InstanceRecord> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            InstanceRecord {
                id: "a".into(),
                label_true: "per:title".into(),
                label_pred: "per:title".into(),
            }
        );
        assert_eq!(records[1].label_pred, "no_relation");
    }

    #[test]
    fn test_probs_rows_parse_back() {
        let (labels, dataset, predictions, report) = fixture();
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path(), &dataset, &predictions, &labels, &report).unwrap();

        let text = fs::read_to_string(dir.path().join(PROBS_FILE)).unwrap();
        let rows: Vec<Vec<f64>> = text
            .lines()
            .map(|line| {
                line.split_whitespace()
                    .map(|v| v.parse().unwrap())
                    .collect()
            })
            .collect();
        assert_eq!(rows, predictions.probabilities().to_vec());
    }

    #[test]
    fn test_mismatched_report_rejected() {
        let (labels, dataset, predictions, mut report) = fixture();
        report.instances = 99;
        let dir = tempfile::tempdir().unwrap();
        let err =
            write_artifacts(dir.path(), &dataset, &predictions, &labels, &report).unwrap_err();
        assert!(matches!(err, Error::Dataset(_)));
    }
}

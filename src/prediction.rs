//! Model predictions: loading and shape validation.
//!
//! The inference side is an external collaborator; this harness consumes its
//! saved output. The interchange format is JSON Lines, one record per
//! instance in dataset order:
//!
//! ```text
//! {"id": "e779...", "label_id": 3, "probs": [0.01, 0.9, ...]}
//! ```
//!
//! `id` is optional; when present it is checked against the dataset at
//! evaluation time. Every record is validated on load: the probability row
//! must have one finite entry per vocabulary label, and `label_id` must be a
//! known label.

use crate::label::LabelIndex;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One instance's model output, as serialized by the inference side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Instance identifier, when the producer includes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Predicted label ID.
    pub label_id: usize,
    /// Probability per label, in label-ID order.
    pub probs: Vec<f64>,
}

impl Prediction {
    /// Assemble a record in memory, e.g. when predictions come from an
    /// in-process model rather than a file.
    #[must_use]
    pub fn new(id: Option<String>, label_id: usize, probs: Vec<f64>) -> Self {
        Self {
            id,
            label_id,
            probs,
        }
    }
}

/// A validated set of predictions, stored column-wise.
///
/// Probability normalization is the producer's contract and is not
/// re-checked here; finiteness is, because NaN breaks rank ordering.
#[derive(Debug, Clone, Default)]
pub struct PredictionSet {
    ids: Vec<Option<String>>,
    label_ids: Vec<usize>,
    probs: Vec<Vec<f64>>,
}

impl PredictionSet {
    /// Validate and store raw prediction records.
    pub fn from_records(records: Vec<Prediction>, labels: &LabelIndex) -> Result<Self> {
        let mut set = Self::default();
        for (index, record) in records.into_iter().enumerate() {
            set.push(index, record, labels)?;
        }
        Ok(set)
    }

    /// Load newline-delimited JSON records. Blank lines are skipped.
    pub fn from_jsonl_file(path: impl AsRef<Path>, labels: &LabelIndex) -> Result<Self> {
        let path = path.as_ref();
        let file =
            File::open(path).map_err(|e| Error::prediction(format!("{}: {e}", path.display())))?;
        let mut set = Self::default();
        let mut index = 0usize;
        for (line_no, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: Prediction = serde_json::from_str(&line).map_err(|e| {
                Error::prediction(format!("{}:{}: {e}", path.display(), line_no + 1))
            })?;
            set.push(index, record, labels)?;
            index += 1;
        }
        Ok(set)
    }

    fn push(&mut self, index: usize, record: Prediction, labels: &LabelIndex) -> Result<()> {
        if record.probs.len() != labels.len() {
            return Err(Error::ProbabilityShape {
                index,
                expected: labels.len(),
                actual: record.probs.len(),
            });
        }
        if let Some(bad) = record.probs.iter().find(|p| !p.is_finite()) {
            return Err(Error::prediction(format!(
                "row {index}: non-finite probability {bad}"
            )));
        }
        if record.label_id >= labels.len() {
            return Err(Error::UnknownLabelId(record.label_id));
        }
        self.ids.push(record.id);
        self.label_ids.push(record.label_id);
        self.probs.push(record.probs);
        Ok(())
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.label_ids.len()
    }

    /// True when the set has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.label_ids.is_empty()
    }

    /// Predicted label IDs, in input order.
    #[must_use]
    pub fn predicted_ids(&self) -> &[usize] {
        &self.label_ids
    }

    /// Predicted label names, resolved through `labels`.
    pub fn predicted_labels<'a>(&self, labels: &'a LabelIndex) -> Result<Vec<&'a str>> {
        self.label_ids.iter().map(|&id| labels.name_of(id)).collect()
    }

    /// Probability matrix, one row per record.
    #[must_use]
    pub fn probabilities(&self) -> &[Vec<f64>] {
        &self.probs
    }

    /// Producer-supplied instance IDs; `None` where the record omitted one.
    #[must_use]
    pub fn ids(&self) -> &[Option<String>] {
        &self.ids
    }
}

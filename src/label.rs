//! Label vocabulary: a fixed bidirectional name/ID mapping.
//!
//! Every component that needs name/ID translation takes a [`LabelIndex`] by
//! reference. The index is built once at process start and never mutated, so
//! it is safe to share across evaluation runs.

use crate::{Error, Result};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;

/// Conventional name of the TACRED negative class.
pub const NO_RELATION: &str = "no_relation";

/// TACRED relation labels in ID order. The negative class sits at ID 0.
pub const TACRED_LABELS: [&str; 42] = [
    "no_relation",
    "per:title",
    "org:top_members/employees",
    "per:employee_of",
    "org:alternate_names",
    "org:country_of_headquarters",
    "per:countries_of_residence",
    "org:city_of_headquarters",
    "per:cities_of_residence",
    "per:age",
    "per:stateorprovinces_of_residence",
    "per:origin",
    "org:subsidiaries",
    "org:parents",
    "per:spouse",
    "org:stateorprovince_of_headquarters",
    "per:children",
    "per:other_family",
    "per:alternate_names",
    "org:members",
    "per:siblings",
    "per:schools_attended",
    "per:parents",
    "per:date_of_death",
    "org:member_of",
    "org:founded_by",
    "org:website",
    "per:cause_of_death",
    "org:political/religious_affiliation",
    "org:founded",
    "per:city_of_death",
    "org:shareholders",
    "org:number_of_employees/members",
    "per:date_of_birth",
    "per:city_of_birth",
    "per:charges",
    "per:stateorprovince_of_death",
    "per:religion",
    "per:stateorprovince_of_birth",
    "per:country_of_birth",
    "org:dissolved",
    "per:country_of_death",
];

static TACRED: Lazy<LabelIndex> =
    Lazy::new(|| LabelIndex::from_names(TACRED_LABELS, NO_RELATION).unwrap());

/// Bidirectional mapping between label names and dense integer IDs.
///
/// IDs are exactly `0..len()`, so a probability vector indexed by label ID
/// has one entry per name here. The negative ("no relation") label is part
/// of the vocabulary and pinned at construction; it is what the scorer
/// treats as "no detection" and what the ranking evaluator excludes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelIndex {
    name_to_id: HashMap<String, usize>,
    id_to_name: Vec<String>,
    negative_id: usize,
}

impl LabelIndex {
    /// Build an index from names given in ID order.
    ///
    /// Fails if a name repeats or `negative` is not among the names.
    pub fn from_names<I, S>(names: I, negative: &str) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id_to_name: Vec<String> = names.into_iter().map(Into::into).collect();
        if id_to_name.is_empty() {
            return Err(Error::vocabulary("empty label vocabulary"));
        }
        let mut name_to_id = HashMap::with_capacity(id_to_name.len());
        for (id, name) in id_to_name.iter().enumerate() {
            if name_to_id.insert(name.clone(), id).is_some() {
                return Err(Error::vocabulary(format!("duplicate label '{name}'")));
            }
        }
        let negative_id = match name_to_id.get(negative) {
            Some(&id) => id,
            None => {
                return Err(Error::vocabulary(format!(
                    "negative label '{negative}' not in vocabulary"
                )))
            }
        };
        Ok(Self {
            name_to_id,
            id_to_name,
            negative_id,
        })
    }

    /// Build an index from an explicit name-to-ID mapping.
    ///
    /// IDs must be dense: every value in `0..mapping.len()` used exactly once.
    pub fn from_mapping(mapping: &HashMap<String, usize>, negative: &str) -> Result<Self> {
        let mut slots: Vec<Option<&str>> = vec![None; mapping.len()];
        for (name, &id) in mapping {
            match slots.get_mut(id) {
                Some(slot) => {
                    if let Some(other) = slot {
                        return Err(Error::vocabulary(format!(
                            "labels '{other}' and '{name}' share id {id}"
                        )));
                    }
                    *slot = Some(name);
                }
                None => {
                    return Err(Error::vocabulary(format!(
                        "label '{name}' has id {id}, out of range for {} labels",
                        mapping.len()
                    )))
                }
            }
        }
        let names: Vec<&str> = slots.into_iter().flatten().collect();
        if names.len() != mapping.len() {
            return Err(Error::vocabulary("label ids must cover 0..n without gaps"));
        }
        Self::from_names(names, negative)
    }

    /// Load a vocabulary from a JSON object of `{"name": id, ...}`.
    pub fn from_json_file(path: impl AsRef<Path>, negative: &str) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::vocabulary(format!("{}: {e}", path.display())))?;
        let mapping: HashMap<String, usize> = serde_json::from_str(&text)
            .map_err(|e| Error::vocabulary(format!("{}: {e}", path.display())))?;
        Self::from_mapping(&mapping, negative)
    }

    /// The built-in TACRED vocabulary: 41 relations plus [`NO_RELATION`].
    #[must_use]
    pub fn tacred() -> Self {
        TACRED.clone()
    }

    /// Number of labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.id_to_name.len()
    }

    /// True when the vocabulary has no labels. Constructors reject this, so
    /// it only holds for exotic hand-built values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.id_to_name.is_empty()
    }

    /// ID of a label name.
    pub fn id_of(&self, name: &str) -> Result<usize> {
        self.name_to_id
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownLabel(name.to_string()))
    }

    /// Name of a label ID.
    pub fn name_of(&self, id: usize) -> Result<&str> {
        self.id_to_name
            .get(id)
            .map(String::as_str)
            .ok_or(Error::UnknownLabelId(id))
    }

    /// The negative ("no relation") label name.
    #[must_use]
    pub fn negative_label(&self) -> &str {
        &self.id_to_name[self.negative_id]
    }

    /// The negative label's ID.
    #[must_use]
    pub fn negative_id(&self) -> usize {
        self.negative_id
    }

    /// Whether `name` is the negative label.
    #[must_use]
    pub fn is_negative(&self, name: &str) -> bool {
        name == self.negative_label()
    }

    /// Label names in ID order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.id_to_name.iter().map(String::as_str)
    }
}

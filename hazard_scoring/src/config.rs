// ********* Input data structures ***********

use std::collections::HashMap;
use std::error::Error;
use std::fmt::Display;

/// A planning consideration that the respondent rates for importance.
///
/// The order in which attributes are loaded is the survey order. It does not
/// matter for scoring.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Attribute {
    pub id: String,
    pub category: String,
    pub text: String,
}

/// A risk scenario being prioritized.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Hazard {
    /// The key used by the relevance and exposure tables.
    pub id: String,
    pub code: String,
    pub name: String,
}

/// The expert opinion for one (hazard, attribute) pair.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RelevanceEntry {
    /// The relevance class as it appeared in the source, normalised to upper case.
    pub letter: String,
    /// The planning priority derived from the letter.
    pub priority: u32,
}

/// A row of a tabular source, before any validation.
///
/// Field names are the header names of the source. Values are kept verbatim,
/// the validation pass is in charge of trimming them.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct TableRow {
    /// Line number in the source (header is line 1).
    pub lineno: usize,
    pub fields: HashMap<String, String>,
}

impl TableRow {
    pub fn new(lineno: usize, fields: HashMap<String, String>) -> TableRow {
        TableRow { lineno, fields }
    }

    /// The first non-blank value among the given column names, trimmed.
    pub fn get(&self, names: &[&str]) -> Option<&str> {
        names
            .iter()
            .filter_map(|name| self.fields.get(*name))
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
    }
}

/// The lowest importance a respondent can declare.
pub const MIN_IMPORTANCE: u8 = 1;
/// The highest importance a respondent can declare.
pub const MAX_IMPORTANCE: u8 = 5;
/// "Moderately important", used for every attribute not answered yet.
pub const DEFAULT_IMPORTANCE: u8 = 3;

/// The importance answers of one respondent.
///
/// There is at most one answer per attribute: setting it again overwrites it.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Answers {
    values: HashMap<String, u8>,
}

impl Answers {
    pub fn new() -> Answers {
        Answers::default()
    }

    pub fn set(&mut self, attribute_id: &str, importance: u8) -> Result<(), ScoringErrors> {
        if !(MIN_IMPORTANCE..=MAX_IMPORTANCE).contains(&importance) {
            return Err(ScoringErrors::ImportanceOutOfRange {
                attribute: attribute_id.to_string(),
                value: importance as i64,
            });
        }
        self.values.insert(attribute_id.to_string(), importance);
        Ok(())
    }

    /// The declared importance, or the default when not answered.
    pub fn importance(&self, attribute_id: &str) -> u8 {
        self.values
            .get(attribute_id)
            .cloned()
            .unwrap_or(DEFAULT_IMPORTANCE)
    }

    pub fn is_answered(&self, attribute_id: &str) -> bool {
        self.values.contains_key(attribute_id)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A row that the validation pass dropped, with the reason.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SkippedRow {
    pub table: String,
    pub lineno: usize,
    pub reason: String,
}

// ******** Output data structures *********

/// Qualitative label of a normalised score.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Band {
    High,
    Medium,
    Low,
}

impl Band {
    pub fn as_str(&self) -> &'static str {
        match self {
            Band::High => "High",
            Band::Medium => "Medium",
            Band::Low => "Low",
        }
    }
}

impl Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct ScoredHazard {
    pub hazard: Hazard,
    pub raw_score: f64,
    /// Between 0 and 100.
    pub normalised: u32,
    pub band: Band,
    /// None when the hazard has no exposure for the selected metric.
    pub exposure_raw: Option<f64>,
    pub exposure_norm: Option<f64>,
}

/// The outcome of one recomputation.
#[derive(PartialEq, Debug, Clone)]
pub struct Ranking {
    pub profile: String,
    pub exposure_metric: Option<String>,
    /// Sorted by normalised score, best first.
    pub hazards: Vec<ScoredHazard>,
    /// None when the exposure axis is not available for this selection.
    pub max_exposure: Option<f64>,
}

impl Ranking {
    pub fn exposure_available(&self) -> bool {
        self.max_exposure.is_some()
    }
}

/// One line of the "why is this ranked" panel.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Contribution {
    pub attribute_id: String,
    pub attribute_text: String,
    pub category: String,
    pub user_importance: u8,
    pub priority: u32,
    pub letter: String,
    /// user_importance x priority, without any profile multiplier.
    pub contribution: u64,
}

/// Errors raised by the scoring engine.
///
/// Dirty input data is never an error: it is dropped and reported as a
/// `SkippedRow` instead.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ScoringErrors {
    ImportanceOutOfRange { attribute: String, value: i64 },
    UnknownAttribute(String),
    UnknownHazard(String),
    EmptyScale,
}

impl Error for ScoringErrors {}

impl Display for ScoringErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoringErrors::ImportanceOutOfRange { attribute, value } => write!(
                f,
                "importance {} for attribute {} is outside {}..={}",
                value, attribute, MIN_IMPORTANCE, MAX_IMPORTANCE
            ),
            ScoringErrors::UnknownAttribute(id) => write!(f, "unknown attribute {}", id),
            ScoringErrors::UnknownHazard(id) => write!(f, "unknown hazard {}", id),
            ScoringErrors::EmptyScale => write!(f, "the relevance scale has no letters"),
        }
    }
}

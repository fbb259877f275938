//! Expert relevance classes and their planning priority.

use std::collections::HashMap;

use crate::config::*;

/// Maps a relevance class (a letter) to a planning priority.
///
/// Two schemes are known. The `planning` one is non-linear and collapses D and
/// E onto the same weight. Whether the collapse is final or awaits
/// calibration is not settled, so the table is configurable rather than
/// hardcoded.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RelevanceScale {
    weights: Vec<(String, u32)>,
}

impl RelevanceScale {
    pub const PLANNING: &'static str = "planning";
    pub const LINEAR: &'static str = "linear";

    /// A=0, B=1, C=3, D=5, E=5
    pub fn planning() -> RelevanceScale {
        RelevanceScale::from_static(&[("A", 0), ("B", 1), ("C", 3), ("D", 5), ("E", 5)])
    }

    /// A=1 .. E=5
    pub fn linear() -> RelevanceScale {
        RelevanceScale::from_static(&[("A", 1), ("B", 2), ("C", 3), ("D", 4), ("E", 5)])
    }

    pub fn preset(name: &str) -> Option<RelevanceScale> {
        match name.trim().to_lowercase().as_str() {
            RelevanceScale::PLANNING => Some(RelevanceScale::planning()),
            RelevanceScale::LINEAR => Some(RelevanceScale::linear()),
            _ => None,
        }
    }

    /// Builds a custom scale. Letters are normalised like the inputs of `classify`.
    pub fn from_pairs(pairs: &[(String, u32)]) -> Result<RelevanceScale, ScoringErrors> {
        let weights: Vec<(String, u32)> = pairs
            .iter()
            .map(|(letter, w)| (normalise_letter(letter), *w))
            .filter(|(letter, _)| !letter.is_empty())
            .collect();
        if weights.is_empty() {
            return Err(ScoringErrors::EmptyScale);
        }
        Ok(RelevanceScale { weights })
    }

    fn from_static(pairs: &[(&str, u32)]) -> RelevanceScale {
        RelevanceScale {
            weights: pairs.iter().map(|(l, w)| (l.to_string(), *w)).collect(),
        }
    }

    /// The planning priority of a letter. Unknown letters get 0.
    pub fn classify(&self, letter: &str) -> u32 {
        let l = normalise_letter(letter);
        self.weights
            .iter()
            .find(|(known, _)| *known == l)
            .map(|(_, w)| *w)
            .unwrap_or(0)
    }

    pub fn knows(&self, letter: &str) -> bool {
        let l = normalise_letter(letter);
        self.weights.iter().any(|(known, _)| *known == l)
    }

    pub fn letters(&self) -> Vec<(String, u32)> {
        self.weights.clone()
    }
}

impl Default for RelevanceScale {
    fn default() -> Self {
        RelevanceScale::planning()
    }
}

fn normalise_letter(letter: &str) -> String {
    letter.trim().to_uppercase()
}

/// The expert relevance of every (hazard, attribute) pair that has an opinion.
///
/// A missing pair means "no expert opinion" and contributes nothing.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RelevanceTable {
    by_hazard: HashMap<String, HashMap<String, RelevanceEntry>>,
}

impl RelevanceTable {
    pub fn new() -> RelevanceTable {
        RelevanceTable::default()
    }

    /// Records the class of a pair. A later row for the same pair replaces the
    /// earlier one, which is returned.
    pub fn insert(
        &mut self,
        hazard_id: &str,
        attribute_id: &str,
        letter: &str,
        scale: &RelevanceScale,
    ) -> Option<RelevanceEntry> {
        let entry = RelevanceEntry {
            letter: normalise_letter(letter),
            priority: scale.classify(letter),
        };
        self.by_hazard
            .entry(hazard_id.to_string())
            .or_default()
            .insert(attribute_id.to_string(), entry)
    }

    pub fn get(&self, hazard_id: &str, attribute_id: &str) -> Option<&RelevanceEntry> {
        self.by_hazard
            .get(hazard_id)
            .and_then(|m| m.get(attribute_id))
    }

    pub fn has_hazard(&self, hazard_id: &str) -> bool {
        self.by_hazard.contains_key(hazard_id)
    }

    pub fn len(&self) -> usize {
        self.by_hazard.values().map(|m| m.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

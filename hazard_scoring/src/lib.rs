/*!

Ranks hazards by planning priority.

A respondent declares how important each planning attribute is (1 to 5).
Experts have rated, for every hazard, how relevant each attribute is (a
class from A to E, turned into a planning priority by a `RelevanceScale`).
The raw score of a hazard is the sum over its rated attributes of
`priority x importance x profile multiplier`. Raw scores are then normalised
so that the best hazard gets 100, and labelled High, Medium or Low.

```
use hazard_scoring::*;

let attributes = vec![
    Attribute { id: "A1".to_string(), category: "Hazard".to_string(), text: "People".to_string() },
    Attribute { id: "A2".to_string(), category: "Recovery".to_string(), text: "Assets".to_string() },
];
let hazards = vec![
    Hazard { id: "H1".to_string(), code: "H1".to_string(), name: "Wildfire".to_string() },
    Hazard { id: "H2".to_string(), code: "H2".to_string(), name: "Flood".to_string() },
];
let scale = RelevanceScale::planning();
let mut relevance = RelevanceTable::new();
relevance.insert("H1", "A1", "D", &scale);
relevance.insert("H1", "A2", "B", &scale);
relevance.insert("H2", "A1", "A", &scale);

let mut answers = Answers::new();
answers.set("A1", 5)?;
answers.set("A2", 1)?;

let ranked = score(&hazards, &answers, &relevance, &attributes, &ProfileCatalogue::default(), ALL_PROFILE);
assert_eq!(ranked[0].hazard.id, "H1");
assert_eq!(ranked[0].raw_score, 26.0);
assert_eq!(ranked[0].normalised, 100);
assert_eq!(ranked[1].band, Band::Low);
# Ok::<(), ScoringErrors>(())
```

*/
mod config;
pub mod builder;
pub mod explain;
pub mod exposure;
pub mod manual;
pub mod profile;
pub mod relevance;
pub mod session;

use log::{debug, info};

pub use crate::builder::{Dataset, DatasetBuilder};
pub use crate::config::*;
pub use crate::explain::explain;
pub use crate::exposure::{normalise_exposure, ExposureCategory, ExposureModel};
pub use crate::profile::{Profile, ProfileCatalogue, ALL_PROFILE};
pub use crate::relevance::{RelevanceScale, RelevanceTable};
pub use crate::session::Session;

/// Normalised scores at or above this value are High.
pub const HIGH_THRESHOLD: u32 = 67;
/// Normalised scores at or above this value (and below High) are Medium.
pub const MEDIUM_THRESHOLD: u32 = 34;

/// The raw planning score of one hazard.
///
/// Only attributes with an expert opinion for this hazard contribute. Terms
/// whose profile multiplier is zero are skipped.
pub fn raw_score(
    hazard: &Hazard,
    answers: &Answers,
    relevance: &RelevanceTable,
    attributes: &[Attribute],
    profiles: &ProfileCatalogue,
    profile_key: &str,
) -> f64 {
    let mut total = 0.0;
    for attr in attributes.iter() {
        let entry = match relevance.get(&hazard.id, &attr.id) {
            Some(e) => e,
            None => continue,
        };
        let multiplier = profiles.multiplier(profile_key, &attr.category);
        if multiplier == 0.0 {
            continue;
        }
        let importance = answers.importance(&attr.id);
        total += (entry.priority as f64) * (importance as f64) * multiplier;
    }
    total
}

/// Scales a raw score to 0-100 against the largest raw score.
///
/// Rounds half away from zero. A non-positive maximum is replaced by 1 so
/// that a survey where nothing scores yields zeros everywhere.
pub fn normalise(raw_score: f64, max_raw_score: f64) -> u32 {
    let m = if max_raw_score > 0.0 { max_raw_score } else { 1.0 };
    let x = (raw_score / m * 100.0).round();
    x.clamp(0.0, 100.0) as u32
}

pub fn band_for(normalised: u32) -> Band {
    if normalised >= HIGH_THRESHOLD {
        Band::High
    } else if normalised >= MEDIUM_THRESHOLD {
        Band::Medium
    } else {
        Band::Low
    }
}

/// Scores and ranks all the hazards.
///
/// The result is sorted by normalised score, best first. Hazards with the
/// same score keep the order of `hazards`. The exposure fields are left
/// empty, see `exposure::normalise_exposure`.
///
/// Arguments:
/// * `hazards` the hazards to rank, in table order
/// * `answers` the importance declared by the respondent
/// * `relevance` the expert relevance of each (hazard, attribute) pair
/// * `attributes` the attributes of the survey, which give the categories
/// * `profiles` the catalogue in which `profile_key` is looked up
pub fn score(
    hazards: &[Hazard],
    answers: &Answers,
    relevance: &RelevanceTable,
    attributes: &[Attribute],
    profiles: &ProfileCatalogue,
    profile_key: &str,
) -> Vec<ScoredHazard> {
    info!(
        "Scoring {} hazards over {} attributes ({} answered), profile {:?}",
        hazards.len(),
        attributes.len(),
        answers.len(),
        profile_key
    );
    let raws: Vec<f64> = hazards
        .iter()
        .map(|h| raw_score(h, answers, relevance, attributes, profiles, profile_key))
        .collect();
    let max_raw = raws.iter().cloned().fold(0.0_f64, f64::max);
    debug!("score: max raw score: {}", max_raw);

    let mut res: Vec<ScoredHazard> = hazards
        .iter()
        .zip(raws.iter())
        .map(|(h, raw)| {
            let normalised = normalise(*raw, max_raw);
            ScoredHazard {
                hazard: h.clone(),
                raw_score: *raw,
                normalised,
                band: band_for(normalised),
                exposure_raw: None,
                exposure_norm: None,
            }
        })
        .collect();
    // Stable: ties keep the hazard table order.
    res.sort_by(|a, b| b.normalised.cmp(&a.normalised));
    for sh in res.iter() {
        debug!(
            "score: {} raw {} -> {} {}",
            sh.hazard.code, sh.raw_score, sh.normalised, sh.band
        );
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(id: &str, category: &str) -> Attribute {
        Attribute {
            id: id.to_string(),
            category: category.to_string(),
            text: format!("text of {}", id),
        }
    }

    fn hazard(id: &str) -> Hazard {
        Hazard {
            id: id.to_string(),
            code: id.to_string(),
            name: format!("name of {}", id),
        }
    }

    fn fixture() -> (Vec<Attribute>, Vec<Hazard>, RelevanceTable, Answers) {
        let scale = RelevanceScale::planning();
        let mut relevance = RelevanceTable::new();
        relevance.insert("H1", "A1", "D", &scale);
        relevance.insert("H1", "A2", "B", &scale);
        relevance.insert("H2", "A1", "A", &scale);
        let mut answers = Answers::new();
        answers.set("A1", 5).unwrap();
        answers.set("A2", 1).unwrap();
        (
            vec![attr("A1", "Hazard"), attr("A2", "Recovery")],
            vec![hazard("H1"), hazard("H2")],
            relevance,
            answers,
        )
    }

    #[test]
    fn two_hazard_scenario() {
        let _ = env_logger::try_init();
        let (attributes, hazards, relevance, answers) = fixture();
        let res = score(
            &hazards,
            &answers,
            &relevance,
            &attributes,
            &ProfileCatalogue::default(),
            ALL_PROFILE,
        );
        let ids: Vec<&str> = res.iter().map(|sh| sh.hazard.id.as_str()).collect();
        assert_eq!(ids, vec!["H1", "H2"]);
        assert_eq!(res[0].raw_score, 26.0);
        assert_eq!(res[0].normalised, 100);
        assert_eq!(res[0].band, Band::High);
        assert_eq!(res[1].raw_score, 0.0);
        assert_eq!(res[1].normalised, 0);
        assert_eq!(res[1].band, Band::Low);
    }

    #[test]
    fn hazard_without_relevance_scores_zero() {
        let (attributes, mut hazards, relevance, answers) = fixture();
        hazards.insert(0, hazard("H0"));
        let res = score(
            &hazards,
            &answers,
            &relevance,
            &attributes,
            &ProfileCatalogue::default(),
            ALL_PROFILE,
        );
        let h0 = res.iter().find(|sh| sh.hazard.id == "H0").unwrap();
        assert_eq!(h0.raw_score, 0.0);
        assert_eq!(h0.normalised, 0);
        assert_eq!(h0.band, Band::Low);
    }

    #[test]
    fn unanswered_attributes_count_as_three() {
        let (attributes, hazards, relevance, _) = fixture();
        let h1 = &hazards[0];
        let raw = raw_score(
            h1,
            &Answers::new(),
            &relevance,
            &attributes,
            &ProfileCatalogue::default(),
            ALL_PROFILE,
        );
        assert_eq!(raw, 5.0 * 3.0 + 1.0 * 3.0);
    }

    #[test]
    fn nothing_scores() {
        let (attributes, hazards, _, answers) = fixture();
        let res = score(
            &hazards,
            &answers,
            &RelevanceTable::new(),
            &attributes,
            &ProfileCatalogue::default(),
            ALL_PROFILE,
        );
        assert!(res.iter().all(|sh| sh.normalised == 0 && sh.band == Band::Low));
        let ids: Vec<&str> = res.iter().map(|sh| sh.hazard.id.as_str()).collect();
        assert_eq!(ids, vec!["H1", "H2"]);
    }

    #[test]
    fn ties_keep_table_order() {
        let scale = RelevanceScale::planning();
        let mut relevance = RelevanceTable::new();
        for h in ["H1", "H2", "H3"] {
            relevance.insert(h, "A1", "C", &scale);
        }
        relevance.insert("H2", "A2", "E", &scale);
        let hazards = vec![hazard("H1"), hazard("H2"), hazard("H3")];
        let res = score(
            &hazards,
            &Answers::new(),
            &relevance,
            &[attr("A1", "Hazard"), attr("A2", "Hazard")],
            &ProfileCatalogue::default(),
            ALL_PROFILE,
        );
        let ids: Vec<&str> = res.iter().map(|sh| sh.hazard.id.as_str()).collect();
        assert_eq!(ids, vec!["H2", "H1", "H3"]);
        assert_eq!(res[1].normalised, 38);
        assert_eq!(res[1].band, Band::Medium);
        assert_eq!(res[1].normalised, res[2].normalised);
    }

    #[test]
    fn profile_drops_categories() {
        let (attributes, hazards, relevance, answers) = fixture();
        let profiles = ProfileCatalogue::default();
        let all = raw_score(&hazards[0], &answers, &relevance, &attributes, &profiles, ALL_PROFILE);
        let recovery = raw_score(&hazards[0], &answers, &relevance, &attributes, &profiles, "recovery");
        let hazard_only = raw_score(&hazards[0], &answers, &relevance, &attributes, &profiles, "hazard");
        assert_eq!(all, 26.0);
        assert_eq!(recovery, 1.0);
        assert_eq!(hazard_only, 25.0);
        // Attributes outside the profile never add to the score.
        assert!(recovery <= all);
    }

    #[test]
    fn fractional_weights_still_reach_100() {
        let (attributes, hazards, relevance, answers) = fixture();
        let profiles = ProfileCatalogue::new(vec![Profile::new(
            "light",
            "Light",
            "",
            &[],
            0.01,
        )]);
        let res = score(&hazards, &answers, &relevance, &attributes, &profiles, "light");
        assert!(res[0].raw_score < 1.0);
        assert_eq!(res[0].normalised, 100);
    }

    #[test]
    fn normalisation_bounds() {
        assert_eq!(normalise(0.0, 0.0), 0);
        assert_eq!(normalise(26.0, 26.0), 100);
        assert_eq!(normalise(1.0, 8.0), 13);
        // 12.5 rounds away from zero.
        assert_eq!(normalise(5.0, 40.0), 13);
        assert_eq!(normalise(3.0, 8.0), 38);
    }

    #[test]
    fn bands() {
        assert_eq!(band_for(100), Band::High);
        assert_eq!(band_for(67), Band::High);
        assert_eq!(band_for(66), Band::Medium);
        assert_eq!(band_for(34), Band::Medium);
        assert_eq!(band_for(33), Band::Low);
        assert_eq!(band_for(0), Band::Low);
    }
}

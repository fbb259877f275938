//! The state of one respondent, as an immutable value.
//!
//! Every change (an answer, a profile, an exposure metric) produces a new
//! session. Rankings and breakdowns are recomputed from scratch out of it.

use log::{debug, warn};

use crate::builder::Dataset;
use crate::config::*;
use crate::explain::explain;
use crate::exposure::normalise_exposure;
use crate::profile::{ProfileCatalogue, ALL_PROFILE};
use crate::score;

#[derive(Debug, Clone)]
pub struct Session<'a> {
    dataset: &'a Dataset,
    profiles: &'a ProfileCatalogue,
    answers: Answers,
    profile_key: String,
    exposure_metric: Option<String>,
}

impl<'a> Session<'a> {
    /// A fresh session: no answers, equal weighting, first available exposure metric.
    pub fn new(dataset: &'a Dataset, profiles: &'a ProfileCatalogue) -> Session<'a> {
        Session {
            dataset,
            profiles,
            answers: Answers::new(),
            profile_key: ALL_PROFILE.to_string(),
            exposure_metric: dataset.exposure_metrics().first().cloned(),
        }
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    pub fn profile_key(&self) -> &str {
        &self.profile_key
    }

    pub fn exposure_metric(&self) -> Option<&str> {
        self.exposure_metric.as_deref()
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Records the importance of an attribute, replacing any previous answer.
    pub fn with_answer(&self, attribute_id: &str, importance: u8) -> Result<Session<'a>, ScoringErrors> {
        if self.dataset.attribute(attribute_id).is_none() {
            return Err(ScoringErrors::UnknownAttribute(attribute_id.to_string()));
        }
        let mut answers = self.answers.clone();
        answers.set(attribute_id, importance)?;
        Ok(Session {
            answers,
            ..self.clone()
        })
    }

    /// Applies all the answers, stopping at the first invalid one.
    pub fn with_answers(&self, answers: &[(String, u8)]) -> Result<Session<'a>, ScoringErrors> {
        let mut res = self.clone();
        for (id, importance) in answers.iter() {
            res = res.with_answer(id, *importance)?;
        }
        Ok(res)
    }

    /// Selects a weighting profile. Unknown keys are kept: they score like "all".
    pub fn with_profile(&self, profile_key: &str) -> Session<'a> {
        if profile_key != ALL_PROFILE && self.profiles.get(profile_key).is_none() {
            warn!("Unknown profile {:?}: equal weighting applies", profile_key);
        }
        Session {
            profile_key: profile_key.to_string(),
            ..self.clone()
        }
    }

    /// Selects the exposure metric plotted against the planning score.
    pub fn with_exposure_metric(&self, metric: Option<&str>) -> Session<'a> {
        Session {
            exposure_metric: metric.map(|m| m.to_string()),
            ..self.clone()
        }
    }

    pub fn ranking(&self) -> Ranking {
        let scored = score(
            &self.dataset.hazards,
            &self.answers,
            &self.dataset.relevance,
            &self.dataset.attributes,
            self.profiles,
            &self.profile_key,
        );
        let (hazards, max_exposure) = normalise_exposure(
            scored,
            self.dataset.exposure.as_ref(),
            self.exposure_metric.as_deref(),
        );
        debug!(
            "Session::ranking: profile {:?} exposure {:?} max exposure {:?}",
            self.profile_key, self.exposure_metric, max_exposure
        );
        Ranking {
            profile: self.profile_key.clone(),
            exposure_metric: self.exposure_metric.clone(),
            hazards,
            max_exposure,
        }
    }

    pub fn explain(&self, hazard_id: &str) -> Result<Vec<Contribution>, ScoringErrors> {
        if self.dataset.hazard(hazard_id).is_none() {
            return Err(ScoringErrors::UnknownHazard(hazard_id.to_string()));
        }
        Ok(explain(self.dataset, &self.answers, hazard_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DatasetBuilder;
    use crate::relevance::RelevanceScale;

    fn row(pairs: &[(&str, &str)]) -> TableRow {
        TableRow::new(
            2,
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn dataset(with_exposure: bool) -> Dataset {
        let mut b = DatasetBuilder::new(&RelevanceScale::planning());
        b.add_attribute_rows(&[
            row(&[("id", "A1"), ("category", "Hazard"), ("attribute_text", "People")]),
            row(&[("id", "A2"), ("category", "Recovery"), ("attribute_text", "Assets")]),
        ]);
        b.add_hazard_rows(&[
            row(&[("Hazard Code", "H1"), ("Hazard Descriptions", "Wildfire")]),
            row(&[("Hazard Code", "H2"), ("Hazard Descriptions", "Flood")]),
        ]);
        b.add_relevance_rows(&[
            row(&[("hazard_id", "H1"), ("attribute_id", "A1"), ("score_letter", "D")]),
            row(&[("hazard_id", "H1"), ("attribute_id", "A2"), ("score_letter", "B")]),
            row(&[("hazard_id", "H2"), ("attribute_id", "A2"), ("score_letter", "E")]),
        ]);
        if with_exposure {
            b.add_exposure_rows(&[
                row(&[("Code", "H1"), ("Lands1", "2"), ("Lands3", "4")]),
                row(&[("Code", "H2"), ("1", "N/A"), ("Lands2", "14")]),
            ]);
        }
        b.build()
    }

    #[test]
    fn changes_do_not_mutate_the_previous_session() {
        let d = dataset(false);
        let profiles = ProfileCatalogue::default();
        let s0 = Session::new(&d, &profiles);
        let s1 = s0.with_answer("A1", 5).unwrap();
        let s2 = s1.with_answer("A1", 1).unwrap();
        assert!(!s0.answers().is_answered("A1"));
        assert_eq!(s1.answers().importance("A1"), 5);
        assert_eq!(s2.answers().importance("A1"), 1);
        assert_eq!(s2.answers().len(), 1);
    }

    #[test]
    fn invalid_answers() {
        let d = dataset(false);
        let profiles = ProfileCatalogue::default();
        let s = Session::new(&d, &profiles);
        assert_eq!(
            s.with_answer("A1", 6).err(),
            Some(ScoringErrors::ImportanceOutOfRange {
                attribute: "A1".to_string(),
                value: 6
            })
        );
        assert_eq!(
            s.with_answer("A9", 3).err(),
            Some(ScoringErrors::UnknownAttribute("A9".to_string()))
        );
    }

    #[test]
    fn ranking_follows_answers_and_profile() {
        let d = dataset(false);
        let profiles = ProfileCatalogue::default();
        let s = Session::new(&d, &profiles)
            .with_answers(&[("A1".to_string(), 5), ("A2".to_string(), 1)])
            .unwrap();
        let r = s.ranking();
        assert_eq!(r.profile, ALL_PROFILE);
        assert_eq!(r.hazards[0].hazard.code, "H1");
        assert_eq!(r.hazards[0].raw_score, 26.0);
        assert_eq!(r.hazards[1].raw_score, 5.0);
        assert_eq!(r.hazards[1].normalised, 19);

        let r = s.with_profile("recovery").ranking();
        assert_eq!(r.profile, "recovery");
        assert_eq!(r.hazards[0].hazard.code, "H2");
        assert_eq!(r.hazards[0].normalised, 100);
        assert_eq!(r.hazards[1].normalised, 20);
        assert!(!r.exposure_available());
    }

    #[test]
    fn exposure_axis() {
        let d = dataset(true);
        let profiles = ProfileCatalogue::default();
        let s = Session::new(&d, &profiles);
        assert_eq!(s.exposure_metric(), Some("Lands"));
        let r = s.ranking();
        assert_eq!(r.max_exposure, Some(28.0));
        let h1 = r.hazards.iter().find(|sh| sh.hazard.id == "H1").unwrap();
        assert_eq!(h1.exposure_raw, Some(14.0));
        assert_eq!(h1.exposure_norm, Some(50.0));

        let r = s.with_exposure_metric(Some("All assets")).ranking();
        assert!(!r.exposure_available());
        assert!(r.hazards.iter().all(|sh| sh.exposure_norm.is_none()));
    }

    #[test]
    fn explain_unknown_hazard() {
        let d = dataset(false);
        let profiles = ProfileCatalogue::default();
        let s = Session::new(&d, &profiles);
        assert_eq!(
            s.explain("H9"),
            Err(ScoringErrors::UnknownHazard("H9".to_string()))
        );
        assert_eq!(s.explain("H2").map(|l| l.len()), Ok(1));
    }
}

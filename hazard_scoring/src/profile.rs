//! Weighting presets that emphasise or silence categories of attributes.

use log::debug;

/// The key of the equal-weighting profile.
pub const ALL_PROFILE: &str = "all";

/// A named weighting preset.
///
/// Selecting a profile never changes the answers or the relevance data, only
/// how the scoring engine combines them.
#[derive(PartialEq, Debug, Clone)]
pub struct Profile {
    pub key: String,
    pub label: String,
    pub description: String,
    pub category_weights: Vec<(String, f64)>,
    pub default_for_others: f64,
}

impl Profile {
    pub fn new(key: &str, label: &str, description: &str, weights: &[(&str, f64)], default_for_others: f64) -> Profile {
        Profile {
            key: key.to_string(),
            label: label.to_string(),
            description: description.to_string(),
            category_weights: weights.iter().map(|(c, w)| (c.to_string(), *w)).collect(),
            default_for_others,
        }
    }

    fn weight(&self, category: &str) -> f64 {
        self.category_weights
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, w)| *w)
            .unwrap_or(self.default_for_others)
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct ProfileCatalogue {
    profiles: Vec<Profile>,
}

impl ProfileCatalogue {
    /// A catalogue made of the given profiles. The equal-weighting profile is
    /// added in front when missing, since it is always selectable.
    pub fn new(profiles: Vec<Profile>) -> ProfileCatalogue {
        let mut all = profiles;
        if !all.iter().any(|p| p.key == ALL_PROFILE) {
            all.insert(0, ProfileCatalogue::all_profile());
        }
        ProfileCatalogue { profiles: all }
    }

    fn all_profile() -> Profile {
        Profile::new(
            ALL_PROFILE,
            "All attributes",
            "Every attribute counts with its declared importance.",
            &[],
            1.0,
        )
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn get(&self, key: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.key == key)
    }

    /// The weight of a category under a profile.
    ///
    /// The "all" profile returns 1 for every category, even if the catalogue
    /// declares weights for it. Unknown profiles behave like "all".
    pub fn multiplier(&self, profile_key: &str, category: &str) -> f64 {
        if profile_key == ALL_PROFILE {
            return 1.0;
        }
        match self.get(profile_key) {
            Some(p) => p.weight(category),
            None => {
                debug!("multiplier: unknown profile {:?}, using equal weights", profile_key);
                1.0
            }
        }
    }
}

impl Default for ProfileCatalogue {
    fn default() -> Self {
        ProfileCatalogue::new(vec![
            ProfileCatalogue::all_profile(),
            Profile::new(
                "hazard",
                "Hazard characteristics",
                "Only the attributes describing the hazard itself.",
                &[("Hazard", 1.0)],
                0.0,
            ),
            Profile::new(
                "response",
                "Emergency response",
                "Preparedness and response attributes, the rest is ignored.",
                &[("Preparedness", 1.0), ("Response", 1.0)],
                0.0,
            ),
            Profile::new(
                "recovery",
                "Recovery",
                "Recovery attributes only.",
                &[("Recovery", 1.0)],
                0.0,
            ),
            Profile::new(
                "people",
                "People first",
                "Doubles the weight of people and community attributes.",
                &[("People", 2.0), ("Community", 2.0)],
                1.0,
            ),
        ])
    }
}

//! Per-attribute breakdown of a hazard score.

use crate::builder::Dataset;
use crate::config::*;

/// Why a hazard is ranked where it is: one line per attribute with an expert
/// opinion for this hazard, largest contribution first.
///
/// The contribution is `importance x priority` with no profile multiplier,
/// so the panel shows the unweighted influence of every attribute even when
/// the selected profile silences it. Ties keep the survey order. A hazard
/// without any expert opinion has an empty breakdown.
pub fn explain(dataset: &Dataset, answers: &Answers, hazard_id: &str) -> Vec<Contribution> {
    let mut res: Vec<Contribution> = dataset
        .attributes
        .iter()
        .filter_map(|attr| {
            dataset.relevance.get(hazard_id, &attr.id).map(|entry| {
                let user_importance = answers.importance(&attr.id);
                Contribution {
                    attribute_id: attr.id.clone(),
                    attribute_text: attr.text.clone(),
                    category: attr.category.clone(),
                    user_importance,
                    priority: entry.priority,
                    letter: entry.letter.clone(),
                    contribution: (user_importance as u64) * (entry.priority as u64),
                }
            })
        })
        .collect();
    res.sort_by(|a, b| b.contribution.cmp(&a.contribution));
    res
}

//! Exposure indices and their normalisation against the planning score.
//!
//! The exposure of a hazard to an asset category is given as counts of assets
//! bucketed in 5 ordinal levels. The index is the level-weighted sum of those
//! counts.

use std::collections::HashMap;

use log::debug;

use crate::config::*;

/// The levels of the ordinal buckets.
pub const EXPOSURE_LEVELS: [u32; 5] = [1, 2, 3, 4, 5];

/// An asset category, read from the columns `{prefix}1` .. `{prefix}5`.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ExposureCategory {
    pub name: String,
    pub prefix: String,
}

impl ExposureCategory {
    pub fn new(name: &str, prefix: &str) -> ExposureCategory {
        ExposureCategory {
            name: name.to_string(),
            prefix: prefix.to_string(),
        }
    }

    /// The categories tracked by the reference exposure table.
    /// "All assets" is the aggregate stored in the bare `1` .. `5` columns.
    pub fn defaults() -> Vec<ExposureCategory> {
        vec![
            ExposureCategory::new("All assets", ""),
            ExposureCategory::new("Lands", "Lands"),
            ExposureCategory::new("Personnel", "Personnel"),
            ExposureCategory::new("Buildings", "Buildings"),
        ]
    }
}

/// Reads a count. Missing, blank, "N/A" and non-numeric cells are absent.
pub fn parse_count(cell: Option<&str>) -> Option<f64> {
    let s = cell?.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("n/a") {
        return None;
    }
    match s.parse::<f64>() {
        Ok(x) if x.is_finite() && x >= 0.0 => Some(x),
        _ => None,
    }
}

/// The level-weighted sum of the counts of one category in a row.
pub fn weighted_index(row: &TableRow, prefix: &str) -> f64 {
    EXPOSURE_LEVELS
        .iter()
        .filter_map(|level| {
            let column = format!("{}{}", prefix, level);
            parse_count(row.fields.get(&column).map(|s| s.as_str())).map(|c| (*level as f64) * c)
        })
        .sum()
}

/// Exposure indices per hazard and category.
///
/// Only strictly positive indices are recorded: an absent index means "no
/// exposure metric", which is different from a metric that is literally zero.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct ExposureModel {
    index: HashMap<String, HashMap<String, f64>>,
    // Category names observed with a positive index, in category order.
    catalogue: Vec<String>,
}

impl ExposureModel {
    pub fn new() -> ExposureModel {
        ExposureModel::default()
    }

    /// Computes and records the indices of one row of the exposure table.
    /// Returns the number of categories recorded for this hazard.
    pub fn add_row(&mut self, hazard_id: &str, row: &TableRow, categories: &[ExposureCategory]) -> usize {
        let mut recorded = 0;
        for cat in categories.iter() {
            let idx = weighted_index(row, &cat.prefix);
            if idx > 0.0 {
                self.index
                    .entry(hazard_id.to_string())
                    .or_default()
                    .insert(cat.name.clone(), idx);
                recorded += 1;
            }
        }
        // Keep the catalogue in the order of the declared categories.
        let observed: Vec<String> = categories
            .iter()
            .filter(|cat| {
                self.catalogue.contains(&cat.name)
                    || self
                        .index
                        .get(hazard_id)
                        .map_or(false, |m| m.contains_key(&cat.name))
            })
            .map(|cat| cat.name.clone())
            .collect();
        self.catalogue = observed;
        debug!(
            "ExposureModel::add_row: hazard {} line {}: {} categories",
            hazard_id, row.lineno, recorded
        );
        recorded
    }

    pub fn get(&self, hazard_id: &str, category: &str) -> Option<f64> {
        self.index.get(hazard_id).and_then(|m| m.get(category)).cloned()
    }

    /// The exposure metrics that at least one hazard has.
    pub fn catalogue(&self) -> &[String] {
        &self.catalogue
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// Scales the exposure of the selected metric to 0-100 relative to the most
/// exposed hazard.
///
/// Returns the maximum exposure, or None when the axis is unavailable (no
/// model, no metric selected, or no hazard with a positive index). Hazards
/// without data keep no exposure instead of a zero.
pub fn normalise_exposure(
    scored: Vec<ScoredHazard>,
    model: Option<&ExposureModel>,
    metric: Option<&str>,
) -> (Vec<ScoredHazard>, Option<f64>) {
    let (model, metric) = match (model, metric) {
        (Some(m), Some(c)) => (m, c),
        _ => return (clear_exposure(scored), None),
    };
    let max_exposure = scored
        .iter()
        .filter_map(|sh| model.get(&sh.hazard.id, metric))
        .fold(0.0_f64, f64::max);
    if max_exposure <= 0.0 {
        debug!("normalise_exposure: no exposure for metric {:?}", metric);
        return (clear_exposure(scored), None);
    }
    let res = scored
        .into_iter()
        .map(|sh| {
            let raw = model.get(&sh.hazard.id, metric);
            ScoredHazard {
                exposure_raw: raw,
                exposure_norm: raw.map(|x| x / max_exposure * 100.0),
                ..sh
            }
        })
        .collect();
    (res, Some(max_exposure))
}

fn clear_exposure(scored: Vec<ScoredHazard>) -> Vec<ScoredHazard> {
    scored
        .into_iter()
        .map(|sh| ScoredHazard {
            exposure_raw: None,
            exposure_norm: None,
            ..sh
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> TableRow {
        TableRow::new(
            2,
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn scored(id: &str) -> ScoredHazard {
        ScoredHazard {
            hazard: Hazard {
                id: id.to_string(),
                code: id.to_string(),
                name: id.to_string(),
            },
            raw_score: 0.0,
            normalised: 0,
            band: Band::Low,
            exposure_raw: None,
            exposure_norm: None,
        }
    }

    #[test]
    fn lands_index_skips_missing_levels() {
        let r = row(&[("Code", "H1"), ("Lands1", "2"), ("Lands3", "4")]);
        assert_eq!(weighted_index(&r, "Lands"), 14.0);
    }

    #[test]
    fn bare_levels_are_all_assets() {
        let r = row(&[("1", "1"), ("2", "1"), ("5", "2"), ("Lands1", "100")]);
        assert_eq!(weighted_index(&r, ""), 13.0);
    }

    #[test]
    fn cells_that_are_not_counts() {
        assert_eq!(parse_count(None), None);
        assert_eq!(parse_count(Some("  ")), None);
        assert_eq!(parse_count(Some("N/A")), None);
        assert_eq!(parse_count(Some("n/a")), None);
        assert_eq!(parse_count(Some("many")), None);
        assert_eq!(parse_count(Some("-3")), None);
        assert_eq!(parse_count(Some(" 2.5 ")), Some(2.5));
    }

    #[test]
    fn missing_data_is_not_zero_exposure() {
        let cats = ExposureCategory::defaults();
        let mut m = ExposureModel::new();
        let r = row(&[("Code", "H1"), ("Lands1", "N/A"), ("Personnel2", "3"), ("Buildings1", "0")]);
        assert_eq!(m.add_row("H1", &r, &cats), 1);
        assert_eq!(m.get("H1", "Lands"), None);
        assert_eq!(m.get("H1", "Buildings"), None);
        assert_eq!(m.get("H1", "Personnel"), Some(6.0));
        assert_eq!(m.catalogue(), &["Personnel".to_string()]);
    }

    #[test]
    fn catalogue_follows_category_order() {
        let cats = ExposureCategory::defaults();
        let mut m = ExposureModel::new();
        m.add_row("H1", &row(&[("Buildings1", "1")]), &cats);
        m.add_row("H2", &row(&[("1", "1"), ("Lands2", "1")]), &cats);
        m.add_row("H3", &row(&[]), &cats);
        assert_eq!(
            m.catalogue(),
            &[
                "All assets".to_string(),
                "Lands".to_string(),
                "Buildings".to_string()
            ]
        );
    }

    #[test]
    fn normalise_against_max() {
        let cats = ExposureCategory::defaults();
        let mut m = ExposureModel::new();
        m.add_row("H1", &row(&[("Lands1", "2"), ("Lands3", "4")]), &cats);
        m.add_row("H2", &row(&[("Lands1", "7")]), &cats);
        let (res, max) = normalise_exposure(
            vec![scored("H1"), scored("H2"), scored("H3")],
            Some(&m),
            Some("Lands"),
        );
        assert_eq!(max, Some(14.0));
        assert_eq!(res[0].exposure_norm, Some(100.0));
        assert_eq!(res[1].exposure_raw, Some(7.0));
        assert_eq!(res[1].exposure_norm, Some(50.0));
        assert_eq!(res[2].exposure_raw, None);
        assert_eq!(res[2].exposure_norm, None);
    }

    #[test]
    fn unknown_metric_disables_the_axis() {
        let cats = ExposureCategory::defaults();
        let mut m = ExposureModel::new();
        m.add_row("H1", &row(&[("Lands1", "2")]), &cats);
        let (res, max) = normalise_exposure(vec![scored("H1")], Some(&m), Some("Vehicles"));
        assert_eq!(max, None);
        assert_eq!(res[0].exposure_norm, None);

        let (_, max) = normalise_exposure(vec![scored("H1")], None, Some("Lands"));
        assert_eq!(max, None);
    }
}

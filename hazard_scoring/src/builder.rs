use std::collections::HashSet;

use log::{debug, info, warn};

pub use crate::config::*;
use crate::exposure::{ExposureCategory, ExposureModel};
use crate::relevance::{RelevanceScale, RelevanceTable};

/// Tables as they are named in diagnostics.
pub const ATTRIBUTES_TABLE: &str = "attributes";
pub const HAZARDS_TABLE: &str = "hazards";
pub const RELEVANCE_TABLE: &str = "hazard_attribute_scores";
pub const EXPOSURE_TABLE: &str = "exposure";

/// The in-memory model of one survey: built once, read-only afterwards.
#[derive(PartialEq, Debug, Clone)]
pub struct Dataset {
    /// In survey order.
    pub attributes: Vec<Attribute>,
    /// In table order, which is also the tie-break order of the ranking.
    pub hazards: Vec<Hazard>,
    pub relevance: RelevanceTable,
    /// None when the exposure table was not available.
    pub exposure: Option<ExposureModel>,
    /// Every row dropped by the validation pass.
    pub skipped: Vec<SkippedRow>,
    /// Relevance rows that overrode an earlier row for the same pair.
    pub replaced: Vec<SkippedRow>,
}

impl Dataset {
    pub fn attribute(&self, id: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.id == id)
    }

    pub fn hazard(&self, id: &str) -> Option<&Hazard> {
        self.hazards.iter().find(|h| h.id == id)
    }

    /// The exposure metrics that can be selected.
    pub fn exposure_metrics(&self) -> Vec<String> {
        self.exposure
            .as_ref()
            .map(|m| m.catalogue().to_vec())
            .unwrap_or_default()
    }
}

/// Validates raw table rows into a `Dataset`.
///
/// Malformed rows never abort the construction: they are dropped and listed
/// in `Dataset::skipped`.
///
/// ```
/// use std::collections::HashMap;
/// use hazard_scoring::builder::DatasetBuilder;
/// use hazard_scoring::{RelevanceScale, TableRow};
///
/// fn row(lineno: usize, pairs: &[(&str, &str)]) -> TableRow {
///     let fields: HashMap<String, String> = pairs
///         .iter()
///         .map(|(k, v)| (k.to_string(), v.to_string()))
///         .collect();
///     TableRow::new(lineno, fields)
/// }
///
/// let mut builder = DatasetBuilder::new(&RelevanceScale::planning());
/// builder.add_attribute_rows(&[
///     row(2, &[("id", "A1"), ("category", "Hazard"), ("attribute_text", "People impact")]),
///     row(3, &[("id", "A2"), ("category", "Hazard")]),
/// ]);
/// builder.add_hazard_rows(&[row(2, &[("Hazard Code", "H1"), ("Hazard Descriptions", "Wildfire")])]);
/// builder.add_relevance_rows(&[row(2, &[("hazard_id", "H1"), ("attribute_id", "A1"), ("score_letter", "D")])]);
/// let dataset = builder.build();
///
/// assert_eq!(dataset.attributes.len(), 1);
/// assert_eq!(dataset.skipped.len(), 1);
/// assert_eq!(dataset.relevance.get("H1", "A1").map(|e| e.priority), Some(5));
/// ```
pub struct DatasetBuilder {
    pub(crate) _scale: RelevanceScale,
    pub(crate) _exposure_categories: Vec<ExposureCategory>,
    pub(crate) _attributes: Vec<Attribute>,
    pub(crate) _hazards: Vec<Hazard>,
    pub(crate) _relevance: RelevanceTable,
    pub(crate) _exposure: Option<ExposureModel>,
    pub(crate) _skipped: Vec<SkippedRow>,
    pub(crate) _replaced: Vec<SkippedRow>,
    // Running count of attribute rows, used to name attributes without id.
    attribute_rows_seen: usize,
}

impl DatasetBuilder {
    pub fn new(scale: &RelevanceScale) -> DatasetBuilder {
        DatasetBuilder {
            _scale: scale.clone(),
            _exposure_categories: ExposureCategory::defaults(),
            _attributes: Vec::new(),
            _hazards: Vec::new(),
            _relevance: RelevanceTable::new(),
            _exposure: None,
            _skipped: Vec::new(),
            _replaced: Vec::new(),
            attribute_rows_seen: 0,
        }
    }

    /// Replaces the default asset categories of the exposure table.
    pub fn exposure_categories(self, categories: &[ExposureCategory]) -> DatasetBuilder {
        DatasetBuilder {
            _exposure_categories: categories.to_vec(),
            ..self
        }
    }

    /// Columns: `id` or `attribute_id` (else `ATTR_{n}`), `category`
    /// (default "Other"), `attribute_text` (required).
    pub fn add_attribute_rows(&mut self, rows: &[TableRow]) {
        let mut seen: HashSet<String> = self._attributes.iter().map(|a| a.id.clone()).collect();
        for row in rows {
            self.attribute_rows_seen += 1;
            let text = match row.get(&["attribute_text"]) {
                Some(t) => t.to_string(),
                None => {
                    self.skip(ATTRIBUTES_TABLE, row, "missing attribute_text");
                    continue;
                }
            };
            let id = row
                .get(&["id", "attribute_id"])
                .map(|s| s.to_string())
                .unwrap_or_else(|| format!("ATTR_{}", self.attribute_rows_seen));
            if !seen.insert(id.clone()) {
                self.skip(ATTRIBUTES_TABLE, row, &format!("duplicate attribute id {}", id));
                continue;
            }
            let category = row.get(&["category"]).unwrap_or("Other").to_string();
            self._attributes.push(Attribute { id, category, text });
        }
        debug!("add_attribute_rows: {} attributes", self._attributes.len());
    }

    /// Columns: `Hazard Code` (required), `Hazard Descriptions`.
    pub fn add_hazard_rows(&mut self, rows: &[TableRow]) {
        let mut seen: HashSet<String> = self._hazards.iter().map(|h| h.id.clone()).collect();
        for row in rows {
            let code = match row.get(&["Hazard Code"]) {
                Some(c) => c.to_string(),
                None => {
                    self.skip(HAZARDS_TABLE, row, "missing Hazard Code");
                    continue;
                }
            };
            if !seen.insert(code.clone()) {
                self.skip(HAZARDS_TABLE, row, &format!("duplicate hazard code {}", code));
                continue;
            }
            let name = row
                .get(&["Hazard Descriptions"])
                .unwrap_or(code.as_str())
                .to_string();
            self._hazards.push(Hazard {
                id: code.clone(),
                code,
                name,
            });
        }
        debug!("add_hazard_rows: {} hazards", self._hazards.len());
    }

    /// Columns: `hazard_id`, `attribute_id`, `score_letter`, all required.
    pub fn add_relevance_rows(&mut self, rows: &[TableRow]) {
        for row in rows {
            let fields = (
                row.get(&["hazard_id"]),
                row.get(&["attribute_id"]),
                row.get(&["score_letter"]),
            );
            match fields {
                (Some(h), Some(a), Some(l)) => {
                    if !self._scale.knows(l) {
                        debug!(
                            "add_relevance_rows: line {}: unknown letter {:?} counts as 0",
                            row.lineno, l
                        );
                    }
                    if let Some(previous) = self._relevance.insert(h, a, l, &self._scale) {
                        warn!(
                            "{} line {}: ({}, {}) replaces the earlier class {}",
                            RELEVANCE_TABLE, row.lineno, h, a, previous.letter
                        );
                        self._replaced.push(SkippedRow {
                            table: RELEVANCE_TABLE.to_string(),
                            lineno: row.lineno,
                            reason: format!("replaces the earlier class {} of ({}, {})", previous.letter, h, a),
                        });
                    }
                }
                (None, _, _) => self.skip(RELEVANCE_TABLE, row, "missing hazard_id"),
                (_, None, _) => self.skip(RELEVANCE_TABLE, row, "missing attribute_id"),
                (_, _, None) => self.skip(RELEVANCE_TABLE, row, "missing score_letter"),
            }
        }
        debug!("add_relevance_rows: {} entries", self._relevance.len());
    }

    /// Columns: `Code`, then `1`..`5` and `{prefix}1`..`{prefix}5` for every category.
    pub fn add_exposure_rows(&mut self, rows: &[TableRow]) {
        let mut model = self._exposure.take().unwrap_or_default();
        for row in rows {
            match row.get(&["Code"]) {
                Some(code) => {
                    model.add_row(code, row, &self._exposure_categories);
                }
                None => self.skip(EXPOSURE_TABLE, row, "missing Code"),
            }
        }
        self._exposure = Some(model);
    }

    pub fn build(self) -> Dataset {
        info!(
            "Dataset: {} attributes, {} hazards, {} relevance entries, exposure metrics: {:?}, {} skipped rows",
            self._attributes.len(),
            self._hazards.len(),
            self._relevance.len(),
            self._exposure.as_ref().map(|m| m.catalogue().to_vec()),
            self._skipped.len()
        );
        Dataset {
            attributes: self._attributes,
            hazards: self._hazards,
            relevance: self._relevance,
            exposure: self._exposure,
            skipped: self._skipped,
            replaced: self._replaced,
        }
    }

    fn skip(&mut self, table: &str, row: &TableRow, reason: &str) {
        warn!("{} line {}: skipping row: {}", table, row.lineno, reason);
        self._skipped.push(SkippedRow {
            table: table.to_string(),
            lineno: row.lineno,
            reason: reason.to_string(),
        });
    }
}

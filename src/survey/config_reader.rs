use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

use crate::args::Args;
use crate::survey::io_common::provider_for_path;
use crate::survey::*;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct TableSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "worksheetName")]
    pub worksheet_name: Option<String>,
}

impl TableSource {
    /// A source given directly on the command line: the provider follows the extension.
    pub fn from_path(path: &str) -> TableSource {
        TableSource {
            provider: provider_for_path(path).to_string(),
            file_path: path.to_string(),
            worksheet_name: None,
        }
    }

    fn relative_to(&self, root: &Path) -> TableSource {
        let p: PathBuf = [root, Path::new(&self.file_path)].iter().collect();
        TableSource {
            file_path: p.as_path().display().to_string(),
            ..self.clone()
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveyTables {
    pub attributes: Option<TableSource>,
    pub hazards: Option<TableSource>,
    pub relevance: Option<TableSource>,
    pub exposure: Option<TableSource>,
}

/// Either the name of a preset or a full letter -> priority table.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScaleSetting {
    Preset(String),
    Weights(BTreeMap<String, u32>),
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub key: String,
    pub label: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "categoryWeights", default)]
    pub category_weights: BTreeMap<String, f64>,
    #[serde(rename = "defaultForOthers")]
    pub default_for_others: Option<f64>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ExposureCategoryConfig {
    pub name: String,
    /// The name of the category when not provided.
    pub prefix: Option<String>,
}

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveyConfig {
    #[serde(default)]
    pub tables: SurveyTables,
    #[serde(rename = "relevanceScale")]
    pub relevance_scale: Option<ScaleSetting>,
    pub profiles: Option<Vec<ProfileConfig>>,
    #[serde(rename = "exposureCategories")]
    pub exposure_categories: Option<Vec<ExposureCategoryConfig>>,
    pub answers: Option<String>,
    pub profile: Option<String>,
    #[serde(rename = "exposureMetric")]
    pub exposure_metric: Option<String>,
}

/// Everything a run needs, once the configuration file and the command line are merged.
#[derive(PartialEq, Debug, Clone)]
pub struct RunSettings {
    pub attributes: TableSource,
    pub hazards: TableSource,
    pub relevance: TableSource,
    pub exposure: Option<TableSource>,
    pub scale: RelevanceScale,
    pub profiles: ProfileCatalogue,
    pub exposure_categories: Vec<ExposureCategory>,
    pub answers: Option<String>,
    pub profile: String,
    pub exposure_metric: Option<String>,
}

pub fn read_config(path: &str) -> SurveyResult<SurveyConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: SurveyConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

/// Merges the command line over the configuration file, if any.
pub fn resolve_settings(args: &Args) -> SurveyResult<RunSettings> {
    let (config, root) = match args.config.as_deref() {
        Some(path) => {
            let config = read_config(path)?;
            let root = Path::new(path)
                .parent()
                .context(MissingParentDirSnafu { path })?
                .to_path_buf();
            (config, root)
        }
        None => (SurveyConfig::default(), PathBuf::new()),
    };

    let table = |cli: &Option<String>, conf: &Option<TableSource>| -> Option<TableSource> {
        match (cli, conf) {
            (Some(p), _) => Some(TableSource::from_path(p)),
            (None, Some(ts)) => Some(ts.relative_to(&root)),
            (None, None) => None,
        }
    };
    let attributes = table(&args.attributes, &config.tables.attributes)
        .context(MissingTableSnafu { table: ATTRIBUTES_TABLE })?;
    let hazards = table(&args.hazards, &config.tables.hazards)
        .context(MissingTableSnafu { table: HAZARDS_TABLE })?;
    let relevance = table(&args.relevance, &config.tables.relevance)
        .context(MissingTableSnafu { table: RELEVANCE_TABLE })?;
    let exposure = table(&args.exposure, &config.tables.exposure);

    let scale_setting = match &args.scale {
        Some(name) => Some(ScaleSetting::Preset(name.clone())),
        None => config.relevance_scale.clone(),
    };
    let scale = read_scale(&scale_setting)?;

    let profiles = match &config.profiles {
        Some(ps) => ProfileCatalogue::new(ps.iter().map(read_profile).collect()),
        None => ProfileCatalogue::default(),
    };

    let exposure_categories = match &config.exposure_categories {
        Some(cats) => cats
            .iter()
            .map(|c| ExposureCategory::new(&c.name, c.prefix.as_deref().unwrap_or(&c.name)))
            .collect(),
        None => ExposureCategory::defaults(),
    };

    let answers = match (&args.answers, &config.answers) {
        (Some(p), _) => Some(p.clone()),
        (None, Some(p)) => {
            let full: PathBuf = [root.as_path(), Path::new(p)].iter().collect();
            Some(full.as_path().display().to_string())
        }
        (None, None) => None,
    };

    let settings = RunSettings {
        attributes,
        hazards,
        relevance,
        exposure,
        scale,
        profiles,
        exposure_categories,
        answers,
        profile: args
            .profile
            .clone()
            .or_else(|| config.profile.clone())
            .unwrap_or_else(|| ALL_PROFILE.to_string()),
        exposure_metric: args
            .exposure_metric
            .clone()
            .or_else(|| config.exposure_metric.clone()),
    };
    info!("settings: {:?}", settings);
    Ok(settings)
}

fn read_scale(setting: &Option<ScaleSetting>) -> SurveyResult<RelevanceScale> {
    match setting {
        None => Ok(RelevanceScale::default()),
        Some(ScaleSetting::Preset(name)) => {
            RelevanceScale::preset(name).context(UnknownScaleSnafu { name: name.as_str() })
        }
        Some(ScaleSetting::Weights(weights)) => {
            let pairs: Vec<(String, u32)> = weights.iter().map(|(l, w)| (l.clone(), *w)).collect();
            RelevanceScale::from_pairs(&pairs).context(ScoringSnafu {})
        }
    }
}

fn read_profile(p: &ProfileConfig) -> Profile {
    Profile {
        key: p.key.clone(),
        label: p.label.clone().unwrap_or_else(|| p.key.clone()),
        description: p.description.clone().unwrap_or_default(),
        category_weights: p
            .category_weights
            .iter()
            .map(|(c, w)| (c.clone(), *w))
            .collect(),
        default_for_others: p.default_for_others.unwrap_or(0.0),
    }
}

/// Reads a summary written by a previous run, to compare against.
pub fn read_summary(path: &str) -> SurveyResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(js)
}

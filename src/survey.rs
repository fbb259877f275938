use log::{debug, info, warn};

use hazard_scoring::builder::{ATTRIBUTES_TABLE, EXPOSURE_TABLE, HAZARDS_TABLE, RELEVANCE_TABLE};
use hazard_scoring::*;
use snafu::{prelude::*, Snafu};

use std::path::Path;

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::survey::config_reader::*;

pub mod config_reader;
mod export;
mod io_common;
mod io_csv;
mod io_excel;
mod loader;

#[derive(Debug, Snafu)]
pub enum SurveyError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The spreadsheet {path} has no data"))]
    EmptyExcel { path: String },
    #[snafu(display("The spreadsheet {path} has no worksheet named {name}"))]
    MissingWorksheet { path: String, name: String },
    #[snafu(display("Error opening file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading the header of {path}"))]
    CsvHeader { source: csv::Error, path: String },
    #[snafu(display("Error reading {path} at line {lineno}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Error writing CSV content"))]
    CsvWrite { source: csv::Error },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON in {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error producing JSON"))]
    WritingJson { source: serde_json::Error },
    #[snafu(display("Error writing file {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Cannot find the directory of {path}"))]
    MissingParentDir { path: String },
    #[snafu(display("No source given for the {table} table"))]
    MissingTable { table: String },
    #[snafu(display("Unknown provider {provider} (expected csv or xlsx)"))]
    UnknownProvider { provider: String },
    #[snafu(display("Unknown relevance scale {name} (expected planning or linear)"))]
    UnknownScale { name: String },
    #[snafu(display("Could not load the {table} table"))]
    LoadingTable {
        source: Box<SurveyError>,
        table: String,
    },
    #[snafu(display("Scoring error"))]
    Scoring { source: ScoringErrors },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error + Send + Sync>, Some)))]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

pub type SurveyResult<T> = Result<T, SurveyError>;
pub type BSurveyResult<T> = Result<T, Box<SurveyError>>;

/// The number of hazards shown in the terminal by default.
const DEFAULT_TOP: usize = 10;

fn build_summary_js(ranking: &Ranking, dataset: &Dataset) -> JSValue {
    let results: Vec<JSValue> = ranking
        .hazards
        .iter()
        .enumerate()
        .map(|(idx, sh)| {
            json!({
                "rank": idx + 1,
                "hazardCode": sh.hazard.code,
                "hazardName": sh.hazard.name,
                "rawScore": sh.raw_score,
                "score": sh.normalised,
                "band": sh.band.as_str(),
                "exposure": sh.exposure_raw,
                "exposureNorm": sh.exposure_norm,
            })
        })
        .collect();
    json!({
        "config": {
            "profile": ranking.profile,
            "exposureMetric": ranking.exposure_metric,
            "maxExposure": ranking.max_exposure,
        },
        "results": results,
        "skippedRows": dataset.skipped.len(),
    })
}

/// Reads the answers of the respondent: a JSON object or a CSV file with
/// the columns attribute_id and importance.
fn read_answers(path: &str) -> BSurveyResult<Vec<(String, String)>> {
    let is_json = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e.eq_ignore_ascii_case("json"));
    if is_json {
        let js = read_summary(path)?;
        let obj = match js.as_object() {
            Some(o) => o.clone(),
            None => {
                return Err(Box::new(SurveyError::Whatever {
                    message: format!("The answers in {} should be a JSON object", path),
                    source: None,
                }));
            }
        };
        Ok(obj
            .iter()
            .map(|(k, v)| {
                let s = match v {
                    JSValue::String(s) => s.clone(),
                    x => x.to_string(),
                };
                (k.clone(), s)
            })
            .collect())
    } else {
        let rows = io_csv::read_csv_table(path)?;
        let mut res = Vec::new();
        for row in rows.iter() {
            match (
                row.get(&["attribute_id", "id"]),
                row.get(&["importance", "answer"]),
            ) {
                (Some(id), Some(v)) => res.push((id.to_string(), v.to_string())),
                _ => warn!("{} line {}: incomplete answer, skipped", path, row.lineno),
            }
        }
        Ok(res)
    }
}

/// An importance as written in an answers file: an integer, possibly
/// written as a whole float like `5.0`.
fn parse_importance(value: &str) -> Option<i64> {
    let v = value.trim();
    if let Ok(x) = v.parse::<i64>() {
        return Some(x);
    }
    match v.parse::<f64>() {
        Ok(x) if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e15 => Some(x as i64),
        _ => None,
    }
}

/// Applies the answers one by one. Invalid answers are reported and ignored.
fn apply_answers<'a>(session: Session<'a>, answers: &[(String, String)]) -> Session<'a> {
    let mut cur = session;
    for (id, value) in answers.iter() {
        let importance = match parse_importance(value) {
            Some(x) => x,
            None => {
                warn!("Answer {:?} for {} is not a number, ignored", value, id);
                continue;
            }
        };
        let res = match u8::try_from(importance) {
            Ok(x) => cur.with_answer(id, x),
            Err(_) => Err(ScoringErrors::ImportanceOutOfRange {
                attribute: id.clone(),
                value: importance,
            }),
        };
        match res {
            Ok(s) => cur = s,
            Err(e) => warn!("Answer ignored: {}", e),
        }
    }
    cur
}

fn check_reference(summary: &JSValue, reference_path: &str) -> SurveyResult<()> {
    let summary_ref = read_summary(reference_path)?;
    debug!("reference summary: {:?}", summary_ref);
    let pretty_ref = serde_json::to_string_pretty(&summary_ref).context(WritingJsonSnafu {})?;
    let pretty_summary = serde_json::to_string_pretty(summary).context(WritingJsonSnafu {})?;
    if pretty_ref != pretty_summary {
        warn!("Found differences with the reference summary");
        print_diff(pretty_ref.as_str(), pretty_summary.as_str(), "\n");
        whatever!("Difference detected between the computed summary and the reference summary")
    }
    info!("The summary matches the reference {}", reference_path);
    Ok(())
}

pub fn run_survey(args: &Args) -> BSurveyResult<()> {
    let settings = resolve_settings(args)?;

    // The only blocking step: everything after works on the in-memory dataset.
    let tables = loader::load_tables(&settings)?;
    let mut builder =
        DatasetBuilder::new(&settings.scale).exposure_categories(&settings.exposure_categories);
    builder.add_attribute_rows(&tables.attributes);
    builder.add_hazard_rows(&tables.hazards);
    builder.add_relevance_rows(&tables.relevance);
    if let Some(rows) = &tables.exposure {
        builder.add_exposure_rows(rows);
    }
    let dataset = builder.build();
    for skipped in dataset.skipped.iter() {
        debug!("skipped: {:?}", skipped);
    }

    if args.list_profiles {
        export::print_profiles(&settings.profiles, &dataset.exposure_metrics());
        return Ok(());
    }

    let answers = match &settings.answers {
        Some(path) => read_answers(path)?,
        None => {
            info!("No answers provided: every attribute counts as moderately important");
            Vec::new()
        }
    };

    let mut session = apply_answers(Session::new(&dataset, &settings.profiles), &answers)
        .with_profile(&settings.profile);
    if let Some(metric) = &settings.exposure_metric {
        session = session.with_exposure_metric(Some(metric));
    }
    let ranking = session.ranking();
    let summary_js = build_summary_js(&ranking, &dataset);

    let to_stdout = |o: &Option<String>| o.as_deref() == Some("stdout");
    if !to_stdout(&args.out) && !to_stdout(&args.summary) {
        export::print_ranking(&ranking, args.top.unwrap_or(DEFAULT_TOP));
    }

    if let Some(hazard_code) = &args.explain {
        let lines = session.explain(hazard_code).context(ScoringSnafu {})?;
        export::print_explain(hazard_code, &lines);
    }

    if let Some(out) = &args.out {
        let content = export::export_csv(&ranking)?;
        export::write_output(out, &content)?;
    }

    if let Some(summary_out) = &args.summary {
        let pretty = serde_json::to_string_pretty(&summary_js).context(WritingJsonSnafu {})?;
        export::write_output(summary_out, &pretty)?;
    }

    // The reference summary, if provided for comparison
    if let Some(reference) = &args.reference {
        check_reference(&summary_js, reference)?;
    }

    Ok(())
}

// Loading all the tables of a survey at once.

use crate::survey::io_csv::read_csv_table;
use crate::survey::io_excel::read_excel_table;
use crate::survey::*;

/// The raw rows of the four tables.
#[derive(Debug, Clone)]
pub struct LoadedTables {
    pub attributes: Vec<TableRow>,
    pub hazards: Vec<TableRow>,
    pub relevance: Vec<TableRow>,
    /// None when no exposure table is configured or when it could not be read.
    pub exposure: Option<Vec<TableRow>>,
}

pub fn read_table(source: &TableSource) -> BSurveyResult<Vec<TableRow>> {
    debug!("read_table: {:?}", source);
    match source.provider.as_str() {
        "csv" => read_csv_table(&source.file_path),
        "xlsx" => read_excel_table(&source.file_path, source.worksheet_name.as_deref()),
        x => Err(Box::new(SurveyError::UnknownProvider {
            provider: x.to_string(),
        })),
    }
}

fn read_required(source: &TableSource, table: &str) -> SurveyResult<Vec<TableRow>> {
    read_table(source).context(LoadingTableSnafu { table })
}

/// Reads the four tables in parallel. A failure on one of the three required
/// tables stops the survey. The exposure table is optional.
pub fn load_tables(settings: &RunSettings) -> BSurveyResult<LoadedTables> {
    let ((attributes, hazards), (relevance, exposure)) = rayon::join(
        || {
            rayon::join(
                || read_required(&settings.attributes, ATTRIBUTES_TABLE),
                || read_required(&settings.hazards, HAZARDS_TABLE),
            )
        },
        || {
            rayon::join(
                || read_required(&settings.relevance, RELEVANCE_TABLE),
                || settings.exposure.as_ref().map(read_table),
            )
        },
    );

    let exposure = match exposure {
        None => {
            info!("No exposure table: the exposure axis is not available");
            None
        }
        Some(Ok(rows)) => Some(rows),
        Some(Err(e)) => {
            warn!(
                "The {} table could not be read, the exposure axis is not available: {}",
                EXPOSURE_TABLE, e
            );
            None
        }
    };

    Ok(LoadedTables {
        attributes: attributes?,
        hazards: hazards?,
        relevance: relevance?,
        exposure,
    })
}

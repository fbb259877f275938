// Primitives for reading CSV files.

use crate::survey::io_common::{assemble_row, clean_header, simplify_file_name};
use crate::survey::*;

/// Reads a CSV table with a header row. Short rows are accepted: the missing
/// cells are simply absent from the row.
pub fn read_csv_table(path: &str) -> BSurveyResult<Vec<TableRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let headers: Vec<String> = rdr
        .headers()
        .context(CsvHeaderSnafu { path })?
        .iter()
        .map(clean_header)
        .collect();
    debug!("read_csv_table: {}: headers {:?}", path, headers);

    let mut res: Vec<TableRow> = Vec::new();
    for (idx, record_r) in rdr.records().enumerate() {
        // The header is line 1.
        let fallback_lineno = idx + 2;
        let record = record_r.context(CsvLineParseSnafu {
            path,
            lineno: fallback_lineno,
        })?;
        let lineno = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(fallback_lineno);
        if record.iter().all(|s| s.trim().is_empty()) {
            debug!("read_csv_table: {}: blank line {}", path, lineno);
            continue;
        }
        let values: Vec<String> = record.iter().map(|s| s.to_string()).collect();
        res.push(assemble_row(lineno, &headers, &values));
    }
    info!(
        "read_csv_table: {}: {} rows",
        simplify_file_name(path),
        res.len()
    );
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_file(name: &str) -> String {
        format!("{}/tests/data/basic/{}", env!("CARGO_MANIFEST_DIR"), name)
    }

    #[test]
    fn read_attributes() {
        let rows = read_csv_table(&data_file("attributes.csv")).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].lineno, 2);
        assert_eq!(rows[0].get(&["id"]), Some("A1"));
        assert_eq!(rows[2].get(&["attribute_text"]), None);
        assert_eq!(rows[3].get(&["id"]), None);
        assert_eq!(rows[3].lineno, 5);
    }

    #[test]
    fn quoted_fields() {
        let rows = read_csv_table(&data_file("hazards.csv")).unwrap();
        assert_eq!(rows[1].get(&["Hazard Descriptions"]), Some("Flood, riverine"));
        assert_eq!(
            rows[3].get(&["Hazard Descriptions"]),
            Some("Earthquake \"big one\"")
        );
    }

    #[test]
    fn missing_file() {
        let res = read_csv_table(&data_file("nothing_here.csv"));
        assert!(matches!(res.map_err(|e| *e), Err(SurveyError::CsvOpen { .. })));
    }
}

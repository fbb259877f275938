use std::collections::HashMap;
use std::path::Path;

use hazard_scoring::TableRow;

/// The provider of a table given only by its path.
pub fn provider_for_path(path: &str) -> &'static str {
    match Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("xlsx") | Some("xlsm") => "xlsx",
        _ => "csv",
    }
}

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Header cells as they come out of spreadsheets: with a byte order mark or
/// stray spaces.
pub fn clean_header(h: &str) -> String {
    h.trim_start_matches('\u{feff}').trim().to_string()
}

/// Pairs every value with the column it falls under. Columns without a name
/// are dropped, and so are the values beyond the header.
pub fn assemble_row(lineno: usize, headers: &[String], values: &[String]) -> TableRow {
    let fields: HashMap<String, String> = headers
        .iter()
        .zip(values.iter())
        .filter(|(h, _)| !h.is_empty())
        .map(|(h, v)| (h.clone(), v.clone()))
        .collect();
    TableRow::new(lineno, fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn providers() {
        assert_eq!(provider_for_path("data/hazards.xlsx"), "xlsx");
        assert_eq!(provider_for_path("data/hazards.XLSX"), "xlsx");
        assert_eq!(provider_for_path("data/hazards.csv"), "csv");
        assert_eq!(provider_for_path("hazards"), "csv");
    }

    #[test]
    fn headers_and_rows() {
        assert_eq!(clean_header("\u{feff}id "), "id");
        assert_eq!(simplify_file_name("/tmp/x/attributes.csv"), "attributes.csv");

        let headers = vec!["id".to_string(), "".to_string(), "category".to_string()];
        let values = vec!["A1".to_string(), "junk".to_string()];
        let row = assemble_row(4, &headers, &values);
        assert_eq!(row.lineno, 4);
        assert_eq!(row.get(&["id"]), Some("A1"));
        assert_eq!(row.get(&["category"]), None);
        assert_eq!(row.fields.len(), 1);
    }
}

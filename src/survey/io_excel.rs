// Primitives for reading Excel worksheets.

use calamine::{open_workbook, DataType, Range, Reader, Xlsx};

use crate::survey::io_common::{assemble_row, clean_header};
use crate::survey::*;

/// Reads a worksheet whose first row is the header. Without a worksheet
/// name, the first worksheet of the workbook is read.
pub fn read_excel_table(path: &str, worksheet: Option<&str>) -> BSurveyResult<Vec<TableRow>> {
    let wrange = get_range(path, worksheet)?;
    let mut rows = wrange.rows();
    let headers: Vec<String> = rows
        .next()
        .context(EmptyExcelSnafu { path })?
        .iter()
        .map(|c| clean_header(&cell_to_string(c)))
        .collect();
    debug!("read_excel_table: {}: headers {:?}", path, headers);

    let mut res: Vec<TableRow> = Vec::new();
    for (idx, row) in rows.enumerate() {
        let values: Vec<String> = row.iter().map(cell_to_string).collect();
        if values.iter().all(|s| s.trim().is_empty()) {
            continue;
        }
        // The header is line 1, like in the spreadsheet.
        res.push(assemble_row(idx + 2, &headers, &values));
    }
    info!("read_excel_table: {}: {} rows", path, res.len());
    Ok(res)
}

fn get_range(path: &str, worksheet: Option<&str>) -> BSurveyResult<Range<DataType>> {
    debug!("get_range: path: {:?} worksheet: {:?}", path, worksheet);
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let wrange = if let Some(name) = worksheet {
        workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { path, name })?
            .context(OpeningExcelSnafu { path })?
    } else {
        workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?
    };
    Ok(wrange)
}

/// The text of a cell. Whole numbers lose their decimal part, so that
/// a code typed as 12 in Excel reads "12" and not "12.0".
fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => (*f as i64).to_string(),
        DataType::Float(f) => f.to_string(),
        DataType::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells() {
        assert_eq!(cell_to_string(&DataType::Float(12.0)), "12");
        assert_eq!(cell_to_string(&DataType::Float(2.5)), "2.5");
        assert_eq!(cell_to_string(&DataType::Int(-3)), "-3");
        assert_eq!(cell_to_string(&DataType::String("WF".to_string())), "WF");
        assert_eq!(cell_to_string(&DataType::Empty), "");
    }

    #[test]
    fn missing_workbook() {
        let res = read_excel_table("no/such/workbook.xlsx", None);
        assert!(matches!(
            res.map_err(|e| *e),
            Err(SurveyError::OpeningExcel { .. })
        ));
    }
}

//! Excel workbook reader backed by calamine.

use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};
use tracing::debug;

use crate::domain::CellValue;
use crate::infrastructure::traits::SpreadsheetSource;

/// Reads `.xlsx` workbooks.
#[derive(Debug, Default)]
pub struct CalamineSpreadsheet;

impl CalamineSpreadsheet {
    fn open(path: &Path) -> Result<Xlsx<std::io::BufReader<std::fs::File>>, String> {
        open_workbook(path).map_err(|e: calamine::XlsxError| e.to_string())
    }
}

fn to_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Error(_) => CellValue::Empty,
        other => CellValue::Text(other.to_string()),
    }
}

impl SpreadsheetSource for CalamineSpreadsheet {
    fn sheet_names(&self, path: &Path) -> Result<Vec<String>, String> {
        let workbook = Self::open(path)?;
        Ok(workbook.sheet_names())
    }

    fn read_sheet(&self, path: &Path, sheet: &str) -> Result<Vec<Vec<CellValue>>, String> {
        let mut workbook = Self::open(path)?;
        let range = workbook
            .worksheet_range(sheet)
            .map_err(|e| format!("sheet '{sheet}': {e}"))?;
        debug!(
            "read_sheet: {} sheet={} size={:?}",
            path.display(),
            sheet,
            range.get_size()
        );
        Ok(range
            .rows()
            .map(|row| row.iter().map(to_cell).collect())
            .collect())
    }
}

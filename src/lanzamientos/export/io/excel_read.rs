use std::path::Path;

use calamine::{DataType, Range, Reader, Xlsx, open_workbook};
use tracing::debug;

use crate::lanzamientos::export::error::{ExportError, Result};
use crate::lanzamientos::export::model::{CellValue, Sheet, Workbook};

/// Loads every worksheet of an xlsx workbook in its native order.
pub fn read_workbook(path: &Path) -> Result<Workbook> {
    if !path.exists() {
        return Err(ExportError::MissingInput(path.to_path_buf()));
    }
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    let names = workbook.sheet_names().to_owned();
    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let Some(range) = workbook.worksheet_range(&name) else {
            continue;
        };
        let range = range.map_err(ExportError::from)?;
        let rows = range_to_rows(&range);
        debug!(sheet = %name, rows = rows.len(), "loaded worksheet");
        sheets.push(Sheet::new(name, rows));
    }

    Ok(Workbook { sheets })
}

/// calamine ranges begin at the first used cell; pad leading rows back in so
/// that `rows[0]` is always the sheet's first row.
fn range_to_rows(range: &Range<DataType>) -> Vec<Vec<CellValue>> {
    let Some((first_row, _)) = range.start() else {
        return Vec::new();
    };
    let mut rows: Vec<Vec<CellValue>> = (0..first_row).map(|_| Vec::new()).collect();
    rows.extend(
        range
            .rows()
            .map(|row| row.iter().map(cell_value).collect::<Vec<_>>()),
    );
    rows
}

fn cell_value(cell: &DataType) -> CellValue {
    match cell {
        DataType::String(value) => CellValue::Text(value.clone()),
        DataType::Float(value) => CellValue::Number(*value),
        DataType::Int(value) => CellValue::Number(*value as f64),
        DataType::Bool(true) => CellValue::Text("True".to_string()),
        DataType::Bool(false) => CellValue::Text("False".to_string()),
        DataType::DateTime(_) | DataType::DateTimeIso(_) => match cell.as_datetime() {
            Some(at) => CellValue::Text(at.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => CellValue::Text(cell.to_string()),
        },
        DataType::Empty => CellValue::Empty,
        other => CellValue::Text(other.to_string()),
    }
}

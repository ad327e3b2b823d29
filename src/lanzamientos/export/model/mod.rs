use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Value of a single spreadsheet cell as seen by the ledger parser.
///
/// The reader collapses every workbook cell type into one of these variants so
/// the rest of the pipeline only has to deal with text, numbers, or nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Textual content, stored exactly as read.
    Text(String),
    /// Numeric content. Integers are widened to `f64`.
    Number(f64),
    /// A blank or missing cell.
    Empty,
}

impl CellValue {
    /// Stringifies and trims the cell. Blank cells yield an empty string.
    ///
    /// Whole numbers are rendered without a fractional part so a numeric `1`
    /// compares equal to the textual marker `"1"`.
    pub fn clean(&self) -> String {
        match self {
            CellValue::Text(value) => value.trim().to_string(),
            CellValue::Number(value) => format_number(*value),
            CellValue::Empty => String::new(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value.to_string())
        }
    }
}

/// Cleans an optional cell, treating a missing cell like a blank one.
pub fn clean(cell: Option<&CellValue>) -> String {
    cell.map(CellValue::clean).unwrap_or_default()
}

fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// A worksheet loaded into memory. `rows[0]` is the header row.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub title: String,
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn new(title: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            title: title.into(),
            rows,
        }
    }

    /// Cleaned header row. Empty when the sheet has no rows at all.
    pub fn headers(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|row| row.iter().map(CellValue::clean).collect())
            .unwrap_or_default()
    }

    /// Rows after the header row.
    pub fn data_rows(&self) -> &[Vec<CellValue>] {
        self.rows.get(1..).unwrap_or(&[])
    }
}

/// Sheets of a workbook in their native order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

/// A product column: its position in the sheet and the canonical code derived
/// from the header text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductColumn {
    pub index: usize,
    pub code: String,
    /// Descriptive text after the first hyphen, if the header had one.
    pub label: Option<String>,
}

/// One purchasing client read from a ledger sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientRow {
    pub code: String,
    pub name: String,
    pub locality: String,
    pub products: Vec<String>,
}

impl ClientRow {
    /// Name to publish: the client name, or the code when the name is blank.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.code
        } else {
            &self.name
        }
    }
}

/// Summary of one exported seller sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellerExport {
    pub seller: String,
    pub json_path: PathBuf,
    pub csv_path: PathBuf,
    pub client_count: usize,
    pub product_count: usize,
}

/// Structured per-seller export document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerDocument {
    pub seller: String,
    pub version: String,
    pub generated_at: String,
    pub clients: Vec<ClientEntry>,
}

/// A client as it appears in [`SellerDocument`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientEntry {
    pub code: String,
    pub name: String,
    pub locality: String,
    pub products: Vec<String>,
}

impl From<&ClientRow> for ClientEntry {
    fn from(row: &ClientRow) -> Self {
        Self {
            code: row.code.clone(),
            name: row.display_name().to_string(),
            locality: row.locality.clone(),
            products: row.products.clone(),
        }
    }
}

/// Summary document listing every seller exported for one version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    pub generated_at: String,
    pub sellers: Vec<ManifestEntry>,
}

/// Per-seller entry of a [`Manifest`]. Paths are relative to the output root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub seller: String,
    pub json: String,
    pub csv: String,
    pub client_count: usize,
    pub product_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_trims_text_and_blanks_empty_cells() {
        assert_eq!(CellValue::Text("  C1 ".into()).clean(), "C1");
        assert_eq!(CellValue::Empty.clean(), "");
        assert_eq!(clean(None), "");
    }

    #[test]
    fn clean_renders_whole_numbers_without_fraction() {
        assert_eq!(CellValue::Number(1.0).clean(), "1");
        assert_eq!(CellValue::Number(1234.0).clean(), "1234");
        assert_eq!(CellValue::Number(0.5).clean(), "0.5");
    }

    #[test]
    fn display_name_falls_back_to_code() {
        let row = ClientRow {
            code: "C2".into(),
            name: String::new(),
            locality: "CityB".into(),
            products: vec![],
        };
        assert_eq!(row.display_name(), "C2");
        assert_eq!(ClientEntry::from(&row).name, "C2");
    }

    #[test]
    fn headers_of_empty_sheet_are_empty() {
        let sheet = Sheet::new("Vacía", Vec::new());
        assert!(sheet.headers().is_empty());
        assert!(sheet.data_rows().is_empty());
    }
}

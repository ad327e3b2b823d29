//! Recognition and parsing of vendor ledger sheets.
//!
//! A vendor ledger has a header row naming a client code column (`COD`), a
//! client name column (`Cliente` or `Cliente2`), and a locality column
//! (`Localidad`). Every other non-empty header, except `Zona`, is a product
//! column whose cells hold `1` when the client bought the product.

use tracing::debug;

use crate::lanzamientos::export::model::{CellValue, ClientRow, ProductColumn, Sheet, clean};

const CODE_HEADER: &str = "cod";
const CLIENT_HEADERS: [&str; 2] = ["cliente", "cliente2"];
const LOCALITY_HEADER: &str = "localidad";
const ZONE_HEADER: &str = "zona";

/// Cell value marking a purchased product.
pub const PURCHASED_MARKER: &str = "1";

/// Positions of the fixed ledger columns within a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerColumns {
    pub code: usize,
    pub client: usize,
    pub locality: usize,
}

fn is_client_header(lowered: &str) -> bool {
    CLIENT_HEADERS.contains(&lowered)
}

/// Returns `true` when the headers contain a code, a client name, and a
/// locality column (case-insensitive).
pub fn looks_like_vendor_sheet<S: AsRef<str>>(headers: &[S]) -> bool {
    LedgerColumns::resolve(headers).is_some()
}

impl LedgerColumns {
    /// Locates the first code, client name, and locality columns. Returns
    /// `None` if any of the three is missing.
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> Option<Self> {
        let lowered: Vec<String> = headers
            .iter()
            .map(|header| header.as_ref().to_lowercase())
            .collect();
        let code = lowered.iter().position(|h| h == CODE_HEADER)?;
        let client = lowered.iter().position(|h| is_client_header(h))?;
        let locality = lowered.iter().position(|h| h == LOCALITY_HEADER)?;
        Some(Self {
            code,
            client,
            locality,
        })
    }
}

fn is_reserved_header(lowered: &str) -> bool {
    lowered == CODE_HEADER
        || is_client_header(lowered)
        || lowered == LOCALITY_HEADER
        || lowered == ZONE_HEADER
}

/// Maps every product header to its column position and product code, in
/// column order. The code is the text before the first hyphen.
pub fn extract_product_columns<S: AsRef<str>>(headers: &[S]) -> Vec<ProductColumn> {
    headers
        .iter()
        .enumerate()
        .filter_map(|(index, header)| {
            let header = header.as_ref().trim();
            if header.is_empty() || is_reserved_header(&header.to_lowercase()) {
                return None;
            }
            let (code, label) = match header.split_once('-') {
                Some((code, label)) => {
                    let label = label.trim();
                    (code.trim(), (!label.is_empty()).then(|| label.to_string()))
                }
                None => (header, None),
            };
            Some(ProductColumn {
                index,
                code: code.to_string(),
                label,
            })
        })
        .collect()
}

/// Reads client rows from `rows` (data rows only, header excluded). Rows
/// without a client code are dropped.
pub fn parse_rows(
    rows: &[Vec<CellValue>],
    columns: LedgerColumns,
    products: &[ProductColumn],
) -> Vec<ClientRow> {
    rows.iter()
        .filter_map(|row| {
            let code = clean(row.get(columns.code));
            if code.is_empty() {
                return None;
            }
            let purchased = products
                .iter()
                .filter(|product| clean(row.get(product.index)) == PURCHASED_MARKER)
                .map(|product| product.code.clone())
                .collect();
            Some(ClientRow {
                code,
                name: clean(row.get(columns.client)),
                locality: clean(row.get(columns.locality)),
                products: purchased,
            })
        })
        .collect()
}

/// Parses a whole sheet. Returns `None` when the sheet is not a vendor ledger.
pub fn parse_vendor_sheet(sheet: &Sheet) -> Option<Vec<ClientRow>> {
    let headers = sheet.headers();
    let columns = LedgerColumns::resolve(&headers)?;
    let products = extract_product_columns(&headers);
    for product in &products {
        debug!(
            sheet = %sheet.title,
            column = product.index,
            code = %product.code,
            label = product.label.as_deref().unwrap_or(""),
            "product column"
        );
    }
    Some(parse_rows(sheet.data_rows(), columns, &products))
}

/// Seller identifier for a sheet title: trimmed, spaces replaced by
/// underscores.
pub fn seller_id(title: &str) -> String {
    title.trim().replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> CellValue {
        CellValue::from(value)
    }

    #[test]
    fn classifier_requires_all_three_column_families() {
        assert!(looks_like_vendor_sheet(&["COD", "Cliente", "Localidad"]));
        let shuffled = ["localidad", "CLIENTE2", "cod", "A-1"];
        assert!(looks_like_vendor_sheet(&shuffled));
        assert!(!looks_like_vendor_sheet(&["Cliente", "Localidad"]));
        assert!(!looks_like_vendor_sheet(&["COD", "Localidad"]));
        assert!(!looks_like_vendor_sheet(&["COD", "Cliente"]));
        assert!(!looks_like_vendor_sheet::<&str>(&[]));
    }

    #[test]
    fn classifier_rejects_near_misses() {
        let long_code = ["Codigo", "Cliente", "Localidad"];
        let plural_client = ["COD", "Clientes", "Localidad"];
        assert!(!looks_like_vendor_sheet(&long_code));
        assert!(!looks_like_vendor_sheet(&plural_client));
    }

    #[test]
    fn reserved_headers_never_become_products() {
        let mut headers = vec!["COD", "Cliente", "cliente2", "LOCALIDAD"];
        headers.extend(["Zona", "", "  ", "P1"]);
        let products = extract_product_columns(&headers);
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].index, 7);
        assert_eq!(products[0].code, "P1");
    }

    #[test]
    fn product_code_is_text_before_first_hyphen() {
        let products = extract_product_columns(&["A-1", "B", " C - Crema - 500g ", "D-"]);
        let codes: Vec<&str> = products.iter().map(|p| p.code.as_str()).collect();
        assert_eq!(codes, ["A", "B", "C", "D"]);
        assert_eq!(products[0].label.as_deref(), Some("1"));
        assert_eq!(products[1].label, None);
        assert_eq!(products[2].label.as_deref(), Some("Crema - 500g"));
        assert_eq!(products[3].label, None);
    }

    #[test]
    fn duplicate_product_codes_are_kept() {
        let products = extract_product_columns(&["A-1", "A-2"]);
        assert_eq!(products.len(), 2);
        assert_eq!(products[1].index, 1);
    }

    #[test]
    fn rows_without_code_are_dropped() {
        let headers = ["COD", "Cliente", "Localidad", "A-1"];
        let columns = LedgerColumns::resolve(&headers).unwrap();
        let products = extract_product_columns(&headers);
        let rows = vec![
            vec![text(" "), text("Nadie"), text("X"), CellValue::Number(1.0)],
            vec![CellValue::Empty, text("Nadie"), text("X"), text("1")],
            vec![text("C1"), text("Ana"), text("Y"), text("1")],
        ];

        let parsed = parse_rows(&rows, columns, &products);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].code, "C1");
        assert_eq!(parsed[0].products, ["A"]);
    }

    #[test]
    fn only_literal_one_marks_a_purchase() {
        let headers = ["COD", "Cliente", "Localidad", "A", "B", "C", "D", "E", "F"];
        let columns = LedgerColumns::resolve(&headers).unwrap();
        let products = extract_product_columns(&headers);
        let rows = vec![vec![
            text("C1"),
            text("Ana"),
            text("Y"),
            text("0"),
            text("x"),
            text("true"),
            text(" 1 "),
            CellValue::Number(1.0),
            CellValue::Number(1.5),
        ]];

        let parsed = parse_rows(&rows, columns, &products);
        assert_eq!(parsed[0].products, ["D", "E"]);
    }

    #[test]
    fn short_rows_default_to_empty_values() {
        let headers = ["COD", "Cliente", "Localidad", "A"];
        let columns = LedgerColumns::resolve(&headers).unwrap();
        let products = extract_product_columns(&headers);
        let rows = vec![vec![CellValue::Number(42.0)]];

        let parsed = parse_rows(&rows, columns, &products);
        assert_eq!(
            parsed,
            [ClientRow {
                code: "42".into(),
                name: String::new(),
                locality: String::new(),
                products: vec![],
            }]
        );
    }

    #[test]
    fn duplicate_client_codes_are_preserved() {
        let headers = ["COD", "Cliente", "Localidad"];
        let columns = LedgerColumns::resolve(&headers).unwrap();
        let rows = vec![vec![text("C1")], vec![text("C1")]];
        assert_eq!(parse_rows(&rows, columns, &[]).len(), 2);
    }

    #[test]
    fn parse_vendor_sheet_skips_non_ledgers() {
        let sheet = Sheet::new(
            "Precios",
            vec![
                vec![text("COD"), text("Cliente"), text("Precio")],
                vec![text("C1"), text("Ana"), text("1")],
            ],
        );
        assert_eq!(parse_vendor_sheet(&sheet), None);
    }

    #[test]
    fn parse_vendor_sheet_reads_rows_after_header() {
        let one = CellValue::Number(1.0);
        let sheet = Sheet::new(
            "Zona Norte",
            vec![
                vec![text("COD"), text("Cliente"), text("Localidad"), text("A-1")],
                vec![text("C1"), text("Juan"), text("CityA"), one],
            ],
        );
        let rows = parse_vendor_sheet(&sheet).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].products, ["A"]);
    }

    #[test]
    fn seller_id_replaces_spaces() {
        assert_eq!(seller_id(" Zona Norte "), "Zona_Norte");
        assert_eq!(seller_id("Juan  Pérez"), "Juan__Pérez");
    }
}

use std::path::Path;

use csv::{Terminator, WriterBuilder};

use crate::lanzamientos::export::error::Result;
use crate::lanzamientos::export::model::ClientRow;

/// Header of the flattened export.
pub const CSV_HEADER: [&str; 6] = [
    "version",
    "seller",
    "client_code",
    "client_name",
    "locality",
    "product_code",
];

/// Flattens clients into one record per purchased product. Clients without
/// purchases contribute a single record with an empty product code.
pub fn flatten_rows(seller: &str, version: &str, rows: &[ClientRow]) -> Vec<[String; 6]> {
    let mut records = Vec::new();
    for row in rows {
        let record = |product: &str| {
            [
                version.to_string(),
                seller.to_string(),
                row.code.clone(),
                row.display_name().to_string(),
                row.locality.clone(),
                product.to_string(),
            ]
        };
        if row.products.is_empty() {
            records.push(record(""));
        } else {
            records.extend(row.products.iter().map(|product| record(product)));
        }
    }
    records
}

/// Writes the flattened export, replacing any existing file.
pub fn write_seller_csv(
    path: &Path,
    seller: &str,
    version: &str,
    rows: &[ClientRow],
) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .from_path(path)?;
    writer.write_record(CSV_HEADER)?;
    for record in flatten_rows(seller, version, rows) {
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::lanzamientos::export::error::Result;
use crate::lanzamientos::export::model::{ClientEntry, ClientRow, SellerDocument};
use crate::lanzamientos::export::version::format_timestamp;

/// Builds the structured export document for one seller.
pub fn seller_document(
    seller: &str,
    version: &str,
    rows: &[ClientRow],
    generated_at: DateTime<Utc>,
) -> SellerDocument {
    SellerDocument {
        seller: seller.to_string(),
        version: version.to_string(),
        generated_at: format_timestamp(generated_at),
        clients: rows.iter().map(ClientEntry::from).collect(),
    }
}

/// Writes the structured export as pretty-printed JSON, replacing any
/// existing file.
pub fn write_seller_json(
    path: &Path,
    seller: &str,
    version: &str,
    rows: &[ClientRow],
    generated_at: DateTime<Utc>,
) -> Result<()> {
    let document = seller_document(seller, version, rows, generated_at);
    fs::write(path, serde_json::to_string_pretty(&document)?)?;
    Ok(())
}

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, Utc};
use tracing::{debug, info, instrument};

use crate::lanzamientos::export::error::Result;
use crate::lanzamientos::export::io::csv_export::write_seller_csv;
use crate::lanzamientos::export::io::excel_read::read_workbook;
use crate::lanzamientos::export::io::json_export::write_seller_json;
use crate::lanzamientos::export::io::manifest::write_manifest;
use crate::lanzamientos::export::ledger;
use crate::lanzamientos::export::model::{SellerExport, Workbook};
use crate::lanzamientos::export::upload::{RemoteStore, UploadTarget};
use crate::lanzamientos::export::version::resolve_version;

/// Settings for one export run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub output_dir: PathBuf,
    /// Explicit version tag. Defaults to the current ISO year-week.
    pub version: Option<String>,
    pub upload: Option<UploadTarget>,
}

impl ExportOptions {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            version: None,
            upload: None,
        }
    }
}

/// Outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub version: String,
    pub output_dir: PathBuf,
    pub exports: Vec<SellerExport>,
    /// Absent when no vendor sheet was detected.
    pub manifest_path: Option<PathBuf>,
    /// Keys written to remote storage, when an upload took place.
    pub uploaded: Option<Vec<String>>,
}

/// Exports every vendor ledger of `workbook` under `output_dir`, in sheet
/// order. Sheets that are not ledgers, or have no client rows, are skipped.
#[instrument(level = "info", skip_all, fields(output = %output_dir.display(), %version))]
pub fn process_workbook(
    workbook: &Workbook,
    output_dir: &Path,
    version: &str,
) -> Result<Vec<SellerExport>> {
    let mut exports = Vec::new();
    for sheet in &workbook.sheets {
        let Some(rows) = ledger::parse_vendor_sheet(sheet) else {
            debug!(sheet = %sheet.title, "not a vendor ledger, skipping");
            continue;
        };
        if rows.is_empty() {
            debug!(sheet = %sheet.title, "vendor ledger without client rows, skipping");
            continue;
        }

        let seller = ledger::seller_id(&sheet.title);
        let seller_dir = output_dir.join(&seller);
        fs::create_dir_all(&seller_dir)?;
        let json_path = seller_dir.join(format!("{seller}_{version}.json"));
        let csv_path = seller_dir.join(format!("{seller}_{version}.csv"));
        write_seller_json(&json_path, &seller, version, &rows, Utc::now())?;
        write_seller_csv(&csv_path, &seller, version, &rows)?;

        let product_count: usize = rows.iter().map(|row| row.products.len()).sum();
        info!(
            %seller,
            client_count = rows.len(),
            product_count,
            "exported seller"
        );
        exports.push(SellerExport {
            seller,
            json_path,
            csv_path,
            client_count: rows.len(),
            product_count,
        });
    }
    Ok(exports)
}

/// Runs the whole export: version resolution, per-seller files, the manifest,
/// and the optional copy to `store`.
///
/// The upload only happens when both `options.upload` and `store` are set and
/// at least one seller was exported.
#[instrument(level = "info", skip_all, fields(input = %input.display()))]
pub fn run(
    input: &Path,
    options: &ExportOptions,
    store: Option<&dyn RemoteStore>,
) -> Result<ExportReport> {
    let version = resolve_version(options.version.as_deref(), Local::now().date_naive());
    let output_dir = options.output_dir.as_path();
    let workbook = read_workbook(input)?;
    info!(sheet_count = workbook.sheets.len(), "read workbook");
    fs::create_dir_all(output_dir)?;

    let exports = process_workbook(&workbook, output_dir, &version)?;
    let mut report = ExportReport {
        version,
        output_dir: output_dir.to_path_buf(),
        exports,
        manifest_path: None,
        uploaded: None,
    };
    if report.exports.is_empty() {
        info!("no vendor sheets detected");
        return Ok(report);
    }

    report.manifest_path = Some(write_manifest(
        output_dir,
        &report.version,
        &report.exports,
        Utc::now(),
    )?);

    if let (Some(target), Some(store)) = (&options.upload, store) {
        let keys = store.copy_tree(output_dir, target.normalized_prefix())?;
        report.uploaded = Some(keys);
    }
    Ok(report)
}

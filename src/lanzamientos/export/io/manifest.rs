use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::lanzamientos::export::error::Result;
use crate::lanzamientos::export::model::{Manifest, ManifestEntry, SellerExport};
use crate::lanzamientos::export::version::format_timestamp;

/// File name of the manifest for `version`.
pub fn manifest_file_name(version: &str) -> String {
    format!("manifest_{version}.json")
}

/// Renders `path` relative to `root` with `/` separators. Paths outside `root`
/// are rendered as given.
pub fn relative_key(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Builds the manifest document for the exports of one run.
pub fn build_manifest(
    output_dir: &Path,
    version: &str,
    exports: &[SellerExport],
    generated_at: DateTime<Utc>,
) -> Manifest {
    Manifest {
        version: version.to_string(),
        generated_at: format_timestamp(generated_at),
        sellers: exports
            .iter()
            .map(|export| ManifestEntry {
                seller: export.seller.clone(),
                json: relative_key(output_dir, &export.json_path),
                csv: relative_key(output_dir, &export.csv_path),
                client_count: export.client_count,
                product_count: export.product_count,
            })
            .collect(),
    }
}

/// Writes `manifest_<version>.json` under `output_dir` and returns its path.
pub fn write_manifest(
    output_dir: &Path,
    version: &str,
    exports: &[SellerExport],
    generated_at: DateTime<Utc>,
) -> Result<PathBuf> {
    let manifest = build_manifest(output_dir, version, exports, generated_at);
    let path = output_dir.join(manifest_file_name(version));
    fs::write(&path, serde_json::to_string_pretty(&manifest)?)?;
    Ok(path)
}

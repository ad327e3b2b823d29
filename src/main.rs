use std::path::PathBuf;

use clap::{ArgAction, Parser};
use lanzamientos_export::process::{self, ExportOptions, ExportReport};
use lanzamientos_export::upload::{RemoteStore, S3CliStore, UploadTarget};
use lanzamientos_export::{ExportError, Result};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_tracing().and_then(|()| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| ExportError::Logging(error.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    let options = cli.options();
    let store = options
        .upload
        .as_ref()
        .map(|target| S3CliStore::new(target.bucket.clone()));
    let report = process::run(
        &cli.workbook,
        &options,
        store.as_ref().map(|store| store as &dyn RemoteStore),
    )?;
    print_report(&report, options.upload.as_ref());
    Ok(())
}

fn print_report(report: &ExportReport, upload: Option<&UploadTarget>) {
    let Some(manifest_path) = &report.manifest_path else {
        println!("No vendor sheets were detected in the workbook.");
        return;
    };

    println!(
        "Generated exports for {} seller(s) under {}",
        report.exports.len(),
        report.output_dir.display()
    );
    for export in &report.exports {
        println!(
            "  - {}: {} clientes, {} productos registrados",
            export.seller, export.client_count, export.product_count
        );
    }
    println!("Manifest saved to {}", manifest_path.display());

    if let (Some(target), Some(_)) = (upload, &report.uploaded) {
        println!("Uploaded artifacts to {}", target.destination());
    }
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Normalize vendor sheets from an XLSX workbook.",
    disable_version_flag = true
)]
struct Cli {
    /// Print version.
    #[arg(short = 'V', action = ArgAction::Version, value_parser = clap::value_parser!(bool))]
    print_version: (),

    /// Path to the vendor XLSX workbook.
    workbook: PathBuf,

    /// Directory to store generated files.
    #[arg(long, default_value = "exports")]
    output: PathBuf,

    /// Explicit version tag (defaults to the current ISO week, e.g. 2024-W09).
    #[arg(long = "version", value_name = "TAG")]
    version_tag: Option<String>,

    /// Upload results to the given S3 bucket.
    #[arg(long)]
    s3_bucket: Option<String>,

    /// Optional key prefix when uploading to S3.
    #[arg(long)]
    s3_prefix: Option<String>,
}

impl Cli {
    fn options(&self) -> ExportOptions {
        ExportOptions {
            output_dir: self.output.clone(),
            version: self.version_tag.clone(),
            upload: self.s3_bucket.as_ref().map(|bucket| UploadTarget {
                bucket: bucket.clone(),
                prefix: self.s3_prefix.clone(),
            }),
        }
    }
}

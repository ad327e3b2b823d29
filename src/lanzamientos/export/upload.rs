//! Copying generated artifacts to remote object storage.
//!
//! The export pipeline never depends on this module; the run only calls into a
//! [`RemoteStore`] after every local file has been written.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info, instrument};

use crate::lanzamientos::export::error::{ExportError, Result};
use crate::lanzamientos::export::io::manifest::relative_key;

/// Destination of an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    pub bucket: String,
    pub prefix: Option<String>,
}

impl UploadTarget {
    /// Prefix with trailing slashes removed. Empty prefixes count as absent.
    pub fn normalized_prefix(&self) -> Option<&str> {
        normalize_prefix(self.prefix.as_deref())
    }

    /// Human readable destination, e.g. `s3://bucket/weekly`.
    pub fn destination(&self) -> String {
        match self.normalized_prefix() {
            Some(prefix) => format!("s3://{}/{prefix}", self.bucket),
            None => format!("s3://{}", self.bucket),
        }
    }
}

/// A remote location able to receive a copy of a local directory tree.
pub trait RemoteStore {
    /// Copies every regular file under `root`, keyed by its path relative to
    /// `root` and joined onto `prefix`. Returns the keys written.
    fn copy_tree(&self, root: &Path, prefix: Option<&str>) -> Result<Vec<String>>;
}

fn normalize_prefix(prefix: Option<&str>) -> Option<&str> {
    prefix
        .map(|prefix| prefix.trim_end_matches('/'))
        .filter(|prefix| !prefix.is_empty())
}

/// Object key for a relative path under an optional prefix.
pub fn object_key(prefix: Option<&str>, relative: &str) -> String {
    match normalize_prefix(prefix) {
        Some(prefix) => format!("{prefix}/{relative}"),
        None => relative.to_string(),
    }
}

/// Lists every regular file under `root` with the key it uploads to, sorted by
/// relative path.
pub fn local_objects(root: &Path, prefix: Option<&str>) -> Result<Vec<(PathBuf, String)>> {
    let mut files = Vec::new();
    collect_files(root, &mut files)?;
    files.sort();
    Ok(files
        .into_iter()
        .map(|path| {
            let key = object_key(prefix, &relative_key(root, &path));
            (path, key)
        })
        .collect())
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            collect_files(&entry.path(), files)?;
        } else if file_type.is_file() {
            files.push(entry.path());
        }
    }
    Ok(())
}

/// Uploads to S3 through the AWS command line, one `aws s3 cp` per file.
///
/// Credentials and region come from the usual AWS environment and profile
/// configuration of the invoking user.
#[derive(Debug, Clone)]
pub struct S3CliStore {
    bucket: String,
    program: PathBuf,
}

impl S3CliStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            program: PathBuf::from("aws"),
        }
    }

    /// Overrides the executable used instead of `aws` on the `PATH`.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    fn put(&self, source: &Path, key: &str) -> Result<()> {
        let destination = format!("s3://{}/{key}", self.bucket);
        let output = Command::new(&self.program)
            .args(["s3", "cp", "--only-show-errors"])
            .arg(source)
            .arg(&destination)
            .output()
            .map_err(|error| ExportError::Upload {
                key: key.to_string(),
                message: format!("could not run {}: {error}", self.program.display()),
            })?;
        if !output.status.success() {
            return Err(ExportError::Upload {
                key: key.to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        debug!(%destination, "uploaded object");
        Ok(())
    }
}

impl RemoteStore for S3CliStore {
    #[instrument(level = "info", skip_all, fields(bucket = %self.bucket, root = %root.display()))]
    fn copy_tree(&self, root: &Path, prefix: Option<&str>) -> Result<Vec<String>> {
        let objects = local_objects(root, prefix)?;
        let mut keys = Vec::with_capacity(objects.len());
        for (path, key) in objects {
            self.put(&path, &key)?;
            keys.push(key);
        }
        info!(object_count = keys.len(), "copied output tree to S3");
        Ok(keys)
    }
}

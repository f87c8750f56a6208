use std::path::Path;
use std::path::PathBuf;

use poem::error::ResponseError;
use poem::http::header;
use poem::http::StatusCode;
use poem::Response;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Directory under the Server Root holding one subfolder per dataset version.
pub const VERSION_DIR: &str = "csv_output";

/// URL prefix clients put in front of a version name to fetch its files.
pub const BASE_PATH: &str = "/csv_output";

/// Files a subfolder must contain to count as a version.
pub const REQUIRED_FILES: [&str; 2] = ["input_orders.csv", "input_riders.csv"];

const HIDDEN_MARKER: char = '.';

#[derive(Debug, Error)]
pub enum VersionScanError {
    #[error("Failed to list version directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to inspect entry in {path}: {source}")]
    Entry {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Version scan did not complete: {0}")]
    Interrupted(#[from] tokio::task::JoinError),
}

impl ResponseError for VersionScanError {
    fn status(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn as_response(&self) -> Response {
        Response::builder()
            .status(self.status())
            .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(format!("Error listing versions: {self}"))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct VersionList {
    pub versions: Vec<String>,
    pub count: usize,
    pub base_path: String,
}

impl VersionList {
    pub fn new(versions: Vec<String>) -> Self {
        VersionList {
            count: versions.len(),
            versions,
            base_path: BASE_PATH.to_string(),
        }
    }

    /// Recomputes the list from disk. Nothing is cached between calls.
    pub fn scan(version_dir: &Path) -> Result<Self, VersionScanError> {
        scan_versions(version_dir).map(VersionList::new)
    }
}

/// Returns the sorted names of the qualifying subfolders of `version_dir`.
///
/// A missing (or non-directory) `version_dir` yields an empty list. Hidden
/// entries, plain files and symbolic links are skipped; a subfolder qualifies
/// only when every name in [`REQUIRED_FILES`] is a file directly inside it.
pub fn scan_versions(version_dir: &Path) -> Result<Vec<String>, VersionScanError> {
    if !version_dir.is_dir() {
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(version_dir).map_err(|source| VersionScanError::ReadDir {
        path: version_dir.to_path_buf(),
        source,
    })?;

    let mut versions = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| VersionScanError::Entry {
            path: version_dir.to_path_buf(),
            source,
        })?;

        // file_type() does not follow symlinks
        let file_type = entry.file_type().map_err(|source| VersionScanError::Entry {
            path: entry.path(),
            source,
        })?;
        if !file_type.is_dir() {
            continue;
        }

        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            tracing::debug!("Skipping non UTF-8 entry: {}", entry.path().display());
            continue;
        };
        if name.starts_with(HIDDEN_MARKER) {
            continue;
        }

        let path = entry.path();
        if REQUIRED_FILES.iter().all(|file| path.join(file).is_file()) {
            versions.push(name);
        }
    }

    versions.sort();
    Ok(versions)
}

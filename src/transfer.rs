//! Upload and download of file trees.
//!
//! A transfer is planned first (which local file goes to which repository
//! path, or the reverse) and then executed one file at a time. A failure on
//! one file is recorded in the [`TransferReport`] and the walk continues.
//!
//! Path rules:
//! - a destination ending in `/` names a directory;
//! - a single file copied into a directory keeps its base name;
//! - files of a directory source keep their walked path unless flattened.
//!   A relative source keeps it as given (`a/` yields `a/b/file1`), an
//!   absolute one is made relative to the source's parent directory.

use crate::{
    client::{error_for_response, ApiError, NexusClient},
    error_utils,
    model::Asset,
};
use indicatif::{ProgressBar, ProgressStyle};
use sha1::{Digest, Sha1};
use std::{
    fmt,
    fs::{self, File},
    io,
    path::{Component, Path, PathBuf},
};
use tracing::{debug, trace};
use walkdir::WalkDir;

#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("invalid repository path {0:?}; expected <repository>/<path>")]
    InvalidRepositoryPath(String),
    #[error("{0} does not exist")]
    SourceNotFound(String),
    #[error("no files match {0}")]
    NothingToTransfer(String),
    #[error("{path}: {cause}")]
    Io { path: String, cause: io::Error },
    #[error("{path}: {cause}")]
    Api { path: String, cause: ApiError },
}

#[derive(Debug, Clone)]
pub struct TransferOptions {
    pub flatten: bool,
    pub recurse: bool,
    /// Skip downloads whose local copy already has the server's checksum
    pub cache: bool,
    pub progress: bool,
}

impl Default for TransferOptions {
    fn default() -> Self {
        TransferOptions {
            flatten: false,
            recurse: true,
            cache: true,
            progress: false,
        }
    }
}

/// `repository/path/inside/repository`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryPath {
    pub repository: String,
    pub path: String,
}

impl RepositoryPath {
    pub fn parse(value: &str) -> Result<RepositoryPath, TransferError> {
        let trimmed = value.trim_start_matches('/');
        let (repository, path) = match trimmed.split_once('/') {
            Some((repository, path)) => (repository, path),
            None => (trimmed, ""),
        };

        if repository.is_empty() {
            return Err(TransferError::InvalidRepositoryPath(value.to_string()));
        }

        Ok(RepositoryPath {
            repository: repository.to_string(),
            path: path.trim_start_matches('/').to_string(),
        })
    }

    /// The repository root or a path ending in `/`.
    pub fn is_directory(&self) -> bool {
        self.path.is_empty() || self.path.ends_with('/')
    }

    /// Append `relative` below this path, treated as a directory.
    pub fn join(&self, relative: &str) -> RepositoryPath {
        let base = self.path.trim_end_matches('/');
        let relative = relative.trim_start_matches('/');
        let path = if base.is_empty() {
            relative.to_string()
        } else {
            format!("{}/{}", base, relative)
        };
        RepositoryPath {
            repository: self.repository.clone(),
            path,
        }
    }
}

impl fmt::Display for RepositoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.repository)
        } else {
            write!(f, "{}/{}", self.repository, self.path)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedUpload {
    pub source: PathBuf,
    pub destination: RepositoryPath,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedDownload {
    pub asset: Asset,
    pub destination: PathBuf,
}

/// Files found below an upload source, and the entries that could not be read
#[derive(Debug, Default)]
pub struct UploadPlan {
    pub items: Vec<PlannedUpload>,
    pub failures: Vec<TransferFailure>,
}

#[derive(Debug)]
pub struct TransferFailure {
    pub item: String,
    pub error: TransferError,
}

/// Outcome of a transfer
#[derive(Debug, Default)]
pub struct TransferReport {
    pub transferred: Vec<String>,
    pub skipped: Vec<String>,
    pub failures: Vec<TransferFailure>,
}

impl TransferReport {
    pub fn total(&self) -> usize {
        self.transferred.len() + self.skipped.len() + self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    fn record_failure(&mut self, item: String, error: TransferError) {
        error_utils::report_warning(&error);
        self.failures.push(TransferFailure { item, error });
    }
}

/// Base name of a slash-separated path.
fn base_name(path: &str) -> &str {
    path.trim_end_matches('/').rsplit('/').next().unwrap_or(path)
}

/// `Normal` components of `path` joined with `/`.
fn to_slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Path kept for `file`, found while walking the directory `source`.
pub fn upload_relative_path(source: &Path, file: &Path) -> String {
    if source.is_absolute() {
        let base = source.parent().unwrap_or(source);
        match file.strip_prefix(base) {
            Ok(relative) => to_slash_path(relative),
            Err(_) => to_slash_path(file),
        }
    } else {
        to_slash_path(file)
    }
}

/// Decide the repository path of every file below `source`.
///
/// Entries the walk cannot read are returned as failures; the rest of the
/// tree is still planned.
pub fn plan_upload(
    source: &Path,
    destination: &RepositoryPath,
    options: &TransferOptions,
) -> Result<UploadPlan, TransferError> {
    if source.is_file() {
        let destination = if destination.is_directory() {
            let name = source
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            destination.join(&name)
        } else {
            destination.clone()
        };
        return Ok(UploadPlan {
            items: vec![PlannedUpload {
                source: source.to_path_buf(),
                destination,
            }],
            failures: Vec::new(),
        });
    }

    if !source.is_dir() {
        return Err(TransferError::SourceNotFound(source.display().to_string()));
    }

    let mut walker = WalkDir::new(source).min_depth(1).sort_by_file_name();
    if !options.recurse {
        walker = walker.max_depth(1);
    }

    let mut plan = UploadPlan::default();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e
                    .path()
                    .unwrap_or(source)
                    .display()
                    .to_string();
                debug!("Cannot read {}: {}", path, e);
                plan.failures.push(TransferFailure {
                    item: path.clone(),
                    error: TransferError::Io {
                        path,
                        cause: io::Error::other(e),
                    },
                });
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = if options.flatten {
            entry.file_name().to_string_lossy().into_owned()
        } else {
            upload_relative_path(source, entry.path())
        };
        trace!("Planned upload {} -> {}", entry.path().display(), relative);

        plan.items.push(PlannedUpload {
            source: entry.path().to_path_buf(),
            destination: destination.join(&relative),
        });
    }

    Ok(plan)
}

/// Decide the local path of every asset selected by `source`.
///
/// `assets` is the listing of the source repository. When `source` names an
/// asset exactly it is a single-file download; otherwise it is a directory
/// prefix.
pub fn plan_download(
    assets: Vec<Asset>,
    source: &RepositoryPath,
    destination: &Path,
    destination_is_directory: bool,
    options: &TransferOptions,
) -> Vec<PlannedDownload> {
    if !source.is_directory() {
        if let Some(asset) = assets
            .iter()
            .find(|asset| asset.path.trim_start_matches('/') == source.path)
        {
            let destination = if destination_is_directory {
                destination.join(base_name(&source.path))
            } else {
                destination.to_path_buf()
            };
            return vec![PlannedDownload {
                asset: asset.clone(),
                destination,
            }];
        }
    }

    let prefix = match source.path.trim_end_matches('/') {
        "" => String::new(),
        path => format!("{}/", path),
    };

    assets
        .into_iter()
        .filter_map(|asset| {
            let path = asset.path.trim_start_matches('/').to_string();
            let remainder = path.strip_prefix(&prefix)?;
            if remainder.is_empty() || (!options.recurse && remainder.contains('/')) {
                return None;
            }

            let relative = if options.flatten {
                base_name(&path).to_string()
            } else {
                path.clone()
            };
            let destination = relative
                .split('/')
                .fold(destination.to_path_buf(), |local, part| local.join(part));
            Some(PlannedDownload { asset, destination })
        })
        .collect()
}

/// Hex SHA-1 of a local file.
pub fn sha1_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha1::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

fn progress_bar(length: usize, enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(length as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}

fn upload_file(client: &NexusClient, item: &PlannedUpload) -> Result<(), TransferError> {
    let target = item.destination.to_string();
    let file = File::open(&item.source).map_err(|cause| TransferError::Io {
        path: item.source.display().to_string(),
        cause,
    })?;

    let response = client
        .put_content(&target, file)
        .map_err(|cause| TransferError::Api {
            path: target.clone(),
            cause,
        })?;

    if !response.status().is_success() {
        return Err(TransferError::Api {
            path: target.clone(),
            cause: error_for_response(response, "upload", &target),
        });
    }
    Ok(())
}

/// Upload `source` (a file or a directory) to the repository path `destination`.
pub fn upload(
    client: &NexusClient,
    source: &Path,
    destination: &str,
    options: &TransferOptions,
) -> Result<TransferReport, TransferError> {
    let destination = RepositoryPath::parse(destination)?;
    let plan = plan_upload(source, &destination, options)?;
    debug!(
        "Uploading {} file(s) from {} to {}",
        plan.items.len(),
        source.display(),
        destination
    );

    let mut report = TransferReport::default();
    for failure in plan.failures {
        report.record_failure(failure.item, failure.error);
    }
    let bar = progress_bar(plan.items.len(), options.progress);

    for item in plan.items {
        bar.set_message(item.destination.to_string());
        match upload_file(client, &item) {
            Ok(()) => report.transferred.push(item.destination.to_string()),
            Err(error) => report.record_failure(item.source.display().to_string(), error),
        }
        bar.inc(1);
    }

    bar.finish_and_clear();
    Ok(report)
}

fn download_file(client: &NexusClient, item: &PlannedDownload) -> Result<(), TransferError> {
    let source = item.asset.repository_path();
    let local = item.destination.display().to_string();

    let mut response = client
        .get_content(&source)
        .map_err(|cause| TransferError::Api {
            path: source.clone(),
            cause,
        })?;
    if !response.status().is_success() {
        return Err(TransferError::Api {
            path: source.clone(),
            cause: error_for_response(response, "download", &source),
        });
    }

    let io_error = |cause: io::Error| TransferError::Io {
        path: local.clone(),
        cause,
    };
    if let Some(parent) = item.destination.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
    }
    let mut file = File::create(&item.destination).map_err(io_error)?;
    io::copy(&mut response, &mut file).map_err(io_error)?;
    Ok(())
}

fn is_cached(item: &PlannedDownload) -> bool {
    let Some(expected) = item.asset.checksum.sha1.as_deref() else {
        return false;
    };
    if !item.destination.is_file() {
        return false;
    }
    match sha1_file(&item.destination) {
        Ok(actual) => actual.eq_ignore_ascii_case(expected),
        Err(_) => false,
    }
}

/// Download the repository path `source` to the local `destination`.
pub fn download(
    client: &NexusClient,
    source: &str,
    destination: &str,
    options: &TransferOptions,
) -> Result<TransferReport, TransferError> {
    let source_path = RepositoryPath::parse(source)?;
    let assets = client
        .assets()
        .list(&source_path.repository)
        .map_err(|cause| TransferError::Api {
            path: source.to_string(),
            cause,
        })?;

    let destination_is_directory = destination.ends_with('/')
        || destination.ends_with(std::path::MAIN_SEPARATOR)
        || Path::new(destination).is_dir();
    let plan = plan_download(
        assets,
        &source_path,
        Path::new(destination),
        destination_is_directory,
        options,
    );
    if plan.is_empty() {
        return Err(TransferError::NothingToTransfer(source.to_string()));
    }
    debug!("Downloading {} file(s) from {} to {}", plan.len(), source, destination);

    let mut report = TransferReport::default();
    let bar = progress_bar(plan.len(), options.progress);

    for item in plan {
        let local = item.destination.display().to_string();
        bar.set_message(local.clone());

        if options.cache && is_cached(&item) {
            trace!("{} is up to date", local);
            report.skipped.push(local);
        } else {
            match download_file(client, &item) {
                Ok(()) => report.transferred.push(local),
                Err(error) => report.record_failure(item.asset.repository_path(), error),
            }
        }
        bar.inc(1);
    }

    bar.finish_and_clear();
    Ok(report)
}

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use gallery_core::{directory_name, disambiguate, ImageLink};
use gallery_logging::{gallery_debug, gallery_warn};
use serde_json::json;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::types::FetchResult;

/// Stem of the canonical source file inside each artifact directory.
pub const CANONICAL_STEM: &str = "default";

/// Name of the per-run manifest written at the output root.
pub const MANIFEST_FILENAME: &str = "manifest.json";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("cannot prepare output root {root}: {source}")]
    Root {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One surviving artifact directory and the URL it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedArtifact {
    pub directory: PathBuf,
    pub source_url: String,
}

/// Survivors and per-image diagnostics from one persistence pass.
#[derive(Debug, Default)]
pub struct PersistReport {
    pub artifacts: Vec<PersistedArtifact>,
    pub errors: Vec<String>,
}

impl PersistReport {
    /// Paths of the surviving artifact directories, in persistence order.
    pub fn directories(&self) -> Vec<PathBuf> {
        self.artifacts
            .iter()
            .map(|artifact| artifact.directory.clone())
            .collect()
    }
}

/// Materializes the artifact tree for one run.
///
/// The previous run's tree is removed wholesale first. The caller only
/// invokes this once every fetch has already resolved, so a reachability
/// or extraction failure never destroys prior artifacts. A pair whose
/// fetch failed gets a diagnostic line and no directory; a write failure
/// likewise removes the directory it was filling.
pub fn persist_artifacts(
    root: &Path,
    page_url: &str,
    pairs: &[(FetchResult, ImageLink)],
) -> Result<PersistReport, PersistError> {
    if root.exists() {
        fs::remove_dir_all(root).map_err(|source| PersistError::Root {
            root: root.to_path_buf(),
            source,
        })?;
    }
    fs::create_dir_all(root).map_err(|source| PersistError::Root {
        root: root.to_path_buf(),
        source,
    })?;

    let mut report = PersistReport::default();
    for (result, link) in pairs {
        let base = directory_name(&link.filename);
        let name = disambiguate(&base, |candidate| root.join(candidate).exists());
        let directory = root.join(&name);
        if let Err(err) = fs::create_dir(&directory) {
            report
                .errors
                .push(format!("Error when writing a file: {} {err}", link.url));
            continue;
        }

        match result {
            Err(failure) => {
                let _ = fs::remove_dir_all(&directory);
                report
                    .errors
                    .push(format!("Failed to download a file: {}", link.url));
                gallery_debug!("download failed for {}: {failure}", link.url);
            }
            Ok(payload) => {
                let target = directory.join(format!("{CANONICAL_STEM}.{}", link.extension));
                match write_canonical(&directory, &target, payload) {
                    Ok(()) => report.artifacts.push(PersistedArtifact {
                        directory,
                        source_url: link.url.clone(),
                    }),
                    Err(err) => {
                        let _ = fs::remove_dir_all(&directory);
                        report
                            .errors
                            .push(format!("Error when writing a file: {} {err}", link.url));
                    }
                }
            }
        }
    }

    // The manifest is informational; a failure to write it never demotes
    // the run's outcome.
    if let Err(err) = write_manifest(root, page_url, &report) {
        gallery_warn!("could not write {MANIFEST_FILENAME}: {err}");
    }

    Ok(report)
}

/// Artifact directories under the output root in name order, for the
/// front-end's selection listing.
pub fn list_artifact_dirs(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    if !root.exists() {
        return Ok(Vec::new());
    }
    let mut dirs: Vec<PathBuf> = fs::read_dir(root)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    Ok(dirs)
}

fn write_canonical(dir: &Path, target: &Path, payload: &[u8]) -> std::io::Result<()> {
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(payload)?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(target).map_err(|err| err.error)?;
    Ok(())
}

fn write_manifest(root: &Path, page_url: &str, report: &PersistReport) -> std::io::Result<()> {
    let entries: Vec<_> = report
        .artifacts
        .iter()
        .filter_map(|artifact| {
            let name = artifact.directory.file_name()?.to_str()?;
            Some(json!({ "directory": name, "url": artifact.source_url }))
        })
        .collect();
    let manifest = json!({
        "page_url": page_url,
        "directories": entries,
        "errors": report.errors,
    });
    fs::write(
        root.join(MANIFEST_FILENAME),
        serde_json::to_vec_pretty(&manifest)?,
    )
}

use std::path::{Path, PathBuf};

use gallery_core::{classify_outcome, AcquisitionOutcome};
use gallery_logging::{gallery_debug, gallery_info};
use url::Url;

use crate::decode::decode_page;
use crate::fetch::{build_client, fetch_images, fetch_page, FetchSettings};
use crate::links::extract_image_links;
use crate::persist::{list_artifact_dirs, persist_artifacts};

/// Fixed diagnostic when a reachable page yields zero qualifying links.
pub const NO_IMAGES_MESSAGE: &str = "No images found on the site! Suitable format png, jpeg, jpg";

/// Orchestrates one acquisition run: probe, extract, concurrent fetch,
/// persist. Owns the output root the artifact tree lands under.
///
/// Runs against the same root must be serialized by the caller (one
/// in-flight acquisition per user session); the orchestrator itself holds
/// no lock.
#[derive(Debug, Clone)]
pub struct Acquirer {
    output_root: PathBuf,
    settings: FetchSettings,
}

impl Acquirer {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self::with_settings(output_root, FetchSettings::default())
    }

    pub fn with_settings(output_root: impl Into<PathBuf>, settings: FetchSettings) -> Self {
        Self {
            output_root: output_root.into(),
            settings,
        }
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Runs the full pipeline for one page URL.
    ///
    /// The output tree is only cleared once the fetch stage has completed,
    /// so a failure in any earlier stage leaves a previous successful
    /// run's artifacts untouched.
    pub async fn acquire(&self, raw_url: &str) -> AcquisitionOutcome {
        let Some(page_url) = normalize_url(raw_url) else {
            return AcquisitionOutcome::failed(format!(
                "Failed to access the site: invalid url {}",
                raw_url.trim()
            ));
        };

        let client = match build_client(&self.settings) {
            Ok(client) => client,
            Err(err) => return AcquisitionOutcome::failed(err.to_string()),
        };

        gallery_info!("acquiring images from {page_url}");
        let page = match fetch_page(&client, &page_url, &self.settings).await {
            Ok(page) => page,
            Err(err) => return AcquisitionOutcome::failed(err.to_string()),
        };

        let html = decode_page(&page.bytes, page.content_type.as_deref());
        let links = extract_image_links(&html, &page_url);
        if links.is_empty() {
            return AcquisitionOutcome::failed(NO_IMAGES_MESSAGE);
        }
        gallery_debug!("extracted {} image link(s)", links.len());

        let results = match fetch_images(&client, &links, &self.settings).await {
            Ok(results) => results,
            Err(err) => {
                return AcquisitionOutcome::failed(format!(
                    "Failed to retrieve the image. Try again. {err}"
                ));
            }
        };

        let pairs: Vec<_> = results.into_iter().zip(links).collect();
        let report = match persist_artifacts(&self.output_root, page_url.as_str(), &pairs) {
            Ok(report) => report,
            Err(err) => return AcquisitionOutcome::failed(err.to_string()),
        };
        classify_outcome(report.directories(), report.errors)
    }

    /// Artifact directories from the most recent run, in name order, for
    /// the front-end's selection listing.
    pub fn artifact_dirs(&self) -> std::io::Result<Vec<PathBuf>> {
        list_artifact_dirs(&self.output_root)
    }
}

/// Trims surrounding whitespace and defaults to `http://` when the URL
/// carries no scheme.
fn normalize_url(raw: &str) -> Option<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let candidate = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };
    Url::parse(&candidate).ok()
}

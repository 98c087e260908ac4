use std::time::Duration;

use bytes::Bytes;
use futures_util::StreamExt;
use gallery_core::ImageLink;
use gallery_logging::gallery_debug;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use url::Url;

use crate::types::{FetchFailure, FetchFailureKind, FetchResult};

/// Tunables for the shared HTTP client and per-request limits.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_page_bytes: u64,
    pub max_image_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_page_bytes: 5 * 1024 * 1024,
            max_image_bytes: 20 * 1024 * 1024,
        }
    }
}

/// Why the source page could not be used. When this is returned the
/// pipeline stops before any filesystem side effect.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SiteError {
    #[error("Failed to access the site: status_code {0}")]
    Status(u16),
    #[error("Failed to access the site: {0}")]
    Network(String),
}

/// Batch-level failure: the shared client could not be built or a download
/// task died outright. Per-image failures never surface here.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("failed to build http client: {0}")]
    Client(String),
    #[error("download task aborted: {0}")]
    TaskAborted(String),
}

/// One page fetch: body bytes plus the Content-Type header, if any.
#[derive(Debug, Clone)]
pub struct PageBody {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

/// Builds the connection-pooled client shared by the probe and every image
/// fetch of one acquisition run.
pub fn build_client(settings: &FetchSettings) -> Result<Client, BatchError> {
    Client::builder()
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.request_timeout)
        .build()
        .map_err(|err| BatchError::Client(err.to_string()))
}

/// Reachability probe and page download in one request: a 2xx response
/// returns the body for link extraction, anything else classifies the
/// site as unreachable.
pub async fn fetch_page(
    client: &Client,
    url: &Url,
    settings: &FetchSettings,
) -> Result<PageBody, SiteError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|err| SiteError::Network(err.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SiteError::Status(status.as_u16()));
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());

    let bytes = read_capped(response, settings.max_page_bytes)
        .await
        .map_err(|failure| SiteError::Network(failure.message))?;

    Ok(PageBody {
        bytes,
        content_type,
    })
}

/// Fan-out/fan-in image download: one task per link against the shared
/// client, all spawned before any is awaited, results collected in input
/// order regardless of completion order. A link's own failure resolves to
/// its `FetchResult`; only a panicked task aborts the batch.
pub async fn fetch_images(
    client: &Client,
    links: &[ImageLink],
    settings: &FetchSettings,
) -> Result<Vec<FetchResult>, BatchError> {
    let mut tasks = Vec::with_capacity(links.len());
    for link in links {
        let client = client.clone();
        let url = link.url.clone();
        let cap = settings.max_image_bytes;
        tasks.push(tokio::spawn(
            async move { download_image(&client, &url, cap).await },
        ));
    }

    let mut results = Vec::with_capacity(tasks.len());
    for task in tasks {
        let result = task
            .await
            .map_err(|err| BatchError::TaskAborted(err.to_string()))?;
        if let Err(failure) = &result {
            gallery_debug!("image fetch failed: {failure}");
        }
        results.push(result);
    }
    Ok(results)
}

async fn download_image(client: &Client, url: &str, max_bytes: u64) -> FetchResult {
    let parsed = Url::parse(url)
        .map_err(|err| FetchFailure::new(FetchFailureKind::InvalidUrl, err.to_string()))?;

    let response = client.get(parsed).send().await.map_err(map_reqwest_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchFailure::new(
            FetchFailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ));
    }

    if let Some(content_len) = response.content_length() {
        if content_len > max_bytes {
            return Err(FetchFailure::new(
                FetchFailureKind::TooLarge {
                    max_bytes,
                    actual: Some(content_len),
                },
                "response too large",
            ));
        }
    }

    read_capped(response, max_bytes).await
}

async fn read_capped(response: reqwest::Response, max_bytes: u64) -> Result<Bytes, FetchFailure> {
    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(map_reqwest_error)?;
        let next_len = bytes.len() as u64 + chunk.len() as u64;
        if next_len > max_bytes {
            return Err(FetchFailure::new(
                FetchFailureKind::TooLarge {
                    max_bytes,
                    actual: Some(next_len),
                },
                "response too large",
            ));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(Bytes::from(bytes))
}

fn map_reqwest_error(err: reqwest::Error) -> FetchFailure {
    if err.is_timeout() {
        return FetchFailure::new(FetchFailureKind::Timeout, err.to_string());
    }
    FetchFailure::new(FetchFailureKind::Network, err.to_string())
}

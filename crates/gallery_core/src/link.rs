use url::Url;

/// Raster formats the pipeline is willing to download.
pub const RASTER_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// One image reference discovered on a page, already resolved to an
/// absolute URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLink {
    /// Absolute URL of the image.
    pub url: String,
    /// Final path segment of the URL, e.g. `photo.jpg`.
    pub filename: String,
    /// Extension taken from the filename, original spelling preserved.
    pub extension: String,
}

impl ImageLink {
    /// Builds a link from a resolved URL, or `None` when the URL's final
    /// path segment does not name a known raster format.
    pub fn from_url(url: &Url) -> Option<Self> {
        let filename = final_path_segment(url)?;
        let extension = raster_extension(&filename)?.to_string();
        Some(Self {
            url: url.to_string(),
            filename,
            extension,
        })
    }
}

/// Returns the filename's extension when it names a supported raster format.
///
/// The match is case-insensitive for robustness against hosts that serve
/// `IMG_0042.JPG` style names; the original spelling is returned so the
/// persisted `default.<ext>` file keeps the source's extension.
pub fn raster_extension(filename: &str) -> Option<&str> {
    let (stem, extension) = filename.rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }
    let lower = extension.to_ascii_lowercase();
    RASTER_EXTENSIONS
        .contains(&lower.as_str())
        .then_some(extension)
}

fn final_path_segment(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.next_back()?;
    if segment.is_empty() {
        return None;
    }
    Some(segment.to_string())
}

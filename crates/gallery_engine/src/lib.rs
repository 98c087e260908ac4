//! Gallery engine: the page-image acquisition pipeline and the transform
//! engine that derives new artifacts from each downloaded image.
mod acquire;
mod decode;
mod fetch;
mod filters;
mod links;
mod persist;
mod transform;
mod types;

pub use acquire::{Acquirer, NO_IMAGES_MESSAGE};
pub use decode::decode_page;
pub use fetch::{
    build_client, fetch_images, fetch_page, BatchError, FetchSettings, PageBody, SiteError,
};
pub use links::extract_image_links;
pub use persist::{
    list_artifact_dirs, persist_artifacts, PersistError, PersistReport, PersistedArtifact,
    CANONICAL_STEM, MANIFEST_FILENAME,
};
pub use transform::{
    BlurKind, Channel, FlipAxis, TransformEngine, TransformError, TransformSettings,
};
pub use types::{FetchFailure, FetchFailureKind, FetchResult};

// Core types that appear in this crate's public signatures.
pub use gallery_core::{AcquisitionOutcome, ImageLink};

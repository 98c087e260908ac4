//! Gallery core: pure decision logic for the acquisition pipeline and the
//! transform engine. No network or filesystem access lives here.
mod dirname;
mod geometry;
mod link;
mod outcome;

pub use dirname::{directory_name, disambiguate};
pub use geometry::{crop_box, overlay_anchor, scaled_dimensions, CropBox};
pub use link::{raster_extension, ImageLink, RASTER_EXTENSIONS};
pub use outcome::{classify_outcome, AcquisitionOutcome};

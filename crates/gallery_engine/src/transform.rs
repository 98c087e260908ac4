use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ab_glyph::{FontVec, PxScale};
use gallery_core::{crop_box, overlay_anchor, scaled_dimensions};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, Rgba};
use imageproc::drawing::draw_text_mut;
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};
use thiserror::Error;

use crate::filters;

#[derive(Debug, Error)]
pub enum TransformError {
    /// A transform was invoked before `select`, or `select` found no
    /// canonical `default.*` file in the target directory.
    #[error("no image directory selected")]
    DirectoryNotSelected,
    #[error("unknown mode: {0}")]
    UnknownMode(String),
    #[error("crop bounds produce an empty image")]
    InvalidCropBounds,
    #[error("cannot open watermark overlay {path}: {message}")]
    OverlayUnreadable { path: PathBuf, message: String },
    #[error("no usable font found; configure TransformSettings::font_paths")]
    FontUnavailable,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Mirror axis for `flip`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipAxis {
    Horizontal,
    Vertical,
}

impl FlipAxis {
    fn artifact_stem(self) -> &'static str {
        match self {
            Self::Horizontal => "flipped_horizontal",
            Self::Vertical => "flipped_vertical",
        }
    }
}

impl FromStr for FlipAxis {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "horizontal" => Ok(Self::Horizontal),
            "vertical" => Ok(Self::Vertical),
            other => Err(TransformError::UnknownMode(other.to_string())),
        }
    }
}

/// Color channel kept by `isolate_channel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Blue => 2,
        }
    }

    fn letter(self) -> char {
        match self {
            Self::Red => 'r',
            Self::Green => 'g',
            Self::Blue => 'b',
        }
    }
}

impl FromStr for Channel {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "r" => Ok(Self::Red),
            "g" => Ok(Self::Green),
            "b" => Ok(Self::Blue),
            other => Err(TransformError::UnknownMode(other.to_string())),
        }
    }
}

/// Blur kernel selected for `blur`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlurKind {
    Box,
    Gaussian,
}

impl FromStr for BlurKind {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "box" => Ok(Self::Box),
            "gaussian" => Ok(Self::Gaussian),
            other => Err(TransformError::UnknownMode(other.to_string())),
        }
    }
}

/// Tunables for the transform engine.
#[derive(Debug, Clone)]
pub struct TransformSettings {
    /// Candidate font files probed in order by `add_text`. Defaults cover
    /// the common Linux, macOS and Windows locations.
    pub font_paths: Vec<PathBuf>,
}

impl Default for TransformSettings {
    fn default() -> Self {
        Self {
            font_paths: [
                "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
                "/usr/share/fonts/TTF/DejaVuSans.ttf",
                "/usr/share/fonts/dejavu/DejaVuSans.ttf",
                "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
                "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
                "/System/Library/Fonts/Supplemental/Arial.ttf",
                "C:\\Windows\\Fonts\\arial.ttf",
            ]
            .iter()
            .map(PathBuf::from)
            .collect(),
        }
    }
}

#[derive(Debug, Clone)]
struct Binding {
    directory: PathBuf,
    extension: String,
}

/// Transform engine bound to at most one artifact directory.
///
/// Every operation re-reads the canonical `default.<ext>` file and writes
/// one new artifact named after the operation; the canonical source is
/// never overwritten or deleted. A failed operation leaves the binding
/// intact. One engine instance serves one caller session; a front-end that
/// serves several conversations holds one engine per conversation.
#[derive(Debug)]
pub struct TransformEngine {
    settings: TransformSettings,
    binding: Option<Binding>,
}

impl Default for TransformEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformEngine {
    pub fn new() -> Self {
        Self::with_settings(TransformSettings::default())
    }

    pub fn with_settings(settings: TransformSettings) -> Self {
        Self {
            settings,
            binding: None,
        }
    }

    /// Binds the engine to an artifact directory holding a `default.<ext>`
    /// canonical source. Re-selecting replaces the binding; a failed
    /// selection leaves the previous binding untouched.
    pub fn select(&mut self, directory: impl AsRef<Path>) -> Result<(), TransformError> {
        let directory = directory.as_ref();
        let extension = find_canonical_extension(directory)?;
        self.binding = Some(Binding {
            directory: directory.to_path_buf(),
            extension,
        });
        Ok(())
    }

    /// Directory the engine is currently bound to, if any.
    pub fn selected_directory(&self) -> Option<&Path> {
        self.binding.as_ref().map(|b| b.directory.as_path())
    }

    /// Rotates about the image center, keeping the canvas size; uncovered
    /// corners fill with transparent black. Positive angles rotate
    /// counterclockwise.
    pub fn rotate(&self, angle_degrees: f32) -> Result<PathBuf, TransformError> {
        let binding = self.binding()?;
        let source = Self::open_source(binding)?.to_rgba8();
        let theta = -angle_degrees.to_radians();
        let rotated = rotate_about_center(&source, theta, Interpolation::Bilinear, Rgba([0; 4]));
        self.write(binding, "rotated", DynamicImage::ImageRgba8(rotated))
    }

    /// Mirrors the image along the named axis.
    pub fn flip(&self, axis: FlipAxis) -> Result<PathBuf, TransformError> {
        let binding = self.binding()?;
        let source = Self::open_source(binding)?;
        let flipped = match axis {
            FlipAxis::Horizontal => source.fliph(),
            FlipAxis::Vertical => source.flipv(),
        };
        self.write(binding, axis.artifact_stem(), flipped)
    }

    /// Crops to a pixel box computed from percentages of the source
    /// dimensions, clamped to the image bounds.
    pub fn crop(
        &self,
        x_pct: f32,
        y_pct: f32,
        width_pct: f32,
        height_pct: f32,
    ) -> Result<PathBuf, TransformError> {
        let binding = self.binding()?;
        let source = Self::open_source(binding)?;
        let (width, height) = source.dimensions();
        let pixel_box = crop_box(width, height, x_pct, y_pct, width_pct, height_pct)
            .ok_or(TransformError::InvalidCropBounds)?;
        let cropped = source.crop_imm(
            pixel_box.x,
            pixel_box.y,
            pixel_box.width,
            pixel_box.height,
        );
        self.write(binding, "cropped", cropped)
    }

    /// Scales each axis independently by the given percentage.
    pub fn resize(&self, width_pct: f32, height_pct: f32) -> Result<PathBuf, TransformError> {
        let binding = self.binding()?;
        let source = Self::open_source(binding)?;
        let (width, height) = source.dimensions();
        let (new_width, new_height) = scaled_dimensions(width, height, width_pct, height_pct);
        let resized = source.resize_exact(new_width, new_height, FilterType::Lanczos3);
        self.write(binding, "resized", resized)
    }

    /// Converts to single-channel luminance in the original container
    /// format.
    pub fn grayscale(&self) -> Result<PathBuf, TransformError> {
        let binding = self.binding()?;
        let grayscaled = Self::open_source(binding)?.grayscale();
        self.write(binding, "grayscaled", grayscaled)
    }

    /// Keeps the selected channel and zeroes the other two.
    pub fn isolate_channel(&self, channel: Channel) -> Result<PathBuf, TransformError> {
        let binding = self.binding()?;
        let rgb = Self::open_source(binding)?.to_rgb8();
        let isolated = filters::isolate_channel(&rgb, channel.index());
        self.write(
            binding,
            &format!("chanel_converted_{}", channel.letter()),
            DynamicImage::ImageRgb8(isolated),
        )
    }

    /// Applies the named blur kernel at the given radius.
    pub fn blur(&self, kind: BlurKind, radius: u32) -> Result<PathBuf, TransformError> {
        let binding = self.binding()?;
        let rgb = Self::open_source(binding)?.to_rgb8();
        let blurred = match kind {
            BlurKind::Box => filters::box_blur(&rgb, radius),
            BlurKind::Gaussian => filters::gaussian_blur(&rgb, radius),
        };
        self.write(binding, "blurred", DynamicImage::ImageRgb8(blurred))
    }

    pub fn sharpen(&self) -> Result<PathBuf, TransformError> {
        let binding = self.binding()?;
        let rgb = Self::open_source(binding)?.to_rgb8();
        self.write(
            binding,
            "sharpened",
            DynamicImage::ImageRgb8(filters::sharpen(&rgb)),
        )
    }

    pub fn smooth(&self) -> Result<PathBuf, TransformError> {
        let binding = self.binding()?;
        let rgb = Self::open_source(binding)?.to_rgb8();
        self.write(
            binding,
            "smoothed",
            DynamicImage::ImageRgb8(filters::smooth(&rgb)),
        )
    }

    pub fn find_edges(&self) -> Result<PathBuf, TransformError> {
        let binding = self.binding()?;
        let rgb = Self::open_source(binding)?.to_rgb8();
        self.write(
            binding,
            "edges",
            DynamicImage::ImageRgb8(filters::find_edges(&rgb)),
        )
    }

    /// Multiplies luminance by `scale`; values below 1.0 darken, above 1.0
    /// brighten.
    pub fn adjust_brightness(&self, scale: f32) -> Result<PathBuf, TransformError> {
        let binding = self.binding()?;
        let rgb = Self::open_source(binding)?.to_rgb8();
        let adjusted = filters::scale_brightness(&rgb, scale);
        self.write(
            binding,
            "brightness_changed",
            DynamicImage::ImageRgb8(adjusted),
        )
    }

    /// Alpha-composites an overlay image so that its bottom-right corner
    /// lands at the given percentage point of the base image.
    pub fn add_watermark(
        &self,
        overlay_path: impl AsRef<Path>,
        x_pct: f32,
        y_pct: f32,
    ) -> Result<PathBuf, TransformError> {
        let binding = self.binding()?;
        let overlay_path = overlay_path.as_ref();
        let mut base = Self::open_source(binding)?.to_rgba8();
        let overlay = image::open(overlay_path)
            .map_err(|err| TransformError::OverlayUnreadable {
                path: overlay_path.to_path_buf(),
                message: err.to_string(),
            })?
            .to_rgba8();
        let (x, y) = overlay_anchor(
            base.width(),
            base.height(),
            overlay.width(),
            overlay.height(),
            x_pct,
            y_pct,
        );
        imageops::overlay(&mut base, &overlay, x, y);
        self.write(binding, "watermarked", DynamicImage::ImageRgba8(base))
    }

    /// Draws text at absolute pixel coordinates using the first usable
    /// font from the configured candidates, scaled to `font_size`.
    pub fn add_text(
        &self,
        text: &str,
        x: i32,
        y: i32,
        font_size: f32,
        color: (u8, u8, u8),
    ) -> Result<PathBuf, TransformError> {
        let binding = self.binding()?;
        let mut canvas = Self::open_source(binding)?.to_rgba8();
        let font = self.load_font()?;
        let fill = Rgba([color.0, color.1, color.2, 255]);
        draw_text_mut(&mut canvas, fill, x, y, PxScale::from(font_size), &font, text);
        self.write(binding, "text_added", DynamicImage::ImageRgba8(canvas))
    }

    /// (width, height) of the canonical source, read from the image header
    /// without a full decode.
    pub fn size(&self) -> Result<(u32, u32), TransformError> {
        let binding = self.binding()?;
        Ok(image::image_dimensions(Self::source_path(binding))?)
    }

    fn binding(&self) -> Result<&Binding, TransformError> {
        self.binding
            .as_ref()
            .ok_or(TransformError::DirectoryNotSelected)
    }

    fn source_path(binding: &Binding) -> PathBuf {
        binding
            .directory
            .join(format!("default.{}", binding.extension))
    }

    fn open_source(binding: &Binding) -> Result<DynamicImage, TransformError> {
        Ok(image::open(Self::source_path(binding))?)
    }

    fn write(
        &self,
        binding: &Binding,
        stem: &str,
        image: DynamicImage,
    ) -> Result<PathBuf, TransformError> {
        let target = binding
            .directory
            .join(format!("{stem}.{}", binding.extension));
        filters::save_artifact(image, &target)?;
        Ok(target)
    }

    fn load_font(&self) -> Result<FontVec, TransformError> {
        for path in &self.settings.font_paths {
            if let Ok(bytes) = fs::read(path) {
                if let Ok(font) = FontVec::try_from_vec(bytes) {
                    return Ok(font);
                }
            }
        }
        Err(TransformError::FontUnavailable)
    }
}

fn find_canonical_extension(directory: &Path) -> Result<String, TransformError> {
    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let stem = path.file_stem().and_then(|s| s.to_str());
        let extension = path.extension().and_then(|e| e.to_str());
        if let (Some("default"), Some(extension)) = (stem, extension) {
            return Ok(extension.to_string());
        }
    }
    Err(TransformError::DirectoryNotSelected)
}

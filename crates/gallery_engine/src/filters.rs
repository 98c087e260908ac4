use std::path::Path;

use image::{DynamicImage, GrayImage, ImageResult, Luma, Rgb, RgbImage};

// 3x3 kernels ported from the classic convolution filter set; each tap is
// divided by the scale before convolution.
const SHARPEN: ([f32; 9], f32) = (
    [-2.0, -2.0, -2.0, -2.0, 32.0, -2.0, -2.0, -2.0, -2.0],
    16.0,
);
const SMOOTH: ([f32; 9], f32) = ([1.0, 1.0, 1.0, 1.0, 5.0, 1.0, 1.0, 1.0, 1.0], 13.0);
const FIND_EDGES: ([f32; 9], f32) = ([-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0], 1.0);

pub(crate) fn sharpen(image: &RgbImage) -> RgbImage {
    convolve3x3(image, SHARPEN)
}

pub(crate) fn smooth(image: &RgbImage) -> RgbImage {
    convolve3x3(image, SMOOTH)
}

pub(crate) fn find_edges(image: &RgbImage) -> RgbImage {
    convolve3x3(image, FIND_EDGES)
}

fn convolve3x3(image: &RgbImage, (kernel, scale): ([f32; 9], f32)) -> RgbImage {
    let normalized: Vec<f32> = kernel.iter().map(|tap| tap / scale).collect();
    imageproc::filter::filter3x3(image, &normalized)
}

/// Mean blur over a `(2 * radius + 1)` square window, channel by channel.
pub(crate) fn box_blur(image: &RgbImage, radius: u32) -> RgbImage {
    if radius == 0 {
        return image.clone();
    }
    let (width, height) = image.dimensions();
    let blurred: Vec<GrayImage> = (0..3)
        .map(|channel| {
            let plane = GrayImage::from_fn(width, height, |x, y| {
                Luma([image.get_pixel(x, y).0[channel]])
            });
            imageproc::filter::box_filter(&plane, radius, radius)
        })
        .collect();
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            blurred[0].get_pixel(x, y).0[0],
            blurred[1].get_pixel(x, y).0[0],
            blurred[2].get_pixel(x, y).0[0],
        ])
    })
}

pub(crate) fn gaussian_blur(image: &RgbImage, radius: u32) -> RgbImage {
    if radius == 0 {
        return image.clone();
    }
    imageproc::filter::gaussian_blur_f32(image, radius as f32)
}

/// Keeps one channel and zeroes the other two.
pub(crate) fn isolate_channel(image: &RgbImage, keep: usize) -> RgbImage {
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        for (index, value) in pixel.0.iter_mut().enumerate() {
            if index != keep {
                *value = 0;
            }
        }
    }
    out
}

/// Multiplies every channel by `scale`, saturating at the channel bounds.
pub(crate) fn scale_brightness(image: &RgbImage, scale: f32) -> RgbImage {
    let scale = scale.max(0.0);
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        pixel.0 = pixel
            .0
            .map(|value| (value as f32 * scale).round().clamp(0.0, 255.0) as u8);
    }
    out
}

/// Writes a derived artifact next to the canonical source. JPEG containers
/// cannot carry alpha, so alpha-bearing buffers are flattened first.
pub(crate) fn save_artifact(image: DynamicImage, path: &Path) -> ImageResult<()> {
    if is_jpeg_path(path) && image.color().has_alpha() {
        let flattened = match image {
            DynamicImage::ImageLumaA8(_) | DynamicImage::ImageLumaA16(_) => {
                DynamicImage::ImageLuma8(image.to_luma8())
            }
            _ => DynamicImage::ImageRgb8(image.to_rgb8()),
        };
        return flattened.save(path);
    }
    image.save(path)
}

fn is_jpeg_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"))
}

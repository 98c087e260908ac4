/// Pixel box computed from a percentage crop request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Computes the pixel box for a percentage crop, clamped to the image
/// bounds. Returns `None` when the clamped box has zero area, so callers
/// can reject degenerate crops instead of producing an empty image.
pub fn crop_box(
    width: u32,
    height: u32,
    x_pct: f32,
    y_pct: f32,
    width_pct: f32,
    height_pct: f32,
) -> Option<CropBox> {
    if width == 0 || height == 0 {
        return None;
    }
    let x = percent_of(width, x_pct).min(width);
    let y = percent_of(height, y_pct).min(height);
    let box_width = percent_of(width, width_pct).min(width - x);
    let box_height = percent_of(height, height_pct).min(height - y);
    if box_width == 0 || box_height == 0 {
        return None;
    }
    Some(CropBox {
        x,
        y,
        width: box_width,
        height: box_height,
    })
}

/// New dimensions for a percentage resize, independent per axis.
/// Each axis is kept at least one pixel wide.
pub fn scaled_dimensions(width: u32, height: u32, width_pct: f32, height_pct: f32) -> (u32, u32) {
    (
        percent_of(width, width_pct).max(1),
        percent_of(height, height_pct).max(1),
    )
}

/// Top-left corner for an overlay whose bottom-right corner should land at
/// the given percentage point of the base image. May be negative, in which
/// case the compositor clips the overlay at the edge.
pub fn overlay_anchor(
    base_width: u32,
    base_height: u32,
    overlay_width: u32,
    overlay_height: u32,
    x_pct: f32,
    y_pct: f32,
) -> (i64, i64) {
    let x = (base_width as f32 * x_pct / 100.0) as i64 - overlay_width as i64;
    let y = (base_height as f32 * y_pct / 100.0) as i64 - overlay_height as i64;
    (x, y)
}

fn percent_of(dimension: u32, pct: f32) -> u32 {
    let pct = pct.max(0.0);
    (dimension as f32 * pct / 100.0) as u32
}

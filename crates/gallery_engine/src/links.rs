use gallery_core::ImageLink;
use scraper::{Html, Selector};
use url::Url;

/// Extracts raster image links from one HTML document in document order.
///
/// A lazy-load `data-src` attribute wins over `src` when both carry a
/// value; an empty lazy-load attribute falls back to `src`. References
/// that cannot be resolved against the page URL are dropped silently, and
/// links whose final path segment is not a known raster format never make
/// it into the output. Duplicate URLs are preserved: one `<img>` element
/// maps to one artifact directory downstream.
pub fn extract_image_links(html: &str, page_url: &Url) -> Vec<ImageLink> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("img") else {
        return Vec::new();
    };

    let mut links = Vec::new();
    for element in document.select(&selector) {
        let reference = element
            .value()
            .attr("data-src")
            .filter(|value| !value.trim().is_empty())
            .or_else(|| element.value().attr("src"));
        let Some(reference) = reference else { continue };
        let Some(url) = resolve_reference(reference, page_url) else {
            continue;
        };
        if let Some(link) = ImageLink::from_url(&url) {
            links.push(link);
        }
    }
    links
}

/// Standard reference resolution: absolute URLs pass through; everything
/// else (scheme-relative `//host/...`, root-relative `/path`, bare
/// relative) joins against the page URL.
fn resolve_reference(reference: &str, base: &Url) -> Option<Url> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(url) = Url::parse(trimmed) {
        return Some(url);
    }
    base.join(trimmed).ok()
}

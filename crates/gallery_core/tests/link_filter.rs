use std::sync::Once;

use gallery_core::{raster_extension, ImageLink};
use pretty_assertions::assert_eq;
use url::Url;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(gallery_logging::initialize_for_tests);
}

#[test]
fn known_raster_extensions_pass() {
    init_logging();
    assert_eq!(raster_extension("a.png"), Some("png"));
    assert_eq!(raster_extension("a.jpg"), Some("jpg"));
    assert_eq!(raster_extension("a.jpeg"), Some("jpeg"));
}

#[test]
fn extension_match_is_case_insensitive_and_preserves_spelling() {
    init_logging();
    assert_eq!(raster_extension("IMG_0042.JPG"), Some("JPG"));
    assert_eq!(raster_extension("scan.Png"), Some("Png"));
}

#[test]
fn unknown_or_missing_extensions_are_rejected() {
    init_logging();
    assert_eq!(raster_extension("vector.svg"), None);
    assert_eq!(raster_extension("archive.jpg.zip"), None);
    assert_eq!(raster_extension("noext"), None);
    assert_eq!(raster_extension(".jpg"), None);
}

#[test]
fn link_is_built_from_the_final_path_segment() {
    init_logging();
    let url = Url::parse("https://cdn.example.com/a/b/photo.jpg").unwrap();
    let link = ImageLink::from_url(&url).unwrap();
    assert_eq!(link.url, "https://cdn.example.com/a/b/photo.jpg");
    assert_eq!(link.filename, "photo.jpg");
    assert_eq!(link.extension, "jpg");
}

#[test]
fn query_strings_do_not_hide_the_extension() {
    init_logging();
    let url = Url::parse("https://cdn.example.com/photo.png?width=800").unwrap();
    let link = ImageLink::from_url(&url).unwrap();
    assert_eq!(link.filename, "photo.png");
    assert_eq!(link.extension, "png");
}

#[test]
fn directory_like_urls_are_rejected() {
    init_logging();
    let url = Url::parse("https://example.com/gallery/").unwrap();
    assert_eq!(ImageLink::from_url(&url), None);
}

use std::fs;
use std::sync::Once;

use bytes::Bytes;
use gallery_engine::{
    list_artifact_dirs, persist_artifacts, FetchFailure, FetchFailureKind, FetchResult, ImageLink,
    CANONICAL_STEM, MANIFEST_FILENAME,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(gallery_logging::initialize_for_tests);
}

fn link(url: &str, filename: &str, extension: &str) -> ImageLink {
    ImageLink {
        url: url.to_string(),
        filename: filename.to_string(),
        extension: extension.to_string(),
    }
}

fn ok(payload: &'static [u8]) -> FetchResult {
    Ok(Bytes::from_static(payload))
}

fn failed(url: &str) -> FetchResult {
    Err(FetchFailure {
        kind: FetchFailureKind::HttpStatus(404),
        message: format!("404 for {url}"),
    })
}

#[test]
fn successful_pairs_materialize_canonical_sources() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("out");

    let pairs = vec![
        (ok(b"first"), link("https://x/a.jpg", "a.jpg", "jpg")),
        (ok(b"second"), link("https://x/b.png", "b.png", "png")),
    ];
    let report = persist_artifacts(&root, "https://x", &pairs).unwrap();

    assert!(report.errors.is_empty());
    assert_eq!(report.artifacts.len(), 2);
    assert_eq!(
        fs::read(root.join("a.jpg").join("default.jpg")).unwrap(),
        b"first"
    );
    assert_eq!(
        fs::read(root.join("b.png").join("default.png")).unwrap(),
        b"second"
    );
}

#[test]
fn colliding_filenames_get_numeric_suffixes() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("out");

    let pairs = vec![
        (ok(b"one"), link("https://x/a/photo.jpg", "photo.jpg", "jpg")),
        (ok(b"two"), link("https://x/b/photo.jpg", "photo.jpg", "jpg")),
        (ok(b"three"), link("https://x/c/photo.jpg", "photo.jpg", "jpg")),
    ];
    let report = persist_artifacts(&root, "https://x", &pairs).unwrap();

    let names: Vec<String> = report
        .artifacts
        .iter()
        .map(|a| {
            a.directory
                .file_name()
                .unwrap()
                .to_str()
                .unwrap()
                .to_string()
        })
        .collect();
    assert_eq!(names, vec!["photo.jpg", "photo.jpg (2)", "photo.jpg (3)"]);
    assert_eq!(
        fs::read(root.join("photo.jpg (2)").join("default.jpg")).unwrap(),
        b"two"
    );
}

#[test]
fn failed_pairs_leave_no_directory_and_record_diagnostics() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("out");

    let pairs = vec![
        (ok(b"good"), link("https://x/good.jpg", "good.jpg", "jpg")),
        (
            failed("https://x/bad.jpg"),
            link("https://x/bad.jpg", "bad.jpg", "jpg"),
        ),
    ];
    let report = persist_artifacts(&root, "https://x", &pairs).unwrap();

    assert_eq!(report.artifacts.len(), 1);
    assert_eq!(
        report.errors,
        vec!["Failed to download a file: https://x/bad.jpg".to_string()]
    );
    assert!(!root.join("bad.jpg").exists());
}

#[test]
fn a_new_run_replaces_the_previous_tree_wholesale() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("out");
    fs::create_dir_all(root.join("stale.jpg")).unwrap();
    fs::write(root.join("stale.jpg").join("default.jpg"), b"old").unwrap();

    let pairs = vec![(ok(b"new"), link("https://x/fresh.png", "fresh.png", "png"))];
    persist_artifacts(&root, "https://x", &pairs).unwrap();

    assert!(!root.join("stale.jpg").exists());
    assert!(root.join("fresh.png").join("default.png").exists());
}

#[test]
fn manifest_lists_survivors_and_errors() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("out");

    let pairs = vec![
        (ok(b"data"), link("https://x/kept.jpg", "kept.jpg", "jpg")),
        (
            failed("https://x/lost.jpg"),
            link("https://x/lost.jpg", "lost.jpg", "jpg"),
        ),
    ];
    persist_artifacts(&root, "https://x/page", &pairs).unwrap();

    let manifest: serde_json::Value =
        serde_json::from_slice(&fs::read(root.join(MANIFEST_FILENAME)).unwrap()).unwrap();
    assert_eq!(manifest["page_url"], "https://x/page");
    assert_eq!(manifest["directories"][0]["directory"], "kept.jpg");
    assert_eq!(manifest["directories"][0]["url"], "https://x/kept.jpg");
    assert_eq!(
        manifest["errors"][0],
        "Failed to download a file: https://x/lost.jpg"
    );
}

#[test]
fn listing_returns_directories_in_name_order() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("out");

    let pairs = vec![
        (ok(b"z"), link("https://x/zebra.jpg", "zebra.jpg", "jpg")),
        (ok(b"a"), link("https://x/ant.jpg", "ant.jpg", "jpg")),
    ];
    persist_artifacts(&root, "https://x", &pairs).unwrap();

    let listed = list_artifact_dirs(&root).unwrap();
    let names: Vec<_> = listed
        .iter()
        .map(|p| p.file_name().unwrap().to_str().unwrap())
        .collect();
    // The manifest file is not a selectable artifact.
    assert_eq!(names, vec!["ant.jpg", "zebra.jpg"]);
}

#[test]
fn listing_a_missing_root_is_empty() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let listed = list_artifact_dirs(&temp.path().join("never")).unwrap();
    assert_eq!(listed, Vec::<std::path::PathBuf>::new());
}

#[test]
fn canonical_stem_is_stable() {
    // The on-disk contract other components rely on.
    assert_eq!(CANONICAL_STEM, "default");
}

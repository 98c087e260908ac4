use std::path::PathBuf;
use std::sync::Once;

use gallery_core::{classify_outcome, AcquisitionOutcome};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(gallery_logging::initialize_for_tests);
}

fn dirs(names: &[&str]) -> Vec<PathBuf> {
    names.iter().map(PathBuf::from).collect()
}

#[test]
fn no_errors_and_survivors_is_complete() {
    init_logging();
    let outcome = classify_outcome(dirs(&["a.jpg", "b.png"]), Vec::new());
    assert_eq!(
        outcome,
        AcquisitionOutcome::Complete {
            directories: dirs(&["a.jpg", "b.png"]),
        }
    );
    assert_eq!(outcome.diagnostics(), None);
}

#[test]
fn errors_with_survivors_is_partial_with_joined_diagnostics() {
    init_logging();
    let errors = vec![
        "Failed to download a file: https://x/a.jpg".to_string(),
        "Failed to download a file: https://x/b.jpg".to_string(),
    ];
    let outcome = classify_outcome(dirs(&["c.jpg"]), errors);
    match outcome {
        AcquisitionOutcome::Partial {
            directories,
            diagnostics,
        } => {
            assert_eq!(directories, dirs(&["c.jpg"]));
            assert_eq!(
                diagnostics,
                "Failed to download a file: https://x/a.jpg\nFailed to download a file: https://x/b.jpg"
            );
        }
        other => panic!("expected Partial, got {other:?}"),
    }
}

#[test]
fn errors_without_survivors_is_failed() {
    init_logging();
    let outcome = classify_outcome(
        Vec::new(),
        vec!["Failed to download a file: https://x/a.jpg".to_string()],
    );
    assert!(matches!(outcome, AcquisitionOutcome::Failed { .. }));
    assert_eq!(outcome.directories(), &[] as &[PathBuf]);
}

#[test]
fn zero_pairs_is_failed() {
    init_logging();
    let outcome = classify_outcome(Vec::new(), Vec::new());
    assert!(matches!(outcome, AcquisitionOutcome::Failed { .. }));
}

use std::path::PathBuf;

/// Tri-state result of one acquisition run. Exactly one variant is produced
/// per run; there is no silent partial state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionOutcome {
    /// Every discovered image was downloaded and persisted.
    Complete { directories: Vec<PathBuf> },
    /// At least one image survived and at least one failed; the failures
    /// are joined into one displayable diagnostic.
    Partial {
        directories: Vec<PathBuf>,
        diagnostics: String,
    },
    /// Nothing usable was produced. Prior artifacts, if any, are untouched.
    Failed { diagnostics: String },
}

impl AcquisitionOutcome {
    pub fn failed(diagnostics: impl Into<String>) -> Self {
        Self::Failed {
            diagnostics: diagnostics.into(),
        }
    }

    /// Artifact directories produced by the run, empty for `Failed`.
    pub fn directories(&self) -> &[PathBuf] {
        match self {
            Self::Complete { directories } | Self::Partial { directories, .. } => directories,
            Self::Failed { .. } => &[],
        }
    }

    /// Diagnostic text for the non-`Complete` variants.
    pub fn diagnostics(&self) -> Option<&str> {
        match self {
            Self::Complete { .. } => None,
            Self::Partial { diagnostics, .. } | Self::Failed { diagnostics } => Some(diagnostics),
        }
    }
}

/// Folds the persister's survivors and error lines into the tri-state
/// outcome: no errors and at least one survivor is `Complete`, errors with
/// survivors is `Partial`, no survivors is `Failed`.
pub fn classify_outcome(directories: Vec<PathBuf>, errors: Vec<String>) -> AcquisitionOutcome {
    if directories.is_empty() {
        let diagnostics = if errors.is_empty() {
            "No images were persisted".to_string()
        } else {
            errors.join("\n")
        };
        return AcquisitionOutcome::Failed { diagnostics };
    }
    if errors.is_empty() {
        AcquisitionOutcome::Complete { directories }
    } else {
        AcquisitionOutcome::Partial {
            directories,
            diagnostics: errors.join("\n"),
        }
    }
}

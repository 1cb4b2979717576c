use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PrepareError {
    #[error("cannot discover cases under {}: {reason}", path.display())]
    Discovery { path: PathBuf, reason: String },
    #[error(
        "found {images} image files but {labels} label files; first unpaired directory: {}",
        first_unpaired.display()
    )]
    PairingMismatch {
        images: usize,
        labels: usize,
        first_unpaired: PathBuf,
    },
    #[error("invalid volume geometry: {0}")]
    SamplingConfig(String),
    #[error("number of samples per training case must be at least 1, got {0}")]
    InvalidSampleCount(usize),
    #[error("train size must be between 0.0 and 1.0, got {0}")]
    InvalidSplit(f64),
    #[error("manifest is empty, no row available for inference")]
    EmptyManifest,
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PrepareError {
    pub(crate) fn discovery(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        PrepareError::Discovery {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: impl Into<std::io::Error>) -> Self {
        PrepareError::Write {
            path: path.into(),
            source: source.into(),
        }
    }
}

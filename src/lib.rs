//! Subvolume training-manifest preparation for 3D MRI segmentation
//!
//! This library walks a case/person/file tree of MRI volumes and label maps,
//! samples center-biased subvolume boxes for every pair and writes train,
//! validation and inference manifests as CSV files.

pub mod config;
pub mod dataset;
pub mod discovery;
pub mod error;
pub mod io;
pub mod sampler;
pub mod types;
pub mod utils;

// Re-export commonly used types and functions
pub use config::{Args, RunConfig, VolumeGeometry};
pub use dataset::{build_manifest, inference_row, run, split_cases};
pub use discovery::discover;
pub use error::PrepareError;
pub use sampler::{CoordinateSampler, TruncatedNormal};
pub use types::{CasePair, CoordBox, Discovery, FileNames, Manifest, ManifestRow, RunSummary, Split};

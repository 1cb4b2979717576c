use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::PrepareError;
use crate::types::{FileNames, IMAGE_FILE_NAME, LABEL_FILE_NAME};

pub const DEFAULT_VOLUME_SHAPE: [u32; 3] = [256, 256, 256];
pub const DEFAULT_SUBVOLUME_SHAPE: [u32; 3] = [64, 64, 64];
pub const DEFAULT_TRAIN_SIZE: f64 = 0.8;

/// Command-line arguments for building subvolume training manifests from an MRI dataset.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Directory containing the case/person/file hierarchy
    pub datapath: String,

    /// Number of coordinate boxes drawn per training case
    #[arg(value_parser = validate_sample_count)]
    pub n_samples: usize,

    /// Directory the CSV manifests are written to
    #[arg(short = 'o', long = "output_dir", default_value = ".")]
    pub output_dir: String,

    /// Proportion of the cases, in discovery order, assigned to training
    #[arg(long = "train_size", default_value_t = DEFAULT_TRAIN_SIZE, value_parser = validate_size)]
    pub train_size: f64,

    /// Seed for coordinate sampling; drawn from entropy when omitted
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Full volume shape as X,Y,Z
    #[arg(long = "volume_shape", value_delimiter = ',', default_values_t = DEFAULT_VOLUME_SHAPE)]
    pub volume_shape: Vec<u32>,

    /// Subvolume shape as X,Y,Z; every axis must be even
    #[arg(long = "subvolume_shape", value_delimiter = ',', default_values_t = DEFAULT_SUBVOLUME_SHAPE)]
    pub subvolume_shape: Vec<u32>,

    /// File name of the intensity volume inside each person directory
    #[arg(long = "image_name", default_value = IMAGE_FILE_NAME)]
    pub image_name: String,

    /// File name of the label volume inside each person directory
    #[arg(long = "label_name", default_value = LABEL_FILE_NAME)]
    pub label_name: String,
}

// Validate that at least one box is drawn per training case
pub fn validate_sample_count(s: &str) -> Result<usize, String> {
    match usize::from_str(s) {
        Ok(val) if val >= 1 => Ok(val),
        _ => Err("N_SAMPLES must be a positive integer".to_string()),
    }
}

// Validate that the size is between 0.0 and 1.0
pub fn validate_size(s: &str) -> Result<f64, String> {
    match f64::from_str(s) {
        Ok(val) if (0.0..=1.0).contains(&val) => Ok(val),
        _ => Err("SIZE must be between 0.0 and 1.0".to_string()),
    }
}

/// Fixed geometry of the full volume and of the cropped subvolume.
///
/// Every subvolume axis is even and at least two voxels shorter than the
/// volume, so the center interval has non-zero width and boxes drawn from it
/// never leave `[0, volume_shape]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeGeometry {
    volume_shape: [u32; 3],
    subvolume_shape: [u32; 3],
}

impl VolumeGeometry {
    pub fn new(volume_shape: [u32; 3], subvolume_shape: [u32; 3]) -> Result<Self, PrepareError> {
        for axis in 0..3 {
            let volume = volume_shape[axis];
            let subvolume = subvolume_shape[axis];
            if volume == 0 {
                return Err(PrepareError::SamplingConfig(format!(
                    "volume axis {axis} has zero length"
                )));
            }
            if subvolume == 0 || subvolume % 2 != 0 {
                return Err(PrepareError::SamplingConfig(format!(
                    "subvolume axis {axis} must be a positive even length, got {subvolume}"
                )));
            }
            if subvolume > volume {
                return Err(PrepareError::SamplingConfig(format!(
                    "subvolume {subvolume} does not fit volume {volume} on axis {axis}"
                )));
            }
            // Centers are drawn from [half + 1, volume - half], which needs a non-zero width
            let half = subvolume / 2;
            if half + 1 >= volume - half {
                return Err(PrepareError::SamplingConfig(format!(
                    "subvolume {subvolume} leaves no room to place centers in volume {volume} on axis {axis}"
                )));
            }
        }
        Ok(Self {
            volume_shape,
            subvolume_shape,
        })
    }

    /// Build from the variable-length lists clap hands back.
    pub fn from_slices(volume_shape: &[u32], subvolume_shape: &[u32]) -> Result<Self, PrepareError> {
        let volume: [u32; 3] = volume_shape.try_into().map_err(|_| {
            PrepareError::SamplingConfig(format!(
                "volume shape needs 3 axes, got {}",
                volume_shape.len()
            ))
        })?;
        let subvolume: [u32; 3] = subvolume_shape.try_into().map_err(|_| {
            PrepareError::SamplingConfig(format!(
                "subvolume shape needs 3 axes, got {}",
                subvolume_shape.len()
            ))
        })?;
        Self::new(volume, subvolume)
    }

    pub fn volume_shape(&self) -> [u32; 3] {
        self.volume_shape
    }

    pub fn subvolume_shape(&self) -> [u32; 3] {
        self.subvolume_shape
    }

    pub fn half_subvolume_shape(&self) -> [u32; 3] {
        self.subvolume_shape.map(|s| s / 2)
    }
}

impl Default for VolumeGeometry {
    fn default() -> Self {
        Self {
            volume_shape: DEFAULT_VOLUME_SHAPE,
            subvolume_shape: DEFAULT_SUBVOLUME_SHAPE,
        }
    }
}

/// Everything a single preparation run needs
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub datapath: PathBuf,
    pub output_dir: PathBuf,
    pub n_samples: usize,
    pub train_size: f64,
    pub seed: Option<u64>,
    pub geometry: VolumeGeometry,
    pub file_names: FileNames,
}

impl RunConfig {
    pub fn new(datapath: impl Into<PathBuf>, output_dir: impl Into<PathBuf>, n_samples: usize) -> Self {
        Self {
            datapath: datapath.into(),
            output_dir: output_dir.into(),
            n_samples,
            train_size: DEFAULT_TRAIN_SIZE,
            seed: None,
            geometry: VolumeGeometry::default(),
            file_names: FileNames::default(),
        }
    }
}

impl Args {
    pub fn to_run_config(&self) -> Result<RunConfig, PrepareError> {
        let geometry = VolumeGeometry::from_slices(&self.volume_shape, &self.subvolume_shape)?;
        Ok(RunConfig {
            datapath: PathBuf::from(&self.datapath),
            output_dir: PathBuf::from(&self.output_dir),
            n_samples: self.n_samples,
            train_size: self.train_size,
            seed: self.seed,
            geometry,
            file_names: FileNames {
                image: self.image_name.clone(),
                label: self.label_name.clone(),
            },
        })
    }
}

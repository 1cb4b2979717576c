use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

// File names recognised inside a person directory
pub const IMAGE_FILE_NAME: &str = "t1weighted.nii";
pub const LABEL_FILE_NAME: &str = "labels.DKT31.manual+aseg.nii";

// Output artifact names
pub const DATASET_CSV: &str = "dataset.csv";
pub const TRAIN_CSV: &str = "dataset_train.csv";
pub const VALID_CSV: &str = "dataset_valid.csv";
pub const INFER_CSV: &str = "dataset_infer.csv";

/// Leaf file names that identify the image and label volumes of a person
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNames {
    pub image: String,
    pub label: String,
}

impl Default for FileNames {
    fn default() -> Self {
        Self {
            image: IMAGE_FILE_NAME.to_string(),
            label: LABEL_FILE_NAME.to_string(),
        }
    }
}

// One image/label pair found in a single person directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CasePair {
    pub images: PathBuf,
    pub labels: PathBuf,
}

/// A subvolume bounding box: rows are (x, y, z), columns are (start, end).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordBox(pub [[i64; 2]; 3]);

impl CoordBox {
    pub fn start(&self, axis: usize) -> i64 {
        self.0[axis][0]
    }

    pub fn end(&self, axis: usize) -> i64 {
        self.0[axis][1]
    }
}

// Nested list form, e.g. `[[96, 160], [100, 164], [70, 134]]`
impl fmt::Display for CoordBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z] = self.0;
        write!(
            f,
            "[[{}, {}], [{}, {}], [{}, {}]]",
            x[0], x[1], y[0], y[1], z[0], z[1]
        )
    }
}

/// Train/validation tag of a manifest row
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Split {
    Train,
    Valid,
}

impl Split {
    pub fn flag(self) -> u8 {
        match self {
            Split::Train => 0,
            Split::Valid => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRow {
    pub images: PathBuf,
    pub labels: PathBuf,
    pub coords: CoordBox,
    pub split: Split,
}

pub type Manifest = Vec<ManifestRow>;

// Struct to hold the cases partitioned by discovery order
pub struct SplitCases<'a> {
    pub train_cases: &'a [CasePair],
    pub valid_cases: &'a [CasePair],
}

// CSV record for `dataset.csv`
#[derive(Debug, Serialize)]
pub struct DatasetRecord {
    pub images: String,
    pub labels: String,
    pub coords: String,
    pub split: u8,
}

// CSV record for `dataset_train.csv` and `dataset_valid.csv`
#[derive(Debug, Serialize)]
pub struct SplitRecord {
    pub images: String,
    pub labels: String,
    pub coords: String,
}

impl From<&ManifestRow> for DatasetRecord {
    fn from(row: &ManifestRow) -> Self {
        Self {
            images: row.images.to_string_lossy().into_owned(),
            labels: row.labels.to_string_lossy().into_owned(),
            coords: row.coords.to_string(),
            split: row.split.flag(),
        }
    }
}

impl From<&ManifestRow> for SplitRecord {
    fn from(row: &ManifestRow) -> Self {
        Self {
            images: row.images.to_string_lossy().into_owned(),
            labels: row.labels.to_string_lossy().into_owned(),
            coords: row.coords.to_string(),
        }
    }
}

// Struct to hold discovery statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DiscoveryStats {
    pub case_dirs: usize,
    pub person_dirs: usize,
    pub images_found: usize,
    pub labels_found: usize,
    pub matched_pairs: usize,
    pub skipped_empty: usize,
    pub unpaired: Vec<PathBuf>,
}

impl DiscoveryStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn print_summary(&self) {
        log::info!("=== Discovery Summary ===");
        log::info!("Case directories: {}", self.case_dirs);
        log::info!("Person directories: {}", self.person_dirs);
        log::info!("Matched image/label pairs: {}", self.matched_pairs);
        if self.skipped_empty > 0 {
            log::info!(
                "Skipped (no image or label file): {}",
                self.skipped_empty
            );
        }
        if !self.unpaired.is_empty() {
            log::warn!(
                "Unpaired person directories: {} (images: {}, labels: {})",
                self.unpaired.len(),
                self.images_found,
                self.labels_found
            );
        }
    }
}

/// Result of walking the case/person/file hierarchy
#[derive(Debug, Clone)]
pub struct Discovery {
    pub cases: Vec<CasePair>,
    pub stats: DiscoveryStats,
}

/// What a finished run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub cases: usize,
    pub train_rows: usize,
    pub valid_rows: usize,
    pub seed: u64,
    pub outputs: OutputFiles,
}

impl RunSummary {
    pub fn total_rows(&self) -> usize {
        self.train_rows + self.valid_rows
    }

    pub fn print_summary(&self) {
        log::info!("=== Manifest Summary ===");
        log::info!("Cases: {}", self.cases);
        log::info!("Train rows: {}", self.train_rows);
        log::info!("Validation rows: {}", self.valid_rows);
        log::info!("Total rows: {}", self.total_rows());
        log::info!("Seed: {}", self.seed);
    }
}

// Struct to hold the paths of the four output artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFiles {
    pub dataset: PathBuf,
    pub train: PathBuf,
    pub valid: PathBuf,
    pub infer: PathBuf,
}

use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::error::PrepareError;
use crate::types::{
    DatasetRecord, ManifestRow, OutputFiles, Split, SplitRecord, DATASET_CSV, INFER_CSV,
    TRAIN_CSV, VALID_CSV,
};
use crate::utils::create_output_directory;

pub const DATASET_COLUMNS: [&str; 4] = ["images", "labels", "coords", "split"];
pub const SPLIT_COLUMNS: [&str; 3] = ["images", "labels", "coords"];

/// Set up the output directory and the paths of the four manifest files
pub fn setup_output_files(output_dir: &Path) -> Result<OutputFiles, PrepareError> {
    let dir = create_output_directory(output_dir).map_err(|e| PrepareError::write(output_dir, e))?;
    Ok(OutputFiles {
        dataset: dir.join(DATASET_CSV),
        train: dir.join(TRAIN_CSV),
        valid: dir.join(VALID_CSV),
        infer: dir.join(INFER_CSV),
    })
}

/// Write every manifest row with all columns to `dataset.csv`
pub fn write_dataset_csv(path: &Path, rows: &[ManifestRow]) -> Result<(), PrepareError> {
    write_records(
        path,
        Some(&DATASET_COLUMNS[..]),
        rows.iter().map(DatasetRecord::from),
    )
}

/// Write the rows of one split, without the split column
pub fn write_split_csv(path: &Path, rows: &[ManifestRow], split: Split) -> Result<(), PrepareError> {
    write_records(
        path,
        Some(&SPLIT_COLUMNS[..]),
        rows.iter()
            .filter(|row| row.split == split)
            .map(SplitRecord::from),
    )
}

/// Write the image and label path of a single row, one value per line, no header
pub fn write_infer_csv(path: &Path, row: &ManifestRow) -> Result<(), PrepareError> {
    let values = [
        row.images.to_string_lossy().into_owned(),
        row.labels.to_string_lossy().into_owned(),
    ];
    write_records(path, None, values.into_iter().map(|value| [value]))
}

// The header is written explicitly so that an empty split still gets one.
// The writer is flushed and dropped before returning, on success and on error.
fn write_records<T, I>(path: &Path, header: Option<&[&str]>, records: I) -> Result<(), PrepareError>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let file = File::create(path).map_err(|e| PrepareError::write(path, e))?;
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(BufWriter::new(file));
    if let Some(header) = header {
        writer
            .write_record(header)
            .map_err(|e| PrepareError::write(path, e))?;
    }
    for record in records {
        writer
            .serialize(record)
            .map_err(|e| PrepareError::write(path, e))?;
    }
    writer.flush().map_err(|e| PrepareError::write(path, e))?;
    Ok(())
}

use glob::{glob, Pattern};
use log::{debug, error, warn};
use std::path::{Path, PathBuf};

use crate::error::PrepareError;
use crate::types::{CasePair, Discovery, DiscoveryStats, FileNames};

/// Walk `root/<case>/<person>/<file>` and pair the image and label volume of every
/// person directory.
///
/// Entries are visited in sorted order, so the result is stable across runs.
/// A person directory that holds only one of the two files fails the whole
/// discovery with [`PrepareError::PairingMismatch`].
pub fn discover(root: &Path, names: &FileNames) -> Result<Discovery, PrepareError> {
    if !root.exists() {
        return Err(PrepareError::discovery(root, "path does not exist"));
    }
    if !root.is_dir() {
        return Err(PrepareError::discovery(root, "path is not a directory"));
    }

    let mut stats = DiscoveryStats::new();
    let mut cases = Vec::new();

    for case_dir in list_entries(root)? {
        if !case_dir.is_dir() {
            debug!("Skipping non-directory case entry: {}", case_dir.display());
            continue;
        }
        stats.case_dirs += 1;

        for person_dir in list_entries(&case_dir)? {
            if !person_dir.is_dir() {
                debug!("Skipping non-directory person entry: {}", person_dir.display());
                continue;
            }
            stats.person_dirs += 1;

            let (image, label) = find_volumes(&person_dir, names)?;
            stats.images_found += usize::from(image.is_some());
            stats.labels_found += usize::from(label.is_some());

            match (image, label) {
                (Some(images), Some(labels)) => {
                    debug!("{}: {}", stats.matched_pairs, person_dir.display());
                    stats.matched_pairs += 1;
                    cases.push(CasePair { images, labels });
                }
                (None, None) => stats.skipped_empty += 1,
                (Some(_), None) => {
                    error!("Image without label file in {}", person_dir.display());
                    stats.unpaired.push(person_dir);
                }
                (None, Some(_)) => {
                    error!("Label without image file in {}", person_dir.display());
                    stats.unpaired.push(person_dir);
                }
            }
        }
    }

    if let Some(first_unpaired) = stats.unpaired.first() {
        stats.print_summary();
        return Err(PrepareError::PairingMismatch {
            images: stats.images_found,
            labels: stats.labels_found,
            first_unpaired: first_unpaired.clone(),
        });
    }

    if cases.is_empty() {
        warn!("No image/label pairs found under {}", root.display());
    }

    Ok(Discovery { cases, stats })
}

/// Look up the image and label files among the entries of a person directory
fn find_volumes(
    person_dir: &Path,
    names: &FileNames,
) -> Result<(Option<PathBuf>, Option<PathBuf>), PrepareError> {
    let mut image = None;
    let mut label = None;
    for entry in list_entries(person_dir)? {
        if !entry.is_file() {
            continue;
        }
        let file_name = entry.file_name().and_then(|name| name.to_str());
        let is_image = file_name == Some(names.image.as_str());
        let is_label = file_name == Some(names.label.as_str());
        if is_image {
            image = Some(entry);
        } else if is_label {
            label = Some(entry);
        }
    }
    Ok((image, label))
}

/// List the direct children of `dir`, sorted by path
fn list_entries(dir: &Path) -> Result<Vec<PathBuf>, PrepareError> {
    let dir_str = dir
        .to_str()
        .ok_or_else(|| PrepareError::discovery(dir, "path is not valid UTF-8"))?;
    let pattern = format!("{}/*", Pattern::escape(dir_str));

    glob(&pattern)
        .map_err(|e| PrepareError::discovery(dir, e))?
        .map(|entry| entry.map_err(|e| PrepareError::discovery(e.path().to_path_buf(), e.error())))
        .collect()
}

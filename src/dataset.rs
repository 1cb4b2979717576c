use indicatif::ProgressBar;
use log::info;

use crate::config::RunConfig;
use crate::discovery::discover;
use crate::error::PrepareError;
use crate::io::{setup_output_files, write_dataset_csv, write_infer_csv, write_split_csv};
use crate::sampler::CoordinateSampler;
use crate::types::{CasePair, Manifest, ManifestRow, RunSummary, Split, SplitCases};
use crate::utils::create_progress_bar;

/// Number of cases, in discovery order, assigned to training
pub fn train_case_count(len: usize, train_size: f64) -> Result<usize, PrepareError> {
    if !train_size.is_finite() || !(0.0..=1.0).contains(&train_size) {
        return Err(PrepareError::InvalidSplit(train_size));
    }
    Ok(((len as f64 * train_size).floor() as usize).min(len))
}

/// Split the cases into training and validation sets by position, without shuffling
pub fn split_cases(cases: &[CasePair], train_size: f64) -> Result<SplitCases<'_>, PrepareError> {
    let train_count = train_case_count(cases.len(), train_size)?;
    let (train_cases, valid_cases) = cases.split_at(train_count);
    Ok(SplitCases {
        train_cases,
        valid_cases,
    })
}

/// Attach coordinate boxes and a split tag to every case.
///
/// Training cases get `n_samples` rows each, validation cases exactly one.
pub fn build_manifest(
    cases: &[CasePair],
    n_samples: usize,
    train_size: f64,
    sampler: &mut CoordinateSampler,
    pb: &ProgressBar,
) -> Result<Manifest, PrepareError> {
    if n_samples == 0 {
        return Err(PrepareError::InvalidSampleCount(n_samples));
    }
    let split = split_cases(cases, train_size)?;

    let mut manifest =
        Vec::with_capacity(split.train_cases.len() * n_samples + split.valid_cases.len());

    for case in split.train_cases {
        for coords in sampler.sample_boxes(n_samples) {
            manifest.push(ManifestRow {
                images: case.images.clone(),
                labels: case.labels.clone(),
                coords,
                split: Split::Train,
            });
        }
        pb.inc(1);
    }

    for case in split.valid_cases {
        manifest.push(ManifestRow {
            images: case.images.clone(),
            labels: case.labels.clone(),
            coords: sampler.sample_box(),
            split: Split::Valid,
        });
        pb.inc(1);
    }

    Ok(manifest)
}

/// The row exported as the single-sample inference example
pub fn inference_row(manifest: &[ManifestRow]) -> Result<&ManifestRow, PrepareError> {
    manifest.last().ok_or(PrepareError::EmptyManifest)
}

/// Main preparation pipeline: discover, build the manifest and write the four CSV files
pub fn run(config: &RunConfig) -> Result<RunSummary, PrepareError> {
    info!("Discovering cases under {}", config.datapath.display());
    let discovery = discover(&config.datapath, &config.file_names)?;
    discovery.stats.print_summary();

    let mut sampler = match config.seed {
        Some(seed) => CoordinateSampler::new(config.geometry, seed),
        None => CoordinateSampler::from_entropy(config.geometry),
    };
    info!("Sampling coordinates with seed {}", sampler.seed());

    let pb = create_progress_bar(discovery.cases.len() as u64, "Sampling");
    let manifest = build_manifest(
        &discovery.cases,
        config.n_samples,
        config.train_size,
        &mut sampler,
        &pb,
    )?;
    pb.finish_with_message("sampled");

    // Nothing is written when there is no row to export for inference
    let infer_row = inference_row(&manifest)?;

    let outputs = setup_output_files(&config.output_dir)?;
    info!("Writing manifests to {}", config.output_dir.display());
    write_dataset_csv(&outputs.dataset, &manifest)?;
    write_split_csv(&outputs.train, &manifest, Split::Train)?;
    write_split_csv(&outputs.valid, &manifest, Split::Valid)?;
    write_infer_csv(&outputs.infer, infer_row)?;

    let train_rows = manifest.iter().filter(|row| row.split == Split::Train).count();
    Ok(RunSummary {
        cases: discovery.cases.len(),
        train_rows,
        valid_rows: manifest.len() - train_rows,
        seed: sampler.seed(),
        outputs,
    })
}

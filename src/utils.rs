use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};

/// Progress bar over the discovered cases, prefixed with the pipeline stage
pub fn create_progress_bar(cases: u64, stage: &str) -> ProgressBar {
    let style = ProgressStyle::with_template(
        "{spinner:.green} {prefix} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} cases {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("#>-");
    ProgressBar::new(cases)
        .with_style(style)
        .with_prefix(format!("[{stage}]"))
}

/// Create the output directory if missing; existing manifests inside it are overwritten
pub fn create_output_directory(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_dir() {
        log::debug!("Writing into existing directory {:?}", path);
    } else {
        fs::create_dir_all(path)?;
    }
    Ok(path.to_path_buf())
}

use clap::Parser;
use log::{error, info};
use std::process::ExitCode;

use neuro_prep::{run, Args};

fn main() -> ExitCode {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match args.to_run_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Starting manifest preparation...");

    match run(&config) {
        Ok(summary) => {
            summary.print_summary();
            info!("Manifest preparation completed successfully.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to prepare dataset: {}", e);
            ExitCode::FAILURE
        }
    }
}

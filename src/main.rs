use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use ela_forensics::{BatchConfig, QualityRange, batch, report::JsonReport};
use log::{error, info};

/// Error level analysis for JPEG images
#[derive(Parser, Debug)]
#[command(name = "ela", version)]
struct Cli {
    /// Path to a jpg file or a folder of jpgs to be processed
    #[arg(short = 'i', long = "in", value_name = "PATH")]
    input: PathBuf,

    /// Folder to store the results in (one subfolder per image in folder mode)
    #[arg(short = 'o', long, default_value = "./", value_name = "DIR")]
    out_dir: PathBuf,

    /// Lowest JPEG quality to sample
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u8).range(1..=100))]
    min_quality: u8,

    /// Upper bound of the sweep (exclusive)
    #[arg(long, default_value_t = 101, value_parser = clap::value_parser!(u8).range(3..=101))]
    max_quality: u8,

    /// Distance between sampled qualities
    #[arg(long = "quality-steps", default_value_t = 5, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality_steps: u8,

    /// Compare the embedded EXIF thumbnail with the image
    #[arg(short = 't', long)]
    thumb_diff: bool,

    /// Analyze several images at once
    #[arg(long)]
    parallel: bool,

    /// Write a JSON summary of the run to this file
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Log per-quality details
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn run(cli: &Cli) -> ela_forensics::error::Result<bool> {
    let range = QualityRange::new(cli.min_quality, cli.max_quality, cli.quality_steps)?;
    let config = BatchConfig::default()
        .with_range(range)
        .with_thumbnail_comparison(cli.thumb_diff)
        .with_parallel(cli.parallel);

    let summary = batch::run(&cli.input, &cli.out_dir, &config)?;
    info!(
        "Done: {} image(s), {} artifact(s), {} failure(s)",
        summary.results.len(),
        summary.artifact_count(),
        summary.failed_count()
    );

    if let Some(path) = &cli.report {
        JsonReport::new(range, &summary).write(path)?;
        info!("Report written to {}", path.display());
    }

    Ok(summary.failed_count() == 0)
}

fn exit_status(result: &ela_forensics::error::Result<bool>) -> u8 {
    match result {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(_) => 2,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = run(&cli);
    if let Err(e) = &result {
        error!("{}", e);
    }
    ExitCode::from(exit_status(&result))
}

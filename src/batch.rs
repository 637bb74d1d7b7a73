use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{error, info};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::{
    AnalysisRequest, BatchConfig, SweepOutcome,
    analysis::ela::QualitySweepAnalyzer,
    backend::{ImagingBackend, ThumbnailSource},
    error::{ForensicsError, Result},
    naming,
};

pub const SCANNED_EXTENSION: &str = "jpg";

#[derive(Debug)]
pub struct ImageResult {
    pub source_path: PathBuf,
    pub outcome: Result<SweepOutcome>,
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub results: Vec<ImageResult>,
}

impl BatchSummary {
    pub fn succeeded(&self) -> impl Iterator<Item = &SweepOutcome> {
        self.results.iter().filter_map(|r| r.outcome.as_ref().ok())
    }

    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_err()).count()
    }

    pub fn artifact_count(&self) -> usize {
        self.succeeded().map(|o| o.artifacts.len()).sum()
    }
}

pub fn resolve_requests(input: &Path, output_directory: &Path, config: &BatchConfig) -> Result<Vec<AnalysisRequest>> {
    if !input.exists() {
        return Err(ForensicsError::InvalidParameter(format!(
            "input path {} does not exist",
            input.display()
        )));
    }

    let request = |source: PathBuf, out: PathBuf| {
        AnalysisRequest::new(source, out, config.range)
            .with_thumbnail_comparison(config.compare_thumbnail)
    };

    if !input.is_dir() {
        return Ok(vec![request(input.to_path_buf(), output_directory.to_path_buf())]);
    }

    let mut sources = Vec::new();
    for entry in fs::read_dir(input)? {
        let path = entry?.path();
        let is_jpg = path.extension().is_some_and(|ext| ext == SCANNED_EXTENSION);
        if is_jpg && path.is_file() {
            sources.push(path);
        }
    }
    sources.sort();

    sources
        .into_iter()
        .map(|source| -> Result<AnalysisRequest> {
            let subdirectory = output_directory.join(naming::file_stem(&source)?);
            Ok(request(source, subdirectory))
        })
        .collect()
}

pub fn run(input: &Path, output_directory: &Path, config: &BatchConfig) -> Result<BatchSummary> {
    run_with(&QualitySweepAnalyzer::new(), input, output_directory, config)
}

pub fn run_with<B: ImagingBackend, T: ThumbnailSource>(
    analyzer: &QualitySweepAnalyzer<B, T>,
    input: &Path,
    output_directory: &Path,
    config: &BatchConfig,
) -> Result<BatchSummary> {
    let requests = resolve_requests(input, output_directory, config)?;
    fs::create_dir_all(output_directory)?;
    info!(
        "Analyzing {} image(s), qualities {}..{} step {}",
        requests.len(),
        config.range.min(),
        config.range.max(),
        config.range.step()
    );

    let process = |request: &AnalysisRequest| {
        let outcome = analyzer.analyze(request);
        if let Err(ref e) = outcome {
            error!("{}: {}", request.source_path.display(), e);
        }
        ImageResult {
            source_path: request.source_path.clone(),
            outcome,
        }
    };

    let results: Vec<ImageResult> = if config.parallel {
        requests.par_iter().map(process).collect()
    } else {
        requests.iter().map(process).collect()
    };

    Ok(BatchSummary { results })
}

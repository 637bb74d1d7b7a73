use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{ForensicsError, Result};

pub mod analysis;
pub mod backend;
pub mod batch;
pub mod error;
pub mod image_utils;
pub mod metadata;
pub mod naming;
pub mod report;

#[cfg(test)]
mod test_support;

pub use analysis::{ela::QualitySweepAnalyzer, thumbnail::ThumbnailComparator};
pub use backend::{ImageCrateBackend, ImagingBackend, ThumbnailSource};
pub use metadata::exif::ExifExtractor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QualityRange {
    min: u8,
    max: u8,
    step: u8,
}

impl QualityRange {
    pub fn new(min: u8, max: u8, step: u8) -> Result<Self> {
        if !(1..=100).contains(&min) {
            return Err(ForensicsError::InvalidParameter(format!(
                "min quality must be within 1..=100, got {min}"
            )));
        }
        if !(3..=101).contains(&max) {
            return Err(ForensicsError::InvalidParameter(format!(
                "max quality must be within 3..=101, got {max}"
            )));
        }
        if !(1..=100).contains(&step) {
            return Err(ForensicsError::InvalidParameter(format!(
                "quality step must be within 1..=100, got {step}"
            )));
        }

        Ok(Self { min, max, step })
    }

    pub fn min(&self) -> u8 {
        self.min
    }

    pub fn max(&self) -> u8 {
        self.max
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    /// Ascending qualities; never includes `max`. Empty when `min >= max`.
    pub fn levels(&self) -> impl Iterator<Item = u8> {
        (self.min..self.max).step_by(self.step as usize)
    }

    pub fn len(&self) -> usize {
        if self.min >= self.max {
            return 0;
        }
        (self.max - self.min).div_ceil(self.step) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for QualityRange {
    fn default() -> Self {
        Self {
            min: 5,
            max: 101,
            step: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub source_path: PathBuf,
    pub output_directory: PathBuf,
    pub range: QualityRange,
    pub compare_thumbnail: bool,
}

impl AnalysisRequest {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(source: P, output_directory: Q, range: QualityRange) -> Self {
        Self {
            source_path: source.as_ref().to_path_buf(),
            output_directory: output_directory.as_ref().to_path_buf(),
            range,
            compare_thumbnail: false,
        }
    }

    pub fn with_thumbnail_comparison(mut self, enabled: bool) -> Self {
        self.compare_thumbnail = enabled;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArtifactKind {
    ErrorLevel { quality: u8 },
    ThumbnailDiff,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffArtifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThumbnailOutcome {
    Present(Vec<u8>),
    Absent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ThumbnailComparison {
    Compared(DiffArtifact),
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelStats {
    pub quality: u8,
    pub max_difference: u8,
    pub scale: f64,
    pub mean_difference: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepOutcome {
    pub source_path: PathBuf,
    pub artifacts: Vec<DiffArtifact>,
    pub levels: Vec<LevelStats>,
    /// Qualities whose re-encode matched the source exactly.
    pub skipped_levels: Vec<u8>,
    pub thumbnail: Option<ThumbnailComparison>,
}

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub range: QualityRange,
    pub compare_thumbnail: bool,
    pub parallel: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            range: QualityRange::default(),
            compare_thumbnail: false,
            parallel: false,
        }
    }
}

impl BatchConfig {
    pub fn with_range(mut self, range: QualityRange) -> Self {
        self.range = range;
        self
    }

    pub fn with_thumbnail_comparison(mut self, enabled: bool) -> Self {
        self.compare_thumbnail = enabled;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

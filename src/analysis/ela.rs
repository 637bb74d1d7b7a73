use std::fs;

use image::DynamicImage;
use log::{debug, info, warn};

use crate::{
    AnalysisRequest, ArtifactKind, DiffArtifact, LevelStats, SweepOutcome, ThumbnailComparison,
    analysis::thumbnail::ThumbnailComparator,
    backend::{ImageCrateBackend, ImagingBackend, ThumbnailSource},
    error::{ForensicsError, Result},
    image_utils::{max_of_extrema, mean_channel_value},
    metadata::exif::ExifExtractor,
    naming,
};

#[derive(Debug, Clone)]
pub struct ErrorLevelImage {
    pub image: DynamicImage,
    pub stats: LevelStats,
}

pub struct QualitySweepAnalyzer<B = ImageCrateBackend, T = ExifExtractor> {
    backend: B,
    thumbnails: T,
}

impl QualitySweepAnalyzer {
    pub fn new() -> Self {
        Self {
            backend: ImageCrateBackend::new(),
            thumbnails: ExifExtractor::new(),
        }
    }
}

impl Default for QualitySweepAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: ImagingBackend, T: ThumbnailSource> QualitySweepAnalyzer<B, T> {
    pub fn with_backends(backend: B, thumbnails: T) -> Self {
        Self { backend, thumbnails }
    }

    pub fn thumbnail_comparator(&self) -> ThumbnailComparator<'_, B, T> {
        ThumbnailComparator::new(&self.backend, &self.thumbnails)
    }

    /// Runs the sweep for one source and writes one PNG per sampled quality.
    ///
    /// The source is decoded before anything touches the output directory,
    /// so an unreadable input leaves no files behind. Qualities whose
    /// re-encode is pixel-identical to the source are skipped.
    pub fn analyze(&self, request: &AnalysisRequest) -> Result<SweepOutcome> {
        let stem = naming::file_stem(&request.source_path)?;
        let source_bytes = fs::read(&request.source_path)?;
        let original = self.backend.decode(&source_bytes)?;

        fs::create_dir_all(&request.output_directory)?;

        let mut artifacts = Vec::with_capacity(request.range.len());
        let mut levels = Vec::with_capacity(request.range.len());
        let mut skipped_levels = Vec::new();

        for quality in request.range.levels() {
            let level = match self.analyze_level(&original, quality) {
                Ok(level) => level,
                Err(ForensicsError::DegenerateDifference { quality }) => {
                    warn!(
                        "{}: re-encode at quality {} is identical to the source, skipping",
                        request.source_path.display(),
                        quality
                    );
                    skipped_levels.push(quality);
                    continue;
                }
                Err(e) => return Err(e),
            };

            let path = request
                .output_directory
                .join(naming::error_level_file_name(&stem, quality));
            self.backend.save_png(&level.image, &path)?;
            debug!("Wrote {}", path.display());

            artifacts.push(DiffArtifact {
                kind: ArtifactKind::ErrorLevel { quality },
                path,
                width: level.image.width(),
                height: level.image.height(),
            });
            levels.push(level.stats);
        }

        info!(
            "{}: {} error level image(s) in {}",
            request.source_path.display(),
            artifacts.len(),
            request.output_directory.display()
        );

        let thumbnail = if request.compare_thumbnail {
            Some(self.compare_thumbnail(&source_bytes, &original, &stem, request)?)
        } else {
            None
        };

        Ok(SweepOutcome {
            source_path: request.source_path.clone(),
            artifacts,
            levels,
            skipped_levels,
            thumbnail,
        })
    }

    pub fn analyze_level(&self, original: &DynamicImage, quality: u8) -> Result<ErrorLevelImage> {
        let diff = {
            let encoded = self.backend.encode_jpeg(original, quality)?;
            let resaved = self.backend.decode(&encoded)?;
            self.backend.difference(original, &resaved)?
        };

        let max_difference = max_of_extrema(&self.backend.extrema(&diff));
        if max_difference == 0 {
            return Err(ForensicsError::DegenerateDifference { quality });
        }

        let scale = 255.0 / max_difference as f64;
        let image = self.backend.scale_brightness(&diff, scale);
        debug!(
            "quality {}: max difference {}, scale {:.3}",
            quality, max_difference, scale
        );

        Ok(ErrorLevelImage {
            image,
            stats: LevelStats {
                quality,
                max_difference,
                scale,
                mean_difference: mean_channel_value(&diff),
            },
        })
    }

    fn compare_thumbnail(
        &self,
        source_bytes: &[u8],
        original: &DynamicImage,
        stem: &str,
        request: &AnalysisRequest,
    ) -> Result<ThumbnailComparison> {
        let comparator = self.thumbnail_comparator();
        match comparator.compare_decoded(
            &request.source_path,
            source_bytes,
            original,
            stem,
            &request.output_directory,
        ) {
            Ok(comparison) => Ok(comparison),
            Err(ForensicsError::ThumbnailCompare(message)) => {
                warn!("{}: {}", request.source_path.display(), message);
                Ok(ThumbnailComparison::Failed(message))
            }
            Err(e) => Err(e),
        }
    }
}

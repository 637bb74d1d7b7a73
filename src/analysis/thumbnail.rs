use std::{fs, path::Path};

use image::DynamicImage;
use log::{info, warn};

use crate::{
    ArtifactKind, DiffArtifact, ThumbnailComparison, ThumbnailOutcome,
    backend::{ImagingBackend, ThumbnailSource},
    error::{ForensicsError, Result},
    naming,
};

pub const THUMBNAIL_DIFF_QUALITY: u8 = 95;

pub struct ThumbnailComparator<'a, B, T> {
    backend: &'a B,
    thumbnails: &'a T,
}

impl<'a, B: ImagingBackend, T: ThumbnailSource> ThumbnailComparator<'a, B, T> {
    pub fn new(backend: &'a B, thumbnails: &'a T) -> Self {
        Self { backend, thumbnails }
    }

    pub fn compare(&self, source_path: &Path, output_directory: &Path) -> Result<ThumbnailComparison> {
        let stem = naming::file_stem(source_path)?;
        let file_bytes = fs::read(source_path)?;

        let Some(thumb) = self.decode_thumbnail(source_path, &file_bytes) else {
            return Ok(ThumbnailComparison::Skipped);
        };

        let original = self.backend.decode(&file_bytes).map_err(|e| {
            ForensicsError::ThumbnailCompare(format!("cannot read source image: {e}"))
        })?;

        self.write_difference(&thumb, &original, &stem, output_directory)
    }

    /// Same as [`compare`](Self::compare) for a source that is already in memory.
    /// `source_path` only labels log lines; `stem` names the written diff.
    pub fn compare_decoded(
        &self,
        source_path: &Path,
        file_bytes: &[u8],
        original: &DynamicImage,
        stem: &str,
        output_directory: &Path,
    ) -> Result<ThumbnailComparison> {
        match self.decode_thumbnail(source_path, file_bytes) {
            Some(thumb) => self.write_difference(&thumb, original, stem, output_directory),
            None => Ok(ThumbnailComparison::Skipped),
        }
    }

    fn decode_thumbnail(&self, source_path: &Path, file_bytes: &[u8]) -> Option<DynamicImage> {
        let bytes = match self.thumbnails.extract_thumbnail(file_bytes) {
            ThumbnailOutcome::Present(bytes) => bytes,
            ThumbnailOutcome::Absent => {
                info!("{}: no thumbnail in image", source_path.display());
                return None;
            }
        };

        match self.backend.decode(&bytes) {
            Ok(thumb) => Some(thumb),
            Err(e) => {
                warn!(
                    "{}: embedded thumbnail is not decodable: {}",
                    source_path.display(),
                    e
                );
                None
            }
        }
    }

    fn write_difference(
        &self,
        thumb: &DynamicImage,
        original: &DynamicImage,
        stem: &str,
        output_directory: &Path,
    ) -> Result<ThumbnailComparison> {
        let (width, height) = (thumb.width(), thumb.height());

        let resized = self
            .backend
            .resize_exact(original, width, height)
            .map_err(|e| {
                ForensicsError::ThumbnailCompare(format!("cannot resize to {width}x{height}: {e}"))
            })?;

        let diff = self
            .backend
            .difference(&resized, thumb)
            .map_err(|e| ForensicsError::ThumbnailCompare(e.to_string()))?;

        fs::create_dir_all(output_directory)?;
        let path = output_directory.join(naming::thumbnail_diff_file_name(stem));
        self.backend.save_jpeg(&diff, &path, THUMBNAIL_DIFF_QUALITY)?;
        info!("Wrote {}", path.display());

        Ok(ThumbnailComparison::Compared(DiffArtifact {
            kind: ArtifactKind::ThumbnailDiff,
            path,
            width: diff.width(),
            height: diff.height(),
        }))
    }
}

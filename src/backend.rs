use std::{
    fs::File,
    io::{BufWriter, Cursor},
    path::Path,
};

use image::{DynamicImage, ImageFormat, codecs::jpeg::JpegEncoder, imageops::FilterType};

use crate::{
    ThumbnailOutcome,
    error::{ForensicsError, Result},
    image_utils,
};

pub trait ImagingBackend: Sync {
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage>;

    fn encode_jpeg(&self, image: &DynamicImage, quality: u8) -> Result<Vec<u8>>;

    fn resize_exact(&self, image: &DynamicImage, width: u32, height: u32) -> Result<DynamicImage>;

    fn difference(&self, a: &DynamicImage, b: &DynamicImage) -> Result<DynamicImage>;

    fn extrema(&self, image: &DynamicImage) -> Vec<(u8, u8)>;

    fn scale_brightness(&self, image: &DynamicImage, factor: f64) -> DynamicImage;

    fn save_png(&self, image: &DynamicImage, path: &Path) -> Result<()>;

    fn save_jpeg(&self, image: &DynamicImage, path: &Path, quality: u8) -> Result<()>;
}

pub trait ThumbnailSource: Sync {
    fn extract_thumbnail(&self, file_bytes: &[u8]) -> ThumbnailOutcome;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateBackend;

impl ImageCrateBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ImagingBackend for ImageCrateBackend {
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage> {
        let image = image::load_from_memory(bytes)?;
        Ok(image_utils::into_working_color(image))
    }

    fn encode_jpeg(&self, image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
        if !(1..=100).contains(&quality) {
            return Err(ForensicsError::InvalidParameter(format!(
                "JPEG quality must be within 1..=100, got {quality}"
            )));
        }

        let mut buffer = Cursor::new(Vec::new());
        let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
        image.write_with_encoder(encoder)?;

        Ok(buffer.into_inner())
    }

    fn resize_exact(&self, image: &DynamicImage, width: u32, height: u32) -> Result<DynamicImage> {
        if width == 0 || height == 0 {
            return Err(ForensicsError::InvalidParameter(format!(
                "cannot resize to {width}x{height}"
            )));
        }
        if image.width() == 0 || image.height() == 0 {
            return Err(ForensicsError::InvalidParameter(
                "cannot resize an empty image".into(),
            ));
        }

        Ok(image.resize_exact(width, height, FilterType::Lanczos3))
    }

    fn difference(&self, a: &DynamicImage, b: &DynamicImage) -> Result<DynamicImage> {
        image_utils::absolute_difference(a, b)
    }

    fn extrema(&self, image: &DynamicImage) -> Vec<(u8, u8)> {
        image_utils::channel_extrema(image)
    }

    fn scale_brightness(&self, image: &DynamicImage, factor: f64) -> DynamicImage {
        image_utils::scale_brightness(image, factor)
    }

    fn save_png(&self, image: &DynamicImage, path: &Path) -> Result<()> {
        image.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }

    fn save_jpeg(&self, image: &DynamicImage, path: &Path, quality: u8) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        let encoder = JpegEncoder::new_with_quality(writer, quality);
        image.write_with_encoder(encoder)?;
        Ok(())
    }
}

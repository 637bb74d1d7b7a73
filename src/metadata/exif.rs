use std::io::Cursor;

use exif::{In, Tag};
use log::debug;

use crate::{ThumbnailOutcome, backend::ThumbnailSource};

#[derive(Debug, Clone, Copy, Default)]
pub struct ExifExtractor;

impl ExifExtractor {
    pub fn new() -> Self {
        Self
    }

    fn thumbnail_bytes(file_bytes: &[u8]) -> Option<Vec<u8>> {
        let exif_reader = exif::Reader::new();
        let exif = match exif_reader.read_from_container(&mut Cursor::new(file_bytes)) {
            Ok(exif) => exif,
            Err(e) => {
                debug!("No readable EXIF block: {}", e);
                return None;
            }
        };

        let offset = exif
            .get_field(Tag::JPEGInterchangeFormat, In::THUMBNAIL)?
            .value
            .get_uint(0)? as usize;
        let length = exif
            .get_field(Tag::JPEGInterchangeFormatLength, In::THUMBNAIL)?
            .value
            .get_uint(0)? as usize;

        // Offsets are relative to the TIFF header, which is where `buf` starts.
        let end = offset.checked_add(length)?;
        let bytes = exif.buf().get(offset..end);
        if bytes.is_none() {
            debug!(
                "Thumbnail range {}..{} exceeds EXIF block of {} bytes",
                offset,
                end,
                exif.buf().len()
            );
        }

        bytes.filter(|b| !b.is_empty()).map(<[u8]>::to_vec)
    }
}

impl ThumbnailSource for ExifExtractor {
    fn extract_thumbnail(&self, file_bytes: &[u8]) -> ThumbnailOutcome {
        match Self::thumbnail_bytes(file_bytes) {
            Some(bytes) => ThumbnailOutcome::Present(bytes),
            None => ThumbnailOutcome::Absent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{jpeg_bytes, jpeg_with_exif_thumbnail, solid_rgb};

    #[test]
    fn plain_jpeg_has_no_thumbnail() {
        let bytes = jpeg_bytes(&solid_rgb(16, 16, [90, 90, 90]), 90);
        assert_eq!(ExifExtractor::new().extract_thumbnail(&bytes), ThumbnailOutcome::Absent);
    }

    #[test]
    fn garbage_has_no_thumbnail() {
        assert_eq!(
            ExifExtractor::new().extract_thumbnail(b"\xff\xd8garbage"),
            ThumbnailOutcome::Absent
        );
    }

    #[test]
    fn embedded_thumbnail_is_returned_verbatim() {
        let thumb = jpeg_bytes(&solid_rgb(8, 6, [200, 10, 10]), 80);
        let file = jpeg_with_exif_thumbnail(&solid_rgb(32, 24, [200, 10, 10]), &thumb);

        assert_eq!(
            ExifExtractor::new().extract_thumbnail(&file),
            ThumbnailOutcome::Present(thumb)
        );
    }
}

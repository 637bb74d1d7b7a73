use std::{io::Cursor, path::Path};

use image::{DynamicImage, Rgb, RgbImage, codecs::jpeg::JpegEncoder};

pub fn solid_rgb(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)))
}

pub fn textured_rgb(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        let v = (x * 31 + y * 17 + (x * y) % 23) % 256;
        Rgb([v as u8, (255 - v) as u8, ((x ^ y) * 9 % 256) as u8])
    }))
}

pub fn jpeg_bytes(image: &DynamicImage, quality: u8) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_with_encoder(JpegEncoder::new_with_quality(&mut buffer, quality))
        .unwrap();
    buffer.into_inner()
}

pub fn write_jpeg(path: &Path, image: &DynamicImage, quality: u8) {
    std::fs::write(path, jpeg_bytes(image, quality)).unwrap();
}

pub fn jpeg_with_exif_thumbnail(image: &DynamicImage, thumbnail: &[u8]) -> Vec<u8> {
    let main = jpeg_bytes(image, 90);

    // Little-endian TIFF: IFD0 at 8 (one entry), IFD1 at 26 (two entries), data at 56.
    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"II");
    tiff.extend_from_slice(&42u16.to_le_bytes());
    tiff.extend_from_slice(&8u32.to_le_bytes());

    tiff.extend_from_slice(&1u16.to_le_bytes());
    push_entry(&mut tiff, 0x0112, 3, 1);
    tiff.extend_from_slice(&26u32.to_le_bytes());

    tiff.extend_from_slice(&2u16.to_le_bytes());
    push_entry(&mut tiff, 0x0201, 4, 56);
    push_entry(&mut tiff, 0x0202, 4, thumbnail.len() as u32);
    tiff.extend_from_slice(&0u32.to_le_bytes());

    assert_eq!(tiff.len(), 56);
    tiff.extend_from_slice(thumbnail);

    let mut app1 = Vec::new();
    app1.extend_from_slice(b"Exif\0\0");
    app1.extend_from_slice(&tiff);

    let mut out = Vec::with_capacity(main.len() + app1.len() + 4);
    out.extend_from_slice(&main[..2]);
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&((app1.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(&app1);
    out.extend_from_slice(&main[2..]);
    out
}

fn push_entry(tiff: &mut Vec<u8>, tag: u16, kind: u16, value: u32) {
    tiff.extend_from_slice(&tag.to_le_bytes());
    tiff.extend_from_slice(&kind.to_le_bytes());
    tiff.extend_from_slice(&1u32.to_le_bytes());
    if kind == 3 {
        tiff.extend_from_slice(&(value as u16).to_le_bytes());
        tiff.extend_from_slice(&[0, 0]);
    } else {
        tiff.extend_from_slice(&value.to_le_bytes());
    }
}

use std::borrow::Cow;

use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use imageproc::map::map_colors2;

use crate::error::{ForensicsError, Result};

/// Reduces a decoded image to the 8-bit color model the analysis works in.
///
/// Gray sources stay single-channel; everything else becomes RGB8, since
/// the JPEG encoder cannot carry alpha or 16-bit samples.
pub fn into_working_color(image: DynamicImage) -> DynamicImage {
    match image {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => image,
        DynamicImage::ImageLuma16(_) | DynamicImage::ImageLumaA8(_) | DynamicImage::ImageLumaA16(_) => {
            DynamicImage::ImageLuma8(image.to_luma8())
        }
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    }
}

pub fn absolute_difference(a: &DynamicImage, b: &DynamicImage) -> Result<DynamicImage> {
    if a.width() != b.width() || a.height() != b.height() {
        return Err(ForensicsError::DimensionMismatch(
            a.width(),
            a.height(),
            b.width(),
            b.height(),
        ));
    }

    let diff = match a {
        DynamicImage::ImageLuma8(gray_a) => {
            let gray_b = b.to_luma8();
            let diff: GrayImage = map_colors2(gray_a, &gray_b, |p: Luma<u8>, q: Luma<u8>| {
                Luma([p[0].abs_diff(q[0])])
            });
            DynamicImage::ImageLuma8(diff)
        }
        _ => {
            let rgb_a = a.to_rgb8();
            let rgb_b = b.to_rgb8();
            let diff: RgbImage = map_colors2(&rgb_a, &rgb_b, |p: Rgb<u8>, q: Rgb<u8>| {
                Rgb([
                    p[0].abs_diff(q[0]),
                    p[1].abs_diff(q[1]),
                    p[2].abs_diff(q[2]),
                ])
            });
            DynamicImage::ImageRgb8(diff)
        }
    };

    Ok(diff)
}

fn channel_bytes(image: &DynamicImage) -> (usize, Cow<'_, [u8]>) {
    match image {
        DynamicImage::ImageLuma8(gray) => (1, Cow::Borrowed(gray.as_raw().as_slice())),
        DynamicImage::ImageRgb8(rgb) => (3, Cow::Borrowed(rgb.as_raw().as_slice())),
        other => (3, Cow::Owned(other.to_rgb8().into_raw())),
    }
}

pub fn channel_extrema(image: &DynamicImage) -> Vec<(u8, u8)> {
    let (channels, bytes) = channel_bytes(image);
    let mut extrema: Vec<Option<(u8, u8)>> = vec![None; channels];

    for pixel in bytes.chunks_exact(channels) {
        for (slot, &value) in extrema.iter_mut().zip(pixel) {
            *slot = Some(match *slot {
                Some((lo, hi)) => (lo.min(value), hi.max(value)),
                None => (value, value),
            });
        }
    }

    extrema.into_iter().map(|e| e.unwrap_or((0, 0))).collect()
}

pub fn max_of_extrema(extrema: &[(u8, u8)]) -> u8 {
    extrema.iter().map(|&(_, hi)| hi).max().unwrap_or(0)
}

pub fn scale_brightness(image: &DynamicImage, factor: f64) -> DynamicImage {
    let scale = |v: u8| (v as f64 * factor).round().clamp(0.0, 255.0) as u8;

    match image {
        DynamicImage::ImageLuma8(gray) => {
            let mut out = gray.clone();
            out.iter_mut().for_each(|v| *v = scale(*v));
            DynamicImage::ImageLuma8(out)
        }
        other => {
            let mut out = other.to_rgb8();
            out.iter_mut().for_each(|v| *v = scale(*v));
            DynamicImage::ImageRgb8(out)
        }
    }
}

pub fn mean_channel_value(image: &DynamicImage) -> f64 {
    let (_, bytes) = channel_bytes(image);
    if bytes.is_empty() {
        return 0.0;
    }
    bytes.iter().map(|&v| v as f64).sum::<f64>() / bytes.len() as f64
}

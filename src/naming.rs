use std::path::Path;

use crate::error::{ForensicsError, Result};

pub const ERROR_LEVEL_SUFFIX: &str = "error_analyze.png";
pub const THUMBNAIL_DIFF_SUFFIX: &str = "thumb_diff.jpg";

pub fn file_stem(path: &Path) -> Result<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| {
            ForensicsError::InvalidParameter(format!("{} has no file name", path.display()))
        })
}

pub fn error_level_file_name(stem: &str, quality: u8) -> String {
    format!("{stem}_q_{quality}_{ERROR_LEVEL_SUFFIX}")
}

pub fn thumbnail_diff_file_name(stem: &str) -> String {
    format!("{stem}_{THUMBNAIL_DIFF_SUFFIX}")
}

use std::path::{Path, PathBuf};

use std::fmt::{Display, Formatter, Result as FmtResult};

/// Longest edge of a generated thumbnail in pixels.
pub const THUMBNAIL_SIZE: u32 = 256;

#[derive(Debug, Clone)]
pub enum ThumbnailsError {
    IoError(String),
}

impl Display for ThumbnailsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ThumbnailsError::IoError(message) => {
                write!(f, "IO error when preparing thumbnail: {}", message)
            }
        }
    }
}

impl std::error::Error for ThumbnailsError {}

/// Path of the cached thumbnail for `cache_key`.
pub fn thumbnail_path(thumbnails_dir: &Path, cache_key: &str) -> PathBuf {
    thumbnails_dir.join(format!("{}.png", cache_key))
}

/// Makes sure a thumbnail for `source` exists in `thumbnails_dir` and returns its
/// path. An existing thumbnail is reused.
pub fn prepare_thumbnail(
    source: &Path,
    thumbnails_dir: &Path,
    cache_key: &str,
) -> Result<PathBuf, ThumbnailsError> {
    let target = thumbnail_path(thumbnails_dir, cache_key);
    if target.exists() {
        return Ok(target);
    }

    let image = image::open(source).map_err(|err| {
        ThumbnailsError::IoError(format!(
            "Failed opening image {} with error: {}",
            source.display(),
            &err
        ))
    })?;

    let thumbnail = image.thumbnail(THUMBNAIL_SIZE, THUMBNAIL_SIZE);
    std::fs::create_dir_all(thumbnails_dir).map_err(|_| {
        ThumbnailsError::IoError(format!(
            "Failed creating directory: {}",
            &thumbnails_dir.display()
        ))
    })?;

    thumbnail.save(&target).map_err(|err| {
        ThumbnailsError::IoError(format!(
            "Failed saving thumbnail to {} with error: {}",
            target.display(),
            &err
        ))
    })?;
    Ok(target)
}

use std::path::Path;

/// File extensions (lower case) treated as reviewable photos.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp", "heic"];

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Path relative to the library root using forward slashes, so that ids derived
/// from it are the same on every platform.
pub fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file(Path::new("/photos/IMG_0001.JPG")));
        assert!(is_image_file(Path::new("holiday.webp")));
        assert!(!is_image_file(Path::new("notes.txt")));
        assert!(!is_image_file(Path::new("no_extension")));
    }

    #[test]
    fn test_relative_key() {
        let root = PathBuf::from("/photos");
        assert_eq!(
            relative_key(&root, &root.join("2024").join("a.jpg")),
            Some("2024/a.jpg".to_string())
        );
        assert_eq!(relative_key(&root, Path::new("/elsewhere/a.jpg")), None);
        assert_eq!(relative_key(&root, &root), None);
    }
}

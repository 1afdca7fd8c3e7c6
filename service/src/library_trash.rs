//! Layout of the system trash kept inside a photo library.
//!
//! Follows the freedesktop.org trash layout: trashed files live in `files/`
//! and for each of them `info/<name>.trashinfo` records where it came from and
//! when it was trashed.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use file_system::LIBRARY_TRASH_DIR_NAME;

use crate::error::Error;

const TRASH_INFO_HEADER: &str = "[Trash Info]";
const TRASH_INFO_EXTENSION: &str = "trashinfo";
const DELETION_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, PartialEq)]
pub struct LibraryTrash {
    library_root: PathBuf,
    trash_dir: PathBuf,
}

impl LibraryTrash {
    pub fn new(library_root: impl Into<PathBuf>) -> Self {
        let library_root = library_root.into();
        let trash_dir = library_root.join(LIBRARY_TRASH_DIR_NAME);
        Self {
            library_root,
            trash_dir,
        }
    }

    pub fn library_root(&self) -> &Path {
        &self.library_root
    }

    pub fn trash_dir(&self) -> &Path {
        &self.trash_dir
    }

    pub fn files_dir(&self) -> PathBuf {
        self.trash_dir.join("files")
    }

    pub fn info_dir(&self) -> PathBuf {
        self.trash_dir.join("info")
    }

    /// True for anything stored below the trash directory.
    pub fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.trash_dir)
    }

    /// Info file describing a file in `files/`.
    pub fn info_path_for(&self, trashed_file: &Path) -> Option<PathBuf> {
        let name = trashed_file.file_name()?.to_string_lossy();
        Some(
            self.info_dir()
                .join(format!("{}.{}", name, TRASH_INFO_EXTENSION)),
        )
    }

    /// The trashed file an info file describes.
    pub fn file_path_for_info(&self, info_file: &Path) -> Option<PathBuf> {
        if info_file.extension().and_then(|ext| ext.to_str()) != Some(TRASH_INFO_EXTENSION) {
            return None;
        }
        let stem = info_file.file_stem()?;
        Some(self.files_dir().join(stem))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrashInfo {
    pub original_path: PathBuf,
    pub deletion_date: DateTime<Utc>,
}

impl TrashInfo {
    pub fn to_file_contents(&self) -> String {
        format!(
            "{}\nPath={}\nDeletionDate={}\n",
            TRASH_INFO_HEADER,
            self.original_path.display(),
            self.deletion_date.format(DELETION_DATE_FORMAT)
        )
    }

    pub fn parse(contents: &str) -> Result<Self, Error> {
        let mut lines = contents.lines().map(str::trim).filter(|l| !l.is_empty());
        if lines.next() != Some(TRASH_INFO_HEADER) {
            return Err(Error::CatalogError(
                "Trash info is missing its header".to_string(),
            ));
        }

        let mut original_path = None;
        let mut deletion_date = None;
        for line in lines {
            if let Some(value) = line.strip_prefix("Path=") {
                original_path = Some(PathBuf::from(value));
            } else if let Some(value) = line.strip_prefix("DeletionDate=") {
                let parsed = NaiveDateTime::parse_from_str(value, DELETION_DATE_FORMAT)
                    .map_err(|e| {
                        Error::CatalogError(format!("Invalid deletion date '{}': {}", value, e))
                    })?;
                deletion_date = Some(parsed.and_utc());
            }
        }

        match (original_path, deletion_date) {
            (Some(original_path), Some(deletion_date)) => Ok(Self {
                original_path,
                deletion_date,
            }),
            _ => Err(Error::CatalogError(
                "Trash info must contain Path and DeletionDate".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_trash_paths() {
        let trash = LibraryTrash::new("/photos");
        let trashed = trash.files_dir().join("abc-a.jpg");

        assert!(trash.contains(&trashed));
        assert!(!trash.contains(Path::new("/photos/a.jpg")));

        let info = trash.info_path_for(&trashed).unwrap();
        assert_eq!(
            info,
            PathBuf::from("/photos/.photo_cleaner_trash/info/abc-a.jpg.trashinfo")
        );
        assert_eq!(trash.file_path_for_info(&info), Some(trashed));
        assert_eq!(
            trash.file_path_for_info(Path::new("/photos/.photo_cleaner_trash/info/x.txt")),
            None
        );
    }

    #[test]
    fn test_trash_info_contents() {
        let info = TrashInfo {
            original_path: PathBuf::from("/photos/2024/a.jpg"),
            deletion_date: Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap(),
        };
        let contents = info.to_file_contents();
        assert_eq!(
            contents,
            "[Trash Info]\nPath=/photos/2024/a.jpg\nDeletionDate=2025-03-04T05:06:07\n"
        );
        assert_eq!(TrashInfo::parse(&contents).unwrap(), info);
    }

    #[test]
    fn test_trash_info_rejects_incomplete_contents() {
        assert!(TrashInfo::parse("Path=/a.jpg").is_err());
        assert!(TrashInfo::parse("[Trash Info]\nPath=/a.jpg\n").is_err());
        assert!(TrashInfo::parse("[Trash Info]\nPath=/a.jpg\nDeletionDate=yesterday\n").is_err());
    }
}

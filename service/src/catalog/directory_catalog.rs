use std::{
    cmp::Reverse,
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, PoisonError, RwLock},
    time::SystemTime,
};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use core_types::{Item, ItemId, Locator};
use utils::{file_util, id_util};

use crate::{
    catalog::ItemCatalog,
    error::Error,
    file_system_ops::{FileSystemOps, StdFileSystemOps},
    library_trash::{LibraryTrash, TrashInfo},
};

#[derive(Debug, Clone)]
struct ScannedPhoto {
    id: ItemId,
    path: PathBuf,
    modified: Option<SystemTime>,
}

/// Catalog backed by a directory tree of photos.
///
/// Ids are derived from the path relative to the library root, so the same file
/// keeps its id between runs. Listing returns the most recently modified photos
/// first. The library's own trash directory is never listed.
pub struct DirectoryCatalog<F: FileSystemOps = StdFileSystemOps> {
    trash: LibraryTrash,
    retention: Duration,
    fs_ops: Arc<F>,
    index: RwLock<HashMap<ItemId, PathBuf>>,
}

impl DirectoryCatalog<StdFileSystemOps> {
    pub fn new(library_root: impl Into<PathBuf>, retention_days: i64) -> Result<Self, Error> {
        Self::new_with_fs_ops(library_root, retention_days, Arc::new(StdFileSystemOps))
    }
}

impl<F: FileSystemOps> DirectoryCatalog<F> {
    pub fn new_with_fs_ops(
        library_root: impl Into<PathBuf>,
        retention_days: i64,
        fs_ops: Arc<F>,
    ) -> Result<Self, Error> {
        let retention = Duration::try_days(retention_days).ok_or_else(|| {
            Error::SettingsError(format!(
                "Trash retention of {} days is out of range",
                retention_days
            ))
        })?;
        Ok(Self {
            trash: LibraryTrash::new(library_root),
            retention,
            fs_ops,
            index: RwLock::new(HashMap::new()),
        })
    }

    fn id_for_path(&self, path: &Path) -> Option<ItemId> {
        file_util::relative_key(self.trash.library_root(), path)
            .map(|key| id_util::item_id_for_key(&key))
    }

    fn scan(&self) -> Result<Vec<ScannedPhoto>, Error> {
        let mut photos = Vec::new();
        let mut dirs = vec![self.trash.library_root().to_path_buf()];

        while let Some(dir) = dirs.pop() {
            let entries = self.fs_ops.read_dir(&dir).map_err(|e| {
                Error::CatalogError(format!("Failed to read directory {}: {}", dir.display(), e))
            })?;

            for entry in entries {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        tracing::warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                        continue;
                    }
                };

                if entry.is_dir {
                    if !self.trash.contains(&entry.path) {
                        dirs.push(entry.path);
                    }
                } else if file_util::is_image_file(&entry.path) {
                    if let Some(id) = self.id_for_path(&entry.path) {
                        photos.push(ScannedPhoto {
                            id,
                            path: entry.path,
                            modified: entry.modified,
                        });
                    }
                }
            }
        }

        photos.sort_by(|a, b| {
            Reverse(a.modified)
                .cmp(&Reverse(b.modified))
                .then_with(|| a.path.cmp(&b.path))
        });
        Ok(photos)
    }

    fn rebuild_index(&self) -> Result<Vec<ItemId>, Error> {
        let photos = self.scan()?;
        let mut index: HashMap<ItemId, PathBuf> = HashMap::with_capacity(photos.len());
        let mut ids = Vec::with_capacity(photos.len());

        for photo in photos {
            if let Some(existing) = index.get(&photo.id) {
                tracing::warn!(
                    "Id {} of {} collides with {}, skipping",
                    photo.id,
                    photo.path.display(),
                    existing.display()
                );
                continue;
            }
            ids.push(photo.id);
            index.insert(photo.id, photo.path);
        }

        *self.index.write().unwrap_or_else(PoisonError::into_inner) = index;
        Ok(ids)
    }

    fn lookup(&self, id: ItemId) -> Option<PathBuf> {
        self.index
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    fn read_trash_entry(&self, info_path: &Path) -> Option<Item> {
        let trashed_file = self.trash.file_path_for_info(info_path)?;
        if !self.fs_ops.exists(&trashed_file) {
            tracing::warn!("Trash info {} has no trashed file", info_path.display());
            return None;
        }

        let info = match self
            .fs_ops
            .read_to_string(info_path)
            .map_err(Error::from)
            .and_then(|contents| TrashInfo::parse(&contents))
        {
            Ok(info) => info,
            Err(e) => {
                tracing::warn!("Skipping trash info {}: {}", info_path.display(), e);
                return None;
            }
        };

        let Some(id) = self.id_for_path(&info.original_path) else {
            tracing::warn!(
                "Trashed file {} did not come from this library",
                info.original_path.display()
            );
            return None;
        };

        let Some(expires_at) = self.expiry_for(info.deletion_date) else {
            tracing::warn!(
                "Skipping trash info {} with out of range deletion date {}",
                info_path.display(),
                info.deletion_date
            );
            return None;
        };
        Some(Item::in_system_trash(
            id,
            Locator::from_path(&trashed_file),
            expires_at,
        ))
    }

    fn expiry_for(&self, deletion_date: DateTime<Utc>) -> Option<DateTime<Utc>> {
        deletion_date.checked_add_signed(self.retention)
    }
}

#[async_trait]
impl<F: FileSystemOps + 'static> ItemCatalog for DirectoryCatalog<F> {
    async fn list_all_item_ids(&self) -> Result<Vec<ItemId>, Error> {
        let ids = self.rebuild_index()?;
        tracing::info!(
            "Found {} photos in {}",
            ids.len(),
            self.trash.library_root().display()
        );
        Ok(ids)
    }

    async fn resolve_location(&self, id: ItemId) -> Result<Locator, Error> {
        if let Some(path) = self.lookup(id) {
            return Ok(Locator::from_path(&path));
        }

        tracing::debug!("Item {} not indexed, rescanning library", id);
        self.rebuild_index()?;
        self.lookup(id)
            .map(|path| Locator::from_path(&path))
            .ok_or(Error::ItemNotFound(id))
    }

    async fn resolve_locations(
        &self,
        ids: &[ItemId],
    ) -> Result<Vec<Result<Locator, Error>>, Error> {
        if ids.iter().any(|id| self.lookup(*id).is_none()) {
            tracing::debug!(
                "Some of {} items not indexed, rescanning library",
                ids.len()
            );
            self.rebuild_index()?;
        }
        Ok(ids
            .iter()
            .map(|id| {
                self.lookup(*id)
                    .map(|path| Locator::from_path(&path))
                    .ok_or(Error::ItemNotFound(*id))
            })
            .collect())
    }

    async fn list_system_trash(&self) -> Result<Vec<Item>, Error> {
        let info_dir = self.trash.info_dir();
        if !self.fs_ops.exists(&info_dir) {
            return Ok(Vec::new());
        }

        let entries = self.fs_ops.read_dir(&info_dir).map_err(|e| {
            Error::CatalogError(format!(
                "Failed to read trash directory {}: {}",
                info_dir.display(),
                e
            ))
        })?;

        let mut items: Vec<Item> = entries
            .filter_map(|entry| match entry {
                Ok(entry) if !entry.is_dir => self.read_trash_entry(&entry.path),
                Ok(_) => None,
                Err(e) => {
                    tracing::warn!("Skipping unreadable trash entry: {}", e);
                    None
                }
            })
            .collect();

        items.sort_by(|a, b| a.expires_at.cmp(&b.expires_at).then_with(|| a.id.cmp(&b.id)));
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::file_system_ops::mock::MockFileSystemOps;

    fn catalog(mock_fs: &Arc<MockFileSystemOps>) -> DirectoryCatalog<MockFileSystemOps> {
        DirectoryCatalog::new_with_fs_ops("/photos", 30, mock_fs.clone()).unwrap()
    }

    fn id_of(key: &str) -> ItemId {
        id_util::item_id_for_key(key)
    }

    #[async_std::test]
    async fn test_lists_images_newest_first() {
        let mock_fs = Arc::new(MockFileSystemOps::new());
        mock_fs.add_file_modified_at("/photos/old.jpg", 100);
        mock_fs.add_file_modified_at("/photos/2024/new.png", 300);
        mock_fs.add_file_modified_at("/photos/2024/middle.JPG", 200);
        mock_fs.add_file_modified_at("/photos/notes.txt", 400);
        mock_fs.add_file_modified_at("/photos/.photo_cleaner_trash/files/x-gone.jpg", 500);

        let ids = catalog(&mock_fs).list_all_item_ids().await.unwrap();

        assert_eq!(
            ids,
            vec![id_of("2024/new.png"), id_of("2024/middle.JPG"), id_of("old.jpg")]
        );
    }

    #[async_std::test]
    async fn test_resolve_location() {
        let mock_fs = Arc::new(MockFileSystemOps::new());
        mock_fs.add_file("/photos/a.jpg");
        let catalog = catalog(&mock_fs);
        catalog.list_all_item_ids().await.unwrap();

        let locator = catalog.resolve_location(id_of("a.jpg")).await.unwrap();
        assert_eq!(locator, Locator::new("/photos/a.jpg"));

        // added after the last listing, found by rescanning
        mock_fs.add_file("/photos/b.jpg");
        let locator = catalog.resolve_location(id_of("b.jpg")).await.unwrap();
        assert_eq!(locator, Locator::new("/photos/b.jpg"));

        let missing = id_of("missing.jpg");
        assert_eq!(
            catalog.resolve_location(missing).await,
            Err(Error::ItemNotFound(missing))
        );
    }

    #[async_std::test]
    async fn test_resolve_locations_rescans_once() {
        let mock_fs = Arc::new(MockFileSystemOps::new());
        mock_fs.add_file("/photos/a.jpg");
        mock_fs.add_file("/photos/2024/b.jpg");
        let catalog = catalog(&mock_fs);

        let ids = [
            id_of("a.jpg"),
            id_of("gone-1.jpg"),
            id_of("2024/b.jpg"),
            id_of("gone-2.jpg"),
        ];
        let results = catalog.resolve_locations(&ids).await.unwrap();

        assert_eq!(
            results,
            vec![
                Ok(Locator::new("/photos/a.jpg")),
                Err(Error::ItemNotFound(ids[1])),
                Ok(Locator::new("/photos/2024/b.jpg")),
                Err(Error::ItemNotFound(ids[3])),
            ]
        );
        // the root and the 2024 subdirectory, read in a single scan
        assert_eq!(mock_fs.read_dir_calls(), 2);
    }

    #[async_std::test]
    async fn test_resolve_locations_without_misses_does_not_scan() {
        let mock_fs = Arc::new(MockFileSystemOps::new());
        mock_fs.add_file("/photos/a.jpg");
        let catalog = catalog(&mock_fs);
        catalog.list_all_item_ids().await.unwrap();
        let calls_after_listing = mock_fs.read_dir_calls();

        let results = catalog.resolve_locations(&[id_of("a.jpg")]).await.unwrap();
        assert_eq!(results, vec![Ok(Locator::new("/photos/a.jpg"))]);
        assert_eq!(mock_fs.read_dir_calls(), calls_after_listing);
    }

    #[test]
    fn test_out_of_range_retention_is_rejected() {
        let mock_fs = Arc::new(MockFileSystemOps::new());
        let res = DirectoryCatalog::new_with_fs_ops("/photos", 200_000_000_000_000, mock_fs);
        assert!(matches!(res, Err(Error::SettingsError(_))));
    }

    #[test]
    fn test_expiry_past_the_calendar_end_is_none() {
        let mock_fs = Arc::new(MockFileSystemOps::new());
        let catalog = catalog(&mock_fs);
        assert_eq!(catalog.expiry_for(DateTime::<Utc>::MAX_UTC), None);

        let trashed_at = Utc.with_ymd_and_hms(2025, 1, 10, 8, 0, 0).unwrap();
        assert_eq!(
            catalog.expiry_for(trashed_at),
            Some(trashed_at + Duration::days(30))
        );
    }

    #[async_std::test]
    async fn test_missing_library_is_a_catalog_error() {
        let mock_fs = Arc::new(MockFileSystemOps::new());
        let result = catalog(&mock_fs).list_all_item_ids().await;
        assert!(matches!(result, Err(Error::CatalogError(_))));
    }

    #[async_std::test]
    async fn test_list_system_trash() {
        let mock_fs = Arc::new(MockFileSystemOps::new());
        mock_fs.add_file("/photos/keep.jpg");

        let trashed_at = Utc.with_ymd_and_hms(2025, 1, 10, 8, 0, 0).unwrap();
        let trash = LibraryTrash::new("/photos");
        let trashed_file = trash.files_dir().join("u1-a.jpg");
        mock_fs.add_file(trashed_file.clone());
        mock_fs
            .write_file(
                &trash.info_path_for(&trashed_file).unwrap(),
                &TrashInfo {
                    original_path: PathBuf::from("/photos/2024/a.jpg"),
                    deletion_date: trashed_at,
                }
                .to_file_contents(),
            )
            .unwrap();
        // info without trashed file is ignored
        mock_fs
            .write_file(
                &trash.info_dir().join("u2-b.jpg.trashinfo"),
                &TrashInfo {
                    original_path: PathBuf::from("/photos/b.jpg"),
                    deletion_date: trashed_at,
                }
                .to_file_contents(),
            )
            .unwrap();

        let items = catalog(&mock_fs).list_system_trash().await.unwrap();

        assert_eq!(
            items,
            vec![Item::in_system_trash(
                id_of("2024/a.jpg"),
                Locator::from_path(&trashed_file),
                trashed_at + Duration::days(30),
            )]
        );
    }

    #[async_std::test]
    async fn test_list_system_trash_without_trash_dir() {
        let mock_fs = Arc::new(MockFileSystemOps::new());
        mock_fs.add_file("/photos/a.jpg");
        assert!(catalog(&mock_fs).list_system_trash().await.unwrap().is_empty());
    }
}

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use async_trait::async_trait;
use chrono::Utc;
use core_types::{AuthorizationOutcome, GatewayIntent, Locator, PendingAuthorization};
use utils::id_util::generate_random_uuid;

use crate::{
    error::Error,
    file_system_ops::{FileSystemOps, StdFileSystemOps},
    gateway::{DestructiveOperationGateway, GatewayResponse, LocatorResult, OperationReport},
    library_trash::{LibraryTrash, TrashInfo},
};

#[derive(Debug, Clone)]
struct PendingRequest {
    intent: GatewayIntent,
    locators: Vec<Locator>,
}

/// Gateway operating on a local photo library.
///
/// Trashing moves files into the library trash, deleting removes them and
/// restoring moves trashed files back to where they came from. With
/// `require_authorization` set, nothing happens until the request is resolved
/// as confirmed.
pub struct LocalFileGateway<F: FileSystemOps = StdFileSystemOps> {
    trash: LibraryTrash,
    fs_ops: Arc<F>,
    require_authorization: bool,
    pending: Mutex<HashMap<String, PendingRequest>>,
}

impl LocalFileGateway<StdFileSystemOps> {
    pub fn new(library_root: impl Into<PathBuf>, require_authorization: bool) -> Self {
        Self::new_with_fs_ops(
            library_root,
            require_authorization,
            Arc::new(StdFileSystemOps),
        )
    }
}

impl<F: FileSystemOps> LocalFileGateway<F> {
    pub fn new_with_fs_ops(
        library_root: impl Into<PathBuf>,
        require_authorization: bool,
        fs_ops: Arc<F>,
    ) -> Self {
        Self {
            trash: LibraryTrash::new(library_root),
            fs_ops,
            require_authorization,
            pending: Mutex::new(HashMap::new()),
        }
    }

    fn perform(&self, intent: GatewayIntent, locators: &[Locator]) -> OperationReport {
        tracing::info!("Performing {} on {} items", intent, locators.len());
        let results = locators
            .iter()
            .map(|locator| {
                let path = locator.to_path_buf();
                let res = match intent {
                    GatewayIntent::Trash => self.trash_file(&path),
                    GatewayIntent::Delete => self.delete_file(&path),
                    GatewayIntent::Restore => self.restore_file(&path),
                };
                match res {
                    Ok(()) => LocatorResult::succeeded(locator.clone()),
                    Err(e) => {
                        tracing::error!("Failed to {} {}: {}", intent, locator, e);
                        LocatorResult::failed(locator.clone(), e.to_string())
                    }
                }
            })
            .collect();
        OperationReport { results }
    }

    fn trash_file(&self, path: &Path) -> Result<(), Error> {
        if self.trash.contains(path) {
            return Err(Error::InvalidInput(format!(
                "{} is already in trash",
                path.display()
            )));
        }
        let file_name = path
            .file_name()
            .ok_or_else(|| Error::InvalidInput(format!("{} has no file name", path.display())))?
            .to_string_lossy();

        let target = self
            .trash
            .files_dir()
            .join(format!("{}-{}", generate_random_uuid(), file_name));
        let info_path = self.trash.info_path_for(&target).ok_or_else(|| {
            Error::InvalidInput(format!("Cannot name trash info for {}", target.display()))
        })?;
        let info = TrashInfo {
            original_path: path.to_path_buf(),
            deletion_date: Utc::now(),
        };

        // info first, a dangling info file is skipped when listing the trash
        self.fs_ops
            .write_file(&info_path, &info.to_file_contents())?;
        if let Err(e) = self.fs_ops.move_file(path, &target) {
            if let Err(cleanup_error) = self.fs_ops.remove_file(&info_path) {
                tracing::warn!(
                    "Failed to remove trash info {}: {}",
                    info_path.display(),
                    cleanup_error
                );
            }
            return Err(e.into());
        }
        tracing::debug!("Moved {} to {}", path.display(), target.display());
        Ok(())
    }

    fn delete_file(&self, path: &Path) -> Result<(), Error> {
        if self.fs_ops.exists(path) {
            self.fs_ops.remove_file(path)?;
            tracing::debug!("Deleted {}", path.display());
        } else {
            // user might have removed it manually
            tracing::info!("File {} does not exist, skipping deletion", path.display());
        }

        if self.trash.contains(path)
            && let Some(info_path) = self.trash.info_path_for(path)
            && self.fs_ops.exists(&info_path)
        {
            self.fs_ops.remove_file(&info_path)?;
        }
        Ok(())
    }

    fn restore_file(&self, path: &Path) -> Result<(), Error> {
        if !self.trash.contains(path) {
            return Err(Error::InvalidInput(format!(
                "{} is not in trash",
                path.display()
            )));
        }
        let info_path = self.trash.info_path_for(path).ok_or_else(|| {
            Error::InvalidInput(format!("{} has no trash info", path.display()))
        })?;
        let info = TrashInfo::parse(&self.fs_ops.read_to_string(&info_path)?)?;

        if self.fs_ops.exists(&info.original_path) {
            return Err(Error::IoError(format!(
                "Cannot restore, {} already exists",
                info.original_path.display()
            )));
        }

        self.fs_ops.move_file(path, &info.original_path)?;
        self.fs_ops.remove_file(&info_path)?;
        tracing::debug!(
            "Restored {} to {}",
            path.display(),
            info.original_path.display()
        );
        Ok(())
    }
}

#[async_trait]
impl<F: FileSystemOps + 'static> DestructiveOperationGateway for LocalFileGateway<F> {
    async fn execute(
        &self,
        intent: GatewayIntent,
        locators: &[Locator],
    ) -> Result<GatewayResponse, Error> {
        if locators.is_empty() {
            return Ok(GatewayResponse::Done(OperationReport::default()));
        }

        if !self.require_authorization {
            return Ok(GatewayResponse::Done(self.perform(intent, locators)));
        }

        let token = PendingAuthorization::new(generate_random_uuid());
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                token.token().to_string(),
                PendingRequest {
                    intent,
                    locators: locators.to_vec(),
                },
            );
        tracing::info!(
            "Request {} to {} {} items waits for authorization",
            token,
            intent,
            locators.len()
        );
        Ok(GatewayResponse::PendingAuthorization(token))
    }

    async fn resolve(
        &self,
        token: &PendingAuthorization,
        outcome: AuthorizationOutcome,
    ) -> Result<AuthorizationOutcome, Error> {
        let request = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token.token())
            .ok_or_else(|| Error::GatewayError(format!("Unknown authorization {}", token)))?;

        if outcome == AuthorizationOutcome::Cancelled {
            tracing::info!("Request {} was cancelled", token);
            return Ok(AuthorizationOutcome::Cancelled);
        }

        let report = self.perform(request.intent, &request.locators);
        if report.all_succeeded() {
            Ok(AuthorizationOutcome::Confirmed)
        } else {
            tracing::warn!(
                "Request {} failed for {} of {} items",
                token,
                report.failures().count(),
                report.results.len()
            );
            Ok(AuthorizationOutcome::Cancelled)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_system_ops::mock::MockFileSystemOps;

    fn gateway(
        mock_fs: &Arc<MockFileSystemOps>,
        require_authorization: bool,
    ) -> LocalFileGateway<MockFileSystemOps> {
        LocalFileGateway::new_with_fs_ops("/photos", require_authorization, mock_fs.clone())
    }

    fn trashed_files(mock_fs: &MockFileSystemOps) -> Vec<PathBuf> {
        let files_dir = LibraryTrash::new("/photos").files_dir();
        mock_fs
            .files()
            .into_iter()
            .filter(|p| p.starts_with(&files_dir))
            .collect()
    }

    #[async_std::test]
    async fn test_trash_immediately() {
        let mock_fs = Arc::new(MockFileSystemOps::new());
        mock_fs.add_file("/photos/a.jpg");
        let gateway = gateway(&mock_fs, false);

        let response = gateway
            .execute(GatewayIntent::Trash, &[Locator::new("/photos/a.jpg")])
            .await
            .unwrap();

        let GatewayResponse::Done(report) = response else {
            panic!("expected immediate execution");
        };
        assert!(report.all_succeeded());
        assert!(!mock_fs.exists(Path::new("/photos/a.jpg")));

        let trashed = trashed_files(&mock_fs);
        assert_eq!(trashed.len(), 1);
        let info_path = LibraryTrash::new("/photos")
            .info_path_for(&trashed[0])
            .unwrap();
        let info = TrashInfo::parse(&mock_fs.read_to_string(&info_path).unwrap()).unwrap();
        assert_eq!(info.original_path, PathBuf::from("/photos/a.jpg"));
    }

    #[async_std::test]
    async fn test_trash_then_restore() {
        let mock_fs = Arc::new(MockFileSystemOps::new());
        mock_fs.add_file("/photos/2024/a.jpg");
        let gateway = gateway(&mock_fs, false);

        gateway
            .execute(GatewayIntent::Trash, &[Locator::new("/photos/2024/a.jpg")])
            .await
            .unwrap();
        let trashed = trashed_files(&mock_fs);

        let response = gateway
            .execute(GatewayIntent::Restore, &[Locator::from_path(&trashed[0])])
            .await
            .unwrap();

        assert_eq!(
            response,
            GatewayResponse::Done(OperationReport {
                results: vec![LocatorResult::succeeded(Locator::from_path(&trashed[0]))]
            })
        );
        assert_eq!(mock_fs.files(), vec![PathBuf::from("/photos/2024/a.jpg")]);
    }

    #[async_std::test]
    async fn test_delete_removes_trash_info() {
        let mock_fs = Arc::new(MockFileSystemOps::new());
        mock_fs.add_file("/photos/a.jpg");
        let gateway = gateway(&mock_fs, false);

        gateway
            .execute(GatewayIntent::Trash, &[Locator::new("/photos/a.jpg")])
            .await
            .unwrap();
        let trashed = trashed_files(&mock_fs);
        gateway
            .execute(GatewayIntent::Delete, &[Locator::from_path(&trashed[0])])
            .await
            .unwrap();

        assert!(mock_fs.files().is_empty());
    }

    #[async_std::test]
    async fn test_partial_failure_is_reported() {
        let mock_fs = Arc::new(MockFileSystemOps::new());
        mock_fs.add_file("/photos/a.jpg");
        mock_fs.add_file("/photos/b.jpg");
        mock_fs.fail_on("/photos/b.jpg");
        let gateway = gateway(&mock_fs, false);

        let response = gateway
            .execute(
                GatewayIntent::Delete,
                &[Locator::new("/photos/a.jpg"), Locator::new("/photos/b.jpg")],
            )
            .await
            .unwrap();

        let GatewayResponse::Done(report) = response else {
            panic!("expected immediate execution");
        };
        assert!(!report.all_succeeded());
        let failures: Vec<_> = report.failures().map(|r| r.locator.clone()).collect();
        assert_eq!(failures, vec![Locator::new("/photos/b.jpg")]);
        assert!(mock_fs.was_deleted("/photos/a.jpg"));
    }

    #[async_std::test]
    async fn test_authorization_required() {
        let mock_fs = Arc::new(MockFileSystemOps::new());
        mock_fs.add_file("/photos/a.jpg");
        mock_fs.add_file("/photos/b.jpg");
        let gateway = gateway(&mock_fs, true);

        let response = gateway
            .execute(GatewayIntent::Delete, &[Locator::new("/photos/a.jpg")])
            .await
            .unwrap();
        let GatewayResponse::PendingAuthorization(token) = response else {
            panic!("expected authorization request");
        };
        assert!(mock_fs.exists(Path::new("/photos/a.jpg")));

        let outcome = gateway
            .resolve(&token, AuthorizationOutcome::Confirmed)
            .await
            .unwrap();
        assert_eq!(outcome, AuthorizationOutcome::Confirmed);
        assert!(mock_fs.was_deleted("/photos/a.jpg"));

        // tokens are single use
        assert!(
            gateway
                .resolve(&token, AuthorizationOutcome::Confirmed)
                .await
                .is_err()
        );

        let response = gateway
            .execute(GatewayIntent::Delete, &[Locator::new("/photos/b.jpg")])
            .await
            .unwrap();
        let GatewayResponse::PendingAuthorization(token) = response else {
            panic!("expected authorization request");
        };
        let outcome = gateway
            .resolve(&token, AuthorizationOutcome::Cancelled)
            .await
            .unwrap();
        assert_eq!(outcome, AuthorizationOutcome::Cancelled);
        assert!(mock_fs.exists(Path::new("/photos/b.jpg")));
    }

    #[async_std::test]
    async fn test_confirmed_batch_with_failure_resolves_cancelled() {
        let mock_fs = Arc::new(MockFileSystemOps::new());
        mock_fs.add_file("/photos/a.jpg");
        let gateway = gateway(&mock_fs, true);

        let response = gateway
            .execute(GatewayIntent::Restore, &[Locator::new("/photos/a.jpg")])
            .await
            .unwrap();
        let GatewayResponse::PendingAuthorization(token) = response else {
            panic!("expected authorization request");
        };

        let outcome = gateway
            .resolve(&token, AuthorizationOutcome::Confirmed)
            .await
            .unwrap();
        assert_eq!(outcome, AuthorizationOutcome::Cancelled);
    }
}

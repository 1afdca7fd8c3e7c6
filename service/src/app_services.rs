use std::{
    path::Path,
    sync::{Arc, OnceLock},
};

use database::{get_db_pool, repository_manager::RepositoryManager};

use crate::{
    catalog::directory_catalog::DirectoryCatalog,
    error::Error,
    gateway::local_file_gateway::LocalFileGateway,
    render_cache::{NoopRenderCache, RenderCache, ThumbnailRenderCache},
    review::ReviewPipeline,
    settings::{ReviewSettings, SettingsService},
    trash_ledger::sqlite_trash_ledger::SqliteTrashLedger,
};

pub async fn create_app_services() -> Result<Arc<AppServices>, Error> {
    let pool = get_db_pool().await?;
    let repository_manager = Arc::new(RepositoryManager::new(pool));
    Ok(Arc::new(AppServices::new(repository_manager)))
}

/// Wires the database backed services and the local photo library
/// collaborators together.
#[derive(Debug)]
pub struct AppServices {
    settings: OnceLock<Arc<SettingsService>>,
    repository_manager: Arc<RepositoryManager>,
}

impl AppServices {
    pub fn new(repository_manager: Arc<RepositoryManager>) -> Self {
        Self {
            settings: OnceLock::new(),
            repository_manager,
        }
    }

    pub fn settings(&self) -> Arc<SettingsService> {
        self.settings
            .get_or_init(|| Arc::new(SettingsService::new(Arc::clone(&self.repository_manager))))
            .clone()
    }

    /// Builds a review pipeline for the photo library at `library_root`.
    pub fn create_review_pipeline(
        &self,
        library_root: &Path,
        settings: ReviewSettings,
    ) -> Result<ReviewPipeline, Error> {
        settings.validate()?;
        if !library_root.is_dir() {
            return Err(Error::InvalidInput(format!(
                "Library root {} is not a directory",
                library_root.display()
            )));
        }

        let render_cache: Arc<dyn RenderCache> = match file_system::get_thumbnail_cache_dir() {
            Ok(dir) => Arc::new(ThumbnailRenderCache::new(dir)),
            Err(e) => {
                tracing::warn!("Thumbnail cache unavailable, prefetching disabled: {}", e);
                Arc::new(NoopRenderCache)
            }
        };

        tracing::info!(
            "Creating review pipeline for {} (authorization required: {})",
            library_root.display(),
            settings.require_authorization
        );
        ReviewPipeline::new(
            Arc::new(DirectoryCatalog::new(
                library_root,
                settings.trash_retention_days,
            )?),
            Arc::new(SqliteTrashLedger::new(Arc::clone(&self.repository_manager))),
            Arc::new(LocalFileGateway::new(
                library_root,
                settings.require_authorization,
            )),
            render_cache,
            settings,
        )
    }
}

use std::sync::Arc;

use sqlx::{Pool, Sqlite};

use crate::repository::{
    setting_repository::SettingRepository, trash_ledger_repository::TrashLedgerRepository,
};

#[derive(Debug)]
pub struct RepositoryManager {
    setting_repository: SettingRepository,
    trash_ledger_repository: TrashLedgerRepository,
}

impl RepositoryManager {
    pub fn new(pool: Arc<Pool<Sqlite>>) -> Self {
        let setting_repository = SettingRepository::new(pool.clone());
        let trash_ledger_repository = TrashLedgerRepository::new(pool);

        Self {
            setting_repository,
            trash_ledger_repository,
        }
    }

    pub fn settings(&self) -> &SettingRepository {
        &self.setting_repository
    }

    pub fn get_trash_ledger_repository(&self) -> &TrashLedgerRepository {
        &self.trash_ledger_repository
    }
}

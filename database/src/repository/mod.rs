pub mod setting_repository;
pub mod trash_ledger_repository;

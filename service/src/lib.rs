pub mod app_services;
pub mod catalog;
pub mod error;
pub mod file_system_ops;
pub mod gateway;
pub mod library_trash;
pub mod pipeline;
pub mod render_cache;
pub mod review;
pub mod session_load;
pub mod settings;
pub mod trash_ledger;

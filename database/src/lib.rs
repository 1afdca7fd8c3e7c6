pub mod database_error;
mod database_path;
pub mod repository;
pub mod repository_manager;

use std::{str::FromStr, sync::Arc};

use sqlx::{
    Pool, Sqlite, SqlitePool, migrate,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use crate::database_error::DatabaseError;

/// Opens (creating if missing) the application database and runs pending migrations.
pub async fn get_db_pool() -> Result<Arc<Pool<Sqlite>>, DatabaseError> {
    let db_url = database_path::get_database_url()?;
    tracing::info!("Opening database at {}", db_url);
    let options = SqliteConnectOptions::from_str(&db_url)?.create_if_missing(true);
    let pool = SqlitePool::connect_with(options).await?;
    migrate!("./migrations").run(&pool).await?;
    Ok(Arc::new(pool))
}

pub async fn setup_test_db() -> SqlitePool {
    // A single connection, every connection to sqlite::memory: is a new database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to connect to the in-memory SQLite database");

    migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

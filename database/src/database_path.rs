use std::env;

use file_system::get_database_path;

/// Returns the database URL in the format sqlite:///absolute/path/to/db.sqlite
///
/// `DATABASE_URL` from the environment or a `.env` file takes precedence.
pub fn get_database_url() -> std::io::Result<String> {
    dotenvy::dotenv().ok();
    if let Ok(env_url) = env::var("DATABASE_URL") {
        return Ok(env_url);
    }

    let db_path = get_database_path()?;

    Ok(format!("sqlite://{}", db_path.display()))
}

use std::{fs, io, path::PathBuf};

use directories_next::ProjectDirs;

/// Name of the directory inside a photo library that acts as its system trash.
pub const LIBRARY_TRASH_DIR_NAME: &str = ".photo_cleaner_trash";

/// Returns path to database file located in default data dir for application.
pub fn get_database_path() -> io::Result<PathBuf> {
    Ok(get_default_data_dir()?.join("db.sqlite"))
}

/// Returns path to the log directory located in default data dir for application.
pub fn get_log_dir() -> io::Result<PathBuf> {
    ensure_dir(get_default_data_dir()?.join("logs"))
}

/// Returns path to the thumbnail cache located in the platform cache dir.
pub fn get_thumbnail_cache_dir() -> io::Result<PathBuf> {
    let project_dirs = get_project_dirs()?;
    ensure_dir(project_dirs.cache_dir().join("thumbnails"))
}

fn get_default_data_dir() -> io::Result<PathBuf> {
    let project_dirs = get_project_dirs()?;
    ensure_dir(project_dirs.data_local_dir().to_path_buf())
}

fn ensure_dir(dir: PathBuf) -> io::Result<PathBuf> {
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn get_project_dirs() -> io::Result<ProjectDirs> {
    ProjectDirs::from("org", "photocleaner", "photo-cleaner")
        .ok_or_else(|| io::Error::other("could not determine project directory"))
}

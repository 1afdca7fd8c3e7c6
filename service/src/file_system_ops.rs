//! File system operations abstraction for testing
//!
//! The directory catalog and the local file gateway touch the photo library only
//! through [`FileSystemOps`], so both can be exercised without a real library.
//!
//! # Usage in Production
//!
//! ```rust,ignore
//! use service::catalog::directory_catalog::DirectoryCatalog;
//!
//! // Uses the default implementation (StdFileSystemOps)
//! let catalog = DirectoryCatalog::new(library_root, retention)?;
//! ```
//!
//! # Usage in Tests
//!
//! ```rust,ignore
//! use service::file_system_ops::mock::MockFileSystemOps;
//!
//! let mock_fs = Arc::new(MockFileSystemOps::new());
//! mock_fs.add_file("/photos/a.jpg");
//!
//! let catalog = DirectoryCatalog::new_with_fs_ops(root, retention, mock_fs.clone()).unwrap();
//!
//! // Verify the mock's state
//! assert!(mock_fs.exists(Path::new("/photos/a.jpg")));
//! ```

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct SimpleDirEntry {
    pub path: PathBuf,
    pub is_dir: bool,
    pub modified: Option<SystemTime>,
}

/// Trait for file system operations to enable testing
pub trait FileSystemOps: Send + Sync {
    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Remove a file at the given path
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Move a file from one path to another, creating the target directory
    fn move_file(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Read a small text file
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write a small text file, creating the parent directory
    fn write_file(&self, path: &Path, contents: &str) -> io::Result<()>;

    // For easier mocking we use our own SimpleDirEntry instead of std::fs::DirEntry and return
    // boxed iterator to avoid associated type complications.
    fn read_dir(
        &self,
        path: &Path,
    ) -> io::Result<Box<dyn Iterator<Item = Result<SimpleDirEntry, Error>>>>;
}

/// Production implementation using std::fs
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileSystemOps;

impl FileSystemOps for StdFileSystemOps {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    fn move_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        if let Some(parent) = to.parent() {
            std::fs::create_dir_all(parent)?
        }
        std::fs::rename(from, to)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write_file(&self, path: &Path, contents: &str) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?
        }
        std::fs::write(path, contents)
    }

    fn read_dir(
        &self,
        path: &Path,
    ) -> io::Result<Box<dyn Iterator<Item = Result<SimpleDirEntry, Error>>>> {
        let iter = std::fs::read_dir(path)?;
        Ok(Box::new(iter.map(|res| {
            let entry = res.map_err(Error::from)?;
            let metadata = entry.metadata().map_err(Error::from)?;
            Ok(SimpleDirEntry {
                path: entry.path(),
                is_dir: metadata.is_dir(),
                modified: metadata.modified().ok(),
            })
        })))
    }
}

//! Atomic file operations for TOML and JSON documents.
//!
//! Writes go to a temporary sibling and are renamed into place, so readers
//! only ever see a complete document. Read-modify-write cycles hold an
//! exclusive lock on a `.lock` sibling.

use serde::{Serialize, de::DeserializeOwned};
use sleuth_core::SleuthError;
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during atomic file operations.
#[derive(Debug, Error)]
pub enum AtomicFileError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("Failed to serialize {path}: {message}")]
    Serialize { path: PathBuf, message: String },
    #[error("Lock error on {path}: {message}")]
    Lock { path: PathBuf, message: String },
}

impl From<AtomicFileError> for SleuthError {
    fn from(err: AtomicFileError) -> Self {
        SleuthError::storage(err.to_string())
    }
}

/// On-disk encoding of an [`AtomicFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Toml,
    Json,
}

impl FileFormat {
    fn encode<T: Serialize>(self, data: &T) -> Result<String, String> {
        match self {
            FileFormat::Toml => toml::to_string_pretty(data).map_err(|e| e.to_string()),
            FileFormat::Json => serde_json::to_string_pretty(data).map_err(|e| e.to_string()),
        }
    }

    fn decode<T: DeserializeOwned>(self, content: &str) -> Result<T, String> {
        match self {
            FileFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            FileFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

/// A handle to a single document stored atomically on disk.
pub struct AtomicFile<T> {
    path: PathBuf,
    format: FileFormat,
    _phantom: PhantomData<T>,
}

impl<T> AtomicFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf, format: FileFormat) -> Self {
        Self {
            path,
            format,
            _phantom: PhantomData,
        }
    }

    pub fn toml(path: PathBuf) -> Self {
        Self::new(path, FileFormat::Toml)
    }

    pub fn json(path: PathBuf) -> Self {
        Self::new(path, FileFormat::Json)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and decodes the document.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded
    /// - `Ok(None)`: File doesn't exist or is empty
    /// - `Err`: Failed to read or decode the file
    pub fn load(&self) -> Result<Option<T>, AtomicFileError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        self.format
            .decode(&content)
            .map(Some)
            .map_err(|message| AtomicFileError::Parse {
                path: self.path.clone(),
                message,
            })
    }

    /// Encodes and writes the document via temp file + rename.
    pub fn save(&self, data: &T) -> Result<(), AtomicFileError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let encoded = self
            .format
            .encode(data)
            .map_err(|message| AtomicFileError::Serialize {
                path: self.path.clone(),
                message,
            })?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path).map_err(|e| self.io_error(e))?;
        tmp_file
            .write_all(encoded.as_bytes())
            .and_then(|_| tmp_file.sync_all())
            .map_err(|e| self.io_error(e))?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path).map_err(|e| self.io_error(e))
    }

    /// Performs a locked read-modify-write.
    ///
    /// `f` sees the current document (or `default_value` if there is none).
    /// Whatever `f` returns is handed back after the document has been saved;
    /// if `f` fails nothing is written.
    pub fn update<F, R, E>(&self, default_value: T, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut T) -> Result<R, E>,
        E: From<AtomicFileError>,
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut data = self.load()?.unwrap_or(default_value);
        let result = f(&mut data)?;
        self.save(&data)?;

        Ok(result)
    }

    /// Removes the document. Missing files are fine.
    pub fn remove(&self) -> Result<(), AtomicFileError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn temp_path(&self) -> Result<PathBuf, AtomicFileError> {
        let (Some(parent), Some(file_name)) = (self.path.parent(), self.path.file_name()) else {
            return Err(self.io_error(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Path has no parent directory or file name",
            )));
        };
        Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
    }

    fn io_error(&self, source: std::io::Error) -> AtomicFileError {
        AtomicFileError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// An exclusive lock on `<path>.lock`, released on drop.
struct FileLock {
    file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, AtomicFileError> {
        let lock_path = path.with_extension("lock");
        let lock_error = |message: String| AtomicFileError::Lock {
            path: lock_path.clone(),
            message,
        };

        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent).map_err(|e| lock_error(e.to_string()))?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| lock_error(e.to_string()))?;

        fs2::FileExt::lock_exclusive(&file)
            .map_err(|e| lock_error(format!("Failed to acquire lock: {}", e)))?;

        Ok(FileLock { file })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Counter {
        name: String,
        count: u32,
    }

    fn counter(count: u32) -> Counter {
        Counter {
            name: "test".to_string(),
            count,
        }
    }

    #[test]
    fn test_save_and_load_both_formats() {
        let temp_dir = TempDir::new().unwrap();
        for (file, format) in [("c.toml", FileFormat::Toml), ("c.json", FileFormat::Json)] {
            let atomic_file = AtomicFile::<Counter>::new(temp_dir.path().join(file), format);
            atomic_file.save(&counter(42)).unwrap();
            assert_eq!(atomic_file.load().unwrap(), Some(counter(42)));
        }
    }

    #[test]
    fn test_load_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let atomic_file = AtomicFile::<Counter>::toml(temp_dir.path().join("missing.toml"));
        assert!(atomic_file.load().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_file_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();

        let atomic_file = AtomicFile::<Counter>::json(path);
        assert!(matches!(
            atomic_file.load(),
            Err(AtomicFileError::Parse { .. })
        ));
    }

    #[test]
    fn test_update_returns_closure_result() {
        let temp_dir = TempDir::new().unwrap();
        let atomic_file = AtomicFile::<Counter>::toml(temp_dir.path().join("c.toml"));

        let after: Result<u32, AtomicFileError> = atomic_file.update(counter(0), |c| {
            c.count += 10;
            Ok(c.count)
        });
        assert_eq!(after.unwrap(), 10);

        let after: Result<u32, AtomicFileError> = atomic_file.update(counter(0), |c| {
            c.count += 5;
            Ok(c.count)
        });
        assert_eq!(after.unwrap(), 15);
        assert_eq!(atomic_file.load().unwrap().unwrap().count, 15);
    }

    #[test]
    fn test_failed_update_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let atomic_file = AtomicFile::<Counter>::toml(temp_dir.path().join("c.toml"));
        atomic_file.save(&counter(1)).unwrap();

        let result: Result<(), SleuthError> = atomic_file.update(counter(0), |c| {
            c.count = 99;
            Err(SleuthError::validation("nope"))
        });
        assert!(result.is_err());
        assert_eq!(atomic_file.load().unwrap().unwrap().count, 1);
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("c.toml");
        AtomicFile::<Counter>::toml(file_path.clone())
            .save(&counter(1))
            .unwrap();

        assert!(file_path.exists());
        assert!(!temp_dir.path().join(".c.toml.tmp").exists());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let atomic_file = AtomicFile::<Counter>::toml(temp_dir.path().join("c.toml"));
        atomic_file.save(&counter(1)).unwrap();
        atomic_file.remove().unwrap();
        atomic_file.remove().unwrap();
        assert!(atomic_file.load().unwrap().is_none());
    }
}

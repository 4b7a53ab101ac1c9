use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::debug;
use crate::error::{Error, Result};

/// Loading and saving of user files
pub trait FileAccess {
    /// Reads a file refusing anything bigger than `limit` bytes
    ///
    /// # Errors
    /// * `FileTooLarge` - the file exceeds the limit
    /// * `FileReadError` - the file cannot be read
    fn read_bytes(&self, path: &Path, limit: u64) -> Result<Vec<u8>>;

    /// Stores `contents` under `filename`, returning where it was written
    fn write_file(&self, filename: &str, contents: &[u8]) -> Result<PathBuf>;

    /// Reads a UTF-8 text file refusing anything bigger than `limit` bytes
    fn read_text_file(&self, path: &Path, limit: u64) -> Result<String> {
        let bytes = self.read_bytes(path, limit)?;
        String::from_utf8(bytes).map_err(|e| Error::FileReadError {
            file: path.to_string_lossy().to_string(),
            cause: e.to_string(),
        })
    }

    fn write_text_file(&self, text: &str, filename: &str) -> Result<PathBuf> {
        self.write_file(filename, text.as_bytes())
    }
}

/// File access backed by the file system. Relative file names are written
/// into the output directory.
#[derive(Debug, Clone)]
pub struct FsFileAccess {
    output_dir: PathBuf,
}

impl FsFileAccess {
    pub fn new<P: Into<PathBuf>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl FileAccess for FsFileAccess {
    fn read_bytes(&self, path: &Path, limit: u64) -> Result<Vec<u8>> {
        let read_error = |e: std::io::Error| Error::FileReadError {
            file: path.to_string_lossy().to_string(),
            cause: e.to_string(),
        };
        let size = fs::metadata(path).map_err(read_error)?.len();
        check_size(path, size, limit)?;
        fs::read(path).map_err(read_error)
    }

    fn write_file(&self, filename: &str, contents: &[u8]) -> Result<PathBuf> {
        let path = self.output_dir.join(filename);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        debug!("Wrote {} bytes to {}", contents.len(), path.display());
        Ok(path)
    }
}

/// In-memory file access for tests and headless use
#[derive(Debug, Default)]
pub struct MemoryFileAccess {
    files: RefCell<BTreeMap<PathBuf, Vec<u8>>>,
}

impl MemoryFileAccess {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file<P: Into<PathBuf>, C: Into<Vec<u8>>>(self, path: P, contents: C) -> Self {
        self.files.borrow_mut().insert(path.into(), contents.into());
        self
    }

    pub fn contents(&self, path: &str) -> Option<Vec<u8>> {
        self.files.borrow().get(Path::new(path)).cloned()
    }
}

impl FileAccess for MemoryFileAccess {
    fn read_bytes(&self, path: &Path, limit: u64) -> Result<Vec<u8>> {
        let files = self.files.borrow();
        let contents = files.get(path).ok_or_else(|| Error::FileReadError {
            file: path.to_string_lossy().to_string(),
            cause: "no such file".to_string(),
        })?;
        check_size(path, contents.len() as u64, limit)?;
        Ok(contents.clone())
    }

    fn write_file(&self, filename: &str, contents: &[u8]) -> Result<PathBuf> {
        let path = PathBuf::from(filename);
        self.files.borrow_mut().insert(path.clone(), contents.to_vec());
        Ok(path)
    }
}

fn check_size(path: &Path, size: u64, limit: u64) -> Result<()> {
    if size > limit {
        return Err(Error::FileTooLarge {
            file: path.to_string_lossy().to_string(),
            size,
            limit,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_fs_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let files = FsFileAccess::new(dir.path());
        let path = files.write_text_file("hello", "nested/out.txt")?;
        assert_eq!(path, dir.path().join("nested/out.txt"));
        assert_eq!(files.read_text_file(&path, 100)?, "hello");
        Ok(())
    }

    #[test]
    fn test_size_limit() -> Result<()> {
        let dir = tempdir()?;
        let files = FsFileAccess::new(dir.path());
        let path = files.write_file("big.bin", &[0u8; 64])?;
        assert!(matches!(
            files.read_bytes(&path, 63),
            Err(Error::FileTooLarge { size: 64, limit: 63, .. })
        ));
        assert!(matches!(
            files.read_bytes(&dir.path().join("missing.txt"), 10),
            Err(Error::FileReadError { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_invalid_utf8() {
        let files = MemoryFileAccess::new().with_file("bin", vec![0xff, 0xfe]);
        assert!(matches!(
            files.read_text_file(Path::new("bin"), 10),
            Err(Error::FileReadError { .. })
        ));
    }

    #[test]
    fn test_memory_files() {
        let files = MemoryFileAccess::new();
        files.write_text_file("data", "todos.json").unwrap();
        assert_eq!(files.contents("todos.json"), Some(b"data".to_vec()));
        assert!(matches!(
            files.read_text_file(Path::new("todos.json"), 2),
            Err(Error::FileTooLarge { .. })
        ));
    }
}

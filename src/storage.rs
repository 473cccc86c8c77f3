//! File access collaborator.
//!
//! The build core never touches the filesystem directly. Reads (config and
//! templates) and writes (generated pages) go through [`Storage`], so tests can
//! substitute an in-memory store and count reads.

use std::fs;
use std::io;
use std::path::Path;

/// Read/write capability handed to the loader, the template cache and the
/// build driver.
pub trait Storage {
    /// Full contents of the file at `path`.
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Create or truncate the file at `path` with `contents`.
    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()>;
}

/// [`Storage`] on the local filesystem.
///
/// Writes create any missing parent directories first.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStorage;

impl Storage for FsStorage {
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// In-memory store that records every read and write.
    #[derive(Default)]
    pub struct MockStorage {
        pub files: Mutex<HashMap<PathBuf, Vec<u8>>>,
        pub reads: Mutex<Vec<PathBuf>>,
        pub writes: Mutex<Vec<PathBuf>>,
        pub fail_writes: bool,
    }

    impl MockStorage {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_file(self, path: impl Into<PathBuf>, contents: &str) -> Self {
            self.files
                .lock()
                .unwrap()
                .insert(path.into(), contents.as_bytes().to_vec());
            self
        }

        pub fn failing_writes(mut self) -> Self {
            self.fail_writes = true;
            self
        }

        /// Number of underlying reads of `path`.
        pub fn read_count(&self, path: impl AsRef<Path>) -> usize {
            let path = path.as_ref();
            self.reads.lock().unwrap().iter().filter(|p| *p == path).count()
        }

        pub fn written(&self) -> Vec<PathBuf> {
            self.writes.lock().unwrap().clone()
        }

        /// Contents of a file as UTF-8. Panics if it does not exist.
        pub fn contents(&self, path: impl AsRef<Path>) -> String {
            let path = path.as_ref();
            let files = self.files.lock().unwrap();
            let bytes = files
                .get(path)
                .unwrap_or_else(|| panic!("no file at {}", path.display()));
            String::from_utf8(bytes.clone()).unwrap()
        }
    }

    impl Storage for MockStorage {
        fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
            self.reads.lock().unwrap().push(path.to_path_buf());
            self.files
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
        }

        fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
            if self.fail_writes {
                return Err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    path.display().to_string(),
                ));
            }
            self.writes.lock().unwrap().push(path.to_path_buf());
            self.files
                .lock()
                .unwrap()
                .insert(path.to_path_buf(), contents.to_vec());
            Ok(())
        }
    }

    #[test]
    fn fs_storage_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("page.html");
        FsStorage.write_file(&path, b"<p>hi</p>").unwrap();
        assert_eq!(FsStorage.read_file(&path).unwrap(), b"<p>hi</p>");
    }

    #[test]
    fn fs_storage_creates_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out/nested/index.html");
        FsStorage.write_file(&path, b"x").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn fs_storage_missing_file_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = FsStorage.read_file(&tmp.path().join("nope.html")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn mock_counts_reads_per_path() {
        let storage = MockStorage::new().with_file("a.html", "A");
        storage.read_file(Path::new("a.html")).unwrap();
        storage.read_file(Path::new("a.html")).unwrap();
        assert!(storage.read_file(Path::new("b.html")).is_err());
        assert_eq!(storage.read_count("a.html"), 2);
        assert_eq!(storage.read_count("b.html"), 1);
    }
}

//! File-backed durable medium.
//!
//! One file per key under a directory. Keys are percent-encoded into file
//! names so any key string maps to a single flat file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tracing::debug;

use crate::error::{Result, StorageError};
use crate::storage::DurableMedium;

const EXTENSION: &str = "json";

/// Bytes escaped in file names: everything outside `[A-Za-z0-9_-]`.
const KEY_ESCAPES: &AsciiSet = &NON_ALPHANUMERIC.remove(b'_').remove(b'-');

/// A durable medium storing each key as a file in `dir`.
#[derive(Debug, Clone)]
pub struct FileMedium {
    dir: PathBuf,
    quota_bytes: usize,
}

impl FileMedium {
    /// Opens (creating if needed) the directory `dir` with a byte quota.
    pub fn open(dir: impl Into<PathBuf>, quota_bytes: usize) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        debug!("Opened file medium at {}", dir.display());
        Ok(Self { dir, quota_bytes })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", encode_key(key), EXTENSION))
    }

    fn entries(&self) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some(EXTENSION) {
                paths.push(path);
            }
        }
        Ok(paths)
    }

    /// Bytes currently stored, excluding the file at `skip`.
    fn used_bytes_except(&self, skip: &Path) -> Result<usize> {
        let mut used = 0;
        for path in self.entries()? {
            if path != skip {
                used += fs::metadata(&path)?.len() as usize;
            }
        }
        Ok(used)
    }
}

impl DurableMedium for FileMedium {
    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let needed = self.used_bytes_except(&path)? + value.len();
        if needed > self.quota_bytes {
            return Err(StorageError::QuotaExceeded {
                key: key.to_string(),
                needed,
                limit: self.quota_bytes,
            });
        }

        // Write beside the target and rename so readers never see a torn file
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn get_item(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn clear(&self) -> Result<()> {
        for path in self.entries()? {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

fn encode_key(key: &str) -> String {
    utf8_percent_encode(key, KEY_ESCAPES).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn medium(quota: usize) -> (tempfile::TempDir, FileMedium) {
        let dir = tempfile::tempdir().unwrap();
        let medium = FileMedium::open(dir.path().join("store"), quota).unwrap();
        (dir, medium)
    }

    #[test]
    fn test_encode_key() {
        assert_eq!(encode_key("shopping_cart"), "shopping_cart");
        assert_eq!(encode_key("a/b c"), "a%2Fb%20c");
        assert_eq!(encode_key("../x"), "%2E%2E%2Fx");
    }

    #[test]
    fn test_set_get_remove() {
        let (_dir, medium) = medium(1024);

        medium.set_item("products", "[1,2,3]").unwrap();
        assert_eq!(medium.get_item("products").unwrap().as_deref(), Some("[1,2,3]"));

        medium.remove_item("products").unwrap();
        assert_eq!(medium.get_item("products").unwrap(), None);
        medium.remove_item("products").unwrap();
    }

    #[test]
    fn test_survives_reopen() {
        let (dir, medium) = medium(1024);
        medium.set_item("shopping_cart", "{}").unwrap();
        drop(medium);

        let reopened = FileMedium::open(dir.path().join("store"), 1024).unwrap();
        assert_eq!(reopened.get_item("shopping_cart").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_quota() {
        let (_dir, medium) = medium(8);

        medium.set_item("a", "12345").unwrap();
        assert!(matches!(
            medium.set_item("b", "12345"),
            Err(StorageError::QuotaExceeded { needed: 10, limit: 8, .. })
        ));
        // Replacing an existing key only counts the new size
        medium.set_item("a", "12345678").unwrap();
    }

    #[test]
    fn test_clear_only_touches_entries() {
        let (_dir, medium) = medium(1024);
        medium.set_item("a", "1").unwrap();
        medium.set_item("b", "2").unwrap();
        fs::write(medium.dir().join("README"), "keep").unwrap();

        medium.clear().unwrap();

        assert_eq!(medium.get_item("a").unwrap(), None);
        assert_eq!(medium.get_item("b").unwrap(), None);
        assert!(medium.dir().join("README").exists());
    }
}

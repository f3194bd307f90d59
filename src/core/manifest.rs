//! Manifest persistence
//!
//! The resolved lesson URLs are written to a plain text side file, one URL
//! per line. Its presence is the signal that discovery already ran and can
//! be skipped on later invocations.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::core::error::Result;

/// Reads and writes the lesson URL manifest.
pub struct ManifestStore {
    path: PathBuf,
}

impl ManifestStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a previous discovery pass left a manifest behind.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Write the URLs in input order, one per line, overwriting any
    /// previous manifest.
    pub fn write(&self, urls: &[String]) -> Result<()> {
        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        for url in urls {
            writeln!(writer, "{url}")?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Read the URLs back in file order, skipping empty lines.
    pub fn read(&self) -> Result<Vec<String>> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);

        let mut urls = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if !line.is_empty() {
                urls.push(line);
            }
        }
        Ok(urls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Error;
    use tempfile::tempdir;

    fn sample_urls() -> Vec<String> {
        vec![
            "https://courses.example.com/series/alpha/episodes/1".to_string(),
            "https://courses.example.com/series/alpha/episodes/2".to_string(),
            "https://courses.example.com/lessons/beta".to_string(),
        ]
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let dir = tempdir().unwrap();
        let store = ManifestStore::new(dir.path().join("lessons.txt"));

        assert!(!store.exists());
        store.write(&sample_urls()).unwrap();
        assert!(store.exists());
        assert_eq!(store.read().unwrap(), sample_urls());
    }

    #[test]
    fn test_write_overwrites_previous_manifest() {
        let dir = tempdir().unwrap();
        let store = ManifestStore::new(dir.path().join("lessons.txt"));

        store.write(&sample_urls()).unwrap();
        let shorter = vec!["https://courses.example.com/lessons/beta".to_string()];
        store.write(&shorter).unwrap();
        assert_eq!(store.read().unwrap(), shorter);
    }

    #[test]
    fn test_read_skips_empty_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lessons.txt");
        std::fs::write(&path, "https://a.example.com/1\n\nhttps://a.example.com/2\n").unwrap();

        let store = ManifestStore::new(&path);
        assert_eq!(
            store.read().unwrap(),
            vec!["https://a.example.com/1", "https://a.example.com/2"]
        );
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let store = ManifestStore::new(dir.path().join("absent.txt"));
        match store.read() {
            Err(Error::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("expected Io error, got {other:?}"),
        }
    }
}

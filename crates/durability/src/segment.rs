//! Segment descriptor
//!
//! A [`Segment`] names one on-disk log file. Creating, rotating and retiring
//! segments is the storage engine's business; this type only opens an
//! existing file for reading and supplies its path for error reports.

use crate::entry::EntryKind;
use crate::reader::EntryReader;
use seglog_core::{ReaderConfig, Result};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

/// One segment file of the log
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment {
    id: u64,
    path: PathBuf,
}

impl Segment {
    /// Describe segment `id` stored at `path`
    pub fn new(id: u64, path: impl Into<PathBuf>) -> Self {
        Segment {
            id,
            path: path.into(),
        }
    }

    /// Segment identifier assigned by the storage engine
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Path of the segment file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the segment file read-only
    pub fn open(&self) -> io::Result<File> {
        File::open(&self.path)
    }

    /// Current size of the segment file in bytes
    pub fn len(&self) -> io::Result<u64> {
        Ok(std::fs::metadata(&self.path)?.len())
    }

    /// Check whether the segment file is empty
    pub fn is_empty(&self) -> io::Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Open the file and build a reader positioned at `offset`
    pub fn reader<K: EntryKind>(
        &self,
        kind: K,
        config: &ReaderConfig,
        offset: u64,
    ) -> Result<EntryReader<K, File>> {
        let file = self.open()?;
        EntryReader::new(self.clone(), kind, file, offset, config)
    }
}

//! Segment replay for crash recovery
//!
//! Drives an [`EntryReader`] over one segment, applying every entry to a
//! caller-supplied callback. The reader only detects damage; what to do
//! about it is chosen here with [`CorruptionPolicy`]:
//!
//! - `Fail`: return the error, leave the file alone
//! - `TruncateAtLastValid`: cut the file at the end of the last valid entry
//!   and report the replay as successful
//!
//! A torn tail (a partial record at the end of the file, left by a crash
//! mid-append) is not corruption. It is reported in [`ReplayStats`] and is
//! cut only when `truncate_torn_tail` is set.

use crate::entry::EntryKind;
use crate::segment::Segment;
use seglog_core::{Error, ReaderConfig, Result};
use std::fs::OpenOptions;
use std::path::Path;
use tracing::{debug, info, warn};

/// What replay does when it meets a corrupt record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorruptionPolicy {
    /// Propagate the corruption error
    #[default]
    Fail,
    /// Truncate the segment at the last valid offset and stop
    TruncateAtLastValid,
}

/// Replay options
#[derive(Debug, Clone, Default)]
pub struct ReplayOptions {
    /// Handling of corrupt records
    pub policy: CorruptionPolicy,
    /// Whether to cut a partial trailing record from the file
    pub truncate_torn_tail: bool,
    /// Read buffer settings
    pub reader: ReaderConfig,
}

impl ReplayOptions {
    /// Fail on corruption, never modify the segment
    pub fn strict() -> Self {
        ReplayOptions {
            policy: CorruptionPolicy::Fail,
            truncate_torn_tail: false,
            ..Default::default()
        }
    }

    /// Truncate on corruption or torn tail so the segment can be appended to
    pub fn repair() -> Self {
        ReplayOptions {
            policy: CorruptionPolicy::TruncateAtLastValid,
            truncate_torn_tail: true,
            ..Default::default()
        }
    }
}

/// Replay result
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReplayStats {
    /// Entries applied
    pub entries: u64,
    /// Encoded bytes of the applied entries
    pub bytes: u64,
    /// Offset replay started at
    pub start_offset: u64,
    /// Offset just past the last applied entry
    pub end_offset: u64,
    /// Segment length before any truncation
    pub segment_len: u64,
    /// Bytes removed from the end of the segment
    pub truncated_bytes: u64,
    /// Offset of the corrupt record that stopped replay, if any
    pub corruption_offset: Option<u64>,
}

impl ReplayStats {
    /// Bytes after the last applied entry that were not replayed
    pub fn trailing_bytes(&self) -> u64 {
        self.segment_len.saturating_sub(self.end_offset)
    }

    /// Check if replay met a torn tail or corruption
    pub fn has_issues(&self) -> bool {
        self.corruption_offset.is_some() || self.trailing_bytes() > 0
    }

    /// Human-readable summary
    pub fn summary(&self) -> String {
        let corruption = match self.corruption_offset {
            Some(offset) => format!("corrupt record at {}", offset),
            None => "no corruption".to_string(),
        };
        format!(
            "Replayed {} entries ({} bytes) from offset {} to {}, {} trailing bytes, {} truncated, {}",
            self.entries,
            self.bytes,
            self.start_offset,
            self.end_offset,
            self.trailing_bytes(),
            self.truncated_bytes,
            corruption
        )
    }
}

/// Replay driver for one segment
pub struct SegmentReplay;

impl SegmentReplay {
    /// Replay `segment` from `from_offset`, calling `apply` with the start
    /// offset and value of each entry in file order.
    ///
    /// Errors returned by `apply` stop replay and are propagated.
    pub fn replay<K, F>(
        segment: &Segment,
        kind: K,
        from_offset: u64,
        options: &ReplayOptions,
        mut apply: F,
    ) -> Result<ReplayStats>
    where
        K: EntryKind,
        F: FnMut(u64, K::Entry) -> Result<()>,
    {
        let mut stats = ReplayStats {
            start_offset: from_offset,
            end_offset: from_offset,
            segment_len: segment.len()?,
            ..Default::default()
        };
        info!(
            "Replaying {} from offset {} ({} bytes)",
            segment.path().display(),
            from_offset,
            stats.segment_len
        );

        let mut reader = segment.reader(kind, &options.reader, from_offset)?;
        loop {
            match reader.has_next() {
                Ok(true) => {
                    let entry = reader.next_entry()?;
                    let span = reader.current().ok_or(Error::EmptyStream)?;
                    apply(span.offset, entry)?;
                    stats.entries += 1;
                    stats.bytes += span.len as u64;
                    stats.end_offset = span.end();
                }
                Ok(false) => break,
                Err(err)
                    if err.is_corruption()
                        && options.policy == CorruptionPolicy::TruncateAtLastValid =>
                {
                    warn!(
                        "Corruption in {} ({}), truncating at offset {}",
                        segment.path().display(),
                        err,
                        reader.position()
                    );
                    stats.corruption_offset = err.offset();
                    stats.end_offset = reader.position();
                    stats.truncated_bytes = truncate(segment.path(), stats.end_offset)?;
                    info!("{}", stats.summary());
                    return Ok(stats);
                }
                Err(err) => return Err(err),
            }
        }

        let trailing = stats.trailing_bytes();
        if trailing > 0 {
            if options.truncate_torn_tail {
                warn!(
                    "Torn tail of {} bytes in {}, truncating at offset {}",
                    trailing,
                    segment.path().display(),
                    stats.end_offset
                );
                stats.truncated_bytes = truncate(segment.path(), stats.end_offset)?;
            } else {
                debug!(
                    "Ignoring {} trailing bytes in {} after offset {}",
                    trailing,
                    segment.path().display(),
                    stats.end_offset
                );
            }
        }

        info!("{}", stats.summary());
        Ok(stats)
    }

    /// Replay `segment` and collect every entry with its offset
    pub fn collect<K: EntryKind>(
        segment: &Segment,
        kind: K,
        from_offset: u64,
        options: &ReplayOptions,
    ) -> Result<(Vec<(u64, K::Entry)>, ReplayStats)> {
        let mut entries = Vec::new();
        let stats = Self::replay(segment, kind, from_offset, options, |offset, entry| {
            entries.push((offset, entry));
            Ok(())
        })?;
        Ok((entries, stats))
    }
}

/// Cut the file at `offset` and sync, returning the number of bytes removed
fn truncate(path: &Path, offset: u64) -> Result<u64> {
    let file = OpenOptions::new().write(true).open(path)?;
    let len = file.metadata()?.len();
    if len <= offset {
        return Ok(0);
    }
    file.set_len(offset)?;
    file.sync_all()?;
    Ok(len - offset)
}

//! # seglog
//!
//! Validated, seekable entry streams over append-only log segments.
//!
//! A storage engine writes its log as a sequence of segment files, each a
//! run of length-prefixed, checksummed records. On restart it replays those
//! records to rebuild state. seglog owns the read side of that contract:
//! turning a segment's bytes back into validated entries, telling a torn
//! tail (normal after a crash) apart from corruption (never silently
//! skipped).
//!
//! ## Quick Start
//!
//! ```ignore
//! use seglog::prelude::*;
//!
//! let segment = Segment::new(1, "/data/wal/segment-000001.log");
//! let mut reader = segment.reader(FramedRecordKind::default(), &ReaderConfig::default(), 0)?;
//!
//! while reader.has_next()? {
//!     let record = reader.next_entry()?;
//!     apply(record.payload());
//! }
//!
//! // Jump back to a known record boundary
//! reader.reset(checkpoint_offset)?;
//! ```
//!
//! ## Replay
//!
//! [`SegmentReplay`] drives a reader over a whole segment and applies the
//! caller's [`CorruptionPolicy`]: fail, or truncate the segment at the last
//! valid offset.
//!
//! ## Custom record formats
//!
//! The reader is generic over [`EntryKind`]. [`FramedRecordKind`] is the
//! built-in format (u32 length, u32 CRC32, payload).

#![warn(missing_docs)]

pub mod prelude;

// Re-export error and configuration
pub use seglog_core::{Error, ReaderConfig, Result};

// Re-export the read path
pub use seglog_durability::{
    ByteSource, CorruptionPolicy, DecodeError, EntryKind, EntryReader, FramedRecord,
    FramedRecordKind, ReadBuffer, ReaderStats, RecordSpan, ReplayOptions, ReplayStats, Segment,
    SegmentReplay, FRAME_HEADER_SIZE,
};

//! Durability layer for seglog
//!
//! This crate turns the bytes of an on-disk log segment back into records
//! for recovery:
//! - EntryReader: buffered lookahead iterator of validated entries
//! - EntryKind: record format plug-in (header size, completeness, decode, checksum)
//! - ReadBuffer: explicit-cursor buffer with compact-and-refill
//! - FramedRecord: length-prefixed, CRC32-checked record format
//! - SegmentReplay: replay driver with corruption and torn-tail handling

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod buffer;
pub mod entry;
pub mod reader;
pub mod record;
pub mod replay;
pub mod segment;
pub mod source;

pub use buffer::ReadBuffer;
pub use entry::{DecodeError, EntryKind};
pub use reader::{EntryReader, ReaderStats, RecordSpan};
pub use record::{FramedRecord, FramedRecordKind, DEFAULT_MAX_PAYLOAD, FRAME_HEADER_SIZE};
pub use replay::{CorruptionPolicy, ReplayOptions, ReplayStats, SegmentReplay};
pub use segment::Segment;
pub use source::ByteSource;

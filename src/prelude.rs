//! Convenient imports for seglog.
//!
//! This module re-exports the most commonly used types so replay code can get
//! started with a single import:
//!
//! ```ignore
//! use seglog::prelude::*;
//!
//! let segment = Segment::new(1, "/data/wal/segment-000001.log");
//! let stats = SegmentReplay::replay(
//!     &segment,
//!     FramedRecordKind::default(),
//!     0,
//!     &ReplayOptions::strict(),
//!     |_offset, record| apply(record),
//! )?;
//! ```

// Error handling and configuration
pub use crate::{Error, ReaderConfig, Result};

// Reading
pub use crate::{ByteSource, EntryKind, EntryReader, Segment};

// Built-in record format
pub use crate::{FramedRecord, FramedRecordKind};

// Replay
pub use crate::{CorruptionPolicy, ReplayOptions, SegmentReplay};

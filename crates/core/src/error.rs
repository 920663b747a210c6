//! Error types for segment reading
//!
//! Every fallible operation in the workspace returns [`Result`]. The variants
//! keep the three outcomes a recovery caller has to tell apart separate at the
//! type level:
//!
//! - I/O failure of the underlying byte source ([`Error::Io`])
//! - Data-integrity failure of a complete record ([`Error::Corruption`],
//!   [`Error::Decode`])
//! - A record the reader's limits cannot hold ([`Error::EntryTooLarge`]).
//!   The record may be perfectly valid, so this is never corruption.
//! - Contract violation by the caller ([`Error::EmptyStream`])
//!
//! End of stream is not an error and has no variant.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading entries from a segment
#[derive(Debug, Error)]
pub enum Error {
    /// Seek or read on the byte source failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A structurally complete record failed checksum validation
    #[error("{} has bad data at offset {offset}", path.display())]
    Corruption {
        /// Segment file the record was read from
        path: PathBuf,
        /// File offset of the first byte of the record
        offset: u64,
    },

    /// The entry kind rejected a record it had reported as complete
    #[error("{} has an undecodable record at offset {offset}: {reason}", path.display())]
    Decode {
        /// Segment file the record was read from
        path: PathBuf,
        /// File offset of the first byte of the record
        offset: u64,
        /// Why decoding failed
        reason: String,
    },

    /// A single record does not fit in the largest allowed read buffer
    ///
    /// Says nothing about the record's integrity. Retry with a larger
    /// `max_buffer_size`.
    #[error(
        "{} has a record at offset {offset} larger than the maximum buffer size of {capacity} bytes",
        path.display()
    )]
    EntryTooLarge {
        /// Segment file the record was read from
        path: PathBuf,
        /// File offset of the first byte of the record
        offset: u64,
        /// Buffer capacity that was exhausted
        capacity: usize,
    },

    /// `next` was called with no entry available
    #[error("no entry available: stream is exhausted")]
    EmptyStream,

    /// Reader configuration is unusable
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for segment reading operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error reports damaged segment data.
    ///
    /// Corrupt data is fatal to the read, but records returned before it
    /// remain valid. A caller may choose to truncate the segment at the last
    /// good offset.
    pub fn is_corruption(&self) -> bool {
        matches!(self, Error::Corruption { .. } | Error::Decode { .. })
    }

    /// Check if a record exceeded the reader's configured limits.
    pub fn is_limit_exceeded(&self) -> bool {
        matches!(self, Error::EntryTooLarge { .. })
    }

    /// Check if this is an I/O failure of the byte source.
    pub fn is_io(&self) -> bool {
        matches!(self, Error::Io(_))
    }

    /// Check if this error is a programming error by the caller.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Error::EmptyStream)
    }

    /// File offset of the offending record, if the error is tied to one.
    pub fn offset(&self) -> Option<u64> {
        match self {
            Error::Corruption { offset, .. }
            | Error::Decode { offset, .. }
            | Error::EntryTooLarge { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}

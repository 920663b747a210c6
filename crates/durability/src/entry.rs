//! Entry kinds
//!
//! The reader does not know how records are laid out on disk. An
//! [`EntryKind`] value, chosen when the reader is built, answers the four
//! questions the reader asks of buffered bytes: how long a header is, whether
//! a complete record is present, how to decode it, and whether its checksum
//! holds.

use thiserror::Error;

/// Failure to decode a record the entry kind reported as complete
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct DecodeError {
    /// Why the bytes could not be decoded
    pub reason: String,
}

impl DecodeError {
    /// Create a decode error with the given reason
    pub fn new(reason: impl Into<String>) -> Self {
        DecodeError {
            reason: reason.into(),
        }
    }
}

/// On-disk record format consumed by [`EntryReader`](crate::EntryReader)
///
/// All buffer arguments start at the first byte of a record and extend to
/// the end of the buffered data, which may be more than one record.
pub trait EntryKind {
    /// Decoded record type
    type Entry;

    /// Minimum number of bytes needed before [`is_complete`](Self::is_complete)
    /// can be evaluated.
    fn min_header_size(&self) -> usize;

    /// Check whether `buf` holds at least one complete record.
    ///
    /// Only called with `buf.len() >= self.min_header_size()`. A header whose
    /// declared size is impossible should report `true` so that
    /// [`decode`](Self::decode) can reject it, instead of making the reader
    /// wait for bytes that will never come.
    fn is_complete(&self, buf: &[u8]) -> bool;

    /// Total encoded size of the record at the front of `buf`, if known from
    /// the header alone.
    ///
    /// Used to size buffer growth when one record is larger than the read
    /// buffer. The default of `None` makes the reader double the buffer.
    fn encoded_len(&self, _buf: &[u8]) -> Option<usize> {
        None
    }

    /// Decode the record at the front of `buf`.
    ///
    /// Returns the entry and the number of bytes it occupied.
    fn decode(&self, buf: &[u8]) -> Result<(Self::Entry, usize), DecodeError>;

    /// Check the entry's stored checksum against its contents.
    fn is_checksum_valid(&self, entry: &Self::Entry) -> bool;
}

impl<K: EntryKind + ?Sized> EntryKind for &K {
    type Entry = K::Entry;

    fn min_header_size(&self) -> usize {
        (**self).min_header_size()
    }

    fn is_complete(&self, buf: &[u8]) -> bool {
        (**self).is_complete(buf)
    }

    fn encoded_len(&self, buf: &[u8]) -> Option<usize> {
        (**self).encoded_len(buf)
    }

    fn decode(&self, buf: &[u8]) -> Result<(Self::Entry, usize), DecodeError> {
        (**self).decode(buf)
    }

    fn is_checksum_valid(&self, entry: &Self::Entry) -> bool {
        (**self).is_checksum_valid(entry)
    }
}

//! Lookahead entry reader over one segment
//!
//! [`EntryReader`] turns the bytes of an open segment into a stream of
//! validated entries for the recovery path. It keeps one read buffer and
//! one decoded entry of lookahead:
//!
//! - `has_next()` decodes the lookahead if none is cached
//! - `next_entry()` hands out the lookahead and immediately prefetches the
//!   one after it
//! - `reset(offset)` repositions and prefetches from the new offset
//!
//! ## Refill
//!
//! When the buffered bytes do not hold a complete record, leftover bytes
//! are compacted to the front and the free tail is filled from the source.
//! A record larger than the whole buffer grows it, up to
//! `ReaderConfig::max_buffer_size`. If the source is exhausted before a
//! record completes (a torn tail after a crash), the stream simply ends.
//!
//! ## Errors
//!
//! A complete record with a bad checksum is fatal and reported as
//! [`Error::Corruption`] with the segment path and record offset. Entries
//! returned before it stay valid, and `position()` is the offset a caller
//! can truncate the segment to. Once an error has been reported the reader
//! yields nothing until `reset`.

use crate::buffer::ReadBuffer;
use crate::entry::EntryKind;
use crate::segment::Segment;
use crate::source::ByteSource;
use seglog_core::{Error, ReaderConfig, Result};
use tracing::{debug, trace, warn};

/// Location of a record in the segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordSpan {
    /// File offset of the first byte of the record
    pub offset: u64,
    /// Encoded length of the record
    pub len: usize,
}

impl RecordSpan {
    /// File offset just past the record
    pub fn end(&self) -> u64 {
        self.offset + self.len as u64
    }
}

/// Counters for one reader since construction
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReaderStats {
    /// Read calls issued to the byte source
    pub source_reads: u64,
    /// Bytes delivered by the byte source
    pub bytes_read: u64,
    /// Entries decoded and validated
    pub entries_decoded: u64,
    /// Times the buffer was grown to fit one record
    pub buffer_growths: u64,
}

/// Buffered lookahead reader of validated entries
pub struct EntryReader<K: EntryKind, S> {
    segment: Segment,
    kind: K,
    source: S,
    buffer: ReadBuffer,
    max_buffer_size: usize,
    /// File offset of the first readable byte in `buffer`
    buffer_offset: u64,
    /// Offset the reader was started or last reset at
    start_offset: u64,
    /// Span of the entry most recently handed out
    current: Option<RecordSpan>,
    /// Next validated entry, not yet handed out
    lookahead: Option<(K::Entry, RecordSpan)>,
    /// Prefetch error not yet reported to the caller
    pending_error: Option<Error>,
    failed: bool,
    stats: ReaderStats,
}

impl<K: EntryKind, S: ByteSource> EntryReader<K, S> {
    /// Create a reader positioned at `start_offset` of `source`.
    ///
    /// Nothing is read until the first `has_next()`.
    pub fn new(
        segment: Segment,
        kind: K,
        mut source: S,
        start_offset: u64,
        config: &ReaderConfig,
    ) -> Result<Self> {
        config.validate()?;
        if kind.min_header_size() > config.max_buffer_size {
            return Err(Error::InvalidConfig(format!(
                "entry header of {} bytes does not fit max_buffer_size {}",
                kind.min_header_size(),
                config.max_buffer_size
            )));
        }

        source.seek_to(start_offset)?;
        debug!(
            "Opened entry reader on {} at offset {}",
            segment.path().display(),
            start_offset
        );

        Ok(EntryReader {
            segment,
            kind,
            source,
            buffer: ReadBuffer::with_capacity(config.buffer_size),
            max_buffer_size: config.max_buffer_size,
            buffer_offset: start_offset,
            start_offset,
            current: None,
            lookahead: None,
            pending_error: None,
            failed: false,
            stats: ReaderStats::default(),
        })
    }

    /// Check whether another entry is available.
    ///
    /// Reads from the source only when no entry is cached, so repeated calls
    /// are free until `next_entry()` is called. At end of stream each call
    /// polls the source again, which picks up records appended since.
    pub fn has_next(&mut self) -> Result<bool> {
        if let Some(err) = self.pending_error.take() {
            return Err(err);
        }
        if self.failed {
            return Ok(false);
        }
        if self.lookahead.is_none() {
            self.fill_lookahead()?;
        }
        Ok(self.lookahead.is_some())
    }

    /// Take the next entry.
    ///
    /// Returns [`Error::EmptyStream`] when no entry is available. The entry
    /// after the returned one is prefetched; if that fails, the error is
    /// reported by the following `has_next()` or `next_entry()` call.
    pub fn next_entry(&mut self) -> Result<K::Entry> {
        if !self.has_next()? {
            return Err(Error::EmptyStream);
        }
        let (entry, span) = self.lookahead.take().ok_or(Error::EmptyStream)?;
        self.current = Some(span);

        if let Err(err) = self.fill_lookahead() {
            self.pending_error = Some(err);
        }
        Ok(entry)
    }

    /// Reposition to `offset`, dropping all buffered state, and prefetch the
    /// first entry there.
    pub fn reset(&mut self, offset: u64) -> Result<()> {
        self.buffer.clear();
        self.current = None;
        self.lookahead = None;
        self.pending_error = None;

        if let Err(e) = self.source.seek_to(offset) {
            // Cursor position is unknown until a successful reset.
            self.failed = true;
            return Err(e.into());
        }
        self.failed = false;
        self.buffer_offset = offset;
        self.start_offset = offset;
        debug!(
            "Reset entry reader on {} to offset {}",
            self.segment.path().display(),
            offset
        );

        self.fill_lookahead()
    }

    /// Offset just past the last entry handed out.
    ///
    /// Before the first `next_entry()` this is the start offset. Every byte
    /// before it belongs to an entry that passed validation.
    pub fn position(&self) -> u64 {
        self.current
            .map(|span| span.end())
            .unwrap_or(self.start_offset)
    }

    /// Span of the entry most recently handed out
    pub fn current(&self) -> Option<RecordSpan> {
        self.current
    }

    /// Start offset of the entry most recently handed out
    pub fn current_offset(&self) -> Option<u64> {
        self.current.map(|span| span.offset)
    }

    /// Segment being read
    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    /// Current read buffer capacity
    pub fn buffer_capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Counters since construction
    pub fn stats(&self) -> ReaderStats {
        self.stats
    }

    /// Release the byte source
    pub fn into_source(self) -> S {
        self.source
    }

    fn fill_lookahead(&mut self) -> Result<()> {
        match self.read_next() {
            Ok(next) => {
                self.lookahead = next;
                Ok(())
            }
            Err(err) => {
                self.failed = true;
                Err(err)
            }
        }
    }

    fn read_next(&mut self) -> Result<Option<(K::Entry, RecordSpan)>> {
        if !self.has_enough_data() {
            self.refill()?;
            if !self.has_enough_data() {
                trace!(
                    "End of {} at offset {} with {} trailing bytes",
                    self.segment.path().display(),
                    self.buffer_offset,
                    self.buffer.remaining()
                );
                return Ok(None);
            }
        }

        let offset = self.buffer_offset;
        let available = self.buffer.remaining();
        let (entry, consumed) =
            self.kind
                .decode(self.buffer.readable())
                .map_err(|e| Error::Decode {
                    path: self.segment.path().to_path_buf(),
                    offset,
                    reason: e.reason,
                })?;
        if consumed == 0 || consumed > available {
            return Err(Error::Decode {
                path: self.segment.path().to_path_buf(),
                offset,
                reason: format!(
                    "entry kind consumed {} bytes of {} buffered",
                    consumed, available
                ),
            });
        }

        if !self.kind.is_checksum_valid(&entry) {
            warn!(
                "Checksum mismatch in {} at offset {}",
                self.segment.path().display(),
                offset
            );
            return Err(Error::Corruption {
                path: self.segment.path().to_path_buf(),
                offset,
            });
        }

        self.buffer.consume(consumed);
        self.buffer_offset += consumed as u64;
        self.stats.entries_decoded += 1;

        Ok(Some((
            entry,
            RecordSpan {
                offset,
                len: consumed,
            },
        )))
    }

    /// Read until a complete record is buffered or the source is exhausted.
    fn refill(&mut self) -> Result<()> {
        loop {
            let kept = self.buffer.make_room();
            if self.buffer.writable_len() == 0 {
                self.grow()?;
            }

            let n = self.source.read_into(self.buffer.writable())?;
            self.stats.source_reads += 1;
            trace!(
                "Refilled {} bytes from {} ({} kept)",
                n,
                self.segment.path().display(),
                kept
            );
            if n == 0 {
                return Ok(());
            }
            self.buffer.fill(n);
            self.stats.bytes_read += n as u64;

            if self.has_enough_data() {
                return Ok(());
            }
        }
    }

    /// Grow a buffer filled by one partial record.
    fn grow(&mut self) -> Result<()> {
        let capacity = self.buffer.capacity();
        let needed = self.kind.encoded_len(self.buffer.readable());

        if capacity >= self.max_buffer_size || needed.is_some_and(|len| len > self.max_buffer_size)
        {
            return Err(Error::EntryTooLarge {
                path: self.segment.path().to_path_buf(),
                offset: self.buffer_offset,
                capacity: self.max_buffer_size,
            });
        }

        let new_capacity = needed
            .unwrap_or(0)
            .max(capacity.saturating_mul(2))
            .min(self.max_buffer_size);
        debug!(
            "Growing read buffer for {} from {} to {} bytes at offset {}",
            self.segment.path().display(),
            capacity,
            new_capacity,
            self.buffer_offset
        );
        self.buffer.grow(new_capacity);
        self.stats.buffer_growths += 1;
        Ok(())
    }

    #[inline]
    fn has_enough_data(&self) -> bool {
        self.buffer.remaining() >= self.kind.min_header_size()
            && self.kind.is_complete(self.buffer.readable())
    }
}

impl<K: EntryKind, S: ByteSource> Iterator for EntryReader<K, S> {
    type Item = Result<K::Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.has_next() {
            Ok(true) => Some(self.next_entry()),
            Ok(false) => None,
            Err(err) => Some(Err(err)),
        }
    }
}

impl<K: EntryKind, S> std::fmt::Debug for EntryReader<K, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryReader")
            .field("segment", &self.segment)
            .field("buffer_offset", &self.buffer_offset)
            .field("buffered", &self.buffer.remaining())
            .field("current", &self.current)
            .field("has_lookahead", &self.lookahead.is_some())
            .field("failed", &self.failed)
            .finish()
    }
}

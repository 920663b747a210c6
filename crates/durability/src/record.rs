//! Length-prefixed, CRC32-checked records
//!
//! # Format
//!
//! ```text
//! +----------------+----------------+---------------------+
//! | length (u32 LE)| crc32 (u32 LE) | payload (length B)  |
//! +----------------+----------------+---------------------+
//! ```
//!
//! The CRC32 covers the 4 length bytes followed by the payload. Covering the
//! length means a zero-filled region (preallocated, never written) does not
//! decode as a run of valid empty records.

use crate::entry::{DecodeError, EntryKind};
use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use seglog_core::config::DEFAULT_MAX_BUFFER_SIZE;
use std::io::{self, Write};

/// Size of the record header in bytes
pub const FRAME_HEADER_SIZE: usize = 8;

/// Default upper bound on a single payload
///
/// A record of this size exactly fills a reader at the default
/// `max_buffer_size`, so anything the default kind accepts the default
/// reader can hold.
pub const DEFAULT_MAX_PAYLOAD: u32 = (DEFAULT_MAX_BUFFER_SIZE - FRAME_HEADER_SIZE) as u32;

/// A decoded record: payload plus the checksum stored with it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramedRecord {
    payload: Vec<u8>,
    crc: u32,
}

impl FramedRecord {
    /// Create a record over `payload` with a freshly computed checksum
    ///
    /// Fails with `InvalidInput` if the payload does not fit the u32 length
    /// field.
    pub fn new(payload: impl Into<Vec<u8>>) -> io::Result<Self> {
        let payload = payload.into();
        let len = frame_len(payload.len())?;
        let crc = frame_crc(len, &payload);
        Ok(FramedRecord { payload, crc })
    }

    /// Payload bytes
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Consume the record, returning the payload
    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    /// Checksum as stored
    pub fn crc(&self) -> u32 {
        self.crc
    }

    /// Size of the record on disk
    pub fn encoded_len(&self) -> usize {
        FRAME_HEADER_SIZE + self.payload.len()
    }

    /// Check the stored checksum against the payload
    pub fn is_crc_valid(&self) -> bool {
        frame_crc(self.payload_len(), &self.payload) == self.crc
    }

    /// Encode header and payload into a new vector
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        out.extend_from_slice(&self.payload_len().to_le_bytes());
        out.extend_from_slice(&self.crc.to_le_bytes());
        out.extend_from_slice(&self.payload);
        out
    }

    /// Write header and payload, returning the number of bytes written
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<usize> {
        w.write_u32::<LittleEndian>(self.payload_len())?;
        w.write_u32::<LittleEndian>(self.crc)?;
        w.write_all(&self.payload)?;
        Ok(self.encoded_len())
    }

    // `new` and `decode` both bound the payload by u32.
    #[inline]
    fn payload_len(&self) -> u32 {
        self.payload.len() as u32
    }
}

fn frame_len(len: usize) -> io::Result<u32> {
    u32::try_from(len).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("payload of {} bytes exceeds u32::MAX", len),
        )
    })
}

fn frame_crc(len: u32, payload: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&len.to_le_bytes());
    hasher.update(payload);
    hasher.finalize()
}

/// Entry kind for [`FramedRecord`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramedRecordKind {
    max_payload: u32,
}

impl Default for FramedRecordKind {
    fn default() -> Self {
        FramedRecordKind {
            max_payload: DEFAULT_MAX_PAYLOAD,
        }
    }
}

impl FramedRecordKind {
    /// Reject payloads declared larger than `max_payload` bytes
    pub fn with_max_payload(max_payload: u32) -> Self {
        FramedRecordKind { max_payload }
    }

    /// Largest accepted payload length
    pub fn max_payload(&self) -> u32 {
        self.max_payload
    }

    #[inline]
    fn declared_len(buf: &[u8]) -> u32 {
        LittleEndian::read_u32(&buf[..4])
    }
}

impl EntryKind for FramedRecordKind {
    type Entry = FramedRecord;

    fn min_header_size(&self) -> usize {
        FRAME_HEADER_SIZE
    }

    fn is_complete(&self, buf: &[u8]) -> bool {
        if buf.len() < FRAME_HEADER_SIZE {
            return false;
        }
        let len = Self::declared_len(buf);
        // Oversized lengths are "complete" so decode reports them.
        len > self.max_payload || buf.len() >= FRAME_HEADER_SIZE + len as usize
    }

    fn encoded_len(&self, buf: &[u8]) -> Option<usize> {
        if buf.len() < FRAME_HEADER_SIZE {
            return None;
        }
        Some(FRAME_HEADER_SIZE + Self::declared_len(buf) as usize)
    }

    fn decode(&self, buf: &[u8]) -> Result<(FramedRecord, usize), DecodeError> {
        if buf.len() < FRAME_HEADER_SIZE {
            return Err(DecodeError::new(format!(
                "header needs {} bytes, have {}",
                FRAME_HEADER_SIZE,
                buf.len()
            )));
        }
        let len = Self::declared_len(buf);
        if len > self.max_payload {
            return Err(DecodeError::new(format!(
                "payload length {} exceeds maximum {}",
                len, self.max_payload
            )));
        }
        let total = FRAME_HEADER_SIZE + len as usize;
        if buf.len() < total {
            return Err(DecodeError::new(format!(
                "record needs {} bytes, have {}",
                total,
                buf.len()
            )));
        }

        let crc = LittleEndian::read_u32(&buf[4..8]);
        let payload = buf[FRAME_HEADER_SIZE..total].to_vec();
        Ok((FramedRecord { payload, crc }, total))
    }

    fn is_checksum_valid(&self, entry: &FramedRecord) -> bool {
        entry.is_crc_valid()
    }
}

//! Byte sources
//!
//! The reader needs two things from the segment it reads: positioning and
//! sequential reads. Any `Read + Seek` type (a `File`, a `Cursor` over a
//! byte vector) is a [`ByteSource`].

use std::io::{self, Read, Seek, SeekFrom};

/// Seekable, readable segment bytes
pub trait ByteSource {
    /// Move the read cursor to an absolute byte offset.
    fn seek_to(&mut self, offset: u64) -> io::Result<()>;

    /// Read into `buf`, returning the number of bytes read.
    ///
    /// `Ok(0)` with a non-empty `buf` means end of stream.
    fn read_into(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

impl<T: Read + Seek> ByteSource for T {
    fn seek_to(&mut self, offset: u64) -> io::Result<()> {
        self.seek(SeekFrom::Start(offset)).map(|_| ())
    }

    fn read_into(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            match self.read(buf) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                result => return result,
            }
        }
    }
}

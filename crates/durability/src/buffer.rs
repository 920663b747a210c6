//! Explicit-cursor read buffer
//!
//! A fixed-capacity byte buffer split into three regions:
//!
//! ```text
//! 0        start           end           capacity
//! |consumed|   readable    |   writable   |
//! ```
//!
//! Bytes are appended at `end` by reads from the byte source and consumed
//! from `start` by the decoder. Before a refill the readable bytes are moved
//! to the front (`compact`) so the whole tail is free for the next read.
//! The readable region always holds bytes in source order.

/// Owned read buffer with explicit start/end cursors
#[derive(Debug)]
pub struct ReadBuffer {
    data: Vec<u8>,
    start: usize,
    end: usize,
}

impl ReadBuffer {
    /// Create an empty buffer with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        ReadBuffer {
            data: vec![0; capacity],
            start: 0,
            end: 0,
        }
    }

    /// Total capacity in bytes
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Number of readable (appended but not consumed) bytes
    #[inline]
    pub fn remaining(&self) -> usize {
        self.end - self.start
    }

    /// Readable bytes, in source order
    #[inline]
    pub fn readable(&self) -> &[u8] {
        &self.data[self.start..self.end]
    }

    /// Free space after the readable region
    #[inline]
    pub fn writable_len(&self) -> usize {
        self.data.len() - self.end
    }

    /// Mutable view of the free space after the readable region
    #[inline]
    pub fn writable(&mut self) -> &mut [u8] {
        &mut self.data[self.end..]
    }

    /// Check whether the readable region spans the whole buffer
    #[inline]
    pub fn is_full(&self) -> bool {
        self.start == 0 && self.end == self.data.len()
    }

    /// Mark `n` bytes of the writable region as filled.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds the writable length.
    pub fn fill(&mut self, n: usize) {
        assert!(
            n <= self.writable_len(),
            "fill of {} bytes exceeds writable region of {}",
            n,
            self.writable_len()
        );
        self.end += n;
    }

    /// Mark `n` readable bytes as consumed.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds the readable length.
    pub fn consume(&mut self, n: usize) {
        assert!(
            n <= self.remaining(),
            "consume of {} bytes exceeds readable region of {}",
            n,
            self.remaining()
        );
        self.start += n;
    }

    /// Drop all buffered bytes.
    pub fn clear(&mut self) {
        self.start = 0;
        self.end = 0;
    }

    /// Move the readable bytes to the front of the buffer.
    ///
    /// Relative order is preserved. Afterwards `start == 0` and the whole
    /// tail is writable.
    pub fn compact(&mut self) {
        if self.start == 0 {
            return;
        }
        self.data.copy_within(self.start..self.end, 0);
        self.end -= self.start;
        self.start = 0;
    }

    /// Open the largest possible writable region for a refill.
    ///
    /// Compacts leftover bytes to the front, or resets to empty when nothing
    /// is left. Returns the number of leftover bytes kept.
    pub fn make_room(&mut self) -> usize {
        if self.remaining() > 0 {
            self.compact();
        } else {
            self.clear();
        }
        self.remaining()
    }

    /// Grow the capacity to `new_capacity`, keeping readable bytes.
    ///
    /// Does nothing if `new_capacity` is not larger than the current one.
    pub fn grow(&mut self, new_capacity: usize) {
        if new_capacity <= self.data.len() {
            return;
        }
        self.compact();
        self.data.resize(new_capacity, 0);
    }
}

//! Reader configuration
//!
//! Buffer sizing is owned by the storage engine embedding the reader. The
//! engine hands a [`ReaderConfig`] to every reader it opens.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default initial read buffer capacity (64 KiB)
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Default ceiling the read buffer may grow to (16 MiB)
pub const DEFAULT_MAX_BUFFER_SIZE: usize = 16 * 1024 * 1024;

/// Read buffer settings for an entry reader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Initial capacity of the read buffer in bytes
    pub buffer_size: usize,
    /// Largest capacity the buffer may grow to when one record does not fit
    pub max_buffer_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        ReaderConfig {
            buffer_size: DEFAULT_BUFFER_SIZE,
            max_buffer_size: DEFAULT_MAX_BUFFER_SIZE,
        }
    }
}

impl ReaderConfig {
    /// Small buffers for tests and memory-constrained replay
    pub fn small() -> Self {
        ReaderConfig {
            buffer_size: 4 * 1024,
            max_buffer_size: 1024 * 1024,
        }
    }

    /// Large buffers for bulk replay of big segments
    pub fn large() -> Self {
        ReaderConfig {
            buffer_size: 1024 * 1024,
            max_buffer_size: 64 * 1024 * 1024,
        }
    }

    /// Set the initial buffer capacity.
    ///
    /// Raises `max_buffer_size` if it would otherwise be below the new size.
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self.max_buffer_size = self.max_buffer_size.max(buffer_size);
        self
    }

    /// Set the growth ceiling of the buffer.
    pub fn with_max_buffer_size(mut self, max_buffer_size: usize) -> Self {
        self.max_buffer_size = max_buffer_size;
        self
    }

    /// Check that the sizes are usable.
    pub fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 {
            return Err(Error::InvalidConfig(
                "buffer_size must be greater than zero".to_string(),
            ));
        }
        if self.max_buffer_size < self.buffer_size {
            return Err(Error::InvalidConfig(format!(
                "max_buffer_size ({}) is smaller than buffer_size ({})",
                self.max_buffer_size, self.buffer_size
            )));
        }
        Ok(())
    }
}

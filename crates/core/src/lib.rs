//! Core types for seglog
//!
//! This crate defines the types shared by every seglog crate:
//! - [`Error`] / [`Result`]: the error taxonomy of segment reading
//! - [`ReaderConfig`]: read buffer sizing supplied by the storage engine

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;

pub use config::{ReaderConfig, DEFAULT_BUFFER_SIZE, DEFAULT_MAX_BUFFER_SIZE};
pub use error::{Error, Result};

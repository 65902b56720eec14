//! Errors surfaced by the counting operation.
//!
//! Only failures to open or stat the input abort a count. Everything that can
//! go wrong after that point (short reads, malformed lines) is absorbed by
//! the pipeline, so readers and aggregators always terminate cleanly.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a regular file: {}", .0.display())]
    NotAFile(PathBuf),
}

pub type Result<T> = std::result::Result<T, Error>;

//! Initialisation errors.

use std::fmt;

#[derive(Debug)]
pub enum SluError {
    /// The frame buffer could not be allocated.
    FrameBufferAlloc { width: usize, height: usize },
}

impl fmt::Display for SluError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FrameBufferAlloc { width, height } => write!(
                f,
                "slu: out of memory allocating {width}x{height} frame buffer ({} bytes)",
                width.saturating_mul(*height).saturating_mul(2),
            ),
        }
    }
}

impl std::error::Error for SluError {}

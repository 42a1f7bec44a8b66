//! Error types for blur operations.

use thiserror::Error;

/// Error type for blur operations.
///
/// Each pipeline stage has its own variant so the caller can name the
/// stage that failed.
#[derive(Error, Debug)]
pub enum OpsError {
    /// A kernel, mask or working buffer could not be obtained.
    #[error("allocation failed ({requested} bytes): {reason}")]
    Allocation {
        /// Bytes requested
        requested: usize,
        /// Failure reason
        reason: String,
    },

    /// Region, kernel or iteration parameters are unusable.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// The region could not be copied out of the image.
    #[error("extraction failed: {0}")]
    Extraction(String),

    /// The blurred region could not be written back into the image.
    #[error("integration failed: {0}")]
    Integration(String),

    /// Pixel buffer error.
    #[error(transparent)]
    Core(feather_core::Error),
}

impl From<feather_core::Error> for OpsError {
    fn from(err: feather_core::Error) -> Self {
        match err {
            feather_core::Error::AllocationFailed { requested, reason } => {
                Self::Allocation { requested, reason }
            }
            other => Self::Core(other),
        }
    }
}

/// Result type for blur operations.
pub type OpsResult<T> = Result<T, OpsError>;

//! Error types for the assembly engine.

use crate::materialize::AllocError;
use crate::types::SampleType;
use thiserror::Error;

/// Result type for engine operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Fatal errors that abort an entire assembly run.
///
/// Per-record decode failures are deliberately absent: the driver logs
/// them and keeps scanning. Anything surfacing here terminates the run
/// with no partial output.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The injected sample allocator failed.
    #[error("sample allocation failed: {0}")]
    Alloc(#[from] AllocError),

    /// The allocator returned a buffer of the wrong size.
    #[error(
        "allocator returned {actual} bytes for {sample_count} samples of type {sample_type} \
         (expected {expected})"
    )]
    ShortAllocation {
        /// Bytes required.
        expected: usize,
        /// Bytes the allocator returned.
        actual: usize,
        /// Samples requested.
        sample_count: u64,
        /// Sample type requested.
        sample_type: SampleType,
    },

    /// A record's sample buffer is smaller than its header claims.
    #[error("record sample buffer holds {available} bytes but header claims {needed}")]
    ShortRecordBuffer {
        /// Bytes the header claims.
        needed: usize,
        /// Bytes actually present.
        available: usize,
    },
}

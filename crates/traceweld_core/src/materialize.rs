//! Segment materialization: the two-phase sample-buffer copy.
//!
//! A segment's final buffer is sized from its cumulative sample count
//! and allocated exactly once, then each constituent record's samples
//! are copied in list order. Growing the buffer incrementally per record
//! is not an option: repeated reallocation is pathologically slow on at
//! least one common platform. The trade-off is that every record buffer
//! of an open segment stays resident until the segment closes, a
//! per-open-segment (not global) overhead.

use crate::error::{CoreError, CoreResult};
use crate::segment::Segment;
use crate::types::SampleType;
use thiserror::Error;

/// Failure reported by a [`SampleAllocator`].
///
/// Always fatal for the whole run; there is no partial-result contract
/// for allocator failure.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct AllocError {
    /// Description of the failure.
    pub message: String,
}

impl AllocError {
    /// Creates an allocation error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Supplies final sample buffers for closing segments.
///
/// Implementations must return a buffer of exactly
/// `sample_count * sample_type.sample_size()` bytes; the materializer
/// verifies the length and aborts the run on a mismatch. The engine
/// invokes the allocator once per segment closure, never to grow an
/// existing buffer.
pub trait SampleAllocator {
    /// Allocates a buffer for `sample_count` samples of `sample_type`.
    fn allocate(&mut self, sample_count: u64, sample_type: SampleType) -> Result<Vec<u8>, AllocError>;
}

/// Default allocator: an exact-size zeroed heap buffer.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeapAllocator;

impl SampleAllocator for HeapAllocator {
    fn allocate(&mut self, sample_count: u64, sample_type: SampleType) -> Result<Vec<u8>, AllocError> {
        Ok(vec![0; sample_count as usize * sample_type.sample_size()])
    }
}

/// Closes a segment by materializing its contiguous sample buffer.
///
/// With `want_samples` false this is a no-op: the segment keeps only
/// metadata plus its record list, and no record buffer is released. With
/// `want_samples` true, any previously materialized buffer is dropped,
/// a fresh one is requested from the allocator, and each record's
/// `sample_count * sample_size` bytes are copied to the next unfilled
/// offset. A record's own sample buffer is released the instant its
/// bytes are copied; the record node and its blockettes stay with the
/// segment.
pub fn materialize(
    segment: &mut Segment,
    want_samples: bool,
    allocator: &mut dyn SampleAllocator,
) -> CoreResult<()> {
    if !want_samples {
        return Ok(());
    }

    segment.samples = None;
    let expected = segment.sample_count as usize * segment.sample_type.sample_size();
    let mut buf = allocator.allocate(segment.sample_count, segment.sample_type)?;
    if buf.len() != expected {
        return Err(CoreError::ShortAllocation {
            expected,
            actual: buf.len(),
            sample_count: segment.sample_count,
            sample_type: segment.sample_type,
        });
    }

    let mut offset = 0usize;
    for record in &mut segment.records {
        let size = record.sample_bytes();
        let Some(src) = record.samples.get(..size) else {
            return Err(CoreError::ShortRecordBuffer {
                needed: size,
                available: record.samples.len(),
            });
        };
        buf[offset..offset + size].copy_from_slice(src);
        offset += size;
        record.samples = Vec::new();
    }

    segment.samples = Some(buf);
    Ok(())
}

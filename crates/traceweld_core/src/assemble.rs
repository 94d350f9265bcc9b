//! The assembly driver.
//!
//! One synchronous pass over an in-memory buffer: decode a record,
//! route it to its identifier bucket, test continuity against the
//! bucket's open segment, then merge or open a new segment. Opening a
//! new segment closes (materializes) its predecessor; end of input
//! closes every bucket's remaining open segment in bucket creation
//! order.

use crate::continuity;
use crate::decode::RecordDecoder;
use crate::error::CoreResult;
use crate::extract::{AuxExtractor, AuxFields};
use crate::materialize::{materialize, SampleAllocator};
use crate::options::AssembleOptions;
use crate::segment::{BucketRegistry, IdentifierBucket, Segment};
use tracing::{debug, trace, warn};

/// Assembles a record stream into identifier buckets of maximal
/// contiguous segments.
///
/// `filter` is opaque: it is handed to the decoder unmodified and never
/// interpreted here. Per-record decode failures are logged and skipped;
/// the decoder is responsible for advancing the cursor past bytes it
/// rejects. Allocator failures abort the run and discard all partially
/// built state.
///
/// If no record decodes at all, the result is a single keyless empty
/// bucket — the documented degenerate-but-valid "no data" output,
/// distinct from an error.
pub fn assemble<D: RecordDecoder + ?Sized>(
    buf: &[u8],
    decoder: &mut D,
    filter: Option<&D::Filter>,
    options: &AssembleOptions,
    allocator: &mut dyn SampleAllocator,
) -> CoreResult<Vec<IdentifierBucket>> {
    let buf_len = buf.len() as u64;
    let mut offset = 0u64;
    let mut record_count = 0u64;
    let mut registry = BucketRegistry::new();
    let mut extractor = AuxExtractor::new(options.field_descriptors.clone());

    while offset < buf_len {
        let record = match decoder.decode_next(
            buf,
            &mut offset,
            filter,
            options.record_length,
            options.verbose,
        ) {
            Ok(record) => record,
            Err(err) => {
                // Errors at the very end of the buffer are expected
                // trailing noise and not worth reporting.
                if offset < buf_len {
                    if options.verbose {
                        warn!(offset, error = %err, "error parsing record");
                    } else {
                        debug!(offset, error = %err, "error parsing record");
                    }
                }
                continue;
            }
        };

        record_count += 1;
        offset += record.rec_len;

        let key = record.station_key();
        let bucket_idx = registry.lookup_or_create(&key);

        let aux = if extractor.active(options.details) {
            extractor.extract(&record)
        } else {
            AuxFields::inactive()
        };

        // Matching once on the open segment means an accepted record has
        // nowhere to go but into it; it cannot be silently dropped.
        let bucket = registry.bucket_mut(bucket_idx);
        match bucket.open_segment_mut() {
            Some(segment) if continuity::accepts(Some(&*segment), &record, &aux) => {
                trace!(key = %key, "record extends open segment");
                segment.append(record);
            }
            open => {
                // The superseded segment is closed for good: copy its
                // data out and release the record buffers now.
                if let Some(segment) = open {
                    materialize(segment, options.want_samples, allocator)?;
                }
                trace!(key = %key, start = %record.start_time, "opening segment");
                bucket.segments.push(Segment::open(record, &aux));
            }
        }
    }

    if record_count == 0 {
        debug!("no records decoded, returning keyless empty bucket");
        return Ok(vec![IdentifierBucket::keyless()]);
    }

    // Final flush: close the still-open segment of every bucket.
    for bucket in registry.iter_mut() {
        if let Some(segment) = bucket.open_segment_mut() {
            materialize(segment, options.want_samples, allocator)?;
        }
    }

    debug!(
        records = record_count,
        buckets = registry.len(),
        "assembly complete"
    );
    Ok(registry.into_buckets())
}

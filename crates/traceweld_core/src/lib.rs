//! # traceweld core
//!
//! Assembles a stream of independently decoded telemetry records into
//! minimal sets of maximal contiguous runs ("segments"), grouped by
//! station identifier.
//!
//! This crate provides:
//! - The [`assemble`] driver: one synchronous pass over an in-memory
//!   buffer, routing records to identifier buckets
//! - The continuity classifier (time-gap, sample-rate and metadata
//!   equality tolerances)
//! - Auxiliary blockette-field extraction for continuity comparison
//! - Two-phase segment materialization through an injected
//!   [`SampleAllocator`]
//! - The [`RecordDecoder`] seam for plugging in wire-format decoders
//!
//! Decoding wire bytes, selection filtering and output serialization are
//! external collaborators' concerns; see `traceweld_codec` for the
//! reference wire format.
//!
//! ## Example
//!
//! ```rust,ignore
//! use traceweld_core::{assemble, AssembleOptions, HeapAllocator};
//!
//! let options = AssembleOptions::new().verbose(true);
//! let buckets = assemble(&buf, &mut decoder, None, &options, &mut HeapAllocator)?;
//! for bucket in &buckets {
//!     for segment in &bucket.segments {
//!         println!("{} {} .. {}", bucket.key, segment.start_time, segment.end_time);
//!     }
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod assemble;
mod continuity;
mod decode;
mod error;
mod extract;
mod materialize;
mod options;
mod record;
mod segment;
mod types;

pub use assemble::assemble;
pub use continuity::{accepts, rate_tolerable, time_tolerance, SAMPLE_RATE_TOLERANCE};
pub use decode::{DecodeError, DecodeResult, RecordDecoder, RecordLengthHint};
pub use error::{CoreError, CoreResult};
pub use extract::{AuxExtractor, AuxFields, FieldDescriptor};
pub use materialize::{materialize, AllocError, HeapAllocator, SampleAllocator};
pub use options::AssembleOptions;
pub use record::{Blockette, Record, TIMING_QUALITY_BLOCKETTE};
pub use segment::{BucketRegistry, IdentifierBucket, Segment};
pub use types::{
    Calibration, HpTime, SampleType, StationKey, TimingQuality, HPT_MODULUS,
};

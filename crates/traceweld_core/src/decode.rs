//! The record-decoding seam.
//!
//! Decoding wire bytes into a [`Record`] is an external collaborator's
//! job; the engine drives it through [`RecordDecoder`] and treats its
//! output as ground truth.

use crate::record::Record;
use thiserror::Error;

/// Result type for decode operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Failures reported by a record decoder.
///
/// These are always local to one scan position: the driver logs them and
/// keeps scanning from the decoder's advanced cursor. They never abort a
/// run.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// No valid record starts at the scan position.
    #[error("no record found at offset {offset}")]
    NoRecord {
        /// Byte offset where decoding was attempted.
        offset: u64,
    },

    /// A record header was found but the buffer ends before the record does.
    #[error("truncated record at offset {offset}: need {needed} bytes, {available} available")]
    Truncated {
        /// Byte offset of the record start.
        offset: u64,
        /// Bytes the record claims to span.
        needed: u64,
        /// Bytes remaining in the buffer.
        available: u64,
    },

    /// A structurally valid frame failed validation.
    #[error("corrupt record at offset {offset}: {message}")]
    Corrupt {
        /// Byte offset of the record start.
        offset: u64,
        /// Description of the problem.
        message: String,
    },

    /// The record decoded but was rejected by the selection filter.
    #[error("record at offset {offset} excluded by selection")]
    Filtered {
        /// Byte offset of the record start.
        offset: u64,
    },
}

impl DecodeError {
    /// Creates a corrupt-record error.
    pub fn corrupt(offset: u64, message: impl Into<String>) -> Self {
        Self::Corrupt {
            offset,
            message: message.into(),
        }
    }
}

/// Nominal record length hint forwarded to the decoder.
///
/// Some fixed-length formats can resynchronize after garbage by skipping
/// exactly one record length; variable-length decoders ignore the hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordLengthHint {
    /// Record length is not known up front.
    #[default]
    Unknown,
    /// Every record in the buffer is exactly this many bytes.
    Fixed(u32),
}

/// Decodes records out of an in-memory buffer, one at a time.
///
/// # Cursor contract
///
/// The engine depends on (but cannot enforce) the following:
///
/// - On `Ok`, the decoder leaves `offset` at the start of the decoded
///   record; the driver advances it by [`Record::rec_len`].
/// - On `Err`, the decoder has advanced `offset` past the bytes it gave
///   up on — a decoder that fails without moving the cursor would make
///   the scan loop spin forever.
pub trait RecordDecoder {
    /// Opaque selection filter, passed through unmodified by the engine.
    type Filter: ?Sized;

    /// Attempts to decode the next record at `*offset`.
    fn decode_next(
        &mut self,
        buf: &[u8],
        offset: &mut u64,
        filter: Option<&Self::Filter>,
        hint: RecordLengthHint,
        verbose: bool,
    ) -> DecodeResult<Record>;
}

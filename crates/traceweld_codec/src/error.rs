//! Error types for the reference wire codec.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors produced while encoding records to the wire format.
///
/// Decode-side failures are reported through
/// [`DecodeError`](traceweld_core::DecodeError) instead, so the engine
/// can treat them as recoverable per-record conditions.
#[derive(Debug, Error)]
pub enum CodecError {
    /// An identifier field exceeds its wire capacity.
    #[error("field '{field}' is {actual} bytes, wire format allows {max}")]
    FieldTooLong {
        /// Name of the offending field.
        field: &'static str,
        /// Maximum encodable length.
        max: usize,
        /// Actual length.
        actual: usize,
    },

    /// An identifier field contains a NUL byte.
    #[error("field '{field}' contains a NUL byte")]
    EmbeddedNul {
        /// Name of the offending field.
        field: &'static str,
    },

    /// The data-quality indicator is outside the ASCII range.
    #[error("quality indicator {quality:?} is not ASCII")]
    NonAsciiQuality {
        /// The offending character.
        quality: char,
    },

    /// The sample buffer length does not match the header.
    #[error("sample buffer is {actual} bytes, header claims {expected}")]
    SampleLengthMismatch {
        /// Bytes the header claims.
        expected: usize,
        /// Bytes in the buffer.
        actual: usize,
    },

    /// A blockette payload exceeds the 16-bit wire length field.
    #[error("blockette {type_code} payload is {len} bytes, wire format allows 65535")]
    BlockettePayloadTooLong {
        /// Blockette type code.
        type_code: u16,
        /// Payload length.
        len: usize,
    },

    /// Too many samples or blockettes for the wire counters.
    #[error("{what} count {count} exceeds wire limit {max}")]
    CountOverflow {
        /// What overflowed.
        what: &'static str,
        /// Offending count.
        count: u64,
        /// Wire limit.
        max: u64,
    },
}

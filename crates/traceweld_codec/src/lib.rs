//! # traceweld codec
//!
//! Reference wire format for traceweld record streams, plus the
//! selection filter the decoder applies before records ever reach the
//! assembly engine.
//!
//! ## Wire frame layout (little-endian)
//!
//! ```text
//! magic            4   "TWR1"
//! rec_len          4   total frame length including magic and CRC
//! network          8   NUL-padded
//! station          8   NUL-padded
//! location         8   NUL-padded
//! channel          8   NUL-padded
//! quality          1   ASCII data-quality indicator
//! start_time       8   i64 microseconds since epoch
//! sample_rate      8   f64 bit pattern, Hz (0.0 = irregular)
//! sample_type      1   one of 'a' 'i' 'f' 'd'
//! sample_count     4   u32
//! blockette_count  2   u16
//! blockettes       …   type u16, len u16, payload
//! samples          …   sample_count * sample_size bytes
//! crc32            4   over everything above
//! ```
//!
//! A record's end time is not on the wire; the decoder derives it as
//! `start + (sample_count - 1) / sample_rate`.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod crc;
mod decoder;
mod encoder;
mod error;
mod selection;

pub use crc::compute_crc32;
pub use decoder::WireDecoder;
pub use encoder::{encode_record, encode_records};
pub use error::{CodecError, CodecResult};
pub use selection::{Selection, SelectionList};

/// Frame magic marker.
pub const WIRE_MAGIC: [u8; 4] = *b"TWR1";

/// Capacity of each NUL-padded identifier field.
pub const FIELD_CAPACITY: usize = 8;

/// Bytes before the first blockette: magic, length and fixed fields.
pub const FIXED_HEADER_LEN: usize = 4 + 4 + 4 * FIELD_CAPACITY + 1 + 8 + 8 + 1 + 4 + 2;

/// Per-blockette wire header: type code plus payload length.
pub const BLOCKETTE_HEADER_LEN: usize = 4;

/// Trailing CRC length.
pub const TRAILER_LEN: usize = 4;

/// Smallest well-formed frame: fixed header plus CRC, no blockettes or
/// samples.
pub const MIN_RECORD_LEN: usize = FIXED_HEADER_LEN + TRAILER_LEN;

//! Wire-format record encoder.

use crate::crc::compute_crc32;
use crate::error::{CodecError, CodecResult};
use crate::{BLOCKETTE_HEADER_LEN, FIELD_CAPACITY, FIXED_HEADER_LEN, TRAILER_LEN, WIRE_MAGIC};
use traceweld_core::Record;

fn push_field(buf: &mut Vec<u8>, field: &'static str, value: &str) -> CodecResult<()> {
    let bytes = value.as_bytes();
    if bytes.len() > FIELD_CAPACITY {
        return Err(CodecError::FieldTooLong {
            field,
            max: FIELD_CAPACITY,
            actual: bytes.len(),
        });
    }
    if bytes.contains(&0) {
        return Err(CodecError::EmbeddedNul { field });
    }
    buf.extend_from_slice(bytes);
    buf.resize(buf.len() + FIELD_CAPACITY - bytes.len(), 0);
    Ok(())
}

/// Encodes a record into one wire frame.
///
/// The record's `end_time` and `rec_len` fields are not written: both
/// are decode-derived. Identifier fields are NUL-padded to
/// [`FIELD_CAPACITY`] bytes and must not embed NULs.
pub fn encode_record(record: &Record) -> CodecResult<Vec<u8>> {
    if !record.quality.is_ascii() {
        return Err(CodecError::NonAsciiQuality {
            quality: record.quality,
        });
    }
    if record.sample_count > u64::from(u32::MAX) {
        return Err(CodecError::CountOverflow {
            what: "sample",
            count: record.sample_count,
            max: u64::from(u32::MAX),
        });
    }
    if record.blockettes.len() > usize::from(u16::MAX) {
        return Err(CodecError::CountOverflow {
            what: "blockette",
            count: record.blockettes.len() as u64,
            max: u64::from(u16::MAX),
        });
    }
    let sample_bytes = record.sample_bytes();
    if record.samples.len() != sample_bytes {
        return Err(CodecError::SampleLengthMismatch {
            expected: sample_bytes,
            actual: record.samples.len(),
        });
    }

    let blockette_bytes: usize = record
        .blockettes
        .iter()
        .map(|b| BLOCKETTE_HEADER_LEN + b.payload.len())
        .sum();
    let rec_len = FIXED_HEADER_LEN + blockette_bytes + sample_bytes + TRAILER_LEN;

    let mut buf = Vec::with_capacity(rec_len);
    buf.extend_from_slice(&WIRE_MAGIC);
    buf.extend_from_slice(&(rec_len as u32).to_le_bytes());
    push_field(&mut buf, "network", &record.network)?;
    push_field(&mut buf, "station", &record.station)?;
    push_field(&mut buf, "location", &record.location)?;
    push_field(&mut buf, "channel", &record.channel)?;
    buf.push(record.quality as u8);
    buf.extend_from_slice(&record.start_time.as_ticks().to_le_bytes());
    buf.extend_from_slice(&record.sample_rate.to_bits().to_le_bytes());
    buf.push(record.sample_type.as_tag());
    buf.extend_from_slice(&(record.sample_count as u32).to_le_bytes());
    buf.extend_from_slice(&(record.blockettes.len() as u16).to_le_bytes());

    for blockette in &record.blockettes {
        if blockette.payload.len() > usize::from(u16::MAX) {
            return Err(CodecError::BlockettePayloadTooLong {
                type_code: blockette.type_code,
                len: blockette.payload.len(),
            });
        }
        buf.extend_from_slice(&blockette.type_code.to_le_bytes());
        buf.extend_from_slice(&(blockette.payload.len() as u16).to_le_bytes());
        buf.extend_from_slice(&blockette.payload);
    }

    buf.extend_from_slice(&record.samples);

    let crc = compute_crc32(&buf);
    buf.extend_from_slice(&crc.to_le_bytes());
    debug_assert_eq!(buf.len(), rec_len);
    Ok(buf)
}

/// Encodes a sequence of records into one contiguous buffer.
pub fn encode_records<'a>(records: impl IntoIterator<Item = &'a Record>) -> CodecResult<Vec<u8>> {
    let mut buf = Vec::new();
    for record in records {
        buf.extend_from_slice(&encode_record(record)?);
    }
    Ok(buf)
}

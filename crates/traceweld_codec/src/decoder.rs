//! Wire-format record decoder.

use crate::crc::compute_crc32;
use crate::selection::SelectionList;
use crate::{FIELD_CAPACITY, MIN_RECORD_LEN, TRAILER_LEN, WIRE_MAGIC};
use bytes::Buf;
use traceweld_core::{
    Blockette, DecodeError, DecodeResult, HpTime, Record, RecordDecoder, RecordLengthHint,
    SampleType, HPT_MODULUS,
};
use tracing::{debug, trace};

/// Decodes wire frames out of an in-memory buffer.
///
/// Implements the engine's [`RecordDecoder`] seam. On garbage at the
/// scan position the decoder resynchronizes by skipping to the next
/// magic marker (or by exactly one record length when a fixed hint is
/// given), upholding the engine's cursor contract. Records excluded by
/// the selection filter are skipped silently.
#[derive(Debug, Default, Clone, Copy)]
pub struct WireDecoder;

impl WireDecoder {
    /// Creates a decoder.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Position of the next magic marker strictly after `from`, or the end
/// of the buffer.
fn next_magic(buf: &[u8], from: usize) -> usize {
    buf.get(from + 1..)
        .and_then(|tail| tail.windows(WIRE_MAGIC.len()).position(|w| w == WIRE_MAGIC))
        .map_or(buf.len(), |pos| from + 1 + pos)
}

/// Cursor position to resume from after an unparseable region at `start`.
fn resync(buf: &[u8], start: usize, hint: RecordLengthHint) -> u64 {
    match hint {
        RecordLengthHint::Fixed(len) if len > 0 => {
            buf.len().min(start + len as usize) as u64
        }
        _ => next_magic(buf, start) as u64,
    }
}

fn take_field(cur: &mut &[u8], at: u64) -> DecodeResult<String> {
    let raw = &cur[..FIELD_CAPACITY];
    let end = raw.iter().position(|&b| b == 0).unwrap_or(FIELD_CAPACITY);
    let text = std::str::from_utf8(&raw[..end])
        .map_err(|_| DecodeError::corrupt(at, "identifier field is not UTF-8"))?
        .to_string();
    cur.advance(FIELD_CAPACITY);
    Ok(text)
}

/// Parses one complete, checksum-verified frame.
fn parse_frame(frame: &[u8], at: u64) -> DecodeResult<Record> {
    let mut cur = &frame[8..frame.len() - TRAILER_LEN];

    let network = take_field(&mut cur, at)?;
    let station = take_field(&mut cur, at)?;
    let location = take_field(&mut cur, at)?;
    let channel = take_field(&mut cur, at)?;
    let quality = cur.get_u8() as char;
    let start_time = HpTime::from_ticks(cur.get_i64_le());
    let sample_rate = f64::from_bits(cur.get_u64_le());
    let tag = cur.get_u8();
    let sample_count = u64::from(cur.get_u32_le());
    let blockette_count = cur.get_u16_le();

    if !sample_rate.is_finite() || sample_rate < 0.0 {
        return Err(DecodeError::corrupt(at, "invalid sample rate"));
    }
    let sample_type = SampleType::from_tag(tag)
        .ok_or_else(|| DecodeError::corrupt(at, format!("unknown sample type tag {tag:#04x}")))?;

    let mut blockettes = Vec::with_capacity(usize::from(blockette_count));
    for _ in 0..blockette_count {
        if cur.remaining() < 4 {
            return Err(DecodeError::corrupt(at, "blockette overruns record"));
        }
        let type_code = cur.get_u16_le();
        let len = usize::from(cur.get_u16_le());
        if cur.remaining() < len {
            return Err(DecodeError::corrupt(at, "blockette payload overruns record"));
        }
        let payload = cur[..len].to_vec();
        cur.advance(len);
        blockettes.push(Blockette::new(type_code, payload));
    }

    let sample_bytes = sample_count as usize * sample_type.sample_size();
    if cur.remaining() != sample_bytes {
        return Err(DecodeError::corrupt(
            at,
            format!(
                "record carries {} sample bytes, header claims {sample_bytes}",
                cur.remaining()
            ),
        ));
    }
    let samples = cur.to_vec();

    // End time is decode-derived: time of the last sample.
    let end_time = if sample_rate != 0.0 && sample_count > 0 {
        start_time.offset(((sample_count - 1) as f64 / sample_rate * HPT_MODULUS as f64) as i64)
    } else {
        start_time
    };

    Ok(Record {
        network,
        station,
        location,
        channel,
        quality,
        start_time,
        end_time,
        sample_rate,
        sample_type,
        sample_count,
        samples,
        blockettes,
        rec_len: frame.len() as u64,
    })
}

impl RecordDecoder for WireDecoder {
    type Filter = SelectionList;

    fn decode_next(
        &mut self,
        buf: &[u8],
        offset: &mut u64,
        filter: Option<&SelectionList>,
        hint: RecordLengthHint,
        verbose: bool,
    ) -> DecodeResult<Record> {
        loop {
            let start = *offset as usize;
            let remaining = buf.len().saturating_sub(start);
            if remaining == 0 {
                return Err(DecodeError::NoRecord { offset: *offset });
            }

            if remaining < WIRE_MAGIC.len() || buf[start..start + WIRE_MAGIC.len()] != WIRE_MAGIC {
                *offset = resync(buf, start, hint);
                if verbose {
                    debug!(start, resumed = *offset, "no record marker, resynchronized");
                }
                return Err(DecodeError::NoRecord {
                    offset: start as u64,
                });
            }

            if remaining < 8 {
                *offset = buf.len() as u64;
                return Err(DecodeError::Truncated {
                    offset: start as u64,
                    needed: 8,
                    available: remaining as u64,
                });
            }

            let rec_len = u32::from_le_bytes([
                buf[start + 4],
                buf[start + 5],
                buf[start + 6],
                buf[start + 7],
            ]) as usize;

            if rec_len < MIN_RECORD_LEN {
                *offset = resync(buf, start, hint);
                return Err(DecodeError::corrupt(
                    start as u64,
                    format!("impossible record length {rec_len}"),
                ));
            }
            if rec_len > remaining {
                *offset = buf.len() as u64;
                return Err(DecodeError::Truncated {
                    offset: start as u64,
                    needed: rec_len as u64,
                    available: remaining as u64,
                });
            }

            let frame = &buf[start..start + rec_len];
            let stored_crc = u32::from_le_bytes([
                frame[rec_len - 4],
                frame[rec_len - 3],
                frame[rec_len - 2],
                frame[rec_len - 1],
            ]);
            if compute_crc32(&frame[..rec_len - 4]) != stored_crc {
                // The length field is as suspect as the rest of the frame.
                *offset = resync(buf, start, hint);
                return Err(DecodeError::corrupt(start as u64, "checksum mismatch"));
            }

            let record = match parse_frame(frame, start as u64) {
                Ok(record) => record,
                Err(err) => {
                    // Checksum passed, so the frame boundary is trustworthy.
                    *offset = (start + rec_len) as u64;
                    return Err(err);
                }
            };

            if let Some(list) = filter {
                if !list.matches(&record) {
                    trace!(offset = start, key = %record.station_key(), "record excluded by selection");
                    *offset = (start + rec_len) as u64;
                    continue;
                }
            }

            // Leave the cursor at the record start; the driver advances
            // by `rec_len` after a successful decode.
            return Ok(record);
        }
    }
}

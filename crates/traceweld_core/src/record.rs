//! Decoded telemetry record model.

use crate::types::{HpTime, SampleType, StationKey, TimingQuality};

/// Blockette type carrying the timing quality byte.
pub const TIMING_QUALITY_BLOCKETTE: u16 = 1001;

/// An opaque metadata sub-block attached to a record.
///
/// The payload excludes the four-byte on-wire blockette header; field
/// offsets in [`FieldDescriptor`](crate::FieldDescriptor)s are relative
/// to the start of the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blockette {
    /// Blockette type code.
    pub type_code: u16,
    /// Raw payload bytes.
    pub payload: Vec<u8>,
}

impl Blockette {
    /// Creates a blockette from a type code and payload bytes.
    #[must_use]
    pub fn new(type_code: u16, payload: Vec<u8>) -> Self {
        Self { type_code, payload }
    }
}

/// One decoded unit of telemetry data.
///
/// Records are produced by a [`RecordDecoder`](crate::RecordDecoder)
/// and treated as ground truth by the assembly engine: header fields,
/// sample bytes and the decode-derived end time are never recomputed here.
/// A record is owned by exactly one segment's record list; its sample
/// buffer is released the moment it has been copied into the segment's
/// final buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Network code.
    pub network: String,
    /// Station code.
    pub station: String,
    /// Location code.
    pub location: String,
    /// Channel code.
    pub channel: String,
    /// Data-quality indicator.
    pub quality: char,
    /// Time of the first sample.
    pub start_time: HpTime,
    /// Time of the last sample, `start + (samplecnt - 1) / rate`,
    /// computed by the decoder.
    pub end_time: HpTime,
    /// Nominal sample rate in Hz; `0.0` means unknown/irregular.
    pub sample_rate: f64,
    /// Sample encoding.
    pub sample_type: SampleType,
    /// Number of samples in the buffer.
    pub sample_count: u64,
    /// Owned sample bytes, `sample_count * sample_size` long.
    pub samples: Vec<u8>,
    /// Metadata sub-blocks in wire order.
    pub blockettes: Vec<Blockette>,
    /// Encoded length of this record in the input buffer; the driver
    /// advances the scan cursor by this much after a successful decode.
    pub rec_len: u64,
}

impl Record {
    /// Returns the five-component identifier this record routes by.
    #[must_use]
    pub fn station_key(&self) -> StationKey {
        StationKey {
            network: self.network.clone(),
            station: self.station.clone(),
            location: self.location.clone(),
            channel: self.channel.clone(),
            quality: self.quality,
        }
    }

    /// Number of sample bytes this record claims to own.
    #[must_use]
    pub fn sample_bytes(&self) -> usize {
        self.sample_count as usize * self.sample_type.sample_size()
    }

    /// Timing quality from blockette 1001, if present.
    #[must_use]
    pub fn timing_quality(&self) -> TimingQuality {
        self.blockettes
            .iter()
            .find(|b| b.type_code == TIMING_QUALITY_BLOCKETTE)
            .and_then(|b| b.payload.first())
            .map_or(TimingQuality::UNKNOWN, |&q| TimingQuality::new(q))
    }
}

//! Record fixtures and buffer helpers.
//!
//! Provides convenience builders for records and encoded buffers so
//! tests can describe streams by what matters (timing, identity,
//! metadata) and leave the rest at sensible defaults.

use traceweld_codec::encode_records;
use traceweld_core::{Blockette, HpTime, Record, SampleType, HPT_MODULUS};

/// Builds records with overridable defaults: `XX.TEST..BHZ.D`, 40 Hz,
/// 32-bit integers, 100 samples starting at the epoch, sample bytes
/// filled with a constant.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    network: String,
    station: String,
    location: String,
    channel: String,
    quality: char,
    start_time: HpTime,
    sample_rate: f64,
    sample_type: SampleType,
    sample_count: u64,
    fill: u8,
    blockettes: Vec<Blockette>,
}

impl Default for RecordBuilder {
    fn default() -> Self {
        Self {
            network: "XX".to_string(),
            station: "TEST".to_string(),
            location: String::new(),
            channel: "BHZ".to_string(),
            quality: 'D',
            start_time: HpTime::from_seconds(0),
            sample_rate: 40.0,
            sample_type: SampleType::Integer32,
            sample_count: 100,
            fill: 0,
            blockettes: Vec::new(),
        }
    }
}

impl RecordBuilder {
    /// Creates a builder with the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the network code.
    #[must_use]
    pub fn network(mut self, value: impl Into<String>) -> Self {
        self.network = value.into();
        self
    }

    /// Sets the station code.
    #[must_use]
    pub fn station(mut self, value: impl Into<String>) -> Self {
        self.station = value.into();
        self
    }

    /// Sets the location code.
    #[must_use]
    pub fn location(mut self, value: impl Into<String>) -> Self {
        self.location = value.into();
        self
    }

    /// Sets the channel code.
    #[must_use]
    pub fn channel(mut self, value: impl Into<String>) -> Self {
        self.channel = value.into();
        self
    }

    /// Sets the data-quality indicator.
    #[must_use]
    pub fn quality(mut self, value: char) -> Self {
        self.quality = value;
        self
    }

    /// Sets the start time.
    #[must_use]
    pub fn start(mut self, value: HpTime) -> Self {
        self.start_time = value;
        self
    }

    /// Sets the start time in raw ticks.
    #[must_use]
    pub fn start_ticks(mut self, ticks: i64) -> Self {
        self.start_time = HpTime::from_ticks(ticks);
        self
    }

    /// Sets the sample rate in Hz.
    #[must_use]
    pub fn rate(mut self, value: f64) -> Self {
        self.sample_rate = value;
        self
    }

    /// Sets the sample type.
    #[must_use]
    pub fn sample_type(mut self, value: SampleType) -> Self {
        self.sample_type = value;
        self
    }

    /// Sets the sample count (the buffer is regenerated at build).
    #[must_use]
    pub fn samples(mut self, count: u64) -> Self {
        self.sample_count = count;
        self
    }

    /// Sets the byte every sample is filled with.
    #[must_use]
    pub fn fill(mut self, value: u8) -> Self {
        self.fill = value;
        self
    }

    /// Appends a blockette.
    #[must_use]
    pub fn blockette(mut self, type_code: u16, payload: Vec<u8>) -> Self {
        self.blockettes.push(Blockette::new(type_code, payload));
        self
    }

    /// Nominal inter-sample spacing in ticks for the configured rate.
    #[must_use]
    pub fn delta_ticks(&self) -> i64 {
        if self.sample_rate != 0.0 {
            (HPT_MODULUS as f64 / self.sample_rate) as i64
        } else {
            0
        }
    }

    /// Start tick of a record that follows this one contiguously.
    #[must_use]
    pub fn next_start_ticks(&self) -> i64 {
        self.start_time.as_ticks() + self.sample_count as i64 * self.delta_ticks()
    }

    /// Builds the record. The end time is derived the way a decoder
    /// would: `start + (count - 1) / rate`.
    #[must_use]
    pub fn build(&self) -> Record {
        let end_time = if self.sample_rate != 0.0 && self.sample_count > 0 {
            self.start_time.offset(
                ((self.sample_count - 1) as f64 / self.sample_rate * HPT_MODULUS as f64) as i64,
            )
        } else {
            self.start_time
        };

        Record {
            network: self.network.clone(),
            station: self.station.clone(),
            location: self.location.clone(),
            channel: self.channel.clone(),
            quality: self.quality,
            start_time: self.start_time,
            end_time,
            sample_rate: self.sample_rate,
            sample_type: self.sample_type,
            sample_count: self.sample_count,
            samples: vec![self.fill; self.sample_count as usize * self.sample_type.sample_size()],
            blockettes: self.blockettes.clone(),
            rec_len: 0,
        }
    }
}

/// Builds `n` contiguous records from `base`, each holding `base`'s
/// sample count and filled with its index (1-based) for easy
/// identification in materialized buffers.
#[must_use]
pub fn contiguous_run(base: &RecordBuilder, n: usize) -> Vec<Record> {
    let mut records = Vec::with_capacity(n);
    let mut builder = base.clone();
    for i in 0..n {
        builder = builder.fill((i + 1) as u8);
        records.push(builder.build());
        let next_start = builder.next_start_ticks();
        builder = builder.start_ticks(next_start);
    }
    records
}

/// Encodes records into one wire buffer, panicking on encoder misuse
/// (fixtures are expected to be well formed).
#[must_use]
pub fn encode_buffer(records: &[Record]) -> Vec<u8> {
    encode_records(records).expect("fixture records must encode")
}

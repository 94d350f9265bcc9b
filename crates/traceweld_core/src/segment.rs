//! Segments, identifier buckets and the bucket registry.

use crate::extract::AuxFields;
use crate::record::Record;
use crate::types::{Calibration, HpTime, SampleType, StationKey, TimingQuality, HPT_MODULUS};
use std::collections::HashMap;

/// A maximal run of time-contiguous, metadata-consistent records.
///
/// Invariants maintained by [`open`](Segment::open) and
/// [`append`](Segment::append):
///
/// - every record in `records` satisfied the continuity predicate against
///   the segment's state at the time it was appended;
/// - `end_time` equals the decode-derived end time of the most recently
///   appended record;
/// - `sample_count` is the sum of all constituent records' counts.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Time of the first sample of the first record.
    pub start_time: HpTime,
    /// Time of the last sample of the last record.
    pub end_time: HpTime,
    /// Nominal sample rate in Hz; `0.0` for irregular data.
    pub sample_rate: f64,
    /// Sample encoding shared by all constituent records.
    pub sample_type: SampleType,
    /// Total samples across all constituent records.
    pub sample_count: u64,
    /// Nominal inter-sample spacing in ticks; 0 when the rate is 0.
    pub hp_delta: i64,
    /// Timing quality snapshot taken at open.
    pub timing_quality: TimingQuality,
    /// Calibration classification snapshot taken at open.
    pub calibration: Calibration,
    /// Owned copy of the auxiliary comparison buffer taken at open.
    pub field_buf: Vec<u8>,
    /// Constituent records in arrival order.
    pub records: Vec<Record>,
    /// Final contiguous sample buffer, populated at materialization.
    pub samples: Option<Vec<u8>>,
}

impl Segment {
    /// Opens a new segment seeded from a single record.
    ///
    /// The auxiliary buffer is copied out of the extractor's scratch so
    /// the segment owns its comparison state independently.
    #[must_use]
    pub fn open(record: Record, aux: &AuxFields<'_>) -> Self {
        let hp_delta = if record.sample_rate != 0.0 {
            (HPT_MODULUS as f64 / record.sample_rate) as i64
        } else {
            0
        };

        Self {
            start_time: record.start_time,
            end_time: record.end_time,
            sample_rate: record.sample_rate,
            sample_type: record.sample_type,
            sample_count: record.sample_count,
            hp_delta,
            timing_quality: aux.timing_quality,
            calibration: aux.calibration,
            field_buf: aux.fields.to_vec(),
            records: vec![record],
            samples: None,
        }
    }

    /// Appends a record the continuity classifier accepted.
    pub fn append(&mut self, record: Record) {
        self.sample_count += record.sample_count;
        self.end_time = record.end_time;
        self.records.push(record);
    }

    /// Whether this segment has been materialized.
    #[must_use]
    pub fn is_materialized(&self) -> bool {
        self.samples.is_some()
    }
}

/// One identifier's bucket: the five-component key plus its ordered
/// segment chain. The last segment in the chain is the open one.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentifierBucket {
    /// The routing key.
    pub key: StationKey,
    /// Segments in creation order.
    pub segments: Vec<Segment>,
}

impl IdentifierBucket {
    /// Creates an empty bucket for a key.
    #[must_use]
    pub fn new(key: StationKey) -> Self {
        Self {
            key,
            segments: Vec::new(),
        }
    }

    /// The degenerate keyless bucket returned for empty input.
    #[must_use]
    pub fn keyless() -> Self {
        Self::new(StationKey::empty())
    }

    /// The currently open segment, if any.
    #[must_use]
    pub fn open_segment(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// Mutable access to the currently open segment.
    pub fn open_segment_mut(&mut self) -> Option<&mut Segment> {
        self.segments.last_mut()
    }
}

/// Routes records to identifier buckets by exact key equality.
///
/// Buckets are stored in creation order (first-encounter order of each
/// key, which is deterministic for a fixed input) with a hash index on
/// the side for lookup. Buckets are never removed within one run.
#[derive(Debug, Default)]
pub struct BucketRegistry {
    buckets: Vec<IdentifierBucket>,
    index: HashMap<StationKey, usize>,
}

impl BucketRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the bucket for `key`, creating it on first encounter.
    ///
    /// Returns the bucket's index in creation order.
    pub fn lookup_or_create(&mut self, key: &StationKey) -> usize {
        if let Some(&idx) = self.index.get(key) {
            return idx;
        }
        let idx = self.buckets.len();
        self.buckets.push(IdentifierBucket::new(key.clone()));
        self.index.insert(key.clone(), idx);
        idx
    }

    /// Bucket access by index.
    pub fn bucket_mut(&mut self, idx: usize) -> &mut IdentifierBucket {
        &mut self.buckets[idx]
    }

    /// Number of buckets created so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Whether no bucket has been created yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Iterates buckets mutably in creation order (used by the flush).
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut IdentifierBucket> {
        self.buckets.iter_mut()
    }

    /// Consumes the registry, yielding buckets in creation order.
    #[must_use]
    pub fn into_buckets(self) -> Vec<IdentifierBucket> {
        self.buckets
    }
}

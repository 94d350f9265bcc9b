//! Auxiliary field extraction from a record's blockette chain.
//!
//! Continuity between records is judged not only on timing but on a set
//! of caller-configured blockette sub-fields plus two derived scalars
//! (timing quality and calibration classification). The extractor pulls
//! those out of each record into a reusable scratch buffer with a fixed
//! layout, so the classifier can compare them bytewise.

use crate::record::Record;
use crate::types::{Calibration, TimingQuality};
use serde::{Deserialize, Serialize};

/// One configured sub-field: `len` bytes at `offset` within the payload
/// of any blockette whose type code matches `blockette`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Blockette type code this descriptor matches.
    pub blockette: u16,
    /// Byte offset within the blockette payload.
    pub offset: u32,
    /// Number of bytes to copy.
    pub len: u32,
}

impl FieldDescriptor {
    /// Creates a descriptor.
    #[must_use]
    pub const fn new(blockette: u16, offset: u32, len: u32) -> Self {
        Self {
            blockette,
            offset,
            len,
        }
    }
}

/// The extractor's per-record output.
///
/// `fields` borrows the extractor's scratch buffer and is only valid
/// until the next extraction; segments that need to keep it take their
/// own copy at open time.
#[derive(Debug, Clone, Copy)]
pub struct AuxFields<'a> {
    /// Timing quality from blockette 1001, or the unknown sentinel.
    pub timing_quality: TimingQuality,
    /// Calibration classification, last matching blockette wins.
    pub calibration: Calibration,
    /// Fixed-layout extracted sub-field bytes.
    pub fields: &'a [u8],
}

impl AuxFields<'static> {
    /// The output used when extraction is skipped entirely: defaults
    /// everywhere, so every record compares equal on these criteria.
    #[must_use]
    pub const fn inactive() -> Self {
        Self {
            timing_quality: TimingQuality::UNKNOWN,
            calibration: Calibration::None,
            fields: &[],
        }
    }
}

/// Extracts auxiliary comparison fields from records.
///
/// The scratch buffer is private, sequentially overwritten working
/// storage: its total length is the sum of all descriptor lengths,
/// computed once, and each extraction overwrites the slots whose
/// descriptor matched one of the record's blockettes. Slots with no
/// matching blockette keep whatever the previous record left there,
/// matching the original assembler's behavior.
#[derive(Debug)]
pub struct AuxExtractor {
    descriptors: Vec<FieldDescriptor>,
    scratch: Vec<u8>,
}

impl AuxExtractor {
    /// Creates an extractor for the given descriptor list.
    #[must_use]
    pub fn new(descriptors: Vec<FieldDescriptor>) -> Self {
        let total: usize = descriptors.iter().map(|d| d.len as usize).sum();
        Self {
            descriptors,
            scratch: vec![0; total],
        }
    }

    /// Total length of the fixed-layout output buffer.
    #[must_use]
    pub fn layout_len(&self) -> usize {
        self.scratch.len()
    }

    /// Whether extraction should run at all for this configuration.
    ///
    /// Extraction is pure overhead unless the caller asked for detail
    /// scalars or configured at least one sub-field.
    #[must_use]
    pub fn active(&self, details: bool) -> bool {
        details || !self.scratch.is_empty()
    }

    /// Extracts auxiliary fields from one record.
    ///
    /// Walks the blockette chain once: matched descriptor slots are
    /// overwritten in layout order, the calibration classification is
    /// taken from the last calibration blockette seen, and the timing
    /// quality comes from blockette 1001. A descriptor whose range falls
    /// outside the matching blockette's payload leaves its slot untouched.
    pub fn extract(&mut self, record: &Record) -> AuxFields<'_> {
        let mut calibration = Calibration::None;

        for blockette in &record.blockettes {
            let mut step = 0usize;
            for desc in &self.descriptors {
                let len = desc.len as usize;
                if blockette.type_code == desc.blockette {
                    let start = desc.offset as usize;
                    if let Some(src) = blockette.payload.get(start..start + len) {
                        self.scratch[step..step + len].copy_from_slice(src);
                    }
                }
                step += len;
            }

            if let Some(kind) = Calibration::from_blockette(blockette.type_code) {
                calibration = kind;
            }
        }

        AuxFields {
            timing_quality: record.timing_quality(),
            calibration,
            fields: &self.scratch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Blockette;
    use crate::types::{HpTime, SampleType};

    fn record_with_blockettes(blockettes: Vec<Blockette>) -> Record {
        Record {
            network: "XX".to_string(),
            station: "TEST".to_string(),
            location: String::new(),
            channel: "BHZ".to_string(),
            quality: 'D',
            start_time: HpTime::from_seconds(0),
            end_time: HpTime::from_seconds(1),
            sample_rate: 1.0,
            sample_type: SampleType::Integer32,
            sample_count: 2,
            samples: vec![0; 8],
            blockettes,
            rec_len: 64,
        }
    }

    #[test]
    fn empty_descriptor_list_yields_empty_buffer() {
        let mut ex = AuxExtractor::new(Vec::new());
        assert_eq!(ex.layout_len(), 0);
        let aux = ex.extract(&record_with_blockettes(vec![Blockette::new(
            100,
            vec![1, 2, 3],
        )]));
        assert!(aux.fields.is_empty());
    }

    #[test]
    fn matched_fields_land_at_layout_offsets() {
        let mut ex = AuxExtractor::new(vec![
            FieldDescriptor::new(100, 1, 2),
            FieldDescriptor::new(200, 0, 1),
        ]);
        assert_eq!(ex.layout_len(), 3);

        let rec = record_with_blockettes(vec![
            Blockette::new(100, vec![0xAA, 0xBB, 0xCC]),
            Blockette::new(200, vec![0xDD]),
        ]);
        let aux = ex.extract(&rec);
        assert_eq!(aux.fields, &[0xBB, 0xCC, 0xDD]);
    }

    #[test]
    fn unmatched_slot_keeps_previous_contents() {
        let mut ex = AuxExtractor::new(vec![FieldDescriptor::new(100, 0, 1)]);

        let first = record_with_blockettes(vec![Blockette::new(100, vec![0x7F])]);
        assert_eq!(ex.extract(&first).fields, &[0x7F]);

        // Second record has no blockette 100; the slot carries over.
        let second = record_with_blockettes(Vec::new());
        assert_eq!(ex.extract(&second).fields, &[0x7F]);
    }

    #[test]
    fn out_of_range_descriptor_is_skipped() {
        let mut ex = AuxExtractor::new(vec![FieldDescriptor::new(100, 4, 4)]);
        let rec = record_with_blockettes(vec![Blockette::new(100, vec![1, 2])]);
        assert_eq!(ex.extract(&rec).fields, &[0, 0, 0, 0]);
    }

    #[test]
    fn calibration_last_wins_and_resets_per_record() {
        let mut ex = AuxExtractor::new(Vec::new());

        let both = record_with_blockettes(vec![
            Blockette::new(300, vec![0; 4]),
            Blockette::new(395, vec![0; 4]),
        ]);
        assert_eq!(ex.extract(&both).calibration, Calibration::Abort);

        let none = record_with_blockettes(Vec::new());
        assert_eq!(ex.extract(&none).calibration, Calibration::None);
    }

    #[test]
    fn timing_quality_extracted() {
        let mut ex = AuxExtractor::new(Vec::new());
        let rec = record_with_blockettes(vec![Blockette::new(1001, vec![42, 0, 0, 0])]);
        assert_eq!(ex.extract(&rec).timing_quality, TimingQuality::new(42));
    }

    #[test]
    fn inactive_when_no_details_and_no_descriptors() {
        let ex = AuxExtractor::new(Vec::new());
        assert!(!ex.active(false));
        assert!(ex.active(true));

        let ex = AuxExtractor::new(vec![FieldDescriptor::new(100, 0, 1)]);
        assert!(ex.active(false));
    }
}

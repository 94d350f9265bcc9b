//! The continuity classifier.
//!
//! Continuity means "no information changed and no unexplained time
//! gap": a candidate record merges into the open segment only when its
//! sample encoding, rate, timing quality, calibration state and
//! auxiliary fields all match, and its start time lands within half a
//! nominal sample interval of where the segment's next sample is due.
//! The tolerance scales with the sample rate because higher-rate
//! channels need tighter absolute bounds.

use crate::extract::AuxFields;
use crate::record::Record;
use crate::segment::Segment;

/// Fractional sample-rate tolerance: `|1 - a/b| < 1e-4`.
pub const SAMPLE_RATE_TOLERANCE: f64 = 1e-4;

/// Whether two nominal sample rates are close enough to merge.
///
/// Exact equality short-circuits so that two irregular (rate 0) streams
/// compare equal without dividing by zero.
#[must_use]
pub fn rate_tolerable(a: f64, b: f64) -> bool {
    a == b || (1.0 - a / b).abs() < SAMPLE_RATE_TOLERANCE
}

/// Time tolerance in ticks for a segment with the given sample spacing.
///
/// Half the nominal interval, truncated; 0 when the spacing is 0, which
/// demands an exact timestamp match for irregular-rate data.
#[must_use]
pub fn time_tolerance(hp_delta: i64) -> i64 {
    (0.5 * hp_delta as f64) as i64
}

/// Decides whether `record` extends the open segment.
///
/// Pure predicate over read-only inputs. `None` for the open segment
/// (an identifier with no open segment yet) always answers false, which
/// makes the driver open a fresh segment.
///
/// The gap is measured as `record.start - segment.end - hp_delta`, i.e.
/// the deviation from the expected next-sample time, and accepted when
/// it lies in `[-tol, tol]`. When `tol` truncates to 0 the lower bound
/// is 0 rather than `-0`, so a zero-spacing segment never absorbs a
/// record with any nonzero gap, including small negative ones.
#[must_use]
pub fn accepts(open_segment: Option<&Segment>, record: &Record, aux: &AuxFields<'_>) -> bool {
    let Some(segment) = open_segment else {
        return false;
    };

    let tol = time_tolerance(segment.hp_delta);
    let neg_tol = if tol != 0 { -tol } else { 0 };
    let gap = record
        .start_time
        .ticks_since(segment.end_time)
        .saturating_sub(segment.hp_delta);

    segment.sample_type == record.sample_type
        && rate_tolerable(segment.sample_rate, record.sample_rate)
        && gap <= tol
        && gap >= neg_tol
        && segment.timing_quality == aux.timing_quality
        && segment.calibration == aux.calibration
        && segment.field_buf == aux.fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Calibration, HpTime, SampleType, TimingQuality};

    const RATE: f64 = 40.0;
    const DELTA: i64 = 25_000; // ticks per sample at 40 Hz

    fn record_at(start_ticks: i64) -> Record {
        let count = 100u64;
        Record {
            network: "XX".to_string(),
            station: "TEST".to_string(),
            location: String::new(),
            channel: "BHZ".to_string(),
            quality: 'D',
            start_time: HpTime::from_ticks(start_ticks),
            end_time: HpTime::from_ticks(start_ticks).offset((count as i64 - 1) * DELTA),
            sample_rate: RATE,
            sample_type: SampleType::Integer32,
            sample_count: count,
            samples: vec![0; count as usize * 4],
            blockettes: Vec::new(),
            rec_len: 512,
        }
    }

    fn open_segment() -> Segment {
        Segment::open(record_at(0), &AuxFields::inactive())
    }

    /// Start tick of a record that lands exactly one sample after `seg`.
    fn contiguous_start(seg: &Segment) -> i64 {
        seg.end_time.as_ticks() + seg.hp_delta
    }

    #[test]
    fn no_open_segment_never_accepts() {
        assert!(!accepts(None, &record_at(0), &AuxFields::inactive()));
    }

    #[test]
    fn contiguous_record_accepted() {
        let seg = open_segment();
        let rec = record_at(contiguous_start(&seg));
        assert!(accepts(Some(&seg), &rec, &AuxFields::inactive()));
    }

    #[test]
    fn gap_at_half_interval_accepted() {
        let seg = open_segment();
        let rec = record_at(contiguous_start(&seg) + DELTA / 2);
        assert!(accepts(Some(&seg), &rec, &AuxFields::inactive()));
    }

    #[test]
    fn gap_beyond_half_interval_rejected() {
        let seg = open_segment();
        // 1.51 nominal intervals after the last sample.
        let rec = record_at(seg.end_time.as_ticks() + (1.51 * DELTA as f64) as i64);
        assert!(!accepts(Some(&seg), &rec, &AuxFields::inactive()));
    }

    #[test]
    fn overlap_within_tolerance_accepted() {
        let seg = open_segment();
        let rec = record_at(contiguous_start(&seg) - DELTA / 2);
        assert!(accepts(Some(&seg), &rec, &AuxFields::inactive()));
    }

    #[test]
    fn rate_tolerance_boundary() {
        let seg = open_segment();

        let mut near = record_at(contiguous_start(&seg));
        near.sample_rate = RATE * (1.0 + 0.99e-4);
        assert!(accepts(Some(&seg), &near, &AuxFields::inactive()));

        let mut far = record_at(contiguous_start(&seg));
        far.sample_rate = RATE * (1.0 + 1.01e-4);
        assert!(!accepts(Some(&seg), &far, &AuxFields::inactive()));
    }

    #[test]
    fn rate_tolerance_is_order_independent() {
        assert!(rate_tolerable(RATE, RATE * (1.0 + 0.99e-4)));
        assert!(rate_tolerable(RATE * (1.0 + 0.99e-4), RATE));
        assert!(!rate_tolerable(RATE, RATE * (1.0 + 1.01e-4)));
        assert!(!rate_tolerable(RATE * (1.0 + 1.01e-4), RATE));
    }

    #[test]
    fn zero_rates_compare_equal() {
        assert!(rate_tolerable(0.0, 0.0));
        assert!(!rate_tolerable(0.0, 40.0));
    }

    #[test]
    fn sample_type_mismatch_rejected() {
        let seg = open_segment();
        let mut rec = record_at(contiguous_start(&seg));
        rec.sample_type = SampleType::Float32;
        assert!(!accepts(Some(&seg), &rec, &AuxFields::inactive()));
    }

    #[test]
    fn zero_delta_requires_exact_timestamp() {
        let mut base = record_at(0);
        base.sample_rate = 0.0;
        let seg = Segment::open(base, &AuxFields::inactive());
        assert_eq!(seg.hp_delta, 0);

        let mut exact = record_at(seg.end_time.as_ticks());
        exact.sample_rate = 0.0;
        assert!(accepts(Some(&seg), &exact, &AuxFields::inactive()));

        let mut late = record_at(seg.end_time.as_ticks() + 1);
        late.sample_rate = 0.0;
        assert!(!accepts(Some(&seg), &late, &AuxFields::inactive()));

        // The lower bound is 0, not -0: small negative gaps are out too.
        let mut early = record_at(seg.end_time.as_ticks() - 1);
        early.sample_rate = 0.0;
        assert!(!accepts(Some(&seg), &early, &AuxFields::inactive()));
    }

    #[test]
    fn timing_quality_mismatch_rejected() {
        let seg = open_segment();
        let rec = record_at(contiguous_start(&seg));
        let aux = AuxFields {
            timing_quality: TimingQuality::new(90),
            ..AuxFields::inactive()
        };
        assert!(!accepts(Some(&seg), &rec, &aux));
    }

    #[test]
    fn calibration_mismatch_rejected() {
        let seg = open_segment();
        let rec = record_at(contiguous_start(&seg));
        let aux = AuxFields {
            calibration: Calibration::Sine,
            ..AuxFields::inactive()
        };
        assert!(!accepts(Some(&seg), &rec, &aux));
    }

    #[test]
    fn aux_buffer_mismatch_rejected() {
        let mut seg = open_segment();
        seg.field_buf = vec![1, 2, 3];
        let rec = record_at(contiguous_start(&seg));

        let same = AuxFields {
            fields: &[1, 2, 3],
            ..AuxFields::inactive()
        };
        assert!(accepts(Some(&seg), &rec, &same));

        let differs = AuxFields {
            fields: &[1, 2, 4],
            ..AuxFields::inactive()
        };
        assert!(!accepts(Some(&seg), &rec, &differs));
    }

    #[test]
    fn empty_aux_buffers_trivially_equal() {
        let seg = open_segment();
        let rec = record_at(contiguous_start(&seg));
        assert!(seg.field_buf.is_empty());
        assert!(accepts(Some(&seg), &rec, &AuxFields::inactive()));
    }

    #[test]
    fn tolerance_truncates_ticks() {
        assert_eq!(time_tolerance(25_000), 12_500);
        assert_eq!(time_tolerance(25_001), 12_500);
        assert_eq!(time_tolerance(0), 0);
    }

    #[test]
    fn extreme_timestamps_do_not_panic() {
        let seg = open_segment();
        assert!(!accepts(
            Some(&seg),
            &record_at(i64::MAX - 1),
            &AuxFields::inactive()
        ));
        assert!(!accepts(
            Some(&seg),
            &record_at(i64::MIN + 1),
            &AuxFields::inactive()
        ));
    }

    proptest::proptest! {
        #[test]
        fn identical_rates_always_tolerable(rate in 0.0f64..10_000.0) {
            proptest::prop_assert!(rate_tolerable(rate, rate));
        }

        /// Fractional differences well inside the tolerance are accepted
        /// in both comparison orders.
        #[test]
        fn nearby_rates_tolerable_both_ways(
            rate in 0.01f64..10_000.0,
            jitter in -0.9e-4f64..0.9e-4,
        ) {
            let other = rate * (1.0 + jitter);
            proptest::prop_assert!(rate_tolerable(rate, other));
            proptest::prop_assert!(rate_tolerable(other, rate));
        }

        /// Fractional differences well outside the tolerance are rejected
        /// in both comparison orders.
        #[test]
        fn distinct_rates_rejected_both_ways(
            rate in 0.01f64..10_000.0,
            jitter in 1.1e-4f64..1e-2,
        ) {
            let other = rate * (1.0 + jitter);
            proptest::prop_assert!(!rate_tolerable(rate, other));
            proptest::prop_assert!(!rate_tolerable(other, rate));
        }

        #[test]
        fn tolerance_is_half_the_interval(delta in 0i64..1_000_000_000) {
            proptest::prop_assert_eq!(time_tolerance(delta), delta / 2);
        }

        /// The gap bound alone decides acceptance when all metadata
        /// matches: inside `[-tol, tol]` merges, outside splits.
        #[test]
        fn gap_bound_decides_acceptance(gap in -100_000i64..100_000) {
            let seg = open_segment();
            let tol = time_tolerance(seg.hp_delta);
            let rec = record_at(contiguous_start(&seg) + gap);
            let accepted = accepts(Some(&seg), &rec, &AuxFields::inactive());
            proptest::prop_assert_eq!(accepted, gap >= -tol && gap <= tol);
        }
    }
}

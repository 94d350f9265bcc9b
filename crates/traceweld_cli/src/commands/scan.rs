//! Scan command implementation.

use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use traceweld_codec::{Selection, SelectionList, WireDecoder};
use traceweld_core::{
    assemble, AssembleOptions, FieldDescriptor, HeapAllocator, IdentifierBucket, RecordLengthHint,
};

/// Parsed arguments for the scan command.
#[derive(Debug)]
pub struct ScanArgs {
    /// Path to the record buffer file.
    pub file: PathBuf,
    /// Skip sample materialization.
    pub skip_samples: bool,
    /// Extract detail scalars.
    pub details: bool,
    /// Optional JSON field-descriptor file.
    pub fields: Option<PathBuf>,
    /// Optional fixed record length.
    pub record_length: Option<u32>,
    /// Optional station filter.
    pub station: Option<String>,
    /// Optional channel filter.
    pub channel: Option<String>,
    /// Output format (text, json).
    pub format: String,
    /// Verbose decode-failure logging.
    pub verbose: bool,
}

/// Scan result for one segment.
#[derive(Debug, Serialize)]
pub struct SegmentReport {
    /// Segment start time (microsecond ticks).
    pub start_time: i64,
    /// Segment end time (microsecond ticks).
    pub end_time: i64,
    /// Nominal sample rate in Hz.
    pub sample_rate: f64,
    /// Sample type tag.
    pub sample_type: String,
    /// Total samples.
    pub sample_count: u64,
    /// Constituent record count.
    pub record_count: usize,
    /// Whether a final sample buffer was materialized.
    pub materialized: bool,
    /// Timing quality, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing_quality: Option<u8>,
}

/// Scan result for one identifier bucket.
#[derive(Debug, Serialize)]
pub struct BucketReport {
    /// The five-component identifier.
    pub key: String,
    /// Segments in creation order.
    pub segments: Vec<SegmentReport>,
}

fn report(buckets: &[IdentifierBucket]) -> Vec<BucketReport> {
    buckets
        .iter()
        .map(|bucket| BucketReport {
            key: if bucket.key.is_empty() {
                String::new()
            } else {
                bucket.key.to_string()
            },
            segments: bucket
                .segments
                .iter()
                .map(|seg| SegmentReport {
                    start_time: seg.start_time.as_ticks(),
                    end_time: seg.end_time.as_ticks(),
                    sample_rate: seg.sample_rate,
                    sample_type: seg.sample_type.to_string(),
                    sample_count: seg.sample_count,
                    record_count: seg.records.len(),
                    materialized: seg.is_materialized(),
                    timing_quality: (!seg.timing_quality.is_unknown())
                        .then(|| seg.timing_quality.as_u8()),
                })
                .collect(),
        })
        .collect()
}

fn load_descriptors(path: &PathBuf) -> Result<Vec<FieldDescriptor>, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Runs the scan command.
pub fn run(args: &ScanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let buf = fs::read(&args.file)?;
    info!(file = %args.file.display(), bytes = buf.len(), "scanning record buffer");

    let descriptors = match &args.fields {
        Some(path) => load_descriptors(path)?,
        None => Vec::new(),
    };

    let options = AssembleOptions::new()
        .want_samples(!args.skip_samples)
        .details(args.details)
        .verbose(args.verbose)
        .record_length(
            args.record_length
                .map_or(RecordLengthHint::Unknown, RecordLengthHint::Fixed),
        )
        .field_descriptors(descriptors);

    let filter = build_filter(args);
    let mut decoder = WireDecoder::new();
    let buckets = assemble(
        &buf,
        &mut decoder,
        filter.as_ref(),
        &options,
        &mut HeapAllocator,
    )?;

    let reports = report(&buckets);
    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&reports)?),
        _ => print_text(&reports),
    }

    Ok(())
}

fn build_filter(args: &ScanArgs) -> Option<SelectionList> {
    if args.station.is_none() && args.channel.is_none() {
        return None;
    }
    let mut selection = Selection::new();
    if let Some(station) = &args.station {
        selection = selection.station(station.clone());
    }
    if let Some(channel) = &args.channel {
        selection = selection.channel(channel.clone());
    }
    Some(SelectionList::from(vec![selection]))
}

fn print_text(reports: &[BucketReport]) {
    for bucket in reports {
        let key = if bucket.key.is_empty() {
            "(no data)"
        } else {
            &bucket.key
        };
        println!("{key}: {} segment(s)", bucket.segments.len());
        for (i, seg) in bucket.segments.iter().enumerate() {
            println!(
                "  [{}] {} .. {}  {} Hz  type {}  {} samples in {} record(s)",
                i,
                seg.start_time,
                seg.end_time,
                seg.sample_rate,
                seg.sample_type,
                seg.sample_count,
                seg.record_count,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use traceweld_testkit::prelude::*;

    fn write_buffer(records: &[traceweld_core::Record]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&encode_buffer(records)).unwrap();
        file.flush().unwrap();
        file
    }

    fn args_for(file: &tempfile::NamedTempFile) -> ScanArgs {
        ScanArgs {
            file: file.path().to_path_buf(),
            skip_samples: false,
            details: false,
            fields: None,
            record_length: None,
            station: None,
            channel: None,
            format: "text".to_string(),
            verbose: false,
        }
    }

    #[test]
    fn scan_runs_on_encoded_buffer() {
        let records = contiguous_run(&RecordBuilder::new().samples(10), 3);
        let file = write_buffer(&records);
        run(&args_for(&file)).unwrap();
    }

    #[test]
    fn scan_with_station_filter() {
        let records = contiguous_run(&RecordBuilder::new().station("AAA").samples(5), 2);
        let file = write_buffer(&records);

        let mut args = args_for(&file);
        args.station = Some("ZZZ".to_string());
        args.format = "json".to_string();
        run(&args).unwrap();
    }

    #[test]
    fn report_shape() {
        let records = contiguous_run(&RecordBuilder::new().samples(10), 2);
        let buf = encode_buffer(&records);
        let mut decoder = WireDecoder::new();
        let buckets = assemble(
            &buf,
            &mut decoder,
            None,
            &AssembleOptions::new(),
            &mut HeapAllocator,
        )
        .unwrap();

        let reports = report(&buckets);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].key, "XX.TEST..BHZ.D");
        assert_eq!(reports[0].segments.len(), 1);
        assert_eq!(reports[0].segments[0].sample_count, 20);
        assert!(reports[0].segments[0].materialized);
        assert!(reports[0].segments[0].timing_quality.is_none());
    }

    #[test]
    fn descriptor_file_parses() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"[{"blockette": 100, "offset": 0, "len": 4}]"#)
            .unwrap();
        file.flush().unwrap();

        let descriptors = load_descriptors(&file.path().to_path_buf()).unwrap();
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].blockette, 100);
        assert_eq!(descriptors[0].len, 4);
    }
}

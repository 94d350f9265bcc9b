//! Property-based test generators using proptest.

use crate::fixtures::RecordBuilder;
use proptest::prelude::*;
use traceweld_core::{Record, SampleType, StationKey};

/// Strategy for valid identifier field strings (wire capacity is 8).
pub fn field_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z0-9]{1,8}").expect("invalid regex")
}

/// Strategy for station keys.
pub fn station_key_strategy() -> impl Strategy<Value = StationKey> {
    (
        field_strategy(),
        field_strategy(),
        prop::string::string_regex("[A-Z0-9]{0,2}").expect("invalid regex"),
        field_strategy(),
        prop::sample::select(vec!['D', 'R', 'Q', 'M']),
    )
        .prop_map(|(network, station, location, channel, quality)| {
            StationKey::new(network, station, location, channel, quality)
        })
}

/// Strategy for sample types.
pub fn sample_type_strategy() -> impl Strategy<Value = SampleType> {
    prop::sample::select(vec![
        SampleType::Ascii,
        SampleType::Integer32,
        SampleType::Float32,
        SampleType::Float64,
    ])
}

/// Strategy for realistic sample rates (regular channels).
pub fn rate_strategy() -> impl Strategy<Value = f64> {
    prop::sample::select(vec![0.1, 1.0, 20.0, 40.0, 100.0, 200.0])
}

/// Strategy for standalone records with small sample counts.
pub fn record_strategy() -> impl Strategy<Value = Record> {
    (
        station_key_strategy(),
        rate_strategy(),
        sample_type_strategy(),
        1u64..64,
        0i64..1_000_000_000,
        any::<u8>(),
    )
        .prop_map(|(key, rate, sample_type, count, start_ticks, fill)| {
            RecordBuilder::new()
                .network(key.network)
                .station(key.station)
                .location(key.location)
                .channel(key.channel)
                .quality(key.quality)
                .rate(rate)
                .sample_type(sample_type)
                .samples(count)
                .start_ticks(start_ticks)
                .fill(fill)
                .build()
        })
}

/// Strategy for a contiguous run of 1–5 records sharing one identifier.
pub fn contiguous_run_strategy() -> impl Strategy<Value = Vec<Record>> {
    (
        station_key_strategy(),
        rate_strategy(),
        1u64..32,
        1usize..6,
    )
        .prop_map(|(key, rate, count, n)| {
            let base = RecordBuilder::new()
                .network(key.network)
                .station(key.station)
                .location(key.location)
                .channel(key.channel)
                .quality(key.quality)
                .rate(rate)
                .samples(count);
            crate::fixtures::contiguous_run(&base, n)
        })
}

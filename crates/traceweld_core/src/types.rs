//! Core type definitions for traceweld.

use std::fmt;

/// Number of high-precision time ticks per second (microsecond resolution).
pub const HPT_MODULUS: i64 = 1_000_000;

/// A high-precision timestamp: microseconds relative to the POSIX epoch.
///
/// All continuity arithmetic (gaps, tolerances, nominal sample spacing)
/// happens in this integer domain so that repeated runs are bit-exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HpTime(pub i64);

impl HpTime {
    /// Creates a timestamp from raw microsecond ticks.
    #[must_use]
    pub const fn from_ticks(ticks: i64) -> Self {
        Self(ticks)
    }

    /// Creates a timestamp from whole seconds.
    #[must_use]
    pub const fn from_seconds(seconds: i64) -> Self {
        Self(seconds * HPT_MODULUS)
    }

    /// Returns the raw microsecond tick count.
    #[must_use]
    pub const fn as_ticks(self) -> i64 {
        self.0
    }

    /// Returns this timestamp shifted by a signed number of ticks,
    /// saturating at the representable extremes. Wire-supplied
    /// timestamps flow through here, so overflow must not panic.
    #[must_use]
    pub const fn offset(self, ticks: i64) -> Self {
        Self(self.0.saturating_add(ticks))
    }

    /// Signed difference `self - other` in ticks, saturating on overflow.
    #[must_use]
    pub const fn ticks_since(self, other: Self) -> i64 {
        self.0.saturating_sub(other.0)
    }
}

impl fmt::Display for HpTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.0.div_euclid(HPT_MODULUS);
        let micros = self.0.rem_euclid(HPT_MODULUS);
        write!(f, "{secs}.{micros:06}")
    }
}

/// Sample encoding of a record's data block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleType {
    /// Text/log data, one byte per sample.
    Ascii,
    /// 32-bit signed integers.
    Integer32,
    /// 32-bit IEEE floats.
    Float32,
    /// 64-bit IEEE floats.
    Float64,
}

impl SampleType {
    /// Size of one sample in bytes.
    #[must_use]
    pub const fn sample_size(self) -> usize {
        match self {
            Self::Ascii => 1,
            Self::Integer32 | Self::Float32 => 4,
            Self::Float64 => 8,
        }
    }

    /// One-byte tag used on the wire and in allocator callbacks.
    #[must_use]
    pub const fn as_tag(self) -> u8 {
        match self {
            Self::Ascii => b'a',
            Self::Integer32 => b'i',
            Self::Float32 => b'f',
            Self::Float64 => b'd',
        }
    }

    /// Parses a one-byte tag.
    #[must_use]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            b'a' => Some(Self::Ascii),
            b'i' => Some(Self::Integer32),
            b'f' => Some(Self::Float32),
            b'd' => Some(Self::Float64),
            _ => None,
        }
    }
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_tag() as char)
    }
}

/// Vendor timing quality, 0–100 percent of maximum accuracy.
///
/// Carried in blockette 1001; records without that blockette report
/// [`TimingQuality::UNKNOWN`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimingQuality(pub u8);

impl TimingQuality {
    /// Sentinel for "no timing quality available".
    pub const UNKNOWN: Self = Self(0xFF);

    /// Creates a timing quality from a raw byte.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Returns the raw byte value.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// Whether this is the unknown sentinel.
    #[must_use]
    pub const fn is_unknown(self) -> bool {
        self.0 == 0xFF
    }
}

impl Default for TimingQuality {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

/// Calibration classification derived from a record's blockette chain.
///
/// When several calibration blockettes coexist in one record, the last
/// one in chain order wins. The classification resets per record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i8)]
pub enum Calibration {
    /// No calibration blockette present.
    #[default]
    None = -1,
    /// Step calibration (blockette 300).
    Step = 1,
    /// Sine calibration (blockette 310).
    Sine = 2,
    /// Pseudo-random calibration (blockette 320).
    PseudoRandom = 3,
    /// Generic calibration (blockette 390).
    Generic = 4,
    /// Calibration abort (blockette 395).
    Abort = -2,
}

impl Calibration {
    /// Maps a blockette type code to its calibration classification.
    ///
    /// Returns `None` for blockettes that carry no calibration meaning.
    #[must_use]
    pub const fn from_blockette(type_code: u16) -> Option<Self> {
        match type_code {
            300 => Some(Self::Step),
            310 => Some(Self::Sine),
            320 => Some(Self::PseudoRandom),
            390 => Some(Self::Generic),
            395 => Some(Self::Abort),
            _ => None,
        }
    }

    /// Returns the raw signed code.
    #[must_use]
    pub const fn as_i8(self) -> i8 {
        self as i8
    }
}

/// The five-component identifier a record stream is bucketed by.
///
/// Routing uses exact equality of all five fields only; there is no
/// fuzzy matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct StationKey {
    /// Network code.
    pub network: String,
    /// Station code.
    pub station: String,
    /// Location code (may be empty).
    pub location: String,
    /// Channel code.
    pub channel: String,
    /// Data-quality indicator, a single character.
    pub quality: char,
}

impl StationKey {
    /// Creates a key from its five components.
    #[must_use]
    pub fn new(
        network: impl Into<String>,
        station: impl Into<String>,
        location: impl Into<String>,
        channel: impl Into<String>,
        quality: char,
    ) -> Self {
        Self {
            network: network.into(),
            station: station.into(),
            location: location.into(),
            channel: channel.into(),
            quality,
        }
    }

    /// The keyless sentinel used for the degenerate empty-input output.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            quality: '\0',
            ..Self::default()
        }
    }

    /// Whether this is the keyless sentinel.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.network.is_empty()
            && self.station.is_empty()
            && self.location.is_empty()
            && self.channel.is_empty()
            && self.quality == '\0'
    }
}

impl fmt::Display for StationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}.{}",
            self.network, self.station, self.location, self.channel, self.quality
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hptime_seconds_roundtrip() {
        let t = HpTime::from_seconds(3);
        assert_eq!(t.as_ticks(), 3_000_000);
        assert_eq!(format!("{t}"), "3.000000");
    }

    #[test]
    fn hptime_negative_display() {
        let t = HpTime::from_ticks(-1);
        assert_eq!(format!("{t}"), "-1.999999");
    }

    #[test]
    fn arithmetic_saturates_at_extremes() {
        assert_eq!(HpTime::from_ticks(i64::MAX).offset(1).as_ticks(), i64::MAX);
        assert_eq!(HpTime::from_ticks(i64::MIN).offset(-1).as_ticks(), i64::MIN);
        assert_eq!(
            HpTime::from_ticks(i64::MAX).ticks_since(HpTime::from_ticks(i64::MIN)),
            i64::MAX
        );
        assert_eq!(
            HpTime::from_ticks(i64::MIN).ticks_since(HpTime::from_ticks(i64::MAX)),
            i64::MIN
        );
    }

    #[test]
    fn sample_type_tags() {
        for st in [
            SampleType::Ascii,
            SampleType::Integer32,
            SampleType::Float32,
            SampleType::Float64,
        ] {
            assert_eq!(SampleType::from_tag(st.as_tag()), Some(st));
        }
        assert_eq!(SampleType::from_tag(b'x'), None);
    }

    #[test]
    fn timing_quality_default_unknown() {
        assert!(TimingQuality::default().is_unknown());
        assert!(!TimingQuality::new(100).is_unknown());
    }

    #[test]
    fn calibration_blockette_mapping() {
        assert_eq!(Calibration::from_blockette(300), Some(Calibration::Step));
        assert_eq!(Calibration::from_blockette(395), Some(Calibration::Abort));
        assert_eq!(Calibration::from_blockette(1001), None);
        assert_eq!(Calibration::Abort.as_i8(), -2);
        assert_eq!(Calibration::None.as_i8(), -1);
    }

    #[test]
    fn station_key_display_and_empty() {
        let key = StationKey::new("XX", "TEST", "", "BHZ", 'D');
        assert_eq!(format!("{key}"), "XX.TEST..BHZ.D");
        assert!(!key.is_empty());
        assert!(StationKey::empty().is_empty());
    }
}

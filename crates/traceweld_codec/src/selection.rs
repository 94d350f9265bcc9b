//! Record selection filtering.
//!
//! Selections are the decoder's concern: the assembly engine passes the
//! filter through opaquely and never interprets it. A record is kept if
//! any selection entry matches it; an empty list keeps everything.

use traceweld_core::{HpTime, Record};

/// Matches a field pattern: `None` and `"*"` match anything, otherwise
/// exact equality.
fn field_matches(pattern: Option<&str>, value: &str) -> bool {
    match pattern {
        None => true,
        Some("*") => true,
        Some(p) => p == value,
    }
}

/// One selection entry: optional per-field patterns plus an optional
/// time window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    /// Network pattern.
    pub network: Option<String>,
    /// Station pattern.
    pub station: Option<String>,
    /// Location pattern.
    pub location: Option<String>,
    /// Channel pattern.
    pub channel: Option<String>,
    /// Quality indicator; `None` matches any.
    pub quality: Option<char>,
    /// Inclusive time window; a record matches when its span overlaps.
    pub window: Option<(HpTime, HpTime)>,
}

impl Selection {
    /// Creates a selection that matches everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the network pattern.
    #[must_use]
    pub fn network(mut self, pattern: impl Into<String>) -> Self {
        self.network = Some(pattern.into());
        self
    }

    /// Sets the station pattern.
    #[must_use]
    pub fn station(mut self, pattern: impl Into<String>) -> Self {
        self.station = Some(pattern.into());
        self
    }

    /// Sets the location pattern.
    #[must_use]
    pub fn location(mut self, pattern: impl Into<String>) -> Self {
        self.location = Some(pattern.into());
        self
    }

    /// Sets the channel pattern.
    #[must_use]
    pub fn channel(mut self, pattern: impl Into<String>) -> Self {
        self.channel = Some(pattern.into());
        self
    }

    /// Sets the quality indicator.
    #[must_use]
    pub fn quality(mut self, quality: char) -> Self {
        self.quality = Some(quality);
        self
    }

    /// Sets the time window.
    #[must_use]
    pub fn window(mut self, from: HpTime, to: HpTime) -> Self {
        self.window = Some((from, to));
        self
    }

    /// Whether this entry matches the record.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        field_matches(self.network.as_deref(), &record.network)
            && field_matches(self.station.as_deref(), &record.station)
            && field_matches(self.location.as_deref(), &record.location)
            && field_matches(self.channel.as_deref(), &record.channel)
            && self.quality.map_or(true, |q| q == record.quality)
            && self.window.map_or(true, |(from, to)| {
                record.end_time >= from && record.start_time <= to
            })
    }
}

/// An ordered list of selections; a record is kept when any entry
/// matches, and an empty list keeps everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionList {
    entries: Vec<Selection>,
}

impl SelectionList {
    /// Creates an empty (match-all) selection list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry.
    pub fn push(&mut self, selection: Selection) {
        self.entries.push(selection);
    }

    /// The entries in order.
    #[must_use]
    pub fn entries(&self) -> &[Selection] {
        &self.entries
    }

    /// Whether the record passes the filter.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        self.entries.is_empty() || self.entries.iter().any(|s| s.matches(record))
    }
}

impl From<Vec<Selection>> for SelectionList {
    fn from(entries: Vec<Selection>) -> Self {
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use traceweld_core::SampleType;

    fn record(station: &str, start_secs: i64, end_secs: i64) -> Record {
        Record {
            network: "XX".to_string(),
            station: station.to_string(),
            location: "00".to_string(),
            channel: "BHZ".to_string(),
            quality: 'D',
            start_time: HpTime::from_seconds(start_secs),
            end_time: HpTime::from_seconds(end_secs),
            sample_rate: 1.0,
            sample_type: SampleType::Integer32,
            sample_count: 1,
            samples: vec![0; 4],
            blockettes: Vec::new(),
            rec_len: 68,
        }
    }

    #[test]
    fn empty_list_matches_everything() {
        assert!(SelectionList::new().matches(&record("ANY", 0, 1)));
    }

    #[test]
    fn exact_station_match() {
        let list = SelectionList::from(vec![Selection::new().station("STA1")]);
        assert!(list.matches(&record("STA1", 0, 1)));
        assert!(!list.matches(&record("STA2", 0, 1)));
    }

    #[test]
    fn wildcard_matches_any_value() {
        let list = SelectionList::from(vec![Selection::new().station("*").network("XX")]);
        assert!(list.matches(&record("WHATEVER", 0, 1)));
    }

    #[test]
    fn any_entry_suffices() {
        let list = SelectionList::from(vec![
            Selection::new().station("AAA"),
            Selection::new().station("BBB"),
        ]);
        assert!(list.matches(&record("BBB", 0, 1)));
        assert!(!list.matches(&record("CCC", 0, 1)));
    }

    #[test]
    fn window_overlap() {
        let list = SelectionList::from(vec![Selection::new().window(
            HpTime::from_seconds(10),
            HpTime::from_seconds(20),
        )]);

        assert!(list.matches(&record("STA", 5, 15)));
        assert!(list.matches(&record("STA", 15, 16)));
        assert!(list.matches(&record("STA", 20, 30)));
        assert!(!list.matches(&record("STA", 21, 30)));
        assert!(!list.matches(&record("STA", 0, 9)));
    }

    #[test]
    fn quality_filter() {
        let list = SelectionList::from(vec![Selection::new().quality('R')]);
        assert!(!list.matches(&record("STA", 0, 1)));
    }
}

//! Assembly run configuration.

use crate::decode::RecordLengthHint;
use crate::extract::FieldDescriptor;

/// Configuration for one assembly run.
#[derive(Debug, Clone, Default)]
pub struct AssembleOptions {
    /// Whether to materialize final sample buffers. When false, segments
    /// keep only metadata plus their record lists.
    pub want_samples: bool,

    /// Nominal record length hint forwarded verbatim to the decoder.
    pub record_length: RecordLengthHint,

    /// Whether to log per-record decode failures at warn level
    /// (debug otherwise) and forward verbosity to the decoder.
    pub verbose: bool,

    /// Whether to extract timing quality and calibration classification
    /// even with an empty field-descriptor list.
    pub details: bool,

    /// Blockette sub-fields compared bytewise for continuity. An empty
    /// list disables the generic auxiliary comparison.
    pub field_descriptors: Vec<FieldDescriptor>,
}

impl AssembleOptions {
    /// Creates options with defaults: materialize samples, no hint,
    /// quiet, no detail extraction, no field descriptors.
    #[must_use]
    pub fn new() -> Self {
        Self {
            want_samples: true,
            ..Self::default()
        }
    }

    /// Sets whether to materialize sample buffers.
    #[must_use]
    pub fn want_samples(mut self, value: bool) -> Self {
        self.want_samples = value;
        self
    }

    /// Sets the nominal record length hint.
    #[must_use]
    pub fn record_length(mut self, hint: RecordLengthHint) -> Self {
        self.record_length = hint;
        self
    }

    /// Sets verbose decode-failure logging.
    #[must_use]
    pub fn verbose(mut self, value: bool) -> Self {
        self.verbose = value;
        self
    }

    /// Sets detail-scalar extraction.
    #[must_use]
    pub fn details(mut self, value: bool) -> Self {
        self.details = value;
        self
    }

    /// Sets the auxiliary field descriptors.
    #[must_use]
    pub fn field_descriptors(mut self, descriptors: Vec<FieldDescriptor>) -> Self {
        self.field_descriptors = descriptors;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = AssembleOptions::new();
        assert!(opts.want_samples);
        assert!(!opts.verbose);
        assert!(!opts.details);
        assert_eq!(opts.record_length, RecordLengthHint::Unknown);
        assert!(opts.field_descriptors.is_empty());
    }

    #[test]
    fn builder_pattern() {
        let opts = AssembleOptions::new()
            .want_samples(false)
            .verbose(true)
            .record_length(RecordLengthHint::Fixed(512))
            .field_descriptors(vec![FieldDescriptor::new(100, 0, 2)]);

        assert!(!opts.want_samples);
        assert!(opts.verbose);
        assert_eq!(opts.record_length, RecordLengthHint::Fixed(512));
        assert_eq!(opts.field_descriptors.len(), 1);
    }
}

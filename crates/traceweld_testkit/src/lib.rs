//! # traceweld testkit
//!
//! Test utilities for traceweld.
//!
//! This crate provides:
//! - Record fixtures and encoded-buffer helpers
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust
//! use traceweld_testkit::prelude::*;
//!
//! let records = contiguous_run(&RecordBuilder::new().samples(10), 3);
//! let buffer = encode_buffer(&records);
//! assert!(!buffer.is_empty());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;

//! Error types for the configuration and trace-parsing edges.
//!
//! The engine itself never fails: capacity exhaustion is absorbed by drop or
//! eviction and lookup misses return `None`/empty. `Result` surfaces only where
//! external input enters the system:
//! 1. **Configuration:** geometry and mask validation before construction.
//! 2. **Traces:** I/O and parse failures while reading an access trace.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Rejected configuration values.
///
/// Returned by [`crate::config::Config::validate`]; construction from a
/// validated config cannot fail later.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A set count or capacity that must be a power of two is not.
    #[error("{name} must be a power of two, got {value}")]
    NotPowerOfTwo {
        /// Name of the offending field.
        name: &'static str,
        /// The rejected value.
        value: usize,
    },

    /// A capacity, width, or degree that must be non-zero is zero.
    #[error("{name} must be non-zero")]
    Zero {
        /// Name of the offending field.
        name: &'static str,
    },

    /// A truncation mask with holes; masks must be contiguous low bits.
    #[error("{name} must be a contiguous low-bit mask, got {value:#x}")]
    BadMask {
        /// Name of the offending field.
        name: &'static str,
        /// The rejected value.
        value: u64,
    },

    /// A confidence parameter outside its admissible range.
    #[error("{name} must be in 1..={limit}, got {value}")]
    ConfidenceRange {
        /// Name of the offending field.
        name: &'static str,
        /// The rejected value.
        value: u32,
        /// Upper bound implied by `confidence_max`.
        limit: u32,
    },
}

/// Failures while loading an access trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The trace file could not be opened or read.
    #[error("failed to read trace {}: {source}", path.display())]
    Io {
        /// Path of the trace file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A line did not have the `<ip> <addr>` shape.
    #[error("{}:{line}: malformed trace record {text:?}", path.display())]
    Malformed {
        /// Path of the trace file.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// The offending line.
        text: String,
    },

    /// A field was not a valid hexadecimal number.
    #[error("{}:{line}: invalid hexadecimal field {field:?}", path.display())]
    BadHex {
        /// Path of the trace file.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// The offending field.
        field: String,
    },
}

impl TraceError {
    /// Returns the trace file the error refers to.
    pub fn trace_path(&self) -> &std::path::Path {
        match self {
            Self::Io { path, .. } | Self::Malformed { path, .. } | Self::BadHex { path, .. } => {
                path
            }
        }
    }
}

//! Error types for subcell

use thiserror::Error;

/// Result type alias for subcell operations
pub type Result<T> = std::result::Result<T, SubcellError>;

/// Error types that can occur in subcell
///
/// Only conditions that prevent a run from starting are errors. Corrupt
/// input, truncated lines, and mid-scan I/O failures are best-effort
/// conditions recorded on [`crate::types::ScanStats`] and surfaced in the
/// final report instead.
#[derive(Debug, Error)]
pub enum SubcellError {
    /// I/O error opening or mapping the input
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A taxonomy pattern failed to compile (startup-fatal)
    #[error("could not compile pattern {pattern:?}: {source}")]
    Pattern {
        /// The raw pattern text that failed
        pattern: String,
        /// The underlying regex error
        source: regex::Error,
    },

    /// An invalid block-size exponent was requested
    #[error("block size exponent {0} out of range ({min}..={max})",
            min = crate::io::MIN_BLOCK_EXP, max = crate::io::MAX_BLOCK_EXP)]
    BlockSizeExponent(u32),
}

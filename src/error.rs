//! Error types for matrix storage and partition planning.
//!
//! Every failure surfaced by this crate is one of four recoverable kinds.
//! Numeric edge cases (empty rows, matrices with no materialized rows) are
//! not errors: they produce `NaN` or zero as documented on each operation.

use thiserror::Error;

/// Result type alias using the crate's error.
pub type Result<T> = std::result::Result<T, PsError>;

/// Errors raised by rows, matrices, operators and the partitioner.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PsError {
    /// An index fell outside `[0, bound)` along one axis.
    #[error("{axis} index {index} out of range [0, {bound})")]
    OutOfRange {
        /// Which axis was indexed ("row" or "column").
        axis: &'static str,
        /// The offending index.
        index: u64,
        /// Exclusive upper bound for that axis.
        bound: u64,
    },

    /// A row or vector dimension disagrees with what the operation requires.
    #[error("dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// What was being compared (row dimension, row count, ...).
        what: &'static str,
        /// Required extent.
        expected: u64,
        /// Extent actually supplied.
        actual: u64,
    },

    /// A reduction was requested along an axis other than row-wise.
    #[error("unsupported reduction axis {axis}: only axis 1 (row-wise) is supported")]
    UnsupportedAxis {
        /// The rejected axis.
        axis: i32,
    },

    /// Partitioning inputs or configuration cannot be honored.
    #[error("invalid configuration '{param}': {reason}")]
    Configuration {
        /// The parameter at fault.
        param: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

impl PsError {
    pub(crate) fn row_out_of_range(index: usize, bound: usize) -> Self {
        PsError::OutOfRange {
            axis: "row",
            index: index as u64,
            bound: bound as u64,
        }
    }

    pub(crate) fn col_out_of_range(index: usize, bound: usize) -> Self {
        PsError::OutOfRange {
            axis: "column",
            index: index as u64,
            bound: bound as u64,
        }
    }

    pub(crate) fn dim_mismatch(expected: usize, actual: usize) -> Self {
        PsError::DimensionMismatch {
            what: "row dimension",
            expected: expected as u64,
            actual: actual as u64,
        }
    }

    pub(crate) fn config(param: &'static str, reason: impl Into<String>) -> Self {
        PsError::Configuration {
            param,
            reason: reason.into(),
        }
    }
}

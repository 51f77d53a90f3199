//! Row-Based Matrix Module
//!
//! A matrix is a fixed-length sequence of row slots over a shared column
//! count. Rows materialize lazily: a slot holds no storage until the first
//! write touches it, and an unmaterialized row reads as all zeros.
//!
//! ## Row lifecycle
//! `Unmaterialized -> Materialized(Dense | Sparse)`, one way only. A
//! materialized row may change contents or storage variant, or be replaced
//! through `set_row`, but never returns to unmaterialized.
//!
//! ## Reductions
//! Row-wise reductions report `NaN` for unmaterialized rows ("no data"),
//! which is distinct from a materialized row of zeros.
//!
//! ## Submodules
//! - **`slot`**: `RowSlot`, the per-row lock with at-most-once materialization.
//! - **`row_based`**: `RowBasedMatrix` and its operations.

pub mod row_based;
pub mod slot;

pub use row_based::{Applied, DoubleMatrix, FloatMatrix, IntMatrix, LongMatrix, RowBasedMatrix};
pub use slot::RowSlot;

#[cfg(test)]
mod tests;

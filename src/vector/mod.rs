//! Row Storage Module
//!
//! Rows are the unit of storage in a row-based matrix. Each row is either dense
//! (a contiguous array over its full dimension) or sparse (an ordered map of its
//! non-zero coordinates), chosen per row.
//!
//! ## Submodules
//! - **`element`**: The scalar types a row can hold (`i32`, `i64`, `f32`, `f64`).
//! - **`storage`**: The `RowStorage` variants and their scalar reductions.
//! - **`row`**: `Row`, which tags storage with its matrix, row index and clock.

pub mod element;
pub mod row;
pub mod storage;

pub use element::Element;
pub use row::Row;
pub use storage::{RowStorage, SparseStorage, StorageKind};

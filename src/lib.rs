//! Parameter-Server Matrix Storage Library
//!
//! Row-oriented storage for large model matrices and the planner that splits
//! a matrix's index space into partitions placed on server shards.
//! It serves as the foundation for the `ps-plan` binary (`main.rs`).
//!
//! ## Modules
//! - **`vector`**: rows and their storage variants (dense array or sparse
//!   ordered map), element types and per-row reductions.
//! - **`executor`**: binary and unary elementwise operators and the strategy
//!   table that picks a kernel for each pair of storage variants.
//! - **`matrix`**: `RowBasedMatrix`, a sequence of lazily materialized rows
//!   with elementwise operations and row-wise reductions.
//! - **`storage`**: the range partitioner and the shard-local store that backs
//!   each partition with a matrix.
//! - **`config`**: partitioning configuration.
//! - **`error`**: the crate's error type.

pub mod config;
pub mod error;
pub mod executor;
pub mod matrix;
pub mod storage;
pub mod vector;

pub use error::{PsError, Result};

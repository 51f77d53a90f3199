//! Partition Planning and Shard Storage Module
//!
//! Decides how a matrix's index space is split into contiguous rectangular
//! partitions and which shard holds each one.
//!
//! ## Core Concepts
//! - **Index width**: a matrix whose rows do not fit 32-bit addressing is
//!   planned in 64-bit mode with a halved per-partition bound.
//! - **Blocking**: rows and columns are cut into near-equal ranges so that no
//!   partition holds more than the effective element limit.
//! - **Placement**: partitions are dealt to shards in contiguous runs.
//! - **Local storage**: `ShardStore` backs each of a shard's partitions with a
//!   `RowBasedMatrix` and translates global coordinates to local ones.

pub mod memory;
pub mod partitioner;
pub mod types;

pub use memory::{ServerPartition, ShardStore};
pub use partitioner::{RangePartitioner, compute_partitions};
pub use types::{IndexWidth, MatrixContext, PartitionDescriptor, PartitionPlan};

//! Partition Planning Types
//!
//! Data definitions exchanged between the partitioner, the shard-local store
//! and the matrix-registration layer. Descriptors and plans serialize with
//! serde so a plan can be shipped to shards as JSON.

use serde::{Deserialize, Serialize};

// --- Inputs ---

/// Declared shape of a matrix at registration time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixContext {
    pub name: String,
    pub matrix_id: i32,
    pub row_count: u64,
    pub col_count: u64,
}

impl MatrixContext {
    pub fn new(name: impl Into<String>, matrix_id: i32, row_count: u64, col_count: u64) -> Self {
        Self {
            name: name.into(),
            matrix_id,
            row_count,
            col_count,
        }
    }
}

// --- Outputs ---

/// Range arithmetic used to key a partition's cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexWidth {
    /// 32-bit signed column keys.
    Narrow,
    /// 64-bit column keys.
    Wide,
}

/// One contiguous rectangle `[row_start, row_end) x [col_start, col_end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionDescriptor {
    pub partition_id: u32,
    pub matrix_id: i32,
    pub row_start: u64,
    pub row_end: u64,
    pub col_start: u64,
    pub col_end: u64,
    /// Shard that owns this partition.
    pub shard: u32,
    pub width: IndexWidth,
}

impl PartitionDescriptor {
    pub fn row_len(&self) -> u64 {
        self.row_end - self.row_start
    }

    pub fn col_len(&self) -> u64 {
        self.col_end - self.col_start
    }

    pub fn element_count(&self) -> u64 {
        self.row_len() * self.col_len()
    }

    pub fn contains(&self, row: u64, col: u64) -> bool {
        (self.row_start..self.row_end).contains(&row) && (self.col_start..self.col_end).contains(&col)
    }
}

/// Full partition set of one matrix.
///
/// Descriptors are ordered row-block-major, so they are sorted by
/// `(row_start, col_start)` and `partition_id` equals the position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionPlan {
    pub matrix_id: i32,
    pub row_count: u64,
    pub col_count: u64,
    pub width: IndexWidth,
    /// Per-partition element bound after index-width adjustment.
    pub effective_limit: u64,
    pub num_shards: u32,
    pub descriptors: Vec<PartitionDescriptor>,
}

impl PartitionPlan {
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn for_shard(&self, shard: u32) -> impl Iterator<Item = &PartitionDescriptor> + '_ {
        self.descriptors.iter().filter(move |d| d.shard == shard)
    }

    /// Descriptor covering `(row, col)`, found by binary search.
    pub fn locate(&self, row: u64, col: u64) -> Option<&PartitionDescriptor> {
        locate_sorted(&self.descriptors, row, col)
    }

    pub fn total_elements(&self) -> u64 {
        self.descriptors.iter().map(PartitionDescriptor::element_count).sum()
    }
}

/// Binary search over descriptors cut from one row-block-major grid (any
/// subset of a plan, kept in plan order).
pub(crate) fn locate_sorted(descriptors: &[PartitionDescriptor], row: u64, col: u64) -> Option<&PartitionDescriptor> {
    let idx = descriptors.partition_point(|d| d.row_end <= row || (d.row_start <= row && d.col_end <= col));
    descriptors.get(idx).filter(|d| d.contains(row, col))
}

use super::types::{PartitionDescriptor, PartitionPlan, locate_sorted};
use crate::error::{PsError, Result};
use crate::matrix::RowBasedMatrix;
use crate::vector::Element;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::RwLock;

/// One partition held by a shard: its descriptor and a matrix sized to the
/// descriptor's range, addressed with partition-local coordinates.
#[derive(Debug)]
pub struct ServerPartition<T> {
    descriptor: PartitionDescriptor,
    matrix: RowBasedMatrix<T>,
}

impl<T: Element> ServerPartition<T> {
    pub fn new(descriptor: PartitionDescriptor) -> Result<Self> {
        let rows = local_extent("row_count", descriptor.row_len())?;
        let cols = local_extent("col_count", descriptor.col_len())?;
        let matrix = RowBasedMatrix::new(descriptor.matrix_id, 0, rows, cols);
        Ok(Self { descriptor, matrix })
    }

    pub fn descriptor(&self) -> &PartitionDescriptor {
        &self.descriptor
    }

    pub fn matrix(&self) -> &RowBasedMatrix<T> {
        &self.matrix
    }

    /// Global `(row, col)` to local coordinates. Caller checks `contains`.
    fn local(&self, row: u64, col: u64) -> (usize, usize) {
        (
            (row - self.descriptor.row_start) as usize,
            (col - self.descriptor.col_start) as usize,
        )
    }
}

fn local_extent(param: &'static str, len: u64) -> Result<usize> {
    usize::try_from(len).map_err(|_| PsError::config(param, format!("{} does not fit this platform", len)))
}

/// True when `a` and `b` can both belong to one row-block-major grid: their
/// row ranges are equal or disjoint, and equal row ranges have disjoint
/// column ranges.
fn fits_grid(a: &PartitionDescriptor, b: &PartitionDescriptor) -> bool {
    let rows_disjoint = a.row_end <= b.row_start || b.row_end <= a.row_start;
    let same_rows = a.row_start == b.row_start && a.row_end == b.row_end;
    let cols_disjoint = a.col_end <= b.col_start || b.col_end <= a.col_start;
    rows_disjoint || (same_rows && cols_disjoint)
}

/// Partitions of one matrix held by a single shard.
///
/// `layout` keeps the local descriptors in plan order so a global cell is
/// resolved to its partition id by binary search.
pub struct ShardStore<T> {
    shard: u32,
    matrix_id: i32,
    row_count: u64,
    col_count: u64,
    layout: RwLock<Vec<PartitionDescriptor>>,
    partitions: DashMap<u32, ServerPartition<T>>,
}

impl<T: Element> ShardStore<T> {
    pub fn new(shard: u32, matrix_id: i32, row_count: u64, col_count: u64) -> Self {
        Self {
            shard,
            matrix_id,
            row_count,
            col_count,
            layout: RwLock::new(Vec::new()),
            partitions: DashMap::new(),
        }
    }

    /// Builds the partitions `plan` assigns to `shard`.
    pub fn load(shard: u32, plan: &PartitionPlan) -> Result<Self> {
        let store = Self::new(shard, plan.matrix_id, plan.row_count, plan.col_count);
        for descriptor in plan.for_shard(shard) {
            store.store_local(descriptor.clone())?;
        }
        tracing::debug!(
            "Shard {} loaded {} of {} partitions for matrix {}",
            shard,
            store.local_partition_count(),
            plan.len(),
            plan.matrix_id
        );
        Ok(store)
    }

    pub fn shard(&self) -> u32 {
        self.shard
    }

    pub fn matrix_id(&self) -> i32 {
        self.matrix_id
    }

    /// Adds a partition. Storing a partition that is already held keeps it
    /// and its data; returns `true` only when a new partition was created.
    pub fn store_local(&self, descriptor: PartitionDescriptor) -> Result<bool> {
        if descriptor.matrix_id != self.matrix_id {
            return Err(PsError::config(
                "matrix_id",
                format!(
                    "partition {} belongs to matrix {}, store holds matrix {}",
                    descriptor.partition_id, descriptor.matrix_id, self.matrix_id
                ),
            ));
        }
        if descriptor.row_end > self.row_count || descriptor.col_end > self.col_count {
            return Err(PsError::config(
                "partition",
                format!(
                    "partition {} extends past the {}x{} matrix",
                    descriptor.partition_id, self.row_count, self.col_count
                ),
            ));
        }

        let mut layout = self.layout.write();
        match self.partitions.entry(descriptor.partition_id) {
            Entry::Occupied(held) if held.get().descriptor == descriptor => {
                tracing::debug!(
                    "Shard {} already holds partition {}",
                    self.shard,
                    descriptor.partition_id
                );
                Ok(false)
            }
            Entry::Occupied(_) => Err(PsError::config(
                "partition_id",
                format!(
                    "partition {} is already held with a different range",
                    descriptor.partition_id
                ),
            )),
            Entry::Vacant(slot) => {
                if let Some(other) = layout.iter().find(|d| !fits_grid(d, &descriptor)) {
                    return Err(PsError::config(
                        "partition",
                        format!(
                            "partition {} overlaps partition {}",
                            descriptor.partition_id, other.partition_id
                        ),
                    ));
                }
                let at = layout.partition_point(|d| {
                    (d.row_start, d.col_start) < (descriptor.row_start, descriptor.col_start)
                });
                slot.insert(ServerPartition::new(descriptor.clone())?);
                layout.insert(at, descriptor);
                Ok(true)
            }
        }
    }

    fn check_bounds(&self, row: u64, col: u64) -> Result<()> {
        if row >= self.row_count {
            return Err(PsError::OutOfRange {
                axis: "row",
                index: row,
                bound: self.row_count,
            });
        }
        if col >= self.col_count {
            return Err(PsError::OutOfRange {
                axis: "column",
                index: col,
                bound: self.col_count,
            });
        }
        Ok(())
    }

    fn resolve(&self, row: u64, col: u64) -> Option<u32> {
        let layout = self.layout.read();
        locate_sorted(&layout, row, col).map(|d| d.partition_id)
    }

    /// Reads a global cell. `None` when another shard holds it.
    pub fn get_local(&self, row: u64, col: u64) -> Result<Option<T>> {
        self.check_bounds(row, col)?;
        let Some(partition) = self.resolve(row, col).and_then(|id| self.partitions.get(&id)) else {
            return Ok(None);
        };
        let (i, j) = partition.local(row, col);
        partition.matrix.get(i, j).map(Some)
    }

    /// Writes a global cell. Returns `false` without writing when another
    /// shard holds it.
    pub fn set_local(&self, row: u64, col: u64, value: T) -> Result<bool> {
        self.check_bounds(row, col)?;
        let Some(partition) = self.resolve(row, col).and_then(|id| self.partitions.get(&id)) else {
            return Ok(false);
        };
        let (i, j) = partition.local(row, col);
        partition.matrix.set(i, j, value)?;
        Ok(true)
    }

    pub fn has_partition(&self, partition_id: u32) -> bool {
        self.partitions.contains_key(&partition_id)
    }

    pub fn partition_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.partitions.iter().map(|entry| *entry.key()).collect();
        ids.sort_unstable();
        ids
    }

    /// Runs `f` against a local partition's matrix.
    pub fn with_partition<R>(&self, partition_id: u32, f: impl FnOnce(&RowBasedMatrix<T>) -> R) -> Option<R> {
        self.partitions.get(&partition_id).map(|partition| f(&partition.matrix))
    }

    pub fn local_partition_count(&self) -> usize {
        self.partitions.len()
    }

    /// Stored non-zero cells across every local partition.
    pub fn local_entry_count(&self) -> usize {
        self.partitions.iter().map(|entry| entry.value().matrix.nnz()).sum()
    }

    /// Deep copy of a local partition's matrix.
    pub fn snapshot_partition(&self, partition_id: u32) -> Option<RowBasedMatrix<T>> {
        self.partitions
            .get(&partition_id)
            .map(|partition| partition.matrix.copy())
    }
}

use super::element::Element;
use super::storage::{RowStorage, SparseStorage, StorageKind};
use crate::error::{PsError, Result};

/// One row of a matrix, or a free-standing vector used as a broadcast
/// operand.
///
/// A row is identified by `(matrix_id, row_id, clock)` and owns its storage
/// exclusively. Its dimension is fixed at construction; the storage variant
/// may change (an operator can densify a sparse row) but the extent never does.
#[derive(Debug, Clone, PartialEq)]
pub struct Row<T> {
    matrix_id: i32,
    row_id: usize,
    clock: i32,
    storage: RowStorage<T>,
}

impl<T: Element> Row<T> {
    pub fn new(matrix_id: i32, row_id: usize, clock: i32, storage: RowStorage<T>) -> Self {
        Self {
            matrix_id,
            row_id,
            clock,
            storage,
        }
    }

    /// Dense row over the given values.
    pub fn dense(matrix_id: i32, row_id: usize, clock: i32, values: Vec<T>) -> Self {
        Self::new(matrix_id, row_id, clock, RowStorage::Dense(values))
    }

    /// Empty sparse row of dimension `dim`.
    pub fn sparse(matrix_id: i32, row_id: usize, clock: i32, dim: usize) -> Self {
        Self::new(matrix_id, row_id, clock, RowStorage::sparse(dim))
    }

    /// Sparse row holding the given `(index, value)` pairs.
    pub fn sparse_from(
        matrix_id: i32,
        row_id: usize,
        clock: i32,
        dim: usize,
        entries: impl IntoIterator<Item = (usize, T)>,
    ) -> Self {
        Self::new(
            matrix_id,
            row_id,
            clock,
            RowStorage::Sparse(SparseStorage::from_entries(dim, entries)),
        )
    }

    /// Free-standing dense vector, typically a broadcast operand.
    pub fn vector(values: Vec<T>) -> Self {
        Self::dense(0, 0, 0, values)
    }

    pub fn matrix_id(&self) -> i32 {
        self.matrix_id
    }

    pub fn row_id(&self) -> usize {
        self.row_id
    }

    pub fn clock(&self) -> i32 {
        self.clock
    }

    pub fn dim(&self) -> usize {
        self.storage.dim()
    }

    pub fn kind(&self) -> StorageKind {
        self.storage.kind()
    }

    pub fn storage(&self) -> &RowStorage<T> {
        &self.storage
    }

    pub(crate) fn storage_mut(&mut self) -> &mut RowStorage<T> {
        &mut self.storage
    }

    /// Re-tags the row for a slot in another matrix (or another slot).
    pub(crate) fn with_identity(mut self, matrix_id: i32, row_id: usize, clock: i32) -> Self {
        self.matrix_id = matrix_id;
        self.row_id = row_id;
        self.clock = clock;
        self
    }

    pub fn get(&self, index: usize) -> Result<T> {
        self.check_index(index)?;
        Ok(self.storage.get(index))
    }

    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        self.check_index(index)?;
        self.storage.set(index, value);
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.dim() {
            return Err(PsError::col_out_of_range(index, self.dim()));
        }
        Ok(())
    }

    /// Deep copy, same variant.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub fn size(&self) -> usize {
        self.storage.size()
    }

    pub fn nnz(&self) -> usize {
        self.storage.nnz()
    }

    pub fn to_dense(&self) -> Vec<T> {
        self.storage.to_dense()
    }

    pub fn min(&self) -> f64 {
        self.storage.min()
    }

    pub fn max(&self) -> f64 {
        self.storage.max()
    }

    pub fn sum(&self) -> f64 {
        self.storage.sum()
    }

    pub fn average(&self) -> f64 {
        self.storage.average()
    }

    pub fn std(&self) -> f64 {
        self.storage.std()
    }

    pub fn norm(&self) -> f64 {
        self.storage.norm()
    }
}

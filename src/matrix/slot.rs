use crate::vector::{Element, Row};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Holder for one row of a matrix.
///
/// A slot starts unmaterialized (logically all zero, no storage) and
/// materializes at most once. Materialization is a check-then-allocate under
/// the slot's write lock, so racing first writers see exactly one allocation
/// and never a torn row. Once materialized a slot never reverts; it can only
/// be rewritten or replaced wholesale.
#[derive(Debug)]
pub struct RowSlot<T> {
    row: RwLock<Option<Row<T>>>,
}

impl<T: Element> RowSlot<T> {
    pub fn empty() -> Self {
        Self {
            row: RwLock::new(None),
        }
    }

    pub fn with_row(row: Row<T>) -> Self {
        Self {
            row: RwLock::new(Some(row)),
        }
    }

    pub fn from_option(row: Option<Row<T>>) -> Self {
        Self {
            row: RwLock::new(row),
        }
    }

    pub fn is_materialized(&self) -> bool {
        self.row.read().is_some()
    }

    /// Materializes the slot as an empty sparse row if it is still empty.
    ///
    /// Returns `true` only for the call that performed the allocation.
    pub fn materialize(&self, matrix_id: i32, row_id: usize, clock: i32, dim: usize) -> bool {
        if self.row.read().is_some() {
            return false;
        }
        let mut guard = self.row.write();
        if guard.is_some() {
            return false;
        }
        *guard = Some(Row::sparse(matrix_id, row_id, clock, dim));
        tracing::debug!(
            "Materialized row {} of matrix {} as sparse {} ({} columns)",
            row_id,
            matrix_id,
            T::NAME,
            dim
        );
        true
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Option<Row<T>>> {
        self.row.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Option<Row<T>>> {
        self.row.write()
    }

    /// Deep copy of the current row, `None` while unmaterialized.
    pub fn snapshot(&self) -> Option<Row<T>> {
        self.row.read().clone()
    }

    pub fn replace(&self, row: Row<T>) {
        *self.row.write() = Some(row);
    }
}

impl<T: Element> Clone for RowSlot<T> {
    fn clone(&self) -> Self {
        Self::from_option(self.snapshot())
    }
}

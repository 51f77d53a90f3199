//! Operator Executors
//!
//! Apply elementwise operators to rows. The binary executor picks a strategy
//! from the registry based on the storage kinds of both operands; the unary
//! executor keeps sparse rows sparse when the operator maps zero to zero.
//!
//! Both honor the operator's in-place flag exactly: an in-place operator
//! rewrites the first operand, anything else leaves it untouched and returns
//! a new row carrying the first operand's identity.

use super::registry;
use super::types::{Binary, Unary};
use crate::error::{PsError, Result};
use crate::vector::{Element, Row, RowStorage, SparseStorage};

pub struct BinaryExecutor;

impl BinaryExecutor {
    /// Applies `op` honoring its in-place flag.
    ///
    /// # Returns
    /// * `Ok(None)` if `op` is in-place; `lhs` now holds the result.
    /// * `Ok(Some(row))` otherwise; `lhs` is unchanged.
    pub fn apply<T: Element>(lhs: &mut Row<T>, rhs: &Row<T>, op: &Binary) -> Result<Option<Row<T>>> {
        if op.is_inplace() {
            Self::apply_inplace(lhs, rhs, op)?;
            Ok(None)
        } else {
            Self::compute(lhs, rhs, op).map(Some)
        }
    }

    /// Computes `lhs op rhs` into a freshly allocated row.
    pub fn compute<T: Element>(lhs: &Row<T>, rhs: &Row<T>, op: &Binary) -> Result<Row<T>> {
        check_dims(lhs, rhs)?;
        let strategy = registry::lookup::<T>(lhs.kind(), rhs.kind());
        tracing::trace!(
            "row {} of matrix {}: {:?} via {}",
            lhs.row_id(),
            lhs.matrix_id(),
            op.op(),
            strategy.name
        );
        let storage = (strategy.compute)(lhs.storage(), rhs.storage(), op);
        Ok(Row::new(lhs.matrix_id(), lhs.row_id(), lhs.clock(), storage))
    }

    /// Computes `lhs op rhs`, storing the result in `lhs`.
    ///
    /// The storage variant of `lhs` may change (a sparse row combined with a
    /// dense one under a union operator becomes dense).
    pub fn apply_inplace<T: Element>(lhs: &mut Row<T>, rhs: &Row<T>, op: &Binary) -> Result<()> {
        check_dims(lhs, rhs)?;
        let strategy = registry::lookup::<T>(lhs.kind(), rhs.kind());
        tracing::trace!(
            "row {} of matrix {}: in-place {:?} via {}",
            lhs.row_id(),
            lhs.matrix_id(),
            op.op(),
            strategy.name
        );
        (strategy.compute_inplace)(lhs.storage_mut(), rhs.storage(), op);
        Ok(())
    }
}

fn check_dims<T: Element>(lhs: &Row<T>, rhs: &Row<T>) -> Result<()> {
    if lhs.dim() != rhs.dim() {
        return Err(PsError::dim_mismatch(lhs.dim(), rhs.dim()));
    }
    Ok(())
}

pub struct UnaryExecutor;

impl UnaryExecutor {
    /// Applies `op` honoring its in-place flag; see [`BinaryExecutor::apply`].
    pub fn apply<T: Element>(row: &mut Row<T>, op: &Unary) -> Option<Row<T>> {
        if op.is_inplace() {
            Self::apply_inplace(row, op);
            None
        } else {
            Some(Self::compute(row, op))
        }
    }

    pub fn compute<T: Element>(row: &Row<T>, op: &Unary) -> Row<T> {
        let storage = map_storage(row.storage(), op);
        Row::new(row.matrix_id(), row.row_id(), row.clock(), storage)
    }

    pub fn apply_inplace<T: Element>(row: &mut Row<T>, op: &Unary) {
        match row.storage_mut() {
            RowStorage::Dense(values) => {
                for v in values.iter_mut() {
                    *v = op.apply(*v);
                }
            }
            sparse @ RowStorage::Sparse(_) => {
                let mapped = map_storage(sparse, op);
                *sparse = mapped;
            }
        }
    }
}

fn map_storage<T: Element>(storage: &RowStorage<T>, op: &Unary) -> RowStorage<T> {
    match storage {
        RowStorage::Dense(values) => RowStorage::Dense(values.iter().map(|v| op.apply(*v)).collect()),
        RowStorage::Sparse(sparse) if op.preserves_zero() => RowStorage::Sparse(
            SparseStorage::from_entries(sparse.dim(), sparse.iter().map(|(i, v)| (i, op.apply(v)))),
        ),
        RowStorage::Sparse(_) => {
            RowStorage::Dense(storage.to_dense().into_iter().map(|v| op.apply(v)).collect())
        }
    }
}

use super::slot::RowSlot;
use crate::error::{PsError, Result};
use crate::executor::{Binary, BinaryExecutor, Unary, UnaryExecutor};
use crate::vector::{Element, Row};
use std::ops::Deref;

/// Matrix stored as an ordered sequence of lazily materialized rows.
///
/// Every row slot is independent: writers to different rows never contend,
/// and matrix-wide operations visit one row at a time without holding more
/// than one row lock. The clock is a version stamp owned by the surrounding
/// synchronization layer; nothing here advances it.
#[derive(Debug)]
pub struct RowBasedMatrix<T> {
    matrix_id: i32,
    clock: i32,
    cols: usize,
    rows: Vec<RowSlot<T>>,
}

pub type IntMatrix = RowBasedMatrix<i32>;
pub type LongMatrix = RowBasedMatrix<i64>;
pub type FloatMatrix = RowBasedMatrix<f32>;
pub type DoubleMatrix = RowBasedMatrix<f64>;

/// Result of an elementwise matrix operation.
///
/// In-place operators hand back the matrix they mutated; all others return a
/// freshly built matrix with the same id and clock. Either way the value
/// derefs to the resulting matrix.
#[derive(Debug)]
pub enum Applied<'a, T> {
    InPlace(&'a RowBasedMatrix<T>),
    Fresh(RowBasedMatrix<T>),
}

impl<T: Element> Applied<'_, T> {
    pub fn is_inplace(&self) -> bool {
        matches!(self, Applied::InPlace(_))
    }

    /// Owned result; an in-place result is deep-copied.
    pub fn into_owned(self) -> RowBasedMatrix<T> {
        match self {
            Applied::InPlace(matrix) => matrix.copy(),
            Applied::Fresh(matrix) => matrix,
        }
    }
}

impl<T> Deref for Applied<'_, T> {
    type Target = RowBasedMatrix<T>;

    fn deref(&self) -> &Self::Target {
        match self {
            Applied::InPlace(matrix) => matrix,
            Applied::Fresh(matrix) => matrix,
        }
    }
}

impl<T: Element> RowBasedMatrix<T> {
    /// A `num_rows x num_cols` matrix with every row unmaterialized.
    pub fn new(matrix_id: i32, clock: i32, num_rows: usize, num_cols: usize) -> Self {
        Self {
            matrix_id,
            clock,
            cols: num_cols,
            rows: (0..num_rows).map(|_| RowSlot::empty()).collect(),
        }
    }

    /// Builds a matrix over existing rows. The column count is taken from the
    /// first row; every other row must agree.
    pub fn from_rows(matrix_id: i32, clock: i32, rows: Vec<Row<T>>) -> Result<Self> {
        let cols = rows.first().map(Row::dim).unwrap_or(0);
        if let Some(bad) = rows.iter().find(|row| row.dim() != cols) {
            return Err(PsError::dim_mismatch(cols, bad.dim()));
        }
        let slots = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| Some(row.with_identity(matrix_id, i, clock)))
            .collect();
        Ok(Self::from_slots(matrix_id, clock, cols, slots))
    }

    pub(crate) fn from_slots(matrix_id: i32, clock: i32, cols: usize, rows: Vec<Option<Row<T>>>) -> Self {
        Self {
            matrix_id,
            clock,
            cols,
            rows: rows.into_iter().map(RowSlot::from_option).collect(),
        }
    }

    pub fn matrix_id(&self) -> i32 {
        self.matrix_id
    }

    pub fn clock(&self) -> i32 {
        self.clock
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_cols(&self) -> usize {
        self.cols
    }

    fn slot(&self, i: usize) -> Result<&RowSlot<T>> {
        self.rows
            .get(i)
            .ok_or_else(|| PsError::row_out_of_range(i, self.rows.len()))
    }

    fn check_col(&self, j: usize) -> Result<()> {
        if j >= self.cols {
            return Err(PsError::col_out_of_range(j, self.cols));
        }
        Ok(())
    }

    fn check_vector(&self, vector: &Row<T>) -> Result<()> {
        if vector.dim() != self.cols {
            return Err(PsError::dim_mismatch(self.cols, vector.dim()));
        }
        Ok(())
    }

    fn materialize(&self, i: usize) -> bool {
        self.rows[i].materialize(self.matrix_id, i, self.clock, self.cols)
    }

    // --- Element access ---

    /// Reads `(i, j)`. An unmaterialized row reads as zero and stays
    /// unmaterialized.
    pub fn get(&self, i: usize, j: usize) -> Result<T> {
        let slot = self.slot(i)?;
        self.check_col(j)?;
        Ok(slot
            .read()
            .as_ref()
            .map(|row| row.storage().get(j))
            .unwrap_or_else(T::zero))
    }

    /// Writes `(i, j)`, materializing row `i` as sparse first if needed.
    pub fn set(&self, i: usize, j: usize, value: T) -> Result<()> {
        let slot = self.slot(i)?;
        self.check_col(j)?;
        self.materialize(i);
        if let Some(row) = slot.write().as_mut() {
            row.storage_mut().set(j, value);
        }
        Ok(())
    }

    /// Materializes row `i` as an empty sparse row. Returns `true` if this
    /// call did the allocation.
    pub fn init_empty(&self, i: usize) -> Result<bool> {
        self.slot(i)?;
        Ok(self.materialize(i))
    }

    pub fn is_materialized(&self, i: usize) -> Result<bool> {
        Ok(self.slot(i)?.is_materialized())
    }

    /// Snapshot of row `i`; `None` while unmaterialized.
    pub fn get_row(&self, i: usize) -> Result<Option<Row<T>>> {
        Ok(self.slot(i)?.snapshot())
    }

    /// Replaces row `i`. The row is re-tagged with this matrix's identity.
    pub fn set_row(&self, i: usize, row: Row<T>) -> Result<()> {
        let slot = self.slot(i)?;
        self.check_vector(&row)?;
        slot.replace(row.with_identity(self.matrix_id, i, self.clock));
        Ok(())
    }

    /// Replaces every row. Nothing is replaced if any row is rejected.
    pub fn set_rows(&mut self, rows: Vec<Row<T>>) -> Result<()> {
        if rows.len() != self.rows.len() {
            return Err(PsError::DimensionMismatch {
                what: "row count",
                expected: self.rows.len() as u64,
                actual: rows.len() as u64,
            });
        }
        for row in &rows {
            self.check_vector(row)?;
        }
        self.rows = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| RowSlot::with_row(row.with_identity(self.matrix_id, i, self.clock)))
            .collect();
        Ok(())
    }

    /// Dense diagonal of length `min(rows, cols)`.
    pub fn diag(&self) -> Row<T> {
        let len = self.rows.len().min(self.cols);
        let values = (0..len)
            .map(|i| {
                self.rows[i]
                    .read()
                    .as_ref()
                    .map(|row| row.storage().get(i))
                    .unwrap_or_else(T::zero)
            })
            .collect();
        Row::dense(self.matrix_id, 0, self.clock, values)
    }

    pub fn materialized_count(&self) -> usize {
        self.rows.iter().filter(|slot| slot.is_materialized()).count()
    }

    /// Non-zero entries across all materialized rows.
    pub fn nnz(&self) -> usize {
        self.rows
            .iter()
            .map(|slot| slot.read().as_ref().map(Row::nnz).unwrap_or(0))
            .sum()
    }

    // --- Elementwise operations ---

    /// Applies `op` between row `row_id` and `vector`.
    ///
    /// Non-in-place: every other row `i` is deep-copied into slot `i` of the
    /// result (unmaterialized rows stay unmaterialized), and only slot
    /// `row_id` receives the computed row.
    pub fn elementwise_row(&self, row_id: usize, vector: &Row<T>, op: &Binary) -> Result<Applied<'_, T>> {
        let target = self.slot(row_id)?;
        self.check_vector(vector)?;
        self.materialize(row_id);

        if op.is_inplace() {
            if let Some(row) = target.write().as_mut() {
                BinaryExecutor::apply_inplace(row, vector, op)?;
            }
            return Ok(Applied::InPlace(self));
        }

        let mut out = Vec::with_capacity(self.rows.len());
        for (i, slot) in self.rows.iter().enumerate() {
            if i == row_id {
                let computed = match slot.read().as_ref() {
                    Some(row) => Some(BinaryExecutor::compute(row, vector, op)?),
                    None => None,
                };
                out.push(computed);
            } else {
                out.push(slot.snapshot());
            }
        }
        Ok(Applied::Fresh(Self::from_slots(self.matrix_id, self.clock, self.cols, out)))
    }

    /// Applies `op` between every row and the broadcast `vector`.
    pub fn elementwise_vector(&self, vector: &Row<T>, op: &Binary) -> Result<Applied<'_, T>> {
        self.check_vector(vector)?;

        if op.is_inplace() {
            for (i, slot) in self.rows.iter().enumerate() {
                self.materialize(i);
                if let Some(row) = slot.write().as_mut() {
                    BinaryExecutor::apply_inplace(row, vector, op)?;
                }
            }
            return Ok(Applied::InPlace(self));
        }

        let mut out = Vec::with_capacity(self.rows.len());
        for (i, slot) in self.rows.iter().enumerate() {
            self.materialize(i);
            let computed = match slot.read().as_ref() {
                Some(row) => Some(BinaryExecutor::compute(row, vector, op)?),
                None => None,
            };
            out.push(computed);
        }
        Ok(Applied::Fresh(Self::from_slots(self.matrix_id, self.clock, self.cols, out)))
    }

    /// Applies `op` row-for-row between two matrices of identical shape.
    ///
    /// Unmaterialized rows on either side are materialized as empty sparse
    /// rows first. `other` may be `self`.
    pub fn elementwise_matrix(&self, other: &RowBasedMatrix<T>, op: &Binary) -> Result<Applied<'_, T>> {
        if other.num_rows() != self.num_rows() {
            return Err(PsError::DimensionMismatch {
                what: "row count",
                expected: self.num_rows() as u64,
                actual: other.num_rows() as u64,
            });
        }
        if other.num_cols() != self.cols {
            return Err(PsError::dim_mismatch(self.cols, other.num_cols()));
        }

        let mut out = Vec::with_capacity(if op.is_inplace() { 0 } else { self.rows.len() });
        for i in 0..self.rows.len() {
            self.materialize(i);
            other.materialize(i);
            // Snapshot the operand so no two row locks are ever held together.
            let rhs = other.rows[i]
                .snapshot()
                .unwrap_or_else(|| Row::sparse(other.matrix_id, i, other.clock, other.cols));

            if op.is_inplace() {
                if let Some(row) = self.rows[i].write().as_mut() {
                    BinaryExecutor::apply_inplace(row, &rhs, op)?;
                }
            } else {
                let computed = match self.rows[i].read().as_ref() {
                    Some(row) => Some(BinaryExecutor::compute(row, &rhs, op)?),
                    None => None,
                };
                out.push(computed);
            }
        }

        if op.is_inplace() {
            Ok(Applied::InPlace(self))
        } else {
            Ok(Applied::Fresh(Self::from_slots(self.matrix_id, self.clock, self.cols, out)))
        }
    }

    /// Applies a unary operator to every row, materializing rows as needed.
    pub fn elementwise_unary(&self, op: &Unary) -> Applied<'_, T> {
        if op.is_inplace() {
            for (i, slot) in self.rows.iter().enumerate() {
                self.materialize(i);
                if let Some(row) = slot.write().as_mut() {
                    UnaryExecutor::apply_inplace(row, op);
                }
            }
            return Applied::InPlace(self);
        }

        let out = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, slot)| {
                self.materialize(i);
                slot.read().as_ref().map(|row| UnaryExecutor::compute(row, op))
            })
            .collect();
        Applied::Fresh(Self::from_slots(self.matrix_id, self.clock, self.cols, out))
    }

    // --- Reductions ---

    /// One value per row; unmaterialized rows contribute `NaN`.
    fn reduce_rows(&self, axis: i32, reduce: impl Fn(&Row<T>) -> f64) -> Result<Row<f64>> {
        if axis != 1 {
            return Err(PsError::UnsupportedAxis { axis });
        }
        let values = self
            .rows
            .iter()
            .map(|slot| slot.read().as_ref().map(&reduce).unwrap_or(f64::NAN))
            .collect();
        Ok(Row::dense(self.matrix_id, 0, self.clock, values))
    }

    pub fn min_axis(&self, axis: i32) -> Result<Row<f64>> {
        self.reduce_rows(axis, Row::min)
    }

    pub fn max_axis(&self, axis: i32) -> Result<Row<f64>> {
        self.reduce_rows(axis, Row::max)
    }

    pub fn sum_axis(&self, axis: i32) -> Result<Row<f64>> {
        self.reduce_rows(axis, Row::sum)
    }

    pub fn average_axis(&self, axis: i32) -> Result<Row<f64>> {
        self.reduce_rows(axis, Row::average)
    }

    pub fn std_axis(&self, axis: i32) -> Result<Row<f64>> {
        self.reduce_rows(axis, Row::std)
    }

    pub fn norm_axis(&self, axis: i32) -> Result<Row<f64>> {
        self.reduce_rows(axis, Row::norm)
    }

    /// Smallest value over materialized rows; `NaN` if there is none.
    pub fn min(&self) -> f64 {
        self.fold_materialized(Row::min, f64::min)
    }

    /// Largest value over materialized rows; `NaN` if there is none.
    pub fn max(&self) -> f64 {
        self.fold_materialized(Row::max, f64::max)
    }

    fn fold_materialized(&self, reduce: impl Fn(&Row<T>) -> f64, pick: fn(f64, f64) -> f64) -> f64 {
        self.rows
            .iter()
            .filter_map(|slot| slot.read().as_ref().map(&reduce))
            .filter(|v| !v.is_nan())
            .reduce(pick)
            .unwrap_or(f64::NAN)
    }

    /// Deep copy; unmaterialized rows stay unmaterialized.
    pub fn copy(&self) -> Self {
        Self {
            matrix_id: self.matrix_id,
            clock: self.clock,
            cols: self.cols,
            rows: self.rows.clone(),
        }
    }
}

impl<T: Element> Clone for RowBasedMatrix<T> {
    fn clone(&self) -> Self {
        self.copy()
    }
}

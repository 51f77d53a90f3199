//! Row storage variants.
//!
//! A row is held either densely (one slot per coordinate) or sparsely (only
//! non-zero coordinates, ordered by index). Both variants answer the same
//! value-access contract; absent sparse coordinates read as zero.

use super::element::Element;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which storage variant a row uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageKind {
    Dense,
    Sparse,
}

/// Sparse storage: an ordered `index -> value` map over a fixed dimension.
///
/// Ordered iteration is what lets two sparse rows be merged in
/// `O(nnz_a + nnz_b)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseStorage<T> {
    dim: usize,
    entries: BTreeMap<usize, T>,
}

impl<T: Element> SparseStorage<T> {
    /// Empty sparse storage of the given dimension.
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            entries: BTreeMap::new(),
        }
    }

    /// Builds sparse storage from `(index, value)` pairs, dropping zeros.
    ///
    /// Indices at or beyond `dim` are ignored.
    pub fn from_entries(dim: usize, entries: impl IntoIterator<Item = (usize, T)>) -> Self {
        let entries = entries
            .into_iter()
            .filter(|(i, v)| *i < dim && !v.is_zero_value())
            .collect();
        Self { dim, entries }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn get(&self, index: usize) -> T {
        self.entries.get(&index).copied().unwrap_or_else(T::zero)
    }

    /// Writes a value; writing zero removes the entry.
    pub fn set(&mut self, index: usize, value: T) {
        if value.is_zero_value() {
            self.entries.remove(&index);
        } else {
            self.entries.insert(index, value);
        }
    }

    /// Stored entries in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, T)> + '_ {
        self.entries.iter().map(|(i, v)| (*i, *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Polymorphic row storage.
#[derive(Debug, Clone, PartialEq)]
pub enum RowStorage<T> {
    Dense(Vec<T>),
    Sparse(SparseStorage<T>),
}

impl<T: Element> RowStorage<T> {
    pub fn dense_zeros(dim: usize) -> Self {
        RowStorage::Dense(vec![T::zero(); dim])
    }

    pub fn sparse(dim: usize) -> Self {
        RowStorage::Sparse(SparseStorage::new(dim))
    }

    pub fn kind(&self) -> StorageKind {
        match self {
            RowStorage::Dense(_) => StorageKind::Dense,
            RowStorage::Sparse(_) => StorageKind::Sparse,
        }
    }

    pub fn dim(&self) -> usize {
        match self {
            RowStorage::Dense(values) => values.len(),
            RowStorage::Sparse(sparse) => sparse.dim(),
        }
    }

    /// Reads one coordinate. Callers check `index < dim()`.
    pub fn get(&self, index: usize) -> T {
        match self {
            RowStorage::Dense(values) => values[index],
            RowStorage::Sparse(sparse) => sparse.get(index),
        }
    }

    /// Writes one coordinate. Callers check `index < dim()`.
    pub fn set(&mut self, index: usize, value: T) {
        match self {
            RowStorage::Dense(values) => values[index] = value,
            RowStorage::Sparse(sparse) => sparse.set(index, value),
        }
    }

    /// Number of entries physically stored.
    pub fn size(&self) -> usize {
        match self {
            RowStorage::Dense(values) => values.len(),
            RowStorage::Sparse(sparse) => sparse.len(),
        }
    }

    /// Number of non-zero coordinates.
    pub fn nnz(&self) -> usize {
        match self {
            RowStorage::Dense(_) => self.iter_nonzero().count(),
            RowStorage::Sparse(sparse) => sparse.len(),
        }
    }

    /// Non-zero coordinates in ascending index order.
    pub fn iter_nonzero(&self) -> Box<dyn Iterator<Item = (usize, T)> + '_> {
        match self {
            RowStorage::Dense(values) => Box::new(
                values
                    .iter()
                    .enumerate()
                    .filter(|(_, v)| !v.is_zero_value())
                    .map(|(i, v)| (i, *v)),
            ),
            RowStorage::Sparse(sparse) => Box::new(sparse.iter()),
        }
    }

    /// Dense copy of the values.
    pub fn to_dense(&self) -> Vec<T> {
        match self {
            RowStorage::Dense(values) => values.clone(),
            RowStorage::Sparse(sparse) => {
                let mut values = vec![T::zero(); sparse.dim()];
                for (i, v) in sparse.iter() {
                    values[i] = v;
                }
                values
            }
        }
    }

    /// Converts this storage to the dense variant in place.
    pub fn densify(&mut self) {
        if let RowStorage::Sparse(_) = self {
            *self = RowStorage::Dense(self.to_dense());
        }
    }

    // --- Reductions ---
    //
    // A storage with no stored entries has no data: sum and norm are 0,
    // everything else is NaN. A sparse storage with some entries counts its
    // implicit zeros.

    fn stored_values(&self) -> Box<dyn Iterator<Item = f64> + '_> {
        match self {
            RowStorage::Dense(values) => Box::new(values.iter().map(|v| v.to_f64())),
            RowStorage::Sparse(sparse) => Box::new(sparse.iter().map(|(_, v)| v.to_f64())),
        }
    }

    fn has_implicit_zeros(&self) -> bool {
        match self {
            RowStorage::Dense(_) => false,
            RowStorage::Sparse(sparse) => sparse.len() < sparse.dim(),
        }
    }

    pub fn sum(&self) -> f64 {
        self.iter_nonzero().map(|(_, v)| v.to_f64()).sum()
    }

    pub fn min(&self) -> f64 {
        if self.size() == 0 {
            return f64::NAN;
        }
        let stored = self.stored_values().fold(f64::INFINITY, f64::min);
        if self.has_implicit_zeros() {
            stored.min(0.0)
        } else {
            stored
        }
    }

    pub fn max(&self) -> f64 {
        if self.size() == 0 {
            return f64::NAN;
        }
        let stored = self.stored_values().fold(f64::NEG_INFINITY, f64::max);
        if self.has_implicit_zeros() {
            stored.max(0.0)
        } else {
            stored
        }
    }

    pub fn average(&self) -> f64 {
        if self.size() == 0 {
            return f64::NAN;
        }
        self.sum() / self.dim() as f64
    }

    /// Population standard deviation over the full dimension.
    pub fn std(&self) -> f64 {
        if self.size() == 0 {
            return f64::NAN;
        }
        let n = self.dim() as f64;
        let mean = self.sum() / n;
        let sum_sq: f64 = self.stored_values().map(|v| v * v).sum();
        let variance = (sum_sq / n - mean * mean).max(0.0);
        variance.sqrt()
    }

    /// Euclidean (L2) norm.
    pub fn norm(&self) -> f64 {
        self.iter_nonzero()
            .map(|(_, v)| v.to_f64() * v.to_f64())
            .sum::<f64>()
            .sqrt()
    }
}

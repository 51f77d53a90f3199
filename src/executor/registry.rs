//! Binary Strategy Registry
//!
//! Maps a pair of operand storage kinds to the routine that combines them.
//! Each routine knows its own complexity: `dense⊗dense` walks the full
//! dimension, `sparse⊗sparse` merges the two ordered entry lists in
//! `O(nnz_a + nnz_b)`, and the mixed routines iterate only the sparse side
//! whenever the operator's [`OpType`] allows it.
//!
//! The operand dimensions are checked by the executor before lookup.

use super::types::{Binary, OpType};
use crate::vector::{Element, RowStorage, SparseStorage, StorageKind};
use std::borrow::Cow;

/// Combines two storages into a freshly allocated result.
pub type ComputeFn<T> = fn(&RowStorage<T>, &RowStorage<T>, &Binary) -> RowStorage<T>;

/// Combines two storages, rewriting the first.
pub type InplaceFn<T> = fn(&mut RowStorage<T>, &RowStorage<T>, &Binary);

/// One entry of the strategy table.
pub struct Strategy<T> {
    pub name: &'static str,
    pub compute: ComputeFn<T>,
    pub compute_inplace: InplaceFn<T>,
}

/// Looks up the strategy for `(lhs, rhs)` storage kinds.
pub fn lookup<T: Element>(lhs: StorageKind, rhs: StorageKind) -> Strategy<T> {
    match (lhs, rhs) {
        (StorageKind::Dense, StorageKind::Dense) => Strategy {
            name: "dense-dense",
            compute: dense_dense,
            compute_inplace: dense_dense_inplace,
        },
        (StorageKind::Dense, StorageKind::Sparse) => Strategy {
            name: "dense-sparse",
            compute: dense_sparse,
            compute_inplace: dense_sparse_inplace,
        },
        (StorageKind::Sparse, StorageKind::Dense) => Strategy {
            name: "sparse-dense",
            compute: sparse_dense,
            compute_inplace: sparse_dense_inplace,
        },
        (StorageKind::Sparse, StorageKind::Sparse) => Strategy {
            name: "sparse-sparse",
            compute: sparse_sparse,
            compute_inplace: sparse_sparse_inplace,
        },
    }
}

// --- Shared helpers ---

fn dense_view<T: Element>(storage: &RowStorage<T>) -> Cow<'_, [T]> {
    match storage {
        RowStorage::Dense(values) => Cow::Borrowed(values.as_slice()),
        RowStorage::Sparse(_) => Cow::Owned(storage.to_dense()),
    }
}

/// Full-dimension pass over any pair of variants. Always produces dense output.
fn full_pass<T: Element>(lhs: &RowStorage<T>, rhs: &RowStorage<T>, op: &Binary) -> RowStorage<T> {
    let a = dense_view(lhs);
    let b = dense_view(rhs);
    RowStorage::Dense(a.iter().zip(b.iter()).map(|(x, y)| op.apply(*x, *y)).collect())
}

// --- dense ⊗ dense ---

fn dense_dense<T: Element>(lhs: &RowStorage<T>, rhs: &RowStorage<T>, op: &Binary) -> RowStorage<T> {
    full_pass(lhs, rhs, op)
}

fn dense_dense_inplace<T: Element>(lhs: &mut RowStorage<T>, rhs: &RowStorage<T>, op: &Binary) {
    if let (RowStorage::Dense(a), RowStorage::Dense(b)) = (&mut *lhs, rhs) {
        for (x, y) in a.iter_mut().zip(b.iter()) {
            *x = op.apply(*x, *y);
        }
        return;
    }
    *lhs = full_pass(lhs, rhs, op);
}

// --- dense ⊗ sparse ---

fn dense_sparse<T: Element>(lhs: &RowStorage<T>, rhs: &RowStorage<T>, op: &Binary) -> RowStorage<T> {
    let (RowStorage::Dense(a), RowStorage::Sparse(b)) = (lhs, rhs) else {
        return full_pass(lhs, rhs, op);
    };
    match op.op_type() {
        OpType::Intersection => RowStorage::Sparse(SparseStorage::from_entries(
            a.len(),
            b.iter().map(|(i, y)| (i, op.apply(a[i], y))),
        )),
        OpType::Union if op.op().zero_is_right_identity() => {
            let mut out = a.clone();
            for (i, y) in b.iter() {
                out[i] = op.apply(a[i], y);
            }
            RowStorage::Dense(out)
        }
        OpType::Union | OpType::All => full_pass(lhs, rhs, op),
    }
}

fn dense_sparse_inplace<T: Element>(lhs: &mut RowStorage<T>, rhs: &RowStorage<T>, op: &Binary) {
    // Intersection results are sparse, so the dense lhs is replaced below.
    if op.op_type() != OpType::Intersection
        && let (RowStorage::Dense(a), RowStorage::Sparse(b)) = (&mut *lhs, rhs)
    {
        if op.op().zero_is_right_identity() {
            for (i, y) in b.iter() {
                a[i] = op.apply(a[i], y);
            }
        } else {
            let mut entries = b.iter().peekable();
            for (i, x) in a.iter_mut().enumerate() {
                let y = match entries.peek() {
                    Some(&(j, y)) if j == i => {
                        entries.next();
                        y
                    }
                    _ => T::zero(),
                };
                *x = op.apply(*x, y);
            }
        }
        return;
    }
    *lhs = dense_sparse(lhs, rhs, op);
}

// --- sparse ⊗ dense ---

fn sparse_dense<T: Element>(lhs: &RowStorage<T>, rhs: &RowStorage<T>, op: &Binary) -> RowStorage<T> {
    let (RowStorage::Sparse(a), RowStorage::Dense(b)) = (lhs, rhs) else {
        return full_pass(lhs, rhs, op);
    };
    match op.op_type() {
        OpType::Intersection => RowStorage::Sparse(SparseStorage::from_entries(
            a.dim(),
            a.iter().map(|(i, x)| (i, op.apply(x, b[i]))),
        )),
        OpType::Union | OpType::All => {
            let mut entries = a.iter().peekable();
            let out = b
                .iter()
                .enumerate()
                .map(|(i, y)| {
                    let x = match entries.peek() {
                        Some(&(j, x)) if j == i => {
                            entries.next();
                            x
                        }
                        _ => T::zero(),
                    };
                    op.apply(x, *y)
                })
                .collect();
            RowStorage::Dense(out)
        }
    }
}

fn sparse_dense_inplace<T: Element>(lhs: &mut RowStorage<T>, rhs: &RowStorage<T>, op: &Binary) {
    *lhs = sparse_dense(lhs, rhs, op);
}

// --- sparse ⊗ sparse ---

fn sparse_sparse<T: Element>(lhs: &RowStorage<T>, rhs: &RowStorage<T>, op: &Binary) -> RowStorage<T> {
    let (RowStorage::Sparse(a), RowStorage::Sparse(b)) = (lhs, rhs) else {
        return full_pass(lhs, rhs, op);
    };
    match op.op_type() {
        OpType::Union => RowStorage::Sparse(merge_union(a, b, op)),
        OpType::Intersection => RowStorage::Sparse(merge_intersection(a, b, op)),
        OpType::All => full_pass(lhs, rhs, op),
    }
}

fn sparse_sparse_inplace<T: Element>(lhs: &mut RowStorage<T>, rhs: &RowStorage<T>, op: &Binary) {
    *lhs = sparse_sparse(lhs, rhs, op);
}

fn merge_union<T: Element>(a: &SparseStorage<T>, b: &SparseStorage<T>, op: &Binary) -> SparseStorage<T> {
    let mut merged = Vec::with_capacity(a.len() + b.len());
    let mut left = a.iter().peekable();
    let mut right = b.iter().peekable();

    loop {
        let entry = match (left.peek().copied(), right.peek().copied()) {
            (Some((i, x)), Some((j, y))) if i == j => {
                left.next();
                right.next();
                (i, op.apply(x, y))
            }
            (Some((i, x)), Some((j, _))) if i < j => {
                left.next();
                (i, op.apply(x, T::zero()))
            }
            (_, Some((j, y))) => {
                right.next();
                (j, op.apply(T::zero(), y))
            }
            (Some((i, x)), None) => {
                left.next();
                (i, op.apply(x, T::zero()))
            }
            (None, None) => break,
        };
        merged.push(entry);
    }

    SparseStorage::from_entries(a.dim(), merged)
}

fn merge_intersection<T: Element>(
    a: &SparseStorage<T>,
    b: &SparseStorage<T>,
    op: &Binary,
) -> SparseStorage<T> {
    let mut merged = Vec::with_capacity(a.len().min(b.len()));
    let mut left = a.iter().peekable();
    let mut right = b.iter().peekable();

    while let (Some((i, x)), Some((j, y))) = (left.peek().copied(), right.peek().copied()) {
        if i == j {
            merged.push((i, op.apply(x, y)));
            left.next();
            right.next();
        } else if i < j {
            left.next();
        } else {
            right.next();
        }
    }

    SparseStorage::from_entries(a.dim(), merged)
}

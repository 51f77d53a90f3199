//! Operator Executor Module
//!
//! Runs elementwise operators across rows whose storage may be dense or sparse.
//!
//! ## Dispatch
//! A binary operator over two rows has four storage combinations. Rather than
//! branching on every pair inside every operator, the executor looks up a
//! strategy keyed by `(lhs kind, rhs kind)` and the operator only supplies its
//! scalar function plus its [`OpType`], which fixes the result variant:
//! 1. **Union** (add, sub, max, min, axpy): sparse stays sparse against sparse,
//!    densifies against dense.
//! 2. **Intersection** (mul, div): the result is as sparse as the sparser side.
//! 3. **All** (pow): the result is always dense.
//!
//! ## Submodules
//! - **`types`**: Operator catalog and the explicit in-place flag.
//! - **`registry`**: The `(kind, kind)` strategy table and merge routines.
//! - **`executor`**: `BinaryExecutor` and `UnaryExecutor`.

pub mod executor;
pub mod registry;
pub mod types;

pub use executor::{BinaryExecutor, UnaryExecutor};
pub use types::{Binary, BinaryOp, OpType, Unary, UnaryOp};

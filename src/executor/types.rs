use crate::vector::Element;
use serde::{Deserialize, Serialize};

/// How an operator treats coordinates that are zero on one side.
///
/// The op type decides which storage variant a result can use: a union
/// operator over two sparse rows stays sparse, but a union with a dense row
/// touches every coordinate and densifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpType {
    /// Non-zero where either side is non-zero.
    Union,
    /// Non-zero only where both sides are non-zero.
    Intersection,
    /// Any coordinate may become non-zero.
    All,
}

/// Elementwise binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Max,
    Min,
    /// `a + alpha * b`
    Axpy { alpha: f64 },
    /// `a ^ b`
    Pow,
}

impl BinaryOp {
    pub fn op_type(&self) -> OpType {
        match self {
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Max | BinaryOp::Min | BinaryOp::Axpy { .. } => {
                OpType::Union
            }
            BinaryOp::Mul | BinaryOp::Div => OpType::Intersection,
            BinaryOp::Pow => OpType::All,
        }
    }

    /// True when `op(a, 0) == a` for every `a`.
    pub fn zero_is_right_identity(&self) -> bool {
        matches!(self, BinaryOp::Add | BinaryOp::Sub | BinaryOp::Axpy { .. })
    }

    pub fn is_commutative(&self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Mul | BinaryOp::Max | BinaryOp::Min
        )
    }

    pub fn apply<T: Element>(&self, a: T, b: T) -> T {
        match self {
            BinaryOp::Add => a.add_wrap(b),
            BinaryOp::Sub => a.sub_wrap(b),
            BinaryOp::Mul => a.mul_wrap(b),
            BinaryOp::Div => a.quotient(b),
            BinaryOp::Max => {
                if a >= b {
                    a
                } else {
                    b
                }
            }
            BinaryOp::Min => {
                if a <= b {
                    a
                } else {
                    b
                }
            }
            BinaryOp::Axpy { alpha } => a.add_wrap(T::from_f64(alpha * b.to_f64())),
            BinaryOp::Pow => T::from_f64(a.to_f64().powf(b.to_f64())),
        }
    }
}

/// A binary operator together with the caller's in-place decision.
///
/// `inplace` is never inferred: an in-place operator rewrites its first
/// operand, anything else allocates a fresh result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Binary {
    op: BinaryOp,
    inplace: bool,
}

impl Binary {
    pub fn new(op: BinaryOp, inplace: bool) -> Self {
        Self { op, inplace }
    }

    pub fn add(inplace: bool) -> Self {
        Self::new(BinaryOp::Add, inplace)
    }

    pub fn sub(inplace: bool) -> Self {
        Self::new(BinaryOp::Sub, inplace)
    }

    pub fn mul(inplace: bool) -> Self {
        Self::new(BinaryOp::Mul, inplace)
    }

    pub fn div(inplace: bool) -> Self {
        Self::new(BinaryOp::Div, inplace)
    }

    pub fn max(inplace: bool) -> Self {
        Self::new(BinaryOp::Max, inplace)
    }

    pub fn min(inplace: bool) -> Self {
        Self::new(BinaryOp::Min, inplace)
    }

    pub fn axpy(alpha: f64, inplace: bool) -> Self {
        Self::new(BinaryOp::Axpy { alpha }, inplace)
    }

    pub fn pow(inplace: bool) -> Self {
        Self::new(BinaryOp::Pow, inplace)
    }

    pub fn op(&self) -> BinaryOp {
        self.op
    }

    pub fn op_type(&self) -> OpType {
        self.op.op_type()
    }

    pub fn is_inplace(&self) -> bool {
        self.inplace
    }

    pub fn apply<T: Element>(&self, a: T, b: T) -> T {
        self.op.apply(a, b)
    }
}

/// Elementwise unary operators. Scalar arguments are given as `f64` and
/// converted to the row's element type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum UnaryOp {
    Scale { factor: f64 },
    ScalarAdd { value: f64 },
    Abs,
    Sqrt,
    Exp,
    Square,
}

impl UnaryOp {
    /// True when `op(0) == 0`, so sparse rows can stay sparse.
    pub fn preserves_zero(&self) -> bool {
        match self {
            UnaryOp::Scale { .. } | UnaryOp::Abs | UnaryOp::Sqrt | UnaryOp::Square => true,
            UnaryOp::ScalarAdd { value } => *value == 0.0,
            UnaryOp::Exp => false,
        }
    }

    pub fn apply<T: Element>(&self, v: T) -> T {
        match self {
            UnaryOp::Scale { factor } => T::from_f64(v.to_f64() * factor),
            UnaryOp::ScalarAdd { value } => T::from_f64(v.to_f64() + value),
            UnaryOp::Abs => {
                if v < T::zero() {
                    T::zero().sub_wrap(v)
                } else {
                    v
                }
            }
            UnaryOp::Sqrt => T::from_f64(v.to_f64().sqrt()),
            UnaryOp::Exp => T::from_f64(v.to_f64().exp()),
            UnaryOp::Square => v.mul_wrap(v),
        }
    }
}

/// A unary operator together with the caller's in-place decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Unary {
    op: UnaryOp,
    inplace: bool,
}

impl Unary {
    pub fn new(op: UnaryOp, inplace: bool) -> Self {
        Self { op, inplace }
    }

    pub fn scale(factor: f64, inplace: bool) -> Self {
        Self::new(UnaryOp::Scale { factor }, inplace)
    }

    pub fn scalar_add(value: f64, inplace: bool) -> Self {
        Self::new(UnaryOp::ScalarAdd { value }, inplace)
    }

    pub fn abs(inplace: bool) -> Self {
        Self::new(UnaryOp::Abs, inplace)
    }

    pub fn sqrt(inplace: bool) -> Self {
        Self::new(UnaryOp::Sqrt, inplace)
    }

    pub fn exp(inplace: bool) -> Self {
        Self::new(UnaryOp::Exp, inplace)
    }

    pub fn square(inplace: bool) -> Self {
        Self::new(UnaryOp::Square, inplace)
    }

    pub fn op(&self) -> UnaryOp {
        self.op
    }

    pub fn is_inplace(&self) -> bool {
        self.inplace
    }

    pub fn preserves_zero(&self) -> bool {
        self.op.preserves_zero()
    }

    pub fn apply<T: Element>(&self, v: T) -> T {
        self.op.apply(v)
    }
}

//! Element trait for the scalar types a row can hold.
//!
//! Model parameters are stored either as counts (`i32`, `i64`) or as weights
//! (`f32`, `f64`). Reductions always promote to `f64`, so an integer row and a
//! floating row with the same values report the same statistics.

use num_traits::{Num, Zero};
use std::fmt::{Debug, Display};

/// Scalar stored in a row.
///
/// # Bounds
/// - `Num` supplies `zero`/`one` and the arithmetic operators.
/// - `PartialOrd` drives `min`/`max` operators.
/// - `Send + Sync + 'static` lets matrices be shared across writer threads.
pub trait Element:
    Num + Copy + PartialOrd + Debug + Display + Default + Send + Sync + 'static
{
    /// Short type name used in logs.
    const NAME: &'static str;

    /// Convert to f64 for reductions and transcendental operators.
    fn to_f64(self) -> f64;

    /// Convert back from f64, saturating integers and mapping `NaN` to zero.
    fn from_f64(v: f64) -> Self;

    /// Quotient that never panics: integer division by zero yields zero.
    fn quotient(self, rhs: Self) -> Self;

    /// Sum that wraps on integer overflow instead of panicking.
    fn add_wrap(self, rhs: Self) -> Self;

    /// Difference that wraps on integer overflow.
    fn sub_wrap(self, rhs: Self) -> Self;

    /// Product that wraps on integer overflow.
    fn mul_wrap(self, rhs: Self) -> Self;

    /// True when the value is the additive identity.
    fn is_zero_value(self) -> bool {
        self == <Self as Zero>::zero()
    }
}

macro_rules! impl_int_element {
    ($t:ty, $name:expr) => {
        impl Element for $t {
            const NAME: &'static str = $name;

            fn to_f64(self) -> f64 {
                self as f64
            }

            fn from_f64(v: f64) -> Self {
                // `as` saturates at the type bounds and maps NaN to 0.
                v as $t
            }

            fn quotient(self, rhs: Self) -> Self {
                self.checked_div(rhs).unwrap_or(0)
            }

            fn add_wrap(self, rhs: Self) -> Self {
                self.wrapping_add(rhs)
            }

            fn sub_wrap(self, rhs: Self) -> Self {
                self.wrapping_sub(rhs)
            }

            fn mul_wrap(self, rhs: Self) -> Self {
                self.wrapping_mul(rhs)
            }
        }
    };
}

macro_rules! impl_float_element {
    ($t:ty, $name:expr) => {
        impl Element for $t {
            const NAME: &'static str = $name;

            fn to_f64(self) -> f64 {
                self as f64
            }

            fn from_f64(v: f64) -> Self {
                v as $t
            }

            fn quotient(self, rhs: Self) -> Self {
                self / rhs
            }

            fn add_wrap(self, rhs: Self) -> Self {
                self + rhs
            }

            fn sub_wrap(self, rhs: Self) -> Self {
                self - rhs
            }

            fn mul_wrap(self, rhs: Self) -> Self {
                self * rhs
            }
        }
    };
}

impl_int_element!(i32, "int");
impl_int_element!(i64, "long");
impl_float_element!(f32, "float");
impl_float_element!(f64, "double");

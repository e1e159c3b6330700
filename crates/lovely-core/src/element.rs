//! Element types that lovely views know how to summarize.
//!
//! ```text
//! Element
//!   ├── floats   (f32, f64)          printed with the configured precision
//!   ├── integers (i8 … i64, u8 … u64) printed exactly
//!   └── bool                          printed as false / true
//! ```
//!
//! Statistics are always accumulated in `f64`, so every element type only
//! needs a lossy widening conversion (`bool` counts as 0 / 1 there). The
//! printed range compares elements natively and keeps their exact value.

use core::fmt;

/// Element type of an array that can be rendered by [`Lovely`](crate::Lovely).
pub trait Element:
    Copy + PartialOrd + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Short dtype name shown in summaries (`f32`, `i64`, `u8`, ...).
    const DTYPE: &'static str;

    /// Whether values are printed with the configured precision.
    const IS_FLOAT: bool;

    /// Widen to `f64` for statistics.
    fn to_f64(self) -> f64;

    /// Size of one element in bytes.
    #[inline]
    fn size_bytes() -> usize {
        core::mem::size_of::<Self>()
    }
}

/// The dtype whose name is left out of summaries.
pub const DEFAULT_DTYPE: &str = "f32";

macro_rules! impl_element_float {
    ($ty:ty, $name:literal) => {
        impl Element for $ty {
            const DTYPE: &'static str = $name;
            const IS_FLOAT: bool = true;

            #[inline]
            fn to_f64(self) -> f64 {
                f64::from(self)
            }
        }
    };
}

impl_element_float!(f32, "f32");
impl_element_float!(f64, "f64");

macro_rules! impl_element_int {
    ($ty:ty, $name:literal) => {
        impl Element for $ty {
            const DTYPE: &'static str = $name;
            const IS_FLOAT: bool = false;

            #[inline]
            #[allow(clippy::cast_precision_loss)]
            fn to_f64(self) -> f64 {
                self as f64
            }
        }
    };
}

impl_element_int!(i8, "i8");
impl_element_int!(i16, "i16");
impl_element_int!(i32, "i32");
impl_element_int!(i64, "i64");
impl_element_int!(u8, "u8");
impl_element_int!(u16, "u16");
impl_element_int!(u32, "u32");
impl_element_int!(u64, "u64");

impl Element for bool {
    const DTYPE: &'static str = "bool";
    const IS_FLOAT: bool = false;

    #[inline]
    fn to_f64(self) -> f64 {
        if self {
            1.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_dtype_names() {
        assert_eq!(f32::DTYPE, DEFAULT_DTYPE);
        assert_eq!(f64::DTYPE, "f64");
        assert_eq!(u8::DTYPE, "u8");
        assert_eq!(bool::DTYPE, "bool");
    }

    #[test]
    fn test_to_f64() {
        assert_eq!(1.5_f32.to_f64(), 1.5);
        assert_eq!((-7_i64).to_f64(), -7.0);
        assert_eq!(255_u8.to_f64(), 255.0);
        assert_eq!(true.to_f64(), 1.0);
        assert!(f64::NAN.to_f64().is_nan());
    }

    #[test]
    fn test_size_bytes() {
        assert_eq!(f64::size_bytes(), 8);
        assert_eq!(u16::size_bytes(), 2);
        assert_eq!(bool::size_bytes(), 1);
    }

    #[test]
    fn test_is_float() {
        assert!(f32::IS_FLOAT);
        assert!(!i32::IS_FLOAT);
    }
}

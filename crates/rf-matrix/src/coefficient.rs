//! Numeric cell types.

use core::fmt::Debug;

/// A numeric type a matrix can store, or be written and read as.
pub trait Coefficient:
    Copy + Default + PartialEq + PartialOrd + Debug + Send + Sync + 'static
{
    /// Values of this type never carry a fractional part.
    const INTEGRAL: bool;

    fn to_f64(self) -> f64;

    /// Convert from `f64`, truncating toward zero for integral types.
    fn from_f64(value: f64) -> Self;

    fn parse_cell(text: &str) -> Option<Self>;
}

macro_rules! integral_coefficient {
    ($($t:ty),*) => {
        $(
            impl Coefficient for $t {
                const INTEGRAL: bool = true;

                fn to_f64(self) -> f64 {
                    self as f64
                }

                fn from_f64(value: f64) -> Self {
                    value.trunc() as $t
                }

                fn parse_cell(text: &str) -> Option<Self> {
                    text.parse::<$t>()
                        .ok()
                        .or_else(|| text.parse::<f64>().ok().map(Self::from_f64))
                }
            }
        )*
    };
}

macro_rules! floating_coefficient {
    ($($t:ty),*) => {
        $(
            impl Coefficient for $t {
                const INTEGRAL: bool = false;

                fn to_f64(self) -> f64 {
                    self as f64
                }

                fn from_f64(value: f64) -> Self {
                    value as $t
                }

                fn parse_cell(text: &str) -> Option<Self> {
                    text.parse::<$t>().ok()
                }
            }
        )*
    };
}

integral_coefficient!(i32, u32, i64);
floating_coefficient!(f32, f64);

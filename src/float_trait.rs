use conv::prelude::*;
use ndarray::NdFloat;
use num_traits::FloatConst;
use schemars::JsonSchema;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::iter::Sum;

/// Floating point type used by profiles, grids and planes
///
/// Implemented for `f32` and `f64`.
pub trait Float:
    'static
    + Sized
    + NdFloat
    + FloatConst
    + Sum
    + PartialOrd
    + ApproxFrom<usize>
    + ApproxFrom<f64>
    + ValueFrom<f32>
    + ValueInto<f64>
    + JsonSchema
    + Serialize
    + DeserializeOwned
{
    fn half() -> Self;
    fn two() -> Self;
    fn three() -> Self;
    fn four() -> Self;
}

impl Float for f32 {
    #[inline]
    fn half() -> Self {
        0.5
    }

    #[inline]
    fn two() -> Self {
        2.0
    }

    #[inline]
    fn three() -> Self {
        3.0
    }

    #[inline]
    fn four() -> Self {
        4.0
    }
}

impl Float for f64 {
    #[inline]
    fn half() -> Self {
        0.5
    }

    #[inline]
    fn two() -> Self {
        2.0
    }

    #[inline]
    fn three() -> Self {
        3.0
    }

    #[inline]
    fn four() -> Self {
        4.0
    }
}

use crate::float_trait::Float;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// A (y, x) position in arcseconds in the observation frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Coordinate<T> {
    pub y: T,
    pub x: T,
}

impl<T> Coordinate<T>
where
    T: Float,
{
    pub fn new(y: T, x: T) -> Self {
        Self { y, x }
    }

    pub fn origin() -> Self {
        Self::new(T::zero(), T::zero())
    }

    /// Distance from the origin
    #[inline]
    pub fn radius(&self) -> T {
        (self.y * self.y + self.x * self.x).sqrt()
    }
}

impl<T: Float> From<(T, T)> for Coordinate<T> {
    fn from((y, x): (T, T)) -> Self {
        Self::new(y, x)
    }
}

impl<T: Float> From<Coordinate<T>> for (T, T) {
    fn from(c: Coordinate<T>) -> Self {
        (c.y, c.x)
    }
}

impl<T: Float> Add for Coordinate<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.y + rhs.y, self.x + rhs.x)
    }
}

impl<T: Float> Sub for Coordinate<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.y - rhs.y, self.x - rhs.x)
    }
}

impl<T: Float> Neg for Coordinate<T> {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.y, -self.x)
    }
}

impl<T: Float> Mul<T> for Coordinate<T> {
    type Output = Self;

    fn mul(self, rhs: T) -> Self {
        Self::new(self.y * rhs, self.x * rhs)
    }
}

/// A (y, x) position in the reference frame of a profile
///
/// Can only be produced by a profile transform, so a raw [Coordinate] can never be passed where a
/// reference-frame value is expected.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformedCoordinate<T>(Coordinate<T>);

impl<T> TransformedCoordinate<T>
where
    T: Float,
{
    pub(crate) fn new(y: T, x: T) -> Self {
        Self(Coordinate::new(y, x))
    }

    #[inline]
    pub fn y(&self) -> T {
        self.0.y
    }

    #[inline]
    pub fn x(&self) -> T {
        self.0.x
    }

    /// Distance from the profile centre
    #[inline]
    pub fn radius(&self) -> T {
        self.0.radius()
    }

    /// Raw values, detached from the frame they were computed in
    pub fn values(&self) -> Coordinate<T> {
        self.0
    }
}

/// Coordinate of either frame, for callers that cannot track the frame statically
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameCoordinate<T> {
    Observed(Coordinate<T>),
    Reference(TransformedCoordinate<T>),
}

impl<T> From<Coordinate<T>> for FrameCoordinate<T> {
    fn from(c: Coordinate<T>) -> Self {
        Self::Observed(c)
    }
}

impl<T> From<TransformedCoordinate<T>> for FrameCoordinate<T> {
    fn from(c: TransformedCoordinate<T>) -> Self {
        Self::Reference(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_test::{Token, assert_tokens};

    #[test]
    fn arithmetic() {
        let a = Coordinate::new(1.0, -2.0);
        let b = Coordinate::new(0.5, 3.0);
        assert_eq!(a + b, Coordinate::new(1.5, 1.0));
        assert_eq!(a - b, Coordinate::new(0.5, -5.0));
        assert_eq!(-a, Coordinate::new(-1.0, 2.0));
        assert_eq!(a * 2.0, Coordinate::new(2.0, -4.0));
        assert_eq!(Coordinate::new(3.0_f64, 4.0).radius(), 5.0);
    }

    #[test]
    fn tuple_order_is_y_x() {
        let c: Coordinate<f32> = (1.0, 2.0).into();
        assert_eq!(c.y, 1.0);
        assert_eq!(c.x, 2.0);
        assert_eq!(<(f32, f32)>::from(c), (1.0, 2.0));
    }

    #[test]
    fn serialization() {
        assert_tokens(
            &Coordinate::new(0.5_f64, -1.5),
            &[
                Token::Struct {
                    name: "Coordinate",
                    len: 2,
                },
                Token::Str("y"),
                Token::F64(0.5),
                Token::Str("x"),
                Token::F64(-1.5),
                Token::StructEnd,
            ],
        );
    }
}

use crate::error::{CoordinatesError, ProfileError};
use crate::float_trait::Float;
use crate::geometry::coordinates::{Coordinate, FrameCoordinate, TransformedCoordinate};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub(crate) fn as_f64<T: Float>(value: T) -> f64 {
    value.value_into().unwrap_or(f64::NAN)
}

pub(crate) fn check_finite<T: Float>(parameter: &'static str, value: T) -> Result<T, ProfileError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ProfileError::NonFinite {
            parameter,
            value: as_f64(value),
        })
    }
}

pub(crate) fn check_positive<T: Float>(
    parameter: &'static str,
    value: T,
) -> Result<T, ProfileError> {
    if value.is_finite() && value > T::zero() {
        Ok(value)
    } else {
        Err(ProfileError::NonPositive {
            parameter,
            value: as_f64(value),
        })
    }
}

/// Centre, axis ratio and position angle shared by every profile
///
/// `phi` is measured in degrees counter-clockwise from the positive x-axis. Spherical profiles
/// have `axis_ratio = 1` and `phi = 0`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(
    try_from = "EllipticalGeometryParameters<T>",
    into = "EllipticalGeometryParameters<T>",
    bound = "T: Float"
)]
pub struct EllipticalGeometry<T> {
    centre: Coordinate<T>,
    axis_ratio: T,
    phi: T,
}

impl<T> EllipticalGeometry<T>
where
    T: Float,
{
    pub fn new(centre: Coordinate<T>, axis_ratio: T, phi: T) -> Result<Self, ProfileError> {
        check_finite("centre y", centre.y)?;
        check_finite("centre x", centre.x)?;
        check_finite("phi", phi)?;
        if !(axis_ratio > T::zero() && axis_ratio <= T::one()) {
            return Err(ProfileError::AxisRatioOutOfRange(as_f64(axis_ratio)));
        }
        Ok(Self {
            centre,
            axis_ratio,
            phi,
        })
    }

    /// Parameters must be valid, used for compile-time known defaults
    pub(crate) fn new_unchecked(centre: Coordinate<T>, axis_ratio: T, phi: T) -> Self {
        Self {
            centre,
            axis_ratio,
            phi,
        }
    }

    pub fn spherical(centre: Coordinate<T>) -> Result<Self, ProfileError> {
        Self::new(centre, T::one(), T::zero())
    }

    pub fn centre(&self) -> Coordinate<T> {
        self.centre
    }

    pub fn axis_ratio(&self) -> T {
        self.axis_ratio
    }

    pub fn phi(&self) -> T {
        self.phi
    }

    pub fn is_spherical(&self) -> bool {
        self.axis_ratio == T::one()
    }

    pub fn reference_frame(&self) -> ReferenceFrame<T> {
        let (sin_phi, cos_phi) = self.phi.to_radians().sin_cos();
        ReferenceFrame {
            centre: self.centre,
            cos_phi,
            sin_phi,
            axis_ratio: self.axis_ratio,
        }
    }
}

deserialize_checked!(
    EllipticalGeometry,
    EllipticalGeometryParameters {
        centre: Coordinate<T>,
        axis_ratio: T,
        phi: T,
    },
    |p| Self::new(p.centre, p.axis_ratio, p.phi),
);

/// Spherical geometry at the origin
impl<T> Default for EllipticalGeometry<T>
where
    T: Float,
{
    fn default() -> Self {
        Self {
            centre: Coordinate::origin(),
            axis_ratio: T::one(),
            phi: T::zero(),
        }
    }
}

/// Transform between the observation frame and the frame of one profile
///
/// Built on demand from an [EllipticalGeometry] and reused for every point of a grid.
#[derive(Clone, Copy, Debug)]
pub struct ReferenceFrame<T> {
    centre: Coordinate<T>,
    cos_phi: T,
    sin_phi: T,
    axis_ratio: T,
}

impl<T> ReferenceFrame<T>
where
    T: Float,
{
    /// Translate by `-centre`, then rotate by `-phi`
    #[inline]
    pub fn to_reference(&self, c: Coordinate<T>) -> TransformedCoordinate<T> {
        let dy = c.y - self.centre.y;
        let dx = c.x - self.centre.x;
        TransformedCoordinate::new(
            -dx * self.sin_phi + dy * self.cos_phi,
            dx * self.cos_phi + dy * self.sin_phi,
        )
    }

    #[inline]
    pub fn from_reference(&self, c: TransformedCoordinate<T>) -> Coordinate<T> {
        self.rotate_from_reference(c.values()) + self.centre
    }

    /// Rotate a vector such as a deflection back to the observation frame, without translation
    #[inline]
    pub fn rotate_from_reference(&self, v: Coordinate<T>) -> Coordinate<T> {
        Coordinate::new(
            v.x * self.sin_phi + v.y * self.cos_phi,
            v.x * self.cos_phi - v.y * self.sin_phi,
        )
    }

    /// `sqrt(q) * sqrt(x^2 + (y / q)^2)`
    #[inline]
    pub fn eccentric_radius(&self, c: &TransformedCoordinate<T>) -> T {
        self.axis_ratio.sqrt() * self.elliptical_radius(c)
    }

    /// `sqrt(x^2 + (y / q)^2)`, the semi-major axis of the ellipse through the point
    #[inline]
    pub fn elliptical_radius(&self, c: &TransformedCoordinate<T>) -> T {
        let y = c.y() / self.axis_ratio;
        (c.x() * c.x() + y * y).sqrt()
    }
}

/// Profile with a centre and an elliptical reference frame
pub trait GeometryProfile<T: Float> {
    fn geometry(&self) -> &EllipticalGeometry<T>;

    fn centre(&self) -> Coordinate<T> {
        self.geometry().centre()
    }

    fn axis_ratio(&self) -> T {
        self.geometry().axis_ratio()
    }

    fn phi(&self) -> T {
        self.geometry().phi()
    }

    fn reference_frame(&self) -> ReferenceFrame<T> {
        self.geometry().reference_frame()
    }

    fn transform_to_reference_frame(&self, c: Coordinate<T>) -> TransformedCoordinate<T> {
        self.reference_frame().to_reference(c)
    }

    fn transform_from_reference_frame(&self, c: TransformedCoordinate<T>) -> Coordinate<T> {
        self.reference_frame().from_reference(c)
    }

    /// Frame-checked [GeometryProfile::transform_to_reference_frame] for untyped input
    fn try_transform_to_reference_frame(
        &self,
        c: FrameCoordinate<T>,
    ) -> Result<TransformedCoordinate<T>, CoordinatesError> {
        match c {
            FrameCoordinate::Observed(c) => Ok(self.transform_to_reference_frame(c)),
            FrameCoordinate::Reference(_) => Err(CoordinatesError::AlreadyTransformed),
        }
    }

    /// Frame-checked [GeometryProfile::transform_from_reference_frame] for untyped input
    fn try_transform_from_reference_frame(
        &self,
        c: FrameCoordinate<T>,
    ) -> Result<Coordinate<T>, CoordinatesError> {
        match c {
            FrameCoordinate::Reference(c) => Ok(self.transform_from_reference_frame(c)),
            FrameCoordinate::Observed(_) => Err(CoordinatesError::NotTransformed),
        }
    }

    fn coordinates_to_eccentric_radius(&self, c: Coordinate<T>) -> T {
        let frame = self.reference_frame();
        frame.eccentric_radius(&frame.to_reference(c))
    }

    fn coordinates_to_elliptical_radius(&self, c: Coordinate<T>) -> T {
        let frame = self.reference_frame();
        frame.elliptical_radius(&frame.to_reference(c))
    }
}

impl<T: Float> GeometryProfile<T> for EllipticalGeometry<T> {
    fn geometry(&self) -> &EllipticalGeometry<T> {
        self
    }
}

pub(super) use crate::error::{IntegrationError, ProfileError};
pub(super) use crate::float_trait::Float;
pub(super) use crate::geometry::{
    Coordinate, EllipticalGeometry, GeometryProfile, ReferenceFrame, TransformedCoordinate,
    check_finite, check_positive,
};
pub(super) use crate::grid::Grid;
pub(super) use crate::integrate::Quadrature;

pub(super) use conv::prelude::*;
use enum_dispatch::enum_dispatch;
pub(super) use macro_const::macro_const;
pub(super) use ndarray::{Array1, Array2};
pub(super) use schemars::JsonSchema;
pub(super) use serde::de::DeserializeOwned;
pub(super) use serde::{Deserialize, Serialize};
pub(super) use std::fmt::Debug;

/// Lens mass distribution in units of the critical surface density
#[enum_dispatch]
pub trait MassProfileTrait<T: Float>:
    Clone + Debug + Send + Sync + Serialize + DeserializeOwned + JsonSchema
{
    /// Convergence at an observation-frame coordinate.
    fn surface_density_at_coordinates(&self, coordinates: Coordinate<T>) -> T;

    /// Lensing potential at an observation-frame coordinate.
    fn potential_at_coordinates(&self, coordinates: Coordinate<T>) -> T;

    /// Deflection angle (y, x) at an observation-frame coordinate.
    fn deflections_at_coordinates(&self, coordinates: Coordinate<T>) -> Coordinate<T>;

    fn surface_density_from_grid(&self, grid: &Grid<T>) -> Array1<T>;

    fn potential_from_grid(&self, grid: &Grid<T>) -> Array1<T>;

    /// `(n, 2)` array of (y, x) deflections in grid order.
    fn deflections_from_grid(&self, grid: &Grid<T>) -> Array2<T>;

    fn dimensionless_mass_within_circle_with(
        &self,
        radius: T,
        quadrature: &Quadrature<T>,
    ) -> Result<T, IntegrationError>;

    fn dimensionless_mass_within_ellipse_with(
        &self,
        major_axis: T,
        quadrature: &Quadrature<T>,
    ) -> Result<T, IntegrationError>;

    fn dimensionless_mass_within_circle(&self, radius: T) -> Result<T, IntegrationError> {
        self.dimensionless_mass_within_circle_with(radius, &Quadrature::default())
    }

    fn dimensionless_mass_within_ellipse(&self, major_axis: T) -> Result<T, IntegrationError> {
        self.dimensionless_mass_within_ellipse_with(major_axis, &Quadrature::default())
    }

    /// Dimensionless mass multiplied by a physical unit conversion factor.
    fn mass_within_circle(&self, radius: T, conversion_factor: T) -> Result<T, IntegrationError> {
        Ok(self.dimensionless_mass_within_circle(radius)? * conversion_factor)
    }

    fn mass_within_ellipse(
        &self,
        major_axis: T,
        conversion_factor: T,
    ) -> Result<T, IntegrationError> {
        Ok(self.dimensionless_mass_within_ellipse(major_axis)? * conversion_factor)
    }
}

/// Mass profile with closed-form fields in its own reference frame
pub trait AnalyticMassProfile<T: Float>: GeometryProfile<T> {
    /// Convergence as a function of the radial coordinate of the profile.
    fn convergence_at_radius(&self, radius: T) -> T;

    /// Radial coordinate of a reference-frame point, the eccentric radius unless overridden.
    #[inline]
    fn profile_radius(&self, frame: &ReferenceFrame<T>, c: &TransformedCoordinate<T>) -> T {
        frame.eccentric_radius(c)
    }

    fn potential_in_frame(&self, c: &TransformedCoordinate<T>) -> T;

    /// Deflection in the reference frame, rotated back by the caller.
    fn deflections_in_frame(&self, c: &TransformedCoordinate<T>) -> Coordinate<T>;

    #[inline]
    fn surface_density_in_frame(
        &self,
        frame: &ReferenceFrame<T>,
        c: &TransformedCoordinate<T>,
    ) -> T {
        self.convergence_at_radius(self.profile_radius(frame, c))
    }

    /// `integral_0^radius 2 pi area_factor r kappa(r) dr`
    fn mass_within_radius(
        &self,
        radius: T,
        area_factor: T,
        quadrature: &Quadrature<T>,
    ) -> Result<T, IntegrationError> {
        quadrature.integrate(
            |r| T::two() * T::PI() * area_factor * r * self.convergence_at_radius(r),
            T::zero(),
            radius,
        )
    }
}

/// Vector of the given length pointing away from the frame centre, zero at the centre
#[inline]
pub(super) fn radial_vector<T: Float>(c: &TransformedCoordinate<T>, length: T) -> Coordinate<T> {
    let radius = c.radius();
    if radius == T::zero() {
        Coordinate::origin()
    } else {
        c.values() * (length / radius)
    }
}

#[enum_dispatch(MassProfileTrait<T>)]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(bound = "T: Float")]
#[non_exhaustive]
pub enum MassProfile<T: Float> {
    PointMass(super::point_mass::PointMass<T>),
    SphericalIsothermal(super::isothermal::SphericalIsothermal<T>),
    EllipticalIsothermal(super::isothermal::EllipticalIsothermal<T>),
    SphericalCoredIsothermal(super::cored_isothermal::SphericalCoredIsothermal<T>),
    SphericalNfw(super::nfw::SphericalNfw<T>),
    ExternalShear(super::external_shear::ExternalShear<T>),
    Combined(super::combined::CombinedMassProfile<Self>),
}

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
pub(super) use ndarray::Array1;
pub(super) use schemars::JsonSchema;
pub(super) use serde::de::DeserializeOwned;
pub(super) use serde::{Deserialize, Serialize};
pub(super) use std::fmt::Debug;

/// Parametric surface-brightness model
#[enum_dispatch]
pub trait LightProfileTrait<T: Float>:
    Clone + Debug + Send + Sync + Serialize + DeserializeOwned + JsonSchema
{
    /// Intensity at an observation-frame coordinate.
    fn intensity_at_coordinates(&self, coordinates: Coordinate<T>) -> T;

    /// Intensity at every grid coordinate, in grid order.
    fn intensities_from_grid(&self, grid: &Grid<T>) -> Array1<T>;

    /// Luminosity within a circle of the given radius centred on the profile.
    fn luminosity_within_circle_with(
        &self,
        radius: T,
        quadrature: &Quadrature<T>,
    ) -> Result<T, IntegrationError>;

    /// Luminosity within the profile's own ellipse of the given semi-major axis.
    fn luminosity_within_ellipse_with(
        &self,
        major_axis: T,
        quadrature: &Quadrature<T>,
    ) -> Result<T, IntegrationError>;

    fn luminosity_within_circle(&self, radius: T) -> Result<T, IntegrationError> {
        self.luminosity_within_circle_with(radius, &Quadrature::default())
    }

    fn luminosity_within_ellipse(&self, major_axis: T) -> Result<T, IntegrationError> {
        self.luminosity_within_ellipse_with(major_axis, &Quadrature::default())
    }
}

/// Light profile with a radial intensity law on one radial coordinate of its own frame
pub trait RadialLightProfile<T: Float>: GeometryProfile<T> {
    /// Intensity as a function of the radial coordinate, with derived constants computed once.
    fn radial_intensity(&self) -> impl Fn(T) -> T + Send + Sync;

    /// Radial coordinate of a reference-frame point, the eccentric radius unless overridden.
    #[inline]
    fn profile_radius(&self, frame: &ReferenceFrame<T>, c: &TransformedCoordinate<T>) -> T {
        frame.eccentric_radius(c)
    }

    fn intensity_at_radius(&self, radius: T) -> T {
        (self.radial_intensity())(radius)
    }
}

#[enum_dispatch(LightProfileTrait<T>)]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(bound = "T: Float")]
#[non_exhaustive]
pub enum LightProfile<T: Float> {
    Sersic(super::sersic::SersicLightProfile<T>),
    Exponential(super::exponential::ExponentialLightProfile<T>),
    DevVaucouleurs(super::dev_vaucouleurs::DevVaucouleursLightProfile<T>),
    CoreSersic(super::core_sersic::CoreSersicLightProfile<T>),
    Gaussian(super::gaussian::GaussianLightProfile<T>),
    Combined(super::combined::CombinedLightProfile<Self>),
}

//! Light profiles describing the surface brightness of galaxies

use paste::paste;

mod light_profile;
pub use light_profile::{LightProfile, LightProfileTrait, RadialLightProfile};

/// Implements [LightProfileTrait] for profiles implementing [RadialLightProfile]
macro_rules! radial_light_profile {
    ($profile:ident $(,)?) => {
        impl<T: Float> GeometryProfile<T> for $profile<T> {
            fn geometry(&self) -> &EllipticalGeometry<T> {
                &self.geometry
            }
        }

        impl<T: Float> LightProfileTrait<T> for $profile<T> {
            fn intensity_at_coordinates(&self, coordinates: Coordinate<T>) -> T {
                let frame = self.reference_frame();
                let law = self.radial_intensity();
                law(self.profile_radius(&frame, &frame.to_reference(coordinates)))
            }

            fn intensities_from_grid(&self, grid: &Grid<T>) -> Array1<T> {
                let frame = self.reference_frame();
                let law = self.radial_intensity();
                grid.map_coordinates(|c| law(self.profile_radius(&frame, &frame.to_reference(c))))
            }

            fn luminosity_within_circle_with(
                &self,
                radius: T,
                quadrature: &Quadrature<T>,
            ) -> Result<T, IntegrationError> {
                let law = self.radial_intensity();
                quadrature.integrate(|r| T::two() * T::PI() * r * law(r), T::zero(), radius)
            }

            fn luminosity_within_ellipse_with(
                &self,
                major_axis: T,
                quadrature: &Quadrature<T>,
            ) -> Result<T, IntegrationError> {
                let law = self.radial_intensity();
                let axis_ratio = self.axis_ratio();
                quadrature.integrate(
                    |r| T::two() * T::PI() * axis_ratio * r * law(r),
                    T::zero(),
                    major_axis,
                )
            }
        }
    };
}

pub mod sersic;
pub use sersic::{SersicLightProfile, sersic_constant};

/// Sersic profile with the index fixed to a constant
macro_rules! fixed_index_sersic {
    ($module:ident, $index:literal, $doc:literal $(,)?) => {
        paste! {
            pub mod $module {
                use super::light_profile::*;
                use super::sersic::sersic_law;

                #[doc = $doc]
                #[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
                #[serde(try_from = "Parameters<T>", into = "Parameters<T>", bound = "T: Float")]
                pub struct [<$module:camel LightProfile>]<T> {
                    geometry: EllipticalGeometry<T>,
                    intensity: T,
                    effective_radius: T,
                }

                impl<T> [<$module:camel LightProfile>]<T>
                where
                    T: Float,
                {
                    pub fn new(
                        centre: Coordinate<T>,
                        axis_ratio: T,
                        phi: T,
                        intensity: T,
                        effective_radius: T,
                    ) -> Result<Self, ProfileError> {
                        Ok(Self {
                            geometry: EllipticalGeometry::new(centre, axis_ratio, phi)?,
                            intensity: check_finite("intensity", intensity)?,
                            effective_radius: check_positive("effective_radius", effective_radius)?,
                        })
                    }

                    pub fn spherical(
                        centre: Coordinate<T>,
                        intensity: T,
                        effective_radius: T,
                    ) -> Result<Self, ProfileError> {
                        Self::new(centre, T::one(), T::zero(), intensity, effective_radius)
                    }

                    pub fn intensity(&self) -> T {
                        self.intensity
                    }

                    pub fn effective_radius(&self) -> T {
                        self.effective_radius
                    }

                    pub fn sersic_index(&self) -> T {
                        $index.approx().unwrap()
                    }

                    pub fn sersic_constant(&self) -> T {
                        super::sersic_constant(self.sersic_index())
                    }

                    pub fn elliptical_effective_radius(&self) -> T {
                        self.effective_radius / self.axis_ratio().sqrt()
                    }

                    pub const fn doc() -> &'static str {
                        $doc
                    }
                }

                deserialize_checked!(
                    [<$module:camel LightProfile>],
                    Parameters {
                        geometry: EllipticalGeometry<T>,
                        intensity: T,
                        effective_radius: T,
                    },
                    |p| Self::new(
                        p.geometry.centre(),
                        p.geometry.axis_ratio(),
                        p.geometry.phi(),
                        p.intensity,
                        p.effective_radius,
                    ),
                );

                impl<T> Default for [<$module:camel LightProfile>]<T>
                where
                    T: Float,
                {
                    fn default() -> Self {
                        Self {
                            geometry: EllipticalGeometry::default(),
                            intensity: 0.1_f64.approx().unwrap(),
                            effective_radius: 0.6_f64.approx().unwrap(),
                        }
                    }
                }

                impl<T> From<[<$module:camel LightProfile>]<T>> for super::SersicLightProfile<T>
                where
                    T: Float,
                {
                    fn from(profile: [<$module:camel LightProfile>]<T>) -> Self {
                        Self::from_geometry(
                            profile.geometry,
                            profile.intensity,
                            profile.effective_radius,
                            profile.sersic_index(),
                        )
                    }
                }

                impl<T: Float> RadialLightProfile<T> for [<$module:camel LightProfile>]<T> {
                    fn radial_intensity(&self) -> impl Fn(T) -> T + Send + Sync {
                        sersic_law(
                            self.intensity,
                            self.effective_radius,
                            self.sersic_index(),
                            self.sersic_constant(),
                        )
                    }
                }

                radial_light_profile!([<$module:camel LightProfile>]);

            }
        }
    };
}

fixed_index_sersic!(
    exponential,
    1.0_f64,
    "Sersic profile with index 1, the exponential disk law",
);
pub use exponential::ExponentialLightProfile;

fixed_index_sersic!(
    dev_vaucouleurs,
    4.0_f64,
    "Sersic profile with index 4, the de Vaucouleurs law of elliptical galaxies",
);
pub use dev_vaucouleurs::DevVaucouleursLightProfile;

pub mod core_sersic;
pub use core_sersic::CoreSersicLightProfile;

pub mod gaussian;
pub use gaussian::GaussianLightProfile;

pub mod combined;
pub use combined::CombinedLightProfile;

//! Mass profiles of lens galaxies: convergence, lensing potential and deflection angles

mod mass_profile;
pub use mass_profile::{AnalyticMassProfile, MassProfile, MassProfileTrait};

/// Implements [MassProfileTrait] for profiles implementing [AnalyticMassProfile]
macro_rules! analytic_mass_profile {
    ($profile:ident $(,)?) => {
        impl<T: Float> GeometryProfile<T> for $profile<T> {
            fn geometry(&self) -> &EllipticalGeometry<T> {
                &self.geometry
            }
        }

        impl<T: Float> MassProfileTrait<T> for $profile<T> {
            fn surface_density_at_coordinates(&self, coordinates: Coordinate<T>) -> T {
                let frame = self.reference_frame();
                self.surface_density_in_frame(&frame, &frame.to_reference(coordinates))
            }

            fn potential_at_coordinates(&self, coordinates: Coordinate<T>) -> T {
                let frame = self.reference_frame();
                self.potential_in_frame(&frame.to_reference(coordinates))
            }

            fn deflections_at_coordinates(&self, coordinates: Coordinate<T>) -> Coordinate<T> {
                let frame = self.reference_frame();
                let deflections = self.deflections_in_frame(&frame.to_reference(coordinates));
                frame.rotate_from_reference(deflections)
            }

            fn surface_density_from_grid(&self, grid: &Grid<T>) -> Array1<T> {
                let frame = self.reference_frame();
                grid.map_coordinates(|c| self.surface_density_in_frame(&frame, &frame.to_reference(c)))
            }

            fn potential_from_grid(&self, grid: &Grid<T>) -> Array1<T> {
                let frame = self.reference_frame();
                grid.map_coordinates(|c| self.potential_in_frame(&frame.to_reference(c)))
            }

            fn deflections_from_grid(&self, grid: &Grid<T>) -> Array2<T> {
                let frame = self.reference_frame();
                grid.map_coordinates_to_vectors(|c| {
                    frame.rotate_from_reference(self.deflections_in_frame(&frame.to_reference(c)))
                })
            }

            fn dimensionless_mass_within_circle_with(
                &self,
                radius: T,
                quadrature: &Quadrature<T>,
            ) -> Result<T, IntegrationError> {
                self.mass_within_radius(radius, T::one(), quadrature)
            }

            fn dimensionless_mass_within_ellipse_with(
                &self,
                major_axis: T,
                quadrature: &Quadrature<T>,
            ) -> Result<T, IntegrationError> {
                self.mass_within_radius(major_axis, self.axis_ratio(), quadrature)
            }
        }
    };
}

pub mod point_mass;
pub use point_mass::PointMass;

pub mod isothermal;
pub use isothermal::{EllipticalIsothermal, SphericalIsothermal};

pub mod cored_isothermal;
pub use cored_isothermal::SphericalCoredIsothermal;

pub mod nfw;
pub use nfw::SphericalNfw;

pub mod external_shear;
pub use external_shear::ExternalShear;

pub mod combined;
pub use combined::CombinedMassProfile;

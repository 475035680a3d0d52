use crate::cosmology::{Cosmology, CosmologyTrait};
use crate::error::{GridError, IntegrationError, PixelizationError, RayTracingError};
use crate::float_trait::Float;
use crate::galaxy::{Galaxy, HyperGalaxy, Mapper, Regularization};
use crate::geometry::Coordinate;
use crate::grid::{DeflectionStack, Grid, GridStack};
use crate::plane::plane_image::PlaneImage;

use conv::prelude::*;
use itertools::Itertools;
use ndarray::{Array1, Array2, Axis};

/// Buffer in arc-seconds added around the regular grid when building a plane image
const PLANE_IMAGE_BUFFER: f64 = 1e-2;

/// Galaxies at one redshift sharing the grids their light and deflections are evaluated on
///
/// Galaxies either all have the same redshift or none has one. Deflections are computed once at
/// construction, for every grid of the stack, unless the plane is constructed without them.
#[derive(Clone, Debug)]
pub struct Plane<T: Float> {
    galaxies: Vec<Galaxy<T>>,
    grid_stack: GridStack<T>,
    deflection_stack: Option<DeflectionStack<T>>,
    cosmology: Option<Cosmology>,
    redshift: Option<f64>,
}

/// Redshift shared by every galaxy, `None` when no galaxy has one
pub(crate) fn common_redshift<T: Float>(
    galaxies: &[Galaxy<T>],
) -> Result<Option<f64>, RayTracingError> {
    let redshifts: Vec<_> = galaxies.iter().map(Galaxy::redshift).collect();
    match redshifts.iter().all_equal_value() {
        Ok(&redshift) => Ok(redshift),
        Err(None) => Err(RayTracingError::NoGalaxies),
        Err(Some(_)) => Err(RayTracingError::InconsistentRedshifts(redshifts)),
    }
}

fn deflections_of_galaxies<T: Float>(galaxies: &[Galaxy<T>], grid: &Grid<T>) -> Array2<T> {
    galaxies
        .iter()
        .fold(Array2::zeros((grid.len(), 2)), |acc, galaxy| {
            acc + galaxy.deflections_from_grid(grid)
        })
}

fn intensities_of_galaxies<T: Float>(galaxies: &[Galaxy<T>], grid: &Grid<T>) -> Array1<T> {
    galaxies
        .iter()
        .fold(Array1::zeros(grid.len()), |acc, galaxy| {
            acc + galaxy.intensities_from_grid(grid)
        })
}

impl<T> Plane<T>
where
    T: Float,
{
    pub fn new(
        galaxies: Vec<Galaxy<T>>,
        grid_stack: GridStack<T>,
        cosmology: Option<Cosmology>,
        compute_deflections: bool,
    ) -> Result<Self, RayTracingError> {
        let redshift = common_redshift(&galaxies)?;
        let deflection_stack = compute_deflections.then(|| DeflectionStack {
            regular: deflections_of_galaxies(&galaxies, grid_stack.regular()),
            sub: deflections_of_galaxies(&galaxies, grid_stack.sub().grid()),
            blurring: deflections_of_galaxies(&galaxies, grid_stack.blurring()),
        });
        Ok(Self {
            galaxies,
            grid_stack,
            deflection_stack,
            cosmology,
            redshift,
        })
    }

    pub fn galaxies(&self) -> &[Galaxy<T>] {
        &self.galaxies
    }

    pub fn grid_stack(&self) -> &GridStack<T> {
        &self.grid_stack
    }

    /// `None` when the plane was built without deflections
    pub fn deflection_stack(&self) -> Option<&DeflectionStack<T>> {
        self.deflection_stack.as_ref()
    }

    pub fn cosmology(&self) -> Option<&Cosmology> {
        self.cosmology.as_ref()
    }

    pub fn redshift(&self) -> Option<f64> {
        self.redshift
    }

    pub fn galaxy_redshifts(&self) -> Vec<Option<f64>> {
        self.galaxies.iter().map(Galaxy::redshift).collect()
    }

    pub fn has_light_profile(&self) -> bool {
        self.galaxies.iter().any(Galaxy::has_light_profile)
    }

    pub fn has_mass_profile(&self) -> bool {
        self.galaxies.iter().any(Galaxy::has_mass_profile)
    }

    pub fn has_pixelization(&self) -> bool {
        self.galaxies.iter().any(Galaxy::has_pixelization)
    }

    pub fn has_regularization(&self) -> bool {
        self.galaxies.iter().any(Galaxy::has_regularization)
    }

    pub fn has_hyper_galaxy(&self) -> bool {
        self.galaxies.iter().any(Galaxy::has_hyper_galaxy)
    }

    /// Hyper-galaxy of every galaxy, in galaxy order
    pub fn hyper_galaxies(&self) -> Vec<Option<&HyperGalaxy<T>>> {
        self.galaxies.iter().map(Galaxy::hyper_galaxy).collect()
    }

    /// Redshift and cosmology, if the plane has both
    fn redshift_and_cosmology(&self) -> Option<(f64, &Cosmology)> {
        self.redshift.zip(self.cosmology.as_ref())
    }

    pub fn arcsec_per_kpc_proper(&self) -> Result<Option<f64>, IntegrationError> {
        self.redshift_and_cosmology()
            .map(|(z, cosmology)| cosmology.arcsec_per_kpc_proper(z))
            .transpose()
    }

    pub fn kpc_per_arcsec_proper(&self) -> Result<Option<f64>, IntegrationError> {
        self.redshift_and_cosmology()
            .map(|(z, cosmology)| cosmology.kpc_per_arcsec_proper(z))
            .transpose()
    }

    /// Angular diameter distance in kpc
    pub fn angular_diameter_distance_to_earth(&self) -> Result<Option<f64>, IntegrationError> {
        self.redshift_and_cosmology()
            .map(|(z, cosmology)| {
                cosmology
                    .angular_diameter_distance(z)
                    .map(|distance| distance * 1e3)
            })
            .transpose()
    }

    /// Summed light of the galaxies on the sub-grid, binned to the regular grid
    pub fn image_plane_image_1d(&self) -> Result<Array1<T>, GridError> {
        let sub = self.grid_stack.sub();
        sub.regular_data_1d_from_sub_data_1d(&intensities_of_galaxies(&self.galaxies, sub.grid()))
    }

    /// Binned image of every galaxy separately, in galaxy order
    pub fn image_plane_image_1d_of_galaxies(&self) -> Result<Vec<Array1<T>>, GridError> {
        let sub = self.grid_stack.sub();
        self.galaxies
            .iter()
            .map(|galaxy| {
                sub.regular_data_1d_from_sub_data_1d(&galaxy.intensities_from_grid(sub.grid()))
            })
            .collect()
    }

    /// [Plane::image_plane_image_1d] mapped to the 2D mask layout, zero outside the mask
    pub fn image_plane_image(&self) -> Result<Array2<T>, GridError> {
        self.map_to_2d(&self.image_plane_image_1d()?)
    }

    /// Light of the galaxies on the blurring grid, not binned
    pub fn image_plane_blurring_image_1d(&self) -> Array1<T> {
        intensities_of_galaxies(&self.galaxies, self.grid_stack.blurring())
    }

    pub fn surface_density(&self) -> Result<Array2<T>, GridError> {
        let sub = self.grid_stack.sub();
        let sub_data = self
            .galaxies
            .iter()
            .fold(Array1::zeros(sub.grid().len()), |acc, galaxy| {
                acc + galaxy.surface_density_from_grid(sub.grid())
            });
        self.map_to_2d(&sub.regular_data_1d_from_sub_data_1d(&sub_data)?)
    }

    pub fn potential(&self) -> Result<Array2<T>, GridError> {
        let sub = self.grid_stack.sub();
        let sub_data = self
            .galaxies
            .iter()
            .fold(Array1::zeros(sub.grid().len()), |acc, galaxy| {
                acc + galaxy.potential_from_grid(sub.grid())
            });
        self.map_to_2d(&sub.regular_data_1d_from_sub_data_1d(&sub_data)?)
    }

    /// `(n, 2)` binned (y, x) deflections of the regular pixels
    pub fn deflections_1d(&self) -> Result<Array2<T>, GridError> {
        let sub = self.grid_stack.sub();
        sub.regular_vectors_from_sub_vectors(&deflections_of_galaxies(&self.galaxies, sub.grid()))
    }

    pub fn deflections_y(&self) -> Result<Array2<T>, GridError> {
        self.map_to_2d(&self.deflections_1d()?.index_axis(Axis(1), 0).to_owned())
    }

    pub fn deflections_x(&self) -> Result<Array2<T>, GridError> {
        self.map_to_2d(&self.deflections_1d()?.index_axis(Axis(1), 1).to_owned())
    }

    fn map_to_2d(&self, array_1d: &Array1<T>) -> Result<Array2<T>, GridError> {
        self.grid_stack.mask().map_1d_to_2d(array_1d.view())
    }

    pub fn luminosities_of_galaxies_within_circles(
        &self,
        radius: T,
    ) -> Result<Vec<Option<T>>, IntegrationError> {
        self.galaxies
            .iter()
            .map(|galaxy| galaxy.luminosity_within_circle(radius))
            .collect()
    }

    pub fn luminosities_of_galaxies_within_ellipses(
        &self,
        major_axis: T,
    ) -> Result<Vec<Option<T>>, IntegrationError> {
        self.galaxies
            .iter()
            .map(|galaxy| galaxy.luminosity_within_ellipse(major_axis))
            .collect()
    }

    /// Mass of every galaxy, dimensionless without a conversion factor
    pub fn masses_of_galaxies_within_circles(
        &self,
        radius: T,
        conversion_factor: Option<T>,
    ) -> Result<Vec<Option<T>>, IntegrationError> {
        self.galaxies
            .iter()
            .map(|galaxy| match conversion_factor {
                Some(factor) => galaxy.mass_within_circle(radius, factor),
                None => galaxy.dimensionless_mass_within_circle(radius),
            })
            .collect()
    }

    pub fn masses_of_galaxies_within_ellipses(
        &self,
        major_axis: T,
        conversion_factor: Option<T>,
    ) -> Result<Vec<Option<T>>, IntegrationError> {
        self.galaxies
            .iter()
            .map(|galaxy| match conversion_factor {
                Some(factor) => galaxy.mass_within_ellipse(major_axis, factor),
                None => galaxy.dimensionless_mass_within_ellipse(major_axis),
            })
            .collect()
    }

    /// Light of the galaxies on a mask-shaped uniform grid spanning the regular grid
    ///
    /// `None` when the regular grid is empty.
    pub fn plane_image(&self) -> Option<PlaneImage<T>> {
        let buffer: T = PLANE_IMAGE_BUFFER.approx().unwrap();
        let (y_min, y_max, x_min, x_max) = self.grid_stack.regular().extent()?;
        let (y_min, y_max) = (y_min - buffer, y_max + buffer);
        let (x_min, x_max) = (x_min - buffer, x_max + buffer);
        let shape = self.grid_stack.mask().shape();
        let pixel_scales = (
            (y_max - y_min) / shape.0.approx().unwrap(),
            (x_max - x_min) / shape.1.approx().unwrap(),
        );
        let origin = Coordinate::new((y_max + y_min) * T::half(), (x_max + x_min) * T::half());
        let grid = Grid::uniform(shape, pixel_scales, origin);
        let intensities = intensities_of_galaxies(&self.galaxies, &grid);
        let array = Array2::from_shape_fn(shape, |(row, col)| intensities[row * shape.1 + col]);
        Some(PlaneImage::new(array, pixel_scales, origin))
    }

    fn single_inversion_galaxy(&self) -> Result<Option<&Galaxy<T>>, PixelizationError> {
        let pixelized: Vec<_> = self
            .galaxies
            .iter()
            .filter(|galaxy| galaxy.has_pixelization())
            .collect();
        match pixelized.as_slice() {
            [] => Ok(None),
            [galaxy] => Ok(Some(*galaxy)),
            _ => Err(PixelizationError::MultiplePixelizations(pixelized.len())),
        }
    }

    /// Pixelization of the plane paired with its grids, at most one galaxy may have one
    pub fn mapper(&self) -> Result<Option<Mapper<T>>, PixelizationError> {
        Ok(self
            .single_inversion_galaxy()?
            .and_then(Galaxy::pixelization)
            .map(|pixelization| Mapper::new(pixelization.clone(), self.grid_stack.clone())))
    }

    pub fn regularization(&self) -> Result<Option<&Regularization>, PixelizationError> {
        Ok(self
            .single_inversion_galaxy()?
            .and_then(Galaxy::regularization))
    }
}

use crate::cosmology::{Cosmology, CosmologyTrait};
use crate::error::{GridError, PixelizationError, RayTracingError};
use crate::float_trait::Float;
use crate::galaxy::{Galaxy, HyperGalaxy, Mapper, Regularization};
use crate::grid::{DeflectionStack, GridStack};
use crate::plane::{Plane, common_redshift};

use conv::prelude::*;
use itertools::Itertools;
use macro_const::macro_const;
use ndarray::{Array1, Array2};

macro_const! {
    const DOC: &str = r#"
Ray tracing through an ordered sequence of planes

The first plane sees the observed grids unchanged. Every later plane $i$ sees
$$
\vec\theta_i = \vec\theta_0 - \sum_{j < i} \beta_{ji} \vec\alpha_j(\vec\theta_j),
$$
where $\vec\alpha_j$ are the deflections of plane $j$ evaluated on its own traced grids and
$\beta_{ji}$ is the distance ratio given by
[CosmologyTrait::scaling_factor_between_redshifts](crate::CosmologyTrait::scaling_factor_between_redshifts).
Without a cosmology, and for a lens and source pair, every $\beta_{ji}$ is one. The last plane is
built without deflections because nothing is traced behind it.
"#;
}

#[doc = DOC!()]
#[derive(Clone, Debug)]
pub struct Tracer<T: Float> {
    planes: Vec<Plane<T>>,
    cosmology: Option<Cosmology>,
}

impl<T> Tracer<T>
where
    T: Float,
{
    /// Lens plane and source plane with unit deflection scaling
    pub fn image_and_source_planes(
        lens_galaxies: Vec<Galaxy<T>>,
        source_galaxies: Vec<Galaxy<T>>,
        grid_stack: GridStack<T>,
        cosmology: Option<Cosmology>,
    ) -> Result<Self, RayTracingError> {
        Self::trace(
            vec![lens_galaxies, source_galaxies],
            grid_stack,
            cosmology,
            vec![vec![], vec![1.0]],
        )
    }

    /// Planes formed by grouping galaxies with equal redshifts, in increasing redshift order
    pub fn multi_plane(
        galaxies: Vec<Galaxy<T>>,
        grid_stack: GridStack<T>,
        cosmology: Cosmology,
    ) -> Result<Self, RayTracingError> {
        let mut galaxies = galaxies
            .into_iter()
            .map(|galaxy| match galaxy.redshift() {
                None => Err(RayTracingError::MissingRedshift),
                Some(z) if !z.is_finite() => Err(RayTracingError::NonFiniteRedshift(z)),
                Some(z) => Ok((z, galaxy)),
            })
            .collect::<Result<Vec<_>, _>>()?;
        galaxies.sort_by(|(a, _), (b, _)| a.total_cmp(b));
        let galaxy_planes: Vec<Vec<Galaxy<T>>> = galaxies
            .into_iter()
            .chunk_by(|(z, _)| *z)
            .into_iter()
            .map(|(_, chunk)| chunk.map(|(_, galaxy)| galaxy).collect())
            .collect();
        log::debug!(
            "grouped galaxies into {} planes with galaxy counts {:?}",
            galaxy_planes.len(),
            galaxy_planes.iter().map(Vec::len).collect::<Vec<_>>()
        );
        Self::from_galaxy_planes(galaxy_planes, grid_stack, Some(cosmology))
    }

    /// Planes in the given order, which must be increasing in redshift
    ///
    /// With a cosmology every plane needs a redshift and deflections are scaled by distance
    /// ratios. Without one the deflections of every plane are applied unscaled.
    pub fn from_galaxy_planes(
        galaxy_planes: Vec<Vec<Galaxy<T>>>,
        grid_stack: GridStack<T>,
        cosmology: Option<Cosmology>,
    ) -> Result<Self, RayTracingError> {
        if galaxy_planes.is_empty() {
            return Err(RayTracingError::NoPlanes);
        }
        let redshifts = galaxy_planes
            .iter()
            .map(|galaxies| common_redshift(galaxies))
            .collect::<Result<Vec<_>, _>>()?;
        for (&previous, &next) in redshifts.iter().flatten().tuple_windows() {
            if next <= previous {
                return Err(RayTracingError::NonMonotonicRedshifts { previous, next });
            }
        }
        let scaling_factors = match &cosmology {
            Some(cosmology) => Self::scaling_factors(&redshifts, cosmology)?,
            None => (0..redshifts.len()).map(|i| vec![1.0; i]).collect(),
        };
        Self::trace(galaxy_planes, grid_stack, cosmology, scaling_factors)
    }

    /// `factors[i][j]` scales the deflections of plane `j` seen by plane `i`
    fn scaling_factors(
        redshifts: &[Option<f64>],
        cosmology: &Cosmology,
    ) -> Result<Vec<Vec<f64>>, RayTracingError> {
        let redshifts = redshifts
            .iter()
            .map(|z| z.ok_or(RayTracingError::MissingRedshift))
            .collect::<Result<Vec<_>, _>>()?;
        let z_final = redshifts[redshifts.len() - 1];
        let factors = redshifts
            .iter()
            .map(|&z_i| {
                redshifts
                    .iter()
                    .take_while(|&&z_j| z_j < z_i)
                    .map(|&z_j| cosmology.scaling_factor_between_redshifts(z_j, z_i, z_final))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!("multi-plane scaling factors for redshifts {redshifts:?}: {factors:?}");
        Ok(factors)
    }

    fn trace(
        galaxy_planes: Vec<Vec<Galaxy<T>>>,
        grid_stack: GridStack<T>,
        cosmology: Option<Cosmology>,
        scaling_factors: Vec<Vec<f64>>,
    ) -> Result<Self, RayTracingError> {
        let last = galaxy_planes.len() - 1;
        let mut planes: Vec<Plane<T>> = Vec::with_capacity(galaxy_planes.len());
        for ((i, galaxies), factors) in galaxy_planes.into_iter().enumerate().zip(scaling_factors) {
            let plane_grid_stack = if i == 0 {
                grid_stack.clone()
            } else {
                let mut deflections = DeflectionStack::zeros_like(&grid_stack);
                for (plane, factor) in planes.iter().zip(factors) {
                    let plane_deflections = plane
                        .deflection_stack()
                        .ok_or(RayTracingError::NoDeflections)?;
                    deflections.scaled_add(factor.approx().unwrap(), plane_deflections);
                }
                grid_stack.traced(&deflections)?
            };
            planes.push(Plane::new(
                galaxies,
                plane_grid_stack,
                cosmology.clone(),
                i != last,
            )?);
        }
        Ok(Self { planes, cosmology })
    }

    pub fn planes(&self) -> &[Plane<T>] {
        &self.planes
    }

    pub fn cosmology(&self) -> Option<&Cosmology> {
        self.cosmology.as_ref()
    }

    pub fn total_planes(&self) -> usize {
        self.planes.len()
    }

    /// The first plane, observed without deflection
    pub fn image_plane(&self) -> &Plane<T> {
        &self.planes[0]
    }

    /// The last plane
    pub fn source_plane(&self) -> &Plane<T> {
        &self.planes[self.planes.len() - 1]
    }

    pub fn plane_redshifts(&self) -> Vec<Option<f64>> {
        self.planes.iter().map(Plane::redshift).collect()
    }

    pub fn all_galaxies(&self) -> impl Iterator<Item = &Galaxy<T>> {
        self.planes.iter().flat_map(|plane| plane.galaxies())
    }

    pub fn image_plane_images_1d_of_planes(&self) -> Result<Vec<Array1<T>>, GridError> {
        self.planes
            .iter()
            .map(Plane::image_plane_image_1d)
            .collect()
    }

    /// Light of every plane on its own traced grid, summed per observed pixel
    pub fn image_plane_image_1d(&self) -> Result<Array1<T>, GridError> {
        let pixels = self.image_plane().grid_stack().regular().len();
        self.planes.iter().try_fold(Array1::zeros(pixels), |acc, plane| {
            Ok(acc + plane.image_plane_image_1d()?)
        })
    }

    pub fn image_plane_image(&self) -> Result<Array2<T>, GridError> {
        self.image_plane()
            .grid_stack()
            .mask()
            .map_1d_to_2d(self.image_plane_image_1d()?.view())
    }

    pub fn image_plane_blurring_image_1d(&self) -> Array1<T> {
        let pixels = self.image_plane().grid_stack().blurring().len();
        self.planes.iter().fold(Array1::zeros(pixels), |acc, plane| {
            acc + plane.image_plane_blurring_image_1d()
        })
    }

    fn sum_of_planes<F>(&self, f: F) -> Result<Array2<T>, GridError>
    where
        F: Fn(&Plane<T>) -> Result<Array2<T>, GridError>,
    {
        let shape = self.image_plane().grid_stack().mask().shape();
        self.planes
            .iter()
            .try_fold(Array2::zeros(shape), |acc, plane| Ok(acc + f(plane)?))
    }

    /// Convergence of every plane on its own grid, summed
    pub fn surface_density(&self) -> Result<Array2<T>, GridError> {
        self.sum_of_planes(Plane::surface_density)
    }

    pub fn potential(&self) -> Result<Array2<T>, GridError> {
        self.sum_of_planes(Plane::potential)
    }

    pub fn deflections_y(&self) -> Result<Array2<T>, GridError> {
        self.sum_of_planes(Plane::deflections_y)
    }

    pub fn deflections_x(&self) -> Result<Array2<T>, GridError> {
        self.sum_of_planes(Plane::deflections_x)
    }

    /// Mappers of the planes that have a pixelization
    pub fn mappers(&self) -> Result<Vec<Mapper<T>>, PixelizationError> {
        self.planes
            .iter()
            .filter_map(|plane| plane.mapper().transpose())
            .collect()
    }

    pub fn regularizations(&self) -> Result<Vec<&Regularization>, PixelizationError> {
        self.planes
            .iter()
            .filter_map(|plane| plane.regularization().transpose())
            .collect()
    }

    /// Hyper-galaxy of every galaxy, plane by plane
    pub fn hyper_galaxies(&self) -> Vec<Option<&HyperGalaxy<T>>> {
        self.all_galaxies().map(Galaxy::hyper_galaxy).collect()
    }

    pub const fn doc() -> &'static str {
        DOC
    }
}

use lazy_static::lazy_static;
use lens_ray_tracing::light_profiles::{ExponentialLightProfile, SersicLightProfile};
use lens_ray_tracing::mass_profiles::{EllipticalIsothermal, ExternalShear, SphericalNfw};
use lens_ray_tracing::{Coordinate, Galaxy, Grid, GridStack, Mask};
use rand::prelude::*;

/// Grids of a circular mask centred on the origin
pub fn circular_grid_stack(
    shape: (usize, usize),
    pixel_scale: f64,
    radius: f64,
    sub_grid_size: usize,
    psf_shape: (usize, usize),
) -> GridStack<f64> {
    let mask = Mask::circular(shape, pixel_scale, radius, Coordinate::origin());
    GridStack::from_mask_sub_grid_size_and_psf_shape(mask, sub_grid_size, psf_shape)
        .expect("mask is padded for the PSF")
}

lazy_static! {
    /// 3 arcsec circle on a 0.05 arcsec pixel grid, 4x4 sub-grid
    pub static ref CIRCULAR_GRID_STACK: GridStack<f64> =
        circular_grid_stack((140, 140), 0.05, 3.0, 4, (21, 21));

    /// 1.5 arcsec circle on a 0.1 arcsec pixel grid, 2x2 sub-grid
    pub static ref SMALL_GRID_STACK: GridStack<f64> =
        circular_grid_stack((40, 40), 0.1, 1.5, 2, (5, 5));
}

/// `n` coordinates drawn uniformly from `[-half_size, half_size)^2`
pub fn random_grid(rng: &mut StdRng, n: usize, half_size: f64) -> Grid<f64> {
    Grid::from_coordinates((0..n).map(|_| {
        Coordinate::new(
            rng.random_range(-half_size..half_size),
            rng.random_range(-half_size..half_size),
        )
    }))
}

fn random_centre(rng: &mut StdRng, offset: f64) -> Coordinate<f64> {
    Coordinate::new(
        rng.random_range(-offset..offset),
        rng.random_range(-offset..offset),
    )
}

pub fn random_sersic(rng: &mut StdRng) -> SersicLightProfile<f64> {
    SersicLightProfile::new(
        random_centre(rng, 0.1),
        rng.random_range(0.3..1.0),
        rng.random_range(0.0..180.0),
        rng.random_range(0.1..5.0),
        rng.random_range(0.2..2.0),
        rng.random_range(0.8..6.0),
    )
    .expect("parameters are drawn from valid ranges")
}

pub fn random_isothermal(rng: &mut StdRng) -> EllipticalIsothermal<f64> {
    EllipticalIsothermal::new(
        random_centre(rng, 0.1),
        rng.random_range(0.3..1.0),
        rng.random_range(0.0..180.0),
        rng.random_range(0.5..2.0),
    )
    .expect("parameters are drawn from valid ranges")
}

/// Lens galaxy with a Sersic bulge, an isothermal body, an NFW halo and external shear
pub fn random_lens_galaxy(rng: &mut StdRng, redshift: Option<f64>) -> Galaxy<f64> {
    let mut galaxy = Galaxy::<f64>::new(redshift);
    galaxy
        .add_light_profile("bulge", random_sersic(rng))
        .add_mass_profile("body", random_isothermal(rng))
        .add_mass_profile(
            "halo",
            SphericalNfw::new(
                random_centre(rng, 0.1),
                rng.random_range(0.05..0.3),
                rng.random_range(5.0..20.0),
            )
            .expect("parameters are drawn from valid ranges"),
        )
        .add_mass_profile(
            "shear",
            ExternalShear::new(rng.random_range(0.0..0.1), rng.random_range(0.0..180.0))
                .expect("parameters are drawn from valid ranges"),
        );
    galaxy
}

/// Compact exponential source
pub fn random_source_galaxy(rng: &mut StdRng, redshift: Option<f64>) -> Galaxy<f64> {
    let mut galaxy = Galaxy::<f64>::new(redshift);
    galaxy.add_light_profile(
        "disk",
        ExponentialLightProfile::new(
            random_centre(rng, 0.3),
            rng.random_range(0.3..1.0),
            rng.random_range(0.0..180.0),
            rng.random_range(0.1..5.0),
            rng.random_range(0.05..0.5),
        )
        .expect("parameters are drawn from valid ranges"),
    );
    galaxy
}

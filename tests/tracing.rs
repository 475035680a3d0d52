use approx::{assert_abs_diff_eq, assert_relative_eq};
use lens_ray_tracing::light_profiles::GaussianLightProfile;
use lens_ray_tracing::mass_profiles::PointMass;
use lens_ray_tracing::{Coordinate, Cosmology, Galaxy, GridStack, Mask, Tracer};
use lens_ray_tracing_test_util::{
    CIRCULAR_GRID_STACK, SMALL_GRID_STACK, random_lens_galaxy, random_source_galaxy,
};
use ndarray::{Array1, array};
use rand::prelude::*;
use rayon::prelude::*;

/// Pixels at unit distance from the centre of a 3x3 unit-scale mask
fn cross_grid_stack() -> GridStack<f64> {
    let mask = Mask::new(
        array![
            [true, false, true],
            [false, true, false],
            [true, false, true],
        ],
        1.0,
    );
    GridStack::from_mask_and_sub_grid_size(mask, 1).unwrap()
}

#[test]
fn einstein_ring_maps_to_source_centre() {
    let mut lens = Galaxy::<f64>::new(None);
    lens.add_mass_profile("point", PointMass::new(Coordinate::origin(), 1.0).unwrap());
    let mut source = Galaxy::<f64>::new(None);
    source.add_light_profile(
        "blob",
        GaussianLightProfile::spherical(Coordinate::origin(), 1.0, 0.1).unwrap(),
    );

    let tracer =
        Tracer::image_and_source_planes(vec![lens], vec![source], cross_grid_stack(), None)
            .unwrap();
    let traced = tracer.source_plane().grid_stack().regular();
    assert_eq!(traced.len(), 4);
    for c in traced.coordinates() {
        assert_abs_diff_eq!(c.y, 0.0, epsilon = 1e-14);
        assert_abs_diff_eq!(c.x, 0.0, epsilon = 1e-14);
    }

    let peak = 1.0 / (0.1 * (2.0 * std::f64::consts::PI).sqrt());
    let image = tracer.image_plane_image_1d().unwrap();
    for &value in image.iter() {
        assert_relative_eq!(value, peak, max_relative = 1e-12);
    }
}

#[test]
fn observed_image_is_sum_of_plane_images() {
    let mut rng = StdRng::seed_from_u64(0);
    let tracer = Tracer::multi_plane(
        vec![
            random_source_galaxy(&mut rng, Some(2.0)),
            random_lens_galaxy(&mut rng, Some(0.4)),
            random_lens_galaxy(&mut rng, Some(0.9)),
        ],
        SMALL_GRID_STACK.clone(),
        Cosmology::planck15(),
    )
    .unwrap();
    assert_eq!(tracer.plane_redshifts(), vec![Some(0.4), Some(0.9), Some(2.0)]);

    let planes = tracer.image_plane_images_1d_of_planes().unwrap();
    let total = tracer.image_plane_image_1d().unwrap();
    let sum = planes
        .iter()
        .fold(Array1::zeros(total.len()), |acc, image| acc + image);
    assert_abs_diff_eq!(total, sum, epsilon = 1e-12);
    assert!(total.iter().all(|value| value.is_finite()));

    let image = tracer.image_plane_image().unwrap();
    let mask = SMALL_GRID_STACK.mask();
    for ((row, col), &value) in image.indexed_iter() {
        if mask.is_masked(row, col) {
            assert_eq!(value, 0.0);
        }
    }
}

#[test]
fn galaxies_survive_json_configuration() {
    let mut rng = StdRng::seed_from_u64(1);
    let lens = random_lens_galaxy(&mut rng, Some(0.5));
    let source = random_source_galaxy(&mut rng, Some(1.0));

    let json = serde_json::to_string(&[&lens, &source]).unwrap();
    let galaxies: Vec<Galaxy<f64>> = serde_json::from_str(&json).unwrap();
    assert_eq!(galaxies, vec![lens.clone(), source.clone()]);

    let from_json =
        Tracer::multi_plane(galaxies, SMALL_GRID_STACK.clone(), Cosmology::planck15()).unwrap();
    let direct = Tracer::multi_plane(
        vec![lens, source],
        SMALL_GRID_STACK.clone(),
        Cosmology::planck15(),
    )
    .unwrap();
    assert_eq!(
        from_json.image_plane_image_1d().unwrap(),
        direct.image_plane_image_1d().unwrap()
    );
}

#[test]
fn lens_light_does_not_depend_on_tracing() {
    let mut rng = StdRng::seed_from_u64(2);
    let lens = random_lens_galaxy(&mut rng, None);
    let tracer = Tracer::image_and_source_planes(
        vec![lens.clone()],
        vec![Galaxy::new(None)],
        CIRCULAR_GRID_STACK.clone(),
        None,
    )
    .unwrap();
    let sub = CIRCULAR_GRID_STACK.sub();
    let desired = sub
        .regular_data_1d_from_sub_data_1d(&lens.intensities_from_grid(sub.grid()))
        .unwrap();
    assert_eq!(tracer.image_plane_image_1d().unwrap(), desired);

    let convergence = tracer.surface_density().unwrap();
    let mass = lens.dimensionless_mass_within_circle(1.0).unwrap().unwrap();
    assert!(mass > 0.0);
    assert!(convergence.iter().all(|kappa| kappa.is_finite()));
}

#[test]
fn tracers_are_shareable_between_threads() {
    let mut rng = StdRng::seed_from_u64(3);
    let tracers: Vec<_> = (0..8)
        .map(|_| {
            Tracer::image_and_source_planes(
                vec![random_lens_galaxy(&mut rng, None)],
                vec![random_source_galaxy(&mut rng, None)],
                SMALL_GRID_STACK.clone(),
                None,
            )
            .unwrap()
        })
        .collect();

    let sequential: Vec<_> = tracers
        .iter()
        .map(|tracer| tracer.image_plane_image_1d().unwrap())
        .collect();
    let parallel: Vec<_> = tracers
        .par_iter()
        .map(|tracer| tracer.image_plane_image_1d().unwrap())
        .collect();
    assert_eq!(sequential, parallel);
}

#[test]
fn single_precision_tracing() {
    let mask = Mask::<f32>::circular((20, 20), 0.1, 0.8, Coordinate::origin());
    let stack32 = GridStack::from_mask_sub_grid_size_and_psf_shape(mask, 2, (3, 3)).unwrap();
    let mut lens32 = Galaxy::<f32>::new(None);
    lens32.add_mass_profile(
        "point",
        PointMass::<f32>::new(Coordinate::new(0.05, 0.0), 0.5).unwrap(),
    );
    let mut source32 = Galaxy::<f32>::new(None);
    source32.add_light_profile(
        "blob",
        GaussianLightProfile::<f32>::spherical(Coordinate::origin(), 1.0, 0.2).unwrap(),
    );
    let tracer32 =
        Tracer::image_and_source_planes(vec![lens32], vec![source32], stack32, None).unwrap();

    let mask = Mask::<f64>::circular((20, 20), 0.1, 0.8, Coordinate::origin());
    let stack64 = GridStack::from_mask_sub_grid_size_and_psf_shape(mask, 2, (3, 3)).unwrap();
    let mut lens64 = Galaxy::<f64>::new(None);
    lens64.add_mass_profile("point", PointMass::new(Coordinate::new(0.05, 0.0), 0.5).unwrap());
    let mut source64 = Galaxy::<f64>::new(None);
    source64.add_light_profile(
        "blob",
        GaussianLightProfile::spherical(Coordinate::origin(), 1.0, 0.2).unwrap(),
    );
    let tracer64 =
        Tracer::image_and_source_planes(vec![lens64], vec![source64], stack64, None).unwrap();

    let image32 = tracer32.image_plane_image_1d().unwrap();
    let image64 = tracer64.image_plane_image_1d().unwrap();
    assert_eq!(image32.len(), image64.len());
    for (&a, &b) in image32.iter().zip(image64.iter()) {
        assert_abs_diff_eq!(a as f64, b, epsilon = 1e-3);
    }
}

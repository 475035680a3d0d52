use crate::error::{GalaxyError, IntegrationError};
use crate::float_trait::Float;
use crate::galaxy::hyper_galaxy::HyperGalaxy;
use crate::galaxy::pixelization::{Pixelization, Regularization};
use crate::grid::Grid;
use crate::light_profiles::{LightProfile, LightProfileTrait};
use crate::mass_profiles::{MassProfile, MassProfileTrait};

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Profile stored in a galaxy under a caller-chosen name
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NamedProfile<P> {
    pub name: String,
    pub profile: P,
}

/// Light and mass profiles at one redshift, with optional inversion and noise-scaling parameters
///
/// Profiles are kept in insertion order, which is the order every aggregate sums them in.
/// Pixelization and regularization are either both present or both absent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GalaxyParameters<T>", into = "GalaxyParameters<T>")]
#[serde(bound = "T: Float")]
pub struct Galaxy<T: Float> {
    redshift: Option<f64>,
    light_profiles: Vec<NamedProfile<LightProfile<T>>>,
    mass_profiles: Vec<NamedProfile<MassProfile<T>>>,
    pixelization: Option<Pixelization>,
    regularization: Option<Regularization>,
    hyper_galaxy: Option<HyperGalaxy<T>>,
}

#[derive(Serialize, Deserialize)]
#[serde(bound = "T: Float")]
struct GalaxyParameters<T: Float> {
    redshift: Option<f64>,
    #[serde(default)]
    light_profiles: Vec<NamedProfile<LightProfile<T>>>,
    #[serde(default)]
    mass_profiles: Vec<NamedProfile<MassProfile<T>>>,
    pixelization: Option<Pixelization>,
    regularization: Option<Regularization>,
    hyper_galaxy: Option<HyperGalaxy<T>>,
}

impl<T: Float> TryFrom<GalaxyParameters<T>> for Galaxy<T> {
    type Error = GalaxyError;

    fn try_from(p: GalaxyParameters<T>) -> Result<Self, Self::Error> {
        let mut galaxy = Self::with_inversion(p.redshift, p.pixelization, p.regularization)?;
        galaxy.light_profiles = p.light_profiles;
        galaxy.mass_profiles = p.mass_profiles;
        galaxy.hyper_galaxy = p.hyper_galaxy;
        Ok(galaxy)
    }
}

impl<T: Float> From<Galaxy<T>> for GalaxyParameters<T> {
    fn from(g: Galaxy<T>) -> Self {
        Self {
            redshift: g.redshift,
            light_profiles: g.light_profiles,
            mass_profiles: g.mass_profiles,
            pixelization: g.pixelization,
            regularization: g.regularization,
            hyper_galaxy: g.hyper_galaxy,
        }
    }
}

/// Sum of a fallible per-profile value, `None` when there are no profiles
fn sum_or_none<T, P>(
    profiles: &[NamedProfile<P>],
    f: impl Fn(&P) -> Result<T, IntegrationError>,
) -> Result<Option<T>, IntegrationError>
where
    T: Float,
{
    if profiles.is_empty() {
        return Ok(None);
    }
    profiles
        .iter()
        .try_fold(T::zero(), |acc, p| Ok(acc + f(&p.profile)?))
        .map(Some)
}

impl<T> Galaxy<T>
where
    T: Float,
{
    pub fn new(redshift: Option<f64>) -> Self {
        Self {
            redshift,
            light_profiles: vec![],
            mass_profiles: vec![],
            pixelization: None,
            regularization: None,
            hyper_galaxy: None,
        }
    }

    /// Galaxy reconstructed by an inversion, fails unless both or neither parameters are given
    pub fn with_inversion(
        redshift: Option<f64>,
        pixelization: Option<Pixelization>,
        regularization: Option<Regularization>,
    ) -> Result<Self, GalaxyError> {
        match (&pixelization, &regularization) {
            (Some(_), None) => return Err(GalaxyError::PixelizationWithoutRegularization),
            (None, Some(_)) => return Err(GalaxyError::RegularizationWithoutPixelization),
            _ => {}
        }
        Ok(Self {
            pixelization,
            regularization,
            ..Self::new(redshift)
        })
    }

    pub fn add_light_profile(
        &mut self,
        name: impl Into<String>,
        profile: impl Into<LightProfile<T>>,
    ) -> &mut Self {
        self.light_profiles.push(NamedProfile {
            name: name.into(),
            profile: profile.into(),
        });
        self
    }

    pub fn add_mass_profile(
        &mut self,
        name: impl Into<String>,
        profile: impl Into<MassProfile<T>>,
    ) -> &mut Self {
        self.mass_profiles.push(NamedProfile {
            name: name.into(),
            profile: profile.into(),
        });
        self
    }

    pub fn set_hyper_galaxy(&mut self, hyper_galaxy: HyperGalaxy<T>) -> &mut Self {
        self.hyper_galaxy = Some(hyper_galaxy);
        self
    }

    pub fn redshift(&self) -> Option<f64> {
        self.redshift
    }

    pub fn light_profiles(&self) -> impl Iterator<Item = &LightProfile<T>> {
        self.light_profiles.iter().map(|p| &p.profile)
    }

    pub fn mass_profiles(&self) -> impl Iterator<Item = &MassProfile<T>> {
        self.mass_profiles.iter().map(|p| &p.profile)
    }

    /// First light profile stored under the name
    pub fn light_profile(&self, name: &str) -> Option<&LightProfile<T>> {
        self.light_profiles
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.profile)
    }

    /// First mass profile stored under the name
    pub fn mass_profile(&self, name: &str) -> Option<&MassProfile<T>> {
        self.mass_profiles
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.profile)
    }

    pub fn pixelization(&self) -> Option<&Pixelization> {
        self.pixelization.as_ref()
    }

    pub fn regularization(&self) -> Option<&Regularization> {
        self.regularization.as_ref()
    }

    pub fn hyper_galaxy(&self) -> Option<&HyperGalaxy<T>> {
        self.hyper_galaxy.as_ref()
    }

    pub fn has_redshift(&self) -> bool {
        self.redshift.is_some()
    }

    pub fn has_light_profile(&self) -> bool {
        !self.light_profiles.is_empty()
    }

    pub fn has_mass_profile(&self) -> bool {
        !self.mass_profiles.is_empty()
    }

    pub fn has_profile(&self) -> bool {
        self.has_light_profile() || self.has_mass_profile()
    }

    pub fn has_pixelization(&self) -> bool {
        self.pixelization.is_some()
    }

    pub fn has_regularization(&self) -> bool {
        self.regularization.is_some()
    }

    pub fn has_hyper_galaxy(&self) -> bool {
        self.hyper_galaxy.is_some()
    }

    /// Summed intensities of the light profiles, zeros without light profiles
    pub fn intensities_from_grid(&self, grid: &Grid<T>) -> Array1<T> {
        self.light_profiles()
            .fold(Array1::zeros(grid.len()), |acc, p| {
                acc + p.intensities_from_grid(grid)
            })
    }

    pub fn surface_density_from_grid(&self, grid: &Grid<T>) -> Array1<T> {
        self.mass_profiles()
            .fold(Array1::zeros(grid.len()), |acc, p| {
                acc + p.surface_density_from_grid(grid)
            })
    }

    pub fn potential_from_grid(&self, grid: &Grid<T>) -> Array1<T> {
        self.mass_profiles()
            .fold(Array1::zeros(grid.len()), |acc, p| {
                acc + p.potential_from_grid(grid)
            })
    }

    /// `(n, 2)` summed (y, x) deflections, zeros without mass profiles
    pub fn deflections_from_grid(&self, grid: &Grid<T>) -> Array2<T> {
        self.mass_profiles()
            .fold(Array2::zeros((grid.len(), 2)), |acc, p| {
                acc + p.deflections_from_grid(grid)
            })
    }

    /// Summed luminosity of the light profiles, `None` without light profiles
    pub fn luminosity_within_circle(&self, radius: T) -> Result<Option<T>, IntegrationError> {
        sum_or_none(&self.light_profiles, |p| p.luminosity_within_circle(radius))
    }

    pub fn luminosity_within_ellipse(&self, major_axis: T) -> Result<Option<T>, IntegrationError> {
        sum_or_none(&self.light_profiles, |p| {
            p.luminosity_within_ellipse(major_axis)
        })
    }

    /// Summed dimensionless mass of the mass profiles, `None` without mass profiles
    pub fn dimensionless_mass_within_circle(
        &self,
        radius: T,
    ) -> Result<Option<T>, IntegrationError> {
        sum_or_none(&self.mass_profiles, |p| {
            p.dimensionless_mass_within_circle(radius)
        })
    }

    pub fn dimensionless_mass_within_ellipse(
        &self,
        major_axis: T,
    ) -> Result<Option<T>, IntegrationError> {
        sum_or_none(&self.mass_profiles, |p| {
            p.dimensionless_mass_within_ellipse(major_axis)
        })
    }

    pub fn mass_within_circle(
        &self,
        radius: T,
        conversion_factor: T,
    ) -> Result<Option<T>, IntegrationError> {
        sum_or_none(&self.mass_profiles, |p| {
            p.mass_within_circle(radius, conversion_factor)
        })
    }

    pub fn mass_within_ellipse(
        &self,
        major_axis: T,
        conversion_factor: T,
    ) -> Result<Option<T>, IntegrationError> {
        sum_or_none(&self.mass_profiles, |p| {
            p.mass_within_ellipse(major_axis, conversion_factor)
        })
    }
}

impl<T: Float> fmt::Display for Galaxy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.redshift {
            Some(z) => write!(f, "Redshift: {z}")?,
            None => write!(f, "Redshift: None")?,
        }
        if let Some(pixelization) = &self.pixelization {
            write!(f, "\nPixelization:\n{pixelization:?}")?;
        }
        if let Some(regularization) = &self.regularization {
            write!(f, "\nRegularization:\n{regularization:?}")?;
        }
        if let Some(hyper_galaxy) = &self.hyper_galaxy {
            write!(f, "\nHyper Galaxy:\n{hyper_galaxy:?}")?;
        }
        if self.has_light_profile() {
            write!(f, "\nLight Profiles:")?;
            for p in &self.light_profiles {
                write!(f, "\n{}: {:?}", p.name, p.profile)?;
            }
        }
        if self.has_mass_profile() {
            write!(f, "\nMass Profiles:")?;
            for p in &self.mass_profiles {
                write!(f, "\n{}: {:?}", p.name, p.profile)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::geometry::Coordinate;
    use crate::light_profiles::{ExponentialLightProfile, SersicLightProfile};
    use crate::mass_profiles::{SphericalIsothermal, SphericalNfw};

    use approx::assert_relative_eq;

    fn light_galaxy() -> Galaxy<f64> {
        let mut galaxy = Galaxy::<f64>::new(Some(0.5));
        galaxy
            .add_light_profile(
                "bulge",
                SersicLightProfile::spherical(Coordinate::origin(), 1.0, 0.6, 4.0).unwrap(),
            )
            .add_light_profile(
                "disk",
                ExponentialLightProfile::new(Coordinate::new(0.1, 0.0), 0.7, 30.0, 2.0, 1.5)
                    .unwrap(),
            );
        galaxy
    }

    fn mass_galaxy() -> Galaxy<f64> {
        let mut galaxy = Galaxy::<f64>::new(Some(0.5));
        galaxy
            .add_mass_profile(
                "sis",
                SphericalIsothermal::new(Coordinate::origin(), 1.0).unwrap(),
            )
            .add_mass_profile("halo", SphericalNfw::<f64>::default());
        galaxy
    }

    fn grid() -> Grid<f64> {
        Grid::from_coordinates([
            Coordinate::new(1.0, 1.0),
            Coordinate::new(-0.5, 0.3),
            Coordinate::new(0.2, -2.0),
        ])
    }

    #[test]
    fn pixelization_and_regularization_are_paired() {
        assert_eq!(
            Galaxy::<f64>::with_inversion(None, Some(Pixelization::voronoi(10)), None),
            Err(GalaxyError::PixelizationWithoutRegularization)
        );
        assert_eq!(
            Galaxy::<f64>::with_inversion(None, None, Some(Regularization::default())),
            Err(GalaxyError::RegularizationWithoutPixelization)
        );
        let galaxy = Galaxy::<f64>::with_inversion(
            Some(1.0),
            Some(Pixelization::voronoi(10)),
            Some(Regularization::default()),
        )
        .unwrap();
        assert!(galaxy.has_pixelization());
        assert!(galaxy.has_regularization());
        assert!(!galaxy.has_profile());
    }

    #[test]
    fn has_queries() {
        let galaxy = Galaxy::<f64>::new(None);
        assert!(!galaxy.has_redshift());
        assert!(!galaxy.has_light_profile());
        assert!(!galaxy.has_mass_profile());
        assert!(!galaxy.has_hyper_galaxy());

        let galaxy = light_galaxy();
        assert!(galaxy.has_redshift());
        assert!(galaxy.has_light_profile());
        assert!(!galaxy.has_mass_profile());
        assert!(galaxy.has_profile());

        let mut galaxy = mass_galaxy();
        galaxy.set_hyper_galaxy(HyperGalaxy::default());
        assert!(galaxy.has_mass_profile());
        assert!(galaxy.has_hyper_galaxy());
    }

    #[test]
    fn named_lookup() {
        let galaxy = light_galaxy();
        assert!(matches!(
            galaxy.light_profile("disk"),
            Some(LightProfile::Exponential(_))
        ));
        assert!(galaxy.light_profile("halo").is_none());
        assert!(matches!(
            mass_galaxy().mass_profile("halo"),
            Some(MassProfile::SphericalNfw(_))
        ));
    }

    #[test]
    fn intensities_are_summed_over_profiles() {
        let galaxy = light_galaxy();
        let grid = grid();
        let profiles: Vec<_> = galaxy.light_profiles().collect();
        let desired =
            profiles[0].intensities_from_grid(&grid) + profiles[1].intensities_from_grid(&grid);
        assert_eq!(galaxy.intensities_from_grid(&grid), desired);
        assert_eq!(galaxy.surface_density_from_grid(&grid), Array1::<f64>::zeros(3));
        assert_eq!(galaxy.deflections_from_grid(&grid), Array2::<f64>::zeros((3, 2)));
    }

    #[test]
    fn mass_fields_are_summed_over_profiles() {
        let galaxy = mass_galaxy();
        let grid = grid();
        let profiles: Vec<_> = galaxy.mass_profiles().collect();
        assert_eq!(
            galaxy.deflections_from_grid(&grid),
            profiles[0].deflections_from_grid(&grid) + profiles[1].deflections_from_grid(&grid)
        );
        assert_eq!(
            galaxy.potential_from_grid(&grid),
            profiles[0].potential_from_grid(&grid) + profiles[1].potential_from_grid(&grid)
        );
        assert_eq!(galaxy.intensities_from_grid(&grid), Array1::<f64>::zeros(3));
    }

    #[test]
    fn aperture_sums_are_none_without_profiles() {
        let galaxy = mass_galaxy();
        assert_eq!(galaxy.luminosity_within_circle(1.0), Ok(None));
        assert_eq!(galaxy.luminosity_within_ellipse(1.0), Ok(None));

        let galaxy = light_galaxy();
        assert_eq!(galaxy.dimensionless_mass_within_circle(1.0), Ok(None));
        assert_eq!(galaxy.mass_within_ellipse(1.0, 2.0), Ok(None));
    }

    #[test]
    fn aperture_sums() {
        let galaxy = light_galaxy();
        let profiles: Vec<_> = galaxy.light_profiles().collect();
        assert_eq!(
            galaxy.luminosity_within_circle(0.8).unwrap(),
            Some(
                0.0 + profiles[0].luminosity_within_circle(0.8).unwrap()
                    + profiles[1].luminosity_within_circle(0.8).unwrap()
            )
        );

        let galaxy = mass_galaxy();
        let circle = galaxy.dimensionless_mass_within_circle(1.0).unwrap().unwrap();
        assert_relative_eq!(
            galaxy.mass_within_circle(1.0, 2.5).unwrap().unwrap(),
            2.5 * circle,
            max_relative = 1e-14
        );
        assert_relative_eq!(
            galaxy.dimensionless_mass_within_ellipse(1.0).unwrap().unwrap(),
            circle,
            max_relative = 1e-14
        );
    }

    #[test]
    fn serialization_checks_pairing() {
        let galaxy = light_galaxy();
        let json = serde_json::to_string(&galaxy).unwrap();
        assert_eq!(serde_json::from_str::<Galaxy<f64>>(&json).unwrap(), galaxy);

        let unpaired = r#"{
            "redshift": null,
            "pixelization": {"Voronoi": {"pixels": 3}},
            "regularization": null,
            "hyper_galaxy": null
        }"#;
        assert!(serde_json::from_str::<Galaxy<f64>>(unpaired).is_err());
    }

    #[test]
    fn display() {
        let mut galaxy = mass_galaxy();
        galaxy.add_light_profile("bulge", SersicLightProfile::<f64>::default());
        let summary = galaxy.to_string();
        assert!(summary.starts_with("Redshift: 0.5"));
        assert!(summary.contains("Light Profiles:\nbulge: Sersic("));
        assert!(summary.contains("Mass Profiles:\nsis: SphericalIsothermal("));
        assert!(Galaxy::<f64>::new(None).to_string() == "Redshift: None");
    }
}

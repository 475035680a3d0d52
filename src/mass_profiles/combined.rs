use super::mass_profile::*;

macro_const! {
    const DOC: &str = r#"
Mass profile composed from a list of mass profiles

Convergence, potential, deflections and aperture masses are sums of the component values, added in
the order the components are given.
"#;
}

#[doc = DOC!()]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CombinedMassProfile<P> {
    profiles: Vec<P>,
}

impl<P> CombinedMassProfile<P> {
    pub fn new(profiles: impl Into<Vec<P>>) -> Self {
        Self {
            profiles: profiles.into(),
        }
    }

    pub fn from_profiles(profiles: impl IntoIterator<Item = impl Into<P>>) -> Self {
        Self::new(profiles.into_iter().map(Into::into).collect::<Vec<_>>())
    }

    pub fn profiles(&self) -> &[P] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Per-component dimensionless masses within a circle, in component order
    pub fn dimensionless_mass_within_circle_individual<T>(
        &self,
        radius: T,
    ) -> Result<Vec<T>, IntegrationError>
    where
        T: Float,
        P: MassProfileTrait<T>,
    {
        self.profiles
            .iter()
            .map(|profile| profile.dimensionless_mass_within_circle(radius))
            .collect()
    }

    pub fn dimensionless_mass_within_ellipse_individual<T>(
        &self,
        major_axis: T,
    ) -> Result<Vec<T>, IntegrationError>
    where
        T: Float,
        P: MassProfileTrait<T>,
    {
        self.profiles
            .iter()
            .map(|profile| profile.dimensionless_mass_within_ellipse(major_axis))
            .collect()
    }

    pub const fn doc() -> &'static str {
        DOC
    }
}

impl<T, P> MassProfileTrait<T> for CombinedMassProfile<P>
where
    T: Float,
    P: MassProfileTrait<T>,
{
    fn surface_density_at_coordinates(&self, coordinates: Coordinate<T>) -> T {
        self.profiles.iter().fold(T::zero(), |acc, profile| {
            acc + profile.surface_density_at_coordinates(coordinates)
        })
    }

    fn potential_at_coordinates(&self, coordinates: Coordinate<T>) -> T {
        self.profiles.iter().fold(T::zero(), |acc, profile| {
            acc + profile.potential_at_coordinates(coordinates)
        })
    }

    fn deflections_at_coordinates(&self, coordinates: Coordinate<T>) -> Coordinate<T> {
        self.profiles
            .iter()
            .fold(Coordinate::origin(), |acc, profile| {
                acc + profile.deflections_at_coordinates(coordinates)
            })
    }

    fn surface_density_from_grid(&self, grid: &Grid<T>) -> Array1<T> {
        self.profiles
            .iter()
            .fold(Array1::zeros(grid.len()), |acc, profile| {
                acc + profile.surface_density_from_grid(grid)
            })
    }

    fn potential_from_grid(&self, grid: &Grid<T>) -> Array1<T> {
        self.profiles
            .iter()
            .fold(Array1::zeros(grid.len()), |acc, profile| {
                acc + profile.potential_from_grid(grid)
            })
    }

    fn deflections_from_grid(&self, grid: &Grid<T>) -> Array2<T> {
        self.profiles
            .iter()
            .fold(Array2::zeros((grid.len(), 2)), |acc, profile| {
                acc + profile.deflections_from_grid(grid)
            })
    }

    fn dimensionless_mass_within_circle_with(
        &self,
        radius: T,
        quadrature: &Quadrature<T>,
    ) -> Result<T, IntegrationError> {
        self.profiles.iter().try_fold(T::zero(), |acc, profile| {
            Ok(acc + profile.dimensionless_mass_within_circle_with(radius, quadrature)?)
        })
    }

    fn dimensionless_mass_within_ellipse_with(
        &self,
        major_axis: T,
        quadrature: &Quadrature<T>,
    ) -> Result<T, IntegrationError> {
        self.profiles.iter().try_fold(T::zero(), |acc, profile| {
            Ok(acc + profile.dimensionless_mass_within_ellipse_with(major_axis, quadrature)?)
        })
    }
}

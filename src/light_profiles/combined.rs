use super::light_profile::*;

macro_const! {
    const DOC: &str = r#"
Light profile composed from a list of light profiles

Every quantity is the sum of the component values, added in the order the components are
given, so the result is bitwise equal to summing standalone evaluations in that order.
"#;
}

#[doc = DOC!()]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CombinedLightProfile<P> {
    profiles: Vec<P>,
}

impl<P> CombinedLightProfile<P> {
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

    pub const fn doc() -> &'static str {
        DOC
    }
}

impl<P> CombinedLightProfile<P> {
    /// Per-component luminosities within a circle, in component order
    pub fn luminosity_within_circle_individual<T>(
        &self,
        radius: T,
    ) -> Result<Vec<T>, IntegrationError>
    where
        T: Float,
        P: LightProfileTrait<T>,
    {
        self.profiles
            .iter()
            .map(|profile| profile.luminosity_within_circle(radius))
            .collect()
    }

    /// Per-component luminosities within each component's own ellipse, in component order
    pub fn luminosity_within_ellipse_individual<T>(
        &self,
        major_axis: T,
    ) -> Result<Vec<T>, IntegrationError>
    where
        T: Float,
        P: LightProfileTrait<T>,
    {
        self.profiles
            .iter()
            .map(|profile| profile.luminosity_within_ellipse(major_axis))
            .collect()
    }
}

impl<T, P> LightProfileTrait<T> for CombinedLightProfile<P>
where
    T: Float,
    P: LightProfileTrait<T>,
{
    fn intensity_at_coordinates(&self, coordinates: Coordinate<T>) -> T {
        self.profiles.iter().fold(T::zero(), |acc, profile| {
            acc + profile.intensity_at_coordinates(coordinates)
        })
    }

    fn intensities_from_grid(&self, grid: &Grid<T>) -> Array1<T> {
        self.profiles
            .iter()
            .fold(Array1::zeros(grid.len()), |acc, profile| {
                acc + profile.intensities_from_grid(grid)
            })
    }

    fn luminosity_within_circle_with(
        &self,
        radius: T,
        quadrature: &Quadrature<T>,
    ) -> Result<T, IntegrationError> {
        self.profiles.iter().try_fold(T::zero(), |acc, profile| {
            Ok(acc + profile.luminosity_within_circle_with(radius, quadrature)?)
        })
    }

    fn luminosity_within_ellipse_with(
        &self,
        major_axis: T,
        quadrature: &Quadrature<T>,
    ) -> Result<T, IntegrationError> {
        self.profiles.iter().try_fold(T::zero(), |acc, profile| {
            Ok(acc + profile.luminosity_within_ellipse_with(major_axis, quadrature)?)
        })
    }
}

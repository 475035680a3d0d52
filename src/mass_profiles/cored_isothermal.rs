use super::mass_profile::*;

macro_const! {
    const DOC: &str = r#"
Cored isothermal sphere

With $s$ the core radius and $R = \sqrt{r^2 + s^2}$:
$$
\kappa = \frac{\theta_E}{2R},\quad
\alpha = \theta_E \frac{R - s}{r} = \theta_E \frac{r}{s + R},\quad
\psi = \theta_E \left[R - s \ln(s + R)\right].
$$
Unlike the singular profile the convergence is finite at the centre, where the deflection vanishes.
"#;
}

#[doc = DOC!()]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(
    try_from = "SphericalCoredIsothermalParameters<T>",
    into = "SphericalCoredIsothermalParameters<T>",
    bound = "T: Float"
)]
pub struct SphericalCoredIsothermal<T> {
    geometry: EllipticalGeometry<T>,
    einstein_radius: T,
    core_radius: T,
}

impl<T> SphericalCoredIsothermal<T>
where
    T: Float,
{
    pub fn new(
        centre: Coordinate<T>,
        einstein_radius: T,
        core_radius: T,
    ) -> Result<Self, ProfileError> {
        Ok(Self {
            geometry: EllipticalGeometry::spherical(centre)?,
            einstein_radius: check_positive("einstein_radius", einstein_radius)?,
            core_radius: check_positive("core_radius", core_radius)?,
        })
    }

    pub fn einstein_radius(&self) -> T {
        self.einstein_radius
    }

    pub fn core_radius(&self) -> T {
        self.core_radius
    }

    #[inline]
    fn cored_radius(&self, radius: T) -> T {
        radius.hypot(self.core_radius)
    }

    pub const fn doc() -> &'static str {
        DOC
    }
}

deserialize_checked!(
    SphericalCoredIsothermal,
    SphericalCoredIsothermalParameters {
        geometry: EllipticalGeometry<T>,
        einstein_radius: T,
        core_radius: T,
    },
    |p| Self::new(p.geometry.centre(), p.einstein_radius, p.core_radius),
);

impl<T> Default for SphericalCoredIsothermal<T>
where
    T: Float,
{
    fn default() -> Self {
        Self {
            geometry: EllipticalGeometry::default(),
            einstein_radius: T::one(),
            core_radius: 0.05_f64.approx().unwrap(),
        }
    }
}

impl<T: Float> AnalyticMassProfile<T> for SphericalCoredIsothermal<T> {
    fn convergence_at_radius(&self, radius: T) -> T {
        self.einstein_radius / (T::two() * self.cored_radius(radius))
    }

    fn potential_in_frame(&self, c: &TransformedCoordinate<T>) -> T {
        let cored_radius = self.cored_radius(c.radius());
        self.einstein_radius
            * (cored_radius - self.core_radius * (self.core_radius + cored_radius).ln())
    }

    fn deflections_in_frame(&self, c: &TransformedCoordinate<T>) -> Coordinate<T> {
        let radius = c.radius();
        let magnitude =
            self.einstein_radius * radius / (self.core_radius + self.cored_radius(radius));
        radial_vector(c, magnitude)
    }
}

analytic_mass_profile!(SphericalCoredIsothermal);

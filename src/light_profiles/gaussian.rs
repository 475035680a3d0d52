use super::light_profile::*;

macro_const! {
    const DOC: &str = r#"
Elliptical Gaussian light profile

$$
I(r) = \frac{I}{\sigma\sqrt{2\pi}} \exp\left[-\frac{1}{2}\left(\frac{r}{\sigma}\right)^2\right],
$$
where $r$ is the elliptical radius $\sqrt{x^2 + y^2/q^2}$ in the profile frame, so that $\sigma$
is measured along the major axis.
"#;
}

#[doc = DOC!()]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(
    try_from = "GaussianLightProfileParameters<T>",
    into = "GaussianLightProfileParameters<T>",
    bound = "T: Float"
)]
pub struct GaussianLightProfile<T> {
    geometry: EllipticalGeometry<T>,
    intensity: T,
    sigma: T,
}

impl<T> GaussianLightProfile<T>
where
    T: Float,
{
    pub fn new(
        centre: Coordinate<T>,
        axis_ratio: T,
        phi: T,
        intensity: T,
        sigma: T,
    ) -> Result<Self, ProfileError> {
        Ok(Self {
            geometry: EllipticalGeometry::new(centre, axis_ratio, phi)?,
            intensity: check_finite("intensity", intensity)?,
            sigma: check_positive("sigma", sigma)?,
        })
    }

    pub fn spherical(centre: Coordinate<T>, intensity: T, sigma: T) -> Result<Self, ProfileError> {
        Self::new(centre, T::one(), T::zero(), intensity, sigma)
    }

    pub fn intensity(&self) -> T {
        self.intensity
    }

    pub fn sigma(&self) -> T {
        self.sigma
    }

    pub const fn doc() -> &'static str {
        DOC
    }
}

deserialize_checked!(
    GaussianLightProfile,
    GaussianLightProfileParameters {
        geometry: EllipticalGeometry<T>,
        intensity: T,
        sigma: T,
    },
    |p| Self::new(
        p.geometry.centre(),
        p.geometry.axis_ratio(),
        p.geometry.phi(),
        p.intensity,
        p.sigma,
    ),
);

impl<T> Default for GaussianLightProfile<T>
where
    T: Float,
{
    fn default() -> Self {
        Self {
            geometry: EllipticalGeometry::default(),
            intensity: 0.1_f64.approx().unwrap(),
            sigma: 0.01_f64.approx().unwrap(),
        }
    }
}

impl<T: Float> RadialLightProfile<T> for GaussianLightProfile<T> {
    fn radial_intensity(&self) -> impl Fn(T) -> T + Send + Sync {
        let sigma = self.sigma;
        let norm = self.intensity / (sigma * (T::two() * T::PI()).sqrt());
        move |radius: T| {
            let u = radius / sigma;
            norm * (-T::half() * u * u).exp()
        }
    }

    #[inline]
    fn profile_radius(&self, frame: &ReferenceFrame<T>, c: &TransformedCoordinate<T>) -> T {
        frame.elliptical_radius(c)
    }
}

radial_light_profile!(GaussianLightProfile);

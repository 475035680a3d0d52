use super::light_profile::*;
use super::sersic::sersic_constant;

macro_const! {
    const DOC: &str = r#"
Core-Sersic light profile (Graham et al. 2003)

Inner power law of slope $\gamma$ joined to an outer Sersic law at the break radius $r_b$, with
$\alpha$ controlling the sharpness of the transition:
$$
I(r) = I' \left[1 + \left(\frac{r_b}{r}\right)^\alpha\right]^{\gamma/\alpha}
    \exp\left\{-b_n \left(\frac{r^\alpha + r_b^\alpha}{R_e^\alpha}\right)^{1/(\alpha n)}\right\},
$$
$$
I' = I_b\, 2^{-\gamma/\alpha} \exp\left[b_n \left(\frac{2^{1/\alpha} r_b}{R_e}\right)^{1/n}\right],
$$
so the intensity at $r_b$ is $I_b$. The profile diverges at the centre for $\gamma > 0$.

`intensity` is carried with the other Sersic parameters but the normalisation is set by the
break intensity $I_b$.
"#;
}

#[doc = DOC!()]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(
    try_from = "CoreSersicLightProfileParameters<T>",
    into = "CoreSersicLightProfileParameters<T>",
    bound = "T: Float"
)]
pub struct CoreSersicLightProfile<T> {
    geometry: EllipticalGeometry<T>,
    intensity: T,
    effective_radius: T,
    sersic_index: T,
    radius_break: T,
    intensity_break: T,
    gamma: T,
    alpha: T,
}

impl<T> CoreSersicLightProfile<T>
where
    T: Float,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        centre: Coordinate<T>,
        axis_ratio: T,
        phi: T,
        intensity: T,
        effective_radius: T,
        sersic_index: T,
        radius_break: T,
        intensity_break: T,
        gamma: T,
        alpha: T,
    ) -> Result<Self, ProfileError> {
        Ok(Self {
            geometry: EllipticalGeometry::new(centre, axis_ratio, phi)?,
            intensity: check_finite("intensity", intensity)?,
            effective_radius: check_positive("effective_radius", effective_radius)?,
            sersic_index: check_positive("sersic_index", sersic_index)?,
            radius_break: check_positive("radius_break", radius_break)?,
            intensity_break: check_finite("intensity_break", intensity_break)?,
            gamma: check_finite("gamma", gamma)?,
            alpha: check_positive("alpha", alpha)?,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn spherical(
        centre: Coordinate<T>,
        intensity: T,
        effective_radius: T,
        sersic_index: T,
        radius_break: T,
        intensity_break: T,
        gamma: T,
        alpha: T,
    ) -> Result<Self, ProfileError> {
        Self::new(
            centre,
            T::one(),
            T::zero(),
            intensity,
            effective_radius,
            sersic_index,
            radius_break,
            intensity_break,
            gamma,
            alpha,
        )
    }

    pub fn intensity(&self) -> T {
        self.intensity
    }

    pub fn effective_radius(&self) -> T {
        self.effective_radius
    }

    pub fn sersic_index(&self) -> T {
        self.sersic_index
    }

    pub fn sersic_constant(&self) -> T {
        sersic_constant(self.sersic_index)
    }

    pub fn radius_break(&self) -> T {
        self.radius_break
    }

    pub fn intensity_break(&self) -> T {
        self.intensity_break
    }

    pub fn gamma(&self) -> T {
        self.gamma
    }

    pub fn alpha(&self) -> T {
        self.alpha
    }

    /// Normalisation `I'` of the joint law
    pub fn intensity_prime(&self) -> T {
        self.intensity_prime_with(self.sersic_constant())
    }

    fn intensity_prime_with(&self, sersic_constant: T) -> T {
        self.intensity_break
            * T::two().powf(-self.gamma / self.alpha)
            * (sersic_constant
                * ((T::two().powf(self.alpha.recip()) * self.radius_break)
                    / self.effective_radius)
                    .powf(self.sersic_index.recip()))
            .exp()
    }

    pub const fn doc() -> &'static str {
        DOC
    }
}

deserialize_checked!(
    CoreSersicLightProfile,
    CoreSersicLightProfileParameters {
        geometry: EllipticalGeometry<T>,
        intensity: T,
        effective_radius: T,
        sersic_index: T,
        radius_break: T,
        intensity_break: T,
        gamma: T,
        alpha: T,
    },
    |p| Self::new(
        p.geometry.centre(),
        p.geometry.axis_ratio(),
        p.geometry.phi(),
        p.intensity,
        p.effective_radius,
        p.sersic_index,
        p.radius_break,
        p.intensity_break,
        p.gamma,
        p.alpha,
    ),
);

impl<T> Default for CoreSersicLightProfile<T>
where
    T: Float,
{
    fn default() -> Self {
        Self {
            geometry: EllipticalGeometry::default(),
            intensity: 0.1_f64.approx().unwrap(),
            effective_radius: 0.6_f64.approx().unwrap(),
            sersic_index: T::four(),
            radius_break: 0.01_f64.approx().unwrap(),
            intensity_break: 0.05_f64.approx().unwrap(),
            gamma: 0.25_f64.approx().unwrap(),
            alpha: T::three(),
        }
    }
}

impl<T: Float> RadialLightProfile<T> for CoreSersicLightProfile<T> {
    fn radial_intensity(&self) -> impl Fn(T) -> T + Send + Sync {
        let b = self.sersic_constant();
        let intensity_prime = self.intensity_prime_with(b);
        let Self {
            effective_radius,
            sersic_index,
            radius_break,
            gamma,
            alpha,
            ..
        } = *self;
        let radius_break_alpha = radius_break.powf(alpha);
        let effective_radius_alpha = effective_radius.powf(alpha);
        let outer_exponent = (alpha * sersic_index).recip();
        move |radius: T| {
            intensity_prime
                * (T::one() + (radius_break / radius).powf(alpha)).powf(gamma / alpha)
                * (-b
                    * ((radius.powf(alpha) + radius_break_alpha) / effective_radius_alpha)
                        .powf(outer_exponent))
                .exp()
        }
    }
}

radial_light_profile!(CoreSersicLightProfile);

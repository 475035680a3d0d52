use super::light_profile::*;

use statrs::function::gamma::{gamma_lr, ln_gamma};

macro_const! {
    const DOC: &str = r#"
Elliptical Sersic light profile

$$
I(r) = I_e \exp\left\{-b_n \left[\left(\frac{r}{R_e}\right)^{1/n} - 1\right]\right\},
$$
where $r$ is the eccentric radius $\sqrt{q}\sqrt{x^2 + y^2/q^2}$ in the profile frame, $I_e$ is
the intensity at the effective radius $R_e$ and $n$ is the Sersic index. The constant $b_n$ is
chosen so that $R_e$ encloses half of the total luminosity, which is the root of
$P(2n, b_n) = 1/2$ where $P$ is the regularised lower incomplete gamma function.

Exponential ($n = 1$) and de Vaucouleurs ($n = 4$) profiles are the same law with the index fixed.
"#;
}

/// Root of `P(2n, b) = 1/2`, `P` is the regularised lower incomplete gamma function
///
/// Newton iterations are seeded by the asymptotic expansion of Ciotti & Bertin (1999) and kept
/// inside the bracket `(0, 2n)` by falling back to bisection. Median of a gamma distribution is
/// always below its mean, so the root is inside the bracket for any positive index.
pub fn sersic_constant<T: Float>(sersic_index: T) -> T {
    let n: f64 = sersic_index.value_into().unwrap_or(f64::NAN);
    let a = 2.0 * n;
    if a.is_nan() || a <= 0.0 {
        return T::nan();
    }

    let seed = a - 1.0 / 3.0 + 4.0 / (405.0 * n) + 46.0 / (25515.0 * n.powi(2))
        + 131.0 / (1148175.0 * n.powi(3))
        - 2194697.0 / (30690717750.0 * n.powi(4));
    let (mut lower, mut upper) = (0.0, a);
    let mut b = if seed > lower && seed < upper {
        seed
    } else {
        0.5 * a
    };
    let ln_gamma_a = ln_gamma(a);
    for _ in 0..100 {
        let residual = gamma_lr(a, b) - 0.5;
        if residual == 0.0 {
            break;
        }
        if residual < 0.0 {
            lower = b;
        } else {
            upper = b;
        }
        let derivative = ((a - 1.0) * b.ln() - b - ln_gamma_a).exp();
        let newton = b - residual / derivative;
        let next = if newton > lower && newton < upper {
            newton
        } else {
            0.5 * (lower + upper)
        };
        if (next - b).abs() <= 4.0 * f64::EPSILON * b {
            b = next;
            break;
        }
        b = next;
    }
    b.approx().unwrap()
}

/// `I(r)` of a Sersic profile with a precomputed constant
pub(super) fn sersic_law<T: Float>(
    intensity: T,
    effective_radius: T,
    sersic_index: T,
    sersic_constant: T,
) -> impl Fn(T) -> T + Send + Sync + Copy {
    let inverse_index = sersic_index.recip();
    move |radius: T| {
        intensity
            * (-sersic_constant * ((radius / effective_radius).powf(inverse_index) - T::one()))
                .exp()
    }
}

#[doc = DOC!()]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(
    try_from = "SersicLightProfileParameters<T>",
    into = "SersicLightProfileParameters<T>",
    bound = "T: Float"
)]
pub struct SersicLightProfile<T> {
    geometry: EllipticalGeometry<T>,
    intensity: T,
    effective_radius: T,
    sersic_index: T,
}

impl<T> SersicLightProfile<T>
where
    T: Float,
{
    pub fn new(
        centre: Coordinate<T>,
        axis_ratio: T,
        phi: T,
        intensity: T,
        effective_radius: T,
        sersic_index: T,
    ) -> Result<Self, ProfileError> {
        Ok(Self {
            geometry: EllipticalGeometry::new(centre, axis_ratio, phi)?,
            intensity: check_finite("intensity", intensity)?,
            effective_radius: check_positive("effective_radius", effective_radius)?,
            sersic_index: check_positive("sersic_index", sersic_index)?,
        })
    }

    pub fn spherical(
        centre: Coordinate<T>,
        intensity: T,
        effective_radius: T,
        sersic_index: T,
    ) -> Result<Self, ProfileError> {
        Self::new(
            centre,
            T::one(),
            T::zero(),
            intensity,
            effective_radius,
            sersic_index,
        )
    }

    /// Parameters must be validated by the caller
    pub(crate) fn from_geometry(
        geometry: EllipticalGeometry<T>,
        intensity: T,
        effective_radius: T,
        sersic_index: T,
    ) -> Self {
        Self {
            geometry,
            intensity,
            effective_radius,
            sersic_index,
        }
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

    /// Semi-major axis of the half-light ellipse, `R_e / sqrt(q)`
    pub fn elliptical_effective_radius(&self) -> T {
        self.effective_radius / self.axis_ratio().sqrt()
    }

    pub const fn doc() -> &'static str {
        DOC
    }
}

deserialize_checked!(
    SersicLightProfile,
    SersicLightProfileParameters {
        geometry: EllipticalGeometry<T>,
        intensity: T,
        effective_radius: T,
        sersic_index: T,
    },
    |p| Self::new(
        p.geometry.centre(),
        p.geometry.axis_ratio(),
        p.geometry.phi(),
        p.intensity,
        p.effective_radius,
        p.sersic_index,
    ),
);

impl<T> Default for SersicLightProfile<T>
where
    T: Float,
{
    fn default() -> Self {
        Self::from_geometry(
            EllipticalGeometry::default(),
            0.1_f64.approx().unwrap(),
            0.6_f64.approx().unwrap(),
            T::four(),
        )
    }
}

impl<T: Float> RadialLightProfile<T> for SersicLightProfile<T> {
    fn radial_intensity(&self) -> impl Fn(T) -> T + Send + Sync {
        sersic_law(
            self.intensity,
            self.effective_radius,
            self.sersic_index,
            self.sersic_constant(),
        )
    }
}

radial_light_profile!(SersicLightProfile);

use super::mass_profile::*;

macro_const! {
    const DOC: &str = r#"
Spherical Navarro-Frenk-White profile (Wright & Brainerd 2000; Golse & Kneib 2002)

With $x = r / r_s$ and
$$
F(x) = \begin{cases}
    \operatorname{arcosh}(1/x) / \sqrt{1 - x^2}, & x < 1,\\
    1, & x = 1,\\
    \arccos(1/x) / \sqrt{x^2 - 1}, & x > 1,
\end{cases}
$$
the convergence, deflection and potential are
$$
\kappa = 2\kappa_s \frac{1 - F(x)}{x^2 - 1},\quad
\alpha = 4\kappa_s r_s \frac{\ln(x/2) + F(x)}{x},\quad
\psi = 2\kappa_s r_s^2 \left[\ln^2(x/2) - \operatorname{arcosh}^2(1/x)\right]
$$
where the last bracket becomes $\ln^2(x/2) + \arccos^2(1/x)$ for $x > 1$. The convergence at
$x = 1$ is $2\kappa_s/3$, the deflection at the centre is zero.
"#;
}

#[doc = DOC!()]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(
    try_from = "SphericalNfwParameters<T>",
    into = "SphericalNfwParameters<T>",
    bound = "T: Float"
)]
pub struct SphericalNfw<T> {
    geometry: EllipticalGeometry<T>,
    kappa_s: T,
    scale_radius: T,
}

impl<T> SphericalNfw<T>
where
    T: Float,
{
    pub fn new(centre: Coordinate<T>, kappa_s: T, scale_radius: T) -> Result<Self, ProfileError> {
        Ok(Self {
            geometry: EllipticalGeometry::spherical(centre)?,
            kappa_s: check_positive("kappa_s", kappa_s)?,
            scale_radius: check_positive("scale_radius", scale_radius)?,
        })
    }

    pub fn kappa_s(&self) -> T {
        self.kappa_s
    }

    pub fn scale_radius(&self) -> T {
        self.scale_radius
    }

    /// Dimensionless mass within a circle, `4 pi kappa_s r_s^2 (ln(x/2) + F(x))`
    pub fn analytic_mass_within_circle(&self, radius: T) -> T {
        if radius <= T::zero() {
            return T::zero();
        }
        let x = radius / self.scale_radius;
        T::four()
            * T::PI()
            * self.kappa_s
            * self.scale_radius.powi(2)
            * ((x * T::half()).ln() + f_function(x))
    }

    pub const fn doc() -> &'static str {
        DOC
    }
}

fn f_function<T: Float>(x: T) -> T {
    match x.partial_cmp(&T::one()) {
        Some(std::cmp::Ordering::Less) => x.recip().acosh() / (T::one() - x * x).sqrt(),
        Some(std::cmp::Ordering::Greater) => x.recip().acos() / (x * x - T::one()).sqrt(),
        _ => T::one(),
    }
}

deserialize_checked!(
    SphericalNfw,
    SphericalNfwParameters {
        geometry: EllipticalGeometry<T>,
        kappa_s: T,
        scale_radius: T,
    },
    |p| Self::new(p.geometry.centre(), p.kappa_s, p.scale_radius),
);

impl<T> Default for SphericalNfw<T>
where
    T: Float,
{
    fn default() -> Self {
        Self {
            geometry: EllipticalGeometry::default(),
            kappa_s: 0.05_f64.approx().unwrap(),
            scale_radius: T::one(),
        }
    }
}

impl<T: Float> AnalyticMassProfile<T> for SphericalNfw<T> {
    fn convergence_at_radius(&self, radius: T) -> T {
        let x = radius / self.scale_radius;
        if x == T::one() {
            return T::two() * self.kappa_s / T::three();
        }
        T::two() * self.kappa_s * (T::one() - f_function(x)) / (x * x - T::one())
    }

    fn potential_in_frame(&self, c: &TransformedCoordinate<T>) -> T {
        let x = c.radius() / self.scale_radius;
        let log_term = (x * T::half()).ln().powi(2);
        let angular_term = if x < T::one() {
            -x.recip().acosh().powi(2)
        } else {
            x.recip().acos().powi(2)
        };
        T::two() * self.kappa_s * self.scale_radius.powi(2) * (log_term + angular_term)
    }

    fn deflections_in_frame(&self, c: &TransformedCoordinate<T>) -> Coordinate<T> {
        let x = c.radius() / self.scale_radius;
        let magnitude =
            T::four() * self.kappa_s * self.scale_radius * ((x * T::half()).ln() + f_function(x))
                / x;
        radial_vector(c, magnitude)
    }
}

analytic_mass_profile!(SphericalNfw);

#[cfg(test)]
#[allow(clippy::unreadable_literal)]
#[allow(clippy::excessive_precision)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    check_mass_profile!(SphericalNfw);

    fn profile() -> SphericalNfw<f64> {
        SphericalNfw::new(Coordinate::origin(), 0.3, 1.5).unwrap()
    }

    #[test]
    fn field_values_inside_and_outside_scale_radius() {
        let profile = profile();
        for (radius, kappa, alpha, psi) in [
            (
                0.5,
                0.5870311112839668,
                0.42074775644023743,
                0.13921793458058287,
            ),
            (1.5, 0.19999999999999998, 0.5523350749920984, 0.6486115687895718),
            (3.0, 0.07908004238438546, 0.5441398092702654, 1.480440660163404),
        ] {
            let c = Coordinate::new(radius, 0.0);
            assert_relative_eq!(
                profile.surface_density_at_coordinates(c),
                kappa,
                max_relative = 1e-10
            );
            assert_relative_eq!(
                profile.deflections_at_coordinates(c).y,
                alpha,
                max_relative = 1e-10
            );
            assert_relative_eq!(
                profile.potential_at_coordinates(c),
                psi,
                max_relative = 1e-10
            );
        }
    }

    #[test]
    fn convergence_is_continuous_at_scale_radius() {
        let profile = profile();
        assert_relative_eq!(
            profile.convergence_at_radius(1.5 * (1.0 + 1e-4)),
            profile.convergence_at_radius(1.5),
            max_relative = 1e-3
        );
        assert_relative_eq!(
            profile.convergence_at_radius(1.5 * (1.0 - 1e-4)),
            profile.convergence_at_radius(1.5),
            max_relative = 1e-3
        );
    }

    #[test]
    fn enclosed_mass() {
        let profile = profile();
        for &radius in &[0.5, 3.0] {
            assert_relative_eq!(
                profile.dimensionless_mass_within_circle(radius).unwrap(),
                profile.analytic_mass_within_circle(radius),
                max_relative = 1e-7
            );
        }
        assert_relative_eq!(
            profile.analytic_mass_within_circle(3.0),
            5.128396881987651,
            max_relative = 1e-12
        );
    }
}

use super::mass_profile::*;

macro_const! {
    const SPHERICAL_DOC: &str = r#"
Singular isothermal sphere

$\kappa = \theta_E / (2r)$, $\psi = \theta_E r$ and the deflection has the constant magnitude
$\theta_E$, pointing away from the centre. The deflection at the centre itself is zero.
"#;
}

#[doc = SPHERICAL_DOC!()]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(
    try_from = "SphericalIsothermalParameters<T>",
    into = "SphericalIsothermalParameters<T>",
    bound = "T: Float"
)]
pub struct SphericalIsothermal<T> {
    geometry: EllipticalGeometry<T>,
    einstein_radius: T,
}

impl<T> SphericalIsothermal<T>
where
    T: Float,
{
    pub fn new(centre: Coordinate<T>, einstein_radius: T) -> Result<Self, ProfileError> {
        Ok(Self {
            geometry: EllipticalGeometry::spherical(centre)?,
            einstein_radius: check_positive("einstein_radius", einstein_radius)?,
        })
    }

    pub fn einstein_radius(&self) -> T {
        self.einstein_radius
    }

    pub const fn doc() -> &'static str {
        SPHERICAL_DOC
    }
}

deserialize_checked!(
    SphericalIsothermal,
    SphericalIsothermalParameters {
        geometry: EllipticalGeometry<T>,
        einstein_radius: T,
    },
    |p| Self::new(p.geometry.centre(), p.einstein_radius),
);

impl<T> Default for SphericalIsothermal<T>
where
    T: Float,
{
    fn default() -> Self {
        Self {
            geometry: EllipticalGeometry::default(),
            einstein_radius: T::one(),
        }
    }
}

impl<T: Float> AnalyticMassProfile<T> for SphericalIsothermal<T> {
    fn convergence_at_radius(&self, radius: T) -> T {
        self.einstein_radius / (T::two() * radius)
    }

    fn potential_in_frame(&self, c: &TransformedCoordinate<T>) -> T {
        self.einstein_radius * c.radius()
    }

    fn deflections_in_frame(&self, c: &TransformedCoordinate<T>) -> Coordinate<T> {
        radial_vector(c, self.einstein_radius)
    }
}

analytic_mass_profile!(SphericalIsothermal);

macro_const! {
    const ELLIPTICAL_DOC: &str = r#"
Singular isothermal ellipsoid (Kormann et al. 1994; Keeton 2001)

In the profile frame, with $\xi = \sqrt{x^2 + y^2/q^2}$ the elliptical radius and
$\theta_E' = \theta_E / (1 + q)$ the rescaled Einstein radius:
$$
\kappa = \frac{\theta_E'}{\xi},\quad
\alpha_x = \frac{2\theta_E' q}{\sqrt{1 - q^2}}
    \arctan\frac{\sqrt{1 - q^2}\,x}{\sqrt{q^2 x^2 + y^2}},\quad
\alpha_y = \frac{2\theta_E' q}{\sqrt{1 - q^2}}
    \operatorname{artanh}\frac{\sqrt{1 - q^2}\,y}{\sqrt{q^2 x^2 + y^2}},
$$
and $\psi = x\alpha_x + y\alpha_y$. For $q = 1$ it is the singular isothermal sphere.
"#;
}

#[doc = ELLIPTICAL_DOC!()]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(
    try_from = "EllipticalIsothermalParameters<T>",
    into = "EllipticalIsothermalParameters<T>",
    bound = "T: Float"
)]
pub struct EllipticalIsothermal<T> {
    geometry: EllipticalGeometry<T>,
    einstein_radius: T,
}

impl<T> EllipticalIsothermal<T>
where
    T: Float,
{
    pub fn new(
        centre: Coordinate<T>,
        axis_ratio: T,
        phi: T,
        einstein_radius: T,
    ) -> Result<Self, ProfileError> {
        Ok(Self {
            geometry: EllipticalGeometry::new(centre, axis_ratio, phi)?,
            einstein_radius: check_positive("einstein_radius", einstein_radius)?,
        })
    }

    pub fn einstein_radius(&self) -> T {
        self.einstein_radius
    }

    /// `theta_E / (1 + q)`
    pub fn einstein_radius_rescaled(&self) -> T {
        self.einstein_radius / (T::one() + self.axis_ratio())
    }

    pub const fn doc() -> &'static str {
        ELLIPTICAL_DOC
    }
}

deserialize_checked!(
    EllipticalIsothermal,
    EllipticalIsothermalParameters {
        geometry: EllipticalGeometry<T>,
        einstein_radius: T,
    },
    |p| Self::new(
        p.geometry.centre(),
        p.geometry.axis_ratio(),
        p.geometry.phi(),
        p.einstein_radius,
    ),
);

impl<T> Default for EllipticalIsothermal<T>
where
    T: Float,
{
    fn default() -> Self {
        Self {
            geometry: EllipticalGeometry::new_unchecked(
                Coordinate::origin(),
                0.9_f64.approx().unwrap(),
                T::zero(),
            ),
            einstein_radius: T::one(),
        }
    }
}

impl<T> From<SphericalIsothermal<T>> for EllipticalIsothermal<T> {
    fn from(profile: SphericalIsothermal<T>) -> Self {
        Self {
            geometry: profile.geometry,
            einstein_radius: profile.einstein_radius,
        }
    }
}

impl<T: Float> AnalyticMassProfile<T> for EllipticalIsothermal<T> {
    fn convergence_at_radius(&self, radius: T) -> T {
        self.einstein_radius_rescaled() / radius
    }

    #[inline]
    fn profile_radius(&self, frame: &ReferenceFrame<T>, c: &TransformedCoordinate<T>) -> T {
        frame.elliptical_radius(c)
    }

    fn potential_in_frame(&self, c: &TransformedCoordinate<T>) -> T {
        let deflections = self.deflections_in_frame(c);
        c.x() * deflections.x + c.y() * deflections.y
    }

    fn deflections_in_frame(&self, c: &TransformedCoordinate<T>) -> Coordinate<T> {
        let q = self.axis_ratio();
        if q == T::one() {
            return radial_vector(c, self.einstein_radius);
        }
        let psi = (q * q * c.x() * c.x() + c.y() * c.y()).sqrt();
        if psi == T::zero() {
            return Coordinate::origin();
        }
        let eccentricity = (T::one() - q * q).sqrt();
        let factor = T::two() * self.einstein_radius_rescaled() * q / eccentricity;
        Coordinate::new(
            factor * (eccentricity * c.y() / psi).atanh(),
            factor * (eccentricity * c.x() / psi).atan(),
        )
    }
}

analytic_mass_profile!(EllipticalIsothermal);

#[cfg(test)]
#[allow(clippy::unreadable_literal)]
#[allow(clippy::excessive_precision)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    mod spherical {
        use super::*;

        check_mass_profile!(SphericalIsothermal);
    }

    mod elliptical {
        use super::*;

        check_mass_profile!(EllipticalIsothermal);
    }

    #[test]
    fn spherical_fields() {
        let profile = SphericalIsothermal::new(Coordinate::new(0.5, 0.0), 2.0).unwrap();
        let c = Coordinate::new(0.5, 1.0);
        assert_relative_eq!(profile.surface_density_at_coordinates(c), 1.0);
        assert_relative_eq!(profile.potential_at_coordinates(c), 2.0);
        assert_eq!(profile.deflections_at_coordinates(c), Coordinate::new(0.0, 2.0));
    }

    #[test]
    fn spherical_mass_is_linear_in_radius() {
        let profile = SphericalIsothermal::new(Coordinate::origin(), 1.3).unwrap();
        assert_relative_eq!(
            profile.dimensionless_mass_within_circle(2.0).unwrap(),
            std::f64::consts::PI * 1.3 * 2.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            profile.mass_within_ellipse(2.0, 10.0).unwrap(),
            10.0 * std::f64::consts::PI * 1.3 * 2.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn elliptical_deflections() {
        let profile = EllipticalIsothermal::new(Coordinate::origin(), 0.5, 0.0, 1.0).unwrap();
        let along_x = profile.deflections_at_coordinates(Coordinate::new(0.0, 1.0));
        assert_relative_eq!(along_x.y, 0.0, epsilon = 1e-15);
        assert_relative_eq!(along_x.x, 0.8061330507707635, max_relative = 1e-12);
        let along_y = profile.deflections_at_coordinates(Coordinate::new(1.0, 0.0));
        assert_relative_eq!(along_y.y, 1.013794661734595, max_relative = 1e-12);
        assert_relative_eq!(along_y.x, 0.0, epsilon = 1e-15);
        let diagonal = Coordinate::new(0.5, 0.5);
        let deflections = profile.deflections_at_coordinates(diagonal);
        assert_relative_eq!(deflections.y, 0.7942172981218026, max_relative = 1e-12);
        assert_relative_eq!(deflections.x, 0.5073431125279511, max_relative = 1e-12);
        assert_relative_eq!(
            profile.potential_at_coordinates(diagonal),
            0.6507802053248768,
            max_relative = 1e-12
        );
    }

    #[test]
    fn rotation_by_ninety_degrees_swaps_axes() {
        let profile = EllipticalIsothermal::new(Coordinate::origin(), 0.5, 0.0, 1.0).unwrap();
        let rotated = EllipticalIsothermal::new(Coordinate::origin(), 0.5, 90.0, 1.0).unwrap();
        let deflections = profile.deflections_at_coordinates(Coordinate::new(0.0, 1.0));
        let rotated_deflections = rotated.deflections_at_coordinates(Coordinate::new(1.0, 0.0));
        assert_relative_eq!(rotated_deflections.y, deflections.x, max_relative = 1e-12);
        assert_relative_eq!(rotated_deflections.x, deflections.y, epsilon = 1e-12);
        assert_relative_eq!(
            rotated.surface_density_at_coordinates(Coordinate::new(1.0, 0.0)),
            profile.surface_density_at_coordinates(Coordinate::new(0.0, 1.0)),
            max_relative = 1e-12
        );
    }

    #[test]
    fn spherical_limit() {
        let sphere = SphericalIsothermal::new(Coordinate::new(0.1, 0.2), 1.4).unwrap();
        let exact = EllipticalIsothermal::from(sphere.clone());
        let nearly = EllipticalIsothermal::new(Coordinate::new(0.1, 0.2), 0.99999, 30.0, 1.4)
            .unwrap();
        for c in [Coordinate::new(0.7, -0.3), Coordinate::new(-1.5, 2.0)] {
            assert_eq!(
                exact.deflections_at_coordinates(c),
                sphere.deflections_at_coordinates(c)
            );
            let a = nearly.deflections_at_coordinates(c);
            let b = sphere.deflections_at_coordinates(c);
            assert_relative_eq!(a.y, b.y, max_relative = 1e-4);
            assert_relative_eq!(a.x, b.x, max_relative = 1e-4);
            assert_relative_eq!(
                exact.surface_density_at_coordinates(c),
                sphere.surface_density_at_coordinates(c),
                max_relative = 1e-14
            );
        }
    }

    #[test]
    fn elliptical_mass() {
        let profile = EllipticalIsothermal::new(Coordinate::origin(), 0.5, 45.0, 1.0).unwrap();
        // 2 pi q theta_E' a
        assert_relative_eq!(
            profile.dimensionless_mass_within_ellipse(2.0).unwrap(),
            2.0 * std::f64::consts::PI * 0.5 * (1.0 / 1.5) * 2.0,
            max_relative = 1e-10
        );
        assert_relative_eq!(
            profile.dimensionless_mass_within_ellipse(1.0).unwrap(),
            crate::tests::pixel_mass_within_ellipse(&profile, 1.0),
            max_relative = 0.02
        );
    }

    #[test]
    fn deserialization_is_validated() {
        let stretched = r#"{"EllipticalIsothermal":{
            "geometry": {"centre": {"y": 0.0, "x": 0.0}, "axis_ratio": 2.0, "phi": 0.0},
            "einstein_radius": 1.0
        }}"#;
        assert!(serde_json::from_str::<MassProfile<f64>>(stretched).is_err());
        let massless = r#"{
            "geometry": {"centre": {"y": 0.0, "x": 0.0}, "axis_ratio": 1.0, "phi": 0.0},
            "einstein_radius": 0.0
        }"#;
        assert!(serde_json::from_str::<SphericalIsothermal<f64>>(massless).is_err());

        let profile =
            EllipticalIsothermal::<f64>::new(Coordinate::new(0.1, 0.2), 0.7, 15.0, 1.2).unwrap();
        let json = serde_json::to_string(&MassProfile::from(profile.clone())).unwrap();
        assert_eq!(
            serde_json::from_str::<MassProfile<f64>>(&json).unwrap(),
            MassProfile::from(profile)
        );
    }

    #[test]
    fn doc() {
        assert!(SphericalIsothermal::<f64>::doc().contains("isothermal sphere"));
        assert!(EllipticalIsothermal::<f64>::doc().contains("Keeton"));
    }
}

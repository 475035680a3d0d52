use super::mass_profile::*;

macro_const! {
    const DOC: &str = r#"
Point mass lens

$\psi = \theta_E^2 \ln r$, $\vec\alpha = \theta_E^2 \vec r / r^2$. The convergence is a delta
function at the centre, so it is zero at every grid coordinate while the mass within any aperture
containing the centre is $\pi\theta_E^2$. The deflection at the centre itself is zero.
"#;
}

#[doc = DOC!()]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(
    try_from = "PointMassParameters<T>",
    into = "PointMassParameters<T>",
    bound = "T: Float"
)]
pub struct PointMass<T> {
    geometry: EllipticalGeometry<T>,
    einstein_radius: T,
}

impl<T> PointMass<T>
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
        DOC
    }
}

deserialize_checked!(
    PointMass,
    PointMassParameters {
        geometry: EllipticalGeometry<T>,
        einstein_radius: T,
    },
    |p| Self::new(p.geometry.centre(), p.einstein_radius),
);

impl<T> Default for PointMass<T>
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

impl<T: Float> AnalyticMassProfile<T> for PointMass<T> {
    fn convergence_at_radius(&self, _radius: T) -> T {
        T::zero()
    }

    fn potential_in_frame(&self, c: &TransformedCoordinate<T>) -> T {
        self.einstein_radius.powi(2) * c.radius().ln()
    }

    fn deflections_in_frame(&self, c: &TransformedCoordinate<T>) -> Coordinate<T> {
        let radius = c.radius();
        radial_vector(c, self.einstein_radius.powi(2) / radius)
    }

    fn mass_within_radius(
        &self,
        radius: T,
        _area_factor: T,
        _quadrature: &Quadrature<T>,
    ) -> Result<T, IntegrationError> {
        if radius > T::zero() {
            Ok(T::PI() * self.einstein_radius.powi(2))
        } else {
            Ok(T::zero())
        }
    }
}

analytic_mass_profile!(PointMass);

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    check_mass_profile!(PointMass);

    #[test]
    fn deflection_magnitude() {
        let profile = PointMass::new(Coordinate::new(1.0, 1.0), 2.0).unwrap();
        let deflections = profile.deflections_at_coordinates(Coordinate::new(1.0, 3.0));
        assert_relative_eq!(deflections.y, 0.0, epsilon = 1e-15);
        assert_relative_eq!(deflections.x, 2.0, max_relative = 1e-15);
        assert_eq!(
            profile.deflections_at_coordinates(Coordinate::new(1.0, 1.0)),
            Coordinate::origin()
        );
    }

    #[test]
    fn mass_is_point_like() {
        let profile = PointMass::new(Coordinate::origin(), 1.5).unwrap();
        let expected = std::f64::consts::PI * 2.25;
        assert_relative_eq!(profile.dimensionless_mass_within_circle(0.1).unwrap(), expected);
        assert_relative_eq!(profile.dimensionless_mass_within_ellipse(10.0).unwrap(), expected);
        assert_relative_eq!(profile.mass_within_circle(1.0, 2.0).unwrap(), 2.0 * expected);
        assert_eq!(profile.dimensionless_mass_within_circle(0.0), Ok(0.0));
    }

    #[test]
    fn non_positive_einstein_radius() {
        assert_eq!(
            PointMass::new(Coordinate::origin(), 0.0),
            Err(ProfileError::NonPositive {
                parameter: "einstein_radius",
                value: 0.0
            })
        );
    }
}

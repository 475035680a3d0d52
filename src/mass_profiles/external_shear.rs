use super::mass_profile::*;

macro_const! {
    const DOC: &str = r#"
External shear field

In the frame rotated by the shear angle $\phi$:
$\psi = \frac{\gamma}{2}(x^2 - y^2)$, $\alpha_y = -\gamma y$, $\alpha_x = \gamma x$, and the
convergence is zero everywhere. The field has no centre, so it is always evaluated about the origin
and carries no mass.
"#;
}

#[doc = DOC!()]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(
    try_from = "ExternalShearParameters<T>",
    into = "ExternalShearParameters<T>",
    bound = "T: Float"
)]
pub struct ExternalShear<T> {
    geometry: EllipticalGeometry<T>,
    magnitude: T,
}

impl<T> ExternalShear<T>
where
    T: Float,
{
    pub fn new(magnitude: T, phi: T) -> Result<Self, ProfileError> {
        Ok(Self {
            geometry: EllipticalGeometry::new(Coordinate::origin(), T::one(), phi)?,
            magnitude: check_finite("magnitude", magnitude)?,
        })
    }

    pub fn magnitude(&self) -> T {
        self.magnitude
    }

    pub const fn doc() -> &'static str {
        DOC
    }
}

deserialize_checked!(
    ExternalShear,
    ExternalShearParameters {
        geometry: EllipticalGeometry<T>,
        magnitude: T,
    },
    |p| Self::new(p.magnitude, p.geometry.phi()),
);

impl<T> Default for ExternalShear<T>
where
    T: Float,
{
    fn default() -> Self {
        Self {
            geometry: EllipticalGeometry::default(),
            magnitude: 0.2_f64.approx().unwrap(),
        }
    }
}

impl<T: Float> AnalyticMassProfile<T> for ExternalShear<T> {
    fn convergence_at_radius(&self, _radius: T) -> T {
        T::zero()
    }

    fn potential_in_frame(&self, c: &TransformedCoordinate<T>) -> T {
        self.magnitude * T::half() * (c.x() * c.x() - c.y() * c.y())
    }

    fn deflections_in_frame(&self, c: &TransformedCoordinate<T>) -> Coordinate<T> {
        Coordinate::new(-self.magnitude * c.y(), self.magnitude * c.x())
    }
}

analytic_mass_profile!(ExternalShear);

use crate::error::{IntegrationError, ProfileError};
use crate::geometry::check_positive;
use crate::integrate::Quadrature;

use enum_dispatch::enum_dispatch;
use macro_const::macro_const;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Speed of light, km/s
pub const SPEED_OF_LIGHT: f64 = 299_792.458;

/// Arcseconds in one radian
pub const ARCSEC_PER_RADIAN: f64 = 206_264.806_247_096_36;

macro_const! {
    const COSMOLOGY_DOC: &'static str = r"Background cosmology providing the distances lensing depends on

All distances are in Mpc. Redshift arguments are expected to be non-negative.
";
}

#[doc = COSMOLOGY_DOC!()]
#[enum_dispatch]
pub trait CosmologyTrait: Send + Sync + Clone + Debug {
    /// Hubble distance $c / H_0$
    fn hubble_distance(&self) -> f64;

    /// Inverse of the dimensionless Hubble parameter, $1 / E(z)$
    fn inv_efunc(&self, z: f64) -> f64;

    /// Line-of-sight comoving distance from the observer
    fn comoving_distance(&self, z: f64) -> Result<f64, IntegrationError> {
        self.comoving_distance_z1z2(0.0, z)
    }

    fn comoving_distance_z1z2(&self, z1: f64, z2: f64) -> Result<f64, IntegrationError> {
        let quadrature = Quadrature::default();
        Ok(self.hubble_distance() * quadrature.integrate(|z| self.inv_efunc(z), z1, z2)?)
    }

    fn angular_diameter_distance(&self, z: f64) -> Result<f64, IntegrationError> {
        Ok(self.comoving_distance(z)? / (1.0 + z))
    }

    /// Angular diameter distance of a source at `z2` seen from `z1`, valid for flat geometry
    fn angular_diameter_distance_z1z2(&self, z1: f64, z2: f64) -> Result<f64, IntegrationError> {
        Ok(self.comoving_distance_z1z2(z1, z2)? / (1.0 + z2))
    }

    /// Proper angular scale, infinite at zero redshift
    fn arcsec_per_kpc_proper(&self, z: f64) -> Result<f64, IntegrationError> {
        Ok(ARCSEC_PER_RADIAN / (1e3 * self.angular_diameter_distance(z)?))
    }

    fn kpc_per_arcsec_proper(&self, z: f64) -> Result<f64, IntegrationError> {
        Ok(self.arcsec_per_kpc_proper(z)?.recip())
    }

    /// Multi-plane deflection scaling of plane `z_j` as seen by plane `z_i`
    ///
    /// $$
    /// \beta_{ji} = \frac{D_{ji} D_{0f}}{D_{0i} D_{jf}},
    /// $$
    /// where $D$ are angular diameter distances and $f$ is the final plane. It equals one when
    /// plane $i$ is the final plane.
    fn scaling_factor_between_redshifts(
        &self,
        z_j: f64,
        z_i: f64,
        z_final: f64,
    ) -> Result<f64, IntegrationError> {
        let d_ji = self.angular_diameter_distance_z1z2(z_j, z_i)?;
        let d_0f = self.angular_diameter_distance(z_final)?;
        let d_0i = self.angular_diameter_distance(z_i)?;
        let d_jf = self.angular_diameter_distance_z1z2(z_j, z_final)?;
        Ok((d_ji * d_0f) / (d_0i * d_jf))
    }
}

#[doc = COSMOLOGY_DOC!()]
#[enum_dispatch(CosmologyTrait)]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[non_exhaustive]
pub enum Cosmology {
    FlatLambdaCdm(FlatLambdaCdm),
}

impl Cosmology {
    pub fn flat_lambda_cdm(h0: f64, omega_m: f64) -> Result<Self, ProfileError> {
        Ok(FlatLambdaCdm::new(h0, omega_m)?.into())
    }

    pub fn planck15() -> Self {
        FlatLambdaCdm::planck15().into()
    }
}

impl Default for Cosmology {
    fn default() -> Self {
        Self::planck15()
    }
}

/// Flat universe of matter and a cosmological constant, radiation neglected
///
/// $E(z) = \sqrt{\Omega_m (1 + z)^3 + 1 - \Omega_m}$
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(
    rename = "FlatLambdaCdm",
    try_from = "FlatLambdaCdmParameters",
    into = "FlatLambdaCdmParameters"
)]
pub struct FlatLambdaCdm {
    /// Hubble constant, km/s/Mpc
    h0: f64,
    omega_m: f64,
}

impl FlatLambdaCdm {
    pub fn new(h0: f64, omega_m: f64) -> Result<Self, ProfileError> {
        Ok(Self {
            h0: check_positive("h0", h0)?,
            omega_m: check_positive("omega_m", omega_m)?,
        })
    }

    /// Planck 2015 parameters
    pub fn planck15() -> Self {
        Self {
            h0: 67.74,
            omega_m: 0.3075,
        }
    }

    pub fn h0(&self) -> f64 {
        self.h0
    }

    pub fn omega_m(&self) -> f64 {
        self.omega_m
    }

    pub fn omega_lambda(&self) -> f64 {
        1.0 - self.omega_m
    }
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(rename = "FlatLambdaCdm")]
struct FlatLambdaCdmParameters {
    h0: f64,
    omega_m: f64,
}

impl From<FlatLambdaCdm> for FlatLambdaCdmParameters {
    fn from(cosmology: FlatLambdaCdm) -> Self {
        Self {
            h0: cosmology.h0,
            omega_m: cosmology.omega_m,
        }
    }
}

impl TryFrom<FlatLambdaCdmParameters> for FlatLambdaCdm {
    type Error = ProfileError;

    fn try_from(p: FlatLambdaCdmParameters) -> Result<Self, Self::Error> {
        Self::new(p.h0, p.omega_m)
    }
}

impl CosmologyTrait for FlatLambdaCdm {
    fn hubble_distance(&self) -> f64 {
        SPEED_OF_LIGHT / self.h0
    }

    fn inv_efunc(&self, z: f64) -> f64 {
        (self.omega_m * (1.0 + z).powi(3) + self.omega_lambda())
            .sqrt()
            .recip()
    }
}

use crate::error::GridError;
use crate::float_trait::Float;

use macro_const::macro_const;
use ndarray::{Array1, ArrayView1, Zip};
use ndarray_stats::QuantileExt;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

macro_const! {
    const DOC: &str = r#"
Noise-map scaling hyper-parameters of a galaxy

The contribution map of the galaxy is
$$
c_i = \frac{g_i / (m_i + f_c)}{\max_j g_j / (m_j + f_c)},
$$
where $g$ is a model image of the galaxy and $m$ the model image of the whole observation from a
previous fit, and pixels with $c_i$ below a minimum value are set to zero. The scaled noise of the
galaxy is $f_n (\sigma_i c_i)^{p_n}$.

`id` identifies the galaxy across fits. It is assigned by the caller and does not take part in
equality.
"#;
}

#[doc = DOC!()]
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct HyperGalaxy<T> {
    pub id: usize,
    pub contribution_factor: T,
    pub noise_factor: T,
    pub noise_power: T,
}

impl<T> HyperGalaxy<T>
where
    T: Float,
{
    pub fn new(id: usize, contribution_factor: T, noise_factor: T, noise_power: T) -> Self {
        Self {
            id,
            contribution_factor,
            noise_factor,
            noise_power,
        }
    }

    /// Hyper-galaxies with default parameters and ids `0..n`
    pub fn sequence(n: usize) -> Vec<Self> {
        (0..n)
            .map(|id| Self {
                id,
                ..Self::default()
            })
            .collect()
    }

    pub fn contributions_from_hyper_images(
        &self,
        hyper_model_image: ArrayView1<T>,
        hyper_galaxy_image: ArrayView1<T>,
        minimum_value: T,
    ) -> Result<Array1<T>, GridError> {
        check_same_len(hyper_model_image.len(), hyper_galaxy_image.len())?;
        let mut contributions = Zip::from(&hyper_galaxy_image)
            .and(&hyper_model_image)
            .map_collect(|&galaxy, &model| galaxy / (model + self.contribution_factor));
        let max = match contributions.max() {
            Ok(&max) if max > T::zero() => max,
            _ => return Ok(Array1::zeros(contributions.len())),
        };
        contributions.mapv_inplace(|c| {
            let c = c / max;
            if c < minimum_value { T::zero() } else { c }
        });
        Ok(contributions)
    }

    pub fn scaled_noise_from_contributions(
        &self,
        noise_map: ArrayView1<T>,
        contributions: ArrayView1<T>,
    ) -> Result<Array1<T>, GridError> {
        check_same_len(noise_map.len(), contributions.len())?;
        Ok(Zip::from(&noise_map)
            .and(&contributions)
            .map_collect(|&noise, &c| self.noise_factor * (noise * c).powf(self.noise_power)))
    }

    pub const fn doc() -> &'static str {
        DOC
    }
}

fn check_same_len(expected: usize, actual: usize) -> Result<(), GridError> {
    if actual == expected {
        Ok(())
    } else {
        Err(GridError::LengthMismatch { actual, expected })
    }
}

impl<T> Default for HyperGalaxy<T>
where
    T: Float,
{
    fn default() -> Self {
        Self::new(0, T::zero(), T::zero(), T::one())
    }
}

impl<T: PartialEq> PartialEq for HyperGalaxy<T> {
    fn eq(&self, other: &Self) -> bool {
        self.contribution_factor == other.contribution_factor
            && self.noise_factor == other.noise_factor
            && self.noise_power == other.noise_power
    }
}

use crate::error::IntegrationError;
use crate::float_trait::Float;
use crate::geometry::as_f64;

use conv::prelude::*;
use macro_const::macro_const;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Kronrod abscissae of the 15-point rule, the odd entries are the 7-point Gauss abscissae
const XGK: [f64; 8] = [
    0.991455371120812639206854697526329,
    0.949107912342758524526189684047851,
    0.864864423359769072789712788640926,
    0.741531185599394439863864773280788,
    0.586087235467691130294144845693013,
    0.405845151377397166906606412076961,
    0.207784955007898467600689403773245,
    0.000000000000000000000000000000000,
];

const WGK: [f64; 8] = [
    0.022935322010529224963732008058970,
    0.063092092629978553290700663189204,
    0.104790010322250183839876322541518,
    0.140653259715525918745189590510238,
    0.169004726639267902826583426598550,
    0.190350578064785409913256402421014,
    0.204432940075298892414161999234649,
    0.209482141084727828012999174891714,
];

const WG: [f64; 4] = [
    0.129484966168869693270611432679082,
    0.279705391489276667901467771423780,
    0.381830050505118944950369775488975,
    0.417959183673469387755102040816327,
];

macro_const! {
    const DOC: &str = r#"
Globally adaptive 15-point Gauss-Kronrod quadrature

The interval with the largest error estimate is bisected until the total error estimate is
below $\max(\epsilon_\mathrm{abs}, \epsilon_\mathrm{rel} |I|)$. Error estimate of an interval is
the difference between its Kronrod and Gauss results. Running out of subdivisions is an error,
the partial result is never returned.
"#;
}

#[doc = DOC!()]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Quadrature<T> {
    pub absolute_tolerance: T,
    pub relative_tolerance: T,
    pub max_subdivisions: usize,
}

#[derive(Clone, Copy, Debug)]
struct Interval<T> {
    lower: T,
    upper: T,
    result: T,
    error: T,
}

impl<T> Quadrature<T>
where
    T: Float,
{
    pub fn new(absolute_tolerance: T, relative_tolerance: T, max_subdivisions: usize) -> Self {
        Self {
            absolute_tolerance,
            relative_tolerance,
            max_subdivisions,
        }
    }

    pub fn default_absolute_tolerance() -> T {
        1.49e-8_f64.approx().unwrap()
    }

    /// Also the lower limit of the relative tolerance in units of 50 machine epsilons
    pub fn default_relative_tolerance() -> T {
        1.49e-8_f64.approx().unwrap()
    }

    pub fn default_max_subdivisions() -> usize {
        50
    }

    pub const fn doc() -> &'static str {
        DOC
    }

    fn effective_relative_tolerance(&self) -> T {
        let floor: T = T::epsilon() * 50_f32.value_as::<T>().unwrap();
        self.relative_tolerance.max(floor)
    }

    fn gauss_kronrod<F>(f: &F, lower: T, upper: T) -> Interval<T>
    where
        F: Fn(T) -> T,
    {
        let centre = T::half() * (lower + upper);
        let half_length = T::half() * (upper - lower);
        let f_centre = f(centre);
        let mut result_gauss = f_centre * WG[3].approx().unwrap();
        let mut result_kronrod = f_centre * WGK[7].approx().unwrap();
        for j in 0..7 {
            let abscissa = half_length * XGK[j].approx().unwrap();
            let pair = f(centre - abscissa) + f(centre + abscissa);
            result_kronrod += pair * WGK[j].approx().unwrap();
            if j % 2 == 1 {
                result_gauss += pair * WG[j / 2].approx().unwrap();
            }
        }
        Interval {
            lower,
            upper,
            result: result_kronrod * half_length,
            error: ((result_kronrod - result_gauss) * half_length).abs(),
        }
    }

    /// Definite integral of `f` over `[lower, upper]`
    pub fn integrate<F>(&self, f: F, lower: T, upper: T) -> Result<T, IntegrationError>
    where
        F: Fn(T) -> T,
    {
        if lower == upper {
            return Ok(T::zero());
        }
        if upper < lower {
            return self.integrate(f, upper, lower).map(|value| -value);
        }
        let relative_tolerance = self.effective_relative_tolerance();

        let mut intervals = vec![Self::gauss_kronrod(&f, lower, upper)];
        loop {
            let (result, error) = intervals
                .iter()
                .fold((T::zero(), T::zero()), |(result, error), interval| {
                    (result + interval.result, error + interval.error)
                });
            if !result.is_finite() || !error.is_finite() {
                return Err(IntegrationError::NonFinite {
                    lower: as_f64(lower),
                    upper: as_f64(upper),
                });
            }
            if error <= self.absolute_tolerance.max(relative_tolerance * result.abs()) {
                log::trace!("quadrature converged with {} intervals", intervals.len());
                return Ok(result);
            }
            if intervals.len() >= self.max_subdivisions {
                return Err(IntegrationError::NotConverged {
                    subdivisions: intervals.len(),
                    estimated_error: as_f64(error),
                });
            }

            let worst = intervals
                .iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| a.error.partial_cmp(&b.error).unwrap_or(Ordering::Equal))
                .map(|(index, _)| index)
                .unwrap_or(0);
            let interval = intervals.swap_remove(worst);
            let middle = T::half() * (interval.lower + interval.upper);
            intervals.push(Self::gauss_kronrod(&f, interval.lower, middle));
            intervals.push(Self::gauss_kronrod(&f, middle, interval.upper));
        }
    }
}

impl<T> Default for Quadrature<T>
where
    T: Float,
{
    fn default() -> Self {
        Self::new(
            Self::default_absolute_tolerance(),
            Self::default_relative_tolerance(),
            Self::default_max_subdivisions(),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unreadable_literal)]
#[allow(clippy::excessive_precision)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn polynomial_is_exact() {
        let quadrature = Quadrature::<f64>::default();
        let value = quadrature
            .integrate(|x| 3.0 * x.powi(5) - x * x + 1.0, -1.0, 2.0)
            .unwrap();
        assert_relative_eq!(value, 31.5 - 3.0 + 3.0, max_relative = 1e-14);
    }

    #[test]
    fn smooth_functions() {
        let quadrature = Quadrature::<f64>::default();
        assert_relative_eq!(
            quadrature.integrate(f64::exp, 0.0, 1.0).unwrap(),
            std::f64::consts::E - 1.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            quadrature.integrate(f64::sin, 0.0, std::f64::consts::PI).unwrap(),
            2.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn integrable_singularity_at_bound() {
        let quadrature = Quadrature::<f64>::default();
        assert_relative_eq!(
            quadrature.integrate(f64::ln, 0.0, 1.0).unwrap(),
            -1.0,
            max_relative = 1e-7
        );
    }

    #[test]
    fn reversed_and_empty_ranges() {
        let quadrature = Quadrature::<f32>::default();
        assert_eq!(quadrature.integrate(|x| x, 1.0, 1.0), Ok(0.0));
        assert_relative_eq!(
            quadrature.integrate(|x| x, 2.0, 0.0).unwrap(),
            -2.0,
            max_relative = 1e-6
        );
    }

    #[test]
    fn subdivision_budget_is_reported() {
        let quadrature = Quadrature::new(1e-14, 1e-14, 2);
        let result = quadrature.integrate(|x: f64| (50.0 * x).sin(), 0.0, 10.0);
        assert!(matches!(
            result,
            Err(IntegrationError::NotConverged {
                subdivisions: 2,
                ..
            })
        ));
    }

    #[test]
    fn non_finite_integrand() {
        let quadrature = Quadrature::<f64>::default();
        assert_eq!(
            quadrature.integrate(|_| f64::NAN, 0.0, 1.0),
            Err(IntegrationError::NonFinite {
                lower: 0.0,
                upper: 1.0
            })
        );
    }

    #[test]
    fn serialization() {
        let quadrature = Quadrature::<f64>::default();
        let json = serde_json::to_string(&quadrature).unwrap();
        assert_eq!(
            serde_json::from_str::<Quadrature<f64>>(&json).unwrap(),
            quadrature
        );
    }

    #[test]
    fn doc() {
        assert!(Quadrature::<f64>::doc().contains("Gauss-Kronrod"));
    }
}

use std::f64::consts::{LN_2, LOG2_E};

/// A strategy for evaluating `exp(c·x)` in the acceptance test.
///
/// The coefficient is set once per sweep (to `-beta`) and the function is then
/// evaluated once per proposed move, so implementations should make `eval`
/// cheap.
pub trait Exponential {
    /// Set the coefficient `c` used by subsequent calls to [`Exponential::eval`].
    fn set_coefficient(&mut self, c: f64);

    /// The current coefficient.
    fn coefficient(&self) -> f64;

    /// Evaluate (an approximation of) `exp(c·x)`.
    fn eval(&self, x: f64) -> f64;
}

impl<E: Exponential + ?Sized> Exponential for Box<E> {
    fn set_coefficient(&mut self, c: f64) {
        (**self).set_coefficient(c)
    }

    fn coefficient(&self) -> f64 {
        (**self).coefficient()
    }

    fn eval(&self, x: f64) -> f64 {
        (**self).eval(x)
    }
}

/// The platform exponential.
#[derive(Clone, Debug, Default)]
pub struct ExactExp {
    coefficient: f64,
}

impl Exponential for ExactExp {
    fn set_coefficient(&mut self, c: f64) {
        self.coefficient = c;
    }

    fn coefficient(&self) -> f64 {
        self.coefficient
    }

    fn eval(&self, x: f64) -> f64 {
        (self.coefficient * x).exp()
    }
}

/// A fast rational approximation of the exponential.
///
/// The argument `y = c·x` is reduced to `y = k·ln2 + r` with `|r| ≤ ln2 / 2`,
/// `exp(r)` is evaluated with the [4/4] Padé approximant and the result is
/// scaled by `2^k` by writing the exponent bits directly.
///
/// The relative error is below [`ApproxExp::MAX_RELATIVE_ERROR`] for
/// `y ∈ [-708, 709]`. Outside that range the result saturates: `0` below,
/// `+∞` above. NaN propagates.
#[derive(Clone, Debug, Default)]
pub struct ApproxExp {
    coefficient: f64,
}

impl ApproxExp {
    /// The documented bound on `|approx - exact| / exact` inside the supported range.
    pub const MAX_RELATIVE_ERROR: f64 = 1e-10;

    const MIN_ARG: f64 = -708.0;
    const MAX_ARG: f64 = 709.0;

    // ln2 split so that k * LN2_HI is exact for every k we can produce
    const LN2_HI: f64 = 6.931_471_803_691_238_2e-1;
    const LN2_LO: f64 = 1.908_214_929_270_587_7e-10;

    fn approx(y: f64) -> f64 {
        if y.is_nan() {
            return f64::NAN;
        } else if y > Self::MAX_ARG {
            return f64::INFINITY;
        } else if y < Self::MIN_ARG {
            return 0.0;
        }

        let k = (y * LOG2_E).round();
        let r = (y - k * Self::LN2_HI) - k * Self::LN2_LO;
        debug_assert!(r.abs() <= LN_2);

        // P(r) / P(-r) with P(r) = 1 + r/2 + 3r²/28 + r³/84 + r⁴/1680
        let even = 1.0 + r * r * (3.0 / 28.0 + r * r / 1680.0);
        let odd = r * (0.5 + r * r / 84.0);
        let mantissa = (even + odd) / (even - odd);

        // k ∈ [-1021, 1023] here, so 2^k is a normal float
        let scale = f64::from_bits(((k as i64 + 1023) as u64) << 52);
        mantissa * scale
    }
}

impl Exponential for ApproxExp {
    fn set_coefficient(&mut self, c: f64) {
        self.coefficient = c;
    }

    fn coefficient(&self) -> f64 {
        self.coefficient
    }

    fn eval(&self, x: f64) -> f64 {
        Self::approx(self.coefficient * x)
    }
}

/// The exponential implementations selectable from configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum ExpKind {
    /// [`ApproxExp`]
    #[default]
    Approximate,
    /// [`ExactExp`]
    Exact,
}

impl ExpKind {
    /// Construct the selected implementation.
    pub fn build(self) -> Box<dyn Exponential> {
        match self {
            Self::Approximate => Box::new(ApproxExp::default()),
            Self::Exact => Box::new(ExactExp::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn relative_error_is_bounded() {
        let mut approx = ApproxExp::default();
        approx.set_coefficient(1.0);

        let mut y: f64 = -708.0;
        while y <= 709.0 {
            let exact = y.exp();
            let error = ((approx.eval(y) - exact) / exact).abs();
            assert!(
                error <= ApproxExp::MAX_RELATIVE_ERROR,
                "y = {y}, error = {error}"
            );
            y += 0.0137;
        }
    }

    #[test]
    fn coefficient_scales_the_argument() {
        let mut approx = ApproxExp::default();
        approx.set_coefficient(-0.5);
        assert_eq!(approx.coefficient(), -0.5);
        assert_relative_eq!(approx.eval(4.0), (-2.0f64).exp(), max_relative = 1e-10);

        let mut exact = ExactExp::default();
        exact.set_coefficient(-0.5);
        assert_eq!(exact.eval(4.0), (-2.0f64).exp());
    }

    #[test]
    fn saturates_outside_the_range() {
        let mut approx = ApproxExp::default();
        approx.set_coefficient(1.0);
        assert_eq!(approx.eval(-1.0e6), 0.0);
        assert_eq!(approx.eval(f64::NEG_INFINITY), 0.0);
        assert_eq!(approx.eval(1.0e6), f64::INFINITY);
        assert!(approx.eval(f64::NAN).is_nan());
    }

    #[test]
    fn exact_at_zero() {
        let approx = ApproxExp::default();
        assert_eq!(approx.eval(123.0), 1.0);
    }

    #[test]
    fn kinds_build_their_implementation() {
        let mut exp = ExpKind::Exact.build();
        exp.set_coefficient(2.0);
        assert_eq!(exp.eval(1.5), 3.0f64.exp());

        let mut exp = ExpKind::Approximate.build();
        exp.set_coefficient(2.0);
        assert_relative_eq!(exp.eval(1.5), 3.0f64.exp(), max_relative = 1e-10);
    }
}

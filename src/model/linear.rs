use std::fmt;
use std::ops::{Index, IndexMut};

use rand::Rng;

use crate::data::{HouseType, NUM_TYPES};
use crate::error::ModelError;

/// Total number of weights: an intercept group and a slope group, each with
/// one weight per type plus a shared bias.
pub const NUM_PARAMS: usize = 2 * (NUM_TYPES + 1);
/// First index of the intercept group. Index `INTERCEPT_BIAS` is its bias.
pub const INTERCEPT_START: usize = 0;
pub const INTERCEPT_BIAS: usize = NUM_TYPES;
/// First index of the slope group. Index `SLOPE_BIAS` is its bias.
pub const SLOPE_START: usize = NUM_TYPES + 1;
pub const SLOPE_BIAS: usize = 2 * NUM_TYPES + 1;

/// The model's weight vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters(pub [f64; NUM_PARAMS]);

impl Parameters {
    pub fn zeros() -> Self {
        Parameters([0.0; NUM_PARAMS])
    }

    /// Draw every weight uniformly from `[-range, range]`.
    pub fn random<R: Rng>(rng: &mut R, range: f64) -> Self {
        let mut w = [0.0; NUM_PARAMS];
        for v in w.iter_mut() {
            *v = rng.random_range(-range..=range);
        }
        Parameters(w)
    }

    /// Effective intercept for one house type (type weight plus bias).
    pub fn intercept(&self, t: HouseType) -> f64 {
        self.0[INTERCEPT_START + t.index()] + self.0[INTERCEPT_BIAS]
    }

    /// Effective slope for one house type (type weight plus bias).
    pub fn slope(&self, t: HouseType) -> f64 {
        self.0[SLOPE_START + t.index()] + self.0[SLOPE_BIAS]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl Index<usize> for Parameters {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        &self.0[i]
    }
}

impl IndexMut<usize> for Parameters {
    fn index_mut(&mut self, i: usize) -> &mut f64 {
        &mut self.0[i]
    }
}

impl fmt::Display for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{v:.4}")?;
        }
        write!(f, "]")
    }
}

/// Predict a price for every sample.
///
/// Sample `i` gets `(Σ w[k]·t[i][k] + w[5]) + (Σ w[6+k]·t[i][k] + w[11]) · x[i]`,
/// i.e. a per-type affine function of `x`. Each `t[i]` must have exactly
/// `NUM_TYPES` entries.
pub fn predict<T: AsRef<[f64]>>(
    x: &[f64],
    w: &Parameters,
    t: &[T],
) -> Result<Vec<f64>, ModelError> {
    if x.len() != t.len() {
        return Err(ModelError::LengthMismatch {
            left: x.len(),
            right: t.len(),
        });
    }

    x.iter()
        .zip(t)
        .enumerate()
        .map(|(i, (&xi, ti))| -> Result<f64, ModelError> {
            let ti = check_one_hot(i, ti.as_ref())?;
            Ok(intercept_term(w, ti) + slope_term(w, ti) * xi)
        })
        .collect()
}

pub(crate) fn check_one_hot(index: usize, t: &[f64]) -> Result<&[f64], ModelError> {
    if t.len() != NUM_TYPES {
        return Err(ModelError::OneHotWidth {
            index,
            len: t.len(),
            expected: NUM_TYPES,
        });
    }
    Ok(t)
}

fn intercept_term(w: &Parameters, t: &[f64]) -> f64 {
    let group = &w.0[INTERCEPT_START..INTERCEPT_BIAS];
    dot(group, t) + w.0[INTERCEPT_BIAS]
}

fn slope_term(w: &Parameters, t: &[f64]) -> f64 {
    let group = &w.0[SLOPE_START..SLOPE_BIAS];
    dot(group, t) + w.0[SLOPE_BIAS]
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn weights() -> Parameters {
        // intercepts 1..5, bias 10; slopes 0.1..0.5, bias 2
        Parameters([
            1.0, 2.0, 3.0, 4.0, 5.0, 10.0, 0.1, 0.2, 0.3, 0.4, 0.5, 2.0,
        ])
    }

    #[test]
    fn test_predict_selects_type() {
        let w = weights();
        let x = [1.0, 10.0];
        let t = [
            HouseType::Duplex.one_hot(),
            HouseType::MultiFamily.one_hot(),
        ];
        let y = predict(&x, &w, &t).unwrap();
        assert!((y[0] - (11.0 + 2.1 * 1.0)).abs() < 1e-12);
        assert!((y[1] - (15.0 + 2.5 * 10.0)).abs() < 1e-12);
    }

    #[test]
    fn test_predict_matches_effective_slope_and_intercept() {
        let w = weights();
        for t in HouseType::ALL {
            let y = predict(&[3.0], &w, &[t.one_hot()]).unwrap();
            assert!((y[0] - (w.intercept(t) + w.slope(t) * 3.0)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_predict_rejects_bad_one_hot_width() {
        let t = vec![vec![1.0, 0.0, 0.0, 0.0, 0.0], vec![1.0, 0.0]];
        let err = predict(&[1.0, 2.0], &weights(), &t).unwrap_err();
        assert_eq!(
            err,
            ModelError::OneHotWidth {
                index: 1,
                len: 2,
                expected: 5
            }
        );
    }

    #[test]
    fn test_predict_rejects_length_mismatch() {
        let t = [HouseType::Duplex.one_hot()];
        assert!(matches!(
            predict(&[1.0, 2.0], &weights(), &t),
            Err(ModelError::LengthMismatch { left: 2, right: 1 })
        ));
    }

    #[test]
    fn test_predict_is_linear_in_each_weight() {
        let w = weights();
        let x = [4.0];
        let t = [HouseType::Townhouse.one_hot()];
        let base = predict(&x, &w, &t).unwrap()[0];
        for i in 0..NUM_PARAMS {
            let mut w1 = w;
            w1[i] += 1.0;
            let mut w2 = w;
            w2[i] += 2.0;
            let d1 = predict(&x, &w1, &t).unwrap()[0] - base;
            let d2 = predict(&x, &w2, &t).unwrap()[0] - base;
            assert!((d2 - 2.0 * d1).abs() < 1e-9, "weight {i} not linear");
        }
    }

    #[test]
    fn test_random_within_range_and_reproducible() {
        let a = Parameters::random(&mut StdRng::seed_from_u64(7), 1.0);
        let b = Parameters::random(&mut StdRng::seed_from_u64(7), 1.0);
        assert_eq!(a, b);
        assert!(a.as_slice().iter().all(|v| (-1.0..=1.0).contains(v)));
    }
}

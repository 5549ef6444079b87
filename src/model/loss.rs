use super::linear::{check_one_hot, INTERCEPT_BIAS, NUM_PARAMS, SLOPE_BIAS, SLOPE_START};
use crate::data::NUM_TYPES;
use crate::error::ModelError;

/// Mean of squared residuals `Σ(label − pred)² / n`.
pub fn mean_squared_loss(labels: &[f64], predictions: &[f64]) -> Result<f64, ModelError> {
    let n = check_lengths(labels, predictions)?;
    let sum: f64 = labels
        .iter()
        .zip(predictions)
        .map(|(l, p)| (l - p) * (l - p))
        .sum();
    Ok(sum / n as f64)
}

/// Gradients of the loss with respect to the slope bias and the intercept
/// bias: `(−2·mean(x·r), −2·mean(r))` with `r = label − pred`.
pub fn gradients(
    x: &[f64],
    labels: &[f64],
    predictions: &[f64],
) -> Result<(f64, f64), ModelError> {
    let n = check_lengths(labels, predictions)?;
    check_lengths(x, labels)?;

    let (mut d_slope, mut d_intercept) = (0.0, 0.0);
    for ((xi, l), p) in x.iter().zip(labels).zip(predictions) {
        let r = l - p;
        d_slope += xi * r;
        d_intercept += r;
    }
    let scale = -2.0 / n as f64;
    Ok((scale * d_slope, scale * d_intercept))
}

/// Full gradient of the loss with respect to all twelve weights.
///
/// The bias entries equal the pair returned by [`gradients`].
pub fn parameter_gradients<T: AsRef<[f64]>>(
    x: &[f64],
    t: &[T],
    labels: &[f64],
    predictions: &[f64],
) -> Result<[f64; NUM_PARAMS], ModelError> {
    let n = check_lengths(labels, predictions)?;
    check_lengths(x, labels)?;
    if t.len() != n {
        return Err(ModelError::LengthMismatch {
            left: t.len(),
            right: n,
        });
    }

    let mut grad = [0.0; NUM_PARAMS];
    for (i, (((xi, ti), l), p)) in x.iter().zip(t).zip(labels).zip(predictions).enumerate() {
        let ti = check_one_hot(i, ti.as_ref())?;
        let r = l - p;
        for k in 0..NUM_TYPES {
            grad[k] += ti[k] * r;
            grad[SLOPE_START + k] += ti[k] * xi * r;
        }
        grad[INTERCEPT_BIAS] += r;
        grad[SLOPE_BIAS] += xi * r;
    }

    let scale = -2.0 / n as f64;
    for g in grad.iter_mut() {
        *g *= scale;
    }
    Ok(grad)
}

fn check_lengths(a: &[f64], b: &[f64]) -> Result<usize, ModelError> {
    if a.len() != b.len() {
        return Err(ModelError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    if a.is_empty() {
        return Err(ModelError::EmptyInput);
    }
    Ok(a.len())
}

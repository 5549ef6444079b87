//! The fixed regression model: per-type intercept and slope with shared
//! biases, mean-squared loss, and closed-form gradients.

pub mod linear;
pub mod loss;

pub use linear::{predict, Parameters, NUM_PARAMS};
pub use loss::{gradients, mean_squared_loss, parameter_gradients};

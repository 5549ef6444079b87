//! # Gradient descent, live
//!
//! Fits house prices with batch gradient descent and shows the loss curve or
//! the fitted lines in a terminal display while training runs.
//!
//! ## Modules
//!
//! - [`data`]: House records, category one-hot encoding, CSV loading
//! - [`model`]: Per-type linear model, mean-squared loss, gradients
//! - [`training`]: Trainer loop, loss history, single-slot frame handoff
//! - [`render`]: Off-screen loss/fit charts
//! - [`ui`]: Terminal display of the latest frame
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types

pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod render;
pub mod training;
pub mod ui;

//! Numerical building blocks for DYNAMO-style system dynamics models.
//!
//! This crate holds the pieces a sector model is assembled from:
//!
//! - [`TimeGrid`]: the fixed-step horizon a model is integrated over
//! - [`StepIntegrable`]: explicit Euler advance of level variables
//! - [`TableFunction`]: knot-defined response curves with clamped ends
//! - [`delay`]: smoothing and transport operators with hidden state
//! - [`clip`], [`ramp`], [`switch`]: scenario-control primitives

pub mod delay;
mod error;
mod functions;
mod step;
mod table;
mod time;

pub use error::{ConfigurationError, EvaluationError};
pub use functions::{clip, ramp, switch};
pub use step::StepIntegrable;
pub use table::TableFunction;
pub use time::{MAX_STEP_COUNT, TimeGrid};

use ninterp::error::{InterpolateError, ValidateError};
use thiserror::Error;

/// Errors raised while configuring a model, before any step is taken.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// An override named a constant that no sector declares.
    #[error("unknown constant `{name}` for {sector}")]
    UnknownConstant { sector: &'static str, name: String },

    #[error("table `{table}` has no knots")]
    EmptyTable { table: String },

    #[error("table `{table}` has {x_len} x-knots but {y_len} y-knots")]
    KnotLengthMismatch {
        table: String,
        x_len: usize,
        y_len: usize,
    },

    /// The x-knot at `index` is not finite or not greater than its predecessor.
    #[error("table `{table}` x-knots must be finite and strictly increasing (index {index})")]
    NonIncreasingKnots { table: String, index: usize },

    #[error("table `{table}` rejected by interpolator: {source}")]
    Interpolator {
        table: String,
        #[source]
        source: ValidateError,
    },

    #[error("time step must be positive and finite, got {dt}")]
    NonPositiveDt { dt: f64 },

    #[error("year_max ({year_max}) must be greater than year_min ({year_min})")]
    EmptyHorizon { year_min: f64, year_max: f64 },

    /// The horizon divided by `dt` exceeds what a series can hold.
    #[error("grid of {intervals} intervals exceeds the limit of {limit} steps")]
    TooManySteps { intervals: f64, limit: usize },

    /// A pipeline delay must hold at least one step of finite material.
    #[error(
        "delay duration {duration} must be finite and span at least one step of {dt}, \
         with a finite fill value (got {initial})"
    )]
    InvalidDelay { duration: f64, dt: f64, initial: f64 },
}

/// A table function failed to produce a value.
#[derive(Debug, Error)]
#[error("table `{table}` failed to evaluate: {source}")]
pub struct EvaluationError {
    pub table: String,
    #[source]
    pub source: InterpolateError,
}

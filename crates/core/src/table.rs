use std::fmt;

use ndarray::Array1;
use ninterp::{
    interpolator::Extrapolate,
    prelude::{Interp1DOwned, Interpolator},
    strategy::Linear,
};

use crate::{ConfigurationError, EvaluationError};

/// An empirical response curve defined by knots.
///
/// Evaluation interpolates linearly between knots and clamps to the first or
/// last y-knot outside the x domain; it never extrapolates. Knots are checked
/// once at construction, so evaluation performs no validation or allocation.
///
/// # Examples
///
/// ```
/// use world3_core::TableFunction;
///
/// let lmp = TableFunction::new("lmp", &[0.0, 10.0, 20.0], &[1.0, 0.99, 0.97]).unwrap();
///
/// assert!((lmp.evaluate(5.0).unwrap() - 0.995).abs() < 1e-12);
/// assert!((lmp.evaluate(50.0).unwrap() - 0.97).abs() < 1e-12);
/// ```
#[derive(Clone)]
pub struct TableFunction {
    name: String,
    x: Vec<f64>,
    y: Vec<f64>,
    curve: Curve,
}

#[derive(Clone)]
enum Curve {
    /// A single knot defines a flat curve.
    Constant(f64),
    Linear(Interp1DOwned<f64, Linear>),
}

impl TableFunction {
    /// Creates a table from matching x and y knots.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the knots are empty, have different
    /// lengths, or the x-knots are not finite and strictly increasing.
    pub fn new(name: impl Into<String>, x: &[f64], y: &[f64]) -> Result<Self, ConfigurationError> {
        let name = name.into();

        if x.is_empty() || y.is_empty() {
            return Err(ConfigurationError::EmptyTable { table: name });
        }
        if x.len() != y.len() {
            return Err(ConfigurationError::KnotLengthMismatch {
                table: name,
                x_len: x.len(),
                y_len: y.len(),
            });
        }
        if let Some(index) = x.iter().position(|knot| !knot.is_finite()) {
            return Err(ConfigurationError::NonIncreasingKnots { table: name, index });
        }
        if let Some(index) = x.windows(2).position(|pair| pair[1] <= pair[0]) {
            return Err(ConfigurationError::NonIncreasingKnots {
                table: name,
                index: index + 1,
            });
        }

        let curve = if x.len() == 1 {
            Curve::Constant(y[0])
        } else {
            let interp = Interp1DOwned::new(
                Array1::from(x.to_vec()),
                Array1::from(y.to_vec()),
                Linear,
                Extrapolate::Clamp,
            );
            match interp {
                Ok(interp) => Curve::Linear(interp),
                Err(source) => return Err(ConfigurationError::Interpolator { table: name, source }),
            }
        };

        Ok(Self {
            name,
            x: x.to_vec(),
            y: y.to_vec(),
            curve,
        })
    }

    /// Evaluates the curve at `input`.
    ///
    /// # Errors
    ///
    /// Returns an [`EvaluationError`] if the interpolator rejects the input.
    pub fn evaluate(&self, input: f64) -> Result<f64, EvaluationError> {
        match &self.curve {
            Curve::Constant(value) => Ok(*value),
            Curve::Linear(interp) => interp.interpolate(&[input]).map_err(|source| EvaluationError {
                table: self.name.clone(),
                source,
            }),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The x and y knots, in increasing x order.
    #[must_use]
    pub fn knots(&self) -> (&[f64], &[f64]) {
        (&self.x, &self.y)
    }

    /// The closed input range covered by the knots.
    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }
}

impl fmt::Debug for TableFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableFunction")
            .field("name", &self.name)
            .field("x", &self.x)
            .field("y", &self.y)
            .finish_non_exhaustive()
    }
}

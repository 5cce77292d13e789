use std::collections::VecDeque;

use crate::ConfigurationError;

/// Fixed-length transport delay.
///
/// Keeps the inputs of the last `duration / dt` steps. Each update pushes the
/// new input and returns the one that entered `duration` ago; until the
/// history has filled, the initial fill value comes out instead.
///
/// # Examples
///
/// ```
/// use world3_core::delay::PipelineDelay;
///
/// let mut pipe = PipelineDelay::new(2.0, 1.0, 0.0).unwrap();
///
/// assert_eq!(pipe.update(5.0), 0.0);
/// assert_eq!(pipe.update(0.0), 0.0);
/// assert_eq!(pipe.update(0.0), 5.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineDelay {
    history: VecDeque<f64>,
}

impl PipelineDelay {
    /// Creates a pipeline holding `round(duration / dt)` steps of `initial`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::NonPositiveDt`] for a non-positive `dt`
    /// and [`ConfigurationError::InvalidDelay`] if the duration or fill value
    /// is not finite, or the duration spans less than one step.
    pub fn new(duration: f64, dt: f64, initial: f64) -> Result<Self, ConfigurationError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(ConfigurationError::NonPositiveDt { dt });
        }
        let steps = (duration / dt).round();
        if !(duration.is_finite() && initial.is_finite() && steps.is_finite() && steps >= 1.0) {
            return Err(ConfigurationError::InvalidDelay {
                duration,
                dt,
                initial,
            });
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let len = steps as usize;
        Ok(Self {
            history: std::iter::repeat_n(initial, len).collect(),
        })
    }

    /// Pushes `input` and returns the value that entered `duration` ago.
    pub fn update(&mut self, input: f64) -> f64 {
        self.history.push_back(input);
        self.history.pop_front().unwrap_or(input)
    }

    /// Number of steps between entering and leaving.
    #[must_use]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Sum of everything still in the pipeline.
    #[must_use]
    pub fn in_transit(&self) -> f64 {
        self.history.iter().sum()
    }
}

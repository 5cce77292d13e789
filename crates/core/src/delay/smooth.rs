/// First-order exponential smoothing.
///
/// Holds a single smoothed value `s` and moves it toward the input by
/// `dt / time_constant` of the gap on each update.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Smooth {
    state: Option<f64>,
}

impl Smooth {
    /// Creates an operator that seeds itself from its first input.
    #[must_use]
    pub const fn new() -> Self {
        Self { state: None }
    }

    /// Creates an operator whose smoothed value starts at `initial`.
    ///
    /// Used where the smoothed quantity is a stock with its own initial
    /// condition; the first update then advances from `initial`.
    #[must_use]
    pub const fn seeded(initial: f64) -> Self {
        Self {
            state: Some(initial),
        }
    }

    /// Advances the smoothed value toward `input` and returns it.
    pub fn update(&mut self, input: f64, dt: f64, time_constant: f64) -> f64 {
        let next = match self.state {
            None => input,
            Some(s) => s + dt / time_constant * (input - s),
        };
        self.state = Some(next);
        next
    }

    /// The current smoothed value, if seeded.
    #[must_use]
    pub const fn output(&self) -> Option<f64> {
        self.state
    }
}

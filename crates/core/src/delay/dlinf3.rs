/// Third-order information delay.
///
/// Three first-order stages in cascade, each with a third of the total delay.
/// The output rises along an Erlang-shaped response instead of the immediate
/// exponential approach of [`Smooth`](super::Smooth).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Dlinf3 {
    stages: Option<[f64; 3]>,
}

impl Dlinf3 {
    #[must_use]
    pub const fn new() -> Self {
        Self { stages: None }
    }

    /// Advances every stage by one step and returns the last stage.
    ///
    /// The first call sets all stages to `input`.
    pub fn update(&mut self, input: f64, dt: f64, delay: f64) -> f64 {
        let next = match self.stages {
            None => [input; 3],
            Some([s1, s2, s3]) => {
                let k = 3.0 * dt / delay;
                [
                    s1 + k * (input - s1),
                    s2 + k * (s1 - s2),
                    s3 + k * (s2 - s3),
                ]
            }
        };
        self.stages = Some(next);
        next[2]
    }

    #[must_use]
    pub fn output(&self) -> Option<f64> {
        self.stages.map(|stages| stages[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::delay::Smooth;

    #[test]
    fn first_update_seeds_all_stages() {
        let mut delay = Dlinf3::new();

        assert_eq!(delay.update(7.0, 1.0, 3.0), 7.0);
        assert_eq!(delay.update(7.0, 1.0, 3.0), 7.0);
    }

    #[test]
    fn step_response_lags_behind_first_order() {
        let mut third = Dlinf3::new();
        let mut first = Smooth::new();
        third.update(0.0, 0.5, 10.0);
        first.update(0.0, 0.5, 10.0);

        // The last stage does not move until the step has crossed two stages.
        assert_eq!(third.update(1.0, 0.5, 10.0), 0.0);
        assert_eq!(third.update(1.0, 0.5, 10.0), 0.0);

        let mut third_out = 0.0;
        let mut first_out = 0.0;
        for _ in 0..6 {
            third_out = third.update(1.0, 0.5, 10.0);
            first_out = first.update(1.0, 0.5, 10.0);
        }
        assert!(third_out > 0.0);
        assert!(third_out < first_out);
    }

    #[test]
    fn converges_to_constant_input() {
        let mut delay = Dlinf3::new();
        delay.update(0.0, 0.5, 6.0);
        let mut value = 0.0;
        for _ in 0..1000 {
            value = delay.update(2.5, 0.5, 6.0);
        }

        assert_relative_eq!(value, 2.5, epsilon = 1e-9);
    }
}

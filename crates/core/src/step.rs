/// A trait for stocks that advance by explicit Euler.
///
/// World3 levels are integrated with the DYNAMO convention: the value at step
/// `k` is the value at `k - 1` plus `dt` times the net rate computed at `k - 1`.
/// Implementing this trait lets sector code write that update as
/// `level.step(net_rate, dt)` instead of spelling out the arithmetic at every
/// equation site.
pub trait StepIntegrable<Delta> {
    /// The rate of change of the stock with respect to `Delta`.
    type Derivative;

    /// Returns the stock after one step of size `delta`.
    #[must_use]
    fn step(&self, derivative: Self::Derivative, delta: Delta) -> Self;
}

impl StepIntegrable<f64> for f64 {
    type Derivative = f64;

    fn step(&self, derivative: f64, delta: f64) -> Self {
        self + derivative * delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Stock expressed in two cohorts.
    #[derive(Debug, PartialEq)]
    struct Cohorts([f64; 2]);
    struct Flows([f64; 2]);

    impl StepIntegrable<f64> for Cohorts {
        type Derivative = Flows;

        fn step(&self, derivative: Flows, delta: f64) -> Self {
            Cohorts([
                self.0[0] + derivative.0[0] * delta,
                self.0[1] + derivative.0[1] * delta,
            ])
        }
    }

    #[test]
    fn step_scalar_level() {
        let level = 100.0_f64;

        assert_eq!(level.step(4.0, 0.5), 102.0);
        assert_eq!(level.step(-10.0, 1.0), 90.0);
    }

    #[test]
    fn step_composite_level() {
        let cohorts = Cohorts([10.0, 20.0]);
        let flows = Flows([1.0, -2.0]);

        assert_eq!(cohorts.step(flows, 2.0), Cohorts([12.0, 16.0]));
    }
}

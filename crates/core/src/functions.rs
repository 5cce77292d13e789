//! Piecewise scenario-control primitives used throughout sector equations.

/// Returns `after` once `time` has reached `threshold`, `before` until then.
///
/// World3 uses this to switch a parameter between its historical and policy
/// values at a policy year. The boundary itself resolves to `after`.
///
/// ```
/// use world3_core::clip;
///
/// assert_eq!(clip(2.0, 1.0, 1950.0, 1975.0), 1.0);
/// assert_eq!(clip(2.0, 1.0, 1975.0, 1975.0), 2.0);
/// ```
#[must_use]
pub fn clip(after: f64, before: f64, time: f64, threshold: f64) -> f64 {
    if time >= threshold { after } else { before }
}

/// A ramp of the given `slope` that starts at `start` and is zero before it.
///
/// ```
/// use world3_core::ramp;
///
/// assert_eq!(ramp(2.0, 1900.0, 1950.0), 100.0);
/// assert_eq!(ramp(2.0, 1900.0, 1850.0), 0.0);
/// ```
#[must_use]
pub fn ramp(slope: f64, start: f64, time: f64) -> f64 {
    if time >= start {
        slope * (time - start)
    } else {
        0.0
    }
}

/// Selects `b` when `condition` holds, `a` otherwise.
#[must_use]
pub fn switch(a: f64, b: f64, condition: bool) -> f64 {
    if condition { b } else { a }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_switches_at_threshold() {
        for (after, before) in [(2.0, 1.0), (-3.5, 7.25), (0.0, 1e12)] {
            assert_eq!(clip(after, before, 1950.0, 1975.0), before);
            assert_eq!(clip(after, before, 1974.999, 1975.0), before);
            assert_eq!(clip(after, before, 1975.0, 1975.0), after);
            assert_eq!(clip(after, before, 2000.0, 1975.0), after);
        }
    }

    #[test]
    fn ramp_is_zero_before_start() {
        assert_eq!(ramp(2.0, 1900.0, 1850.0), 0.0);
        assert_eq!(ramp(2.0, 1900.0, 1900.0), 0.0);
        assert_eq!(ramp(-4.0, 1900.0, 1899.0), 0.0);
    }

    #[test]
    fn ramp_grows_linearly_after_start() {
        assert_eq!(ramp(2.0, 1900.0, 1950.0), 100.0);
        assert_eq!(ramp(0.5, 2000.0, 2010.0), 5.0);
        assert_eq!(ramp(-1.0, 0.0, 3.0), -3.0);
    }

    #[test]
    fn switch_selects_by_condition() {
        assert_eq!(switch(1.0, 2.0, false), 1.0);
        assert_eq!(switch(1.0, 2.0, true), 2.0);
        assert_eq!(switch(-8.0, 8.0, true), 8.0);
    }
}

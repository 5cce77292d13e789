use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::ConfigurationError;

/// Tolerance applied to `(year_max - year_min) / dt` before flooring, so that
/// spans which are exact multiples of `dt` are not lost to representation error.
const STEP_COUNT_TOLERANCE: f64 = 1e-9;

/// Largest number of grid points a series may have.
pub const MAX_STEP_COUNT: usize = 1 << 24;

/// The discretized horizon a model is integrated over.
///
/// Step `k` corresponds to calendar year `year_min + k * dt`. The grid is
/// validated at construction and immutable afterwards.
///
/// # Examples
///
/// ```
/// use world3_core::TimeGrid;
///
/// let grid = TimeGrid::new(1900.0, 2100.0, 1.0).unwrap();
///
/// assert_eq!(grid.step_count(), 201);
/// assert_eq!(grid.time(10), 1910.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridBounds", into = "GridBounds")]
pub struct TimeGrid {
    year_min: f64,
    year_max: f64,
    dt: f64,
    step_count: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct GridBounds {
    year_min: f64,
    year_max: f64,
    dt: f64,
}

impl TimeGrid {
    /// Creates a grid spanning `[year_min, year_max]` with step `dt`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::NonPositiveDt`] if `dt` is not a positive
    /// finite number, or [`ConfigurationError::EmptyHorizon`] if
    /// `year_max <= year_min`, or [`ConfigurationError::TooManySteps`] if the
    /// grid would hold more than [`MAX_STEP_COUNT`] points.
    pub fn new(year_min: f64, year_max: f64, dt: f64) -> Result<Self, ConfigurationError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(ConfigurationError::NonPositiveDt { dt });
        }
        if !(year_min.is_finite() && year_max.is_finite() && year_max > year_min) {
            return Err(ConfigurationError::EmptyHorizon { year_min, year_max });
        }

        let intervals = ((year_max - year_min) / dt + STEP_COUNT_TOLERANCE).floor();
        #[allow(clippy::cast_precision_loss)]
        let limit = MAX_STEP_COUNT as f64;
        if !(intervals.is_finite() && intervals < limit) {
            return Err(ConfigurationError::TooManySteps {
                intervals,
                limit: MAX_STEP_COUNT,
            });
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let step_count = intervals as usize + 1;

        Ok(Self {
            year_min,
            year_max,
            dt,
            step_count,
        })
    }

    #[must_use]
    pub fn year_min(&self) -> f64 {
        self.year_min
    }

    #[must_use]
    pub fn year_max(&self) -> f64 {
        self.year_max
    }

    #[must_use]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Number of grid points, `floor((year_max - year_min) / dt) + 1`.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Calendar year of step `k`.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn time(&self, k: usize) -> f64 {
        self.year_min + k as f64 * self.dt
    }

    /// Calendar years of every step.
    #[must_use]
    pub fn times(&self) -> Array1<f64> {
        Array1::from_shape_fn(self.step_count, |k| self.time(k))
    }

    /// A series sized to the grid with every entry undefined (NaN).
    #[must_use]
    pub fn undefined_series(&self) -> Array1<f64> {
        Array1::from_elem(self.step_count, f64::NAN)
    }

    /// Index of the step whose year is closest to `year`, if it lies on the grid.
    #[must_use]
    pub fn index_of(&self, year: f64) -> Option<usize> {
        if !(self.year_min..=self.year_max).contains(&year) {
            return None;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let k = ((year - self.year_min) / self.dt).round() as usize;
        Some(k.min(self.step_count - 1))
    }
}

impl TryFrom<GridBounds> for TimeGrid {
    type Error = ConfigurationError;

    fn try_from(bounds: GridBounds) -> Result<Self, Self::Error> {
        Self::new(bounds.year_min, bounds.year_max, bounds.dt)
    }
}

impl From<TimeGrid> for GridBounds {
    fn from(grid: TimeGrid) -> Self {
        Self {
            year_min: grid.year_min,
            year_max: grid.year_max,
            dt: grid.dt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn step_count_matches_floor_formula() {
        let cases = [
            (1900.0, 2100.0, 1.0, 201),
            (1900.0, 2100.0, 0.5, 401),
            (1900.0, 2100.0, 0.125, 1601),
            (1900.0, 2000.0, 3.0, 34),
            (0.0, 0.3, 0.1, 4),
        ];

        for (year_min, year_max, dt, expected) in cases {
            let grid = TimeGrid::new(year_min, year_max, dt).unwrap();
            assert_eq!(
                grid.step_count(),
                expected,
                "grid {year_min}..{year_max} by {dt}"
            );
        }
    }

    #[test]
    fn rejects_non_positive_dt() {
        for dt in [0.0, -0.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                TimeGrid::new(1900.0, 2100.0, dt),
                Err(ConfigurationError::NonPositiveDt { .. })
            ));
        }
    }

    #[test]
    fn rejects_grids_too_fine_to_allocate() {
        for (year_min, year_max, dt) in [
            (0.0, 1.0, f64::MIN_POSITIVE),
            (1900.0, 2100.0, 1e-12),
            (-1e300, 1e300, 1.0),
        ] {
            assert!(
                matches!(
                    TimeGrid::new(year_min, year_max, dt),
                    Err(ConfigurationError::TooManySteps { .. })
                ),
                "grid {year_min}..{year_max} by {dt}"
            );
        }

        let invalid: Result<TimeGrid, _> =
            serde_json::from_str(r#"{"year_min": 0.0, "year_max": 1.0, "dt": 1e-300}"#);
        assert!(invalid.is_err());
    }

    #[test]
    fn rejects_empty_horizon() {
        assert!(matches!(
            TimeGrid::new(2000.0, 2000.0, 1.0),
            Err(ConfigurationError::EmptyHorizon { .. })
        ));
        assert!(matches!(
            TimeGrid::new(2100.0, 1900.0, 1.0),
            Err(ConfigurationError::EmptyHorizon { .. })
        ));
    }

    #[test]
    fn times_and_indices_agree() {
        let grid = TimeGrid::new(1900.0, 1910.0, 0.5).unwrap();
        let times = grid.times();

        assert_eq!(times.len(), 21);
        assert_relative_eq!(times[0], 1900.0);
        assert_relative_eq!(times[20], 1910.0);
        assert_eq!(grid.index_of(1905.0), Some(10));
        assert_eq!(grid.index_of(1899.0), None);
        assert_eq!(grid.index_of(1910.0), Some(20));
    }

    #[test]
    fn undefined_series_is_all_nan() {
        let grid = TimeGrid::new(1900.0, 1950.0, 1.0).unwrap();
        let series = grid.undefined_series();

        assert_eq!(series.len(), 51);
        assert!(series.iter().all(|value| value.is_nan()));
    }

    #[test]
    fn deserializes_with_validation() {
        let grid: TimeGrid =
            serde_json::from_str(r#"{"year_min": 1900.0, "year_max": 1950.0, "dt": 0.5}"#)
                .unwrap();
        assert_eq!(grid.step_count(), 101);

        let invalid: Result<TimeGrid, _> =
            serde_json::from_str(r#"{"year_min": 1900.0, "year_max": 1950.0, "dt": 0.0}"#);
        assert!(invalid.is_err());
    }
}

use std::collections::BTreeMap;

use ndarray::Array1;
use world3_core::TimeGrid;

/// Every variable series of a finished run, keyed by variable name.
#[derive(Debug, Clone, PartialEq)]
pub struct Results {
    grid: TimeGrid,
    time: Array1<f64>,
    series: BTreeMap<&'static str, Array1<f64>>,
}

impl Results {
    pub(crate) fn new<'a, I>(grid: TimeGrid, series: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, &'a Array1<f64>)>,
    {
        Self {
            grid,
            time: grid.times(),
            series: series
                .into_iter()
                .map(|(name, values)| (name, values.clone()))
                .collect(),
        }
    }

    #[must_use]
    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    /// Simulated year of each step.
    #[must_use]
    pub fn time(&self) -> &Array1<f64> {
        &self.time
    }

    /// The series for `name`; `"time"` returns the time axis.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Array1<f64>> {
        if name == "time" {
            return Some(&self.time);
        }
        self.series.get(name)
    }

    /// Variable names in sorted order, excluding `"time"`.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.series.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Array1<f64>)> {
        self.series.iter().map(|(&name, values)| (name, values))
    }

    /// Number of steps in every series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Value of `name` at the grid step nearest to `year`.
    ///
    /// Returns `None` for an unknown name or a year outside the horizon.
    #[must_use]
    pub fn value_at(&self, name: &str, year: f64) -> Option<f64> {
        let k = self.grid.index_of(year)?;
        self.get(name).and_then(|values| values.get(k).copied())
    }

    /// Value of `name` at the last step.
    #[must_use]
    pub fn last(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(|values| values.last().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ndarray::array;

    fn results() -> Results {
        let grid = TimeGrid::new(2000.0, 2002.0, 1.0).unwrap();
        let pop = array![1.0, 2.0, 3.0];
        let iopc = array![10.0, 20.0, 30.0];
        Results::new(grid, [("pop", &pop), ("iopc", &iopc)])
    }

    #[test]
    fn lookup_by_name_and_year() {
        let results = results();

        assert_eq!(results.len(), 3);
        assert_eq!(results.get("pop"), Some(&array![1.0, 2.0, 3.0]));
        assert_eq!(results.get("time"), Some(&array![2000.0, 2001.0, 2002.0]));
        assert_eq!(results.get("missing"), None);
        assert_eq!(results.value_at("iopc", 2001.0), Some(20.0));
        assert_eq!(results.value_at("iopc", 1999.0), None);
        assert_eq!(results.last("pop"), Some(3.0));
    }

    #[test]
    fn names_are_sorted() {
        let results = results();

        assert_eq!(results.names().collect::<Vec<_>>(), vec!["iopc", "pop"]);
        assert_eq!(results.iter().count(), 2);
    }
}

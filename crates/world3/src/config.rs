//! Run configuration: integration bounds and policy years.
//!
//! Every field defaults to the Business-as-Usual scenario, so a partial TOML
//! or JSON document only needs to name what it changes.

use serde::{Deserialize, Serialize};
use world3_core::{ConfigurationError, TimeGrid};

/// Integration bounds and policy-switch years for a World3 run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct World3Config {
    /// First simulated year.
    pub year_min: f64,
    /// Last simulated year.
    pub year_max: f64,
    /// Integration step in years.
    pub dt: f64,
    /// Year from which the "2" variant of every policy-switched parameter applies.
    pub pyear: f64,
    /// Year resource conservation technology starts developing.
    pub pyear_res_tech: f64,
    /// Year persistent pollution technology starts developing.
    pub pyear_pp_tech: f64,
    /// Year the capital cost of resource extraction switches curves.
    pub pyear_fcaor: f64,
    /// Year land yield technology starts developing.
    pub pyear_y_tech: f64,
    /// Year health services switch to their improved effectiveness curve.
    pub iphst: f64,
}

impl Default for World3Config {
    fn default() -> Self {
        let policy = PolicyYears::default();
        Self {
            year_min: 1900.0,
            year_max: 2100.0,
            dt: 0.5,
            pyear: policy.pyear,
            pyear_res_tech: policy.pyear_res_tech,
            pyear_pp_tech: policy.pyear_pp_tech,
            pyear_fcaor: policy.pyear_fcaor,
            pyear_y_tech: policy.pyear_y_tech,
            iphst: policy.iphst,
        }
    }
}

impl World3Config {
    /// A configuration over `[year_min, year_max]` with step `dt` and default policies.
    #[must_use]
    pub fn new(year_min: f64, year_max: f64, dt: f64) -> Self {
        Self {
            year_min,
            year_max,
            dt,
            ..Self::default()
        }
    }

    /// Validates the integration bounds into a [`TimeGrid`].
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] for a non-positive `dt` or an empty horizon.
    pub fn grid(&self) -> Result<TimeGrid, ConfigurationError> {
        TimeGrid::new(self.year_min, self.year_max, self.dt)
    }

    #[must_use]
    pub fn policy(&self) -> PolicyYears {
        PolicyYears {
            pyear: self.pyear,
            pyear_res_tech: self.pyear_res_tech,
            pyear_pp_tech: self.pyear_pp_tech,
            pyear_fcaor: self.pyear_fcaor,
            pyear_y_tech: self.pyear_y_tech,
            iphst: self.iphst,
        }
    }

    /// The configuration every sector is built with.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the integration bounds are invalid.
    pub fn sector_config(&self) -> Result<SectorConfig, ConfigurationError> {
        Ok(SectorConfig {
            grid: self.grid()?,
            policy: self.policy(),
        })
    }
}

/// Years at which scenario policies take effect.
///
/// A year of 4000 keeps a policy off for any realistic horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyYears {
    pub pyear: f64,
    pub pyear_res_tech: f64,
    pub pyear_pp_tech: f64,
    pub pyear_fcaor: f64,
    pub pyear_y_tech: f64,
    pub iphst: f64,
}

impl Default for PolicyYears {
    fn default() -> Self {
        Self {
            pyear: 1975.0,
            pyear_res_tech: 4000.0,
            pyear_pp_tech: 4000.0,
            pyear_fcaor: 4000.0,
            pyear_y_tech: 4000.0,
            iphst: 1940.0,
        }
    }
}

/// The grid and policy years shared read-only by every sector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectorConfig {
    pub grid: TimeGrid,
    pub policy: PolicyYears,
}

impl SectorConfig {
    /// A sector configuration with Business-as-Usual policy years.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the integration bounds are invalid.
    pub fn new(year_min: f64, year_max: f64, dt: f64) -> Result<Self, ConfigurationError> {
        Ok(Self {
            grid: TimeGrid::new(year_min, year_max, dt)?,
            policy: PolicyYears::default(),
        })
    }

    #[must_use]
    pub fn with_policy(self, policy: PolicyYears) -> Self {
        Self { policy, ..self }
    }
}

//! Nonrenewable resource sector.
//!
//! Usage per capita rises with industrial output per capita and depletes a
//! single resource stock. As the remaining fraction falls, a growing share of
//! industrial capital is tied up in obtaining resources. Resource
//! conservation technology, once adopted, lowers usage toward the desired
//! rate.

use world3_core::{ConfigurationError, StepIntegrable, TableFunction, clip, delay::Dlinf3};

use crate::{
    Error, SectorConfig,
    capital::Capital,
    population::Population,
    sector::{Parts, Sector, SectorState, constants, variables},
};

constants! {
    /// Resource sector constants.
    ResourceConstants in "resource" {
        /// Initial nonrenewable resources.
        nri = 1e12,
        /// Resource use factor before conservation technology.
        nruf1 = 1.0,
        /// Desired resource use rate.
        drur = 4.8e9,
        /// Initial resource conservation technology.
        nrtdi = 1.0,
        /// Technology development delay.
        tdd = 20.0,
    }
}

variables! {
    /// Resource sector variable series.
    ResourceVariables {
        nr, nrtd, nrfr, nruf, nruf2, nrur, pcrum,
        fcaor, fcaor1, fcaor2, nrcm, nrtdr,
    }
}

const REMAINING_FRACTION: [f64; 11] = [0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0];

/// Resource sector table functions.
#[derive(Debug, Clone)]
pub struct ResourceTables {
    pub pcrum: TableFunction,
    pub fcaor1: TableFunction,
    pub fcaor2: TableFunction,
    pub nrcm: TableFunction,
}

impl ResourceTables {
    /// The World3-03 resource tables.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if any knot set is malformed.
    pub fn standard() -> Result<Self, ConfigurationError> {
        Ok(Self {
            pcrum: TableFunction::new(
                "pcrum",
                &[
                    0.0, 200.0, 400.0, 600.0, 800.0, 1000.0, 1200.0, 1400.0, 1600.0,
                ],
                &[0.0, 0.85, 2.6, 3.4, 3.8, 4.1, 4.4, 4.7, 5.0],
            )?,
            fcaor1: TableFunction::new(
                "fcaor1",
                &REMAINING_FRACTION,
                &[1.0, 0.9, 0.7, 0.5, 0.2, 0.1, 0.05, 0.05, 0.05, 0.05, 0.05],
            )?,
            fcaor2: TableFunction::new(
                "fcaor2",
                &REMAINING_FRACTION,
                &[1.0, 0.2, 0.1, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05],
            )?,
            nrcm: TableFunction::new("nrcm", &[-1.0, 0.0], &[-0.04, 0.0])?,
        })
    }
}

/// Resource sector delay sites.
#[derive(Debug, Clone, Default)]
pub struct ResourceDelays {
    /// Resource use factor once conservation technology is adopted.
    pub nruf2: Dlinf3,
}

type State = SectorState<ResourceConstants, ResourceVariables, ResourceTables, ResourceDelays>;

#[derive(Debug)]
pub struct Resource {
    config: SectorConfig,
    state: State,
}

impl Resource {
    #[must_use]
    pub fn new(config: SectorConfig) -> Self {
        Self {
            config,
            state: SectorState::new(Self::NAME),
        }
    }

    /// Remaining fraction, capital cost of extraction, and use factor at step `k`.
    ///
    /// # Errors
    ///
    /// Returns a [`StateError`](crate::StateError) before the sector is set up.
    pub fn update_state(&mut self, k: usize) -> Result<(), Error> {
        let grid = self.config.grid;
        let policy = self.config.policy;
        let time = grid.time(k);
        let src = k.saturating_sub(1);

        let Parts {
            constants: c,
            variables: v,
            tables: t,
            delays: d,
        } = self.state.parts("update resource state")?;

        v.nrfr[k] = v.nr[k] / c.nri;
        v.fcaor1[k] = t.fcaor1.evaluate(v.nrfr[k])?;
        v.fcaor2[k] = t.fcaor2.evaluate(v.nrfr[k])?;
        v.fcaor[k] = clip(v.fcaor2[k], v.fcaor1[k], time, policy.pyear_fcaor);
        v.nruf2[k] = d.nruf2.update(v.nrtd[src], grid.dt(), c.tdd);
        v.nruf[k] = clip(v.nruf2[k], c.nruf1, time, policy.pyear_res_tech);
        Ok(())
    }

    /// Resource usage and conservation technology change at step `k`.
    ///
    /// # Errors
    ///
    /// Returns a [`StateError`](crate::StateError) if any sector is not set up.
    pub fn update_usage(
        &mut self,
        k: usize,
        population: &Population,
        capital: &Capital,
    ) -> Result<(), Error> {
        let time = self.config.grid.time(k);
        let pyear_res_tech = self.config.policy.pyear_res_tech;

        let pop = population.variables()?;
        let cap = capital.variables()?;
        let Parts {
            constants: c,
            variables: v,
            tables: t,
            ..
        } = self.state.parts("update resource usage")?;

        v.pcrum[k] = t.pcrum.evaluate(cap.iopc[k])?;
        v.nrur[k] = pop.pop[k] * v.pcrum[k] * v.nruf[k];
        v.nrcm[k] = t.nrcm.evaluate(1.0 - v.nrur[k] / c.drur)?;
        v.nrtdr[k] = clip(v.nrtd[k] * v.nrcm[k], 0.0, time, pyear_res_tech);
        Ok(())
    }
}

impl Sector for Resource {
    const NAME: &'static str = "resource";

    type Constants = ResourceConstants;
    type Variables = ResourceVariables;
    type Tables = ResourceTables;
    type Delays = ResourceDelays;

    fn config(&self) -> &SectorConfig {
        &self.config
    }

    fn state(&self) -> &State {
        &self.state
    }

    fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    fn standard_tables() -> Result<ResourceTables, ConfigurationError> {
        ResourceTables::standard()
    }

    fn delay_sites(
        _constants: &ResourceConstants,
        _config: &SectorConfig,
    ) -> Result<ResourceDelays, ConfigurationError> {
        Ok(ResourceDelays::default())
    }

    fn advance_levels(&mut self, k: usize) -> Result<(), Error> {
        let dt = self.config.grid.dt();
        let Parts {
            constants: c,
            variables: v,
            ..
        } = self.state.parts("advance resource levels")?;

        if k == 0 {
            v.nr[0] = c.nri;
            v.nrtd[0] = c.nrtdi;
            return Ok(());
        }

        let j = k - 1;
        v.nr[k] = v.nr[j].step(-v.nrur[j], dt);
        v.nrtd[k] = v.nrtd[j].step(v.nrtdr[j], dt);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::PolicyYears;

    fn ready(policy: PolicyYears, overrides: &[(&str, f64)]) -> Resource {
        let config = SectorConfig::new(1900.0, 2000.0, 1.0)
            .unwrap()
            .with_policy(policy);
        let mut resource = Resource::new(config);
        resource.init_constants(overrides).unwrap();
        resource.init_variables().unwrap();
        resource.set_table_functions().unwrap();
        resource.set_delay_functions().unwrap();
        resource
    }

    #[test]
    fn untouched_stock_costs_little_capital() {
        let mut resource = ready(PolicyYears::default(), &[]);

        resource.advance_levels(0).unwrap();
        resource.update_state(0).unwrap();

        let v = resource.variables().unwrap();
        assert_eq!(v.nr[0], 1e12);
        assert_eq!(v.nrfr[0], 1.0);
        assert_relative_eq!(v.fcaor[0], 0.05);
        assert_relative_eq!(v.nruf[0], 1.0);
    }

    #[test]
    fn depletion_follows_usage() {
        let mut resource = ready(PolicyYears::default(), &[("nri", 2e12)]);
        resource.advance_levels(0).unwrap();
        resource.state.parts("test").unwrap().variables.nrur[0] = 1e10;
        resource.state.parts("test").unwrap().variables.nrtdr[0] = 0.0;

        resource.advance_levels(1).unwrap();
        resource.update_state(1).unwrap();

        let v = resource.variables().unwrap();
        assert_relative_eq!(v.nr[1], 2e12 - 1e10);
        assert_relative_eq!(v.nrfr[1], 0.995);
    }

    #[test]
    fn fcaor_switches_curves_at_policy_year() {
        let policy = PolicyYears {
            pyear_fcaor: 1900.0,
            ..PolicyYears::default()
        };
        let mut resource = ready(policy, &[("nri", 1e12)]);
        resource.advance_levels(0).unwrap();
        resource.state.parts("test").unwrap().variables.nr[0] = 5e11;

        resource.update_state(0).unwrap();

        // Half remaining: 0.1 on the first curve, 0.05 on the second.
        assert_relative_eq!(resource.variables().unwrap().fcaor[0], 0.05);
    }
}

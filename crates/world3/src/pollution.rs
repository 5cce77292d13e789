//! Persistent pollution sector.
//!
//! Pollution is generated by resource use in industry and by agricultural
//! inputs, reaches the persistent stock through a third-order material delay,
//! and is assimilated at a rate that slows as the stock grows. Pollution
//! control technology, once adopted, reduces generation toward the desired
//! pollution level.

use world3_core::{
    ConfigurationError, StepIntegrable, TableFunction, clip,
    delay::{Delay3, Dlinf3},
};

use crate::{
    Error, SectorConfig,
    agriculture::Agriculture,
    population::Population,
    resource::Resource,
    sector::{Parts, Sector, SectorState, constants, variables},
};

constants! {
    /// Pollution sector constants.
    PollutionConstants in "pollution" {
        /// Initial persistent pollution.
        ppoli = 2.5e7,
        /// Persistent pollution in 1970.
        ppol70 = 1.36e8,
        /// Assimilation half-life in 1970.
        ahl70 = 1.5,
        /// Agricultural material toxicity index.
        amti = 1.0,
        /// Industrial material toxicity index.
        imti = 10.0,
        /// Industrial material emissions factor.
        imef = 0.1,
        /// Fraction of agricultural inputs that persist.
        fipm = 0.001,
        /// Fraction of resources that persist as pollution.
        frpm = 0.02,
        /// Persistent pollution transmission delay.
        pptd = 20.0,
        /// Generation factor before pollution technology.
        ppgf1 = 1.0,
        /// Desired persistent pollution index.
        dppolx = 1.2,
        /// Initial pollution control technology.
        ptdi = 1.0,
        /// Technology development delay.
        tdd = 20.0,
    }
}

variables! {
    /// Pollution sector variable series.
    PollutionVariables {
        ppol, ptd, ppolx, ppgr, ppgi, ppga, ppgf, ppgf2,
        ppapr, ppasr, ahl, ahlm, ptdr, ptcm,
    }
}

/// Pollution sector table functions.
#[derive(Debug, Clone)]
pub struct PollutionTables {
    pub ahlm: TableFunction,
    pub ptcm: TableFunction,
}

impl PollutionTables {
    /// The World3-03 pollution tables.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if any knot set is malformed.
    pub fn standard() -> Result<Self, ConfigurationError> {
        Ok(Self {
            ahlm: TableFunction::new(
                "ahlm",
                &[1.0, 251.0, 501.0, 751.0, 1001.0],
                &[1.0, 11.0, 21.0, 31.0, 41.0],
            )?,
            ptcm: TableFunction::new("ptcm", &[-1.0, 0.0], &[-0.04, 0.0])?,
        })
    }
}

/// Pollution sector delay sites.
#[derive(Debug, Clone, Default)]
pub struct PollutionDelays {
    /// Generated pollution in transit to the persistent stock.
    pub ppapr: Delay3,
    /// Generation factor once pollution technology is adopted.
    pub ppgf2: Dlinf3,
}

type State = SectorState<PollutionConstants, PollutionVariables, PollutionTables, PollutionDelays>;

#[derive(Debug)]
pub struct Pollution {
    config: SectorConfig,
    state: State,
}

impl Pollution {
    #[must_use]
    pub fn new(config: SectorConfig) -> Self {
        Self {
            config,
            state: SectorState::new(Self::NAME),
        }
    }

    /// Pollution index, generation factor, and assimilation at step `k`.
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
        } = self.state.parts("update pollution state")?;

        v.ppolx[k] = v.ppol[k] / c.ppol70;
        v.ppgf2[k] = d.ppgf2.update(v.ptd[src], grid.dt(), c.tdd);
        v.ppgf[k] = clip(v.ppgf2[k], c.ppgf1, time, policy.pyear_pp_tech);
        v.ahlm[k] = t.ahlm.evaluate(v.ppolx[k])?;
        v.ahl[k] = c.ahl70 * v.ahlm[k];
        v.ppasr[k] = v.ppol[k] / (1.4 * v.ahl[k]);
        Ok(())
    }

    /// Pollution generation, arrival, and technology change at step `k`.
    ///
    /// Reads resource usage per capita and agricultural inputs per hectare,
    /// so it runs after the agriculture and resource usage stages.
    ///
    /// # Errors
    ///
    /// Returns a [`StateError`](crate::StateError) if any sector is not set up.
    pub fn update_generation(
        &mut self,
        k: usize,
        population: &Population,
        agriculture: &Agriculture,
        resource: &Resource,
    ) -> Result<(), Error> {
        let grid = self.config.grid;
        let time = grid.time(k);
        let pyear_pp_tech = self.config.policy.pyear_pp_tech;
        let src = k.saturating_sub(1);

        let pop = population.variables()?;
        let agr = agriculture.variables()?;
        let res = resource.variables()?;
        let Parts {
            constants: c,
            variables: v,
            tables: t,
            delays: d,
        } = self.state.parts("update pollution generation")?;

        v.ppgi[k] = res.pcrum[k] * pop.pop[k] * c.frpm * c.imef * c.imti;
        v.ppga[k] = agr.aiph[k] * agr.al[k] * c.fipm * c.amti;
        v.ppgr[k] = (v.ppgi[k] + v.ppga[k]) * v.ppgf[k];
        v.ppapr[k] = d.ppapr.update(v.ppgr[src], grid.dt(), c.pptd);
        v.ptcm[k] = t.ptcm.evaluate(1.0 - v.ppolx[k] / c.dppolx)?;
        v.ptdr[k] = clip(v.ptd[k] * v.ptcm[k], 0.0, time, pyear_pp_tech);
        Ok(())
    }
}

impl Sector for Pollution {
    const NAME: &'static str = "pollution";

    type Constants = PollutionConstants;
    type Variables = PollutionVariables;
    type Tables = PollutionTables;
    type Delays = PollutionDelays;

    fn config(&self) -> &SectorConfig {
        &self.config
    }

    fn state(&self) -> &State {
        &self.state
    }

    fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    fn standard_tables() -> Result<PollutionTables, ConfigurationError> {
        PollutionTables::standard()
    }

    fn delay_sites(
        _constants: &PollutionConstants,
        _config: &SectorConfig,
    ) -> Result<PollutionDelays, ConfigurationError> {
        Ok(PollutionDelays::default())
    }

    fn advance_levels(&mut self, k: usize) -> Result<(), Error> {
        let dt = self.config.grid.dt();
        let Parts {
            constants: c,
            variables: v,
            ..
        } = self.state.parts("advance pollution levels")?;

        if k == 0 {
            v.ppol[0] = c.ppoli;
            v.ptd[0] = c.ptdi;
            return Ok(());
        }

        let j = k - 1;
        v.ppol[k] = v.ppol[j].step(v.ppapr[j] - v.ppasr[j], dt);
        v.ptd[k] = v.ptd[j].step(v.ptdr[j], dt);
        Ok(())
    }
}

//! Human welfare and ecological footprint indicators.
//!
//! Neither indicator feeds back into the model. Both are computed last in
//! each step from values the five sectors have already written.

use world3_core::{ConfigurationError, TableFunction};

use crate::{
    Error, SectorConfig,
    agriculture::Agriculture,
    capital::Capital,
    pollution::Pollution,
    population::Population,
    sector::{Parts, Sector, SectorState, constants, variables},
};

constants! {
    /// Welfare indicator constants.
    WelfareConstants in "welfare" {
        /// Reference low GDP per capita.
        rlgdp = 24.0,
        /// Reference high GDP per capita.
        rhgdp = 9508.0,
        /// Hectares of land needed to absorb one unit of pollution.
        hup = 4.0,
        /// Hectares per billion hectares.
        ghaha = 1e9,
        /// Total land.
        tl = 1.91,
    }
}

variables! {
    /// Welfare indicator series.
    WelfareVariables {
        /// Human welfare index.
        hwi,
        /// Life expectancy index.
        lei,
        /// Education index.
        ei,
        /// GDP index.
        gdpi,
        /// GDP per capita.
        gdppc,
        /// Human ecological footprint.
        hef,
        /// Arable land in billions of hectares.
        algha,
        /// Urban land in billions of hectares.
        ulgha,
        /// Absorption land in billions of hectares.
        ablgha,
    }
}

/// Welfare indicator table functions.
#[derive(Debug, Clone)]
pub struct WelfareTables {
    pub lei: TableFunction,
    pub gdppc: TableFunction,
    pub ei: TableFunction,
}

impl WelfareTables {
    /// The World3-03 welfare tables.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if any knot set is malformed.
    pub fn standard() -> Result<Self, ConfigurationError> {
        Ok(Self {
            lei: TableFunction::new(
                "lei",
                &[25.0, 35.0, 45.0, 55.0, 65.0, 75.0, 85.0],
                &[0.0, 0.16, 0.33, 0.5, 0.67, 0.84, 1.0],
            )?,
            gdppc: TableFunction::new(
                "gdppc",
                &[
                    0.0, 200.0, 400.0, 600.0, 800.0, 1000.0, 1200.0, 1400.0, 1600.0,
                ],
                &[
                    120.0, 600.0, 1200.0, 1800.0, 2500.0, 3200.0, 3900.0, 4600.0, 5400.0,
                ],
            )?,
            ei: TableFunction::new(
                "ei",
                &[
                    0.0, 1000.0, 2000.0, 3000.0, 4000.0, 5000.0, 6000.0, 7000.0,
                ],
                &[0.0, 0.81, 0.88, 0.92, 0.95, 0.98, 0.99, 1.0],
            )?,
        })
    }
}

type State = SectorState<WelfareConstants, WelfareVariables, WelfareTables, ()>;

#[derive(Debug)]
pub struct Welfare {
    config: SectorConfig,
    state: State,
}

impl Welfare {
    #[must_use]
    pub fn new(config: SectorConfig) -> Self {
        Self {
            config,
            state: SectorState::new(Self::NAME),
        }
    }

    /// Both indicators at step `k`.
    ///
    /// # Errors
    ///
    /// Returns a [`StateError`](crate::StateError) if any sector is not set up.
    pub fn update(
        &mut self,
        k: usize,
        population: &Population,
        capital: &Capital,
        agriculture: &Agriculture,
        pollution: &Pollution,
    ) -> Result<(), Error> {
        let pop = population.variables()?;
        let cap = capital.variables()?;
        let agr = agriculture.variables()?;
        let pol = pollution.variables()?;
        let Parts {
            constants: c,
            variables: v,
            tables: t,
            ..
        } = self.state.parts("update welfare")?;

        v.lei[k] = t.lei.evaluate(pop.le[k])?;
        v.gdppc[k] = t.gdppc.evaluate(cap.iopc[k])?;
        v.ei[k] = t.ei.evaluate(v.gdppc[k])?;
        v.gdpi[k] = (v.gdppc[k] / c.rlgdp).ln() / (c.rhgdp / c.rlgdp).ln();
        v.hwi[k] = (v.lei[k] + v.ei[k] + v.gdpi[k]) / 3.0;

        v.algha[k] = agr.al[k] / c.ghaha;
        v.ulgha[k] = agr.uil[k] / c.ghaha;
        v.ablgha[k] = pol.ppgr[k] * c.hup / c.ghaha;
        v.hef[k] = (v.algha[k] + v.ulgha[k] + v.ablgha[k]) / c.tl;
        Ok(())
    }
}

impl Sector for Welfare {
    const NAME: &'static str = "welfare";

    type Constants = WelfareConstants;
    type Variables = WelfareVariables;
    type Tables = WelfareTables;
    type Delays = ();

    fn config(&self) -> &SectorConfig {
        &self.config
    }

    fn state(&self) -> &State {
        &self.state
    }

    fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    fn standard_tables() -> Result<WelfareTables, ConfigurationError> {
        WelfareTables::standard()
    }

    fn delay_sites(
        _constants: &WelfareConstants,
        _config: &SectorConfig,
    ) -> Result<(), ConfigurationError> {
        Ok(())
    }

    /// No levels; only checks that the sector is ready to step.
    fn advance_levels(&mut self, _k: usize) -> Result<(), Error> {
        self.state.parts("advance welfare levels")?;
        Ok(())
    }
}

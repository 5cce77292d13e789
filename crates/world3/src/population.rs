//! Population sector.
//!
//! Four age cohorts (0-14, 15-44, 45-64, 65+) are aged forward by maturation
//! and thinned by age-specific mortality. Mortality follows life expectancy,
//! which responds to food, health services, crowding, and pollution. Births
//! follow total fertility, a blend of the maximum biologically possible
//! family size and the desired family size weighted by how effectively
//! fertility is controlled.

use world3_core::{
    ConfigurationError, StepIntegrable, TableFunction, clip,
    delay::{Dlinf3, Smooth},
};

use crate::{
    Error, SectorConfig,
    agriculture::Agriculture,
    capital::Capital,
    pollution::Pollution,
    sector::{Parts, Sector, SectorState, constants, variables},
};

constants! {
    /// Population sector constants.
    PopulationConstants in "population" {
        /// Initial population aged 0-14.
        p1i = 65e7,
        /// Initial population aged 15-44.
        p2i = 70e7,
        /// Initial population aged 45-64.
        p3i = 19e7,
        /// Initial population aged 65 and over.
        p4i = 6e7,
        /// Desired completed family size normal.
        dcfsn = 3.8,
        /// Fertility control effectiveness time.
        fcest = 4000.0,
        /// Health services impact delay.
        hsid = 20.0,
        /// Income expectation averaging time.
        ieat = 3.0,
        /// Life expectancy normal.
        len = 28.0,
        /// Lifetime perception delay.
        lpd = 20.0,
        /// Maximum total fertility normal.
        mtfn = 12.0,
        /// Population equilibrium time.
        pet = 4000.0,
        /// Reproductive lifetime.
        rlt = 30.0,
        /// Social adjustment delay.
        sad = 20.0,
        /// Zero population growth target time.
        zpgt = 4000.0,
        /// Subsistence food per capita.
        sfpc = 230.0,
        /// Family response to social norm at the first step.
        frsni = 0.82,
    }
}

variables! {
    /// Population sector variable series.
    PopulationVariables {
        p1, p2, p3, p4, pop,
        d1, d2, d3, d4, d, cdr,
        m1, m2, m3, m4,
        mat1, mat2, mat3,
        le, lmf, lmhs, lmhs1, lmhs2, ehspc, hsapc,
        lmc, cmi, fpu, lmp,
        b, cbr, tf, mtf, fm, dtf, dcfs, cmple, ple,
        sfsn, diopc, frsn, fie, aiopc,
        nfc, fce, fcfpc, fcapc, fsafc,
    }
}

const LIFE_EXPECTANCY: [f64; 7] = [20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0];
const PER_CAPITA_OUTPUT: [f64; 9] = [
    0.0, 200.0, 400.0, 600.0, 800.0, 1000.0, 1200.0, 1400.0, 1600.0,
];
const DECADES: [f64; 9] = [0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0];

/// Population sector table functions.
#[derive(Debug, Clone)]
pub struct PopulationTables {
    pub m1: TableFunction,
    pub m2: TableFunction,
    pub m3: TableFunction,
    pub m4: TableFunction,
    pub lmf: TableFunction,
    pub hsapc: TableFunction,
    pub lmhs1: TableFunction,
    pub lmhs2: TableFunction,
    pub fpu: TableFunction,
    pub cmi: TableFunction,
    pub lmp: TableFunction,
    pub fm: TableFunction,
    pub cmple: TableFunction,
    pub sfsn: TableFunction,
    pub frsn: TableFunction,
    pub fce: TableFunction,
    pub fsafc: TableFunction,
}

impl PopulationTables {
    /// The World3-03 population tables.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if any knot set is malformed.
    pub fn standard() -> Result<Self, ConfigurationError> {
        Ok(Self {
            m1: TableFunction::new(
                "m1",
                &LIFE_EXPECTANCY,
                &[0.0567, 0.0366, 0.0243, 0.0155, 0.0082, 0.0023, 0.001],
            )?,
            m2: TableFunction::new(
                "m2",
                &LIFE_EXPECTANCY,
                &[0.0266, 0.0171, 0.011, 0.0065, 0.004, 0.0016, 0.0008],
            )?,
            m3: TableFunction::new(
                "m3",
                &LIFE_EXPECTANCY,
                &[0.0562, 0.0373, 0.0252, 0.0171, 0.0118, 0.0083, 0.006],
            )?,
            m4: TableFunction::new(
                "m4",
                &LIFE_EXPECTANCY,
                &[0.13, 0.11, 0.09, 0.07, 0.06, 0.05, 0.04],
            )?,
            lmf: TableFunction::new(
                "lmf",
                &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
                &[0.0, 1.0, 1.43, 1.5, 1.5, 1.5],
            )?,
            hsapc: TableFunction::new(
                "hsapc",
                &[
                    0.0, 250.0, 500.0, 750.0, 1000.0, 1250.0, 1500.0, 1750.0, 2000.0,
                ],
                &[0.0, 20.0, 50.0, 95.0, 140.0, 175.0, 200.0, 220.0, 230.0],
            )?,
            lmhs1: TableFunction::new(
                "lmhs1",
                &[0.0, 20.0, 40.0, 60.0, 80.0, 100.0],
                &[1.0, 1.1, 1.4, 1.6, 1.7, 1.8],
            )?,
            lmhs2: TableFunction::new(
                "lmhs2",
                &[0.0, 20.0, 40.0, 60.0, 80.0, 100.0],
                &[1.0, 1.5, 1.9, 2.0, 2.0, 2.0],
            )?,
            fpu: TableFunction::new(
                "fpu",
                &[0.0, 2e9, 4e9, 6e9, 8e9, 10e9, 12e9, 14e9, 16e9],
                &[0.0, 0.2, 0.4, 0.5, 0.58, 0.65, 0.72, 0.78, 0.8],
            )?,
            cmi: TableFunction::new(
                "cmi",
                &PER_CAPITA_OUTPUT,
                &[0.5, 0.05, -0.1, -0.08, -0.02, 0.05, 0.1, 0.15, 0.2],
            )?,
            lmp: TableFunction::new(
                "lmp",
                &[
                    0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0,
                ],
                &[1.0, 0.99, 0.97, 0.95, 0.9, 0.85, 0.75, 0.65, 0.55, 0.4, 0.2],
            )?,
            fm: TableFunction::new(
                "fm",
                &DECADES,
                &[0.0, 0.2, 0.4, 0.6, 0.7, 0.75, 0.79, 0.84, 0.87],
            )?,
            cmple: TableFunction::new(
                "cmple",
                &DECADES,
                &[3.0, 2.1, 1.6, 1.4, 1.3, 1.2, 1.1, 1.05, 1.0],
            )?,
            sfsn: TableFunction::new(
                "sfsn",
                &[0.0, 200.0, 400.0, 600.0, 800.0],
                &[1.25, 0.94, 0.715, 0.59, 0.5],
            )?,
            frsn: TableFunction::new(
                "frsn",
                &[-0.2, -0.1, 0.0, 0.1, 0.2],
                &[0.5, 0.6, 0.7, 0.85, 1.0],
            )?,
            fce: TableFunction::new(
                "fce",
                &[0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0],
                &[0.75, 0.85, 0.9, 0.95, 0.98, 0.99, 1.0],
            )?,
            fsafc: TableFunction::new(
                "fsafc",
                &[0.0, 2.0, 4.0, 6.0, 8.0, 10.0],
                &[0.0, 0.005, 0.015, 0.025, 0.03, 0.035],
            )?,
        })
    }
}

/// Population sector delay sites.
#[derive(Debug, Clone, Default)]
pub struct PopulationDelays {
    /// Effective health services per capita.
    pub ehspc: Smooth,
    /// Average industrial output per capita.
    pub aiopc: Smooth,
    /// Delayed industrial output per capita.
    pub diopc: Dlinf3,
    /// Perceived life expectancy.
    pub ple: Dlinf3,
    /// Fertility control facilities per capita.
    pub fcfpc: Dlinf3,
}

type State = SectorState<PopulationConstants, PopulationVariables, PopulationTables, PopulationDelays>;

#[derive(Debug)]
pub struct Population {
    config: SectorConfig,
    state: State,
}

impl Population {
    #[must_use]
    pub fn new(config: SectorConfig) -> Self {
        Self {
            config,
            state: SectorState::new(Self::NAME),
        }
    }

    /// Total population and the urban fraction it implies.
    ///
    /// # Errors
    ///
    /// Returns a [`StateError`](crate::StateError) before the sector is set up.
    pub fn update_totals(&mut self, k: usize) -> Result<(), Error> {
        let Parts {
            variables: v,
            tables: t,
            ..
        } = self.state.parts("update population totals")?;

        v.pop[k] = v.p1[k] + v.p2[k] + v.p3[k] + v.p4[k];
        v.fpu[k] = t.fpu.evaluate(v.pop[k])?;
        Ok(())
    }

    /// Life expectancy, deaths, maturation, and births at step `k`.
    ///
    /// Reads per capita service and industrial output, food per capita, and
    /// the pollution index, all of which must already be written for `k`.
    ///
    /// # Errors
    ///
    /// Returns a [`StateError`](crate::StateError) if any sector is not set up.
    pub fn update_dynamics(
        &mut self,
        k: usize,
        capital: &Capital,
        agriculture: &Agriculture,
        pollution: &Pollution,
    ) -> Result<(), Error> {
        let grid = self.config.grid;
        let policy = self.config.policy;
        let time = grid.time(k);
        let dt = grid.dt();
        let src = k.saturating_sub(1);

        let cap = capital.variables()?;
        let agr = agriculture.variables()?;
        let pol = pollution.variables()?;
        let Parts {
            constants: c,
            variables: v,
            tables: t,
            delays: d,
        } = self.state.parts("update population dynamics")?;

        // Life expectancy.
        v.lmf[k] = t.lmf.evaluate(agr.fpc[k] / c.sfpc)?;
        v.hsapc[k] = t.hsapc.evaluate(cap.sopc[k])?;
        v.ehspc[k] = d.ehspc.update(v.hsapc[src], dt, c.hsid);
        v.lmhs1[k] = t.lmhs1.evaluate(v.ehspc[k])?;
        v.lmhs2[k] = t.lmhs2.evaluate(v.ehspc[k])?;
        v.lmhs[k] = clip(v.lmhs2[k], v.lmhs1[k], time, policy.iphst);
        v.cmi[k] = t.cmi.evaluate(cap.iopc[k])?;
        v.lmc[k] = 1.0 - v.cmi[k] * v.fpu[k];
        v.lmp[k] = t.lmp.evaluate(pol.ppolx[k])?;
        v.le[k] = c.len * v.lmf[k] * v.lmhs[k] * v.lmp[k] * v.lmc[k];

        // Mortality and maturation.
        v.m1[k] = t.m1.evaluate(v.le[k])?;
        v.m2[k] = t.m2.evaluate(v.le[k])?;
        v.m3[k] = t.m3.evaluate(v.le[k])?;
        v.m4[k] = t.m4.evaluate(v.le[k])?;
        v.d1[k] = v.p1[k] * v.m1[k];
        v.d2[k] = v.p2[k] * v.m2[k];
        v.d3[k] = v.p3[k] * v.m3[k];
        v.d4[k] = v.p4[k] * v.m4[k];
        v.d[k] = v.d1[k] + v.d2[k] + v.d3[k] + v.d4[k];
        v.cdr[k] = 1000.0 * v.d[k] / v.pop[k];
        v.mat1[k] = v.p1[k] * (1.0 - v.m1[k]) / 15.0;
        v.mat2[k] = v.p2[k] * (1.0 - v.m2[k]) / 30.0;
        v.mat3[k] = v.p3[k] * (1.0 - v.m3[k]) / 20.0;

        // Desired family size.
        v.aiopc[k] = d.aiopc.update(cap.iopc[src], dt, c.ieat);
        v.diopc[k] = d.diopc.update(cap.iopc[src], dt, c.sad);
        v.fie[k] = (cap.iopc[k] - v.aiopc[k]) / v.aiopc[k];
        v.sfsn[k] = t.sfsn.evaluate(v.diopc[k])?;
        v.frsn[k] = if k == 0 {
            c.frsni
        } else {
            t.frsn.evaluate(v.fie[k])?
        };
        v.dcfs[k] = clip(2.0, c.dcfsn * v.frsn[k] * v.sfsn[k], time, c.zpgt);
        v.ple[k] = d.ple.update(v.le[src], dt, c.lpd);
        v.cmple[k] = t.cmple.evaluate(v.ple[k])?;
        v.dtf[k] = v.dcfs[k] * v.cmple[k];

        // Maximum fertility and its control.
        v.fm[k] = t.fm.evaluate(v.le[k])?;
        v.mtf[k] = c.mtfn * v.fm[k];
        v.nfc[k] = v.mtf[k] / v.dtf[k] - 1.0;
        v.fsafc[k] = t.fsafc.evaluate(v.nfc[k])?;
        v.fcapc[k] = v.fsafc[k] * cap.sopc[k];
        v.fcfpc[k] = d.fcfpc.update(v.fcapc[src], dt, c.hsid);
        v.fce[k] = clip(1.0, t.fce.evaluate(v.fcfpc[k])?, time, c.fcest);
        v.tf[k] = v.mtf[k].min(v.mtf[k] * (1.0 - v.fce[k]) + v.dtf[k] * v.fce[k]);

        // Births.
        v.b[k] = clip(v.d[k], v.tf[k] * v.p2[k] * 0.5 / c.rlt, time, c.pet);
        v.cbr[k] = 1000.0 * v.b[k] / v.pop[k];
        Ok(())
    }
}

impl Sector for Population {
    const NAME: &'static str = "population";

    type Constants = PopulationConstants;
    type Variables = PopulationVariables;
    type Tables = PopulationTables;
    type Delays = PopulationDelays;

    fn config(&self) -> &SectorConfig {
        &self.config
    }

    fn state(&self) -> &State {
        &self.state
    }

    fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    fn standard_tables() -> Result<PopulationTables, ConfigurationError> {
        PopulationTables::standard()
    }

    fn delay_sites(
        _constants: &PopulationConstants,
        _config: &SectorConfig,
    ) -> Result<PopulationDelays, ConfigurationError> {
        Ok(PopulationDelays::default())
    }

    fn advance_levels(&mut self, k: usize) -> Result<(), Error> {
        let dt = self.config.grid.dt();
        let Parts {
            constants: c,
            variables: v,
            ..
        } = self.state.parts("advance population levels")?;

        if k == 0 {
            v.p1[0] = c.p1i;
            v.p2[0] = c.p2i;
            v.p3[0] = c.p3i;
            v.p4[0] = c.p4i;
            return Ok(());
        }

        let j = k - 1;
        v.p1[k] = v.p1[j].step(v.b[j] - v.d1[j] - v.mat1[j], dt);
        v.p2[k] = v.p2[j].step(v.mat1[j] - v.d2[j] - v.mat2[j], dt);
        v.p3[k] = v.p3[j].step(v.mat2[j] - v.d3[j] - v.mat3[j], dt);
        v.p4[k] = v.p4[j].step(v.mat3[j] - v.d4[j], dt);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::{Lifecycle, sector::ConstantSet};

    fn ready() -> Population {
        let mut population = Population::new(SectorConfig::new(1900.0, 1910.0, 1.0).unwrap());
        population.init_constants(&[]).unwrap();
        population.init_variables().unwrap();
        population.set_table_functions().unwrap();
        population.set_delay_functions().unwrap();
        population
    }

    #[test]
    fn defaults_and_overrides() {
        let mut population = Population::new(SectorConfig::new(1900.0, 2100.0, 1.0).unwrap());
        population
            .init_constants(&[("p1i", 7e8), ("len", 30.0)])
            .unwrap();

        let constants = population.constants().unwrap();
        assert_eq!(constants.p1i, 7e8);
        assert_eq!(constants.len, 30.0);
        assert_eq!(constants.p2i, 70e7);
        assert_eq!(PopulationConstants::default().p1i, 65e7);
    }

    #[test]
    fn unknown_override_is_rejected_without_setting_constants() {
        let mut population = Population::new(SectorConfig::new(1900.0, 2100.0, 1.0).unwrap());

        let error = population
            .init_constants(&[("p1i", 7e8), ("nri", 1.0)])
            .unwrap_err();

        assert!(matches!(error, Error::Configuration(_)));
        assert_eq!(population.lifecycle(), Lifecycle::Created);
    }

    #[test]
    fn lifecycle_calls_must_be_ordered() {
        let mut population = Population::new(SectorConfig::new(1900.0, 2100.0, 1.0).unwrap());

        assert!(matches!(
            population.init_variables(),
            Err(Error::State(error)) if error.required == Lifecycle::ConstantsSet
        ));
        population.init_constants(&[]).unwrap();
        assert!(matches!(
            population.set_delay_functions(),
            Err(Error::State(error)) if error.required == Lifecycle::TablesSet
        ));
        assert!(matches!(population.advance_levels(0), Err(Error::State(_))));
    }

    #[test]
    fn variables_are_undefined_until_computed() {
        let population = ready();
        let variables = population.variables().unwrap();

        assert_eq!(variables.p1.len(), 11);
        assert!(variables.p1.iter().all(|value| value.is_nan()));
        assert!(variables.le.iter().all(|value| value.is_nan()));
    }

    #[test]
    fn step_zero_seeds_cohorts_and_totals() {
        let mut population = ready();

        population.advance_levels(0).unwrap();
        population.update_totals(0).unwrap();

        let v = population.variables().unwrap();
        assert_eq!(v.p1[0], 65e7);
        assert_eq!(v.p4[0], 6e7);
        assert_relative_eq!(v.pop[0], 1.6e9);
        // 1.6e9 lies between the 0.0 and 2e9 knots of the urban fraction table.
        assert_relative_eq!(v.fpu[0], 0.16, epsilon = 1e-12);
        assert!(v.p1[1].is_nan());
    }

    #[test]
    fn cohorts_integrate_previous_rates() {
        let mut population = ready();
        population.advance_levels(0).unwrap();
        {
            let v = population.state.parts("test").unwrap().variables;
            v.b[0] = 5e7;
            v.d1[0] = 1e7;
            v.mat1[0] = 2e7;
            v.d2[0] = 0.0;
            v.mat2[0] = 0.0;
            v.d3[0] = 0.0;
            v.mat3[0] = 0.0;
            v.d4[0] = 3e6;
        }

        population.advance_levels(1).unwrap();

        let v = population.variables().unwrap();
        assert_relative_eq!(v.p1[1], 65e7 + 2e7);
        assert_relative_eq!(v.p2[1], 70e7 + 2e7);
        assert_relative_eq!(v.p3[1], 19e7);
        assert_relative_eq!(v.p4[1], 6e7 - 3e6);
    }

    #[test]
    fn standard_tables_match_knots() {
        let tables = PopulationTables::standard().unwrap();

        assert_relative_eq!(tables.m1.evaluate(20.0).unwrap(), 0.0567);
        assert_relative_eq!(tables.m4.evaluate(80.0).unwrap(), 0.04);
        assert_relative_eq!(tables.lmf.evaluate(9.0).unwrap(), 1.5);
        assert_relative_eq!(tables.frsn.evaluate(0.0).unwrap(), 0.7);
        assert_relative_eq!(tables.cmi.evaluate(300.0).unwrap(), -0.025, epsilon = 1e-12);
        assert_eq!(PopulationConstants::NAMES.len(), 17);
    }
}

//! Capital sector.
//!
//! Industrial capital produces industrial output, which is split between
//! agriculture, services, consumption, and reinvestment. Service capital
//! produces services. Jobs in industry, services, and agriculture set the
//! labor utilization fraction, which feeds back on capacity utilization
//! through its smoothed value.

use world3_core::{ConfigurationError, StepIntegrable, TableFunction, clip, delay::Smooth};

use crate::{
    Error, SectorConfig,
    agriculture::Agriculture,
    population::Population,
    resource::Resource,
    sector::{Parts, Sector, SectorState, constants, variables},
};

constants! {
    /// Capital sector constants.
    CapitalConstants in "capital" {
        /// Initial industrial capital.
        ici = 2.1e11,
        /// Initial service capital.
        sci = 1.44e11,
        /// Industrial equilibrium time.
        iet = 4000.0,
        /// Industrial output per capita desired.
        iopcd = 400.0,
        /// Labor force participation fraction.
        lfpf = 0.75,
        /// Labor utilization fraction delay time.
        lufdt = 2.0,
        /// Initial delayed labor utilization fraction.
        lufdi = 1.0,
        icor1 = 3.0,
        icor2 = 3.0,
        scor1 = 1.0,
        scor2 = 1.0,
        alic1 = 14.0,
        alic2 = 14.0,
        alsc1 = 20.0,
        alsc2 = 20.0,
        fioac1 = 0.43,
        fioac2 = 0.43,
    }
}

variables! {
    /// Capital sector variable series.
    CapitalVariables {
        ic, icir, icdr, icor, alic, io, iopc, fioai, fioac, fioacc, fioacv,
        sc, scir, scdr, scor, alsc, so, sopc, fioas, fioas1, fioas2,
        isopc, isopc1, isopc2,
        cuf, lufd, luf, lf, j, pjis, jpicu, pjss, jpscu, pjas, jph,
    }
}

const PER_CAPITA_OUTPUT: [f64; 9] = [
    0.0, 200.0, 400.0, 600.0, 800.0, 1000.0, 1200.0, 1400.0, 1600.0,
];
const SERVICE_RATIO: [f64; 5] = [0.0, 0.5, 1.0, 1.5, 2.0];
const CAPITAL_PER_CAPITA: [f64; 6] = [50.0, 200.0, 350.0, 500.0, 650.0, 800.0];

/// Capital sector table functions.
#[derive(Debug, Clone)]
pub struct CapitalTables {
    pub fioacv: TableFunction,
    pub isopc1: TableFunction,
    pub isopc2: TableFunction,
    pub fioas1: TableFunction,
    pub fioas2: TableFunction,
    pub jpicu: TableFunction,
    pub jpscu: TableFunction,
    pub jph: TableFunction,
    pub cuf: TableFunction,
}

impl CapitalTables {
    /// The World3-03 capital tables.
    ///
    /// Jobs per unit capital are stored in jobs per thousand dollars, as
    /// published, and scaled on use.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if any knot set is malformed.
    pub fn standard() -> Result<Self, ConfigurationError> {
        let isopc = [
            40.0, 300.0, 640.0, 1000.0, 1220.0, 1450.0, 1650.0, 1800.0, 2000.0,
        ];
        let fioas = [0.3, 0.2, 0.1, 0.05, 0.0];
        Ok(Self {
            fioacv: TableFunction::new(
                "fioacv",
                &[0.0, 0.2, 0.4, 0.6, 0.8, 1.0, 1.2, 1.4, 1.6, 1.8, 2.0],
                &[0.3, 0.32, 0.34, 0.36, 0.38, 0.43, 0.73, 0.77, 0.81, 0.82, 0.83],
            )?,
            isopc1: TableFunction::new("isopc1", &PER_CAPITA_OUTPUT, &isopc)?,
            isopc2: TableFunction::new("isopc2", &PER_CAPITA_OUTPUT, &isopc)?,
            fioas1: TableFunction::new("fioas1", &SERVICE_RATIO, &fioas)?,
            fioas2: TableFunction::new("fioas2", &SERVICE_RATIO, &fioas)?,
            jpicu: TableFunction::new(
                "jpicu",
                &CAPITAL_PER_CAPITA,
                &[0.37, 0.18, 0.12, 0.09, 0.07, 0.06],
            )?,
            jpscu: TableFunction::new(
                "jpscu",
                &CAPITAL_PER_CAPITA,
                &[1.1, 0.6, 0.35, 0.2, 0.15, 0.15],
            )?,
            jph: TableFunction::new(
                "jph",
                &[2.0, 6.0, 10.0, 14.0, 18.0, 22.0, 26.0, 30.0],
                &[2.0, 0.5, 0.4, 0.3, 0.27, 0.24, 0.2, 0.2],
            )?,
            cuf: TableFunction::new(
                "cuf",
                &[1.0, 3.0, 5.0, 7.0, 9.0, 11.0],
                &[1.0, 0.9, 0.7, 0.3, 0.1, 0.1],
            )?,
        })
    }
}

/// Capital sector delay sites.
#[derive(Debug, Clone)]
pub struct CapitalDelays {
    /// Delayed labor utilization fraction.
    pub lufd: Smooth,
}

type State = SectorState<CapitalConstants, CapitalVariables, CapitalTables, CapitalDelays>;

#[derive(Debug)]
pub struct Capital {
    config: SectorConfig,
    state: State,
}

impl Capital {
    #[must_use]
    pub fn new(config: SectorConfig) -> Self {
        Self {
            config,
            state: SectorState::new(Self::NAME),
        }
    }

    /// Industrial and service output at step `k`.
    ///
    /// Reads total population and the fraction of capital allocated to
    /// obtaining resources.
    ///
    /// # Errors
    ///
    /// Returns a [`StateError`](crate::StateError) if any sector is not set up.
    pub fn update_output(
        &mut self,
        k: usize,
        population: &Population,
        resource: &Resource,
    ) -> Result<(), Error> {
        let time = self.config.grid.time(k);
        let pyear = self.config.policy.pyear;

        let pop = population.variables()?;
        let res = resource.variables()?;
        let Parts {
            constants: c,
            variables: v,
            tables: t,
            ..
        } = self.state.parts("update capital output")?;

        v.cuf[k] = t.cuf.evaluate(v.lufd[k])?;
        v.icor[k] = clip(c.icor2, c.icor1, time, pyear);
        v.io[k] = v.ic[k] * (1.0 - res.fcaor[k]) * v.cuf[k] / v.icor[k];
        v.iopc[k] = v.io[k] / pop.pop[k];

        v.scor[k] = clip(c.scor2, c.scor1, time, pyear);
        v.so[k] = v.sc[k] * v.cuf[k] / v.scor[k];
        v.sopc[k] = v.so[k] / pop.pop[k];
        Ok(())
    }

    /// Output allocation, capital investment and depreciation, and jobs at
    /// step `k`.
    ///
    /// Reads the agricultural share of output and the agricultural inputs
    /// per hectare, so it runs after the agriculture stage.
    ///
    /// # Errors
    ///
    /// Returns a [`StateError`](crate::StateError) if any sector is not set up.
    pub fn update_investment(
        &mut self,
        k: usize,
        population: &Population,
        agriculture: &Agriculture,
    ) -> Result<(), Error> {
        let time = self.config.grid.time(k);
        let pyear = self.config.policy.pyear;

        let pop = population.variables()?;
        let agr = agriculture.variables()?;
        let Parts {
            constants: c,
            variables: v,
            tables: t,
            ..
        } = self.state.parts("update capital investment")?;

        // Service allocation.
        v.isopc1[k] = t.isopc1.evaluate(v.iopc[k])?;
        v.isopc2[k] = t.isopc2.evaluate(v.iopc[k])?;
        v.isopc[k] = clip(v.isopc2[k], v.isopc1[k], time, pyear);
        v.fioas1[k] = t.fioas1.evaluate(v.sopc[k] / v.isopc[k])?;
        v.fioas2[k] = t.fioas2.evaluate(v.sopc[k] / v.isopc[k])?;
        v.fioas[k] = clip(v.fioas2[k], v.fioas1[k], time, pyear);

        // Consumption allocation.
        v.fioacv[k] = t.fioacv.evaluate(v.iopc[k] / c.iopcd)?;
        v.fioacc[k] = clip(c.fioac2, c.fioac1, time, pyear);
        v.fioac[k] = clip(v.fioacv[k], v.fioacc[k], time, c.iet);
        v.fioai[k] = 1.0 - agr.fioaa[k] - v.fioas[k] - v.fioac[k];

        // Investment and depreciation.
        v.alic[k] = clip(c.alic2, c.alic1, time, pyear);
        v.icir[k] = v.io[k] * v.fioai[k];
        v.icdr[k] = v.ic[k] / v.alic[k];
        v.alsc[k] = clip(c.alsc2, c.alsc1, time, pyear);
        v.scir[k] = v.io[k] * v.fioas[k];
        v.scdr[k] = v.sc[k] / v.alsc[k];

        // Jobs.
        v.jpicu[k] = t.jpicu.evaluate(v.iopc[k])? * 1e-3;
        v.pjis[k] = v.ic[k] * v.jpicu[k];
        v.jpscu[k] = t.jpscu.evaluate(v.sopc[k])? * 1e-3;
        v.pjss[k] = v.sc[k] * v.jpscu[k];
        v.jph[k] = t.jph.evaluate(agr.aiph[k])?;
        v.pjas[k] = v.jph[k] * agr.al[k];
        v.j[k] = v.pjis[k] + v.pjss[k] + v.pjas[k];
        v.lf[k] = (pop.p2[k] + pop.p3[k]) * c.lfpf;
        v.luf[k] = v.j[k] / v.lf[k];
        Ok(())
    }
}

impl Sector for Capital {
    const NAME: &'static str = "capital";

    type Constants = CapitalConstants;
    type Variables = CapitalVariables;
    type Tables = CapitalTables;
    type Delays = CapitalDelays;

    fn config(&self) -> &SectorConfig {
        &self.config
    }

    fn state(&self) -> &State {
        &self.state
    }

    fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    fn standard_tables() -> Result<CapitalTables, ConfigurationError> {
        CapitalTables::standard()
    }

    fn delay_sites(
        constants: &CapitalConstants,
        _config: &SectorConfig,
    ) -> Result<CapitalDelays, ConfigurationError> {
        Ok(CapitalDelays {
            lufd: Smooth::seeded(constants.lufdi),
        })
    }

    fn advance_levels(&mut self, k: usize) -> Result<(), Error> {
        let dt = self.config.grid.dt();
        let Parts {
            constants: c,
            variables: v,
            delays: d,
            ..
        } = self.state.parts("advance capital levels")?;

        if k == 0 {
            v.ic[0] = c.ici;
            v.sc[0] = c.sci;
            v.lufd[0] = d.lufd.output().unwrap_or(c.lufdi);
            return Ok(());
        }

        let j = k - 1;
        v.ic[k] = v.ic[j].step(v.icir[j] - v.icdr[j], dt);
        v.sc[k] = v.sc[j].step(v.scir[j] - v.scdr[j], dt);
        v.lufd[k] = d.lufd.update(v.luf[j], dt, c.lufdt);
        Ok(())
    }
}

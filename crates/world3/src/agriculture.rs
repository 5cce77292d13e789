//! Agriculture sector.
//!
//! Arable land is developed from potentially arable land, eroded, and lost to
//! urban-industrial use. Land yield combines land fertility, agricultural
//! inputs per hectare, air pollution, and yield technology. Investment in
//! agriculture is split between developing new land and raising yields on
//! existing land according to their marginal productivities.
//!
//! Land fertility degrades with persistent pollution and regenerates toward
//! its inherent level when inputs are devoted to maintenance.

use world3_core::{
    ConfigurationError, StepIntegrable, TableFunction, clip,
    delay::{Dlinf3, Smooth},
};

use crate::{
    Error, SectorConfig,
    capital::Capital,
    pollution::Pollution,
    population::Population,
    sector::{Parts, Sector, SectorState, constants, variables},
};

constants! {
    /// Agriculture sector constants.
    AgricultureConstants in "agriculture" {
        /// Initial arable land.
        ali = 0.9e9,
        /// Initial potentially arable land.
        pali = 2.3e9,
        /// Land fraction harvested.
        lfh = 0.7,
        /// Potentially arable land total.
        palt = 3.2e9,
        /// Processing loss.
        pl = 0.1,
        /// Average lifetime of agricultural inputs before the policy year.
        alai1 = 2.0,
        /// Average lifetime of agricultural inputs after the policy year.
        alai2 = 2.0,
        /// Industrial output in 1970.
        io70 = 7.9e11,
        /// Land yield factor before yield technology.
        lyf1 = 1.0,
        /// Social discount.
        sd = 0.07,
        /// Initial urban-industrial land.
        uili = 8.2e6,
        /// Average life of land normal.
        alln = 1000.0,
        /// Urban-industrial land development time.
        uildt = 10.0,
        /// Initial land fertility.
        lferti = 600.0,
        /// Inherent land fertility.
        ilf = 600.0,
        /// Food shortage perception delay.
        fspd = 2.0,
        /// Subsistence food per capita.
        sfpc = 230.0,
        /// Initial agricultural inputs.
        aii = 5e9,
        /// Initial perceived food ratio.
        pfri = 1.0,
        /// Desired food ratio.
        dfr = 2.0,
        /// Initial land yield technology.
        lytdi = 1.0,
        /// Technology development delay.
        tdd = 20.0,
    }
}

variables! {
    /// Agriculture sector variable series.
    AgricultureVariables {
        al, pal, uil, lfert, lytd, ai, pfr,
        dcph, f, fpc, fioaa, fioaa1, fioaa2, ifpc, ifpc1, ifpc2,
        ldr, lfc, tai, cai, alai, aiph, lymc, ly, lyf, lyf2,
        lymap, lymap1, lymap2, fiald, mpld, mpai, mlymc,
        all, llmy, llmy1, llmy2, ler, uilpc, uilr, lrui,
        lfd, lfdr, lfr, lfrt, falm, fr, lytdr, lycm,
    }
}

const PER_CAPITA_OUTPUT: [f64; 9] = [
    0.0, 200.0, 400.0, 600.0, 800.0, 1000.0, 1200.0, 1400.0, 1600.0,
];
const OUTPUT_RATIO: [f64; 4] = [0.0, 10.0, 20.0, 30.0];
const FOOD_RATIO: [f64; 6] = [0.0, 0.5, 1.0, 1.5, 2.0, 2.5];
const FERTILITY_RATIO: [f64; 10] = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];

/// Agriculture sector table functions.
#[derive(Debug, Clone)]
pub struct AgricultureTables {
    pub ifpc1: TableFunction,
    pub ifpc2: TableFunction,
    pub fioaa1: TableFunction,
    pub fioaa2: TableFunction,
    pub dcph: TableFunction,
    pub lymc: TableFunction,
    pub lymap1: TableFunction,
    pub lymap2: TableFunction,
    pub fiald: TableFunction,
    pub mlymc: TableFunction,
    pub llmy1: TableFunction,
    pub llmy2: TableFunction,
    pub uilpc: TableFunction,
    pub lfdr: TableFunction,
    pub lfrt: TableFunction,
    pub falm: TableFunction,
    pub lycm: TableFunction,
}

impl AgricultureTables {
    /// The World3-03 agriculture tables.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if any knot set is malformed.
    pub fn standard() -> Result<Self, ConfigurationError> {
        let ifpc = [
            230.0, 480.0, 690.0, 850.0, 970.0, 1070.0, 1150.0, 1210.0, 1250.0,
        ];
        let fioaa = [0.4, 0.2, 0.1, 0.025, 0.0, 0.0];
        let inputs_per_hectare: Vec<f64> = (0..26).map(|i| 40.0 * f64::from(i)).collect();
        let marginal_inputs: Vec<f64> = (0..16).map(|i| 40.0 * f64::from(i)).collect();

        Ok(Self {
            ifpc1: TableFunction::new("ifpc1", &PER_CAPITA_OUTPUT, &ifpc)?,
            ifpc2: TableFunction::new("ifpc2", &PER_CAPITA_OUTPUT, &ifpc)?,
            fioaa1: TableFunction::new("fioaa1", &FOOD_RATIO, &fioaa)?,
            fioaa2: TableFunction::new("fioaa2", &FOOD_RATIO, &fioaa)?,
            dcph: TableFunction::new(
                "dcph",
                &[0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0],
                &[
                    100_000.0, 7400.0, 5200.0, 3500.0, 2400.0, 1500.0, 750.0, 300.0, 150.0,
                    75.0, 50.0,
                ],
            )?,
            lymc: TableFunction::new(
                "lymc",
                &inputs_per_hectare,
                &[
                    1.0, 3.0, 4.5, 5.0, 5.3, 5.6, 5.9, 6.1, 6.35, 6.6, 6.9, 7.2, 7.4, 7.6, 7.8,
                    8.0, 8.2, 8.4, 8.6, 8.8, 9.0, 9.2, 9.4, 9.6, 9.8, 10.0,
                ],
            )?,
            lymap1: TableFunction::new("lymap1", &OUTPUT_RATIO, &[1.0, 1.0, 0.7, 0.4])?,
            lymap2: TableFunction::new("lymap2", &OUTPUT_RATIO, &[1.0, 1.0, 0.98, 0.95])?,
            fiald: TableFunction::new(
                "fiald",
                &[0.0, 0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 1.75, 2.0],
                &[0.0, 0.05, 0.15, 0.3, 0.5, 0.7, 0.85, 0.95, 1.0],
            )?,
            mlymc: TableFunction::new(
                "mlymc",
                &marginal_inputs,
                &[
                    0.075, 0.03, 0.015, 0.011, 0.009, 0.008, 0.007, 0.006, 0.005, 0.005,
                    0.005, 0.005, 0.005, 0.005, 0.005, 0.005,
                ],
            )?,
            llmy1: TableFunction::new(
                "llmy1",
                &FERTILITY_RATIO,
                &[1.2, 1.0, 0.63, 0.36, 0.16, 0.055, 0.04, 0.025, 0.015, 0.01],
            )?,
            llmy2: TableFunction::new(
                "llmy2",
                &FERTILITY_RATIO,
                &[1.2, 1.0, 0.63, 0.36, 0.29, 0.26, 0.24, 0.22, 0.21, 0.2],
            )?,
            uilpc: TableFunction::new(
                "uilpc",
                &PER_CAPITA_OUTPUT,
                &[0.005, 0.008, 0.015, 0.025, 0.04, 0.055, 0.07, 0.08, 0.09],
            )?,
            lfdr: TableFunction::new("lfdr", &OUTPUT_RATIO, &[0.0, 0.1, 0.3, 0.5])?,
            lfrt: TableFunction::new(
                "lfrt",
                &[0.0, 0.02, 0.04, 0.06, 0.08, 0.1],
                &[20.0, 13.0, 8.0, 4.0, 2.0, 2.0],
            )?,
            falm: TableFunction::new(
                "falm",
                &[0.0, 1.0, 2.0, 3.0, 4.0],
                &[0.0, 0.04, 0.07, 0.09, 0.1],
            )?,
            lycm: TableFunction::new("lycm", &[0.0, 1.0], &[0.0, 0.04])?,
        })
    }
}

/// Agriculture sector delay sites.
#[derive(Debug, Clone)]
pub struct AgricultureDelays {
    /// Agricultural inputs, a smoothed stock of current inputs.
    pub ai: Smooth,
    /// Perceived food ratio.
    pub pfr: Smooth,
    /// Land yield factor once yield technology is adopted.
    pub lyf2: Dlinf3,
}

type State =
    SectorState<AgricultureConstants, AgricultureVariables, AgricultureTables, AgricultureDelays>;

#[derive(Debug)]
pub struct Agriculture {
    config: SectorConfig,
    state: State,
}

impl Agriculture {
    #[must_use]
    pub fn new(config: SectorConfig) -> Self {
        Self {
            config,
            state: SectorState::new(Self::NAME),
        }
    }

    /// Every agriculture auxiliary and rate at step `k`.
    ///
    /// Reads population, industrial output, and the pollution index, all of
    /// which must already be written for `k`.
    ///
    /// # Errors
    ///
    /// Returns a [`StateError`](crate::StateError) if any sector is not set up.
    pub fn update(
        &mut self,
        k: usize,
        population: &Population,
        capital: &Capital,
        pollution: &Pollution,
    ) -> Result<(), Error> {
        let grid = self.config.grid;
        let policy = self.config.policy;
        let time = grid.time(k);
        let dt = grid.dt();
        let src = k.saturating_sub(1);

        let pop = population.variables()?;
        let cap = capital.variables()?;
        let pol = pollution.variables()?;
        let Parts {
            constants: c,
            variables: v,
            tables: t,
            delays: d,
        } = self.state.parts("update agriculture")?;

        // Land yield.
        v.lyf2[k] = d.lyf2.update(v.lytd[src], dt, c.tdd);
        v.lyf[k] = clip(v.lyf2[k], c.lyf1, time, policy.pyear_y_tech);
        v.alai[k] = clip(c.alai2, c.alai1, time, policy.pyear);
        v.falm[k] = t.falm.evaluate(v.pfr[k])?;
        v.aiph[k] = v.ai[k] * (1.0 - v.falm[k]) / v.al[k];
        v.lymc[k] = t.lymc.evaluate(v.aiph[k])?;
        let output_ratio = cap.io[k] / c.io70;
        v.lymap1[k] = t.lymap1.evaluate(output_ratio)?;
        v.lymap2[k] = t.lymap2.evaluate(output_ratio)?;
        v.lymap[k] = clip(v.lymap2[k], v.lymap1[k], time, policy.pyear);
        v.ly[k] = v.lyf[k] * v.lfert[k] * v.lymc[k] * v.lymap[k];

        // Food.
        v.lfc[k] = v.al[k] / c.palt;
        v.f[k] = v.ly[k] * v.al[k] * c.lfh * (1.0 - c.pl);
        v.fpc[k] = v.f[k] / pop.pop[k];
        v.ifpc1[k] = t.ifpc1.evaluate(cap.iopc[k])?;
        v.ifpc2[k] = t.ifpc2.evaluate(cap.iopc[k])?;
        v.ifpc[k] = clip(v.ifpc2[k], v.ifpc1[k], time, policy.pyear);
        v.fr[k] = v.fpc[k] / c.sfpc;

        // Investment in agriculture.
        let food_ratio = v.fpc[k] / v.ifpc[k];
        v.fioaa1[k] = t.fioaa1.evaluate(food_ratio)?;
        v.fioaa2[k] = t.fioaa2.evaluate(food_ratio)?;
        v.fioaa[k] = clip(v.fioaa2[k], v.fioaa1[k], time, policy.pyear);
        v.tai[k] = cap.io[k] * v.fioaa[k];

        // Allocation between development and maintenance of yields.
        v.dcph[k] = t.dcph.evaluate(v.pal[k] / c.palt)?;
        v.mpld[k] = v.ly[k] / (v.dcph[k] * c.sd);
        v.mlymc[k] = t.mlymc.evaluate(v.aiph[k])?;
        v.mpai[k] = v.alai[k] * v.ly[k] * v.mlymc[k] / v.lymc[k];
        v.fiald[k] = t.fiald.evaluate(v.mpld[k] / v.mpai[k])?;
        v.ldr[k] = v.tai[k] * v.fiald[k] / v.dcph[k];
        v.cai[k] = v.tai[k] * (1.0 - v.fiald[k]);

        // Land erosion and urban-industrial use.
        let fertility_ratio = v.ly[k] / c.ilf;
        v.llmy1[k] = t.llmy1.evaluate(fertility_ratio)?;
        v.llmy2[k] = t.llmy2.evaluate(fertility_ratio)?;
        v.llmy[k] = clip(v.llmy2[k], v.llmy1[k], time, policy.pyear);
        v.all[k] = c.alln * v.llmy[k];
        v.ler[k] = v.al[k] / v.all[k];
        v.uilpc[k] = t.uilpc.evaluate(cap.iopc[k])?;
        v.uilr[k] = v.uilpc[k] * pop.pop[k];
        v.lrui[k] = (v.uilr[k] - v.uil[k]).max(0.0) / c.uildt;

        // Land fertility degradation and regeneration.
        v.lfdr[k] = t.lfdr.evaluate(pol.ppolx[k])?;
        v.lfd[k] = v.lfert[k] * v.lfdr[k];
        v.lfrt[k] = t.lfrt.evaluate(v.falm[k])?;
        v.lfr[k] = (c.ilf - v.lfert[k]) / v.lfrt[k];

        // Land yield technology.
        v.lycm[k] = t.lycm.evaluate(c.dfr - v.fr[k])?;
        v.lytdr[k] = clip(v.lytd[k] * v.lycm[k], 0.0, time, policy.pyear_y_tech);
        Ok(())
    }
}

impl Sector for Agriculture {
    const NAME: &'static str = "agriculture";

    type Constants = AgricultureConstants;
    type Variables = AgricultureVariables;
    type Tables = AgricultureTables;
    type Delays = AgricultureDelays;

    fn config(&self) -> &SectorConfig {
        &self.config
    }

    fn state(&self) -> &State {
        &self.state
    }

    fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    fn standard_tables() -> Result<AgricultureTables, ConfigurationError> {
        AgricultureTables::standard()
    }

    fn delay_sites(
        constants: &AgricultureConstants,
        _config: &SectorConfig,
    ) -> Result<AgricultureDelays, ConfigurationError> {
        Ok(AgricultureDelays {
            ai: Smooth::seeded(constants.aii),
            pfr: Smooth::seeded(constants.pfri),
            lyf2: Dlinf3::new(),
        })
    }

    fn advance_levels(&mut self, k: usize) -> Result<(), Error> {
        let dt = self.config.grid.dt();
        let Parts {
            constants: c,
            variables: v,
            delays: d,
            ..
        } = self.state.parts("advance agriculture levels")?;

        if k == 0 {
            v.al[0] = c.ali;
            v.pal[0] = c.pali;
            v.uil[0] = c.uili;
            v.lfert[0] = c.lferti;
            v.lytd[0] = c.lytdi;
            v.ai[0] = d.ai.output().unwrap_or(c.aii);
            v.pfr[0] = d.pfr.output().unwrap_or(c.pfri);
            return Ok(());
        }

        let j = k - 1;
        v.al[k] = v.al[j].step(v.ldr[j] - v.ler[j] - v.lrui[j], dt);
        v.pal[k] = v.pal[j].step(-v.ldr[j], dt);
        v.uil[k] = v.uil[j].step(v.lrui[j], dt);
        v.lfert[k] = v.lfert[j].step(v.lfr[j] - v.lfd[j], dt);
        v.lytd[k] = v.lytd[j].step(v.lytdr[j], dt);
        v.ai[k] = d.ai.update(v.cai[j], dt, v.alai[j]);
        v.pfr[k] = d.pfr.update(v.fr[j], dt, c.fspd);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn ready() -> Agriculture {
        let mut agriculture = Agriculture::new(SectorConfig::new(1900.0, 1910.0, 0.5).unwrap());
        agriculture.init_constants(&[]).unwrap();
        agriculture.init_variables().unwrap();
        agriculture.set_table_functions().unwrap();
        agriculture.set_delay_functions().unwrap();
        agriculture
    }

    #[test]
    fn step_zero_seeds_land_and_smoothed_stocks() {
        let mut agriculture = ready();

        agriculture.advance_levels(0).unwrap();

        let v = agriculture.variables().unwrap();
        assert_eq!(v.al[0], 0.9e9);
        assert_eq!(v.pal[0], 2.3e9);
        assert_eq!(v.uil[0], 8.2e6);
        assert_eq!(v.lfert[0], 600.0);
        assert_eq!(v.ai[0], 5e9);
        assert_eq!(v.pfr[0], 1.0);
    }

    #[test]
    fn developed_land_moves_from_potential_to_arable() {
        let mut agriculture = ready();
        agriculture.advance_levels(0).unwrap();
        {
            let v = agriculture.state.parts("test").unwrap().variables;
            v.ldr[0] = 4e6;
            v.ler[0] = 1e6;
            v.lrui[0] = 0.0;
            v.lfr[0] = 0.0;
            v.lfd[0] = 0.0;
            v.lytdr[0] = 0.0;
            v.cai[0] = 5e9;
            v.alai[0] = 2.0;
            v.fr[0] = 1.0;
        }

        agriculture.advance_levels(1).unwrap();

        let v = agriculture.variables().unwrap();
        let developed = 0.5 * 4e6;
        assert_relative_eq!(v.al[1], 0.9e9 + developed - 0.5 * 1e6);
        assert_relative_eq!(v.pal[1], 2.3e9 - developed);
        assert_relative_eq!(v.al[1] + v.pal[1], 0.9e9 + 2.3e9 - 0.5 * 1e6);
        assert_relative_eq!(v.ai[1], 5e9);
        assert_relative_eq!(v.pfr[1], 1.0);
    }

    #[test]
    fn standard_tables_match_knots() {
        let tables = AgricultureTables::standard().unwrap();

        assert_relative_eq!(tables.lymc.evaluate(1000.0).unwrap(), 10.0);
        assert_relative_eq!(tables.lymc.evaluate(60.0).unwrap(), 3.75);
        assert_relative_eq!(tables.mlymc.evaluate(5000.0).unwrap(), 0.005);
        assert_relative_eq!(tables.dcph.evaluate(0.0).unwrap(), 100_000.0);
        assert_relative_eq!(tables.lycm.evaluate(-0.5).unwrap(), 0.0);
    }
}

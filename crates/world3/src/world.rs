//! The World3 orchestrator.
//!
//! [`World3`] owns the five sectors plus the welfare indicators, moves them
//! through their lifecycle together, and integrates them over the grid. Each
//! step first advances every level from the previous step's rates, then runs
//! the stages in [`STEP_ORDER`]. Within a step a stage may read any value an
//! earlier stage has written, so that order is part of the model.

use tracing::{debug, info, trace};
use world3_core::{ConfigurationError, TimeGrid};

use crate::{
    Error, Lifecycle, Results, StateError, World3Config,
    agriculture::{Agriculture, AgricultureConstants},
    capital::{Capital, CapitalConstants},
    pollution::{Pollution, PollutionConstants},
    population::{Population, PopulationConstants},
    resource::{Resource, ResourceConstants},
    sector::{ConstantSet, Sector, VariableSet},
    welfare::{Welfare, WelfareConstants},
};

/// One group of auxiliary and rate equations evaluated within a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Total population and urban fraction.
    PopulationTotals,
    /// Remaining resources and the capital cost of obtaining them.
    ResourceState,
    /// Pollution index and assimilation.
    PollutionState,
    /// Industrial and service output.
    CapitalOutput,
    /// Land yield, food, and land development.
    Agriculture,
    /// Output allocation, investment, and jobs.
    CapitalInvestment,
    /// Resource usage.
    ResourceUsage,
    /// Pollution generation and arrival.
    PollutionGeneration,
    /// Life expectancy, deaths, and births.
    PopulationDynamics,
    /// Welfare indicators.
    Welfare,
}

/// The order stages run in every step.
///
/// Food per capita needs industrial output, which needs the resource cost
/// fraction. Investment needs the agricultural share of output. Births need
/// food, services, and pollution. Welfare reads everything.
pub const STEP_ORDER: [Stage; 10] = [
    Stage::PopulationTotals,
    Stage::ResourceState,
    Stage::PollutionState,
    Stage::CapitalOutput,
    Stage::Agriculture,
    Stage::CapitalInvestment,
    Stage::ResourceUsage,
    Stage::PollutionGeneration,
    Stage::PopulationDynamics,
    Stage::Welfare,
];

/// The complete World3 model.
#[derive(Debug)]
pub struct World3 {
    config: World3Config,
    grid: TimeGrid,
    lifecycle: Lifecycle,
    population: Population,
    capital: Capital,
    agriculture: Agriculture,
    resource: Resource,
    pollution: Pollution,
    welfare: Welfare,
}

impl World3 {
    /// Creates a model with every sector in the `Created` state.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the integration bounds are invalid.
    pub fn new(config: World3Config) -> Result<Self, ConfigurationError> {
        let sector_config = config.sector_config()?;
        debug!(
            year_min = config.year_min,
            year_max = config.year_max,
            dt = config.dt,
            steps = sector_config.grid.step_count(),
            "model created"
        );
        Ok(Self {
            config,
            grid: sector_config.grid,
            lifecycle: Lifecycle::Created,
            population: Population::new(sector_config),
            capital: Capital::new(sector_config),
            agriculture: Agriculture::new(sector_config),
            resource: Resource::new(sector_config),
            pollution: Pollution::new(sector_config),
            welfare: Welfare::new(sector_config),
        })
    }

    /// Runs the full lifecycle with default constants and returns the results.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if configuration or any step fails.
    pub fn simulate(config: World3Config) -> Result<Results, Error> {
        Self::simulate_with(config, &[])
    }

    /// Runs the full lifecycle with the given constant overrides.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if configuration or any step fails.
    pub fn simulate_with(config: World3Config, overrides: &[(&str, f64)]) -> Result<Results, Error> {
        let mut world = Self::new(config)?;
        world.init_constants(overrides)?;
        world.init_variables()?;
        world.set_table_functions()?;
        world.set_delay_functions()?;
        world.run()?;
        Ok(world.results()?)
    }

    #[must_use]
    pub fn config(&self) -> &World3Config {
        &self.config
    }

    #[must_use]
    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    #[must_use]
    pub fn capital(&self) -> &Capital {
        &self.capital
    }

    #[must_use]
    pub fn agriculture(&self) -> &Agriculture {
        &self.agriculture
    }

    #[must_use]
    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    #[must_use]
    pub fn pollution(&self) -> &Pollution {
        &self.pollution
    }

    #[must_use]
    pub fn welfare(&self) -> &Welfare {
        &self.welfare
    }

    fn require(&self, operation: &'static str, required: Lifecycle) -> Result<(), StateError> {
        if self.lifecycle == required {
            Ok(())
        } else {
            Err(StateError {
                component: "world3",
                operation,
                required,
                current: self.lifecycle,
            })
        }
    }

    /// Sets every sector's constants, applying each override to every sector
    /// that declares its name.
    ///
    /// Shared names such as `sfpc` and `tdd` reach all of their sectors. If
    /// any name is declared by no sector, nothing is set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownConstant`] for a name no sector
    /// declares, or a [`StateError`] if constants were already set.
    pub fn init_constants(&mut self, overrides: &[(&str, f64)]) -> Result<(), Error> {
        self.require("initialize constants", Lifecycle::Created)?;

        if let Some(&(name, _)) = overrides.iter().find(|(name, _)| !is_declared(name)) {
            return Err(ConfigurationError::UnknownConstant {
                sector: "world3",
                name: name.to_owned(),
            }
            .into());
        }

        self.population
            .init_constants(&declared_by::<PopulationConstants>(overrides))?;
        self.capital
            .init_constants(&declared_by::<CapitalConstants>(overrides))?;
        self.agriculture
            .init_constants(&declared_by::<AgricultureConstants>(overrides))?;
        self.resource
            .init_constants(&declared_by::<ResourceConstants>(overrides))?;
        self.pollution
            .init_constants(&declared_by::<PollutionConstants>(overrides))?;
        self.welfare
            .init_constants(&declared_by::<WelfareConstants>(overrides))?;

        self.lifecycle = Lifecycle::ConstantsSet;
        debug!(overrides = overrides.len(), lifecycle = %self.lifecycle, "model transition");
        Ok(())
    }

    /// Allocates every variable series, filled with NaN.
    ///
    /// # Errors
    ///
    /// Returns a [`StateError`] unless constants are set.
    pub fn init_variables(&mut self) -> Result<(), Error> {
        self.require("initialize variables", Lifecycle::ConstantsSet)?;
        self.population.init_variables()?;
        self.capital.init_variables()?;
        self.agriculture.init_variables()?;
        self.resource.init_variables()?;
        self.pollution.init_variables()?;
        self.welfare.init_variables()?;

        self.lifecycle = Lifecycle::VariablesSet;
        debug!(lifecycle = %self.lifecycle, "model transition");
        Ok(())
    }

    /// Installs every sector's standard table functions.
    ///
    /// # Errors
    ///
    /// Returns a [`StateError`] unless variables are allocated.
    pub fn set_table_functions(&mut self) -> Result<(), Error> {
        self.require("set table functions", Lifecycle::VariablesSet)?;
        self.population.set_table_functions()?;
        self.capital.set_table_functions()?;
        self.agriculture.set_table_functions()?;
        self.resource.set_table_functions()?;
        self.pollution.set_table_functions()?;
        self.welfare.set_table_functions()?;

        self.lifecycle = Lifecycle::TablesSet;
        debug!(lifecycle = %self.lifecycle, "model transition");
        Ok(())
    }

    /// Installs fresh delay operators at every equation site.
    ///
    /// # Errors
    ///
    /// Returns a [`StateError`] unless tables are set.
    pub fn set_delay_functions(&mut self) -> Result<(), Error> {
        self.require("set delay functions", Lifecycle::TablesSet)?;
        self.population.set_delay_functions()?;
        self.capital.set_delay_functions()?;
        self.agriculture.set_delay_functions()?;
        self.resource.set_delay_functions()?;
        self.pollution.set_delay_functions()?;
        self.welfare.set_delay_functions()?;

        self.lifecycle = Lifecycle::DelaysSet;
        debug!(lifecycle = %self.lifecycle, "model transition");
        Ok(())
    }

    /// Integrates the model over the whole grid.
    ///
    /// A failed step leaves the model in [`Lifecycle::Failed`].
    ///
    /// # Errors
    ///
    /// Returns a [`StateError`] unless delay functions are set, or the first
    /// error raised by a step.
    pub fn run(&mut self) -> Result<(), Error> {
        self.require("run", Lifecycle::DelaysSet)?;

        self.lifecycle = Lifecycle::Running;
        let steps = self.grid.step_count();
        info!(
            steps,
            year_min = self.grid.year_min(),
            year_max = self.grid.year_max(),
            "run started"
        );

        for k in 0..steps {
            if let Err(error) = self.step(k) {
                self.lifecycle = Lifecycle::Failed;
                return Err(error);
            }
        }

        self.lifecycle = Lifecycle::ResultsReady;
        let last = steps - 1;
        let population = self.population.variables()?;
        info!(
            steps,
            final_year = self.grid.time(last),
            final_pop = population.pop[last],
            "run finished"
        );
        Ok(())
    }

    fn step(&mut self, k: usize) -> Result<(), Error> {
        self.population.advance_levels(k)?;
        self.capital.advance_levels(k)?;
        self.agriculture.advance_levels(k)?;
        self.resource.advance_levels(k)?;
        self.pollution.advance_levels(k)?;
        self.welfare.advance_levels(k)?;

        for stage in STEP_ORDER {
            self.run_stage(stage, k)?;
        }

        trace!(
            k,
            year = self.grid.time(k),
            pop = self.population.variables()?.pop[k],
            "step"
        );
        Ok(())
    }

    fn run_stage(&mut self, stage: Stage, k: usize) -> Result<(), Error> {
        match stage {
            Stage::PopulationTotals => self.population.update_totals(k),
            Stage::ResourceState => self.resource.update_state(k),
            Stage::PollutionState => self.pollution.update_state(k),
            Stage::CapitalOutput => self
                .capital
                .update_output(k, &self.population, &self.resource),
            Stage::Agriculture => {
                self.agriculture
                    .update(k, &self.population, &self.capital, &self.pollution)
            }
            Stage::CapitalInvestment => {
                self.capital
                    .update_investment(k, &self.population, &self.agriculture)
            }
            Stage::ResourceUsage => self
                .resource
                .update_usage(k, &self.population, &self.capital),
            Stage::PollutionGeneration => self.pollution.update_generation(
                k,
                &self.population,
                &self.agriculture,
                &self.resource,
            ),
            Stage::PopulationDynamics => self.population.update_dynamics(
                k,
                &self.capital,
                &self.agriculture,
                &self.pollution,
            ),
            Stage::Welfare => self.welfare.update(
                k,
                &self.population,
                &self.capital,
                &self.agriculture,
                &self.pollution,
            ),
        }
    }

    /// Copies every variable series out of the model.
    ///
    /// # Errors
    ///
    /// Returns a [`StateError`] unless a run has finished.
    pub fn results(&self) -> Result<Results, StateError> {
        self.require("fetch results", Lifecycle::ResultsReady)?;

        let series = self
            .population
            .variables()?
            .series()
            .into_iter()
            .chain(self.capital.variables()?.series())
            .chain(self.agriculture.variables()?.series())
            .chain(self.resource.variables()?.series())
            .chain(self.pollution.variables()?.series())
            .chain(self.welfare.variables()?.series());
        Ok(Results::new(self.grid, series))
    }
}

fn is_declared(name: &str) -> bool {
    PopulationConstants::declares(name)
        || CapitalConstants::declares(name)
        || AgricultureConstants::declares(name)
        || ResourceConstants::declares(name)
        || PollutionConstants::declares(name)
        || WelfareConstants::declares(name)
}

fn declared_by<'a, C: ConstantSet>(overrides: &[(&'a str, f64)]) -> Vec<(&'a str, f64)> {
    overrides
        .iter()
        .copied()
        .filter(|(name, _)| C::declares(name))
        .collect()
}

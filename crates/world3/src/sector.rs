//! The sector contract shared by all five World3 sectors.
//!
//! A sector owns four parts that become available one at a time:
//! constants, variable series, table functions, and delay operators. The
//! [`SectorState`] holder enforces that order, and the [`Sector`] trait
//! provides the lifecycle calls on top of it so each sector only supplies its
//! tables, its delay sites, and its level equations.

use ndarray::Array1;
use tracing::debug;
use world3_core::{ConfigurationError, TimeGrid};

use crate::{Error, Lifecycle, SectorConfig, StateError};

/// A sector's named constants.
pub trait ConstantSet: Default + Clone {
    /// Every constant name this set declares, in declaration order.
    const NAMES: &'static [&'static str];

    /// Overrides one constant by name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownConstant`] if `name` is not declared.
    fn set(&mut self, name: &str, value: f64) -> Result<(), ConfigurationError>;

    /// The current value of `name`, if declared.
    fn get(&self, name: &str) -> Option<f64>;

    fn declares(name: &str) -> bool {
        Self::NAMES.contains(&name)
    }
}

/// A sector's variable series, one array per model variable.
pub trait VariableSet {
    const NAMES: &'static [&'static str];

    /// Allocates every series for `grid`, filled with NaN.
    fn undefined(grid: &TimeGrid) -> Self;

    /// Every series paired with its variable name.
    fn series(&self) -> Vec<(&'static str, &Array1<f64>)>;
}

/// Declares a sector's constants struct with its defaults and name lookup.
macro_rules! constants {
    (
        $(#[$meta:meta])*
        $name:ident in $sector:literal {
            $(
                $(#[$field_meta:meta])*
                $field:ident = $default:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(default)]
        pub struct $name {
            $(
                $(#[$field_meta])*
                pub $field: f64,
            )+
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $($field: $default,)+
                }
            }
        }

        impl $crate::sector::ConstantSet for $name {
            const NAMES: &'static [&'static str] = &[$(stringify!($field)),+];

            fn set(
                &mut self,
                name: &str,
                value: f64,
            ) -> Result<(), ::world3_core::ConfigurationError> {
                match name {
                    $(stringify!($field) => self.$field = value,)+
                    _ => {
                        return Err(::world3_core::ConfigurationError::UnknownConstant {
                            sector: $sector,
                            name: name.to_owned(),
                        });
                    }
                }
                Ok(())
            }

            fn get(&self, name: &str) -> Option<f64> {
                match name {
                    $(stringify!($field) => Some(self.$field),)+
                    _ => None,
                }
            }
        }
    };
}

/// Declares a sector's variable series struct.
macro_rules! variables {
    (
        $(#[$meta:meta])*
        $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field:ident
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            $(
                $(#[$field_meta])*
                pub $field: ::ndarray::Array1<f64>,
            )+
        }

        impl $crate::sector::VariableSet for $name {
            const NAMES: &'static [&'static str] = &[$(stringify!($field)),+];

            fn undefined(grid: &::world3_core::TimeGrid) -> Self {
                Self {
                    $($field: grid.undefined_series(),)+
                }
            }

            fn series(&self) -> Vec<(&'static str, &::ndarray::Array1<f64>)> {
                vec![$((stringify!($field), &self.$field)),+]
            }
        }
    };
}

pub(crate) use constants;
pub(crate) use variables;

/// Holds a sector's parts as they are set, in lifecycle order.
#[derive(Debug)]
pub struct SectorState<C, V, T, D> {
    name: &'static str,
    constants: Option<C>,
    variables: Option<V>,
    tables: Option<T>,
    delays: Option<D>,
}

/// Simultaneous access to every part of a fully set-up sector.
pub struct Parts<'a, C, V, T, D> {
    pub constants: &'a C,
    pub variables: &'a mut V,
    pub tables: &'a T,
    pub delays: &'a mut D,
}

impl<C, V, T, D> SectorState<C, V, T, D> {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            constants: None,
            variables: None,
            tables: None,
            delays: None,
        }
    }

    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        match (
            self.constants.is_some(),
            self.variables.is_some(),
            self.tables.is_some(),
            self.delays.is_some(),
        ) {
            (true, true, true, true) => Lifecycle::DelaysSet,
            (true, true, true, false) => Lifecycle::TablesSet,
            (true, true, false, _) => Lifecycle::VariablesSet,
            (true, false, _, _) => Lifecycle::ConstantsSet,
            (false, _, _, _) => Lifecycle::Created,
        }
    }

    fn state_error(&self, operation: &'static str, required: Lifecycle) -> StateError {
        StateError {
            component: self.name,
            operation,
            required,
            current: self.lifecycle(),
        }
    }

    fn require(&self, operation: &'static str, required: Lifecycle) -> Result<(), StateError> {
        if self.lifecycle() == required {
            Ok(())
        } else {
            Err(self.state_error(operation, required))
        }
    }

    /// Stores the constants.
    ///
    /// # Errors
    ///
    /// Returns a [`StateError`] unless the sector is freshly created.
    pub fn set_constants(&mut self, constants: C) -> Result<(), StateError> {
        self.require("initialize constants", Lifecycle::Created)?;
        self.constants = Some(constants);
        Ok(())
    }

    /// Stores the variable series.
    ///
    /// # Errors
    ///
    /// Returns a [`StateError`] unless exactly the constants are set.
    pub fn set_variables(&mut self, variables: V) -> Result<(), StateError> {
        self.require("initialize variables", Lifecycle::ConstantsSet)?;
        self.variables = Some(variables);
        Ok(())
    }

    /// Stores the table functions.
    ///
    /// # Errors
    ///
    /// Returns a [`StateError`] unless exactly the constants and variables are set.
    pub fn set_tables(&mut self, tables: T) -> Result<(), StateError> {
        self.require("set table functions", Lifecycle::VariablesSet)?;
        self.tables = Some(tables);
        Ok(())
    }

    /// Stores the delay operators.
    ///
    /// # Errors
    ///
    /// Returns a [`StateError`] unless the tables were the last part set.
    pub fn set_delays(&mut self, delays: D) -> Result<(), StateError> {
        self.require("set delay functions", Lifecycle::TablesSet)?;
        self.delays = Some(delays);
        Ok(())
    }

    /// The constants, once initialized.
    ///
    /// # Errors
    ///
    /// Returns a [`StateError`] before constants are set.
    pub fn constants(&self) -> Result<&C, StateError> {
        self.constants
            .as_ref()
            .ok_or_else(|| self.state_error("read constants", Lifecycle::ConstantsSet))
    }

    /// The variable series, once allocated.
    ///
    /// # Errors
    ///
    /// Returns a [`StateError`] before variables are allocated.
    pub fn variables(&self) -> Result<&V, StateError> {
        self.variables
            .as_ref()
            .ok_or_else(|| self.state_error("read variables", Lifecycle::VariablesSet))
    }

    /// Borrows every part at once for a step computation.
    ///
    /// # Errors
    ///
    /// Returns a [`StateError`] until the delay operators are set.
    pub fn parts(&mut self, operation: &'static str) -> Result<Parts<'_, C, V, T, D>, StateError> {
        let current = self.lifecycle();
        match (
            &self.constants,
            &mut self.variables,
            &self.tables,
            &mut self.delays,
        ) {
            (Some(constants), Some(variables), Some(tables), Some(delays)) => Ok(Parts {
                constants,
                variables,
                tables,
                delays,
            }),
            _ => Err(StateError {
                component: self.name,
                operation,
                required: Lifecycle::DelaysSet,
                current,
            }),
        }
    }
}

/// One World3 sector.
///
/// Implementors supply their parts and level equations; the lifecycle calls
/// are provided. Stage methods, which read other sectors, are inherent
/// methods on each sector.
pub trait Sector {
    /// Name used in errors and log fields.
    const NAME: &'static str;

    type Constants: ConstantSet;
    type Variables: VariableSet;
    type Tables;
    type Delays;

    fn config(&self) -> &SectorConfig;

    fn state(&self) -> &SectorState<Self::Constants, Self::Variables, Self::Tables, Self::Delays>;

    fn state_mut(
        &mut self,
    ) -> &mut SectorState<Self::Constants, Self::Variables, Self::Tables, Self::Delays>;

    /// Builds the sector's standard table functions.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if any table's knots are malformed.
    fn standard_tables() -> Result<Self::Tables, ConfigurationError>;

    /// Builds fresh delay operators, one per equation site.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if a delay cannot be sized for the grid.
    fn delay_sites(
        constants: &Self::Constants,
        config: &SectorConfig,
    ) -> Result<Self::Delays, ConfigurationError>;

    /// Writes the level values at step `k`.
    ///
    /// Step 0 seeds every level from its initial constant. Later steps apply
    /// one Euler step using the rates of step `k - 1`.
    ///
    /// # Errors
    ///
    /// Returns a [`StateError`] before the delay operators are set.
    fn advance_levels(&mut self, k: usize) -> Result<(), Error>;

    fn lifecycle(&self) -> Lifecycle {
        self.state().lifecycle()
    }

    /// Sets constants from their defaults plus the given overrides.
    ///
    /// Nothing is stored if any override names an undeclared constant.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownConstant`] for an undeclared name,
    /// or a [`StateError`] if constants were already set.
    fn init_constants(&mut self, overrides: &[(&str, f64)]) -> Result<(), Error> {
        let mut constants = Self::Constants::default();
        for &(name, value) in overrides {
            constants.set(name, value)?;
        }
        self.state_mut().set_constants(constants)?;
        debug!(sector = Self::NAME, overrides = overrides.len(), "constants initialized");
        Ok(())
    }

    /// Allocates every variable series, filled with NaN.
    ///
    /// # Errors
    ///
    /// Returns a [`StateError`] unless constants are set.
    fn init_variables(&mut self) -> Result<(), Error> {
        let grid = self.config().grid;
        self.state_mut()
            .set_variables(Self::Variables::undefined(&grid))?;
        debug!(
            sector = Self::NAME,
            variables = Self::Variables::NAMES.len(),
            steps = grid.step_count(),
            "variables initialized"
        );
        Ok(())
    }

    /// Installs the standard table functions.
    ///
    /// # Errors
    ///
    /// Returns a [`StateError`] unless variables are allocated.
    fn set_table_functions(&mut self) -> Result<(), Error> {
        let current = self.lifecycle();
        if current != Lifecycle::VariablesSet {
            return Err(StateError {
                component: Self::NAME,
                operation: "set table functions",
                required: Lifecycle::VariablesSet,
                current,
            }
            .into());
        }
        self.state_mut().set_tables(Self::standard_tables()?)?;
        debug!(sector = Self::NAME, "table functions set");
        Ok(())
    }

    /// Installs fresh delay operators.
    ///
    /// # Errors
    ///
    /// Returns a [`StateError`] unless tables are set.
    fn set_delay_functions(&mut self) -> Result<(), Error> {
        let config = *self.config();
        let state = self.state_mut();
        let current = state.lifecycle();
        if current != Lifecycle::TablesSet {
            return Err(StateError {
                component: Self::NAME,
                operation: "set delay functions",
                required: Lifecycle::TablesSet,
                current,
            }
            .into());
        }
        let delays = Self::delay_sites(state.constants()?, &config)?;
        state.set_delays(delays)?;
        debug!(sector = Self::NAME, "delay functions set");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns a [`StateError`] before constants are set.
    fn constants(&self) -> Result<&Self::Constants, StateError> {
        self.state().constants()
    }

    /// # Errors
    ///
    /// Returns a [`StateError`] before variables are allocated.
    fn variables(&self) -> Result<&Self::Variables, StateError> {
        self.state().variables()
    }
}

//! The World3-03 global model.
//!
//! Five coupled sectors (population, capital, agriculture, nonrenewable
//! resources, and persistent pollution) plus welfare indicators, integrated
//! with fixed-step Euler over a [`TimeGrid`].
//!
//! A model is driven through a fixed lifecycle:
//!
//! ```no_run
//! use world3::{World3, World3Config};
//!
//! # fn main() -> Result<(), world3::Error> {
//! let mut world = World3::new(World3Config::default())?;
//! world.init_constants(&[("nri", 2e12)])?;
//! world.init_variables()?;
//! world.set_table_functions()?;
//! world.set_delay_functions()?;
//! world.run()?;
//!
//! let results = world.results()?;
//! let pop_2000 = results.value_at("pop", 2000.0);
//! # Ok(())
//! # }
//! ```

pub mod agriculture;
pub mod capital;
mod config;
mod error;
pub mod pollution;
pub mod population;
pub mod resource;
mod results;
pub mod sector;
pub mod welfare;
mod world;

pub use config::{PolicyYears, SectorConfig, World3Config};
pub use error::{Error, Lifecycle, StateError};
pub use results::Results;
pub use sector::Sector;
pub use world::{STEP_ORDER, Stage, World3};
pub use world3_core::TimeGrid;

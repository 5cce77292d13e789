use std::fmt;

use thiserror::Error;
use world3_core::{ConfigurationError, EvaluationError};

/// Progress of a model or sector through its setup and run.
///
/// Each public lifecycle call moves exactly one state forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Lifecycle {
    Created,
    ConstantsSet,
    VariablesSet,
    TablesSet,
    DelaysSet,
    /// Inside [`World3::run`](crate::World3::run).
    Running,
    ResultsReady,
    /// A run stopped on an error; the partially written series are not usable.
    Failed,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Created => "created",
            Self::ConstantsSet => "constants set",
            Self::VariablesSet => "variables set",
            Self::TablesSet => "table functions set",
            Self::DelaysSet => "delay functions set",
            Self::Running => "running",
            Self::ResultsReady => "results ready",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// A lifecycle method was called out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot {operation} on {component}: requires {required}, but it is {current}")]
pub struct StateError {
    pub component: &'static str,
    pub operation: &'static str,
    pub required: Lifecycle,
    pub current: Lifecycle,
}

/// Errors surfaced by the model.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

//! Stateful smoothing and transport operators.
//!
//! Each operator carries hidden state across steps and belongs to exactly one
//! equation site. Two sites with identical parameters still own independent
//! operators.
//!
//! Operators follow DYNAMO level semantics: the first call seeds the internal
//! state from its input and returns it unchanged; every later call advances
//! the state by one step using the input supplied, which callers take from the
//! previous step.
//!
//! | operator | stages | use |
//! |---|---|---|
//! | [`Smooth`] | 1 | exponential smoothing of perceived values |
//! | [`Dlinf3`] | 3 | distributed information delay |
//! | [`Delay3`] | 3 | distributed material delay, conserving what is in transit |
//! | [`PipelineDelay`] | fixed | pure transport lag of `duration` |

mod delay3;
mod dlinf3;
mod pipeline;
mod smooth;

pub use delay3::Delay3;
pub use dlinf3::Dlinf3;
pub use pipeline::PipelineDelay;
pub use smooth::Smooth;

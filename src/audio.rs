//! Media engine: the boundary trait and its rodio implementation.

mod engine;
mod player;
mod sink;
mod thread;
mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use engine::MediaEngine;
pub use player::RodioEngine;
pub use types::{MAX_SPEED, MIN_SPEED, MediaEvent};

#[cfg(test)]
mod tests;

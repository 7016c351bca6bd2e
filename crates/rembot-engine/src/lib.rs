//! Decision engine.
//!
//! [`RemBot`] owns a [`PositionBookkeeper`], a [`PerformanceTracker`] and the
//! current [`PositionState`], and advances the state once per tick via [`step`].

mod bookkeeper;
mod orchestrator;
mod performance;
mod state;

#[cfg(test)]
mod testing;

pub use bookkeeper::PositionBookkeeper;
pub use orchestrator::RemBot;
pub use performance::{PerformanceSummary, PerformanceTracker};
pub use state::{long_entry_signal, short_entry_signal, step, PositionState, TickContext};

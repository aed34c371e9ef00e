//! Simulation clock and animation.
//!
//! [`Timekeeper`] owns the integer clock and is the upstream data source for
//! everything else: its readout is mapped to sun and moon track positions by
//! [`crate::diagram`].

pub mod clock;
pub mod config;
pub mod scheduler;
pub mod timekeeper;

pub use clock::{PhaseName, SimClock, TimeReadout};
pub use config::{ClockConstants, TimeConfig};
pub use scheduler::{ManualScheduler, Scheduler, TickHandle};
pub use timekeeper::{AnimationState, ChangeCallback, ChangeFlags, Timekeeper, ease};

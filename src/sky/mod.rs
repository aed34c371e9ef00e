//! Sky shading and moon phase.
//!
//! Both components are pure functions of track positions supplied by the
//! caller: [`SkyLevel`] reads the sun position, [`PhaseMask`] the sun and
//! moon positions.

pub mod color;
pub mod config;
pub mod level;
pub mod phase;

pub use color::{Lerp, SkyGradient, SkyPalette};
pub use config::SkyLevelConfig;
pub use level::{SkyLevel, SkyLevelOutput};
pub use phase::{PhaseMask, PhaseShape, Side, Terminator};

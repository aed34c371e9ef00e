//! Skydiagram - animated day/night and lunar phase diagram core
//!
//! - [`track`]: sun/moon track geometry with arc-length lookup
//! - [`sky`]: sky shading and moon phase mask
//! - [`time`]: integer simulation clock and animation state machine
//! - [`diagram`]: wiring from clock readout to frame outputs

pub mod core;
pub mod track;
pub mod sky;
pub mod time;
pub mod diagram;

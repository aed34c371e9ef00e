//! Wires the timekeeper readout through track, sky and phase components.
//!
//! [`recompute`] is a pure dependency graph: given the previous frame and new
//! inputs it rebuilds only the outputs whose inputs changed and reports which
//! ones did, so renderers can skip untouched layers.
//!
//! ```text
//! TrackGeometry ──────────────► track ─┬─► sun point
//! sun position ────────────────────────┼─► moon point
//! moon position ───────────────────────┘
//! sun position, sky config ───────────────► sky level ─► gradient ◄─ palette
//! sun position, moon position, radius ────► terminator
//! ```
//!
//! The track itself is owned by a [`TrackGeometry`]; inputs only hold its
//! current `Arc<Track>`, and a new snapshot is what marks the track changed.

pub mod config;

use std::sync::Arc;

use serde::Serialize;

pub use config::{SkyDiagramConfig, TrackConfig};

use crate::core::Result;
use crate::sky::{PhaseMask, SkyGradient, SkyLevel, SkyLevelOutput, SkyPalette, Terminator};
use crate::time::TimeReadout;
use crate::track::{LayoutProps, PathDefinition, SampleLimits, Track, TrackGeometry, TrackPoint};

// ---------------------------------------------------------------------------
// Celestial mapping
// ---------------------------------------------------------------------------

/// Sun and moon track positions for one clock reading.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CelestialPositions {
    pub sun: f64,
    pub moon: f64,
}

/// Map a clock readout to track positions.
///
/// Midnight puts the sun at the nadir (0.75), noon at the zenith (0.25).
/// The moon trails the sun by the moon phase, so it rises with the sun at
/// new moon and opposite it at full moon.
pub fn celestial_positions(readout: &TimeReadout) -> CelestialPositions {
    let sun = wrap(readout.fractional_time_of_day - 0.25);
    let moon = wrap(sun - readout.moon_phase);
    CelestialPositions { sun, moon }
}

fn wrap(p: f64) -> f64 {
    let w = (p % 1.0 + 1.0) % 1.0;
    if w >= 1.0 { 0.0 } else { w }
}

// ---------------------------------------------------------------------------
// Inputs, outputs and change sets
// ---------------------------------------------------------------------------

/// Everything a frame depends on. Components are already validated.
#[derive(Clone, Debug)]
pub struct DiagramInputs {
    /// Snapshot from the owning [`TrackGeometry`].
    pub track: Arc<Track>,
    pub sky: SkyLevel,
    pub palette: SkyPalette,
    pub phase_mask: PhaseMask,
    pub sun_position: f64,
    pub moon_position: f64,
}

impl DiagramInputs {
    /// Validated inputs from a config and a track snapshot, with sun and
    /// moon at the left horizon.
    pub fn from_config(config: &SkyDiagramConfig, track: Arc<Track>) -> Result<Self> {
        Ok(Self {
            track,
            sky: SkyLevel::new(&config.sky)?,
            palette: config.palette.clone(),
            phase_mask: PhaseMask::new(config.moon_radius)?,
            sun_position: 0.0,
            moon_position: 0.0,
        })
    }

    pub fn with_positions(mut self, positions: CelestialPositions) -> Self {
        self.sun_position = positions.sun;
        self.moon_position = positions.moon;
        self
    }
}

/// Computed outputs for one set of inputs.
#[derive(Clone, Debug)]
pub struct DiagramFrame {
    inputs: DiagramInputs,
    pub track: Arc<Track>,
    pub sun: TrackPoint,
    pub moon: TrackPoint,
    pub sky_level: SkyLevelOutput,
    pub gradient: SkyGradient,
    pub terminator: Terminator,
}

impl DiagramFrame {
    /// Inputs this frame was computed from.
    #[inline]
    pub fn inputs(&self) -> &DiagramInputs {
        &self.inputs
    }
}

/// Which outputs differ from the previous frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Changes {
    pub track: bool,
    pub sun: bool,
    pub moon: bool,
    pub sky_level: bool,
    pub gradient: bool,
    pub terminator: bool,
}

impl Changes {
    pub const ALL: Self = Self {
        track: true,
        sun: true,
        moon: true,
        sky_level: true,
        gradient: true,
        terminator: true,
    };

    #[inline]
    pub fn any(&self) -> bool {
        self.track || self.sun || self.moon || self.sky_level || self.gradient || self.terminator
    }
}

// ---------------------------------------------------------------------------
// Recompute
// ---------------------------------------------------------------------------

/// Compute the frame for `inputs`, reusing whatever `prev` already has.
///
/// With no previous frame everything is computed and reported changed.
/// On error nothing is returned and `prev` remains the last good frame.
pub fn recompute(prev: Option<&DiagramFrame>, inputs: &DiagramInputs) -> Result<(DiagramFrame, Changes)> {
    let Some(prev) = prev else {
        return Ok((compute_all(inputs)?, Changes::ALL));
    };
    let old = &prev.inputs;

    let sun_moved = old.sun_position != inputs.sun_position;
    let moon_moved = old.moon_position != inputs.moon_position;

    let track_dirty = !Arc::ptr_eq(&old.track, &inputs.track);
    let sun_dirty = track_dirty || sun_moved;
    let moon_dirty = track_dirty || moon_moved;
    let sky_dirty = sun_moved || old.sky != inputs.sky;
    let gradient_dirty = sky_dirty || old.palette != inputs.palette;
    let terminator_dirty = sun_moved || moon_moved || old.phase_mask != inputs.phase_mask;

    let track = Arc::clone(&inputs.track);
    let sun = if sun_dirty { track.point_at(inputs.sun_position)? } else { prev.sun };
    let moon = if moon_dirty { track.point_at(inputs.moon_position)? } else { prev.moon };
    let sky_level = if sky_dirty {
        inputs.sky.compute(inputs.sun_position)?
    } else {
        prev.sky_level
    };
    let gradient = if gradient_dirty {
        inputs.palette.gradient(sky_level.sky_blend)
    } else {
        prev.gradient
    };
    let terminator = if terminator_dirty {
        inputs.phase_mask.compute(inputs.sun_position, inputs.moon_position)?
    } else {
        prev.terminator
    };

    let changes = Changes {
        track: track_dirty,
        sun: sun_dirty && sun != prev.sun,
        moon: moon_dirty && moon != prev.moon,
        sky_level: sky_dirty && sky_level != prev.sky_level,
        gradient: gradient_dirty && gradient != prev.gradient,
        terminator: terminator_dirty && terminator != prev.terminator,
    };
    if changes.any() {
        log::trace!("Diagram: recomputed {changes:?}");
    }

    let frame = DiagramFrame {
        inputs: inputs.clone(),
        track,
        sun,
        moon,
        sky_level,
        gradient,
        terminator,
    };
    Ok((frame, changes))
}

fn compute_all(inputs: &DiagramInputs) -> Result<DiagramFrame> {
    let track = Arc::clone(&inputs.track);
    let sky_level = inputs.sky.compute(inputs.sun_position)?;
    Ok(DiagramFrame {
        sun: track.point_at(inputs.sun_position)?,
        moon: track.point_at(inputs.moon_position)?,
        gradient: inputs.palette.gradient(sky_level.sky_blend),
        terminator: inputs.phase_mask.compute(inputs.sun_position, inputs.moon_position)?,
        sky_level,
        track,
        inputs: inputs.clone(),
    })
}

// ---------------------------------------------------------------------------
// SkyDiagram
// ---------------------------------------------------------------------------

/// Holds the track geometry, current inputs and frame, feeding clock
/// readouts and layout changes through [`recompute`].
#[derive(Debug)]
pub struct SkyDiagram {
    geometry: TrackGeometry,
    inputs: DiagramInputs,
    frame: DiagramFrame,
}

impl SkyDiagram {
    pub fn new(config: &SkyDiagramConfig) -> Result<Self> {
        let mut geometry = config.track.geometry()?;
        let inputs = DiagramInputs::from_config(config, Arc::clone(geometry.track()))?;
        let frame = compute_all(&inputs)?;
        geometry.clear_flags();
        log::debug!(
            "SkyDiagram: track length {:.1} with {} segments",
            frame.track.total_length(),
            frame.track.segments().len()
        );
        Ok(Self { geometry, inputs, frame })
    }

    #[inline]
    pub fn frame(&self) -> &DiagramFrame {
        &self.frame
    }

    #[inline]
    pub fn inputs(&self) -> &DiagramInputs {
        &self.inputs
    }

    #[inline]
    pub fn geometry(&self) -> &TrackGeometry {
        &self.geometry
    }

    /// Move the sun and moon to match a clock readout.
    pub fn set_readout(&mut self, readout: &TimeReadout) -> Result<Changes> {
        let inputs = self.inputs.clone().with_positions(celestial_positions(readout));
        self.apply(inputs)
    }

    pub fn set_layout(&mut self, layout: LayoutProps) -> Result<Changes> {
        self.geometry.set_layout(layout);
        self.apply(self.inputs.clone())
    }

    pub fn set_path(&mut self, path: PathDefinition) -> Result<Changes> {
        self.geometry.set_path(path);
        self.apply(self.inputs.clone())
    }

    pub fn set_limits(&mut self, limits: SampleLimits) -> Result<Changes> {
        self.geometry.set_limits(limits);
        self.apply(self.inputs.clone())
    }

    /// Recompute against `inputs` with the geometry's current track. The
    /// geometry flag is cleared only once a frame holding its track exists.
    fn apply(&mut self, mut inputs: DiagramInputs) -> Result<Changes> {
        inputs.track = Arc::clone(self.geometry.track());
        let (frame, changes) = recompute(Some(&self.frame), &inputs)?;
        self.inputs = inputs;
        self.frame = frame;
        self.geometry.clear_flags();
        Ok(changes)
    }
}

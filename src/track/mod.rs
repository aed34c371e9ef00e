//! Sun/moon track geometry.
//!
//! Turns a sparse [`PathDefinition`] plus host [`LayoutProps`] into a
//! [`Track`] that maps a normalized position to a screen point and tangent
//! angle by arc length. [`TrackGeometry`] owns the current inputs and keeps
//! the track in sync with them.

pub mod geometry;
pub mod layout;
pub mod path;
pub mod segment;

use std::sync::Arc;

pub use geometry::{Track, TrackPoint};
pub use layout::LayoutProps;
pub use path::{PathDefinition, PathPoint};
pub use segment::{CurveSegment, LookupSample, SampleLimits};

use crate::core::Result;

// ---------------------------------------------------------------------------
// TrackGeometry
// ---------------------------------------------------------------------------

/// Owns the path definition and layout, rebuilding the track when either
/// changes.
///
/// Rebuilds run to completion before the new track is swapped in, so
/// readers holding the previous `Arc<Track>` never observe a partial build.
#[derive(Debug)]
pub struct TrackGeometry {
    path: PathDefinition,
    layout: LayoutProps,
    limits: SampleLimits,
    track: Arc<Track>,
    has_track_changed: bool,
}

impl TrackGeometry {
    pub fn new(path: PathDefinition, layout: LayoutProps) -> Self {
        Self::with_limits(path, layout, SampleLimits::default())
    }

    pub fn with_limits(path: PathDefinition, layout: LayoutProps, limits: SampleLimits) -> Self {
        let track = Arc::new(Track::build_with_limits(&path, &layout, limits));
        Self {
            path,
            layout,
            limits,
            track,
            has_track_changed: true,
        }
    }

    /// Replace the path definition. Returns whether the track was rebuilt.
    pub fn set_path(&mut self, path: PathDefinition) -> bool {
        if path == self.path {
            return false;
        }
        self.path = path;
        self.rebuild();
        true
    }

    /// Replace the layout. Returns whether the track was rebuilt.
    pub fn set_layout(&mut self, layout: LayoutProps) -> bool {
        if layout == self.layout {
            return false;
        }
        self.layout = layout;
        self.rebuild();
        true
    }

    /// Replace the sampler chord limits. Returns whether the track was rebuilt.
    pub fn set_limits(&mut self, limits: SampleLimits) -> bool {
        if limits == self.limits {
            return false;
        }
        self.limits = limits;
        self.rebuild();
        true
    }

    /// Screen point for a track position on the current track.
    #[inline]
    pub fn point_at(&self, position: f64) -> Result<TrackPoint> {
        self.track.point_at(position)
    }

    /// Shared handle to the current track snapshot.
    #[inline]
    pub fn track(&self) -> &Arc<Track> {
        &self.track
    }

    #[inline]
    pub fn path(&self) -> &PathDefinition {
        &self.path
    }

    #[inline]
    pub fn layout(&self) -> &LayoutProps {
        &self.layout
    }

    #[inline]
    pub fn limits(&self) -> SampleLimits {
        self.limits
    }

    /// Whether the track was rebuilt since the last [`clear_flags`](Self::clear_flags).
    #[inline]
    pub fn has_track_changed(&self) -> bool {
        self.has_track_changed
    }

    pub fn clear_flags(&mut self) {
        self.has_track_changed = false;
    }

    fn rebuild(&mut self) {
        self.track = Arc::new(Track::build_with_limits(&self.path, &self.layout, self.limits));
        self.has_track_changed = true;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_flags_changed() {
        let mut geo = TrackGeometry::new(PathDefinition::default(), LayoutProps::default());
        assert!(geo.has_track_changed());
        geo.clear_flags();
        assert!(!geo.has_track_changed());
    }

    #[test]
    fn test_same_layout_no_rebuild() {
        let mut geo = TrackGeometry::new(PathDefinition::default(), LayoutProps::default());
        geo.clear_flags();
        let before = Arc::clone(geo.track());
        assert!(!geo.set_layout(LayoutProps::default()));
        assert!(!geo.has_track_changed());
        assert!(Arc::ptr_eq(&before, geo.track()));
    }

    #[test]
    fn test_layout_change_rebuilds() {
        let mut geo = TrackGeometry::new(PathDefinition::default(), LayoutProps::default());
        geo.clear_flags();
        let before = Arc::clone(geo.track());
        let wider = LayoutProps::new(1600.0, 400.0, 0.2, 0.8, 0.1).unwrap();
        assert!(geo.set_layout(wider));
        assert!(geo.has_track_changed());
        assert!(geo.track().total_length() > before.total_length());
        // The old snapshot is untouched
        assert!((before.point_at(0.5).unwrap().x - 720.0).abs() < 1e-9);
        assert!((geo.point_at(0.5).unwrap().x - 1440.0).abs() < 1e-9);
    }

    #[test]
    fn test_path_change_rebuilds() {
        let mut geo = TrackGeometry::new(PathDefinition::default(), LayoutProps::default());
        geo.clear_flags();
        let flatter = PathDefinition::new(vec![PathPoint::new(0.3, 1.0)]).unwrap();
        assert!(geo.set_path(flatter.clone()));
        assert!(geo.has_track_changed());
        assert_eq!(geo.path(), &flatter);
        assert!(!geo.set_path(flatter));
    }

    #[test]
    fn test_limits_change_rebuilds() {
        let mut geo = TrackGeometry::new(PathDefinition::default(), LayoutProps::default());
        let coarse = geo.track().segments()[0].lookup().len();
        assert!(geo.set_limits(SampleLimits::new(1.0, 3.0).unwrap()));
        let fine = geo.track().segments()[0].lookup().len();
        assert!(fine > coarse, "finer limits should add samples ({fine} vs {coarse})");
    }
}

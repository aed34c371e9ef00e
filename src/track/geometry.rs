//! The full sun/moon track and position lookup.

use std::f64::consts::PI;
use std::fmt::Write as _;

use serde::Serialize;

use crate::core::{DVec2, Error, Result};
use crate::track::layout::LayoutProps;
use crate::track::path::PathDefinition;
use crate::track::segment::{CurveSegment, SampleLimits};

/// Screen point and tangent angle for a track position.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TrackPoint {
    pub x: f64,
    pub y: f64,
    /// Tangent angle in radians (screen space, y down).
    pub angle: f64,
}

/// The complete track: curves above the horizon, straight rays below it.
///
/// Positions are normalized to `[0, 1)`:
/// - `0.0` left horizon crossing
/// - `0.25` zenith
/// - `0.5` right horizon crossing
/// - `0.75` nadir (the two below-horizon rays meet here conceptually)
///
/// The above-horizon arc is defined to be exactly half of the total length.
/// Each below-horizon ray is a quarter, extrapolated along the horizon
/// tangent; there is no drawn geometry there to measure.
#[derive(Clone, Debug)]
pub struct Track {
    segments: Vec<CurveSegment>,
    total_length: f64,
    left_horizon: DVec2,
    left_nadir: DVec2,
    right_horizon: DVec2,
    right_nadir: DVec2,
    left_below_angle: f64,
    right_below_angle: f64,
}

impl Track {
    /// Build a track with the default chord limits.
    pub fn build(path: &PathDefinition, layout: &LayoutProps) -> Self {
        Self::build_with_limits(path, layout, SampleLimits::default())
    }

    pub fn build_with_limits(
        path: &PathDefinition,
        layout: &LayoutProps,
        limits: SampleLimits,
    ) -> Self {
        let p: Vec<DVec2> = path
            .with_endpoints()
            .into_iter()
            .map(|pt| layout.to_screen(pt))
            .collect();

        // Left quadrant: anchor/control/anchor triples sharing anchors.
        let mut segments: Vec<CurveSegment> = p
            .windows(3)
            .step_by(2)
            .map(|w| CurveSegment::new(w[0], w[1], w[2], limits))
            .collect();

        // Right quadrant is the left one mirrored, walked zenith -> horizon.
        let right: Vec<CurveSegment> = segments
            .iter()
            .rev()
            .map(|seg| seg.mirrored(|pt| layout.mirror(pt), limits))
            .collect();
        segments.extend(right);

        let half_length: f64 = segments.iter().map(CurveSegment::length).sum();
        let total_length = 2.0 * half_length;

        let first = &segments[0];
        let left_horizon = first.a0;
        let d = first.derivative(0.0);
        let left_below_angle = d.y.atan2(d.x);
        let down_angle = left_below_angle + PI;
        let right_below_angle = PI - down_angle;

        let quad_length = total_length / 4.0;
        let left_nadir = left_horizon + DVec2::new(down_angle.cos(), down_angle.sin()) * quad_length;

        let track = Self {
            segments,
            total_length,
            left_horizon,
            left_nadir,
            right_horizon: layout.mirror(left_horizon),
            right_nadir: layout.mirror(left_nadir),
            left_below_angle,
            right_below_angle,
        };

        log::debug!(
            "Built track: {} segments, {} samples, total length {:.2}",
            track.segments.len(),
            track.segments.iter().map(|s| s.lookup().len()).sum::<usize>(),
            track.total_length
        );

        track
    }

    /// Screen point and tangent angle for a track position.
    ///
    /// Any finite position is accepted and wrapped into `[0, 1)`.
    pub fn point_at(&self, position: f64) -> Result<TrackPoint> {
        if !position.is_finite() {
            return Err(Error::InvalidPosition(position));
        }
        let mut position = (position % 1.0 + 1.0) % 1.0;
        // (p % 1 + 1) % 1 can round up to exactly 1.0 for tiny negatives.
        if position >= 1.0 {
            position = 0.0;
        }

        if position < 0.5 {
            Ok(self.point_above_horizon(position * self.total_length))
        } else {
            Ok(self.point_below_horizon(position))
        }
    }

    fn point_above_horizon(&self, dist: f64) -> TrackPoint {
        // Walk segments until the one containing `dist`; the last segment
        // absorbs any overshoot.
        let mut start = 0.0;
        let mut segment = &self.segments[0];
        for next in &self.segments[1..] {
            let end = start + segment.length();
            if dist < end {
                break;
            }
            segment = next;
            start = end;
        }

        let u = segment.parameter_at(dist - start);
        let pt = segment.point(u);
        let d = segment.derivative(u);
        TrackPoint {
            x: pt.x,
            y: pt.y,
            angle: d.y.atan2(d.x),
        }
    }

    fn point_below_horizon(&self, position: f64) -> TrackPoint {
        let quad_pos = (4.0 * position) % 1.0;
        let (from, to, angle) = if position < 0.75 {
            (self.right_horizon, self.right_nadir, self.right_below_angle)
        } else {
            (self.left_nadir, self.left_horizon, self.left_below_angle)
        };
        let pt = from.lerp(to, quad_pos);
        TrackPoint {
            x: pt.x,
            y: pt.y,
            angle,
        }
    }

    /// Total cyclic track length (twice the above-horizon arc).
    #[inline]
    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    #[inline]
    pub fn segments(&self) -> &[CurveSegment] {
        &self.segments
    }

    #[inline]
    pub fn left_horizon(&self) -> DVec2 {
        self.left_horizon
    }

    #[inline]
    pub fn right_horizon(&self) -> DVec2 {
        self.right_horizon
    }

    #[inline]
    pub fn left_nadir(&self) -> DVec2 {
        self.left_nadir
    }

    #[inline]
    pub fn right_nadir(&self) -> DVec2 {
        self.right_nadir
    }

    /// Tangent angles of the (left, right) below-horizon rays.
    #[inline]
    pub fn below_horizon_angles(&self) -> (f64, f64) {
        (self.left_below_angle, self.right_below_angle)
    }

    /// SVG path data for the whole track, nadir to nadir.
    pub fn path_data(&self) -> String {
        let mut d = format!(
            "M {},{} L {},{}",
            self.left_nadir.x, self.left_nadir.y, self.left_horizon.x, self.left_horizon.y
        );
        for seg in &self.segments {
            // Writing into a String cannot fail.
            let _ = write!(d, " Q {},{} {},{}", seg.c.x, seg.c.y, seg.a1.x, seg.a1.y);
        }
        let _ = write!(d, " L {},{}", self.right_nadir.x, self.right_nadir.y);
        d
    }
}

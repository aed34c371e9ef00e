//! Layout properties supplied by the host and the path-to-screen transform.

use crate::core::error::require_finite;
use crate::core::{DVec2, Error, Result};
use crate::track::path::PathPoint;

/// Layout of the diagram's content area.
///
/// Screen space is left-handed with the origin at the upper-left corner of
/// the content area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutProps {
    pub content_width: f64,
    pub content_height: f64,
    /// Height of the horizon above the bottom edge, as a fraction of content height.
    pub horizon: f64,
    /// Zenith height above the horizon, as a fraction of the horizon's screen y.
    pub peak: f64,
    /// Horizontal inset of the horizon crossings, as a fraction of content width.
    pub margin: f64,
}

/// Largest accepted content width or height.
pub const MAX_CONTENT_SIZE: f64 = 16_384.0;

impl LayoutProps {
    pub fn new(
        content_width: f64,
        content_height: f64,
        horizon: f64,
        peak: f64,
        margin: f64,
    ) -> Result<Self> {
        for (field, value) in [("contentWidth", content_width), ("contentHeight", content_height)] {
            if !(value.is_finite() && value > 0.0 && value <= MAX_CONTENT_SIZE) {
                return Err(Error::config(
                    field,
                    format!("must be within (0, {MAX_CONTENT_SIZE}], got {value}"),
                ));
            }
        }
        let horizon = require_finite("horizon", horizon)?;
        let peak = require_finite("peak", peak)?;
        let margin = require_finite("margin", margin)?;
        for (field, value) in [("horizon", horizon), ("peak", peak)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::config(field, format!("must be within [0, 1], got {value}")));
            }
        }
        if !(0.0..0.5).contains(&margin) {
            return Err(Error::config("margin", format!("must be within [0, 0.5), got {margin}")));
        }
        Ok(Self {
            content_width,
            content_height,
            horizon,
            peak,
            margin,
        })
    }

    /// Screen y of the horizon line.
    #[inline]
    pub fn horizon_y(&self) -> f64 {
        self.content_height * (1.0 - self.horizon)
    }

    /// Map a path-space point to screen space.
    pub fn to_screen(&self, p: PathPoint) -> DVec2 {
        let x_offset = self.content_width * self.margin;
        let x_scale = 0.5 * self.content_width * (1.0 - 2.0 * self.margin);
        let y_offset = self.horizon_y();
        let y_scale = -self.peak * y_offset;
        DVec2::new(x_scale * p.x + x_offset, y_scale * p.y + y_offset)
    }

    /// Reflect a screen point about the vertical centerline.
    #[inline]
    pub fn mirror(&self, p: DVec2) -> DVec2 {
        DVec2::new(self.content_width - p.x, p.y)
    }
}

impl Default for LayoutProps {
    fn default() -> Self {
        Self {
            content_width: 800.0,
            content_height: 400.0,
            horizon: 0.2,
            peak: 0.8,
            margin: 0.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizon_y() {
        let l = LayoutProps::new(800.0, 400.0, 0.25, 0.8, 0.1).unwrap();
        assert!((l.horizon_y() - 300.0).abs() < 1e-12);
    }

    #[test]
    fn test_to_screen_endpoints() {
        let l = LayoutProps::default();
        // Left horizon crossing
        let a = l.to_screen(PathPoint::new(0.0, 0.0));
        assert!((a.x - 80.0).abs() < 1e-9, "x = {}", a.x);
        assert!((a.y - 320.0).abs() < 1e-9, "y = {}", a.y);
        // Zenith sits on the centerline, peak * horizon_y above the horizon
        let z = l.to_screen(PathPoint::new(1.0, 1.0));
        assert!((z.x - 400.0).abs() < 1e-9);
        assert!((z.y - (320.0 - 0.8 * 320.0)).abs() < 1e-9);
    }

    #[test]
    fn test_mirror() {
        let l = LayoutProps::default();
        let p = l.mirror(DVec2::new(100.0, 50.0));
        assert_eq!(p, DVec2::new(700.0, 50.0));
    }

    #[test]
    fn test_rejects_out_of_range_fractions() {
        assert!(LayoutProps::new(800.0, 400.0, 0.0, 1.0, 0.0).is_ok());
        assert!(LayoutProps::new(800.0, 400.0, -0.1, 0.8, 0.1).is_err());
        assert!(LayoutProps::new(800.0, 400.0, 1.5, 0.8, 0.1).is_err());
        assert!(LayoutProps::new(800.0, 400.0, 0.2, 1.01, 0.1).is_err());
        assert!(LayoutProps::new(800.0, 400.0, 0.2, -0.5, 0.1).is_err());
        assert!(LayoutProps::new(800.0, 400.0, 0.2, 0.8, 0.5).is_err());
        assert!(LayoutProps::new(800.0, 400.0, 0.2, 0.8, -0.01).is_err());
    }

    #[test]
    fn test_rejects_oversized_content() {
        assert!(LayoutProps::new(MAX_CONTENT_SIZE, MAX_CONTENT_SIZE, 0.2, 0.8, 0.1).is_ok());
        let err = LayoutProps::new(1e12, 400.0, 0.2, 0.8, 0.1).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { field: "contentWidth", .. }));
        assert!(LayoutProps::new(800.0, 1e6, 0.2, 0.8, 0.1).is_err());
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        assert!(LayoutProps::new(0.0, 400.0, 0.2, 0.8, 0.1).is_err());
        assert!(LayoutProps::new(800.0, f64::NAN, 0.2, 0.8, 0.1).is_err());
        assert!(LayoutProps::new(800.0, 400.0, 0.2, f64::INFINITY, 0.1).is_err());
    }
}

//! Moon phase mask: the terminator between lit and unlit parts of the disc.
//!
//! The lit region is a half disc on one side (the limb) joined to a half
//! ellipse of horizontal radius `rx` on the other. The ellipse bows toward
//! the limb for crescents and away from it for gibbous phases; it collapses
//! to a straight line at the quarters.

use std::f64::consts::TAU;

use serde::Serialize;

use crate::core::{Error, Result};

/// Horizontal side of the moon disc.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Side {
    Left,
    Right,
}

/// Named phase shape, selected from the sun/moon separation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum PhaseShape {
    New,
    WaningCrescent,
    ThirdQuarter,
    WaningGibbous,
    Full,
    WaxingGibbous,
    FirstQuarter,
    WaxingCrescent,
}

impl PhaseShape {
    fn from_delta(delta: f64) -> Self {
        if delta == 0.0 {
            Self::New
        } else if delta < 0.25 {
            Self::WaningCrescent
        } else if delta == 0.25 {
            Self::ThirdQuarter
        } else if delta < 0.5 {
            Self::WaningGibbous
        } else if delta == 0.5 {
            Self::Full
        } else if delta < 0.75 {
            Self::WaxingGibbous
        } else if delta == 0.75 {
            Self::FirstQuarter
        } else {
            Self::WaxingCrescent
        }
    }
}

/// Terminator descriptor for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Terminator {
    /// Moon minus sun track position, wrapped into `[0, 1)`.
    /// 0 is new moon, 0.5 is full moon.
    pub delta: f64,
    /// Disc radius.
    pub radius: f64,
    /// Horizontal radius of the terminator half-ellipse.
    pub rx: f64,
    pub shape: PhaseShape,
}

impl Terminator {
    /// Side holding the lit half disc, if the disc is partially lit.
    pub fn limb(&self) -> Option<Side> {
        match self.shape {
            PhaseShape::New | PhaseShape::Full => None,
            PhaseShape::WaningCrescent | PhaseShape::ThirdQuarter | PhaseShape::WaningGibbous => {
                Some(Side::Left)
            }
            PhaseShape::WaxingGibbous | PhaseShape::FirstQuarter | PhaseShape::WaxingCrescent => {
                Some(Side::Right)
            }
        }
    }

    /// Side the terminator ellipse bows toward; `None` when it is a straight
    /// line or absent.
    pub fn bulge(&self) -> Option<Side> {
        match self.shape {
            PhaseShape::WaningCrescent | PhaseShape::WaxingGibbous => Some(Side::Left),
            PhaseShape::WaningGibbous | PhaseShape::WaxingCrescent => Some(Side::Right),
            _ => None,
        }
    }

    /// False only at new moon, when the disc is fully masked.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.shape != PhaseShape::New
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.shape == PhaseShape::Full
    }

    /// Lit fraction of the disc area, 0 at new and 1 at full.
    pub fn illuminated_fraction(&self) -> f64 {
        match self.shape {
            PhaseShape::New => 0.0,
            PhaseShape::Full => 1.0,
            _ => 0.5 * (1.0 - (TAU * self.delta).cos()),
        }
    }

    /// SVG path data for the lit region of a disc drawn in a `2R x 2R` box.
    ///
    /// Empty at new moon.
    pub fn svg_path(&self) -> String {
        let r = self.radius;
        let d = 2.0 * r;
        let rx = self.rx;
        match self.shape {
            PhaseShape::New => String::new(),
            PhaseShape::WaningCrescent => {
                format!("M {r} 0 A {rx} {r} 0 1 0 {r} {d} A {r} {r} 0 1 1 {r} 0 Z")
            }
            PhaseShape::ThirdQuarter => format!("M {r} 0 L {r} {d} A {r} {r} 0 1 1 {r} 0 Z"),
            PhaseShape::WaningGibbous => {
                format!("M {r} 0 A {rx} {r} 0 1 1 {r} {d} A {r} {r} 0 1 1 {r} 0 Z")
            }
            PhaseShape::Full => format!("M {r} 0 A {r} {r} 0 1 1 {r} {d} A {r} {r} 0 1 1 {r} 0 Z"),
            PhaseShape::WaxingGibbous => {
                format!("M {r} 0 A {r} {r} 0 1 1 {r} {d} A {rx} {r} 0 1 1 {r} 0 Z")
            }
            PhaseShape::FirstQuarter => format!("M {r} 0 A {r} {r} 0 1 1 {r} {d} L {r} 0 Z"),
            PhaseShape::WaxingCrescent => {
                format!("M {r} 0 A {r} {r} 0 1 1 {r} {d} A {rx} {r} 0 1 0 {r} 0 Z")
            }
        }
    }
}

/// Computes terminators for a moon disc of fixed radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseMask {
    radius: f64,
}

impl PhaseMask {
    pub fn new(radius: f64) -> Result<Self> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(Error::InvalidArgument(format!(
                "moon radius must be finite and positive, got {radius}"
            )));
        }
        Ok(Self { radius })
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Terminator for the given sun and moon track positions.
    pub fn compute(&self, sun_position: f64, moon_position: f64) -> Result<Terminator> {
        for position in [sun_position, moon_position] {
            if !position.is_finite() {
                return Err(Error::InvalidPosition(position));
            }
        }
        let mut delta = ((moon_position - sun_position) % 1.0 + 1.0) % 1.0;
        if delta >= 1.0 {
            delta = 0.0;
        }
        let shape = PhaseShape::from_delta(delta);
        let rx = match shape {
            PhaseShape::ThirdQuarter | PhaseShape::FirstQuarter => 0.0,
            _ => (self.radius * (TAU * delta).cos()).abs(),
        };
        Ok(Terminator {
            delta,
            radius: self.radius,
            rx,
            shape,
        })
    }
}

impl Default for PhaseMask {
    fn default() -> Self {
        Self { radius: 40.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_moon_fully_masked() {
        let mask = PhaseMask::default();
        let t = mask.compute(0.3, 0.3).unwrap();
        assert_eq!(t.shape, PhaseShape::New);
        assert_eq!(t.delta, 0.0);
        assert!(!t.is_visible());
        assert_eq!(t.illuminated_fraction(), 0.0);
        assert!(t.svg_path().is_empty());
    }

    #[test]
    fn test_full_moon_unmasked() {
        let mask = PhaseMask::default();
        let t = mask.compute(0.0, 0.5).unwrap();
        assert_eq!(t.shape, PhaseShape::Full);
        assert!(t.is_full());
        assert_eq!(t.rx, 40.0);
        assert_eq!(t.illuminated_fraction(), 1.0);
        assert_eq!(t.limb(), None);
        assert_eq!(
            t.svg_path(),
            "M 40 0 A 40 40 0 1 1 40 80 A 40 40 0 1 1 40 0 Z"
        );
    }

    #[test]
    fn test_quarters_have_zero_rx() {
        let mask = PhaseMask::default();
        let third = mask.compute(0.0, 0.25).unwrap();
        assert_eq!(third.shape, PhaseShape::ThirdQuarter);
        assert_eq!(third.rx, 0.0);
        assert_eq!(third.limb(), Some(Side::Left));
        assert_eq!(third.bulge(), None);

        let first = mask.compute(0.0, 0.75).unwrap();
        assert_eq!(first.shape, PhaseShape::FirstQuarter);
        assert_eq!(first.rx, 0.0);
        assert_eq!(first.limb(), Some(Side::Right));
        assert!((first.illuminated_fraction() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_sweep_flips_at_quarters() {
        let mask = PhaseMask::default();
        let cases = [
            (0.1, PhaseShape::WaningCrescent, Side::Left, Side::Left),
            (0.4, PhaseShape::WaningGibbous, Side::Left, Side::Right),
            (0.6, PhaseShape::WaxingGibbous, Side::Right, Side::Left),
            (0.9, PhaseShape::WaxingCrescent, Side::Right, Side::Right),
        ];
        for (delta, shape, limb, bulge) in cases {
            let t = mask.compute(0.0, delta).unwrap();
            assert_eq!(t.shape, shape, "delta {delta}");
            assert_eq!(t.limb(), Some(limb), "delta {delta}");
            assert_eq!(t.bulge(), Some(bulge), "delta {delta}");
            let expected = (40.0 * (TAU * delta).cos()).abs();
            assert!((t.rx - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_delta_wraps() {
        let mask = PhaseMask::default();
        let a = mask.compute(0.9, 0.1).unwrap();
        assert!((a.delta - 0.2).abs() < 1e-12);
        let b = mask.compute(-0.25, 1.5).unwrap();
        assert!((b.delta - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_waxing_crescent_path() {
        let mask = PhaseMask::new(10.0).unwrap();
        let t = mask.compute(0.0, 0.875).unwrap();
        let path = t.svg_path();
        assert!(path.starts_with("M 10 0 A 10 10 0 1 1 10 20 A "), "path = {path}");
        assert!(path.ends_with(" 10 0 1 0 10 0 Z"), "path = {path}");
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(PhaseMask::new(0.0).is_err());
        assert!(PhaseMask::new(f64::NAN).is_err());
        let mask = PhaseMask::default();
        assert!(matches!(mask.compute(f64::NAN, 0.0), Err(Error::InvalidPosition(_))));
        assert!(matches!(mask.compute(0.0, f64::INFINITY), Err(Error::InvalidPosition(_))));
    }
}

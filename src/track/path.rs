//! Designer-supplied track path definition.
//!
//! A path is a short list of points in *path space*: a right-handed system
//! with the origin at the left horizon/track intersection and `(1, 1)` at the
//! zenith. The points alternate control/anchor/control/... for a chain of
//! quadratic Bezier curves; the first anchor `(0, 0)` and the last anchor
//! `(1, 1)` are implied, so a valid definition always has odd length.

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

/// A single point in path space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub x: f64,
    pub y: f64,
}

impl PathPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Validated left-quadrant path definition.
///
/// Construction is the only validation point: a `PathDefinition` value always
/// has odd length and finite coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PathPoint>", into = "Vec<PathPoint>")]
pub struct PathDefinition {
    points: Vec<PathPoint>,
}

impl PathDefinition {
    /// Validate and wrap a list of control/anchor points.
    pub fn new(points: Vec<PathPoint>) -> Result<Self> {
        if points.len() % 2 != 1 {
            return Err(Error::InvalidPath(format!(
                "path must have odd length, got {}",
                points.len()
            )));
        }
        if let Some((i, pt)) = points
            .iter()
            .enumerate()
            .find(|(_, pt)| !pt.x.is_finite() || !pt.y.is_finite())
        {
            return Err(Error::InvalidPath(format!(
                "point {i} has non-finite coordinates ({}, {})",
                pt.x, pt.y
            )));
        }
        Ok(Self { points })
    }

    /// The user-supplied points, without the implied endpoints.
    #[inline]
    pub fn points(&self) -> &[PathPoint] {
        &self.points
    }

    /// Number of quadratic curves in the left quadrant.
    #[inline]
    pub fn curve_count(&self) -> usize {
        (self.points.len() + 1) / 2
    }

    /// Points with the implied `(0, 0)` start and `(1, 1)` end anchors added.
    pub(crate) fn with_endpoints(&self) -> Vec<PathPoint> {
        let mut p = Vec::with_capacity(self.points.len() + 2);
        p.push(PathPoint::new(0.0, 0.0));
        p.extend_from_slice(&self.points);
        p.push(PathPoint::new(1.0, 1.0));
        p
    }
}

impl Default for PathDefinition {
    /// A single control point halfway across at zenith height.
    fn default() -> Self {
        Self {
            points: vec![PathPoint::new(0.5, 1.0)],
        }
    }
}

impl TryFrom<Vec<PathPoint>> for PathDefinition {
    type Error = Error;

    fn try_from(points: Vec<PathPoint>) -> Result<Self> {
        Self::new(points)
    }
}

impl From<PathDefinition> for Vec<PathPoint> {
    fn from(def: PathDefinition) -> Self {
        def.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_point_is_valid() {
        let def = PathDefinition::new(vec![PathPoint::new(0.5, 1.0)]).unwrap();
        assert_eq!(def.curve_count(), 1);
        assert_eq!(def.with_endpoints().len(), 3);
    }

    #[test]
    fn test_three_points_two_curves() {
        let def = PathDefinition::new(vec![
            PathPoint::new(0.0, 0.75),
            PathPoint::new(0.125, 0.875),
            PathPoint::new(0.25, 1.0),
        ])
        .unwrap();
        assert_eq!(def.curve_count(), 2);
        let p = def.with_endpoints();
        assert_eq!(p[0], PathPoint::new(0.0, 0.0));
        assert_eq!(p[4], PathPoint::new(1.0, 1.0));
    }

    #[test]
    fn test_even_length_rejected() {
        let err = PathDefinition::new(vec![PathPoint::new(0.5, 1.0), PathPoint::new(0.7, 1.0)])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPath(_)));
        assert!(matches!(PathDefinition::new(vec![]), Err(Error::InvalidPath(_))));
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = PathDefinition::new(vec![PathPoint::new(f64::NAN, 1.0)]).unwrap_err();
        assert!(matches!(err, Error::InvalidPath(_)));
        let err = PathDefinition::new(vec![PathPoint::new(0.5, f64::INFINITY)]).unwrap_err();
        assert!(matches!(err, Error::InvalidPath(_)));
    }

    #[test]
    fn test_deserialize_validates() {
        let def: PathDefinition = serde_json::from_str(r#"[{"x": 0.358, "y": 1}]"#).unwrap();
        assert_eq!(def.points()[0], PathPoint::new(0.358, 1.0));

        let bad: std::result::Result<PathDefinition, _> =
            serde_json::from_str(r#"[{"x": 0.3, "y": 1}, {"x": 0.4, "y": 1}]"#);
        assert!(bad.is_err());
    }
}

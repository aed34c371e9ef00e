//! Quadratic Bezier segments with arc-length lookup tables.
//!
//! The track is positioned by arc length, not by Bezier parameter. Each
//! segment carries a table of short chords so that a target distance along
//! the segment can be converted back to a parameter `u` without solving for
//! the arc-length integral.
//!
//! The tables only have to be consistent, not precise: the curve itself is
//! always evaluated exactly from the Bezier formula. Sampling error shows up
//! as slight speed variation along the track.

use crate::core::{DVec2, Error, Result};

/// Smallest parameter step the sampler halves down to. Bounds the table at
/// `1 / MIN_STEP` entries however long the curve is.
pub const MIN_STEP: f64 = 1.0 / 65_536.0;

/// Target chord lengths, in screen units, for the adaptive sampler.
///
/// `max_s` must exceed `2 * min_s` so that growing a short step by 1.5x
/// cannot immediately overshoot and halve it again.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleLimits {
    min_s: f64,
    max_s: f64,
}

impl SampleLimits {
    pub fn new(min_s: f64, max_s: f64) -> Result<Self> {
        if !(min_s.is_finite() && max_s.is_finite()) {
            return Err(Error::InvalidArgument(format!(
                "sample limits must be finite, got [{min_s}, {max_s}]"
            )));
        }
        if min_s <= 0.0 || 2.0 * min_s >= max_s {
            return Err(Error::InvalidArgument(format!(
                "sample limits need 0 < min_s and 2 * min_s < max_s, got [{min_s}, {max_s}]"
            )));
        }
        Ok(Self { min_s, max_s })
    }

    /// Chords shorter than this grow the step for the next sample.
    #[inline]
    pub fn min_s(&self) -> f64 {
        self.min_s
    }

    /// Chords longer than this are rejected and the step halved.
    #[inline]
    pub fn max_s(&self) -> f64 {
        self.max_s
    }
}

impl Default for SampleLimits {
    fn default() -> Self {
        Self { min_s: 5.0, max_s: 12.0 }
    }
}

/// One sampled chord of a segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LookupSample {
    /// Bezier parameter at the start of the chord.
    pub u: f64,
    /// Parameter delta to the next sample.
    pub du: f64,
    /// Chord length to the next sample.
    pub s: f64,
    /// Cumulative length from the segment start to this sample.
    pub ts: f64,
}

/// A quadratic Bezier in screen space plus its lookup table.
#[derive(Clone, Debug)]
pub struct CurveSegment {
    pub a0: DVec2,
    pub c: DVec2,
    pub a1: DVec2,
    lookup: Vec<LookupSample>,
    length: f64,
}

impl CurveSegment {
    /// Build a segment, sampling it with the given chord limits.
    pub fn new(a0: DVec2, c: DVec2, a1: DVec2, limits: SampleLimits) -> Self {
        let mut segment = Self {
            a0,
            c,
            a1,
            lookup: Vec::new(),
            length: 0.0,
        };
        segment.sample(limits);
        segment
    }

    /// Point on the curve at parameter `u`.
    #[inline]
    pub fn point(&self, u: f64) -> DVec2 {
        let v = 1.0 - u;
        self.a0 * (v * v) + self.c * (2.0 * v * u) + self.a1 * (u * u)
    }

    /// First derivative with respect to `u`.
    #[inline]
    pub fn derivative(&self, u: f64) -> DVec2 {
        (self.c - self.a0) * (2.0 * (1.0 - u)) + (self.a1 - self.c) * (2.0 * u)
    }

    /// Approximate arc length (sum of all chords).
    #[inline]
    pub fn length(&self) -> f64 {
        self.length
    }

    #[inline]
    pub fn lookup(&self) -> &[LookupSample] {
        &self.lookup
    }

    /// Bezier parameter for a distance `ts` measured from the segment start.
    ///
    /// Finds the last sample starting at or before `ts` and interpolates
    /// linearly within its chord. Distances past the end extrapolate along
    /// the final chord.
    pub fn parameter_at(&self, ts: f64) -> f64 {
        let idx = self.lookup.partition_point(|e| e.ts <= ts).saturating_sub(1);
        let Some(entry) = self.lookup.get(idx) else {
            return 0.0;
        };
        if entry.s > 0.0 {
            entry.u + entry.du * ((ts - entry.ts) / entry.s)
        } else {
            entry.u
        }
    }

    /// Copy of this segment reflected by `mirror` and traversed in reverse.
    pub fn mirrored(&self, mirror: impl Fn(DVec2) -> DVec2, limits: SampleLimits) -> Self {
        Self::new(mirror(self.a1), mirror(self.c), mirror(self.a0), limits)
    }

    /// Adaptive chord sampler.
    ///
    /// Starts with `du = 0.5`, halves it while the next chord exceeds
    /// `max_s` (down to [`MIN_STEP`]), and grows it by 1.5x after accepting
    /// a chord shorter than `min_s`.
    fn sample(&mut self, limits: SampleLimits) {
        let mut lookup = Vec::new();
        let mut u = 0.0;
        let mut du = 0.5;
        let mut pt = self.a0;
        let mut ts = 0.0;

        while u < 1.0 {
            let (nu, npt, s) = loop {
                let mut nu = u + du;
                if nu > 1.0 {
                    du = 1.0 - u;
                    nu = 1.0;
                }
                let npt = self.point(nu);
                let s = pt.distance(npt);
                if s > limits.max_s && du > MIN_STEP {
                    du *= 0.5;
                } else {
                    break (nu, npt, s);
                }
            };

            lookup.push(LookupSample { u, du, s, ts });
            ts += s;
            u = nu;
            pt = npt;

            if s < limits.min_s {
                du *= 1.5;
            }
        }

        self.lookup = lookup;
        self.length = ts;
    }
}

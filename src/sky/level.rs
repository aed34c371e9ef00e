//! Sky brightness and ground shading as a function of sun position.
//!
//! Four linear windows straddle the horizon crossings: dawn runs from
//! `-below` to `+above` around position 0 and dusk mirrors it around 0.5.
//! The ramp `u` is 0 at full night, 1 at full day and 0.5 exactly on the
//! horizon. Separate exponents shape the sky and ground responses.

use serde::Serialize;

use crate::core::{Error, Result};
use crate::sky::config::SkyLevelConfig;

/// Output of [`SkyLevel::compute`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SkyLevelOutput {
    /// Linear day/night ramp in `[0, 1]`.
    pub ramp: f64,
    /// Opacity of the day sky over the night sky base.
    pub sky_blend: f64,
    /// Multiplicative ground brightness; 1 means unshaded.
    pub shade_level: f64,
}

/// Validated sky level calculator.
#[derive(Clone, Debug, PartialEq)]
pub struct SkyLevel {
    config: SkyLevelConfig,
}

impl SkyLevel {
    pub fn new(config: &SkyLevelConfig) -> Result<Self> {
        Ok(Self {
            config: config.validated()?,
        })
    }

    #[inline]
    pub fn config(&self) -> &SkyLevelConfig {
        &self.config
    }

    /// Sky blend and ground shading for a sun track position.
    pub fn compute(&self, sun_position: f64) -> Result<SkyLevelOutput> {
        if !sun_position.is_finite() {
            return Err(Error::InvalidPosition(sun_position));
        }
        let ramp = self.ramp(sun_position);
        let c = &self.config;
        let darkest = c.darkest_shading_level;
        Ok(SkyLevelOutput {
            ramp,
            sky_blend: ramp.powf(c.sky_level_transition_power),
            shade_level: darkest + (1.0 - darkest) * ramp.powf(c.shading_level_transition_power),
        })
    }

    fn ramp(&self, sun_position: f64) -> f64 {
        let p = (sun_position % 1.0 + 1.0) % 1.0;
        let below = self.config.sky_transition_below_threshold;
        let above = self.config.sky_transition_above_threshold;

        if p < above {
            // Just after sunrise
            0.5 + 0.5 * (p / above)
        } else if p < 0.5 - above {
            1.0
        } else if p < 0.5 {
            // Just before sunset
            0.5 + 0.5 * ((0.5 - p) / above)
        } else if p < 0.5 + below {
            // Just after sunset
            0.5 - 0.5 * ((p - 0.5) / below)
        } else if p < 1.0 - below {
            0.0
        } else {
            // Just before sunrise
            0.5 * ((p - (1.0 - below)) / below)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level() -> SkyLevel {
        SkyLevel::new(&SkyLevelConfig::default()).unwrap()
    }

    #[test]
    fn test_noon_and_midnight() {
        let sky = level();
        let noon = sky.compute(0.25).unwrap();
        assert_eq!(noon.sky_blend, 1.0);
        assert_eq!(noon.shade_level, 1.0);

        let midnight = sky.compute(0.75).unwrap();
        assert_eq!(midnight.sky_blend, 0.0);
        assert_eq!(midnight.shade_level, 0.5);
    }

    #[test]
    fn test_horizon_is_half_ramp() {
        let sky = level();
        for p in [0.0, 0.5, 1.0, -1.0] {
            let out = sky.compute(p).unwrap();
            assert!((out.ramp - 0.5).abs() < 1e-12, "ramp at {p} = {}", out.ramp);
            assert!((out.sky_blend - 0.25).abs() < 1e-12);
            assert!((out.shade_level - (0.5 + 0.5 * 0.125)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_ramp_continuous_and_bounded() {
        let sky = level();
        let n = 10_000;
        let mut prev = sky.compute(0.0).unwrap().ramp;
        for i in 1..=n {
            let p = i as f64 / n as f64;
            let out = sky.compute(p).unwrap();
            assert!((0.0..=1.0).contains(&out.ramp));
            assert!((0.0..=1.0).contains(&out.sky_blend));
            assert!((0.5..=1.0).contains(&out.shade_level));
            // Steepest window is 0.05 wide: at most 1e-3 per step
            assert!((out.ramp - prev).abs() < 2e-3, "jump at {p}");
            prev = out.ramp;
        }
    }

    #[test]
    fn test_windows() {
        let sky = level();
        // Dawn begins 0.15 before the horizon crossing
        assert_eq!(sky.compute(0.84).unwrap().ramp, 0.0);
        assert!(sky.compute(0.9).unwrap().ramp > 0.0);
        // Full day 0.05 after sunrise
        assert_eq!(sky.compute(0.05).unwrap().ramp, 1.0);
        assert!(sky.compute(0.04).unwrap().ramp < 1.0);
        // Dusk mirrors dawn
        assert!(sky.compute(0.46).unwrap().ramp < 1.0);
        assert_eq!(sky.compute(0.66).unwrap().ramp, 0.0);
    }

    #[test]
    fn test_powers_shape_independently() {
        let cfg = SkyLevelConfig {
            sky_level_transition_power: 1.0,
            shading_level_transition_power: 4.0,
            darkest_shading_level: 0.0,
            ..Default::default()
        };
        let sky = SkyLevel::new(&cfg).unwrap();
        let out = sky.compute(0.0).unwrap();
        assert!((out.sky_blend - 0.5).abs() < 1e-12);
        assert!((out.shade_level - 0.0625).abs() < 1e-12);
    }

    #[test]
    fn test_zero_thresholds_step() {
        let cfg = SkyLevelConfig {
            sky_transition_below_threshold: 0.0,
            sky_transition_above_threshold: 0.0,
            ..Default::default()
        };
        let sky = SkyLevel::new(&cfg).unwrap();
        assert_eq!(sky.compute(0.1).unwrap().ramp, 1.0);
        assert_eq!(sky.compute(0.6).unwrap().ramp, 0.0);
        assert_eq!(sky.compute(0.0).unwrap().ramp, 1.0);
        assert_eq!(sky.compute(0.5).unwrap().ramp, 0.0);
    }

    #[test]
    fn test_non_finite_rejected() {
        let sky = level();
        assert!(matches!(sky.compute(f64::NAN), Err(Error::InvalidPosition(_))));
    }
}

//! Sky and night-shading configuration.

use serde::{Deserialize, Serialize};

use crate::core::error::require_finite;
use crate::core::{Error, Result};

/// Largest allowed transition threshold; keeps the dawn and dusk windows
/// from overlapping.
pub const MAX_TRANSITION_THRESHOLD: f64 = 0.25;

/// Controls how the sky and ground brighten and darken around the horizon
/// crossings. Thresholds are measured in track position units (a full day
/// is 1.0).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SkyLevelConfig {
    /// How far below the horizon the sun is when the transition starts/ends.
    pub sky_transition_below_threshold: f64,
    /// How far above the horizon the sun is when the transition starts/ends.
    pub sky_transition_above_threshold: f64,
    /// Exponent applied to the ramp for the sky blend.
    pub sky_level_transition_power: f64,
    /// Exponent applied to the ramp for ground shading.
    pub shading_level_transition_power: f64,
    /// Ground brightness at full night: 0 is black, 1 is unshaded.
    pub darkest_shading_level: f64,
}

impl Default for SkyLevelConfig {
    fn default() -> Self {
        Self {
            sky_transition_below_threshold: 0.15,
            sky_transition_above_threshold: 0.05,
            sky_level_transition_power: 2.0,
            shading_level_transition_power: 3.0,
            darkest_shading_level: 0.5,
        }
    }
}

impl SkyLevelConfig {
    /// Check ranges, returning a copy with `darkest_shading_level` clamped
    /// into `[0, 1]`.
    pub fn validated(&self) -> Result<Self> {
        let below = threshold("skyTransitionBelowThreshold", self.sky_transition_below_threshold)?;
        let above = threshold("skyTransitionAboveThreshold", self.sky_transition_above_threshold)?;
        let sky_power = power("skyLevelTransitionPower", self.sky_level_transition_power)?;
        let shade_power = power("shadingLevelTransitionPower", self.shading_level_transition_power)?;
        let darkest = require_finite("darkestShadingLevel", self.darkest_shading_level)?;
        Ok(Self {
            sky_transition_below_threshold: below,
            sky_transition_above_threshold: above,
            sky_level_transition_power: sky_power,
            shading_level_transition_power: shade_power,
            darkest_shading_level: darkest.clamp(0.0, 1.0),
        })
    }
}

fn threshold(field: &'static str, value: f64) -> Result<f64> {
    let value = require_finite(field, value)?;
    if !(0.0..=MAX_TRANSITION_THRESHOLD).contains(&value) {
        return Err(Error::config(
            field,
            format!("must be within [0, {MAX_TRANSITION_THRESHOLD}], got {value}"),
        ));
    }
    Ok(value)
}

fn power(field: &'static str, value: f64) -> Result<f64> {
    let value = require_finite(field, value)?;
    if value <= 0.0 {
        return Err(Error::config(field, format!("must be positive, got {value}")));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let cfg = SkyLevelConfig::default();
        assert_eq!(cfg.validated().unwrap(), cfg);
    }

    #[test]
    fn test_darkest_clamped() {
        let cfg = SkyLevelConfig {
            darkest_shading_level: 1.7,
            ..Default::default()
        };
        assert_eq!(cfg.validated().unwrap().darkest_shading_level, 1.0);
        let cfg = SkyLevelConfig {
            darkest_shading_level: -0.2,
            ..Default::default()
        };
        assert_eq!(cfg.validated().unwrap().darkest_shading_level, 0.0);
    }

    #[test]
    fn test_bad_threshold() {
        let cfg = SkyLevelConfig {
            sky_transition_below_threshold: 0.3,
            ..Default::default()
        };
        let err = cfg.validated().unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConfig { field: "skyTransitionBelowThreshold", .. }
        ));
    }

    #[test]
    fn test_bad_power() {
        let cfg = SkyLevelConfig {
            shading_level_transition_power: 0.0,
            ..Default::default()
        };
        assert!(cfg.validated().is_err());
        let cfg = SkyLevelConfig {
            sky_level_transition_power: f64::NAN,
            ..Default::default()
        };
        assert!(cfg.validated().is_err());
    }

    #[test]
    fn test_camel_case_keys() {
        let cfg: SkyLevelConfig =
            serde_json::from_str(r#"{"darkestShadingLevel": 0.25, "skyLevelTransitionPower": 1}"#)
                .unwrap();
        assert_eq!(cfg.darkest_shading_level, 0.25);
        assert_eq!(cfg.sky_level_transition_power, 1.0);
        // Unspecified keys keep their defaults
        assert_eq!(cfg.sky_transition_below_threshold, 0.15);
    }
}

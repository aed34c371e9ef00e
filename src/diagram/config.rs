//! Aggregate configuration for the whole diagram, loadable from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::Result;
use crate::sky::{PhaseMask, SkyLevel, SkyLevelConfig, SkyPalette};
use crate::time::{ClockConstants, TimeConfig};
use crate::track::{LayoutProps, PathDefinition, PathPoint, SampleLimits, TrackGeometry};

/// Track layout and path definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrackConfig {
    pub content_width: f64,
    pub content_height: f64,
    /// Horizon height as a fraction of content height, from the bottom.
    pub horizon: f64,
    /// Zenith height as a fraction of the space above the horizon.
    pub peak: f64,
    /// Horizontal margin as a fraction of content width.
    pub margin: f64,
    /// Sampler chord lengths below which the step grows.
    pub min_chord: f64,
    /// Sampler chord lengths above which the step is halved.
    pub max_chord: f64,
    pub path: PathDefinition,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            content_width: 836.0,
            content_height: 736.0,
            horizon: 0.15,
            peak: 0.715,
            margin: 0.03,
            min_chord: 5.0,
            max_chord: 12.0,
            path: default_path(),
        }
    }
}

fn default_path() -> PathDefinition {
    // A single control point always forms a valid definition.
    PathDefinition::try_from(vec![PathPoint::new(0.358, 1.0)]).unwrap_or_default()
}

impl TrackConfig {
    pub fn layout(&self) -> Result<LayoutProps> {
        LayoutProps::new(
            self.content_width,
            self.content_height,
            self.horizon,
            self.peak,
            self.margin,
        )
    }

    pub fn limits(&self) -> Result<SampleLimits> {
        SampleLimits::new(self.min_chord, self.max_chord)
    }

    /// Track geometry built from this config.
    pub fn geometry(&self) -> Result<TrackGeometry> {
        Ok(TrackGeometry::with_limits(
            self.path.clone(),
            self.layout()?,
            self.limits()?,
        ))
    }
}

/// Everything needed to run a diagram.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SkyDiagramConfig {
    pub time: TimeConfig,
    pub sky: SkyLevelConfig,
    pub palette: SkyPalette,
    pub track: TrackConfig,
    /// Radius of the moon disc used for the phase mask.
    pub moon_radius: f64,
}

impl Default for SkyDiagramConfig {
    fn default() -> Self {
        Self {
            time: TimeConfig::default(),
            sky: SkyLevelConfig::default(),
            palette: SkyPalette::default(),
            track: TrackConfig::default(),
            moon_radius: 40.0,
        }
    }
}

impl SkyDiagramConfig {
    /// Parse and validate a JSON document. Missing keys take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Write the config as pretty JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Check every section by constructing the component it configures.
    pub fn validate(&self) -> Result<()> {
        ClockConstants::new(&self.time)?;
        SkyLevel::new(&self.sky)?;
        self.track.layout()?;
        self.track.limits()?;
        PhaseMask::new(self.moon_radius)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Error;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_validate() {
        let config = SkyDiagramConfig::default();
        config.validate().unwrap();
        assert_eq!(config.track.path.points(), &[PathPoint::new(0.358, 1.0)]);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "time": { "atuPerHour": 60, "secondsPerCalendarPeriod": 30 },
            "sky": { "darkestShadingLevel": 0.25 },
            "track": { "path": [{ "x": 0.2, "y": 0.9 }, { "x": 0.4, "y": 1.0 }, { "x": 0.5, "y": 1.0 }] }
        }"#;
        let config = SkyDiagramConfig::from_json(json).unwrap();
        assert_eq!(config.time.atu_per_hour, 60);
        assert_eq!(config.time.seconds_per_calendar_period, 30.0);
        assert_eq!(config.time.calendar_period_in_days, 30);
        assert_eq!(config.sky.darkest_shading_level, 0.25);
        assert_eq!(config.sky.sky_level_transition_power, 2.0);
        assert_eq!(config.track.path.curve_count(), 2);
        assert_eq!(config.track.content_width, 836.0);
        assert_eq!(config.moon_radius, 40.0);
    }

    #[test]
    fn test_even_path_rejected() {
        let json = r#"{ "track": { "path": [{ "x": 0.2, "y": 0.9 }, { "x": 0.5, "y": 1.0 }] } }"#;
        assert!(matches!(SkyDiagramConfig::from_json(json), Err(Error::Json(_))));
    }

    #[test]
    fn test_invalid_sections_rejected() {
        let overflow = r#"{ "time": { "atuPerHour": 3600000 } }"#;
        assert!(matches!(
            SkyDiagramConfig::from_json(overflow),
            Err(Error::ConfigurationOverflow { .. })
        ));
        let threshold = r#"{ "sky": { "skyTransitionBelowThreshold": 0.4 } }"#;
        assert!(SkyDiagramConfig::from_json(threshold).is_err());
        let width = r#"{ "track": { "contentWidth": 0 } }"#;
        assert!(SkyDiagramConfig::from_json(width).is_err());
        let radius = r#"{ "moonRadius": -1 }"#;
        assert!(SkyDiagramConfig::from_json(radius).is_err());
    }

    #[test]
    fn test_chord_limits() {
        let config = SkyDiagramConfig::default();
        assert_eq!(config.track.limits().unwrap(), SampleLimits::default());
        let geometry = config.track.geometry().unwrap();
        assert_eq!(geometry.limits(), SampleLimits::default());
        assert_eq!(geometry.layout(), &config.track.layout().unwrap());

        let finer = r#"{ "track": { "minChord": 1, "maxChord": 3 } }"#;
        let config = SkyDiagramConfig::from_json(finer).unwrap();
        assert_eq!(config.track.limits().unwrap().max_s(), 3.0);

        for bad in [
            r#"{ "track": { "maxChord": 0 } }"#,
            r#"{ "track": { "minChord": 0 } }"#,
            r#"{ "track": { "minChord": 6, "maxChord": 12 } }"#,
        ] {
            assert!(
                matches!(SkyDiagramConfig::from_json(bad), Err(Error::InvalidArgument(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("diagram.json");
        let mut config = SkyDiagramConfig::default();
        config.time.synodic_period_in_days = 29.5;
        config.track.horizon = 0.2;
        config.save(&path).unwrap();

        let loaded = SkyDiagramConfig::load(&path).unwrap();
        assert_eq!(loaded.time, config.time);
        assert_eq!(loaded.track, config.track);
        assert_eq!(loaded.sky, config.sky);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = SkyDiagramConfig::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}

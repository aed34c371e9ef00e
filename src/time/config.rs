//! Timekeeper configuration and the derived clock constants.

use serde::{Deserialize, Serialize};

use crate::core::error::require_finite;
use crate::core::{Error, Result};

/// Largest integer an `f64` represents exactly. Clock values pass through
/// floating point during easing and playback, so the cycle must stay within
/// half of this.
pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// Jumps of at least this many hours use the long transition duration.
pub const LONG_TRANSITION_HOURS: u64 = 12;

/// User-facing time configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimeConfig {
    /// Atomic time units per simulated hour.
    pub atu_per_hour: u32,
    /// Days in one displayed calendar cycle.
    pub calendar_period_in_days: u32,
    /// Lunar cycle length in days; rounded to whole ATUs.
    pub synodic_period_in_days: f64,
    /// Time of the first new moon, in hours after day 1 midnight.
    pub synodic_offset_hours: f64,
    /// Real seconds to play through one calendar period.
    pub seconds_per_calendar_period: f64,
    /// Duration of short jumps (less than half a day).
    pub min_transition_duration_ms: f64,
    /// Duration of long jumps.
    pub max_transition_duration_ms: f64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            atu_per_hour: 3600,
            calendar_period_in_days: 30,
            synodic_period_in_days: 30.0,
            synodic_offset_hours: 12.0,
            seconds_per_calendar_period: 60.0,
            min_transition_duration_ms: 400.0,
            max_transition_duration_ms: 1200.0,
        }
    }
}

/// Integer clock constants derived from a validated [`TimeConfig`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClockConstants {
    pub atu_per_hour: u64,
    pub atu_per_day: u64,
    pub calendar_period_in_days: u64,
    /// Calendar period in ATUs.
    pub calendar_period: u64,
    /// Synodic period in ATUs.
    pub synodic_period: u64,
    /// New moon offset in ATUs (may be negative).
    pub synodic_offset: i64,
    /// `synodic_period * calendar_period`; both periods divide it evenly.
    pub time_cycle: u64,
    /// Playback rate in ATU per millisecond.
    pub playback_rate: f64,
    pub min_transition_ms: f64,
    pub max_transition_ms: f64,
    /// Jumps of at least this many ATUs use `max_transition_ms`.
    pub long_transition_threshold: u64,
}

impl ClockConstants {
    pub fn new(config: &TimeConfig) -> Result<Self> {
        if config.atu_per_hour == 0 {
            return Err(Error::config("atuPerHour", "must be at least 1"));
        }
        if config.calendar_period_in_days == 0 {
            return Err(Error::config("calendarPeriodInDays", "must be at least 1"));
        }
        let atu_per_hour = u64::from(config.atu_per_hour);
        let atu_per_day = 24 * atu_per_hour;
        let calendar_period_in_days = u64::from(config.calendar_period_in_days);
        let calendar_period = calendar_period_in_days * atu_per_day;

        let synodic_days = require_finite("synodicPeriodInDays", config.synodic_period_in_days)?;
        let synodic_atu = (synodic_days * atu_per_day as f64).round();
        if synodic_atu < 1.0 {
            return Err(Error::config(
                "synodicPeriodInDays",
                format!("must round to at least one ATU, got {synodic_days}"),
            ));
        }
        if synodic_atu > MAX_SAFE_INTEGER as f64 {
            return Err(Error::ConfigurationOverflow {
                cycle: synodic_atu as u128 * u128::from(calendar_period),
            });
        }
        let synodic_period = synodic_atu as u64;

        let cycle = u128::from(synodic_period) * u128::from(calendar_period);
        if 2 * cycle > u128::from(MAX_SAFE_INTEGER) {
            return Err(Error::ConfigurationOverflow { cycle });
        }
        let time_cycle = cycle as u64;

        let offset_hours = require_finite("synodicOffsetHours", config.synodic_offset_hours)?;
        let synodic_offset = (offset_hours * atu_per_hour as f64).round() as i64;

        let seconds = require_finite("secondsPerCalendarPeriod", config.seconds_per_calendar_period)?;
        if seconds <= 0.0 {
            return Err(Error::config(
                "secondsPerCalendarPeriod",
                format!("must be positive, got {seconds}"),
            ));
        }
        let playback_rate = calendar_period as f64 / (1000.0 * seconds);

        let min_ms = duration("minTransitionDurationMs", config.min_transition_duration_ms)?;
        let max_ms = duration("maxTransitionDurationMs", config.max_transition_duration_ms)?;
        if min_ms > max_ms {
            return Err(Error::config(
                "minTransitionDurationMs",
                format!("must not exceed maxTransitionDurationMs ({min_ms} > {max_ms})"),
            ));
        }

        Ok(Self {
            atu_per_hour,
            atu_per_day,
            calendar_period_in_days,
            calendar_period,
            synodic_period,
            synodic_offset,
            time_cycle,
            playback_rate,
            min_transition_ms: min_ms,
            max_transition_ms: max_ms,
            long_transition_threshold: LONG_TRANSITION_HOURS * atu_per_hour,
        })
    }

    /// Transition duration for a jump of `delta` ATUs.
    pub fn transition_duration_ms(&self, delta: i64) -> f64 {
        if delta.unsigned_abs() >= self.long_transition_threshold {
            self.max_transition_ms
        } else {
            self.min_transition_ms
        }
    }

    /// Real milliseconds for playback to traverse the whole time cycle.
    #[inline]
    pub fn cycle_ms(&self) -> f64 {
        self.time_cycle as f64 / self.playback_rate
    }
}

fn duration(field: &'static str, value: f64) -> Result<f64> {
    let value = require_finite(field, value)?;
    if value < 0.0 {
        return Err(Error::config(field, format!("must not be negative, got {value}")));
    }
    Ok(value)
}

//! Integer simulation clock.
//!
//! Time is a whole number of atomic time units (ATUs) in `[0, TIME_CYCLE)`.
//! Everything the display needs (calendar day, time of day, moon phase) is
//! derived from that single value, so the clock can be set from any one of
//! them and stay consistent.

use serde::Serialize;

use crate::core::{Error, Result};
use crate::time::config::ClockConstants;

/// Named lunar phase bands used for readouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum PhaseName {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    ThirdQuarter,
    WaningCrescent,
}

impl PhaseName {
    /// Half width of the new moon and quarter bands.
    pub const NARROW_BAND: f64 = 0.02;
    /// Half width of the full moon band.
    pub const FULL_BAND: f64 = 0.05;

    /// Band containing `moon_phase` (0 = new, 0.5 = full). Each band is
    /// half-open, including its lower edge.
    pub fn from_phase(moon_phase: f64) -> Self {
        let p = (moon_phase % 1.0 + 1.0) % 1.0;
        let quarter = Self::NARROW_BAND;
        let full = Self::FULL_BAND;

        if p < Self::NARROW_BAND {
            Self::NewMoon
        } else if p < 0.25 - quarter {
            Self::WaxingCrescent
        } else if p < 0.25 + quarter {
            Self::FirstQuarter
        } else if p < 0.5 - full {
            Self::WaxingGibbous
        } else if p < 0.5 + full {
            Self::FullMoon
        } else if p < 0.75 - quarter {
            Self::WaningGibbous
        } else if p < 0.75 + quarter {
            Self::ThirdQuarter
        } else if p < 1.0 - Self::NARROW_BAND {
            Self::WaningCrescent
        } else {
            Self::NewMoon
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::NewMoon => "New Moon",
            Self::WaxingCrescent => "Waxing Crescent",
            Self::FirstQuarter => "First Quarter",
            Self::WaxingGibbous => "Waxing Gibbous",
            Self::FullMoon => "Full Moon",
            Self::WaningGibbous => "Waning Gibbous",
            Self::ThirdQuarter => "Third Quarter",
            Self::WaningCrescent => "Waning Crescent",
        }
    }
}

impl std::fmt::Display for PhaseName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Values derived from the current clock time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeReadout {
    /// Clock time in ATUs.
    pub time: u64,
    /// 1-based day within the calendar period.
    pub calendar_day: u32,
    /// Fraction of the current day elapsed, `[0, 1)`. 0 is midnight.
    pub fractional_time_of_day: f64,
    /// Fraction of the synodic period since the last new moon, `[0, 1)`.
    pub moon_phase: f64,
}

impl TimeReadout {
    #[inline]
    pub fn phase_name(&self) -> PhaseName {
        PhaseName::from_phase(self.moon_phase)
    }
}

/// The clock value and its derived readout.
#[derive(Clone, Debug)]
pub struct SimClock {
    constants: ClockConstants,
    readout: TimeReadout,
}

impl SimClock {
    /// Clock at time 0 (day 1, midnight).
    pub fn new(constants: ClockConstants) -> Self {
        Self {
            readout: derive(&constants, 0),
            constants,
        }
    }

    #[inline]
    pub fn constants(&self) -> &ClockConstants {
        &self.constants
    }

    #[inline]
    pub fn time(&self) -> u64 {
        self.readout.time
    }

    #[inline]
    pub fn readout(&self) -> &TimeReadout {
        &self.readout
    }

    /// Set the clock, rounding to the nearest ATU and wrapping into the
    /// time cycle. Returns whether the stored time changed.
    pub fn set_time(&mut self, time: f64) -> Result<bool> {
        let time = self.normalize(time)?;
        if time == self.readout.time {
            return Ok(false);
        }
        self.readout = derive(&self.constants, time);
        Ok(true)
    }

    /// Round and wrap `time` into `[0, TIME_CYCLE)`.
    pub fn normalize(&self, time: f64) -> Result<u64> {
        if !time.is_finite() {
            return Err(Error::InvalidArgument(format!(
                "clock time must be finite, got {time}"
            )));
        }
        let cycle = self.constants.time_cycle;
        let wrapped = time.round().rem_euclid(cycle as f64) as u64;
        Ok(if wrapped >= cycle { 0 } else { wrapped })
    }

    /// Clock time for a calendar day (1-based) and time of day, taken from
    /// the first calendar period of the cycle.
    pub fn time_for_parts(&self, calendar_day: u32, fractional_time_of_day: f64) -> Result<f64> {
        let days = self.constants.calendar_period_in_days;
        if calendar_day == 0 || u64::from(calendar_day) > days {
            return Err(Error::InvalidArgument(format!(
                "calendar day must be in 1..={days}, got {calendar_day}"
            )));
        }
        if !fractional_time_of_day.is_finite() {
            return Err(Error::InvalidArgument(format!(
                "time of day must be finite, got {fractional_time_of_day}"
            )));
        }
        let tod = (fractional_time_of_day % 1.0 + 1.0) % 1.0;
        let day_atu = self.constants.atu_per_day as f64;
        Ok(f64::from(calendar_day - 1) * day_atu + (tod * day_atu).round())
    }
}

fn derive(c: &ClockConstants, time: u64) -> TimeReadout {
    let since_new = (i128::from(time) - i128::from(c.synodic_offset))
        .rem_euclid(i128::from(c.synodic_period));
    let day_index = time / c.atu_per_day;
    TimeReadout {
        time,
        calendar_day: (day_index % c.calendar_period_in_days) as u32 + 1,
        fractional_time_of_day: (time % c.atu_per_day) as f64 / c.atu_per_day as f64,
        moon_phase: since_new as f64 / c.synodic_period as f64,
    }
}

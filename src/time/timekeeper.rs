//! Animation state machine over the simulation clock.
//!
//! The timekeeper is either idle, easing toward a target time after a
//! discrete jump, or playing continuously. Ticks arrive from a
//! [`Scheduler`]; elapsed time is measured from the first tick after each
//! state entry.

use std::fmt;

use crate::core::{Error, Result};
use crate::time::clock::{SimClock, TimeReadout};
use crate::time::config::{ClockConstants, TimeConfig};
use crate::time::scheduler::{ManualScheduler, Scheduler, TickHandle};

/// Public animation state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationState {
    Idle,
    Transitioning,
    Playing,
}

impl AnimationState {
    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Transitioning => "transitioning",
            Self::Playing => "playing",
        }
    }
}

impl fmt::Display for AnimationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sticky change flags. Set by the timekeeper, cleared only by the consumer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChangeFlags {
    pub time_changed: bool,
    pub animation_state_changed: bool,
}

impl ChangeFlags {
    #[inline]
    pub fn any(&self) -> bool {
        self.time_changed || self.animation_state_changed
    }
}

/// Called with the current readout and flags after every tick and mutator.
pub type ChangeCallback = Box<dyn FnMut(&TimeReadout, ChangeFlags)>;

/// Cubic smoothstep on `[0, 1]`.
#[inline]
pub fn ease(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[derive(Clone, Copy, Debug)]
enum Animation {
    Idle,
    Transition {
        start_time: u64,
        delta: i64,
        duration_ms: f64,
        start_ms: Option<f64>,
    },
    Playing {
        start_time: u64,
        start_ms: Option<f64>,
    },
}

impl Animation {
    fn state(&self) -> AnimationState {
        match self {
            Self::Idle => AnimationState::Idle,
            Self::Transition { .. } => AnimationState::Transitioning,
            Self::Playing { .. } => AnimationState::Playing,
        }
    }
}

/// Owns the simulation clock and its animation.
pub struct Timekeeper<S: Scheduler = ManualScheduler> {
    clock: SimClock,
    animation: Animation,
    scheduler: S,
    pending: Option<TickHandle>,
    flags: ChangeFlags,
    on_change: Option<ChangeCallback>,
}

impl<S: Scheduler> Timekeeper<S> {
    /// Create an idle timekeeper at time 0.
    ///
    /// Fails with `ConfigurationOverflow` when the configured time cycle
    /// cannot be represented exactly.
    pub fn new(config: &TimeConfig, scheduler: S) -> Result<Self> {
        let constants = ClockConstants::new(config)?;
        log::debug!(
            "Timekeeper: cycle {} ATU, calendar {} ATU, synodic {} ATU",
            constants.time_cycle,
            constants.calendar_period,
            constants.synodic_period
        );
        Ok(Self {
            clock: SimClock::new(constants),
            animation: Animation::Idle,
            scheduler,
            pending: None,
            flags: ChangeFlags::default(),
            on_change: None,
        })
    }

    // -- Accessors --------------------------------------------------------

    #[inline]
    pub fn constants(&self) -> &ClockConstants {
        self.clock.constants()
    }

    #[inline]
    pub fn time(&self) -> u64 {
        self.clock.time()
    }

    #[inline]
    pub fn readout(&self) -> &TimeReadout {
        self.clock.readout()
    }

    #[inline]
    pub fn animation_state(&self) -> AnimationState {
        self.animation.state()
    }

    #[inline]
    pub fn flags(&self) -> ChangeFlags {
        self.flags
    }

    #[inline]
    pub fn has_time_changed(&self) -> bool {
        self.flags.time_changed
    }

    #[inline]
    pub fn has_animation_state_changed(&self) -> bool {
        self.flags.animation_state_changed
    }

    pub fn clear_flags(&mut self) {
        self.flags = ChangeFlags::default();
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn set_change_callback(&mut self, callback: impl FnMut(&TimeReadout, ChangeFlags) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    pub fn clear_change_callback(&mut self) {
        self.on_change = None;
    }

    // -- Mutators ---------------------------------------------------------

    /// Set the clock directly. Only allowed while idle.
    pub fn set_time(&mut self, time: f64) -> Result<()> {
        self.require(AnimationState::Idle, "set time")?;
        self.apply_time(time)?;
        self.notify();
        Ok(())
    }

    /// Set the clock from a calendar day and time of day. Only allowed while
    /// idle.
    pub fn set_time_parts(&mut self, calendar_day: u32, fractional_time_of_day: f64) -> Result<()> {
        self.require(AnimationState::Idle, "set time")?;
        let time = self.clock.time_for_parts(calendar_day, fractional_time_of_day)?;
        self.apply_time(time)?;
        self.notify();
        Ok(())
    }

    /// Start an eased jump of `delta` ATUs.
    pub fn set_time_by_delta(&mut self, delta: i64) -> Result<()> {
        self.require(AnimationState::Idle, "set time by delta")?;
        let duration_ms = self.constants().transition_duration_ms(delta);
        log::info!("Timekeeper: transition by {delta} ATU over {duration_ms} ms");
        self.enter(Animation::Transition {
            start_time: self.clock.time(),
            delta,
            duration_ms,
            start_ms: None,
        });
        self.notify();
        Ok(())
    }

    /// Start continuous looped playback.
    pub fn play(&mut self) -> Result<()> {
        self.require(AnimationState::Idle, "play")?;
        log::info!(
            "Timekeeper: playing at {:.3} ATU/ms",
            self.constants().playback_rate
        );
        self.enter(Animation::Playing {
            start_time: self.clock.time(),
            start_ms: None,
        });
        self.notify();
        Ok(())
    }

    /// Stop playback, keeping the current time.
    pub fn pause(&mut self) -> Result<()> {
        self.require(AnimationState::Playing, "pause")?;
        log::info!("Timekeeper: paused at {}", self.clock.time());
        self.enter(Animation::Idle);
        self.notify();
        Ok(())
    }

    // -- Control surface --------------------------------------------------

    pub fn increment_hour(&mut self) -> Result<()> {
        self.set_time_by_delta(self.hour_atu())
    }

    pub fn decrement_hour(&mut self) -> Result<()> {
        self.set_time_by_delta(-self.hour_atu())
    }

    pub fn increment_day(&mut self) -> Result<()> {
        self.set_time_by_delta(self.day_atu())
    }

    pub fn decrement_day(&mut self) -> Result<()> {
        self.set_time_by_delta(-self.day_atu())
    }

    /// Jump to noon of day 1.
    pub fn go_to_day_1(&mut self) -> Result<()> {
        self.set_time_parts(1, 0.5)
    }

    // -- Ticking ----------------------------------------------------------

    /// Deliver a scheduled tick with the host's monotonic frame time.
    ///
    /// Ticks other than the one currently pending (for example one that was
    /// already in flight when `pause` ran) are ignored. A non-finite `now_ms`
    /// is rejected without changing state and a fresh tick is scheduled.
    pub fn tick(&mut self, handle: TickHandle, now_ms: f64) -> Result<()> {
        if self.pending != Some(handle) {
            log::trace!("Timekeeper: ignoring stale tick {}", handle.id());
            return Ok(());
        }
        if !now_ms.is_finite() {
            // The delivered tick is spent; re-arm so the next good frame resumes.
            self.pending = Some(self.scheduler.schedule_tick());
            return Err(Error::InvalidArgument(format!(
                "tick time must be finite, got {now_ms}"
            )));
        }
        self.pending = None;

        match &mut self.animation {
            Animation::Idle => return Ok(()),
            Animation::Transition {
                start_time,
                delta,
                duration_ms,
                start_ms,
            } => {
                let (start_time, delta, duration_ms) = (*start_time, *delta, *duration_ms);
                let started = *start_ms.get_or_insert(now_ms);
                let elapsed = (now_ms - started).max(0.0);
                if elapsed >= duration_ms {
                    let cycle = i128::from(self.constants().time_cycle);
                    let target = (i128::from(start_time) + i128::from(delta)).rem_euclid(cycle);
                    self.apply_time(target as f64)?;
                    log::info!("Timekeeper: transition complete at {target}");
                    self.enter(Animation::Idle);
                } else {
                    let t = ease(elapsed / duration_ms);
                    self.apply_time(start_time as f64 + t * delta as f64)?;
                }
            }
            Animation::Playing {
                start_time,
                start_ms,
            } => {
                let start_time = *start_time;
                let started = *start_ms.get_or_insert(now_ms);
                let elapsed = (now_ms - started).max(0.0);
                let c = self.constants();
                let looped = elapsed % c.cycle_ms();
                let time = start_time as f64 + looped * c.playback_rate;
                self.apply_time(time)?;
            }
        }
        log::trace!("Timekeeper: tick at {now_ms} ms, time {}", self.clock.time());

        if self.animation.state() != AnimationState::Idle {
            self.pending = Some(self.scheduler.schedule_tick());
        }
        self.notify();
        Ok(())
    }

    // -- Internals --------------------------------------------------------

    fn require(&self, expected: AnimationState, action: &'static str) -> Result<()> {
        let state = self.animation.state();
        if state == expected {
            return Ok(());
        }
        log::warn!("Timekeeper: rejected {action} while {state}");
        Err(Error::InvalidTransition {
            state: state.name(),
            action,
        })
    }

    fn enter(&mut self, animation: Animation) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
        let previous = self.animation.state();
        self.animation = animation;
        if previous != self.animation.state() {
            self.flags.animation_state_changed = true;
        }
        if self.animation.state() != AnimationState::Idle {
            self.pending = Some(self.scheduler.schedule_tick());
        }
    }

    fn apply_time(&mut self, time: f64) -> Result<()> {
        if self.clock.set_time(time)? {
            self.flags.time_changed = true;
        }
        Ok(())
    }

    fn notify(&mut self) {
        if let Some(mut callback) = self.on_change.take() {
            callback(self.clock.readout(), self.flags);
            // The callback may have installed a replacement.
            if self.on_change.is_none() {
                self.on_change = Some(callback);
            }
        }
    }

    fn hour_atu(&self) -> i64 {
        self.constants().atu_per_hour as i64
    }

    fn day_atu(&self) -> i64 {
        self.constants().atu_per_day as i64
    }
}

impl Timekeeper<ManualScheduler> {
    /// Deliver the oldest pending tick, if any. Returns whether a tick ran.
    pub fn advance(&mut self, now_ms: f64) -> Result<bool> {
        match self.scheduler.pop() {
            Some(handle) => {
                self.tick(handle, now_ms)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl<S: Scheduler> fmt::Debug for Timekeeper<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timekeeper")
            .field("time", &self.clock.time())
            .field("state", &self.animation.state())
            .field("flags", &self.flags)
            .finish()
    }
}

//! Frame-counted countdown primitive shared by spawners and tower cooldowns.

/// Countdown measured in whole simulation ticks.
///
/// A timer reports completion exactly once per activation, on the tick where
/// the remaining count reaches zero. Ticking an inactive timer is a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timer {
    duration: u32,
    remaining: u32,
    active: bool,
}

impl Timer {
    /// Creates an inactive timer with the provided duration.
    #[must_use]
    pub const fn new(duration: u32) -> Self {
        Self {
            duration,
            remaining: 0,
            active: false,
        }
    }

    /// Creates a timer that is already counting down from its full duration.
    #[must_use]
    pub const fn started(duration: u32) -> Self {
        Self {
            duration,
            remaining: duration,
            active: true,
        }
    }

    /// Restarts the countdown from the full duration.
    pub fn activate(&mut self) {
        self.remaining = self.duration;
        self.active = true;
    }

    /// Stops the countdown and clears the remaining ticks.
    pub fn deactivate(&mut self) {
        self.remaining = 0;
        self.active = false;
    }

    /// Advances the countdown by one tick.
    ///
    /// Returns `true` only on the tick that completes the countdown.
    pub fn tick(&mut self) -> bool {
        if !self.active {
            return false;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.active = false;
            return true;
        }
        false
    }

    /// Reports whether the timer is still counting down.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Fraction of the countdown still outstanding, from 1.0 (just started) to 0.0.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.duration == 0 {
            return 0.0;
        }
        self.remaining as f32 / self.duration as f32
    }

    /// Full length of one countdown in ticks.
    #[must_use]
    pub const fn duration(&self) -> u32 {
        self.duration
    }

    /// Replaces the countdown length used by the next activation.
    ///
    /// A countdown already in progress keeps its remaining ticks.
    pub fn set_duration(&mut self, duration: u32) {
        self.duration = duration;
    }

    /// Ticks left before the countdown completes.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }
}

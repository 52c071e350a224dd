//! Kill-streak tracking and score multiplier
//!
//! The streak window is tuned in frames but compared against caller-supplied
//! wall-clock milliseconds.

use serde::{Deserialize, Serialize};

use crate::config::ComboConfig;
use crate::frames_to_ms;

/// Kills per multiplier step
const KILLS_PER_STEP: u32 = 5;
/// Multiplier gained per step, in fifths (0.2)
const STEP_FIFTHS: u64 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComboTracker {
    pub count: u32,
    /// Wall-clock ms of the latest kill
    pub last_kill_ms: f64,
    pub multiplier: f64,
    /// Frames left to show the combo banner
    pub display_timer: u32,
    config: ComboConfig,
}

impl ComboTracker {
    pub fn new(config: ComboConfig) -> Self {
        Self {
            count: 0,
            last_kill_ms: 0.0,
            multiplier: 1.0,
            display_timer: 0,
            config,
        }
    }

    /// Multiplier steps earned by the current streak, before the cap
    fn steps(&self) -> u32 {
        self.count.saturating_sub(1) / KILLS_PER_STEP
    }

    /// True once the uncapped multiplier reaches the configured maximum
    fn capped(&self) -> bool {
        (5 + self.steps() as u64 * STEP_FIFTHS) as f64 >= self.config.max_multiplier * 5.0 - 1e-9
    }

    pub fn register_kill(&mut self, now_ms: f64) {
        self.count += 1;
        self.last_kill_ms = now_ms;
        self.display_timer = self.config.display_duration;
        self.multiplier = if self.capped() {
            self.config.max_multiplier
        } else {
            1.0 + self.steps() as f64 * 0.2
        };
        if self.count % KILLS_PER_STEP == 1 && self.count > 1 {
            log::debug!("Combo x{} ({} kills)", self.multiplier, self.count);
        }
    }

    pub fn reset(&mut self) {
        self.count = 0;
        self.multiplier = 1.0;
        self.display_timer = 0;
    }

    /// Player took damage
    pub fn on_damage(&mut self) {
        if self.config.break_on_damage && self.count > 0 {
            log::debug!("Combo broken by damage at {} kills", self.count);
            self.reset();
        }
    }

    /// Per-frame decay: banner countdown and streak expiry
    pub fn update(&mut self, now_ms: f64) {
        self.display_timer = self.display_timer.saturating_sub(1);
        if self.count > 0 && now_ms - self.last_kill_ms > self.window_ms() {
            self.reset();
        }
    }

    pub fn window_ms(&self) -> f64 {
        frames_to_ms(self.config.time_window)
    }

    /// floor(base * multiplier). Below the cap this is exact in fifths; at
    /// the cap the nudge absorbs binary rounding of the configured maximum.
    pub fn score_for(&self, base: u64) -> u64 {
        if self.capped() {
            (base as f64 * self.config.max_multiplier + 1e-6).floor() as u64
        } else {
            base * (5 + self.steps() as u64 * STEP_FIFTHS) / 5
        }
    }

    /// Register a kill, then price it at the updated multiplier
    pub fn kill_and_score(&mut self, base: u64, now_ms: f64) -> u64 {
        self.register_kill(now_ms);
        self.score_for(base)
    }

    pub fn is_displayed(&self) -> bool {
        self.display_timer > 0 && self.count > 1
    }
}

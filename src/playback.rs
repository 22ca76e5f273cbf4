/*
 * Playback Module
 *
 * Pause/resume and speed presets for the simulation. Elapsed frame time is
 * fed into a fixed-timestep accumulator that reports how many flock steps
 * are due at the selected preset, independent of the display refresh rate.
 */

use std::fmt;
use std::time::Duration;

use tracing::{info, warn};

/// Upper bound on steps run in a single frame; any further backlog is dropped.
pub const MAX_CATCH_UP_STEPS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Running,
    Paused,
}

/// Discrete simulation rates offered by the control panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpeedPreset {
    Slow,
    Fast,
    VeryFast,
    ExtremelyFast,
}

impl SpeedPreset {
    pub const ALL: [SpeedPreset; 4] = [
        SpeedPreset::Slow,
        SpeedPreset::Fast,
        SpeedPreset::VeryFast,
        SpeedPreset::ExtremelyFast,
    ];

    pub fn steps_per_second(self) -> u32 {
        match self {
            SpeedPreset::Slow => 1,
            SpeedPreset::Fast => 5,
            SpeedPreset::VeryFast => 30,
            SpeedPreset::ExtremelyFast => 120,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SpeedPreset::Slow => "Slow",
            SpeedPreset::Fast => "Fast",
            SpeedPreset::VeryFast => "V. Fast",
            SpeedPreset::ExtremelyFast => "E. Fast",
        }
    }

    pub fn step_interval(self) -> Duration {
        Duration::from_secs(1) / self.steps_per_second()
    }
}

impl Default for SpeedPreset {
    fn default() -> Self {
        SpeedPreset::ExtremelyFast
    }
}

impl fmt::Display for SpeedPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}/s)", self.label(), self.steps_per_second())
    }
}

#[derive(Debug, Clone)]
pub struct Playback {
    state: PlaybackState,
    speed: SpeedPreset,
    accumulator: Duration,
}

impl Default for Playback {
    fn default() -> Self {
        Self::new(SpeedPreset::default())
    }
}

impl Playback {
    pub fn new(speed: SpeedPreset) -> Self {
        Self {
            state: PlaybackState::Running,
            speed,
            accumulator: Duration::ZERO,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state == PlaybackState::Paused
    }

    pub fn speed(&self) -> SpeedPreset {
        self.speed
    }

    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            PlaybackState::Running => PlaybackState::Paused,
            PlaybackState::Paused => PlaybackState::Running,
        };
        self.accumulator = Duration::ZERO;
        info!(state = ?self.state, "toggled playback");
    }

    /// Switch speed preset. Always resumes a paused simulation.
    pub fn set_speed(&mut self, speed: SpeedPreset) {
        self.speed = speed;
        self.state = PlaybackState::Running;
        self.accumulator = Duration::ZERO;
        info!(%speed, "changed simulation speed");
    }

    /// Record a flock reset. Always resumes a paused simulation.
    pub fn note_reset(&mut self) {
        self.state = PlaybackState::Running;
        self.accumulator = Duration::ZERO;
    }

    /// Add `elapsed` frame time and return how many steps are due now.
    pub fn steps_due(&mut self, elapsed: Duration) -> usize {
        if self.is_paused() {
            return 0;
        }

        let interval = self.speed.step_interval();
        self.accumulator += elapsed;

        let mut steps = 0;
        while self.accumulator >= interval {
            self.accumulator -= interval;
            steps += 1;
        }

        if steps > MAX_CATCH_UP_STEPS {
            warn!(
                due = steps,
                kept = MAX_CATCH_UP_STEPS,
                "simulation fell behind; dropping steps"
            );
            steps = MAX_CATCH_UP_STEPS;
        }

        steps
    }
}

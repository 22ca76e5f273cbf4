/*
 * Debug Information Module
 *
 * Frame statistics shown in the control panel, and the overlay settings
 * that decide which boids get their steering vectors drawn. The overlay
 * choice is a pure function of the boid index so it is reproducible.
 */

use std::time::Duration;

// Debug information to display
#[derive(Debug, Clone, Default)]
pub struct DebugInfo {
    pub fps: f32,
    pub frame_time: Duration,
    pub steps_per_frame: usize,
    pub total_steps: u64,
}

/// Which debug overlays to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugOverlay {
    pub show_forces: bool,
    /// Draw force vectors for every Nth boid; 1 means all of them.
    pub sample_every: usize,
    pub show_radii: bool,
    pub show_stats: bool,
}

impl Default for DebugOverlay {
    fn default() -> Self {
        Self {
            show_forces: false,
            sample_every: 5,
            show_radii: false,
            show_stats: true,
        }
    }
}

impl DebugOverlay {
    pub fn shows_forces_for(&self, index: usize) -> bool {
        self.show_forces && index % self.sample_every.max(1) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_force_overlay_disabled_by_default() {
        let overlay = DebugOverlay::default();
        assert!(!(0..20).any(|i| overlay.shows_forces_for(i)));
    }

    #[test]
    fn test_force_overlay_samples_every_nth_boid() {
        let overlay = DebugOverlay {
            show_forces: true,
            sample_every: 3,
            ..DebugOverlay::default()
        };
        let drawn: Vec<usize> = (0..10).filter(|&i| overlay.shows_forces_for(i)).collect();
        assert_eq!(drawn, vec![0, 3, 6, 9]);
    }

    #[test]
    fn test_zero_sampling_interval_draws_all() {
        let overlay = DebugOverlay {
            show_forces: true,
            sample_every: 0,
            ..DebugOverlay::default()
        };
        assert!((0..10).all(|i| overlay.shows_forces_for(i)));
    }
}

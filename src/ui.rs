/*
 * UI Module
 *
 * This module builds the control panel with nannou_egui: sliders for the
 * flocking parameters, playback buttons, and debug toggles. Parameter edits
 * are written straight into SimulationParameters through its typed setter;
 * playback and reset requests are returned to the app as UiActions.
 */

use std::ops::RangeInclusive;

use nannou_egui::{egui, Egui};
use tracing::{debug, warn};

use crate::debug::{DebugInfo, DebugOverlay};
use crate::error::FlockError;
use crate::params::{ParamField, SimulationParameters};
use crate::playback::{Playback, SpeedPreset};

pub const BOID_COUNT_RANGE: RangeInclusive<usize> = 0..=500;
pub const SAMPLE_EVERY_RANGE: RangeInclusive<usize> = 1..=20;

/// Requests from the control panel, applied by the app after the UI pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiActions {
    pub toggle_pause: bool,
    pub speed: Option<SpeedPreset>,
    pub reset: bool,
}

/// Everything the panel reads or edits in one frame.
pub struct PanelState<'a> {
    pub params: &'a mut SimulationParameters,
    pub boid_count: &'a mut usize,
    pub overlay: &'a mut DebugOverlay,
    pub playback: &'a Playback,
    pub debug_info: &'a DebugInfo,
    pub live_boids: usize,
    pub halted: Option<&'a FlockError>,
}

/// Write one slider edit into the parameters. Returns whether it was applied.
pub fn apply_edit(params: &mut SimulationParameters, field: ParamField, value: f32) -> bool {
    match params.set(field, value) {
        Ok(()) => {
            debug!(%field, value, "updated parameter");
            true
        }
        Err(err) => {
            warn!(%err, "rejected parameter edit");
            false
        }
    }
}

pub fn update_ui(egui: &mut Egui, state: PanelState<'_>) -> UiActions {
    let mut actions = UiActions::default();
    let PanelState {
        params,
        boid_count,
        overlay,
        playback,
        debug_info,
        live_boids,
        halted,
    } = state;

    let ctx = egui.begin_frame();

    egui::Window::new("Simulation Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            if let Some(err) = halted {
                ui.colored_label(egui::Color32::RED, format!("Simulation halted: {err}"));
                ui.separator();
            }

            ui.horizontal(|ui| {
                let label = if playback.is_paused() { "Resume" } else { "Pause" };
                if ui.button(label).clicked() {
                    actions.toggle_pause = true;
                }
                if ui.button("Reset").clicked() {
                    actions.reset = true;
                }
            });

            ui.horizontal(|ui| {
                for preset in SpeedPreset::ALL {
                    let selected = playback.speed() == preset && !playback.is_paused();
                    if ui.selectable_label(selected, preset.label()).clicked() {
                        actions.speed = Some(preset);
                    }
                }
            });

            ui.collapsing("Boid Parameters", |ui| {
                ui.add(egui::Slider::new(boid_count, BOID_COUNT_RANGE).text("Number of Boids"));
                ui.label("Boid count takes effect on reset");
            });

            ui.collapsing("Flocking Behavior", |ui| {
                for field in ParamField::ALL {
                    let mut value = params.get(field);
                    let slider = egui::Slider::new(&mut value, field.range())
                        .text(field.label())
                        .step_by(field.step() as f64);
                    if ui.add(slider).changed() {
                        apply_edit(params, field, value);
                    }
                }
            });

            ui.collapsing("Debug", |ui| {
                ui.checkbox(&mut overlay.show_forces, "Show Force Vectors");
                ui.add(
                    egui::Slider::new(&mut overlay.sample_every, SAMPLE_EVERY_RANGE)
                        .text("Every Nth Boid"),
                );
                ui.checkbox(&mut overlay.show_radii, "Show Radii (boid 0)");
                ui.checkbox(&mut overlay.show_stats, "Show Stats");

                ui.separator();

                ui.label(format!("FPS: {:.1}", debug_info.fps));
                ui.label(format!("Frame time: {:.2} ms", debug_info.frame_time.as_secs_f64() * 1000.0));
                ui.label(format!("Steps this frame: {}", debug_info.steps_per_frame));
                ui.label(format!("Live Boids: {}", live_boids));
            });
        });

    actions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_edit_writes_field() {
        let mut params = SimulationParameters::default();
        assert!(apply_edit(&mut params, ParamField::SeparationWeight, 0.5));
        assert_eq!(params.separation_weight, 0.5);
    }

    #[test]
    fn test_apply_edit_rejects_nan() {
        let mut params = SimulationParameters::default();
        assert!(!apply_edit(&mut params, ParamField::PerceptionRadius, f32::NAN));
        assert_eq!(params, SimulationParameters::default());
    }

    #[test]
    fn test_slider_ranges_cover_defaults() {
        let params = SimulationParameters::default();
        for field in ParamField::ALL {
            assert!(field.range().contains(&params.get(field)), "{field} default out of range");
        }
        assert!(BOID_COUNT_RANGE.contains(&crate::BOID_COUNT));
    }
}

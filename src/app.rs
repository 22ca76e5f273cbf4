/*
 * Application Module
 *
 * This module defines the application model and the per-frame update for
 * nannou. Simulation holds everything that advances the flock (parameters,
 * playback, pending boid count, halt state) and has no window dependency;
 * Model wraps it together with the egui panel and debug state.
 */

use std::time::Duration;

use nannou::prelude::*;
use nannou_egui::Egui;
use tracing::{error, info, warn};

use crate::debug::{DebugInfo, DebugOverlay};
use crate::error::FlockError;
use crate::flock::Flock;
use crate::params::SimulationParameters;
use crate::playback::Playback;
use crate::renderer;
use crate::ui::{self, PanelState, UiActions};
use crate::BOID_COUNT;

pub const WINDOW_TITLE: &str = "Boids Simulation";

/// The flock plus the driver-owned state that decides when and how it steps.
#[derive(Debug, Clone)]
pub struct Simulation {
    pub flock: Flock,
    pub params: SimulationParameters,
    pub playback: Playback,
    /// Boid count used by the next reset.
    pub boid_count: usize,
    pub total_steps: u64,
    halted: Option<FlockError>,
}

impl Simulation {
    pub fn new(boid_count: usize, params: SimulationParameters) -> Self {
        Self::with_flock(Flock::new(boid_count, &params), params)
    }

    pub fn with_flock(flock: Flock, params: SimulationParameters) -> Self {
        Self {
            boid_count: flock.len(),
            flock,
            params,
            playback: Playback::default(),
            total_steps: 0,
            halted: None,
        }
    }

    /// The error that stopped the simulation, if any.
    pub fn halted(&self) -> Option<&FlockError> {
        self.halted.as_ref()
    }

    pub fn apply(&mut self, actions: &UiActions) {
        if actions.toggle_pause {
            self.playback.toggle_pause();
        }
        if let Some(speed) = actions.speed {
            self.playback.set_speed(speed);
        }
        if actions.reset {
            self.reset();
        }
    }

    /// Recreate the flock from the current parameters and resume.
    pub fn reset(&mut self) {
        if let Err(err) = self.params.validate() {
            warn!(%err, "resetting with parameters outside the supported range");
        }

        self.flock.reset(self.boid_count, &self.params);
        self.playback.note_reset();
        self.halted = None;
    }

    /// Run the steps due after `elapsed` frame time. Returns the number of
    /// steps actually taken; a failing step halts the simulation.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        if self.halted.is_some() {
            return 0;
        }

        let due = self.playback.steps_due(elapsed);
        for taken in 0..due {
            if let Err(err) = self.flock.step(&self.params) {
                error!(%err, step = self.total_steps, "halting simulation");
                self.halted = Some(err);
                return taken;
            }
            self.total_steps += 1;
        }

        due
    }
}

// Main model for the application
pub struct Model {
    pub sim: Simulation,
    pub overlay: DebugOverlay,
    pub egui: Egui,
    pub debug_info: DebugInfo,
}

// Initialize the model
pub fn model(app: &App) -> Model {
    let params = SimulationParameters::default();
    if let Err(err) = params.validate() {
        warn!(%err, "default parameters violate a precondition");
    }

    let window_id = app
        .new_window()
        .title(WINDOW_TITLE)
        .size(params.width as u32, params.height as u32)
        .view(renderer::view)
        .raw_event(raw_window_event)
        .build()
        .expect("failed to create the simulation window");

    let window = app
        .window(window_id)
        .expect("simulation window closed during startup");
    let egui = Egui::from_window(&window);

    let sim = Simulation::new(BOID_COUNT, params);
    info!(
        boids = sim.flock.len(),
        width = params.width,
        height = params.height,
        speed = %sim.playback.speed(),
        "starting flocking simulation"
    );

    Model {
        sim,
        overlay: DebugOverlay::default(),
        egui,
        debug_info: DebugInfo::default(),
    }
}

// Update the model
pub fn update(app: &App, model: &mut Model, update: Update) {
    model.debug_info.fps = app.fps();
    model.debug_info.frame_time = update.since_last;

    let sim = &mut model.sim;
    let actions = ui::update_ui(
        &mut model.egui,
        PanelState {
            params: &mut sim.params,
            boid_count: &mut sim.boid_count,
            overlay: &mut model.overlay,
            playback: &sim.playback,
            debug_info: &model.debug_info,
            live_boids: sim.flock.len(),
            halted: sim.halted.as_ref(),
        },
    );

    // Parameter edits above land before any step of this frame
    sim.apply(&actions);

    model.debug_info.steps_per_frame = sim.advance(update.since_last);
    model.debug_info.total_steps = sim.total_steps;
}

// Handle raw window events for egui
pub fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);
}

/*
 * Boid Flocking Simulation - Module Definitions
 *
 * This file defines the module structure for the flocking simulation.
 * The core (boid, flock, params) has no dependency on the window or UI;
 * app, ui and renderer drive it once per frame.
 */

// Re-export key components for easier access
pub use boid::{Boid, SteeringForces};
pub use debug::{DebugInfo, DebugOverlay};
pub use error::{FlockError, ParamError};
pub use flock::Flock;
pub use params::{ParamField, SimulationParameters};
pub use playback::{Playback, PlaybackState, SpeedPreset};

// Define modules
pub mod app;
pub mod boid;
pub mod debug;
pub mod error;
pub mod flock;
pub mod params;
pub mod playback;
pub mod renderer;
pub mod ui;

// Constants
pub const BOID_COUNT: usize = 50;
pub const WORLD_WIDTH: f32 = 800.0;
pub const WORLD_HEIGHT: f32 = 600.0;

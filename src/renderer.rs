/*
 * Renderer Module
 *
 * This module draws the flock, the optional debug overlays, and the
 * legend. World coordinates have their origin at the top-left corner with
 * y pointing down; nannou's window space is centered with y pointing up, so
 * every position and vector goes through the mapping helpers below.
 */

use nannou::prelude::*;
use tracing::error;

use crate::app::Model;
use crate::boid::Boid;
use crate::params::SimulationParameters;

pub const BOID_LENGTH: f32 = 20.0;
pub const BOID_WIDTH: f32 = 10.0;
// Post-weight forces are tiny; scale them up so the arrows are visible
pub const FORCE_VECTOR_SCALE: f32 = 300.0;

const LINE_HEIGHT: f32 = 18.0;
const TEXT_MARGIN: f32 = 12.0;
const TEXT_WIDTH: f32 = 220.0;

/// Map a world position into the window rect.
pub fn world_to_screen(point: Vec2, params: &SimulationParameters, rect: Rect) -> Point2 {
    pt2(
        rect.left() + point.x * rect.w() / params.width,
        rect.top() - point.y * rect.h() / params.height,
    )
}

/// Map a world-space direction into window space (scaled, y flipped).
pub fn world_vector_to_screen(v: Vec2, params: &SimulationParameters, rect: Rect) -> Vec2 {
    vec2(v.x * rect.w() / params.width, -v.y * rect.h() / params.height)
}

// Render the model
pub fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    draw.background().color(BLACK);

    let window_rect = app.window_rect();
    let sim = &model.sim;
    let params = &sim.params;

    for (i, boid) in sim.flock.boids().iter().enumerate() {
        draw_boid(&draw, boid, params, window_rect);
        if model.overlay.shows_forces_for(i) {
            draw_forces(&draw, boid, params, window_rect);
        }
    }

    if model.overlay.show_radii {
        if let Some(first) = sim.flock.boids().first() {
            draw_radii(&draw, first, params, window_rect);
        }
    }

    if model.overlay.show_forces {
        draw_legend(&draw, window_rect);
    }

    if model.overlay.show_stats {
        draw_stats(&draw, model, window_rect);
    }

    if let Err(err) = draw.to_frame(app, &frame) {
        error!(?err, "failed to submit flock drawing");
    }

    if let Err(err) = model.egui.draw_to_frame(&frame) {
        error!(?err, "failed to draw control panel");
    }
}

// Triangle pointing along the velocity
fn draw_boid(draw: &Draw, boid: &Boid, params: &SimulationParameters, window_rect: Rect) {
    let position = world_to_screen(boid.position(), params, window_rect);
    let direction = world_vector_to_screen(boid.velocity(), params, window_rect);
    let angle = direction.y.atan2(direction.x);

    let points = [
        pt2(BOID_LENGTH / 2.0, 0.0),
        pt2(-BOID_LENGTH / 2.0, -BOID_WIDTH / 2.0),
        pt2(-BOID_LENGTH / 2.0, BOID_WIDTH / 2.0),
    ];

    draw.polygon()
        .color(WHITE)
        .points(points)
        .xy(position)
        .rotate(angle);
}

fn draw_forces(draw: &Draw, boid: &Boid, params: &SimulationParameters, window_rect: Rect) {
    let start = world_to_screen(boid.position(), params, window_rect);
    let forces = boid.forces();

    for (color, force) in [
        (GREEN, forces.cohesion),
        (CYAN, forces.alignment),
        (RED, forces.separation),
    ] {
        if force.length_squared() == 0.0 {
            continue;
        }

        let end = start + world_vector_to_screen(force * FORCE_VECTOR_SCALE, params, window_rect);
        draw.arrow()
            .start(start)
            .end(end)
            .color(color)
            .stroke_weight(1.5);
    }
}

fn draw_radii(draw: &Draw, boid: &Boid, params: &SimulationParameters, window_rect: Rect) {
    let center = world_to_screen(boid.position(), params, window_rect);
    let scale = window_rect.w() / params.width;

    draw.ellipse()
        .xy(center)
        .radius(params.separation_radius * scale)
        .no_fill()
        .stroke(RED)
        .stroke_weight(1.0);

    draw.ellipse()
        .xy(center)
        .radius(params.perception_radius * scale)
        .no_fill()
        .stroke(BLUE)
        .stroke_weight(1.0);
}

fn draw_legend(draw: &Draw, window_rect: Rect) {
    let x = window_rect.left() + TEXT_MARGIN + TEXT_WIDTH / 2.0;
    let bottom = window_rect.bottom() + TEXT_MARGIN;

    let entries = [
        ("Separation", RED),
        ("Alignment", CYAN),
        ("Cohesion", GREEN),
    ];

    for (i, (label, color)) in entries.into_iter().enumerate() {
        draw.text(label)
            .x_y(x, bottom + i as f32 * LINE_HEIGHT)
            .w_h(TEXT_WIDTH, LINE_HEIGHT)
            .left_justify()
            .color(color)
            .font_size(14);
    }
}

fn draw_stats(draw: &Draw, model: &Model, window_rect: Rect) {
    let sim = &model.sim;
    let state = if sim.halted().is_some() {
        "Halted"
    } else if sim.playback.is_paused() {
        "Paused"
    } else {
        "Running"
    };

    let lines = [
        format!("FPS: {:.1}", model.debug_info.fps),
        format!("Speed: {}", sim.playback.speed()),
        format!("State: {}", state),
        format!("Boids: {}", sim.flock.len()),
        format!("Steps: {}", sim.total_steps),
    ];

    let x = window_rect.right() - TEXT_MARGIN - TEXT_WIDTH / 2.0;
    let top = window_rect.top() - TEXT_MARGIN;

    for (i, line) in lines.iter().enumerate() {
        draw.text(line)
            .x_y(x, top - i as f32 * LINE_HEIGHT)
            .w_h(TEXT_WIDTH, LINE_HEIGHT)
            .right_justify()
            .color(WHITE)
            .font_size(14);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> Rect {
        Rect::from_w_h(800.0, 600.0)
    }

    #[test]
    fn test_world_corners_map_to_window_corners() {
        let params = SimulationParameters::default();

        assert_eq!(world_to_screen(vec2(0.0, 0.0), &params, window()), pt2(-400.0, 300.0));
        assert_eq!(world_to_screen(vec2(800.0, 600.0), &params, window()), pt2(400.0, -300.0));
        assert_eq!(world_to_screen(vec2(400.0, 300.0), &params, window()), pt2(0.0, 0.0));
    }

    #[test]
    fn test_world_vectors_flip_y() {
        let params = SimulationParameters::default();
        assert_eq!(world_vector_to_screen(vec2(1.0, 2.0), &params, window()), vec2(1.0, -2.0));
    }

    #[test]
    fn test_resized_window_scales_positions() {
        let params = SimulationParameters::default();
        let half = Rect::from_w_h(400.0, 300.0);
        assert_eq!(world_to_screen(vec2(800.0, 0.0), &params, half), pt2(200.0, 150.0));
    }
}

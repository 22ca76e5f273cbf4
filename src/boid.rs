/*
 * Boid Module
 *
 * This module defines the Boid struct and its behavior.
 * Each boid follows three main rules:
 * 1. Cohesion: Steer towards the average position of neighbors
 * 2. Alignment: Steer towards the average heading of neighbors
 * 3. Separation: Avoid crowding neighbors, pushing harder the closer they are
 *
 * Steering only reads the neighbor slice it is given; integration is a
 * separate call so the flock can compute every force before any boid moves.
 */

use nannou::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

use crate::params::SimulationParameters;

/// The weighted output of each flocking rule for one boid and one step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SteeringForces {
    pub cohesion: Vec2,
    pub alignment: Vec2,
    pub separation: Vec2,
}

impl SteeringForces {
    pub fn total(&self) -> Vec2 {
        self.cohesion + self.alignment + self.separation
    }

    pub fn is_finite(&self) -> bool {
        is_finite(self.cohesion) && is_finite(self.alignment) && is_finite(self.separation)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Boid {
    position: Vec2,
    velocity: Vec2,
    acceleration: Vec2,
    forces: SteeringForces,
}

impl Boid {
    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vec2::ZERO,
            forces: SteeringForces::default(),
        }
    }

    /// Uniform position over the world and a uniform heading at full speed.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, params: &SimulationParameters) -> Self {
        let x = rng.gen_range(0.0..params.width);
        let y = rng.gen_range(0.0..params.height);
        let angle = rng.gen_range(0.0..TAU);
        let velocity = vec2(angle.cos(), angle.sin()) * params.max_speed;

        Self::new(vec2(x, y), velocity)
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn acceleration(&self) -> Vec2 {
        self.acceleration
    }

    /// Weighted rule vectors applied during the most recent step.
    pub fn forces(&self) -> SteeringForces {
        self.forces
    }

    /// Heading angle in radians, measured from +x towards +y.
    pub fn heading(&self) -> f32 {
        self.velocity.y.atan2(self.velocity.x)
    }

    pub fn is_finite(&self) -> bool {
        is_finite(self.position) && is_finite(self.velocity)
    }

    // Apply a force to the boid
    pub fn apply_force(&mut self, force: Vec2) {
        self.acceleration += force;
    }

    /// Steer towards `target` at full speed, capped at `max_force`.
    /// Seeking the boid's own position yields no steering.
    pub fn seek(&self, target: Vec2, params: &SimulationParameters) -> Vec2 {
        self.steer_towards(target - self.position, params)
    }

    // Reynolds: steering = desired - velocity
    fn steer_towards(&self, direction: Vec2, params: &SimulationParameters) -> Vec2 {
        let length_squared = direction.length_squared();
        if length_squared == 0.0 {
            return Vec2::ZERO;
        }

        let desired = direction * (params.max_speed / length_squared.sqrt());
        limit(desired - self.velocity, params.max_force)
    }

    // Other boids strictly inside `radius`, paired with their squared distance
    fn neighbors<'a>(
        &'a self,
        index: usize,
        boids: &'a [Boid],
        radius: f32,
    ) -> impl Iterator<Item = (&'a Boid, f32)> + 'a {
        let radius_squared = radius * radius;
        boids
            .iter()
            .enumerate()
            .filter(move |&(i, _)| i != index)
            .filter_map(move |(_, other)| {
                let d_squared = self.position.distance_squared(other.position);
                (d_squared < radius_squared).then_some((other, d_squared))
            })
    }

    // Calculate cohesion force (steer towards average position of neighbors)
    pub fn cohesion(&self, index: usize, boids: &[Boid], params: &SimulationParameters) -> Vec2 {
        let mut center = Vec2::ZERO;
        let mut count = 0;

        for (other, _) in self.neighbors(index, boids, params.perception_radius) {
            center += other.position;
            count += 1;
        }

        if count == 0 {
            return Vec2::ZERO;
        }

        self.seek(center / count as f32, params)
    }

    // Calculate alignment force (steer towards average heading of neighbors)
    pub fn alignment(&self, index: usize, boids: &[Boid], params: &SimulationParameters) -> Vec2 {
        let mut heading = Vec2::ZERO;
        let mut count = 0;

        for (other, _) in self.neighbors(index, boids, params.perception_radius) {
            heading += other.velocity;
            count += 1;
        }

        if count == 0 {
            return Vec2::ZERO;
        }

        // Neighbors whose velocities cancel out give no heading to match
        self.steer_towards(heading / count as f32, params)
    }

    /// Average of the unit vectors pointing away from each neighbor inside
    /// `separation_radius`, each divided by its distance. Coincident boids
    /// have no direction to push along and are skipped.
    pub fn separation_push(&self, index: usize, boids: &[Boid], params: &SimulationParameters) -> Vec2 {
        let mut push = Vec2::ZERO;
        let mut count = 0;

        for (other, d_squared) in self.neighbors(index, boids, params.separation_radius) {
            if d_squared == 0.0 {
                continue;
            }

            // Normalized and weighted by distance: (diff / d) / d
            let diff = self.position - other.position;
            push += diff / d_squared;
            count += 1;
        }

        if count == 0 {
            return Vec2::ZERO;
        }

        push / count as f32
    }

    // Calculate separation force (avoid crowding neighbors)
    pub fn separation(&self, index: usize, boids: &[Boid], params: &SimulationParameters) -> Vec2 {
        let push = self.separation_push(index, boids, params);
        self.steer_towards(push, params)
    }

    /// Weighted output of all three rules against `boids`, where `index` is
    /// this boid's own slot in that slice.
    pub fn compute_steering(
        &self,
        index: usize,
        boids: &[Boid],
        params: &SimulationParameters,
    ) -> SteeringForces {
        SteeringForces {
            cohesion: self.cohesion(index, boids, params) * params.cohesion_weight,
            alignment: self.alignment(index, boids, params) * params.alignment_weight,
            separation: self.separation(index, boids, params) * params.separation_weight,
        }
    }

    /// Advance one step under `forces`: accumulate, clamp speed, move, wrap.
    pub fn integrate(&mut self, forces: SteeringForces, params: &SimulationParameters) {
        self.acceleration = Vec2::ZERO;
        self.forces = forces;

        self.apply_force(forces.cohesion);
        self.apply_force(forces.alignment);
        self.apply_force(forces.separation);

        self.velocity += self.acceleration;

        // Limit speed
        if self.velocity.length_squared() > params.max_speed * params.max_speed {
            self.velocity = self.velocity.normalize() * params.max_speed;
        }

        self.position += self.velocity;
        self.wrap_edges(params.width, params.height);
    }

    /// Snap to the opposite edge once outside the world. This is a snap, not
    /// a modulo: a boid far past an edge lands exactly on the other edge.
    pub fn wrap_edges(&mut self, width: f32, height: f32) {
        if self.position.x < 0.0 {
            self.position.x = width;
        } else if self.position.x > width {
            self.position.x = 0.0;
        }

        if self.position.y < 0.0 {
            self.position.y = height;
        } else if self.position.y > height {
            self.position.y = 0.0;
        }
    }
}

fn limit(v: Vec2, max: f32) -> Vec2 {
    let length_squared = v.length_squared();
    if length_squared > max * max {
        v * (max / length_squared.sqrt())
    } else {
        v
    }
}

fn is_finite(v: Vec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const EPSILON: f32 = 1e-6;

    fn params() -> SimulationParameters {
        SimulationParameters::default()
    }

    #[test]
    fn test_seek_own_position_is_zero() {
        let boid = Boid::new(vec2(100.0, 100.0), vec2(1.0, 0.0));
        assert_eq!(boid.seek(vec2(100.0, 100.0), &params()), Vec2::ZERO);
    }

    #[test]
    fn test_seek_clamps_to_max_force() {
        let params = params();
        // Heading away from the target: desired - velocity = (6, 0)
        let boid = Boid::new(vec2(100.0, 100.0), vec2(-3.0, 0.0));
        let steer = boid.seek(vec2(200.0, 100.0), &params);

        assert!((steer.length() - params.max_force).abs() < EPSILON);
        assert!(steer.x > 0.0);
        assert_eq!(steer.y, 0.0);
    }

    #[test]
    fn test_seek_below_max_force_is_unclamped() {
        let mut params = params();
        params.max_force = 10.0;
        let boid = Boid::new(vec2(0.0, 0.0), vec2(1.0, 0.0));
        let steer = boid.seek(vec2(0.0, 50.0), &params);

        assert!((steer - vec2(-1.0, 3.0)).length() < EPSILON);
    }

    #[test]
    fn test_isolated_boid_has_no_steering() {
        let params = params();
        let boids = vec![
            Boid::new(vec2(100.0, 100.0), vec2(1.0, 1.0)),
            Boid::new(vec2(500.0, 500.0), vec2(-1.0, 0.0)),
        ];

        let forces = boids[0].compute_steering(0, &boids, &params);
        assert_eq!(forces, SteeringForces::default());
    }

    #[test]
    fn test_self_is_never_a_neighbor() {
        let params = params();
        let boids = vec![Boid::new(vec2(100.0, 100.0), vec2(2.0, 0.0))];

        assert_eq!(boids[0].cohesion(0, &boids, &params), Vec2::ZERO);
        assert_eq!(boids[0].alignment(0, &boids, &params), Vec2::ZERO);
        assert_eq!(boids[0].separation(0, &boids, &params), Vec2::ZERO);
    }

    #[test]
    fn test_coincident_boids_do_not_produce_nan() {
        let params = params();
        let boids = vec![
            Boid::new(vec2(100.0, 100.0), vec2(1.0, 0.0)),
            Boid::new(vec2(100.0, 100.0), vec2(0.0, 1.0)),
        ];

        let forces = boids[0].compute_steering(0, &boids, &params);
        assert!(forces.is_finite());
        // Coincident neighbor is skipped by separation and gives a degenerate centroid
        assert_eq!(forces.separation, Vec2::ZERO);
        assert_eq!(forces.cohesion, Vec2::ZERO);
        // but still counts for alignment
        assert!(forces.alignment.length() > 0.0);
    }

    #[test]
    fn test_alignment_with_cancelling_velocities_is_zero() {
        let params = params();
        let boids = vec![
            Boid::new(vec2(100.0, 100.0), vec2(1.0, 0.0)),
            Boid::new(vec2(110.0, 100.0), vec2(2.0, 0.0)),
            Boid::new(vec2(90.0, 100.0), vec2(-2.0, 0.0)),
        ];

        assert_eq!(boids[0].alignment(0, &boids, &params), Vec2::ZERO);
    }

    #[test]
    fn test_alignment_turns_towards_neighbor_heading() {
        let mut params = params();
        params.max_force = 10.0;
        let boids = vec![
            Boid::new(vec2(100.0, 100.0), vec2(3.0, 0.0)),
            Boid::new(vec2(120.0, 100.0), vec2(0.0, 1.0)),
        ];

        let steer = boids[0].alignment(0, &boids, &params);
        assert!((steer - vec2(-3.0, 3.0)).length() < EPSILON);
    }

    #[test]
    fn test_separation_push_weights_closer_neighbors_more() {
        let params = params();
        let boids = vec![
            Boid::new(vec2(50.0, 50.0), Vec2::ZERO),
            Boid::new(vec2(45.0, 50.0), Vec2::ZERO),
            Boid::new(vec2(60.0, 50.0), Vec2::ZERO),
        ];

        // ((1, 0) / 5 + (-1, 0) / 10) / 2
        let push = boids[0].separation_push(0, &boids, &params);
        assert!((push - vec2(0.05, 0.0)).length() < EPSILON);
    }

    #[test]
    fn test_separation_push_shrinks_with_distance() {
        let params = params();
        let push_at = |d: f32| {
            let boids = vec![
                Boid::new(vec2(100.0, 100.0), Vec2::ZERO),
                Boid::new(vec2(100.0 + d, 100.0), Vec2::ZERO),
            ];
            boids[0].separation_push(0, &boids, &params).length()
        };

        assert!(push_at(5.0) > push_at(10.0));
        assert!(push_at(10.0) > push_at(20.0));
        assert_eq!(push_at(30.0), 0.0);
    }

    #[test]
    fn test_separation_radius_is_exclusive() {
        let params = params();
        let boids = vec![
            Boid::new(vec2(100.0, 100.0), Vec2::ZERO),
            Boid::new(vec2(100.0 + params.separation_radius, 100.0), Vec2::ZERO),
        ];

        assert_eq!(boids[0].separation(0, &boids, &params), Vec2::ZERO);
    }

    #[test]
    fn test_weights_scale_rule_output() {
        let mut params = params();
        let boids = vec![
            Boid::new(vec2(100.0, 100.0), vec2(1.0, 0.0)),
            Boid::new(vec2(140.0, 100.0), vec2(0.0, 1.0)),
        ];
        let unweighted = boids[0].cohesion(0, &boids, &params);

        params.cohesion_weight = 0.0;
        assert_eq!(boids[0].compute_steering(0, &boids, &params).cohesion, Vec2::ZERO);

        params.cohesion_weight = 2.0;
        let weighted = boids[0].compute_steering(0, &boids, &params).cohesion;
        assert!((weighted - unweighted * 2.0).length() < EPSILON);
    }

    #[test]
    fn test_integrate_without_force_moves_by_velocity() {
        let params = params();
        let mut boid = Boid::new(vec2(100.0, 200.0), vec2(1.5, -2.0));
        boid.integrate(SteeringForces::default(), &params);

        assert_eq!(boid.velocity(), vec2(1.5, -2.0));
        assert_eq!(boid.position(), vec2(101.5, 198.0));
        assert_eq!(boid.acceleration(), Vec2::ZERO);
    }

    #[test]
    fn test_integrate_clamps_speed_and_records_forces() {
        let params = params();
        let mut boid = Boid::new(vec2(100.0, 100.0), vec2(3.0, 0.0));
        let forces = SteeringForces {
            cohesion: vec2(5.0, 0.0),
            alignment: vec2(0.0, 1.0),
            separation: Vec2::ZERO,
        };
        boid.integrate(forces, &params);

        assert!((boid.velocity().length() - params.max_speed).abs() < EPSILON);
        assert_eq!(boid.forces(), forces);
        assert_eq!(boid.acceleration(), vec2(5.0, 1.0));
    }

    #[test]
    fn test_acceleration_does_not_carry_over() {
        let params = params();
        let mut boid = Boid::new(vec2(100.0, 100.0), vec2(1.0, 0.0));
        let push = SteeringForces {
            cohesion: vec2(0.5, 0.0),
            ..SteeringForces::default()
        };
        boid.integrate(push, &params);
        boid.integrate(SteeringForces::default(), &params);

        assert_eq!(boid.acceleration(), Vec2::ZERO);
        assert_eq!(boid.velocity(), vec2(1.5, 0.0));
    }

    #[test]
    fn test_wrap_edges_snaps_to_opposite_edge() {
        let mut boid = Boid::new(vec2(-0.5, 650.0), Vec2::ZERO);
        boid.wrap_edges(800.0, 600.0);
        assert_eq!(boid.position(), vec2(800.0, 0.0));

        // Far past the edge still lands exactly on it
        let mut boid = Boid::new(vec2(1200.0, -300.0), Vec2::ZERO);
        boid.wrap_edges(800.0, 600.0);
        assert_eq!(boid.position(), vec2(0.0, 600.0));

        // Exactly on an edge is inside
        let mut boid = Boid::new(vec2(800.0, 0.0), Vec2::ZERO);
        boid.wrap_edges(800.0, 600.0);
        assert_eq!(boid.position(), vec2(800.0, 0.0));
    }

    #[test]
    fn test_random_boid_starts_inside_world_at_full_speed() {
        let params = params();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let boid = Boid::random(&mut rng, &params);
            assert!((0.0..params.width).contains(&boid.position().x));
            assert!((0.0..params.height).contains(&boid.position().y));
            assert!((boid.velocity().length() - params.max_speed).abs() < 1e-5);
        }
    }
}

/*
 * Flock Module
 *
 * The Flock owns every boid and advances them together. A step runs in two
 * phases: all steering forces are computed from the unmodified pre-step
 * boids, then every boid is integrated. The new state is only committed if
 * it is finite for every boid, so a failing step leaves the flock as it was.
 *
 * Force computation fans out across rayon workers when parallelism is on;
 * each worker only reads the shared slice, so the result is identical to a
 * sequential run.
 */

use rand::Rng;
use rayon::prelude::*;
use tracing::{error, info, trace};

use crate::boid::{Boid, SteeringForces};
use crate::error::FlockError;
use crate::params::SimulationParameters;

#[derive(Debug, Clone)]
pub struct Flock {
    boids: Vec<Boid>,
    parallel: bool,
}

impl Flock {
    /// Create `count` boids with random positions and headings.
    pub fn new(count: usize, params: &SimulationParameters) -> Self {
        Self::with_rng(count, params, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(count: usize, params: &SimulationParameters, rng: &mut R) -> Self {
        let boids = spawn_boids(count, params, rng);
        info!(count, max_speed = params.max_speed, "created flock");

        Self {
            boids,
            parallel: true,
        }
    }

    /// Build a flock from explicit boids, e.g. a hand-placed scenario.
    pub fn from_boids(boids: Vec<Boid>) -> Self {
        Self {
            boids,
            parallel: true,
        }
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    pub fn set_parallel(&mut self, parallel: bool) {
        self.parallel = parallel;
    }

    /// Discard every boid and spawn `count` new ones from the current
    /// parameters. Only `max_speed` affects the new boids beyond the world
    /// bounds.
    pub fn reset(&mut self, count: usize, params: &SimulationParameters) {
        self.reset_with_rng(count, params, &mut rand::thread_rng());
    }

    pub fn reset_with_rng<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        params: &SimulationParameters,
        rng: &mut R,
    ) {
        let previous = self.boids.len();
        self.boids = spawn_boids(count, params, rng);
        info!(previous, count, max_speed = params.max_speed, "reset flock");
    }

    /// Weighted steering for every boid, computed against the current state.
    pub fn compute_forces(&self, params: &SimulationParameters) -> Vec<SteeringForces> {
        let boids = self.boids.as_slice();

        if self.parallel {
            boids
                .par_iter()
                .enumerate()
                .map(|(i, boid)| boid.compute_steering(i, boids, params))
                .collect()
        } else {
            boids
                .iter()
                .enumerate()
                .map(|(i, boid)| boid.compute_steering(i, boids, params))
                .collect()
        }
    }

    /// Advance every boid by one step.
    pub fn step(&mut self, params: &SimulationParameters) -> Result<(), FlockError> {
        if self.boids.is_empty() {
            return Ok(());
        }

        // First pass: every force from the pre-step snapshot
        let forces = self.compute_forces(params);
        if let Some(index) = forces.iter().position(|f| !f.is_finite()) {
            error!(index, forces = ?forces[index], "non-finite steering force; step discarded");
            return Err(FlockError::NonFinite {
                index,
                quantity: "steering force",
            });
        }

        // Second pass: integrate into a copy so a bad state is never committed
        let mut next = self.boids.clone();
        if self.parallel {
            next.par_iter_mut()
                .zip(forces.par_iter())
                .for_each(|(boid, &f)| boid.integrate(f, params));
        } else {
            for (boid, &f) in next.iter_mut().zip(forces.iter()) {
                boid.integrate(f, params);
            }
        }

        if let Some(index) = next.iter().position(|b| !b.is_finite()) {
            error!(index, boid = ?next[index], "non-finite boid state; step discarded");
            return Err(FlockError::NonFinite {
                index,
                quantity: "position or velocity",
            });
        }

        self.boids = next;
        trace!(boids = self.boids.len(), "stepped flock");
        Ok(())
    }
}

fn spawn_boids<R: Rng + ?Sized>(count: usize, params: &SimulationParameters, rng: &mut R) -> Vec<Boid> {
    (0..count).map(|_| Boid::random(rng, params)).collect()
}

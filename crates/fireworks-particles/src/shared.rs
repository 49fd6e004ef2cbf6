//! Lock-guarded simulation handle shared between the update and draw paths
//!
//! The frame loop advances the simulation and regenerates the vertex buffer;
//! the draw path reads the buffer. Both go through one coarse mutex so neither
//! ever observes a half-updated particle set.

use crate::simulation::Simulation;
use fireworks_core::Result;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub struct SharedSimulation {
    inner: Arc<Mutex<Simulation>>,
}

impl SharedSimulation {
    pub fn new(simulation: Simulation) -> Self {
        Self {
            inner: Arc::new(Mutex::new(simulation)),
        }
    }

    /// Acquire the simulation lock.
    ///
    /// A poisoned lock is recovered: the worst a panicking frame leaves behind
    /// is a partially advanced particle set, which the next frame repairs.
    pub fn lock(&self) -> MutexGuard<'_, Simulation> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run `f` with exclusive access to the simulation
    pub fn with<R>(&self, f: impl FnOnce(&mut Simulation) -> R) -> R {
        let mut sim = self.lock();
        f(&mut sim)
    }

    /// Advance to `time` and refill `buffer` under a single lock acquisition.
    /// Returns the number of records written.
    pub fn frame(&self, time: f64, buffer: &mut [f32]) -> usize {
        let mut sim = self.lock();
        sim.advance(time);
        sim.fill_buffer(buffer)
    }

    pub fn fill(&self, buffer: &mut [f32]) -> usize {
        self.lock().fill_buffer(buffer)
    }

    pub fn fire_manual(&self, index: usize) -> Result<()> {
        self.lock().fire_manual(index)
    }

    pub fn reset(&self) {
        self.lock().reset();
    }

    pub fn scale_particle_rate(&self, factor: f64) {
        self.lock().scale_particle_rate(factor);
    }

    pub fn particle_count(&self) -> usize {
        self.lock().particle_count()
    }
}

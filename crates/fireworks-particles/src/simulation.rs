//! The simulation root: owns particles, templates and launchers

use crate::launcher::Launcher;
use crate::particle::{Fate, Particle, ParticlePool, VertexRecord, RECORD_FLOATS};
use crate::spawn::SpawnQueue;
use crate::template::Catalog;
use fireworks_core::{FireworksError, ParticleTypeId, Result};
use glam::Vec3;
use std::fmt;

/// Size of the renderer's vertex buffer; no simulation may hold more particles
pub const MAX_VERTICES: usize = 65536;

/// Construction parameters for a [`Simulation`]
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Simulated time the simulation starts at (seconds)
    pub start_time: f64,
    /// Informational generation-rate knob; launchers set the real throughput
    pub particle_rate: f64,
    /// Hard ceiling on live particles
    pub max_particles: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start_time: 0.0,
            particle_rate: 1000.0,
            max_particles: 10000,
        }
    }
}

/// What happened during one [`Simulation::advance`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Particles that outlived their maximum age and were removed
    pub expired: usize,
    /// Particles added (shards, trails and launches)
    pub spawned: usize,
    /// Spawn requests rejected because the simulation was full
    pub dropped: usize,
}

/// Result of offering one particle to the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Admission {
    Spawned,
    /// Pool at capacity; counted in `dropped`
    Dropped,
    UnknownKind,
}

pub struct Simulation {
    pool: ParticlePool,
    catalog: Catalog,
    launchers: Vec<Launcher>,
    queue: SpawnQueue,
    simulated_time: f64,
    particle_rate: f64,
    dropped: u64,
}

impl Simulation {
    /// Build a simulation over a validated template catalog
    pub fn new(config: SimulationConfig, catalog: Catalog) -> Result<Self> {
        if config.max_particles == 0 || config.max_particles > MAX_VERTICES {
            return Err(FireworksError::out_of_range(
                "max_particles",
                1.0,
                MAX_VERTICES as f64,
                config.max_particles as f64,
            ));
        }
        if !config.start_time.is_finite() {
            return Err(FireworksError::InvalidConfig(
                "start time must be finite".into(),
            ));
        }
        catalog.validate()?;

        log::debug!(
            "simulation created: capacity {}, {} type(s), {} explosion(s), {} tail(s)",
            config.max_particles,
            catalog.type_count(),
            catalog.explosion_count(),
            catalog.tail_count()
        );

        Ok(Self {
            pool: ParticlePool::new(config.max_particles),
            catalog,
            launchers: Vec::new(),
            queue: SpawnQueue::new(),
            simulated_time: config.start_time,
            particle_rate: config.particle_rate,
            dropped: 0,
        })
    }

    /// Register a launcher; launchers fire in registration order.
    /// Returns the launcher's index.
    pub fn add_launcher(&mut self, launcher: Launcher) -> Result<usize> {
        launcher.validate(&self.catalog)?;
        self.launchers.push(launcher);
        Ok(self.launchers.len() - 1)
    }

    /// Add one particle born now. Returns false when the simulation is at
    /// capacity (the request is dropped and counted) or `kind` is unknown.
    pub fn generate(&mut self, velocity: Vec3, kind: ParticleTypeId, position: Vec3) -> bool {
        self.admit(velocity, kind, position) == Admission::Spawned
    }

    fn admit(&mut self, velocity: Vec3, kind: ParticleTypeId, position: Vec3) -> Admission {
        let Some(ty) = self.catalog.particle_type(kind) else {
            log::warn!("generate: unknown particle {kind}, request ignored");
            return Admission::UnknownKind;
        };
        let particle = Particle::new(self.simulated_time, velocity, kind, ty, position);
        match self.pool.spawn() {
            Some(slot) => {
                *slot = particle;
                Admission::Spawned
            }
            None => {
                self.dropped += 1;
                Admission::Dropped
            }
        }
    }

    /// Advance simulated time to `time`.
    ///
    /// Integrates every live particle, removes the expired ones, adds the
    /// shards and trails they produced, then lets each launcher fire. Times at
    /// or before the current time, and NaN, change nothing.
    pub fn advance(&mut self, time: f64) -> StepReport {
        let mut report = StepReport::default();
        if time.is_nan() || time <= self.simulated_time {
            return report;
        }
        self.simulated_time = time;

        // 1. Integrate the live set
        let Self {
            pool,
            catalog,
            queue,
            ..
        } = self;
        for particle in pool.alive_slice_mut() {
            if particle.integrate(time, catalog, queue) == Fate::Expired {
                report.expired += 1;
            }
        }

        // 2. Remove the dead, then admit what they left behind
        self.pool.compact();
        self.flush_queue(&mut report);

        // 3. Launchers in registration order
        for launcher in &mut self.launchers {
            launcher.handle_frame(time, &mut self.queue);
        }
        self.flush_queue(&mut report);

        if report.dropped > 0 {
            log::debug!(
                "t={time:.3}: dropped {} spawn(s) at capacity {}",
                report.dropped,
                self.pool.capacity()
            );
        }
        report
    }

    fn flush_queue(&mut self, report: &mut StepReport) {
        let mut queue = std::mem::take(&mut self.queue);
        for request in queue.drain() {
            match self.admit(request.velocity, request.kind, request.position) {
                Admission::Spawned => report.spawned += 1,
                Admission::Dropped => report.dropped += 1,
                Admission::UnknownKind => {}
            }
        }
        self.queue = queue;
    }

    /// Fire one single shot from launcher `index`, outside its timer
    pub fn fire_manual(&mut self, index: usize) -> Result<()> {
        let count = self.launchers.len();
        let launcher = self
            .launchers
            .get_mut(index)
            .ok_or(FireworksError::LauncherNotFound { index, count })?;
        launcher.fire(&mut self.queue);
        log::debug!("manual fire from launcher {index} ('{}')", launcher.name);

        let mut report = StepReport::default();
        self.flush_queue(&mut report);
        Ok(())
    }

    /// Write one 12-float record per live particle into `buffer`.
    ///
    /// Writes at most `buffer.len() / 12` records; returns how many were
    /// written.
    pub fn fill_buffer(&self, buffer: &mut [f32]) -> usize {
        let mut written = 0;
        for (chunk, particle) in buffer
            .chunks_exact_mut(RECORD_FLOATS)
            .zip(self.pool.alive_slice())
        {
            chunk.copy_from_slice(&VertexRecord::from_particle(particle).to_array());
            written += 1;
        }
        written
    }

    /// Typed variant of [`Simulation::fill_buffer`]
    pub fn fill_records(&self, records: &mut [VertexRecord]) -> usize {
        let mut written = 0;
        for (record, particle) in records.iter_mut().zip(self.pool.alive_slice()) {
            *record = VertexRecord::from_particle(particle);
            written += 1;
        }
        written
    }

    /// Remove every live particle. Launchers keep their timers.
    pub fn reset(&mut self) {
        let cleared = self.pool.alive_count();
        self.pool.clear();
        self.queue.clear();
        log::info!("simulation reset, {cleared} particle(s) cleared");
    }

    pub fn time(&self) -> f64 {
        self.simulated_time
    }

    pub fn particle_count(&self) -> usize {
        self.pool.alive_count()
    }

    pub fn max_particles(&self) -> usize {
        self.pool.capacity()
    }

    /// Total spawn requests rejected at capacity since construction
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn particles(&self) -> &[Particle] {
        self.pool.alive_slice()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn launchers(&self) -> &[Launcher] {
        &self.launchers
    }

    pub fn launcher_count(&self) -> usize {
        self.launchers.len()
    }

    /// Indices of the launchers an operator may fire by hand
    pub fn manual_launchers(&self) -> Vec<usize> {
        self.launchers
            .iter()
            .enumerate()
            .filter(|(_, l)| l.manual)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn particle_rate(&self) -> f64 {
        self.particle_rate
    }

    pub fn set_particle_rate(&mut self, rate: f64) {
        self.particle_rate = rate;
    }

    pub fn scale_particle_rate(&mut self, factor: f64) {
        self.particle_rate *= factor;
    }

    /// One-line summary: `[live of max], rate=R`
    pub fn status_line(&self) -> String {
        format!(
            "[{} of {}], rate={:.0}",
            self.particle_count(),
            self.max_particles(),
            self.particle_rate
        )
    }
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("time", &self.simulated_time)
            .field("particles", &self.pool.alive_count())
            .field("max_particles", &self.pool.capacity())
            .field("launchers", &self.launchers)
            .field("particle_rate", &self.particle_rate)
            .field("dropped", &self.dropped)
            .finish_non_exhaustive()
    }
}

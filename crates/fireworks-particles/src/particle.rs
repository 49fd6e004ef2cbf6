//! Particle types: CPU simulation state and renderer vertex records

use crate::spawn::Spawner;
use crate::template::{Catalog, ColorMode, ParticleType};
use bytemuck::{Pod, Zeroable};
use fireworks_core::{ExplosionId, ParticleTypeId, TailId};
use glam::Vec3;

/// Per-second multiplier for color and size decay
const DECAY_PER_SECOND: f64 = 0.8;
/// Colors stop fading after this age (seconds)
const COLOR_FADE_AGE: f64 = 6.0;
/// Sizes stop shrinking after this age (seconds)
const SIZE_FADE_AGE: f64 = 5.0;

/// Outcome of integrating one particle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fate {
    Alive,
    /// Exceeded its maximum age; its explosion (if any) has already fired
    Expired,
}

/// CPU-side particle state (not sent to GPU)
#[derive(Debug, Clone)]
pub struct Particle {
    pub kind: ParticleTypeId,
    pub position: Vec3,
    pub velocity: Vec3,
    pub color: Vec3,
    pub size: f32,
    pub mass: f32,
    pub age: f64,
    pub max_age: f64,
    pub linear_drag: f32,
    pub quadratic_drag: f32,
    pub gravity: Vec3,
    pub color_mode: ColorMode,
    pub explosion: Option<ExplosionId>,
    pub tail: Option<TailId>,
    /// Integration steps since the last trail particle, modulo the cadence
    pub tail_counter: u32,
    pub initial_speed: f32,
    /// `1 - base color`, the distance to white
    pub color_deficit: Vec3,
    pub alive: bool,
    simulated_time: f64,
}

impl Particle {
    /// Create a particle of type `ty` at `position`, born at simulated time `now`
    pub fn new(
        now: f64,
        velocity: Vec3,
        kind: ParticleTypeId,
        ty: &ParticleType,
        position: Vec3,
    ) -> Self {
        Self {
            kind,
            position,
            velocity,
            color: ty.color,
            size: ty.size,
            mass: ty.mass,
            age: 0.0,
            max_age: ty.max_age,
            linear_drag: ty.linear_drag,
            quadratic_drag: ty.quadratic_drag,
            gravity: ty.gravity(),
            color_mode: ty.color_mode,
            explosion: ty.explosion,
            tail: ty.tail,
            tail_counter: 0,
            initial_speed: velocity.length(),
            color_deficit: Vec3::ONE - ty.color,
            alive: true,
            simulated_time: now,
        }
    }

    pub fn dead() -> Self {
        Self {
            alive: false,
            ..Self::new(0.0, Vec3::ZERO, ParticleTypeId(0), &ParticleType::default(), Vec3::ZERO)
        }
    }

    /// Simulated time this particle has been integrated up to
    pub fn simulated_time(&self) -> f64 {
        self.simulated_time
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Advance the particle to `time`.
    ///
    /// A `time` at or before the particle's own clock, or NaN, is a no-op. When the
    /// particle outlives its maximum age its explosion fires into `spawner`
    /// and [`Fate::Expired`] is returned; the caller must drop it.
    pub fn integrate<S: Spawner>(&mut self, time: f64, catalog: &mut Catalog, spawner: &mut S) -> Fate {
        if time.is_nan() || time <= self.simulated_time {
            return Fate::Alive;
        }

        let dt = time - self.simulated_time;
        self.simulated_time = time;
        let step = dt as f32;

        // Drag opposes motion on each axis, quadratic term keeps the sign
        let drag =
            -self.linear_drag * self.velocity - self.quadratic_drag * self.velocity * self.velocity.abs();
        let acceleration = self.gravity + drag / self.mass;

        self.velocity += acceleration * step;
        self.position += self.velocity * step;
        self.age += dt;

        if self.age > self.max_age {
            if let Some(explosion) = self.explosion {
                catalog.explode(explosion, self.position, spawner);
            }
            self.alive = false;
            return Fate::Expired;
        }

        let decay = DECAY_PER_SECOND.powf(dt) as f32;
        match self.color_mode {
            ColorMode::AgeFade => {
                if self.age < COLOR_FADE_AGE {
                    self.color *= decay;
                }
            }
            ColorMode::SpeedWhitening => self.color = self.speed_color(),
        }
        if self.age < SIZE_FADE_AGE {
            self.size *= decay;
        }

        self.emit_tail(catalog, spawner);
        Fate::Alive
    }

    fn speed_color(&self) -> Vec3 {
        let slowdown = if self.initial_speed > f32::EPSILON {
            1.0 - self.speed() / self.initial_speed
        } else {
            1.0
        };
        Vec3::ONE - self.color_deficit * slowdown
    }

    fn emit_tail<S: Spawner>(&mut self, catalog: &Catalog, spawner: &mut S) {
        let Some(tail) = self.tail.and_then(|id| catalog.tail(id)).copied() else {
            return;
        };
        if !tail.enabled {
            return;
        }
        if self.tail_counter == 0 {
            spawner.spawn(Vec3::ZERO, tail.kind, self.position);
        }
        self.tail_counter = (self.tail_counter + 1) % tail.cadence;
    }
}

/// Number of floats in one [`VertexRecord`]
pub const RECORD_FLOATS: usize = 12;

/// Fixed normal written for every particle
pub const PARTICLE_NORMAL: [f32; 3] = [0.0, 1.0, 0.0];
/// Fixed texture coordinate written for every particle
pub const PARTICLE_TEX_COORD: [f32; 2] = [0.5, 0.5];

/// Renderer vertex matching the point-sprite vertex layout.
/// 48 bytes: position, color, normal, texture coordinates, point size.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct VertexRecord {
    pub position: [f32; 3],  // offset 0
    pub color: [f32; 3],     // offset 3
    pub normal: [f32; 3],    // offset 6
    pub tex_coord: [f32; 2], // offset 9
    pub size: f32,           // offset 11
}

impl VertexRecord {
    pub fn from_particle(p: &Particle) -> Self {
        Self {
            position: p.position.to_array(),
            color: p.color.to_array(),
            normal: PARTICLE_NORMAL,
            tex_coord: PARTICLE_TEX_COORD,
            size: p.size,
        }
    }

    pub fn to_array(&self) -> [f32; RECORD_FLOATS] {
        bytemuck::cast(*self)
    }
}

/// Swap-remove pool for O(1) particle kill and contiguous alive iteration.
///
/// The pool never grows past the capacity it was created with.
pub struct ParticlePool {
    particles: Vec<Particle>,
    alive_count: usize,
}

impl ParticlePool {
    pub fn new(capacity: usize) -> Self {
        let mut particles = Vec::with_capacity(capacity);
        for _ in 0..capacity {
            particles.push(Particle::dead());
        }
        Self {
            particles,
            alive_count: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.particles.len()
    }

    pub fn alive_count(&self) -> usize {
        self.alive_count
    }

    pub fn is_full(&self) -> bool {
        self.alive_count >= self.particles.len()
    }

    /// Claim one slot, returning a mutable ref to initialize it.
    /// Returns None if pool is full.
    pub fn spawn(&mut self) -> Option<&mut Particle> {
        if self.is_full() {
            return None;
        }
        let idx = self.alive_count;
        self.particles[idx].alive = true;
        self.alive_count += 1;
        Some(&mut self.particles[idx])
    }

    /// Drop every particle flagged dead, returning how many were removed.
    pub fn compact(&mut self) -> usize {
        let before = self.alive_count;
        let mut i = 0;
        while i < self.alive_count {
            if !self.particles[i].alive {
                self.alive_count -= 1;
                if i < self.alive_count {
                    self.particles.swap(i, self.alive_count);
                }
                // Stay on i, the swapped-in particle needs checking
            } else {
                i += 1;
            }
        }
        before - self.alive_count
    }

    pub fn clear(&mut self) {
        for p in &mut self.particles[..self.alive_count] {
            p.alive = false;
        }
        self.alive_count = 0;
    }

    /// Access alive particles slice for reading (first `alive_count` elements)
    pub fn alive_slice(&self) -> &[Particle] {
        &self.particles[..self.alive_count]
    }

    /// Access alive particles mutably
    pub fn alive_slice_mut(&mut self) -> &mut [Particle] {
        &mut self.particles[..self.alive_count]
    }
}

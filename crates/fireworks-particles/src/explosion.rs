//! Explosions: turn one dying particle into a burst of shards

use crate::rand::{ParticleRng, RandomSource};
use crate::spawn::Spawner;
use fireworks_core::{FireworksError, ParticleTypeId, Result};
use glam::Vec3;
use std::fmt;

/// Attempts at drawing a non-degenerate direction before a shard is skipped
const MAX_DIRECTION_ATTEMPTS: usize = 8;

/// Shard factory bound to a list of particle types.
///
/// Shard `i` uses `types[i % types.len()]`. Each shard flies off in an
/// independent random direction at the nominal strength, or at a strength
/// drawn from `strength * (1 ± strength_jitter)` when the jitter is nonzero.
pub struct Explosion {
    shards: u32,
    strength: f32,
    strength_jitter: f32,
    types: Vec<ParticleTypeId>,
    rng: Box<dyn RandomSource>,
}

impl Explosion {
    pub fn new(shards: u32, strength: f32, strength_jitter: f32, types: Vec<ParticleTypeId>) -> Self {
        Self {
            shards,
            strength,
            strength_jitter,
            types,
            rng: Box::new(ParticleRng::new(0xDEAD_BEEF)),
        }
    }

    /// Replace the random source driving directions and strengths
    pub fn with_rng(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn shards(&self) -> u32 {
        self.shards
    }

    pub fn strength(&self) -> f32 {
        self.strength
    }

    pub fn strength_jitter(&self) -> f32 {
        self.strength_jitter
    }

    pub fn types(&self) -> &[ParticleTypeId] {
        &self.types
    }

    /// Slowest and fastest possible shard speed
    pub fn strength_range(&self) -> (f32, f32) {
        let spread = self.strength * self.strength_jitter;
        (self.strength - spread, self.strength + spread)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.strength.is_finite() || self.strength < 0.0 {
            return Err(FireworksError::out_of_range(
                "strength",
                0.0,
                f64::MAX,
                self.strength as f64,
            ));
        }
        if !(0.0..=1.0).contains(&self.strength_jitter) {
            return Err(FireworksError::out_of_range(
                "strength_jitter",
                0.0,
                1.0,
                self.strength_jitter as f64,
            ));
        }
        Ok(())
    }

    /// Emit the shards at `position`. Returns how many were requested.
    pub fn explode<S: Spawner>(&mut self, position: Vec3, spawner: &mut S) -> usize {
        if self.shards == 0 || self.types.is_empty() {
            return 0;
        }

        let (min_strength, max_strength) = self.strength_range();
        let mut emitted = 0;
        for i in 0..self.shards as usize {
            let Some(direction) = self.sample_direction() else {
                log::debug!("explosion shard {i} skipped: degenerate direction");
                continue;
            };
            let strength = if self.strength_jitter != 0.0 {
                self.rng.range(min_strength, max_strength)
            } else {
                self.strength
            };
            let kind = self.types[i % self.types.len()];
            spawner.spawn(direction * strength, kind, position);
            emitted += 1;
        }
        emitted
    }

    /// Uniform point in the [-1, 1] cube, normalized. Zero-length samples are
    /// redrawn.
    fn sample_direction(&mut self) -> Option<Vec3> {
        for _ in 0..MAX_DIRECTION_ATTEMPTS {
            let v = Vec3::new(
                self.rng.range(-1.0, 1.0),
                self.rng.range(-1.0, 1.0),
                self.rng.range(-1.0, 1.0),
            );
            let length = v.length();
            if length > f32::EPSILON {
                return Some(v / length);
            }
        }
        None
    }
}

impl fmt::Debug for Explosion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Explosion")
            .field("shards", &self.shards)
            .field("strength", &self.strength)
            .field("strength_jitter", &self.strength_jitter)
            .field("types", &self.types)
            .finish_non_exhaustive()
    }
}

//! Particle templates and the catalog that owns them
//!
//! Templates are built once when a show is loaded and never change afterwards.
//! Particles, launchers and explosions refer to them by handle, which lets a
//! type explode into shards of a type that explodes again (cascades) without
//! any shared ownership.

use crate::explosion::Explosion;
use crate::spawn::Spawner;
use fireworks_core::{ExplosionId, FireworksError, ParticleTypeId, Result, TailId};
use glam::Vec3;

/// Gravity applied to particle types without an override
pub const DEFAULT_GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

/// How a particle's color evolves while it is alive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Color decays exponentially toward black with age
    #[default]
    AgeFade,
    /// Color is white at launch speed and returns to the base color as the
    /// particle slows down
    SpeedWhitening,
}

/// Immutable description of a class of particle
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleType {
    pub color: Vec3,
    pub size: f32,
    pub mass: f32,
    /// Seconds of simulated time before the particle dies
    pub max_age: f64,
    pub linear_drag: f32,
    pub quadratic_drag: f32,
    /// `None` uses [`DEFAULT_GRAVITY`]
    pub gravity: Option<Vec3>,
    pub explosion: Option<ExplosionId>,
    pub tail: Option<TailId>,
    pub color_mode: ColorMode,
}

impl Default for ParticleType {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            size: 1.0,
            mass: 0.1,
            max_age: 1.0,
            linear_drag: 0.01,
            quadratic_drag: 0.01,
            gravity: None,
            explosion: None,
            tail: None,
            color_mode: ColorMode::AgeFade,
        }
    }
}

impl ParticleType {
    pub fn gravity(&self) -> Vec3 {
        self.gravity.unwrap_or(DEFAULT_GRAVITY)
    }

    /// Check the template's own values (references are checked by the catalog)
    pub fn validate(&self) -> Result<()> {
        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err(FireworksError::out_of_range(
                "mass",
                f64::MIN_POSITIVE,
                f64::MAX,
                self.mass as f64,
            ));
        }
        if !self.size.is_finite() || self.size < 0.0 {
            return Err(FireworksError::out_of_range(
                "size",
                0.0,
                f64::MAX,
                self.size as f64,
            ));
        }
        if !self.max_age.is_finite() || self.max_age < 0.0 {
            return Err(FireworksError::out_of_range(
                "max_age",
                0.0,
                f64::MAX,
                self.max_age,
            ));
        }
        for (field, value) in [
            ("linear_drag", self.linear_drag),
            ("quadratic_drag", self.quadratic_drag),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(FireworksError::out_of_range(field, 0.0, f64::MAX, value as f64));
            }
        }
        if !self.color.is_finite() {
            return Err(FireworksError::InvalidConfig(
                "particle color must be finite".into(),
            ));
        }
        if !self.gravity().is_finite() {
            return Err(FireworksError::InvalidConfig(
                "particle gravity must be finite".into(),
            ));
        }
        Ok(())
    }
}

/// Periodic trail of zero-velocity particles left behind a live particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CometTail {
    pub enabled: bool,
    /// Integration steps between two trail particles
    pub cadence: u32,
    pub kind: ParticleTypeId,
}

impl CometTail {
    pub fn new(cadence: u32, kind: ParticleTypeId) -> Self {
        Self {
            enabled: true,
            cadence,
            kind,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.cadence == 0 {
            return Err(FireworksError::out_of_range(
                "tail cadence",
                1.0,
                u32::MAX as f64,
                0.0,
            ));
        }
        Ok(())
    }
}

/// Arena of all templates used by one simulation
#[derive(Debug, Default)]
pub struct Catalog {
    types: Vec<ParticleType>,
    explosions: Vec<Explosion>,
    tails: Vec<CometTail>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a particle type. Handles are assigned in registration order.
    pub fn add_type(&mut self, particle_type: ParticleType) -> Result<ParticleTypeId> {
        particle_type.validate()?;
        let id = ParticleTypeId(self.types.len() as u32);
        self.types.push(particle_type);
        Ok(id)
    }

    pub fn add_explosion(&mut self, explosion: Explosion) -> Result<ExplosionId> {
        explosion.validate()?;
        let id = ExplosionId(self.explosions.len() as u32);
        self.explosions.push(explosion);
        Ok(id)
    }

    pub fn add_tail(&mut self, tail: CometTail) -> Result<TailId> {
        tail.validate()?;
        let id = TailId(self.tails.len() as u32);
        self.tails.push(tail);
        Ok(id)
    }

    pub fn particle_type(&self, id: ParticleTypeId) -> Option<&ParticleType> {
        self.types.get(id.index())
    }

    pub fn explosion(&self, id: ExplosionId) -> Option<&Explosion> {
        self.explosions.get(id.index())
    }

    pub fn tail(&self, id: TailId) -> Option<&CometTail> {
        self.tails.get(id.index())
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn explosion_count(&self) -> usize {
        self.explosions.len()
    }

    pub fn tail_count(&self) -> usize {
        self.tails.len()
    }

    pub fn contains_type(&self, id: ParticleTypeId) -> bool {
        id.index() < self.types.len()
    }

    /// Check that every handle stored in a template points into the arena
    pub fn validate(&self) -> Result<()> {
        for (i, ty) in self.types.iter().enumerate() {
            if let Some(explosion) = ty.explosion {
                if self.explosion(explosion).is_none() {
                    return Err(FireworksError::UnknownTemplate(format!(
                        "type#{i} references missing {explosion}"
                    )));
                }
            }
            if let Some(tail) = ty.tail {
                if self.tail(tail).is_none() {
                    return Err(FireworksError::UnknownTemplate(format!(
                        "type#{i} references missing {tail}"
                    )));
                }
            }
        }
        for (i, explosion) in self.explosions.iter().enumerate() {
            if let Some(missing) = explosion.types().iter().find(|t| !self.contains_type(**t)) {
                return Err(FireworksError::UnknownTemplate(format!(
                    "explosion#{i} references missing {missing}"
                )));
            }
        }
        for (i, tail) in self.tails.iter().enumerate() {
            if !self.contains_type(tail.kind) {
                return Err(FireworksError::UnknownTemplate(format!(
                    "tail#{i} references missing {}",
                    tail.kind
                )));
            }
        }
        Ok(())
    }

    /// Run an explosion at `position`, returning the number of shards requested
    pub fn explode<S: Spawner>(&mut self, id: ExplosionId, position: Vec3, spawner: &mut S) -> usize {
        match self.explosions.get_mut(id.index()) {
            Some(explosion) => explosion.explode(position, spawner),
            None => 0,
        }
    }
}

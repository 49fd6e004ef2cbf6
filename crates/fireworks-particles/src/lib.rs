//! Fireworks Particles - the firework simulation core
//!
//! Provides a time-stepped particle simulation with:
//! - Drag, gravity, aging, and color/size decay per particle
//! - Explosions that turn dying particles into shards, cascading through
//!   shard types that explode again
//! - Comet tails trailing stationary particles behind live ones
//! - Launchers firing on timers, once, in rings, or on demand
//! - A hard particle ceiling so the renderer's vertex buffer never overflows
//! - Vertex record packing for the point-sprite renderer

pub mod explosion;
pub mod launcher;
pub mod particle;
pub mod rand;
pub mod shared;
pub mod show;
pub mod simulation;
pub mod spawn;
pub mod template;

pub use explosion::Explosion;
pub use launcher::{Launcher, LauncherState, RingShot};
pub use particle::{Fate, Particle, ParticlePool, VertexRecord, RECORD_FLOATS};
pub use rand::{ParticleRng, RandomSource};
pub use shared::SharedSimulation;
pub use show::{ShowFile, BUILTIN_SHOW};
pub use simulation::{Simulation, SimulationConfig, StepReport, MAX_VERTICES};
pub use spawn::{SpawnQueue, SpawnRequest, Spawner};
pub use template::{Catalog, ColorMode, CometTail, ParticleType, DEFAULT_GRAVITY};

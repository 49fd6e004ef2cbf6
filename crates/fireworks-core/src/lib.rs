//! Fireworks Core - Foundational types for the fireworks engine
//!
//! This crate provides the types that all other fireworks crates depend on:
//! - `ParticleTypeId`, `ExplosionId`, `TailId` - typed handles into the template catalog
//! - Error types and Result alias

mod error;
mod id;

pub use error::{FireworksError, Result};
pub use id::{ExplosionId, ParticleTypeId, TailId};

//! Deferred particle creation
//!
//! Explosions, comet tails and launchers never touch the particle pool
//! directly. They push requests through a [`Spawner`]; the simulation drains
//! the queue once the particles currently being integrated are settled, so a
//! particle born mid-step never gets integrated in the step that created it.

use fireworks_core::ParticleTypeId;
use glam::Vec3;

/// One pending particle: launch velocity, template and spawn point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    pub velocity: Vec3,
    pub kind: ParticleTypeId,
    pub position: Vec3,
}

/// Sink for newly requested particles
pub trait Spawner {
    fn spawn(&mut self, velocity: Vec3, kind: ParticleTypeId, position: Vec3);
}

/// FIFO of spawn requests collected during a simulation step
#[derive(Debug, Default)]
pub struct SpawnQueue {
    requests: Vec<SpawnRequest>,
}

impl SpawnQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn requests(&self) -> &[SpawnRequest] {
        &self.requests
    }

    /// Take all pending requests in the order they were pushed
    pub fn drain(&mut self) -> std::vec::Drain<'_, SpawnRequest> {
        self.requests.drain(..)
    }

    pub fn clear(&mut self) {
        self.requests.clear();
    }
}

impl Spawner for SpawnQueue {
    fn spawn(&mut self, velocity: Vec3, kind: ParticleTypeId, position: Vec3) {
        self.requests.push(SpawnRequest {
            velocity,
            kind,
            position,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_preserves_order() {
        let mut queue = SpawnQueue::new();
        queue.spawn(Vec3::X, ParticleTypeId(0), Vec3::ZERO);
        queue.spawn(Vec3::Y, ParticleTypeId(1), Vec3::ONE);
        assert_eq!(queue.len(), 2);

        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(drained[0].kind, ParticleTypeId(0));
        assert_eq!(drained[1].position, Vec3::ONE);
        assert!(queue.is_empty());
    }
}

//! Launchers: stationary particle sources firing on a timer or once

use crate::rand::{ParticleRng, RandomSource};
use crate::spawn::Spawner;
use crate::template::Catalog;
use fireworks_core::{FireworksError, ParticleTypeId, Result};
use glam::Vec3;
use std::fmt;

/// Simultaneous ring of shots spread evenly around the vertical axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingShot {
    pub shots: u32,
    /// Horizontal speed added to the base velocity of every shot
    pub lateral_speed: f32,
}

/// Where a launcher is in its firing lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LauncherState {
    /// Has not fired yet
    Idle,
    /// Single-shot launcher that already fired; it never fires again
    FiredOnce,
    /// Interval launcher that has fired at least once
    Armed,
}

/// A particle source at a fixed position.
///
/// With an interval it fires a batch every time more than `interval` seconds
/// have passed since the last batch. Without one it fires a single particle on
/// its first frame and then stays silent.
pub struct Launcher {
    pub name: String,
    pub position: Vec3,
    pub interval: Option<f64>,
    pub kind: ParticleTypeId,
    /// Base launch velocity before jitter
    pub velocity: Vec3,
    /// Width of the square of horizontal velocity jitter
    pub jitter: f32,
    pub ring: Option<RingShot>,
    pub particles_per_launch: u32,
    /// Selectable by the operator for manual firing
    pub manual: bool,
    last_fire_time: f64,
    has_fired: bool,
    rng: Box<dyn RandomSource>,
}

impl Launcher {
    pub fn new(position: Vec3, kind: ParticleTypeId, velocity: Vec3) -> Self {
        Self {
            name: String::from("launcher"),
            position,
            interval: None,
            kind,
            velocity,
            jitter: 0.0,
            ring: None,
            particles_per_launch: 1,
            manual: false,
            last_fire_time: 0.0,
            has_fired: false,
            rng: Box::new(ParticleRng::new(0xDEAD_BEEF)),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn interval(mut self, seconds: f64) -> Self {
        self.interval = Some(seconds);
        self
    }

    pub fn jitter(mut self, jitter: f32) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn ring(mut self, shots: u32, lateral_speed: f32) -> Self {
        self.ring = Some(RingShot {
            shots,
            lateral_speed,
        });
        self
    }

    pub fn particles_per_launch(mut self, count: u32) -> Self {
        self.particles_per_launch = count;
        self
    }

    pub fn manual(mut self, manual: bool) -> Self {
        self.manual = manual;
        self
    }

    /// Replace the random source used for launch jitter
    pub fn with_rng(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn has_fired(&self) -> bool {
        self.has_fired
    }

    pub fn last_fire_time(&self) -> f64 {
        self.last_fire_time
    }

    pub fn state(&self) -> LauncherState {
        match (self.interval, self.has_fired) {
            (_, false) => LauncherState::Idle,
            (None, true) => LauncherState::FiredOnce,
            (Some(_), true) => LauncherState::Armed,
        }
    }

    /// Check parameters and that the fired type exists in `catalog`
    pub fn validate(&self, catalog: &Catalog) -> Result<()> {
        if !catalog.contains_type(self.kind) {
            return Err(FireworksError::UnknownTemplate(format!(
                "launcher '{}' fires missing {}",
                self.name, self.kind
            )));
        }
        if let Some(interval) = self.interval {
            if !interval.is_finite() || interval < 0.0 {
                return Err(FireworksError::out_of_range("interval", 0.0, f64::MAX, interval));
            }
        }
        if !self.jitter.is_finite() || self.jitter < 0.0 {
            return Err(FireworksError::out_of_range(
                "jitter",
                0.0,
                f64::MAX,
                self.jitter as f64,
            ));
        }
        if self.particles_per_launch == 0 {
            return Err(FireworksError::out_of_range(
                "particles_per_launch",
                1.0,
                u32::MAX as f64,
                0.0,
            ));
        }
        if let Some(ring) = self.ring {
            if ring.shots == 0 {
                return Err(FireworksError::out_of_range(
                    "ring shots",
                    1.0,
                    u32::MAX as f64,
                    0.0,
                ));
            }
        }
        if !self.position.is_finite() || !self.velocity.is_finite() {
            return Err(FireworksError::InvalidConfig(format!(
                "launcher '{}' has a non-finite position or velocity",
                self.name
            )));
        }
        Ok(())
    }

    /// Fire whatever is due at simulated time `time`. Returns particles fired.
    pub fn handle_frame<S: Spawner>(&mut self, time: f64, spawner: &mut S) -> usize {
        let Some(interval) = self.interval else {
            if self.has_fired {
                return 0;
            }
            self.fire(spawner);
            return 1;
        };

        if time - self.last_fire_time <= interval {
            return 0;
        }
        self.last_fire_time = time;

        match self.ring {
            Some(ring) => self.ring_shot(ring, spawner),
            None => {
                for _ in 0..self.particles_per_launch {
                    self.fire(spawner);
                }
                self.particles_per_launch as usize
            }
        }
    }

    /// Fire one particle with horizontal jitter, ignoring the timer.
    pub fn fire<S: Spawner>(&mut self, spawner: &mut S) {
        let half = self.jitter / 2.0;
        let offset_x = self.rng.range(-half, half);
        let offset_z = self.rng.range(-half, half);
        self.has_fired = true;

        let velocity = self.velocity + Vec3::new(offset_x, 0.0, offset_z);
        log::trace!("launcher '{}' fired {}", self.name, self.kind);
        spawner.spawn(velocity, self.kind, self.position);
    }

    /// Fire `ring.shots` particles at angles 0°, 360°/n, 2·360°/n, ...
    fn ring_shot<S: Spawner>(&mut self, ring: RingShot, spawner: &mut S) -> usize {
        let step = 360.0 / ring.shots as f32;
        for shot in 0..ring.shots {
            let angle = (shot as f32 * step).to_radians();
            let offset = Vec3::new(angle.cos(), 0.0, angle.sin()) * ring.lateral_speed;
            spawner.spawn(self.velocity + offset, self.kind, self.position);
        }
        self.has_fired = true;
        log::trace!("launcher '{}' fired a ring of {}", self.name, ring.shots);
        ring.shots as usize
    }
}

impl fmt::Debug for Launcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Launcher")
            .field("name", &self.name)
            .field("position", &self.position)
            .field("interval", &self.interval)
            .field("kind", &self.kind)
            .field("velocity", &self.velocity)
            .field("ring", &self.ring)
            .field("particles_per_launch", &self.particles_per_launch)
            .field("manual", &self.manual)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spawn::SpawnQueue;
    use crate::template::ParticleType;

    #[test]
    fn single_shot_fires_exactly_once() {
        let mut launcher = Launcher::new(Vec3::ZERO, ParticleTypeId(0), Vec3::Y);
        let mut queue = SpawnQueue::new();
        assert_eq!(launcher.state(), LauncherState::Idle);

        let fired: usize = (0..50)
            .map(|i| launcher.handle_frame(i as f64 * 0.5, &mut queue))
            .sum();
        assert_eq!(fired, 1);
        assert_eq!(queue.len(), 1);
        assert_eq!(launcher.state(), LauncherState::FiredOnce);
    }

    #[test]
    fn single_shot_ignores_ring_and_batch_size() {
        let mut launcher = Launcher::new(Vec3::ZERO, ParticleTypeId(0), Vec3::Y)
            .ring(8, 1.0)
            .particles_per_launch(5);
        let mut queue = SpawnQueue::new();
        launcher.handle_frame(1.0, &mut queue);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn interval_launcher_fires_batches() {
        let mut launcher = Launcher::new(Vec3::new(0.0, -1.0, 0.0), ParticleTypeId(3), Vec3::Y)
            .interval(1.0)
            .particles_per_launch(4);
        let mut queue = SpawnQueue::new();

        assert_eq!(launcher.handle_frame(0.5, &mut queue), 0);
        assert_eq!(launcher.handle_frame(1.0, &mut queue), 0);
        assert_eq!(launcher.handle_frame(1.01, &mut queue), 4);
        assert_eq!(launcher.last_fire_time(), 1.01);
        assert_eq!(launcher.handle_frame(2.0, &mut queue), 0);
        assert_eq!(launcher.handle_frame(2.5, &mut queue), 4);
        assert_eq!(queue.len(), 8);
        assert_eq!(launcher.state(), LauncherState::Armed);
        assert!(queue.requests().iter().all(|r| r.position == Vec3::new(0.0, -1.0, 0.0)));
    }

    #[test]
    fn jitter_stays_within_square() {
        let base = Vec3::new(0.0, 10.0, 0.0);
        let mut launcher = Launcher::new(Vec3::ZERO, ParticleTypeId(0), base)
            .jitter(2.0)
            .with_rng(ParticleRng::new(11));
        let mut queue = SpawnQueue::new();
        for _ in 0..200 {
            launcher.fire(&mut queue);
        }
        for r in queue.requests() {
            let offset = r.velocity - base;
            assert!(offset.x.abs() <= 1.0);
            assert!(offset.z.abs() <= 1.0);
            assert_eq!(offset.y, 0.0);
        }
    }

    #[test]
    fn ring_angles_are_even() {
        let base = Vec3::new(0.0, 5.0, 0.0);
        let mut launcher = Launcher::new(Vec3::ZERO, ParticleTypeId(0), base)
            .interval(0.1)
            .ring(6, 2.0);
        let mut queue = SpawnQueue::new();

        assert_eq!(launcher.handle_frame(1.0, &mut queue), 6);
        assert_eq!(queue.len(), 6);
        for (i, r) in queue.requests().iter().enumerate() {
            let offset = r.velocity - base;
            assert!((offset.length() - 2.0).abs() < 1e-4);
            let degrees = offset.z.atan2(offset.x).to_degrees().rem_euclid(360.0);
            let expected = i as f32 * 60.0;
            let diff = (degrees - expected).abs();
            assert!(diff < 1e-2 || (360.0 - diff) < 1e-2, "shot {i} at {degrees}");
        }
    }

    #[test]
    fn manual_fire_bypasses_interval() {
        let mut launcher = Launcher::new(Vec3::ZERO, ParticleTypeId(0), Vec3::Y).interval(100.0);
        let mut queue = SpawnQueue::new();
        launcher.fire(&mut queue);
        launcher.fire(&mut queue);
        assert_eq!(queue.len(), 2);
        assert_eq!(launcher.last_fire_time(), 0.0);
    }

    #[test]
    fn manual_fire_consumes_single_shot() {
        let mut launcher = Launcher::new(Vec3::ZERO, ParticleTypeId(0), Vec3::Y);
        let mut queue = SpawnQueue::new();
        launcher.fire(&mut queue);
        assert_eq!(launcher.handle_frame(1.0, &mut queue), 0);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn validation_catches_bad_parameters() {
        let mut catalog = Catalog::new();
        let kind = catalog.add_type(ParticleType::default()).unwrap();

        assert!(Launcher::new(Vec3::ZERO, kind, Vec3::Y).validate(&catalog).is_ok());
        assert!(Launcher::new(Vec3::ZERO, ParticleTypeId(9), Vec3::Y)
            .validate(&catalog)
            .is_err());
        assert!(Launcher::new(Vec3::ZERO, kind, Vec3::Y)
            .particles_per_launch(0)
            .validate(&catalog)
            .is_err());
        assert!(Launcher::new(Vec3::ZERO, kind, Vec3::Y)
            .ring(0, 1.0)
            .validate(&catalog)
            .is_err());
        assert!(Launcher::new(Vec3::ZERO, kind, Vec3::Y)
            .jitter(-1.0)
            .validate(&catalog)
            .is_err());
    }
}

//! Show files: TOML descriptions of a whole fireworks programme
//!
//! A show names its particle types, explosions and tails, and lists its
//! launchers in firing order. Names are resolved into catalog handles when the
//! show is built, so templates may reference each other in any order.

use crate::explosion::Explosion;
use crate::launcher::Launcher;
use crate::rand::ParticleRng;
use crate::simulation::{Simulation, SimulationConfig};
use crate::template::{Catalog, ColorMode, CometTail, ParticleType};
use fireworks_core::{ExplosionId, FireworksError, ParticleTypeId, Result, TailId};
use glam::Vec3;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

/// The show that ships with the engine
pub const BUILTIN_SHOW: &str = include_str!("../shows/default.toml");

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShowFile {
    #[serde(default)]
    pub simulation: SimulationSection,
    #[serde(default)]
    pub particle_types: BTreeMap<String, ParticleTypeDef>,
    #[serde(default)]
    pub explosions: BTreeMap<String, ExplosionDef>,
    #[serde(default)]
    pub tails: BTreeMap<String, TailDef>,
    #[serde(default)]
    pub launchers: Vec<LauncherDef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationSection {
    pub max_particles: usize,
    pub particle_rate: f64,
    /// Seeds every explosion's and launcher's random stream
    pub seed: u32,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            max_particles: 10000,
            particle_rate: 1000.0,
            seed: 0xDEAD_BEEF,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParticleTypeDef {
    pub color: [f32; 3],
    pub size: f32,
    pub mass: f32,
    pub max_age: f64,
    pub linear_drag: f32,
    pub quadratic_drag: f32,
    pub gravity: Option<[f32; 3]>,
    pub speed_color: bool,
    pub explosion: Option<String>,
    pub tail: Option<String>,
}

impl Default for ParticleTypeDef {
    fn default() -> Self {
        let base = ParticleType::default();
        Self {
            color: base.color.to_array(),
            size: base.size,
            mass: base.mass,
            max_age: base.max_age,
            linear_drag: base.linear_drag,
            quadratic_drag: base.quadratic_drag,
            gravity: None,
            speed_color: false,
            explosion: None,
            tail: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExplosionDef {
    pub shards: u32,
    pub strength: f32,
    #[serde(default)]
    pub strength_jitter: f32,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TailDef {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_cadence")]
    pub cadence: u32,
    pub particle: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LauncherDef {
    pub name: Option<String>,
    #[serde(default)]
    pub position: [f32; 3],
    pub interval: Option<f64>,
    pub particle: String,
    pub velocity: [f32; 3],
    #[serde(default)]
    pub jitter: f32,
    pub ring_shots: Option<u32>,
    #[serde(default)]
    pub ring_speed: f32,
    #[serde(default = "default_particles_per_launch")]
    pub particles_per_launch: u32,
    #[serde(default)]
    pub manual: bool,
}

fn default_true() -> bool {
    true
}

fn default_cadence() -> u32 {
    1
}

fn default_particles_per_launch() -> u32 {
    1
}

impl ShowFile {
    pub fn parse(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        let show = Self::parse(&source)?;
        log::info!(
            "loaded show {} ({} type(s), {} launcher(s))",
            path.as_ref().display(),
            show.particle_types.len(),
            show.launchers.len()
        );
        Ok(show)
    }

    pub fn builtin() -> Result<Self> {
        Self::parse(BUILTIN_SHOW)
    }

    /// Display name of launcher `index`
    pub fn launcher_name(&self, index: usize) -> String {
        self.launchers
            .get(index)
            .and_then(|l| l.name.clone())
            .unwrap_or_else(|| format!("launcher-{index}"))
    }

    /// Resolve every name and build a ready-to-run simulation
    pub fn build(&self, start_time: f64) -> Result<Simulation> {
        let type_ids: HashMap<&str, ParticleTypeId> = self
            .particle_types
            .keys()
            .enumerate()
            .map(|(i, name)| (name.as_str(), ParticleTypeId(i as u32)))
            .collect();
        let explosion_ids: HashMap<&str, ExplosionId> = self
            .explosions
            .keys()
            .enumerate()
            .map(|(i, name)| (name.as_str(), ExplosionId(i as u32)))
            .collect();
        let tail_ids: HashMap<&str, TailId> = self
            .tails
            .keys()
            .enumerate()
            .map(|(i, name)| (name.as_str(), TailId(i as u32)))
            .collect();

        let seed = self.simulation.seed;
        let mut catalog = Catalog::new();

        for (name, def) in &self.particle_types {
            let explosion = def
                .explosion
                .as_deref()
                .map(|e| lookup(&explosion_ids, "explosion", e))
                .transpose()?;
            let tail = def
                .tail
                .as_deref()
                .map(|t| lookup(&tail_ids, "tail", t))
                .transpose()?;
            let ty = ParticleType {
                color: Vec3::from_array(def.color),
                size: def.size,
                mass: def.mass,
                max_age: def.max_age,
                linear_drag: def.linear_drag,
                quadratic_drag: def.quadratic_drag,
                gravity: def.gravity.map(Vec3::from_array),
                explosion,
                tail,
                color_mode: if def.speed_color {
                    ColorMode::SpeedWhitening
                } else {
                    ColorMode::AgeFade
                },
            };
            catalog
                .add_type(ty)
                .map_err(|e| in_template("particle type", name, e))?;
        }

        for (i, (name, def)) in self.explosions.iter().enumerate() {
            let types = def
                .types
                .iter()
                .map(|t| lookup(&type_ids, "particle type", t))
                .collect::<Result<Vec<_>>>()?;
            let explosion = Explosion::new(def.shards, def.strength, def.strength_jitter, types)
                .with_rng(ParticleRng::derived(seed, i as u32));
            catalog
                .add_explosion(explosion)
                .map_err(|e| in_template("explosion", name, e))?;
        }

        for (name, def) in &self.tails {
            let tail = CometTail {
                enabled: def.enabled,
                cadence: def.cadence,
                kind: lookup(&type_ids, "particle type", &def.particle)?,
            };
            catalog
                .add_tail(tail)
                .map_err(|e| in_template("tail", name, e))?;
        }

        let mut simulation = Simulation::new(
            SimulationConfig {
                start_time,
                particle_rate: self.simulation.particle_rate,
                max_particles: self.simulation.max_particles,
            },
            catalog,
        )?;

        let mut seen = HashSet::new();
        for (i, def) in self.launchers.iter().enumerate() {
            let name = self.launcher_name(i);
            if !seen.insert(name.clone()) {
                return Err(FireworksError::DuplicateName(name));
            }
            let mut launcher = Launcher::new(
                Vec3::from_array(def.position),
                lookup(&type_ids, "particle type", &def.particle)?,
                Vec3::from_array(def.velocity),
            )
            .named(name.clone())
            .jitter(def.jitter)
            .particles_per_launch(def.particles_per_launch)
            .manual(def.manual)
            .with_rng(ParticleRng::derived(seed.rotate_left(16), i as u32));
            if let Some(interval) = def.interval {
                launcher = launcher.interval(interval);
            }
            if let Some(shots) = def.ring_shots {
                launcher = launcher.ring(shots, def.ring_speed);
            }
            simulation
                .add_launcher(launcher)
                .map_err(|e| in_template("launcher", &name, e))?;
        }

        log::info!(
            "show ready: {} launcher(s), capacity {}",
            simulation.launcher_count(),
            simulation.max_particles()
        );
        Ok(simulation)
    }
}

fn lookup<T: Copy>(ids: &HashMap<&str, T>, what: &str, name: &str) -> Result<T> {
    ids.get(name)
        .copied()
        .ok_or_else(|| FireworksError::UnknownTemplate(format!("{what} '{name}'")))
}

/// Prefix a validation error with the template it came from
fn in_template(what: &str, name: &str, err: FireworksError) -> FireworksError {
    match err {
        FireworksError::ValueOutOfRange {
            field,
            min,
            max,
            value,
        } => FireworksError::ValueOutOfRange {
            field: format!("{what} '{name}': {field}"),
            min,
            max,
            value,
        },
        FireworksError::InvalidConfig(msg) => {
            FireworksError::InvalidConfig(format!("{what} '{name}': {msg}"))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::RECORD_FLOATS;
    use crate::simulation::MAX_VERTICES;

    #[test]
    fn builtin_show_parses_and_builds() {
        let show = ShowFile::builtin().unwrap();
        assert_eq!(show.launchers.len(), 7);
        assert_eq!(show.simulation.max_particles, 10000);

        let sim = show.build(0.0).unwrap();
        assert_eq!(sim.launcher_count(), 7);
        assert_eq!(sim.manual_launchers(), vec![2, 3, 4, 5, 6]);
        assert_eq!(sim.catalog().explosion_count(), 6);
    }

    #[test]
    fn builtin_show_stays_within_capacity() {
        let mut sim = ShowFile::builtin().unwrap().build(0.0).unwrap();
        let mut buffer = vec![0.0f32; MAX_VERTICES * RECORD_FLOATS];
        let mut peak = 0;
        for frame in 1..=(60 * 14) {
            sim.advance(frame as f64 / 60.0);
            let drawn = sim.fill_buffer(&mut buffer);
            assert!(drawn <= sim.max_particles());
            assert_eq!(drawn, sim.particle_count());
            peak = peak.max(drawn);
        }
        // huge shells alone produce 1650 shards each
        assert!(peak > 1000);
    }

    #[test]
    fn builtin_show_is_reproducible() {
        let show = ShowFile::builtin().unwrap();
        let mut a = show.build(0.0).unwrap();
        let mut b = show.build(0.0).unwrap();
        for frame in 1..=120 {
            a.advance(frame as f64 / 30.0);
            b.advance(frame as f64 / 30.0);
        }
        assert_eq!(a.particle_count(), b.particle_count());
        let pa: Vec<_> = a.particles().iter().map(|p| p.position).collect();
        let pb: Vec<_> = b.particles().iter().map(|p| p.position).collect();
        assert_eq!(pa, pb);
    }

    #[test]
    fn minimal_show_with_defaults() {
        let show = ShowFile::parse(
            r#"
[particle_types.spark]
max_age = 2.0

[[launchers]]
particle = "spark"
velocity = [0, 10, 0]
"#,
        )
        .unwrap();
        let def = &show.particle_types["spark"];
        assert!((def.mass - 0.1).abs() < 1e-6);
        assert!(def.gravity.is_none());
        assert_eq!(show.launchers[0].particles_per_launch, 1);
        assert_eq!(show.launcher_name(0), "launcher-0");

        let mut sim = show.build(0.0).unwrap();
        sim.advance(0.1);
        assert_eq!(sim.particle_count(), 1);
        assert!((sim.particles()[0].velocity.y - 10.0).abs() < 1.0);
    }

    #[test]
    fn integer_values_coerce_to_floats() {
        let show = ShowFile::parse(
            r#"
[particle_types.spark]
gravity = [0, -10, 0]
size = 3
"#,
        )
        .unwrap();
        let def = &show.particle_types["spark"];
        assert_eq!(def.gravity, Some([0.0, -10.0, 0.0]));
        assert_eq!(def.size, 3.0);
    }

    #[test]
    fn ring_launcher_from_toml() {
        let show = ShowFile::parse(
            r#"
[particle_types.star]
max_age = 5.0

[[launchers]]
name = "crown"
interval = 1.0
particle = "star"
velocity = [0.0, 8.0, 0.0]
ring_shots = 12
ring_speed = 3.0
"#,
        )
        .unwrap();
        let mut sim = show.build(0.0).unwrap();
        sim.advance(1.5);
        assert_eq!(sim.particle_count(), 12);
    }

    #[test]
    fn unknown_names_are_errors() {
        let show = ShowFile::parse(
            r#"
[particle_types.shell]
explosion = "nope"
"#,
        )
        .unwrap();
        let err = show.build(0.0).unwrap_err();
        assert!(matches!(err, FireworksError::UnknownTemplate(_)));
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn zero_mass_names_the_template() {
        let show = ShowFile::parse(
            r#"
[particle_types.brick]
mass = 0.0
"#,
        )
        .unwrap();
        let err = show.build(0.0).unwrap_err();
        assert!(err.to_string().contains("brick"));
    }

    #[test]
    fn duplicate_launcher_names_are_errors() {
        let show = ShowFile::parse(
            r#"
[particle_types.spark]

[[launchers]]
name = "a"
particle = "spark"
velocity = [0.0, 1.0, 0.0]

[[launchers]]
name = "a"
particle = "spark"
velocity = [0.0, 1.0, 0.0]
"#,
        )
        .unwrap();
        assert!(matches!(
            show.build(0.0),
            Err(FireworksError::DuplicateName(_))
        ));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(ShowFile::parse("[simulation]\nmax_particle = 5\n").is_err());
    }
}

//! Show description command

use super::load_show;
use anyhow::Result;
use fireworks_particles::show::LauncherDef;

pub fn run(path: Option<&str>) -> Result<()> {
    let show = load_show(path)?;

    println!("Show: {}", path.unwrap_or("<built-in>"));
    println!(
        "Simulation: max_particles={}, rate={:.0}, seed={}",
        show.simulation.max_particles, show.simulation.particle_rate, show.simulation.seed
    );

    println!();
    println!("Particle types:");
    for (name, def) in &show.particle_types {
        let mut extras = Vec::new();
        if def.speed_color {
            extras.push("speed color".to_string());
        }
        if let Some(explosion) = &def.explosion {
            extras.push(format!("explodes: {explosion}"));
        }
        if let Some(tail) = &def.tail {
            extras.push(format!("tail: {tail}"));
        }
        let extras = if extras.is_empty() {
            String::new()
        } else {
            format!(" [{}]", extras.join(", "))
        };
        println!(
            "  {name:<18} size={:<5} mass={:<4} max_age={}s{extras}",
            def.size, def.mass, def.max_age
        );
    }

    println!();
    println!("Explosions:");
    for (name, def) in &show.explosions {
        println!(
            "  {name:<18} {} shard(s) at {}±{:.0}% -> {}",
            def.shards,
            def.strength,
            def.strength_jitter * 100.0,
            def.types.join(", ")
        );
    }

    if !show.tails.is_empty() {
        println!();
        println!("Tails:");
        for (name, def) in &show.tails {
            let state = if def.enabled { "" } else { " (disabled)" };
            println!(
                "  {name:<18} every {} step(s) -> {}{state}",
                def.cadence, def.particle
            );
        }
    }

    println!();
    println!("Launchers (fire order):");
    let mut manual_slot = 0;
    for (i, def) in show.launchers.iter().enumerate() {
        let selection = if def.manual {
            manual_slot += 1;
            format!(" [manual #{}]", manual_slot - 1)
        } else {
            String::new()
        };
        println!(
            "  {i:>2} {:<18} {}{selection}",
            show.launcher_name(i),
            describe_launch(def)
        );
    }

    Ok(())
}

fn describe_launch(def: &LauncherDef) -> String {
    let timing = match def.interval {
        Some(interval) => format!("every {interval}s"),
        None => "once".to_string(),
    };
    let batch = match def.ring_shots {
        Some(shots) => format!("ring of {shots}"),
        None => format!("{} x", def.particles_per_launch),
    };
    format!("{timing}, {batch} {}", def.particle)
}

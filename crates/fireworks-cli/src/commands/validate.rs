//! Show validation command

use super::load_show;
use anyhow::{Context, Result};

pub fn run(path: &str) -> Result<()> {
    let show = load_show(Some(path))?;
    let sim = show
        .build(0.0)
        .with_context(|| format!("Show {path} is invalid"))?;

    println!("Show {path} is valid:");
    println!("  particle types: {}", sim.catalog().type_count());
    println!("  explosions:     {}", sim.catalog().explosion_count());
    println!("  tails:          {}", sim.catalog().tail_count());
    println!(
        "  launchers:      {} ({} manual)",
        sim.launcher_count(),
        sim.manual_launchers().len()
    );
    println!("  capacity:       {}", sim.max_particles());
    Ok(())
}

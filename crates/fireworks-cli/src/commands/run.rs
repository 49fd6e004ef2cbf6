//! Headless show runner

use super::load_show;
use anyhow::{bail, Context, Result};
use fireworks_particles::{SharedSimulation, MAX_VERTICES, RECORD_FLOATS};
use fireworks_runtime::{ControlEvent, ControlOutcome, Controller, EventBus, LauncherSelector, SimClock};

/// A manual launch requested from the command line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledFire {
    pub at: f64,
    pub launcher: usize,
}

/// Parse `TIME:INDEX`, e.g. `2.5:3`
pub fn parse_scheduled_fire(value: &str) -> std::result::Result<ScheduledFire, String> {
    let (at, launcher) = value
        .split_once(':')
        .ok_or_else(|| format!("expected TIME:INDEX, got '{value}'"))?;
    let at: f64 = at
        .trim()
        .parse()
        .map_err(|_| format!("invalid time '{at}'"))?;
    if !at.is_finite() || at < 0.0 {
        return Err(format!("time must be a non-negative number, got {at}"));
    }
    let launcher = launcher
        .trim()
        .parse()
        .map_err(|_| format!("invalid launcher index '{launcher}'"))?;
    Ok(ScheduledFire { at, launcher })
}

pub struct RunArgs {
    pub show: Option<String>,
    pub seconds: f64,
    pub fps: f64,
    pub particles: Option<usize>,
    pub rate: Option<f64>,
    pub seed: Option<u32>,
    pub fire: Vec<ScheduledFire>,
    pub report_every: f64,
}

#[derive(Debug, Default)]
struct RunSummary {
    frames: u64,
    peak_particles: usize,
    fired: usize,
    rejected: usize,
}

pub fn run(args: RunArgs) -> Result<()> {
    if !(args.fps.is_finite() && args.fps > 0.0) {
        bail!("--fps must be a positive number, got {}", args.fps);
    }
    if !(args.seconds.is_finite() && args.seconds >= 0.0) {
        bail!("--seconds must be a non-negative number, got {}", args.seconds);
    }

    let mut show = load_show(args.show.as_deref())?;
    if let Some(particles) = args.particles {
        if particles > MAX_VERTICES {
            log::warn!("--particles {particles} exceeds the vertex buffer, using {MAX_VERTICES}");
        }
        show.simulation.max_particles = particles.min(MAX_VERTICES);
    }
    if let Some(rate) = args.rate {
        show.simulation.particle_rate = rate;
    }
    if let Some(seed) = args.seed {
        show.simulation.seed = seed;
    }

    let simulation = show.build(0.0).context("Failed to build simulation")?;
    let selector = LauncherSelector::from_simulation(&simulation);
    let shared = SharedSimulation::new(simulation);
    let mut controller = Controller::new(selector);
    let mut bus = EventBus::new();

    for fire in &args.fire {
        bus.schedule(fire.at, ControlEvent::Fire(fire.launcher));
    }

    let dt = 1.0 / args.fps;
    let frames = (args.seconds * args.fps).ceil() as u64;
    let mut clock = SimClock::new();
    let mut buffer = vec![0.0f32; MAX_VERTICES * RECORD_FLOATS];
    let mut summary = RunSummary::default();
    let mut next_report = args.report_every;

    log::info!("running {frames} frame(s) at {} fps", args.fps);

    for _ in 0..frames {
        let now = clock.step(dt);

        for outcome in bus.dispatch(now, &mut controller, &shared) {
            match outcome {
                ControlOutcome::Fired { launcher } => {
                    log::info!("t={now:.2}s fired launcher {launcher}");
                    summary.fired += 1;
                }
                ControlOutcome::FireRejected { .. } => summary.rejected += 1,
                _ => {}
            }
        }

        let drawn = shared.frame(now, &mut buffer);
        summary.frames += 1;
        summary.peak_particles = summary.peak_particles.max(drawn);

        if args.report_every > 0.0 && now >= next_report {
            println!("t={now:>6.2}s {}", shared.with(|sim| sim.status_line()));
            next_report += args.report_every;
        }
    }

    let (live, dropped, max) = shared.with(|sim| (sim.particle_count(), sim.dropped(), sim.max_particles()));
    println!(
        "Ran {} frame(s), {:.2}s simulated: {live} live, peak {} of {max}, {dropped} dropped",
        summary.frames,
        clock.now(),
        summary.peak_particles
    );
    if summary.fired > 0 || summary.rejected > 0 {
        println!("Manual launches: {} fired, {} rejected", summary.fired, summary.rejected);
    }
    Ok(())
}

//! Operator control surface: launcher selection and command dispatch

use crate::event::ControlEvent;
use fireworks_particles::{SharedSimulation, Simulation};

/// Factor applied to the particle-rate knob per RateUp/RateDown
pub const RATE_STEP: f64 = 1.1;

/// The launcher the operator currently has selected.
///
/// Holds the simulation indices of the manual launchers and a cursor into
/// them; the simulation itself keeps no selection state.
#[derive(Debug, Clone, Default)]
pub struct LauncherSelector {
    launchers: Vec<usize>,
    cursor: usize,
}

impl LauncherSelector {
    pub fn new(launchers: Vec<usize>) -> Self {
        Self {
            launchers,
            cursor: 0,
        }
    }

    /// Select among the simulation's manual launchers
    pub fn from_simulation(simulation: &Simulation) -> Self {
        Self::new(simulation.manual_launchers())
    }

    pub fn len(&self) -> usize {
        self.launchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.launchers.is_empty()
    }

    /// Position of the selection within the manual list
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Simulation index of the selected launcher
    pub fn selected_launcher(&self) -> Option<usize> {
        self.launchers.get(self.cursor).copied()
    }

    pub fn next(&mut self) -> Option<usize> {
        if !self.launchers.is_empty() {
            self.cursor = (self.cursor + 1) % self.launchers.len();
        }
        self.selected_launcher()
    }

    pub fn previous(&mut self) -> Option<usize> {
        if !self.launchers.is_empty() {
            let n = self.launchers.len();
            self.cursor = (self.cursor + n - 1) % n;
        }
        self.selected_launcher()
    }
}

/// What a single control event did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlOutcome {
    Selected { launcher: usize },
    Fired { launcher: usize },
    /// The launcher index did not exist; nothing happened
    FireRejected { launcher: usize },
    Reset,
    RateChanged { rate: f64 },
    /// Selection or fire requested with no manual launchers
    NoLauncher,
}

/// Applies operator commands to a shared simulation
#[derive(Debug, Clone, Default)]
pub struct Controller {
    pub selector: LauncherSelector,
}

impl Controller {
    pub fn new(selector: LauncherSelector) -> Self {
        Self { selector }
    }

    /// Execute `events` in order. Failures are reported, never propagated.
    pub fn apply(
        &mut self,
        events: impl IntoIterator<Item = ControlEvent>,
        simulation: &SharedSimulation,
    ) -> Vec<ControlOutcome> {
        events
            .into_iter()
            .map(|event| self.apply_one(event, simulation))
            .collect()
    }

    fn apply_one(&mut self, event: ControlEvent, simulation: &SharedSimulation) -> ControlOutcome {
        match event {
            ControlEvent::SelectNext => {
                let launcher = self.selector.next();
                self.selected(launcher)
            }
            ControlEvent::SelectPrevious => {
                let launcher = self.selector.previous();
                self.selected(launcher)
            }
            ControlEvent::FireSelected => match self.selector.selected_launcher() {
                Some(launcher) => fire(simulation, launcher),
                None => ControlOutcome::NoLauncher,
            },
            ControlEvent::Fire(launcher) => fire(simulation, launcher),
            ControlEvent::Reset => {
                simulation.reset();
                ControlOutcome::Reset
            }
            ControlEvent::RateUp => rate(simulation, RATE_STEP),
            ControlEvent::RateDown => rate(simulation, 1.0 / RATE_STEP),
        }
    }

    fn selected(&self, launcher: Option<usize>) -> ControlOutcome {
        match launcher {
            Some(launcher) => {
                log::info!("current launcher index: {}", self.selector.cursor());
                ControlOutcome::Selected { launcher }
            }
            None => ControlOutcome::NoLauncher,
        }
    }
}

fn fire(simulation: &SharedSimulation, launcher: usize) -> ControlOutcome {
    match simulation.fire_manual(launcher) {
        Ok(()) => ControlOutcome::Fired { launcher },
        Err(err) => {
            log::warn!("manual fire ignored: {err}");
            ControlOutcome::FireRejected { launcher }
        }
    }
}

fn rate(simulation: &SharedSimulation, factor: f64) -> ControlOutcome {
    let rate = simulation.with(|sim| {
        sim.scale_particle_rate(factor);
        sim.particle_rate()
    });
    ControlOutcome::RateChanged { rate }
}

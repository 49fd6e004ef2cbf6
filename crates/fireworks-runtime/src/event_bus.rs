//! Queue of operator commands between the input side and the frame loop
//!
//! Commands are either applied on the next dispatch or held back until the
//! simulation reaches a given time (scripted shows, replayed sessions).

use crate::control::{ControlOutcome, Controller};
use crate::event::ControlEvent;
use fireworks_particles::SharedSimulation;

#[derive(Debug, Default)]
pub struct EventBus {
    immediate: Vec<ControlEvent>,
    /// Held commands, sorted by release time; ties keep insertion order
    scheduled: Vec<(f64, ControlEvent)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a command for the next dispatch
    pub fn push(&mut self, event: ControlEvent) {
        self.immediate.push(event);
    }

    /// Hold a command until simulated time reaches `at`
    pub fn schedule(&mut self, at: f64, event: ControlEvent) {
        let slot = self.scheduled.partition_point(|(t, _)| *t <= at);
        self.scheduled.insert(slot, (at, event));
    }

    /// Commands waiting for their release time
    pub fn scheduled_len(&self) -> usize {
        self.scheduled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.immediate.is_empty() && self.scheduled.is_empty()
    }

    /// Take every command due at `now`: released scheduled ones first, in
    /// time order, then the immediate queue.
    pub fn take_due(&mut self, now: f64) -> Vec<ControlEvent> {
        let due = self.scheduled.partition_point(|(t, _)| *t <= now);
        let mut events: Vec<ControlEvent> = self.scheduled.drain(..due).map(|(_, e)| e).collect();
        events.append(&mut self.immediate);
        events
    }

    /// Apply every command due at `now` through `controller`
    pub fn dispatch(
        &mut self,
        now: f64,
        controller: &mut Controller,
        simulation: &SharedSimulation,
    ) -> Vec<ControlOutcome> {
        let events = self.take_due(now);
        if events.is_empty() {
            return Vec::new();
        }
        log::debug!("t={now:.3}: dispatching {} control event(s)", events.len());
        controller.apply(events, simulation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fireworks_particles::{Catalog, Launcher, ParticleType, Simulation, SimulationConfig};
    use glam::Vec3;

    #[test]
    fn immediate_events_come_out_in_order() {
        let mut bus = EventBus::new();
        assert!(bus.is_empty());
        bus.push(ControlEvent::SelectNext);
        bus.push(ControlEvent::FireSelected);

        assert_eq!(
            bus.take_due(0.0),
            vec![ControlEvent::SelectNext, ControlEvent::FireSelected]
        );
        assert!(bus.is_empty());
        assert!(bus.take_due(0.0).is_empty());
    }

    #[test]
    fn scheduled_events_wait_for_their_time() {
        let mut bus = EventBus::new();
        bus.schedule(2.0, ControlEvent::Fire(4));
        bus.schedule(0.5, ControlEvent::Fire(1));
        bus.schedule(2.0, ControlEvent::Reset);
        bus.push(ControlEvent::RateUp);

        assert_eq!(bus.take_due(0.1), vec![ControlEvent::RateUp]);
        assert_eq!(bus.take_due(0.5), vec![ControlEvent::Fire(1)]);
        assert_eq!(bus.scheduled_len(), 2);
        assert!(bus.take_due(1.9).is_empty());
        // same release time keeps scheduling order
        assert_eq!(
            bus.take_due(3.0),
            vec![ControlEvent::Fire(4), ControlEvent::Reset]
        );
        assert!(bus.is_empty());
    }

    #[test]
    fn dispatch_applies_due_commands() {
        let mut catalog = Catalog::new();
        let kind = catalog
            .add_type(ParticleType {
                max_age: 10.0,
                ..Default::default()
            })
            .unwrap();
        let mut sim = Simulation::new(
            SimulationConfig {
                max_particles: 16,
                ..Default::default()
            },
            catalog,
        )
        .unwrap();
        sim.add_launcher(Launcher::new(Vec3::ZERO, kind, Vec3::Y).interval(100.0).manual(true))
            .unwrap();
        let shared = SharedSimulation::new(sim);
        let mut controller = Controller::default();

        let mut bus = EventBus::new();
        bus.schedule(1.0, ControlEvent::Fire(0));
        bus.schedule(1.0, ControlEvent::Fire(7));

        assert!(bus.dispatch(0.5, &mut controller, &shared).is_empty());
        assert_eq!(shared.particle_count(), 0);

        let outcomes = bus.dispatch(1.0, &mut controller, &shared);
        assert_eq!(
            outcomes,
            vec![
                ControlOutcome::Fired { launcher: 0 },
                ControlOutcome::FireRejected { launcher: 7 },
            ]
        );
        assert_eq!(shared.particle_count(), 1);
    }
}

//! Fireworks Runtime - Frame loop collaborators
//!
//! Provides the pieces that sit between a window/render loop and the
//! simulation core:
//! - `SimClock` - wall-clock or fixed-step simulated time
//! - `LauncherSelector` - the operator's currently selected launcher
//! - `ControlEvent` / `EventBus` - queued operator commands
//! - `Controller` - applies queued commands to a shared simulation

mod clock;
mod control;
mod event;
mod event_bus;

pub use clock::SimClock;
pub use control::{ControlOutcome, Controller, LauncherSelector, RATE_STEP};
pub use event::ControlEvent;
pub use event_bus::EventBus;

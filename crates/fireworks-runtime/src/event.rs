//! Operator commands

/// A command from the operator control surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    /// Select the next manual launcher (wraps around)
    SelectNext,
    /// Select the previous manual launcher (wraps around)
    SelectPrevious,
    /// Fire the selected manual launcher once
    FireSelected,
    /// Fire a launcher by its simulation index
    Fire(usize),
    /// Clear all live particles
    Reset,
    /// Raise the particle-rate knob by one step
    RateUp,
    /// Lower the particle-rate knob by one step
    RateDown,
}

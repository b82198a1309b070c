use crate::fault::Fault;

/// Deterministic execution-state machine for the engine.
///
/// Once the engine leaves `Running` it never re-enters it; re-running a
/// program means constructing a fresh processor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RunState {
    /// Ready to fetch the next instruction.
    #[default]
    Running,
    /// Normal end of program: the pc reached the loaded byte length.
    Halted,
    /// A fatal fault is latched and no further progress is possible.
    Faulted(Fault),
}

impl RunState {
    /// Returns `true` when the engine can still execute instructions.
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    /// Returns the latched fault, if this state is faulted.
    #[must_use]
    pub const fn latched_fault(self) -> Option<Fault> {
        match self {
            Self::Faulted(fault) => Some(fault),
            Self::Running | Self::Halted => None,
        }
    }
}

//! Host-facing contracts for driving the engine.
//!
//! The core exposes a single-step operation; whether to run to completion,
//! cap the instruction count, or stop early is the caller's policy,
//! expressed through [`CoreConfig`] and the run loop in [`crate::execute`].

use crate::encoding::Operation;
use crate::fault::Fault;
use crate::word::Word;

/// Immutable per-run configuration supplied by the driving loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CoreConfig {
    /// Stop after this many retired instructions; `None` runs to halt.
    pub max_steps: Option<u64>,
}

/// Outcome of one instruction-step attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum StepOutcome {
    /// An instruction retired.
    Retired {
        /// Address the instruction was fetched from.
        pc: Word,
        /// Raw instruction word.
        word: Word,
        /// Operation the word selected.
        operation: Operation,
    },
    /// Normal end of program: the pc reached the loaded byte length.
    Halted,
    /// A fatal fault was raised or is latched.
    Fault {
        /// The latched fault.
        fault: Fault,
    },
}

/// Why a batched run returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RunTermination {
    /// Normal end of program.
    Halted,
    /// Fatal fault, latched in the processor state.
    Faulted(Fault),
    /// The configured instruction-count cap was reached first.
    StepLimit,
}

/// Aggregated outcome from running until halt, fault, or step cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RunOutcome {
    /// Number of instructions retired during this run call.
    pub steps: u64,
    /// Why the run returned.
    pub termination: RunTermination,
}

/// Deterministic events emitted at step boundaries when a sink is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceEvent {
    /// An instruction retired.
    InstructionRetired {
        /// Address the instruction was fetched from.
        pc: Word,
        /// Raw instruction word.
        word: Word,
        /// Operation the word selected.
        operation: Operation,
    },
    /// A fatal fault was raised.
    FaultRaised {
        /// The fault, with its address and offending word.
        fault: Fault,
    },
}

/// Sink for deterministic trace hooks, in execution order.
pub trait TraceSink {
    /// Records one event.
    fn on_event(&mut self, event: TraceEvent);
}

//! Architectural processor state.

/// General-purpose register file and hard-wire invariants.
pub mod registers;
/// Execution-state machine.
pub mod run_state;

pub use registers::{RegisterFile, REGISTER_COUNT, RETURN_ADDRESS_REGISTER};
pub use run_state::RunState;

use crate::memory::{DataMemory, InstructionMemory};
use crate::word::Word;

/// The single mutable entity of the simulator: registers, HI/LO, pc, and
/// both memories, created once per run and owned by the driving loop.
///
/// Instruction memory is populated by [`ProcessorState::new`] and never
/// mutated by the engine; everything else mutates once per executed
/// instruction, strictly sequentially.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ProcessorState {
    /// General-purpose register file.
    pub registers: RegisterFile,
    /// Multiply/divide high result register.
    pub hi: Word,
    /// Multiply/divide low result register.
    pub lo: Word,
    /// Program counter, a byte address.
    pub pc: Word,
    /// Loaded program, read-only after construction.
    pub instruction_memory: InstructionMemory,
    /// Sparse byte-addressed data memory.
    pub data_memory: DataMemory,
    /// Current execution state.
    pub run_state: RunState,
}

impl ProcessorState {
    /// Creates a processor with the program loaded at address zero, the pc
    /// at zero, and every register and memory cell cleared.
    #[must_use]
    pub fn new(program: &[u32]) -> Self {
        Self {
            registers: RegisterFile::new(),
            hi: Word::ZERO,
            lo: Word::ZERO,
            pc: Word::ZERO,
            instruction_memory: InstructionMemory::load(program),
            data_memory: DataMemory::new(),
            run_state: RunState::Running,
        }
    }
}

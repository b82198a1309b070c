//! Core decode/execute engine for a reduced MIPS-style 32-bit simulator.
//!
//! The crate is deterministic and free of file or terminal I/O: a loader
//! hands it an ordered sequence of raw 32-bit words, the engine assigns each
//! the byte address `4 * index`, and the driving loop steps the processor
//! until it halts, faults, or hits a caller-imposed step cap.

/// 32-bit two's-complement word arithmetic and sign/zero extension.
pub mod word;
pub use word::{sign_extend, zero_extend, Word, WORD_BITS};

/// Deterministic opcode and funct classification tables.
pub mod encoding;
pub use encoding::{classify_operation, Operation, FUNCT_TABLE, OPCODE_TABLE, SPECIAL_OPCODE};

/// Instruction field extraction.
pub mod decoder;
pub use decoder::{DecodedInstruction, Decoder};

/// Fault taxonomy for abnormal engine halts.
pub mod fault;
pub use fault::{Fault, FaultCode};

/// Sparse instruction and data memories.
pub mod memory;
pub use memory::{DataMemory, InstructionMemory, INSTRUCTION_BYTES};

/// Architectural processor state.
pub mod state;
pub use state::{ProcessorState, RegisterFile, RunState, REGISTER_COUNT, RETURN_ADDRESS_REGISTER};

/// Host-facing contracts for driving the engine.
pub mod api;
pub use api::{CoreConfig, RunOutcome, RunTermination, StepOutcome, TraceEvent, TraceSink};

/// The fetch→decode→execute cycle.
pub mod execute;
pub use execute::{run_to_halt, step_one};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;

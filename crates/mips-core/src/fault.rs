//! Fault taxonomy for abnormal engine halts.
//!
//! Faults are fatal: the engine latches them in its run state and the
//! driving loop reports them. There is no retry or recovery path; re-running
//! means reloading the program from address zero.

use thiserror::Error;

use crate::word::Word;

/// Classes of fatal engine faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum FaultCode {
    /// The fetched word's opcode/funct combination has no defined operation.
    #[error("illegal instruction")]
    IllegalInstruction,
    /// The pc landed on an address with no instruction that is not the
    /// natural end-of-program boundary.
    #[error("instruction fetch outside loaded program")]
    MemoryFault,
    /// `div`/`divu` with a zero divisor.
    #[error("integer division by zero")]
    ArithmeticFault,
}

/// A latched fault together with the context the reporting path needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Fault {
    /// The fault class.
    pub code: FaultCode,
    /// Address of the offending fetch or instruction.
    pub pc: Word,
    /// Raw instruction word, when one was fetched before the fault.
    pub word: Option<Word>,
}

impl Fault {
    /// Builds a fault observed at `pc` for a fetched `word`.
    #[must_use]
    pub const fn at(code: FaultCode, pc: Word, word: Word) -> Self {
        Self {
            code,
            pc,
            word: Some(word),
        }
    }

    /// Builds a fault observed at `pc` before any word was fetched.
    #[must_use]
    pub const fn at_fetch(code: FaultCode, pc: Word) -> Self {
        Self {
            code,
            pc,
            word: None,
        }
    }
}

impl std::fmt::Display for Fault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.word {
            Some(word) => write!(f, "{} at {} (word {word})", self.code, self.pc),
            None => write!(f, "{} at {}", self.code, self.pc),
        }
    }
}

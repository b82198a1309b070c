//! Instruction field extraction.
//!
//! Decoding is a pure total function over fixed bit ranges. Every field is
//! populated for every word regardless of instruction shape; the consumer
//! selects which fields are meaningful from the opcode (and funct when the
//! opcode is [`SPECIAL_OPCODE`]). Validation happens downstream in the
//! execution engine, never here.

#![allow(clippy::cast_lossless, clippy::cast_possible_truncation)]

use crate::encoding::{classify_operation, Operation, SPECIAL_OPCODE};
use crate::word::Word;

/// All bit fields of one raw instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DecodedInstruction {
    /// Primary opcode, bits `[31:26]`.
    pub opcode: u8,
    /// First source register, bits `[25:21]`.
    pub rs: u8,
    /// Second source register, bits `[20:16]`.
    pub rt: u8,
    /// Destination register, bits `[15:11]`.
    pub rd: u8,
    /// Shift amount, bits `[10:6]`.
    pub shamt: u8,
    /// Function code, bits `[5:0]`.
    pub funct: u8,
    /// Immediate, bits `[15:0]`.
    pub imm16: u16,
    /// Jump target, bits `[25:0]`.
    pub address26: u32,
}

impl DecodedInstruction {
    /// Resolves the operation this instruction selects, if it is defined.
    #[must_use]
    pub fn operation(&self) -> Option<Operation> {
        classify_operation(self.opcode, self.funct)
    }

    /// Packs the six disjoint fields back into a raw word.
    ///
    /// `imm16` and `address26` are overlapping views of the same bits as
    /// `rd`/`shamt`/`funct` and `rs`/`rt`/…, so they are not consulted;
    /// decoding the result reproduces them. `decode(encode(x)) == x` for any
    /// `x` produced by [`Decoder::decode`].
    #[must_use]
    pub const fn encode(&self) -> Word {
        Word::new(
            (self.opcode as u32) << 26
                | (self.rs as u32) << 21
                | (self.rt as u32) << 16
                | (self.rd as u32) << 11
                | (self.shamt as u32) << 6
                | self.funct as u32,
        )
    }

    /// Returns `true` when this word is R-type (operation selected by funct).
    #[must_use]
    pub const fn is_register_type(&self) -> bool {
        self.opcode == SPECIAL_OPCODE
    }
}

/// Pure bit-field decoder for raw instruction words.
pub struct Decoder;

impl Decoder {
    /// Extracts every field of `word` at its fixed bit range.
    #[must_use]
    pub const fn decode(word: Word) -> DecodedInstruction {
        let bits = word.bits();
        DecodedInstruction {
            opcode: (bits >> 26 & 0x3F) as u8,
            rs: (bits >> 21 & 0x1F) as u8,
            rt: (bits >> 16 & 0x1F) as u8,
            rd: (bits >> 11 & 0x1F) as u8,
            shamt: (bits >> 6 & 0x1F) as u8,
            funct: (bits & 0x3F) as u8,
            imm16: (bits & 0xFFFF) as u16,
            address26: bits & 0x03FF_FFFF,
        }
    }
}

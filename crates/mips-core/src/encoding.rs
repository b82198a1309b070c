//! Deterministic opcode and funct classification tables.
//!
//! Opcode 0 selects an R-type instruction whose true operation lives in the
//! funct field; every other opcode selects the operation directly. Any
//! `(opcode, funct)` combination absent from these tables is an illegal
//! instruction by definition — there are no silent no-op encodings.

/// Primary opcode value that defers operation selection to the funct field.
pub const SPECIAL_OPCODE: u8 = 0;

/// Every operation the simulator defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[allow(missing_docs)]
pub enum Operation {
    // J-type
    J,
    Jal,
    // I-type
    Beq,
    Bne,
    Blez,
    Bgtz,
    Addi,
    Addiu,
    Slti,
    Sltiu,
    Andi,
    Ori,
    Xori,
    Lui,
    Lb,
    Lh,
    Lw,
    Lbu,
    Lhu,
    Sb,
    Sh,
    Sw,
    // R-type (opcode 0, selected by funct)
    Sll,
    Srl,
    Sra,
    Sllv,
    Srlv,
    Srav,
    Jr,
    Jalr,
    Mfhi,
    Mthi,
    Mflo,
    Mtlo,
    Mult,
    Multu,
    Div,
    Divu,
    Add,
    Addu,
    Sub,
    Subu,
    And,
    Or,
    Xor,
    Nor,
    Slt,
    Sltu,
}

impl Operation {
    /// Assembly mnemonic, for trace and diagnostic output.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::J => "j",
            Self::Jal => "jal",
            Self::Beq => "beq",
            Self::Bne => "bne",
            Self::Blez => "blez",
            Self::Bgtz => "bgtz",
            Self::Addi => "addi",
            Self::Addiu => "addiu",
            Self::Slti => "slti",
            Self::Sltiu => "sltiu",
            Self::Andi => "andi",
            Self::Ori => "ori",
            Self::Xori => "xori",
            Self::Lui => "lui",
            Self::Lb => "lb",
            Self::Lh => "lh",
            Self::Lw => "lw",
            Self::Lbu => "lbu",
            Self::Lhu => "lhu",
            Self::Sb => "sb",
            Self::Sh => "sh",
            Self::Sw => "sw",
            Self::Sll => "sll",
            Self::Srl => "srl",
            Self::Sra => "sra",
            Self::Sllv => "sllv",
            Self::Srlv => "srlv",
            Self::Srav => "srav",
            Self::Jr => "jr",
            Self::Jalr => "jalr",
            Self::Mfhi => "mfhi",
            Self::Mthi => "mthi",
            Self::Mflo => "mflo",
            Self::Mtlo => "mtlo",
            Self::Mult => "mult",
            Self::Multu => "multu",
            Self::Div => "div",
            Self::Divu => "divu",
            Self::Add => "add",
            Self::Addu => "addu",
            Self::Sub => "sub",
            Self::Subu => "subu",
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
            Self::Nor => "nor",
            Self::Slt => "slt",
            Self::Sltu => "sltu",
        }
    }
}

/// Assigned primary opcodes for I-type and J-type instructions.
///
/// Any opcode not present here (other than [`SPECIAL_OPCODE`]) is illegal.
pub const OPCODE_TABLE: &[(u8, Operation)] = &[
    (2, Operation::J),
    (3, Operation::Jal),
    (4, Operation::Beq),
    (5, Operation::Bne),
    (6, Operation::Blez),
    (7, Operation::Bgtz),
    (8, Operation::Addi),
    (9, Operation::Addiu),
    (10, Operation::Slti),
    (11, Operation::Sltiu),
    (12, Operation::Andi),
    (13, Operation::Ori),
    (14, Operation::Xori),
    (15, Operation::Lui),
    (32, Operation::Lb),
    (33, Operation::Lh),
    (34, Operation::Lw),
    (36, Operation::Lbu),
    (37, Operation::Lhu),
    (40, Operation::Sb),
    (41, Operation::Sh),
    (43, Operation::Sw),
];

/// Assigned funct values for R-type instructions under [`SPECIAL_OPCODE`].
///
/// Any funct not present here is illegal.
pub const FUNCT_TABLE: &[(u8, Operation)] = &[
    (0, Operation::Sll),
    (2, Operation::Srl),
    (3, Operation::Sra),
    (4, Operation::Sllv),
    (6, Operation::Srlv),
    (7, Operation::Srav),
    (8, Operation::Jr),
    (9, Operation::Jalr),
    (16, Operation::Mfhi),
    (17, Operation::Mthi),
    (18, Operation::Mflo),
    (19, Operation::Mtlo),
    (24, Operation::Mult),
    (25, Operation::Multu),
    (26, Operation::Div),
    (27, Operation::Divu),
    (32, Operation::Add),
    (33, Operation::Addu),
    (34, Operation::Sub),
    (35, Operation::Subu),
    (36, Operation::And),
    (37, Operation::Or),
    (38, Operation::Xor),
    (39, Operation::Nor),
    (42, Operation::Slt),
    (43, Operation::Sltu),
];

/// Resolves the operation selected by an `(opcode, funct)` pair.
///
/// `None` means the combination has no defined operation and must be treated
/// as an illegal-instruction fault by the caller.
#[must_use]
pub fn classify_operation(opcode: u8, funct: u8) -> Option<Operation> {
    if opcode == SPECIAL_OPCODE {
        FUNCT_TABLE
            .iter()
            .find_map(|(value, operation)| (*value == funct).then_some(*operation))
    } else {
        OPCODE_TABLE
            .iter()
            .find_map(|(value, operation)| (*value == opcode).then_some(*operation))
    }
}

//! The fetch→decode→execute cycle.
//!
//! Each step while running: re-assert the register-0 hard-wire, fetch the
//! word at the pc (a miss at exactly the program byte length is the normal
//! halt; a miss anywhere else is a memory fault), advance the pc
//! sequentially, then dispatch on the operation the word selects. Control
//! flow instructions overwrite the sequential advance with their own target.
//! Faulting instructions produce no architectural side effects.

#![allow(
    clippy::cast_lossless,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)]

use crate::api::{CoreConfig, RunOutcome, RunTermination, StepOutcome, TraceEvent, TraceSink};
use crate::decoder::{DecodedInstruction, Decoder};
use crate::encoding::Operation;
use crate::fault::{Fault, FaultCode};
use crate::memory::INSTRUCTION_BYTES;
use crate::state::{ProcessorState, RunState, RETURN_ADDRESS_REGISTER};
use crate::word::{sign_extend, zero_extend, Word};

/// Executes at most one instruction.
///
/// A halted or faulted engine is inert: stepping it again returns the
/// latched condition without touching the state.
pub fn step_one(state: &mut ProcessorState) -> StepOutcome {
    match state.run_state {
        RunState::Faulted(fault) => return StepOutcome::Fault { fault },
        RunState::Halted => return StepOutcome::Halted,
        RunState::Running => {}
    }

    state.registers.reassert_zero();

    let pc = state.pc;
    let Some(word) = state.instruction_memory.fetch(pc) else {
        if state.instruction_memory.is_end_of_program(pc) {
            state.run_state = RunState::Halted;
            return StepOutcome::Halted;
        }
        let fault = Fault::at_fetch(FaultCode::MemoryFault, pc);
        state.run_state = RunState::Faulted(fault);
        return StepOutcome::Fault { fault };
    };

    let next_pc = pc.wrapping_add(Word::new(INSTRUCTION_BYTES));
    let instruction = Decoder::decode(word);
    let Some(operation) = instruction.operation() else {
        let fault = Fault::at(FaultCode::IllegalInstruction, pc, word);
        state.run_state = RunState::Faulted(fault);
        return StepOutcome::Fault { fault };
    };

    // Sequential advance; control-flow operations overwrite it.
    state.pc = next_pc;

    if let Err(code) = execute_operation(state, operation, &instruction, next_pc) {
        let fault = Fault::at(code, pc, word);
        state.pc = pc;
        state.run_state = RunState::Faulted(fault);
        return StepOutcome::Fault { fault };
    }

    StepOutcome::Retired {
        pc,
        word,
        operation,
    }
}

/// Steps until normal halt, fault, or the configured step cap.
pub fn run_to_halt(
    state: &mut ProcessorState,
    config: &CoreConfig,
    mut trace: Option<&mut dyn TraceSink>,
) -> RunOutcome {
    let mut steps = 0u64;
    loop {
        if let Some(limit) = config.max_steps {
            if steps >= limit {
                return RunOutcome {
                    steps,
                    termination: RunTermination::StepLimit,
                };
            }
        }

        match step_one(state) {
            StepOutcome::Retired {
                pc,
                word,
                operation,
            } => {
                steps += 1;
                if let Some(sink) = trace.as_deref_mut() {
                    sink.on_event(TraceEvent::InstructionRetired {
                        pc,
                        word,
                        operation,
                    });
                }
            }
            StepOutcome::Halted => {
                return RunOutcome {
                    steps,
                    termination: RunTermination::Halted,
                };
            }
            StepOutcome::Fault { fault } => {
                if let Some(sink) = trace.as_deref_mut() {
                    sink.on_event(TraceEvent::FaultRaised { fault });
                }
                return RunOutcome {
                    steps,
                    termination: RunTermination::Faulted(fault),
                };
            }
        }
    }
}

fn execute_operation(
    state: &mut ProcessorState,
    operation: Operation,
    instruction: &DecodedInstruction,
    next_pc: Word,
) -> Result<(), FaultCode> {
    match operation {
        Operation::Beq => execute_branch(state, instruction, next_pc, BranchCondition::Equal),
        Operation::Bne => execute_branch(state, instruction, next_pc, BranchCondition::NotEqual),
        Operation::Blez => {
            execute_branch(state, instruction, next_pc, BranchCondition::LessOrEqualZero);
        }
        Operation::Bgtz => {
            execute_branch(state, instruction, next_pc, BranchCondition::GreaterThanZero);
        }
        Operation::Addi | Operation::Addiu => {
            let value = state
                .registers
                .read(instruction.rs)
                .wrapping_add(sign_extend(u32::from(instruction.imm16), 16));
            state.registers.write(instruction.rt, value);
        }
        Operation::Slti => {
            let taken = state
                .registers
                .read(instruction.rs)
                .cmp_signed(sign_extend(u32::from(instruction.imm16), 16))
                .is_lt();
            state.registers.write(instruction.rt, flag_word(taken));
        }
        Operation::Sltiu => {
            let taken = state
                .registers
                .read(instruction.rs)
                .cmp_unsigned(sign_extend(u32::from(instruction.imm16), 16))
                .is_lt();
            state.registers.write(instruction.rt, flag_word(taken));
        }
        Operation::Andi => execute_logical_immediate(state, instruction, Word::bit_and),
        Operation::Ori => execute_logical_immediate(state, instruction, Word::bit_or),
        Operation::Xori => execute_logical_immediate(state, instruction, Word::bit_xor),
        Operation::Lui => {
            let value = Word::new(u32::from(instruction.imm16) << 16);
            state.registers.write(instruction.rt, value);
        }
        Operation::Lb => {
            let byte = state.data_memory.read_byte(effective_address(state, instruction));
            state
                .registers
                .write(instruction.rt, sign_extend(u32::from(byte), 8));
        }
        Operation::Lbu => {
            let byte = state.data_memory.read_byte(effective_address(state, instruction));
            state
                .registers
                .write(instruction.rt, zero_extend(u32::from(byte), 8));
        }
        Operation::Lh => {
            let half = state.data_memory.read_half(effective_address(state, instruction));
            state
                .registers
                .write(instruction.rt, sign_extend(u32::from(half), 16));
        }
        Operation::Lhu => {
            let half = state.data_memory.read_half(effective_address(state, instruction));
            state
                .registers
                .write(instruction.rt, zero_extend(u32::from(half), 16));
        }
        Operation::Lw => {
            let word = state.data_memory.read_word(effective_address(state, instruction));
            state.registers.write(instruction.rt, word);
        }
        Operation::Sb => {
            let value = state.registers.read(instruction.rt).bits() as u8;
            let addr = effective_address(state, instruction);
            state.data_memory.write_byte(addr, value);
        }
        Operation::Sh => {
            let value = state.registers.read(instruction.rt).bits() as u16;
            let addr = effective_address(state, instruction);
            state.data_memory.write_half(addr, value);
        }
        Operation::Sw => {
            let value = state.registers.read(instruction.rt);
            let addr = effective_address(state, instruction);
            state.data_memory.write_word(addr, value);
        }
        Operation::J => {
            state.pc = jump_target(instruction);
        }
        Operation::Jal => {
            state.registers.write(RETURN_ADDRESS_REGISTER, next_pc);
            state.pc = jump_target(instruction);
        }
        Operation::Sll => execute_shift(state, instruction, ShiftKind::LeftLogical, false),
        Operation::Srl => execute_shift(state, instruction, ShiftKind::RightLogical, false),
        Operation::Sra => execute_shift(state, instruction, ShiftKind::RightArithmetic, false),
        Operation::Sllv => execute_shift(state, instruction, ShiftKind::LeftLogical, true),
        Operation::Srlv => execute_shift(state, instruction, ShiftKind::RightLogical, true),
        Operation::Srav => execute_shift(state, instruction, ShiftKind::RightArithmetic, true),
        Operation::Jr => {
            state.pc = state.registers.read(instruction.rs);
        }
        Operation::Jalr => {
            // Read the target before the link write, for the rd == rs case.
            let target = state.registers.read(instruction.rs);
            state.registers.write(instruction.rd, next_pc);
            state.pc = target;
        }
        Operation::Mfhi => {
            let hi = state.hi;
            state.registers.write(instruction.rd, hi);
        }
        Operation::Mthi => {
            state.hi = state.registers.read(instruction.rs);
        }
        Operation::Mflo => {
            let lo = state.lo;
            state.registers.write(instruction.rd, lo);
        }
        Operation::Mtlo => {
            state.lo = state.registers.read(instruction.rs);
        }
        Operation::Mult => {
            let a = i64::from(state.registers.read(instruction.rs).as_i32());
            let b = i64::from(state.registers.read(instruction.rt).as_i32());
            let product = a.wrapping_mul(b);
            state.hi = Word::new((product >> 32) as u32);
            state.lo = Word::new(product as u32);
        }
        Operation::Multu => {
            let a = u64::from(state.registers.read(instruction.rs).bits());
            let b = u64::from(state.registers.read(instruction.rt).bits());
            let product = a * b;
            state.hi = Word::new((product >> 32) as u32);
            state.lo = Word::new(product as u32);
        }
        Operation::Div => {
            let dividend = state.registers.read(instruction.rs).as_i32();
            let divisor = state.registers.read(instruction.rt).as_i32();
            if divisor == 0 {
                return Err(FaultCode::ArithmeticFault);
            }
            // i32::MIN / -1 wraps rather than trapping.
            state.lo = Word::new(dividend.wrapping_div(divisor) as u32);
            state.hi = Word::new(dividend.wrapping_rem(divisor) as u32);
        }
        Operation::Divu => {
            let dividend = state.registers.read(instruction.rs).bits();
            let divisor = state.registers.read(instruction.rt).bits();
            if divisor == 0 {
                return Err(FaultCode::ArithmeticFault);
            }
            state.lo = Word::new(dividend / divisor);
            state.hi = Word::new(dividend % divisor);
        }
        Operation::Add | Operation::Addu => execute_alu(state, instruction, Word::wrapping_add),
        Operation::Sub | Operation::Subu => execute_alu(state, instruction, Word::wrapping_sub),
        Operation::And => execute_alu(state, instruction, Word::bit_and),
        Operation::Or => execute_alu(state, instruction, Word::bit_or),
        Operation::Xor => execute_alu(state, instruction, Word::bit_xor),
        Operation::Nor => execute_alu(state, instruction, Word::bit_nor),
        Operation::Slt => {
            let taken = state
                .registers
                .read(instruction.rs)
                .cmp_signed(state.registers.read(instruction.rt))
                .is_lt();
            state.registers.write(instruction.rd, flag_word(taken));
        }
        Operation::Sltu => {
            let taken = state
                .registers
                .read(instruction.rs)
                .cmp_unsigned(state.registers.read(instruction.rt))
                .is_lt();
            state.registers.write(instruction.rd, flag_word(taken));
        }
    }

    Ok(())
}

#[derive(Clone, Copy)]
enum BranchCondition {
    Equal,
    NotEqual,
    LessOrEqualZero,
    GreaterThanZero,
}

fn execute_branch(
    state: &mut ProcessorState,
    instruction: &DecodedInstruction,
    next_pc: Word,
    condition: BranchCondition,
) {
    let rs = state.registers.read(instruction.rs);
    let rt = state.registers.read(instruction.rt);

    let taken = match condition {
        BranchCondition::Equal => rs == rt,
        BranchCondition::NotEqual => rs != rt,
        BranchCondition::LessOrEqualZero => rs.cmp_signed(Word::ZERO).is_le(),
        BranchCondition::GreaterThanZero => rs.cmp_signed(Word::ZERO).is_gt(),
    };

    if taken {
        state.pc = branch_target(next_pc, instruction.imm16);
    }
}

#[derive(Clone, Copy)]
enum ShiftKind {
    LeftLogical,
    RightLogical,
    RightArithmetic,
}

fn execute_shift(
    state: &mut ProcessorState,
    instruction: &DecodedInstruction,
    kind: ShiftKind,
    amount_from_rs: bool,
) {
    let value = state.registers.read(instruction.rt);
    let amount = if amount_from_rs {
        state.registers.read(instruction.rs).bits()
    } else {
        u32::from(instruction.shamt)
    };

    let shifted = match kind {
        ShiftKind::LeftLogical => value.shift_left(amount),
        ShiftKind::RightLogical => value.shift_right_logical(amount),
        ShiftKind::RightArithmetic => value.shift_right_arithmetic(amount),
    };

    state.registers.write(instruction.rd, shifted);
}

fn execute_alu(
    state: &mut ProcessorState,
    instruction: &DecodedInstruction,
    op: fn(Word, Word) -> Word,
) {
    let result = op(
        state.registers.read(instruction.rs),
        state.registers.read(instruction.rt),
    );
    state.registers.write(instruction.rd, result);
}

fn execute_logical_immediate(
    state: &mut ProcessorState,
    instruction: &DecodedInstruction,
    op: fn(Word, Word) -> Word,
) {
    let result = op(
        state.registers.read(instruction.rs),
        zero_extend(u32::from(instruction.imm16), 16),
    );
    state.registers.write(instruction.rt, result);
}

/// Branch target: `pc' + sign_extend(imm16 << 2, 18)`.
fn branch_target(next_pc: Word, imm16: u16) -> Word {
    next_pc.wrapping_add(sign_extend(u32::from(imm16) << 2, 18))
}

/// Jump target: word-aligned absolute address from the 26-bit field.
const fn jump_target(instruction: &DecodedInstruction) -> Word {
    Word::new(instruction.address26 << 2)
}

/// Effective address for loads and stores: `rs + sign_extend(imm16, 16)`.
fn effective_address(state: &ProcessorState, instruction: &DecodedInstruction) -> Word {
    state
        .registers
        .read(instruction.rs)
        .wrapping_add(sign_extend(u32::from(instruction.imm16), 16))
}

const fn flag_word(taken: bool) -> Word {
    if taken {
        Word::new(1)
    } else {
        Word::ZERO
    }
}

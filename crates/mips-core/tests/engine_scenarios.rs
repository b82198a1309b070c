//! End-to-end engine scenarios driven through the public API.

#![allow(clippy::cast_lossless)]

use mips_core::{
    run_to_halt, step_one, CoreConfig, FaultCode, Operation, ProcessorState, RunTermination,
    StepOutcome, TraceEvent, TraceSink, Word,
};
use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

const fn r_type(rs: u8, rt: u8, rd: u8, shamt: u8, funct: u8) -> u32 {
    (rs as u32) << 21 | (rt as u32) << 16 | (rd as u32) << 11 | (shamt as u32) << 6 | funct as u32
}

const fn i_type(opcode: u8, rs: u8, rt: u8, imm: u16) -> u32 {
    (opcode as u32) << 26 | (rs as u32) << 21 | (rt as u32) << 16 | imm as u32
}

const fn j_type(opcode: u8, target: u32) -> u32 {
    (opcode as u32) << 26 | (target & 0x03FF_FFFF)
}

#[derive(Default)]
struct RecordingSink {
    retired: Vec<(Word, Operation)>,
    faults: Vec<FaultCode>,
}

impl TraceSink for RecordingSink {
    fn on_event(&mut self, event: TraceEvent) {
        match event {
            TraceEvent::InstructionRetired { pc, operation, .. } => {
                self.retired.push((pc, operation));
            }
            TraceEvent::FaultRaised { fault } => self.faults.push(fault.code),
        }
    }
}

#[test]
fn addi_chain_and_self_branch_pin_the_pc() {
    let program = [
        i_type(8, 0, 1, 5),      // addi r1, r0, 5
        i_type(8, 1, 2, 0xFFFD), // addi r2, r1, -3
        i_type(4, 1, 1, 0xFFFF), // beq r1, r1, -1 (branches to itself)
    ];
    let mut state = ProcessorState::new(&program);

    assert!(matches!(step_one(&mut state), StepOutcome::Retired { .. }));
    assert!(matches!(step_one(&mut state), StepOutcome::Retired { .. }));
    assert_eq!(state.registers.read(1), Word::new(5));
    assert_eq!(state.registers.read(2), Word::new(2));

    let branch_pc = state.pc;
    assert!(matches!(step_one(&mut state), StepOutcome::Retired { .. }));
    assert_eq!(state.pc, branch_pc);
    assert!(matches!(step_one(&mut state), StepOutcome::Retired { .. }));
    assert_eq!(state.pc, branch_pc);
}

#[test]
fn countdown_loop_accumulates_a_sum() {
    // r1 counts 5 down to 0, r2 accumulates the sum 5+4+3+2+1.
    let program = [
        i_type(8, 0, 1, 5),      // addi r1, r0, 5
        r_type(2, 1, 2, 0, 32),  // add r2, r2, r1
        i_type(8, 1, 1, 0xFFFF), // addi r1, r1, -1
        i_type(5, 1, 0, 0xFFFD), // bne r1, r0, -3 (back to the add)
    ];
    let mut state = ProcessorState::new(&program);
    let outcome = run_to_halt(&mut state, &CoreConfig::default(), None);

    assert_eq!(outcome.termination, RunTermination::Halted);
    assert_eq!(state.registers.read(2), Word::new(15));
    assert_eq!(state.registers.read(1), Word::ZERO);
}

#[test]
fn lui_ori_composition_builds_constants() {
    let program = [
        i_type(15, 0, 3, 0x1234), // lui r3, 0x1234
        i_type(13, 3, 3, 0x5678), // ori r3, r3, 0x5678
    ];
    let mut state = ProcessorState::new(&program);
    let outcome = run_to_halt(&mut state, &CoreConfig::default(), None);

    assert_eq!(outcome.termination, RunTermination::Halted);
    assert_eq!(state.registers.read(3), Word::new(0x1234_5678));
}

#[test]
fn signed_and_unsigned_comparison_diverge_on_the_same_bits() {
    let program = [
        i_type(8, 0, 5, 0xFFFF), // addi r5, r0, -1
        r_type(0, 5, 4, 0, 42),  // slt r4, r0, r5
        r_type(0, 5, 6, 0, 43),  // sltu r6, r0, r5
    ];
    let mut state = ProcessorState::new(&program);
    let _ = run_to_halt(&mut state, &CoreConfig::default(), None);

    assert_eq!(state.registers.read(4), Word::ZERO);
    assert_eq!(state.registers.read(6), Word::new(1));
}

#[test]
fn stored_word_loads_back_its_top_byte_signed() {
    let program = [
        i_type(15, 0, 1, 0xAABB), // lui r1, 0xAABB
        i_type(13, 1, 1, 0xCCDD), // ori r1, r1, 0xCCDD
        i_type(43, 0, 1, 0x100),  // sw r1, 0x100(r0)
        i_type(32, 0, 2, 0x100),  // lb r2, 0x100(r0)
    ];
    let mut state = ProcessorState::new(&program);
    let _ = run_to_halt(&mut state, &CoreConfig::default(), None);

    assert_eq!(state.registers.read(2), Word::new(0xFFFF_FFAA));
    assert_eq!(state.data_memory.read_byte(Word::new(0x100)), 0xAA);
    assert_eq!(state.data_memory.read_byte(Word::new(0x103)), 0xDD);
}

#[test]
fn call_and_return_through_jal_and_jr() {
    let program = [
        j_type(3, 3),            // 0x00 jal 0x0C, r31 = 0x04
        i_type(8, 2, 2, 1),      // 0x04 addi r2, r2, 1 (after return)
        j_type(2, 6),            // 0x08 j 0x18 (end)
        i_type(8, 0, 1, 0x2A),   // 0x0C addi r1, r0, 42 (subroutine)
        r_type(31, 0, 0, 0, 8),  // 0x10 jr r31
        i_type(8, 0, 9, 1),      // 0x14 addi r9, r0, 1 (never reached)
    ];
    let mut state = ProcessorState::new(&program);
    let outcome = run_to_halt(&mut state, &CoreConfig::default(), None);

    assert_eq!(outcome.termination, RunTermination::Halted);
    assert_eq!(state.registers.read(1), Word::new(42));
    assert_eq!(state.registers.read(2), Word::new(1));
    assert_eq!(state.registers.read(9), Word::ZERO);
    assert_eq!(state.registers.read(31), Word::new(4));
}

#[test]
fn division_by_zero_latches_an_arithmetic_fault() {
    let program = [
        i_type(8, 0, 1, 9),     // addi r1, r0, 9
        r_type(1, 0, 0, 0, 27), // divu r1, r0
    ];
    let mut state = ProcessorState::new(&program);
    let outcome = run_to_halt(&mut state, &CoreConfig::default(), None);

    let RunTermination::Faulted(fault) = outcome.termination else {
        panic!("expected fault, got {:?}", outcome.termination);
    };
    assert_eq!(fault.code, FaultCode::ArithmeticFault);
    assert_eq!(fault.pc, Word::new(4));
    assert_eq!(fault.word, Some(Word::new(r_type(1, 0, 0, 0, 27))));
    assert_eq!(state.run_state.latched_fault(), Some(fault));
}

#[test]
fn branch_outside_the_program_is_a_memory_fault() {
    let program = [
        i_type(4, 0, 0, 0x10), // beq r0, r0, +16: far past the end
        i_type(8, 0, 1, 1),
    ];
    let mut state = ProcessorState::new(&program);
    let outcome = run_to_halt(&mut state, &CoreConfig::default(), None);

    let RunTermination::Faulted(fault) = outcome.termination else {
        panic!("expected fault");
    };
    assert_eq!(fault.code, FaultCode::MemoryFault);
    assert_eq!(fault.pc, Word::new(0x44));
    assert_eq!(fault.word, None);
}

#[test]
fn illegal_instruction_reports_the_raw_word() {
    let program = [i_type(8, 0, 1, 1), 0x7C00_0000]; // opcode 31 is unassigned
    let mut state = ProcessorState::new(&program);
    let outcome = run_to_halt(&mut state, &CoreConfig::default(), None);

    let RunTermination::Faulted(fault) = outcome.termination else {
        panic!("expected fault");
    };
    assert_eq!(fault.code, FaultCode::IllegalInstruction);
    assert_eq!(fault.pc, Word::new(4));
    assert_eq!(fault.word, Some(Word::new(0x7C00_0000)));
    assert_eq!(outcome.steps, 1);
}

#[test]
fn trace_sink_sees_every_retirement_in_order() {
    let program = [
        i_type(8, 0, 1, 5),       // addi
        i_type(15, 0, 2, 0x8000), // lui
        r_type(1, 2, 3, 0, 37),   // or
    ];
    let mut state = ProcessorState::new(&program);
    let mut sink = RecordingSink::default();
    let outcome = run_to_halt(&mut state, &CoreConfig::default(), Some(&mut sink));

    assert_eq!(outcome.steps, 3);
    assert_eq!(
        sink.retired,
        vec![
            (Word::new(0), Operation::Addi),
            (Word::new(4), Operation::Lui),
            (Word::new(8), Operation::Or),
        ]
    );
    assert!(sink.faults.is_empty());
}

#[test]
fn trace_sink_sees_the_fault() {
    let program = [r_type(0, 0, 0, 0, 63)]; // unassigned funct
    let mut state = ProcessorState::new(&program);
    let mut sink = RecordingSink::default();
    let _ = run_to_halt(&mut state, &CoreConfig::default(), Some(&mut sink));

    assert_eq!(sink.faults, vec![FaultCode::IllegalInstruction]);
    assert!(sink.retired.is_empty());
}

#[test]
fn step_cap_leaves_the_engine_resumable() {
    let program = [
        i_type(8, 1, 1, 1),      // addi r1, r1, 1
        i_type(4, 0, 0, 0xFFFE), // beq r0, r0, -2 (back to the addi)
    ];
    let mut state = ProcessorState::new(&program);

    let capped = run_to_halt(&mut state, &CoreConfig { max_steps: Some(10) }, None);
    assert_eq!(capped.termination, RunTermination::StepLimit);
    assert_eq!(capped.steps, 10);
    assert_eq!(state.registers.read(1), Word::new(5));

    // The cap is the caller's policy, not an engine condition: stepping on
    // from here keeps executing.
    let more = run_to_halt(&mut state, &CoreConfig { max_steps: Some(2) }, None);
    assert_eq!(more.termination, RunTermination::StepLimit);
    assert_eq!(state.registers.read(1), Word::new(6));
}

#[test]
fn empty_program_halts_immediately() {
    let mut state = ProcessorState::new(&[]);
    let outcome = run_to_halt(&mut state, &CoreConfig::default(), None);

    assert_eq!(outcome.steps, 0);
    assert_eq!(outcome.termination, RunTermination::Halted);
}

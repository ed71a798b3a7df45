/*!
  Structures and functions for the duet machine: two instances of one
  instruction sequence running against each other through a pair of one
  directional FIFO queues.

  Scheduling is cooperative and single threaded. An instance runs until it
  halts (its program counter leaves the code) or suspends (`rcv` on an
  empty queue), then control passes to its peer. Every `snd` lands on the
  peer's queue immediately, so a full pass in which neither instance
  executes a single instruction means neither can ever move again. That
  mutual standstill is the machine's normal termination, not an error.
*/

use std::collections::VecDeque;
use std::fmt::{Display, Formatter};

use prettytable::{format as TableFormat, Table};

use crate::bytecode::Instruction;
use crate::errors::MachineError;
use crate::operand::{Operand, RegisterId};
use crate::registers::RegisterBank;

/// What a program instance is doing between scheduler passes.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Status {
  /// Eligible to execute its next instruction.
  Running,
  /// Suspended on `rcv` with an empty inbound queue. Cleared the moment
  /// the peer sends.
  WaitingOnReceive,
  /// The program counter left the code. Permanent.
  Halted
}

impl Display for Status {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Status::Running          => write!(f, "running"),
      Status::WaitingOnReceive => write!(f, "waiting on rcv"),
      Status::Halted           => write!(f, "halted")
    }
  }
}

/**
  One running instance of the shared instruction sequence. An instance
  exclusively owns its registers, program counter, and inbound queue; the
  peer is the queue's only writer, the owner its only reader.
*/
pub struct Program {

  // Identity
  index : usize,  // 0 or 1; also the startup value of register p

  // Mutable execution state
  pc        : i64,            // Signed: jumps may land before the code
  registers : RegisterBank,
  inbound   : VecDeque<i64>,  // FIFO fed by the peer's snd
  status    : Status,

  // Observable counters
  sent     : u64,  // snd instructions executed by this instance
  received : u64   // rcv instructions completed by this instance

}

impl Program {

  fn new(index: usize) -> Program {
    let mut registers = RegisterBank::new();
    // The one asymmetry between the two instances.
    registers.set(RegisterId::PROGRAM_INDEX, index as i64);

    Program {
      index,
      pc        :  0,
      registers,
      inbound   :  VecDeque::new(),
      status    :  Status::Running,
      sent      :  0,
      received  :  0
    }
  }

  /// A value just arrived on the inbound queue; a suspended instance is
  /// eligible to move again.
  fn wake(&mut self) {
    if self.status == Status::WaitingOnReceive {
      self.status = Status::Running;
    }
  }

  /**
    Applies a checked arithmetic operation to the register and the resolved
    operand. A `None` from the operation, whether modulo by zero or a
    result outside the 64 bit range, is undefined arithmetic and kills the
    run with the instance and instruction it happened at.
  */
  fn arithmetic(
    &mut self,
    register  : RegisterId,
    value     : Operand,
    operation : fn(i64, i64) -> Option<i64>
  ) -> Result<(), MachineError>
  {
    let lhs = self.registers.get(register);
    let rhs = value.resolve(&self.registers);

    match operation(lhs, rhs) {

      Some(result) => {
        self.registers.set(register, result);
        self.pc += 1;
        Ok(())
      }

      None => {
        Err(MachineError::UndefinedArithmetic {
          program: self.index,
          pc: self.pc as usize
        })
      }

    }
  }

  // region Read access, for inspection and the state display

  pub fn index(&self) -> usize {
    self.index
  }

  pub fn status(&self) -> Status {
    self.status
  }

  pub fn sent(&self) -> u64 {
    self.sent
  }

  pub fn received(&self) -> u64 {
    self.received
  }

  pub fn registers(&self) -> &RegisterBank {
    &self.registers
  }

  // endregion

}

/**
  The scheduler. Owns the immutable instruction sequence and both program
  instances, and alternates between them until a full pass moves neither.

  `run` reports how many values instance 1 sent over the whole run, which
  is the machine's answer.
*/
pub struct Duet {
  code     : Vec<Instruction>,
  programs : [Program; 2]
}

impl Duet {

  pub fn new(code: Vec<Instruction>) -> Duet {
    Duet {
      code,
      programs: [Program::new(0), Program::new(1)]
    }
  }

  /// Read access to one instance.
  pub fn program(&self, index: usize) -> &Program {
    &self.programs[index]
  }

  // region Scheduling

  /**
    Runs both instances to joint termination. The run ends when a full
    round-robin pass executes zero instructions: each instance is then
    halted, or waiting on a queue its peer will never feed again, so no
    future progress is possible.
  */
  pub fn run(&mut self) -> Result<u64, MachineError> {
    loop {
      let moved = self.run_program(0)? + self.run_program(1)?;

      if moved == 0 {
        return Ok(self.programs[1].sent);
      }
    }
  }

  /// Runs one instance until it halts or suspends, returning how many
  /// instructions it executed.
  fn run_program(&mut self, index: usize) -> Result<u64, MachineError> {
    let mut executed = 0;

    loop {
      match self.step(index)? {
        true  => { executed += 1; }
        false => { return Ok(executed); }
      }

      #[cfg(feature = "trace_computation")] println!("{}", self);
    }
  }

  /// Executes the instruction under the instance's program counter.
  /// Returns whether any state advanced; halting and suspending do not
  /// count as progress.
  fn step(&mut self, index: usize) -> Result<bool, MachineError> {
    let instruction = match self.fetch(index) {
      Some(instruction) => instruction,
      None              => return Ok(false)
    };

    let (program, peer) = self.pair_mut(index);

    match instruction {

      Instruction::Snd(value) => {
        peer.inbound.push_back(value.resolve(&program.registers));
        peer.wake();
        program.sent += 1;
        program.pc += 1;
      }

      Instruction::Set(register, value) => {
        let value = value.resolve(&program.registers);
        program.registers.set(register, value);
        program.pc += 1;
      }

      Instruction::Add(register, value) => {
        program.arithmetic(register, value, i64::checked_add)?;
      }

      Instruction::Mul(register, value) => {
        program.arithmetic(register, value, i64::checked_mul)?;
      }

      // `checked_rem` is the truncating remainder, the sign following the
      // dividend, and is `None` exactly when the result is undefined.
      Instruction::Mod(register, value) => {
        program.arithmetic(register, value, i64::checked_rem)?;
      }

      Instruction::Rcv(register) => {
        match program.inbound.pop_front() {

          Some(value) => {
            program.registers.set(register, value);
            program.received += 1;
            program.pc += 1;
          }

          None => {
            program.status = Status::WaitingOnReceive;
            return Ok(false);
          }

        } // end match on queue front
      }

      Instruction::Jgz(condition, offset) => {
        match condition.resolve(&program.registers) > 0 {
          true  => { program.pc += offset.resolve(&program.registers); }
          false => { program.pc += 1; }
        }
      }

    } // end match on instruction

    Ok(true)
  }

  /// The instruction under the instance's program counter, or `None` once
  /// the counter has left the code. Walking off either end is a normal
  /// halt, never an error.
  fn fetch(&mut self, index: usize) -> Option<Instruction> {
    if self.programs[index].status == Status::Halted {
      return None;
    }

    let pc = self.programs[index].pc;
    if pc >= 0 && (pc as usize) < self.code.len() {
      Some(self.code[pc as usize])
    } else {
      self.programs[index].status = Status::Halted;
      None
    }
  }

  /// Mutable access to an instance and its peer at the same time.
  fn pair_mut(&mut self, index: usize) -> (&mut Program, &mut Program) {
    let (left, right) = self.programs.split_at_mut(1);
    match index {
      0 => (&mut left[0], &mut right[0]),
      _ => (&mut right[0], &mut left[0])
    }
  }

  // endregion

}

// region Display methods

fn make_register_table(program: &Program) -> Table {
  let mut table = Table::new();

  table.set_format(*TABLE_DISPLAY_FORMAT);
  table.set_titles(row![ubr->"Register", ubl->"Contents"]);

  for (register, value) in program.registers.snapshot() {
    table.add_row(row![r->format!("{} =", register), format!("{}", value)]);
  }
  table
}

lazy_static! {
  static ref TABLE_DISPLAY_FORMAT: TableFormat::TableFormat =
    TableFormat::FormatBuilder::new()
      .column_separator('│')
      .borders(' ')
      .separator(
        TableFormat::LinePosition::Title,
        TableFormat::LineSeparator::new('─', '┼', ' ', ' ')
      )
      .separator(
        TableFormat::LinePosition::Bottom,
        TableFormat::LineSeparator::new('─', '┴', ' ', ' ')
      )
      .padding(1, 1)
      .build();
}

impl Display for Duet {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    for program in self.programs.iter() {
      writeln!(
        f,
        "P{}: pc={} {} sent={} received={} queued={}",
        program.index,
        program.pc,
        program.status,
        program.sent,
        program.received,
        program.inbound.len()
      )?;
    }

    let mut combined_table = table!([
      make_register_table(&self.programs[0]),
      make_register_table(&self.programs[1])
    ]);

    combined_table.set_titles(row![ub->"Program 0", ub->"Program 1"]);
    combined_table.set_format(*TABLE_DISPLAY_FORMAT);

    write!(f, "{}", combined_table)
  }
}

// endregion

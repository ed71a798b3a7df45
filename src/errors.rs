//! The error taxonomy for decoding and execution. Deadlock is deliberately
//! not here: both programs blocking on `rcv` is the machine's normal way of
//! finishing, not a failure.

use thiserror::Error;

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum MachineError {
  /// A source line that matches no opcode/operand grammar. Decoding aborts
  /// on the first such line, before any execution begins.
  #[error("line {line}: `{text}` is not an instruction")]
  MalformedInstruction {
    line: usize,
    text: String
  },

  /// Modulo by zero, or an arithmetic result that does not fit a register.
  #[error("program {program}: undefined arithmetic at instruction {pc}")]
  UndefinedArithmetic {
    program: usize,
    pc: usize
  },
}

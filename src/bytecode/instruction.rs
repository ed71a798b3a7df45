
use std::fmt::{Display, Formatter};

use strum_macros::{Display as StrumDisplay, IntoStaticStr};

use crate::operand::{Operand, RegisterId};

/**
  Opcodes of the machine. The `strum` derives tie each variant to its
  assembly mnemonic, giving the decoder mnemonic -> opcode and the
  serializer opcode -> mnemonic from one definition.
*/
#[derive(
  StrumDisplay, IntoStaticStr, EnumString,
  Clone,        Copy,          Eq, PartialEq, Debug, Hash
)]
pub enum Opcode {
  #[strum(serialize = "snd")] Snd,
  #[strum(serialize = "set")] Set,
  #[strum(serialize = "add")] Add,
  #[strum(serialize = "mul")] Mul,
  #[strum(serialize = "mod")] Mod,
  #[strum(serialize = "rcv")] Rcv,
  #[strum(serialize = "jgz")] Jgz,
}

impl Opcode {
  /// How many arguments the operation takes.
  pub fn arity(&self) -> usize {
    match self {
      Opcode::Snd | Opcode::Rcv => 1,
      _                         => 2
    }
  }
}

/**
  A decoded instruction. One variant per opcode so that the executor is a
  single exhaustive match: adding an opcode without handling it is a
  compile error, not a runtime surprise.
*/
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum Instruction {
  /// Push the value onto the peer program's inbound queue.
  Snd(Operand),
  /// Store the value in the register.
  Set(RegisterId, Operand),
  Add(RegisterId, Operand),
  Mul(RegisterId, Operand),
  /// Truncating remainder; the sign follows the dividend.
  Mod(RegisterId, Operand),
  /// Pop the oldest inbound value into the register, or suspend when the
  /// queue is empty.
  Rcv(RegisterId),
  /// Jump by the offset when the condition is strictly positive.
  Jgz(Operand, Operand),
}

impl Instruction {
  pub fn opcode(&self) -> Opcode {
    match self {
      Instruction::Snd(..) => Opcode::Snd,
      Instruction::Set(..) => Opcode::Set,
      Instruction::Add(..) => Opcode::Add,
      Instruction::Mul(..) => Opcode::Mul,
      Instruction::Mod(..) => Opcode::Mod,
      Instruction::Rcv(..) => Opcode::Rcv,
      Instruction::Jgz(..) => Opcode::Jgz,
    }
  }
}

// An instruction displays as the assembly line it decoded from, which is
// what makes decoded programs round-trip through text.
impl Display for Instruction {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {

      Instruction::Snd(value) => {
        write!(f, "{} {}", Opcode::Snd, value)
      }

      | Instruction::Set(register, value)
      | Instruction::Add(register, value)
      | Instruction::Mul(register, value)
      | Instruction::Mod(register, value) => {
        write!(f, "{} {} {}", self.opcode(), register, value)
      }

      Instruction::Rcv(register) => {
        write!(f, "{} {}", Opcode::Rcv, register)
      }

      Instruction::Jgz(condition, offset) => {
        write!(f, "{} {} {}", Opcode::Jgz, condition, offset)
      }

    }
  }
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use super::*;

  fn reg(name: char) -> RegisterId {
    RegisterId::new(name).unwrap()
  }

  #[test]
  fn opcode_from_mnemonic(){
    assert_eq!(Opcode::from_str("snd"), Ok(Opcode::Snd));
    assert_eq!(Opcode::from_str("jgz"), Ok(Opcode::Jgz));
    assert!(Opcode::from_str("Snd").is_err());
    assert!(Opcode::from_str("nop").is_err());
  }

  #[test]
  fn opcode_arity(){
    assert_eq!(Opcode::Snd.arity(), 1);
    assert_eq!(Opcode::Rcv.arity(), 1);
    assert_eq!(Opcode::Set.arity(), 2);
    assert_eq!(Opcode::Jgz.arity(), 2);
  }

  #[test]
  fn display_as_assembly(){
    assert_eq!(
      Instruction::Set(reg('a'), Operand::Immediate(-3)).to_string(),
      "set a -3"
    );
    assert_eq!(
      Instruction::Snd(Operand::Register(reg('p'))).to_string(),
      "snd p"
    );
    assert_eq!(
      Instruction::Jgz(Operand::Immediate(1), Operand::Immediate(3)).to_string(),
      "jgz 1 3"
    );
    assert_eq!(Instruction::Rcv(reg('d')).to_string(), "rcv d");
  }
}

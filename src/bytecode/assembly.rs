/*!
  The decoder from assembly text to instructions. Built from `nom`
  combinators, one line at a time so that errors carry the line they
  happened on. Decoding is a pure function of the text and fails fast:
  the first malformed line aborts the whole decode, and no partially
  decoded program ever reaches the machine.
*/

use std::str::FromStr;

use nom::{
  branch::alt,
  character::complete::{
    alpha1,
    char as one_char,
    digit1,
    one_of,
    space1
  },
  combinator::{all_consuming, map, map_res, opt, recognize},
  sequence::{pair, preceded},
  IResult
};

use crate::bytecode::{Instruction, Opcode};
use crate::errors::MachineError;
use crate::operand::{Operand, RegisterId};

/// A register name: one lowercase letter.
fn register(input: &str) -> IResult<&str, RegisterId> {
  map_res(
    one_of("abcdefghijklmnopqrstuvwxyz"),
    |name| RegisterId::new(name).ok_or(())
  )(input)
}

/// A signed decimal immediate.
fn immediate(input: &str) -> IResult<&str, i64> {
  map_res(
    recognize(pair(opt(one_char('-')), digit1)),
    |digits: &str| digits.parse::<i64>()
  )(input)
}

// The two grammars are disjoint, so the order of the alternatives is
// cosmetic.
fn operand(input: &str) -> IResult<&str, Operand> {
  alt((
    map(immediate, Operand::Immediate),
    map(register, Operand::Register)
  ))(input)
}

/// The `<register> <operand>` argument form shared by `set` and the
/// arithmetic operations.
fn register_operand(input: &str) -> IResult<&str, (RegisterId, Operand)> {
  pair(
    preceded(space1, register),
    preceded(space1, operand)
  )(input)
}

/// One instruction: a mnemonic, then the arguments its opcode requires.
fn instruction(input: &str) -> IResult<&str, Instruction> {
  let (rest, opcode) = map_res(alpha1, Opcode::from_str)(input)?;

  match opcode {

    Opcode::Snd => {
      map(preceded(space1, operand), Instruction::Snd)(rest)
    }

    Opcode::Set => {
      map(register_operand, |(register, value)| Instruction::Set(register, value))(rest)
    }

    Opcode::Add => {
      map(register_operand, |(register, value)| Instruction::Add(register, value))(rest)
    }

    Opcode::Mul => {
      map(register_operand, |(register, value)| Instruction::Mul(register, value))(rest)
    }

    Opcode::Mod => {
      map(register_operand, |(register, value)| Instruction::Mod(register, value))(rest)
    }

    Opcode::Rcv => {
      map(preceded(space1, register), Instruction::Rcv)(rest)
    }

    Opcode::Jgz => {
      map(
        pair(preceded(space1, operand), preceded(space1, operand)),
        |(condition, offset)| Instruction::Jgz(condition, offset)
      )(rest)
    }

  } // end match on opcode
}

/**
  Decodes a whole program. Blank lines and `#` comments are skipped;
  every other line must be exactly one instruction. The first line that
  is not aborts the decode with the one-based line number and the
  offending text.
*/
pub fn parse_assembly(text: &str) -> Result<Vec<Instruction>, MachineError> {
  let mut program = Vec::new();

  for (index, raw_line) in text.lines().enumerate() {
    let line = match raw_line.find('#') {
      Some(start) => &raw_line[..start],
      None        => raw_line
    };
    let line = line.trim();

    if line.is_empty() {
      continue;
    }

    match all_consuming(instruction)(line) {
      Ok((_rest, decoded)) => program.push(decoded),
      Err(_e) => {
        return Err(MachineError::MalformedInstruction {
          line: index + 1,
          text: raw_line.trim().to_string()
        });
      }
    }
  } // end for each line

  Ok(program)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn reg(name: char) -> RegisterId {
    RegisterId::new(name).unwrap()
  }

  #[test]
  fn decode_every_opcode(){
    let program = parse_assembly(
      "snd 1\nset a 2\nadd a b\nmul a -4\nmod a 5\nrcv a\njgz a -2"
    ).unwrap();

    assert_eq!(program, vec![
      Instruction::Snd(Operand::Immediate(1)),
      Instruction::Set(reg('a'), Operand::Immediate(2)),
      Instruction::Add(reg('a'), Operand::Register(reg('b'))),
      Instruction::Mul(reg('a'), Operand::Immediate(-4)),
      Instruction::Mod(reg('a'), Operand::Immediate(5)),
      Instruction::Rcv(reg('a')),
      Instruction::Jgz(Operand::Register(reg('a')), Operand::Immediate(-2)),
    ]);
  }

  #[test]
  fn read_only_positions_take_immediates(){
    let program = parse_assembly("snd p\njgz 1 3").unwrap();
    assert_eq!(program, vec![
      Instruction::Snd(Operand::Register(reg('p'))),
      Instruction::Jgz(Operand::Immediate(1), Operand::Immediate(3)),
    ]);
  }

  #[test]
  fn comments_and_blank_lines(){
    let text = "\n# kick off\nsnd 1   # send a literal\n\n   rcv a\n";
    let program = parse_assembly(text).unwrap();
    assert_eq!(program.len(), 2);
  }

  #[test]
  fn unknown_mnemonic(){
    let error = parse_assembly("snd 1\nnop a\nrcv a").unwrap_err();
    assert_eq!(error, MachineError::MalformedInstruction {
      line: 2,
      text: "nop a".to_string()
    });
  }

  #[test]
  fn error_lines_count_skipped_lines(){
    let error = parse_assembly("# header\n\nsnd 1\nset 1 2").unwrap_err();
    assert_eq!(error, MachineError::MalformedInstruction {
      line: 4,
      text: "set 1 2".to_string()
    });
  }

  #[test]
  fn write_targets_must_be_registers(){
    assert!(parse_assembly("set 1 2").is_err());
    assert!(parse_assembly("rcv 1").is_err());
    assert!(parse_assembly("add A 1").is_err());
  }

  #[test]
  fn arity_is_enforced(){
    assert!(parse_assembly("snd").is_err());
    assert!(parse_assembly("snd 1 2").is_err());
    assert!(parse_assembly("set a").is_err());
    assert!(parse_assembly("jgz a").is_err());
  }

  // Decoded instructions serialize back to assembly that decodes to the
  // same instructions.
  #[test]
  fn round_trip(){
    let text = "snd 1\nsnd 2\nsnd p\nset a -7\nmod a 3\njgz p -2\nrcv d";
    let program = parse_assembly(text).unwrap();

    let reserialized: Vec<String> =
      program.iter().map(Instruction::to_string).collect();
    let reparsed = parse_assembly(&reserialized.join("\n")).unwrap();

    assert_eq!(program, reparsed);
  }
}

//! Each program instance exclusively owns one `RegisterBank`, a mapping
//! from single letter names to 64 bit signed values. Registers spring into
//! existence on first use holding 0.

use std::collections::HashMap;

use crate::operand::RegisterId;

#[derive(Clone, Debug, Default)]
pub struct RegisterBank {
  bank: HashMap<RegisterId, i64>
}

impl RegisterBank {

  pub fn new() -> RegisterBank {
    RegisterBank {
      bank: HashMap::new()
    }
  }

  /// Registers that were never written read as 0.
  pub fn get(&self, register: RegisterId) -> i64 {
    *self.bank.get(&register).unwrap_or(&0)
  }

  pub fn set(&mut self, register: RegisterId, value: i64) {
    self.bank.insert(register, value);
  }

  /// The written registers in name order, for the state display.
  pub fn snapshot(&self) -> Vec<(RegisterId, i64)> {
    let mut entries: Vec<(RegisterId, i64)> =
      self.bank.iter().map(|(register, value)| (*register, *value)).collect();
    entries.sort_by_key(|entry| entry.0);
    entries
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn reg(name: char) -> RegisterId {
    RegisterId::new(name).unwrap()
  }

  #[test]
  fn unwritten_reads_zero(){
    let bank = RegisterBank::new();
    assert_eq!(bank.get(reg('a')), 0);
  }

  #[test]
  fn set_then_get(){
    let mut bank = RegisterBank::new();
    bank.set(reg('a'), -3);
    bank.set(reg('a'), 12);
    assert_eq!(bank.get(reg('a')), 12);
  }

  #[test]
  fn snapshot_is_name_ordered(){
    let mut bank = RegisterBank::new();
    bank.set(reg('c'), 3);
    bank.set(reg('a'), 1);
    bank.set(reg('b'), 2);
    let names: Vec<char> =
      bank.snapshot().iter().map(|(register, _)| register.name()).collect();
    assert_eq!(names, vec!['a', 'b', 'c']);
  }
}

/*!

  The textual form of a program is assembly: one instruction per line,
  `<mnemonic> <argument> [<argument>]`, with `#` starting a comment that
  runs to the end of the line. Decoding produces the immutable
  `Instruction` sequence that both program instances share by reference
  for the whole run; nothing is ever re-encoded afterwards.

  Arguments come in two positions. Write targets (the first argument of
  `set`, `add`, `mul`, `mod`, and `rcv`) must name a register. Read-only
  arguments (`snd`'s value and both arguments of `jgz`) may be either a
  register name or a signed decimal immediate, so streams like `snd 1`
  and `jgz 1 3` decode the way they execute.

*/

mod assembly;
mod instruction;

pub use assembly::parse_assembly;
pub use instruction::{Instruction, Opcode};

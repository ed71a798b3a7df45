/*!
  A two-program message-passing register machine.

  One instruction sequence, decoded once, runs as two independent instances
  wired together by a pair of one directional FIFO queues. `snd` pushes a
  value onto the peer's queue; `rcv` pops the instance's own queue, or
  suspends the instance until the peer sends. The run is over when both
  instances are halted or mutually blocked, and the answer is how many
  values instance 1 sent along the way.
*/

#[macro_use] extern crate prettytable;
#[macro_use] extern crate lazy_static;
extern crate strum;
#[macro_use] extern crate strum_macros;

pub mod bytecode;
pub mod errors;
pub mod machine;
pub mod operand;
pub mod registers;

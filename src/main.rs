use std::io::Read;

use argh::FromArgs;

use duet::bytecode::parse_assembly;
use duet::machine::Duet;

/// Run two instances of a duet program against each other and print how
/// many values instance 1 sent before the joint stop.
#[derive(FromArgs)]
struct Arguments {
  /// the assembly file to run;
  /// if not specified, stdin is used
  #[argh(positional)]
  input: Option<String>,
}

fn load_input(name: Option<&str>) -> std::io::Result<String> {
  match name {
    Some(name) => std::fs::read_to_string(name),
    None => {
      let mut text = String::new();
      std::io::stdin().lock().read_to_string(&mut text)?;
      Ok(text)
    }
  }
}

fn main() {
  let arguments = argh::from_env::<Arguments>();

  let text = match load_input(arguments.input.as_deref()) {
    Ok(text)   => text,
    Err(error) => {
      eprintln!("error: {}", error);
      std::process::exit(1);
    }
  };

  let code = match parse_assembly(&text) {
    Ok(code)   => code,
    Err(error) => {
      eprintln!("error: {}", error);
      std::process::exit(1);
    }
  };

  let mut machine = Duet::new(code);

  match machine.run() {
    Ok(answer) => println!("{}", answer),
    Err(error) => {
      eprintln!("error: {}", error);
      std::process::exit(1);
    }
  }
}

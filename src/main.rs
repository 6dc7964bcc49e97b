use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;
use getopts::Options;
use intercoder::{report, Language};

fn main() {
  env_logger::init();

  let args = env::args().collect::<Vec<_>>();
  let prog = args[0].clone();
  let mut opts = Options::new();
  opts.optflag("c", "conflicts", "Print the conflicts found while building the tables");
  opts.optflag("s", "symbols", "Print the symbol table of the accepted program");
  opts.optflag("h", "help", "Print this message");

  let matches = match opts.parse(&args[1..]) {
    Ok(m) => m,
    Err(err) => {
      eprintln!("{}", err);
      process::exit(1);
    }
  };

  if matches.opt_present("h") {
    print_usage(prog, opts);
    return;
  }

  let (path, input) = match matches.free.len() {
    0 => {
      let mut input = String::new();
      if let Err(err) = io::stdin().read_to_string(&mut input) {
        eprintln!("failed to read stdin: {}", err);
        process::exit(1);
      }
      ("<stdin>".to_owned(), input)
    }
    1 => {
      let path = matches.free[0].clone();
      match fs::read_to_string(&path) {
        Ok(input) => (path, input),
        Err(err) => {
          eprintln!("failed to read {}: {}", path, err);
          process::exit(1);
        }
      }
    }
    _ => {
      print_usage(prog, opts);
      process::exit(1);
    }
  };

  let language = match Language::new() {
    Ok(language) => language,
    Err(err) => {
      eprint!("{}", report::report(&path, &input, &err));
      process::exit(1);
    }
  };

  if matches.opt_present("c") {
    for conflict in language.conflicts() {
      println!("{}", lr::report::report(conflict));
    }
  }

  let translation = match language.translate(&input) {
    Ok(translation) => translation,
    Err(err) => {
      eprint!("{}", report::report(&path, &input, &err));
      process::exit(1);
    }
  };

  for diag in &translation.diagnostics {
    eprint!("{}", report::report_diagnostic(&path, &input, diag));
  }

  for (i, inst) in translation.code.iter().enumerate() {
    println!("{}: {}", i, inst);
  }

  if matches.opt_present("s") {
    println!();
    for entry in translation.symbols.iter() {
      let (line, col) = report::line_col(&input, entry.pos);
      println!("{} at {}:{}", entry, line, col);
    }
  }
}

fn print_usage(prog: String, opts: Options) {
  let brief = format!("Usage: {} [options] [PATH]", prog);
  print!("{}", opts.usage(&brief));
}

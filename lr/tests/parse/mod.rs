use lr::{Action, Parser};

/// Runs `parser` over whitespace separated token names and records every
/// step it takes.
pub fn parse(parser: &Parser, input: &str) -> Vec<String> {
  let grammar = &parser.grammar;
  let mut events = vec![];
  let mut states = vec![0u32];
  let mut stack: Vec<String> = vec![];
  let mut tokens = input.split_whitespace();
  let mut token = tokens.next();

  loop {
    let (token_id, token_text) = match token {
      Some(name) => (grammar.token(name).unwrap(), name),
      None => (parser.eof, "EOF"),
    };
    let state = *states.last().unwrap();

    match parser.action[state as usize][token_id.index()] {
      Action::Shift(to_state) => {
        events.push(format!("shift  {}", token_text));
        states.push(to_state);
        stack.push(token_text.to_owned());
        token = tokens.next();
      }
      Action::Reduce(prod_ix) => {
        let prod = &grammar.prods[prod_ix];
        let nt_name = grammar.nt_name(prod.nt);
        let rhs_len = prod.symbols.len();

        states.truncate(states.len() - rhs_len);
        let mut event = format!("reduce {} ->", nt_name);
        for text in stack.drain(stack.len() - rhs_len..) {
          event.push(' ');
          event.push_str(&text);
        }
        events.push(event);

        let state0 = *states.last().unwrap();
        states.push(parser.goto[state0 as usize][prod.nt.index()].unwrap());
        stack.push(nt_name.to_owned());
      }
      Action::Accept => {
        events.push("accept".to_owned());
        break;
      }
      Action::Error => {
        events.push(format!("error token {}", token_text));
        break;
      }
    }
  }

  events
}

//! Table-driven shift-reduce driver.

use grammar::TokenId;
use lr::Parser;
use crate::Error;
use crate::codegen::{Attr, Translation, Translator};
use crate::lex::{Lexer, Token, TokenKind};
use crate::rules;

/// The grammar terminal a token is read as. `None` for tokens the grammar
/// has no terminal for.
pub fn terminal(parser: &Parser, token: &Token) -> Option<TokenId> {
  let name = match token.kind {
    TokenKind::Eof => return Some(parser.eof),
    TokenKind::Number => "num",
    TokenKind::Real => "real",
    TokenKind::Ident => "id",
    TokenKind::Type => "basic",
    _ => token.text,
  };
  parser.grammar.token(name)
}

fn terminal_name<'a>(parser: &'a Parser, token: &Token<'a>) -> &'a str {
  match terminal(parser, token) {
    Some(id) => parser.grammar.token_name(id),
    None => token.text,
  }
}

fn next_token<'a>(lexer: &mut Lexer<'a>, end: usize) -> Result<Token<'a>, Error> {
  match lexer.next() {
    Some(Ok(token)) => Ok(token),
    Some(Err(err)) => Err(Error::Lex(err)),
    None => Ok(Token { kind: TokenKind::Eof, text: "", start: end }),
  }
}

/// Parses `input` with `parser`, running `actions[p]` on every reduction by
/// production `p`.
pub fn parse(
  parser: &Parser,
  actions: &[rules::Action],
  input: &str,
) -> Result<Translation, Error> {
  let mut lexer = Lexer::new(input);
  let mut translator = Translator::new();
  translator.symbols_mut().enter_scope();

  let mut states = vec![0u32];
  // Slot 0 stands for the bottom `$` and is never popped.
  let mut attrs = vec![Attr::None];
  let mut token = next_token(&mut lexer, input.len())?;
  let mut step = 0usize;

  loop {
    step += 1;
    let state = states.last().copied().unwrap_or(0);
    let action = terminal(parser, &token)
      .map(|t| parser.action[state as usize][t.index()])
      .unwrap_or_default();

    log::trace!(
      "step {}: states {:?}, lookahead {:?} ({}), {}",
      step,
      states,
      token.text,
      terminal_name(parser, &token),
      action);

    match action {
      lr::Action::Shift(to_state) => {
        states.push(to_state);
        attrs.push(Attr::Token { text: token.text.to_owned(), start: token.start });
        token = next_token(&mut lexer, input.len())?;
      }
      lr::Action::Reduce(prod_ix) => {
        let prod = &parser.grammar.prods[prod_ix];
        let semantic = actions.get(prod_ix).copied().unwrap_or(rules::Action::Nothing);

        let attr = translator.reduce(semantic, &attrs, token.start)
          .map_err(|error| Error::Translate { error, pos: token.start })?;

        let n = prod.symbols.len();
        states.truncate(states.len().saturating_sub(n).max(1));
        attrs.truncate(attrs.len().saturating_sub(n).max(1));

        let top = states.last().copied().unwrap_or(0);
        match parser.goto[top as usize][prod.nt.index()] {
          Some(to_state) => {
            states.push(to_state);
            attrs.push(attr);
          }
          None => {
            return Err(Error::NoGoto {
              state: top,
              nt: parser.grammar.nt_name(prod.nt).to_owned(),
              pos: token.start,
            });
          }
        }
      }
      lr::Action::Accept => {
        log::debug!("accepted after {} steps", step);
        return Ok(translator.finish());
      }
      lr::Action::Error => {
        return Err(Error::NoAction {
          state,
          terminal: terminal_name(parser, &token).to_owned(),
          pos: token.start,
        });
      }
    }
  }
}

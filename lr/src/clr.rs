use grammar::{Grammar, Symbol, TokenId};
use crate::first::FirstSets;

/// An LR(1) item. Items order by production, then dot position, then
/// lookahead; states visit their items in this order.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct Lr1Item {
  pub prod_ix: usize,
  pub dot_ix: usize,
  pub token: u32,
}

impl Lr1Item {
  pub fn start(start_prod_ix: usize, eof_token: TokenId) -> Self {
    Lr1Item {
      prod_ix: start_prod_ix,
      dot_ix: 0,
      token: eof_token.id(),
    }
  }

  pub fn next(&self) -> Self {
    Lr1Item {
      dot_ix: self.dot_ix + 1,
      ..*self
    }
  }

  /// The symbol right after the dot, or `None` when the body is fully
  /// recognized. An ε-production is complete at position 0.
  pub fn next_symbol<'g>(&self, grammar: &'g Grammar) -> Option<&'g Symbol> {
    grammar.prods[self.prod_ix].symbols.get(self.dot_ix)
  }

  pub fn is_complete(&self, grammar: &Grammar) -> bool {
    self.dot_ix >= grammar.prods[self.prod_ix].symbols.len()
  }

  pub fn fmt(
    &self,
    grammar: &Grammar,
    f: &mut impl std::fmt::Write,
  ) -> std::fmt::Result {
    let prod = &grammar.prods[self.prod_ix];

    write!(f, "{} ->", grammar.nt_name(prod.nt))?;

    for (i, sym) in prod.symbols.iter().enumerate() {
      if i == self.dot_ix {
        write!(f, " .")?;
      }
      write!(f, " {}", grammar.symbol_name(sym))?;
    }

    if self.dot_ix == prod.symbols.len() {
      write!(f, " .")?;
    }

    write!(f, ", {}", grammar.token_name(TokenId::new(self.token)))
  }

  pub fn to_string(&self, grammar: &Grammar) -> String {
    let mut s = String::new();
    self.fmt(grammar, &mut s).unwrap();
    s
  }
}

/// Calls `action` with every item that closing over `prev` adds: for
/// `A -> α . B β, a` that is `B -> . γ, b` for each production of `B` and
/// each `b` in FIRST(β a).
pub fn closure_step<F>(
  grammar: &Grammar,
  first: &FirstSets,
  prev: &Lr1Item,
  mut action: F,
)
  where F: FnMut(Lr1Item)
{
  let symbols = &grammar.prods[prev.prod_ix].symbols;

  match symbols.get(prev.dot_ix) {
    None | Some(Symbol::Token(_)) => {}
    Some(Symbol::Nonterminal(nt)) => {
      let lookaheads = first.lookahead(&symbols[prev.dot_ix + 1..], prev.token);

      for &prod_ix in grammar.nt_prods(*nt) {
        for token in lookaheads.iter() {
          action(Lr1Item {
            prod_ix,
            dot_ix: 0,
            token: token as u32,
          });
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn item_text() {
    let grammar = Grammar::builder()
      .tokens(["c", "d", "$"])
      .rule("S", &["C", "C"])
      .rule("C", &["c", "C"])
      .rule("C", &["d"])
      .rule("E", &[])
      .build()
      .unwrap();
    let eof = grammar.token("$").unwrap();

    let item = Lr1Item::start(0, eof);
    assert_eq!(item.to_string(&grammar), "S -> . C C, $");
    assert_eq!(item.next().next().to_string(&grammar), "S -> C C ., $");
    assert_eq!(Lr1Item::start(3, eof).to_string(&grammar), "E -> ., $");
    assert!(Lr1Item::start(3, eof).is_complete(&grammar));
  }

  #[test]
  fn step_over_nonterminal() {
    let grammar = Grammar::builder()
      .tokens(["c", "d", "$"])
      .rule("S", &["C", "C"])
      .rule("C", &["c", "C"])
      .rule("C", &["d"])
      .build()
      .unwrap();
    let eof = grammar.token("$").unwrap();
    let first = crate::first::compute(&grammar);

    let mut added = vec![];
    closure_step(&grammar, &first, &Lr1Item::start(0, eof), |item| {
      added.push(item.to_string(&grammar));
    });
    added.sort();

    assert_eq!(added, vec!["C -> . c C, c", "C -> . c C, d", "C -> . d, c", "C -> . d, d"]);
  }
}

//! compute FIRST and NULLABLE sets.

use bit_set::BitSet;
use grammar::{Grammar, Symbol};

/// FIRST sets of the nonterminals, indexed by nonterminal id. A token's FIRST
/// set is the token itself. ε membership is kept apart in `nullable`.
#[derive(Debug, Clone)]
pub struct FirstSets {
  pub first: Vec<BitSet>,
  pub nullable: BitSet,
}

pub fn compute(grammar: &Grammar) -> FirstSets {
  let mut first = vec![BitSet::new(); grammar.num_nts()];
  let mut nullable = BitSet::new();

  // Sets only grow and are bounded by the token alphabet, so this terminates.
  loop {
    let mut changed = false;

    for prod in &grammar.prods {
      let head = prod.nt.index();
      let mut prod_first = BitSet::new();
      let mut prod_nullable = true;

      for sym in &prod.symbols {
        match sym {
          Symbol::Token(token) => {
            prod_first.insert(token.index());
            prod_nullable = false;
            break;
          }
          Symbol::Nonterminal(nt) => {
            prod_first.union_with(&first[nt.index()]);
            if !nullable.contains(nt.index()) {
              prod_nullable = false;
              break;
            }
          }
        }
      }

      if !prod_first.is_subset(&first[head]) {
        first[head].union_with(&prod_first);
        changed = true;
      }

      if prod_nullable && nullable.insert(head) {
        changed = true;
      }
    }

    if !changed {
      break;
    }
  }

  FirstSets {
    first,
    nullable,
  }
}

impl FirstSets {
  pub fn symbol_first(&self, sym: &Symbol) -> BitSet {
    match sym {
      Symbol::Token(token) => {
        let mut set = BitSet::new();
        set.insert(token.index());
        set
      }
      Symbol::Nonterminal(nt) => self.first[nt.index()].clone(),
    }
  }

  pub fn is_nullable(&self, sym: &Symbol) -> bool {
    match sym {
      Symbol::Token(_) => false,
      Symbol::Nonterminal(nt) => self.nullable.contains(nt.index()),
    }
  }

  /// Tokens that can follow a dot placed before `symbols` when the item's own
  /// lookahead is `lookahead`, i.e. FIRST(`symbols` `lookahead`).
  pub fn lookahead(&self, symbols: &[Symbol], lookahead: u32) -> BitSet {
    let mut set = BitSet::new();

    for sym in symbols {
      match sym {
        Symbol::Token(token) => {
          set.insert(token.index());
          return set;
        }
        Symbol::Nonterminal(nt) => {
          set.union_with(&self.first[nt.index()]);
          if !self.nullable.contains(nt.index()) {
            return set;
          }
        }
      }
    }

    set.insert(lookahead as usize);
    set
  }
}

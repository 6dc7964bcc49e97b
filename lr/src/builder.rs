use std::collections::{BTreeMap, BTreeSet};
use indexmap::IndexMap;
use grammar::{Grammar, Symbol, TokenId};
use crate::clr::{self, Lr1Item};
use crate::first::{self, FirstSets};

pub mod states;
pub mod tables;

pub type ItemSet = BTreeSet<Lr1Item>;

/// Outgoing transitions of a state, by symbol.
pub type Transitions = BTreeMap<Symbol, u32>;

/// States keyed by their full item set. The position in the map is the
/// state index; states are only ever appended.
pub type StateStore = IndexMap<ItemSet, Transitions>;

pub struct Builder<'a> {
  grammar: &'a Grammar,
  first: FirstSets,
  eof: TokenId,
  accept_prod: usize,
  states: StateStore,
}

impl<'a> Builder<'a> {
  /// `grammar` must be augmented, with `eof` as its end-of-input token.
  pub fn new(grammar: &'a Grammar, eof: TokenId) -> Self {
    let first = first::compute(grammar);
    let accept_prod = grammar.nt_prods(grammar.start_nt)[0];

    Builder {
      grammar,
      first,
      eof,
      accept_prod,
      states: StateStore::default(),
    }
  }

  pub fn grammar(&self) -> &'a Grammar {
    self.grammar
  }

  pub fn eof(&self) -> TokenId {
    self.eof
  }

  pub fn accept_prod(&self) -> usize {
    self.accept_prod
  }

  pub fn states(&self) -> &StateStore {
    &self.states
  }

  pub fn num_states(&self) -> usize {
    self.states.len()
  }

  /// Closes `items`: every item with a nonterminal after the dot pulls in
  /// the initial items of that nonterminal's productions. Each item is
  /// expanded once.
  pub fn closure(&self, mut items: ItemSet) -> ItemSet {
    let mut new = items.iter().copied().collect::<Vec<_>>();

    while let Some(item) = new.pop() {
      clr::closure_step(self.grammar, &self.first, &item, |new_item| {
        if items.insert(new_item) {
          new.push(new_item);
        }
      });
    }

    items
  }

  /// The closed item set reached from `items` over `sym`. Empty if no item
  /// has `sym` after its dot.
  pub fn goto_state(&self, items: &ItemSet, sym: &Symbol) -> ItemSet {
    let kernel = items.iter()
      .filter(|item| item.next_symbol(self.grammar) == Some(sym))
      .map(|item| item.next())
      .collect::<ItemSet>();

    if kernel.is_empty() {
      kernel
    } else {
      self.closure(kernel)
    }
  }

  /// Index of the state whose item set equals `items`.
  pub fn state_index(&self, items: &ItemSet) -> Option<u32> {
    self.states.get_index_of(items).map(|ix| ix as u32)
  }

  pub fn state_items(&self, state: u32) -> Vec<String> {
    self.states.get_index(state as usize)
      .map(|(items, _)| {
        items.iter().map(|item| item.to_string(self.grammar)).collect()
      })
      .unwrap_or_default()
  }

  pub fn fmt_states(&self, fmt: &mut impl std::fmt::Write) -> std::fmt::Result {
    for (state, (items, transitions)) in self.states.iter().enumerate() {
      writeln!(fmt, "State {}", state)?;

      for item in items {
        write!(fmt, "  ")?;
        item.fmt(self.grammar, fmt)?;
        writeln!(fmt)?;
      }

      for (sym, to_state) in transitions {
        writeln!(fmt, "  {} => {}", self.grammar.symbol_name(sym), to_state)?;
      }

      writeln!(fmt)?;
    }

    Ok(())
  }
}

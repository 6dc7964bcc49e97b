//! Canonical LR(1) parse table construction.

use grammar::{Grammar, TokenId};

pub mod first;
pub mod augment;
pub mod clr;
pub mod builder;
pub mod report;

pub use builder::Builder;
pub use builder::tables::{
  Action,
  Conflict,
  ShiftReduceConflict,
  ReduceReduceConflict,
  GotoConflict,
};

#[derive(Debug)]
pub struct Parser {
  /// The augmented grammar the tables were built from.
  pub grammar: Grammar,
  /// `action[state][token]`
  pub action: Vec<Vec<Action>>,
  /// `goto[state][nonterminal]`
  pub goto: Vec<Vec<Option<u32>>>,
  /// Conflicts found while filling the tables. The first entry written to a
  /// cell is the one kept.
  pub conflicts: Vec<Conflict>,
  pub eof: TokenId,
  /// Index of the augmented start production.
  pub accept_prod: usize,
}

impl Parser {
  pub fn num_states(&self) -> usize {
    self.action.len()
  }
}

/// Augments `grammar` and builds its canonical LR(1) tables.
pub fn build(grammar: Grammar) -> Parser {
  let (grammar, eof) = augment::augment(grammar);

  let (tables, accept_prod) = {
    let mut builder = Builder::new(&grammar, eof);
    builder::states::gen_states(&mut builder);
    (builder::tables::gen_tables(&builder), builder.accept_prod())
  };

  log::debug!(
    "built {} states, {} conflicts",
    tables.action.len(),
    tables.conflicts.len());

  Parser {
    action: tables.action,
    goto: tables.goto,
    conflicts: tables.conflicts,
    eof,
    accept_prod,
    grammar,
  }
}

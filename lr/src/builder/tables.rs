use std::fmt;
use indexmap::IndexSet;
use grammar::{Grammar, NonterminalId, Symbol, TokenId};
use super::Builder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Action {
  #[default]
  Error,
  Shift(u32),
  /// Reduce by the production with this index.
  Reduce(usize),
  Accept,
}

impl fmt::Display for Action {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Self::Error => write!(f, "error"),
      Self::Shift(state) => write!(f, "s{}", state),
      Self::Reduce(prod) => write!(f, "r{}", prod),
      Self::Accept => write!(f, "acc"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftReduceConflict {
  pub state: u32,
  pub token: String,
  pub shift: u32,
  pub reduce: String,
  pub reduce_prod: usize,
  /// The entry left in the table.
  pub kept: Action,
  pub state_items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReduceReduceConflict {
  pub state: u32,
  pub lookahead: String,
  pub reduce1: String,
  pub reduce2: String,
  pub prods: (usize, usize),
  pub kept: Action,
  pub state_items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GotoConflict {
  pub state: u32,
  pub nt: String,
  pub kept: u32,
  pub rejected: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conflict {
  ShiftReduce(ShiftReduceConflict),
  ReduceReduce(ReduceReduceConflict),
  Goto(GotoConflict),
}

impl Conflict {
  pub fn state(&self) -> u32 {
    match self {
      Self::ShiftReduce(c) => c.state,
      Self::ReduceReduce(c) => c.state,
      Self::Goto(c) => c.state,
    }
  }
}

impl fmt::Display for Conflict {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Self::ShiftReduce(c) => write!(f,
        "shift-reduce conflict in state {} on {}: shift {} or reduce by {}",
        c.state, c.token, c.shift, c.reduce),
      Self::ReduceReduce(c) => write!(f,
        "reduce-reduce conflict in state {} on {}: reduce by {} or by {}",
        c.state, c.lookahead, c.reduce1, c.reduce2),
      Self::Goto(c) => write!(f,
        "goto conflict in state {} on {}: {} or {}",
        c.state, c.nt, c.kept, c.rejected),
    }
  }
}

impl std::error::Error for Conflict {}

#[derive(Debug)]
pub struct Tables {
  /// `action[state][token]`
  pub action: Vec<Vec<Action>>,
  /// `goto[state][nonterminal]`
  pub goto: Vec<Vec<Option<u32>>>,
  pub conflicts: Vec<Conflict>,
}

/// Generates ACTION table and GOTO table.
///
/// When two entries compete for a cell the one written first stays and the
/// clash is recorded as a conflict. Items are visited in state item order,
/// so among competing productions the one with the smaller index is written
/// first. A clash is recorded once per cell and rejected action, however many
/// items ask for it.
pub fn gen_tables(builder: &Builder) -> Tables {
  let mut conflicts = vec![];
  let goto = gen_goto_table(builder, &mut conflicts);
  let action = gen_action_table(builder, &mut conflicts);

  for conflict in &conflicts {
    log::warn!("{}", conflict);
  }

  Tables {
    action,
    goto,
    conflicts,
  }
}

fn gen_goto_table(
  builder: &Builder,
  conflicts: &mut Vec<Conflict>,
) -> Vec<Vec<Option<u32>>> {
  let grammar = builder.grammar();
  let mut goto = vec![vec![None; grammar.num_nts()]; builder.num_states()];

  for (from_state, (items, transitions)) in builder.states().iter().enumerate() {
    for item in items {
      let nt = match item.next_symbol(grammar) {
        Some(Symbol::Nonterminal(nt)) => *nt,
        _ => continue,
      };
      let to_state = match transitions.get(&Symbol::Nonterminal(nt)) {
        Some(&to_state) => to_state,
        None => continue,
      };

      let cell = &mut goto[from_state][nt.index()];
      match *cell {
        None => *cell = Some(to_state),
        Some(old) if old == to_state => {}
        Some(old) => {
          conflicts.push(make_goto_conflict(grammar, from_state as u32, nt, old, to_state));
        }
      }
    }
  }

  goto
}

fn gen_action_table(
  builder: &Builder,
  conflicts: &mut Vec<Conflict>,
) -> Vec<Vec<Action>> {
  let grammar = builder.grammar();
  let mut action = vec![vec![Action::Error; grammar.num_tokens()]; builder.num_states()];
  let mut rejected = IndexSet::new();

  for (from_state, (items, transitions)) in builder.states().iter().enumerate() {
    for item in items {
      let (token, new) = match item.next_symbol(grammar) {
        Some(Symbol::Token(token)) => match transitions.get(&Symbol::Token(*token)) {
          Some(&to_state) => (*token, Action::Shift(to_state)),
          None => continue,
        },
        Some(Symbol::Nonterminal(_)) => continue,
        None => {
          let token = TokenId::new(item.token);
          if item.prod_ix == builder.accept_prod() && token == builder.eof() {
            (token, Action::Accept)
          } else {
            (token, Action::Reduce(item.prod_ix))
          }
        }
      };

      let cell = &mut action[from_state][token.index()];
      let old = *cell;
      if old == Action::Error {
        *cell = new;
      } else if old != new && rejected.insert((from_state, token, new)) {
        conflicts.push(make_action_conflict(builder, from_state as u32, token, old, new));
      }
    }
  }

  action
}

/// The production an action reduces by; `Accept` reduces by the augmented
/// start production.
fn reduced_prod(builder: &Builder, action: Action) -> Option<usize> {
  match action {
    Action::Reduce(prod) => Some(prod),
    Action::Accept => Some(builder.accept_prod()),
    Action::Shift(_) | Action::Error => None,
  }
}

fn make_action_conflict(
  builder: &Builder,
  state: u32,
  token: TokenId,
  kept: Action,
  rejected: Action,
) -> Conflict {
  let grammar = builder.grammar();
  let token_name = grammar.token_name(token).to_owned();
  let state_items = builder.state_items(state);

  match (kept, rejected) {
    (Action::Shift(shift), other) | (other, Action::Shift(shift)) => {
      let reduce_prod = reduced_prod(builder, other).unwrap_or_default();
      Conflict::ShiftReduce(ShiftReduceConflict {
        state,
        token: token_name,
        shift,
        reduce: prod_text(grammar, reduce_prod),
        reduce_prod,
        kept,
        state_items,
      })
    }
    _ => {
      let prod1 = reduced_prod(builder, kept).unwrap_or_default();
      let prod2 = reduced_prod(builder, rejected).unwrap_or_default();
      Conflict::ReduceReduce(ReduceReduceConflict {
        state,
        lookahead: token_name,
        reduce1: prod_text(grammar, prod1),
        reduce2: prod_text(grammar, prod2),
        prods: (prod1, prod2),
        kept,
        state_items,
      })
    }
  }
}

fn make_goto_conflict(
  grammar: &Grammar,
  state: u32,
  nt: NonterminalId,
  kept: u32,
  rejected: u32,
) -> Conflict {
  Conflict::Goto(GotoConflict {
    state,
    nt: grammar.nt_name(nt).to_owned(),
    kept,
    rejected,
  })
}

fn prod_text(grammar: &Grammar, prod: usize) -> String {
  grammar.prods[prod].to_string(grammar)
}

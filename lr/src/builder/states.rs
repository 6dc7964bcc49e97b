use std::collections::{BTreeSet, VecDeque};
use indexmap::map::Entry;
use grammar::Symbol;
use crate::clr::Lr1Item;
use super::{Builder, ItemSet, Transitions};

/// Builds the canonical collection. State 0 is the closure of the start
/// item; every other state is discovered breadth-first, in the order of the
/// symbols after the dots of its predecessor.
pub fn gen_states(builder: &mut Builder) {
  let start_item = Lr1Item::start(builder.accept_prod(), builder.eof());
  let start_state = builder.closure(ItemSet::from([start_item]));

  let (start_ix, _) = store_state(builder, start_state);

  let mut queue = VecDeque::new();
  queue.push_back(start_ix);

  while let Some(state_ix) = queue.pop_front() {
    let items = match builder.states.get_index(state_ix as usize) {
      Some((items, _)) => items.clone(),
      None => continue,
    };

    let mut transitions = Transitions::new();

    for sym in next_symbols(builder, &items) {
      let next = builder.goto_state(&items, &sym);
      if next.is_empty() {
        continue;
      }

      let (next_ix, added) = store_state(builder, next);
      if added {
        queue.push_back(next_ix);
      }
      transitions.insert(sym, next_ix);
    }

    if let Some((_, slot)) = builder.states.get_index_mut(state_ix as usize) {
      *slot = transitions;
    }
  }

  log::trace!("canonical collection has {} states", builder.num_states());
}

/// Symbols that appear right after a dot in `items`, in vocabulary order.
fn next_symbols(builder: &Builder, items: &ItemSet) -> BTreeSet<Symbol> {
  items.iter()
    .filter_map(|item| item.next_symbol(builder.grammar()))
    .copied()
    .collect()
}

/// Returns the index of the state with the item set `items`, appending it
/// when no such state exists yet. The flag tells whether it was appended.
fn store_state(builder: &mut Builder, items: ItemSet) -> (u32, bool) {
  match builder.states.entry(items) {
    Entry::Occupied(entry) => (entry.index() as u32, false),
    Entry::Vacant(entry) => {
      let ix = entry.index() as u32;
      entry.insert(Transitions::new());
      (ix, true)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;
  use grammar::Grammar;
  use crate::augment;

  fn dragon() -> Grammar {
    Grammar::builder()
      .tokens(["c", "d"])
      .rule("S", &["C", "C"])
      .rule("C", &["c", "C"])
      .rule("C", &["d"])
      .build()
      .unwrap()
  }

  #[test]
  fn dragon_book_collection() {
    let (grammar, eof) = augment::augment(dragon());
    let mut builder = Builder::new(&grammar, eof);
    gen_states(&mut builder);

    assert_eq!(builder.num_states(), 10);

    let mut buf = String::new();
    builder.fmt_states(&mut buf).unwrap();
    insta::assert_snapshot!(buf.lines().take(11).collect::<Vec<_>>().join("\n"), @r###"
    State 0
      S -> . C C, $
      C -> . c C, c
      C -> . c C, d
      C -> . d, c
      C -> . d, d
      S' -> . S, $
      c => 1
      d => 2
      S => 3
      C => 4
    "###);
  }

  #[test]
  fn states_are_distinct() {
    let (grammar, eof) = augment::augment(dragon());
    let mut builder = Builder::new(&grammar, eof);
    gen_states(&mut builder);

    let sets = builder.states().keys().collect::<Vec<_>>();
    for (i, a) in sets.iter().enumerate() {
      for b in &sets[i + 1..] {
        assert_ne!(a, b);
      }
    }
  }

  #[test]
  fn transitions_match_goto() {
    let (grammar, eof) = augment::augment(dragon());
    let mut builder = Builder::new(&grammar, eof);
    gen_states(&mut builder);

    for (items, transitions) in builder.states() {
      for (sym, &to) in transitions {
        let next = builder.goto_state(items, sym);
        assert_eq!(builder.state_index(&next), Some(to));
      }
    }
  }
}

use insta::assert_snapshot;
use grammar::Grammar;

mod parse;

fn expr() -> lr::Parser {
  let grammar = Grammar::builder()
    .tokens(["+", "*", "(", ")", "id"])
    .rule("E", &["E", "+", "T"])
    .rule("E", &["T"])
    .rule("T", &["T", "*", "F"])
    .rule("T", &["F"])
    .rule("F", &["(", "E", ")"])
    .rule("F", &["id"])
    .build()
    .unwrap();
  lr::build(grammar)
}

#[test]
fn precedence_by_layering() {
  let parser = expr();
  assert!(parser.conflicts.is_empty());

  assert_snapshot!(parse::parse(&parser, "id + id * id").join("\n"), @r###"
  shift  id
  reduce F -> id
  reduce T -> F
  reduce E -> T
  shift  +
  shift  id
  reduce F -> id
  reduce T -> F
  shift  *
  shift  id
  reduce F -> id
  reduce T -> T * F
  reduce E -> E + T
  accept
  "###);
}

#[test]
fn syntax_error() {
  let parser = expr();

  assert_snapshot!(parse::parse(&parser, "id + + id").join("\n"), @r###"
  shift  id
  reduce F -> id
  reduce T -> F
  reduce E -> T
  shift  +
  error token +
  "###);
}

#[test]
fn epsilon_productions() {
  let grammar = Grammar::builder()
    .tokens(["{", "}", "x"])
    .rule("B", &["{", "D", "}"])
    .rule("D", &["D", "x"])
    .rule("D", &[])
    .build()
    .unwrap();
  let parser = lr::build(grammar);
  assert!(parser.conflicts.is_empty());

  assert_snapshot!(parse::parse(&parser, "{ x x }").join("\n"), @r###"
  shift  {
  reduce D ->
  shift  x
  reduce D -> D x
  shift  x
  reduce D -> D x
  shift  }
  reduce B -> { D }
  accept
  "###);
}

#[test]
fn dangling_else_shifts() {
  let grammar = Grammar::builder()
    .tokens(["i", "e", "a"])
    .rule("S", &["i", "S", "e", "S"])
    .rule("S", &["i", "S"])
    .rule("S", &["a"])
    .build()
    .unwrap();
  let parser = lr::build(grammar);
  assert!(!parser.conflicts.is_empty());

  assert_snapshot!(parse::parse(&parser, "i i a e a").join("\n"), @r###"
  shift  i
  shift  i
  shift  a
  reduce S -> a
  shift  e
  shift  a
  reduce S -> a
  reduce S -> i S e S
  reduce S -> i S
  accept
  "###);
}

#[test]
fn not_lalr() {
  // LR(1) but not LALR(1): merging the states after `c` would clash on
  // reductions by A and B.
  let grammar = Grammar::builder()
    .tokens(["a", "b", "c", "d", "e"])
    .rule("S", &["a", "A", "d"])
    .rule("S", &["b", "B", "d"])
    .rule("S", &["a", "B", "e"])
    .rule("S", &["b", "A", "e"])
    .rule("A", &["c"])
    .rule("B", &["c"])
    .build()
    .unwrap();
  let parser = lr::build(grammar);
  assert!(parser.conflicts.is_empty());

  assert_snapshot!(parse::parse(&parser, "b c d").join("\n"), @r###"
  shift  b
  shift  c
  reduce B -> c
  shift  d
  reduce S -> b B d
  accept
  "###);
}

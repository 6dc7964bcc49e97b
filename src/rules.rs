//! The source language's grammar. Each rule carries the semantic action run
//! when the parser reduces by it; the index of a rule is its production index.

use grammar::{Grammar, GrammarError};
use crate::codegen::{BinOp, UnOp};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
  /// Structural rules that synthesize nothing.
  Nothing,
  /// Passes the attribute of the last body symbol up.
  Pass,
  /// `factor -> ( bool )`
  Paren,
  Decl,
  DeclArray,
  TypeArray,
  BasicType,
  Assign,
  IfElse,
  If,
  While,
  DoWhile,
  Break,
  NestedBlock,
  LocIndex,
  LocId,
  Binary(BinOp),
  Unary(UnOp),
  IfTest,
  IfElseMark,
  LoopEnter,
  LoopTest,
  ScopeEnter,
}

pub struct Rule {
  pub head: &'static str,
  pub body: &'static [&'static str],
  pub action: Action,
}

const fn rule(head: &'static str, body: &'static [&'static str], action: Action) -> Rule {
  Rule { head, body, action }
}

/// Terminals in token id order. `basic` stands for every type keyword, `num`
/// and `real` for numeric literals and `id` for identifiers.
pub const TOKENS: &[&str] = &[
  "{", "}", ";", "[", "]", "(", ")", "=",
  "id", "num", "real", "basic",
  "if", "else", "while", "do", "break", "true", "false",
  "||", "&&", "==", "!=", "<", "<=", ">=", ">",
  "+", "-", "*", "/", "!",
];

use Action::*;

pub const RULES: &[Rule] = &[
  rule("program", &["block"], Nothing),
  rule("block", &["{", "decls", "stmts", "}"], Nothing),
  rule("decls", &["decls", "decl"], Nothing),
  rule("decls", &[], Nothing),
  rule("decl", &["type", "id", ";"], Decl),
  rule("decl", &["type", "id", "[", "num", "]", ";"], DeclArray),
  rule("type", &["type_array"], Nothing),
  rule("type_array", &["type", "[", "num", "]"], TypeArray),
  rule("type", &["basic"], BasicType),
  rule("stmts", &["stmts", "stmt"], Nothing),
  rule("stmts", &[], Nothing),
  rule("stmt", &["loc", "=", "bool", ";"], Assign),
  // Clashes with `factor -> num` on `;`.
  rule("stmt", &["loc", "=", "num", ";"], Assign),
  // Clashes with the if-else rule on `else`. Being written first, the
  // reduction by the plain if is the entry kept.
  rule("stmt", &["if", "(", "bool", ")", "if_test", "stmt"], If),
  rule("stmt", &["if", "(", "bool", ")", "if_test", "stmt", "else", "if_else", "stmt"], IfElse),
  rule("stmt", &["while", "loop_enter", "(", "bool", ")", "loop_test", "stmt"], While),
  rule("stmt", &["do", "loop_enter", "stmt", "while", "(", "bool", ")", ";"], DoWhile),
  rule("stmt", &["break", ";"], Break),
  rule("stmt", &["scope_enter", "block"], NestedBlock),
  rule("loc", &["loc_array"], Pass),
  rule("loc_array", &["loc", "[", "num", "]"], LocIndex),
  rule("loc", &["id"], LocId),
  rule("bool", &["bool", "||", "join"], Binary(BinOp::Or)),
  rule("bool", &["join"], Pass),
  rule("join", &["join", "&&", "equality"], Binary(BinOp::And)),
  rule("join", &["equality"], Pass),
  rule("equality", &["equality", "==", "rel"], Binary(BinOp::Eq)),
  rule("equality", &["equality", "!=", "rel"], Binary(BinOp::Ne)),
  rule("equality", &["rel"], Pass),
  rule("rel", &["expr", "<", "expr"], Binary(BinOp::Lt)),
  rule("rel", &["expr", "<=", "expr"], Binary(BinOp::Le)),
  rule("rel", &["expr", ">=", "expr"], Binary(BinOp::Ge)),
  rule("rel", &["expr", ">", "expr"], Binary(BinOp::Gt)),
  rule("rel", &["expr"], Pass),
  rule("expr", &["expr", "+", "term"], Binary(BinOp::Add)),
  rule("expr", &["expr", "-", "term"], Binary(BinOp::Sub)),
  rule("expr", &["term"], Pass),
  rule("term", &["term", "*", "unary"], Binary(BinOp::Mul)),
  rule("term", &["term", "/", "unary"], Binary(BinOp::Div)),
  rule("term", &["unary"], Pass),
  rule("unary", &["!", "unary"], Unary(UnOp::Not)),
  rule("unary", &["-", "unary"], Unary(UnOp::Neg)),
  rule("unary", &["factor"], Pass),
  rule("factor", &["(", "bool", ")"], Paren),
  rule("factor", &["loc"], Pass),
  rule("factor", &["num"], Pass),
  rule("factor", &["real"], Pass),
  rule("factor", &["true"], Pass),
  rule("factor", &["false"], Pass),
  // Markers reduced in the middle of a statement, before the part of its
  // code that has to follow the instructions they emit.
  rule("if_test", &[], IfTest),
  rule("if_else", &[], IfElseMark),
  rule("loop_enter", &[], LoopEnter),
  rule("loop_test", &[], LoopTest),
  rule("scope_enter", &[], ScopeEnter),
];

pub fn grammar() -> Result<Grammar, GrammarError> {
  RULES.iter()
    .fold(Grammar::builder().tokens(TOKENS.iter().copied()), |builder, rule| {
      builder.rule(rule.head, rule.body)
    })
    .start("program")
    .build()
}

/// Semantic actions indexed by production.
pub fn actions() -> Vec<Action> {
  RULES.iter().map(|rule| rule.action).collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn grammar_is_well_formed() {
    let grammar = grammar().unwrap();

    assert_eq!(grammar.prods.len(), RULES.len());
    assert_eq!(grammar.num_tokens(), TOKENS.len());
    assert_eq!(grammar.nt_name(grammar.start_nt), "program");

    for (prod, rule) in grammar.prods.iter().zip(RULES) {
      assert_eq!(grammar.nt_name(prod.nt), rule.head);
      assert_eq!(prod.symbols.len(), rule.body.len());
    }
  }

  #[test]
  fn production_indices() {
    let grammar = grammar().unwrap();
    let text = |ix: usize| grammar.prods[ix].to_string(&grammar);

    assert_eq!(text(3), "decls -> ε");
    assert_eq!(text(11), "stmt -> loc = bool ;");
    assert_eq!(text(12), "stmt -> loc = num ;");
    assert_eq!(text(13), "stmt -> if ( bool ) if_test stmt");
    assert_eq!(text(21), "loc -> id");
    assert_eq!(text(48), "factor -> false");
    assert_eq!(text(53), "scope_enter -> ε");
  }
}

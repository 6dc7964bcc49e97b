//! Translates programs of a small block-structured language into
//! three-address code, driven by canonical LR(1) tables built at startup.

use std::fmt;
use grammar::GrammarError;

pub mod lex;
pub mod rules;
pub mod symbols;
pub mod codegen;
pub mod parse;
pub mod report;

pub use codegen::{Diagnostic, Instruction, Label, TranslateError, Translation};
pub use lex::LexError;
pub use symbols::{SymbolEntry, SymbolError, SymbolKind, SymbolTable};

#[derive(Debug)]
pub enum Error {
  Grammar(GrammarError),
  Lex(LexError),
  /// No ACTION entry for the lookahead.
  NoAction { state: u32, terminal: String, pos: usize },
  /// No GOTO entry after a reduction.
  NoGoto { state: u32, nt: String, pos: usize },
  Translate { error: TranslateError, pos: usize },
}

impl Error {
  /// Byte offset in the input the error points at.
  pub fn pos(&self) -> Option<usize> {
    match self {
      Self::Grammar(_) => None,
      Self::Lex(err) => Some(err.pos()),
      Self::NoAction { pos, .. } | Self::NoGoto { pos, .. } | Self::Translate { pos, .. } => {
        Some(*pos)
      }
    }
  }
}

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Self::Grammar(err) => write!(f, "{}", err),
      Self::Lex(err) => write!(f, "{}", err),
      Self::NoAction { state, terminal, .. } => {
        write!(f, "no action in state {} for {}", state, terminal)
      }
      Self::NoGoto { state, nt, .. } => {
        write!(f, "no goto in state {} for {}", state, nt)
      }
      Self::Translate { error, .. } => write!(f, "{}", error),
    }
  }
}

impl std::error::Error for Error {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::Grammar(err) => Some(err),
      Self::Lex(err) => Some(err),
      Self::Translate { error, .. } => Some(error),
      Self::NoAction { .. } | Self::NoGoto { .. } => None,
    }
  }
}

impl From<GrammarError> for Error {
  fn from(err: GrammarError) -> Self {
    Self::Grammar(err)
  }
}

impl From<LexError> for Error {
  fn from(err: LexError) -> Self {
    Self::Lex(err)
  }
}

/// The source language: its LR(1) tables and the semantic action of every
/// production. Build it once and translate any number of programs with it.
pub struct Language {
  parser: lr::Parser,
  actions: Vec<rules::Action>,
}

impl Language {
  pub fn new() -> Result<Self, Error> {
    let grammar = rules::grammar()?;
    let parser = lr::build(grammar);

    Ok(Self {
      parser,
      actions: rules::actions(),
    })
  }

  pub fn parser(&self) -> &lr::Parser {
    &self.parser
  }

  /// Conflicts found while building the tables. The entry written first was
  /// kept for each of them.
  pub fn conflicts(&self) -> &[lr::Conflict] {
    &self.parser.conflicts
  }

  pub fn translate(&self, source: &str) -> Result<Translation, Error> {
    parse::parse(&self.parser, &self.actions, source)
  }
}

/// Builds the language and translates `source` with it.
pub fn compile(source: &str) -> Result<Translation, Error> {
  Language::new()?.translate(source)
}

//! Syntax-directed translation into three-address code.
//!
//! The parser hands every reduction to a [`Translator`] together with the
//! attributes on its symbol stack. Control flow is laid out by marker rules
//! that are reduced before the code which must follow their jumps, so the
//! instruction log only ever grows at the end.

use std::fmt;
use crate::rules::Action;
use crate::symbols::{SymbolError, SymbolTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label(pub u32);

impl fmt::Display for Label {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "L{}", self.0)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
  Or,
  And,
  Eq,
  Ne,
  Lt,
  Le,
  Ge,
  Gt,
  Add,
  Sub,
  Mul,
  Div,
}

impl BinOp {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Or => "||",
      Self::And => "&&",
      Self::Eq => "==",
      Self::Ne => "!=",
      Self::Lt => "<",
      Self::Le => "<=",
      Self::Ge => ">=",
      Self::Gt => ">",
      Self::Add => "+",
      Self::Sub => "-",
      Self::Mul => "*",
      Self::Div => "/",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
  Not,
  Neg,
}

impl UnOp {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Not => "!",
      Self::Neg => "-",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
  Copy { dst: String, src: String },
  Binary { dst: String, op: BinOp, lhs: String, rhs: String },
  Unary { dst: String, op: UnOp, src: String },
  Label(Label),
  Goto(Label),
  IfFalse { cond: String, target: Label },
  If { cond: String, target: Label },
}

impl fmt::Display for Instruction {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Self::Copy { dst, src } => write!(f, "{} = {}", dst, src),
      Self::Binary { dst, op, lhs, rhs } => {
        write!(f, "{} = {} {} {}", dst, lhs, op.as_str(), rhs)
      }
      Self::Unary { dst, op, src } => write!(f, "{} = {} {}", dst, op.as_str(), src),
      Self::Label(label) => write!(f, "{}:", label),
      Self::Goto(label) => write!(f, "goto {}", label),
      Self::IfFalse { cond, target } => write!(f, "ifFalse {} goto {}", cond, target),
      Self::If { cond, target } => write!(f, "if {} goto {}", cond, target),
    }
  }
}

/// Attribute synthesized for a symbol on the parser's stack.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Attr {
  #[default]
  None,
  /// A shifted token and its offset in the input.
  Token { text: String, start: usize },
  /// The place holding an operand.
  Place(String),
  Label(Label),
  Loop { start: Label, exit: Label },
}

impl Attr {
  fn place(&self) -> &str {
    match self {
      Attr::Token { text, .. } => text,
      Attr::Place(place) => place,
      _ => "",
    }
  }

  fn start(&self) -> Option<usize> {
    match self {
      Attr::Token { start, .. } => Some(*start),
      _ => None,
    }
  }
}

/// A problem that does not stop the translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
  pub error: SymbolError,
  /// Offset of the name the problem is about.
  pub pos: usize,
}

impl fmt::Display for Diagnostic {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self.error)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
  BreakOutsideLoop,
  BadArraySize { text: String },
  /// The symbol stack does not hold what a rule expects.
  MissingAttr { action: Action },
}

impl fmt::Display for TranslateError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Self::BreakOutsideLoop => write!(f, "break outside of a loop"),
      Self::BadArraySize { text } => write!(f, "invalid array size '{}'", text),
      Self::MissingAttr { action } => {
        write!(f, "missing attribute on the stack for {:?}", action)
      }
    }
  }
}

impl std::error::Error for TranslateError {}

/// Result of translating a whole program.
#[derive(Debug, Clone)]
pub struct Translation {
  pub code: Vec<Instruction>,
  /// The symbol table as it stood when the program was accepted.
  pub symbols: SymbolTable,
  pub diagnostics: Vec<Diagnostic>,
}

impl Translation {
  pub fn lines(&self) -> Vec<String> {
    self.code.iter().map(|inst| inst.to_string()).collect()
  }
}

#[derive(Debug, Default)]
pub struct Translator {
  symbols: SymbolTable,
  code: Vec<Instruction>,
  labels: u32,
  breaks: Vec<Label>,
  last_type: String,
  last_size: u32,
  last_name: String,
  diagnostics: Vec<Diagnostic>,
}

impl Translator {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn symbols(&self) -> &SymbolTable {
    &self.symbols
  }

  pub fn symbols_mut(&mut self) -> &mut SymbolTable {
    &mut self.symbols
  }

  pub fn code(&self) -> &[Instruction] {
    &self.code
  }

  /// Name of the last plain identifier used as a location.
  pub fn last_name(&self) -> &str {
    &self.last_name
  }

  pub fn new_label(&mut self) -> Label {
    let label = Label(self.labels);
    self.labels += 1;
    label
  }

  fn emit(&mut self, inst: Instruction) {
    log::trace!("emit {}", inst);
    self.code.push(inst);
  }

  /// Runs the semantic action of a reduction. `stack` is the whole symbol
  /// stack with the rule's body on top; `pos` is the offset of the lookahead
  /// token. Returns the attribute of the rule's head.
  pub fn reduce(
    &mut self,
    action: Action,
    stack: &[Attr],
    pos: usize,
  ) -> Result<Attr, TranslateError> {
    // `k` counts down from the top of the stack, 0 being the last symbol.
    let at = |k: usize| attr_at(stack, k, action);
    let label_at = |k: usize| match at(k)? {
      Attr::Label(label) => Ok(*label),
      _ => Err(TranslateError::MissingAttr { action }),
    };
    let loop_at = |k: usize| match at(k)? {
      Attr::Loop { start, exit } => Ok((*start, *exit)),
      _ => Err(TranslateError::MissingAttr { action }),
    };

    let attr = match action {
      Action::Nothing => Attr::None,
      Action::Pass => at(0)?.clone(),
      Action::Paren => at(1)?.clone(),

      Action::BasicType => {
        self.last_type = at(0)?.place().to_owned();
        Attr::None
      }
      Action::TypeArray => {
        let size = parse_size(at(1)?.place())?;
        self.last_size = if self.last_size == 0 { size } else { self.last_size * size };
        Attr::None
      }
      Action::Decl => {
        let name = at(1)?;
        self.define(name.place(), self.last_size, name.start().unwrap_or(pos));
        Attr::None
      }
      Action::DeclArray => {
        let name = at(4)?;
        let size = parse_size(at(2)?.place())?;
        let size = if self.last_size == 0 { size } else { self.last_size * size };
        self.define(name.place(), size, name.start().unwrap_or(pos));
        Attr::None
      }

      Action::LocId => {
        let name = at(0)?.place().to_owned();
        self.last_name = name.clone();
        Attr::Place(name)
      }
      Action::LocIndex => {
        let base = at(3)?.place();
        let index = at(1)?.place();
        Attr::Place(format!("{}[{}]", base, index))
      }
      Action::Assign => {
        let dst = at(3)?.place().to_owned();
        let src = at(1)?.place().to_owned();
        self.emit(Instruction::Copy { dst, src });
        Attr::None
      }
      Action::Binary(op) => {
        let lhs = at(2)?.place().to_owned();
        let rhs = at(0)?.place().to_owned();
        let dst = self.symbols.new_temp();
        self.emit(Instruction::Binary { dst: dst.clone(), op, lhs, rhs });
        Attr::Place(dst)
      }
      Action::Unary(op) => {
        let src = at(0)?.place().to_owned();
        let dst = self.symbols.new_temp();
        self.emit(Instruction::Unary { dst: dst.clone(), op, src });
        Attr::Place(dst)
      }

      // if ( bool ) . if_test
      Action::IfTest => {
        let cond = at(1)?.place().to_owned();
        let else_label = self.new_label();
        self.emit(Instruction::IfFalse { cond, target: else_label });
        Attr::Label(else_label)
      }
      // if ( bool ) if_test stmt else . if_else
      Action::IfElseMark => {
        let else_label = label_at(2)?;
        let end = self.new_label();
        self.emit(Instruction::Goto(end));
        self.emit(Instruction::Label(else_label));
        Attr::Label(end)
      }
      Action::If => {
        let else_label = label_at(1)?;
        self.emit(Instruction::Label(else_label));
        Attr::None
      }
      Action::IfElse => {
        let end = label_at(1)?;
        self.emit(Instruction::Label(end));
        Attr::None
      }

      // while . loop_enter, do . loop_enter
      Action::LoopEnter => {
        let start = self.new_label();
        let exit = self.new_label();
        self.emit(Instruction::Label(start));
        self.breaks.push(exit);
        Attr::Loop { start, exit }
      }
      // while loop_enter ( bool ) . loop_test
      Action::LoopTest => {
        let (_, exit) = loop_at(3)?;
        let cond = at(1)?.place().to_owned();
        self.emit(Instruction::IfFalse { cond, target: exit });
        Attr::None
      }
      Action::While => {
        let (start, exit) = loop_at(5)?;
        self.emit(Instruction::Goto(start));
        self.emit(Instruction::Label(exit));
        self.breaks.pop();
        Attr::None
      }
      Action::DoWhile => {
        let (start, exit) = loop_at(6)?;
        let cond = at(2)?.place().to_owned();
        self.emit(Instruction::If { cond, target: start });
        self.emit(Instruction::Label(exit));
        self.breaks.pop();
        Attr::None
      }
      Action::Break => {
        let exit = *self.breaks.last().ok_or(TranslateError::BreakOutsideLoop)?;
        self.emit(Instruction::Goto(exit));
        Attr::None
      }

      Action::ScopeEnter => {
        self.symbols.enter_scope();
        Attr::None
      }
      Action::NestedBlock => {
        self.symbols.exit_scope();
        Attr::None
      }
    };

    Ok(attr)
  }

  /// Defines `name` with the pending type and clears the pending type and
  /// size. A duplicate is recorded and skipped.
  fn define(&mut self, name: &str, size: u32, pos: usize) {
    let data_type = std::mem::take(&mut self.last_type);
    self.last_size = 0;

    match self.symbols.define_data(name, &data_type, size, pos) {
      Ok(entry) => log::debug!("defined {}", entry),
      Err(error) => {
        log::warn!("{}", error);
        self.diagnostics.push(Diagnostic { error, pos });
      }
    }
  }

  /// Takes the symbol table as it is now, then leaves the active scope.
  pub fn finish(mut self) -> Translation {
    let symbols = self.symbols.clone();
    self.symbols.exit_scope();

    Translation {
      code: self.code,
      symbols,
      diagnostics: self.diagnostics,
    }
  }
}

fn attr_at(stack: &[Attr], k: usize, action: Action) -> Result<&Attr, TranslateError> {
  stack.len().checked_sub(k + 1)
    .map(|ix| &stack[ix])
    .ok_or(TranslateError::MissingAttr { action })
}

fn parse_size(text: &str) -> Result<u32, TranslateError> {
  text.parse()
    .map_err(|_| TranslateError::BadArraySize { text: text.to_owned() })
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  fn place(s: &str) -> Attr {
    Attr::Place(s.to_owned())
  }

  fn lines(translator: &Translator) -> Vec<String> {
    translator.code().iter().map(|inst| inst.to_string()).collect()
  }

  #[test]
  fn instruction_text() {
    let insts = [
      Instruction::Copy { dst: "x".into(), src: "t1".into() },
      Instruction::Binary { dst: "t1".into(), op: BinOp::Le, lhs: "a".into(), rhs: "2".into() },
      Instruction::Unary { dst: "t2".into(), op: UnOp::Neg, src: "b".into() },
      Instruction::Label(Label(3)),
      Instruction::Goto(Label(3)),
      Instruction::IfFalse { cond: "t1".into(), target: Label(0) },
      Instruction::If { cond: "c".into(), target: Label(1) },
    ];
    let text = insts.iter().map(|i| i.to_string()).collect::<Vec<_>>();

    assert_eq!(text, vec![
      "x = t1",
      "t1 = a <= 2",
      "t2 = - b",
      "L3:",
      "goto L3",
      "ifFalse t1 goto L0",
      "if c goto L1",
    ]);
  }

  #[test]
  fn declaration_uses_pending_type() {
    let mut tr = Translator::new();
    tr.symbols_mut().enter_scope();

    tr.reduce(Action::BasicType, &[Attr::None, place("int")], 0).unwrap();
    tr.reduce(Action::Decl, &[Attr::None, Attr::None, place("x"), place(";")], 0).unwrap();

    let x = tr.symbols().lookup("x").unwrap();
    assert_eq!(x.data_type, "int");
    assert_eq!(x.array_size, 0);

    tr.reduce(Action::BasicType, &[Attr::None, place("bool")], 0).unwrap();
    tr.reduce(Action::TypeArray, &[Attr::None, place("["), place("3"), place("]")], 0).unwrap();
    tr.reduce(Action::TypeArray, &[Attr::None, place("["), place("4"), place("]")], 0).unwrap();
    tr.reduce(Action::Decl, &[Attr::None, place("m"), place(";")], 0).unwrap();

    let m = tr.symbols().lookup("m").unwrap();
    assert_eq!(m.data_type, "bool");
    assert_eq!(m.array_size, 12);
  }

  #[test]
  fn duplicate_is_a_diagnostic() {
    let mut tr = Translator::new();
    tr.symbols_mut().enter_scope();

    for pos in [5, 9] {
      tr.reduce(Action::BasicType, &[place("int")], pos).unwrap();
      tr.reduce(Action::Decl, &[Attr::None, place("x"), place(";")], pos).unwrap();
    }

    let translation = tr.finish();
    assert_eq!(translation.symbols.len(), 1);
    assert_eq!(translation.diagnostics, vec![Diagnostic {
      error: SymbolError::Duplicate { name: "x".to_owned(), scope: 1 },
      pos: 9,
    }]);
  }

  #[test]
  fn definition_records_name_offset() {
    let mut tr = Translator::new();
    tr.symbols_mut().enter_scope();
    let token = |text: &str, start| Attr::Token { text: text.to_owned(), start };

    for start in [6, 13] {
      tr.reduce(Action::BasicType, &[token("int", start - 4)], start + 2).unwrap();
      tr.reduce(Action::Decl, &[Attr::None, token("x", start), token(";", start + 1)], start + 3)
        .unwrap();
    }

    let translation = tr.finish();
    assert_eq!(translation.symbols.lookup("x").unwrap().pos, 6);
    assert_eq!(translation.diagnostics[0].pos, 13);
  }

  #[test]
  fn binary_uses_fresh_temp() {
    let mut tr = Translator::new();

    let attr = tr.reduce(Action::Binary(BinOp::Add), &[place("2"), place("+"), place("3")], 0).unwrap();
    assert_eq!(attr, place("t0"));
    let attr = tr.reduce(Action::Unary(UnOp::Not), &[place("!"), attr], 0).unwrap();
    assert_eq!(attr, place("t1"));

    assert_eq!(lines(&tr), vec!["t0 = 2 + 3", "t1 = ! t0"]);
  }

  #[test]
  fn indexed_location() {
    let mut tr = Translator::new();

    let loc = tr.reduce(Action::LocId, &[place("a")], 0).unwrap();
    assert_eq!(tr.last_name(), "a");
    let loc = tr.reduce(Action::LocIndex, &[loc, place("["), place("1"), place("]")], 0).unwrap();
    tr.reduce(Action::Assign, &[loc, place("="), place("9"), place(";")], 0).unwrap();

    assert_eq!(lines(&tr), vec!["a[1] = 9"]);
  }

  #[test]
  fn break_needs_a_loop() {
    let mut tr = Translator::new();

    let err = tr.reduce(Action::Break, &[place("break"), place(";")], 0).unwrap_err();
    assert_eq!(err, TranslateError::BreakOutsideLoop);
  }

  #[test]
  fn while_loop_layout() {
    let mut tr = Translator::new();
    let mut stack = vec![Attr::None, place("while")];

    let enter = tr.reduce(Action::LoopEnter, &stack, 0).unwrap();
    stack.extend([enter, place("("), place("c"), place(")")]);
    let test = tr.reduce(Action::LoopTest, &stack, 0).unwrap();
    stack.push(test);
    tr.reduce(Action::Break, &[place("break"), place(";")], 0).unwrap();
    stack.push(Attr::None);
    tr.reduce(Action::While, &stack, 0).unwrap();

    assert_eq!(lines(&tr), vec!["L0:", "ifFalse c goto L1", "goto L1", "goto L0", "L1:"]);
    assert!(tr.breaks.is_empty());
  }

  #[test]
  fn bad_array_size() {
    let mut tr = Translator::new();

    let err = tr.reduce(Action::TypeArray, &[Attr::None, place("["), place("1.5"), place("]")], 0)
      .unwrap_err();
    assert_eq!(err, TranslateError::BadArraySize { text: "1.5".to_owned() });
  }
}

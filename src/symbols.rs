//! Scoped symbol table.

use std::fmt;
use indexmap::IndexMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolKind {
  Var,
  Func,
  Array,
  Basic,
}

impl fmt::Display for SymbolKind {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let name = match self {
      Self::Var => "VAR",
      Self::Func => "FUNC",
      Self::Array => "ARRAY",
      Self::Basic => "BASIC",
    };
    write!(f, "{}", name)
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolEntry {
  pub name: String,
  pub kind: SymbolKind,
  /// Scope depth the symbol was defined at.
  pub scope: u32,
  /// Name of the symbol's storage in the generated code.
  pub addr: String,
  /// Total element count for arrays, 0 otherwise.
  pub array_size: u32,
  /// Empty unless defined through `define_data`.
  pub data_type: String,
  /// Offset of the defining occurrence in the input.
  pub pos: usize,
}

impl fmt::Display for SymbolEntry {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{} {} scope={} addr={}", self.name, self.kind, self.scope, self.addr)?;
    if !self.data_type.is_empty() {
      write!(f, " type={}", self.data_type)?;
    }
    if self.array_size != 0 {
      write!(f, " size={}", self.array_size)?;
    }
    Ok(())
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SymbolError {
  Duplicate { name: String, scope: u32 },
}

impl fmt::Display for SymbolError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Self::Duplicate { name, scope } => {
        write!(f, "symbol '{}' already defined (scope {})", name, scope)
      }
    }
  }
}

impl std::error::Error for SymbolError {}

/// Maps names to entries across the nested scopes of a program. A name can
/// be defined once in the whole visible chain; leaving a scope deletes the
/// entries defined in it.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
  entries: IndexMap<String, SymbolEntry>,
  depth: u32,
  temps: u32,
}

impl SymbolTable {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn depth(&self) -> u32 {
    self.depth
  }

  pub fn enter_scope(&mut self) {
    self.depth += 1;
  }

  /// Leaves the current scope and removes every entry defined in it. Does
  /// nothing at depth 0.
  pub fn exit_scope(&mut self) {
    if self.depth == 0 {
      return;
    }

    let exited = self.depth;
    self.depth -= 1;
    self.entries.retain(|_, entry| entry.scope != exited);
  }

  /// A fresh temporary name. Names are never reused within one table.
  pub fn new_temp(&mut self) -> String {
    let name = format!("t{}", self.temps);
    self.temps += 1;
    name
  }

  pub fn define(
    &mut self,
    name: &str,
    kind: SymbolKind,
    pos: usize,
  ) -> Result<&SymbolEntry, SymbolError> {
    self.insert(name, kind, String::new(), 0, pos)
  }

  /// Defines a variable of type `data_type`, or an array of `size` elements
  /// when `size` is not 0.
  pub fn define_data(
    &mut self,
    name: &str,
    data_type: &str,
    size: u32,
    pos: usize,
  ) -> Result<&SymbolEntry, SymbolError> {
    let kind = if size != 0 {
      SymbolKind::Array
    } else {
      SymbolKind::Var
    };
    self.insert(name, kind, data_type.to_owned(), size, pos)
  }

  fn insert(
    &mut self,
    name: &str,
    kind: SymbolKind,
    data_type: String,
    array_size: u32,
    pos: usize,
  ) -> Result<&SymbolEntry, SymbolError> {
    if let Some(entry) = self.entries.get(name) {
      return Err(SymbolError::Duplicate {
        name: name.to_owned(),
        scope: entry.scope,
      });
    }

    let addr = self.new_temp();
    let entry = SymbolEntry {
      name: name.to_owned(),
      kind,
      scope: self.depth,
      addr,
      array_size,
      data_type,
      pos,
    };

    let ix = self.entries.insert_full(name.to_owned(), entry).0;
    Ok(&self.entries[ix])
  }

  pub fn lookup(&self, name: &str) -> Option<&SymbolEntry> {
    self.entries.get(name)
  }

  /// Entries in definition order.
  pub fn iter(&self) -> impl Iterator<Item = &SymbolEntry> {
    self.entries.values()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn define_and_lookup() {
    let mut table = SymbolTable::new();
    table.enter_scope();

    let entry = table.define_data("x", "int", 0, 6).unwrap().clone();
    assert_eq!(entry, SymbolEntry {
      name: "x".to_owned(),
      kind: SymbolKind::Var,
      scope: 1,
      addr: "t0".to_owned(),
      array_size: 0,
      data_type: "int".to_owned(),
      pos: 6,
    });

    assert_eq!(table.define_data("a", "float", 10, 0).unwrap().kind, SymbolKind::Array);
    assert_eq!(table.define("f", SymbolKind::Func, 0).unwrap().addr, "t2");
    assert_eq!(table.lookup("a").map(|e| e.array_size), Some(10));
    assert_eq!(table.lookup("y"), None);
  }

  #[test]
  fn duplicate_keeps_first() {
    let mut table = SymbolTable::new();
    table.enter_scope();
    table.define_data("x", "int", 0, 0).unwrap();

    let err = table.define_data("x", "bool", 0, 0).unwrap_err();
    assert_eq!(err, SymbolError::Duplicate { name: "x".to_owned(), scope: 1 });
    assert_eq!(err.to_string(), "symbol 'x' already defined (scope 1)");
    assert_eq!(table.len(), 1);
    assert_eq!(table.lookup("x").unwrap().data_type, "int");

    table.enter_scope();
    assert!(table.define("x", SymbolKind::Basic, 0).is_err());
  }

  #[test]
  fn exit_removes_only_exited_scope() {
    let mut table = SymbolTable::new();
    table.enter_scope();
    table.define_data("outer", "int", 0, 0).unwrap();
    table.enter_scope();
    table.define_data("inner", "int", 0, 0).unwrap();

    table.exit_scope();
    assert_eq!(table.depth(), 1);
    assert!(table.lookup("inner").is_none());
    assert!(table.lookup("outer").is_some());

    table.exit_scope();
    assert_eq!(table.depth(), 0);
    assert!(table.is_empty());
  }

  #[test]
  fn exit_at_depth_zero_is_noop() {
    let mut table = SymbolTable::new();
    table.define_data("g", "int", 0, 0).unwrap();
    table.exit_scope();

    assert_eq!(table.depth(), 0);
    assert_eq!(table.len(), 1);
  }

  #[test]
  fn temps_are_unique() {
    let mut table = SymbolTable::new();
    let temps = (0..3).map(|_| table.new_temp()).collect::<Vec<_>>();
    assert_eq!(temps, vec!["t0", "t1", "t2"]);

    let addr = table.define_data("v", "int", 0, 0).unwrap().addr.clone();
    assert_eq!(addr, "t3");
  }
}

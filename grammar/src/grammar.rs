use std::fmt::{self, Write};
use indexmap::{IndexMap, IndexSet};
use crate::{Map, BiMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NonterminalId(u32);

impl TokenId {
  pub fn new(id: u32) -> Self {
    Self(id)
  }

  pub fn id(self) -> u32 {
    self.0
  }

  pub fn index(self) -> usize {
    self.0 as usize
  }
}

impl NonterminalId {
  pub fn new(id: u32) -> Self {
    Self(id)
  }

  pub fn id(self) -> u32 {
    self.0
  }

  pub fn index(self) -> usize {
    self.0 as usize
  }
}

/// Generates fresh token ids, starting at the first unused one.
pub struct TokenIdGen(u32);

impl TokenIdGen {
  pub fn new(first_free: u32) -> Self {
    Self(first_free)
  }

  pub fn gen(&mut self) -> TokenId {
    let id = self.0;
    self.0 += 1;
    TokenId(id)
  }
}

/// Generates fresh nonterminal ids, starting at the first unused one.
pub struct NonterminalIdGen(u32);

impl NonterminalIdGen {
  pub fn new(first_free: u32) -> Self {
    Self(first_free)
  }

  pub fn gen(&mut self) -> NonterminalId {
    let id = self.0;
    self.0 += 1;
    NonterminalId(id)
  }
}

/// Tokens sort before nonterminals, which fixes the order in which the
/// vocabulary is visited.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
  Token(TokenId),
  Nonterminal(NonterminalId),
}

#[derive(Debug, Clone)]
pub struct Production {
  pub nt: NonterminalId,
  /// Empty for an ε-production.
  pub symbols: Vec<Symbol>,
}

impl Production {
  pub fn is_epsilon(&self) -> bool {
    self.symbols.is_empty()
  }

  pub fn fmt(&self, grammar: &Grammar, f: &mut impl Write) -> fmt::Result {
    write!(f, "{} ->", grammar.nt_name(self.nt))?;

    if self.symbols.is_empty() {
      write!(f, " ε")?;
    }

    for sym in &self.symbols {
      write!(f, " {}", grammar.symbol_name(sym))?;
    }

    Ok(())
  }

  pub fn to_string(&self, grammar: &Grammar) -> String {
    let mut s = String::new();
    self.fmt(grammar, &mut s).unwrap();
    s
  }
}

#[derive(Debug, Clone, Default)]
pub struct NonterminalMetadata {
  /// Indices of the productions headed by the nonterminal, in grammar order.
  pub prods: Vec<usize>,
}

/// An immutable grammar. Token ids are `0..tokens.len()` and nonterminal ids
/// are `0..nts.len()`, so both can index dense tables directly.
#[derive(Debug, Clone)]
pub struct Grammar {
  pub prods: Vec<Production>,
  pub tokens: BiMap<TokenId, String>,
  pub nts: BiMap<NonterminalId, String>,
  pub nt_metas: Map<NonterminalId, NonterminalMetadata>,
  pub start_nt: NonterminalId,
}

impl Grammar {
  pub fn builder() -> GrammarBuilder {
    GrammarBuilder::default()
  }

  pub fn token(&self, name: &str) -> Option<TokenId> {
    self.tokens.get_by_right(name).copied()
  }

  pub fn nonterminal(&self, name: &str) -> Option<NonterminalId> {
    self.nts.get_by_right(name).copied()
  }

  pub fn token_name(&self, token: TokenId) -> &str {
    self.tokens.get_by_left(&token).map(|s| s.as_str()).unwrap_or("$")
  }

  pub fn nt_name(&self, nt: NonterminalId) -> &str {
    self.nts.get_by_left(&nt).map(|s| s.as_str()).unwrap_or("?")
  }

  pub fn symbol_name(&self, sym: &Symbol) -> &str {
    match sym {
      Symbol::Token(token) => self.token_name(*token),
      Symbol::Nonterminal(nt) => self.nt_name(*nt),
    }
  }

  pub fn num_tokens(&self) -> usize {
    self.tokens.len()
  }

  pub fn num_nts(&self) -> usize {
    self.nts.len()
  }

  /// Productions headed by `nt`.
  pub fn nt_prods(&self, nt: NonterminalId) -> &[usize] {
    self.nt_metas.get(&nt).map(|meta| meta.prods.as_slice()).unwrap_or(&[])
  }

  /// The full vocabulary: tokens by id, then nonterminals by id.
  pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
    (0..self.num_tokens() as u32)
      .map(|id| Symbol::Token(TokenId(id)))
      .chain((0..self.num_nts() as u32).map(|id| Symbol::Nonterminal(NonterminalId(id))))
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
  NoProductions,
  /// A body symbol that is neither a token nor the head of a production.
  UndefinedSymbol { name: String, prod: usize },
  /// A production head that is also declared as a token.
  NameConflict { name: String },
  UndefinedStart { name: String },
}

impl fmt::Display for GrammarError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Self::NoProductions => write!(f, "grammar has no productions"),
      Self::UndefinedSymbol { name, prod } => {
        write!(f, "undefined symbol '{}' in production {}", name, prod)
      }
      Self::NameConflict { name } => {
        write!(f, "'{}' is declared both as a token and a nonterminal", name)
      }
      Self::UndefinedStart { name } => {
        write!(f, "start symbol '{}' has no productions", name)
      }
    }
  }
}

impl std::error::Error for GrammarError {}

#[derive(Debug, Default)]
pub struct GrammarBuilder {
  tokens: IndexSet<String>,
  rules: Vec<(String, Vec<String>)>,
  start: Option<String>,
}

impl GrammarBuilder {
  pub fn token(mut self, name: impl Into<String>) -> Self {
    self.tokens.insert(name.into());
    self
  }

  pub fn tokens<I, S>(mut self, names: I) -> Self
    where I: IntoIterator<Item = S>, S: Into<String>
  {
    self.tokens.extend(names.into_iter().map(Into::into));
    self
  }

  /// Adds `head -> body`. An empty body is an ε-production.
  pub fn rule(mut self, head: impl Into<String>, body: &[&str]) -> Self {
    self.rules.push((head.into(), body.iter().map(|s| s.to_string()).collect()));
    self
  }

  /// Defaults to the head of the first rule.
  pub fn start(mut self, name: impl Into<String>) -> Self {
    self.start = Some(name.into());
    self
  }

  pub fn build(self) -> Result<Grammar, GrammarError> {
    if self.rules.is_empty() {
      return Err(GrammarError::NoProductions);
    }

    let mut tokens = BiMap::new();
    for (i, name) in self.tokens.iter().enumerate() {
      tokens.insert(TokenId(i as u32), name.clone());
    }

    let mut heads = IndexMap::<String, NonterminalId>::new();
    for (head, _) in &self.rules {
      if tokens.contains_right(head) {
        return Err(GrammarError::NameConflict { name: head.clone() });
      }
      let next = NonterminalId(heads.len() as u32);
      heads.entry(head.clone()).or_insert(next);
    }

    let mut prods = Vec::with_capacity(self.rules.len());
    let mut nt_metas = Map::<NonterminalId, NonterminalMetadata>::default();

    for (prod_ix, (head, body)) in self.rules.iter().enumerate() {
      let nt = heads[head];
      let symbols = body.iter().map(|name| {
        if let Some(&token) = tokens.get_by_right(name) {
          Ok(Symbol::Token(token))
        } else if let Some(&nt) = heads.get(name) {
          Ok(Symbol::Nonterminal(nt))
        } else {
          Err(GrammarError::UndefinedSymbol { name: name.clone(), prod: prod_ix })
        }
      }).collect::<Result<Vec<_>, _>>()?;

      prods.push(Production { nt, symbols });
      nt_metas.entry(nt).or_default().prods.push(prod_ix);
    }

    let start = self.start.unwrap_or_else(|| self.rules[0].0.clone());
    let start_nt = *heads.get(&start)
      .ok_or(GrammarError::UndefinedStart { name: start.clone() })?;

    let nts = heads.into_iter().map(|(name, nt)| (nt, name)).collect();

    Ok(Grammar {
      prods,
      tokens,
      nts,
      nt_metas,
      start_nt,
    })
  }
}

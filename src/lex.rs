use std::fmt;
use std::str::CharIndices;
use std::iter::Peekable;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
  Eof,
  Ident,
  Number,
  Real,
  Reserved,
  Type,
  Operator,
  Delimiter,
  Str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token<'a> {
  pub kind: TokenKind,
  /// The lexeme. String literals exclude their quotes; `Eof` is empty.
  pub text: &'a str,
  /// Byte offset of the token in the input.
  pub start: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LexError {
  InvalidChar { ch: char, pos: usize },
  UnclosedString { pos: usize },
}

impl LexError {
  pub fn pos(&self) -> usize {
    match self {
      Self::InvalidChar { pos, .. } | Self::UnclosedString { pos } => *pos,
    }
  }
}

impl fmt::Display for LexError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Self::InvalidChar { ch, .. } => write!(f, "invalid character '{}'", ch),
      Self::UnclosedString { .. } => write!(f, "unclosed string literal"),
    }
  }
}

impl std::error::Error for LexError {}

const RESERVED: &[&str] = &[
  "if", "else", "for", "func", "return", "var", "break", "continue",
  "package", "import", "chan", "const", "default", "defer", "fallthrough",
  "case", "goto", "interface", "map", "range", "select", "struct", "switch",
  "type", "go", "do", "while", "true", "false",
];

const TYPES: &[&str] = &["int", "bool", "string", "float", "byte"];

const OPERATORS2: &[&str] = &["==", "!=", "<=", ">=", "&&", "||"];

const OPERATORS: &str = "+-*/=<>!&|";

const DELIMITERS: &str = ";,(){}[]:.";

/// Splits source text into tokens. Yields a single `Eof` token at the end of
/// the input and then stops.
pub struct Lexer<'a> {
  input: &'a str,
  chars: Peekable<CharIndices<'a>>,
  done: bool,
}

impl<'a> Lexer<'a> {
  pub fn new(input: &'a str) -> Self {
    Self {
      input,
      chars: input.char_indices().peekable(),
      done: false,
    }
  }

  fn skip_trivia(&mut self) {
    loop {
      match self.chars.peek() {
        Some(&(_, c)) if c.is_whitespace() => {
          self.chars.next();
        }
        Some(&(i, '/')) if self.input[i..].starts_with("//") => {
          while let Some((_, c)) = self.chars.next() {
            if c == '\n' {
              break;
            }
          }
        }
        _ => break,
      }
    }
  }

  /// Consumes characters while `pred` holds and returns the end offset.
  fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
    while let Some(&(_, c)) = self.chars.peek() {
      if !pred(c) {
        break;
      }
      self.chars.next();
    }

    self.chars.peek().map_or(self.input.len(), |&(i, _)| i)
  }

  fn token(&self, kind: TokenKind, start: usize, end: usize) -> Token<'a> {
    Token {
      kind,
      text: &self.input[start..end],
      start,
    }
  }
}

impl<'a> Iterator for Lexer<'a> {
  type Item = Result<Token<'a>, LexError>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.done {
      return None;
    }

    self.skip_trivia();

    let (start, c) = match self.chars.next() {
      Some(next) => next,
      None => {
        self.done = true;
        return Some(Ok(self.token(TokenKind::Eof, self.input.len(), self.input.len())));
      }
    };

    if c.is_alphabetic() || c == '_' {
      let end = self.eat_while(|c| c.is_alphanumeric() || c == '_');
      let word = &self.input[start..end];
      let kind = if TYPES.contains(&word) {
        TokenKind::Type
      } else if RESERVED.contains(&word) {
        TokenKind::Reserved
      } else {
        TokenKind::Ident
      };
      return Some(Ok(self.token(kind, start, end)));
    }

    if c.is_ascii_digit() {
      let end = self.eat_while(|c| c.is_ascii_digit() || c == '.');
      let kind = if self.input[start..end].contains('.') {
        TokenKind::Real
      } else {
        TokenKind::Number
      };
      return Some(Ok(self.token(kind, start, end)));
    }

    if c == '"' {
      let end = self.eat_while(|c| c != '"');
      if self.chars.next().is_none() {
        self.done = true;
        return Some(Err(LexError::UnclosedString { pos: start }));
      }
      return Some(Ok(Token {
        kind: TokenKind::Str,
        text: &self.input[start + 1..end],
        start,
      }));
    }

    if let Some(op) = OPERATORS2.iter().find(|op| self.input[start..].starts_with(**op)) {
      self.chars.next();
      return Some(Ok(self.token(TokenKind::Operator, start, start + op.len())));
    }

    let end = start + c.len_utf8();
    if OPERATORS.contains(c) {
      Some(Ok(self.token(TokenKind::Operator, start, end)))
    } else if DELIMITERS.contains(c) {
      Some(Ok(self.token(TokenKind::Delimiter, start, end)))
    } else {
      self.done = true;
      Some(Err(LexError::InvalidChar { ch: c, pos: start }))
    }
  }
}

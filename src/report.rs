use std::fmt::Write;
use std::path::Path;
use crate::{Diagnostic, Error, TranslateError};

/// 1-based line and column of the byte offset `pos` in `input`.
pub fn line_col(input: &str, pos: usize) -> (usize, usize) {
  let pos = pos.min(input.len());
  let before = input.get(..pos).unwrap_or(input);
  let line = before.matches('\n').count() + 1;
  let col = before.rsplit('\n').next().map_or(0, |s| s.chars().count()) + 1;
  (line, col)
}

pub fn report(
  path: impl AsRef<Path>,
  input: impl AsRef<str>,
  err: &Error,
) -> String {
  let error = match err {
    Error::Grammar(_) => "grammar error",
    Error::Lex(_) => "lexical error",
    Error::NoAction { .. } | Error::NoGoto { .. } => "syntax error",
    Error::Translate { error: TranslateError::BreakOutsideLoop, .. } => "misplaced break",
    Error::Translate { .. } => "translation error",
  };

  let mut buf = String::new();
  match err.pos() {
    Some(pos) => {
      let (line, col) = line_col(input.as_ref(), pos);
      writeln!(&mut buf, "{} at {}:{}:{}", error, path.as_ref().display(), line, col).unwrap();
    }
    None => {
      writeln!(&mut buf, "{} in {}", error, path.as_ref().display()).unwrap();
    }
  }
  writeln!(&mut buf, "message: {}", err).unwrap();

  buf
}

pub fn report_diagnostic(
  path: impl AsRef<Path>,
  input: impl AsRef<str>,
  diag: &Diagnostic,
) -> String {
  let (line, col) = line_col(input.as_ref(), diag.pos);
  format!(
    "warning at {}:{}:{}\nmessage: {}\n",
    path.as_ref().display(),
    line,
    col,
    diag,
  )
}

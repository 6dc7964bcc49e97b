use std::fmt::Write;
use crate::{Conflict, GotoConflict, ReduceReduceConflict, ShiftReduceConflict};

/// Renders a table construction conflict together with the items of the
/// state it arose in.
pub fn report(conflict: &Conflict) -> String {
  match conflict {
    Conflict::ShiftReduce(c) => report_sr_conflict(c),
    Conflict::ReduceReduce(c) => report_rr_conflict(c),
    Conflict::Goto(c) => report_goto_conflict(c),
  }
}

fn write_state(buf: &mut String, kind: &str, state: u32, items: &[String]) {
  writeln!(buf, "{} conflict at state {}:\n", kind, state).unwrap();

  for item in items {
    writeln!(buf, "  {}", item).unwrap();
  }
}

fn report_rr_conflict(err: &ReduceReduceConflict) -> String {
  let mut buf = String::new();
  write_state(&mut buf, "reduce-reduce", err.state, &err.state_items);

  writeln!(&mut buf,
    "\nwhich can be reduced by:\n\n  {}\n\nor:\n\n  {}\n\nwhen the lookahead is {}",
    err.reduce1,
    err.reduce2,
    err.lookahead,
  ).unwrap();
  writeln!(&mut buf, "\nkept: {}", err.reduce1).unwrap();

  buf
}

fn report_sr_conflict(err: &ShiftReduceConflict) -> String {
  let mut buf = String::new();
  write_state(&mut buf, "shift-reduce", err.state, &err.state_items);

  writeln!(&mut buf,
    "\nwhich can shift {}\nor reduce by:\n\n  {}",
    err.token,
    err.reduce,
  ).unwrap();

  let kept = match err.kept {
    crate::Action::Shift(_) => format!("shift {}", err.token),
    _ => format!("reduce by {}", err.reduce),
  };
  writeln!(&mut buf, "\nkept: {}", kept).unwrap();

  buf
}

fn report_goto_conflict(err: &GotoConflict) -> String {
  format!(
    "goto conflict at state {}:\n\n  {} leads to state {} and state {}\n\nkept: state {}\n",
    err.state,
    err.nt,
    err.kept,
    err.rejected,
    err.kept,
  )
}

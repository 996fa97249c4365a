/* Description: LaTeX transition tables.

Copyright (C) 2024 Danny McClanahan <dmcC2@hypnicjerk.ai>
SPDX-License-Identifier: GPL-3.0-or-later

This file is free software: you can redistribute it and/or modify
it under the terms of the GNU General Public License as
published by the Free Software Foundation; either version 3 of the
License, or (at your option) any later version.

This file is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU General Public License for more details.

You should have received a copy of the GNU General Public License
along with this program.  If not, see <https://www.gnu.org/licenses/>. */

//! LaTeX transition tables.
//!
//! ```
//! use powerset::{report::to_report_text, Automaton, State, StateId};
//!
//! let mut a: Automaton<char> = Automaton::new();
//! a.add_state(State::new(StateId(0)).initial(true).accepting(true));
//! a.add_transition(StateId(0), 'x', StateId(0)).unwrap();
//! assert!(to_report_text(&a).contains(r"$\rightarrow$ $*$ & q0 & q0 \\"));
//! ```

use std::{cmp::Ordering, fmt};

use powerset_automata::{alphabet::Symbol, Automaton, Provenance, State, StateId};

/// Escape the characters LaTeX treats specially in text mode.
pub fn escape(text: &str) -> String {
  let mut ret = String::with_capacity(text.len());
  for c in text.chars() {
    match c {
      '\\' => ret.push_str(r"\textbackslash{}"),
      '~' => ret.push_str(r"\textasciitilde{}"),
      '^' => ret.push_str(r"\textasciicircum{}"),
      '{' | '}' | '$' | '&' | '#' | '_' | '%' => {
        ret.push('\\');
        ret.push(c);
      },
      c => ret.push(c),
    }
  }
  ret
}

/// Trailing decimal digits of `name`, if any.
fn numeric_suffix(name: &str) -> Option<u64> {
  let stem = name.trim_end_matches(|c: char| c.is_ascii_digit());
  name[stem.len()..].parse().ok()
}

/// `q2` before `q10`, and names without a number after all of those.
fn native_order(a: &str, b: &str) -> Ordering {
  match (numeric_suffix(a), numeric_suffix(b)) {
    (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
    (Some(_), None) => Ordering::Less,
    (None, Some(_)) => Ordering::Greater,
    (None, None) => a.cmp(b),
  }
}

fn rows<Sym>(automaton: &Automaton<Sym>) -> Vec<&State<Sym>> {
  let mut rows: Vec<&State<Sym>> = automaton.states().collect();
  match automaton.provenance() {
    Provenance::Native => rows.sort_by(|a, b| native_order(a.name(), b.name())),
    Provenance::Determinized { classes } => {
      let size = |s: &State<Sym>| classes.get(&s.id()).map_or(0, |key| key.len());
      rows.sort_by(|a, b| {
        size(a)
          .cmp(&size(b))
          .then_with(|| a.name().cmp(b.name()))
      });
    },
  }
  rows
}

fn marker<Sym>(state: &State<Sym>) -> &'static str {
  match (state.is_initial(), state.is_final()) {
    (true, true) => r"$\rightarrow$ $*$",
    (true, false) => r"$\rightarrow$",
    (false, true) => r"$*$",
    (false, false) => "",
  }
}

fn cell<Sym>(automaton: &Automaton<Sym>, dests: &[StateId]) -> String {
  let names: Vec<String> = dests
    .iter()
    .map(|id| match automaton.state(*id) {
      Some(s) => escape(s.name()),
      None => escape(&id.to_string()),
    })
    .collect();
  match names.as_slice() {
    [] => "--".to_string(),
    [single] => single.clone(),
    many => format!(r"\{{{}\}}", many.join(", ")),
  }
}

/// Render the transition table of `automaton` as a LaTeX `tabular`.
///
/// There is one column per symbol of the alphabet, sorted, and one row per
/// state. The initial state is marked with an arrow and final states with a
/// star. A cell lists the destination, several destinations as a set, or
/// `--` when the transition is undefined.
pub fn to_report_text<Sym>(automaton: &Automaton<Sym>) -> String
where Sym: Symbol+fmt::Display {
  let alphabet: Vec<&Sym> = automaton.alphabet().into_iter().collect();

  let mut lines: Vec<String> = Vec::with_capacity(automaton.len() + 4);
  lines.push(format!(r"\begin{{tabular}}{{ll|{}}}", "c".repeat(alphabet.len())));

  let mut header = String::from(r" & $\delta$");
  for sym in alphabet.iter() {
    header.push_str(" & ");
    header.push_str(&escape(&sym.to_string()));
  }
  header.push_str(r" \\");
  lines.push(header);
  lines.push(r"\hline".to_string());

  for state in rows(automaton) {
    let mut line = format!("{} & {}", marker(state), escape(state.name()));
    for sym in alphabet.iter() {
      line.push_str(" & ");
      line.push_str(&cell(automaton, state.destinations(sym)));
    }
    line.push_str(r" \\");
    lines.push(line);
  }

  lines.push(r"\end{tabular}".to_string());
  let mut ret = lines.join("\n");
  ret.push('\n');
  ret
}

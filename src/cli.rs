/* Description: The powerset command line tool.

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

//! The `powerset` command line tool.

use std::{io, path::PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::{jflap, report, CliError, ConstructionConfig, SubsetConstructor, Totality};

/// Determinize finite automata stored as JFLAP files.
#[derive(Parser, Debug)]
#[command(name = "powerset")]
#[command(version, about, long_about = None)]
pub struct Cli {
  /// Verbosity level (-v, -vv, -vvv); RUST_LOG takes precedence
  #[arg(short, long, action = clap::ArgAction::Count, global = true)]
  pub verbose: u8,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Build the equivalent deterministic automaton
  Determinize(DeterminizeArgs),
  /// Print the transition table of an automaton as a LaTeX tabular
  Report {
    /// JFLAP file to read
    input: PathBuf,
  },
  /// Run an automaton over a word, one symbol per argument
  Accepts {
    /// JFLAP file to read
    input: PathBuf,
    /// Input symbols
    symbols: Vec<String>,
  },
}

#[derive(Args, Debug)]
pub struct DeterminizeArgs {
  /// JFLAP file to read
  pub input: PathBuf,

  /// Where to write the result (defaults to stdout)
  #[arg(short, long)]
  pub output: Option<PathBuf>,

  /// Send undefined transitions to an explicit sink state
  #[arg(long)]
  pub total: bool,

  /// Refuse inputs whose power set has more classes than this
  #[arg(
    long,
    env = "POWERSET_MAX_CLASSES",
    default_value_t = ConstructionConfig::DEFAULT_MAX_CLASSES
  )]
  pub max_classes: usize,

  /// Also print the transition table of the result
  #[arg(long)]
  pub report: bool,
}

impl DeterminizeArgs {
  pub fn config(&self) -> ConstructionConfig {
    ConstructionConfig {
      max_classes: self.max_classes,
      totality: if self.total {
        Totality::Total
      } else {
        Totality::Partial
      },
    }
  }
}

/// Default log filter for a given number of `-v` flags.
pub fn log_filter(verbose: u8) -> &'static str {
  match verbose {
    0 => "warn",
    1 => "info",
    2 => "debug",
    _ => "trace",
  }
}

fn determinize(args: &DeterminizeArgs, out: &mut impl io::Write) -> Result<(), CliError> {
  let nfa = jflap::read_file(&args.input)?;
  let dfa = SubsetConstructor::new(args.config()).determinize(&nfa)?;
  info!(
    input = nfa.len(),
    output = dfa.len(),
    "determinized {}",
    args.input.display()
  );

  match &args.output {
    Some(path) => jflap::write_file(&dfa, path)?,
    None => out.write_all(jflap::to_string(&dfa)?.as_bytes())?,
  }
  if args.report {
    out.write_all(report::to_report_text(&dfa).as_bytes())?;
  }
  Ok(())
}

/// Execute `command`, writing anything meant for the user to `out`.
pub fn run(command: &Command, out: &mut impl io::Write) -> Result<(), CliError> {
  match command {
    Command::Determinize(args) => determinize(args, out)?,
    Command::Report { input } => {
      let automaton = jflap::read_file(input)?;
      out.write_all(report::to_report_text(&automaton).as_bytes())?;
    },
    Command::Accepts { input, symbols } => {
      let automaton = jflap::read_file(input)?;
      let accepted = automaton.accepts(symbols.iter().cloned())?;
      writeln!(out, "{}", if accepted { "accepted" } else { "rejected" })?;
    },
  }
  out.flush()?;
  Ok(())
}

#[cfg(test)]
mod test {
  use std::path::Path;

  use pretty_assertions::assert_eq;

  use super::*;
  use crate::{Automaton, AutomatonError, InterchangeError, State, StateId};

  /// Words over {a, b} ending in "ab", with an unreachable state 3.
  fn write_nfa(dir: &Path) -> PathBuf {
    let mut a: Automaton<String> = Automaton::new();
    a.add_state(State::new(StateId(0)).initial(true));
    a.add_state(State::new(StateId(1)));
    a.add_state(State::new(StateId(2)).accepting(true));
    a.add_state(State::new(StateId(3)).named("lost"));
    for (from, sym, to) in [(0, "a", 0), (0, "b", 0), (0, "a", 1), (1, "b", 2), (3, "a", 0)] {
      a.add_transition(StateId(from), sym.to_string(), StateId(to))
        .unwrap();
    }
    let path = dir.join("ends-in-ab.jff");
    jflap::write_file(&a, &path).unwrap();
    path
  }

  fn run_to_string(args: &[&str]) -> Result<String, CliError> {
    let cli = Cli::parse_from(args);
    let mut out: Vec<u8> = Vec::new();
    run(&cli.command, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
  }

  #[test]
  fn parse_args() {
    let cli = Cli::parse_from([
      "powerset",
      "-vv",
      "determinize",
      "in.jff",
      "-o",
      "out.jff",
      "--total",
      "--max-classes",
      "7",
    ]);
    assert_eq!(cli.verbose, 2);
    assert_eq!(log_filter(cli.verbose), "debug");
    match cli.command {
      Command::Determinize(args) => {
        assert_eq!(args.input, PathBuf::from("in.jff"));
        assert_eq!(args.output, Some(PathBuf::from("out.jff")));
        assert!(!args.report);
        assert_eq!(args.config(), ConstructionConfig {
          max_classes: 7,
          totality: Totality::Total,
        });
      },
      other => panic!("expected determinize, got {other:?}"),
    }

    let cli = Cli::parse_from(["powerset", "accepts", "in.jff", "a", "b"]);
    match cli.command {
      Command::Accepts { symbols, .. } => assert_eq!(symbols, vec!["a", "b"]),
      other => panic!("expected accepts, got {other:?}"),
    }
  }

  #[test]
  fn determinize_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_nfa(dir.path());
    let output = dir.path().join("dfa.jff");
    let printed = run_to_string(&[
      "powerset",
      "determinize",
      input.to_str().unwrap(),
      "-o",
      output.to_str().unwrap(),
    ])
    .unwrap();
    assert_eq!(printed, "");

    let dfa = jflap::read_file(&output).unwrap();
    assert!(dfa.is_deterministic());
    assert_eq!(
      dfa.states().map(|s| s.name()).collect::<Vec<_>>(),
      vec!["{q0}", "{q0,q1}", "{q0,q2}"]
    );
    for (word, expected) in [("ab", true), ("bab", true), ("aba", false), ("", false)] {
      let word = word.chars().map(String::from);
      assert_eq!(dfa.accepts(word), Ok(expected));
    }
  }

  #[test]
  fn determinize_to_stdout_with_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_nfa(dir.path());
    let printed = run_to_string(&[
      "powerset",
      "determinize",
      input.to_str().unwrap(),
      "--report",
    ])
    .unwrap();
    let (xml, table) = printed
      .split_once(r"\begin{tabular}")
      .expect("report follows the XML");
    assert_eq!(jflap::from_str(xml).unwrap().len(), 3);
    assert!(table.contains(r"$\rightarrow$ & \{q0\} & \{q0,q1\} & \{q0\} \\"));
  }

  #[test]
  fn report_native() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_nfa(dir.path());
    let printed = run_to_string(&["powerset", "report", input.to_str().unwrap()]).unwrap();
    assert_eq!(
      printed,
      r"\begin{tabular}{ll|cc}
 & $\delta$ & a & b \\
\hline
$\rightarrow$ & q0 & \{q0, q1\} & q0 \\
 & q1 & -- & q2 \\
$*$ & q2 & -- & -- \\
 & lost & q0 & -- \\
\end{tabular}
"
    );
  }

  #[test]
  fn accepts() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_nfa(dir.path());
    let input = input.to_str().unwrap();
    assert_eq!(
      run_to_string(&["powerset", "accepts", input, "b", "a", "b"]).unwrap(),
      "accepted\n"
    );
    assert_eq!(
      run_to_string(&["powerset", "accepts", input, "a"]).unwrap(),
      "rejected\n"
    );
  }

  #[test]
  fn failures() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_nfa(dir.path());
    match run_to_string(&[
      "powerset",
      "determinize",
      input.to_str().unwrap(),
      "--max-classes",
      "3",
    ]) {
      Err(CliError::Automaton(AutomatonError::StateExplosion { states: 4, limit: 3 })) => (),
      other => panic!("expected a state explosion, got {other:?}"),
    }

    let missing = dir.path().join("missing.jff");
    match run_to_string(&["powerset", "report", missing.to_str().unwrap()]) {
      Err(CliError::Interchange(InterchangeError::FileAccess { .. })) => (),
      other => panic!("expected a file access error, got {other:?}"),
    }
  }
}

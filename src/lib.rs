/* Description: Determinize finite automata with the subset construction.

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

//! Determinize finite automata with the subset construction.
//!
//! The automaton model and the construction itself live in
//! [`powerset_automata`]; reading and writing JFLAP files lives in
//! [`powerset_jflap`]. This crate re-exports both and adds a LaTeX
//! [`report`] along with the `powerset` command line tool.

#![warn(rustdoc::missing_crate_level_docs)]
// #![warn(missing_docs)]
#![deny(unsafe_code)]
/* Ensure any doctest warnings fails the doctest! */
#![doc(test(attr(deny(warnings))))]

use std::io;

use displaydoc::Display;
use thiserror::Error;

pub use powerset_automata::{
  alphabet, Automaton, AutomatonError, ConstructionConfig, Provenance, ReachabilityPruner, State,
  StateId, SubsetConstructor, SubsetKey, Totality,
};
pub use powerset_jflap::{self as jflap, InterchangeError};

pub mod cli;
pub mod report;

#[derive(Debug, Display, Error)]
pub enum CliError {
  /// {0}
  Automaton(#[from] AutomatonError),
  /// {0}
  Interchange(#[from] InterchangeError),
  /// failed to write output: {0}
  Output(#[from] io::Error),
}

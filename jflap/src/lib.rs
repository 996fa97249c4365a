/* Description: Reading and writing automata in the JFLAP interchange format.

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

//! Reading and writing automata in the JFLAP interchange format.
//!
//! Only finite automata (`<type>fa</type>`) are understood. Layout
//! information such as state coordinates is ignored when reading and not
//! written back.

#![warn(rustdoc::missing_crate_level_docs)]
// #![warn(missing_docs)]
#![deny(unsafe_code)]
/* Ensure any doctest warnings fails the doctest! */
#![doc(test(attr(deny(warnings))))]

use std::io;

use displaydoc::Display;
use thiserror::Error;

pub mod reader;
pub mod writer;

pub use reader::{from_str, read_file};
pub use writer::{to_string, write_file};

#[derive(Debug, Display, Error)]
pub enum InterchangeError {
  /// could not open or create {path}: {source}
  FileAccess { path: String, source: io::Error },
  /// malformed interchange file: {field}: {reason}
  MalformedFile { field: &'static str, reason: String },
  /// failed to emit XML: {0}
  Xml(#[from] quick_xml::Error),
  /// failed to emit XML: {0}
  Io(#[from] io::Error),
}

impl InterchangeError {
  pub(crate) fn malformed(field: &'static str, reason: impl Into<String>) -> Self {
    Self::MalformedFile {
      field,
      reason: reason.into(),
    }
  }
}

/// Element and attribute names.
pub(crate) mod tags {
  pub const STRUCTURE: &str = "structure";
  pub const TYPE: &str = "type";
  pub const AUTOMATON: &str = "automaton";
  pub const STATE: &str = "state";
  pub const TRANSITION: &str = "transition";
  pub const INITIAL: &str = "initial";
  pub const FINAL: &str = "final";
  pub const FROM: &str = "from";
  pub const TO: &str = "to";
  pub const READ: &str = "read";

  pub const ID: &str = "id";
  pub const NAME: &str = "name";

  /// The only `<type>` we can represent.
  pub const FINITE_AUTOMATON: &str = "fa";
}

/* Description: Emitting JFLAP finite automaton files.

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

//! Emitting JFLAP finite automaton files.

use std::{fmt, fs, io, path::Path};

use powerset_automata::{alphabet::Symbol, Automaton, State};
use quick_xml::{
  events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
  writer::Writer,
};
use tracing::debug;

use crate::{tags, InterchangeError};

type XmlWriter = Writer<Vec<u8>>;

fn open(w: &mut XmlWriter, name: &str) -> Result<(), InterchangeError> {
  w.write_event(Event::Start(BytesStart::new(name)))?;
  Ok(())
}

fn close(w: &mut XmlWriter, name: &str) -> Result<(), InterchangeError> {
  w.write_event(Event::End(BytesEnd::new(name)))?;
  Ok(())
}

fn flag(w: &mut XmlWriter, name: &str) -> Result<(), InterchangeError> {
  w.write_event(Event::Empty(BytesStart::new(name)))?;
  Ok(())
}

fn text_element(w: &mut XmlWriter, name: &str, text: &str) -> Result<(), InterchangeError> {
  open(w, name)?;
  w.write_event(Event::Text(BytesText::new(text)))?;
  close(w, name)
}

fn write_state<Sym>(w: &mut XmlWriter, state: &State<Sym>) -> Result<(), InterchangeError> {
  let id = state.id().to_string();
  let element = BytesStart::new(tags::STATE)
    .with_attributes([(tags::ID, id.as_str()), (tags::NAME, state.name())]);
  if !state.is_initial() && !state.is_final() {
    w.write_event(Event::Empty(element))?;
    return Ok(());
  }
  w.write_event(Event::Start(element))?;
  if state.is_initial() {
    flag(w, tags::INITIAL)?;
  }
  if state.is_final() {
    flag(w, tags::FINAL)?;
  }
  close(w, tags::STATE)
}

/// Render `automaton` as the text of an interchange file.
///
/// States are written in the automaton's own order, followed by one
/// `<transition>` element per edge. Symbols are written with their
/// [`Display`](fmt::Display) impl, so any automaton can be exported, but only
/// automata over strings read back unchanged.
pub fn to_string<Sym>(automaton: &Automaton<Sym>) -> Result<String, InterchangeError>
where Sym: Symbol+fmt::Display {
  let mut w = Writer::new_with_indent(Vec::new(), b'\t', 1);
  w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("no"))))?;

  open(&mut w, tags::STRUCTURE)?;
  text_element(&mut w, tags::TYPE, tags::FINITE_AUTOMATON)?;
  open(&mut w, tags::AUTOMATON)?;

  for state in automaton.states() {
    write_state(&mut w, state)?;
  }

  let mut edges: usize = 0;
  for (from, sym, to) in automaton.transitions() {
    open(&mut w, tags::TRANSITION)?;
    text_element(&mut w, tags::FROM, &from.to_string())?;
    text_element(&mut w, tags::TO, &to.to_string())?;
    let read = sym.to_string();
    if read.is_empty() {
      return Err(InterchangeError::malformed(
        tags::READ,
        format!("empty-string transition from {from} to {to} cannot be written"),
      ));
    }
    text_element(&mut w, tags::READ, &read)?;
    close(&mut w, tags::TRANSITION)?;
    edges += 1;
  }

  close(&mut w, tags::AUTOMATON)?;
  close(&mut w, tags::STRUCTURE)?;

  debug!(states = automaton.len(), edges, "rendered automaton");
  String::from_utf8(w.into_inner())
    .map_err(|e| InterchangeError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Write `automaton` to `path`, replacing any existing file.
pub fn write_file<Sym>(automaton: &Automaton<Sym>, path: impl AsRef<Path>) -> Result<(), InterchangeError>
where Sym: Symbol+fmt::Display {
  let path = path.as_ref();
  let text = to_string(automaton)?;
  fs::write(path, text.as_bytes()).map_err(|source| InterchangeError::FileAccess {
    path: path.display().to_string(),
    source,
  })?;
  debug!(path = %path.display(), bytes = text.len(), "wrote interchange file");
  Ok(())
}

/* Description: Parsing JFLAP finite automaton files.

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

//! Parsing JFLAP finite automaton files.

use std::{fs, mem, path::Path};

use powerset_automata::{Automaton, State, StateId};
use quick_xml::{
  events::{BytesStart, Event},
  reader::Reader,
};
use tracing::{debug, trace};

use crate::{tags, InterchangeError};

/// Load an automaton from the file at `path`.
pub fn read_file(path: impl AsRef<Path>) -> Result<Automaton<String>, InterchangeError> {
  let path = path.as_ref();
  let text = fs::read_to_string(path).map_err(|source| InterchangeError::FileAccess {
    path: path.display().to_string(),
    source,
  })?;
  debug!(path = %path.display(), bytes = text.len(), "reading interchange file");
  from_str(&text)
}

#[derive(Debug)]
struct StateRecord {
  id: StateId,
  name: Option<String>,
  initial: bool,
  accepting: bool,
}

impl StateRecord {
  fn from_element(e: &BytesStart) -> Result<Self, InterchangeError> {
    let id = required_attribute(e, tags::ID)?;
    let id: u32 = id
      .trim()
      .parse()
      .map_err(|_| InterchangeError::malformed("id", format!("{id:?} is not a state id")))?;
    let name = optional_attribute(e, tags::NAME)?;
    Ok(Self {
      id: StateId(id),
      name,
      initial: false,
      accepting: false,
    })
  }

  fn into_state(self) -> State<String> {
    let state = State::new(self.id)
      .initial(self.initial)
      .accepting(self.accepting);
    match self.name {
      Some(name) => state.named(name),
      None => state,
    }
  }
}

#[derive(Debug, Default)]
struct PendingTransition {
  from: Option<String>,
  to: Option<String>,
  read: Option<String>,
}

impl PendingTransition {
  fn endpoint(field: &'static str, value: Option<String>) -> Result<StateId, InterchangeError> {
    let value = value.ok_or_else(|| {
      InterchangeError::malformed(field, "transition is missing this element")
    })?;
    value
      .trim()
      .parse::<u32>()
      .map(StateId)
      .map_err(|_| InterchangeError::malformed(field, format!("{value:?} is not a state id")))
  }

  fn finish(self) -> Result<(StateId, String, StateId), InterchangeError> {
    let from = Self::endpoint(tags::FROM, self.from)?;
    let to = Self::endpoint(tags::TO, self.to)?;
    let read = self.read.ok_or_else(|| {
      InterchangeError::malformed(tags::READ, "transition is missing this element")
    })?;
    if read.is_empty() {
      return Err(InterchangeError::malformed(
        tags::READ,
        format!("empty-string transition from {from} to {to} is not supported"),
      ));
    }
    Ok((from, read, to))
  }
}

/// Elements whose text content we collect.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum TextField {
  Type,
  From,
  To,
  Read,
}

impl TextField {
  fn of(name: &[u8]) -> Option<Self> {
    match name {
      b"type" => Some(Self::Type),
      b"from" => Some(Self::From),
      b"to" => Some(Self::To),
      b"read" => Some(Self::Read),
      _ => None,
    }
  }
}

#[derive(Debug, Default)]
struct Document {
  kind: Option<String>,
  states: Vec<StateRecord>,
  edges: Vec<(StateId, String, StateId)>,
}

impl Document {
  fn parse(text: &str) -> Result<Self, InterchangeError> {
    /* Text is kept verbatim: whitespace is significant inside <read>, and
     * indentation between elements is never collected. */
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(false);

    let mut doc = Self::default();
    let mut state: Option<StateRecord> = None;
    let mut transition: Option<PendingTransition> = None;
    let mut field: Option<TextField> = None;
    let mut content = String::new();

    loop {
      match reader.read_event().map_err(malformed_xml)? {
        Event::Start(e) => match e.name().as_ref() {
          b"state" => {
            state = Some(StateRecord::from_element(&e)?);
          },
          b"transition" => {
            transition = Some(PendingTransition::default());
          },
          b"initial" => mark(&mut state, |s| s.initial = true),
          b"final" => mark(&mut state, |s| s.accepting = true),
          name => {
            if let Some(f) = TextField::of(name) {
              field = Some(f);
              content.clear();
            }
          },
        },
        Event::Empty(e) => match e.name().as_ref() {
          b"state" => doc.states.push(StateRecord::from_element(&e)?),
          b"initial" => mark(&mut state, |s| s.initial = true),
          b"final" => mark(&mut state, |s| s.accepting = true),
          name => {
            /* <read/> and friends carry the empty string. */
            if let Some(f) = TextField::of(name) {
              doc.store(f, String::new(), transition.as_mut())?;
            }
          },
        },
        Event::Text(t) => {
          if field.is_some() {
            content.push_str(&t.unescape().map_err(malformed_xml)?);
          }
        },
        Event::CData(t) => {
          if field.is_some() {
            content.push_str(&String::from_utf8_lossy(&t));
          }
        },
        Event::End(e) => match e.name().as_ref() {
          b"state" => {
            if let Some(s) = state.take() {
              trace!(?s, "parsed state");
              doc.states.push(s);
            }
          },
          b"transition" => {
            if let Some(t) = transition.take() {
              doc.edges.push(t.finish()?);
            }
          },
          name => {
            if let Some(f) = field.filter(|f| Some(*f) == TextField::of(name)) {
              field = None;
              doc.store(f, mem::take(&mut content), transition.as_mut())?;
            }
          },
        },
        Event::Eof => break,
        _ => (),
      }
    }
    Ok(doc)
  }

  fn store(
    &mut self,
    field: TextField,
    value: String,
    transition: Option<&mut PendingTransition>,
  ) -> Result<(), InterchangeError> {
    match (field, transition) {
      (TextField::Type, _) => {
        let value = value.trim();
        if value != tags::FINITE_AUTOMATON {
          return Err(InterchangeError::malformed(
            tags::TYPE,
            format!("expected a finite automaton ({:?}), found {value:?}", tags::FINITE_AUTOMATON),
          ));
        }
        self.kind = Some(value.to_string());
      },
      (TextField::From, Some(t)) => t.from = Some(value),
      (TextField::To, Some(t)) => t.to = Some(value),
      (TextField::Read, Some(t)) => t.read = Some(value),
      /* Stray endpoint elements outside of a transition. */
      (_, None) => (),
    }
    Ok(())
  }

  fn into_automaton(self) -> Result<Automaton<String>, InterchangeError> {
    if self.kind.is_none() {
      return Err(InterchangeError::malformed(tags::TYPE, "no automaton type given"));
    }

    let mut automaton: Automaton<String> = Automaton::new();
    let mut initial: Option<StateId> = None;
    for record in self.states {
      let id = record.id;
      if automaton.contains(id) {
        return Err(InterchangeError::malformed(
          tags::STATE,
          format!("duplicate state id {id}"),
        ));
      }
      if record.initial {
        if let Some(prev) = initial {
          return Err(InterchangeError::malformed(
            tags::INITIAL,
            format!("states {prev} and {id} are both initial"),
          ));
        }
        initial = Some(id);
      }
      automaton.add_state(record.into_state());
    }

    for (from, read, to) in self.edges {
      automaton
        .add_transition(from, read, to)
        .map_err(|e| InterchangeError::malformed(tags::TRANSITION, e.to_string()))?;
    }
    Ok(automaton)
  }
}

fn mark(state: &mut Option<StateRecord>, f: impl FnOnce(&mut StateRecord)) {
  if let Some(s) = state.as_mut() {
    f(s);
  }
}

fn malformed_xml(e: quick_xml::Error) -> InterchangeError {
  InterchangeError::malformed("xml", e.to_string())
}

fn optional_attribute(
  e: &BytesStart,
  key: &'static str,
) -> Result<Option<String>, InterchangeError> {
  let Some(attr) = e
    .try_get_attribute(key)
    .map_err(|err| InterchangeError::malformed(key, err.to_string()))?
  else {
    return Ok(None);
  };
  let value = attr.unescape_value().map_err(malformed_xml)?;
  Ok(Some(value.into_owned()))
}

fn required_attribute(e: &BytesStart, key: &'static str) -> Result<String, InterchangeError> {
  optional_attribute(e, key)?
    .ok_or_else(|| InterchangeError::malformed(key, "state is missing this attribute"))
}

/// Parse the text of an interchange file.
///
/// States keep the ids and names given in the file; a state without a name
/// attribute is called `q<id>`. Unknown elements (layout coordinates, notes,
/// and so on) are skipped.
pub fn from_str(text: &str) -> Result<Automaton<String>, InterchangeError> {
  let automaton = Document::parse(text)?.into_automaton()?;
  debug!(
    states = automaton.len(),
    transitions = automaton.transitions().count(),
    "parsed automaton"
  );
  Ok(automaton)
}

#[cfg(test)]
mod test {
  use std::io::Write;

  use super::*;

  const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?><!--Created with JFLAP 6.4.--><structure>
	<type>fa</type>
	<automaton>
		<!--The list of states.-->
		<state id="0" name="q0">
			<x>82.0</x>
			<y>107.0</y>
			<initial/>
		</state>
		<state id="1" name="q1">
			<x>211.0</x>
			<y>104.0</y>
		</state>
		<state id="2">
			<x>339.0</x>
			<y>108.0</y>
			<final/>
		</state>
		<!--The list of transitions.-->
		<transition>
			<from>0</from>
			<to>0</to>
			<read>a</read>
		</transition>
		<transition>
			<from>0</from>
			<to>1</to>
			<read>a</read>
		</transition>
		<transition>
			<from>1</from>
			<to>2</to>
			<read>b</read>
		</transition>
	</automaton>
</structure>"#;

  fn err_field(text: &str) -> &'static str {
    match from_str(text) {
      Err(InterchangeError::MalformedFile { field, .. }) => field,
      other => panic!("expected a malformed file, got {other:?}"),
    }
  }

  fn wrap(body: &str) -> String {
    format!("<structure><type>fa</type><automaton>{body}</automaton></structure>")
  }

  #[test]
  fn parse_sample() {
    let a = from_str(SAMPLE).unwrap();
    assert_eq!(a.len(), 3);
    assert_eq!(a.initial(), Some(StateId(0)));
    assert_eq!(
      a.states().map(|s| s.name()).collect::<Vec<_>>(),
      vec!["q0", "q1", "q2"]
    );
    assert_eq!(
      a.final_states().map(|s| s.id()).collect::<Vec<_>>(),
      vec![StateId(2)]
    );
    assert_eq!(
      a.state(StateId(0)).unwrap().destinations(&"a".to_string()),
      &[StateId(0), StateId(1)]
    );
    assert!(!a.is_deterministic());
    assert_eq!(a.accepts(["a", "a", "b"].map(String::from)), Ok(true));
    assert_eq!(a.accepts(["b"].map(String::from)), Ok(false));
  }

  #[test]
  fn symbols_keep_whitespace() {
    let a = from_str(
      r#"<structure>
  <type> fa </type>
  <automaton>
    <state id="0"><initial/></state>
    <transition><from> 0 </from><to>0</to><read> a</read></transition>
    <transition><from>0</from><to>0</to><read>a</read></transition>
    <transition><from>0</from><to>0</to><read> </read></transition>
  </automaton>
</structure>"#,
    )
    .unwrap();
    assert_eq!(
      a.alphabet().into_iter().cloned().collect::<Vec<_>>(),
      vec![" ".to_string(), " a".to_string(), "a".to_string()]
    );
  }

  #[test]
  fn names_and_escapes() {
    let a = from_str(&wrap(
      r#"<state id="7" name="&lt;start&gt; &amp; co"><initial></initial><final></final></state>
         <transition><from>7</from><to>7</to><read>&amp;</read></transition>"#,
    ))
    .unwrap();
    let s = a.state(StateId(7)).unwrap();
    assert_eq!(s.name(), "<start> & co");
    assert!(s.is_initial() && s.is_final());
    assert_eq!(s.destinations(&"&".to_string()), &[StateId(7)]);
  }

  #[test]
  fn ids_are_kept() {
    let a = from_str(&wrap(r#"<state id="10"/><state id="3"><initial/></state>"#)).unwrap();
    assert_eq!(
      a.state_ids().collect::<Vec<_>>(),
      vec![StateId(10), StateId(3)]
    );
    assert_eq!(a.state(StateId(10)).unwrap().name(), "q10");
    assert_eq!(a.initial(), Some(StateId(3)));
  }

  #[test]
  fn malformed() {
    assert_eq!(err_field(&wrap(r#"<state name="x"/>"#)), "id");
    assert_eq!(err_field(&wrap(r#"<state id="zero"/>"#)), "id");
    assert_eq!(err_field(&wrap(r#"<state id="0"/><state id="0"/>"#)), "state");
    assert_eq!(
      err_field(&wrap(
        r#"<state id="0"><initial/></state><state id="1"><initial/></state>"#
      )),
      "initial"
    );
    assert_eq!(
      err_field(&wrap(
        r#"<state id="0"/><transition><to>0</to><read>a</read></transition>"#
      )),
      "from"
    );
    assert_eq!(
      err_field(&wrap(
        r#"<state id="0"/><transition><from>0</from><read>a</read></transition>"#
      )),
      "to"
    );
    assert_eq!(
      err_field(&wrap(r#"<state id="0"/><transition><from>0</from><to>0</to></transition>"#)),
      "read"
    );
    assert_eq!(
      err_field(&wrap(
        r#"<state id="0"/><transition><from>0</from><to>0</to><read/></transition>"#
      )),
      "read"
    );
    assert_eq!(
      err_field(&wrap(
        r#"<state id="0"/><transition><from>0</from><to>4</to><read>a</read></transition>"#
      )),
      "transition"
    );
    assert_eq!(
      err_field("<structure><type>pda</type><automaton/></structure>"),
      "type"
    );
    assert_eq!(err_field("<structure><automaton/></structure>"), "type");
    assert_eq!(err_field("<structure><type>fa</type></automaton>"), "xml");
  }

  #[test]
  fn empty_automaton() {
    let a = from_str("<structure><type>fa</type><automaton/></structure>").unwrap();
    assert!(a.is_empty());
    assert_eq!(a.initial(), None);
  }

  #[test]
  fn file_access() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.jff");
    match read_file(&missing) {
      Err(InterchangeError::FileAccess { path, .. }) => {
        assert!(path.ends_with("missing.jff"));
      },
      other => panic!("expected a file access error, got {other:?}"),
    }

    let present = dir.path().join("sample.jff");
    fs::File::create(&present)
      .unwrap()
      .write_all(SAMPLE.as_bytes())
      .unwrap();
    assert_eq!(read_file(&present).unwrap().len(), 3);
  }
}

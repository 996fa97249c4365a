/* Description: Arena of states making up a finite automaton.

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

//! Arena of states making up a finite automaton.

use std::collections::BTreeSet;

use crate::{
  alphabet::Symbol,
  error::AutomatonError,
  simple_eval::{
    nfa::{NFACache, NFAEvaluator},
    SimpleEvaluator,
  },
  state::{IdCounter, State, StateId},
  subset::SubsetKey,
  FxIndexMap,
};

/// Where an automaton came from. Only rendering looks at this.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum Provenance {
  /// Loaded from a file or assembled by hand.
  #[default]
  Native,
  /// Produced by the subset construction; each state stands for a class of
  /// states of the input automaton.
  Determinized {
    classes: FxIndexMap<StateId, SubsetKey>,
  },
}

#[derive(Debug, Clone)]
pub struct Automaton<Sym> {
  states: FxIndexMap<StateId, State<Sym>>,
  initial: Option<StateId>,
  provenance: Provenance,
  ids: IdCounter,
}

impl<Sym> Default for Automaton<Sym> {
  fn default() -> Self { Self::new() }
}

impl<Sym> Automaton<Sym> {
  pub fn new() -> Self {
    Self {
      states: FxIndexMap::default(),
      initial: None,
      provenance: Provenance::Native,
      ids: IdCounter::new(),
    }
  }

  #[inline(always)]
  pub fn len(&self) -> usize { self.states.len() }

  #[inline(always)]
  pub fn is_empty(&self) -> bool { self.states.is_empty() }

  pub fn state(&self, id: StateId) -> Option<&State<Sym>> { self.states.get(&id) }

  pub fn contains(&self, id: StateId) -> bool { self.states.contains_key(&id) }

  /// All states, in insertion order.
  pub fn states(&self) -> impl Iterator<Item=&State<Sym>> { self.states.values() }

  pub fn state_ids(&self) -> impl Iterator<Item=StateId>+'_ { self.states.keys().copied() }

  pub fn final_states(&self) -> impl Iterator<Item=&State<Sym>> {
    self.states.values().filter(|s| s.is_final())
  }

  #[inline(always)]
  pub fn initial(&self) -> Option<StateId> { self.initial }

  pub fn initial_state(&self) -> Option<&State<Sym>> {
    self.initial.and_then(|id| self.states.get(&id))
  }

  #[inline(always)]
  pub fn provenance(&self) -> &Provenance { &self.provenance }

  pub(crate) fn set_provenance(&mut self, provenance: Provenance) { self.provenance = provenance; }

  /// The input states which `id` stands for, if this automaton was
  /// determinized.
  pub fn class_of(&self, id: StateId) -> Option<&SubsetKey> {
    match &self.provenance {
      Provenance::Native => None,
      Provenance::Determinized { classes } => classes.get(&id),
    }
  }

  pub fn is_deterministic(&self) -> bool { self.states.values().all(State::is_deterministic) }

  /// Reserve an id which no state of this automaton uses.
  pub fn fresh_id(&mut self) -> StateId { self.ids.fresh() }

  /// Insert `state`, replacing any state with the same id.
  ///
  /// If `state` is initial it becomes *the* initial state, displacing any
  /// previous one. Keeping at most one initial state in the automaton is the
  /// caller's job: the previous state keeps its own flag.
  pub fn add_state(&mut self, state: State<Sym>) -> StateId {
    let id = state.id();
    self.ids.observe(id);
    if state.is_initial() {
      self.initial = Some(id);
    } else if self.initial == Some(id) {
      self.initial = None;
    }
    self.states.insert(id, state);
    id
  }

  /// Insert a blank state under a fresh id.
  pub fn new_state(&mut self) -> StateId {
    let id = self.ids.fresh();
    self.add_state(State::new(id))
  }

  /// Drop every state for which `keep` is false, along with its class. Returns
  /// how many were dropped.
  pub(crate) fn retain_states(&mut self, mut keep: impl FnMut(StateId) -> bool) -> usize {
    let before = self.states.len();
    self.states.retain(|id, _| keep(*id));

    let states = &self.states;
    if self.initial.is_some_and(|id| !states.contains_key(&id)) {
      self.initial = None;
    }
    if let Provenance::Determinized { classes } = &mut self.provenance {
      classes.retain(|id, _| states.contains_key(id));
    }

    before - self.states.len()
  }
}

impl<Sym> Automaton<Sym>
where Sym: Symbol
{
  /// Add the edge `from --symbol--> to`. Both endpoints must already exist.
  pub fn add_transition(
    &mut self,
    from: StateId,
    symbol: Sym,
    to: StateId,
  ) -> Result<(), AutomatonError> {
    if !self.states.contains_key(&to) {
      return Err(AutomatonError::UnknownState(to));
    }
    let state = self
      .states
      .get_mut(&from)
      .ok_or(AutomatonError::UnknownState(from))?;
    state.add_transition(symbol, to);
    Ok(())
  }

  /// Every symbol used by some transition, sorted.
  pub fn alphabet(&self) -> BTreeSet<&Sym> {
    self.states.values().flat_map(|s| s.symbols()).collect()
  }

  /// Every edge as a `(from, symbol, to)` triple.
  pub fn transitions(&self) -> impl Iterator<Item=(StateId, &Sym, StateId)>+'_ {
    self.states.values().flat_map(|state| {
      let from = state.id();
      state
        .transitions()
        .flat_map(move |(sym, dests)| dests.iter().map(move |to| (from, sym, *to)))
    })
  }

  /// Run this automaton over `word`, tracking every state it could be in.
  pub fn accepts<I>(&self, word: I) -> Result<bool, AutomatonError>
  where I: IntoIterator<Item=Sym> {
    let eval = NFAEvaluator::from_automaton(self);
    let mut cache: NFACache = eval.create_cache(());
    eval.evaluate(&mut cache, word.into_iter())
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::testing::{build, example_nfa};

  #[test]
  fn add_state_tracks_initial() {
    let mut a = Automaton::<char>::new();
    assert_eq!(a.initial(), None);
    a.add_state(State::new(StateId(0)));
    assert_eq!(a.initial(), None);
    a.add_state(State::new(StateId(1)).initial(true));
    assert_eq!(a.initial(), Some(StateId(1)));
    /* Last writer wins. */
    a.add_state(State::new(StateId(2)).initial(true));
    assert_eq!(a.initial(), Some(StateId(2)));
    assert_eq!(a.initial_state().map(State::name), Some("q2"));
    assert_eq!(a.len(), 3);
  }

  #[test]
  fn fresh_ids_skip_explicit_ones() {
    let mut a = Automaton::<char>::new();
    a.add_state(State::new(StateId(4)));
    let id = a.new_state();
    assert_eq!(id, StateId(5));
    assert_eq!(a.state(id).map(State::name), Some("q5"));
    assert_eq!(a.fresh_id(), StateId(6));
  }

  #[test]
  fn unknown_endpoints() {
    let mut a = build(2, 0, &[1], &[]);
    assert_eq!(
      a.add_transition(StateId(0), 'a', StateId(9)),
      Err(AutomatonError::UnknownState(StateId(9)))
    );
    assert_eq!(
      a.add_transition(StateId(9), 'a', StateId(0)),
      Err(AutomatonError::UnknownState(StateId(9)))
    );
    assert_eq!(a.transitions().count(), 0);
    assert!(a.add_transition(StateId(0), 'a', StateId(1)).is_ok());
    assert_eq!(a.transitions().collect::<Vec<_>>(), vec![(
      StateId(0),
      &'a',
      StateId(1)
    )]);
  }

  #[test]
  fn alphabet_and_edges() {
    let a = example_nfa();
    assert_eq!(a.alphabet().into_iter().copied().collect::<Vec<_>>(), vec![
      '0', '1'
    ]);
    assert_eq!(a.transitions().count(), 8);
    assert!(!a.is_deterministic());
    assert_eq!(
      a.final_states().map(State::id).collect::<Vec<_>>(),
      vec![StateId(3)]
    );
    assert_eq!(a.provenance(), &Provenance::Native);
    assert_eq!(a.class_of(StateId(0)), None);
  }

  #[test]
  fn simulate() {
    let a = example_nfa();
    assert_eq!(a.accepts("000".chars()), Ok(true));
    assert_eq!(a.accepts("0100".chars()), Ok(true));
    assert_eq!(a.accepts("011".chars()), Ok(false));
    assert_eq!(a.accepts("".chars()), Ok(false));
    assert_eq!(a.accepts("00x0".chars()), Ok(false));

    let no_start = Automaton::<char>::new();
    assert_eq!(
      no_start.accepts("0".chars()),
      Err(AutomatonError::NoInitialState)
    );
  }
}

/* Description: Determinization by the subset (power set) construction.

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

//! Determinization by the subset (power set) construction.
//!
//! Every non-empty subset of the input states becomes one output state, so the
//! output has `2^n - 1` states before pruning. A subset is identified by its
//! [`SubsetKey`], the sorted member ids, which is what guarantees that two
//! routes to the same set of input states land on the same output state.

use core::fmt;
use std::collections::BTreeMap;

use smallvec::SmallVec;
use tracing::{debug, debug_span, trace};

use crate::{
  alphabet::Symbol,
  automaton::{Automaton, Provenance},
  error::AutomatonError,
  prune::ReachabilityPruner,
  state::{State, StateId},
  FxIndexMap,
};

/// The canonical form of a set of input states: member ids, sorted and
/// deduplicated.
#[derive(Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubsetKey(SmallVec<[StateId; 4]>);

impl SubsetKey {
  pub fn empty() -> Self { Self(SmallVec::new()) }

  #[inline(always)]
  pub fn members(&self) -> &[StateId] { &self.0 }

  #[inline(always)]
  pub fn len(&self) -> usize { self.0.len() }

  #[inline(always)]
  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn contains(&self, id: StateId) -> bool { self.0.binary_search(&id).is_ok() }
}

impl FromIterator<StateId> for SubsetKey {
  fn from_iter<T: IntoIterator<Item=StateId>>(iter: T) -> Self {
    let mut members: SmallVec<[StateId; 4]> = iter.into_iter().collect();
    members.sort_unstable();
    members.dedup();
    Self(members)
  }
}

impl fmt::Display for SubsetKey {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{{")?;
    for (i, id) in self.0.iter().enumerate() {
      if i > 0 {
        write!(f, ",")?;
      }
      write!(f, "{id}")?;
    }
    write!(f, "}}")
  }
}

/// What to do with symbols that a class has no transition for.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum Totality {
  /// Leave the transition undefined. Reading such a symbol rejects.
  #[default]
  Partial,
  /// Route it to a non-accepting sink class `{}` which loops on every symbol.
  Total,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ConstructionConfig {
  /// Refuse inputs whose power set has more non-empty classes than this.
  pub max_classes: usize,
  pub totality: Totality,
}

impl ConstructionConfig {
  pub const DEFAULT_MAX_CLASSES: usize = 1 << 16;
}

impl Default for ConstructionConfig {
  fn default() -> Self {
    Self {
      max_classes: Self::DEFAULT_MAX_CLASSES,
      totality: Totality::default(),
    }
  }
}

#[derive(Debug, Default, Copy, Clone)]
pub struct SubsetConstructor {
  config: ConstructionConfig,
}

impl SubsetConstructor {
  pub const fn new(config: ConstructionConfig) -> Self { Self { config } }

  #[inline(always)]
  pub const fn config(&self) -> &ConstructionConfig { &self.config }

  /// Number of non-empty subsets of `n` states, unless that exceeds the limit.
  fn class_count(&self, n: usize) -> Result<usize, AutomatonError> {
    u32::try_from(n)
      .ok()
      .and_then(|n| 1usize.checked_shl(n))
      .map(|c| c - 1)
      .filter(|c| *c <= self.config.max_classes)
      .ok_or(AutomatonError::StateExplosion {
        states: n,
        limit: self.config.max_classes,
      })
  }

  /// Build the automaton over every non-empty subset of `nfa`'s states.
  ///
  /// The input is left untouched. The output has fresh ids, assigned in
  /// enumeration order, and still contains classes which cannot be reached; see
  /// [`Self::determinize`].
  pub fn construct<Sym>(&self, nfa: &Automaton<Sym>) -> Result<Automaton<Sym>, AutomatonError>
  where Sym: Symbol {
    let start = nfa.initial().ok_or(AutomatonError::NoInitialState)?;
    let n = nfa.len();
    let count = self.class_count(n)?;
    let _span = debug_span!("subset_construction", states = n, classes = count).entered();

    let mut members: Vec<&State<Sym>> = nfa.states().collect();
    members.sort_unstable();

    let mut dfa: Automaton<Sym> = Automaton::new();
    let mut classes: FxIndexMap<SubsetKey, StateId> = FxIndexMap::default();
    classes.reserve(count.min(ConstructionConfig::DEFAULT_MAX_CLASSES));

    /* The class count check above bounds n well below the width of a u64. */
    for mask in 1u64..(1u64 << n) {
      let subset: SmallVec<[&State<Sym>; 4]> = members
        .iter()
        .enumerate()
        .filter(|(i, _)| mask & (1u64 << i) != 0)
        .map(|(_, s)| *s)
        .collect();
      let key: SubsetKey = subset.iter().map(|s| s.id()).collect();

      let id = dfa.fresh_id();
      let state = State::new(id)
        .named(class_name(&subset))
        .initial(key.members() == &[start])
        .accepting(subset.iter().any(|s| s.is_final()));
      dfa.add_state(state);
      classes.insert(key, id);
    }
    debug!(classes = classes.len(), "enumerated power set");

    for (key, &from) in classes.iter() {
      /* Merge the members' targets per symbol, visiting symbols in order. */
      let mut targets: BTreeMap<&Sym, SmallVec<[StateId; 4]>> = BTreeMap::new();
      for state in key.members().iter().filter_map(|m| nfa.state(*m)) {
        for (sym, dests) in state.transitions() {
          targets.entry(sym).or_default().extend_from_slice(dests);
        }
      }

      for (sym, dests) in targets.into_iter() {
        let reached: SubsetKey = dests.into_iter().collect();
        if reached.is_empty() {
          continue;
        }
        let to = match classes.get(&reached) {
          Some(to) => *to,
          None => return Err(first_unknown(nfa, &reached)),
        };
        trace!(%key, %reached, ?sym, "class transition");
        dfa.add_transition(from, sym.clone(), to)?;
      }
    }

    if self.config.totality == Totality::Total {
      Self::complete(nfa, &mut dfa, &mut classes)?;
    }

    dfa.set_provenance(Provenance::Determinized {
      classes: classes.into_iter().map(|(key, id)| (id, key)).collect(),
    });
    Ok(dfa)
  }

  /// Send every undefined transition to a fresh sink class, if there are any.
  fn complete<Sym>(
    nfa: &Automaton<Sym>,
    dfa: &mut Automaton<Sym>,
    classes: &mut FxIndexMap<SubsetKey, StateId>,
  ) -> Result<(), AutomatonError>
  where
    Sym: Symbol,
  {
    let alphabet: Vec<&Sym> = nfa.alphabet().into_iter().collect();
    let missing: Vec<(StateId, &Sym)> = dfa
      .states()
      .flat_map(|state| {
        alphabet
          .iter()
          .filter(|sym| state.destinations(sym).is_empty())
          .map(move |sym| (state.id(), *sym))
      })
      .collect();
    if missing.is_empty() {
      return Ok(());
    }

    let sink = dfa.fresh_id();
    dfa.add_state(State::new(sink).named("{}"));
    classes.insert(SubsetKey::empty(), sink);
    for sym in alphabet.iter() {
      dfa.add_transition(sink, (*sym).clone(), sink)?;
    }
    for (from, sym) in missing.into_iter() {
      dfa.add_transition(from, sym.clone(), sink)?;
    }
    debug!(?sink, "added sink class");
    Ok(())
  }

  /// [`construct`](Self::construct), then drop every class which cannot be
  /// reached from the initial one.
  pub fn determinize<Sym>(&self, nfa: &Automaton<Sym>) -> Result<Automaton<Sym>, AutomatonError>
  where Sym: Symbol {
    let mut dfa = self.construct(nfa)?;
    ReachabilityPruner.prune(&mut dfa)?;
    Ok(dfa)
  }
}

fn class_name<Sym>(subset: &[&State<Sym>]) -> String {
  let names: Vec<&str> = subset.iter().map(|s| s.name()).collect();
  format!("{{{}}}", names.join(","))
}

fn first_unknown<Sym>(nfa: &Automaton<Sym>, key: &SubsetKey) -> AutomatonError {
  match key.members().iter().find(|id| !nfa.contains(**id)) {
    Some(id) => AutomatonError::UnknownState(*id),
    None => unreachable!("every subset of known states has a class"),
  }
}

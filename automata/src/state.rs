/* Description: Automaton vertices and their outgoing transitions.

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

//! Automaton vertices and their outgoing transitions.

use core::{cmp, fmt, hash};

use smallvec::SmallVec;

use crate::{alphabet::Symbol, FxIndexMap};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct StateId(pub u32);

static_assertions::assert_eq_size!(StateId, u32);

impl fmt::Display for StateId {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self.0) }
}

/// Source of fresh [`StateId`]s for a single automaton.
///
/// Ids which were supplied explicitly are [`observe`](Self::observe)d, so that
/// fresh ids never collide with them.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct IdCounter {
  /* One past the largest id seen so far, which is u32::MAX + 1 once the id
   * space is used up. */
  next: u64,
}

impl IdCounter {
  pub const fn new() -> Self { Self { next: 0 } }

  /// The id [`fresh`](Self::fresh) would return next, if any are left.
  pub fn peek(&self) -> Option<StateId> { u32::try_from(self.next).ok().map(StateId) }

  pub fn fresh(&mut self) -> StateId {
    let id = self.peek().expect("incremented past the largest state id!");
    self.next += 1;
    id
  }

  pub fn observe(&mut self, id: StateId) {
    let StateId(id) = id;
    self.next = self.next.max(u64::from(id) + 1);
  }
}

/// Destinations for a single symbol. More than one means nondeterminism.
pub type Destinations = SmallVec<[StateId; 2]>;

/// A single vertex.
///
/// Equality, hashing and ordering only ever consider the [`StateId`]: the name
/// is a display label, and the transition table refers to other vertices by id
/// rather than owning them.
#[derive(Clone)]
pub struct State<Sym> {
  id: StateId,
  name: String,
  initial: bool,
  accepting: bool,
  transitions: FxIndexMap<Sym, Destinations>,
}

impl<Sym> State<Sym> {
  pub fn new(id: StateId) -> Self {
    Self {
      id,
      name: format!("q{id}"),
      initial: false,
      accepting: false,
      transitions: FxIndexMap::default(),
    }
  }

  pub fn named(mut self, name: impl Into<String>) -> Self {
    self.name = name.into();
    self
  }

  pub fn initial(mut self, initial: bool) -> Self {
    self.initial = initial;
    self
  }

  pub fn accepting(mut self, accepting: bool) -> Self {
    self.accepting = accepting;
    self
  }

  #[inline(always)]
  pub const fn id(&self) -> StateId { self.id }

  #[inline(always)]
  pub fn name(&self) -> &str { &self.name }

  #[inline(always)]
  pub const fn is_initial(&self) -> bool { self.initial }

  #[inline(always)]
  pub const fn is_final(&self) -> bool { self.accepting }

  /// Outgoing transitions, in the order their symbols were first added.
  pub fn transitions(&self) -> impl Iterator<Item=(&Sym, &[StateId])> {
    self
      .transitions
      .iter()
      .map(|(sym, dests)| (sym, dests.as_slice()))
  }

  pub fn symbols(&self) -> impl Iterator<Item=&Sym> { self.transitions.keys() }

  /// Whether every symbol leads to at most one destination.
  pub fn is_deterministic(&self) -> bool { self.transitions.values().all(|d| d.len() <= 1) }
}

impl<Sym> State<Sym>
where Sym: Symbol
{
  /// Add `destination` to the targets of `symbol`. Adding the same edge twice
  /// leaves a single copy.
  pub fn add_transition(&mut self, symbol: Sym, destination: StateId) {
    let dests = self.transitions.entry(symbol).or_default();
    if !dests.contains(&destination) {
      dests.push(destination);
    }
  }

  pub fn destinations(&self, symbol: &Sym) -> &[StateId] {
    self
      .transitions
      .get(symbol)
      .map(|d| d.as_slice())
      .unwrap_or(&[])
  }
}

impl<Sym> PartialEq for State<Sym> {
  fn eq(&self, other: &Self) -> bool { self.id.eq(&other.id) }
}

impl<Sym> Eq for State<Sym> {}

impl<Sym> cmp::PartialOrd for State<Sym> {
  fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> { Some(self.cmp(other)) }
}

impl<Sym> cmp::Ord for State<Sym> {
  fn cmp(&self, other: &Self) -> cmp::Ordering { self.id.cmp(&other.id) }
}

impl<Sym> hash::Hash for State<Sym> {
  fn hash<H: hash::Hasher>(&self, state: &mut H) { self.id.hash(state); }
}

impl<Sym> fmt::Debug for State<Sym>
where Sym: fmt::Debug
{
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.debug_struct("State")
      .field("id", &self.id)
      .field("name", &self.name)
      .field("initial", &self.initial)
      .field("final", &self.accepting)
      .field("transitions", &self.transitions)
      .finish()
  }
}

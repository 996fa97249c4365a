/* Description: Finite automata and the subset construction.

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

//! Finite automata and the subset construction.
//!
//! An [`Automaton`] is an arena of [`State`]s keyed by [`StateId`]. Any
//! automaton may be nondeterministic; [`SubsetConstructor`] produces a new,
//! deterministic automaton whose states are classes of the power set of the
//! input states, and [`ReachabilityPruner`] then drops the classes which can
//! never be entered from the initial class.

#![warn(rustdoc::missing_crate_level_docs)]
// #![warn(missing_docs)]
#![deny(unsafe_code)]
/* Ensure any doctest warnings fails the doctest! */
#![doc(test(attr(deny(warnings))))]

use core::hash::BuildHasherDefault;

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHasher;

pub mod automaton;
pub mod error;
pub mod prune;
pub mod simple_eval;
pub mod state;
pub mod subset;

pub use automaton::{Automaton, Provenance};
pub use error::AutomatonError;
pub use prune::ReachabilityPruner;
pub use state::{IdCounter, State, StateId};
pub use subset::{ConstructionConfig, SubsetConstructor, SubsetKey, Totality};

pub type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;
pub type FxIndexSet<K> = IndexSet<K, BuildHasherDefault<FxHasher>>;

pub mod alphabet {
  use core::{fmt, hash::Hash};

  /// Anything which may label a transition.
  ///
  /// There is no declared alphabet: an automaton's alphabet is whatever set of
  /// symbols its transitions happen to use.
  pub trait Symbol: Clone+Eq+Ord+Hash+fmt::Debug {}

  impl<T> Symbol for T where T: Clone+Eq+Ord+Hash+fmt::Debug {}
}

static_assertions::assert_impl_all!(Automaton<String>: Send, Sync, Clone);
static_assertions::assert_impl_all!(Automaton<char>: Send, Sync, Clone);

#[cfg(test)]
pub(crate) mod testing {
  use proptest::{collection::vec, prelude::*, sample::select};

  use crate::{Automaton, State, StateId};

  pub fn build(n: u32, initial: u32, finals: &[u32], edges: &[(u32, char, u32)]) -> Automaton<char> {
    let mut a = Automaton::new();
    for i in 0..n {
      a.add_state(
        State::new(StateId(i))
          .initial(i == initial)
          .accepting(finals.contains(&i)),
      );
    }
    for &(from, sym, to) in edges {
      a.add_transition(StateId(from), sym, StateId(to)).unwrap();
    }
    a
  }

  /// The NFA used throughout the docs: `q0` loops on everything, and a `0`
  /// may also start a `0 _ 0` run into the absorbing final `q3`.
  pub fn example_nfa() -> Automaton<char> {
    build(4, 0, &[3], &[
      (0, '0', 0),
      (0, '0', 1),
      (0, '1', 0),
      (1, '0', 2),
      (1, '1', 2),
      (2, '0', 3),
      (3, '0', 3),
      (3, '1', 3),
    ])
  }

  pub fn arb_nfa() -> impl Strategy<Value=Automaton<char>> {
    (1u32..=5)
      .prop_flat_map(|n| {
        (
          Just(n),
          0..n,
          vec(any::<bool>(), n as usize),
          vec((0..n, select(vec!['a', 'b']), 0..n), 0..12),
        )
      })
      .prop_map(|(n, initial, finals, edges)| {
        let finals: Vec<u32> = finals
          .iter()
          .enumerate()
          .filter(|(_, f)| **f)
          .map(|(i, _)| i as u32)
          .collect();
        build(n, initial, &finals, &edges)
      })
  }

  /// Every word over `alphabet` of length at most `max_len`, shortest first.
  pub fn words(alphabet: &[char], max_len: usize) -> Vec<Vec<char>> {
    let mut all: Vec<Vec<char>> = vec![Vec::new()];
    let mut frontier: Vec<Vec<char>> = vec![Vec::new()];
    for _ in 0..max_len {
      let mut next = Vec::with_capacity(frontier.len() * alphabet.len());
      for w in frontier.iter() {
        for c in alphabet.iter() {
          let mut w = w.clone();
          w.push(*c);
          next.push(w);
        }
      }
      all.extend(next.iter().cloned());
      frontier = next;
    }
    all
  }
}

/* Description: Left-to-right evaluation of automata over input words.

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

//! Left-to-right evaluation of automata over input words.

pub trait SearchState<Eval: ?Sized> {
  type Args;

  fn create(args: Self::Args) -> Self;
  fn reset(&mut self, eval: &Eval);
}

pub trait SimpleEvaluator<Cache: SearchState<Self>> {
  type Tok;
  type Success;
  type Err;

  fn create_cache(&self, args: Cache::Args) -> Cache {
    let mut cache = Cache::create(args);
    cache.reset(self);
    cache
  }

  fn evaluate(
    &self,
    cache: &mut Cache,
    tokens: impl Iterator<Item=Self::Tok>,
  ) -> Result<Self::Success, Self::Err>;
}


pub mod nfa {
  use core::mem;

  use super::{SearchState, SimpleEvaluator};
  use crate::{
    alphabet::Symbol, automaton::Automaton, error::AutomatonError, state::StateId, FxIndexSet,
  };

  /// Simulates an automaton by tracking the full set of states it may be in.
  ///
  /// This works on any automaton, deterministic or not, and so serves as the
  /// reference semantics that determinization must preserve.
  pub struct NFAEvaluator<'a, Sym> {
    automaton: &'a Automaton<Sym>,
  }

  impl<'a, Sym> NFAEvaluator<'a, Sym> {
    pub const fn from_automaton(automaton: &'a Automaton<Sym>) -> Self { Self { automaton } }
  }

  #[derive(Debug, Default)]
  pub struct NFACache {
    current_states: FxIndexSet<StateId>,
    next_states: FxIndexSet<StateId>,
  }

  impl NFACache {
    pub fn new() -> Self { Self::default() }

    pub fn current(&self) -> impl Iterator<Item=StateId>+'_ { self.current_states.iter().copied() }

    pub fn drain(&mut self) -> impl Iterator<Item=StateId>+'_ { self.current_states.drain(..) }
  }

  impl<'a, Sym> SearchState<NFAEvaluator<'a, Sym>> for NFACache {
    type Args = ();

    fn create(_args: ()) -> Self { Self::new() }

    fn reset(&mut self, eval: &NFAEvaluator<'a, Sym>) {
      self.current_states.clear();
      self.next_states.clear();
      if let Some(initial) = eval.automaton.initial() {
        self.current_states.insert(initial);
      }
    }
  }

  impl<'a, Sym> SimpleEvaluator<NFACache> for NFAEvaluator<'a, Sym>
  where Sym: Symbol
  {
    type Tok = Sym;
    type Success = bool;
    type Err = AutomatonError;

    fn evaluate(
      &self,
      cache: &mut NFACache,
      tokens: impl Iterator<Item=Self::Tok>,
    ) -> Result<Self::Success, Self::Err> {
      if self.automaton.initial().is_none() {
        return Err(AutomatonError::NoInitialState);
      }
      cache.reset(self);

      for tok in tokens {
        cache.next_states.clear();
        for id in cache.current_states.iter() {
          if let Some(state) = self.automaton.state(*id) {
            cache
              .next_states
              .extend(state.destinations(&tok).iter().copied());
          }
        }
        mem::swap(&mut cache.current_states, &mut cache.next_states);
        /* Nothing can revive an empty set of states. */
        if cache.current_states.is_empty() {
          return Ok(false);
        }
      }

      Ok(cache.current_states.iter().any(|id| {
        self
          .automaton
          .state(*id)
          .is_some_and(|state| state.is_final())
      }))
    }
  }

}

/* Description: Removal of states which can never be entered.

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

//! Removal of states which can never be entered.

use tracing::debug;

use crate::{automaton::Automaton, error::AutomatonError, state::StateId, FxIndexSet};

/// Deletes every state not reachable from the initial state.
///
/// Reachability is the only policy: a state which merely has an incoming edge
/// from another unreachable state is still removed.
#[derive(Debug, Default, Copy, Clone)]
pub struct ReachabilityPruner;

impl ReachabilityPruner {
  /// States reachable from the initial state by zero or more transitions, in
  /// depth-first discovery order.
  pub fn reachable<Sym>(automaton: &Automaton<Sym>) -> Result<FxIndexSet<StateId>, AutomatonError> {
    let start = automaton
      .initial()
      .ok_or(AutomatonError::NoInitialState)?;

    let mut visited: FxIndexSet<StateId> = FxIndexSet::default();
    let mut stack: Vec<StateId> = vec![start];
    while let Some(id) = stack.pop() {
      if !visited.insert(id) {
        continue;
      }
      if let Some(state) = automaton.state(id) {
        for (_, dests) in state.transitions() {
          stack.extend(dests.iter().copied().filter(|d| !visited.contains(d)));
        }
      }
    }
    Ok(visited)
  }

  /// Delete the unreachable states of `automaton` in place, returning how many
  /// were removed. Running this twice removes nothing the second time.
  pub fn prune<Sym>(&self, automaton: &mut Automaton<Sym>) -> Result<usize, AutomatonError> {
    let reachable = Self::reachable(automaton)?;
    let removed = automaton.retain_states(|id| reachable.contains(&id));
    debug!(removed, kept = automaton.len(), "pruned unreachable states");
    Ok(removed)
  }
}

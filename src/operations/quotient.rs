use itertools::Itertools;
use tracing::debug;

use crate::prelude::*;

impl Nfa {
    /// Two states are equivalent if they agree on being accepting and, for every symbol,
    /// have precisely the same set of successors. This is a purely syntactic check, states
    /// that accept the same language through different successors are not recognized.
    pub fn are_equivalent(&self, left: StateId, right: StateId) -> bool {
        match (self.state(left), self.state(right)) {
            (Some(l), Some(r)) => {
                l.is_accept() == r.is_accept()
                    && self.transitions_from(left) == self.transitions_from(right)
            }
            _ => false,
        }
    }

    /// Folds `drop` into `keep`: every edge that reaches `drop` is redirected to `keep`
    /// and `drop` is removed. If `drop` was a start state, `keep` becomes one as well,
    /// the flags of all other states are left alone. Returns false if the states coincide
    /// or one of them does not exist.
    pub fn merge_states(&mut self, keep: StateId, drop: StateId) -> bool {
        if keep == drop || !self.contains(keep) {
            return false;
        }
        let incoming = self
            .edges()
            .filter(|&(_, _, target)| target == drop)
            .map(|(source, symbol, _)| (source, symbol.clone()))
            .collect_vec();
        let Some(dropped) = self.remove_state(drop) else {
            return false;
        };
        for (source, symbol) in incoming {
            let source = if source == drop { keep } else { source };
            self.add_transition(source, symbol, keep);
        }
        if dropped.is_start() {
            self.mark_start(keep);
        }
        true
    }

    /// Repeatedly merges pairs of equivalent states (see [`Nfa::are_equivalent`]) until no
    /// such pair is left. Of each pair the state with the smaller id is kept. The accepted
    /// language does not change. Returns the number of states that were merged away.
    pub fn merge_equivalent_states(&mut self) -> usize {
        let mut merged = 0;
        while let Some((keep, drop)) = self.find_equivalent_pair() {
            debug!(
                "merging {} into {}",
                self.name_of(drop).unwrap_or_default(),
                self.name_of(keep).unwrap_or_default()
            );
            self.merge_states(keep, drop);
            merged += 1;
        }
        merged
    }

    fn find_equivalent_pair(&self) -> Option<(StateId, StateId)> {
        self.state_ids()
            .collect_vec()
            .into_iter()
            .tuple_combinations()
            .find(|&(p, q)| self.are_equivalent(p, q))
    }
}

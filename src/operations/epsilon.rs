use itertools::Itertools;
use tracing::{debug, trace, warn};

use crate::{
    math::{OrderedMap, OrderedSet},
    prelude::*,
};

impl Nfa {
    /// Computes the epsilon closure of `state`, the smallest set that contains `state` and
    /// is closed under following epsilon edges.
    pub fn epsilon_closure(&self, state: StateId) -> OrderedSet<StateId> {
        self.epsilon_closure_of([state])
    }

    /// Computes the union of the epsilon closures of all given states. States that do not
    /// exist are ignored.
    pub fn epsilon_closure_of<I>(&self, states: I) -> OrderedSet<StateId>
    where
        I: IntoIterator<Item = StateId>,
    {
        let epsilon = Symbol::epsilon();
        let mut closure = OrderedSet::new();
        let mut stack = states
            .into_iter()
            .filter(|&q| self.contains(q))
            .collect_vec();

        while let Some(q) = stack.pop() {
            if closure.insert(q) {
                stack.extend(self.successors(q, &epsilon).filter(|p| !closure.contains(p)));
            }
        }
        closure
    }

    /// Returns true if at least one edge is labelled with epsilon.
    pub fn has_epsilon_transitions(&self) -> bool {
        let epsilon = Symbol::epsilon();
        self.state_ids()
            .any(|q| self.successors(q, &epsilon).next().is_some())
    }

    /// Eliminates all epsilon edges without changing the accepted language.
    ///
    /// For every state `s` and every symbol `a` other than epsilon, the new `a`-successors
    /// of `s` are the epsilon closures of all `a`-successors of states in the closure of
    /// `s`. A state becomes accepting if an accepting state lies in its epsilon closure.
    /// Finally epsilon is removed from the alphabet. Returns true if there was an epsilon
    /// edge to eliminate.
    ///
    /// This leaves states in place that are no longer reachable, see
    /// [`Nfa::remove_epsilon_transitions`] for the variant that cleans up afterwards.
    pub fn remove_epsilon_edges(&mut self) -> bool {
        let had_epsilon = self.has_epsilon_transitions();
        self.alphabet_mut().remove(&Symbol::epsilon());
        if !had_epsilon {
            return false;
        }

        let closures: OrderedMap<StateId, OrderedSet<StateId>> = self
            .state_ids()
            .map(|q| (q, self.epsilon_closure(q)))
            .collect();
        let accepting = self.accept_states();

        let mut rebuilt = OrderedMap::new();
        for (&q, closure) in &closures {
            let mut table = TransitionTable::new();
            for &u in closure {
                for (symbol, targets) in self.transitions_from(u).into_iter().flatten() {
                    if symbol.is_epsilon() {
                        continue;
                    }
                    table.entry(symbol.clone()).or_insert_with(OrderedSet::new).extend(
                        targets
                            .iter()
                            .filter_map(|t| closures.get(t))
                            .flatten()
                            .copied(),
                    );
                }
            }
            table.retain(|_, targets| !targets.is_empty());
            rebuilt.insert(q, table);
        }
        self.replace_transitions(rebuilt);

        for (q, closure) in closures {
            if !self.is_accepting(q) && !closure.is_disjoint(&accepting) {
                trace!(
                    "{} reaches an accepting state through epsilon edges",
                    self.name_of(q).unwrap_or_default()
                );
                self.set_accepting(q, true);
            }
        }
        true
    }

    /// Eliminates epsilon edges (see [`Nfa::remove_epsilon_edges`]) and prepares the result
    /// for determinization: states that became unreachable are removed and equivalent
    /// states are merged.
    ///
    /// Without a start state every state counts as unreachable, in that case the pruning
    /// step is skipped rather than emptying the automaton.
    ///
    /// ```
    /// use nfakit::prelude::*;
    ///
    /// let mut nfa = Nfa::builder()
    ///     .with_states([State::new("q0").initial(), State::new("q1").accepting()])
    ///     .with_transition("q0", EPSILON, "q1")
    ///     .build()
    ///     .unwrap();
    /// nfa.remove_epsilon_transitions();
    /// assert!(nfa.is_accepting(nfa.id_of("q0").unwrap()));
    /// assert!(!nfa.alphabet().has_epsilon());
    /// ```
    pub fn remove_epsilon_transitions(&mut self) {
        if self.remove_epsilon_edges() {
            debug!("eliminated epsilon transitions");
        }
        if self.start_state().is_some() {
            self.remove_unreachable_states();
        } else {
            warn!("automaton has no start state, skipping removal of unreachable states");
        }
        self.merge_equivalent_states();
    }
}

use bit_set::BitSet;
use itertools::Itertools;
use tracing::debug;

use crate::{
    math::{Map, OrderedSet},
    prelude::*,
};

impl Nfa {
    /// Computes all states that can be reached from `origin` over edges with any label,
    /// epsilon included. `origin` itself is always part of the result if it exists.
    pub fn reachable_states_from(&self, origin: StateId) -> OrderedSet<StateId> {
        if !self.contains(origin) {
            return OrderedSet::new();
        }
        self.traverse([origin], |q| self.all_successors(q).collect_vec())
    }

    /// Depth-first traversal with an explicit stack, returns every state that was visited.
    fn traverse<I, F>(&self, origins: I, successors: F) -> OrderedSet<StateId>
    where
        I: IntoIterator<Item = StateId>,
        F: Fn(StateId) -> Vec<StateId>,
    {
        let mut visited = BitSet::new();
        let mut stack = origins.into_iter().collect_vec();
        let mut seen = OrderedSet::new();

        while let Some(q) = stack.pop() {
            if !visited.insert(q.index()) {
                continue;
            }
            seen.insert(q);
            stack.extend(
                successors(q)
                    .into_iter()
                    .filter(|p| !visited.contains(p.index())),
            );
        }
        seen
    }

    /// The states that can be reached from the start state, empty if there is none.
    pub fn reachable_states(&self) -> OrderedSet<StateId> {
        self.start_state()
            .map(|start| self.reachable_states_from(start))
            .unwrap_or_default()
    }

    /// Returns the states that can not be reached from the start state.
    ///
    /// If the automaton has no start state, nothing is reachable and every state is
    /// returned.
    pub fn find_unreachable_states(&self) -> OrderedSet<StateId> {
        let reachable = self.reachable_states();
        self.state_ids()
            .filter(|q| !reachable.contains(q))
            .collect()
    }

    /// Returns the dead states, i.e. those from which no accepting state can be reached.
    /// Accepting states are never dead.
    ///
    /// Rather than searching forward from every state, this searches backwards once,
    /// starting from all accepting states at the same time.
    pub fn find_dead_states(&self) -> OrderedSet<StateId> {
        let predecessors = self.predecessor_map();
        let alive = self.traverse(self.accept_states(), |q| {
            predecessors
                .get(&q)
                .map(|pre| pre.iter().copied().collect_vec())
                .unwrap_or_default()
        });
        self.state_ids().filter(|q| !alive.contains(q)).collect()
    }

    /// Maps every state to the set of states that have an edge into it.
    pub(crate) fn predecessor_map(&self) -> Map<StateId, OrderedSet<StateId>> {
        let mut predecessors: Map<StateId, OrderedSet<StateId>> = Map::default();
        for (source, _, target) in self.edges() {
            predecessors.entry(target).or_default().insert(source);
        }
        predecessors
    }

    /// Removes all states that [`Nfa::find_unreachable_states`] reports, together with
    /// every edge that reaches them. The alphabet is not changed. Returns the removed
    /// states.
    pub fn remove_unreachable_states(&mut self) -> OrderedSet<StateId> {
        let unreachable = self.find_unreachable_states();
        if !unreachable.is_empty() {
            debug!(
                "removing unreachable states {}",
                self.names(unreachable.iter().copied()).join(", ")
            );
            self.remove_states(unreachable.iter().copied());
        }
        unreachable
    }

    /// Removes all states that [`Nfa::find_dead_states`] reports, together with every edge
    /// that reaches them. The alphabet is not changed. Note that this removes the start
    /// state if the accepted language is empty. Returns the removed states.
    pub fn remove_dead_states(&mut self) -> OrderedSet<StateId> {
        let dead = self.find_dead_states();
        if !dead.is_empty() {
            debug!(
                "removing dead states {}",
                self.names(dead.iter().copied()).join(", ")
            );
            self.remove_states(dead.iter().copied());
        }
        dead
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        math::OrderedSet,
        prelude::*,
        tests::{chain_nfa, ids},
    };

    #[test]
    fn unreachable_states() {
        let nfa = chain_nfa();
        assert!(nfa.find_unreachable_states().is_empty());

        let nfa = Nfa::builder()
            .with_states([
                State::new("1").initial(),
                State::new("2"),
                State::new("3"),
                State::new("4"),
                State::new("5").accepting(),
            ])
            .with_transitions([("1", "a", "2"), ("3", "c", "4")])
            .with_alphabet(["a", "b", "c", "d"])
            .build()
            .unwrap();
        assert_eq!(nfa.find_unreachable_states(), ids(&nfa, ["3", "4", "5"]));
        assert_eq!(nfa.reachable_states(), ids(&nfa, ["1", "2"]));
    }

    #[test]
    fn cycles_and_self_loops_terminate() {
        let nfa = Nfa::builder()
            .with_states([
                State::new("a").initial(),
                State::new("b").accepting(),
                State::new("c"),
            ])
            .with_transitions([("a", 'x', "a"), ("a", 'x', "b"), ("b", 'y', "a"), ("c", 'x', "c")])
            .build()
            .unwrap();
        assert_eq!(nfa.reachable_states_from(nfa.id_of("a").unwrap()), ids(&nfa, ["a", "b"]));
        assert_eq!(nfa.find_unreachable_states(), ids(&nfa, ["c"]));
        assert_eq!(nfa.find_dead_states(), ids(&nfa, ["c"]));
    }

    #[test]
    fn epsilon_edges_count_for_reachability() {
        let nfa = Nfa::builder()
            .with_states([State::new("p").initial(), State::new("q").accepting()])
            .with_transition("p", EPSILON, "q")
            .build()
            .unwrap();
        assert!(nfa.find_unreachable_states().is_empty());
        assert!(nfa.find_dead_states().is_empty());
    }

    #[test]
    fn without_start_state_everything_is_unreachable() {
        let nfa = Nfa::builder()
            .with_states([State::new("p"), State::new("q").accepting()])
            .with_transition("p", 'a', "q")
            .lenient()
            .build()
            .unwrap();
        assert_eq!(nfa.find_unreachable_states(), ids(&nfa, ["p", "q"]));
        assert!(nfa.reachable_states().is_empty());
    }

    #[test]
    fn dead_states() {
        let nfa = chain_nfa();
        let dead = nfa.find_dead_states();
        assert_eq!(dead, ids(&nfa, ["q2", "q3"]));

        // every dead state has no path to an accepting state, every other state has one
        let accepting = nfa.accept_states();
        for q in nfa.state_ids() {
            let reaches_accepting = !nfa.reachable_states_from(q).is_disjoint(&accepting);
            assert_eq!(dead.contains(&q), !reaches_accepting);
        }
    }

    #[test]
    fn without_accept_states_everything_is_dead() {
        let nfa = Nfa::builder()
            .with_states([State::new("p").initial(), State::new("q")])
            .with_transition("p", 'a', "q")
            .lenient()
            .build()
            .unwrap();
        assert_eq!(nfa.find_dead_states().len(), 2);
    }

    #[test_log::test]
    fn removing_unreachable_states_is_idempotent() {
        let mut nfa = Nfa::builder()
            .with_states([
                State::new("s").initial(),
                State::new("t").accepting(),
                State::new("u"),
                State::new("v").accepting(),
            ])
            .with_transitions([("s", 'a', "t"), ("u", 'b', "v"), ("v", 'c', "t")])
            .build()
            .unwrap();

        let removed = nfa.remove_unreachable_states();
        assert_eq!(removed.len(), 2);
        assert_eq!(nfa.names(nfa.state_ids()), vec!["s", "t"]);
        assert_eq!(nfa.names(nfa.accept_states()), vec!["t"]);
        assert!(nfa.alphabet().contains(&Symbol::from('c')), "alphabet is kept");

        assert!(nfa.find_unreachable_states().is_empty());
        assert!(nfa.remove_unreachable_states().is_empty());
    }

    #[test_log::test]
    fn removing_dead_states_leaves_no_dangling_edges() {
        let mut nfa = chain_nfa();
        let q1 = nfa.id_of("q1").unwrap();
        let removed = nfa.remove_dead_states();

        assert_eq!(removed.len(), 2);
        assert_eq!(nfa.size(), 2);
        assert!(nfa.transitions_from(q1).unwrap().is_empty());
        assert!(nfa.edges().all(|(p, _, q)| nfa.contains(p) && nfa.contains(q)));
        assert!(nfa.find_dead_states().is_empty());
        assert_eq!(nfa.alphabet().len(), 3);
    }

    #[test]
    fn predecessors() {
        let nfa = chain_nfa();
        let pre = nfa.predecessor_map();
        let q2 = nfa.id_of("q2").unwrap();
        assert_eq!(pre.get(&q2), Some(&ids(&nfa, ["q1"])));
        assert_eq!(pre.get(&nfa.id_of("q0").unwrap()), None::<&OrderedSet<StateId>>);
    }
}

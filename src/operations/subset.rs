use std::collections::VecDeque;

use itertools::Itertools;
use tracing::{debug, trace};

use crate::{
    math::{Map, OrderedSet},
    prelude::*,
};

/// The largest number of states for which [`Nfa::construct_powerset`] enumerates all
/// subsets.
pub const MAX_POWERSET_STATES: usize = 16;

/// A set of NFA states, which forms a single state of the automaton produced by the
/// subset construction. The empty set is the sink (or error) state.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateSet(OrderedSet<StateId>);

impl StateSet {
    /// Returns the empty set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the set that contains only `q`.
    pub fn singleton(q: StateId) -> Self {
        Self(OrderedSet::from([q]))
    }

    /// Iterates over the members in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &'_ StateId> + '_ {
        self.0.iter()
    }

    /// Returns true if `q` is a member.
    pub fn contains(&self, q: StateId) -> bool {
        self.0.contains(&q)
    }

    /// The number of members.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true for the sink state.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Builds the label of the composite from the names of its members in `nfa`.
    pub fn label(&self, nfa: &Nfa) -> String {
        if self.is_empty() {
            "Ø".to_string()
        } else {
            format!("{{{}}}", nfa.names(self.0.iter().copied()).join(", "))
        }
    }
}

impl From<OrderedSet<StateId>> for StateSet {
    fn from(value: OrderedSet<StateId>) -> Self {
        Self(value)
    }
}

impl FromIterator<StateId> for StateSet {
    fn from_iter<T: IntoIterator<Item = StateId>>(iter: T) -> Self {
        Self(OrderedSet::from_iter(iter))
    }
}

impl IntoIterator for StateSet {
    type IntoIter = std::collections::btree_set::IntoIter<StateId>;
    type Item = StateId;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Show for StateSet {
    fn show(&self) -> String {
        if self.is_empty() {
            "Ø".to_string()
        } else {
            format!("{{{}}}", self.iter().map(|q| q.show()).join(", "))
        }
    }
}

impl std::fmt::Debug for StateSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.show())
    }
}

impl Nfa {
    /// Converts `self` into an equivalent [`Dfa`] using the subset construction.
    ///
    /// Composite states are discovered breadth-first, starting with the epsilon closure of
    /// the start state. The successor of a composite on a symbol is the epsilon closure of
    /// all successors of its members, so epsilon edges need not be eliminated beforehand.
    /// Only reachable composites are created. The result is complete, if some composite
    /// has no successor on a symbol, the empty composite is added as a sink.
    ///
    /// ```
    /// use nfakit::prelude::*;
    ///
    /// let nfa = Nfa::builder()
    ///     .with_states([State::new("q0").initial(), State::new("q1").accepting()])
    ///     .with_transitions([("q0", 'a', "q0"), ("q0", 'a', "q1"), ("q0", 'b', "q0")])
    ///     .build()
    ///     .unwrap();
    /// let dfa = nfa.subset_construction().unwrap();
    /// assert_eq!(dfa.size(), 2);
    /// assert!(dfa.accepts("aba".chars()));
    /// assert!(!dfa.accepts("ab".chars()));
    /// ```
    pub fn subset_construction(&self) -> Result<Dfa, AutomatonError> {
        let start = self.start_state().ok_or(AutomatonError::NoStartState)?;
        let letters = self.alphabet().letters().cloned().collect_vec();
        let accepting = self.accept_states();

        let mut dfa = Dfa::for_alphabet(letters.iter().collect());
        let mut discovered: Map<StateSet, usize> = Map::default();
        let mut queue = VecDeque::new();

        let mut intern = |composite: StateSet, dfa: &mut Dfa, queue: &mut VecDeque<usize>| {
            if let Some(&id) = discovered.get(&composite) {
                return id;
            }
            let is_accepting = composite.iter().any(|q| accepting.contains(q));
            let id = dfa.add_state(composite.clone(), composite.label(self), is_accepting);
            trace!("discovered composite {}", composite.label(self));
            discovered.insert(composite, id);
            queue.push_back(id);
            id
        };

        intern(StateSet::from(self.epsilon_closure(start)), &mut dfa, &mut queue);

        while let Some(source) = queue.pop_front() {
            let Some(members) = dfa.composite(source).cloned() else {
                continue;
            };
            for symbol in &letters {
                let successors = self.epsilon_closure_of(
                    members
                        .iter()
                        .flat_map(|&q| self.successors(q, symbol)),
                );
                let target = intern(StateSet::from(successors), &mut dfa, &mut queue);
                dfa.set_transition(source, symbol.clone(), target);
            }
        }

        debug!(
            "subset construction produced {} states from {}",
            dfa.size(),
            self.size()
        );
        Ok(dfa)
    }

    /// Enumerates all subsets of the states, the empty set included, ordered by size and
    /// then lexicographically. This is exponential in the number of states and meant for
    /// inspection only, it refuses to run on more than [`MAX_POWERSET_STATES`] states.
    /// For converting an automaton use [`Nfa::subset_construction`].
    pub fn construct_powerset(&self) -> Result<Vec<StateSet>, AutomatonError> {
        let states = self.state_ids().collect_vec();
        if states.len() > MAX_POWERSET_STATES {
            return Err(AutomatonError::PowersetTooLarge {
                states: states.len(),
                limit: MAX_POWERSET_STATES,
            });
        }

        let mut powerset = (0u32..(1 << states.len()))
            .map(|mask| {
                states
                    .iter()
                    .enumerate()
                    .filter(|(bit, _)| mask & (1 << bit) != 0)
                    .map(|(_, &q)| q)
                    .collect::<StateSet>()
            })
            .collect_vec();
        powerset.sort_by(|l, r| l.len().cmp(&r.len()).then_with(|| l.cmp(r)));
        Ok(powerset)
    }
}

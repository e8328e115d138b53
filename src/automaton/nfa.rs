use itertools::Itertools;
use tracing::trace;

use crate::{
    math::{Bijection, OrderedMap, OrderedSet},
    prelude::*,
};

/// The outgoing transitions of a single state: for every symbol the set of successors.
/// Entries with an empty successor set are never stored.
pub type TransitionTable = OrderedMap<Symbol, OrderedSet<StateId>>;

/// Decides how strictly the structural invariants of an automaton are checked when it is
/// constructed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Validation {
    /// Construction fails unless there is exactly one start state and at least one
    /// accepting state.
    #[default]
    Strict,
    /// Meant for automata that are still being edited: missing start or accept states are
    /// tolerated, several start states remain detectable through
    /// [`Nfa::has_ambiguous_start`].
    Lenient,
}

/// A nondeterministic finite automaton with epsilon transitions.
///
/// States live in an arena and are addressed by [`StateId`]s. The automaton owns the one
/// and only transition index, mapping each state to its [`TransitionTable`]. Start and
/// accept states are not stored separately but derived from the flags of the states, so
/// they can not drift apart from the states themselves.
///
/// Automata are usually created through [`Nfa::builder`]:
/// ```
/// use nfakit::prelude::*;
///
/// let nfa = Nfa::builder()
///     .with_states([State::new("q0").initial(), State::new("q1").accepting()])
///     .with_transitions([("q0", "a", "q1"), ("q1", "a", "q1")])
///     .build()
///     .unwrap();
/// assert!(nfa.accepts("aaa".chars()));
/// assert!(!nfa.accepts("".chars()));
/// ```
#[derive(Clone)]
pub struct Nfa {
    states: OrderedMap<StateId, State>,
    transitions: OrderedMap<StateId, TransitionTable>,
    names: Bijection<String, StateId>,
    alphabet: Alphabet,
    validation: Validation,
    next_id: usize,
}

impl Nfa {
    /// Returns a builder, which is the main way of constructing an [`Nfa`].
    pub fn builder() -> NfaBuilder {
        NfaBuilder::default()
    }

    /// Creates an automaton without states over the given alphabet. No validation takes
    /// place, see [`Nfa::validate`].
    pub fn with_alphabet(alphabet: Alphabet, validation: Validation) -> Self {
        Self {
            states: OrderedMap::new(),
            transitions: OrderedMap::new(),
            names: Bijection::new(),
            alphabet,
            validation,
            next_id: 0,
        }
    }

    /// Checks the structural invariants that strict construction demands: at least one
    /// accepting state and precisely one start state.
    pub fn validate(&self) -> Result<(), AutomatonError> {
        if self.accept_states().is_empty() {
            return Err(AutomatonError::NoAcceptState);
        }
        match self.start_states().as_slice() {
            [] => Err(AutomatonError::NoStartState),
            [_] => Ok(()),
            many => Err(AutomatonError::MultipleStartStates(
                self.names(many.iter().copied())
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            )),
        }
    }

    /// The validation mode the automaton was constructed with.
    pub fn validation(&self) -> Validation {
        self.validation
    }

    /// Adds a state, fails if a state of the same name exists already.
    pub fn add_state(&mut self, state: State) -> Result<StateId, AutomatonError> {
        if self.names.contains_left(state.name()) {
            return Err(AutomatonError::DuplicateState(state.name().to_string()));
        }
        Ok(self.push_state(state))
    }

    /// Adds a state whose name is known to be fresh.
    pub(crate) fn push_state(&mut self, state: State) -> StateId {
        let id = StateId::new(self.next_id);
        self.next_id += 1;
        self.names.insert(state.name().to_string(), id);
        self.states.insert(id, state);
        self.transitions.insert(id, TransitionTable::new());
        id
    }

    /// Removes a state together with all edges leaving or reaching it and returns it.
    /// Returns `None` if the state does not exist.
    pub fn remove_state(&mut self, id: StateId) -> Option<State> {
        let state = self.states.remove(&id)?;
        self.transitions.remove(&id);
        self.names.remove_by_right(&id);
        self.scrub_edges_to(&OrderedSet::from([id]));
        Some(state)
    }

    /// Removes all given states together with their edges, returns how many of them
    /// existed.
    pub fn remove_states<I: IntoIterator<Item = StateId>>(&mut self, ids: I) -> usize {
        let removed: OrderedSet<StateId> = ids
            .into_iter()
            .filter(|id| {
                let Some(state) = self.states.remove(id) else {
                    return false;
                };
                trace!("removing state {}", state.name());
                self.transitions.remove(id);
                self.names.remove_by_right(id);
                true
            })
            .collect();
        self.scrub_edges_to(&removed);
        removed.len()
    }

    fn scrub_edges_to(&mut self, removed: &OrderedSet<StateId>) {
        if removed.is_empty() {
            return;
        }
        for table in self.transitions.values_mut() {
            table.retain(|_, targets| {
                targets.retain(|target| !removed.contains(target));
                !targets.is_empty()
            });
        }
    }

    /// Inserts an edge from `from` to `to` on `symbol`. Returns true if the edge did not
    /// exist before and false if it did or if one of the states does not exist. The symbol
    /// is added to the alphabet if necessary.
    pub fn add_transition<S>(&mut self, from: StateId, symbol: S, to: StateId) -> bool
    where
        S: Into<Symbol>,
    {
        if !self.contains(to) {
            return false;
        }
        let Some(table) = self.transitions.get_mut(&from) else {
            return false;
        };
        let symbol = symbol.into();
        self.alphabet.insert(symbol.clone());
        table.entry(symbol).or_default().insert(to)
    }

    /// Removes the edge from `from` to `to` on `symbol`, returns whether it existed. When
    /// the last successor for a symbol is removed, the symbol entry of the state goes with
    /// it. The alphabet is left untouched.
    pub fn delete_transition(&mut self, from: StateId, symbol: &Symbol, to: StateId) -> bool {
        let Some(table) = self.transitions.get_mut(&from) else {
            return false;
        };
        let Some(targets) = table.get_mut(symbol) else {
            return false;
        };
        let removed = targets.remove(&to);
        if targets.is_empty() {
            table.remove(symbol);
        }
        removed
    }

    /// Makes `id` the only start state. Returns false if the state does not exist.
    pub fn set_start(&mut self, id: StateId) -> bool {
        if !self.contains(id) {
            return false;
        }
        for (&q, state) in self.states.iter_mut() {
            state.set_start(q == id);
        }
        true
    }

    /// Flags `id` as start state without touching any other state.
    pub(crate) fn mark_start(&mut self, id: StateId) {
        if let Some(state) = self.states.get_mut(&id) {
            state.set_start(true);
        }
    }

    /// Sets or clears the accepting flag of `id`. Returns false if the state does not exist.
    pub fn set_accepting(&mut self, id: StateId, accepting: bool) -> bool {
        match self.states.get_mut(&id) {
            Some(state) => {
                state.set_accept(accepting);
                true
            }
            None => false,
        }
    }

    /// The number of states.
    pub fn size(&self) -> usize {
        self.states.len()
    }

    /// Returns true if `id` refers to a state of this automaton.
    pub fn contains(&self, id: StateId) -> bool {
        self.states.contains_key(&id)
    }

    /// Gives access to the state with the given id.
    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(&id)
    }

    /// Iterates over the ids of all states in ascending order.
    pub fn state_ids(&self) -> impl Iterator<Item = StateId> + '_ {
        self.states.keys().copied()
    }

    /// Iterates over all states and their ids in ascending order of the ids.
    pub fn states(&self) -> impl Iterator<Item = (StateId, &State)> + '_ {
        self.states.iter().map(|(&id, state)| (id, state))
    }

    /// Looks up a state by name.
    pub fn id_of(&self, name: &str) -> Option<StateId> {
        self.names.get_by_left(name).copied()
    }

    /// Returns the name of the state with the given id.
    pub fn name_of(&self, id: StateId) -> Option<&str> {
        self.names.get_by_right(&id).map(String::as_str)
    }

    /// Translates ids into names, skipping ids that do not exist.
    pub fn names<I: IntoIterator<Item = StateId>>(&self, ids: I) -> Vec<&str> {
        ids.into_iter().filter_map(|id| self.name_of(id)).collect()
    }

    /// The alphabet, which contains every symbol that labels some edge and possibly more.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub(crate) fn alphabet_mut(&mut self) -> &mut Alphabet {
        &mut self.alphabet
    }

    /// Returns all states that are flagged as start state.
    pub fn start_states(&self) -> Vec<StateId> {
        self.states
            .iter()
            .filter(|(_, state)| state.is_start())
            .map(|(&id, _)| id)
            .collect()
    }

    /// Returns the start state. If several states are flagged, which can only happen for
    /// automata that were constructed with [`Validation::Lenient`], the one with the
    /// smallest id is returned.
    pub fn start_state(&self) -> Option<StateId> {
        self.states
            .iter()
            .find(|(_, state)| state.is_start())
            .map(|(&id, _)| id)
    }

    /// Returns true if more than one state is flagged as start state.
    pub fn has_ambiguous_start(&self) -> bool {
        self.states.values().filter(|state| state.is_start()).count() > 1
    }

    /// Returns the set of accepting states.
    pub fn accept_states(&self) -> OrderedSet<StateId> {
        self.states
            .iter()
            .filter(|(_, state)| state.is_accept())
            .map(|(&id, _)| id)
            .collect()
    }

    /// Returns true if `id` exists and is accepting.
    pub fn is_accepting(&self, id: StateId) -> bool {
        self.states.get(&id).is_some_and(State::is_accept)
    }

    /// The outgoing transitions of `id`.
    pub fn transitions_from(&self, id: StateId) -> Option<&TransitionTable> {
        self.transitions.get(&id)
    }

    pub(crate) fn replace_transitions(
        &mut self,
        transitions: OrderedMap<StateId, TransitionTable>,
    ) {
        debug_assert!(transitions.keys().eq(self.states.keys()));
        self.transitions = transitions;
    }

    /// Iterates over the successors of `id` on `symbol`.
    pub fn successors(&self, id: StateId, symbol: &Symbol) -> impl Iterator<Item = StateId> + '_ {
        self.transitions
            .get(&id)
            .and_then(|table| table.get(symbol))
            .into_iter()
            .flatten()
            .copied()
    }

    /// Iterates over the successors of `id` on any symbol, epsilon included. A target that
    /// is reached on several symbols is produced once per symbol.
    pub fn all_successors(&self, id: StateId) -> impl Iterator<Item = StateId> + '_ {
        self.transitions
            .get(&id)
            .into_iter()
            .flat_map(|table| table.values().flatten().copied())
    }

    /// Iterates over all edges as `(source, symbol, target)` triples.
    pub fn edges(&self) -> impl Iterator<Item = (StateId, &Symbol, StateId)> + '_ {
        self.transitions.iter().flat_map(|(&source, table)| {
            table.iter().flat_map(move |(symbol, targets)| {
                targets.iter().map(move |&t| (source, symbol, t))
            })
        })
    }

    /// Computes the set of states that can be reached from the start state by reading
    /// `word`, following epsilon edges before and after every symbol.
    pub fn reached_states<W, S>(&self, word: W) -> OrderedSet<StateId>
    where
        W: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        let Some(start) = self.start_state() else {
            return OrderedSet::new();
        };
        word.into_iter()
            .fold(self.epsilon_closure(start), |current, symbol| {
                let symbol = symbol.into();
                self.epsilon_closure_of(current.iter().flat_map(|&q| self.successors(q, &symbol)))
            })
    }

    /// Returns true if reading `word` from the start state can end in an accepting state.
    pub fn accepts<W, S>(&self, word: W) -> bool
    where
        W: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        self.reached_states(word)
            .into_iter()
            .any(|q| self.is_accepting(q))
    }
}

impl std::fmt::Debug for Nfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "NFA over {:?}", self.alphabet)?;
        for (id, state) in self.states() {
            let flags = [(state.is_start(), "initial"), (state.is_accept(), "accepting")]
                .into_iter()
                .filter_map(|(set, flag)| set.then_some(flag))
                .join(", ");
            writeln!(f, "{} [{}]", state.name(), flags)?;
            for (symbol, targets) in self.transitions_from(id).into_iter().flatten() {
                writeln!(
                    f,
                    "  --{}--> {}",
                    symbol,
                    self.names(targets.iter().copied()).join(", ")
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use crate::tests::chain_nfa;

    #[test]
    fn derived_start_and_accept_states() {
        let nfa = chain_nfa();
        assert_eq!(nfa.size(), 4);
        assert_eq!(nfa.start_state(), nfa.id_of("q0"));
        assert_eq!(nfa.names(nfa.accept_states()), vec!["q1"]);
        assert!(!nfa.has_ambiguous_start());
        assert_eq!(nfa.validation(), Validation::Strict);
    }

    #[test]
    fn adding_and_deleting_transitions() {
        let mut nfa = chain_nfa();
        let q0 = nfa.id_of("q0").unwrap();
        let q3 = nfa.id_of("q3").unwrap();
        let d = Symbol::from('d');

        assert!(nfa.add_transition(q0, 'd', q3));
        assert!(!nfa.add_transition(q0, 'd', q3), "edge exists already");
        assert!(nfa.alphabet().contains(&d));
        assert_eq!(nfa.successors(q0, &d).collect::<Vec<_>>(), vec![q3]);

        assert!(nfa.delete_transition(q0, &d, q3));
        assert!(!nfa.delete_transition(q0, &d, q3), "edge is already gone");
        assert!(
            !nfa.transitions_from(q0).unwrap().contains_key(&d),
            "empty symbol entries are pruned"
        );
        assert!(nfa.alphabet().contains(&d), "alphabet is not pruned");
    }

    #[test]
    fn transitions_to_unknown_states_are_rejected() {
        let mut nfa = chain_nfa();
        let q0 = nfa.id_of("q0").unwrap();
        let q1 = nfa.id_of("q1").unwrap();
        nfa.remove_state(q1);
        assert!(!nfa.add_transition(q0, 'a', q1));
        assert!(!nfa.add_transition(q1, 'a', q0));
    }

    #[test]
    fn removing_a_state_scrubs_its_edges() {
        let mut nfa = chain_nfa();
        let q0 = nfa.id_of("q0").unwrap();
        let q1 = nfa.id_of("q1").unwrap();
        let removed = nfa.remove_state(q1).unwrap();

        assert_eq!(removed.name(), "q1");
        assert_eq!(nfa.id_of("q1"), None);
        assert!(nfa.accept_states().is_empty());
        assert!(nfa.transitions_from(q0).unwrap().is_empty());
        assert!(nfa.edges().all(|(p, _, q)| p != q1 && q != q1));
        assert!(nfa.alphabet().contains(&Symbol::from('a')));
    }

    #[test]
    fn state_ids_are_not_reused() {
        let mut nfa = chain_nfa();
        let q3 = nfa.id_of("q3").unwrap();
        nfa.remove_state(q3);
        let fresh = nfa.add_state(State::new("q3")).unwrap();
        assert_ne!(fresh, q3);
        assert_eq!(
            nfa.add_state(State::new("q0")),
            Err(AutomatonError::DuplicateState("q0".into()))
        );
    }

    #[test]
    fn flags_can_be_changed() {
        let mut nfa = chain_nfa();
        let q2 = nfa.id_of("q2").unwrap();
        assert!(nfa.set_start(q2));
        assert_eq!(nfa.start_states(), vec![q2]);
        assert!(nfa.set_accepting(q2, true));
        assert!(nfa.is_accepting(q2));
    }

    #[test]
    fn runs_follow_all_branches() {
        let nfa = Nfa::builder()
            .with_states([
                State::new("p").initial(),
                State::new("q"),
                State::new("r").accepting(),
            ])
            .with_transitions([("p", "a", "p"), ("p", "a", "q"), ("q", "b", "r")])
            .build()
            .unwrap();
        assert_eq!(nfa.names(nfa.reached_states("a".chars())), vec!["p", "q"]);
        assert!(nfa.accepts("aaab".chars()));
        assert!(nfa.accepts(["a", "b"]));
        assert!(!nfa.accepts("aba".chars()));
        assert!(!nfa.accepts("c".chars()));
    }

    #[test]
    fn automata_can_be_shared_between_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Nfa>();
        assert_send_sync::<Dfa>();
    }
}

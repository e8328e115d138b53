use itertools::Itertools;

use crate::{math::OrderedMap, prelude::*};

/// A deterministic finite automaton whose states are composites, i.e. sets of states of
/// the [`Nfa`] it was constructed from, see [`Nfa::subset_construction`].
///
/// States are addressed by `usize` indices, the start state always has index `0`. Every
/// composite carries a label built from the names of its members (`{q0, q1}`), the empty
/// composite is the sink and is labelled `Ø`.
#[derive(Clone)]
pub struct Dfa {
    alphabet: Alphabet,
    states: Vec<StateSet>,
    labels: Vec<String>,
    accepting: Vec<bool>,
    transitions: Vec<OrderedMap<Symbol, usize>>,
}

impl Dfa {
    pub(crate) fn for_alphabet(alphabet: Alphabet) -> Self {
        Self {
            alphabet,
            states: vec![],
            labels: vec![],
            accepting: vec![],
            transitions: vec![],
        }
    }

    pub(crate) fn add_state(
        &mut self,
        composite: StateSet,
        label: String,
        accepting: bool,
    ) -> usize {
        let id = self.states.len();
        self.states.push(composite);
        self.labels.push(label);
        self.accepting.push(accepting);
        self.transitions.push(OrderedMap::new());
        id
    }

    pub(crate) fn set_transition(&mut self, from: usize, on: Symbol, to: usize) {
        if let Some(table) = self.transitions.get_mut(from) {
            table.insert(on, to);
        }
    }

    /// The index of the start state.
    pub fn start(&self) -> usize {
        0
    }

    /// The number of states.
    pub fn size(&self) -> usize {
        self.states.len()
    }

    /// Iterates over all state indices.
    pub fn state_indices(&self) -> std::ops::Range<usize> {
        0..self.states.len()
    }

    /// The alphabet, which never contains epsilon.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// The set of underlying NFA states that `q` stands for.
    pub fn composite(&self, q: usize) -> Option<&StateSet> {
        self.states.get(q)
    }

    /// Looks up the index of a composite.
    pub fn find(&self, composite: &StateSet) -> Option<usize> {
        self.states.iter().position(|c| c == composite)
    }

    /// The display label of `q`, `{q0, q1}` or `Ø` for the sink. Distinct composites may
    /// share a label if state names contain commas.
    pub fn label(&self, q: usize) -> Option<&str> {
        self.labels.get(q).map(String::as_str)
    }

    /// Whether `q` contains an accepting NFA state.
    pub fn is_accepting(&self, q: usize) -> bool {
        self.accepting.get(q).copied().unwrap_or(false)
    }

    /// Iterates over the indices of all accepting states.
    pub fn accept_states(&self) -> impl Iterator<Item = usize> + '_ {
        self.accepting
            .iter()
            .enumerate()
            .filter_map(|(q, &acc)| acc.then_some(q))
    }

    /// The unique successor of `q` on `symbol`.
    pub fn successor(&self, q: usize, symbol: &Symbol) -> Option<usize> {
        self.transitions.get(q)?.get(symbol).copied()
    }

    /// The outgoing transitions of `q`.
    pub fn transitions_from(&self, q: usize) -> Option<&OrderedMap<Symbol, usize>> {
        self.transitions.get(q)
    }

    /// Returns true if every state has a successor on every symbol of the alphabet.
    pub fn is_complete(&self) -> bool {
        self.transitions
            .iter()
            .all(|table| self.alphabet.letters().all(|sym| table.contains_key(sym)))
    }

    /// Runs `word` from the start state, returns `None` as soon as a symbol has no
    /// successor.
    pub fn run<W, S>(&self, word: W) -> Option<usize>
    where
        W: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        if self.states.is_empty() {
            return None;
        }
        word.into_iter()
            .try_fold(self.start(), |q, sym| self.successor(q, &sym.into()))
    }

    /// Returns true if the run on `word` exists and ends in an accepting state.
    pub fn accepts<W, S>(&self, word: W) -> bool
    where
        W: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        self.run(word).is_some_and(|q| self.is_accepting(q))
    }

    /// Turns `self` into an [`Nfa`] whose states are named after the composite labels. This
    /// is how a determinized automaton is handed back to an editor or a renderer.
    ///
    /// Labels are not necessarily unique, a state named `a, b` yields the same label as the
    /// composite of `a` and `b`. On a clash, primes are appended to the later label.
    pub fn to_nfa(&self) -> Result<Nfa, AutomatonError> {
        let mut nfa = Nfa::with_alphabet(self.alphabet.clone(), Validation::Lenient);
        let ids = self
            .state_indices()
            .map(|q| {
                let mut name = self.labels[q].clone();
                while nfa.id_of(&name).is_some() {
                    name.push('\'');
                }
                let mut state = State::new(name);
                if q == self.start() {
                    state = state.initial();
                }
                if self.is_accepting(q) {
                    state = state.accepting();
                }
                nfa.add_state(state)
            })
            .collect::<Result<Vec<_>, _>>()?;
        for (q, table) in self.transitions.iter().enumerate() {
            for (sym, &p) in table {
                nfa.add_transition(ids[q], sym.clone(), ids[p]);
            }
        }
        Ok(nfa)
    }
}

impl std::fmt::Debug for Dfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "DFA over {:?}", self.alphabet)?;
        for q in self.state_indices() {
            writeln!(
                f,
                "{}{} {}",
                if self.is_accepting(q) { "*" } else { " " },
                self.labels[q],
                self.transitions[q]
                    .iter()
                    .map(|(sym, &p)| format!("{sym}->{}", self.labels[p]))
                    .join(" ")
            )?;
        }
        Ok(())
    }
}

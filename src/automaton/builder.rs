use itertools::Itertools;
use tracing::debug;

use crate::prelude::*;

/// Helper struct for the construction of an [`Nfa`] from the data an editor holds: a list
/// of states with their flags, a list of transitions between state names and optionally
/// the alphabet.
///
/// If no alphabet is given, it is derived from the symbols that appear on transitions.
/// If one is given, [`Validation::Strict`] rejects transitions on symbols outside of it,
/// while [`Validation::Lenient`] extends the alphabet instead. Epsilon never has to be
/// declared.
///
/// # Example
/// ```
/// use nfakit::prelude::*;
///
/// let nfa = NfaBuilder::default()
///     .with_states([State::new("q0").initial(), State::new("q1").accepting()])
///     .with_transitions([("q0", "ε", "q1")])
///     .with_alphabet(["a"])
///     .build()
///     .unwrap();
/// assert!(nfa.alphabet().has_epsilon());
///
/// let missing_start = NfaBuilder::default()
///     .with_states([State::new("q0").accepting()])
///     .build();
/// assert_eq!(missing_start.unwrap_err(), AutomatonError::NoStartState);
/// ```
#[derive(Clone, Debug, Default)]
pub struct NfaBuilder {
    states: Vec<State>,
    transitions: Vec<(String, Symbol, String)>,
    alphabet: Option<Alphabet>,
    validation: Validation,
}

impl NfaBuilder {
    /// Adds a single state.
    pub fn with_state(mut self, state: State) -> Self {
        self.states.push(state);
        self
    }

    /// Adds a list of states, in order.
    pub fn with_states<I: IntoIterator<Item = State>>(mut self, states: I) -> Self {
        self.states.extend(states);
        self
    }

    /// Adds a transition between two states that are referred to by name.
    pub fn with_transition<F, S, T>(mut self, from: F, on: S, to: T) -> Self
    where
        F: Into<String>,
        S: Into<Symbol>,
        T: Into<String>,
    {
        self.transitions.push((from.into(), on.into(), to.into()));
        self
    }

    /// Adds a list of `(from, symbol, to)` transitions.
    pub fn with_transitions<I, F, S, T>(self, transitions: I) -> Self
    where
        I: IntoIterator<Item = (F, S, T)>,
        F: Into<String>,
        S: Into<Symbol>,
        T: Into<String>,
    {
        transitions
            .into_iter()
            .fold(self, |acc, (from, on, to)| acc.with_transition(from, on, to))
    }

    /// Fixes the alphabet instead of deriving it from the transitions. Symbols may be
    /// declared that no transition uses.
    pub fn with_alphabet<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        self.alphabet
            .get_or_insert_with(Alphabet::default)
            .extend(symbols);
        self
    }

    /// Sets the validation mode, the default is [`Validation::Strict`].
    pub fn validation(mut self, validation: Validation) -> Self {
        self.validation = validation;
        self
    }

    /// Shorthand for `validation(Validation::Lenient)`.
    pub fn lenient(self) -> Self {
        self.validation(Validation::Lenient)
    }

    /// Constructs the automaton and, in strict mode, validates it.
    pub fn build(self) -> Result<Nfa, AutomatonError> {
        let declared = self.alphabet.is_some();
        let mut nfa = Nfa::with_alphabet(self.alphabet.unwrap_or_default(), self.validation);

        for state in self.states {
            nfa.add_state(state)?;
        }

        for (from, on, to) in self.transitions {
            let source = nfa
                .id_of(&from)
                .ok_or(AutomatonError::UnknownState(from))?;
            let target = nfa.id_of(&to).ok_or(AutomatonError::UnknownState(to))?;
            if declared
                && self.validation == Validation::Strict
                && !on.is_epsilon()
                && !nfa.alphabet().contains(&on)
            {
                return Err(AutomatonError::SymbolNotInAlphabet(on));
            }
            nfa.add_transition(source, on, target);
        }

        if self.validation == Validation::Strict {
            nfa.validate()?;
        }

        let unreachable = nfa.find_unreachable_states();
        if !unreachable.is_empty() {
            debug!(
                "constructed automaton has unreachable states {}",
                nfa.names(unreachable).iter().join(", ")
            );
        }

        Ok(nfa)
    }
}

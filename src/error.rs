use thiserror::Error;

use crate::alphabet::Symbol;

/// Everything that can go wrong while constructing or converting an automaton. The first
/// three variants are the structural checks that [`crate::Validation::Strict`] enforces,
/// the remaining ones concern malformed input handed over by the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AutomatonError {
    /// None of the states is flagged as start state.
    #[error("no start state defined")]
    NoStartState,
    /// More than one state is flagged as start state, their names are given.
    #[error("can't have more than one start state, found {}", .0.join(", "))]
    MultipleStartStates(Vec<String>),
    /// None of the states is flagged as accepting.
    #[error("no accept states defined")]
    NoAcceptState,
    /// Two states were given the same name.
    #[error("a state named `{0}` already exists")]
    DuplicateState(String),
    /// A transition refers to a state name that does not exist.
    #[error("there is no state named `{0}`")]
    UnknownState(String),
    /// A transition uses a symbol that the explicitly given alphabet does not contain.
    #[error("symbol `{0}` is not part of the alphabet")]
    SymbolNotInAlphabet(Symbol),
    /// The powerset enumeration was requested for too many states.
    #[error("refusing to enumerate the powerset of {states} states, the limit is {limit}")]
    PowersetTooLarge {
        /// Number of states in the automaton.
        states: usize,
        /// The largest number of states that is enumerated.
        limit: usize,
    },
}

//! Library for working with nondeterministic finite automata in Rust.
//!
//! The central type is [`Nfa`], an automaton over string symbols that may contain epsilon
//! transitions. It stores its states in an arena, addresses them through stable
//! [`StateId`]s and owns the single transition index, so the graph may be cyclic and
//! densely shared without any reference counting. An automaton is usually put together
//! from the data an editor holds through an [`NfaBuilder`], which checks the structural
//! invariants either strictly (exactly one start state, at least one accepting state) or
//! leniently, for automata that are still being worked on.
//!
//! On top of the container, the [`operations`] module implements the actual algorithms:
//! - reachability analysis, i.e. finding and removing unreachable and dead states,
//! - elimination of epsilon transitions based on epsilon closures,
//! - merging of equivalent states until a fixpoint is reached,
//! - the subset construction, which produces a [`Dfa`] whose states are sets of NFA states,
//!   and a bounded enumeration of the full powerset for inspection.
//!
//! With the `render` feature (enabled by default), automata can be exported as a plain text
//! transition table, as LaTeX (a `tabular` transition table or a TikZ picture), and in the
//! DOT format of graphviz. The `random` feature adds generators for random automata.
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use nfakit::prelude::*;` should be enough to use the package.
pub mod prelude {
    #[cfg(feature = "render")]
    pub use super::render::{DotStateAttribute, DotTransitionAttribute, Dottable};
    pub use super::{
        alphabet::{Alphabet, Symbol, EPSILON},
        automaton::{Dfa, Nfa, NfaBuilder, State, StateId, TransitionTable, Validation},
        error::AutomatonError,
        math,
        operations::{StateSet, MAX_POWERSET_STATES},
        Show,
    };
}

/// This module contains the collection types that are used throughout the crate.
pub mod math;

/// Symbols and alphabets.
pub mod alphabet;

mod error;
pub use error::AutomatonError;

/// States, the [`Nfa`] container, its builder and the [`Dfa`] produced by the subset
/// construction.
pub mod automaton;
pub use automaton::{Dfa, Nfa, NfaBuilder, State, StateId, Validation};

pub mod operations;

/// Text exports of automata. This is feature gated behind the `render` feature.
#[cfg(feature = "render")]
pub mod render;

/// Implements the generation of random automata.
#[cfg(feature = "random")]
pub mod random;

/// Helper trait which can be used to display states, symbols, words and such.
pub trait Show {
    /// Returns a human readable representation of `self`. This is mainly used for logging
    /// and debugging purposes.
    fn show(&self) -> String;

    /// Show a collection of the thing, by default this is `{x, y, z}`.
    fn show_collection<'a, I>(iter: I) -> String
    where
        Self: 'a,
        I: IntoIterator<Item = &'a Self>,
    {
        format!(
            "{{{}}}",
            itertools::Itertools::join(&mut iter.into_iter().map(|x| x.show()), ", ")
        )
    }
}

impl<S: Show> Show for Vec<S> {
    fn show(&self) -> String {
        S::show_collection(self.iter())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use itertools::Itertools;

    use crate::{math::OrderedSet, prelude::*};

    /// `q0 -a-> q1 -b-> q2 -c-> q3` where `q0` is initial and `q1` is accepting.
    pub fn chain_nfa() -> Nfa {
        Nfa::builder()
            .with_states([
                State::new("q0").initial(),
                State::new("q1").accepting(),
                State::new("q2"),
                State::new("q3"),
            ])
            .with_transitions([("q0", 'a', "q1"), ("q1", 'b', "q2"), ("q2", 'c', "q3")])
            .build()
            .unwrap()
    }

    /// The textbook Thompson automaton for `(a|b)*abb`.
    pub fn epsilon_nfa() -> Nfa {
        Nfa::builder()
            .with_states((0..=10).map(|i| {
                let state = State::new(i.to_string());
                match i {
                    0 => state.initial(),
                    10 => state.accepting(),
                    _ => state,
                }
            }))
            .with_transitions([
                ("0", EPSILON, "1"),
                ("0", EPSILON, "7"),
                ("1", EPSILON, "2"),
                ("1", EPSILON, "4"),
                ("2", "a", "3"),
                ("4", "b", "5"),
                ("3", EPSILON, "6"),
                ("5", EPSILON, "6"),
                ("6", EPSILON, "1"),
                ("6", EPSILON, "7"),
                ("7", "a", "8"),
                ("8", "b", "9"),
                ("9", "b", "10"),
            ])
            .build()
            .unwrap()
    }

    /// Looks up the ids of the given state names.
    pub fn ids<const N: usize>(nfa: &Nfa, names: [&str; N]) -> OrderedSet<StateId> {
        names
            .into_iter()
            .map(|name| nfa.id_of(name).unwrap())
            .collect()
    }

    /// All words over `symbols` of length at most `max_len`.
    pub fn words_up_to(symbols: &[char], max_len: usize) -> Vec<Vec<char>> {
        (0..=max_len)
            .flat_map(|len| {
                (0..len)
                    .map(|_| symbols.iter().copied())
                    .multi_cartesian_product()
                    .collect_vec()
            })
            .chain(std::iter::once(vec![]))
            .unique()
            .collect()
    }

    #[test]
    fn fixtures() {
        assert_eq!(chain_nfa().size(), 4);
        assert!(epsilon_nfa().accepts("abb".chars()));
        assert!(epsilon_nfa().accepts("babb".chars()));
        assert!(!epsilon_nfa().accepts("ab".chars()));
        assert_eq!(words_up_to(&['a', 'b'], 2).len(), 7);
    }
}

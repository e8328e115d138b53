use itertools::Itertools;
use tracing::trace;

use crate::prelude::*;

/// Returns an alphabet made up of the first `symbols` lowercase letters, `symbols` is
/// capped at 26.
pub fn letters(symbols: usize) -> Alphabet {
    ('a'..='z').take(symbols).collect()
}

/// Generates a random [`Nfa`] with `size` states named `q0`, `q1` and so on over an alphabet of
/// `symbols` letters (see [`letters`]). The algorithm is as follows:
/// 1. Create all states, `q0` is the start state and every state is accepting with
///    probability one half.
/// 2. For each state, each symbol and each potential target, insert the edge with probability
///    `density`.
/// 3. For each pair of distinct states, insert an epsilon edge with probability `epsilon`.
///
/// As acceptance is drawn randomly, the automaton may lack accepting states, it is therefore
/// constructed with [`Validation::Lenient`]. There may also be unreachable states.
pub fn generate_random_nfa(symbols: usize, size: usize, density: f64, epsilon: f64) -> Nfa {
    let alphabet = letters(symbols);
    let mut nfa = Nfa::with_alphabet(alphabet.clone(), Validation::Lenient);

    let states = (0..size)
        .map(|i| {
            let mut state = State::new(format!("q{i}"));
            if i == 0 {
                state = state.initial();
            }
            if fastrand::bool() {
                state = state.accepting();
            }
            nfa.push_state(state)
        })
        .collect_vec();

    for &source in &states {
        for symbol in &alphabet {
            for &target in &states {
                if fastrand::f64() < density {
                    nfa.add_transition(source, symbol, target);
                }
            }
        }
        for &target in &states {
            if source != target && fastrand::f64() < epsilon {
                nfa.add_transition(source, Symbol::epsilon(), target);
            }
        }
    }

    trace!("generated random automaton\n{nfa:?}");
    nfa
}

/// Generate a random word over the letters of `alphabet`, epsilon is never used. The length of
/// the word is drawn uniformly from the range `min_len..=max_len`, if `max_len` is smaller
/// than `min_len` the word has length `min_len`. Over an empty alphabet, the empty word is
/// returned.
pub fn generate_random_word(alphabet: &Alphabet, min_len: usize, max_len: usize) -> Vec<Symbol> {
    let charset = alphabet.letters().collect_vec();
    if charset.is_empty() {
        return vec![];
    }

    let length = fastrand::usize(min_len..=max_len.max(min_len));
    (0..length)
        .map(|_| charset[fastrand::usize(..charset.len())].clone())
        .collect()
}

/// Generate `number` random words over the letters of `alphabet`, see [`generate_random_word`].
/// The words need not be distinct.
pub fn generate_random_words(
    alphabet: &Alphabet,
    min_len: usize,
    max_len: usize,
    number: usize,
) -> Vec<Vec<Symbol>> {
    (0..number)
        .map(|_| generate_random_word(alphabet, min_len, max_len))
        .collect()
}

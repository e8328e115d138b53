use std::fmt::{Debug, Display};

use itertools::Itertools;

use crate::{math::OrderedSet, Show};

/// The textual form of the empty input.
pub const EPSILON: &str = "ε";

/// A single input token. Symbols are arbitrary strings, the distinguished symbol
/// [`EPSILON`] stands for the empty input and labels edges that are taken without
/// consuming anything.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a symbol from its textual form.
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self(text.into())
    }

    /// Returns the epsilon symbol.
    pub fn epsilon() -> Self {
        Self(EPSILON.to_string())
    }

    /// Returns true if `self` is the epsilon symbol.
    pub fn is_epsilon(&self) -> bool {
        self.0 == EPSILON
    }

    /// Returns the textual form of the symbol.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Symbol {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<char> for Symbol {
    fn from(value: char) -> Self {
        Self(value.to_string())
    }
}

impl From<&Symbol> for Symbol {
    fn from(value: &Symbol) -> Self {
        value.clone()
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}'", self.0)
    }
}

impl Show for Symbol {
    fn show(&self) -> String {
        self.0.clone()
    }

    fn show_collection<'a, I>(iter: I) -> String
    where
        Self: 'a,
        I: IntoIterator<Item = &'a Self>,
    {
        let word = iter.into_iter().map(|sym| sym.as_str()).join("");
        if word.is_empty() {
            EPSILON.to_string()
        } else {
            word
        }
    }
}

/// An ordered collection of [`Symbol`]s. While epsilon edges are admitted the alphabet
/// also contains [`EPSILON`], it is dropped once they are eliminated.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Alphabet(OrderedSet<Symbol>);

impl Alphabet {
    /// Creates an empty alphabet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `symbol` belongs to the alphabet.
    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.0.contains(symbol)
    }

    /// Adds `symbol`, returns false if it was already present.
    pub fn insert<S: Into<Symbol>>(&mut self, symbol: S) -> bool {
        self.0.insert(symbol.into())
    }

    /// Removes `symbol`, returns whether it was present.
    pub fn remove(&mut self, symbol: &Symbol) -> bool {
        self.0.remove(symbol)
    }

    /// Iterates over all symbols, including epsilon if present.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> + '_ {
        self.0.iter()
    }

    /// Iterates over the symbols that consume input, i.e. everything except epsilon.
    pub fn letters(&self) -> impl Iterator<Item = &Symbol> + '_ {
        self.0.iter().filter(|sym| !sym.is_epsilon())
    }

    /// Returns true if epsilon is part of the alphabet.
    pub fn has_epsilon(&self) -> bool {
        self.0.contains(&Symbol::epsilon())
    }

    /// The order in which symbols are laid out as columns: letters first, epsilon last.
    pub fn column_order(&self) -> Vec<Symbol> {
        let mut columns = self.letters().cloned().collect_vec();
        if self.has_epsilon() {
            columns.push(Symbol::epsilon());
        }
        columns
    }

    /// The number of symbols, epsilon included.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no symbols at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<Symbol>> FromIterator<S> for Alphabet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<Symbol>> Extend<S> for Alphabet {
    fn extend<T: IntoIterator<Item = S>>(&mut self, iter: T) {
        self.0.extend(iter.into_iter().map(Into::into))
    }
}

impl<'a> IntoIterator for &'a Alphabet {
    type Item = &'a Symbol;
    type IntoIter = std::collections::btree_set::Iter<'a, Symbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Debug for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.0.iter().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epsilon_is_laid_out_last() {
        let alphabet: Alphabet = [EPSILON, "b", "a"].into_iter().collect();
        assert!(alphabet.has_epsilon());
        assert_eq!(alphabet.letters().count(), 2);
        assert_eq!(
            alphabet.column_order(),
            vec![Symbol::from('a'), Symbol::from('b'), Symbol::epsilon()]
        );
    }

    #[test]
    fn words_are_shown_concatenated() {
        let word = vec![Symbol::from("ab"), Symbol::from('c')];
        assert_eq!(word.show(), "abc");
        assert_eq!(Vec::<Symbol>::new().show(), EPSILON);
    }
}

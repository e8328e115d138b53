//! The algorithms that operate on an [`crate::Nfa`]. Each submodule adds methods to the
//! automaton itself, this module only collects them.

mod reachable;

mod epsilon;

mod quotient;

mod subset;
pub use subset::{StateSet, MAX_POWERSET_STATES};

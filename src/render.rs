//! Every export only looks at the start state, the accepting states, the alphabet and the
//! transitions of an automaton.

mod table;

mod latex;

mod dot;
pub use dot::{DotStateAttribute, DotTransitionAttribute, Dottable};

mod state;
pub use state::{State, StateId};

mod nfa;
pub use nfa::{Nfa, TransitionTable, Validation};

mod builder;
pub use builder::NfaBuilder;

mod dfa;
pub use dfa::Dfa;

use crate::Show;

/// Stable handle of a state inside an [`crate::Nfa`]. Handles are never reused, so they
/// stay valid (or become dangling) when other states are removed.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct StateId(usize);

impl StateId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// The raw index of the state in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl Show for StateId {
    fn show(&self) -> String {
        format!("#{}", self.0)
    }
}

/// A vertex of an automaton: its name, whether it is the start state and/or accepting, and
/// optionally the position it was placed at by an editor. A state does not know its
/// transitions, those are stored by the automaton that owns it.
///
/// ```
/// use nfakit::prelude::*;
///
/// let q = State::new("q0").initial().at(120.0, 45.0);
/// assert!(q.is_start() && !q.is_accept());
/// assert_eq!(q.position(), Some((120.0, 45.0)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct State {
    name: String,
    start: bool,
    accept: bool,
    position: Option<(f64, f64)>,
}

impl State {
    /// Creates a state that is neither initial nor accepting.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            start: false,
            accept: false,
            position: None,
        }
    }

    /// Marks the state as start state.
    pub fn initial(mut self) -> Self {
        self.start = true;
        self
    }

    /// Marks the state as accepting.
    pub fn accepting(mut self) -> Self {
        self.accept = true;
        self
    }

    /// Records the position of the state on the editor canvas.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Some((x, y));
        self
    }

    /// The name of the state.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the state is flagged as start state.
    pub fn is_start(&self) -> bool {
        self.start
    }

    /// Whether the state is flagged as accepting.
    pub fn is_accept(&self) -> bool {
        self.accept
    }

    /// The canvas position, if the editor supplied one.
    pub fn position(&self) -> Option<(f64, f64)> {
        self.position
    }

    pub(crate) fn set_start(&mut self, start: bool) {
        self.start = start;
    }

    pub(crate) fn set_accept(&mut self, accept: bool) {
        self.accept = accept;
    }
}

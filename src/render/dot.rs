use std::fmt::Display;

use itertools::Itertools;

use crate::prelude::*;

/// Name of the invisible node from which the arrow into the start state is drawn.
const ENTRY_NODE: &str = "qi";

/// Editor coordinates are divided by this to obtain graphviz positions.
const DOT_POSITION_SCALE: f64 = 100.0;

fn quote_dot_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Implemented by automata that can be exported in the DOT format of graphviz.
pub trait Dottable {
    /// The type through which states are addressed.
    type StateIndex: Copy;

    /// Compute the graphviz representation, for more information on the DOT format,
    /// see the [graphviz documentation](https://graphviz.org/doc/info/lang.html).
    fn dot_representation(&self) -> String {
        let header = std::iter::once(format!(
            "digraph {} {{",
            self.dot_name().unwrap_or("A".to_string())
        ))
        .chain(self.dot_header_statements());

        let states = self.dot_states().into_iter().map(|q| {
            format!(
                "{} [{}]",
                quote_dot_ident(&self.dot_state_ident(q)),
                self.dot_state_attributes(q)
                    .into_iter()
                    .map(|attr| attr.to_string())
                    .join(", ")
            )
        });

        let entry = self.dot_start().into_iter().map(|q| {
            format!(
                "{ENTRY_NODE} -> {}",
                quote_dot_ident(&self.dot_state_ident(q))
            )
        });

        let transitions = self.dot_edges().into_iter().map(|(source, symbol, target)| {
            format!(
                "{} -> {} [{}]",
                quote_dot_ident(&self.dot_state_ident(source)),
                quote_dot_ident(&self.dot_state_ident(target)),
                self.dot_transition_attributes(&symbol)
                    .into_iter()
                    .map(|attr| attr.to_string())
                    .join(", ")
            )
        });

        header
            .chain(states)
            .chain(entry)
            .chain(transitions)
            .chain(std::iter::once("}".to_string()))
            .join("\n")
    }

    /// Statements that are emitted right after the opening of the graph.
    fn dot_header_statements(&self) -> Vec<String> {
        vec![
            "rankdir=LR".to_string(),
            format!("{ENTRY_NODE} [shape=point, label=\"\"]"),
        ]
    }

    /// The name of the graph.
    fn dot_name(&self) -> Option<String>;

    /// All states in the order in which they are emitted.
    fn dot_states(&self) -> Vec<Self::StateIndex>;

    /// The state that the entry arrow points to, if any.
    fn dot_start(&self) -> Option<Self::StateIndex>;

    /// All edges as `(source, symbol, target)` triples.
    fn dot_edges(&self) -> Vec<(Self::StateIndex, Symbol, Self::StateIndex)>;

    /// The identifier of a state, it is quoted when written.
    fn dot_state_ident(&self, idx: Self::StateIndex) -> String;

    /// Attributes of a state, by default nothing is set.
    fn dot_state_attributes(&self, _idx: Self::StateIndex) -> Vec<DotStateAttribute> {
        vec![]
    }

    /// Attributes of an edge, by default it is labelled with its symbol.
    fn dot_transition_attributes(&self, symbol: &Symbol) -> Vec<DotTransitionAttribute> {
        vec![DotTransitionAttribute::Label(symbol.to_string())]
    }
}

fn shape(accepting: bool) -> DotStateAttribute {
    DotStateAttribute::Shape(if accepting { "doublecircle" } else { "circle" }.into())
}

impl Dottable for Nfa {
    type StateIndex = StateId;

    fn dot_name(&self) -> Option<String> {
        Some("NFA".into())
    }

    fn dot_states(&self) -> Vec<StateId> {
        self.state_ids().collect()
    }

    fn dot_start(&self) -> Option<StateId> {
        self.start_state()
    }

    fn dot_edges(&self) -> Vec<(StateId, Symbol, StateId)> {
        self.edges()
            .map(|(source, symbol, target)| (source, symbol.clone(), target))
            .collect()
    }

    fn dot_state_ident(&self, idx: StateId) -> String {
        self.name_of(idx).unwrap_or_default().to_string()
    }

    fn dot_state_attributes(&self, idx: StateId) -> Vec<DotStateAttribute> {
        let Some(state) = self.state(idx) else {
            return vec![];
        };
        std::iter::once(shape(state.is_accept()))
            .chain(state.position().map(|(x, y)| {
                DotStateAttribute::Position(x / DOT_POSITION_SCALE, y / DOT_POSITION_SCALE)
            }))
            .collect()
    }
}

impl Dottable for Dfa {
    type StateIndex = usize;

    fn dot_name(&self) -> Option<String> {
        Some("DFA".into())
    }

    fn dot_states(&self) -> Vec<usize> {
        self.state_indices().collect()
    }

    fn dot_start(&self) -> Option<usize> {
        (self.size() > 0).then_some(self.start())
    }

    fn dot_edges(&self) -> Vec<(usize, Symbol, usize)> {
        self.state_indices()
            .flat_map(|q| {
                self.transitions_from(q)
                    .into_iter()
                    .flatten()
                    .map(move |(symbol, &p)| (q, symbol.clone(), p))
            })
            .collect()
    }

    /// Composite labels need not be unique, so nodes are identified by index.
    fn dot_state_ident(&self, idx: usize) -> String {
        format!("d{idx}")
    }

    fn dot_state_attributes(&self, idx: usize) -> Vec<DotStateAttribute> {
        let sink = self.composite(idx).is_some_and(StateSet::is_empty);
        [
            shape(self.is_accepting(idx)),
            DotStateAttribute::Label(self.label(idx).unwrap_or_default().to_string()),
        ]
        .into_iter()
        .chain(sink.then(|| DotStateAttribute::Color("gray".into())))
        .collect()
    }
}

/// Enum that abstracts attributes in the DOT format.
#[derive(Debug, Clone, PartialEq)]
pub enum DotStateAttribute {
    /// The label of a node
    Label(String),
    /// The shape of a node
    Shape(String),
    /// The color of a node
    Color(String),
    /// A fixed position of the node, honored by the `neato` and `fdp` layouts
    Position(f64, f64),
}

impl Display for DotStateAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DotStateAttribute::Label(s) => write!(f, "label=\"{}\"", s.replace('"', "\\\"")),
            DotStateAttribute::Shape(s) => write!(f, "shape=\"{s}\""),
            DotStateAttribute::Color(c) => write!(f, "color=\"{c}\""),
            DotStateAttribute::Position(x, y) => write!(f, "pos=\"{x},{y}!\""),
        }
    }
}

/// Attributes of an edge in the DOT format.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DotTransitionAttribute {
    /// The label of an edge
    Label(String),
}

impl Display for DotTransitionAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DotTransitionAttribute::Label(lbl) => write!(f, "label=\"{lbl}\""),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        prelude::*,
        tests::{chain_nfa, epsilon_nfa},
    };

    #[test]
    fn nfa_to_dot() {
        let dot = chain_nfa().dot_representation();
        let lines = dot.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "digraph NFA {");
        assert_eq!(lines[1], "rankdir=LR");
        assert_eq!(lines[2], "qi [shape=point, label=\"\"]");
        assert_eq!(lines[3], "\"q0\" [shape=\"circle\"]");
        assert_eq!(lines[4], "\"q1\" [shape=\"doublecircle\"]");
        assert_eq!(lines[7], "qi -> \"q0\"");
        assert_eq!(lines[8], "\"q0\" -> \"q1\" [label=\"a\"]");
        assert_eq!(lines.last(), Some(&"}"));
    }

    #[test]
    fn positions_and_epsilon_edges() {
        let nfa = Nfa::builder()
            .with_states([
                State::new("p").initial().at(150.0, 50.0),
                State::new("q").accepting(),
            ])
            .with_transition("p", EPSILON, "q")
            .build()
            .unwrap();
        let dot = nfa.dot_representation();
        assert!(dot.contains("\"p\" [shape=\"circle\", pos=\"1.5,0.5!\"]"));
        assert!(dot.contains("\"q\" [shape=\"doublecircle\"]"));
        assert!(dot.contains("\"p\" -> \"q\" [label=\"ε\"]"));
    }

    #[test]
    fn dfa_to_dot() {
        let dfa = epsilon_nfa().subset_construction().unwrap();
        let dot = dfa.dot_representation();
        assert!(dot.starts_with("digraph DFA {"));
        assert_eq!(
            dot.lines().filter(|line| line.contains("label=")).count(),
            3 * dfa.size() + 1
        );
        assert!(dot.contains("qi -> \"d0\""));
        assert!(dot.contains("\"d0\" [shape=\"circle\", label=\"{0, 1, 2, 4, 7}\"]"));

        let sink = chain_nfa().subset_construction().unwrap().dot_representation();
        assert!(sink.contains("\"d2\" [shape=\"circle\", label=\"Ø\", color=\"gray\"]"));
    }

    #[test]
    fn composites_with_equal_labels_stay_apart() {
        let nfa = Nfa::builder()
            .with_states([
                State::new("s").initial(),
                State::new("a"),
                State::new("b").accepting(),
                State::new("a, b"),
            ])
            .with_transitions([("s", 'x', "a"), ("s", 'x', "b"), ("s", 'y', "a, b")])
            .build()
            .unwrap();
        let dfa = nfa.subset_construction().unwrap();
        let dot = dfa.dot_representation();
        let shared = dot
            .lines()
            .filter(|line| line.contains("label=\"{a, b}\""))
            .collect::<Vec<_>>();
        assert_eq!(shared.len(), 2);
        assert_ne!(shared[0].split(' ').next(), shared[1].split(' ').next());
    }

    #[test]
    fn identifiers_are_escaped() {
        let nfa = Nfa::builder()
            .with_states([State::new("say \"hi\"").initial().accepting()])
            .build()
            .unwrap();
        assert!(nfa
            .dot_representation()
            .contains(r#""say \"hi\"" [shape="doublecircle"]"#));
    }
}

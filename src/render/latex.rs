use itertools::Itertools;

use crate::{
    math::{OrderedMap, OrderedSet},
    prelude::*,
};

/// Editor coordinates are divided by this to obtain TikZ coordinates.
const TIKZ_SCALE: f64 = 30.0;

const LATEX_EPSILON: &str = r"$\varepsilon$";

fn latex_symbol(symbol: &Symbol) -> String {
    if symbol.is_epsilon() {
        LATEX_EPSILON.to_string()
    } else {
        symbol.to_string()
    }
}

fn coordinate(value: f64) -> String {
    // avoid printing -0
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

impl Nfa {
    /// Produces a LaTeX `tabular` holding the transition table. There is one column per
    /// symbol and a final column for epsilon, which is present even if the automaton has no
    /// epsilon edges. Cells list the names of the successors.
    pub fn transition_table_latex(&self) -> String {
        let letters = self.alphabet().letters().collect_vec();
        let epsilon = Symbol::epsilon();

        let mut latex = format!(
            "\\begin{{tabular}}{{|c|{}|}}\\hline\n",
            "|c".repeat(letters.len() + 1)
        );
        latex.push_str(&format!(
            " & {} & {LATEX_EPSILON}\\\\\\hline\n",
            letters.iter().join(" & ")
        ));
        for (id, state) in self.states() {
            let row = std::iter::once(state.name().to_string())
                .chain(
                    letters
                        .iter()
                        .copied()
                        .chain([&epsilon])
                        .map(|symbol| self.names(self.successors(id, symbol)).join(", ")),
                )
                .join(" & ");
            latex.push_str(&format!("{row}\\\\\\hline\n"));
        }
        latex.push_str("\\end{tabular}\n");
        latex
    }

    /// Produces a `tikzpicture` that draws the automaton with the `automata` TikZ library.
    ///
    /// The start state is placed first and styled `initial`, accepting states are styled
    /// `accepting`. States that carry a position are placed there, scaled down to TikZ
    /// units with the y axis flipped, all others are laid out on a horizontal line. All
    /// edges between the same two states are drawn as one with a comma separated label,
    /// self loops are drawn above the state and edges in both directions are bent.
    pub fn tikz_representation(&self) -> String {
        let order = self
            .states()
            .sorted_by_key(|(_, state)| !state.is_start())
            .map(|(id, _)| id)
            .collect_vec();
        let node = |id: StateId| order.iter().position(|&q| q == id).unwrap_or_default();

        let mut latex =
            "\\begin{tikzpicture}[shorten >=1pt,node distance=2cm,on grid,auto]\n".to_string();

        for (index, &id) in order.iter().enumerate() {
            let Some(state) = self.state(id) else {
                continue;
            };
            let style = std::iter::once("state")
                .chain(state.is_start().then_some("initial"))
                .chain(state.is_accept().then_some("accepting"))
                .join(",");
            let (x, y) = match state.position() {
                Some((x, y)) => (x / TIKZ_SCALE, -y / TIKZ_SCALE),
                None => (2.0 * index as f64, 0.0),
            };
            latex.push_str(&format!(
                "   \\node[{style}] (q_{index}) at ({}, {}) {{{}}};\n",
                coordinate(x),
                coordinate(y),
                state.name()
            ));
        }

        let merged: OrderedMap<(usize, usize), OrderedSet<&Symbol>> =
            self.edges()
                .fold(OrderedMap::new(), |mut merged, (source, symbol, target)| {
                    merged
                        .entry((node(source), node(target)))
                        .or_insert_with(OrderedSet::new)
                        .insert(symbol);
                    merged
                });

        latex.push_str("   \\path[->]\n");
        for (&(from, to), symbols) in &merged {
            let bend = if from == to {
                "loop above"
            } else if merged.contains_key(&(to, from)) {
                "bend left"
            } else {
                ""
            };
            latex.push_str(&format!(
                "   (q_{from}) edge [{bend}] node {{{}}} (q_{to})\n",
                symbols.iter().map(|&symbol| latex_symbol(symbol)).join(",")
            ));
        }
        latex.push_str(";\n\\end{tikzpicture}\n");
        latex
    }
}

#[cfg(test)]
mod tests {
    use crate::{prelude::*, tests::chain_nfa};

    #[test]
    fn latex_table() {
        let latex = chain_nfa().transition_table_latex();
        let lines = latex.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], r"\begin{tabular}{|c||c|c|c|c|}\hline");
        assert_eq!(lines[1], r" & a & b & c & $\varepsilon$\\\hline");
        assert_eq!(lines[2], r"q0 & q1 &  &  & \\\hline");
        assert_eq!(lines[5], r"q3 &  &  &  & \\\hline");
        assert_eq!(lines[6], r"\end{tabular}");
    }

    #[test]
    fn tikz_picture() {
        let nfa = Nfa::builder()
            .with_states([
                State::new("p").accepting().at(60.0, 30.0),
                State::new("q").initial().at(0.0, 0.0),
            ])
            .with_transitions([
                ("q", "a", "p"),
                ("q", EPSILON, "p"),
                ("p", "b", "q"),
                ("p", "b", "p"),
            ])
            .build()
            .unwrap();
        let tikz = nfa.tikz_representation();

        assert!(tikz.starts_with("\\begin{tikzpicture}"));
        assert!(tikz.contains(r"\node[state,initial] (q_0) at (0, 0) {q};"));
        assert!(tikz.contains(r"\node[state,accepting] (q_1) at (2, -1) {p};"));
        assert!(tikz.contains(r"(q_0) edge [bend left] node {a,$\varepsilon$} (q_1)"));
        assert!(tikz.contains(r"(q_1) edge [bend left] node {b} (q_0)"));
        assert!(tikz.contains(r"(q_1) edge [loop above] node {b} (q_1)"));
        assert!(tikz.ends_with(";\n\\end{tikzpicture}\n"));
    }

    #[test]
    fn tikz_line_layout() {
        let tikz = chain_nfa().tikz_representation();
        assert!(tikz.contains(r"(q_3) at (6, 0) {q3}"));
        assert!(tikz.contains(r"(q_2) edge [] node {c} (q_3)"));
    }
}

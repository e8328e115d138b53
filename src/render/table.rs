use itertools::Itertools;
use owo_colors::OwoColorize;

use crate::prelude::*;

fn build_table<H, R>(header: H, rows: R) -> String
where
    H: IntoIterator<Item = String>,
    R: IntoIterator<Item = Vec<String>>,
{
    let mut builder = tabled::builder::Builder::default();
    builder.push_record(std::iter::once("State".to_string()).chain(header));
    for row in rows {
        builder.push_record(row);
    }
    builder
        .build()
        .with(tabled::settings::Style::rounded())
        .to_string()
}

fn flags(start: bool, accept: bool) -> String {
    format!(
        "{}{}",
        if start { "→" } else { " " },
        if accept { "*" } else { " " }
    )
}

impl Nfa {
    /// Returns a text table with one row per state and one column per symbol, epsilon comes
    /// last. The start state is marked with `→`, accepting states with `*`, an empty cell
    /// is shown as `-`.
    pub fn transition_table(&self) -> String {
        self.build_transition_table(|state| state.name().to_string())
    }

    /// Works like [`Nfa::transition_table`], but highlights the names of accepting states
    /// for display on a terminal.
    pub fn transition_table_colored(&self) -> String {
        self.build_transition_table(|state| {
            if state.is_accept() {
                state.name().green().bold().to_string()
            } else {
                state.name().to_string()
            }
        })
    }

    fn build_transition_table<SD>(&self, state_decorator: SD) -> String
    where
        SD: Fn(&State) -> String,
    {
        let columns = self.alphabet().column_order();
        let rows = self.states().map(|(id, state)| {
            std::iter::once(format!(
                "{}{}",
                flags(state.is_start(), state.is_accept()),
                state_decorator(state)
            ))
            .chain(columns.iter().map(|symbol| {
                let targets = self.names(self.successors(id, symbol));
                if targets.is_empty() {
                    "-".to_string()
                } else {
                    targets.join(", ")
                }
            }))
            .collect_vec()
        });
        build_table(columns.iter().map(|symbol| symbol.to_string()), rows)
    }
}

impl Dfa {
    /// Returns a text table of the deterministic transitions, states are shown with their
    /// composite labels.
    pub fn transition_table(&self) -> String {
        let columns = self.alphabet().letters().cloned().collect_vec();
        let rows = self.state_indices().map(|q| {
            std::iter::once(format!(
                "{}{}",
                flags(q == self.start(), self.is_accepting(q)),
                self.label(q).unwrap_or_default()
            ))
            .chain(columns.iter().map(|symbol| {
                self.successor(q, symbol)
                    .and_then(|p| self.label(p))
                    .unwrap_or("-")
                    .to_string()
            }))
            .collect_vec()
        });
        build_table(columns.iter().map(|symbol| symbol.to_string()), rows)
    }
}

#[cfg(test)]
mod tests {
    use crate::tests::{chain_nfa, epsilon_nfa};

    #[test]
    fn nfa_table() {
        let table = chain_nfa().transition_table();
        let lines = table.lines().collect::<Vec<_>>();
        // top border, header, separator and one line per state
        assert_eq!(lines.len(), 3 + 4 + 1);
        assert!(lines[1].contains("State"));
        assert!(!lines[1].contains('ε'));
        assert!(lines[3].contains("→ q0"));
        assert!(lines[4].contains(" *q1"));
        assert!(lines[4].contains("q2"));
        assert!(lines[6].contains('-'));
    }

    #[test]
    fn epsilon_column_comes_last() {
        let table = epsilon_nfa().transition_table();
        let header = table.lines().nth(1).unwrap();
        let positions = [" State ", " a ", " b ", " ε "].map(|col| header.find(col).unwrap());
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(table.contains("1, 7"));
    }

    #[test]
    fn colored_table_keeps_structure() {
        let nfa = chain_nfa();
        assert_eq!(
            nfa.transition_table_colored().lines().count(),
            nfa.transition_table().lines().count()
        );
    }

    #[test]
    fn dfa_table() {
        let dfa = chain_nfa().subset_construction().unwrap();
        let table = dfa.transition_table();
        assert!(table.contains("→ {q0}"));
        assert!(table.contains(" *{q1}"));
        assert!(table.contains('Ø'));
        assert!(!table.contains(" - "), "subset construction yields a complete automaton");
    }
}

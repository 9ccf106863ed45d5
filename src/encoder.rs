//! This module provides encoding functionality for writing automata back into the
//! definition text format read by the parser.

use crate::automaton::{Automaton, DeterministicAutomaton};
use crate::types::{StateId, Symbol};
use std::collections::BTreeSet;

/// Encodes an automaton into definition text.
///
/// Format, one record per line:
/// - alphabet symbols
/// - states
/// - final states
/// - initial state
/// - one `source symbol destination` line per transition
///
/// Every set is written in sorted order, so encoding is deterministic. The epsilon symbol
/// itself is not recorded; it must be supplied again when the text is parsed.
pub fn encode(automaton: &Automaton) -> String {
    let transitions = automaton
        .transitions()
        .iter()
        .flat_map(|(source, symbol, destinations)| {
            destinations
                .iter()
                .map(move |destination| (source, symbol, destination))
        });

    render(
        automaton.alphabet(),
        automaton.states(),
        automaton.final_states(),
        automaton.initial_state(),
        transitions,
    )
}

/// Encodes a deterministic automaton into definition text.
///
/// Composite state identities are legal state names, so the output of a conversion can be
/// parsed again.
pub fn encode_deterministic(automaton: &DeterministicAutomaton) -> String {
    render(
        automaton.alphabet(),
        automaton.states(),
        automaton.final_states(),
        automaton.initial_state(),
        automaton.transitions().iter(),
    )
}

fn render<'a, I>(
    alphabet: &BTreeSet<Symbol>,
    states: &BTreeSet<StateId>,
    final_states: &BTreeSet<StateId>,
    initial_state: &str,
    transitions: I,
) -> String
where
    I: Iterator<Item = (&'a StateId, Symbol, &'a StateId)>,
{
    let mut lines = vec![
        alphabet
            .iter()
            .map(Symbol::to_string)
            .collect::<Vec<_>>()
            .join(" "),
        join_states(states),
        join_states(final_states),
        initial_state.to_string(),
    ];

    lines.extend(
        transitions.map(|(source, symbol, destination)| {
            format!("{source} {symbol} {destination}")
        }),
    );

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn join_states(states: &BTreeSet<StateId>) -> String {
    states
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

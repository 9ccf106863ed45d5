//! Subset construction: converts a non-deterministic automaton (with or without
//! epsilon-transitions) into an equivalent deterministic one.

use crate::automaton::{Automaton, DeterministicAutomaton, DeterministicTransitions};
use crate::closure::EpsilonClosure;
use crate::types::{composite_id, StateId, Symbol};
use log::{debug, trace};
use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

/// Converts an automaton into a deterministic one using the powerset construction.
///
/// Each state of the result is a composite state: the canonical identity of a set of
/// source states. Composite states are discovered breadth-first from the epsilon-closure of
/// the initial state; a `(state, symbol)` pair whose move is empty gets no transition.
pub fn convert_to_dfa(automaton: &Automaton, closures: &EpsilonClosure) -> DeterministicAutomaton {
    let symbols: Vec<_> = automaton.input_symbols().collect();

    let source_initial = automaton.initial_state().to_string();
    let initial_set = closures.close([&source_initial]);
    let initial_state = composite_id(&initial_set);

    let mut seen: HashSet<StateId> = HashSet::from([initial_state.clone()]);
    let mut worklist: VecDeque<(StateId, BTreeSet<StateId>)> =
        VecDeque::from([(initial_state.clone(), initial_set)]);

    let mut states = BTreeSet::new();
    let mut final_states = BTreeSet::new();
    let mut transitions = DeterministicTransitions::default();
    let mut members = BTreeMap::new();

    while let Some((current, current_set)) = worklist.pop_front() {
        trace!("Processing composite state {current}");

        for &symbol in &symbols {
            let moved = move_on_symbol(automaton, &current_set, symbol);

            if moved.is_empty() {
                continue;
            }

            let next_set = closures.close(&moved);
            let next = composite_id(&next_set);

            if seen.insert(next.clone()) {
                trace!("Discovered composite state {next}");
                worklist.push_back((next.clone(), next_set));
            }

            transitions.insert(current.clone(), symbol, next);
        }

        if !current_set.is_disjoint(automaton.final_states()) {
            final_states.insert(current.clone());
        }

        states.insert(current.clone());
        members.insert(current, current_set);
    }

    debug!(
        "Subset construction produced {} states and {} transitions",
        states.len(),
        transitions.len()
    );

    DeterministicAutomaton {
        alphabet: symbols.into_iter().collect(),
        states,
        final_states,
        initial_state,
        transitions,
        members,
    }
}

/// Returns the deterministic form of an automaton.
///
/// An automaton that is already deterministic keeps its state names and tables; anything
/// else goes through epsilon-closure computation and [`convert_to_dfa`].
pub fn determinize(automaton: &Automaton) -> DeterministicAutomaton {
    if automaton.is_nondeterministic() {
        let closures = automaton.epsilon_closures();
        return convert_to_dfa(automaton, &closures);
    }

    debug!("Automaton is already deterministic, copying tables");

    let mut transitions = DeterministicTransitions::default();
    for (source, symbol, destinations) in automaton.transitions().iter() {
        // A deterministic automaton has at most one destination per pair.
        if let Some(destination) = destinations.first() {
            transitions.insert(source.clone(), symbol, destination.clone());
        }
    }

    DeterministicAutomaton {
        alphabet: automaton.alphabet().clone(),
        states: automaton.states().clone(),
        final_states: automaton.final_states().clone(),
        initial_state: automaton.initial_state().to_string(),
        transitions,
        members: automaton
            .states()
            .iter()
            .map(|state| (state.clone(), BTreeSet::from([state.clone()])))
            .collect(),
    }
}

/// Computes the set of states reachable from any member of `states` on `symbol`.
fn move_on_symbol(
    automaton: &Automaton,
    states: &BTreeSet<StateId>,
    symbol: Symbol,
) -> BTreeSet<StateId> {
    states
        .iter()
        .filter_map(|state| automaton.transitions().get(state, symbol))
        .flatten()
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Definition, TransitionRecord, DEFAULT_EPSILON_SYMBOL};
    use test_log::test;

    fn create_automaton(
        alphabet: &[char],
        states: &[&str],
        final_states: &[&str],
        edges: &[(&str, char, &str)],
    ) -> Automaton {
        Automaton::new(Definition {
            alphabet: alphabet.to_vec(),
            states: states.iter().map(|s| s.to_string()).collect(),
            final_states: final_states.iter().map(|s| s.to_string()).collect(),
            initial_state: states[0].to_string(),
            transitions: edges
                .iter()
                .map(|(source, symbol, destination)| {
                    TransitionRecord::new(source, *symbol, destination)
                })
                .collect(),
            epsilon: DEFAULT_EPSILON_SYMBOL,
        })
        .unwrap()
    }

    fn set(names: &[&str]) -> BTreeSet<StateId> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_epsilon_transition_merges_initial_state() {
        // q0 -&-> q1 -a-> q2
        let nfa = create_automaton(
            &['a', '&'],
            &["q0", "q1", "q2"],
            &["q2"],
            &[("q0", '&', "q1"), ("q1", 'a', "q2")],
        );

        let dfa = convert_to_dfa(&nfa, &nfa.epsilon_closures());

        assert_eq!(dfa.initial_state(), "{q0,q1}");
        assert_eq!(dfa.members("{q0,q1}"), Some(&set(&["q0", "q1"])));
        assert_eq!(
            dfa.transitions().get("{q0,q1}", 'a'),
            Some(&"{q2}".to_string())
        );
        assert!(dfa.is_final("{q2}"));
        assert!(!dfa.is_final("{q0,q1}"));
        assert!(!dfa.alphabet().contains(&'&'));
        assert!(!dfa.is_nondeterministic());
    }

    #[test]
    fn test_multiple_destinations_become_one_state() {
        // 0 -a-> 1, 0 -a-> 2, 1 -b-> 3, 2 -b-> 3
        let nfa = create_automaton(
            &['a', 'b'],
            &["s0", "s1", "s2", "s3"],
            &["s3"],
            &[
                ("s0", 'a', "s1"),
                ("s0", 'a', "s2"),
                ("s1", 'b', "s3"),
                ("s2", 'b', "s3"),
            ],
        );

        let dfa = convert_to_dfa(&nfa, &nfa.epsilon_closures());

        assert_eq!(dfa.states(), &set(&["{s0}", "{s1,s2}", "{s3}"]));
        assert_eq!(dfa.final_states(), &set(&["{s3}"]));
        assert_eq!(dfa.transitions().len(), 2);
    }

    #[test]
    fn test_empty_move_records_no_transition() {
        let nfa = create_automaton(
            &['a', 'b'],
            &["q0", "q1"],
            &["q1"],
            &[("q0", 'a', "q1"), ("q0", 'a', "q0")],
        );

        let dfa = convert_to_dfa(&nfa, &nfa.epsilon_closures());

        assert!(dfa.transitions().get("{q0}", 'b').is_none());
        assert_eq!(
            dfa.transitions().get("{q0}", 'a'),
            Some(&"{q0,q1}".to_string())
        );
    }

    #[test]
    fn test_same_set_is_discovered_once() {
        // Both symbols lead to the same set of source states.
        let nfa = create_automaton(
            &['a', 'b'],
            &["q0", "q1", "q2"],
            &["q2"],
            &[
                ("q0", 'a', "q1"),
                ("q0", 'a', "q2"),
                ("q0", 'b', "q2"),
                ("q0", 'b', "q1"),
            ],
        );

        let dfa = convert_to_dfa(&nfa, &nfa.epsilon_closures());

        assert_eq!(dfa.states().len(), 2);
        assert_eq!(
            dfa.transitions().get("{q0}", 'a'),
            dfa.transitions().get("{q0}", 'b')
        );
    }

    #[test]
    fn test_conversion_is_repeatable() {
        let nfa = create_automaton(
            &['a', 'b', '&'],
            &["q0", "q1", "q2", "q3"],
            &["q3"],
            &[
                ("q0", '&', "q1"),
                ("q0", 'a', "q0"),
                ("q1", 'b', "q2"),
                ("q1", 'b', "q3"),
                ("q2", '&', "q0"),
            ],
        );

        let first = convert_to_dfa(&nfa, &nfa.epsilon_closures());
        let second = convert_to_dfa(&nfa, &nfa.epsilon_closures());

        assert_eq!(first, second);
    }

    #[test]
    fn test_determinize_keeps_deterministic_names() {
        let dfa = create_automaton(
            &['a'],
            &["even", "odd"],
            &["even"],
            &[("even", 'a', "odd"), ("odd", 'a', "even")],
        );

        let result = determinize(&dfa);

        assert_eq!(result.initial_state(), "even");
        assert_eq!(
            result.transitions().get("odd", 'a'),
            Some(&"even".to_string())
        );
        assert_eq!(result.members("odd"), Some(&set(&["odd"])));
    }

    #[test]
    fn test_determinize_converts_nondeterministic() {
        let nfa = create_automaton(
            &['a', '&'],
            &["q0", "q1"],
            &["q1"],
            &[("q0", '&', "q1")],
        );

        let result = determinize(&nfa);

        assert_eq!(result.initial_state(), "{q0,q1}");
        assert!(result.is_final("{q0,q1}"));
    }
}

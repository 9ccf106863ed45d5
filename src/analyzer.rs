//! This module provides functions for analyzing automaton definitions to detect structural
//! errors before an automaton is built. This includes checks for a valid initial state, final
//! states that belong to the state set, and transitions that only reference known states and symbols.

use crate::types::{is_valid_state_id, AutomatonError, Definition, StateId, Symbol};
use std::collections::{BTreeSet, HashSet, VecDeque};

/// Represents the errors that can be found during the analysis of an automaton definition.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// The definition declares no states at all.
    NoStates,
    /// State names that are not usable as state identities.
    InvalidStateNames(Vec<String>),
    /// Alphabet symbols that cannot be used as input symbols.
    InvalidSymbols(Vec<Symbol>),
    /// The initial state is not a member of the state set.
    InvalidInitialState(String),
    /// Final states that are not members of the state set.
    UnknownFinalStates(Vec<String>),
    /// Transitions whose source or destination is not a member of the state set.
    UnknownTransitionStates(Vec<String>),
    /// Transitions labelled with a symbol outside the alphabet.
    UnknownTransitionSymbols(Vec<String>),
}

impl From<AnalysisError> for AutomatonError {
    /// Converts an `AnalysisError` into an `AutomatonError::MalformedAutomaton`.
    fn from(error: AnalysisError) -> Self {
        let reason = match error {
            AnalysisError::NoStates => "No states defined".to_string(),
            AnalysisError::InvalidStateNames(names) => {
                format!("Invalid state names: {:?}", names)
            }
            AnalysisError::InvalidSymbols(symbols) => {
                format!("Invalid alphabet symbols: {:?}", symbols)
            }
            AnalysisError::InvalidInitialState(state) => {
                format!("Initial state '{}' is not an existing state", state)
            }
            AnalysisError::UnknownFinalStates(states) => {
                format!("Final states are not existing states: {:?}", states)
            }
            AnalysisError::UnknownTransitionStates(transitions) => {
                format!("Transitions reference unknown states: {:?}", transitions)
            }
            AnalysisError::UnknownTransitionSymbols(transitions) => {
                format!("Transitions reference unknown symbols: {:?}", transitions)
            }
        };

        AutomatonError::MalformedAutomaton(reason)
    }
}

/// Analyzes a given `Definition` for structural errors.
///
/// All checks are run and the first failure is reported.
///
/// # Returns
///
/// * `Ok(())` if no errors are found.
/// * `Err(AutomatonError::MalformedAutomaton)` if any invariant is violated.
pub fn analyze(definition: &Definition) -> Result<(), AutomatonError> {
    let errors = [
        check_states,
        check_symbols,
        check_initial_state,
        check_final_states,
        check_transition_states,
        check_transition_symbols,
    ]
    .iter()
    .filter_map(|f| f(definition).err())
    .collect::<Vec<_>>();

    if let Some(first_error) = errors.into_iter().next() {
        return Err(first_error.into());
    }

    Ok(())
}

/// Checks that at least one state exists and that every name is a valid state identity.
fn check_states(definition: &Definition) -> Result<(), AnalysisError> {
    if definition.states.is_empty() {
        return Err(AnalysisError::NoStates);
    }

    let mut invalid: Vec<String> = definition
        .states
        .iter()
        .filter(|state| !is_valid_state_id(state))
        .cloned()
        .collect();

    if !invalid.is_empty() {
        invalid.sort();
        invalid.dedup();
        return Err(AnalysisError::InvalidStateNames(invalid));
    }

    Ok(())
}

/// Checks that no alphabet symbol is whitespace, since words could not carry it.
fn check_symbols(definition: &Definition) -> Result<(), AnalysisError> {
    let mut invalid: Vec<Symbol> = definition
        .alphabet
        .iter()
        .filter(|symbol| symbol.is_whitespace())
        .copied()
        .collect();

    if !invalid.is_empty() {
        invalid.sort();
        invalid.dedup();
        return Err(AnalysisError::InvalidSymbols(invalid));
    }

    Ok(())
}

/// Checks whether the initial state is a member of the state set.
fn check_initial_state(definition: &Definition) -> Result<(), AnalysisError> {
    if !definition.states.contains(&definition.initial_state) {
        return Err(AnalysisError::InvalidInitialState(
            definition.initial_state.clone(),
        ));
    }

    Ok(())
}

/// Checks that the final states are a subset of the state set.
fn check_final_states(definition: &Definition) -> Result<(), AnalysisError> {
    let states: HashSet<&StateId> = definition.states.iter().collect();

    let mut unknown: Vec<String> = definition
        .final_states
        .iter()
        .filter(|state| !states.contains(state))
        .cloned()
        .collect();

    if !unknown.is_empty() {
        unknown.sort(); // Sort for deterministic output
        unknown.dedup();
        return Err(AnalysisError::UnknownFinalStates(unknown));
    }

    Ok(())
}

/// Checks that every transition connects two members of the state set.
fn check_transition_states(definition: &Definition) -> Result<(), AnalysisError> {
    let states: HashSet<&StateId> = definition.states.iter().collect();

    let unknown: Vec<String> = definition
        .transitions
        .iter()
        .filter(|t| !states.contains(&t.source) || !states.contains(&t.destination))
        .map(|t| t.to_string())
        .collect();

    if !unknown.is_empty() {
        return Err(AnalysisError::UnknownTransitionStates(unknown));
    }

    Ok(())
}

/// Checks that every transition is labelled with a symbol of the alphabet.
fn check_transition_symbols(definition: &Definition) -> Result<(), AnalysisError> {
    let alphabet: HashSet<Symbol> = definition.alphabet.iter().copied().collect();

    let unknown: Vec<String> = definition
        .transitions
        .iter()
        .filter(|t| !alphabet.contains(&t.symbol))
        .map(|t| t.to_string())
        .collect();

    if !unknown.is_empty() {
        return Err(AnalysisError::UnknownTransitionSymbols(unknown));
    }

    Ok(())
}

/// Finds the states that cannot be reached from the initial state by any sequence of
/// transitions, epsilon-transitions included.
///
/// Unreachable states are legal, so this is reported rather than rejected.
pub fn unreachable_states(definition: &Definition) -> Vec<StateId> {
    let mut visited = BTreeSet::new();
    let mut queue = VecDeque::from([definition.initial_state.clone()]);

    while let Some(state) = queue.pop_front() {
        if !visited.insert(state.clone()) {
            continue;
        }

        for transition in definition.transitions.iter().filter(|t| t.source == state) {
            if !visited.contains(&transition.destination) {
                queue.push_back(transition.destination.clone());
            }
        }
    }

    let mut unreachable: Vec<StateId> = definition
        .states
        .iter()
        .filter(|state| !visited.contains(*state))
        .cloned()
        .collect();
    unreachable.sort();
    unreachable.dedup();
    unreachable
}

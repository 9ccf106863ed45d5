//! This module defines the automaton model: the validated 5-tuple built from a
//! [`Definition`], and the deterministic automaton produced by the converter.
//!
//! The two transition table shapes are distinct types. Only the converter builds a
//! [`DeterministicAutomaton`] from an [`Automaton`].

use crate::analyzer::{analyze, unreachable_states};
use crate::closure::{compute_closures, EpsilonClosure};
use crate::types::{AutomatonError, Definition, StateId, Symbol};
use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet};

/// Transitions of a possibly non-deterministic automaton: `(state, symbol)` to a set of states.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NondeterministicTransitions {
    table: BTreeMap<StateId, BTreeMap<Symbol, BTreeSet<StateId>>>,
}

impl NondeterministicTransitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `source --symbol--> destination`. Duplicate edges collapse.
    pub fn insert(&mut self, source: &str, symbol: Symbol, destination: &str) {
        self.table
            .entry(source.to_string())
            .or_default()
            .entry(symbol)
            .or_default()
            .insert(destination.to_string());
    }

    /// Returns the destinations of `(state, symbol)`, if any.
    pub fn get(&self, state: &str, symbol: Symbol) -> Option<&BTreeSet<StateId>> {
        self.table.get(state).and_then(|edges| edges.get(&symbol))
    }

    /// Iterates over every `(source, symbol, destinations)` entry in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&StateId, Symbol, &BTreeSet<StateId>)> + '_ {
        self.table.iter().flat_map(|(source, edges)| {
            edges
                .iter()
                .map(move |(symbol, destinations)| (source, *symbol, destinations))
        })
    }

    /// Checks whether any `(state, symbol)` pair has more than one destination.
    pub fn has_multiple_destinations(&self) -> bool {
        self.iter().any(|(_, _, destinations)| destinations.len() > 1)
    }

    /// Returns the total number of edges.
    pub fn len(&self) -> usize {
        self.iter().map(|(_, _, destinations)| destinations.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Transitions of a deterministic automaton: `(state, symbol)` to at most one state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeterministicTransitions {
    table: BTreeMap<StateId, BTreeMap<Symbol, StateId>>,
}

impl DeterministicTransitions {
    /// Records `source --symbol--> destination`, replacing any previous destination.
    pub(crate) fn insert(&mut self, source: StateId, symbol: Symbol, destination: StateId) {
        self.table
            .entry(source)
            .or_default()
            .insert(symbol, destination);
    }

    /// Returns the destination of `(state, symbol)`, if any.
    pub fn get(&self, state: &str, symbol: Symbol) -> Option<&StateId> {
        self.table.get(state).and_then(|edges| edges.get(&symbol))
    }

    /// Iterates over every `(source, symbol, destination)` entry in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&StateId, Symbol, &StateId)> + '_ {
        self.table.iter().flat_map(|(source, edges)| {
            edges
                .iter()
                .map(move |(symbol, destination)| (source, *symbol, destination))
        })
    }

    pub fn len(&self) -> usize {
        self.table.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// A validated finite automaton, deterministic or not.
///
/// Built from a [`Definition`] by [`Automaton::new`], which rejects records whose initial
/// state or final states are not members of the state set, or whose transitions reference
/// unknown states or symbols. The automaton is never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Automaton {
    alphabet: BTreeSet<Symbol>,
    states: BTreeSet<StateId>,
    final_states: BTreeSet<StateId>,
    initial_state: StateId,
    transitions: NondeterministicTransitions,
    epsilon: Symbol,
    nondeterministic: bool,
}

impl Automaton {
    /// Validates a raw definition and builds the automaton.
    ///
    /// # Returns
    ///
    /// * `Ok(Automaton)` if the definition satisfies every structural invariant.
    /// * `Err(AutomatonError::MalformedAutomaton)` otherwise.
    pub fn new(definition: Definition) -> Result<Self, AutomatonError> {
        analyze(&definition)?;

        let unreachable = unreachable_states(&definition);
        if !unreachable.is_empty() {
            warn!("Unreachable states: {:?}", unreachable);
        }

        let mut transitions = NondeterministicTransitions::new();
        for t in &definition.transitions {
            transitions.insert(&t.source, t.symbol, &t.destination);
        }

        let alphabet: BTreeSet<Symbol> = definition.alphabet.into_iter().collect();
        let nondeterministic =
            alphabet.contains(&definition.epsilon) || transitions.has_multiple_destinations();

        let automaton = Self {
            alphabet,
            states: definition.states.into_iter().collect(),
            final_states: definition.final_states.into_iter().collect(),
            initial_state: definition.initial_state,
            transitions,
            epsilon: definition.epsilon,
            nondeterministic,
        };

        debug!(
            "Built automaton: {} states, {} symbols, {} transitions, nondeterministic: {}",
            automaton.states.len(),
            automaton.alphabet.len(),
            automaton.transitions.len(),
            automaton.nondeterministic
        );

        Ok(automaton)
    }

    /// Returns the alphabet, including the epsilon symbol when the definition declared it.
    pub fn alphabet(&self) -> &BTreeSet<Symbol> {
        &self.alphabet
    }

    pub fn states(&self) -> &BTreeSet<StateId> {
        &self.states
    }

    pub fn final_states(&self) -> &BTreeSet<StateId> {
        &self.final_states
    }

    pub fn initial_state(&self) -> &str {
        &self.initial_state
    }

    pub fn transitions(&self) -> &NondeterministicTransitions {
        &self.transitions
    }

    /// Returns the symbol reserved for epsilon-transitions.
    pub fn epsilon(&self) -> Symbol {
        self.epsilon
    }

    /// True iff the alphabet holds the epsilon symbol or some `(state, symbol)` pair has
    /// several destinations. Derived once at construction.
    pub fn is_nondeterministic(&self) -> bool {
        self.nondeterministic
    }

    /// Iterates over the alphabet without the epsilon symbol.
    pub fn input_symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.alphabet
            .iter()
            .copied()
            .filter(move |&symbol| symbol != self.epsilon)
    }

    /// Computes the epsilon-closure of every state.
    pub fn epsilon_closures(&self) -> EpsilonClosure {
        compute_closures(&self.states, &self.transitions, self.epsilon)
    }
}

/// A deterministic automaton, as produced by the converter.
///
/// Each state remembers the set of source states it stands for. For an automaton that was
/// already deterministic every state stands for itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterministicAutomaton {
    pub(crate) alphabet: BTreeSet<Symbol>,
    pub(crate) states: BTreeSet<StateId>,
    pub(crate) final_states: BTreeSet<StateId>,
    pub(crate) initial_state: StateId,
    pub(crate) transitions: DeterministicTransitions,
    pub(crate) members: BTreeMap<StateId, BTreeSet<StateId>>,
}

impl DeterministicAutomaton {
    /// Returns the alphabet. It never contains an epsilon symbol.
    pub fn alphabet(&self) -> &BTreeSet<Symbol> {
        &self.alphabet
    }

    pub fn states(&self) -> &BTreeSet<StateId> {
        &self.states
    }

    pub fn final_states(&self) -> &BTreeSet<StateId> {
        &self.final_states
    }

    pub fn initial_state(&self) -> &str {
        &self.initial_state
    }

    pub fn transitions(&self) -> &DeterministicTransitions {
        &self.transitions
    }

    /// Always false: every `(state, symbol)` pair maps to at most one destination.
    pub fn is_nondeterministic(&self) -> bool {
        false
    }

    pub fn is_final(&self, state: &str) -> bool {
        self.final_states.contains(state)
    }

    /// Returns the source states a state of this automaton stands for.
    pub fn members(&self, state: &str) -> Option<&BTreeSet<StateId>> {
        self.members.get(state)
    }
}

//! Epsilon-closure computation.

use crate::automaton::NondeterministicTransitions;
use crate::types::{StateId, Symbol};
use log::trace;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// The epsilon-closure of every state of an automaton.
///
/// Every state has an entry, and every entry contains the state itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpsilonClosure {
    closures: BTreeMap<StateId, BTreeSet<StateId>>,
}

impl EpsilonClosure {
    /// Returns the closure of a single state.
    pub fn get(&self, state: &str) -> Option<&BTreeSet<StateId>> {
        self.closures.get(state)
    }

    /// Returns the union of the closures of the given states.
    ///
    /// States without an entry contribute themselves only.
    pub fn close<'a, I>(&self, states: I) -> BTreeSet<StateId>
    where
        I: IntoIterator<Item = &'a StateId>,
    {
        let mut result = BTreeSet::new();
        for state in states {
            match self.closures.get(state) {
                Some(closure) => result.extend(closure.iter().cloned()),
                None => {
                    result.insert(state.clone());
                }
            }
        }
        result
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StateId, &BTreeSet<StateId>)> {
        self.closures.iter()
    }

    pub fn len(&self) -> usize {
        self.closures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closures.is_empty()
    }
}

/// Computes the epsilon-closure of every state using a breadth-first search that only
/// follows edges labelled `epsilon`.
pub fn compute_closures(
    states: &BTreeSet<StateId>,
    transitions: &NondeterministicTransitions,
    epsilon: Symbol,
) -> EpsilonClosure {
    let closures = states
        .iter()
        .map(|state| (state.clone(), closure_of(state, transitions, epsilon)))
        .collect::<BTreeMap<_, _>>();

    trace!("Epsilon closures: {:?}", closures);

    EpsilonClosure { closures }
}

fn closure_of(
    state: &StateId,
    transitions: &NondeterministicTransitions,
    epsilon: Symbol,
) -> BTreeSet<StateId> {
    let mut visited = BTreeSet::new();
    let mut queue = VecDeque::from([state.clone()]);

    while let Some(current) = queue.pop_front() {
        if !visited.insert(current.clone()) {
            continue;
        }

        if let Some(destinations) = transitions.get(&current, epsilon) {
            for destination in destinations {
                if !visited.contains(destination) {
                    queue.push_back(destination.clone());
                }
            }
        }
    }

    visited
}

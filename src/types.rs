//! This module defines the core data structures and types shared by the automaton engine,
//! including the raw definition record, classification outcomes, state identities, and error types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

use crate::Rule;

/// The default symbol reserved for epsilon-transitions.
pub const DEFAULT_EPSILON_SYMBOL: char = '&';
/// The file extension appended to definition paths that carry none.
pub const DEFINITION_EXTENSION: &str = "txt";
/// The maximum allowed size for an automaton definition in bytes.
pub const MAX_DEFINITION_SIZE: usize = 65536; // 64KB

/// Characters that only appear in state identities as part of a composite identity.
const COMPOSITE_OPEN: char = '{';
const COMPOSITE_CLOSE: char = '}';
const COMPOSITE_SEPARATOR: char = ',';

/// A single input symbol. Words are evaluated character by character.
pub type Symbol = char;
/// The identity of a state.
pub type StateId = String;

/// A raw automaton record as handed over by a loader, before any validation.
///
/// This is the boundary between the definition format and the core: the parser
/// fills it in, and [`crate::Automaton::new`] checks it and builds the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    /// The input symbols, possibly including the epsilon symbol.
    pub alphabet: Vec<Symbol>,
    /// Every state of the automaton.
    pub states: Vec<StateId>,
    /// The accepting states.
    pub final_states: Vec<StateId>,
    /// The state every run starts in.
    pub initial_state: StateId,
    /// Transition triples `(source, symbol, destination)`.
    pub transitions: Vec<TransitionRecord>,
    /// The symbol reserved for epsilon-transitions.
    pub epsilon: Symbol,
}

/// A single `source symbol destination` transition line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub source: StateId,
    pub symbol: Symbol,
    pub destination: StateId,
}

impl TransitionRecord {
    pub fn new(source: &str, symbol: Symbol, destination: &str) -> Self {
        Self {
            source: source.to_string(),
            symbol,
            destination: destination.to_string(),
        }
    }
}

impl fmt::Display for TransitionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.source, self.symbol, self.destination)
    }
}

/// The verdict for a single word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Classification {
    /// The run consumed the whole word and stopped in a final state.
    Accepted,
    /// The run dead-ended, or stopped in a non-final state.
    Rejected,
    /// The word contains a symbol outside the alphabet.
    Invalid,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Classification::Accepted => "ACCEPTED",
            Classification::Rejected => "REJECTED",
            Classification::Invalid => "INVALID",
        };
        f.write_str(label)
    }
}

/// One entry of a batch report: a word and its classification, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub word: String,
    pub classification: Classification,
}

/// Builds the canonical identity of a composite state from the source states it stands for.
///
/// Members are sorted (the set is ordered) and rendered as `{a,b,c}`, so the same set of
/// source states always yields the same identity.
pub fn composite_id(members: &BTreeSet<StateId>) -> StateId {
    let joined = members
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(&COMPOSITE_SEPARATOR.to_string());

    format!("{COMPOSITE_OPEN}{joined}{COMPOSITE_CLOSE}")
}

/// Checks whether a string may be used as a state identity.
///
/// Plain identities are non-empty and contain neither whitespace nor any of `{`, `}`, `,`.
/// Those characters are only allowed in a well-formed composite identity, which keeps
/// [`composite_id`] injective.
pub fn is_valid_state_id(id: &str) -> bool {
    match id
        .strip_prefix(COMPOSITE_OPEN)
        .and_then(|rest| rest.strip_suffix(COMPOSITE_CLOSE))
    {
        Some(inner) => split_members(inner).is_some_and(|members| {
            !members.is_empty() && members.iter().all(|member| is_valid_state_id(member))
        }),
        None => {
            !id.is_empty()
                && !id.contains(|c: char| {
                    c.is_whitespace()
                        || c == COMPOSITE_OPEN
                        || c == COMPOSITE_CLOSE
                        || c == COMPOSITE_SEPARATOR
                })
        }
    }
}

/// Splits the inside of a composite identity on its top-level separators.
///
/// Returns `None` when the braces are unbalanced.
fn split_members(inner: &str) -> Option<Vec<&str>> {
    let mut members = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in inner.char_indices() {
        match c {
            COMPOSITE_OPEN => depth += 1,
            COMPOSITE_CLOSE => depth = depth.checked_sub(1)?,
            COMPOSITE_SEPARATOR if depth == 0 => {
                members.push(&inner[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }

    if depth != 0 {
        return None;
    }

    members.push(&inner[start..]);
    Some(members)
}

/// Represents the errors that can occur while loading or running an automaton.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AutomatonError {
    /// The automaton violates a structural invariant.
    #[error("Malformed automaton: {0}")]
    MalformedAutomaton(String),
    /// An item of a word batch is not a valid string.
    #[error("Invalid word: {0}")]
    InvalidWordType(String),
    /// The definition text could not be tokenized.
    #[error("Definition parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// No embedded sample has the requested name.
    #[error("Unknown sample: {0}")]
    UnknownSample(String),
    /// Reading a definition or word file failed.
    #[error("File error: {0}")]
    FileError(String),
}

//! This crate provides the core logic for a finite automaton engine.
//! It includes modules for parsing automaton definitions, computing epsilon-closures,
//! converting non-deterministic automata to deterministic ones by subset construction,
//! classifying words, and managing a small library of embedded sample automata.

pub mod analyzer;
pub mod automaton;
pub mod closure;
pub mod converter;
pub mod encoder;
pub mod evaluator;
pub mod loader;
pub mod parser;
pub mod samples;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the `analyze` function and `AnalysisError` enum from the analyzer module.
pub use analyzer::{analyze, AnalysisError};
/// Re-exports the automaton model.
pub use automaton::{
    Automaton, DeterministicAutomaton, DeterministicTransitions, NondeterministicTransitions,
};
/// Re-exports the epsilon-closure computer.
pub use closure::{compute_closures, EpsilonClosure};
/// Re-exports the subset construction entry points.
pub use converter::{convert_to_dfa, determinize};
/// Re-exports the encoding functions from the encoder module.
pub use encoder::{encode, encode_deterministic};
/// Re-exports the word evaluator.
pub use evaluator::{
    classify, evaluate, evaluate_parallel, process, process_parallel, Run, Step,
};
/// Re-exports the `AutomatonLoader` struct from the loader module.
pub use loader::AutomatonLoader;
/// Re-exports the parsing functions from the parser module.
pub use parser::{parse, parse_with, ParseOptions};
/// Re-exports `Sample`, `SampleLibrary`, and `SAMPLES` from the samples module.
pub use samples::{Sample, SampleInfo, SampleLibrary, SAMPLES};
/// Re-exports the shared types.
pub use types::{
    AutomatonError, Classification, Definition, StateId, Symbol, TransitionRecord, Verdict,
    DEFAULT_EPSILON_SYMBOL, MAX_DEFINITION_SIZE,
};

//! This module provides the parser for automaton definitions, utilizing the `pest` crate.
//! It tokenizes definition text with the grammar in `grammar.pest` and assembles the
//! records into a [`Definition`], which is then validated into an [`Automaton`].

use crate::{
    automaton::Automaton,
    types::{AutomatonError, Definition, Symbol, TransitionRecord, DEFAULT_EPSILON_SYMBOL},
};
use pest::{iterators::Pair, Parser as PestParser};
use pest_derive::Parser as PestParser;

/// Derives a `PestParser` for the definition grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct DefinitionParser;

/// Options that change how a definition is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// The symbol reserved for epsilon-transitions.
    pub epsilon: Symbol,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON_SYMBOL,
        }
    }
}

/// The header records, in the order they appear in a definition.
const HEADER: [&str; 4] = ["alphabet", "states", "final states", "initial state"];

/// Parses the given definition text into a validated `Automaton`, using `&` as the
/// epsilon symbol.
///
/// # Returns
///
/// * `Ok(Automaton)` if the text is well-formed and describes a valid automaton.
/// * `Err(AutomatonError::MalformedAutomaton)` if a record is malformed or the automaton
///   violates a structural invariant.
pub fn parse(input: &str) -> Result<Automaton, AutomatonError> {
    parse_with(input, ParseOptions::default())
}

/// Parses the given definition text into a validated `Automaton` with custom options.
pub fn parse_with(input: &str, options: ParseOptions) -> Result<Automaton, AutomatonError> {
    Automaton::new(parse_definition(input, options)?)
}

/// Parses the given definition text into a raw `Definition` without validating it.
///
/// Only the shape of each record is checked here: header lines must be present, symbols
/// must be single characters, the initial state line must name exactly one state, and every
/// transition record must have three fields.
pub fn parse_definition(input: &str, options: ParseOptions) -> Result<Definition, AutomatonError> {
    let root = DefinitionParser::parse(Rule::definition, input)
        .map_err(|e| AutomatonError::ParseError(Box::new(e)))?
        .next()
        .ok_or_else(|| AutomatonError::MalformedAutomaton("Empty definition".to_string()))?;

    let records: Vec<Record> = root
        .into_inner()
        .filter(|p| p.as_rule() == Rule::record)
        .map(Record::from)
        .collect();

    if records.len() < HEADER.len() {
        return Err(AutomatonError::MalformedAutomaton(format!(
            "Missing {} line",
            HEADER[records.len()]
        )));
    }

    let (header, body) = records.split_at(HEADER.len());

    let alphabet = header[0]
        .fields
        .iter()
        .map(|field| parse_symbol(field, header[0].line))
        .collect::<Result<Vec<_>, _>>()?;
    let states = header[1].to_strings();
    let final_states = header[2].to_strings();
    let initial_state = parse_initial_state(&header[3])?;

    let transitions = body
        .iter()
        .filter(|record| !record.fields.is_empty())
        .map(parse_transition)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Definition {
        alphabet,
        states,
        final_states,
        initial_state,
        transitions,
        epsilon: options.epsilon,
    })
}

/// A single line of a definition, split into its fields.
struct Record<'i> {
    line: usize,
    fields: Vec<&'i str>,
}

impl<'i> From<Pair<'i, Rule>> for Record<'i> {
    fn from(pair: Pair<'i, Rule>) -> Self {
        let (line, _) = pair.as_span().start_pos().line_col();

        // Rule: record > [field]
        let fields = pair
            .into_inner()
            .filter(|p| p.as_rule() == Rule::field)
            .map(|p| p.as_str())
            .collect();

        Self { line, fields }
    }
}

impl Record<'_> {
    fn to_strings(&self) -> Vec<String> {
        self.fields.iter().map(|field| field.to_string()).collect()
    }
}

/// Creates an `AutomatonError::MalformedAutomaton` pointing at a definition line.
fn malformed(line: usize, msg: &str) -> AutomatonError {
    AutomatonError::MalformedAutomaton(format!("line {line}: {msg}"))
}

/// Parses a symbol field, which must be exactly one character long.
fn parse_symbol(field: &str, line: usize) -> Result<Symbol, AutomatonError> {
    let mut chars = field.chars();

    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Ok(symbol),
        _ => Err(malformed(
            line,
            &format!("Symbol '{field}' must be a single character"),
        )),
    }
}

/// Parses the initial state line, which must name exactly one state.
fn parse_initial_state(record: &Record) -> Result<String, AutomatonError> {
    match record.fields.as_slice() {
        [state] => Ok(state.to_string()),
        fields => Err(malformed(
            record.line,
            &format!(
                "Initial state line must name exactly 1 state, found {}",
                fields.len()
            ),
        )),
    }
}

/// Parses a `source symbol destination` transition record.
fn parse_transition(record: &Record) -> Result<TransitionRecord, AutomatonError> {
    match record.fields.as_slice() {
        [source, symbol, destination] => Ok(TransitionRecord {
            source: source.to_string(),
            symbol: parse_symbol(symbol, record.line)?,
            destination: destination.to_string(),
        }),
        fields => Err(malformed(
            record.line,
            &format!(
                "Transition requires 3 fields (source symbol destination), found {}",
                fields.len()
            ),
        )),
    }
}

//! This module defines the word evaluator. A [`Run`] walks a single word through a
//! deterministic automaton one symbol at a time; [`classify`] and the batch functions
//! build on it.

use crate::automaton::{Automaton, DeterministicAutomaton};
use crate::converter::determinize;
use crate::types::{Classification, Symbol, Verdict};
use log::{debug, trace};
use rayon::prelude::*;

/// Represents the outcome of a single evaluation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A symbol was consumed and the run continues.
    Continue,
    /// The run has stopped with a final classification.
    Halt(Classification),
}

/// The evaluation of one word against a deterministic automaton.
///
/// The automaton is only borrowed, so any number of runs can share it.
pub struct Run<'a> {
    automaton: &'a DeterministicAutomaton,
    symbols: Vec<Symbol>,
    state: &'a str,
    position: usize,
    steps: usize,
    outcome: Option<Classification>,
}

impl<'a> Run<'a> {
    /// Creates a run positioned before the first symbol of `word`, in the initial state.
    pub fn new(automaton: &'a DeterministicAutomaton, word: &str) -> Self {
        Self {
            automaton,
            symbols: word.chars().collect(),
            state: automaton.initial_state(),
            position: 0,
            steps: 0,
            outcome: None,
        }
    }

    /// Consumes the next symbol of the word.
    ///
    /// A symbol outside the alphabet halts with `Invalid` before any transition lookup. A
    /// missing transition halts with `Rejected`. Once the word is exhausted the run halts
    /// with `Accepted` iff the current state is final.
    pub fn step(&mut self) -> Step {
        if let Some(outcome) = self.outcome {
            return Step::Halt(outcome);
        }

        self.steps += 1;
        let automaton = self.automaton;

        let Some(&symbol) = self.symbols.get(self.position) else {
            let outcome = if automaton.is_final(self.state) {
                Classification::Accepted
            } else {
                Classification::Rejected
            };
            return self.halt(outcome);
        };

        if !automaton.alphabet().contains(&symbol) {
            trace!("Symbol {symbol:?} at {} is not in the alphabet", self.position);
            return self.halt(Classification::Invalid);
        }

        match automaton.transitions().get(self.state, symbol) {
            Some(next) => {
                trace!("{} --{symbol}--> {next}", self.state);
                self.state = next;
                self.position += 1;
                Step::Continue
            }
            None => {
                trace!("No transition from {} on {symbol:?}", self.state);
                self.halt(Classification::Rejected)
            }
        }
    }

    /// Runs until the word is classified.
    ///
    /// Every step either consumes a symbol or halts, so this terminates after at most
    /// `word.len() + 1` steps.
    pub fn run(&mut self) -> Classification {
        loop {
            if let Step::Halt(outcome) = self.step() {
                return outcome;
            }
        }
    }

    fn halt(&mut self, outcome: Classification) -> Step {
        self.outcome = Some(outcome);
        Step::Halt(outcome)
    }

    /// Returns the current state of the run.
    pub fn state(&self) -> &str {
        self.state
    }

    /// Returns the number of symbols consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the number of steps taken, the halting step included.
    pub fn step_count(&self) -> usize {
        self.steps
    }

    /// Returns the next symbol to be consumed, if any.
    pub fn symbol(&self) -> Option<Symbol> {
        self.symbols.get(self.position).copied()
    }

    /// Returns the classification once the run has halted.
    pub fn outcome(&self) -> Option<Classification> {
        self.outcome
    }

    pub fn is_halted(&self) -> bool {
        self.outcome.is_some()
    }
}

/// Classifies a single word.
pub fn classify(automaton: &DeterministicAutomaton, word: &str) -> Classification {
    Run::new(automaton, word).run()
}

/// Classifies every word of a batch, in input order. Repeated words are kept.
pub fn evaluate<I, W>(automaton: &DeterministicAutomaton, words: I) -> Vec<Verdict>
where
    I: IntoIterator<Item = W>,
    W: AsRef<str>,
{
    words
        .into_iter()
        .map(|word| verdict(automaton, word.as_ref()))
        .collect()
}

/// Classifies every word of a batch in parallel. The report keeps input order.
pub fn evaluate_parallel<W>(automaton: &DeterministicAutomaton, words: &[W]) -> Vec<Verdict>
where
    W: AsRef<str> + Sync,
{
    words
        .par_iter()
        .map(|word| verdict(automaton, word.as_ref()))
        .collect()
}

/// Determinizes the automaton when needed, then classifies every word in input order.
pub fn process<I, W>(automaton: &Automaton, words: I) -> Vec<Verdict>
where
    I: IntoIterator<Item = W>,
    W: AsRef<str>,
{
    let dfa = determinize(automaton);
    let verdicts = evaluate(&dfa, words);
    debug!("Classified {} words", verdicts.len());
    verdicts
}

/// Same as [`process`], with the words classified in parallel.
pub fn process_parallel<W>(automaton: &Automaton, words: &[W]) -> Vec<Verdict>
where
    W: AsRef<str> + Sync,
{
    let dfa = determinize(automaton);
    let verdicts = evaluate_parallel(&dfa, words);
    debug!("Classified {} words in parallel", verdicts.len());
    verdicts
}

fn verdict(automaton: &DeterministicAutomaton, word: &str) -> Verdict {
    Verdict {
        word: word.to_string(),
        classification: classify(automaton, word),
    }
}

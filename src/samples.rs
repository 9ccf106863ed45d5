use crate::automaton::Automaton;
use crate::parser::{parse, parse_with, ParseOptions};
use crate::types::AutomatonError;
use log::warn;

// Default embedded definitions
const SAMPLE_TEXTS: [(&str, &str); 5] = [
    ("alternating", include_str!("../automata/alternating.txt")),
    ("epsilon-a", include_str!("../automata/epsilon-a.txt")),
    ("ends-with-ab", include_str!("../automata/ends-with-ab.txt")),
    (
        "binary-multiple-of-three",
        include_str!("../automata/binary-multiple-of-three.txt"),
    ),
    ("a-ba-star", include_str!("../automata/a-ba-star.txt")),
];

/// An embedded automaton together with its name.
#[derive(Debug, Clone)]
pub struct Sample {
    pub name: &'static str,
    pub automaton: Automaton,
}

lazy_static::lazy_static! {
    /// The embedded samples, parsed on first use. Samples that fail to parse are skipped.
    pub static ref SAMPLES: Vec<Sample> = load_samples();
}

fn load_samples() -> Vec<Sample> {
    SAMPLE_TEXTS
        .iter()
        .filter_map(|&(name, text)| match parse(text) {
            Ok(automaton) => Some(Sample { name, automaton }),
            Err(e) => {
                warn!("Failed to parse sample '{}': {}", name, e);
                None
            }
        })
        .collect()
}

pub struct SampleLibrary;

impl SampleLibrary {
    /// Get the number of available samples
    pub fn count() -> usize {
        SAMPLES.len()
    }

    /// List all sample names
    pub fn names() -> Vec<&'static str> {
        SAMPLES.iter().map(|sample| sample.name).collect()
    }

    /// Get a sample automaton by its name
    pub fn get(name: &str) -> Result<Automaton, AutomatonError> {
        SAMPLES
            .iter()
            .find(|sample| sample.name == name)
            .map(|sample| sample.automaton.clone())
            .ok_or_else(|| AutomatonError::UnknownSample(name.to_string()))
    }

    /// Get a sample automaton by its name, parsed with the given options.
    ///
    /// With the default options this is [`SampleLibrary::get`]; otherwise the embedded text
    /// is parsed again, so a different epsilon symbol takes effect.
    pub fn get_with(name: &str, options: ParseOptions) -> Result<Automaton, AutomatonError> {
        if options == ParseOptions::default() {
            return Self::get(name);
        }

        parse_with(Self::text(name)?, options)
    }

    /// Get the original definition text of a sample
    pub fn text(name: &str) -> Result<&'static str, AutomatonError> {
        SAMPLE_TEXTS
            .iter()
            .find(|(sample, _)| *sample == name)
            .map(|(_, text)| *text)
            .ok_or_else(|| AutomatonError::UnknownSample(name.to_string()))
    }

    /// Get summary information about a sample
    pub fn info(name: &str) -> Result<SampleInfo, AutomatonError> {
        let automaton = Self::get(name)?;

        Ok(SampleInfo {
            name: name.to_string(),
            state_count: automaton.states().len(),
            transition_count: automaton.transitions().len(),
            nondeterministic: automaton.is_nondeterministic(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct SampleInfo {
    pub name: String,
    pub state_count: usize,
    pub transition_count: usize,
    pub nondeterministic: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::process;
    use crate::types::Classification;

    fn classifications(name: &str, words: &[&str]) -> Vec<Classification> {
        let automaton = SampleLibrary::get(name).unwrap();
        process(&automaton, words)
            .into_iter()
            .map(|verdict| verdict.classification)
            .collect()
    }

    #[test]
    fn test_all_samples_are_valid() {
        assert_eq!(SampleLibrary::count(), SAMPLE_TEXTS.len());
    }

    #[test]
    fn test_sample_names() {
        let names = SampleLibrary::names();
        assert!(names.contains(&"alternating"));
        assert!(names.contains(&"epsilon-a"));
    }

    #[test]
    fn test_unknown_sample() {
        let result = SampleLibrary::get("Nonexistent");
        assert_eq!(
            result.unwrap_err(),
            AutomatonError::UnknownSample("Nonexistent".to_string())
        );
        assert!(SampleLibrary::text("Nonexistent").is_err());
    }

    #[test]
    fn test_sample_info() {
        let info = SampleLibrary::info("ends-with-ab").unwrap();
        assert_eq!(info.state_count, 3);
        assert_eq!(info.transition_count, 4);
        assert!(info.nondeterministic);

        let info = SampleLibrary::info("alternating").unwrap();
        assert!(!info.nondeterministic);
    }

    #[test]
    fn test_sample_with_custom_epsilon() {
        let options = ParseOptions { epsilon: 'x' };
        let automaton = SampleLibrary::get_with("epsilon-a", options).unwrap();

        // '&' is an ordinary input symbol once another epsilon is chosen.
        assert!(!automaton.is_nondeterministic());
        assert_eq!(automaton.epsilon(), 'x');

        let verdicts: Vec<_> = process(&automaton, ["a", "&a"])
            .into_iter()
            .map(|verdict| verdict.classification)
            .collect();
        assert_eq!(
            verdicts,
            vec![Classification::Rejected, Classification::Accepted]
        );

        let default = SampleLibrary::get_with("epsilon-a", ParseOptions::default()).unwrap();
        assert!(default.is_nondeterministic());
        assert!(SampleLibrary::get_with("Nonexistent", options).is_err());
    }

    #[test]
    fn test_sample_text() {
        let text = SampleLibrary::text("epsilon-a").unwrap();
        assert!(text.starts_with("a &"));
    }

    #[test]
    fn test_ends_with_ab() {
        use Classification::*;

        assert_eq!(
            classifications("ends-with-ab", &["ab", "aab", "abab", "ba", "", "abc"]),
            vec![Accepted, Accepted, Accepted, Rejected, Rejected, Invalid]
        );
    }

    #[test]
    fn test_binary_multiple_of_three() {
        use Classification::*;

        assert_eq!(
            classifications("binary-multiple-of-three", &["0", "11", "110", "1001", "10", "2"]),
            vec![Accepted, Accepted, Accepted, Accepted, Rejected, Invalid]
        );
    }

    #[test]
    fn test_a_ba_star() {
        use Classification::*;

        assert_eq!(
            classifications("a-ba-star", &["a", "aba", "ababa", "ab", "b", ""]),
            vec![Accepted, Accepted, Accepted, Rejected, Rejected, Rejected]
        );
    }
}

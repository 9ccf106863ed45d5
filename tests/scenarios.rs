use automata::{
    classify, compute_closures, convert_to_dfa, determinize, encode_deterministic, parse,
    process, AutomatonError, AutomatonLoader, Classification, ParseOptions, SampleLibrary,
};
use std::path::Path;
use test_log::test;

const ALTERNATING: &str = "a b
q0 q1 q2 q3
q0 q3
q0
q0 a q1
q0 b q2
q1 a q0
q1 b q3
q2 a q3
q2 b q0
q3 a q1
q3 b q2
";

const NONDETERMINISTIC: &str = "0 1 &
p q r s
s
p
p 0 p
p 1 p
p 1 q
q & r
q 0 r
r 1 s
s & p
";

/// Every word over `symbols` up to `max_len` characters, the empty word included.
fn all_words(symbols: &[char], max_len: usize) -> Vec<String> {
    let mut words = vec![String::new()];
    let mut frontier = vec![String::new()];

    for _ in 0..max_len {
        frontier = frontier
            .iter()
            .flat_map(|word| {
                symbols.iter().map(move |symbol| {
                    let mut next = word.clone();
                    next.push(*symbol);
                    next
                })
            })
            .collect();
        words.extend(frontier.iter().cloned());
    }

    words
}

#[test]
fn test_deterministic_scenario() {
    let automaton = parse(ALTERNATING).unwrap();
    let verdicts = process(&automaton, ["aa", "ab", "c", ""]);

    let classifications: Vec<_> = verdicts.iter().map(|v| v.classification).collect();
    assert_eq!(
        classifications,
        vec![
            Classification::Accepted,
            Classification::Accepted,
            Classification::Invalid,
            Classification::Accepted,
        ]
    );
}

#[test]
fn test_epsilon_scenario() {
    let automaton = parse("a &\nq0 q1 q2\nq2\nq0\nq0 & q1\nq1 a q2\n").unwrap();

    // There is no direct q0 -a-> edge before conversion.
    assert!(automaton.transitions().get("q0", 'a').is_none());

    let dfa = determinize(&automaton);
    assert_eq!(classify(&dfa, "a"), Classification::Accepted);
}

#[test]
fn test_batch_order_is_preserved() {
    let automaton = parse(ALTERNATING).unwrap();
    let verdicts = process(&automaton, ["aa", "zz", "aa"]);

    let words: Vec<_> = verdicts.iter().map(|v| v.word.as_str()).collect();
    assert_eq!(words, vec!["aa", "zz", "aa"]);
    assert_eq!(verdicts[0], verdicts[2]);
    assert_eq!(verdicts[1].classification, Classification::Invalid);
}

#[test]
fn test_closure_properties() {
    let automaton = parse(NONDETERMINISTIC).unwrap();
    let closures = compute_closures(automaton.states(), automaton.transitions(), '&');

    assert_eq!(closures.len(), automaton.states().len());
    for (state, closure) in closures.iter() {
        assert!(closure.contains(state));
        assert_eq!(&closures.close(closure), closure);
    }
}

#[test]
fn test_conversion_is_deterministic() {
    let automaton = parse(NONDETERMINISTIC).unwrap();

    let first = convert_to_dfa(&automaton, &automaton.epsilon_closures());
    let second = convert_to_dfa(&automaton, &automaton.epsilon_closures());

    for word in all_words(&['0', '1'], 6) {
        assert_eq!(classify(&first, &word), classify(&second, &word), "{word}");
    }
}

#[test]
fn test_converting_a_dfa_preserves_behavior() {
    let automaton = parse(ALTERNATING).unwrap();
    assert!(!automaton.is_nondeterministic());

    let copied = determinize(&automaton);
    let converted = convert_to_dfa(&automaton, &automaton.epsilon_closures());
    assert!(!converted.is_nondeterministic());

    for word in all_words(&['a', 'b', 'c'], 5) {
        assert_eq!(classify(&converted, &word), classify(&copied, &word), "{word}");
    }
}

#[test]
fn test_nondeterministic_language() {
    // Words over {0, 1} ending in "11" or "101".
    let automaton = parse(NONDETERMINISTIC).unwrap();
    let dfa = determinize(&automaton);

    for word in all_words(&['0', '1'], 7) {
        let expected = if word.ends_with("11") || word.ends_with("101") {
            Classification::Accepted
        } else {
            Classification::Rejected
        };
        assert_eq!(classify(&dfa, &word), expected, "{word}");
    }
}

#[test]
fn test_emitted_dfa_can_be_reloaded() {
    let automaton = SampleLibrary::get("a-ba-star").unwrap();
    let dfa = determinize(&automaton);

    let reloaded = parse(&encode_deterministic(&dfa)).unwrap();
    assert!(!reloaded.is_nondeterministic());

    let reloaded = determinize(&reloaded);
    for word in all_words(&['a', 'b'], 6) {
        assert_eq!(classify(&reloaded, &word), classify(&dfa, &word), "{word}");
    }
}

#[test]
fn test_malformed_automaton_is_rejected() {
    let result = parse("a b\nq0 q1\nq0 q2\nq0\n");

    assert!(matches!(
        result,
        Err(AutomatonError::MalformedAutomaton(msg)) if msg.contains("q2")
    ));
}

#[test]
fn test_bundled_definitions_load_from_directory() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("automata");
    let results = AutomatonLoader::load_automata(&dir, ParseOptions::default());

    assert_eq!(results.len(), SampleLibrary::count());

    let names: Vec<_> = results
        .iter()
        .map(|result| {
            let (path, _) = result.as_ref().unwrap();
            path.file_stem().unwrap().to_string_lossy().into_owned()
        })
        .collect();
    assert_eq!(
        names,
        vec![
            "a-ba-star",
            "alternating",
            "binary-multiple-of-three",
            "ends-with-ab",
            "epsilon-a"
        ]
    );

    for result in &results {
        let (path, automaton) = result.as_ref().unwrap();
        let name = path.file_stem().unwrap().to_string_lossy();
        let sample = SampleLibrary::get(&name).unwrap();

        assert_eq!(
            process(automaton, ["", "a", "ab", "aba", "110", "&a"]),
            process(&sample, ["", "a", "ab", "aba", "110", "&a"])
        );
    }
}

use automata::converter::determinize;
use automata::encoder::encode_deterministic;
use automata::evaluator::{evaluate, evaluate_parallel, Run, Step};
use automata::loader::{words_from_bytes, AutomatonLoader};
use automata::parser::ParseOptions;
use automata::samples::SampleLibrary;
use automata::{Automaton, DeterministicAutomaton, Verdict, DEFAULT_EPSILON_SYMBOL};
use clap::Parser;
use log::debug;
use serde_json::json;
use std::error::Error;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
#[clap(after_help = "EXAMPLES:
  automata-cli -a automata/alternating.txt aa ab c
  automata-cli -s epsilon-a --emit-dfa
  automata-cli -D automata ab ba
  cat words.txt | automata-cli -s ends-with-ab --json")]
struct Cli {
    /// The automaton definition file to load (`.txt` is appended unless already present)
    #[clap(short, long, conflicts_with_all = ["sample", "dir"])]
    automaton: Option<PathBuf>,

    /// Use one of the embedded sample automata
    #[clap(short, long, conflicts_with = "dir")]
    sample: Option<String>,

    /// Classify the words against every `.txt` definition in a directory
    #[clap(short = 'D', long)]
    dir: Option<PathBuf>,

    /// List the embedded sample automata and exit
    #[clap(short, long)]
    list: bool,

    /// The symbol reserved for epsilon-transitions
    #[clap(short, long, default_value_t = DEFAULT_EPSILON_SYMBOL)]
    epsilon: char,

    /// The words to classify. Read from stdin, one per line, when omitted
    words: Vec<String>,

    /// Read the words to classify from a file, one per line
    #[clap(short, long, conflicts_with = "words")]
    words_file: Option<PathBuf>,

    /// Print each step of every run
    #[clap(short = 'd', long)]
    debug: bool,

    /// Print the classifications as JSON
    #[clap(long)]
    json: bool,

    /// Print the deterministic automaton as a definition instead of classifying words
    #[clap(long)]
    emit_dfa: bool,

    /// Classify the words in parallel
    #[clap(short, long)]
    parallel: bool,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    if cli.list {
        for name in SampleLibrary::names() {
            let info = SampleLibrary::info(name)?;
            println!(
                "{:<28} {} states, {} transitions{}",
                info.name,
                info.state_count,
                info.transition_count,
                if info.nondeterministic {
                    ", nondeterministic"
                } else {
                    ""
                }
            );
        }
        return Ok(());
    }

    if let Some(dir) = &cli.dir {
        return run_directory(cli, dir);
    }

    let dfa = determinize(&load_automaton(cli)?);
    debug!("Deterministic automaton has {} states", dfa.states().len());

    if cli.emit_dfa {
        print!("{}", encode_deterministic(&dfa));
        return Ok(());
    }

    // Every word is read before the first one is classified.
    let words = read_words(cli)?;
    let verdicts = classify_words(cli, &dfa, &words);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&verdicts)?);
    } else {
        print_verdicts(&verdicts);
    }

    Ok(())
}

/// Classifies the words against every definition of a directory, in path order.
///
/// Definitions that fail to load are reported and skipped; the command then fails once all
/// the others have been processed.
fn run_directory(cli: &Cli, dir: &Path) -> Result<(), Box<dyn Error>> {
    let options = ParseOptions {
        epsilon: cli.epsilon,
    };
    let words = if cli.emit_dfa { Vec::new() } else { read_words(cli)? };

    let mut failures = 0;
    let mut reports = Vec::new();

    for result in AutomatonLoader::load_automata(dir, options) {
        let (path, automaton) = match result {
            Ok(loaded) => loaded,
            Err(e) => {
                eprintln!("Error: {}", e);
                failures += 1;
                continue;
            }
        };

        let dfa = determinize(&automaton);

        if cli.emit_dfa {
            println!("# {}", path.display());
            print!("{}", encode_deterministic(&dfa));
            continue;
        }

        let verdicts = classify_words(cli, &dfa, &words);

        if cli.json {
            reports.push(json!({
                "automaton": path.display().to_string(),
                "verdicts": verdicts,
            }));
        } else {
            println!("{}:", path.display());
            print_verdicts(&verdicts);
        }
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    if failures > 0 {
        let msg = format!("{} definition(s) in {} failed to load", failures, dir.display());
        return Err(msg.into());
    }

    Ok(())
}

/// Loads the automaton from a file or from the embedded samples.
fn load_automaton(cli: &Cli) -> Result<Automaton, Box<dyn Error>> {
    let options = ParseOptions {
        epsilon: cli.epsilon,
    };

    match (&cli.automaton, &cli.sample) {
        (Some(path), _) => Ok(AutomatonLoader::load_automaton(path, options)?),
        (None, Some(name)) => Ok(SampleLibrary::get_with(name, options)?),
        (None, None) => Err("one of --automaton, --sample or --dir is required".into()),
    }
}

/// Collects the words from the arguments, a words file, or stdin.
fn read_words(cli: &Cli) -> Result<Vec<String>, Box<dyn Error>> {
    if !cli.words.is_empty() {
        Ok(cli.words.clone())
    } else if let Some(path) = &cli.words_file {
        Ok(AutomatonLoader::load_words(path)?)
    } else if atty::isnt(atty::Stream::Stdin) {
        let mut buffer = Vec::new();
        io::stdin()
            .read_to_end(&mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))?;
        Ok(words_from_bytes(&buffer)?)
    } else {
        Ok(Vec::new())
    }
}

fn classify_words(cli: &Cli, dfa: &DeterministicAutomaton, words: &[String]) -> Vec<Verdict> {
    if cli.debug {
        for word in words {
            print_run(dfa, word);
        }
        println!();
    }

    if cli.parallel {
        evaluate_parallel(dfa, words)
    } else {
        evaluate(dfa, words)
    }
}

fn print_verdicts(verdicts: &[Verdict]) {
    for verdict in verdicts {
        println!("{}: {}", display_word(&verdict.word), verdict.classification);
    }
}

fn print_run(dfa: &DeterministicAutomaton, word: &str) {
    let print_state = |run: &Run| {
        println!(
            "  Step: {}, Position: {}, State: {}, Next: {}",
            run.step_count(),
            run.position(),
            run.state(),
            run.symbol()
                .map(|symbol| symbol.to_string())
                .unwrap_or_else(|| "-".to_string())
        );
    };

    println!("Word: {}", display_word(word));

    let mut run = Run::new(dfa, word);
    print_state(&run);

    loop {
        match run.step() {
            Step::Continue => print_state(&run),
            Step::Halt(classification) => {
                println!("  Halted after {} steps: {}", run.step_count(), classification);
                break;
            }
        }
    }
}

fn display_word(word: &str) -> &str {
    if word.is_empty() {
        "ε"
    } else {
        word
    }
}

//! This module provides the `AutomatonLoader` struct, responsible for loading automaton
//! definitions from files and strings, and word batches from files.

use crate::automaton::Automaton;
use crate::parser::{parse_with, ParseOptions};
use crate::types::{AutomatonError, DEFINITION_EXTENSION, MAX_DEFINITION_SIZE};
use log::info;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

/// `AutomatonLoader` is a utility struct for loading automata and the words to classify.
pub struct AutomatonLoader;

impl AutomatonLoader {
    /// Loads a single automaton from the specified file path.
    ///
    /// Unless the path already ends in `.txt`, the extension is appended first.
    ///
    /// # Returns
    ///
    /// * `Ok(Automaton)` if the file is successfully read and parsed.
    /// * `Err(AutomatonError::FileError)` if the file cannot be read or is too large.
    /// * `Err(AutomatonError::MalformedAutomaton)` if the content is not a valid automaton.
    pub fn load_automaton(path: &Path, options: ParseOptions) -> Result<Automaton, AutomatonError> {
        let path = definition_path(path);
        let content = read_definition(&path)?;

        info!("Loading automaton from {}", path.display());
        parse_with(&content, options)
    }

    /// Loads a single automaton from the provided string content.
    ///
    /// The same `MAX_DEFINITION_SIZE` limit as for files applies.
    pub fn load_automaton_from_string(
        content: &str,
        options: ParseOptions,
    ) -> Result<Automaton, AutomatonError> {
        check_size(content.len() as u64, &"text")?;
        parse_with(content, options)
    }

    /// Loads every definition file (`.txt` extension) from a given directory.
    ///
    /// Directories and files with other extensions are skipped. Each loaded file yields one
    /// entry, either its path and automaton or the error that occurred.
    pub fn load_automata(
        directory: &Path,
        options: ParseOptions,
    ) -> Vec<Result<(PathBuf, Automaton), AutomatonError>> {
        if !directory.exists() {
            return vec![Err(AutomatonError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(AutomatonError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        let mut results: Vec<_> = entries
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        return Some(Err(AutomatonError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let path = entry.path();

                // Skip directories and non-definition files
                let extension = path.extension().and_then(|ext| ext.to_str());
                if path.is_dir() || extension != Some(DEFINITION_EXTENSION) {
                    return None;
                }

                match Self::load_automaton(&path, options) {
                    Ok(automaton) => Some(Ok((path, automaton))),
                    Err(e) => Some(Err(AutomatonError::FileError(format!(
                        "Failed to load automaton from {}: {}",
                        path.display(),
                        e
                    )))),
                }
            })
            .collect();

        // Directory order is platform dependent
        results.sort_by(|a, b| match (a, b) {
            (Ok((a, _)), Ok((b, _))) => a.cmp(b),
            (Ok(_), Err(_)) => std::cmp::Ordering::Less,
            (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
            (Err(_), Err(_)) => std::cmp::Ordering::Equal,
        });

        results
    }

    /// Loads a batch of words from a file, one word per line.
    ///
    /// Line terminators (`\n` or `\r\n`) are stripped; an empty line is the empty word. A
    /// trailing newline does not add an extra word.
    ///
    /// # Returns
    ///
    /// * `Err(AutomatonError::FileError)` if the file cannot be read.
    /// * `Err(AutomatonError::InvalidWordType)` if any line is not valid UTF-8. No word is
    ///   returned in that case.
    pub fn load_words(path: &Path) -> Result<Vec<String>, AutomatonError> {
        let bytes = fs::read(path).map_err(|e| {
            AutomatonError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        words_from_bytes(&bytes)
    }
}

/// Splits raw input into words, one per line, checking every line is valid UTF-8 before
/// returning any of them.
pub fn words_from_bytes(bytes: &[u8]) -> Result<Vec<String>, AutomatonError> {
    if bytes.is_empty() {
        return Ok(Vec::new());
    }

    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);

    bytes
        .split(|&b| b == b'\n')
        .enumerate()
        .map(|(index, line)| {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            std::str::from_utf8(line)
                .map(str::to_string)
                .map_err(|e| {
                    AutomatonError::InvalidWordType(format!(
                        "line {} is not valid UTF-8: {}",
                        index + 1,
                        e
                    ))
                })
        })
        .collect()
}

/// Appends `.txt` to paths that do not already end in it. Other extensions are kept, so
/// `machine.v1` becomes `machine.v1.txt`.
fn definition_path(path: &Path) -> PathBuf {
    if path.extension().and_then(|ext| ext.to_str()) == Some(DEFINITION_EXTENSION) {
        return path.to_path_buf();
    }

    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(DEFINITION_EXTENSION);
    PathBuf::from(name)
}

fn check_size(size: u64, source: &dyn Display) -> Result<(), AutomatonError> {
    if size > MAX_DEFINITION_SIZE as u64 {
        return Err(AutomatonError::FileError(format!(
            "Definition {} exceeds {} bytes",
            source, MAX_DEFINITION_SIZE
        )));
    }

    Ok(())
}

fn read_definition(path: &Path) -> Result<String, AutomatonError> {
    let read_error = |e: std::io::Error| {
        AutomatonError::FileError(format!("Failed to read file {}: {}", path.display(), e))
    };

    // Size is checked before the content is read.
    let metadata = fs::metadata(path).map_err(read_error)?;
    check_size(metadata.len(), &path.display())?;

    fs::read_to_string(path).map_err(read_error)
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Dictionary spelling corrector — picks the most frequent known word within
// edit distance one, then two, of each unknown word.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use scanflow_core::error::{Result, ScanflowError};
use tracing::{debug, info, instrument};

use super::SpellCorrector;

const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

/// Longest word for which distance-two candidates are generated. The
/// candidate set grows quadratically with word length.
const MAX_EDIT2_LEN: usize = 12;

/// Word-frequency based corrector.
#[derive(Debug, Clone)]
pub struct DictionaryCorrector {
    counts: HashMap<String, u64>,
}

impl DictionaryCorrector {
    /// Build from a word list: one `word` or `word count` per line. Blank
    /// lines and lines starting with `#` are ignored; repeated words add up.
    ///
    /// # Errors
    ///
    /// [`ScanflowError::Configuration`] if the list holds no words or a count
    /// is not a number.
    pub fn from_word_list(list: &str) -> Result<Self> {
        let mut counts: HashMap<String, u64> = HashMap::new();

        for (index, line) in list.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split_whitespace();
            let Some(word) = fields.next() else { continue };
            let count = match fields.next() {
                Some(raw) => raw.parse::<u64>().map_err(|_| {
                    ScanflowError::Configuration(format!(
                        "word list line {}: count {raw:?} is not a number",
                        index + 1
                    ))
                })?,
                None => 1,
            };
            *counts.entry(word.to_lowercase()).or_default() += count;
        }

        if counts.is_empty() {
            return Err(ScanflowError::Configuration("word list is empty".into()));
        }
        Ok(Self { counts })
    }

    /// Load a word list file (see [`from_word_list`](Self::from_word_list)).
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let list = std::fs::read_to_string(path.as_ref())?;
        let corrector = Self::from_word_list(&list)?;
        info!(words = corrector.len(), "Dictionary loaded");
        Ok(corrector)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    fn is_known(&self, word: &str) -> bool {
        self.counts.contains_key(word)
    }

    /// Most frequent known word in `candidates`; ties go to the
    /// alphabetically first.
    fn best<'a>(&self, candidates: impl Iterator<Item = &'a String>) -> Option<&'a String> {
        candidates
            .filter_map(|c| self.counts.get(c).map(|n| (c, *n)))
            .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(c, _)| c)
    }

    /// Correct a single alphabetic word, keeping its capitalisation.
    fn correct_word(&self, word: &str) -> Option<String> {
        if word.chars().count() < 2 || !word.is_ascii() {
            return None;
        }
        let lower = word.to_ascii_lowercase();
        if self.is_known(&lower) {
            return None;
        }

        let near = edits1(&lower);
        let replacement = match self.best(near.iter()) {
            Some(found) => found.clone(),
            None if lower.len() <= MAX_EDIT2_LEN => {
                let far: HashSet<String> = near
                    .iter()
                    .flat_map(|e| edits1(e))
                    .filter(|e| self.is_known(e))
                    .collect();
                self.best(far.iter())?.clone()
            }
            None => return None,
        };

        Some(match_case(word, &replacement))
    }
}

impl SpellCorrector for DictionaryCorrector {
    fn correct(&self, text: &str) -> Result<String> {
        let mut corrected = String::with_capacity(text.len());
        let mut word = String::new();
        let mut changed = 0usize;

        let mut flush = |word: &mut String, out: &mut String| {
            if word.is_empty() {
                return;
            }
            match self.correct_word(word) {
                Some(fixed) => {
                    changed += 1;
                    out.push_str(&fixed);
                }
                None => out.push_str(word),
            }
            word.clear();
        };

        for ch in text.chars() {
            if ch.is_alphabetic() {
                word.push(ch);
            } else {
                flush(&mut word, &mut corrected);
                corrected.push(ch);
            }
        }
        flush(&mut word, &mut corrected);

        debug!(changed, "Spelling corrected");
        Ok(corrected)
    }
}

/// All strings one deletion, transposition, replacement or insertion away.
fn edits1(word: &str) -> HashSet<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut out = HashSet::new();

    for i in 0..=chars.len() {
        let (left, right) = chars.split_at(i);
        let left: String = left.iter().collect();

        if let Some((_, rest)) = right.split_first() {
            let rest: String = rest.iter().collect();
            out.insert(format!("{left}{rest}"));
            if right.len() >= 2 {
                let tail: String = right[2..].iter().collect();
                out.insert(format!("{left}{}{}{tail}", right[1], right[0]));
            }
            for c in ALPHABET.chars() {
                out.insert(format!("{left}{c}{rest}"));
            }
        }
        let right: String = right.iter().collect();
        for c in ALPHABET.chars() {
            out.insert(format!("{left}{c}{right}"));
        }
    }

    out
}

/// Apply the capitalisation pattern of `original` to `replacement`.
fn match_case(original: &str, replacement: &str) -> String {
    let all_caps = original
        .chars()
        .filter(|c| c.is_alphabetic())
        .all(char::is_uppercase);
    if original.chars().count() > 1 && all_caps {
        return replacement.to_uppercase();
    }
    if original.chars().next().is_some_and(char::is_uppercase) {
        let mut chars = replacement.chars();
        return match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
    }
    replacement.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corrector() -> DictionaryCorrector {
        DictionaryCorrector::from_word_list(
            "# sample frequencies\n\
             the 500\n\
             quick 20\n\
             brown 20\n\
             fox 10\n\
             jumps 8\n\
             hello 12\n\
             spelling 3\n\
             correct 6\n",
        )
        .unwrap()
    }

    #[test]
    fn fixes_distance_one_errors() {
        let fixed = corrector().correct("teh quikc brwn fox").unwrap();
        assert_eq!(fixed, "the quick brown fox");
    }

    #[test]
    fn fixes_distance_two_errors() {
        assert_eq!(corrector().correct("spelng korect").unwrap(), "spelling correct");
    }

    #[test]
    fn keeps_case() {
        assert_eq!(corrector().correct("Teh HELO").unwrap(), "The HELLO");
    }

    #[test]
    fn preserves_layout_and_punctuation() {
        let text = "teh, fox!\n\nquikc  42\tjumps.";
        assert_eq!(corrector().correct(text).unwrap(), "the, fox!\n\nquick  42\tjumps.");
    }

    #[test]
    fn leaves_unknown_far_words_alone() {
        assert_eq!(corrector().correct("zzzzzzz x").unwrap(), "zzzzzzz x");
    }

    #[test]
    fn empty_word_list_rejected() {
        assert!(matches!(
            DictionaryCorrector::from_word_list("# nothing\n\n"),
            Err(ScanflowError::Configuration(_))
        ));
    }

    #[test]
    fn bad_count_rejected() {
        assert!(DictionaryCorrector::from_word_list("word many").is_err());
    }

    #[test]
    fn counts_accumulate() {
        let c = DictionaryCorrector::from_word_list("Word\nword 2").unwrap();
        assert_eq!(c.len(), 1);
        assert_eq!(c.counts["word"], 3);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.txt");
        std::fs::write(&path, "alpha\nbeta\n").unwrap();
        let c = DictionaryCorrector::load(&path).unwrap();
        assert_eq!(c.len(), 2);
        assert!(!c.is_empty());
    }

    #[test]
    fn edits1_contains_each_kind() {
        let e = edits1("ab");
        assert!(e.contains("b")); // deletion
        assert!(e.contains("ba")); // transposition
        assert!(e.contains("zb")); // replacement
        assert!(e.contains("abc")); // insertion
    }
}

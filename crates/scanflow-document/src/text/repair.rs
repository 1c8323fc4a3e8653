// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Break repairer — greedily repacks merged text into lines of bounded length,
// reassembling words that OCR split into two fragments, and separates
// paragraphs with a blank line.
//
// A fragment split is marked by a run of two or more spaces between two tokens
// of the same paragraph: `"inter  national"` is read as the fragment
// `"inter "` followed by the fragment `" national"`, and comes out as
// `"international"`. The run only counts when the left token does not end a
// clause and the right token starts with a lowercase letter, so a double
// space after a full stop stays a plain separator.

use scanflow_core::config::DEFAULT_MAX_LINE_LENGTH;
use tracing::{debug, instrument};

/// Options for [`repair`].
#[derive(Debug, Clone, Copy)]
pub struct RepairOptions {
    /// Maximum characters per output line. A single word longer than this
    /// gets a line of its own. Zero behaves like one.
    pub max_line_length: usize,
    /// Glue fragments separated by a multi-space marker.
    pub reassemble_fragments: bool,
}

impl Default for RepairOptions {
    fn default() -> Self {
        Self {
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            reassemble_fragments: true,
        }
    }
}

/// Punctuation that ends a clause; a token ending in one never continues into
/// the next.
const CLAUSE_END: [char; 6] = ['.', '!', '?', ':', ';', ','];

#[derive(Debug, PartialEq, Eq)]
pub(super) struct Token<'a> {
    pub(super) word: &'a str,
    /// Continues the previous token without a separator.
    pub(super) glued: bool,
}

/// Whether `right` reads as the second half of a word split after `left`.
fn is_fragment_pair(left: &str, right: &str) -> bool {
    !left.ends_with(CLAUSE_END) && right.chars().next().is_some_and(char::is_lowercase)
}

/// Split a paragraph into whitespace-delimited tokens, flagging the ones
/// preceded by a fragment marker.
pub(super) fn tokenize(paragraph: &str, reassemble: bool) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = paragraph;

    loop {
        let trimmed = rest.trim_start();
        if trimmed.is_empty() {
            break;
        }
        let gap = &rest[..rest.len() - trimmed.len()];
        let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
        let word = &trimmed[..end];
        let glued = reassemble
            && gap.len() >= 2
            && gap.bytes().all(|b| b == b' ')
            && tokens
                .last()
                .is_some_and(|prev: &Token<'_>| is_fragment_pair(prev.word, word));
        tokens.push(Token { word, glued });
        rest = &trimmed[end..];
    }

    tokens
}

/// One output line under construction.
#[derive(Default)]
struct LineBuf {
    text: String,
    chars: usize,
    /// Byte offset where the last word of `text` starts.
    last_word_start: usize,
}

impl LineBuf {
    fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn start(&mut self, word: &str) {
        self.text.clear();
        self.text.push_str(word);
        self.chars = word.chars().count();
        self.last_word_start = 0;
    }

    fn append(&mut self, word: &str) {
        self.text.push(' ');
        self.last_word_start = self.text.len();
        self.text.push_str(word);
        self.chars += 1 + word.chars().count();
    }

    fn glue(&mut self, fragment: &str) {
        self.text.push_str(fragment);
        self.chars += fragment.chars().count();
    }
}

/// Repack `text` into lines of at most `options.max_line_length` characters.
///
/// Each input line is a paragraph. Its words are packed greedily, and every
/// paragraph is followed by one blank line. Word order and content are
/// preserved; only separators change. Leading and trailing whitespace of the
/// result is removed.
#[instrument(skip_all, fields(text_len = text.len(), max = options.max_line_length))]
pub fn repair(text: &str, options: &RepairOptions) -> String {
    let max = options.max_line_length.max(1);
    let mut fixed = String::with_capacity(text.len() + text.len() / max.max(8));
    let mut reassembled = 0usize;

    for paragraph in text.split('\n') {
        let mut line = LineBuf::default();

        for token in tokenize(paragraph, options.reassemble_fragments) {
            if token.glued && !line.is_empty() {
                reassembled += 1;
                line.glue(token.word);
                // Keep a reassembled word whole: if it overflowed a line that
                // holds other words, move it down.
                if line.chars > max && line.last_word_start > 0 {
                    let word = line.text.split_off(line.last_word_start);
                    fixed.push_str(line.text.trim_end());
                    fixed.push('\n');
                    line.start(&word);
                }
                continue;
            }

            if line.is_empty() {
                line.start(token.word);
            } else if line.chars + 1 + token.word.chars().count() <= max {
                line.append(token.word);
            } else {
                fixed.push_str(&line.text);
                fixed.push('\n');
                line.start(token.word);
            }
        }

        if !line.is_empty() {
            fixed.push_str(&line.text);
            fixed.push('\n');
        }
        fixed.push('\n');
    }

    let fixed = fixed.trim().to_string();
    debug!(reassembled, fixed_len = fixed.len(), "Line breaks repaired");
    fixed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_max(max_line_length: usize) -> RepairOptions {
        RepairOptions {
            max_line_length,
            ..Default::default()
        }
    }

    fn words(s: &str) -> Vec<&str> {
        s.split_whitespace().collect()
    }

    #[test]
    fn packs_greedily_within_limit() {
        let fixed = repair("The quick brown fox jumps over the lazy dog", &with_max(20));
        let lines: Vec<&str> = fixed.lines().collect();
        assert_eq!(lines, vec!["The quick brown fox", "jumps over the lazy", "dog"]);
    }

    #[test]
    fn reassembles_marked_fragments() {
        let fixed = repair("the inter  national standard", &RepairOptions::default());
        assert_eq!(fixed, "the international standard");
    }

    #[test]
    fn double_space_after_sentence_is_a_separator() {
        let fixed = repair("end.  Next sentence", &RepairOptions::default());
        assert_eq!(fixed, "end. Next sentence");
        assert_eq!(words(&fixed), vec!["end.", "Next", "sentence"]);
    }

    #[test]
    fn double_space_before_capital_or_after_comma_is_a_separator() {
        let options = RepairOptions::default();
        assert_eq!(repair("see  Appendix B", &options), "see Appendix B");
        assert_eq!(repair("red,  green", &options), "red, green");
    }

    #[test]
    fn tokenize_flags_only_word_fragments() {
        let tokens = tokenize("the inter  national  Day.  of", true);
        let glued: Vec<bool> = tokens.iter().map(|t| t.glued).collect();
        assert_eq!(glued, vec![false, false, true, false, false]);
    }

    #[test]
    fn fragments_left_alone_when_disabled() {
        let options = RepairOptions {
            reassemble_fragments: false,
            ..Default::default()
        };
        assert_eq!(repair("inter  national", &options), "inter national");
    }

    #[test]
    fn tab_gap_is_not_a_fragment_marker() {
        assert_eq!(repair("inter \tnational", &RepairOptions::default()), "inter national");
    }

    #[test]
    fn reassembled_word_moves_to_next_line_when_it_overflows() {
        let fixed = repair("aaaa inter  national", &with_max(12));
        let lines: Vec<&str> = fixed.lines().collect();
        assert_eq!(lines, vec!["aaaa", "international"]);
    }

    #[test]
    fn paragraphs_are_separated_by_blank_line() {
        assert_eq!(repair("first\nsecond", &RepairOptions::default()), "first\n\nsecond");
    }

    #[test]
    fn empty_paragraphs_add_blank_lines() {
        assert_eq!(repair("a\n\nb", &RepairOptions::default()), "a\n\n\nb");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(repair("", &RepairOptions::default()), "");
        assert_eq!(repair("  \n \n", &RepairOptions::default()), "");
    }

    #[test]
    fn overlong_word_gets_its_own_line() {
        let fixed = repair("a pneumonoultramicroscopic b", &with_max(10));
        let lines: Vec<&str> = fixed.lines().collect();
        assert_eq!(lines, vec!["a", "pneumonoultramicroscopic", "b"]);
    }

    #[test]
    fn zero_limit_puts_each_word_on_its_own_line() {
        assert_eq!(repair("x y z", &with_max(0)), "x\ny\nz");
    }

    #[test]
    fn preserves_words_and_bounds_lines() {
        let samples = [
            "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor \
             incididunt ut labore et dolore magna aliqua.\nUt enim ad minim veniam, quis \
             nostrud exercitation ullamco laboris nisi ut aliquip ex ea commodo consequat.",
            "short\n\n\nlines\nonly",
            "  leading and trailing whitespace everywhere   \n\t tabbed\tline ",
            "naïve café résumé façade coöperate über straße",
            "supercalifragilisticexpialidocious antidisestablishmentarianism x",
        ];

        for limit in [1, 5, 12, 20, 40, 80] {
            for sample in samples {
                let fixed = repair(sample, &with_max(limit));
                assert_eq!(words(sample), words(&fixed), "limit {limit}: {sample:?}");
                for line in fixed.lines() {
                    let single_word = line.split_whitespace().count() <= 1;
                    assert!(
                        line.chars().count() <= limit || single_word,
                        "line {line:?} exceeds {limit}"
                    );
                }
            }
        }
    }

    #[test]
    fn tokenizer_flags_only_multi_space_gaps() {
        let tokens = tokenize("a  b c", true);
        assert_eq!(
            tokens,
            vec![
                Token { word: "a", glued: false },
                Token { word: "b", glued: true },
                Token { word: "c", glued: false },
            ]
        );
        // Leading spaces never glue onto nothing.
        assert!(!tokenize("   a", true)[0].glued);
    }
}

//! Locates the expression inside a line of free text.
//!
//! Scanning starts after the last `=` that is not part of the trailing run of
//! `=` signs and whitespace. While nothing parses at the current offset, the
//! next word (a run of non-whitespace plus the whitespace after it) is
//! discarded. The first remainder that parses is evaluated.
//!
//! An expression followed by more words, as in `in 2024 we paid 3 * 4`, is
//! skipped like any other word. An expression followed by an operator without
//! an operand, as in `0.1 *** 10`, ends the scan.

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::config::Config;
use crate::decimal;
use crate::error::{CalcError, ParseErrorKind};
use crate::parser;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Calculation {
    /// Characters of the input before the recognized expression.
    pub skip: usize,
    /// Canonical decimal string of the value.
    pub result: String,
}

impl Calculation {
    /// The recognized expression within `text`, the line this calculation
    /// came from, without surrounding whitespace and trailing `=` signs.
    pub fn expression<'t>(&self, text: &'t str) -> &'t str {
        let start = text
            .char_indices()
            .nth(self.skip)
            .map_or(text.len(), |(index, _)| index);
        text[start..]
            .trim_start()
            .trim_end_matches(|chr: char| chr.is_whitespace() || chr == '=')
    }
}

pub fn calculate(text: &str, config: &Config) -> Result<Calculation, CalcError> {
    let trimmed = text.trim_end_matches(|chr: char| chr.is_whitespace() || chr == '=');
    let mut offset = trimmed.rfind('=').map_or(0, |index| index + 1);
    let mut attempts = vec![];

    loop {
        attempts.push(offset);
        let remainder = &trimmed[offset..];
        log::debug!("attempting {:?} at byte {}", remainder, offset);

        let error = match parser::parse(remainder, config.max_depth) {
            Ok(tree) => {
                let value = tree.evaluate_with(config.effective_precision())?;
                let calculation = Calculation {
                    skip: text[..offset].chars().count(),
                    result: decimal::to_canonical_string(value),
                };
                log::debug!("found {:?}", calculation);
                return Ok(calculation);
            }
            Err(error) => error,
        };

        match error.kind {
            ParseErrorKind::Mismatch { .. }
            | ParseErrorKind::TrailingInput {
                at_operator: false, ..
            } if !remainder.is_empty() => {
                let word = next_word_len(remainder);
                log::debug!(
                    "{}, skipping {:?}",
                    error,
                    &remainder[..word]
                );
                offset += word;
            }
            ParseErrorKind::Mismatch { .. } | ParseErrorKind::TrailingInput { .. } => {
                log::debug!("{}, giving up", error);
                return Err(CalcError::Exhausted {
                    text: String::from(text),
                    marker: render_marker(text, &attempts),
                });
            }
            _ => return Err(error.into()),
        }
    }
}

/// Byte length of the leading non-whitespace run plus the whitespace after it.
fn next_word_len(remainder: &str) -> usize {
    let word = remainder
        .find(char::is_whitespace)
        .unwrap_or_else(|| remainder.len());
    let gap = remainder[word..]
        .find(|chr: char| !chr.is_whitespace())
        .unwrap_or_else(|| remainder.len() - word);
    word + gap
}

/// A line as long as `text` with `^` under every attempted byte offset.
/// Tabs are kept so the marks line up under the text.
fn render_marker(text: &str, attempts: &[usize]) -> String {
    text.char_indices()
        .map(|(index, chr)| {
            if attempts.contains(&index) {
                '^'
            } else if chr == '\t' {
                '\t'
            } else {
                ' '
            }
        })
        .collect()
}

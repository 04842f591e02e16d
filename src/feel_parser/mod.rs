//! Best-effort FEEL reference scanner.
//!
//! The scanner walks a FEEL text and records which spans refer to known
//! variables, resolving against the symbol table prepared from the scope the
//! text lives in. It is deliberately not a FEEL grammar: the editor calls it
//! on half-typed input, so anything that cannot be lexed is skipped rather
//! than reported. The output list is ordered by ascending `start_index`; the
//! rename offset engine depends on that ordering and never re-sorts.
//!
//! Matching rules, in order at each position:
//! 1. whitespace, string literals, and numbers are consumed without output;
//!    an unterminated string swallows the rest of the input
//! 2. the longest known name matching at the position wins, so multi-word
//!    names ("Monthly Salary") and qualified imports ("tax.Rate") resolve as
//!    one span; declared names also win over keywords this way
//! 3. a bare word is recorded as an unresolved candidate unless it is a FEEL
//!    keyword or built-in function name
//! 4. a word right after a `.` is a property segment: recorded unresolved,
//!    never matched against the scope chain, so renaming a variable that
//!    happens to share its name cannot corrupt a path expression
//! 5. the range operator `..` is not a property dot

pub mod keywords;
pub mod lexemes;
pub mod symbols;

pub use keywords::{is_builtin_function, is_keyword};
pub use symbols::{FeelOccurrence, ScopeSymbols, SymbolEntry};

use lexemes::{is_name_part, name_word, number_literal, string_literal};
use nom::character::complete::multispace1;

/// Scan `text`, resolving identifier spans against `symbols`.
///
/// Never fails; malformed input degrades to fewer recorded occurrences.
pub fn scan(symbols: &ScopeSymbols, text: &str) -> Vec<FeelOccurrence> {
    let mut occurrences = Vec::new();
    let mut rest = text;
    let mut after_dot = false;

    while !rest.is_empty() {
        let position = text.len() - rest.len();

        if let Ok((next, _)) = multispace1::<&str, nom::error::Error<&str>>(rest) {
            // Whitespace keeps the property flag: "a. b" is still a path.
            rest = next;
            continue;
        }
        if let Ok((next, _)) = string_literal(rest) {
            rest = next;
            after_dot = false;
            continue;
        }
        if rest.starts_with('"') {
            // Unterminated string: the user is mid-typing, treat the rest of
            // the input as string text.
            break;
        }
        if let Ok((next, _)) = number_literal(rest) {
            rest = next;
            after_dot = false;
            continue;
        }
        if !after_dot {
            if let Some(entry) = match_known_name(symbols, rest) {
                occurrences.push(FeelOccurrence {
                    start_index: position,
                    length: entry.text.len(),
                    text: entry.text.clone(),
                    source: Some(entry.key.clone()),
                });
                rest = &rest[entry.text.len()..];
                continue;
            }
        }
        if let Ok((next, word)) = name_word(rest) {
            if after_dot {
                occurrences.push(FeelOccurrence {
                    start_index: position,
                    length: word.len(),
                    text: word.to_string(),
                    source: None,
                });
            } else if !is_keyword(word) && !is_builtin_function(word) {
                occurrences.push(FeelOccurrence {
                    start_index: position,
                    length: word.len(),
                    text: word.to_string(),
                    source: None,
                });
            }
            rest = next;
            after_dot = false;
            continue;
        }
        if let Some(stripped) = rest.strip_prefix("..") {
            rest = stripped;
            after_dot = false;
            continue;
        }
        // Single operator/punctuation character, or a byte we cannot lex.
        let Some(c) = rest.chars().next() else { break };
        after_dot = c == '.';
        rest = &rest[c.len_utf8()..];
    }

    debug_assert!(
        occurrences
            .windows(2)
            .all(|pair| pair[0].start_index <= pair[1].start_index),
        "scanner emitted occurrences out of order"
    );
    occurrences
}

/// Longest known name starting exactly at the head of `rest`, with a
/// word-boundary check so "Tax" does not match inside "Taxes".
fn match_known_name<'a>(symbols: &'a ScopeSymbols, rest: &str) -> Option<&'a SymbolEntry> {
    symbols.iter().find(|entry| {
        rest.starts_with(entry.text.as_str())
            && rest[entry.text.len()..]
                .chars()
                .next()
                .map_or(true, |c| !is_name_part(c))
    })
}

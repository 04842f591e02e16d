//! nom sub-lexers for the FEEL scanner.
//!
//! Each lexer recognizes one lexeme class at the start of the remaining input
//! and returns the matched slice. The scan driver decides what to do with
//! each class; nothing here allocates or resolves names.

use nom::{
    branch::alt,
    bytes::complete::take_while,
    character::complete::{char, digit1, one_of, satisfy},
    combinator::{opt, recognize},
    sequence::pair,
    IResult, Parser,
};

/// First character of a FEEL name: a letter, `_`, or `?`.
pub fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '?'
}

/// Subsequent characters of a FEEL name word. `'` appears in names like
/// `driver's license`.
pub fn is_name_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '?' || c == '\''
}

/// One identifier word. Multi-word names are assembled by the driver through
/// known-name matching, not here.
pub fn name_word(input: &str) -> IResult<&str, &str> {
    recognize(pair(satisfy(is_name_start), take_while(is_name_part))).parse(input)
}

/// A numeric literal: `123`, `3.14`, `.5`, with an optional exponent.
/// The sign is an operator, not part of the literal.
pub fn number_literal(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((
            recognize((digit1, char('.'), digit1)),
            recognize(pair(char('.'), digit1)),
            digit1,
        )),
        opt(recognize((one_of("eE"), opt(one_of("+-")), digit1))),
    ))
    .parse(input)
}

/// A closed double-quoted string literal with backslash escapes. Returns the
/// whole lexeme including the quotes. An unterminated string fails here; the
/// driver then swallows the rest of the input as string text.
pub fn string_literal(input: &str) -> IResult<&str, &str> {
    let mut chars = input.char_indices();
    match chars.next() {
        Some((_, '"')) => {}
        _ => {
            return Err(nom::Err::Error(nom::error::Error::new(
                input,
                nom::error::ErrorKind::Char,
            )))
        }
    }
    let mut escaped = false;
    for (idx, c) in chars {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' => {
                let end = idx + c.len_utf8();
                return Ok((&input[end..], &input[..end]));
            }
            _ => {}
        }
    }
    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Char,
    )))
}

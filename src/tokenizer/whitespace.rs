//! Whitespace handling.
//!
//! Whitespace, newlines included, is kept as a [`Token::Whitespace`] so token
//! spans line up with the source; the analyzer drops it through
//! [`super::token::significant_tokens`].

use nom::{character::complete::multispace1, combinator::map, error::context};

use super::token::{ParserResult, Token};

/// Parses a run of spaces, tabs and line breaks.
///
/// ```
/// # use viewtpl::tokenizer::whitespace::parse_whitespace;
/// # use viewtpl::tokenizer::token::Token;
/// let (rest, token) = parse_whitespace(" \n\titem").unwrap();
/// assert_eq!(token, Token::Whitespace(" \n\t".to_string()));
/// assert_eq!(rest, "item");
/// ```
#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_whitespace(input: &str) -> ParserResult<Token> {
    context(
        "whitespace expected",
        map(multispace1, |ws: &str| Token::Whitespace(ws.to_string())),
    )(input)
}

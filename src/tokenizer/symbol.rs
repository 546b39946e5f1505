//! # Symbol Token Handling
//!
//! Operators and delimiters of the expression language.
//!
//! Symbols are parsed using a longest-match approach so that multi-character
//! operators like `===` are recognized instead of `==` followed by `=`.
//! Precedence is not the tokenizer's concern; it is encoded in the grammar in
//! [`crate::analyzer::parsers::expression`].

use strum_macros::{AsRefStr, Display, EnumString};

use nom::{
    branch::alt,
    bytes::complete::tag,
    combinator::{map, value},
    error::context,
};

use super::token::{ParserResult, Token};

/// Represents operators in expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr)]
pub enum Operator {
    /// Member access operator (`.`)
    #[strum(serialize = ".")]
    Dot,
    /// Conditional operator (`?`)
    #[strum(serialize = "?")]
    Question,

    /// Strict equality (`===`)
    #[strum(serialize = "===")]
    StrictEqual,
    /// Strict inequality (`!==`)
    #[strum(serialize = "!==")]
    StrictNotEqual,
    /// Loose equality (`==`)
    #[strum(serialize = "==")]
    EqualEqual,
    /// Loose inequality (`!=`)
    #[strum(serialize = "!=")]
    NotEqual,
    #[strum(serialize = ">")]
    Greater,
    #[strum(serialize = ">=")]
    GreaterEqual,
    #[strum(serialize = "<")]
    Less,
    #[strum(serialize = "<=")]
    LessEqual,

    #[strum(serialize = "+")]
    Plus,
    #[strum(serialize = "-")]
    Minus,
    #[strum(serialize = "*")]
    Multiply,
    #[strum(serialize = "/")]
    Divide,
    #[strum(serialize = "%")]
    Modulo,

    /// Logical AND operator (`&&`)
    #[strum(serialize = "&&")]
    And,
    /// Logical OR operator (`||`)
    #[strum(serialize = "||")]
    Or,
    /// Logical NOT operator (`!`)
    #[strum(serialize = "!")]
    Not,
}

/// Represents structural delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
pub enum Delimiter {
    #[strum(serialize = "{")]
    OpenBrace,
    #[strum(serialize = "}")]
    CloseBrace,
    #[strum(serialize = "(")]
    OpenParen,
    #[strum(serialize = ")")]
    CloseParen,
    #[strum(serialize = "[")]
    OpenBracket,
    #[strum(serialize = "]")]
    CloseBracket,
    #[strum(serialize = ",")]
    Comma,
    #[strum(serialize = ":")]
    Colon,
}

// Braces cannot go through the derived Display; spell it out instead.
impl std::fmt::Display for Delimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Parses an operator token, longest match first.
///
/// ```
/// # use viewtpl::tokenizer::symbol::{parse_operator, Operator};
/// # use viewtpl::tokenizer::token::Token;
/// let (rest, token) = parse_operator("=== b").unwrap();
/// assert_eq!(token, Token::Operator(Operator::StrictEqual));
/// assert_eq!(rest, " b");
/// ```
#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_operator(input: &str) -> ParserResult<Token> {
    context(
        "operator",
        map(
            alt((
                // Multi-character operators (matched first for longest-match)
                value(Operator::StrictEqual, tag("===")),
                value(Operator::StrictNotEqual, tag("!==")),
                value(Operator::EqualEqual, tag("==")),
                value(Operator::NotEqual, tag("!=")),
                value(Operator::GreaterEqual, tag(">=")),
                value(Operator::LessEqual, tag("<=")),
                value(Operator::And, tag("&&")),
                value(Operator::Or, tag("||")),
                // Single-character operators
                value(Operator::Dot, tag(".")),
                value(Operator::Question, tag("?")),
                value(Operator::Greater, tag(">")),
                value(Operator::Less, tag("<")),
                value(Operator::Plus, tag("+")),
                value(Operator::Minus, tag("-")),
                value(Operator::Multiply, tag("*")),
                value(Operator::Divide, tag("/")),
                value(Operator::Modulo, tag("%")),
                value(Operator::Not, tag("!")),
            )),
            Token::Operator,
        ),
    )(input)
}

/// Parses a delimiter token.
#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_delimiter(input: &str) -> ParserResult<Token> {
    context(
        "delimiter",
        map(
            alt((
                value(Delimiter::OpenBrace, tag("{")),
                value(Delimiter::CloseBrace, tag("}")),
                value(Delimiter::OpenParen, tag("(")),
                value(Delimiter::CloseParen, tag(")")),
                value(Delimiter::OpenBracket, tag("[")),
                value(Delimiter::CloseBracket, tag("]")),
                value(Delimiter::Comma, tag(",")),
                value(Delimiter::Colon, tag(":")),
            )),
            Token::Delimiter,
        ),
    )(input)
}

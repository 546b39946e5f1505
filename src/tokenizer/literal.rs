//! String and number literals.
//!
//! Boolean, `null` and `undefined` are keywords and never reach this module.

use nom::{
    branch::alt,
    bytes::complete::{take_while1, take_while_m_n},
    character::complete::{anychar, char, digit1, one_of},
    combinator::{map, map_opt, map_res, opt, recognize, value},
    error::context,
    multi::fold_many0,
    sequence::{delimited, pair, preceded, tuple},
};

use super::token::{ParserResult, Token};

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Number(f64),
}

enum StringFragment<'a> {
    Chunk(&'a str),
    Escaped(char),
}

#[tracing::instrument(level = "debug", skip(input))]
fn parse_unicode_escape(input: &str) -> ParserResult<char> {
    context(
        "unicode escape",
        preceded(
            char('u'),
            map_opt(
                take_while_m_n(4, 4, |c: char| c.is_ascii_hexdigit()),
                |hex: &str| u32::from_str_radix(hex, 16).ok().and_then(char::from_u32),
            ),
        ),
    )(input)
}

#[tracing::instrument(level = "debug", skip(input))]
fn parse_escape(input: &str) -> ParserResult<char> {
    context(
        "escape sequence",
        preceded(
            char('\\'),
            alt((
                value('\n', char('n')),
                value('\t', char('t')),
                value('\r', char('r')),
                value('\0', char('0')),
                parse_unicode_escape,
                // `\\`, `\'`, `\"`, `\/` and any unknown escape yield the character itself
                anychar,
            )),
        ),
    )(input)
}

fn parse_quoted<'a>(quote: char) -> impl FnMut(&'a str) -> ParserResult<'a, String> {
    move |input: &'a str| {
        delimited(
            char(quote),
            fold_many0(
                alt((
                    map(parse_escape, StringFragment::Escaped),
                    map(
                        take_while1(move |c: char| c != quote && c != '\\'),
                        StringFragment::Chunk,
                    ),
                )),
                String::new,
                |mut acc, fragment| {
                    match fragment {
                        StringFragment::Chunk(s) => acc.push_str(s),
                        StringFragment::Escaped(c) => acc.push(c),
                    }
                    acc
                },
            ),
            char(quote),
        )(input)
    }
}

#[tracing::instrument(level = "debug", skip(input))]
fn parse_string_literal(input: &str) -> ParserResult<Literal> {
    context(
        "string literal",
        map(alt((parse_quoted('"'), parse_quoted('\''))), Literal::String),
    )(input)
}

/// Unsigned decimal; the sign is a unary operator in the grammar.
#[tracing::instrument(level = "debug", skip(input))]
fn parse_number_literal(input: &str) -> ParserResult<Literal> {
    context(
        "number literal",
        map_res(
            recognize(tuple((
                digit1,
                opt(pair(char('.'), digit1)),
                opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
            ))),
            |s: &str| s.parse::<f64>().map(Literal::Number),
        ),
    )(input)
}

#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_literal(input: &str) -> ParserResult<Token> {
    context(
        "literal",
        map(
            alt((parse_string_literal, parse_number_literal)),
            Token::Literal,
        ),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_string() {
        let (rest, result) = parse_string_literal("\"hello world\"").unwrap();
        assert_eq!(rest, "");
        assert_eq!(result, Literal::String("hello world".to_string()));

        let (rest, result) = parse_string_literal("'single' + x").unwrap();
        assert_eq!(rest, " + x");
        assert_eq!(result, Literal::String("single".to_string()));
    }

    #[test]
    fn test_empty_string() {
        let (_, result) = parse_string_literal("''").unwrap();
        assert_eq!(result, Literal::String(String::new()));
    }

    #[test]
    fn test_other_quote_is_plain_text() {
        let (_, result) = parse_string_literal("\"aren't\"").unwrap();
        assert_eq!(result, Literal::String("aren't".to_string()));
    }

    #[test]
    fn test_escapes() {
        let (_, result) = parse_string_literal(r#"'it\'s\n\t\\ A\/'"#).unwrap();
        assert_eq!(result, Literal::String("it's\n\t\\ A/".to_string()));
    }

    #[test]
    fn test_unterminated_string() {
        assert!(parse_string_literal("'open").is_err());
    }

    #[test]
    fn test_number_literals() {
        let (rest, result) = parse_number_literal("123").unwrap();
        assert_eq!(result, Literal::Number(123.0));
        assert_eq!(rest, "");

        let (_, result) = parse_number_literal("123.45").unwrap();
        assert_eq!(result, Literal::Number(123.45));

        let (_, result) = parse_number_literal("1e3").unwrap();
        assert_eq!(result, Literal::Number(1000.0));

        let (_, result) = parse_number_literal("2.5E-1").unwrap();
        assert_eq!(result, Literal::Number(0.25));
    }

    #[test]
    fn test_number_before_member_access() {
        let (rest, result) = parse_number_literal("0].name").unwrap();
        assert_eq!(result, Literal::Number(0.0));
        assert_eq!(rest, "].name");

        let (rest, _) = parse_number_literal("1.toString").unwrap();
        assert_eq!(rest, ".toString");
    }

    #[test]
    fn test_sign_is_not_part_of_literal() {
        assert!(parse_number_literal("-1").is_err());
    }
}
